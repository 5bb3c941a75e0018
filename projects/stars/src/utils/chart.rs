use chrono::NaiveDate;
use plotters::prelude::*;
use super::aggregation::StarAggregation;

/// Chart configuration options
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub show_legend: bool,
    pub colors: Vec<RGBColor>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            show_legend: true,
            colors: vec![
                RGBColor(31, 119, 180),  // Blue
                RGBColor(255, 127, 14),  // Orange
                RGBColor(44, 160, 44),   // Green
                RGBColor(214, 39, 40),   // Red
                RGBColor(148, 103, 189), // Purple
                RGBColor(140, 86, 75),   // Brown
                RGBColor(227, 119, 194), // Pink
                RGBColor(127, 127, 127), // Grey
                RGBColor(188, 189, 34),  // Olive
                RGBColor(23, 190, 207),  // Cyan
            ],
        }
    }
}

pub fn chart_title(org: &str) -> String {
    format!("GitHub Stars Over Time for {org}'s Repositories")
}

/// Running totals per layer: layer `i` is the sum of series `0..=i`.
pub fn stack_layers(data: &StarAggregation) -> Vec<Vec<u64>> {
    let mut layers: Vec<Vec<u64>> = Vec::with_capacity(data.series.len());
    for series in &data.series {
        let layer = match layers.last() {
            Some(below) => below.iter().zip(&series.counts).map(|(b, c)| b + c).collect(),
            None => series.counts.clone(),
        };
        layers.push(layer);
    }
    layers
}

/// Generates an SVG stacked-area chart of cumulative stars for `org`
pub fn generate_stacked_area_chart(
    org: &str,
    data: &StarAggregation,
    config: &ChartConfig,
) -> Result<String, String> {
    let title = chart_title(org);
    if data.is_empty() {
        return Ok(generate_empty_chart(&title, config.width, config.height));
    }

    let (min_date, max_date) = match (data.date_axis.first(), data.date_axis.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Ok(generate_empty_chart(&title, config.width, config.height)),
    };
    // A single-day axis would give plotters an empty range.
    let max_date = if max_date == min_date {
        max_date.succ_opt().unwrap_or(max_date)
    } else {
        max_date
    };

    let layers = stack_layers(data);
    let y_max = calculate_y_max(&layers);

    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, (config.width, config.height))
            .into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| format!("Failed to fill background: {}", e))?;

        draw_stacked_chart(&root, data, &layers, config, &title, min_date, max_date, y_max)?;

        root.present()
            .map_err(|e| format!("Failed to present chart: {}", e))?;
    }

    Ok(buffer)
}

#[allow(clippy::too_many_arguments)]
fn draw_stacked_chart(
    root: &DrawingArea<SVGBackend, plotters::coord::Shift>,
    data: &StarAggregation,
    layers: &[Vec<u64>],
    config: &ChartConfig,
    title: &str,
    min_date: NaiveDate,
    max_date: NaiveDate,
    y_max: u64,
) -> Result<(), String> {
    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(min_date..max_date, 0u64..y_max)
        .map_err(|e| format!("Failed to build chart: {}", e))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Cumulative Stars")
        .x_label_formatter(&|date| date.format("%Y-%m").to_string())
        .y_label_formatter(&|y| format_y_value(*y))
        .draw()
        .map_err(|e| format!("Failed to configure mesh: {}", e))?;

    // Top layer first so each lower layer paints over the part it owns.
    for (idx, (series, layer)) in data.series.iter().zip(layers).enumerate().rev() {
        let color = series_color(config, idx);

        chart
            .draw_series(
                AreaSeries::new(
                    data.date_axis.iter().copied().zip(layer.iter().copied()),
                    0u64,
                    color.filled(),
                )
                .border_style(color),
            )
            .map_err(|e| format!("Failed to draw area for {}: {}", series.name, e))?;
    }

    // Legend entries in repository order.
    for (idx, series) in data.series.iter().enumerate() {
        let color = series_color(config, idx);

        chart
            .draw_series(std::iter::empty::<Rectangle<(NaiveDate, u64)>>())
            .map_err(|e| format!("Failed to add legend entry for {}: {}", series.name, e))?
            .label(&series.name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if config.show_legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(|e| format!("Failed to draw legend: {}", e))?;
    }

    Ok(())
}

fn series_color(config: &ChartConfig, idx: usize) -> RGBColor {
    *config.colors.get(idx % config.colors.len().max(1)).unwrap_or(&BLUE)
}

/// Top of the stack plus 10% headroom
fn calculate_y_max(layers: &[Vec<u64>]) -> u64 {
    let top = layers
        .last()
        .and_then(|layer| layer.iter().max().copied())
        .unwrap_or(0);

    if top == 0 {
        10
    } else {
        top + (top / 10).max(1)
    }
}

fn format_y_value(value: u64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}K", value as f64 / 1_000.0)
    } else {
        format!("{}", value)
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Generates an empty chart when no data is available
pub fn generate_empty_chart(title: &str, width: u32, height: u32) -> String {
    format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\
            <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\
            <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"18\" fill=\"#666666\">\
                No star data available to plot: {}\
            </text>\
        </svg>",
        width,
        height,
        width / 2,
        height / 2,
        escape_xml(title)
    )
}
