use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Star dates of one repository, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryStars {
    pub name: String,
    pub stargazer_count: u64,
    pub dates: Vec<NaiveDate>,
}

/// Cumulative star counts of one repository along the date axis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySeries {
    pub name: String,
    pub first_star: NaiveDate,
    pub counts: Vec<u64>,
}

/// Every repository's cumulative counts aligned on one shared axis.
///
/// Series keep their input order; when stacked, later series sit on top of
/// earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StarAggregation {
    pub date_axis: Vec<NaiveDate>,
    pub series: Vec<RepositorySeries>,
}

impl StarAggregation {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Sum of all series per day (height of the top of the stack).
    pub fn totals(&self) -> Vec<u64> {
        let mut totals = vec![0u64; self.date_axis.len()];
        for series in &self.series {
            for (total, count) in totals.iter_mut().zip(&series.counts) {
                *total += count;
            }
        }
        totals
    }
}

/// For each day, how many of `star_dates` fall on or before it.
///
/// `days` must be ascending. `star_dates` may be in any order.
pub fn count_stars_by_date(star_dates: &[NaiveDate], days: &[NaiveDate]) -> Vec<u64> {
    let mut sorted = star_dates.to_vec();
    sorted.sort_unstable();

    let mut counts = Vec::with_capacity(days.len());
    let mut index = 0usize;
    for day in days {
        while index < sorted.len() && sorted[index] <= *day {
            index += 1;
        }
        counts.push(index as u64);
    }
    counts
}

/// Contiguous days from `start` to `end`, both included.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

/// Bounds of the global date axis.
///
/// Spans the earliest and latest star date over all repositories; with no
/// star dates at all, the year leading up to `today`.
pub fn axis_bounds(repositories: &[RepositoryStars], today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let all_dates = repositories.iter().flat_map(|repo| &repo.dates);
    let earliest = all_dates.clone().min().copied();
    let latest = all_dates.max().copied();

    match (earliest, latest) {
        (Some(earliest), Some(latest)) => (earliest, latest),
        _ => (today - Duration::days(365), today),
    }
}

/// Aligns every repository with at least one star on the global date axis.
pub fn aggregate(repositories: &[RepositoryStars], today: NaiveDate) -> StarAggregation {
    let (start, end) = axis_bounds(repositories, today);
    let date_axis = date_range(start, end);

    let series = repositories
        .iter()
        .filter_map(|repo| {
            let first_star = repo.dates.iter().min().copied()?;
            Some(RepositorySeries {
                name: repo.name.clone(),
                first_star,
                counts: count_stars_by_date(&repo.dates, &date_axis),
            })
        })
        .collect();

    StarAggregation { date_axis, series }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn repo(name: &str, dates: &[&str]) -> RepositoryStars {
        RepositoryStars {
            name: name.to_string(),
            stargazer_count: dates.len() as u64,
            dates: dates.iter().map(|d| day(d)).collect(),
        }
    }

    #[test]
    fn counts_include_same_day_stars() {
        let stars = [day("2023-01-01"), day("2023-01-01"), day("2023-01-03")];
        let days = date_range(day("2023-01-01"), day("2023-01-04"));

        assert_eq!(count_stars_by_date(&stars, &days), vec![2, 2, 3, 3]);
    }

    #[test]
    fn no_stars_counts_zero_everywhere() {
        let days = date_range(day("2023-01-01"), day("2023-01-07"));
        assert_eq!(count_stars_by_date(&[], &days), vec![0; 7]);
    }

    #[test]
    fn unordered_input_still_counts_correctly() {
        let stars = [day("2023-01-03"), day("2022-12-31"), day("2023-01-01")];
        let days = date_range(day("2023-01-01"), day("2023-01-03"));

        let counts = count_stars_by_date(&stars, &days);
        assert_eq!(counts, vec![2, 2, 3]);
        assert!(counts.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn counts_are_non_decreasing() {
        let stars: Vec<NaiveDate> = (0..50)
            .map(|i| day("2022-06-01") + Duration::days((i * 7919) % 97))
            .collect();
        let days = date_range(day("2022-05-20"), day("2022-10-01"));

        let counts = count_stars_by_date(&stars, &days);
        assert_eq!(counts.len(), days.len());
        assert!(counts.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(counts.last().copied(), Some(50));
        assert_eq!(counts.first().copied(), Some(0));
    }

    #[test]
    fn date_range_is_inclusive() {
        assert_eq!(
            date_range(day("2024-02-28"), day("2024-03-01")),
            vec![day("2024-02-28"), day("2024-02-29"), day("2024-03-01")]
        );
        assert_eq!(date_range(day("2024-01-01"), day("2024-01-01")), vec![day("2024-01-01")]);
    }

    #[test]
    fn axis_spans_disjoint_repositories() {
        let repos = [
            repo("early", &["2021-01-10", "2021-02-01"]),
            repo("late", &["2023-05-01", "2023-06-30"]),
        ];

        let aggregation = aggregate(&repos, day("2026-10-15"));
        assert_eq!(aggregation.date_axis.first().copied(), Some(day("2021-01-10")));
        assert_eq!(aggregation.date_axis.last().copied(), Some(day("2023-06-30")));

        let early = &aggregation.series[0];
        let late = &aggregation.series[1];
        assert_eq!(early.counts.len(), aggregation.date_axis.len());
        assert_eq!(late.counts.len(), aggregation.date_axis.len());
        assert_eq!(early.counts.last().copied(), Some(2));
        assert_eq!(late.counts.first().copied(), Some(0));
        assert_eq!(late.first_star, day("2023-05-01"));
    }

    #[test]
    fn no_data_defaults_to_last_year() {
        let today = day("2026-10-15");
        let aggregation = aggregate(&[repo("empty", &[])], today);

        assert!(aggregation.is_empty());
        assert_eq!(aggregation.date_axis.first().copied(), Some(day("2025-10-15")));
        assert_eq!(aggregation.date_axis.last().copied(), Some(today));
    }

    #[test]
    fn empty_repositories_are_skipped_and_order_kept() {
        let repos = [
            repo("b", &["2023-01-02"]),
            repo("nothing", &[]),
            repo("a", &["2023-01-01", "2023-01-03"]),
        ];

        let aggregation = aggregate(&repos, day("2026-10-15"));
        let names: Vec<&str> = aggregation.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(aggregation.totals(), vec![1, 2, 3]);
    }

    #[test]
    fn serializes_dates_as_plain_days() {
        let aggregation = aggregate(&[repo("engine", &["2023-01-01", "2023-01-02"])], day("2026-10-15"));

        let json = serde_json::to_value(&aggregation).unwrap();
        assert_eq!(json["date_axis"], serde_json::json!(["2023-01-01", "2023-01-02"]));
        assert_eq!(json["series"][0]["name"], "engine");
        assert_eq!(json["series"][0]["first_star"], "2023-01-01");
        assert_eq!(json["series"][0]["counts"], serde_json::json!([1, 2]));
    }
}
