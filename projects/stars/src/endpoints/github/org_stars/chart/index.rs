use axum::{
	extract::{Extension, Query},
	http::{header, StatusCode},
	response::{IntoResponse, Response},
};
use tracing::{info, warn};

use crate::app::SharedState;
use crate::sync::StarSource;
use crate::utils::chart::generate_stacked_area_chart;

use super::super::{validate_org, HandlerError, OrgQuery};

/// Axum handler: GET /github/org_stars/chart?org=<login>
pub async fn handler<S>(
	Extension(state): Extension<SharedState<S>>,
	Query(input): Query<OrgQuery>,
) -> Response
where
	S: StarSource + Send + Sync + 'static,
{
	let org = match validate_org(&input.org) {
		Ok(org) => org,
		Err(err) => return err.into_response(),
	};

	let history = match state.org_star_history(org).await {
		Ok(history) => history,
		Err(source) => return HandlerError::RefreshOrgStars { source }.into_response(),
	};

	for failure in &history.org_stars.failures {
		warn!("{org}/{} left out of the chart: {}", failure.name, failure.message);
	}
	if history.aggregation.is_empty() {
		info!("No star data available to plot for {org}");
	}

	match generate_stacked_area_chart(org, &history.aggregation, state.chart_config()) {
		Ok(svg) => (
			StatusCode::OK,
			[(header::CONTENT_TYPE, "image/svg+xml")],
			svg,
		)
			.into_response(),
		Err(message) => HandlerError::ChartGeneration { message }.into_response(),
	}
}
