use axum::{
	extract::{Extension, Json, Query},
	http::StatusCode,
	response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Serialize;

use crate::app::SharedState;
use crate::sync::StarSource;
use crate::sync::RepositoryFailure;
use crate::utils::aggregation::RepositorySeries;

use super::super::{validate_org, HandlerError, OrgQuery};

/// JSON body returned by the endpoint.
#[derive(Serialize)]
pub struct ReadCumulativeResponseBody<'a> {
	org: &'a str,
	no_data: bool,
	date_axis: &'a [NaiveDate],
	series: &'a [RepositorySeries],
	failures: &'a [RepositoryFailure],
}

/// Axum handler: GET /github/org_stars/read_cumulative?org=<login>
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

	let body = ReadCumulativeResponseBody {
		org,
		no_data: history.aggregation.is_empty(),
		date_axis: &history.aggregation.date_axis,
		series: &history.aggregation.series,
		failures: &history.org_stars.failures,
	};

	(StatusCode::OK, Json(body)).into_response()
}
