pub mod chart;
pub mod read_cumulative;

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde::Deserialize;
use thiserror::Error;

use crate::sync::RefreshOrgStarsError;

/// Query string shared by the org_stars endpoints.
#[derive(Deserialize)]
pub struct OrgQuery {
	pub org: String,
}

#[derive(Debug, Error)]
pub enum HandlerError {
	#[error("InvalidOrganization: {org:?}")]
	InvalidOrganization {
		org: String,
	},
	#[error("RefreshOrgStars: {source}")]
	RefreshOrgStars {
		#[from]
		source: RefreshOrgStarsError,
	},
	#[error("ChartGeneration: {message}")]
	ChartGeneration {
		message: String,
	},
}

impl IntoResponse for HandlerError {
	fn into_response(self) -> Response {
		match self {
			HandlerError::InvalidOrganization{ org } => (StatusCode::BAD_REQUEST, format!("{org:?} is not a GitHub organization login")).into_response(),
			HandlerError::RefreshOrgStars{ source } => (StatusCode::BAD_GATEWAY, format!("Error fetching repositories. Please check your GitHub token and organization name. ({source})")).into_response(),
			HandlerError::ChartGeneration{ message } => (StatusCode::INTERNAL_SERVER_ERROR, format!("Chart generation failed: {message}")).into_response(),
		}
	}
}

/// Returns the trimmed login when it is shaped like a GitHub organization login.
pub fn validate_org(raw: &str) -> Result<&str, HandlerError> {
	let org = raw.trim();
	let valid = !org.is_empty()
		&& org.len() <= 39
		&& !org.starts_with('-')
		&& !org.ends_with('-')
		&& org.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

	if valid {
		Ok(org)
	} else {
		Err(HandlerError::InvalidOrganization { org: raw.to_string() })
	}
}
