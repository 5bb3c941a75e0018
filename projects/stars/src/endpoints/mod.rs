pub mod form;
pub mod github;

use axum::{routing::get, Extension, Router};

use crate::app::SharedState;
use crate::sync::StarSource;

pub fn router<S>(state: SharedState<S>) -> Router
where
	S: StarSource + Send + Sync + 'static,
{
	Router::new()
		.route("/", get(form::index::handler))
		.route("/github/org_stars/chart", get(github::org_stars::chart::index::handler::<S>))
		.route(
			"/github/org_stars/read_cumulative",
			get(github::org_stars::read_cumulative::index::handler::<S>),
		)
		.layer(Extension(state))
}
