//! Incremental stargazer fetch-and-cache.

pub mod fetcher;
pub mod pipeline;
pub mod progress;
pub mod source;

pub use fetcher::{fetch_stargazers, FetchStargazersError};
pub use pipeline::{
	refresh_org_stars, OrgStars, RefreshOptions, RefreshOrgStarsError, RefreshRepositoryError,
	RepositoryFailure,
};
pub use progress::{NoProgress, ProgressSink, TracingProgress};
pub use source::StarSource;
