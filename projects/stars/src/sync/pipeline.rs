use chrono::NaiveDate;
use interfaces_github_stargazers::{
	index::{FetchTopReposError, StarOrder},
	types::RepositorySummary,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::cache::{
	store::latest, CacheKey, CacheStore, InvalidCacheKeyError, LoadStarDatesError,
	SaveStarDatesError,
};
use crate::utils::aggregation::RepositoryStars;

use super::{
	fetcher::{fetch_stargazers, FetchStargazersError},
	progress::ProgressSink,
	source::StarSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOptions {
	/// How many of the organization's most starred repositories to track.
	pub top_repos: u32,
	pub order: StarOrder,
}

impl Default for RefreshOptions {
	fn default() -> Self {
		Self {
			top_repos: 10,
			order: StarOrder::NewestFirst,
		}
	}
}

/// A repository that could not be refreshed, with the reason shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryFailure {
	pub name: String,
	pub message: String,
}

/// Outcome of refreshing one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgStars {
	pub org: String,
	/// In the API's descending star-count order.
	pub repositories: Vec<RepositoryStars>,
	pub failures: Vec<RepositoryFailure>,
}

#[derive(Debug, Error)]
pub enum RefreshOrgStarsError {
	#[error("FetchTopRepos {org}: {source}")]
	FetchTopRepos {
		org: String,
		source: FetchTopReposError,
	},
}

#[derive(Debug, Error)]
pub enum RefreshRepositoryError {
	#[error("InvalidCacheKey: {source}")]
	InvalidCacheKey {
		#[from]
		source: InvalidCacheKeyError,
	},

	#[error("LoadCache: {source}")]
	LoadCache {
		#[from]
		source: LoadStarDatesError,
	},

	#[error("FetchStargazers: {source}")]
	FetchStargazers {
		#[from]
		source: FetchStargazersError,
	},

	#[error("SaveCache: {source}")]
	SaveCache {
		#[from]
		source: SaveStarDatesError,
	},
}

/// Brings the cache up to date for the top repositories of `org` and
/// returns every repository's star dates.
///
/// Repositories are handled one after another. Each one is loaded from the
/// cache, topped up with stars newer than its latest cached date, and written
/// back in full. A failing repository is logged, recorded in
/// [`OrgStars::failures`] and skipped; a failing repository list aborts the
/// whole run.
pub async fn refresh_org_stars<S, P>(
	source: &S,
	store: &CacheStore,
	org: &str,
	options: &RefreshOptions,
	progress: &mut P,
) -> Result<OrgStars, RefreshOrgStarsError>
where
	S: StarSource,
	P: ProgressSink + ?Sized,
{
	let repos = source
		.top_repos(org, options.top_repos)
		.await
		.map_err(|source| RefreshOrgStarsError::FetchTopRepos {
			org: org.to_string(),
			source,
		})?;

	info!("Refreshing {} repositories of {org}", repos.len());

	let mut org_stars = OrgStars {
		org: org.to_string(),
		repositories: Vec::with_capacity(repos.len()),
		failures: Vec::new(),
	};

	for repo in repos {
		let outcome = refresh_repository(source, store, org, &repo, options.order, progress).await;

		if let Some(err) = outcome.error {
			error!("Could not refresh {org}/{}: {err}", repo.name);
			org_stars.failures.push(RepositoryFailure {
				name: repo.name.clone(),
				message: err.to_string(),
			});
		}

		if let Some(dates) = outcome.dates {
			org_stars.repositories.push(RepositoryStars {
				name: repo.name,
				stargazer_count: repo.stargazer_count,
				dates,
			});
		}
	}

	Ok(org_stars)
}

struct RepositoryOutcome {
	/// Best known dates, `None` when nothing usable could be read.
	dates: Option<Vec<NaiveDate>>,
	error: Option<RefreshRepositoryError>,
}

fn load_cached(
	store: &CacheStore,
	org: &str,
	name: &str,
) -> Result<(CacheKey, Vec<NaiveDate>), RefreshRepositoryError> {
	let key = CacheKey::new(org, name)?;
	let dates = store.load(&key)?;
	Ok((key, dates))
}

async fn refresh_repository<S, P>(
	source: &S,
	store: &CacheStore,
	org: &str,
	repo: &RepositorySummary,
	order: StarOrder,
	progress: &mut P,
) -> RepositoryOutcome
where
	S: StarSource,
	P: ProgressSink + ?Sized,
{
	let (key, mut dates) = match load_cached(store, org, &repo.name) {
		Ok(loaded) => loaded,
		Err(err) => {
			return RepositoryOutcome {
				dates: None,
				error: Some(err),
			}
		}
	};
	let cutoff = latest(&dates);

	progress.on_repository_start(org, &repo.name);
	info!(
		"Fetching stargazers for {org}/{} (cached {}, cutoff {:?})",
		repo.name,
		dates.len(),
		cutoff
	);

	let fresh = match fetch_stargazers(source, org, &repo.name, cutoff, order, progress).await {
		Ok(fresh) => fresh,
		Err(err) => {
			return RepositoryOutcome {
				dates: Some(dates),
				error: Some(RefreshRepositoryError::FetchStargazers { source: err }),
			}
		}
	};

	let new_stars = fresh.len();
	dates.extend(fresh.iter().map(|starred_at| starred_at.date_naive()));
	dates.sort();

	let error = store
		.save(&key, &dates)
		.err()
		.map(|source| RefreshRepositoryError::SaveCache { source });

	progress.on_repository_done(org, &repo.name, new_stars);

	RepositoryOutcome {
		dates: Some(dates),
		error,
	}
}
