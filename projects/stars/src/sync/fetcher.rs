use chrono::{DateTime, NaiveDate, Utc};
use interfaces_github_stargazers::index::{FetchRepoStargazersError, StarOrder};
use thiserror::Error;
use tracing::debug;

use super::{progress::ProgressSink, source::StarSource};

#[derive(Debug, Error)]
pub enum FetchStargazersError {
	#[error("FetchRepoStargazers: {source}")]
	FetchRepoStargazers {
		#[from]
		source: FetchRepoStargazersError,
	},

	#[error("InvalidTimestamp {text:?}: {source}")]
	InvalidTimestamp {
		text: String,
		source: chrono::ParseError,
	},

	#[error("Stargazers out of order: {current} after {previous}")]
	OutOfOrder {
		previous: DateTime<Utc>,
		current: DateTime<Utc>,
	},
}

/// Pages through the stargazers of `owner/name` and returns their
/// timestamps in ascending order.
///
/// With a `cutoff`, only stars dated strictly after it are returned. In
/// [`StarOrder::NewestFirst`] the walk stops at the first edge on or before
/// the cutoff, so no page past the one holding the cutoff is requested. In
/// [`StarOrder::OldestFirst`] every page is fetched and older edges are
/// dropped. Edges that break the requested order fail the fetch.
pub async fn fetch_stargazers<S, P>(
	source: &S,
	owner: &str,
	name: &str,
	cutoff: Option<NaiveDate>,
	order: StarOrder,
	progress: &mut P,
) -> Result<Vec<DateTime<Utc>>, FetchStargazersError>
where
	S: StarSource,
	P: ProgressSink + ?Sized,
{
	let mut cursor: Option<String> = None;
	let mut previous: Option<DateTime<Utc>> = None;
	let mut seen = 0u64;
	let mut stamps = Vec::new();

	'pages: loop {
		let page = source
			.stargazers_page(owner, name, cursor.as_deref(), order)
			.await?;

		let mut reached_cutoff = false;
		for edge in &page.edges {
			let starred_at = parse_starred_at(&edge.starred_at)?;

			if let Some(previous) = previous {
				let in_order = match order {
					StarOrder::NewestFirst => starred_at <= previous,
					StarOrder::OldestFirst => starred_at >= previous,
				};
				if !in_order {
					return Err(FetchStargazersError::OutOfOrder {
						previous,
						current: starred_at,
					});
				}
			}
			previous = Some(starred_at);

			if cutoff.is_some_and(|cutoff| starred_at.date_naive() <= cutoff) {
				match order {
					StarOrder::NewestFirst => {
						reached_cutoff = true;
						break;
					}
					StarOrder::OldestFirst => continue,
				}
			}

			stamps.push(starred_at);
		}

		seen += page.edges.len() as u64;
		progress.on_progress(seen, page.total_count);

		if reached_cutoff {
			debug!("Reached cutoff for {owner}/{name} after {seen} edges");
			break 'pages;
		}

		match (page.page_info.has_next_page, page.page_info.end_cursor) {
			(true, Some(end_cursor)) => cursor = Some(end_cursor),
			_ => break 'pages,
		}
	}

	if order == StarOrder::NewestFirst {
		stamps.reverse();
	}

	Ok(stamps)
}

/// Parses GitHub's `starredAt`, e.g. `2023-01-03T10:00:00Z`.
pub fn parse_starred_at(text: &str) -> Result<DateTime<Utc>, FetchStargazersError> {
	DateTime::parse_from_rfc3339(text)
		.map(|starred_at| starred_at.with_timezone(&Utc))
		.map_err(|source| FetchStargazersError::InvalidTimestamp {
			text: text.to_string(),
			source,
		})
}
