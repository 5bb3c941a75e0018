#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use interfaces_github_stargazers::{
	index::{FetchRepoStargazersError, FetchTopReposError, StarOrder, StatusCode, STARGAZERS_PAGE_SIZE},
	types::{PageInfo, RepositorySummary, StargazerConnection, StargazerEdge},
};
use projects_stars::sync::StarSource;

/// In-memory stand-in for the GitHub GraphQL API.
///
/// Stars are kept oldest first; cursors are offsets into the ordered list.
#[derive(Default)]
pub struct FakeGitHub {
	repos: Vec<RepositorySummary>,
	stars: HashMap<String, Vec<String>>,
	failing: HashSet<String>,
	top_repos_status: Option<StatusCode>,
	page_size: usize,
	pub page_requests: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeGitHub {
	pub fn new() -> Self {
		Self {
			page_size: STARGAZERS_PAGE_SIZE as usize,
			..Self::default()
		}
	}

	pub fn with_page_size(mut self, page_size: usize) -> Self {
		self.page_size = page_size;
		self
	}

	/// Adds a repository whose stargazers starred at `timestamps` (RFC 3339, ascending).
	pub fn with_repo(mut self, name: &str, timestamps: Vec<String>) -> Self {
		self.repos.push(RepositorySummary {
			name: name.to_string(),
			stargazer_count: timestamps.len() as u64,
		});
		self.stars.insert(name.to_string(), timestamps);
		self
	}

	pub fn push_stars(&mut self, name: &str, timestamps: Vec<String>) {
		let stars = self.stars.entry(name.to_string()).or_default();
		stars.extend(timestamps);
		if let Some(repo) = self.repos.iter_mut().find(|repo| repo.name == name) {
			repo.stargazer_count = stars.len() as u64;
		}
	}

	pub fn failing_repo(mut self, name: &str) -> Self {
		self.failing.insert(name.to_string());
		self
	}

	pub fn failing_top_repos(mut self, status: StatusCode) -> Self {
		self.top_repos_status = Some(status);
		self
	}

	pub fn requests_for(&self, name: &str) -> usize {
		self.page_requests
			.lock()
			.unwrap()
			.iter()
			.filter(|(repo, _)| repo == name)
			.count()
	}

	pub fn reset_requests(&self) {
		self.page_requests.lock().unwrap().clear();
	}
}

impl StarSource for FakeGitHub {
	async fn top_repos(
		&self,
		_org: &str,
		first: u32,
	) -> Result<Vec<RepositorySummary>, FetchTopReposError> {
		if let Some(status) = self.top_repos_status {
			return Err(FetchTopReposError::UnsuccessfulStatus {
				status,
				body: "Bad credentials".to_string(),
			});
		}
		Ok(self.repos.iter().take(first as usize).cloned().collect())
	}

	async fn stargazers_page(
		&self,
		_owner: &str,
		name: &str,
		cursor: Option<&str>,
		order: StarOrder,
	) -> Result<StargazerConnection, FetchRepoStargazersError> {
		self.page_requests
			.lock()
			.unwrap()
			.push((name.to_string(), cursor.map(str::to_string)));

		if self.failing.contains(name) {
			return Err(FetchRepoStargazersError::UnsuccessfulStatus {
				status: StatusCode::BAD_GATEWAY,
				body: "upstream unavailable".to_string(),
			});
		}

		let mut ordered = self.stars.get(name).cloned().unwrap_or_default();
		if order == StarOrder::NewestFirst {
			ordered.reverse();
		}

		let start = cursor.map(|c| c.parse::<usize>().unwrap()).unwrap_or(0);
		let end = (start + self.page_size).min(ordered.len());
		let has_next_page = end < ordered.len();

		Ok(StargazerConnection {
			total_count: Some(ordered.len() as u64),
			edges: ordered[start..end]
				.iter()
				.map(|starred_at| StargazerEdge {
					starred_at: starred_at.clone(),
				})
				.collect(),
			page_info: PageInfo {
				end_cursor: Some(end.to_string()),
				has_next_page,
			},
		})
	}
}

pub fn day(s: &str) -> NaiveDate {
	NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// `count` timestamps, one every `step_hours`, starting at `start` 00:00 UTC.
pub fn hourly_stars(start: &str, count: usize, step_hours: i64) -> Vec<String> {
	let start = Utc.from_utc_datetime(&day(start).and_hms_opt(0, 0, 0).unwrap());
	(0..count)
		.map(|i| {
			(start + Duration::hours(step_hours * i as i64))
				.format("%Y-%m-%dT%H:%M:%SZ")
				.to_string()
		})
		.collect()
}
