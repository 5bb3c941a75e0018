mod support;

use std::fs;

use interfaces_github_stargazers::index::StatusCode;
use projects_stars::{
	app::AppState,
	cache::{CacheKey, CacheStore},
	sync::{refresh_org_stars, NoProgress, RefreshOptions, RefreshOrgStarsError},
	utils::chart::ChartConfig,
};
use tempfile::TempDir;

use support::{day, hourly_stars, FakeGitHub};

fn org_fixture() -> FakeGitHub {
	FakeGitHub::new()
		.with_repo("engine", hourly_stars("2023-01-01", 230, 12))
		.with_repo("docs", hourly_stars("2023-03-01", 40, 24))
		.with_repo("quiet", Vec::new())
}

fn cache_text(store: &CacheStore, repo: &str) -> String {
	let key = CacheKey::new("acme", repo).unwrap();
	fs::read_to_string(store.path_for(&key)).unwrap()
}

#[tokio::test]
async fn first_run_fetches_and_caches_every_repository() {
	let temp_dir = TempDir::new().unwrap();
	let store = CacheStore::new(temp_dir.path());
	let github = org_fixture();

	let org_stars = refresh_org_stars(&github, &store, "acme", &RefreshOptions::default(), &mut NoProgress)
		.await
		.unwrap();

	let names: Vec<&str> = org_stars.repositories.iter().map(|r| r.name.as_str()).collect();
	assert_eq!(names, vec!["engine", "docs", "quiet"]);
	assert!(org_stars.failures.is_empty());

	let engine = &org_stars.repositories[0];
	assert_eq!(engine.dates.len(), 230);
	assert_eq!(engine.dates.first().copied(), Some(day("2023-01-01")));
	assert!(engine.dates.windows(2).all(|pair| pair[0] <= pair[1]));

	let docs_cache = cache_text(&store, "docs");
	assert_eq!(docs_cache.lines().count(), 40);
	assert!(docs_cache.starts_with("2023-03-01\n2023-03-02\n"));
	assert_eq!(cache_text(&store, "quiet"), "");
}

#[tokio::test]
async fn second_run_is_idempotent_and_stops_on_first_page() {
	let temp_dir = TempDir::new().unwrap();
	let store = CacheStore::new(temp_dir.path());
	let github = org_fixture();
	let options = RefreshOptions::default();

	let first = refresh_org_stars(&github, &store, "acme", &options, &mut NoProgress)
		.await
		.unwrap();
	let engine_after_first = cache_text(&store, "engine");
	let docs_after_first = cache_text(&store, "docs");

	github.reset_requests();
	let second = refresh_org_stars(&github, &store, "acme", &options, &mut NoProgress)
		.await
		.unwrap();

	assert_eq!(first, second);
	assert_eq!(cache_text(&store, "engine"), engine_after_first);
	assert_eq!(cache_text(&store, "docs"), docs_after_first);
	assert_eq!(github.requests_for("engine"), 1);
	assert_eq!(github.requests_for("docs"), 1);
}

#[tokio::test]
async fn refresh_appends_only_new_stars() {
	let temp_dir = TempDir::new().unwrap();
	let store = CacheStore::new(temp_dir.path());
	let mut github = org_fixture();
	let options = RefreshOptions::default();

	refresh_org_stars(&github, &store, "acme", &options, &mut NoProgress)
		.await
		.unwrap();

	github.push_stars("docs", hourly_stars("2023-05-01", 3, 24));
	github.reset_requests();

	let org_stars = refresh_org_stars(&github, &store, "acme", &options, &mut NoProgress)
		.await
		.unwrap();

	let docs = org_stars.repositories.iter().find(|r| r.name == "docs").unwrap();
	assert_eq!(docs.dates.len(), 43);
	assert_eq!(
		&docs.dates[40..],
		&[day("2023-05-01"), day("2023-05-02"), day("2023-05-03")]
	);
	assert!(cache_text(&store, "docs").ends_with("2023-04-09\n2023-05-01\n2023-05-02\n2023-05-03\n"));
	assert_eq!(github.requests_for("docs"), 1);
}

#[tokio::test]
async fn failing_repository_keeps_cache_and_others_continue() {
	let temp_dir = TempDir::new().unwrap();
	let store = CacheStore::new(temp_dir.path());
	let cached = [day("2022-12-01"), day("2022-12-02")];
	store.save(&CacheKey::new("acme", "engine").unwrap(), &cached).unwrap();

	let github = org_fixture().failing_repo("engine");
	let org_stars = refresh_org_stars(&github, &store, "acme", &RefreshOptions::default(), &mut NoProgress)
		.await
		.unwrap();

	assert_eq!(org_stars.failures.len(), 1);
	assert_eq!(org_stars.failures[0].name, "engine");
	assert!(org_stars.failures[0].message.contains("502"));

	let engine = org_stars.repositories.iter().find(|r| r.name == "engine").unwrap();
	assert_eq!(engine.dates, cached.to_vec());
	assert_eq!(cache_text(&store, "engine"), "2022-12-01\n2022-12-02\n");

	let docs = org_stars.repositories.iter().find(|r| r.name == "docs").unwrap();
	assert_eq!(docs.dates.len(), 40);
}

#[tokio::test]
async fn malformed_cache_skips_repository_without_fetching() {
	let temp_dir = TempDir::new().unwrap();
	let store = CacheStore::new(temp_dir.path());
	let key = CacheKey::new("acme", "docs").unwrap();
	fs::write(store.path_for(&key), "2023-03-01\nnot-a-date\n").unwrap();

	let github = org_fixture();
	let org_stars = refresh_org_stars(&github, &store, "acme", &RefreshOptions::default(), &mut NoProgress)
		.await
		.unwrap();

	assert!(org_stars.repositories.iter().all(|r| r.name != "docs"));
	assert_eq!(org_stars.failures.len(), 1);
	assert!(org_stars.failures[0].message.contains("not-a-date"));
	assert_eq!(github.requests_for("docs"), 0);
	assert_eq!(fs::read_to_string(store.path_for(&key)).unwrap(), "2023-03-01\nnot-a-date\n");
}

#[tokio::test]
async fn repository_list_failure_aborts_the_run() {
	let temp_dir = TempDir::new().unwrap();
	let store = CacheStore::new(temp_dir.path());
	let github = org_fixture().failing_top_repos(StatusCode::UNAUTHORIZED);

	let result = refresh_org_stars(&github, &store, "acme", &RefreshOptions::default(), &mut NoProgress).await;

	assert!(matches!(result, Err(RefreshOrgStarsError::FetchTopRepos { .. })));
	assert_eq!(github.requests_for("engine"), 0);
}

#[tokio::test]
async fn top_repos_limit_is_honoured() {
	let temp_dir = TempDir::new().unwrap();
	let store = CacheStore::new(temp_dir.path());
	let github = org_fixture();
	let options = RefreshOptions {
		top_repos: 2,
		..RefreshOptions::default()
	};

	let org_stars = refresh_org_stars(&github, &store, "acme", &options, &mut NoProgress)
		.await
		.unwrap();

	assert_eq!(org_stars.repositories.len(), 2);
	assert_eq!(github.requests_for("quiet"), 0);
}

#[tokio::test]
async fn app_state_aligns_repositories_on_one_axis() {
	let temp_dir = TempDir::new().unwrap();
	let state = AppState::new(
		org_fixture(),
		CacheStore::new(temp_dir.path()),
		RefreshOptions::default(),
		ChartConfig::default(),
	);

	let history = state
		.org_star_history_as_of("acme", day("2026-10-15"))
		.await
		.unwrap();
	let aggregation = &history.aggregation;

	// engine: 2 a day from 2023-01-01 to 2023-04-25; docs: 1 a day from 2023-03-01 to 2023-04-09.
	assert_eq!(aggregation.date_axis.first().copied(), Some(day("2023-01-01")));
	assert_eq!(aggregation.date_axis.last().copied(), Some(day("2023-04-25")));

	let names: Vec<&str> = aggregation.series.iter().map(|s| s.name.as_str()).collect();
	assert_eq!(names, vec!["engine", "docs"]);
	assert_eq!(aggregation.totals().last().copied(), Some(270));
}

#[tokio::test]
async fn app_state_reports_no_data_for_starless_org() {
	let temp_dir = TempDir::new().unwrap();
	let state = AppState::new(
		FakeGitHub::new().with_repo("quiet", Vec::new()),
		CacheStore::new(temp_dir.path()),
		RefreshOptions::default(),
		ChartConfig::default(),
	);

	let history = state
		.org_star_history_as_of("acme", day("2026-10-15"))
		.await
		.unwrap();

	assert!(history.aggregation.is_empty());
	assert_eq!(history.aggregation.date_axis.first().copied(), Some(day("2025-10-15")));
	assert_eq!(history.aggregation.date_axis.last().copied(), Some(day("2026-10-15")));
}
