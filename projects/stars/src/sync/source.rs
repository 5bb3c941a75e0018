use std::future::Future;

use interfaces_github_stargazers::{
	index::{FetchRepoStargazersError, FetchTopReposError, GitHubGraphQLClient, StarOrder},
	types::{RepositorySummary, StargazerConnection},
};

/// Where repository lists and stargazer pages come from.
///
/// Implemented by the GraphQL client; tests substitute an in-memory source.
pub trait StarSource {
	fn top_repos(
		&self,
		org: &str,
		first: u32,
	) -> impl Future<Output = Result<Vec<RepositorySummary>, FetchTopReposError>> + Send;

	fn stargazers_page(
		&self,
		owner: &str,
		name: &str,
		cursor: Option<&str>,
		order: StarOrder,
	) -> impl Future<Output = Result<StargazerConnection, FetchRepoStargazersError>> + Send;
}

impl StarSource for GitHubGraphQLClient {
	async fn top_repos(
		&self,
		org: &str,
		first: u32,
	) -> Result<Vec<RepositorySummary>, FetchTopReposError> {
		self.fetch_top_repos(org, first).await
	}

	async fn stargazers_page(
		&self,
		owner: &str,
		name: &str,
		cursor: Option<&str>,
		order: StarOrder,
	) -> Result<StargazerConnection, FetchRepoStargazersError> {
		self.fetch_repo_stargazers(owner, name, cursor, order).await
	}
}
