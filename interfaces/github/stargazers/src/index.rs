use reqwest::{
	header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
	Client,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use reqwest::StatusCode;

use crate::types::{
	GraphQLResponse, OrganizationData, RepositoryData, RepositorySummary, StargazerConnection,
};

pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// GitHub caps connection pages at 100 nodes.
pub const STARGAZERS_PAGE_SIZE: u32 = 100;

const TOP_REPOS_QUERY: &str = r#"
    query getTopRepos($org: String!, $first: Int!) {
        organization(login: $org) {
            repositories(first: $first, orderBy: {field: STARGAZERS, direction: DESC}) {
                nodes {
                    name
                    stargazerCount
                }
            }
        }
    }
"#;

const REPO_STARGAZERS_QUERY: &str = r#"
    query getRepoStargazers($owner: String!, $name: String!, $cursor: String, $direction: OrderDirection!) {
        repository(owner: $owner, name: $name) {
            stargazers(first: 100, after: $cursor, orderBy: {field: STARRED_AT, direction: $direction}) {
                totalCount
                edges {
                    starredAt
                }
                pageInfo {
                    hasNextPage
                    endCursor
                }
            }
        }
    }
"#;

pub struct GitHubGraphQLResult {
	pub body: String,
	pub status: StatusCode,
}

/// Order in which stargazer edges are requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StarOrder {
	#[default]
	NewestFirst,
	OldestFirst,
}

impl StarOrder {
	pub fn direction(self) -> &'static str {
		match self {
			StarOrder::NewestFirst => "DESC",
			StarOrder::OldestFirst => "ASC",
		}
	}
}

/// Authenticated client for the GitHub GraphQL endpoint.
///
/// Token and endpoint are fixed at construction; every query goes through
/// [`GitHubGraphQLClient::post_query`].
#[derive(Debug, Clone)]
pub struct GitHubGraphQLClient {
	http: Client,
	endpoint: String,
}

impl GitHubGraphQLClient {
	pub fn new(token: &str, endpoint: &str) -> Result<Self, BuildClientError> {
		let mut headers = HeaderMap::new();
		let mut authorization = HeaderValue::from_str(&format!("Bearer {token}"))
			.map_err(|source| BuildClientError::InvalidToken { source })?;
		authorization.set_sensitive(true);
		headers.insert(AUTHORIZATION, authorization);
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		headers.insert(USER_AGENT, HeaderValue::from_static("rust-client"));

		let http = Client::builder()
			.default_headers(headers)
			.build()
			.map_err(|source| BuildClientError::Build { source })?;

		Ok(Self {
			http,
			endpoint: endpoint.to_string(),
		})
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	pub async fn post_query(
		&self,
		query: &str,
		variables: serde_json::Value,
	) -> Result<GitHubGraphQLResult, PostQueryError> {
		let payload = serde_json::json!({
			"query": query,
			"variables": variables,
		});

		let response = self
			.http
			.post(&self.endpoint)
			.json(&payload)
			.send()
			.await
			.map_err(|source| PostQueryError::RequestSend { source })?;

		let status = response.status();

		let body = response
			.text()
			.await
			.map_err(|source| PostQueryError::ResponseRead { source })?;

		Ok(GitHubGraphQLResult { body, status })
	}

	/// Query A: the `first` most starred repositories of `org`.
	pub async fn fetch_top_repos(
		&self,
		org: &str,
		first: u32,
	) -> Result<Vec<RepositorySummary>, FetchTopReposError> {
		let variables = serde_json::json!({
			"org": org,
			"first": first,
		});

		let result = self
			.post_query(TOP_REPOS_QUERY, variables)
			.await
			.map_err(|source| FetchTopReposError::PostQuery { source })?;

		parse_top_repos(org, result)
	}

	/// Query B: one page of stargazers, starting after `cursor`.
	pub async fn fetch_repo_stargazers(
		&self,
		owner: &str,
		name: &str,
		cursor: Option<&str>,
		order: StarOrder,
	) -> Result<StargazerConnection, FetchRepoStargazersError> {
		let variables = serde_json::json!({
			"owner": owner,
			"name": name,
			"cursor": cursor,
			"direction": order.direction(),
		});

		let result = self
			.post_query(REPO_STARGAZERS_QUERY, variables)
			.await
			.map_err(|source| FetchRepoStargazersError::PostQuery { source })?;

		parse_repo_stargazers(result)
	}
}

pub fn parse_top_repos(
	org: &str,
	result: GitHubGraphQLResult,
) -> Result<Vec<RepositorySummary>, FetchTopReposError> {
	let GitHubGraphQLResult { body, status } = result;
	if !status.is_success() {
		return Err(FetchTopReposError::UnsuccessfulStatus { status, body });
	}

	let data: OrganizationData = decode_data(&body).map_err(|err| match err {
		DecodeError::Deserialize(source) => FetchTopReposError::DeserializeResponseBody { source },
		DecodeError::GraphQl(messages) => FetchTopReposError::GraphQl { messages },
		DecodeError::NoData => FetchTopReposError::OrganizationFieldMissing { org: org.to_string() },
	})?;

	let organization = data
		.organization
		.ok_or_else(|| FetchTopReposError::OrganizationFieldMissing { org: org.to_string() })?;

	Ok(organization.repositories.nodes)
}

pub fn parse_repo_stargazers(
	result: GitHubGraphQLResult,
) -> Result<StargazerConnection, FetchRepoStargazersError> {
	let GitHubGraphQLResult { body, status } = result;
	if !status.is_success() {
		return Err(FetchRepoStargazersError::UnsuccessfulStatus { status, body });
	}

	let data: RepositoryData = decode_data(&body).map_err(|err| match err {
		DecodeError::Deserialize(source) => {
			FetchRepoStargazersError::DeserializeResponseBody { source }
		}
		DecodeError::GraphQl(messages) => FetchRepoStargazersError::GraphQl { messages },
		DecodeError::NoData => FetchRepoStargazersError::RepositoryFieldMissing,
	})?;

	let stargazers = data
		.repository
		.ok_or(FetchRepoStargazersError::RepositoryFieldMissing)?
		.stargazers;

	if stargazers.page_info.has_next_page && stargazers.page_info.end_cursor.is_none() {
		return Err(FetchRepoStargazersError::PageInfoInvalid);
	}

	Ok(stargazers)
}

enum DecodeError {
	Deserialize(serde_json::Error),
	GraphQl(String),
	NoData,
}

fn decode_data<T: DeserializeOwned>(body: &str) -> Result<T, DecodeError> {
	let parsed: GraphQLResponse<T> = serde_json::from_str(body).map_err(DecodeError::Deserialize)?;

	if !parsed.errors.is_empty() {
		let messages = parsed
			.errors
			.iter()
			.map(|error| error.message.as_str())
			.collect::<Vec<_>>()
			.join("; ");
		return Err(DecodeError::GraphQl(messages));
	}

	parsed.data.ok_or(DecodeError::NoData)
}

#[derive(Debug, Error)]
pub enum BuildClientError {
	#[error("InvalidToken: {source}")]
	InvalidToken {
		source: InvalidHeaderValue,
	},

	#[error("Build: {source}")]
	Build {
		source: reqwest::Error,
	},
}

#[derive(Debug, Error)]
pub enum PostQueryError {
	#[error("RequestSend: {source}")]
	RequestSend {
		source: reqwest::Error,
	},

	#[error("ResponseRead: {source}")]
	ResponseRead {
		source: reqwest::Error,
	},
}

#[derive(Debug, Error)]
pub enum FetchTopReposError {
	#[error("PostQuery: {source}")]
	PostQuery {
		source: PostQueryError,
	},

	#[error("GitHub answered {status}: {body}")]
	UnsuccessfulStatus {
		status: StatusCode,
		body: String,
	},

	#[error("DeserializeResponseBody: {source}")]
	DeserializeResponseBody {
		source: serde_json::Error,
	},

	#[error("GraphQL errors: {messages}")]
	GraphQl {
		messages: String,
	},

	#[error("Organization {org} not found in GraphQL response")]
	OrganizationFieldMissing {
		org: String,
	},
}

#[derive(Debug, Error)]
pub enum FetchRepoStargazersError {
	#[error("PostQuery: {source}")]
	PostQuery {
		source: PostQueryError,
	},

	#[error("GitHub answered {status}: {body}")]
	UnsuccessfulStatus {
		status: StatusCode,
		body: String,
	},

	#[error("DeserializeResponseBody: {source}")]
	DeserializeResponseBody {
		source: serde_json::Error,
	},

	#[error("GraphQL errors: {messages}")]
	GraphQl {
		messages: String,
	},

	#[error("Missing or malformed repository field in GraphQL response")]
	RepositoryFieldMissing,

	#[error("Missing or malformed pageInfo in GraphQL response")]
	PageInfoInvalid,
}
