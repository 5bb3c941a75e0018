use serde::Deserialize;

/// Envelope shared by every GraphQL response.
#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

// Query A: top repositories of an organization

#[derive(Debug, Deserialize)]
pub struct OrganizationData {
    pub organization: Option<Organization>,
}

#[derive(Debug, Deserialize)]
pub struct Organization {
    pub repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryConnection {
    pub nodes: Vec<RepositorySummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySummary {
    pub name: String,
    pub stargazer_count: u64,
}

// Query B: one page of stargazers

#[derive(Debug, Deserialize)]
pub struct RepositoryData {
    pub repository: Option<Repository>,
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub stargazers: StargazerConnection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StargazerConnection {
    #[serde(default)]
    pub total_count: Option<u64>,
    pub edges: Vec<StargazerEdge>,
    pub page_info: PageInfo,
}

/// `starred_at` is kept as text; callers parse it so a bad timestamp
/// surfaces as its own error rather than a body decode failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StargazerEdge {
    pub starred_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
}
