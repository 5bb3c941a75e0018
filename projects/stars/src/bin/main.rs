use std::sync::Arc;

use anyhow::Result;
use interfaces_github_stargazers::index::{BuildClientError, GitHubGraphQLClient};
use projects_stars::{
	app::AppState,
	cache::CacheStore,
	config::{ConfigError, StarsConfig},
	endpoints::router,
	sync::RefreshOptions,
	utils::chart::ChartConfig,
};
use thiserror::Error;
use tracing::info;
use utils_trace::tracing_init;

#[derive(Debug, Error)]
pub enum MainError {
	#[error("Config: {source}")]
	Config {
		#[source]
		source: ConfigError,
	},
	#[error("TracingInit: {source}")]
	TracingInit {
		#[source]
		source: utils_trace::TracingInitError,
	},
	#[error("BuildClient: {source}")]
	BuildClient {
		#[source]
		source: BuildClientError,
	},
	#[error("TcpListenerBind: {source}")]
	TcpListenerBind {
		#[source]
		source: std::io::Error,
	},
	#[error("Serve: {source}")]
	Serve {
		#[source]
		source: std::io::Error,
	}
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
	let config = StarsConfig::from_env()
		.map_err(|source| MainError::Config { source })?;

	tracing_init(&config.log_level)
		.map_err(|source| MainError::TracingInit { source })?;

	let client = GitHubGraphQLClient::new(&config.github_token, &config.graphql_url)
		.map_err(|source| MainError::BuildClient { source })?;

	let options = RefreshOptions {
		top_repos: config.top_repos,
		order: config.order,
	};
	let store = CacheStore::new(&config.cache_dir);
	info!("Caching star dates under {}", store.root().display());

	let state = Arc::new(AppState::new(client, store, options, ChartConfig::default()));
	let app = router(state);

	let listener = tokio::net::TcpListener::bind(config.bind_addr)
		.await
		.map_err(|source| MainError::TcpListenerBind { source })?;

	info!("Server running on addr: {}", config.bind_addr);

	axum::serve(listener, app)
		.await
		.map_err(|source| MainError::Serve { source })?;

	Ok(())
}
