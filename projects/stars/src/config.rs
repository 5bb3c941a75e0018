use std::net::SocketAddr;
use std::path::PathBuf;

use interfaces_github_stargazers::index::{StarOrder, GITHUB_GRAPHQL_URL};
use thiserror::Error;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct StarsConfig {
	pub github_token: String,
	pub graphql_url: String,
	pub cache_dir: PathBuf,
	pub top_repos: u32,
	pub order: StarOrder,
	pub bind_addr: SocketAddr,
	pub log_level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("GITHUB_TOKEN is not set")]
	MissingToken,

	#[error("STARS_TOP_REPOS must be a number between 1 and 100, got {value:?}")]
	InvalidTopRepos {
		value: String,
	},

	#[error("STARS_ORDER must be `newest-first` or `oldest-first`, got {value:?}")]
	InvalidOrder {
		value: String,
	},

	#[error("STARS_BIND_ADDR is not a socket address: {value:?}")]
	InvalidBindAddr {
		value: String,
		source: std::net::AddrParseError,
	},
}

impl StarsConfig {
	pub fn from_env() -> Result<Self, ConfigError> {
		// A missing .env file is fine.
		dotenvy::dotenv().ok();
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

		let github_token = var("GITHUB_TOKEN").ok_or(ConfigError::MissingToken)?;

		let top_repos = match var("STARS_TOP_REPOS") {
			None => 10,
			Some(value) => value
				.trim()
				.parse::<u32>()
				.ok()
				.filter(|n| (1..=100).contains(n))
				.ok_or(ConfigError::InvalidTopRepos { value })?,
		};

		let order = match var("STARS_ORDER") {
			None => StarOrder::NewestFirst,
			Some(value) => parse_order(&value).ok_or(ConfigError::InvalidOrder { value })?,
		};

		let bind_addr = match var("STARS_BIND_ADDR") {
			None => SocketAddr::from(([0, 0, 0, 0], 8000)),
			Some(value) => value
				.trim()
				.parse()
				.map_err(|source| ConfigError::InvalidBindAddr { value, source })?,
		};

		Ok(Self {
			github_token,
			graphql_url: var("GITHUB_GRAPHQL_URL").unwrap_or_else(|| GITHUB_GRAPHQL_URL.to_string()),
			cache_dir: var("STARS_CACHE_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("cache")),
			top_repos,
			order,
			bind_addr,
			log_level: var("STARS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
		})
	}
}

fn parse_order(value: &str) -> Option<StarOrder> {
	match value.trim().to_ascii_lowercase().as_str() {
		"newest-first" | "desc" => Some(StarOrder::NewestFirst),
		"oldest-first" | "asc" => Some(StarOrder::OldestFirst),
		_ => None,
	}
}
