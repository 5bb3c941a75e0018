use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use interfaces_github_stargazers::index::GitHubGraphQLClient;
use tokio::sync::Mutex;

use crate::cache::CacheStore;
use crate::sync::{refresh_org_stars, OrgStars, RefreshOptions, RefreshOrgStarsError, StarSource, TracingProgress};
use crate::utils::aggregation::{aggregate, StarAggregation};
use crate::utils::chart::ChartConfig;

/// State shared with every endpoint.
pub type SharedState<S = GitHubGraphQLClient> = Arc<AppState<S>>;

/// Everything a request needs to turn an organization name into a chart.
pub struct AppState<S> {
    source: S,
    store: CacheStore,
    options: RefreshOptions,
    chart: ChartConfig,
    // Serializes pipeline runs; the cache assumes a single writer.
    run_lock: Mutex<()>,
}

/// One organization's refreshed records and their aggregation.
#[derive(Debug, Clone)]
pub struct OrgStarHistory {
    pub org_stars: OrgStars,
    pub aggregation: StarAggregation,
}

impl<S: StarSource> AppState<S> {
    pub fn new(source: S, store: CacheStore, options: RefreshOptions, chart: ChartConfig) -> Self {
        Self {
            source,
            store,
            options,
            chart,
            run_lock: Mutex::new(()),
        }
    }

    pub fn chart_config(&self) -> &ChartConfig {
        &self.chart
    }

    pub async fn org_star_history(&self, org: &str) -> Result<OrgStarHistory, RefreshOrgStarsError> {
        self.org_star_history_as_of(org, Utc::now().date_naive()).await
    }

    pub async fn org_star_history_as_of(
        &self,
        org: &str,
        today: NaiveDate,
    ) -> Result<OrgStarHistory, RefreshOrgStarsError> {
        let _guard = self.run_lock.lock().await;

        let mut progress = TracingProgress::default();
        let org_stars =
            refresh_org_stars(&self.source, &self.store, org, &self.options, &mut progress).await?;
        let aggregation = aggregate(&org_stars.repositories, today);

        Ok(OrgStarHistory {
            org_stars,
            aggregation,
        })
    }
}
