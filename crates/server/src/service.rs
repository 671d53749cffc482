//! # Analytics Service
//!
//! This module coordinates the query and similarity engines behind a
//! single async facade:
//! 1. Build both engines once from the shared store
//! 2. Dispatch every operation to the blocking pool: aggregation and
//!    similarity scans are CPU-bound and must not run inline on the
//!    event loop
//! 3. Bound each operation with a request timeout
//! 4. Fold every failure into `ServiceError`
//!
//! A timed-out computation is abandoned, not unwound: the engines only
//! read the immutable store, so there is no state to corrupt.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task;
use tokio::time;
use tracing::{info, instrument};

use data_loader::{DatasetStore, ItemId};
use query_engine::{
    GenreUserReport, GenreYearPlaytime, QueryEngine, RankedItem, SentimentBreakdown,
};
use recommender::{
    ContentRecommendations, ContentRecommender, UserItemMatrix, UserNeighborRecommender,
};

use crate::error::ServiceError;

/// Ranking length for the recommend/not-recommend endpoints
pub const DEFAULT_TOP_K: usize = 3;

/// Result count for content recommendations
pub const DEFAULT_CONTENT_RESULTS: usize = 5;

/// Async facade over the read-only engines
#[derive(Clone)]
pub struct AnalyticsService {
    query: Arc<QueryEngine>,
    neighbors: Arc<UserNeighborRecommender>,
    content: Arc<ContentRecommender>,
    timeout: Duration,
}

impl AnalyticsService {
    /// Build every engine from a loaded store.
    ///
    /// The user-item matrix is constructed here; the content model is
    /// built lazily on its first request.
    pub fn new(store: Arc<DatasetStore>) -> Self {
        let start = Instant::now();
        let query = Arc::new(QueryEngine::new(store.clone()));
        let matrix = Arc::new(UserItemMatrix::from_store(&store));
        let neighbors = Arc::new(UserNeighborRecommender::new(matrix));
        let content = Arc::new(ContentRecommender::new(store));
        info!("Engines ready in {:.2?}", start.elapsed());

        Self {
            query,
            neighbors,
            content,
            timeout: Duration::from_secs(10),
        }
    }

    /// Configure the per-request timeout (default: 10s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run one engine operation on the blocking pool under the deadline
    async fn run<T, F>(&self, op: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    {
        let handle = task::spawn_blocking(op);
        match time::timeout(self.timeout, handle).await {
            Err(_) => Err(ServiceError::Timeout(self.timeout)),
            Ok(Err(join_error)) => Err(ServiceError::Worker(join_error.to_string())),
            Ok(Ok(result)) => result,
        }
    }

    /// Release year with the most accumulated hours for a genre
    #[instrument(skip(self))]
    pub async fn play_time_genre(&self, genre: String) -> Result<GenreYearPlaytime, ServiceError> {
        let engine = Arc::clone(&self.query);
        self.run(move || engine.year_with_most_playtime(&genre).map_err(Into::into))
            .await
    }

    /// Top user for a genre plus its yearly hour totals; `None` when
    /// nothing qualifies
    #[instrument(skip(self))]
    pub async fn user_for_genre(
        &self,
        genre: String,
    ) -> Result<Option<GenreUserReport>, ServiceError> {
        let engine = Arc::clone(&self.query);
        self.run(move || engine.top_user_for_genre(&genre).map_err(Into::into))
            .await
    }

    /// Most recommended games for a review year
    #[instrument(skip(self))]
    pub async fn users_recommend(&self, year: i32) -> Result<Vec<RankedItem>, ServiceError> {
        let engine = Arc::clone(&self.query);
        self.run(move || {
            engine
                .top_recommended_items(year, DEFAULT_TOP_K)
                .map_err(Into::into)
        })
        .await
    }

    /// Least recommended games for a review year
    #[instrument(skip(self))]
    pub async fn users_not_recommend(&self, year: i32) -> Result<Vec<RankedItem>, ServiceError> {
        let engine = Arc::clone(&self.query);
        self.run(move || {
            engine
                .top_not_recommended_items(year, DEFAULT_TOP_K)
                .map_err(Into::into)
        })
        .await
    }

    /// Review counts per sentiment category for a release year
    #[instrument(skip(self))]
    pub async fn sentiment_breakdown(&self, year: i32) -> Result<SentimentBreakdown, ServiceError> {
        let engine = Arc::clone(&self.query);
        self.run(move || engine.sentiment_breakdown(year).map_err(Into::into))
            .await
    }

    /// Games whose text profile reads like the given game's
    #[instrument(skip(self))]
    pub async fn recommend_for_item(
        &self,
        item_id: ItemId,
    ) -> Result<ContentRecommendations, ServiceError> {
        let engine = Arc::clone(&self.content);
        self.run(move || {
            engine
                .recommend(item_id, DEFAULT_CONTENT_RESULTS)
                .map_err(Into::into)
        })
        .await
    }

    /// Games drawn from the libraries of the user's nearest neighbors
    #[instrument(skip(self))]
    pub async fn recommend_for_user(
        &self,
        user_id: String,
    ) -> Result<HashSet<String>, ServiceError> {
        let engine = Arc::clone(&self.neighbors);
        self.run(move || engine.recommend(&user_id).map_err(Into::into))
            .await
    }
}
