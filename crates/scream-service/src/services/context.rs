//! Service context - dependency container for services
//!
//! Holds the storage ports, the identity hasher, admin list, and the
//! external capabilities (image renderer, channel publisher).

use std::collections::HashSet;
use std::sync::Arc;

use scream_common::{AppConfig, IdentityHasher};
use scream_core::{PostRepository, ReactionRepository, UserStatsRepository};
use scream_db::{
    InMemoryStore, PgPool, PgPostRepository, PgReactionRepository, PgUserStatsRepository,
};

use super::error::{ServiceError, ServiceResult};
use crate::channel::ChannelPublisher;
use crate::render::{DisabledRenderer, ImageRenderer};

/// Default post length cap, the chat platform's message limit
pub const DEFAULT_MAX_POST_LENGTH: usize = 4096;

/// Service context containing all dependencies
///
/// Cheap to clone; every dependency sits behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Present only on the postgres backend, for readiness checks
    pool: Option<PgPool>,

    // Repositories
    post_repo: Arc<dyn PostRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,
    user_stats_repo: Arc<dyn UserStatsRepository>,

    hasher: IdentityHasher,
    admins: Arc<HashSet<i64>>,
    max_post_length: usize,

    // Capabilities
    renderer: Arc<dyn ImageRenderer>,
    channel: Arc<dyn ChannelPublisher>,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Database Pool ===

    /// PostgreSQL pool, if the context runs on the postgres backend
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Round-trip to storage. Always succeeds on the in-memory backend.
    pub async fn check_storage(&self) -> ServiceResult<()> {
        match &self.pool {
            Some(pool) => scream_db::ping(pool)
                .await
                .map_err(|e| ServiceError::internal(format!("storage ping failed: {e}"))),
            None => Ok(()),
        }
    }

    // === Repositories ===

    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    pub fn user_stats_repo(&self) -> &dyn UserStatsRepository {
        self.user_stats_repo.as_ref()
    }

    // === Identity and policy ===

    pub fn hasher(&self) -> &IdentityHasher {
        &self.hasher
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admins.contains(&user_id)
    }

    pub fn max_post_length(&self) -> usize {
        self.max_post_length
    }

    // === Capabilities ===

    pub fn renderer(&self) -> &dyn ImageRenderer {
        self.renderer.as_ref()
    }

    pub fn channel(&self) -> &dyn ChannelPublisher {
        self.channel.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("repositories", &"...")
            .field("admins", &self.admins.len())
            .field("max_post_length", &self.max_post_length)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    post_repo: Option<Arc<dyn PostRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    user_stats_repo: Option<Arc<dyn UserStatsRepository>>,
    hasher: Option<IdentityHasher>,
    admins: HashSet<i64>,
    max_post_length: usize,
    renderer: Option<Arc<dyn ImageRenderer>>,
    channel: Option<Arc<dyn ChannelPublisher>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            post_repo: None,
            reaction_repo: None,
            user_stats_repo: None,
            hasher: None,
            admins: HashSet::new(),
            max_post_length: DEFAULT_MAX_POST_LENGTH,
            renderer: None,
            channel: None,
        }
    }

    /// Hasher, admin list, and length cap from application config
    pub fn config(self, config: &AppConfig) -> Self {
        self.hasher(IdentityHasher::new(config.security.hash_salt.clone()))
            .admins(config.security.admins.iter().copied())
            .max_post_length(config.post.max_length)
    }

    /// Back every repository with PostgreSQL
    pub fn pool(mut self, pool: PgPool) -> Self {
        self.post_repo = Some(Arc::new(PgPostRepository::new(pool.clone())));
        self.reaction_repo = Some(Arc::new(PgReactionRepository::new(pool.clone())));
        self.user_stats_repo = Some(Arc::new(PgUserStatsRepository::new(pool.clone())));
        self.pool = Some(pool);
        self
    }

    /// Back every repository with one in-memory store
    pub fn store(mut self, store: InMemoryStore) -> Self {
        self.post_repo = Some(Arc::new(store.clone()));
        self.reaction_repo = Some(Arc::new(store.clone()));
        self.user_stats_repo = Some(Arc::new(store));
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn user_stats_repo(mut self, repo: Arc<dyn UserStatsRepository>) -> Self {
        self.user_stats_repo = Some(repo);
        self
    }

    pub fn hasher(mut self, hasher: IdentityHasher) -> Self {
        self.hasher = Some(hasher);
        self
    }

    pub fn admins(mut self, admins: impl IntoIterator<Item = i64>) -> Self {
        self.admins = admins.into_iter().collect();
        self
    }

    pub fn max_post_length(mut self, max: usize) -> Self {
        self.max_post_length = max;
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn ImageRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn channel(mut self, channel: Arc<dyn ChannelPublisher>) -> Self {
        self.channel = Some(channel);
        self
    }

    /// Build the ServiceContext
    ///
    /// The renderer defaults to [`DisabledRenderer`].
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        if self.max_post_length == 0 {
            return Err(ServiceError::validation("max_post_length must be positive"));
        }

        Ok(ServiceContext {
            pool: self.pool,
            post_repo: self
                .post_repo
                .ok_or_else(|| ServiceError::validation("post_repo is required"))?,
            reaction_repo: self
                .reaction_repo
                .ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            user_stats_repo: self
                .user_stats_repo
                .ok_or_else(|| ServiceError::validation("user_stats_repo is required"))?,
            hasher: self
                .hasher
                .ok_or_else(|| ServiceError::validation("hasher is required"))?,
            admins: Arc::new(self.admins),
            max_post_length: self.max_post_length,
            renderer: self.renderer.unwrap_or_else(|| Arc::new(DisabledRenderer)),
            channel: self
                .channel
                .ok_or_else(|| ServiceError::validation("channel is required"))?,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
