//! In-memory store
//!
//! A process-local implementation of every repository trait. All state sits
//! behind one async mutex, so each operation is a serialized, all-or-nothing
//! unit of work just like a database transaction. Used by tests and by the
//! `memory` store backend; nothing survives a restart.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use scream_core::{
    day_bounds, ChannelRef, DomainError, NewPost, Post, PostId, PostRepository, PseudonymousUser,
    ReactionCounts, ReactionEntry, ReactionKind, ReactionRepository, ReactionTransition,
    RepoResult, SoftDeleteOutcome, TopPost, UserAggregate, UserStatsRepository,
};

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    posts: BTreeMap<PostId, Post>,
    by_channel_ref: HashMap<ChannelRef, PostId>,
    // BTreeMap keeps ledger scans ordered by (post, user)
    reactions: BTreeMap<(PostId, PseudonymousUser), ReactionKind>,
    user_stats: HashMap<PseudonymousUser, i64>,
}

/// Mutex-serialized store implementing all repository traits
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override a post's creation instant (fixtures and replays of old data)
    pub async fn backdate(&self, id: PostId, created_at: DateTime<Utc>) -> RepoResult<()> {
        let mut state = self.state.lock().await;
        let post = state
            .posts
            .get_mut(&id)
            .ok_or(DomainError::PostNotFound(id))?;
        post.created_at = created_at;
        Ok(())
    }

    /// Number of stored posts, deleted ones included
    pub async fn len(&self) -> usize {
        self.state.lock().await.posts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    #[instrument(skip(self, post), fields(author = %post.author, channel_ref = %post.channel_ref))]
    async fn create(&self, post: &NewPost) -> RepoResult<PostId> {
        let mut state = self.state.lock().await;

        if state.by_channel_ref.contains_key(&post.channel_ref) {
            return Err(DomainError::DuplicateChannelRef(post.channel_ref));
        }

        state.last_id += 1;
        let id = PostId::new(state.last_id);
        state.posts.insert(
            id,
            Post {
                id,
                author: post.author.clone(),
                text: post.text.clone(),
                counts: ReactionCounts::default(),
                channel_ref: post.channel_ref,
                created_at: Utc::now(),
                is_deleted: false,
            },
        );
        state.by_channel_ref.insert(post.channel_ref, id);
        *state.user_stats.entry(post.author.clone()).or_insert(0) += 1;

        info!(post_id = %id, "Post created");
        Ok(id)
    }

    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>> {
        Ok(self.state.lock().await.posts.get(&id).cloned())
    }

    async fn find_by_channel_ref(&self, channel_ref: ChannelRef) -> RepoResult<Option<Post>> {
        let state = self.state.lock().await;
        Ok(state
            .by_channel_ref
            .get(&channel_ref)
            .and_then(|id| state.posts.get(id))
            .cloned())
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, channel_ref: ChannelRef) -> RepoResult<SoftDeleteOutcome> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let Some(post) = state
            .by_channel_ref
            .get(&channel_ref)
            .and_then(|id| state.posts.get_mut(id))
        else {
            warn!("Soft delete of unknown channel message");
            return Ok(SoftDeleteOutcome::NotFound);
        };

        if post.is_deleted {
            warn!(post_id = %post.id, "Post already deleted");
            return Ok(SoftDeleteOutcome::AlreadyDeleted { post_id: post.id });
        }

        post.is_deleted = true;
        if let Some(count) = state.user_stats.get_mut(&post.author) {
            *count = (*count - 1).max(0);
        }

        info!(post_id = %post.id, "Post soft-deleted");
        Ok(SoftDeleteOutcome::Deleted { post_id: post.id })
    }

    async fn top_of_day(&self, day: NaiveDate) -> RepoResult<Option<TopPost>> {
        let (start, end) = day_bounds(day);
        let state = self.state.lock().await;

        let top = state
            .posts
            .values()
            .filter(|p| !p.is_deleted && p.created_at >= start && p.created_at < end)
            .max_by(|a, b| a.votes().cmp(&b.votes()).then(b.id.cmp(&a.id)));

        Ok(top.map(|post| TopPost {
            post_id: post.id,
            text: post.text.clone(),
            votes: post.votes(),
            channel_ref: post.channel_ref,
        }))
    }

    async fn daily_counts(&self, from: NaiveDate, to: NaiveDate) -> RepoResult<Vec<(NaiveDate, i64)>> {
        let state = self.state.lock().await;

        let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for post in state.posts.values().filter(|p| !p.is_deleted) {
            let day = post.created_at.date_naive();
            if day >= from && day <= to {
                *per_day.entry(day).or_insert(0) += 1;
            }
        }
        Ok(per_day.into_iter().collect())
    }
}

#[async_trait]
impl ReactionRepository for InMemoryStore {
    #[instrument(skip(self))]
    async fn toggle(
        &self,
        post_id: PostId,
        user: &PseudonymousUser,
        kind: ReactionKind,
    ) -> RepoResult<ReactionCounts> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let post = state
            .posts
            .get_mut(&post_id)
            .ok_or(DomainError::PostNotFound(post_id))?;

        let key = (post_id, user.clone());
        let transition = ReactionTransition::resolve(state.reactions.get(&key).copied(), kind);

        match transition.next_state() {
            Some(next) => state.reactions.insert(key, next),
            None => state.reactions.remove(&key),
        };
        post.counts = post.counts.apply(transition.delta());

        debug!(?transition, "Reaction toggled");
        Ok(post.counts)
    }

    async fn find(&self, post_id: PostId, user: &PseudonymousUser) -> RepoResult<Option<ReactionKind>> {
        let state = self.state.lock().await;
        Ok(state.reactions.get(&(post_id, user.clone())).copied())
    }

    async fn find_by_post(&self, post_id: PostId) -> RepoResult<Vec<ReactionEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .reactions
            .iter()
            .filter(|((id, _), _)| *id == post_id)
            .map(|((id, user), kind)| ReactionEntry::new(*id, user.clone(), *kind))
            .collect())
    }

    async fn count_from_ledger(&self, post_id: PostId) -> RepoResult<ReactionCounts> {
        let state = self.state.lock().await;
        Ok(ReactionCounts::tally(
            state
                .reactions
                .iter()
                .filter(|((id, _), _)| *id == post_id)
                .map(|(_, kind)| *kind),
        ))
    }
}

#[async_trait]
impl UserStatsRepository for InMemoryStore {
    async fn find(&self, user: &PseudonymousUser) -> RepoResult<Option<UserAggregate>> {
        let state = self.state.lock().await;
        Ok(state.user_stats.get(user).map(|post_count| UserAggregate {
            user: user.clone(),
            post_count: *post_count,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use ReactionKind::{Clown, Fire, Skull};

    fn user(n: u32) -> PseudonymousUser {
        PseudonymousUser::from_handle(format!("{n:064x}"))
    }

    async fn post(store: &InMemoryStore, author: u32, message_id: i64) -> PostId {
        let new = NewPost::new(user(author), "scream", ChannelRef::new(-1, message_id), 4096).unwrap();
        PostRepository::create(store, &new).await.unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids_and_counts() {
        let store = InMemoryStore::new();
        let a = post(&store, 1, 10).await;
        let b = post(&store, 1, 11).await;
        assert!(a < b);

        let stored = store.find_by_id(a).await.unwrap().unwrap();
        assert_eq!(stored.counts, ReactionCounts::default());
        assert!(!stored.is_deleted);
        assert_eq!(UserStatsRepository::post_count(&store, &user(1)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_channel_ref() {
        let store = InMemoryStore::new();
        post(&store, 1, 10).await;
        let dup = NewPost::new(user(2), "again", ChannelRef::new(-1, 10), 4096).unwrap();
        let err = PostRepository::create(&store, &dup).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateChannelRef(r) if r == ChannelRef::new(-1, 10)));
        // failed create left nothing behind
        assert_eq!(store.len().await, 1);
        assert_eq!(UserStatsRepository::post_count(&store, &user(2)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_toggle_transitions() {
        let store = InMemoryStore::new();
        let id = post(&store, 1, 10).await;
        let u = user(2);

        assert_eq!(store.toggle(id, &u, Fire).await.unwrap(), ReactionCounts::new(0, 1, 0));
        assert_eq!(ReactionRepository::find(&store, id, &u).await.unwrap(), Some(Fire));

        assert_eq!(store.toggle(id, &u, Skull).await.unwrap(), ReactionCounts::new(1, 0, 0));
        assert_eq!(ReactionRepository::find(&store, id, &u).await.unwrap(), Some(Skull));

        assert_eq!(store.toggle(id, &u, Skull).await.unwrap(), ReactionCounts::new(0, 0, 0));
        assert_eq!(ReactionRepository::find(&store, id, &u).await.unwrap(), None);
        assert!(store.find_by_post(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_scenario_from_existing_counts() {
        // A(🔥), B(💀), C(🤡) then A presses 🔥 again and B switches to 🔥
        let store = InMemoryStore::new();
        let id = post(&store, 1, 10).await;

        store.toggle(id, &user(10), Fire).await.unwrap();
        store.toggle(id, &user(11), Skull).await.unwrap();
        store.toggle(id, &user(12), Clown).await.unwrap();

        assert_eq!(store.toggle(id, &user(10), Fire).await.unwrap(), ReactionCounts::new(1, 0, 1));
        assert_eq!(store.toggle(id, &user(11), Fire).await.unwrap(), ReactionCounts::new(0, 1, 1));
        assert_eq!(store.count_from_ledger(id).await.unwrap(), ReactionCounts::new(0, 1, 1));
    }

    #[tokio::test]
    async fn test_toggle_unknown_post() {
        let store = InMemoryStore::new();
        let err = store.toggle(PostId::new(99), &user(1), Fire).await.unwrap_err();
        assert!(matches!(err, DomainError::PostNotFound(id) if id == PostId::new(99)));
        assert!(store.find_by_post(PostId::new(99)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_on_deleted_post_still_moves_counters() {
        let store = InMemoryStore::new();
        let id = post(&store, 1, 10).await;
        store.soft_delete(ChannelRef::new(-1, 10)).await.unwrap();
        assert_eq!(store.toggle(id, &user(2), Clown).await.unwrap(), ReactionCounts::new(0, 0, 1));
    }

    #[tokio::test]
    async fn test_soft_delete_outcomes() {
        let store = InMemoryStore::new();
        let id = post(&store, 7, 10).await;
        post(&store, 7, 11).await;
        let target = ChannelRef::new(-1, 10);

        assert_eq!(
            store.soft_delete(target).await.unwrap(),
            SoftDeleteOutcome::Deleted { post_id: id }
        );
        assert_eq!(UserStatsRepository::post_count(&store, &user(7)).await.unwrap(), 1);

        assert_eq!(
            store.soft_delete(target).await.unwrap(),
            SoftDeleteOutcome::AlreadyDeleted { post_id: id }
        );
        assert_eq!(UserStatsRepository::post_count(&store, &user(7)).await.unwrap(), 1);

        assert_eq!(
            store.soft_delete(ChannelRef::new(-1, 999)).await.unwrap(),
            SoftDeleteOutcome::NotFound
        );
        assert!(store.find_by_id(id).await.unwrap().unwrap().is_deleted);
    }

    #[tokio::test]
    async fn test_top_of_day_ties_and_deleted() {
        let store = InMemoryStore::new();
        let a = post(&store, 1, 1).await;
        let b = post(&store, 1, 2).await;
        let c = post(&store, 1, 3).await;
        let other_day = post(&store, 1, 4).await;
        for id in [a, b, c] {
            store.backdate(id, at(2024, 3, 12, 9)).await.unwrap();
        }
        store.backdate(other_day, at(2024, 3, 13, 0)).await.unwrap();

        // a and b tie at 2 votes, c has 5 but gets deleted, other_day has 9
        for n in 0..2 {
            store.toggle(a, &user(100 + n), Fire).await.unwrap();
            store.toggle(b, &user(100 + n), Skull).await.unwrap();
        }
        for n in 0..5 {
            store.toggle(c, &user(200 + n), Clown).await.unwrap();
        }
        for n in 0..9 {
            store.toggle(other_day, &user(300 + n), Clown).await.unwrap();
        }
        store.soft_delete(ChannelRef::new(-1, 3)).await.unwrap();

        let top = store.top_of_day(date(2024, 3, 12)).await.unwrap().unwrap();
        assert_eq!(top.post_id, a);
        assert_eq!(top.votes, 2);
        assert_eq!(top.channel_ref, ChannelRef::new(-1, 1));

        assert!(store.top_of_day(date(2024, 3, 11)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_daily_counts_window() {
        let store = InMemoryStore::new();
        let mut message_id = 0;
        for (day, n) in [(11, 5), (13, 2), (15, 7), (18, 1)] {
            for _ in 0..n {
                message_id += 1;
                let id = post(&store, 1, message_id).await;
                store.backdate(id, at(2024, 3, day, 23)).await.unwrap();
            }
        }
        // a deleted post on Tuesday is not counted
        message_id += 1;
        let hidden = post(&store, 1, message_id).await;
        store.backdate(hidden, at(2024, 3, 12, 1)).await.unwrap();
        store.soft_delete(ChannelRef::new(-1, message_id)).await.unwrap();

        let rows = store.daily_counts(date(2024, 3, 11), date(2024, 3, 17)).await.unwrap();
        assert_eq!(
            rows,
            vec![(date(2024, 3, 11), 5), (date(2024, 3, 13), 2), (date(2024, 3, 15), 7)]
        );
    }

    #[tokio::test]
    async fn test_random_toggles_keep_counters_consistent() {
        let mut rng = StdRng::seed_from_u64(0x5c4e_a417);
        let store = InMemoryStore::new();
        let posts = [post(&store, 1, 1).await, post(&store, 2, 2).await, post(&store, 3, 3).await];
        let mut model: HashMap<(PostId, u32), ReactionKind> = HashMap::new();

        for _ in 0..500 {
            let post_id = posts[rng.gen_range(0..posts.len())];
            let who = rng.gen_range(0..8u32);
            let kind = ReactionKind::ALL[rng.gen_range(0..3)];

            let counts = store.toggle(post_id, &user(who), kind).await.unwrap();

            let key = (post_id, who);
            match ReactionTransition::resolve(model.get(&key).copied(), kind).next_state() {
                Some(next) => model.insert(key, next),
                None => model.remove(&key),
            };
            let expected = ReactionCounts::tally(
                model.iter().filter(|((p, _), _)| *p == post_id).map(|(_, k)| *k),
            );

            assert_eq!(counts, expected);
            assert_eq!(store.count_from_ledger(post_id).await.unwrap(), counts);
            assert!(counts.skull >= 0 && counts.fire >= 0 && counts.clown >= 0);
        }
    }

    #[tokio::test]
    async fn test_random_create_delete_keeps_post_counts() {
        let mut rng = StdRng::seed_from_u64(42);
        let store = InMemoryStore::new();
        let mut live: HashMap<u32, i64> = HashMap::new();
        let mut published: Vec<(u32, i64, bool)> = Vec::new();

        for message_id in 1..=200i64 {
            if published.is_empty() || rng.gen_bool(0.6) {
                let author = rng.gen_range(0..5u32);
                post(&store, author, message_id).await;
                published.push((author, message_id, false));
                *live.entry(author).or_insert(0) += 1;
            } else {
                let index = rng.gen_range(0..published.len());
                let (author, target, deleted) = published[index];
                let outcome = store.soft_delete(ChannelRef::new(-1, target)).await.unwrap();
                assert_eq!(outcome.changed(), !deleted);
                if !deleted {
                    published[index].2 = true;
                    *live.entry(author).or_insert(0) -= 1;
                }
            }
        }

        for (author, expected) in live {
            assert_eq!(UserStatsRepository::post_count(&store, &user(author)).await.unwrap(), expected);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_toggles_serialize() {
        let store = InMemoryStore::new();
        let id = post(&store, 1, 1).await;

        let handles: Vec<_> = (0..40u32)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move {
                    let who = user(n % 4);
                    let kind = ReactionKind::ALL[(n % 3) as usize];
                    store.toggle(id, &who, kind).await.unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.counts, store.count_from_ledger(id).await.unwrap());
        assert!(stored.counts.total() <= 4);
    }
}
