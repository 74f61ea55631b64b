//! Reaction kinds, per-post counters, and the toggle state machine
//!
//! A (post, user) pair is either `NONE` (no ledger row) or `ACTIVE(kind)`.
//! Pressing a reaction button resolves to exactly one [`ReactionTransition`],
//! which determines both the ledger mutation and the [`CounterDelta`] applied
//! to the post's denormalized counters in the same transaction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// The closed set of reactions a post can receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Skull,
    Fire,
    Clown,
}

impl ReactionKind {
    /// All kinds in display order (skull, fire, clown)
    pub const ALL: [ReactionKind; 3] = [Self::Skull, Self::Fire, Self::Clown];

    /// Stable storage name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Skull => "skull",
            Self::Fire => "fire",
            Self::Clown => "clown",
        }
    }

    /// Emoji shown on the reaction button
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Skull => "💀",
            Self::Fire => "🔥",
            Self::Clown => "🤡",
        }
    }

    /// Parse a kind from either its name or its emoji
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.emoji() == trimmed || kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::InvalidReactionKind(input.to_string()))
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Per-post reaction counters, always in (skull, fire, clown) order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub skull: i64,
    pub fire: i64,
    pub clown: i64,
}

impl ReactionCounts {
    pub const fn new(skull: i64, fire: i64, clown: i64) -> Self {
        Self { skull, fire, clown }
    }

    /// Counter for a single kind
    pub const fn get(&self, kind: ReactionKind) -> i64 {
        match kind {
            ReactionKind::Skull => self.skull,
            ReactionKind::Fire => self.fire,
            ReactionKind::Clown => self.clown,
        }
    }

    /// Sum of all three counters ("votes")
    pub const fn total(&self) -> i64 {
        self.skull + self.fire + self.clown
    }

    /// Counters paired with their kinds, in display order
    pub fn iter(&self) -> impl Iterator<Item = (ReactionKind, i64)> + '_ {
        ReactionKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    /// Apply a delta, returning the new counters
    #[must_use]
    pub const fn apply(self, delta: CounterDelta) -> Self {
        Self {
            skull: self.skull + delta.skull,
            fire: self.fire + delta.fire,
            clown: self.clown + delta.clown,
        }
    }

    /// Tally counters from a list of active ledger kinds
    pub fn tally<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = ReactionKind>,
    {
        kinds.into_iter().fold(Self::default(), |counts, kind| {
            counts.apply(CounterDelta::default().with(kind, 1))
        })
    }
}

/// Signed change to each counter produced by a single transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterDelta {
    pub skull: i64,
    pub fire: i64,
    pub clown: i64,
}

impl CounterDelta {
    /// Add `amount` to the slot for `kind`
    #[must_use]
    pub const fn with(mut self, kind: ReactionKind, amount: i64) -> Self {
        match kind {
            ReactionKind::Skull => self.skull += amount,
            ReactionKind::Fire => self.fire += amount,
            ReactionKind::Clown => self.clown += amount,
        }
        self
    }
}

/// Outcome of resolving a toggle request against the current ledger state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionTransition {
    /// NONE -> ACTIVE(kind): insert ledger row
    Add(ReactionKind),
    /// ACTIVE(kind) -> NONE: delete ledger row
    Remove(ReactionKind),
    /// ACTIVE(from) -> ACTIVE(to): update ledger row in place
    Switch { from: ReactionKind, to: ReactionKind },
}

impl ReactionTransition {
    /// Pick the transition for `requested` given the pair's current reaction
    pub const fn resolve(current: Option<ReactionKind>, requested: ReactionKind) -> Self {
        match current {
            None => Self::Add(requested),
            Some(active) if active as u8 == requested as u8 => Self::Remove(active),
            Some(active) => Self::Switch {
                from: active,
                to: requested,
            },
        }
    }

    /// Ledger state after the transition is applied
    pub const fn next_state(self) -> Option<ReactionKind> {
        match self {
            Self::Add(kind) => Some(kind),
            Self::Remove(_) => None,
            Self::Switch { to, .. } => Some(to),
        }
    }

    /// Counter change that keeps the post consistent with the ledger
    pub const fn delta(self) -> CounterDelta {
        let zero = CounterDelta {
            skull: 0,
            fire: 0,
            clown: 0,
        };
        match self {
            Self::Add(kind) => zero.with(kind, 1),
            Self::Remove(kind) => zero.with(kind, -1),
            Self::Switch { from, to } => zero.with(from, -1).with(to, 1),
        }
    }
}
