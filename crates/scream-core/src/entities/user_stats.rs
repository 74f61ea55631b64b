//! Per-user running post count

use crate::value_objects::PseudonymousUser;

/// Aggregate row keyed by pseudonymous user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAggregate {
    pub user: PseudonymousUser,
    pub post_count: i64,
}
