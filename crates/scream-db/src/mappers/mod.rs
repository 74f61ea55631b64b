//! Model to entity mappers
//!
//! Converts database rows (models) into `scream-core` entities. Rows that
//! violate a domain invariant (unknown reaction kind) surface as
//! `DomainError::DatabaseError`.

mod post;
mod reaction;

pub use reaction::kind_from_column;
