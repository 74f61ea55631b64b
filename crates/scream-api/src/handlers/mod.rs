//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod channels;
pub mod digest;
pub mod health;
pub mod reactions;
pub mod screams;
pub mod users;
