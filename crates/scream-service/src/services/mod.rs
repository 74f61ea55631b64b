//! Business logic services
//!
//! Services borrow a [`ServiceContext`] and orchestrate repositories and
//! external capabilities; they hold no state of their own.

pub mod context;
pub mod digest;
pub mod error;
pub mod scream;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use digest::DigestService;
pub use error::{ServiceError, ServiceResult};
pub use scream::ScreamService;
