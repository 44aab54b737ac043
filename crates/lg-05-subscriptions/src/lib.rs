//! # LG-05 Subscription Operations
//!
//! Opt-in, opt-out, subscribe, unsubscribe, grant and revoke against a
//! deployed contract. All six share one builder ([`AppCallKind::to_call`])
//! and one submission path; each has its own submit and confirm code.
//!
//! | Call | Submit | Confirm |
//! |------|--------|---------|
//! | opt-in | 205 | 302 |
//! | opt-out | 206 | 303 |
//! | subscribe | 207 | 304 |
//! | unsubscribe | 208 | 305 |
//! | grant | 209 | 306 |
//! | revoke | 210 | 307 |
//!
//! Calls are not deduplicated: subscribing twice yields two confirmed
//! operations with distinct ids.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod domain;
pub mod error;
pub mod service;

pub use domain::AppCallKind;
pub use error::SubscriptionError;
pub use service::SubscriptionOperations;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::domain::AppCallKind;
    pub use crate::error::SubscriptionError;
    pub use crate::service::SubscriptionOperations;
}
