//! # Shared Types Crate
//!
//! Types shared by every gateway component.
//!
//! ## Contents
//!
//! - **Entities**: `Address`, `OperationId`, `Round`, `LinkedContract`
//! - **Results**: `OperationResult` and the stable numeric code taxonomy in
//!   [`codes`]
//!
//! ## Design Principles
//!
//! - **One result shape**: every public gateway operation reports exactly one
//!   `OperationResult`. Code 0 is reserved for success.
//! - **One serialization format**: `LinkedContract` renders and parses as
//!   `"<stateless-address>@<stateful-index>"`.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
