//! # LG-04 Contract Deployment
//!
//! Deploys linked contracts: a stateless program whose compiled hash is an
//! address, bound to a stateful application created with that address as its
//! only argument. The external form is `"<stateless-address>@<index>"`.
//!
//! ## Failure Codes
//!
//! | Step | Code |
//! |------|------|
//! | Malformed creator phrase | 10 |
//! | Stateless template missing / compile rejected | 3 / 4 |
//! | Clear program missing / compile rejected | 5 / 7 |
//! | Approval program missing / compile rejected | 6 / 8 |
//! | Create call not submitted | 120 |
//! | Create call not confirmed, or no index reported | 308 |
//!
//! A failure after phase 1 is not compensated: the stateless half is only a
//! compiled hash, and the error names it.
//!
//! ## Usage Example
//!
//! ```ignore
//! use lg_04_contract_deployment::prelude::*;
//!
//! let orchestrator = ContractDeploymentOrchestrator::new(lifecycle, config.contracts.clone());
//! let deployment = orchestrator.deploy(&secret_phrase, None).await?;
//! println!("{}", deployment.contract);
//! ```

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::FsProgramSource;
pub use domain::{
    render_stateless_template, stateful_create_call, DeploymentPhase, LINKED_CONTRACT_SCHEMA,
    RECEIVER_PLACEHOLDER,
};
pub use error::DeploymentError;
pub use ports::ProgramSource;
pub use service::{ContractDeploymentOrchestrator, Deployment};

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::FsProgramSource;
    pub use crate::error::DeploymentError;
    pub use crate::ports::ProgramSource;
    pub use crate::service::{ContractDeploymentOrchestrator, Deployment};
}
