//! # Contract Deployment Service
//!
//! Two-phase deployment of a linked contract:
//!
//! ```text
//! Phase 1 (stateless)          Phase 2 (stateful)
//! ───────────────────          ──────────────────
//! read template      (3)       read + compile clear     (5, 7)
//! render creator              read + compile approval  (6, 8)
//! compile            (4)       create call, submit      (120)
//! hash = address               confirm, read index      (308)
//! ```
//!
//! Phase 1 only compiles, so nothing exists on the ledger if it fails. A
//! phase-2 failure leaves the stateless address behind; it is logged and
//! named in the error, never cleaned up.

use std::path::{Path, PathBuf};

use lg_01_connection::ContractPaths;
use lg_02_key_gateway::SigningIdentity;
use lg_03_tx_lifecycle::{
    CancellationSignal, FailurePhase, LedgerClient, TransactionKind, TransactionLifecycleManager,
};
use shared_types::{Address, ErrorCode, LinkedContract, OperationId};
use tracing::{info, instrument, warn};

use crate::adapters::FsProgramSource;
use crate::domain::{render_stateless_template, stateful_create_call};
use crate::error::DeploymentError;
use crate::ports::ProgramSource;

/// A deployed linked contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    /// Both halves of the contract.
    pub contract: LinkedContract,
    /// Id of the stateful create call.
    pub operation_id: OperationId,
}

/// Deploys linked contracts from the configured program sources.
pub struct ContractDeploymentOrchestrator<L: LedgerClient, S: ProgramSource = FsProgramSource> {
    lifecycle: TransactionLifecycleManager<L>,
    paths: ContractPaths,
    source: S,
}

impl<L: LedgerClient> ContractDeploymentOrchestrator<L> {
    /// Creates an orchestrator reading programs from the filesystem.
    pub fn new(lifecycle: TransactionLifecycleManager<L>, paths: ContractPaths) -> Self {
        Self::with_source(lifecycle, paths, FsProgramSource)
    }
}

impl<L: LedgerClient, S: ProgramSource> ContractDeploymentOrchestrator<L, S> {
    /// Creates an orchestrator with a custom program source.
    pub fn with_source(
        lifecycle: TransactionLifecycleManager<L>,
        paths: ContractPaths,
        source: S,
    ) -> Self {
        Self {
            lifecycle,
            paths,
            source,
        }
    }

    /// Program locations in use.
    pub fn paths(&self) -> &ContractPaths {
        &self.paths
    }

    fn read(
        &self,
        path: &Path,
        not_found: impl FnOnce(PathBuf, String) -> DeploymentError,
    ) -> Result<String, DeploymentError> {
        self.source
            .read_program(path)
            .map_err(|e| not_found(path.to_path_buf(), e.to_string()))
    }

    /// Phase 1: renders the stateless template for `creator`, compiles it
    /// and returns the compiled hash as the stateless address.
    ///
    /// # Errors
    ///
    /// [`DeploymentError::TemplateNotFound`] or
    /// [`DeploymentError::TemplateCompile`].
    #[instrument(skip(self, creator), fields(creator = %creator))]
    pub async fn create_stateless(&self, creator: &Address) -> Result<String, DeploymentError> {
        let template = self.read(&self.paths.stateless_template_path(), |path, reason| {
            DeploymentError::TemplateNotFound { path, reason }
        })?;

        let source = render_stateless_template(&template, creator);
        let compiled = self
            .lifecycle
            .ledger()
            .compile(&source)
            .await
            .map_err(DeploymentError::TemplateCompile)?;

        info!(stateless_address = %compiled.hash, "Stateless contract compiled");
        Ok(compiled.hash)
    }

    /// Phase 2: compiles the stateful programs and creates the application
    /// bound to `stateless_address`.
    ///
    /// # Errors
    ///
    /// Program failures (5 to 8), [`DeploymentError::StatefulSubmit`] or
    /// [`DeploymentError::StatefulConfirm`].
    #[instrument(skip(self, creator, cancel), fields(creator = %creator.address()))]
    pub async fn create_stateful(
        &self,
        creator: &SigningIdentity,
        stateless_address: &str,
        cancel: Option<&CancellationSignal>,
    ) -> Result<Deployment, DeploymentError> {
        let ledger = self.lifecycle.ledger();

        let clear_source = self.read(&self.paths.clear_program_path(), |path, reason| {
            DeploymentError::ClearProgramNotFound { path, reason }
        })?;
        let clear = ledger
            .compile(&clear_source)
            .await
            .map_err(DeploymentError::ClearProgramCompile)?;

        let approval_source = self.read(&self.paths.approval_program_path(), |path, reason| {
            DeploymentError::ApprovalProgramNotFound { path, reason }
        })?;
        let approval = ledger
            .compile(&approval_source)
            .await
            .map_err(DeploymentError::ApprovalProgramCompile)?;

        let call = stateful_create_call(approval.program, clear.program, stateless_address);
        let confirmation = self
            .lifecycle
            .execute(creator, TransactionKind::ApplicationCall(call), None, cancel)
            .await
            .map_err(|source| {
                let stateless_address = stateless_address.to_string();
                match source.phase() {
                    FailurePhase::Submission => DeploymentError::StatefulSubmit {
                        stateless_address,
                        source,
                    },
                    FailurePhase::Confirmation => DeploymentError::StatefulConfirm {
                        stateless_address,
                        source,
                    },
                }
            })?;

        let index = confirmation.info.application_index.ok_or_else(|| {
            DeploymentError::MissingApplicationIndex {
                id: confirmation.id.clone(),
                stateless_address: stateless_address.to_string(),
            }
        })?;

        let contract = LinkedContract::new(stateless_address, index);
        info!(contract = %contract, id = %confirmation.id, "Stateful contract created");
        Ok(Deployment {
            contract,
            operation_id: confirmation.id,
        })
    }

    /// Deploys a linked contract owned by the holder of `secret_phrase`.
    ///
    /// # Errors
    ///
    /// [`DeploymentError::MalformedPhrase`], or any phase failure.
    #[instrument(skip_all)]
    pub async fn deploy(
        &self,
        secret_phrase: &str,
        cancel: Option<&CancellationSignal>,
    ) -> Result<Deployment, DeploymentError> {
        let creator = SigningIdentity::from_secret_phrase(secret_phrase)?;

        let stateless_address = self.create_stateless(&creator.address()).await?;
        self.create_stateful(&creator, &stateless_address, cancel)
            .await
            .inspect_err(|e| {
                warn!(
                    stateless_address = %stateless_address,
                    code = e.code(),
                    error = %e,
                    "Stateful phase failed; stateless contract left in place"
                );
            })
    }
}
