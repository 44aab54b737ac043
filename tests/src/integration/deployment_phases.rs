//! # Deployment Phases
//!
//! Drives the deployment orchestrator directly, phase by phase, over the
//! in-memory ledger.

use std::sync::Arc;

use lg_01_connection::ContractPaths;
use lg_02_key_gateway::SigningIdentity;
use lg_03_tx_lifecycle::{CancellationSignal, InMemoryLedger, TransactionLifecycleManager};
use lg_04_contract_deployment::{
    render_stateless_template, ContractDeploymentOrchestrator, DeploymentError, DeploymentPhase,
};
use shared_types::{codes, ErrorCode};
use tempfile::TempDir;

use super::fixtures::{address, init_tracing, phrase, write_contracts, STATELESS_TEMPLATE};

struct Deployer {
    ledger: Arc<InMemoryLedger>,
    orchestrator: ContractDeploymentOrchestrator<InMemoryLedger>,
    _contracts: TempDir,
}

fn deployer() -> Deployer {
    init_tracing();
    let contracts = tempfile::tempdir().unwrap();
    let paths = ContractPaths::with_root(contracts.path());
    write_contracts(&paths);

    let ledger = Arc::new(InMemoryLedger::new());
    let lifecycle = TransactionLifecycleManager::new(Arc::clone(&ledger));
    Deployer {
        ledger,
        orchestrator: ContractDeploymentOrchestrator::new(lifecycle, paths),
        _contracts: contracts,
    }
}

fn expected_stateless_address() -> String {
    let rendered = render_stateless_template(STATELESS_TEMPLATE, &address(1));
    InMemoryLedger::program_address(rendered.as_bytes()).encode()
}

#[tokio::test]
async fn test_phases_chain_through_stateless_address() {
    let deployer = deployer();
    let creator = SigningIdentity::from_secret_phrase(&phrase(1)).unwrap();

    let stateless = deployer
        .orchestrator
        .create_stateless(&creator.address())
        .await
        .unwrap();
    assert_eq!(stateless, expected_stateless_address());
    assert!(deployer.ledger.submissions().is_empty());

    let deployment = deployer
        .orchestrator
        .create_stateful(&creator, &stateless, None)
        .await
        .unwrap();
    assert_eq!(deployment.contract.stateless_address, stateless);

    let create = &deployer.ledger.submissions()[0];
    assert_eq!(create.args, vec![stateless.into_bytes()]);
    assert_eq!(create.id, deployment.operation_id);
}

#[tokio::test]
async fn test_cancelled_deploy_stops_after_stateful_submission() {
    let deployer = deployer();
    let cancel = CancellationSignal::new();
    cancel.cancel();

    let err = deployer
        .orchestrator
        .deploy(&phrase(1), Some(&cancel))
        .await
        .unwrap_err();

    assert!(matches!(err, DeploymentError::StatefulConfirm { .. }));
    assert_eq!(err.code(), codes::STATEFUL_CREATE_CONFIRM_FAILED);
    assert_eq!(err.phase(), DeploymentPhase::Stateful);
    assert_eq!(err.stateless_address(), Some(expected_stateless_address().as_str()));

    // phase 1 finished, phase 2 submitted once and was never confirmed
    assert_eq!(deployer.ledger.compiled_sources().len(), 3);
    assert_eq!(deployer.ledger.submissions().len(), 1);
    assert_eq!(err.operation_id(), Some(&deployer.ledger.submissions()[0].id));
    assert!(deployer.ledger.round_waits().is_empty());
}
