//! # Session Configuration
//!
//! Connection strings flow through credential resolution into session
//! opening; a closed session refuses every operation.

use std::fs;
use std::sync::Arc;

use gateway_runtime::Session;
use lg_01_connection::GatewayConfig;
use lg_02_key_gateway::InMemoryKeyCustody;
use lg_03_tx_lifecycle::InMemoryLedger;
use shared_types::{codes, ErrorCode};

use super::fixtures::{address, init_tracing, phrase, Gateway, InMemorySession};

#[tokio::test]
async fn test_connection_string_overrides_reach_the_session() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let config = GatewayConfig::with_dirs(dir.path(), dir.path())
        .with_connection_string(
            "usrwlab=alice;usrwpwd=secret;rounds=7;sttp=a.teal;bogus=1;noequals",
        )
        .unwrap();

    let session: InMemorySession = Session::connect(
        config,
        Arc::new(InMemoryLedger::new()),
        Some(Arc::new(InMemoryKeyCustody::new())),
    )
    .await
    .unwrap();

    assert_eq!(session.config().user_wallet.name, "alice");
    assert_eq!(session.config().user_wallet.password, "secret");
    assert_eq!(session.config().confirmation_rounds, 7);
    assert_eq!(session.config().contracts.stateless_template_path(), dir.path().join("a.teal"));

    // the user wallet does not exist in custody
    assert_eq!(session.create_account().await.code(), codes::WALLET_NOT_FOUND);
}

#[tokio::test]
async fn test_open_resolves_credentials_before_connecting() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let base = GatewayConfig::with_dirs(dir.path(), dir.path());

    let err = Session::open(base.clone()).await.err().unwrap();
    assert_eq!(err.code(), codes::TOKEN_UNREADABLE);

    fs::write(dir.path().join("algod.token"), "abc\n").unwrap();
    let err = Session::open(base.clone()).await.err().unwrap();
    assert_eq!(err.code(), codes::PORT_UNREADABLE);

    fs::write(dir.path().join("algod.net"), "127.0.0.1:notaport\n").unwrap();
    let err = Session::open(base).await.err().unwrap();
    assert_eq!(err.code(), codes::PORT_INVALID);
}

#[tokio::test]
async fn test_closed_session_refuses_operations() {
    let mut gateway = Gateway::new();
    assert!(gateway.session.close().is_ok());

    let session = &gateway.session;
    assert_eq!(session.account_balance(&address(1)).await.code(), codes::LEDGER_NOT_CONNECTED);
    assert_eq!(session.fund_account(&address(1), 1).await.code(), codes::LEDGER_NOT_CONNECTED);
    assert_eq!(session.deploy_contract(&phrase(1)).await.code(), codes::LEDGER_NOT_CONNECTED);
    assert_eq!(session.opt_in(&phrase(1), 1).await.code(), codes::LEDGER_NOT_CONNECTED);
    assert!(gateway.ledger.submissions().is_empty());
}

#[tokio::test]
async fn test_session_without_owner_cannot_fund() {
    let dir = tempfile::tempdir().unwrap();
    let config = GatewayConfig::with_dirs(dir.path(), dir.path());
    let session: InMemorySession =
        Session::from_parts(config, Arc::new(InMemoryLedger::new()), None);

    assert_eq!(
        session.fund_account(&address(1), 1).await.code(),
        codes::OWNER_SECRET_MISSING
    );
    assert_eq!(
        session.create_account().await.code(),
        codes::KEYSTORE_NOT_CONFIGURED
    );
}
