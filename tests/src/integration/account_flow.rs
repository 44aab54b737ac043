//! # Account Flow
//!
//! Create an account in the user wallet, fund it from the owner and read
//! its balance back.

use lg_02_key_gateway::SigningIdentity;
use lg_03_tx_lifecycle::{LedgerCall, LedgerError};
use shared_types::codes;

use super::fixtures::{address, Gateway};

#[tokio::test]
async fn test_create_fund_and_read_balance() {
    let gateway = Gateway::new();

    let created = gateway.session.create_account().await;
    assert!(created.is_ok(), "{}", created.result);
    let account = created.value.unwrap();
    assert_eq!(gateway.custody.key_count(&gateway.user_wallet_id), 1);

    let identity = SigningIdentity::from_secret_phrase(&account.secret_phrase).unwrap();
    assert_eq!(identity.address(), account.address);

    assert_eq!(gateway.session.account_balance(&account.address).await.value, Some(0));

    let funded = gateway.session.fund_account(&account.address, 5_000_000).await;
    assert!(funded.is_ok(), "{}", funded.result);

    let payment = &gateway.ledger.submissions()[0];
    assert_eq!(payment.kind, "pay");
    assert_eq!(payment.sender, address(9));
    assert_eq!(payment.receiver, Some(account.address));
    assert_eq!(payment.note, b"DOP funds".to_vec());

    assert_eq!(
        gateway.session.account_balance(&account.address).await.value,
        Some(5_000_000)
    );
}

#[tokio::test]
async fn test_exported_phrase_matches_created_account() {
    let gateway = Gateway::new();
    let account = gateway.session.create_account().await.value.unwrap();
    let wallet = gateway.session.config().user_wallet.clone();

    let exported = gateway
        .session
        .export_account_secret_phrase(&wallet.name, &wallet.password, &account.address)
        .await;
    assert!(exported.is_ok(), "{}", exported.result);
    assert_eq!(
        exported.value.as_ref().map(|p| p.as_str()),
        Some(account.secret_phrase.as_str())
    );

    let missing = gateway
        .session
        .export_account_secret_phrase("no-such-wallet", "", &account.address)
        .await;
    assert_eq!(missing.code(), codes::WALLET_NOT_FOUND);
}

#[tokio::test]
async fn test_key_custody_outage_fails_account_creation() {
    let gateway = Gateway::new();
    gateway.custody.set_offline(true);

    let reply = gateway.session.create_account().await;
    assert_eq!(reply.code(), codes::CREATE_ACCOUNT_FAILED);
    assert!(reply.value.is_none());
}

#[tokio::test]
async fn test_balance_query_fault() {
    let gateway = Gateway::new();
    gateway
        .ledger
        .set_fault(LedgerCall::AccountInfo, LedgerError::Connection("reset".into()));

    assert_eq!(
        gateway.session.account_balance(&address(1)).await.code(),
        codes::BALANCE_QUERY_FAILED
    );
}
