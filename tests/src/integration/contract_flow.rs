//! # Contract Flow
//!
//! Deploy a linked contract, then drive the subscription family against it
//! from a second account.

use lg_03_tx_lifecycle::{CancellationSignal, ConfirmationScript, LedgerCall, LedgerError};
use lg_05_subscriptions::AppCallKind;
use shared_types::{codes, LinkedContract};

use super::fixtures::{address, phrase, Gateway};

const APPL: &str = "appl";

#[tokio::test]
async fn test_deploy_then_subscribe_and_grant() {
    let gateway = Gateway::new();
    let owner = phrase(1);
    let user = phrase(2);

    let deployed = gateway.session.deploy_contract(&owner).await;
    assert!(deployed.is_ok(), "{}", deployed.result);
    let contract = deployed.value.unwrap();

    // external form survives a round trip
    let parsed: LinkedContract = contract.to_string().parse().unwrap();
    assert_eq!(parsed, contract);

    let app = contract.stateful_index;
    for reply in [
        gateway.session.opt_in(&user, app).await,
        gateway.session.subscribe(&user, app).await,
        gateway.session.grant(&owner, app, address(2)).await,
        gateway.session.revoke(&owner, app, address(2)).await,
        gateway.session.unsubscribe(&user, app).await,
        gateway.session.opt_out(&user, app).await,
    ] {
        assert!(reply.is_ok(), "{}", reply.result);
        assert!(reply.result.operation_id.is_some());
    }

    let submissions = gateway.ledger.submissions();
    assert_eq!(submissions.len(), 7);
    assert!(submissions.iter().all(|s| s.kind == APPL));
    assert!(submissions[1..].iter().all(|s| s.app_id == app));
    assert_eq!(submissions[3].accounts, vec![address(2)]);
    assert_eq!(submissions[4].accounts, vec![address(2)]);
}

#[tokio::test]
async fn test_stateful_create_carries_stateless_address() {
    let gateway = Gateway::new();

    let contract = gateway.session.deploy_contract(&phrase(1)).await.value.unwrap();

    // the template was compiled with the creator substituted in
    let compiled = gateway.ledger.compiled_sources();
    assert!(compiled[0].contains(&address(1).to_string()));
    assert!(!compiled[0].contains("_RECEIVERADDRESS_"));

    let create = &gateway.ledger.submissions()[0];
    assert_eq!(create.app_id, 0);
    assert_eq!(create.sender, address(1));
    assert_eq!(create.args, vec![contract.stateless_address.as_bytes().to_vec()]);
}

#[tokio::test]
async fn test_deploy_stops_at_first_phase_failure() {
    let gateway = Gateway::new();
    gateway.ledger.fail_compile_containing("addr ");

    let reply = gateway.session.deploy_contract(&phrase(1)).await;
    assert_eq!(reply.code(), codes::TEMPLATE_COMPILE_FAILED);
    assert!(gateway.ledger.submissions().is_empty());
}

#[tokio::test]
async fn test_partial_deployment_is_reported_not_rolled_back() {
    let gateway = Gateway::new();
    gateway.ledger.script_next(ConfirmationScript::Reject("logic eval error".into()));

    let reply = gateway.session.deploy_contract(&phrase(1)).await;
    assert_eq!(reply.code(), codes::STATEFUL_CREATE_CONFIRM_FAILED);
    assert!(reply.result.operation_id.is_some());
    assert_eq!(gateway.ledger.submissions().len(), 1);
}

#[tokio::test]
async fn test_subscription_timeout_uses_round_budget() {
    let gateway = Gateway::new();
    let contract = gateway.session.deploy_contract(&phrase(1)).await.value.unwrap();
    let waits_before = gateway.ledger.round_waits().len();

    gateway.ledger.script_next(ConfirmationScript::Never);
    let reply = gateway.session.subscribe(&phrase(2), contract.stateful_index).await;

    assert_eq!(reply.code(), codes::SUBSCRIBE_CONFIRM_FAILED);
    assert_eq!(gateway.ledger.round_waits().len() - waits_before, 4);
}

#[tokio::test]
async fn test_cancelled_call_reports_confirm_code() {
    let gateway = Gateway::new();
    let cancel = CancellationSignal::new();
    cancel.cancel();

    let reply = gateway
        .session
        .call_contract(&phrase(2), 392, AppCallKind::OptIn, Some(&cancel))
        .await;
    assert_eq!(reply.code(), codes::OPT_IN_CONFIRM_FAILED);
    assert!(reply.result.operation_id.is_some());
}

#[tokio::test]
async fn test_submit_fault_reports_submit_code() {
    let gateway = Gateway::new();
    gateway
        .ledger
        .set_fault(LedgerCall::Submit, LedgerError::Connection("reset".into()));

    let cases = [
        (AppCallKind::OptIn, codes::OPT_IN_SUBMIT_FAILED),
        (AppCallKind::OptOut, codes::OPT_OUT_SUBMIT_FAILED),
        (AppCallKind::Subscribe, codes::SUBSCRIBE_SUBMIT_FAILED),
        (AppCallKind::Unsubscribe, codes::UNSUBSCRIBE_SUBMIT_FAILED),
        (AppCallKind::Grant { target: address(3) }, codes::GRANT_SUBMIT_FAILED),
        (AppCallKind::Revoke { target: address(3) }, codes::REVOKE_SUBMIT_FAILED),
    ];
    for (kind, code) in cases {
        let reply = gateway.session.call_contract(&phrase(2), 392, kind, None).await;
        assert_eq!(reply.code(), code, "{kind}");
    }
}

#[tokio::test]
async fn test_malformed_phrase_is_rejected_before_ledger() {
    let gateway = Gateway::new();

    assert_eq!(
        gateway.session.deploy_contract("not a phrase").await.code(),
        codes::MALFORMED_SECRET_PHRASE
    );
    assert_eq!(
        gateway.session.subscribe("not a phrase", 392).await.code(),
        codes::MALFORMED_SECRET_PHRASE
    );
    assert!(gateway.ledger.submissions().is_empty());
}
