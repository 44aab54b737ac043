//! # Linked Contract Construction
//!
//! A linked contract pairs a stateless program, whose compiled hash acts as
//! an address, with a stateful application that receives that address as its
//! creation argument.

use lg_03_tx_lifecycle::{ApplicationCall, StateSchema};
use shared_types::Address;

/// Token in the stateless template replaced by the creator address.
pub const RECEIVER_PLACEHOLDER: &str = "_RECEIVERADDRESS_";

/// Storage allotment of the stateful half, both local and global.
pub const LINKED_CONTRACT_SCHEMA: StateSchema = StateSchema::new(5, 5);

/// Deployment phase a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeploymentPhase {
    /// Rendering and compiling the stateless program.
    Stateless,
    /// Compiling programs and creating the stateful application.
    Stateful,
}

/// Substitutes every placeholder in the stateless template with `creator`.
#[must_use]
pub fn render_stateless_template(template: &str, creator: &Address) -> String {
    template.replace(RECEIVER_PLACEHOLDER, &creator.encode())
}

/// The application-create call for the stateful half.
///
/// The single argument is the stateless address text as bytes.
#[must_use]
pub fn stateful_create_call(
    approval_program: Vec<u8>,
    clear_program: Vec<u8>,
    stateless_address: &str,
) -> ApplicationCall {
    ApplicationCall::create(
        approval_program,
        clear_program,
        LINKED_CONTRACT_SCHEMA,
        LINKED_CONTRACT_SCHEMA,
    )
    .with_arg(stateless_address.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lg_03_tx_lifecycle::OnCompletion;

    #[test]
    fn test_render_replaces_every_placeholder() {
        let creator = Address::ZERO;
        let template = "addr _RECEIVERADDRESS_\n==\naddr _RECEIVERADDRESS_\n";
        let rendered = render_stateless_template(template, &creator);

        assert!(!rendered.contains(RECEIVER_PLACEHOLDER));
        assert_eq!(rendered.matches(creator.encode().as_str()).count(), 2);
    }

    #[test]
    fn test_render_without_placeholder_is_identity() {
        assert_eq!(render_stateless_template("int 1", &Address::ZERO), "int 1");
    }

    #[test]
    fn test_create_call_shape() {
        let call = stateful_create_call(vec![1], vec![2], "STATELESS");

        assert!(call.is_create());
        assert_eq!(call.on_complete, OnCompletion::NoOp);
        assert_eq!(call.args, vec![b"STATELESS".to_vec()]);
        assert!(call.accounts.is_empty());
        assert_eq!(call.global_schema, StateSchema::new(5, 5));
        assert_eq!(call.local_schema, StateSchema::new(5, 5));
    }
}
