//! Fuzz target for command parsing and argv rendering.
//!
//! Rendering sits directly behind untrusted HTTP input, so it must never
//! panic, and a parameter value must never escape its argv slot no
//! matter what bytes it contains.
//!
//! # Running
//!
//! ```bash
//! cargo +nightly fuzz run command_render
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use ledgergate_core::command::LedgerCommand;
use ledgergate_core::config::ChainConfig;
use ledgergate_core::types::{ParamMap, ParamValue};

/// Structured fuzz input: a command name plus raw parameter pairs.
#[derive(Debug, Arbitrary)]
struct RenderFuzzInput {
    /// Candidate command name, usually garbage, occasionally valid.
    command: String,
    /// Raw key/value parameter pairs.
    params: Vec<(String, String)>,
}

fuzz_target!(|input: RenderFuzzInput| {
    let Ok(command) = input.command.parse::<LedgerCommand>() else {
        // Unrecognized names must fail without side effects.
        return;
    };

    let params: ParamMap = input
        .params
        .iter()
        .map(|(k, v)| (k.clone(), ParamValue::from(v.as_str())))
        .collect();

    let chain = ChainConfig::default();
    if let Ok(invocation) = command.to_invocation(&params, &chain) {
        // Whatever the inputs were, the program is fixed and every
        // provided value appears as an intact argv element.
        assert_eq!(invocation.program, chain.binary);
        for param in command.required_params() {
            let rendered = params[*param].render();
            assert!(invocation.args.iter().any(|a| *a == rendered));
        }
        // The display form never panics either.
        let _ = invocation.display_line();
    }
});
