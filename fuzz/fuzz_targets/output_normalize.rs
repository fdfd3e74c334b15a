//! Fuzz target for stdout normalization.
//!
//! The normalizer consumes whatever bytes the external CLI produced; it
//! must never panic and must always yield either parsed JSON or the raw
//! wrapper.
//!
//! # Running
//!
//! ```bash
//! cargo +nightly fuzz run output_normalize
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

use ledgergate_core::types::CommandOutput;

fuzz_target!(|stdout: &str| {
    match CommandOutput::from_stdout(stdout) {
        CommandOutput::Json(value) => {
            // Parsed verbatim; serializing back never panics.
            let _ = serde_json::to_string(&value);
        }
        CommandOutput::Raw { output } => {
            assert_eq!(output, stdout);
        }
    }
});
