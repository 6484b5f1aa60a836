//! Bounded-document ceilings.
//!
//! Input and output documents are capped at fixed byte counts, a deliberate
//! constraint for devices where an unbounded JSON document is an out-of-memory
//! condition. Input over the ceiling fails parse with a 400; output over the
//! ceiling is handled per transport (the buffer adapter truncates, the stream
//! adapter drops the frame and logs).
//!
//! Ceilings come from the defaults, an explicit value, or the environment:
//!
//! - `PICOAPI_MAX_IN_SIZE` - input ceiling in bytes
//! - `PICOAPI_MAX_OUT_SIZE` - output ceiling in bytes
//!
//! Both accept decimal (`800`) or hex (`0x320`) notation.

use std::env;

/// Default input-document ceiling in bytes.
pub const DEFAULT_MAX_IN_SIZE: usize = 800;

/// Default output-document ceiling in bytes.
pub const DEFAULT_MAX_OUT_SIZE: usize = 1096;

/// Byte ceilings for one envelope's input and output documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentLimits {
    /// Maximum accepted size of the inbound payload.
    pub max_input: usize,
    /// Maximum serialized size of the outbound document.
    pub max_output: usize,
}

impl Default for DocumentLimits {
    fn default() -> Self {
        Self {
            max_input: DEFAULT_MAX_IN_SIZE,
            max_output: DEFAULT_MAX_OUT_SIZE,
        }
    }
}

impl DocumentLimits {
    #[must_use]
    pub fn new(max_input: usize, max_output: usize) -> Self {
        Self {
            max_input,
            max_output,
        }
    }

    /// Load ceilings from the environment, falling back to the defaults for
    /// absent or unparseable variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_input: env::var("PICOAPI_MAX_IN_SIZE")
                .ok()
                .as_deref()
                .and_then(parse_size)
                .unwrap_or(DEFAULT_MAX_IN_SIZE),
            max_output: env::var("PICOAPI_MAX_OUT_SIZE")
                .ok()
                .as_deref()
                .and_then(parse_size)
                .unwrap_or(DEFAULT_MAX_OUT_SIZE),
        }
    }
}

fn parse_size(raw: &str) -> Option<usize> {
    if let Some(hex) = raw.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).ok()
    } else {
        raw.parse().ok()
    }
}
