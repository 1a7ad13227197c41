//! Wiring for the `govscan` binary: configuration precedence, the CLI
//! surface, the orchestrator, and the report renderer. Exposed as a library
//! so integration tests can drive a run without spawning the binary.

pub mod cli;
pub mod config;
pub mod llm_client;
pub mod orchestrator;
pub mod renderer;

pub use config::{CliOverrides, Config, EnvOverrides};
pub use llm_client::GenaiClient;
pub use orchestrator::{Orchestrator, RunInputs};
pub use renderer::{JsonRenderer, Renderer};

use anyhow::{anyhow, Result};
use govscan_core::Framework;

/// Parse a framework token as accepted on the CLI (`NIST_CSF` / `ISO_27001`).
pub fn parse_framework(s: &str) -> Result<Framework> {
    match s.trim().to_uppercase().as_str() {
        "NIST_CSF" => Ok(Framework::NistCsf),
        "ISO_27001" => Ok(Framework::Iso27001),
        other => Err(anyhow!("unknown framework '{other}', expected NIST_CSF or ISO_27001")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_frameworks() {
        assert_eq!(parse_framework("nist_csf").unwrap(), Framework::NistCsf);
        assert_eq!(parse_framework("ISO_27001").unwrap(), Framework::Iso27001);
    }

    #[test]
    fn rejects_unknown_framework() {
        assert!(parse_framework("PCI_DSS").is_err());
    }
}
