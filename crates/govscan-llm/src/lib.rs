//! The minimal LLM client contract the orchestrator generates policy text
//! through. No concrete HTTP-backed implementation lives here — wiring a
//! real model is a Non-goal of the core; only the contract is specified.

use async_trait::async_trait;

/// An LLM call failed or timed out. The orchestrator attributes this to a
/// single finding and continues to the next one — it never aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("generation failed: {0}")]
    GenerationFailed(String),
    #[error("generation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Default per-call timeout; a timeout is a per-finding failure, not a
/// run-abort.
pub const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

/// A synchronous-shaped text generation interface. Two instances are
/// configured by the caller and routed purely on a finding's `vuln_type`
/// tag: a "large" client for SAST/SCA, a "small" client for DAST. Swapping
/// backends is wiring, never a code change in the orchestrator.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(
        &self,
        user_prompt: &str,
        system_prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, LlmError>;

    /// A short label surfaced on `PolicyResult::model_label`, informational only.
    fn label(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoClient;

    #[async_trait]
    impl LlmClient for EchoClient {
        async fn generate(
            &self,
            user_prompt: &str,
            system_prompt: &str,
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<String, LlmError> {
            Ok(format!("{system_prompt}\n{user_prompt}||POLICY"))
        }

        fn label(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn echo_client_round_trips_prompt() {
        let client = EchoClient;
        let out = client.generate("user", "system", 0.2, 512).await.unwrap();
        assert!(out.ends_with("||POLICY"));
        assert!(out.contains("user"));
        assert!(out.contains("system"));
    }
}
