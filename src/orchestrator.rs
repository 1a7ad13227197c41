//! The C10 orchestrator: the linear state machine that drives parsing,
//! retrieval, generation, coverage analysis and saving for one run.
//!
//! `IDLE -> PARSING -> RAG_READY -> GENERATING -> ANALYSING -> SAVING -> COMPLETE`,
//! with an `ERROR` event fired (not a state transition — the machine still
//! reaches `COMPLETE` with partial results) whenever a single finding's
//! retrieval or generation step fails. The four suspension points are: (a)
//! reading an input blob from disk, (b) vector-store queries, (c) LLM
//! generation calls, (d) progress emits the sink chooses to make async.
//! Generation is strictly sequential, one finding at a time — a deliberate
//! departure from this codebase's usual `buffer_unordered` fan-out, because
//! per-finding ordering in the emitted progress stream is part of the
//! contract downstream subscribers rely on.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join3;
use govscan_core::{
    noop_sink, CoverageReport, Framework, ParsedCounts, Phase, PolicyResult, Progress,
    ProgressSink, RunResult, Status, Vulnerability, VulnKind,
};
use govscan_llm::LlmClient;
use govscan_prompt::PromptBuilder;
use govscan_rag::ComplianceRetriever;

const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 1024;

/// Paths (or omissions) for the three possible scan report inputs of one run.
#[derive(Debug, Clone, Default)]
pub struct RunInputs<'a> {
    pub sast_path: Option<&'a Path>,
    pub sca_path: Option<&'a Path>,
    pub dast_path: Option<&'a Path>,
}

pub struct Orchestrator {
    large_client: Arc<dyn LlmClient>,
    small_client: Arc<dyn LlmClient>,
    retriever: ComplianceRetriever,
    top_k: usize,
    max_per_type: usize,
}

impl Orchestrator {
    pub fn new(
        large_client: Arc<dyn LlmClient>,
        small_client: Arc<dyn LlmClient>,
        retriever: ComplianceRetriever,
        top_k: usize,
        max_per_type: usize,
    ) -> Self {
        Self {
            large_client,
            small_client,
            retriever,
            top_k,
            max_per_type,
        }
    }

    /// Route a finding to the large client (SAST/SCA) or the small one
    /// (DAST), per the finding's own `vuln_type` tag.
    fn client_for(&self, kind: VulnKind) -> &Arc<dyn LlmClient> {
        match kind {
            VulnKind::Dast => &self.small_client,
            VulnKind::Sast | VulnKind::Sca => &self.large_client,
        }
    }

    /// Run one full pass. Always returns a `RunResult`, even when every
    /// finding failed — a run never aborts outright; failures are recorded
    /// per finding and the terminal event still fires.
    pub async fn run(&self, inputs: RunInputs<'_>, emit: Option<ProgressSink>) -> RunResult {
        let emit = emit.unwrap_or_else(noop_sink);

        if inputs.sast_path.is_none() && inputs.sca_path.is_none() && inputs.dast_path.is_none() {
            emit(Progress::new(
                Phase::Error,
                Status::Error,
                "no input supplied: at least one of sast/sca/dast source is required",
            ));
            return empty_run_result();
        }

        emit(Progress::new(Phase::Parsing, Status::InProgress, "parsing input reports"));
        let (sast, sca, dast) = join3(
            parse_sast(inputs.sast_path, &emit),
            parse_sca(inputs.sca_path, &emit),
            parse_dast(inputs.dast_path, &emit),
        )
        .await;

        let parsed_counts = ParsedCounts {
            sast: sast.len(),
            sca: sca.len(),
            dast: dast.len(),
        };
        emit(Progress::new(
            Phase::Parsing,
            Status::Completed,
            format!(
                "parsed {} sast, {} sca, {} dast findings",
                parsed_counts.sast, parsed_counts.sca, parsed_counts.dast
            ),
        ));

        let findings: Vec<Vulnerability> = sast
            .into_iter()
            .take(self.max_per_type)
            .map(Vulnerability::Sast)
            .chain(sca.into_iter().take(self.max_per_type).map(Vulnerability::Sca))
            .chain(dast.into_iter().take(self.max_per_type).map(Vulnerability::Dast))
            .collect();

        emit(Progress::new(Phase::Rag, Status::Completed, "retrieval ready"));

        let total = findings.len();
        let mut results = Vec::with_capacity(total);
        for (index, vuln) in findings.into_iter().enumerate() {
            emit(Progress::new(
                Phase::LlmGeneration,
                Status::InProgress,
                format!("generating policy {}/{} — {}", index + 1, total, vuln.title()),
            ));

            let result = self.generate_one(vuln, &emit).await;
            if !result.is_success() {
                emit(Progress::new(
                    Phase::LlmGeneration,
                    Status::Warning,
                    format!("finding {}/{} failed: {}", index + 1, total, result.error.as_deref().unwrap_or("unknown")),
                ));
            }
            results.push(result);
        }
        emit(Progress::new(Phase::LlmGeneration, Status::Completed, "generation complete"));

        emit(Progress::new(Phase::ComplianceValidation, Status::InProgress, "analysing coverage"));
        let (coverage, coverage_warnings) = govscan_compliance::analyze(&results);
        for warning in coverage_warnings {
            emit(Progress::new(Phase::ComplianceValidation, Status::Warning, warning.to_string()));
        }
        emit(Progress::new(
            Phase::ComplianceValidation,
            Status::Completed,
            format!("overall coverage {:.1}%", coverage.overall_score),
        ));

        let run_result = RunResult {
            results,
            parsed_counts,
            coverage,
            timestamp: Utc::now(),
            comparison: None,
        };

        emit(Progress::new(Phase::Saving, Status::Completed, "results ready to save"));
        emit(Progress::new(Phase::Complete, Status::Completed, "run complete"));

        run_result
    }

    /// Retrieval failures never fail the finding — they degrade to empty
    /// context and a warning, and generation still proceeds. Only a
    /// generation failure itself produces a failed `PolicyResult`.
    async fn generate_one(&self, vuln: Vulnerability, emit: &ProgressSink) -> PolicyResult {
        let kind = vuln.kind();

        let formatted_context = match self.retriever.retrieve_for_vulnerability(&vuln, self.top_k).await {
            Ok(retrieval) => {
                if retrieval.chunks.is_empty() {
                    emit(Progress::new(
                        Phase::Rag,
                        Status::Warning,
                        format!("no framework evidence retrieved for '{}'", vuln.title()),
                    ));
                }
                retrieval.formatted_context
            }
            Err(e) => {
                emit(Progress::new(
                    Phase::Rag,
                    Status::Warning,
                    format!("retrieval failed for '{}': {e}", vuln.title()),
                ));
                govscan_rag::NO_EVIDENCE_MARKER.to_string()
            }
        };

        let user_prompt = PromptBuilder::build_user_prompt(&vuln, &formatted_context);
        let client = self.client_for(kind);

        match client
            .generate(&user_prompt, govscan_prompt::SYSTEM_PROMPT, TEMPERATURE, MAX_TOKENS)
            .await
        {
            Ok(policy_text) => PolicyResult::success(vuln, policy_text, client.label(), formatted_context),
            Err(e) => PolicyResult::failure(vuln, e.to_string(), client.label(), formatted_context),
        }
    }
}

async fn parse_sast(path: Option<&Path>, emit: &ProgressSink) -> Vec<govscan_core::SastFinding> {
    let Some(path) = path else { return Vec::new() };
    match tokio::fs::read_to_string(path).await {
        Ok(blob) => match govscan_parsers::sast::parse(&blob) {
            Ok(findings) => findings,
            Err(e) => {
                emit(Progress::new(Phase::Parsing, Status::Warning, format!("sast parse failed: {e}")));
                Vec::new()
            }
        },
        Err(e) => {
            emit(Progress::new(Phase::Parsing, Status::Warning, format!("could not read sast input: {e}")));
            Vec::new()
        }
    }
}

async fn parse_sca(path: Option<&Path>, emit: &ProgressSink) -> Vec<govscan_core::ScaFinding> {
    let Some(path) = path else { return Vec::new() };
    match tokio::fs::read_to_string(path).await {
        Ok(blob) => match govscan_parsers::sca::parse(&blob) {
            Ok(findings) => findings,
            Err(e) => {
                emit(Progress::new(Phase::Parsing, Status::Warning, format!("sca parse failed: {e}")));
                Vec::new()
            }
        },
        Err(e) => {
            emit(Progress::new(Phase::Parsing, Status::Warning, format!("could not read sca input: {e}")));
            Vec::new()
        }
    }
}

async fn parse_dast(path: Option<&Path>, emit: &ProgressSink) -> Vec<govscan_core::DastFinding> {
    let Some(path) = path else { return Vec::new() };
    match tokio::fs::read_to_string(path).await {
        Ok(blob) => match govscan_parsers::dast::parse(&blob) {
            Ok(findings) => findings,
            Err(e) => {
                emit(Progress::new(Phase::Parsing, Status::Warning, format!("dast parse failed: {e}")));
                Vec::new()
            }
        },
        Err(e) => {
            emit(Progress::new(Phase::Parsing, Status::Warning, format!("could not read dast input: {e}")));
            Vec::new()
        }
    }
}

fn empty_run_result() -> RunResult {
    RunResult {
        results: Vec::new(),
        parsed_counts: ParsedCounts { sast: 0, sca: 0, dast: 0 },
        coverage: CoverageReport {
            nist_csf: govscan_core::FrameworkCoverage::empty(
                govscan_compliance::total_controls(Framework::NistCsf),
                &govscan_compliance::control_ids(Framework::NistCsf),
            ),
            iso_27001: govscan_core::FrameworkCoverage::empty(
                govscan_compliance::total_controls(Framework::Iso27001),
                &govscan_compliance::control_ids(Framework::Iso27001),
            ),
            overall_score: 0.0,
        },
        timestamp: Utc::now(),
        comparison: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use govscan_core::ComplianceChunk;
    use govscan_llm::LlmError;
    use govscan_rag::VectorStore;
    use std::io::Write;
    use std::sync::Mutex;

    struct StubClient {
        label: &'static str,
    }

    #[async_trait]
    impl LlmClient for StubClient {
        async fn generate(&self, user_prompt: &str, _system_prompt: &str, _t: f32, _m: u32) -> Result<String, LlmError> {
            Ok(format!(
                "POLICY IDENTIFIER: X\n\nRISK STATEMENT: generated for {}\n\nCOMPLIANCE MAPPING: PR.AC-4, A.9.1.1\n\nPOLICY REQUIREMENTS: ...\n\nREMEDIATION PLAN: ...\n\nMONITORING: ...",
                user_prompt.lines().next().unwrap_or("finding")
            ))
        }

        fn label(&self) -> &str {
            self.label
        }
    }

    struct FailingClient;

    #[async_trait]
    impl LlmClient for FailingClient {
        async fn generate(&self, _u: &str, _s: &str, _t: f32, _m: u32) -> Result<String, LlmError> {
            Err(LlmError::GenerationFailed("stub failure".into()))
        }

        fn label(&self) -> &str {
            "failing"
        }
    }

    struct EmptyStore;

    #[async_trait]
    impl VectorStore for EmptyStore {
        async fn upsert(&self, _chunks: Vec<ComplianceChunk>) -> Result<(), govscan_rag::RetrievalError> {
            Ok(())
        }
        async fn query(&self, _text: &str, _top_k: usize) -> Result<Vec<govscan_core::ScoredChunk>, govscan_rag::RetrievalError> {
            Ok(Vec::new())
        }
        async fn count(&self) -> Result<usize, govscan_rag::RetrievalError> {
            Ok(0)
        }
        async fn reset(&self) -> Result<(), govscan_rag::RetrievalError> {
            Ok(())
        }
    }

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    fn orchestrator(large_ok: bool) -> Orchestrator {
        let large: Arc<dyn LlmClient> = if large_ok {
            Arc::new(StubClient { label: "large" })
        } else {
            Arc::new(FailingClient)
        };
        let small: Arc<dyn LlmClient> = Arc::new(StubClient { label: "small" });
        let retriever = ComplianceRetriever::new(Arc::new(EmptyStore));
        Orchestrator::new(large, small, retriever, 5, 10)
    }

    #[tokio::test]
    async fn empty_input_emits_error_and_returns_empty_result() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        let emit: ProgressSink = Arc::new(move |p: Progress| events_clone.lock().unwrap().push(p));

        let result = orchestrator(true).run(RunInputs::default(), Some(emit)).await;

        assert!(result.results.is_empty());
        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase, Phase::Error);
    }

    #[tokio::test]
    async fn full_run_produces_policy_and_coverage() {
        let sast_file = write_temp(
            r#"{"results":[{"check_id":"sql-injection-rule","path":"app/auth.py","start":{"line":45},"end":{"line":45},"extra":{"message":"SQL injection via string concatenation","severity":"ERROR","metadata":{"cwe":["CWE-89: SQL Injection"]},"lines":"query = \"SELECT * FROM users WHERE id=\" + user_id"}}]}"#,
        );

        let inputs = RunInputs {
            sast_path: Some(sast_file.path()),
            sca_path: None,
            dast_path: None,
        };

        let result = orchestrator(true).run(inputs, None).await;

        assert_eq!(result.parsed_counts.sast, 1);
        assert_eq!(result.results.len(), 1);
        assert!(result.results[0].is_success());
        assert!(result.coverage.nist_csf.covered_controls.contains(&"PR.AC-4".to_string()));
        assert!(result.coverage.iso_27001.covered_controls.contains(&"A.9.1.1".to_string()));
    }

    #[tokio::test]
    async fn empty_store_warns_but_still_generates_a_policy() {
        let sast_file = write_temp(
            r#"{"results":[{"check_id":"sql-injection-rule","path":"app/auth.py","start":{"line":45},"end":{"line":45},"extra":{"message":"SQL injection via string concatenation","severity":"ERROR","metadata":{"cwe":["CWE-89: SQL Injection"]},"lines":"query = \"SELECT * FROM users WHERE id=\" + user_id"}}]}"#,
        );
        let inputs = RunInputs {
            sast_path: Some(sast_file.path()),
            sca_path: None,
            dast_path: None,
        };

        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();
        let emit: ProgressSink = Arc::new(move |p: Progress| events_clone.lock().unwrap().push(p));

        let result = orchestrator(true).run(inputs, Some(emit)).await;

        assert_eq!(result.results.len(), 1);
        assert!(result.results[0].is_success());

        let events = events.lock().unwrap();
        let rag_warnings: Vec<_> = events
            .iter()
            .filter(|e| e.phase == Phase::Rag && e.status == Status::Warning)
            .collect();
        assert_eq!(rag_warnings.len(), 1);
    }

    #[tokio::test]
    async fn per_finding_failure_does_not_abort_the_run() {
        let sast_file = write_temp(
            r#"{"results":[{"check_id":"sql-injection-rule","path":"app/auth.py","start":{"line":45},"end":{"line":45},"extra":{"message":"SQL injection","severity":"ERROR","metadata":{},"lines":"x"}}]}"#,
        );
        let inputs = RunInputs {
            sast_path: Some(sast_file.path()),
            sca_path: None,
            dast_path: None,
        };

        let result = orchestrator(false).run(inputs, None).await;

        assert_eq!(result.results.len(), 1);
        assert!(!result.results[0].is_success());
        assert!(result.results[0].error.is_some());
    }
}
