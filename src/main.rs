use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use govscan::cli::{Args, Commands};
use govscan::{parse_framework, Config, EnvOverrides, GenaiClient, JsonRenderer, Orchestrator, Renderer, RunInputs};
use govscan_core::{Progress, ProgressSink};
use govscan_rag::{ComplianceRetriever, HashingEmbedder, JsonVectorStore, VectorStore};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    dotenv().ok();

    let args = Args::parse();
    let config = Config::load_with_precedence(args.config.as_deref(), EnvOverrides::from_env(), args.cli_overrides())
        .context("failed to load configuration")?;

    match args.command {
        Commands::Run { sast, sca, dast, output_dir } => run_command(config, sast, sca, dast, output_dir).await,
        Commands::Ingest { framework, file } => ingest_command(config, &framework, file).await,
        Commands::Coverage { run_file } => coverage_command(&run_file).await,
        Commands::Compare { run_file, reference } => compare_command(&run_file, &reference).await,
    }
}

fn progress_logger() -> ProgressSink {
    Arc::new(|progress: Progress| {
        tracing::info!(phase = ?progress.phase, status = ?progress.status, "{}", progress.message);
    })
}

async fn run_command(
    config: Config,
    sast: Option<std::path::PathBuf>,
    sca: Option<std::path::PathBuf>,
    dast: Option<std::path::PathBuf>,
    output_dir: std::path::PathBuf,
) -> Result<()> {
    let embedder = Arc::new(HashingEmbedder::new());
    let store: Arc<dyn VectorStore> = Arc::new(JsonVectorStore::new(config.vector_store_dir.clone(), embedder));
    let retriever = ComplianceRetriever::new(store);

    let large_client = Arc::new(GenaiClient::new(&config.large_model_label, "large"));
    let small_client = Arc::new(GenaiClient::new(&config.small_model_label, "small"));

    let orchestrator = Orchestrator::new(large_client, small_client, retriever, config.top_k, config.max_per_type);
    let inputs = RunInputs {
        sast_path: sast.as_deref(),
        sca_path: sca.as_deref(),
        dast_path: dast.as_deref(),
    };

    let result = orchestrator.run(inputs, Some(progress_logger())).await;

    let renderer = JsonRenderer::new(output_dir);
    let paths = renderer.render(&result).await.context("failed to write report")?;
    for path in paths {
        println!("wrote report: {}", path.display());
    }

    println!(
        "parsed {} sast / {} sca / {} dast findings, {} policies generated, overall coverage {:.1}%",
        result.parsed_counts.sast,
        result.parsed_counts.sca,
        result.parsed_counts.dast,
        result.results.len(),
        result.coverage.overall_score
    );

    Ok(())
}

async fn ingest_command(config: Config, framework: &str, file: Option<std::path::PathBuf>) -> Result<()> {
    let framework = parse_framework(framework)?;
    let file = file.unwrap_or_else(|| config.catalogue_dir.join(format!("{}.txt", framework.to_string().to_lowercase())));
    let chunks = govscan_rag::loader::load_catalogue_file(framework, &file)
        .await
        .with_context(|| format!("failed to load catalogue file: {}", file.display()))?;

    let embedder = Arc::new(HashingEmbedder::new());
    let store = JsonVectorStore::new(config.vector_store_dir.clone(), embedder);
    let count = chunks.len();
    store.upsert(chunks).await.context("failed to upsert catalogue chunks")?;

    println!("ingested {count} chunks for {framework} into {}", config.vector_store_dir.display());
    Ok(())
}

async fn coverage_command(run_file: &std::path::Path) -> Result<()> {
    let contents = tokio::fs::read_to_string(run_file)
        .await
        .with_context(|| format!("failed to read run file: {}", run_file.display()))?;
    let result: govscan_core::RunResult = serde_json::from_str(&contents).context("failed to parse run file")?;

    let (coverage, warnings) = govscan_compliance::analyze(&result.results);
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }

    println!("NIST CSF: {:.1}% ({}/{})", coverage.nist_csf.coverage_percentage, coverage.nist_csf.covered_controls.len(), coverage.nist_csf.total_controls);
    println!("ISO 27001: {:.1}% ({}/{})", coverage.iso_27001.coverage_percentage, coverage.iso_27001.covered_controls.len(), coverage.iso_27001.total_controls);
    println!("overall: {:.1}%", coverage.overall_score);
    Ok(())
}

async fn compare_command(run_file: &std::path::Path, reference: &std::path::Path) -> Result<()> {
    let run_contents = tokio::fs::read_to_string(run_file)
        .await
        .with_context(|| format!("failed to read run file: {}", run_file.display()))?;
    let result: govscan_core::RunResult = serde_json::from_str(&run_contents).context("failed to parse run file")?;

    let reference_text = tokio::fs::read_to_string(reference)
        .await
        .with_context(|| format!("failed to read reference policy: {}", reference.display()))?;

    let generated_text = result
        .results
        .iter()
        .filter_map(|r| r.policy_text.as_deref())
        .collect::<Vec<_>>()
        .join("\n\n");

    let comparison = govscan_compare::compare(&reference_text, &generated_text).context("comparison failed")?;

    println!("grade: {}", comparison.grade);
    println!("overall similarity: {:.1}", comparison.overall_similarity);
    println!("bleu-4: {:.3} rouge-l: {:.3} lexicon coverage: {:.3}", comparison.bleu_score, comparison.rouge_l_fmeasure, comparison.key_terms_coverage);
    println!("{}", comparison.interpretation);
    Ok(())
}
