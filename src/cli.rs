//! Command-line surface: `run`, `ingest`, `coverage`, `compare`.
//!
//! Global flags populate the highest-precedence layer of [`crate::config`];
//! subcommand-specific flags are read directly by `main`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::CliOverrides;

#[derive(Parser, Debug)]
#[command(author, version, about = "Normalises SAST/SCA/DAST findings and generates governance policy per finding", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML config file. Wins over environment variables and
    /// defaults, but every other CLI flag still wins over this file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the vector store directory.
    #[arg(long, global = true)]
    pub vector_store_dir: Option<PathBuf>,

    /// Override the compliance catalogue directory.
    #[arg(long, global = true)]
    pub catalogue_dir: Option<PathBuf>,

    /// Number of compliance chunks retrieved per finding.
    #[arg(long, global = true)]
    pub top_k: Option<usize>,

    /// Maximum findings processed per scan type.
    #[arg(long, global = true)]
    pub max_per_type: Option<usize>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse scan reports, generate policy per finding, and analyse coverage.
    Run {
        #[arg(long)]
        sast: Option<PathBuf>,
        #[arg(long)]
        sca: Option<PathBuf>,
        #[arg(long)]
        dast: Option<PathBuf>,
        /// Directory the JSON report is written to.
        #[arg(long, default_value = "./reports")]
        output_dir: PathBuf,
    },
    /// Load a compliance catalogue file into the vector store.
    Ingest {
        /// NIST_CSF or ISO_27001.
        #[arg(long)]
        framework: String,
        /// Path to the catalogue text file. Defaults to
        /// `<catalogue_dir>/<framework>.txt` when omitted.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print the coverage report for a previously saved run.
    Coverage {
        /// Path to a saved run JSON report.
        #[arg(long)]
        run_file: PathBuf,
    },
    /// Compare a reference policy document against a saved run's generated policies.
    Compare {
        /// Path to a saved run JSON report.
        #[arg(long)]
        run_file: PathBuf,
        /// Path to the reference policy text.
        #[arg(long)]
        reference: PathBuf,
    },
}

impl Args {
    pub fn cli_overrides(&self) -> CliOverrides {
        CliOverrides {
            vector_store_dir: self.vector_store_dir.clone(),
            catalogue_dir: self.catalogue_dir.clone(),
            top_k: self.top_k,
            max_per_type: self.max_per_type,
        }
    }
}
