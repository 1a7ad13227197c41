//! Configuration with explicit precedence: CLI args > config file (TOML) >
//! environment variables > built-in defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

fn default_store_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("govscan")
        .join("vector-store")
}

fn default_catalogue_dir() -> PathBuf {
    PathBuf::from("catalogues")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub vector_store_dir: PathBuf,
    pub catalogue_dir: PathBuf,
    pub top_k: usize,
    pub max_per_type: usize,
    pub large_model_label: String,
    pub small_model_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vector_store_dir: default_store_dir(),
            catalogue_dir: default_catalogue_dir(),
            top_k: govscan_rag::DEFAULT_TOP_K,
            max_per_type: 10,
            large_model_label: "large".to_string(),
            small_model_label: "small".to_string(),
        }
    }
}

/// Overrides read from environment variables. Every field is optional;
/// absence means "defer to the next precedence level".
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub vector_store_dir: Option<PathBuf>,
    pub catalogue_dir: Option<PathBuf>,
    pub top_k: Option<usize>,
    pub max_per_type: Option<usize>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            vector_store_dir: env::var("GOVSCAN_VECTOR_STORE_DIR").ok().map(PathBuf::from),
            catalogue_dir: env::var("GOVSCAN_CATALOGUE_DIR").ok().map(PathBuf::from),
            top_k: env::var("GOVSCAN_TOP_K").ok().and_then(|v| v.parse().ok()),
            max_per_type: env::var("GOVSCAN_MAX_PER_TYPE").ok().and_then(|v| v.parse().ok()),
        }
    }
}

/// CLI-supplied overrides, highest precedence. Mirrors [`EnvOverrides`]'s shape.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub vector_store_dir: Option<PathBuf>,
    pub catalogue_dir: Option<PathBuf>,
    pub top_k: Option<usize>,
    pub max_per_type: Option<usize>,
}

impl Config {
    /// Layer, lowest precedence first: built-in defaults, then environment
    /// variables, then an optional TOML config file (which — being a
    /// complete `Config` in its own right — supersedes whatever env set),
    /// then CLI overrides on top of everything.
    pub fn load_with_precedence(
        config_file: Option<&Path>,
        env_overrides: EnvOverrides,
        cli_overrides: CliOverrides,
    ) -> Result<Self> {
        let mut config = Config::default();

        if let Some(v) = env_overrides.vector_store_dir {
            config.vector_store_dir = v;
        }
        if let Some(v) = env_overrides.catalogue_dir {
            config.catalogue_dir = v;
        }
        if let Some(v) = env_overrides.top_k {
            config.top_k = v;
        }
        if let Some(v) = env_overrides.max_per_type {
            config.max_per_type = v;
        }

        if let Some(path) = config_file {
            config = Self::from_file(path)?;
        }

        if let Some(v) = cli_overrides.vector_store_dir {
            config.vector_store_dir = v;
        }
        if let Some(v) = cli_overrides.catalogue_dir {
            config.catalogue_dir = v;
        }
        if let Some(v) = cli_overrides.top_k {
            config.top_k = v;
        }
        if let Some(v) = cli_overrides.max_per_type {
            config.max_per_type = v;
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        if config.top_k == 0 {
            config.top_k = govscan_rag::DEFAULT_TOP_K;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_win_over_env_and_defaults() {
        let env = EnvOverrides {
            top_k: Some(3),
            ..Default::default()
        };
        let cli = CliOverrides {
            top_k: Some(7),
            ..Default::default()
        };
        let config = Config::load_with_precedence(None, env, cli).unwrap();
        assert_eq!(config.top_k, 7);
    }

    #[test]
    fn env_overrides_win_over_defaults_when_no_cli_value() {
        let env = EnvOverrides {
            max_per_type: Some(20),
            ..Default::default()
        };
        let config = Config::load_with_precedence(None, env, CliOverrides::default()).unwrap();
        assert_eq!(config.max_per_type, 20);
    }

    #[test]
    fn defaults_apply_with_no_overrides() {
        let config = Config::load_with_precedence(None, EnvOverrides::default(), CliOverrides::default()).unwrap();
        assert_eq!(config.top_k, govscan_rag::DEFAULT_TOP_K);
    }

    #[test]
    fn config_file_wins_over_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"
vector_store_dir = "/tmp/from-file"
catalogue_dir = "/tmp/from-file-catalogues"
top_k = 9
max_per_type = 12
large_model_label = "large-file"
small_model_label = "small-file"
"#,
        )
        .unwrap();

        let env = EnvOverrides {
            top_k: Some(3),
            max_per_type: Some(99),
            ..Default::default()
        };

        let config = Config::load_with_precedence(Some(file.path()), env, CliOverrides::default()).unwrap();
        assert_eq!(config.top_k, 9);
        assert_eq!(config.max_per_type, 12);
    }
}
