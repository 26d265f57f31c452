use crate::args::{AnalyzeArgs, ListArgs, OutputFormat, SummarizeArgs};
use anyhow::{Context, Result};
use figment::{
    providers::{Data, Env, Format, Serialized, Toml},
    Figment,
};
use foldersleuth_core::summary::{
    extract::PLAIN_TEXT_EXTENSIONS, DEFAULT_MAX_CHARS, DEFAULT_SUMMARY_LIMIT,
};
use foldersleuth_core::TieBreak;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "foldersleuth.toml";

/// Environment prefix. Nested keys use `__`, e.g. `FOLDERSLEUTH_SCAN__PARALLEL=true`.
pub const ENV_PREFIX: &str = "FOLDERSLEUTH_";

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub summary: SummaryConfig,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    pub parallel: bool,
    pub threads: Option<usize>,
    pub tie_break: TieBreak,
    pub timeout_seconds: Option<u64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Cap on rows in the stale-file view.
    pub stale_limit: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SummaryConfig {
    pub limit: usize,
    pub max_chars: usize,
    pub extensions: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            stale_limit: 50,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SUMMARY_LIMIT,
            max_chars: DEFAULT_MAX_CHARS,
            extensions: PLAIN_TEXT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Command-line flags win over every other layer.
    pub fn apply_analyze_overrides(&mut self, args: &AnalyzeArgs) {
        if let Some(format) = args.output.format {
            self.output.format = format;
        }
        if args.parallel {
            self.scan.parallel = true;
        }
        if args.threads.is_some() {
            self.scan.threads = args.threads;
        }
        if let Some(tie_break) = args.tie_break {
            self.scan.tie_break = tie_break.into();
        }
        if args.timeout_secs.is_some() {
            self.scan.timeout_seconds = args.timeout_secs;
        }
    }

    pub fn apply_list_overrides(&mut self, args: &ListArgs) {
        if let Some(format) = args.output.format {
            self.output.format = format;
        }
        if args.parallel {
            self.scan.parallel = true;
        }
    }

    pub fn apply_summarize_overrides(&mut self, args: &SummarizeArgs) {
        if let Some(format) = args.output.format {
            self.output.format = format;
        }
        if let Some(limit) = args.limit {
            self.summary.limit = limit;
        }
        if let Some(max_chars) = args.max_chars {
            self.summary.max_chars = max_chars;
        }
        if !args.ext.is_empty() {
            self.summary.extensions = args.ext.clone();
        }
    }
}

/// Loads [`AppConfig`] with layered priority: defaults < TOML file < environment.
pub struct ConfigLoader {
    config_path: PathBuf,
    required: bool,
}

impl ConfigLoader {
    /// An explicit path must exist; without one, [`DEFAULT_CONFIG_FILE`] in
    /// the working directory is used if present.
    pub fn new(explicit: Option<&Path>) -> Self {
        match explicit {
            Some(path) => Self {
                config_path: path.to_path_buf(),
                required: true,
            },
            None => Self {
                config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
                required: false,
            },
        }
    }

    pub fn load(&self) -> Result<AppConfig> {
        let path = &self.config_path;
        let file = if path.exists() {
            tracing::debug!("Reading configuration from {}", path.display());
            Some(Toml::file(path))
        } else if self.required {
            anyhow::bail!("Configuration file {} does not exist", path.display());
        } else {
            None
        };

        layered(file)
            .extract()
            .context("Failed to load configuration")
    }
}

/// The provider stack shared by [`ConfigLoader::load`] and the tests.
fn layered(file: Option<Data<Toml>>) -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));
    if let Some(file) = file {
        figment = figment.merge(file);
    }
    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::TieBreakArg;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        let config: AppConfig = layered(None).extract().unwrap();
        assert!(!config.scan.parallel);
        assert_eq!(config.scan.tie_break, TieBreak::FirstSeen);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.summary.limit, 150);
        assert_eq!(config.summary.max_chars, 120_000);
        assert!(config.summary.extensions.iter().any(|e| e == "txt"));
    }

    #[test]
    fn toml_layer_overrides_defaults() {
        let toml = Toml::string(
            r#"
            [scan]
            parallel = true
            threads = 3
            tie_break = "path-order"

            [output]
            format = "csv"

            [summary]
            limit = 60
            "#,
        );
        let config: AppConfig = layered(Some(toml)).extract().unwrap();
        assert!(config.scan.parallel);
        assert_eq!(config.scan.threads, Some(3));
        assert_eq!(config.scan.tie_break, TieBreak::PathOrder);
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.output.stale_limit, 50);
        assert_eq!(config.summary.limit, 60);
        assert_eq!(config.summary.max_chars, DEFAULT_MAX_CHARS);
    }

    #[test]
    fn invalid_value_is_an_error() {
        let toml = Toml::string("[output]\nformat = \"yaml\"\n");
        assert!(layered(Some(toml)).extract::<AppConfig>().is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("absent.toml");
        assert!(ConfigLoader::new(Some(&missing)).load().is_err());
    }

    #[test]
    fn explicit_file_is_read() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "[scan]\ntimeout_seconds = 9\n").unwrap();

        let config = ConfigLoader::new(Some(&path)).load().unwrap();
        assert_eq!(config.scan.timeout_seconds, Some(9));
    }

    #[test]
    fn flags_override_loaded_values() {
        let mut config = AppConfig::default();
        config.scan.timeout_seconds = Some(100);

        let args = AnalyzeArgs {
            path: PathBuf::from("."),
            output: crate::args::OutputArgs {
                format: Some(OutputFormat::Json),
                output: None,
            },
            parallel: true,
            threads: None,
            tie_break: Some(TieBreakArg::PathOrder),
            timeout_secs: Some(5),
            categories: false,
        };
        config.apply_analyze_overrides(&args);

        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.scan.parallel);
        assert_eq!(config.scan.tie_break, TieBreak::PathOrder);
        assert_eq!(config.scan.timeout_seconds, Some(5));
    }

    #[test]
    fn summarize_extension_override_replaces_list() {
        let mut config = AppConfig::default();
        let args = SummarizeArgs {
            path: PathBuf::from("."),
            output: Default::default(),
            limit: None,
            max_chars: Some(10),
            ext: vec!["rst".into()],
        };
        config.apply_summarize_overrides(&args);
        assert_eq!(config.summary.extensions, vec!["rst".to_string()]);
        assert_eq!(config.summary.max_chars, 10);
        assert_eq!(config.summary.limit, DEFAULT_SUMMARY_LIMIT);
    }
}
