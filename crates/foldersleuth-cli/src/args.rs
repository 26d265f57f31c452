/// Command-line arguments parsed via clap.
///
/// Every tunable is optional here so that an absent flag falls through to
/// the configuration file and environment (see [`crate::config`]).
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use foldersleuth_core::TieBreak;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "foldersleuth",
    version,
    about = "Folder statistics analyser: sizes, file types, ages and document summaries"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file (defaults to ./foldersleuth.toml when present)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Maximum level for the stderr log subscriber.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Aggregate sizes, counts, extensions and oldest/newest item under a folder
    Analyze(AnalyzeArgs),
    /// List every file and folder with its metadata
    List(ListArgs),
    /// Summarise the text documents under a folder
    Summarize(SummarizeArgs),
}

/// Output destination and format, shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write to a file instead of stdout
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Folder to analyse
    #[arg(value_hint = ValueHint::DirPath)]
    pub path: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Aggregate subdirectories on a thread pool
    #[arg(long)]
    pub parallel: bool,

    /// Worker threads for --parallel (defaults to the CPU count)
    #[arg(long, requires = "parallel")]
    pub threads: Option<usize>,

    /// How equal modification times pick the oldest/newest item
    #[arg(long, value_enum)]
    pub tie_break: Option<TieBreakArg>,

    /// Give up after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Also show the file category breakdown
    #[arg(long)]
    pub categories: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Folder to list
    #[arg(value_hint = ValueHint::DirPath)]
    pub path: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Descend at most this many levels below the folder
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Show an indented tree outline instead of a table
    #[arg(long)]
    pub tree: bool,

    /// Also show the N largest files
    #[arg(long)]
    pub top: Option<usize>,

    /// Also show files not modified for at least N days
    #[arg(long)]
    pub stale_days: Option<u64>,

    /// Walk with a rayon thread pool
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SummarizeArgs {
    /// Folder to search for documents
    #[arg(value_hint = ValueHint::DirPath)]
    pub path: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Word budget per summary
    #[arg(long)]
    pub limit: Option<usize>,

    /// Characters of text read from each document
    #[arg(long)]
    pub max_chars: Option<usize>,

    /// File extensions to summarise (comma separated, e.g. txt,md)
    #[arg(long, value_delimiter = ',')]
    pub ext: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum TieBreakArg {
    FirstSeen,
    PathOrder,
}

impl From<TieBreakArg> for TieBreak {
    fn from(value: TieBreakArg) -> Self {
        match value {
            TieBreakArg::FirstSeen => TieBreak::FirstSeen,
            TieBreakArg::PathOrder => TieBreak::PathOrder,
        }
    }
}

impl From<TieBreak> for TieBreakArg {
    fn from(value: TieBreak) -> Self {
        match value {
            TieBreak::FirstSeen => TieBreakArg::FirstSeen,
            TieBreak::PathOrder => TieBreakArg::PathOrder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_flags_parse() {
        let cli = Cli::try_parse_from([
            "foldersleuth",
            "analyze",
            "/data",
            "--format",
            "json",
            "--parallel",
            "--threads",
            "4",
            "--tie-break",
            "path-order",
            "--timeout-secs",
            "30",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.path, PathBuf::from("/data"));
        assert_eq!(args.output.format, Some(OutputFormat::Json));
        assert!(args.parallel);
        assert_eq!(args.threads, Some(4));
        assert_eq!(args.tie_break, Some(TieBreakArg::PathOrder));
        assert_eq!(args.timeout_secs, Some(30));
        assert!(!args.categories);
    }

    #[test]
    fn threads_require_parallel() {
        let result = Cli::try_parse_from(["foldersleuth", "analyze", "/data", "--threads", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["foldersleuth", "-q", "-v", "list", "/data"]);
        assert!(result.is_err());
    }

    #[test]
    fn list_and_summarize_flags_parse() {
        let cli = Cli::try_parse_from([
            "foldersleuth",
            "list",
            "/data",
            "--tree",
            "--max-depth",
            "2",
            "--top",
            "5",
            "--stale-days",
            "365",
        ])
        .unwrap();
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert!(args.tree);
        assert_eq!(args.max_depth, Some(2));
        assert_eq!(args.top, Some(5));
        assert_eq!(args.stale_days, Some(365));

        let cli = Cli::try_parse_from([
            "foldersleuth",
            "--quiet",
            "summarize",
            "/docs",
            "--limit",
            "40",
            "--ext",
            "txt,md",
            "-o",
            "out.csv",
            "-f",
            "csv",
        ])
        .unwrap();
        assert_eq!(cli.log_level(), tracing::Level::ERROR);
        let Command::Summarize(args) = cli.command else {
            panic!("expected summarize");
        };
        assert_eq!(args.limit, Some(40));
        assert_eq!(args.ext, vec!["txt".to_string(), "md".to_string()]);
        assert_eq!(args.output.output, Some(PathBuf::from("out.csv")));
        assert_eq!(args.output.format, Some(OutputFormat::Csv));
    }

    #[test]
    fn tie_break_maps_both_ways() {
        for arg in [TieBreakArg::FirstSeen, TieBreakArg::PathOrder] {
            assert_eq!(TieBreakArg::from(TieBreak::from(arg)), arg);
        }
    }
}
