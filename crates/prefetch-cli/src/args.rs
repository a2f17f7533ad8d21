use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use prefetch_core::config::{AlgorithmSelection, OutputMode, RunConfig};

const EXAMPLES: &str = r#"Examples:
  Create a prefetch statement from a URL:

    make-prefetch http://example.com/hello.txt

  Create a prefetch statement from a file:

    make-prefetch hello.txt

  Create a prefetch statement from a directory:

    make-prefetch "C:\Temp\BigFix\ManifestSource"

  Create a 9.0 style prefetch statement:

    make-prefetch --algorithm sha1 hello.txt

  Create a 7.2 style prefetch statement:

    make-prefetch --algorithm sha1 --output davis hello.txt

  Process a certain type of files in a directory and output the prefetches to a file:

    make-prefetch -o manifest -p "*.bfa" -r -f "C:\Temp\BigFix\manifest.txt" "C:\Temp\BigFix\ManifestSource"
"#;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "make-prefetch",
    version,
    about = "Create a prefetch statement for BigFix ActionScript",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// File, URL or directory to describe.
    pub source: String,

    /// Hash algorithm to use.
    #[arg(short, long, value_enum, default_value_t = AlgorithmArg::All)]
    pub algorithm: AlgorithmArg,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputArg::Prefetch)]
    pub output: OutputArg,

    /// The name to use for the file (default: the name of the file).
    #[arg(short, long)]
    pub name: Option<String>,

    /// The url to use for the file (default: the url of the file).
    /// The manifest format appends the file name to this url.
    #[arg(short, long)]
    pub url: Option<String>,

    /// Append the output to this file instead of printing it.
    #[arg(short = 'f', long = "file_output", value_name = "FILE_OUTPUT")]
    pub file_output: Option<PathBuf>,

    /// Recursively process the source directory.
    #[arg(short, long)]
    pub recursive: bool,

    /// Wildcard pattern used when processing a source directory.
    #[arg(short, long, default_value = prefetch_core::defaults::PATTERN)]
    pub pattern: String,

    /// Print additional messages to stderr to aid in troubleshooting.
    #[arg(short, long)]
    pub verbose: bool,

    /// Give up on a remote download after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmArg {
    All,
    Sha1,
    Sha256,
}

impl From<AlgorithmArg> for AlgorithmSelection {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::All => Self::Both,
            AlgorithmArg::Sha1 => Self::Sha1,
            AlgorithmArg::Sha256 => Self::Sha256,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputArg {
    Prefetch,
    Davis,
    Value,
    Manifest,
}

impl From<OutputArg> for OutputMode {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Prefetch => Self::Prefetch,
            OutputArg::Davis => Self::Davis,
            OutputArg::Value => Self::Value,
            OutputArg::Manifest => Self::Manifest,
        }
    }
}

/// True when `-h` or `--help` appears anywhere on the command line.
pub fn wants_help<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter().any(|a| matches!(a.as_ref(), "-h" | "--help"))
}

impl Cli {
    pub fn to_config(&self) -> RunConfig {
        let mut cfg = RunConfig::new(self.source.clone());
        cfg.algorithm = self.algorithm.into();
        cfg.mode = self.output.into();
        cfg.resolve.name = self.name.clone();
        cfg.resolve.url = self.url.clone();
        cfg.enumerate.pattern = self.pattern.clone();
        cfg.enumerate.recursive = self.recursive;
        cfg.fetch.timeout = self.timeout.map(Duration::from_secs);
        cfg
    }
}
