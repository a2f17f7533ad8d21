use std::fs::OpenOptions;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use prefetch_core::pipeline::RecordSink;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::info;

/// Where rendered records go.
#[derive(Debug, Clone)]
pub enum OutputSink {
    Stdout,
    /// Appended to, never truncated. Opened and closed once per record.
    File(PathBuf),
}

impl OutputSink {
    pub fn new(file_output: Option<PathBuf>) -> Self {
        match file_output {
            Some(path) => Self::File(path),
            None => Self::Stdout,
        }
    }
}

impl RecordSink for OutputSink {
    fn write_record(&mut self, record: &str) -> io::Result<()> {
        match self {
            Self::Stdout => {
                let mut out = io::stdout().lock();
                writeln!(out, "{record}")?;
                out.flush()
            }
            Self::File(path) => {
                info!("Writing output to {}", path.display());
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                writeln!(file, "{record}")
            }
        }
    }
}

/// Print a diagnostic on stderr, in red when stderr is a terminal.
pub fn eprintln_error(msg: &str) {
    let choice = if io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut err = StandardStream::stderr(choice);
    let _ = err.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
    let _ = writeln!(err, "{msg}");
    let _ = err.reset();
}
