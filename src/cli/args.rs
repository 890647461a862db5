//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

/// Aggregate build-analysis results into linked text and HTML reports
#[derive(Parser, Debug)]
#[command(name = "buildreport")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Results directory; reports are written back into it
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub outdir: PathBuf,

    /// Build-system root (must contain etc/fink.conf)
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub finkdir: PathBuf,

    /// File of `category: description` lines
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub catdescs: Option<PathBuf>,

    /// Free-text file inserted near the top of every report page
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub comments: Option<PathBuf>,

    /// Increase log verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
