//! Log Transformer: rewrites category files into linked HTML siblings
//!
//! Each line of a category file names a package log, optionally followed by
//! a free-text reason. The transformer classifies every line, writes a
//! `<file>.html` sibling with depth-adjusted anchors into the shared `logs/`
//! directory, and reports the package names found plus the total line count
//! (the category weight).

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use regex::Regex;
use tracing::{instrument, warn};

use crate::errors::{ReportError, ReportResult};
use crate::util::html;

/// Classification of one category-file line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine<'a> {
    /// `<package>.log<ws><reason>`
    WithReason { package: &'a str, reason: &'a str },
    /// `<package>.log`, possibly with trailing content that is not a reason
    WithoutReason { package: &'a str },
    /// Anything else; counts toward the weight but yields no package
    Unparsed(&'a str),
}

/// Result of transforming one category file.
#[derive(Debug)]
pub struct TransformOutcome {
    /// Package names in file order
    pub packages: Vec<String>,
    /// Total number of lines, parsed or not (the category weight)
    pub line_count: u64,
}

pub struct LogTransformer {
    with_reason: Regex,
    bare: Regex,
}

impl Default for LogTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogTransformer {
    pub fn new() -> Self {
        Self {
            with_reason: Regex::new(r"^(\S+)\.log\s+(\S.*)$").unwrap(),
            bare: Regex::new(r"^(\S+)\.log").unwrap(),
        }
    }

    /// Classify a single line without touching the filesystem.
    pub fn classify<'a>(&self, line: &'a str) -> LogLine<'a> {
        if let Some(caps) = self.with_reason.captures(line) {
            return LogLine::WithReason {
                package: caps.get(1).unwrap().as_str(),
                reason: caps.get(2).unwrap().as_str(),
            };
        }
        if let Some(caps) = self.bare.captures(line) {
            return LogLine::WithoutReason {
                package: caps.get(1).unwrap().as_str(),
            };
        }
        LogLine::Unparsed(line)
    }

    /// Rewrite `path` into `path.html` and collect the package names.
    ///
    /// `depth` is the nesting level of the file below the report root; each
    /// level adds one `../` segment so the anchors resolve to the shared
    /// `logs/` directory regardless of where the category file sits.
    #[instrument(level = "debug", skip(self))]
    pub fn transform(&self, path: &Path, depth: usize) -> ReportResult<TransformOutcome> {
        let file = File::open(path).map_err(|e| ReportError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let reader = BufReader::new(file);

        let html_path = html_sibling(path);
        let out = File::create(&html_path).map_err(|e| ReportError::Create {
            path: html_path.clone(),
            source: e,
        })?;
        let mut writer = BufWriter::new(out);

        let prefix = "../".repeat(depth);
        let mut packages = Vec::new();
        let mut line_count = 0u64;

        for line in reader.lines() {
            let line = line.map_err(|e| ReportError::Read {
                path: path.to_path_buf(),
                source: e,
            })?;
            line_count += 1;

            let rendered = match self.classify(&line) {
                LogLine::WithReason { package, reason } => {
                    packages.push(package.to_string());
                    format!(
                        "<a href=\"{prefix}logs/{package}.log\">{package}</a> ({})<br>",
                        html::escape(reason)
                    )
                }
                LogLine::WithoutReason { package } => {
                    packages.push(package.to_string());
                    format!("<a href=\"{prefix}logs/{package}.log\">{package}</a><br>")
                }
                LogLine::Unparsed(raw) => {
                    warn!("{}:{}: unparsed line: {raw:?}", path.display(), line_count);
                    format!("{}<br>", html::escape(raw))
                }
            };
            writeln!(writer, "{rendered}").map_err(|e| ReportError::Write {
                path: html_path.clone(),
                source: e,
            })?;
        }

        writer.flush().map_err(|e| ReportError::Write {
            path: html_path.clone(),
            source: e,
        })?;

        Ok(TransformOutcome {
            packages,
            line_count,
        })
    }
}

/// `foo/gcc-fail` -> `foo/gcc-fail.html` (appends, does not replace)
fn html_sibling(path: &Path) -> std::path::PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".html");
    path.with_file_name(name)
}
