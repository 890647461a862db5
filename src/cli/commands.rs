//! Command execution: validate inputs, aggregate, render

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, instrument};

use crate::aggregate::{self, CategoryMap};
use crate::catdesc::{self, CategoryDescriptions};
use crate::cli::args::Cli;
use crate::cli::output;
use crate::errors::{ReportError, ReportResult};
use crate::maintainers::{self, InfoFileLookup};
use crate::render;
use crate::transform::LogTransformer;

/// Marker left behind by the analysis run; absence is only suspicious.
const ANALYZED_MARKER: &str = ".analyzed";

/// Configuration file that makes a directory a build-system root.
const FINK_CONF: &str = "etc/fink.conf";

pub fn execute(cli: &Cli) -> ReportResult<()> {
    validate(cli)?;

    let descriptions = match &cli.catdescs {
        Some(path) => catdesc::load(path)?,
        None => CategoryDescriptions::new(),
    };
    let comment = match &cli.comments {
        Some(path) => Some(fs::read_to_string(path).map_err(|e| ReportError::Read {
            path: path.clone(),
            source: e,
        })?),
        None => None,
    };

    run_report(cli, &descriptions, comment.as_deref())
}

/// Check the flag-specified paths up front, before any work begins.
fn validate(cli: &Cli) -> ReportResult<()> {
    if !cli.outdir.is_dir() {
        return Err(ReportError::DirNotFound(cli.outdir.clone()));
    }
    if !cli.finkdir.is_dir() {
        return Err(ReportError::DirNotFound(cli.finkdir.clone()));
    }
    let marker = cli.finkdir.join(FINK_CONF);
    if !marker.is_file() {
        return Err(ReportError::MissingMarker(marker));
    }
    if let Some(path) = &cli.catdescs {
        if !path.is_file() {
            return Err(ReportError::FileNotFound(path.clone()));
        }
    }
    if let Some(path) = &cli.comments {
        if !path.is_file() {
            return Err(ReportError::FileNotFound(path.clone()));
        }
    }
    if !cli.outdir.join(ANALYZED_MARKER).exists() {
        output::warning(&format!(
            "{} not found in {}; has the analysis been run?",
            ANALYZED_MARKER,
            cli.outdir.display()
        ));
    }
    Ok(())
}

#[instrument(level = "debug", skip_all)]
fn run_report(
    cli: &Cli,
    descriptions: &CategoryDescriptions,
    comment: Option<&str>,
) -> ReportResult<()> {
    let transformer = LogTransformer::new();
    let (tree, categories) = aggregate::aggregate(&cli.outdir, &transformer)?;
    debug!(
        "aggregated weight {} across {} packages",
        tree.weight,
        categories.len()
    );

    let lookup = InfoFileLookup::scan(&cli.finkdir)?;
    let packages: BTreeSet<String> = categories.keys().cloned().collect();
    let index = maintainers::build_index(&packages, &lookup);

    write_output(&cli.outdir.join("report.txt"), |w| {
        render::render_text(w, &tree, descriptions, comment)
    })?;
    write_output(&cli.outdir.join("report.html"), |w| {
        render::render_html(w, &tree, descriptions, comment)
    })?;
    write_output(&cli.outdir.join("pkgindex.html"), |w| {
        render::render_pkgindex(w, &categories, comment)
    })?;
    write_output(&cli.outdir.join("maintindex.html"), |w| {
        render::render_maintindex(w, &index, &lookup, &categories, comment)
    })?;

    summarize(tree.weight, &categories, index.len());
    Ok(())
}

/// Scoped writer acquisition: create, render, flush, close.
fn write_output<F>(path: &Path, render: F) -> ReportResult<()>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    let file = File::create(path).map_err(|e| ReportError::Create {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    render(&mut writer).map_err(|e| ReportError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    writer.flush().map_err(|e| ReportError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

fn summarize(total_weight: u64, categories: &CategoryMap, maintainer_count: usize) {
    let category_count = categories.values().collect::<BTreeSet<_>>().len();
    output::success("report written");
    output::detail(&format!("total weight: {total_weight}"));
    output::detail(&format!("categories:   {category_count}"));
    output::detail(&format!("packages:     {}", categories.len()));
    output::detail(&format!("maintainers:  {maintainer_count}"));
}

/// Usage hint printed after configuration errors.
pub fn usage_hint() -> String {
    format!(
        "Usage: buildreport --outdir <DIR> --finkdir <DIR> [--catdescs <FILE>] [--comments <FILE>]\n\
         The build-system root must contain {}.",
        Path::new(FINK_CONF).display()
    )
}
