//! Tree Aggregator: weighs the results directory tree
//!
//! Post-order walk of the results root. Leaf files are weighed by line count
//! (via the Log Transformer, which also rewrites them as HTML), directories
//! by the sum of their children. Each recursion step returns the built node
//! together with the package->category associations it discovered; the
//! caller merges the deltas, so no shared state mutates during the walk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::errors::{ReportError, ReportResult};
use crate::transform::LogTransformer;

/// One entry of the results tree, immutable once built.
#[derive(Debug, Clone)]
pub struct Node {
    /// File or directory name
    pub name: String,
    /// Path relative to the results root (empty for the root itself)
    pub rel_path: PathBuf,
    /// Line count for leaves, sum of children for directories
    pub weight: u64,
    /// Ordered by descending weight; empty for leaves
    pub children: Vec<Node>,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Package name -> category id (relative path of the category file)
pub type CategoryMap = BTreeMap<String, String>;

/// Report artifacts must not be re-processed on repeated runs.
fn is_artifact(name: &str) -> bool {
    name.ends_with(".html") || name.ends_with(".txt") || name.ends_with(".xml")
}

/// Build the weighted tree for `root` and collect the category map.
#[instrument(level = "debug", skip(transformer))]
pub fn aggregate(root: &Path, transformer: &LogTransformer) -> ReportResult<(Node, CategoryMap)> {
    if !root.is_dir() {
        return Err(ReportError::DirNotFound(root.to_path_buf()));
    }
    aggregate_dir(root, Path::new(""), 0, transformer)
}

fn aggregate_dir(
    dir: &Path,
    rel: &Path,
    depth: usize,
    transformer: &LogTransformer,
) -> ReportResult<(Node, CategoryMap)> {
    let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir)
        .map_err(|e| ReportError::Read {
            path: dir.to_path_buf(),
            source: e,
        })?
        .collect::<Result<_, _>>()
        .map_err(|e| ReportError::Read {
            path: dir.to_path_buf(),
            source: e,
        })?;

    // Name order first, so equal weights stay deterministic after the
    // stable weight sort below.
    entries.sort_by_key(|e| e.file_name());

    let mut children = Vec::new();
    let mut categories = CategoryMap::new();

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_artifact(&name) {
            continue;
        }
        let path = entry.path();
        let child_rel = rel.join(&name);

        let file_type = entry.file_type().map_err(|e| ReportError::Read {
            path: path.clone(),
            source: e,
        })?;

        if file_type.is_dir() {
            let (node, delta) = aggregate_dir(&path, &child_rel, depth + 1, transformer)?;
            merge_categories(&mut categories, delta);
            children.push(node);
        } else {
            let outcome = transformer.transform(&path, depth)?;
            let category_id = child_rel.to_string_lossy().into_owned();
            debug!(
                "{}: {} packages, weight {}",
                category_id,
                outcome.packages.len(),
                outcome.line_count
            );
            let mut delta = CategoryMap::new();
            for package in outcome.packages {
                delta.insert(package, category_id.clone());
            }
            merge_categories(&mut categories, delta);
            children.push(Node {
                name,
                rel_path: child_rel,
                weight: outcome.line_count,
                children: Vec::new(),
            });
        }
    }

    children.sort_by(|a, b| b.weight.cmp(&a.weight));
    let weight = children.iter().map(|c| c.weight).sum();

    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok((
        Node {
            name,
            rel_path: rel.to_path_buf(),
            weight,
            children,
        },
        categories,
    ))
}

/// Last write wins on duplicates, with a diagnostic.
fn merge_categories(into: &mut CategoryMap, delta: CategoryMap) {
    for (package, category) in delta {
        if let Some(previous) = into.insert(package.clone(), category.clone()) {
            if previous != category {
                warn!("package {package} listed in both {previous} and {category}, keeping the latter");
            }
        }
    }
}
