//! Maintainer lookup and the by-maintainer index
//!
//! The renderer only needs three function-shaped operations: resolve a set
//! of package names to maintainer identifiers, and look up display name and
//! email per identifier. `InfoFileLookup` implements them by scanning the
//! build-system directory for package `.info` files.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::errors::{ReportError, ReportResult};

/// Identifier used when a package has no known maintainer.
pub const UNKNOWN_MAINTAINER: &str = "unknown";

pub trait MaintainerLookup {
    /// Map each package to its maintainer identifier, where known.
    fn resolve(&self, packages: &BTreeSet<String>) -> BTreeMap<String, String>;

    fn display_name(&self, id: &str) -> Option<String>;

    fn email(&self, id: &str) -> Option<String>;
}

/// Maintainer id -> packages, both sorted ascending.
pub type MaintainerIndex = BTreeMap<String, BTreeSet<String>>;

/// Group the category-map packages by maintainer. Packages the lookup cannot
/// resolve land under [`UNKNOWN_MAINTAINER`].
pub fn build_index(packages: &BTreeSet<String>, lookup: &dyn MaintainerLookup) -> MaintainerIndex {
    let resolved = lookup.resolve(packages);
    let mut index = MaintainerIndex::new();
    for package in packages {
        let id = resolved
            .get(package)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_MAINTAINER);
        index
            .entry(id.to_string())
            .or_default()
            .insert(package.clone());
    }
    index
}

/// Display form for a maintainer: display name, else the obfuscated email,
/// else the identifier itself.
pub fn display(lookup: &dyn MaintainerLookup, id: &str) -> String {
    if let Some(name) = lookup.display_name(id) {
        return name;
    }
    if let Some(email) = lookup.email(id) {
        return obfuscate_email(&email);
    }
    id.to_string()
}

/// `user@example.org` -> `user _at_ example.org`
pub fn obfuscate_email(email: &str) -> String {
    email.replace('@', " _at_ ")
}

#[derive(Debug, Clone)]
struct MaintainerInfo {
    name: Option<String>,
    email: String,
}

/// Lookup backed by `Package:` / `Maintainer:` fields in `.info` files
/// below the build-system root.
pub struct InfoFileLookup {
    /// package -> maintainer id (the email address)
    packages: BTreeMap<String, String>,
    /// maintainer id -> parsed identity
    maintainers: BTreeMap<String, MaintainerInfo>,
}

impl InfoFileLookup {
    /// Scan `finkdir` once; later lookups are in-memory.
    #[instrument(level = "debug")]
    pub fn scan(finkdir: &Path) -> ReportResult<Self> {
        let package_re = Regex::new(r"(?i)^Package:\s*(\S+)").unwrap();
        // `Maintainer: First Last <user@host>` or just `Maintainer: user@host`
        let maintainer_re = Regex::new(r"(?i)^Maintainer:\s*(?:(.*?)\s*<([^>]+)>|(\S+@\S+))\s*$")
            .unwrap();

        let mut packages = BTreeMap::new();
        let mut maintainers = BTreeMap::new();

        for entry in WalkDir::new(finkdir) {
            let entry = entry?;
            if !entry.file_type().is_file()
                || entry.path().extension().map_or(true, |e| e != "info")
            {
                continue;
            }

            let file = File::open(entry.path()).map_err(|e| ReportError::Read {
                path: entry.path().to_path_buf(),
                source: e,
            })?;
            let reader = BufReader::new(file);

            let mut package: Option<String> = None;
            let mut info: Option<MaintainerInfo> = None;

            for line in reader.lines() {
                let line = line.map_err(|e| ReportError::Read {
                    path: entry.path().to_path_buf(),
                    source: e,
                })?;
                if let Some(caps) = package_re.captures(&line) {
                    package = Some(caps.get(1).unwrap().as_str().to_string());
                } else if let Some(caps) = maintainer_re.captures(&line) {
                    info = Some(match (caps.get(1), caps.get(2), caps.get(3)) {
                        (name, Some(email), _) => MaintainerInfo {
                            name: name
                                .map(|m| m.as_str().to_string())
                                .filter(|n| !n.is_empty()),
                            email: email.as_str().to_string(),
                        },
                        (_, _, Some(email)) => MaintainerInfo {
                            name: None,
                            email: email.as_str().to_string(),
                        },
                        _ => continue,
                    });
                }
            }

            if let (Some(package), Some(info)) = (package, info) {
                debug!("{}: maintained by {}", package, info.email);
                packages.insert(package, info.email.clone());
                maintainers.insert(info.email.clone(), info);
            }
        }

        Ok(Self {
            packages,
            maintainers,
        })
    }
}

impl MaintainerLookup for InfoFileLookup {
    fn resolve(&self, packages: &BTreeSet<String>) -> BTreeMap<String, String> {
        packages
            .iter()
            .filter_map(|p| self.packages.get(p).map(|id| (p.clone(), id.clone())))
            .collect()
    }

    fn display_name(&self, id: &str) -> Option<String> {
        self.maintainers.get(id).and_then(|m| m.name.clone())
    }

    fn email(&self, id: &str) -> Option<String> {
        self.maintainers.get(id).map(|m| m.email.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn given_email_when_obfuscating_then_at_replaced() {
        assert_eq!(obfuscate_email("user@example.org"), "user _at_ example.org");
    }

    #[test]
    fn given_info_files_when_scanning_then_packages_resolve() {
        let dir = tempdir().unwrap();
        let finkinfo = dir.path().join("dists/stable/finkinfo");
        fs::create_dir_all(&finkinfo).unwrap();
        fs::write(
            finkinfo.join("foo.info"),
            "Package: foo\nVersion: 1.0\nMaintainer: Ada Lovelace <ada@example.org>\n",
        )
        .unwrap();
        fs::write(
            finkinfo.join("bar.info"),
            "Package: bar\nMaintainer: bob@example.org\n",
        )
        .unwrap();

        let lookup = InfoFileLookup::scan(dir.path()).unwrap();
        let packages: BTreeSet<String> =
            ["foo", "bar", "baz"].iter().map(|s| s.to_string()).collect();
        let resolved = lookup.resolve(&packages);

        assert_eq!(resolved["foo"], "ada@example.org");
        assert_eq!(resolved["bar"], "bob@example.org");
        assert!(!resolved.contains_key("baz"));

        assert_eq!(
            lookup.display_name("ada@example.org").as_deref(),
            Some("Ada Lovelace")
        );
        assert_eq!(lookup.display_name("bob@example.org"), None);
        assert_eq!(
            display(&lookup, "bob@example.org"),
            "bob _at_ example.org"
        );
    }

    #[test]
    fn given_unresolved_packages_when_indexing_then_grouped_as_unknown() {
        let dir = tempdir().unwrap();
        let lookup = InfoFileLookup::scan(dir.path()).unwrap();
        let packages: BTreeSet<String> = ["baz".to_string()].into_iter().collect();

        let index = build_index(&packages, &lookup);
        assert!(index[UNKNOWN_MAINTAINER].contains("baz"));
    }
}
