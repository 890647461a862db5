//! End-to-end tests: full report run through the command layer

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};

use buildreport::cli::args::Cli;
use buildreport::cli::commands::execute;
use buildreport::errors::ReportError;

struct Fixture {
    _dir: TempDir,
    outdir: PathBuf,
    finkdir: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempdir().unwrap();

    let outdir = dir.path().join("results");
    let build = outdir.join("build");
    fs::create_dir_all(&build).unwrap();
    fs::write(build.join("gcc-fail"), "foo.log  missing header\nbar.log\nbaz.log\n").unwrap();
    fs::write(build.join("timeout"), "slowpkg.log  wall clock exceeded\n").unwrap();
    fs::write(outdir.join("ok"), "quickpkg.log\n").unwrap();
    fs::write(outdir.join(".analyzed"), "").unwrap();

    let finkdir = dir.path().join("sw");
    fs::create_dir_all(finkdir.join("etc")).unwrap();
    fs::write(finkdir.join("etc/fink.conf"), "Trees: stable\n").unwrap();
    let finkinfo = finkdir.join("dists/stable/finkinfo");
    fs::create_dir_all(&finkinfo).unwrap();
    fs::write(
        finkinfo.join("foo.info"),
        "Package: foo\nVersion: 1.0\nMaintainer: Ada Lovelace <ada@example.org>\n",
    )
    .unwrap();
    fs::write(
        finkinfo.join("slowpkg.info"),
        "Package: slowpkg\nMaintainer: bob@example.org\n",
    )
    .unwrap();

    Fixture {
        _dir: dir,
        outdir,
        finkdir,
    }
}

fn cli(f: &Fixture) -> Cli {
    Cli {
        outdir: f.outdir.clone(),
        finkdir: f.finkdir.clone(),
        catdescs: None,
        comments: None,
        verbose: 0,
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

// ============================================================
// Happy Path Tests
// ============================================================

#[test]
fn given_valid_inputs_when_executing_then_all_four_reports_written() {
    let f = fixture();
    execute(&cli(&f)).unwrap();

    for name in ["report.txt", "report.html", "pkgindex.html", "maintindex.html"] {
        assert!(f.outdir.join(name).is_file(), "{name} missing");
    }
}

#[test]
fn given_valid_inputs_when_executing_then_text_report_ordered_and_weighted() {
    let f = fixture();
    execute(&cli(&f)).unwrap();

    let txt = read(&f.outdir.join("report.txt"));
    assert!(txt.contains("4   build"));
    assert!(txt.contains("\t3   gcc-fail"));
    assert!(txt.contains("\t1   timeout"));
    assert!(txt.contains("1   ok"));

    let build = txt.find("4   build").unwrap();
    let ok = txt.find("1   ok").unwrap();
    assert!(build < ok, "heavier sibling must render first");
}

#[test]
fn given_valid_inputs_when_executing_then_pkgindex_links_to_categories() {
    let f = fixture();
    execute(&cli(&f)).unwrap();

    let pkg = read(&f.outdir.join("pkgindex.html"));
    assert!(pkg.contains("<a href=\"build/gcc-fail.html\">foo</a>"));
    assert!(pkg.contains("<a href=\"build/timeout.html\">slowpkg</a>"));
    assert!(pkg.contains("<a href=\"ok.html\">quickpkg</a>"));

    // Ascending package order
    let bar = pkg.find(">bar<").unwrap();
    let slow = pkg.find(">slowpkg<").unwrap();
    assert!(bar < slow);
}

#[test]
fn given_maintainer_info_when_executing_then_maintindex_groups_and_obfuscates() {
    let f = fixture();
    execute(&cli(&f)).unwrap();

    let maint = read(&f.outdir.join("maintindex.html"));
    // Display name where available
    assert!(maint.contains("<h3>Ada Lovelace</h3>"));
    // Obfuscated email fallback where not
    assert!(maint.contains("<h3>bob _at_ example.org</h3>"));
    assert!(!maint.contains("bob@example.org"));
    // Unresolved packages grouped under "unknown"
    assert!(maint.contains("<h3>unknown</h3>"));
    assert!(maint.contains("<a href=\"build/gcc-fail.html\">bar</a>"));
}

#[test]
fn given_descriptions_and_comments_when_executing_then_embedded() {
    let f = fixture();
    let catdescs = f.outdir.parent().unwrap().join("catdescs");
    fs::write(&catdescs, "gcc-fail: compiler aborted\ntimeout: build timed out\n").unwrap();
    let comments = f.outdir.parent().unwrap().join("comments");
    fs::write(&comments, "nightly run 42\n").unwrap();

    let mut cli = cli(&f);
    cli.catdescs = Some(catdescs);
    cli.comments = Some(comments);
    execute(&cli).unwrap();

    let txt = read(&f.outdir.join("report.txt"));
    assert!(txt.contains("gcc-fail: compiler aborted"));
    assert!(txt.contains("nightly run 42"));

    for name in ["report.html", "pkgindex.html", "maintindex.html"] {
        assert!(
            read(&f.outdir.join(name)).contains("nightly run 42"),
            "comment missing from {name}"
        );
    }
}

// ============================================================
// Idempotence Tests
// ============================================================

#[test]
fn given_unchanged_inputs_when_executing_twice_then_reports_identical() {
    let f = fixture();
    let cli = cli(&f);
    execute(&cli).unwrap();
    let first: Vec<String> = ["report.txt", "report.html", "pkgindex.html", "maintindex.html"]
        .iter()
        .map(|n| read(&f.outdir.join(n)))
        .collect();

    execute(&cli).unwrap();
    let second: Vec<String> = ["report.txt", "report.html", "pkgindex.html", "maintindex.html"]
        .iter()
        .map(|n| read(&f.outdir.join(n)))
        .collect();

    assert_eq!(first, second);
}

// ============================================================
// Validation Failure Tests
// ============================================================

#[test]
fn given_missing_outdir_when_executing_then_dir_not_found() {
    let f = fixture();
    let mut cli = cli(&f);
    cli.outdir = f.outdir.join("absent");
    assert!(matches!(
        execute(&cli),
        Err(ReportError::DirNotFound(_))
    ));
}

#[test]
fn given_finkdir_without_conf_when_executing_then_missing_marker() {
    let f = fixture();
    fs::remove_file(f.finkdir.join("etc/fink.conf")).unwrap();
    assert!(matches!(
        execute(&cli(&f)),
        Err(ReportError::MissingMarker(_))
    ));
}

#[test]
fn given_malformed_catdescs_when_executing_then_fatal_with_line_number() {
    let f = fixture();
    let catdescs = f.outdir.parent().unwrap().join("catdescs");
    fs::write(&catdescs, "gcc-fail: compiler aborted\nno colon here\n").unwrap();

    let mut cli = cli(&f);
    cli.catdescs = Some(catdescs);
    match execute(&cli) {
        Err(ReportError::MalformedDescription { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected MalformedDescription, got {other:?}"),
    }
}

#[test]
fn given_missing_analyzed_marker_when_executing_then_run_still_succeeds() {
    let f = fixture();
    fs::remove_file(f.outdir.join(".analyzed")).unwrap();
    assert!(execute(&cli(&f)).is_ok());
}
