//! Report Renderer: text/HTML tree report plus package and maintainer indexes
//!
//! All render functions take an explicit writer, so callers control where
//! the bytes go and when the handles close. Output is fully determined by
//! the inputs; rendering the same tree twice yields byte-identical files.

use std::io::{self, Write};
use std::path::Path;

use crate::aggregate::{CategoryMap, Node};
use crate::catdesc::CategoryDescriptions;
use crate::maintainers::{self, MaintainerIndex, MaintainerLookup};
use crate::util::html::{escape, pad_weight, pad_weight_html};

/// Nested text report, one tab per nesting level.
pub fn render_text(
    w: &mut dyn Write,
    tree: &Node,
    descriptions: &CategoryDescriptions,
    comment: Option<&str>,
) -> io::Result<()> {
    writeln!(w, "Build Results")?;
    writeln!(w)?;
    if let Some(comment) = comment {
        writeln!(w, "{comment}")?;
        writeln!(w)?;
    }
    render_text_node(w, tree, 0, descriptions)
}

fn render_text_node(
    w: &mut dyn Write,
    node: &Node,
    level: usize,
    descriptions: &CategoryDescriptions,
) -> io::Result<()> {
    for child in &node.children {
        let indent = "\t".repeat(level);
        if child.is_leaf() {
            match descriptions.get(&child.name) {
                Some(desc) => writeln!(
                    w,
                    "{indent}{}{}: {desc}",
                    pad_weight(child.weight),
                    child.name
                )?,
                None => writeln!(w, "{indent}{}{}", pad_weight(child.weight), child.name)?,
            }
        } else {
            writeln!(w, "{indent}{}{}", pad_weight(child.weight), child.name)?;
            render_text_node(w, child, level + 1, descriptions)?;
        }
    }
    Ok(())
}

/// Nested HTML report mirroring the text layout with `<ul>` nesting.
pub fn render_html(
    w: &mut dyn Write,
    tree: &Node,
    descriptions: &CategoryDescriptions,
    comment: Option<&str>,
) -> io::Result<()> {
    page_open(w, "Build Results", comment)?;
    render_html_node(w, tree, descriptions)?;
    page_close(w)
}

fn render_html_node(
    w: &mut dyn Write,
    node: &Node,
    descriptions: &CategoryDescriptions,
) -> io::Result<()> {
    writeln!(w, "<ul>")?;
    for child in &node.children {
        if child.is_leaf() {
            write!(
                w,
                "<li>{}<a href=\"{}.html\">{}</a>",
                pad_weight_html(child.weight),
                href(&child.rel_path),
                escape(&child.name)
            )?;
            if let Some(desc) = descriptions.get(&child.name) {
                write!(w, ": {}", escape(desc))?;
            }
            writeln!(w, "</li>")?;
        } else {
            writeln!(
                w,
                "<li>{}{}",
                pad_weight_html(child.weight),
                escape(&child.name)
            )?;
            render_html_node(w, child, descriptions)?;
            writeln!(w, "</li>")?;
        }
    }
    writeln!(w, "</ul>")
}

/// Flat index, ascending by package name, each entry linking to its
/// category page.
pub fn render_pkgindex(
    w: &mut dyn Write,
    categories: &CategoryMap,
    comment: Option<&str>,
) -> io::Result<()> {
    page_open(w, "Packages by Name", comment)?;
    writeln!(w, "<ul>")?;
    for (package, category) in categories {
        writeln!(
            w,
            "<li><a href=\"{}.html\">{}</a></li>",
            href(Path::new(category)),
            escape(package)
        )?;
    }
    writeln!(w, "</ul>")?;
    page_close(w)
}

/// Flat index grouped by maintainer, both levels ascending.
pub fn render_maintindex(
    w: &mut dyn Write,
    index: &MaintainerIndex,
    lookup: &dyn MaintainerLookup,
    categories: &CategoryMap,
    comment: Option<&str>,
) -> io::Result<()> {
    page_open(w, "Packages by Maintainer", comment)?;
    for (id, packages) in index {
        writeln!(w, "<h3>{}</h3>", escape(&maintainers::display(lookup, id)))?;
        writeln!(w, "<ul>")?;
        for package in packages {
            match categories.get(package) {
                Some(category) => writeln!(
                    w,
                    "<li><a href=\"{}.html\">{}</a></li>",
                    href(Path::new(category)),
                    escape(package)
                )?,
                None => writeln!(w, "<li>{}</li>", escape(package))?,
            }
        }
        writeln!(w, "</ul>")?;
    }
    page_close(w)
}

fn page_open(w: &mut dyn Write, title: &str, comment: Option<&str>) -> io::Result<()> {
    writeln!(w, "<html><head><title>{}</title></head><body>", escape(title))?;
    writeln!(w, "<h1>{}</h1>", escape(title))?;
    if let Some(comment) = comment {
        // Caller-supplied block, embedded verbatim (may contain markup)
        writeln!(w, "{comment}")?;
    }
    Ok(())
}

fn page_close(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "</body></html>")
}

/// Href with forward slashes regardless of platform separator.
fn href(rel: &Path) -> String {
    escape(&rel.to_string_lossy().replace('\\', "/"))
}
