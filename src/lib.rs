//! buildreport: aggregate build-analysis results into linked reports
//!
//! Walks a results directory tree, weighs every category file by its line
//! count, and renders an overall report plus package and maintainer indexes
//! as text and HTML.

pub mod aggregate;
pub mod catdesc;
pub mod cli;
pub mod errors;
pub mod exitcode;
pub mod maintainers;
pub mod render;
pub mod transform;
pub mod util;
