//! tagwatch: scan RSS/Atom feeds for keywords and write a highlighted HTML report.
//!
//! - [`config`] loads the source list, keyword set and output options
//! - [`feed`] fetches and parses sources
//! - [`highlight`] finds and wraps keyword matches
//! - [`report`] assembles and writes the HTML document
//! - [`scan`] drives a full run

pub mod config;
pub mod feed;
pub mod highlight;
pub mod report;
pub mod scan;
pub mod util;
