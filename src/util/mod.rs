//! Utility functions for common operations.
//!
//! This module provides reusable utilities for:
//!
//! - **URL validation**: scheme and shape checks for configured feed sources
//! - **Text processing**: control-character stripping and summary markup removal
//!
//! # Examples
//!
//! ```
//! use tagwatch::util::{strip_markup, validate_url};
//!
//! let url = validate_url("https://example.com/feed.xml").unwrap();
//! assert_eq!(url.scheme(), "https");
//!
//! assert_eq!(strip_markup("<p>Hello &amp; bye</p>"), "Hello & bye");
//! ```

mod text;
mod url_validator;

pub use text::{collapse_whitespace, strip_control_chars, strip_markup};
pub use url_validator::{validate_url, UrlValidationError};
