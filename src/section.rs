//! Extraction of marked code sections from source files.
//!
//! A section is the text between a line holding the start marker and the next
//! line containing the end marker:
//!
//! ```text
//! //@API_DOC_SECTION_START
//! ...captured...
//!     //@API_DOC_SECTION_END
//! ```

use log::{debug, warn};
use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;

/// Default start marker of a spliceable section
pub const SECTION_START: &str = "//@API_DOC_SECTION_START";
/// Default end marker of a spliceable section
pub const SECTION_END: &str = "//@API_DOC_SECTION_END";

/// Text captured for one splice marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSection {
    /// Splice marker name in the target file, e.g. `@MAIN_COPY`
    pub marker: String,
    /// Captured text, `None` when the source had no such section
    pub text: Option<String>,
}

/// Finds the section delimited by `start` and `end` in `content`.
///
/// `start` must be followed directly by a newline. The capture stops before the
/// first later line that contains `end`, and trailing whitespace is trimmed.
pub fn find_section(content: &str, start: &str, end: &str) -> Option<String> {
    let pattern = format!(
        r"(?s){}\n(.*?)\n[^\n]*{}",
        regex::escape(start),
        regex::escape(end)
    );
    // Escaped markers always form a valid pattern
    let re = Regex::new(&pattern).ok()?;
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end().to_string())
}

/// Reads `path` and extracts the section between `start` and `end`.
///
/// Never fails: a missing or unreadable file, or a missing marker pair, is logged
/// and yields `None`.
pub fn extract_section(path: &Path, start: &str, end: &str) -> Option<String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("File not found: {}", path.display());
            return None;
        }
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };

    let section = find_section(&content, start, end);
    match &section {
        Some(text) => debug!(
            "Extracted {} characters between {} and {} in {}",
            text.len(),
            start,
            end,
            path.display()
        ),
        None => debug!("No {} / {} pair in {}", start, end, path.display()),
    }
    section
}
