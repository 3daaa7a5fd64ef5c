//! In-place replacement of marked regions in the generator source.
//!
//! A region for marker `@NAME` spans from `@NAME_START` to the end of the next
//! line containing `@NAME_END`. Its interior is replaced with sanitized section
//! text and the end line is regenerated.

use crate::sanitizer::sanitize;
use crate::section::ExtractedSection;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

/// Text written in front of a regenerated `_END` marker
pub const END_MARKER_PREFIX: &str = "  //";

/// Outcome of one splice run, by marker name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpliceReport {
    /// Markers whose region was rewritten
    pub replaced: Vec<String>,
    /// Markers without extracted text, left untouched
    pub skipped: Vec<String>,
    /// Markers with text but no matching region in the target
    pub missing_in_target: Vec<String>,
}

/// Replaces every region of `marker` in `content` with `text`.
///
/// `text` is inserted literally. Returns the new content and the number of
/// regions replaced.
pub fn replace_region(content: &str, marker: &str, text: &str) -> (String, usize) {
    let escaped = regex::escape(marker);
    let pattern = format!(r"(?s){}_START\n(.*?)\n[^\n]*{}_END", escaped, escaped);
    let Ok(re) = Regex::new(&pattern) else {
        return (content.to_string(), 0);
    };

    let mut count = 0;
    let replaced = re.replace_all(content, |_: &Captures| {
        count += 1;
        format!("{marker}_START\n{text}\n{END_MARKER_PREFIX}{marker}_END")
    });
    (replaced.into_owned(), count)
}

/// Writes sanitized sections into their marker regions of a generator file.
pub struct SpliceWriter;

impl SpliceWriter {
    /// Splices every section with text into `target`.
    ///
    /// The target is read once and written once, after all markers are processed.
    /// Sections without text are reported and leave their region as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be read or written.
    pub fn splice(target: &Path, sections: &[ExtractedSection]) -> Result<SpliceReport> {
        let mut content = fs::read_to_string(target)
            .with_context(|| format!("Failed to read generator file: {}", target.display()))?;
        let mut report = SpliceReport::default();

        for section in sections {
            let text = match section.text.as_deref() {
                Some(text) if !text.is_empty() => text,
                _ => {
                    warn!("Section {} is empty, leaving it unchanged", section.marker);
                    report.skipped.push(section.marker.clone());
                    continue;
                }
            };

            let cleaned = sanitize(text);
            let (updated, count) = replace_region(&content, &section.marker, &cleaned);
            if count == 0 {
                warn!(
                    "No {}_START/{}_END region in {}",
                    section.marker,
                    section.marker,
                    target.display()
                );
                report.missing_in_target.push(section.marker.clone());
            } else {
                debug!("Replaced {} region(s) of {}", count, section.marker);
                report.replaced.push(section.marker.clone());
                content = updated;
            }
        }

        fs::write(target, &content)
            .with_context(|| format!("Failed to write generator file: {}", target.display()))?;
        info!("Updated {}", target.display());

        Ok(report)
    }
}
