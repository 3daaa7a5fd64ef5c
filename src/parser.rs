use crate::model::{ApiInfo, Module};
use anyhow::{Context, Result};
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// `APIServer apiServer({ ... })`, capturing the initializer between the braces.
static API_SERVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)APIServer\s+apiServer\s*\(\s*\{([^}]*)\}\s*\)")
        .expect("API server pattern is valid")
});

/// `registerModule("name", "version", "description"`
static MODULE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"registerModule\s*\(\s*"([^"]+)"\s*,\s*"([^"]+)"\s*,\s*"([^"]+)""#)
        .expect("module pattern is valid")
});

/// `registerMethod("first", "path"`
static METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"registerMethod\s*\(\s*"([^"]+)"\s*,\s*"([^"]+)""#)
        .expect("method pattern is valid")
});

/// A whole string literal, possibly empty, with backslash escapes kept verbatim.
static STRING_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)""#).expect("literal pattern is valid")
});

static KEYED_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)*)"\s*:\s*"((?:[^"\\]|\\.)*)""#)
        .expect("keyed literal pattern is valid")
});

/// Text-level parser for the registration declarations of the firmware sources.
///
/// This is pattern matching on source text, not a C++ parser. Declarations have to
/// use plain string literals as arguments to be recognized.
pub struct DeclarationParser;

impl DeclarationParser {
    /// Extracts the API title, version and description from entry-file source text.
    ///
    /// The initializer of `APIServer apiServer({ ... })` may be written positionally
    /// (`{"Title", "1.0", "Description"}`) or as keyed pairs
    /// (`{"title": "Title", "version": "1.0", "description": "Description"}`).
    /// Returns `None` unless all three values are found.
    pub fn parse_api_info(content: &str) -> Option<ApiInfo> {
        let initializer = API_SERVER_RE.captures(content)?.get(1)?.as_str();

        let keyed: HashMap<&str, &str> = KEYED_LITERAL_RE
            .captures_iter(initializer)
            .filter_map(|c| Some((c.get(1)?.as_str(), c.get(2)?.as_str())))
            .collect();
        if let (Some(title), Some(version), Some(description)) =
            (keyed.get("title"), keyed.get("version"), keyed.get("description"))
        {
            debug!("API info declared with keyed initializer");
            return Some(ApiInfo {
                title: title.to_string(),
                version: version.to_string(),
                description: description.to_string(),
            });
        }

        let literals: Vec<&str> = STRING_LITERAL_RE
            .captures_iter(initializer)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .take(3)
            .collect();
        match literals.as_slice() {
            [title, version, description] => Some(ApiInfo {
                title: title.to_string(),
                version: version.to_string(),
                description: description.to_string(),
            }),
            _ => {
                debug!(
                    "API server initializer has {} string literal(s), expected 3",
                    literals.len()
                );
                None
            }
        }
    }

    /// Returns true if the text contains a module registration.
    pub fn has_module_declaration(content: &str) -> bool {
        MODULE_RE.is_match(content)
    }

    /// Parses the module declared in a header's text together with its routes.
    ///
    /// Only the first `registerModule` call counts. Routes are the second literal of
    /// every `registerMethod` call, in order of appearance.
    pub fn parse_module(content: &str) -> Option<Module> {
        let caps = MODULE_RE.captures(content)?;
        let mut module = Module::new(
            caps[1].to_string(),
            caps[2].to_string(),
            caps[3].to_string(),
        );

        module.routes = METHOD_RE
            .captures_iter(content)
            .map(|c| c[2].to_string())
            .collect();

        Some(module)
    }

    /// Reads a header file and parses the module it declares, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn parse_module_file(path: &Path) -> Result<Option<Module>> {
        debug!("Checking {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        if !Self::has_module_declaration(&content) {
            if let Some(index) = content.find("registerModule") {
                debug!(
                    "registerModule mentioned in {} without literal arguments: {}",
                    path.display(),
                    excerpt(&content, index, 100)
                );
            }
            return Ok(None);
        }

        Ok(Self::parse_module(&content))
    }
}

/// Returns up to `len` bytes of `content` starting at `start`, on char boundaries,
/// with newlines escaped so the excerpt fits on one log line.
pub(crate) fn excerpt(content: &str, start: usize, len: usize) -> String {
    let mut end = (start + len).min(content.len());
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    content[start..end].replace('\n', "\\n")
}
