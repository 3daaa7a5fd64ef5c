//! Rewrites copied firmware code so it can be compiled inside the doc generator.
//!
//! The generator only needs the registration calls, not what the handlers do, so
//! every lambda loses its `this` capture and its body is reduced to `return true;`.

use log::{debug, warn};
use regex::Regex;
use std::sync::LazyLock;

/// Statement every lambda body is replaced with
pub const STUB_BODY: &str = "return true;";

/// `[captures](`
static LAMBDA_HEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\[\]]*\]\s*\(").expect("lambda head pattern is valid"));

/// Everything between the parameter list and the opening brace of the body
static LAMBDA_TAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A\s*(?:mutable\b\s*)?(?:->\s*[^{};()]+?\s*)?\{")
        .expect("lambda tail pattern is valid")
});

/// Applies both rewrites: `[this]` captures become `[]`, then lambda bodies become
/// [`STUB_BODY`].
pub fn sanitize(code: &str) -> String {
    let code = code.replace("[this]", "[]");
    stub_lambda_bodies(&code)
}

/// Replaces the body of every `[captures](params) { body }` with [`STUB_BODY`].
///
/// Header text up to and including the opening brace is kept verbatim. Bodies are
/// delimited by brace balancing, so nested blocks are handled. A lambda whose body
/// never closes is left as it is.
pub fn stub_lambda_bodies(code: &str) -> String {
    let mut output = String::with_capacity(code.len());
    let mut copied = 0;
    let mut pos = 0;
    let mut stubbed = 0;

    while let Some(head) = LAMBDA_HEAD_RE.find_at(code, pos) {
        let params_open = head.end() - 1;
        let Some(params_close) = find_closing(code, params_open) else {
            pos = head.start() + 1;
            continue;
        };
        let Some(tail) = LAMBDA_TAIL_RE.find(&code[params_close + 1..]) else {
            pos = head.start() + 1;
            continue;
        };
        let body_open = params_close + tail.end();
        let Some(body_close) = find_closing(code, body_open) else {
            warn!("Unterminated lambda body at byte {}, left unchanged", head.start());
            pos = head.end();
            continue;
        };

        output.push_str(&code[copied..=body_open]);
        output.push(' ');
        output.push_str(STUB_BODY);
        output.push_str(" }");
        copied = body_close + 1;
        pos = copied;
        stubbed += 1;
    }

    output.push_str(&code[copied..]);
    debug!("Stubbed {} lambda bod{}", stubbed, if stubbed == 1 { "y" } else { "ies" });
    output
}

/// Returns the index of the bracket closing the one at `open`.
///
/// String and character literals and comments are skipped while counting. A `'`
/// inside a number (`1'000`, `0x1'00`) is a digit separator, not a literal.
fn find_closing(code: &str, open: usize) -> Option<usize> {
    let bytes = code.as_bytes();
    let open_byte = bytes[open];
    let close_byte = match open_byte {
        b'(' => b')',
        b'{' => b'}',
        b'[' => b']',
        _ => return None,
    };

    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' if is_digit_separator(bytes, i) => {}
            b'"' | b'\'' => i = skip_literal(bytes, i)?,
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = bytes[i..].iter().position(|&b| b == b'\n').map_or(bytes.len(), |n| i + n);
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = code[i + 2..].find("*/").map(|n| i + 2 + n + 1)?;
            }
            b if b == open_byte => depth += 1,
            b if b == close_byte => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// True when the quote at `quote` continues a token that starts with a digit.
///
/// Prefixed character literals (`L'x'`, `u8'x'`) start with a letter and are not
/// separators.
fn is_digit_separator(bytes: &[u8], quote: usize) -> bool {
    let token_start = bytes[..quote]
        .iter()
        .rposition(|&b| !(b.is_ascii_alphanumeric() || matches!(b, b'\'' | b'.' | b'_')))
        .map_or(0, |p| p + 1);
    token_start < quote && bytes[token_start].is_ascii_digit()
}

/// Returns the index of the quote closing the literal opened at `start`.
fn skip_literal(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b if b == quote => return Some(i),
            b'\n' => return None,
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_simple_lambda() {
        assert_eq!(
            sanitize("[this](Request& r) { doWork(); return r.ok(); }"),
            "[](Request& r) { return true; }"
        );
    }

    #[test]
    fn test_sanitize_registration_call() {
        let code = r#"_apiServer.registerMethod("GET", "wifi/status",
    [this](const JsonObject& args, JsonObject& response) {
        response["connected"] = _wifiManager.isConnected();
        return true;
    });"#;

        let expected = r#"_apiServer.registerMethod("GET", "wifi/status",
    [](const JsonObject& args, JsonObject& response) { return true; });"#;

        assert_eq!(sanitize(code), expected);
    }

    #[test]
    fn test_sanitize_nested_braces() {
        let code = "f([](int x) { if (x) { a(); } else { b(); } return x > 0; });";
        assert_eq!(sanitize(code), "f([](int x) { return true; });");
    }

    #[test]
    fn test_sanitize_braces_in_literals_and_comments() {
        let code = "[](int x) { log(\"}\"); char c = '}'; // }\n /* } */ return c; } tail";
        assert_eq!(sanitize(code), "[](int x) { return true; } tail");
    }

    #[test]
    fn test_sanitize_keeps_other_captures() {
        assert_eq!(
            sanitize("[&state, id](Event e) mutable { state.push(e); }"),
            "[&state, id](Event e) mutable { return true; }"
        );
        assert_eq!(
            sanitize("[=]() -> bool { return compute(); }"),
            "[=]() -> bool { return true; }"
        );
    }

    #[test]
    fn test_sanitize_multiple_lambdas() {
        let code = "on([this]() { a(); });\noff([this](int v) { b(v); });";
        assert_eq!(
            sanitize(code),
            "on([]() { return true; });\noff([](int v) { return true; });"
        );
    }

    #[test]
    fn test_sanitize_leaves_subscripts_alone() {
        let code = "response[\"ok\"] = handlers[i](args);";
        assert_eq!(sanitize(code), code);
    }

    #[test]
    fn test_sanitize_unterminated_body_unchanged() {
        let code = "[](int x) { if (x) { a(); }";
        assert_eq!(sanitize(code), code);
    }

    #[test]
    fn test_sanitize_digit_separators() {
        assert_eq!(
            sanitize("[](int x) { int n = 0x1'00; return x; }"),
            "[](int x) { return true; }"
        );
        assert_eq!(
            sanitize("[](int x) { long n = 1'000'000; wchar_t c = L'}'; return x + n; }"),
            "[](int x) { return true; }"
        );
    }

    #[test]
    fn test_sanitize_prefixed_char_literal() {
        assert_eq!(
            sanitize("[](char x) { char c = u8'}'; return x == c; } tail"),
            "[](char x) { return true; } tail"
        );
    }

    #[test]
    fn test_sanitize_without_lambdas() {
        let code = "registerModule(\"wifi\", \"1.0\", \"WiFi\");";
        assert_eq!(sanitize(code), code);
    }
}
