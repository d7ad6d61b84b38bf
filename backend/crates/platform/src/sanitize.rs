//! Free-text sanitization
//!
//! Strips the markup fragments that turn user text into script when it is
//! echoed into the dashboard. Passes run in a fixed order, so an angle
//! bracket hidden inside `java<script:` cannot survive the later passes.

use std::sync::LazyLock;

use regex::Regex;

// ASCII-only classes and case folding (`-u`): accented words such as
// `monção=` are ordinary text, and `ſ` must not fold to `s`.
static JAVASCRIPT_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i-u)javascript:").expect("valid regex"));

static EVENT_HANDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i-u)on\w+=").expect("valid regex"));

/// Sanitize a string before it is stored or echoed
///
/// 1. removes every `<` and `>`
/// 2. removes every `javascript:` (case-insensitive)
/// 3. removes every `on<word>=` event-handler prefix, where the word is
///    ASCII letters, digits or `_` (case-insensitive)
/// 4. trims surrounding whitespace
pub fn sanitize_string(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let without_brackets: String = input.chars().filter(|c| !matches!(c, '<' | '>')).collect();
    let without_scheme = JAVASCRIPT_SCHEME.replace_all(&without_brackets, "");
    let without_handlers = EVENT_HANDLER.replace_all(&without_scheme, "");

    without_handlers.trim().to_string()
}

/// Sanitize an optional field, dropping it when nothing is left
pub fn sanitize_optional(input: Option<&str>) -> Option<String> {
    input.map(sanitize_string).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_angle_brackets() {
        assert_eq!(sanitize_string("<b>Black Friday</b>"), "bBlack Friday/b");
    }

    #[test]
    fn test_removes_javascript_scheme_any_case() {
        assert_eq!(sanitize_string("JavaScript:alert(1)"), "alert(1)");
        assert_eq!(sanitize_string("go javascript:javascript:x"), "go x");
    }

    #[test]
    fn test_removes_event_handlers() {
        assert_eq!(
            sanitize_string(r#"<img src=x onerror=alert(1)>"#),
            "img src=x alert(1)"
        );
        assert_eq!(sanitize_string("ONCLICK=steal()"), "steal()");
    }

    #[test]
    fn test_bracket_removal_runs_first() {
        assert_eq!(sanitize_string("java<script:alert(1)"), "alert(1)");
    }

    #[test]
    fn test_trims_and_handles_empty() {
        assert_eq!(sanitize_string("   Curso de Marketing  "), "Curso de Marketing");
        assert_eq!(sanitize_string(""), "");
        assert_eq!(sanitize_string("  <>  "), "");
    }

    #[test]
    fn test_plain_text_untouched() {
        let text = "Promoção especial com até 70% de desconto";
        assert_eq!(sanitize_string(text), text);
    }

    #[test]
    fn test_accented_words_untouched() {
        assert_eq!(sanitize_string("monção=1"), "monção=1");
        assert_eq!(sanitize_string("região onça=2"), "região onça=2");
        assert_eq!(sanitize_string("onÇa=3 onload=x"), "onÇa=3 x");
    }

    #[test]
    fn test_case_folding_is_ascii_only() {
        assert_eq!(sanitize_string("javaſcript:x"), "javaſcript:x");
        assert_eq!(sanitize_string("JAVASCRIPT:x"), "x");
    }

    #[test]
    fn test_sanitize_optional() {
        assert_eq!(sanitize_optional(None), None);
        assert_eq!(sanitize_optional(Some("  <> ")), None);
        assert_eq!(sanitize_optional(Some(" hi ")), Some("hi".to_string()));
    }
}
