//! Inline-Markup Allowlist
//!
//! A subset of translation strings is rendered into the live page through
//! a raw-markup sink, so the only markup a value may carry is the line
//! break / emphasis subset: `<br>`, `<em>`, `<strong>` (open, close, or
//! self-closed). This check is the sole input-validation boundary between
//! authored content and stored markup injection.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::content::StringTable;
use crate::error::BuildError;

fn allowed_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<\s*/?\s*(?:br|em|strong)\s*/?\s*>").expect("hard-coded pattern")
    })
}

/// A value is clean when it contains only plain text interleaved with the
/// permitted tags. A tag with attributes does not match the allowlist and
/// is rejected.
pub fn is_clean(value: &str) -> bool {
    if !value.contains('<') {
        return true;
    }
    let stripped = allowed_tag_re().replace_all(value, "");
    !stripped.contains('<')
}

/// Check every value of a locale table, aborting with the offending key
/// and value echoed verbatim so the editor can locate and fix it.
pub fn check_table(file: &Path, table: &StringTable) -> Result<(), BuildError> {
    for (key, value) in table {
        if !is_clean(value) {
            return Err(BuildError::SecurityViolation {
                file: file.to_path_buf(),
                key: key.clone(),
                value: value.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes() {
        assert!(is_clean("Trạm CP12 riverside stay"));
        assert!(is_clean("Giá từ 480K / đêm"));
    }

    #[test]
    fn stray_angle_bracket_is_rejected() {
        // Conservative: a `<` that is not part of a permitted tag never
        // reaches the raw-markup sink.
        assert!(!is_clean("price < 600K"));
    }

    #[test]
    fn permitted_tags_pass() {
        assert!(is_clean("Line one<br>Line <em>two</em>"));
        assert!(is_clean("Stay <strong>longer</strong><br/>pay less"));
        assert!(is_clean("<BR>uppercase is fine"));
    }

    #[test]
    fn script_tag_is_rejected() {
        assert!(!is_clean("Xin chào <script>alert(1)</script>"));
    }

    #[test]
    fn tags_outside_the_allowlist_are_rejected() {
        assert!(!is_clean("bold <b>text</b>"));
        assert!(!is_clean("<a href=\"https://example.com\">link</a>"));
        assert!(!is_clean("<img src=x onerror=alert(1)>"));
    }

    #[test]
    fn permitted_tag_with_attributes_is_rejected() {
        assert!(!is_clean("<em onclick=\"alert(1)\">nope</em>"));
    }

    #[test]
    fn check_table_names_the_offending_key() {
        let mut table = StringTable::new();
        table.insert("hero.title".to_string(), "Trạm CP12".to_string());
        table.insert(
            "hero.subtitle".to_string(),
            "<script>alert(1)</script>".to_string(),
        );
        let err = check_table(Path::new("strings.vi.json"), &table).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("hero.subtitle"));
        assert!(message.contains("<script>alert(1)</script>"));
    }
}
