//! Text trimming policy for literal text children.
//!
//! A leading run of whitespace is removed when it contains a line break, and
//! so is a trailing one. Inline whitespace is left alone. Text that reduces to
//! nothing is not emitted as a child at all.

use std::borrow::Cow;

#[cfg(feature = "regex")]
fn pattern() -> Option<&'static regex::Regex> {
    use std::sync::OnceLock;
    static PATTERN: OnceLock<Option<regex::Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| regex::Regex::new(r"^\s*\n\s*|\s*\n\s*$").ok())
        .as_ref()
}

/// Strip line-bounded leading and trailing whitespace from `text`.
pub fn trim_line_breaks(text: &str) -> Cow<'_, str> {
    #[cfg(feature = "regex")]
    {
        if let Some(re) = pattern() {
            return re.replace_all(text, "");
        }
    }
    Cow::Borrowed(scan(text))
}

fn scan(text: &str) -> &str {
    let body = text.trim_start();
    let text = if text[..text.len() - body.len()].contains('\n') {
        body
    } else {
        text
    };
    let body = text.trim_end();
    if text[body.len()..].contains('\n') {
        body
    } else {
        text
    }
}
