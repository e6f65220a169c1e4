// Identifiers of DOT entities.
// An Id keeps the exact text it was built from, quotes and all.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Reserved words of the DOT language (matched case-insensitively).
pub const KEYWORDS: [&str; 6] = ["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// Raw identifier text.
///
/// Two ids are the same entity only if their raw text matches: `node` and
/// `"node"` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(raw: impl Into<String>) -> Self {
        Id(raw.into())
    }

    /// Build a double-quoted literal from plain text, escaping embedded quotes.
    pub fn quote(text: &str) -> Self {
        Id(format!("\"{}\"", escape(text)))
    }

    /// Plain text as-is when it is a valid bare id, a quoted literal otherwise.
    pub fn quoted_if_needed(text: &str) -> Self {
        let raw = Id::new(text);
        if raw.is_bare() && !raw.is_keyword() {
            raw
        } else {
            Id::quote(text)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_quoted(&self) -> bool {
        let s = self.0.as_str();
        if s.len() < 2 || !s.starts_with('"') || !s.ends_with('"') {
            return false;
        }
        // The closing quote must not itself be escaped.
        let inner = &s[1..s.len() - 1];
        let trailing = inner.chars().rev().take_while(|c| *c == '\\').count();
        trailing % 2 == 0
    }

    pub fn is_html(&self) -> bool {
        self.0.len() >= 2 && self.0.starts_with('<') && self.0.ends_with('>')
    }

    pub fn is_keyword(&self) -> bool {
        KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(&self.0))
    }

    pub fn is_numeral(&self) -> bool {
        is_numeral(&self.0)
    }

    /// Valid as an unquoted DOT id: a name or a numeral.
    pub fn is_bare(&self) -> bool {
        is_name(&self.0) || is_numeral(&self.0)
    }

    /// Text with surrounding quotes removed and `\"` unescaped.
    pub fn unquoted(&self) -> Cow<'_, str> {
        if !self.is_quoted() {
            return Cow::Borrowed(&self.0);
        }
        let inner = &self.0[1..self.0.len() - 1];
        if inner.contains("\\\"") {
            Cow::Owned(inner.replace("\\\"", "\""))
        } else {
            Cow::Borrowed(inner)
        }
    }

    /// Text to emit in DOT output.
    ///
    /// Quoted, HTML and valid bare ids are returned verbatim; anything else
    /// (spaces, punctuation, empty text, keywords) gets quoted.
    pub fn to_dot(&self) -> Cow<'_, str> {
        if self.is_quoted() || self.is_html() || (self.is_bare() && !self.is_keyword()) {
            Cow::Borrowed(&self.0)
        } else {
            Cow::Owned(format!("\"{}\"", escape(&self.0)))
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_name_start(c) => chars.all(|c| is_name_start(c) || c.is_ascii_digit()),
        _ => false,
    }
}

/// `-?(.[0-9]+ | [0-9]+(.[0-9]*)?)`
pub(crate) fn is_numeral(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    let (int, frac) = match s.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (s, None),
    };
    let digits = |p: &str| p.chars().all(|c| c.is_ascii_digit());
    match frac {
        None => !int.is_empty() && digits(int),
        Some(frac) => digits(int) && digits(frac) && !(int.is_empty() && frac.is_empty()),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_backslash = false;
    for c in text.chars() {
        match c {
            '"' if !prev_backslash => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
        prev_backslash = c == '\\' && !prev_backslash;
    }
    // A lone trailing backslash would escape the closing quote.
    if prev_backslash {
        out.push('\\');
    }
    out
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id(s)
    }
}

impl From<&String> for Id {
    fn from(s: &String) -> Self {
        Id(s.clone())
    }
}

impl From<&Id> for Id {
    fn from(id: &Id) -> Self {
        id.clone()
    }
}

macro_rules! id_from_number {
    ($($t:ty),*) => {
        $(impl From<$t> for Id {
            fn from(n: $t) -> Self {
                Id(n.to_string())
            }
        })*
    };
}

id_from_number!(i32, i64, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeral() {
        for ok in ["1", "-1", "3.14", ".5", "-.5", "7.", "-0"] {
            assert!(is_numeral(ok), "{ok}");
        }
        for bad in ["", "-", ".", "1.2.3", "a1", "1e5"] {
            assert!(!is_numeral(bad), "{bad}");
        }
    }

    #[test]
    fn test_numeric_id_from_integer() {
        assert_eq!(Id::from(1), "1");
        assert!(Id::from(42u32).is_bare());
    }

    #[test]
    fn test_quoted_id_keeps_quotes() {
        let id = Id::from("\"node\"");
        assert!(id.is_quoted());
        assert_eq!(id.as_str(), "\"node\"");
        assert_eq!(id.unquoted(), "node");
        assert_eq!(id.to_dot(), "\"node\"");
    }

    #[test]
    fn test_escaped_closing_quote_is_not_quoted() {
        assert!(!Id::from(r#""abc\""#).is_quoted());
        assert!(Id::from(r#""abc\\""#).is_quoted());
    }

    #[test]
    fn test_to_dot_quotes_only_when_needed() {
        assert_eq!(Id::from("legend").to_dot(), "legend");
        assert_eq!(Id::from("node_00001").to_dot(), "node_00001");
        assert_eq!(Id::from("-2.5").to_dot(), "-2.5");
        assert_eq!(Id::from("<b>bold</b>").to_dot(), "<b>bold</b>");
        assert_eq!(Id::from("hello world").to_dot(), "\"hello world\"");
        assert_eq!(Id::from("node").to_dot(), "\"node\"");
        assert_eq!(Id::from("").to_dot(), "\"\"");
        assert_eq!(Id::from("say \"hi\"").to_dot(), r#""say \"hi\"""#);
        assert_eq!(Id::from("a\nb").to_dot(), r#""a\nb""#);
    }

    #[test]
    fn test_unicode_names_are_bare() {
        assert!(Id::from("añnó").is_bare());
        assert!(!Id::from("1abc").is_bare());
    }

    #[test]
    fn test_quoted_if_needed() {
        assert_eq!(Id::quoted_if_needed("a"), "a");
        assert_eq!(Id::quoted_if_needed("node!"), "\"node!\"");
        assert_eq!(Id::quoted_if_needed("graph"), "\"graph\"");
    }
}
