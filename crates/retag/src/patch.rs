// crates/retag/src/patch.rs
// Manifest patcher - swaps the image reference suffix inside unparsed YAML text

use crate::error::{Result, RetagError};
use regex::Regex;

/// Field literal that introduces the image reference
pub const DEFAULT_FIELD: &str = "image:";

/// Registry/namespace prefix kept verbatim in front of the replaced token
pub const DEFAULT_PREFIX: &str = "docker.io/tanmay471/";

/// Full text of a manifest at one point in time.
///
/// Never mutated: patching yields a new `Document`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Build a document from individual lines joined by `\n`
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = lines
            .into_iter()
            .map(|l| l.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> std::str::Lines<'_> {
        self.text.lines()
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Operator-supplied `name:tag` token. Non-empty, no whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement(String);

impl Replacement {
    /// Trim and validate a raw value. Empty input is `RetagError::NoValue`,
    /// whitespace inside the value is `RetagError::InvalidValue`.
    pub fn parse(raw: &str) -> Result<Self> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(RetagError::NoValue);
        }
        if value.chars().any(char::is_whitespace) {
            return Err(RetagError::InvalidValue(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Replacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `<field>` + whitespace + literal `<prefix>` (captured), then the current tag (`\S+`)
#[derive(Debug, Clone)]
pub struct MatchPattern {
    regex: Regex,
    prefix: String,
}

impl MatchPattern {
    pub fn new(field: &str, prefix: &str) -> Result<Self> {
        if field.trim().is_empty() {
            return Err(RetagError::InvalidPattern("field must not be empty".into()));
        }
        let source = format!(r"({}\s+{})\S+", regex::escape(field), regex::escape(prefix));
        let regex = Regex::new(&source)?;
        Ok(Self {
            regex,
            prefix: prefix.to_string(),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }
}

impl Default for MatchPattern {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self::new(DEFAULT_FIELD, DEFAULT_PREFIX).expect("default pattern is valid")
    }
}

/// Result of a patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patched {
    pub document: Document,
    /// Number of pattern hits
    pub matches: usize,
    /// True iff the text actually differs from the input
    pub changed: bool,
}

/// Replace the tag after every pattern hit with `replacement`.
///
/// A document without a hit comes back untouched with `changed = false`.
/// The replacement is inserted literally (`$1` in it is not expanded).
pub fn patch(original: &Document, pattern: &MatchPattern, replacement: &Replacement) -> Patched {
    let regex = pattern.as_regex();
    let matches = regex.find_iter(original.as_str()).count();
    if matches == 0 {
        return Patched {
            document: original.clone(),
            matches,
            changed: false,
        };
    }

    let updated = regex.replace_all(original.as_str(), |caps: &regex::Captures<'_>| {
        let mut out = String::with_capacity(caps[0].len() + replacement.as_str().len());
        out.push_str(&caps[1]);
        out.push_str(replacement.as_str());
        out
    });

    let changed = updated != original.as_str();
    Patched {
        document: Document::new(updated.into_owned()),
        matches,
        changed,
    }
}
