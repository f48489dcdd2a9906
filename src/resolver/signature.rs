//! Missing-dependency signatures.
//!
//! A signature is a fixed shape of diagnostic text that names a module the
//! interpreter could not import. Signatures are tried in [`SIGNATURES`]
//! order and the first one that captures a non-empty name wins; anything
//! else is an unrecognized failure, never "nothing is missing".

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

macro_rules! lazy_regex {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($pattern).unwrap());
    };
}

lazy_regex!(RE_SINGLE_QUOTED, r"No module named '([^']*)'");
lazy_regex!(RE_DOUBLE_QUOTED, r#"No module named "([^"]*)""#);
lazy_regex!(RE_LEGACY_UNQUOTED, r"ImportError: No module named (\S+)");

/// A recognized failure shape.
pub struct Signature {
    /// Signature name (for logging).
    pub name: &'static str,
    regex: &'static LazyLock<Regex>,
}

impl Signature {
    /// First non-empty capture of this signature in `text`.
    pub fn capture(&self, text: &str) -> Option<DependencyName> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find_map(|m| DependencyName::new(m.as_str()))
    }

    /// The underlying pattern.
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// Recognized signatures, highest priority first.
pub static SIGNATURES: [Signature; 3] = [
    Signature {
        name: "single_quoted",
        regex: &RE_SINGLE_QUOTED,
    },
    Signature {
        name: "double_quoted",
        regex: &RE_DOUBLE_QUOTED,
    },
    Signature {
        name: "legacy_unquoted",
        regex: &RE_LEGACY_UNQUOTED,
    },
];

/// Name of a module reported missing. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyName(String);

impl DependencyName {
    /// Wrap `name`, refusing the empty string.
    pub fn new(name: &str) -> Option<Self> {
        if name.is_empty() {
            None
        } else {
            Some(Self(name.to_string()))
        }
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the name.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DependencyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the name of a missing module from diagnostic text.
pub fn extract_missing_dependency(text: &str) -> Option<DependencyName> {
    SIGNATURES.iter().find_map(|signature| {
        let name = signature.capture(text)?;
        tracing::debug!(signature = signature.name, module = %name, "matched failure signature");
        Some(name)
    })
}
