//! Compiler configuration.
//!
//! The defaults reproduce the stock template syntax: `{{ expr }}` markers, `v-` directives
//! and `@` event shorthands. Options deserialize from any serde format, with every field
//! optional:
//!
//! ```
//! use vireo::{CompilerOptions, UnknownDirectivePolicy};
//!
//! let options: CompilerOptions =
//!     serde_json::from_str(r#"{ "unknown_directive": "skip" }"#).unwrap();
//! assert_eq!(options.unknown_directive, UnknownDirectivePolicy::Skip);
//! assert_eq!(options.delimiters.open, "{{");
//! ```

use serde::{Deserialize, Serialize};

/// Interpolation delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    /// Opening delimiter.
    pub open: String,
    /// Closing delimiter.
    pub close: String,
}

impl Delimiters {
    /// Create a delimiter pair.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new("{{", "}}")
    }
}

/// What the compiler does with a directive attribute whose key has no binder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownDirectivePolicy {
    /// Abort the whole compile pass with [`Error::UnknownDirective`](crate::Error::UnknownDirective).
    #[default]
    Error,
    /// Leave the attribute in place, report it to the tracer, and continue.
    Skip,
}

/// Options for a compile pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Interpolation delimiters for text content.
    pub delimiters: Delimiters,
    /// Prefix marking a directive attribute.
    pub directive_prefix: String,
    /// Prefix marking an event shorthand attribute.
    pub event_prefix: String,
    /// Handling of unknown directive keys.
    pub unknown_directive: UnknownDirectivePolicy,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            delimiters: Delimiters::default(),
            directive_prefix: "v-".to_string(),
            event_prefix: "@".to_string(),
            unknown_directive: UnknownDirectivePolicy::default(),
        }
    }
}

impl CompilerOptions {
    /// Builder-style setter for the unknown directive policy.
    pub fn with_unknown_directive(mut self, policy: UnknownDirectivePolicy) -> Self {
        self.unknown_directive = policy;
        self
    }

    /// Builder-style setter for the interpolation delimiters.
    pub fn with_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.delimiters = delimiters;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CompilerOptions::default();
        assert_eq!(options.delimiters, Delimiters::new("{{", "}}"));
        assert_eq!(options.directive_prefix, "v-");
        assert_eq!(options.event_prefix, "@");
        assert_eq!(options.unknown_directive, UnknownDirectivePolicy::Error);
    }

    #[test]
    fn test_serde_roundtrip() {
        let options = CompilerOptions::default()
            .with_unknown_directive(UnknownDirectivePolicy::Skip)
            .with_delimiters(Delimiters::new("[[", "]]"));
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains(r#""unknown_directive":"skip""#));
        let back: CompilerOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn test_partial_config() {
        let options: CompilerOptions =
            serde_json::from_str(r#"{ "event_prefix": "on-" }"#).unwrap();
        assert_eq!(options.event_prefix, "on-");
        assert_eq!(options.directive_prefix, "v-");
    }
}
