//! Directive attributes.

use crate::error::{Error, Result};
use crate::options::CompilerOptions;

/// A recognized directive, one variant per binder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `v-model="expr"`: two-way value binding.
    Model,
    /// `v-text="expr"`: one-way text binding.
    Text,
    /// `v-on:event="method"` or `@event="method"`: event binding.
    On {
        /// Event type to listen for.
        event: String,
    },
}

impl Directive {
    /// Classify an attribute name.
    ///
    /// - `None`: an ordinary attribute, left for the host.
    /// - `Some(Ok(_))`: a directive with a binder.
    /// - `Some(Err(_))`: a directive-prefixed attribute with an unknown key, or an event
    ///   directive without an event name.
    ///
    /// The directive key is the text between the directive prefix and the first `:`,
    /// or the whole remainder when there is no colon.
    pub fn parse(name: &str, options: &CompilerOptions) -> Option<Result<Directive>> {
        if let Some(rest) = strip(name, &options.directive_prefix) {
            let (key, argument) = match rest.split_once(':') {
                Some((key, argument)) => (key, Some(argument)),
                None => (rest, None),
            };
            let directive = match key {
                "model" => Ok(Directive::Model),
                "text" => Ok(Directive::Text),
                "on" => Self::event(name, argument.unwrap_or_default()),
                _ => Err(Error::UnknownDirective {
                    name: name.to_string(),
                }),
            };
            return Some(directive);
        }
        strip(name, &options.event_prefix).map(|event| Self::event(name, event))
    }

    /// The directive key as written in templates.
    pub fn key(&self) -> &'static str {
        match self {
            Directive::Model => "model",
            Directive::Text => "text",
            Directive::On { .. } => "on",
        }
    }

    fn event(attribute: &str, event: &str) -> Result<Directive> {
        if event.is_empty() {
            return Err(Error::MissingEventName {
                attribute: attribute.to_string(),
            });
        }
        Ok(Directive::On {
            event: event.to_string(),
        })
    }
}

fn strip<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    name.strip_prefix(prefix)
}
