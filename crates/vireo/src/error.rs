//! Error types for compiling and driving a view.

use std::sync::Arc;

/// Errors surfaced by the engine.
///
/// Reading an undefined field is not an error: it yields [`Value::Undefined`](crate::Value).
/// Everything here is a lookup or structural fault that aborts the operation that hit it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// A directive attribute named a directive that has no binder.
    ///
    /// `name` is the full attribute name, e.g. `v-show`.
    #[error("unknown directive `{name}`: no binder is registered for it")]
    UnknownDirective {
        /// Attribute name carrying the directive.
        name: String,
    },

    /// An event directive did not name an event (`v-on="..."` or `@="..."`).
    #[error("event directive `{attribute}` does not name an event")]
    MissingEventName {
        /// Attribute name carrying the directive.
        attribute: String,
    },

    /// An event binding referenced a method missing from the method table.
    #[error("unknown method `{name}`: no such entry in the method table")]
    UnknownMethod {
        /// Method name from the attribute value.
        name: String,
    },

    /// A facade property was written that is not a top-level data field.
    #[error("unknown property `{name}`: not a top-level data field")]
    UnknownProperty {
        /// Property name.
        name: String,
    },

    /// The mount selector did not match any node.
    #[error("mount selector `{selector}` did not match any node")]
    RootNotFound {
        /// The selector that was looked up.
        selector: String,
    },

    /// The markup could not be parsed.
    #[error("markup error at byte {position}: {message}")]
    Markup {
        /// Byte offset into the markup.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// A bound method returned an error.
    ///
    /// Any `Into<anyhow::Error>` can be returned from a method; it is carried here as is.
    #[error("method failed: {0}")]
    Method(Arc<anyhow::Error>),

    /// The builder was finished without a data object.
    #[error("view model has no data object")]
    NoData,

    /// The builder was finished without a mount point.
    #[error("view model has no mount point")]
    NoRoot,
}

impl Error {
    /// Returns a reference to the inner method error if this is a `Method` variant.
    pub fn method_error(&self) -> Option<&Arc<anyhow::Error>> {
        match self {
            Error::Method(e) => Some(e),
            _ => None,
        }
    }

    /// Attempts to downcast a method error to a specific type.
    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.method_error().and_then(|e| e.downcast_ref::<E>())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        // Errors that already are engine errors keep their variant.
        match err.downcast::<Error>() {
            Ok(err) => err,
            Err(err) => Error::Method(Arc::new(err)),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("quota exceeded")]
    struct QuotaExceeded;

    #[test]
    fn test_display_names_missing_key() {
        let err = Error::UnknownDirective {
            name: "v-show".into(),
        };
        assert_eq!(
            err.to_string(),
            "unknown directive `v-show`: no binder is registered for it"
        );
        let err = Error::UnknownMethod {
            name: "save".into(),
        };
        assert!(err.to_string().contains("`save`"));
    }

    #[test]
    fn test_method_error_downcast() {
        let err = Error::from(anyhow::Error::new(QuotaExceeded));
        assert!(matches!(err, Error::Method(_)));
        assert_eq!(err.downcast_ref::<QuotaExceeded>(), Some(&QuotaExceeded));
    }

    #[test]
    fn test_engine_error_roundtrips_through_anyhow() {
        let err = Error::from(anyhow::Error::new(Error::UnknownMethod {
            name: "save".into(),
        }));
        assert!(matches!(err, Error::UnknownMethod { .. }));
    }
}
