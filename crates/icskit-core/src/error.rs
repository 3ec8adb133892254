//! Codec error types.

use icskit_store::StoreError;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised while building or digesting calendar objects.
///
/// Every error is terminal for the current call: a build or digest either
/// fully succeeds or fails with the first error encountered.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A required attribute is absent or empty.
    #[error("attribute {name} is required")]
    MissingAttribute { name: String },

    /// A value fails a domain constraint.
    #[error("value {value:?} is invalid for {attribute}, please refer to RFC 5545")]
    InvalidArgument { value: String, attribute: String },

    /// Digestion could not locate a required field.
    #[error("attribute {name} not found in calendar text")]
    AttributeNotFound { name: String, source_text: String },

    /// A rule declaration names an extraction kind the digester does not know.
    #[error("unknown extraction rule {kind:?}")]
    UnknownExtractionRule { kind: String },

    /// A rule pattern does not compile or has the wrong shape.
    #[error("invalid pattern for {name}: {reason}")]
    InvalidPattern {
        name: String,
        pattern: String,
        reason: String,
    },

    /// An attribute of the schema has no extraction rule.
    #[error("no extraction rule declared for {name}")]
    MissingRule { name: String },

    /// An attribute has more than one extraction rule.
    #[error("extraction rule for {name} declared more than once")]
    DuplicateRule { name: String },

    /// The opening or closing tag of a component is missing.
    #[error("no block between {opening:?} and {closing:?}")]
    BlockNotFound { opening: String, closing: String },

    /// The template source has no template with this name.
    #[error("template {name} not found")]
    TemplateNotFound { name: String },

    /// An external collaborator (template source, object store) failed.
    #[error("{resource} failed: {source}")]
    Resource {
        resource: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CodecError {
    pub fn missing_attribute(name: impl Into<String>) -> Self {
        Self::MissingAttribute { name: name.into() }
    }

    pub fn invalid_argument(value: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::InvalidArgument {
            value: value.into(),
            attribute: attribute.into(),
        }
    }

    pub fn attribute_not_found(name: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self::AttributeNotFound {
            name: name.into(),
            source_text: source_text.into(),
        }
    }

    pub fn block_not_found(opening: impl Into<String>, closing: impl Into<String>) -> Self {
        Self::BlockNotFound {
            opening: opening.into(),
            closing: closing.into(),
        }
    }

    /// Wraps a failure from an external collaborator.
    pub fn resource<E>(resource: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Resource {
            resource: resource.into(),
            source: Box::new(source),
        }
    }

    /// Returns the attribute this error is about, if any.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::MissingAttribute { name }
            | Self::AttributeNotFound { name, .. }
            | Self::InvalidPattern { name, .. }
            | Self::MissingRule { name }
            | Self::DuplicateRule { name } => Some(name),
            Self::InvalidArgument { attribute, .. } => Some(attribute),
            _ => None,
        }
    }
}

impl From<StoreError> for CodecError {
    fn from(err: StoreError) -> Self {
        let resource = format!("{} store", err.store().unwrap_or("object"));
        Self::resource(resource, err)
    }
}
