//! Template-driven construction of calendar object text.
//!
//! [`Builder::build`] validates the attributes against the object's schema,
//! loads the template, fills it and formats the result:
//!
//! ```
//! use icskit_core::{AttributeSet, Builder};
//!
//! let attrs = AttributeSet::new()
//!     .with("tzid", "America/Costa_Rica")
//!     .with("standard_dtstart", "20000101T000000")
//!     .with("offset_from", "-0600")
//!     .with("offset_to", "-0600")
//!     .with("standard_tzname", "DST")
//!     .with("daylight_dtstart", "20000101T000000")
//!     .with("daylight_tzname", "DLT");
//!
//! let text = Builder::bundled()
//!     .build("VTimeZone.txt", &["tzid"], &attrs)
//!     .unwrap();
//! assert!(text.starts_with("BEGIN:VTIMEZONE\r\nTZID:America/Costa_Rica\r\n"));
//! ```

use crate::attributes::AttributeSet;
use crate::error::{CodecError, CodecResult};
use crate::format::format_content;
use crate::template::{BundledTemplates, TemplateSource, fill};

/// Builds calendar objects from the templates of a [`TemplateSource`].
pub struct Builder<'a> {
    templates: &'a dyn TemplateSource,
}

impl std::fmt::Debug for Builder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder").finish_non_exhaustive()
    }
}

impl<'a> Builder<'a> {
    pub fn new(templates: &'a dyn TemplateSource) -> Self {
        Self { templates }
    }

    /// A builder over the templates compiled into the crate.
    pub fn bundled() -> Builder<'static> {
        Builder {
            templates: &BundledTemplates,
        }
    }

    /// Builds the named template.
    ///
    /// Every name in `schema` must have a non-empty value in `attributes`;
    /// the first one that does not is reported before the template is read.
    /// Values must fit on one content line: a CR or LF is rejected as
    /// [`CodecError::InvalidArgument`].
    pub fn build(
        &self,
        template: &str,
        schema: &[&str],
        attributes: &AttributeSet,
    ) -> CodecResult<String> {
        attributes.validate(schema)?;
        if let Some((name, value)) = attributes
            .iter()
            .find(|(_, value)| value.contains(['\r', '\n']))
        {
            return Err(CodecError::invalid_argument(value, name));
        }
        let text = self.templates.load(template)?;
        Ok(format_content(&fill(&text, attributes)))
    }
}
