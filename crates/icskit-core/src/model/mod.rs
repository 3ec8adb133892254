//! Typed calendar objects.
//!
//! Each object kind is a struct implementing [`CalendarObject`]: it knows its
//! template, the tags delimiting its block, the ordered attribute schema and
//! the compiled rules used to read it back.
//!
//! - [`Subscription`]: the VCALENDAR envelope of a published calendar
//! - [`TimeZone`]: a VTIMEZONE component
//! - [`Event`]: a VEVENT component

mod event;
mod language;
mod status;
mod subscription;
mod timezone;

pub use event::Event;
pub use language::Language;
pub use status::Status;
pub use subscription::{Subscription, generate_relcaid};
pub use timezone::{TimeZone, UtcOffset};

use chrono::NaiveDateTime;

use crate::attributes::{AttributeSet, AttributeSpec};
use crate::builder::Builder;
use crate::digest::{block_between, digest};
use crate::error::CodecResult;

/// Date-time layout of every date attribute (`YYYYMMDDTHHMMSS`).
pub const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Formats a date-time attribute value.
pub fn format_date_time(value: &NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

/// A calendar object that can be built from a template and digested back.
pub trait CalendarObject: Sized {
    /// Template the object is built from.
    const TEMPLATE: &'static str;
    /// First line of the object's block.
    const OPENING_TAG: &'static str;
    /// Last line of the object's block.
    const CLOSING_TAG: &'static str;
    /// Required attributes, in validation order.
    const SCHEMA: &'static [&'static str];

    /// Extraction rules for every attribute of [`SCHEMA`](Self::SCHEMA).
    fn spec() -> &'static AttributeSpec;

    /// The attribute values this object fills into its template.
    fn to_attributes(&self) -> AttributeSet;

    /// Creates an object from attribute values.
    ///
    /// Absent attributes stay unset; present ones are validated.
    fn from_attributes(attributes: &AttributeSet) -> CodecResult<Self>;

    /// Builds the object's calendar text.
    fn build(&self, builder: &Builder<'_>) -> CodecResult<String> {
        builder.build(Self::TEMPLATE, Self::SCHEMA, &self.to_attributes())
    }

    /// Reads the object from calendar text containing its block.
    fn load_from(text: &str) -> CodecResult<Self> {
        let block = block_between(text, Self::OPENING_TAG, Self::CLOSING_TAG)?;
        let attributes = digest(block, Self::spec())?;
        Self::from_attributes(&attributes)
    }
}

/// Copies a present attribute into `slot`.
pub(crate) fn take(attributes: &AttributeSet, name: &str, slot: &mut Option<String>) {
    if let Some(value) = attributes.get(name) {
        *slot = Some(value.to_string());
    }
}

/// Inserts `value` under `name` when it is set.
pub(crate) fn put(attributes: &mut AttributeSet, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        attributes.insert(name, value);
    }
}
