//! iCalendar codec: line folding, template building, attribute digestion
//! and the calendar object model.

pub mod attributes;
pub mod builder;
pub mod digest;
pub mod error;
pub mod fold;
pub mod format;
pub mod model;
pub mod publish;
pub mod template;
pub mod tracing;

pub use attributes::{AttributeSet, AttributeSpec, ExtractionRule, RuleDecl, RuleKind};
pub use builder::Builder;
pub use digest::{block_between, digest};
pub use error::{CodecError, CodecResult};
pub use fold::{fold, fold_bytes, unfold};
pub use format::{embed_component, format_content};
pub use model::{CalendarObject, Event, Language, Status, Subscription, TimeZone, UtcOffset};
pub use template::{BundledTemplates, DirectoryTemplates, TemplateSource};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
