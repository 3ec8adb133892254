use std::sync::LazyLock;

use chrono::NaiveDateTime;

use super::{CalendarObject, Language, Status, TimeZone, format_date_time, put, take};
use crate::attributes::{AttributeSet, AttributeSpec, RuleDecl};
use crate::error::CodecResult;
use crate::template::VEVENT_TEMPLATE;

static SPEC: LazyLock<AttributeSpec> = LazyLock::new(|| {
    AttributeSpec::for_schema(
        Event::SCHEMA,
        [
            (UID, RuleDecl::SingleLineMatch(r"(?m)^UID:([^\r\n]+)")),
            (DTSTAMP, RuleDecl::SingleLineMatch(r"(?m)^DTSTAMP:(\w+)")),
            (CREATED, RuleDecl::SingleLineMatch(r"(?m)^CREATED:(\w+)")),
            (LANGUAGE, RuleDecl::SingleLineMatch(r"(?m)^SUMMARY;LANGUAGE=(\w+)")),
            (
                DESCRIPTION,
                RuleDecl::DelimitedBlock {
                    start: "^DESCRIPTION",
                    end: "^LOCATION",
                },
            ),
            (TZID, RuleDecl::SingleLineMatch(r"(?m)^DTSTART;TZID=([^:\r\n]+):")),
            (
                DTSTART,
                RuleDecl::SingleLineMatch(r"(?m)^DTSTART;TZID=[^:\r\n]+:(\w+)"),
            ),
            (DTEND, RuleDecl::SingleLineMatch(r"(?m)^DTEND;TZID=[^:\r\n]+:(\w+)")),
            (
                LAST_MODIFIED,
                RuleDecl::SingleLineMatch(r"(?m)^LAST-MODIFIED:(\w+)"),
            ),
            (
                LOCATION,
                RuleDecl::DelimitedBlock {
                    start: "^LOCATION",
                    end: "^STATUS",
                },
            ),
            (
                SUMMARY,
                RuleDecl::DelimitedBlock {
                    start: "^SUMMARY",
                    end: "^DESCRIPTION",
                },
            ),
            (STATUS, RuleDecl::SingleLineMatch(r"(?m)^STATUS:(\w+)")),
        ],
    )
    .expect("Invalid VEVENT extraction rules")
});

const UID: &str = "uid";
const DTSTAMP: &str = "dtstamp";
const CREATED: &str = "created";
const LANGUAGE: &str = "language";
const DESCRIPTION: &str = "description";
const TZID: &str = "tzid";
const DTSTART: &str = "dtstart";
const DTEND: &str = "dtend";
const LAST_MODIFIED: &str = "last_modified";
const LOCATION: &str = "location";
const SUMMARY: &str = "summary";
const STATUS: &str = "status";

/// A VEVENT component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    uid: Option<String>,
    dtstamp: Option<String>,
    created: Option<String>,
    language: Option<Language>,
    description: Option<String>,
    tzid: Option<String>,
    dtstart: Option<String>,
    dtend: Option<String>,
    last_modified: Option<String>,
    location: Option<String>,
    summary: Option<String>,
    status: Option<Status>,
}

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    #[must_use]
    pub fn with_dtstamp(mut self, stamp: NaiveDateTime) -> Self {
        self.dtstamp = Some(format_date_time(&stamp));
        self
    }

    #[must_use]
    pub fn with_created(mut self, created: NaiveDateTime) -> Self {
        self.created = Some(format_date_time(&created));
        self
    }

    #[must_use]
    pub fn with_last_modified(mut self, modified: NaiveDateTime) -> Self {
        self.last_modified = Some(format_date_time(&modified));
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    #[must_use]
    pub fn with_tzid(mut self, tzid: impl Into<String>) -> Self {
        self.tzid = Some(tzid.into());
        self
    }

    /// Uses the id of `time_zone`, if it has one.
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: &TimeZone) -> Self {
        if let Some(tzid) = time_zone.tzid() {
            self.tzid = Some(tzid.to_string());
        }
        self
    }

    #[must_use]
    pub fn with_dtstart(mut self, start: NaiveDateTime) -> Self {
        self.dtstart = Some(format_date_time(&start));
        self
    }

    #[must_use]
    pub fn with_dtend(mut self, end: NaiveDateTime) -> Self {
        self.dtend = Some(format_date_time(&end));
        self
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    pub fn dtstamp(&self) -> Option<&str> {
        self.dtstamp.as_deref()
    }

    pub fn created(&self) -> Option<&str> {
        self.created.as_deref()
    }

    pub fn last_modified(&self) -> Option<&str> {
        self.last_modified.as_deref()
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn tzid(&self) -> Option<&str> {
        self.tzid.as_deref()
    }

    pub fn dtstart(&self) -> Option<&str> {
        self.dtstart.as_deref()
    }

    pub fn dtend(&self) -> Option<&str> {
        self.dtend.as_deref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn status(&self) -> Option<Status> {
        self.status
    }
}

impl CalendarObject for Event {
    const TEMPLATE: &'static str = VEVENT_TEMPLATE;
    const OPENING_TAG: &'static str = "BEGIN:VEVENT";
    const CLOSING_TAG: &'static str = "END:VEVENT";
    const SCHEMA: &'static [&'static str] = &[
        UID,
        DTSTAMP,
        CREATED,
        LANGUAGE,
        DESCRIPTION,
        TZID,
        DTSTART,
        DTEND,
        LAST_MODIFIED,
        LOCATION,
        SUMMARY,
        STATUS,
    ];

    fn spec() -> &'static AttributeSpec {
        &SPEC
    }

    fn to_attributes(&self) -> AttributeSet {
        let mut attributes = AttributeSet::new();
        put(&mut attributes, UID, self.uid());
        put(&mut attributes, DTSTAMP, self.dtstamp());
        put(&mut attributes, CREATED, self.created());
        put(&mut attributes, LANGUAGE, self.language.as_ref().map(Language::as_str));
        put(&mut attributes, DESCRIPTION, self.description());
        put(&mut attributes, TZID, self.tzid());
        put(&mut attributes, DTSTART, self.dtstart());
        put(&mut attributes, DTEND, self.dtend());
        put(&mut attributes, LAST_MODIFIED, self.last_modified());
        put(&mut attributes, LOCATION, self.location());
        put(&mut attributes, SUMMARY, self.summary());
        put(&mut attributes, STATUS, self.status.as_ref().map(Status::as_str));
        attributes
    }

    fn from_attributes(attributes: &AttributeSet) -> CodecResult<Self> {
        let mut event = Self::new();
        take(attributes, UID, &mut event.uid);
        take(attributes, DTSTAMP, &mut event.dtstamp);
        take(attributes, CREATED, &mut event.created);
        take(attributes, DESCRIPTION, &mut event.description);
        take(attributes, TZID, &mut event.tzid);
        take(attributes, DTSTART, &mut event.dtstart);
        take(attributes, DTEND, &mut event.dtend);
        take(attributes, LAST_MODIFIED, &mut event.last_modified);
        take(attributes, LOCATION, &mut event.location);
        take(attributes, SUMMARY, &mut event.summary);
        if let Some(language) = attributes.get(LANGUAGE) {
            event.language = Some(language.parse()?);
        }
        if let Some(status) = attributes.get(STATUS) {
            event.status = Some(status.parse()?);
        }
        Ok(event)
    }
}
