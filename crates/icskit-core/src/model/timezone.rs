use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use super::{CalendarObject, format_date_time, put, take};
use crate::attributes::{AttributeSet, AttributeSpec, RuleDecl};
use crate::error::{CodecError, CodecResult};
use crate::template::VTIMEZONE_TEMPLATE;

static OFFSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-][0-9]{4}$").expect("Invalid UTC offset regex"));

static SPEC: LazyLock<AttributeSpec> = LazyLock::new(|| {
    AttributeSpec::for_schema(
        TimeZone::SCHEMA,
        [
            (TZID, RuleDecl::SingleLineMatch(r"(?m)^TZID:([^\r\n]+)")),
            (
                STANDARD_DTSTART,
                RuleDecl::SingleLineMatch(r"(?s)BEGIN:STANDARD.*?DTSTART:(\w+)"),
            ),
            (
                OFFSET_FROM,
                RuleDecl::SingleLineMatch(r"(?s)BEGIN:STANDARD.*?TZOFFSETFROM:([+-][0-9]{4})"),
            ),
            (
                OFFSET_TO,
                RuleDecl::SingleLineMatch(r"(?s)BEGIN:STANDARD.*?TZOFFSETTO:([+-][0-9]{4})"),
            ),
            (
                STANDARD_TZNAME,
                RuleDecl::SingleLineMatch(r"(?s)BEGIN:STANDARD.*?TZNAME:([^\r\n]+)"),
            ),
            (
                DAYLIGHT_DTSTART,
                RuleDecl::SingleLineMatch(r"(?s)BEGIN:DAYLIGHT.*?DTSTART:(\w+)"),
            ),
            (
                DAYLIGHT_TZNAME,
                RuleDecl::SingleLineMatch(r"(?s)BEGIN:DAYLIGHT.*?TZNAME:([^\r\n]+)"),
            ),
        ],
    )
    .expect("Invalid VTIMEZONE extraction rules")
});

const TZID: &str = "tzid";
const STANDARD_DTSTART: &str = "standard_dtstart";
const OFFSET_FROM: &str = "offset_from";
const OFFSET_TO: &str = "offset_to";
const STANDARD_TZNAME: &str = "standard_tzname";
const DAYLIGHT_DTSTART: &str = "daylight_dtstart";
const DAYLIGHT_TZNAME: &str = "daylight_tzname";

/// A UTC offset in `+HHMM` / `-HHMM` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UtcOffset(String);

impl UtcOffset {
    /// Validates `value` as the offset attribute `attribute`.
    pub fn parse(value: &str, attribute: &str) -> CodecResult<Self> {
        if OFFSET_REGEX.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(CodecError::invalid_argument(value, attribute))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UtcOffset {
    type Err = CodecError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value, "utc_offset")
    }
}

/// A VTIMEZONE component with one standard and one daylight observance.
///
/// The daylight observance mirrors the standard one: its offsets are the
/// standard offsets swapped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeZone {
    tzid: Option<String>,
    standard_dtstart: Option<String>,
    offset_from: Option<UtcOffset>,
    offset_to: Option<UtcOffset>,
    standard_tzname: Option<String>,
    daylight_dtstart: Option<String>,
    daylight_tzname: Option<String>,
}

impl TimeZone {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tzid(mut self, tzid: impl Into<String>) -> Self {
        self.tzid = Some(tzid.into());
        self
    }

    #[must_use]
    pub fn with_standard_dtstart(mut self, dtstart: NaiveDateTime) -> Self {
        self.standard_dtstart = Some(format_date_time(&dtstart));
        self
    }

    /// Sets the standard observance's `TZOFFSETFROM`.
    pub fn with_offset_from(mut self, offset: &str) -> CodecResult<Self> {
        self.offset_from = Some(UtcOffset::parse(offset, OFFSET_FROM)?);
        Ok(self)
    }

    /// Sets the standard observance's `TZOFFSETTO`.
    pub fn with_offset_to(mut self, offset: &str) -> CodecResult<Self> {
        self.offset_to = Some(UtcOffset::parse(offset, OFFSET_TO)?);
        Ok(self)
    }

    #[must_use]
    pub fn with_standard_tzname(mut self, name: impl Into<String>) -> Self {
        self.standard_tzname = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_daylight_dtstart(mut self, dtstart: NaiveDateTime) -> Self {
        self.daylight_dtstart = Some(format_date_time(&dtstart));
        self
    }

    #[must_use]
    pub fn with_daylight_tzname(mut self, name: impl Into<String>) -> Self {
        self.daylight_tzname = Some(name.into());
        self
    }

    pub fn tzid(&self) -> Option<&str> {
        self.tzid.as_deref()
    }

    pub fn standard_dtstart(&self) -> Option<&str> {
        self.standard_dtstart.as_deref()
    }

    pub fn offset_from(&self) -> Option<&UtcOffset> {
        self.offset_from.as_ref()
    }

    pub fn offset_to(&self) -> Option<&UtcOffset> {
        self.offset_to.as_ref()
    }

    pub fn standard_tzname(&self) -> Option<&str> {
        self.standard_tzname.as_deref()
    }

    pub fn daylight_dtstart(&self) -> Option<&str> {
        self.daylight_dtstart.as_deref()
    }

    pub fn daylight_tzname(&self) -> Option<&str> {
        self.daylight_tzname.as_deref()
    }
}

impl CalendarObject for TimeZone {
    const TEMPLATE: &'static str = VTIMEZONE_TEMPLATE;
    const OPENING_TAG: &'static str = "BEGIN:VTIMEZONE";
    const CLOSING_TAG: &'static str = "END:VTIMEZONE";
    const SCHEMA: &'static [&'static str] = &[
        TZID,
        STANDARD_DTSTART,
        OFFSET_FROM,
        OFFSET_TO,
        STANDARD_TZNAME,
        DAYLIGHT_DTSTART,
        DAYLIGHT_TZNAME,
    ];

    fn spec() -> &'static AttributeSpec {
        &SPEC
    }

    fn to_attributes(&self) -> AttributeSet {
        let mut attributes = AttributeSet::new();
        put(&mut attributes, TZID, self.tzid());
        put(&mut attributes, STANDARD_DTSTART, self.standard_dtstart());
        put(&mut attributes, OFFSET_FROM, self.offset_from.as_ref().map(UtcOffset::as_str));
        put(&mut attributes, OFFSET_TO, self.offset_to.as_ref().map(UtcOffset::as_str));
        put(&mut attributes, STANDARD_TZNAME, self.standard_tzname());
        put(&mut attributes, DAYLIGHT_DTSTART, self.daylight_dtstart());
        put(&mut attributes, DAYLIGHT_TZNAME, self.daylight_tzname());
        attributes
    }

    fn from_attributes(attributes: &AttributeSet) -> CodecResult<Self> {
        let mut time_zone = Self::new();
        take(attributes, TZID, &mut time_zone.tzid);
        take(attributes, STANDARD_DTSTART, &mut time_zone.standard_dtstart);
        take(attributes, STANDARD_TZNAME, &mut time_zone.standard_tzname);
        take(attributes, DAYLIGHT_DTSTART, &mut time_zone.daylight_dtstart);
        take(attributes, DAYLIGHT_TZNAME, &mut time_zone.daylight_tzname);
        if let Some(offset) = attributes.get(OFFSET_FROM) {
            time_zone = time_zone.with_offset_from(offset)?;
        }
        if let Some(offset) = attributes.get(OFFSET_TO) {
            time_zone = time_zone.with_offset_to(offset)?;
        }
        Ok(time_zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Builder;
    use chrono::NaiveDate;

    fn new_year_2000() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn costa_rica(offset_from: &str, offset_to: &str) -> TimeZone {
        TimeZone::new()
            .with_tzid("America/Costa_Rica")
            .with_standard_dtstart(new_year_2000())
            .with_offset_from(offset_from)
            .unwrap()
            .with_offset_to(offset_to)
            .unwrap()
            .with_standard_tzname("DST")
            .with_daylight_dtstart(new_year_2000())
            .with_daylight_tzname("DLT")
    }

    #[test]
    fn builds_costa_rica_time_zone() {
        let text = costa_rica("-0600", "-0600").build(&Builder::bundled()).unwrap();

        let expected = [
            "BEGIN:VTIMEZONE",
            "TZID:America/Costa_Rica",
            "BEGIN:STANDARD",
            "DTSTART:20000101T000000",
            "TZOFFSETFROM:-0600",
            "TZOFFSETTO:-0600",
            "TZNAME:DST",
            "END:STANDARD",
            "BEGIN:DAYLIGHT",
            "DTSTART:20000101T000000",
            "TZOFFSETFROM:-0600",
            "TZOFFSETTO:-0600",
            "TZNAME:DLT",
            "END:DAYLIGHT",
            "END:VTIMEZONE",
            "",
        ]
        .join("\r\n");
        assert_eq!(text, expected);
        assert!(text.split("\r\n").all(|line| line.len() <= 75));
    }

    #[test]
    fn daylight_offsets_are_swapped() {
        let text = costa_rica("-0500", "-0600").build(&Builder::bundled()).unwrap();
        let daylight = &text[text.find("BEGIN:DAYLIGHT").unwrap()..];
        assert!(text.contains("BEGIN:STANDARD\r\nDTSTART:20000101T000000\r\nTZOFFSETFROM:-0500\r\nTZOFFSETTO:-0600\r\n"));
        assert!(daylight.contains("TZOFFSETFROM:-0600\r\nTZOFFSETTO:-0500\r\n"));
    }

    #[test]
    fn offset_without_sign_is_rejected() {
        let err = TimeZone::new().with_offset_from("600").unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidArgument { ref value, ref attribute }
                if value == "600" && attribute == "offset_from"
        ));
        assert!(TimeZone::new().with_offset_to("+06:00").is_err());
        assert!("+0530".parse::<UtcOffset>().is_ok());
    }

    #[test]
    fn missing_tzname_fails_build() {
        let time_zone = TimeZone {
            daylight_tzname: None,
            ..costa_rica("-0600", "-0600")
        };
        let err = time_zone.build(&Builder::bundled()).unwrap_err();
        assert!(matches!(err, CodecError::MissingAttribute { ref name } if name == "daylight_tzname"));
    }

    #[test]
    fn loads_back_from_built_text() {
        let original = costa_rica("-0500", "-0600");
        let text = original.build(&Builder::bundled()).unwrap();
        let loaded = TimeZone::load_from(&text).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn rejects_bad_offset_in_attributes() {
        let attributes = AttributeSet::new().with("offset_to", "0600");
        let err = TimeZone::from_attributes(&attributes).unwrap_err();
        assert_eq!(err.attribute(), Some("offset_to"));
    }

    #[test]
    fn spec_covers_schema() {
        assert_eq!(TimeZone::spec().len(), TimeZone::SCHEMA.len());
    }
}
