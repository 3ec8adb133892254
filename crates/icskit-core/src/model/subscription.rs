use std::sync::LazyLock;

use chrono::{Local, NaiveDateTime};
use uuid::Uuid;

use super::{CalendarObject, Language, TimeZone, format_date_time, put, take};
use crate::attributes::{AttributeSet, AttributeSpec, RuleDecl};
use crate::error::CodecResult;
use crate::template::VCALENDAR_TEMPLATE;

static SPEC: LazyLock<AttributeSpec> = LazyLock::new(|| {
    AttributeSpec::for_schema(
        Subscription::SCHEMA,
        [
            (
                PRODID,
                RuleDecl::SingleLineMatch(r"(?m)^PRODID:-//([^\r\n]*?)//NONSGML"),
            ),
            (
                LANGUAGE,
                RuleDecl::SingleLineMatch(r"(?m)^X-WR-CALNAME;LANGUAGE=(\w*)"),
            ),
            (
                CAL_NAME,
                RuleDecl::DelimitedBlock {
                    start: "^X-WR-CALNAME",
                    end: "^X-WR-CALDESC",
                },
            ),
            (
                CAL_DESC,
                RuleDecl::DelimitedBlock {
                    start: "^X-WR-CALDESC",
                    end: "^X-WR-RELCALID",
                },
            ),
            (
                RELCAID,
                RuleDecl::SingleLineMatch(r"(?m)^X-WR-RELCALID;LANGUAGE=\w*:([\w-]+)"),
            ),
            (
                TZID,
                RuleDecl::SingleLineMatch(r"(?m)^X-WR-TIMEZONE;LANGUAGE=\w*:([^\r\n]+)"),
            ),
            (
                X_DTSTAMP,
                RuleDecl::SingleLineMatch(r"(?m)^X-DTSTAMP;TYPE=DATE-TIME:(\w+)"),
            ),
        ],
    )
    .expect("Invalid VCALENDAR extraction rules")
});

const PRODID: &str = "prodid";
const LANGUAGE: &str = "language";
const CAL_NAME: &str = "cal_name";
const CAL_DESC: &str = "cal_desc";
const RELCAID: &str = "relcaid";
const TZID: &str = "tzid";
const X_DTSTAMP: &str = "x_dtstamp";

/// A published calendar: the VCALENDAR envelope plus its time zone.
///
/// [`Subscription::new`] assigns a random `relcaid`, which also names the
/// published file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscription {
    prodid: Option<String>,
    language: Option<Language>,
    cal_name: Option<String>,
    cal_desc: Option<String>,
    relcaid: Option<String>,
    tzid: Option<String>,
    x_dtstamp: Option<String>,
    time_zone: Option<TimeZone>,
}

/// A fresh random calendar id: 32 lowercase hex digits.
pub fn generate_relcaid() -> String {
    Uuid::new_v4().simple().to_string()
}

impl Subscription {
    pub fn new() -> Self {
        Self {
            relcaid: Some(generate_relcaid()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_prodid(mut self, prodid: impl Into<String>) -> Self {
        self.prodid = Some(prodid.into());
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    #[must_use]
    pub fn with_cal_name(mut self, name: impl Into<String>) -> Self {
        self.cal_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_cal_desc(mut self, desc: impl Into<String>) -> Self {
        self.cal_desc = Some(desc.into());
        self
    }

    #[must_use]
    pub fn with_relcaid(mut self, relcaid: impl Into<String>) -> Self {
        self.relcaid = Some(relcaid.into());
        self
    }

    /// Sets the time zone id used when no time zone is attached.
    #[must_use]
    pub fn with_tzid(mut self, tzid: impl Into<String>) -> Self {
        self.tzid = Some(tzid.into());
        self
    }

    #[must_use]
    pub fn with_x_dtstamp(mut self, stamp: NaiveDateTime) -> Self {
        self.x_dtstamp = Some(format_date_time(&stamp));
        self
    }

    #[must_use]
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = Some(time_zone);
        self
    }

    pub fn prodid(&self) -> Option<&str> {
        self.prodid.as_deref()
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn cal_name(&self) -> Option<&str> {
        self.cal_name.as_deref()
    }

    pub fn cal_desc(&self) -> Option<&str> {
        self.cal_desc.as_deref()
    }

    pub fn relcaid(&self) -> Option<&str> {
        self.relcaid.as_deref()
    }

    /// The attached time zone's id, or the one set directly.
    pub fn tzid(&self) -> Option<&str> {
        self.time_zone
            .as_ref()
            .and_then(TimeZone::tzid)
            .or(self.tzid.as_deref())
    }

    pub fn x_dtstamp(&self) -> Option<&str> {
        self.x_dtstamp.as_deref()
    }

    pub fn time_zone(&self) -> Option<&TimeZone> {
        self.time_zone.as_ref()
    }
}

impl CalendarObject for Subscription {
    const TEMPLATE: &'static str = VCALENDAR_TEMPLATE;
    const OPENING_TAG: &'static str = "BEGIN:VCALENDAR";
    const CLOSING_TAG: &'static str = "X-END=TRUE";
    const SCHEMA: &'static [&'static str] =
        &[PRODID, LANGUAGE, CAL_NAME, CAL_DESC, RELCAID, TZID, X_DTSTAMP];

    fn spec() -> &'static AttributeSpec {
        &SPEC
    }

    /// Unset `x_dtstamp` defaults to the current local time.
    fn to_attributes(&self) -> AttributeSet {
        let mut attributes = AttributeSet::new();
        put(&mut attributes, PRODID, self.prodid());
        put(&mut attributes, LANGUAGE, self.language.as_ref().map(Language::as_str));
        put(&mut attributes, CAL_NAME, self.cal_name());
        put(&mut attributes, CAL_DESC, self.cal_desc());
        put(&mut attributes, RELCAID, self.relcaid());
        put(&mut attributes, TZID, self.tzid());
        let stamp = match &self.x_dtstamp {
            Some(stamp) => stamp.clone(),
            None => format_date_time(&Local::now().naive_local()),
        };
        attributes.insert(X_DTSTAMP, stamp);
        attributes
    }

    fn from_attributes(attributes: &AttributeSet) -> CodecResult<Self> {
        let mut subscription = Self::default();
        take(attributes, PRODID, &mut subscription.prodid);
        take(attributes, CAL_NAME, &mut subscription.cal_name);
        take(attributes, CAL_DESC, &mut subscription.cal_desc);
        take(attributes, RELCAID, &mut subscription.relcaid);
        take(attributes, TZID, &mut subscription.tzid);
        take(attributes, X_DTSTAMP, &mut subscription.x_dtstamp);
        if let Some(language) = attributes.get(LANGUAGE) {
            subscription.language = Some(language.parse()?);
        }
        Ok(subscription)
    }
}
