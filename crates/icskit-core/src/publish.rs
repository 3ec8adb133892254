//! Publishing subscriptions to an object store.
//!
//! A published subscription is one `.ics` file: the VCALENDAR envelope with
//! its VTIMEZONE embedded before the closing `END:VCALENDAR` line, named
//! after the subscription's `relcaid`.

use icskit_store::{CALENDAR_CONTENT_TYPE, ObjectStore, StagingArea};
use tracing::{debug, info};

use crate::builder::Builder;
use crate::error::{CodecError, CodecResult};
use crate::format::embed_component;
use crate::model::{CalendarObject, Subscription, TimeZone};

/// File extension of published calendars.
pub const CALENDAR_EXTENSION: &str = "ics";

impl Subscription {
    /// Builds the complete calendar file text.
    ///
    /// Requires an attached time zone.
    pub fn render(&self, builder: &Builder<'_>) -> CodecResult<String> {
        let time_zone = self
            .time_zone()
            .ok_or_else(|| CodecError::missing_attribute("time_zone"))?;
        let vcalendar = self.build(builder)?;
        let vtimezone = time_zone.build(builder)?;
        Ok(embed_component(&vcalendar, &vtimezone))
    }

    /// Publishes the subscription with the bundled templates and returns
    /// its public URL.
    pub fn create(&self, store: &dyn ObjectStore, staging: &StagingArea) -> CodecResult<String> {
        self.create_with(&Builder::bundled(), store, staging)
    }

    /// Publishes the subscription and returns its public URL.
    ///
    /// The calendar is staged as `<relcaid>.ics`, saved to `store`, and the
    /// staged copy is removed whether or not the save succeeds.
    pub fn create_with(
        &self,
        builder: &Builder<'_>,
        store: &dyn ObjectStore,
        staging: &StagingArea,
    ) -> CodecResult<String> {
        let content = self.render(builder)?;
        let relcaid = self
            .relcaid()
            .ok_or_else(|| CodecError::missing_attribute("relcaid"))?;
        let file_name = format!("{relcaid}.{CALENDAR_EXTENSION}");

        debug!(file = %file_name, store = store.name(), "Staging calendar");
        let url = staging.stage(&file_name, &content, |path| {
            store
                .save(path, CALENDAR_CONTENT_TYPE)
                .map_err(CodecError::from)
        })?;
        info!(url = %url, relcaid = %relcaid, "Published subscription");
        Ok(url)
    }

    /// Reads a published subscription, with its time zone, back from `store`.
    pub fn load(
        public_url: &str,
        store: &dyn ObjectStore,
        staging: &StagingArea,
    ) -> CodecResult<Self> {
        debug!(url = %public_url, store = store.name(), "Loading subscription");
        staging.fetch(store, public_url, |path| -> CodecResult<Self> {
            let text = staging.read(path)?;
            let time_zone = TimeZone::load_from(&text)?;
            let subscription = Self::load_from(&text)?;
            Ok(subscription.with_time_zone(time_zone))
        })
    }

    /// Deletes a published subscription.
    ///
    /// Returns `false` if nothing was published at `public_url`.
    pub fn delete(public_url: &str, store: &dyn ObjectStore) -> CodecResult<bool> {
        let deleted = store.delete(public_url)?;
        info!(url = %public_url, deleted, "Deleted subscription");
        Ok(deleted)
    }
}
