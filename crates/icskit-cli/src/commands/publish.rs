//! `icskit publish`, `icskit fetch` and `icskit remove`.

use std::path::Path;

use icskit_core::model::generate_relcaid;
use icskit_core::{AttributeSet, Builder, CalendarObject, Subscription, TimeZone};
use serde_json::json;

use super::{format_attributes, to_json};
use crate::config::IcskitConfig;
use crate::error::CliResult;
use crate::input::{read_table, section};

/// Publishes the subscription described by `input` and returns its URL.
///
/// A missing `relcaid` gets a random one.
pub fn publish(input: &Path, config: &IcskitConfig, builder: &Builder<'_>) -> CliResult<String> {
    let table = read_table(input)?;
    let mut attributes = section(&table, "subscription")?;
    if !attributes.contains("relcaid") {
        attributes.insert("relcaid", generate_relcaid());
    }
    let time_zone = TimeZone::from_attributes(&section(&table, "time_zone")?)?;
    let subscription = Subscription::from_attributes(&attributes)?.with_time_zone(time_zone);

    let store = config.open_store()?;
    let staging = config.open_staging()?;
    let url = subscription.create_with(builder, &store, &staging)?;
    Ok(format!("{url}\n"))
}

/// Reads a published subscription and renders its attributes.
pub fn fetch(url: &str, json: bool, config: &IcskitConfig) -> CliResult<String> {
    let store = config.open_store()?;
    let staging = config.open_staging()?;
    let subscription = Subscription::load(url, &store, &staging)?;

    let calendar = subscription.to_attributes();
    let time_zone = subscription
        .time_zone()
        .map(TimeZone::to_attributes)
        .unwrap_or_else(AttributeSet::new);

    if json {
        return to_json(&json!({
            "subscription": calendar,
            "time_zone": time_zone,
        }));
    }
    Ok(format!(
        "[subscription]\n{}\n[time_zone]\n{}",
        format_attributes(&calendar, false)?,
        format_attributes(&time_zone, false)?
    ))
}

/// Deletes a published subscription.
pub fn remove(url: &str, config: &IcskitConfig) -> CliResult<String> {
    let store = config.open_store()?;
    if Subscription::delete(url, &store)? {
        Ok(format!("deleted {url}\n"))
    } else {
        Ok(format!("nothing published at {url}\n"))
    }
}
