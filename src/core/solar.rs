//! Sunrise and sunset for the configured location, via `sun_times`.

use crate::config::LocationConfig;
use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveDate, Utc};
use std::time::Duration;

// 3/21 與 9/23 的年序日
const MARCH_EQUINOX_ORDINAL: u32 = 80;
const SEPTEMBER_EQUINOX_ORDINAL: u32 = 266;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Daylight {
    /// Midnight sun
    AlwaysUp,
    /// Polar night
    AlwaysDown,
    Window {
        sunrise: DateTime<Utc>,
        sunset: DateTime<Utc>,
    },
}

impl Daylight {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        match *self {
            Daylight::AlwaysUp => true,
            Daylight::AlwaysDown => false,
            Daylight::Window { sunrise, sunset } => sunrise <= instant && instant < sunset,
        }
    }
}

/// Solar events around the solar noon of `date` (UTC) at `location`.
/// Longitude is east-positive; elevation in metres lowers the apparent horizon.
pub fn daylight(date: NaiveDate, location: &LocationConfig) -> Daylight {
    match sun_times::sun_times(
        date,
        location.latitude,
        location.longitude,
        location.elevation.max(0.0),
    ) {
        Some((sunrise, sunset)) => Daylight::Window { sunrise, sunset },
        None => polar(date, location.latitude),
    }
}

/// No sunrise at all: the sun stays up in the hemisphere it is over.
fn polar(date: NaiveDate, latitude: f64) -> Daylight {
    let sun_north =
        (MARCH_EQUINOX_ORDINAL..SEPTEMBER_EQUINOX_ORDINAL).contains(&date.ordinal());
    if sun_north == (latitude >= 0.0) {
        Daylight::AlwaysUp
    } else {
        Daylight::AlwaysDown
    }
}

// A UTC date's window can start the previous day far east or end the next day
// far west, so look at the neighbours too.
fn neighbourhood(now: DateTime<Utc>, location: &LocationConfig) -> impl Iterator<Item = Daylight> {
    let today = now.date_naive();
    let location = *location;
    (-1..=2).filter_map(move |offset| {
        today
            .checked_add_signed(ChronoDuration::days(offset))
            .map(|date| daylight(date, &location))
    })
}

pub fn is_daytime(now: DateTime<Utc>, location: &LocationConfig) -> bool {
    if daylight(now.date_naive(), location) == Daylight::AlwaysUp {
        return true;
    }
    neighbourhood(now, location).any(|d| matches!(d, Daylight::Window { .. }) && d.contains(now))
}

/// The first sunrise strictly after `now`, if one happens within two days.
pub fn next_sunrise(now: DateTime<Utc>, location: &LocationConfig) -> Option<DateTime<Utc>> {
    neighbourhood(now, location)
        .filter_map(|d| match d {
            Daylight::Window { sunrise, .. } if sunrise > now => Some(sunrise),
            _ => None,
        })
        .min()
}

pub fn until_next_sunrise(now: DateTime<Utc>, location: &LocationConfig) -> Option<Duration> {
    next_sunrise(now, location).and_then(|sunrise| (sunrise - now).to_std().ok())
}
