use std::fmt::Display;

use chrono::{DateTime, Datelike, Duration, Locale, NaiveDate, TimeZone, Utc};
use tracing::{debug, info, warn};

use crate::models::{
    error::Error,
    race::Race,
    session::{RaceWeekend, Session, SessionView},
};

/// How long after lights-out a race still counts as "next".
pub fn race_end_buffer() -> Duration {
    Duration::hours(2)
}

/// Locale and clock preference for session times.
#[derive(Debug, Clone)]
pub struct TimeFormat {
    pub locale: Locale,
    pub twelve_hour: bool,
}

impl TimeFormat {
    /// Accepts BCP 47 style tags such as `en-GB` or `de_DE`; unknown tags use `en_GB`.
    pub fn new(locale: &str, twelve_hour: bool) -> Self {
        let tag = normalize_locale(locale);
        let locale = Locale::try_from(tag.as_str()).unwrap_or_else(|_| {
            debug!("Unknown locale '{locale}', using en_GB");
            Locale::en_GB
        });
        Self {
            locale,
            twelve_hour,
        }
    }

    fn time_pattern(&self) -> &'static str {
        if self.twelve_hour {
            "%-I:%M %p"
        } else {
            "%H:%M"
        }
    }
}

fn normalize_locale(tag: &str) -> String {
    let mut parts = tag.split(['-', '_']);
    let lang = parts.next().unwrap_or_default().to_lowercase();
    match parts.next() {
        Some(region) => format!("{lang}_{}", region.to_uppercase()),
        None => lang,
    }
}

pub fn session_view<Tz>(
    session: &Session,
    now: DateTime<Utc>,
    tz: &Tz,
    format: &TimeFormat,
) -> SessionView
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let local = session.start.with_timezone(tz);
    SessionView {
        label: session.kind.label(),
        weekday: local.format_localized("%a", format.locale).to_string(),
        date: format!("{}/{}", local.day(), local.month()),
        time: local
            .format_localized(format.time_pattern(), format.locale)
            .to_string(),
        is_past: session.start < now,
        start: session.start,
    }
}

/// The five sessions of a weekend in running order, evaluated at `now`.
pub fn derive_sessions<Tz>(
    weekend: &RaceWeekend,
    now: DateTime<Utc>,
    tz: &Tz,
    format: &TimeFormat,
) -> [SessionView; 5]
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    weekend
        .sessions
        .each_ref()
        .map(|session| session_view(session, now, tz, format))
}

/// Picks the race to show given the API's "next race" pointer.
///
/// The pointer can lag behind for a while after a race finishes. Once the
/// pointer race started more than [`race_end_buffer`] ago, the season list is
/// indexed by the pointer's round number. Rounds are 1-based, so as a
/// 0-based index this lands on the following round.
pub fn select_next_race(pointer: Race, season: &[Race], now: DateTime<Utc>) -> Result<Race, Error> {
    let race_end = pointer.start()? + race_end_buffer();
    if race_end >= now {
        return Ok(pointer);
    }

    let round = pointer.round_number()?;
    match season.get(round) {
        Some(next) => {
            info!(
                "{} finished, showing round {} instead",
                pointer.race_name, next.round
            );
            Ok(next.clone())
        }
        None => {
            warn!(
                "{} finished but the season has no entry at index {round}",
                pointer.race_name
            );
            Ok(pointer)
        }
    }
}

/// First race of the season that has not finished yet.
pub fn first_unfinished(season: &[Race], now: DateTime<Utc>) -> Option<&Race> {
    season.iter().find(|race| {
        race.start()
            .map(|start| start + race_end_buffer() >= now)
            .unwrap_or(false)
    })
}

/// Combines the two race endpoints, tolerating the loss of either one.
pub fn resolve_next_race(
    pointer: Result<Race, Error>,
    season: Result<Vec<Race>, Error>,
    now: DateTime<Utc>,
) -> Result<Race, Error> {
    match (pointer, season) {
        (Ok(pointer), Ok(season)) => select_next_race(pointer, &season, now),
        (Ok(pointer), Err(e)) => {
            warn!("Season list unavailable ({e}), using next race as reported");
            select_next_race(pointer, &[], now)
        }
        (Err(e), Ok(season)) => {
            warn!("Next race unavailable ({e}), deriving it from the season list");
            first_unfinished(&season, now).cloned().ok_or(e)
        }
        (Err(e), Err(_)) => Err(e),
    }
}

/// `14 - 16 Mar`, or `30 May - 1 Jun` across a month boundary.
pub fn format_weekend_dates(first_day: NaiveDate, race_day: NaiveDate) -> String {
    let start_month = first_day.format("%b").to_string();
    let end_month = race_day.format("%b").to_string();
    if start_month == end_month {
        format!("{} - {} {end_month}", first_day.day(), race_day.day())
    } else {
        format!(
            "{} {start_month} - {} {end_month}",
            first_day.day(),
            race_day.day()
        )
    }
}

/// Races starting strictly after `now`, skipping the first `skip`, at most `take`.
pub fn upcoming_races(races: &[Race], now: DateTime<Utc>, skip: usize, take: usize) -> Vec<&Race> {
    races
        .iter()
        .filter(|race| race.start().map(|start| start > now).unwrap_or(false))
        .skip(skip)
        .take(take)
        .collect()
}

/// `Sun 16 Mar • 04:00` in 24-hour time.
pub fn format_race_date_time<Tz>(start: DateTime<Utc>, tz: &Tz, separator: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let local = start.with_timezone(tz);
    format!(
        "{}{separator}{}",
        local.format("%a %-d %b"),
        local.format("%H:%M")
    )
}
