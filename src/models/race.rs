use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::error::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Race {
    pub season: String,
    pub round: String,
    pub date: String,
    pub time: Option<String>,
    #[serde(rename = "raceName")]
    pub race_name: String,
    #[serde(rename = "Circuit")]
    pub circuit: Circuit,
    #[serde(rename = "FirstPractice")]
    pub first_practice: Option<SessionTime>,
    #[serde(rename = "SecondPractice")]
    pub second_practice: Option<SessionTime>,
    #[serde(rename = "ThirdPractice")]
    pub third_practice: Option<SessionTime>,
    #[serde(rename = "Qualifying")]
    pub qualifying: Option<SessionTime>,
    #[serde(rename = "Sprint")]
    pub sprint: Option<SessionTime>,
    #[serde(rename = "SprintQualifying")]
    pub sprint_qualifying: Option<SessionTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    #[serde(rename = "circuitId")]
    pub circuit_id: String,
    #[serde(rename = "circuitName")]
    pub circuit_name: String,
    #[serde(rename = "Location")]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub locality: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTime {
    pub date: String,
    pub time: Option<String>,
}

impl SessionTime {
    pub fn start(&self) -> Result<DateTime<Utc>, Error> {
        parse_start(&self.date, self.time.as_deref())
    }
}

impl Race {
    pub fn start(&self) -> Result<DateTime<Utc>, Error> {
        parse_start(&self.date, self.time.as_deref())
    }

    pub fn round_number(&self) -> Result<usize, Error> {
        self.round
            .trim()
            .parse()
            .map_err(|_| Error::InvalidData(format!("Invalid round '{}'", self.round)))
    }

    pub fn is_sprint_weekend(&self) -> bool {
        self.sprint.is_some()
    }

    /// Country, then locality, then the circuit name.
    pub fn country_or_location(&self) -> &str {
        self.circuit
            .location
            .as_ref()
            .and_then(|l| l.country.as_deref().or(l.locality.as_deref()))
            .unwrap_or(&self.circuit.circuit_name)
    }
}

/// Ergast dates are `YYYY-MM-DD` with an optional `HH:MM:SSZ` time in UTC.
/// A missing time means the start of that day.
pub fn parse_start(date: &str, time: Option<&str>) -> Result<DateTime<Utc>, Error> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| Error::InvalidData(format!("Invalid date '{date}'")))?;
    let clock = match time {
        Some(t) => NaiveTime::parse_from_str(t.trim_end_matches('Z'), "%H:%M:%S")
            .map_err(|_| Error::InvalidData(format!("Invalid time '{t}'")))?,
        None => NaiveTime::MIN,
    };
    Ok(day.and_time(clock).and_utc())
}

#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(rename = "MRData")]
    pub mr_data: MrData,
}

#[derive(Debug, Deserialize)]
pub struct MrData {
    #[serde(rename = "RaceTable")]
    pub race_table: Option<RaceTable>,
    #[serde(rename = "StandingsTable")]
    pub standings_table: Option<StandingsTable>,
}

#[derive(Debug, Deserialize)]
pub struct RaceTable {
    #[serde(rename = "Races", default)]
    pub races: Vec<Race>,
}

#[derive(Debug, Deserialize)]
pub struct StandingsTable {
    #[serde(rename = "StandingsLists", default)]
    pub standings_lists: Vec<StandingsList>,
}

#[derive(Debug, Deserialize)]
pub struct StandingsList {
    #[serde(rename = "DriverStandings")]
    pub driver_standings: Option<Vec<DriverStanding>>,
    #[serde(rename = "ConstructorStandings")]
    pub constructor_standings: Option<Vec<ConstructorStanding>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriverStanding {
    pub position: Option<String>,
    #[serde(rename = "positionText")]
    pub position_text: Option<String>,
    pub points: String,
    #[serde(rename = "Driver")]
    pub driver: Driver,
    #[serde(rename = "Constructors", default)]
    pub constructors: Vec<Constructor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConstructorStanding {
    pub position: Option<String>,
    #[serde(rename = "positionText")]
    pub position_text: Option<String>,
    pub points: String,
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Driver {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    #[serde(rename = "familyName")]
    pub family_name: String,
    #[serde(rename = "givenName")]
    pub given_name: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Constructor {
    #[serde(rename = "constructorId")]
    pub constructor_id: String,
    pub name: String,
}

impl Envelope {
    pub fn parse(value: &Value) -> Result<Self, Error> {
        Envelope::deserialize(value).map_err(|_| Error::invalid("Invalid data structure"))
    }

    pub fn into_races(self) -> Result<Vec<Race>, Error> {
        self.mr_data
            .race_table
            .map(|t| t.races)
            .ok_or_else(|| Error::invalid("Invalid data structure"))
    }

    pub fn into_driver_standings(self) -> Result<Vec<DriverStanding>, Error> {
        self.first_standings_list()?
            .driver_standings
            .ok_or_else(|| Error::invalid("Invalid data structure"))
    }

    pub fn into_constructor_standings(self) -> Result<Vec<ConstructorStanding>, Error> {
        self.first_standings_list()?
            .constructor_standings
            .ok_or_else(|| Error::invalid("Invalid data structure"))
    }

    fn first_standings_list(self) -> Result<StandingsList, Error> {
        self.mr_data
            .standings_table
            .and_then(|t| t.standings_lists.into_iter().next())
            .ok_or_else(|| Error::invalid("Invalid data structure"))
    }
}

pub fn races_from(value: &Value) -> Result<Vec<Race>, Error> {
    Envelope::parse(value)?.into_races()
}

/// The single race of a `current/next.json` response.
pub fn next_race_from(value: &Value) -> Result<Race, Error> {
    races_from(value)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::invalid("No upcoming race in response"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_start_with_and_without_time() {
        let with_time = parse_start("2025-03-16", Some("04:00:00Z")).unwrap();
        assert_eq!(with_time.to_rfc3339(), "2025-03-16T04:00:00+00:00");

        let midnight = parse_start("2025-03-16", None).unwrap();
        assert_eq!(midnight.to_rfc3339(), "2025-03-16T00:00:00+00:00");
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(matches!(
            parse_start("16/03/2025", None),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn missing_standings_list_is_invalid_data() {
        let value = json!({"MRData": {"StandingsTable": {"StandingsLists": []}}});
        let err = Envelope::parse(&value)
            .unwrap()
            .into_driver_standings()
            .unwrap_err();
        assert_eq!(err.message(), "Invalid data structure");
    }

    #[test]
    fn country_falls_back_to_circuit_name() {
        let race: Race = serde_json::from_value(json!({
            "season": "2025", "round": "1", "date": "2025-03-16",
            "raceName": "Australian Grand Prix",
            "Circuit": {"circuitId": "albert_park", "circuitName": "Albert Park Grand Prix Circuit"}
        }))
        .unwrap();
        assert_eq!(race.country_or_location(), "Albert Park Grand Prix Circuit");
        assert!(!race.is_sprint_weekend());
    }
}
