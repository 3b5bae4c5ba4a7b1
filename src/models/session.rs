use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    error::Error,
    race::{Race, SessionTime},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionKind {
    FirstPractice,
    SecondPractice,
    ThirdPractice,
    Sprint,
    SprintQualifying,
    Qualifying,
    Race,
}

impl SessionKind {
    pub fn label(&self) -> &'static str {
        match self {
            SessionKind::FirstPractice => "FP1",
            SessionKind::SecondPractice => "FP2",
            SessionKind::ThirdPractice => "FP3",
            SessionKind::Sprint => "SPR",
            SessionKind::SprintQualifying => "SQ",
            SessionKind::Qualifying => "Qualifying",
            SessionKind::Race => "Race",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub kind: SessionKind,
    pub start: DateTime<Utc>,
}

/// A Grand Prix round with its five sessions in weekend order.
#[derive(Debug, Clone)]
pub struct RaceWeekend {
    pub race_name: String,
    pub circuit_name: String,
    pub country_or_location: String,
    pub round: String,
    pub is_sprint_weekend: bool,
    pub sessions: [Session; 5],
}

impl TryFrom<&Race> for RaceWeekend {
    type Error = Error;

    fn try_from(race: &Race) -> Result<Self, Self::Error> {
        let is_sprint_weekend = race.is_sprint_weekend();
        let (second, third) = if is_sprint_weekend {
            (
                (SessionKind::SprintQualifying, &race.sprint_qualifying),
                (SessionKind::Sprint, &race.sprint),
            )
        } else {
            (
                (SessionKind::SecondPractice, &race.second_practice),
                (SessionKind::ThirdPractice, &race.third_practice),
            )
        };

        let session = |kind: SessionKind, time: &Option<SessionTime>| {
            let time = time.as_ref().ok_or_else(|| {
                Error::InvalidData(format!(
                    "{} has no {} session",
                    race.race_name,
                    kind.label()
                ))
            })?;
            Ok::<_, Error>(Session {
                kind,
                start: time.start()?,
            })
        };

        let sessions = [
            session(SessionKind::FirstPractice, &race.first_practice)?,
            session(second.0, second.1)?,
            session(third.0, third.1)?,
            session(SessionKind::Qualifying, &race.qualifying)?,
            Session {
                kind: SessionKind::Race,
                start: race.start()?,
            },
        ];

        Ok(RaceWeekend {
            race_name: race.race_name.clone(),
            circuit_name: race.circuit.circuit_name.clone(),
            country_or_location: race.country_or_location().to_string(),
            round: race.round.clone(),
            is_sprint_weekend,
            sessions,
        })
    }
}

/// Presentation fields of one session, evaluated at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub label: &'static str,
    pub weekday: String,
    pub date: String,
    pub time: String,
    pub is_past: bool,
    pub start: DateTime<Utc>,
}
