use serde::Serialize;

use crate::models::{
    error::Error,
    race::{ConstructorStanding, DriverStanding},
};

/// One standings row, in the order the API returned it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsEntry {
    pub position: u32,
    pub name: String,
    pub points: f64,
    pub team_id: String,
}

impl StandingsEntry {
    pub fn points_text(&self) -> String {
        self.points.to_string()
    }

    pub fn is_top3(&self) -> bool {
        self.position <= 3
    }
}

fn parse_position(position: Option<&str>, position_text: Option<&str>) -> Result<u32, Error> {
    position
        .or(position_text)
        .and_then(|p| p.trim().parse().ok())
        .ok_or_else(|| Error::invalid("Invalid data structure"))
}

fn parse_points(points: &str) -> Result<f64, Error> {
    points
        .trim()
        .parse()
        .map_err(|_| Error::InvalidData(format!("Invalid points '{points}'")))
}

impl TryFrom<&DriverStanding> for StandingsEntry {
    type Error = Error;

    fn try_from(standing: &DriverStanding) -> Result<Self, Self::Error> {
        let team_id = standing
            .constructors
            .first()
            .map(|c| c.constructor_id.to_lowercase())
            .unwrap_or_else(|| "default".to_string());
        Ok(StandingsEntry {
            position: parse_position(
                standing.position.as_deref(),
                standing.position_text.as_deref(),
            )?,
            name: standing.driver.family_name.clone(),
            points: parse_points(&standing.points)?,
            team_id,
        })
    }
}

impl TryFrom<&ConstructorStanding> for StandingsEntry {
    type Error = Error;

    fn try_from(standing: &ConstructorStanding) -> Result<Self, Self::Error> {
        Ok(StandingsEntry {
            position: parse_position(
                standing.position.as_deref(),
                standing.position_text.as_deref(),
            )?,
            name: standing.constructor.name.clone(),
            points: parse_points(&standing.points)?,
            team_id: standing.constructor.constructor_id.to_lowercase(),
        })
    }
}
