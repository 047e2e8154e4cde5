use serde::Serialize;

use crate::row_source::StatRow;

pub const COL_PLAYER: &str = "Player";
pub const COL_TEAM: &str = "Team";
pub const COL_POSITION: &str = "POS";
pub const COL_SEASON: &str = "SZN";
pub const COL_WEEK: &str = "Week";
pub const COL_COMPLETION_PCT: &str = "Comp%";
pub const COL_RECEPTION_PCT: &str = "REC%";
pub const COL_PASS_ATTEMPTS: &str = "Pass";
pub const COL_PASS_YARDS: &str = "Pass.1";
pub const COL_PASS_TDS: &str = "Pass.2";
pub const COL_RUSH_ATTEMPTS: &str = "Rush";
pub const COL_RUSH_YARDS: &str = "Rush.1";
pub const COL_RUSH_TDS: &str = "Rush.2";
pub const COL_REC_YARDS: &str = "Rec";
pub const COL_REC_TDS: &str = "Rec.1";
pub const COL_TARGETS: &str = "TGT";

pub const UNKNOWN_POSITION: &str = "Unknown";

const NOT_AVAILABLE: &str = "na";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("missing required column {0}")]
    Missing(&'static str),

    #[error("column {column}: cannot parse {value:?} as a number")]
    Invalid { column: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowIdentity {
    pub player: String,
    pub team_code: String,
    pub position: String,
    pub season: i64,
    pub week: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatFields {
    pub passing_yards: i64,
    pub rushing_yards: i64,
    pub receiving_yards: i64,
    pub passing_touchdowns: i64,
    pub rushing_touchdowns: i64,
    pub receiving_touchdowns: i64,
    pub rush_attempts: i64,
    pub targets: i64,
    pub passing_attempts: i64,
    pub receiving_percentage: f64,
    pub completion_percentage: f64,
}

pub fn row_identity(row: &StatRow) -> Result<RowIdentity, FieldError> {
    let player = required(row, COL_PLAYER)?;
    let team_code = required(row, COL_TEAM)?;
    let season = parse_count(COL_SEASON, Some(required(row, COL_SEASON)?))?;
    let week = parse_count(COL_WEEK, Some(required(row, COL_WEEK)?))?;
    let position = row
        .get(COL_POSITION)
        .unwrap_or(UNKNOWN_POSITION)
        .to_string();

    Ok(RowIdentity {
        player: player.to_string(),
        team_code: team_code.to_string(),
        position,
        season,
        week,
    })
}

pub fn stat_fields(row: &StatRow) -> Result<StatFields, FieldError> {
    let count = |column: &'static str| parse_count(column, row.get(column));
    let pct = |column: &'static str| parse_percentage(column, row.get(column));

    Ok(StatFields {
        passing_yards: count(COL_PASS_YARDS)?,
        rushing_yards: count(COL_RUSH_YARDS)?,
        receiving_yards: count(COL_REC_YARDS)?,
        passing_touchdowns: count(COL_PASS_TDS)?,
        rushing_touchdowns: count(COL_RUSH_TDS)?,
        receiving_touchdowns: count(COL_REC_TDS)?,
        rush_attempts: count(COL_RUSH_ATTEMPTS)?,
        targets: count(COL_TARGETS)?,
        passing_attempts: count(COL_PASS_ATTEMPTS)?,
        receiving_percentage: pct(COL_RECEPTION_PCT)?,
        completion_percentage: pct(COL_COMPLETION_PCT)?,
    })
}

pub fn parse_percentage(column: &'static str, raw: Option<&str>) -> Result<f64, FieldError> {
    let Some(raw) = raw else {
        return Ok(0.0);
    };
    let value = raw.trim().trim_matches('%').trim();
    if value.is_empty() || value.eq_ignore_ascii_case(NOT_AVAILABLE) {
        return Ok(0.0);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FieldError::Invalid {
            column,
            value: raw.to_string(),
        })
}

// Exports write integer columns with gaps as "12.0"; those truncate.
pub fn parse_count(column: &'static str, raw: Option<&str>) -> Result<i64, FieldError> {
    let Some(raw) = raw else {
        return Ok(0);
    };
    let value = raw.trim();
    if value.is_empty() {
        return Ok(0);
    }
    if let Ok(n) = value.parse::<i64>() {
        return Ok(n);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() < i64::MAX as f64)
        .map(|v| v.trunc() as i64)
        .ok_or_else(|| FieldError::Invalid {
            column,
            value: raw.to_string(),
        })
}

fn required<'a>(row: &'a StatRow, column: &'static str) -> Result<&'a str, FieldError> {
    row.get(column).ok_or(FieldError::Missing(column))
}
