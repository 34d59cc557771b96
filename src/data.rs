//! Loading of raw per-season match files into a unified table.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use strum::IntoEnumIterator;
use thiserror::Error;
use tracing::debug;

/// Columns that every source file must carry. Anything else in the file is
/// projected away. The serialized names are the fixed header keys understood
/// by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumIter)]
pub enum Column {
    #[strum(serialize = "h.title")]
    HomeTeam,
    #[strum(serialize = "a.title")]
    AwayTeam,
    #[strum(serialize = "goals.h")]
    HomeGoals,
    #[strum(serialize = "goals.a")]
    AwayGoals,
    #[strum(serialize = "xG.h")]
    HomeXg,
    #[strum(serialize = "xG.a")]
    AwayXg,
}

/// One played fixture, tagged with the season its source file covers.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub home_xg: f64,
    pub away_xg: f64,
    pub season: i32,
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read '{path}': {source}")]
    NotFound {
        path: String,
        source: std::io::Error,
    },

    #[error("'{path}' is missing required column '{column}'")]
    SchemaMismatch { path: String, column: String },

    #[error(
        "cannot derive a season from '{path}': expected an integer as the \
         second underscore-delimited token of the file name"
    )]
    MalformedSourceIdentifier { path: String },

    #[error("'{path}' line {line}: {reason}")]
    MalformedRow {
        path: String,
        line: u64,
        reason: String,
    },

    #[error("CSV error in '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

/// Extracts the season from a source path. The convention is fixed: the last
/// path segment is split on underscores and the second token is parsed as an
/// integer (`understat_2016_epl.csv` -> 2016). Callers whose file names do
/// not follow the convention cannot be loaded.
pub fn season_from_path(path: &Path) -> Result<i32, DataError> {
    let malformed = || DataError::MalformedSourceIdentifier {
        path: path.display().to_string(),
    };
    let segment = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(malformed)?;
    let token = segment.split('_').nth(1).ok_or_else(malformed)?;
    token.parse().map_err(|_| malformed())
}

/// Reads every source in order and concatenates the rows into one unified
/// table, preserving input order across sources and within each source.
pub fn read_from_files(paths: &[PathBuf]) -> Result<Vec<MatchRecord>, DataError> {
    let mut records = vec![];
    for path in paths {
        let season = season_from_path(path)?;
        let file = File::open(path).map_err(|source| DataError::NotFound {
            path: path.display().to_string(),
            source,
        })?;
        let before = records.len();
        read_records(file, season, &path.display().to_string(), &mut records)?;
        debug!(
            "loaded {} rows from {} (season {season})",
            records.len() - before,
            path.display()
        );
    }
    Ok(records)
}

/// Locations of the required columns within a source's header row.
struct Projection {
    ordinals: Vec<usize>,
}
impl Projection {
    fn resolve(path: &str, headers: &StringRecord) -> Result<Self, DataError> {
        let mut ordinals = Vec::with_capacity(Column::iter().count());
        for column in Column::iter() {
            let name = column.to_string();
            let ordinal = headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| DataError::SchemaMismatch {
                    path: String::from(path),
                    column: name,
                })?;
            ordinals.push(ordinal);
        }
        Ok(Self { ordinals })
    }

    fn cell<'a>(
        &self,
        column: Column,
        record: &'a StringRecord,
        path: &str,
        line: u64,
    ) -> Result<&'a str, DataError> {
        record
            .get(self.ordinals[column as usize])
            .ok_or_else(|| DataError::MalformedRow {
                path: String::from(path),
                line,
                reason: format!("no value for column '{column}'"),
            })
    }
}

fn read_records(
    reader: impl Read,
    season: i32,
    path: &str,
    records: &mut Vec<MatchRecord>,
) -> Result<(), DataError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|source| DataError::Csv {
            path: String::from(path),
            source,
        })?
        .clone();
    let projection = Projection::resolve(path, &headers)?;

    for row in reader.records() {
        let row = row.map_err(|source| DataError::Csv {
            path: String::from(path),
            source,
        })?;
        let line = row.position().map(|position| position.line()).unwrap_or(0);
        records.push(MatchRecord {
            home_team: String::from(projection.cell(Column::HomeTeam, &row, path, line)?),
            away_team: String::from(projection.cell(Column::AwayTeam, &row, path, line)?),
            home_goals: parse_cell(&projection, Column::HomeGoals, &row, path, line)?,
            away_goals: parse_cell(&projection, Column::AwayGoals, &row, path, line)?,
            home_xg: parse_cell(&projection, Column::HomeXg, &row, path, line)?,
            away_xg: parse_cell(&projection, Column::AwayXg, &row, path, line)?,
            season,
        });
    }
    Ok(())
}

fn parse_cell<T: std::str::FromStr>(
    projection: &Projection,
    column: Column,
    record: &StringRecord,
    path: &str,
    line: u64,
) -> Result<T, DataError> {
    let cell = projection.cell(column, record, path, line)?;
    cell.trim().parse().map_err(|_| DataError::MalformedRow {
        path: String::from(path),
        line,
        reason: format!("cannot parse '{cell}' in column '{column}'"),
    })
}
