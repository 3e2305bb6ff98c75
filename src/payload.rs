//! Readers for component files.
//!
//! Only the fields the load sequence needs are interpreted: stations and
//! rights use the leading fixed columns of the StateMod formats, time series
//! use whitespace-separated rows, and anything else is kept as raw lines.

use std::collections::HashMap;
use std::fs;
use std::io;

use camino::Utf8Path;

use crate::catalog::{ComponentDescriptor, PayloadKind, TsInterval};
use crate::control::parse_control_file;
use crate::domain::{Payload, Right, Station, StationId, TimeSeries, TsRow};
use crate::error::DatasetError;
use crate::fs_util;

/// What exists at a resolved component path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    Missing,
    Empty,
    Present,
}

impl Probe {
    pub fn is_placeholder(self) -> bool {
        matches!(self, Probe::Missing | Probe::Empty)
    }
}

pub fn probe(path: &Utf8Path) -> Probe {
    match fs::metadata(path.as_std_path()) {
        Ok(meta) if meta.is_file() && meta.len() == 0 => Probe::Empty,
        Ok(_) => Probe::Present,
        Err(err) if err.kind() == io::ErrorKind::NotFound => Probe::Missing,
        // Anything else surfaces when the file is opened.
        Err(_) => Probe::Present,
    }
}

pub fn load(desc: &ComponentDescriptor, path: &Utf8Path) -> Result<Payload, DatasetError> {
    let load_error = |message: String| DatasetError::ComponentLoad {
        component: desc.display_name,
        path: path.to_path_buf(),
        message,
    };
    let content = fs_util::read_text(path).map_err(|err| load_error(err.to_string()))?;

    match desc.payload {
        PayloadKind::Control => parse_control_file(content.lines())
            .map(Payload::Control)
            .map_err(|err| load_error(err.to_string())),
        PayloadKind::Stations => parse_stations(&content).map(Payload::Stations).map_err(load_error),
        PayloadKind::Rights => parse_rights(&content).map(Payload::Rights).map_err(load_error),
        PayloadKind::TimeSeries => parse_time_series(&content, desc)
            .map(Payload::TimeSeries)
            .map_err(load_error),
        PayloadKind::Raw | PayloadKind::None => {
            Ok(Payload::Raw(content.lines().map(str::to_string).collect()))
        }
    }
}

fn records(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
}

/// Characters `start..end` of a fixed-format line, trimmed.
fn column(line: &str, start: usize, end: usize) -> &str {
    let mut indices = line.char_indices().map(|(index, _)| index).chain([line.len()]);
    let Some(from) = indices.nth(start) else {
        return "";
    };
    let to = indices.nth(end - start - 1).unwrap_or(line.len());
    line[from..to].trim()
}

pub fn parse_stations(content: &str) -> Result<Vec<Station>, String> {
    let mut stations = Vec::new();
    for (line_no, line) in records(content) {
        let raw_id = column(line, 0, 12);
        // Indented lines continue the previous station.
        if raw_id.is_empty() {
            continue;
        }
        let id: StationId = raw_id
            .parse()
            .map_err(|err| format!("line {line_no}: {err}"))?;
        let mut station = Station::new(id, column(line, 12, 36));
        station.river_node = column(line, 36, 48).to_string();
        stations.push(station);
    }
    Ok(stations)
}

fn parse_number(value: &str, default: f64, line_no: usize, field: &str) -> Result<f64, String> {
    if value.is_empty() {
        return Ok(default);
    }
    value
        .parse()
        .map_err(|_| format!("line {line_no}: invalid {field} {value:?}"))
}

pub fn parse_rights(content: &str) -> Result<Vec<Right>, String> {
    let mut rights = Vec::new();
    for (line_no, line) in records(content) {
        let id = column(line, 0, 12);
        if id.is_empty() {
            return Err(format!("line {line_no}: missing right id"));
        }
        let station: StationId = column(line, 36, 48)
            .parse()
            .map_err(|err| format!("line {line_no}: {err}"))?;
        let admin_number = parse_number(column(line, 48, 64), 99999.0, line_no, "administration number")?;
        let decree = parse_number(column(line, 64, 72), 0.0, line_no, "decree")?;
        let on_off = parse_number(column(line, 72, 80), 1.0, line_no, "on/off switch")? as i32;
        rights.push(Right {
            id: id.to_string(),
            name: column(line, 12, 36).to_string(),
            station,
            admin_number,
            decree,
            on_off,
            linked: false,
        });
    }
    Ok(rights)
}

/// Reads rows and tags every series with the catalog's data type, units and
/// interval, which the files themselves do not carry.
pub fn parse_time_series(
    content: &str,
    desc: &ComponentDescriptor,
) -> Result<Vec<TimeSeries>, String> {
    let mut series: Vec<TimeSeries> = Vec::new();
    let mut by_location: HashMap<String, usize> = HashMap::new();

    for (position, (line_no, line)) in records(content).enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        // Optional period header such as "1/1950  -  12/2005 ACFT CYR".
        if position == 0 && tokens.first().is_some_and(|token| token.contains('/')) {
            continue;
        }

        let (year, month, location, values) = match desc.ts_interval {
            TsInterval::Day => match tokens.as_slice() {
                [year, month, location, values @ ..] => (year, Some(month), location, values),
                _ => return Err(format!("line {line_no}: expected year, month and station")),
            },
            _ => match tokens.as_slice() {
                [year, location, values @ ..] => (year, None, location, values),
                _ => return Err(format!("line {line_no}: expected year and station")),
            },
        };
        let year: i32 = year
            .parse()
            .map_err(|_| format!("line {line_no}: invalid year {year:?}"))?;
        let month = month
            .map(|month| {
                month
                    .parse::<u32>()
                    .ok()
                    .filter(|month| (1..=12).contains(month))
                    .ok_or_else(|| format!("line {line_no}: invalid month {month:?}"))
            })
            .transpose()?;
        let location: StationId = location
            .parse()
            .map_err(|err| format!("line {line_no}: {err}"))?;
        if values.is_empty() {
            return Err(format!("line {line_no}: no values"));
        }
        let limit = match desc.ts_interval {
            TsInterval::Day => 31,
            TsInterval::Year => 1,
            TsInterval::Month | TsInterval::Unknown => 12,
        };
        let values = values
            .iter()
            .take(limit)
            .map(|value| {
                value
                    .parse::<f64>()
                    .map_err(|_| format!("line {line_no}: invalid value {value:?}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let index = *by_location
            .entry(location.as_str().to_string())
            .or_insert_with(|| {
                series.push(TimeSeries {
                    location: location.clone(),
                    data_type: desc.ts_data_type.to_string(),
                    units: desc.ts_units.to_string(),
                    interval: desc.ts_interval,
                    rows: Vec::new(),
                    linked: false,
                });
                series.len() - 1
            });
        series[index].rows.push(TsRow {
            year,
            month,
            values,
        });
    }
    Ok(series)
}
