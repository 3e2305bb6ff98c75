use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{ComponentId, TsInterval};
use crate::control::ControlSettings;
use crate::error::DatasetError;

/// Station identifier as written in StateMod files (up to 12 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StationId(String);

impl StationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StationId {
    type Err = DatasetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        let is_valid = !normalized.is_empty()
            && normalized.chars().count() <= 12
            && !normalized.contains(char::is_whitespace);
        if !is_valid {
            return Err(DatasetError::InvalidStationId(value.to_string()));
        }
        Ok(Self(normalized.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub river_node: String,
    /// Ids of rights administered at this station, filled by reconciliation.
    pub rights: Vec<String>,
    /// Time series components that carry data for this station.
    pub series: Vec<ComponentId>,
}

impl Station {
    pub fn new(id: StationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            river_node: String::new(),
            rights: Vec::new(),
            series: Vec::new(),
        }
    }

    pub fn has_series(&self, component: ComponentId) -> bool {
        self.series.contains(&component)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Right {
    pub id: String,
    pub name: String,
    pub station: StationId,
    pub admin_number: f64,
    pub decree: f64,
    pub on_off: i32,
    /// True once a station with a matching id was found.
    pub linked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TsRow {
    pub year: i32,
    /// Set for daily rows only.
    pub month: Option<u32>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub location: StationId,
    pub data_type: String,
    pub units: String,
    pub interval: TsInterval,
    pub rows: Vec<TsRow>,
    pub linked: bool,
}

/// Loaded contents of one component file.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Control(ControlSettings),
    Stations(Vec<Station>),
    Rights(Vec<Right>),
    TimeSeries(Vec<TimeSeries>),
    Raw(Vec<String>),
}

impl Payload {
    pub fn len(&self) -> usize {
        match self {
            Payload::Control(_) => 1,
            Payload::Stations(items) => items.len(),
            Payload::Rights(items) => items.len(),
            Payload::TimeSeries(items) => items.len(),
            Payload::Raw(lines) => lines.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stations(&self) -> Option<&[Station]> {
        match self {
            Payload::Stations(items) => Some(items),
            _ => None,
        }
    }

    pub fn rights(&self) -> Option<&[Right]> {
        match self {
            Payload::Rights(items) => Some(items),
            _ => None,
        }
    }

    pub fn time_series(&self) -> Option<&[TimeSeries]> {
        match self {
            Payload::TimeSeries(items) => Some(items),
            _ => None,
        }
    }
}
