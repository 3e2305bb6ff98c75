//! StateMod control file (`*.ctl`).

use std::fmt;
use std::str::FromStr;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DatasetError;
use crate::fs_util;

/// Tri-state control switch: negative means the data is noted in the
/// dataset but not used, zero means off, positive means on (or a variant).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Switch(i32);

impl Switch {
    pub const OFF: Switch = Switch(0);

    pub fn new(raw: i32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> i32 {
        self.0
    }

    /// The data exists, even if only as a placeholder line.
    pub fn is_on(self) -> bool {
        self.0 != 0
    }

    pub fn is_active(self) -> bool {
        self.0 > 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum YearType {
    #[default]
    #[serde(rename = "CYR")]
    Calendar,
    #[serde(rename = "WYR")]
    Water,
    #[serde(rename = "IYR")]
    Irrigation,
}

impl fmt::Display for YearType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearType::Calendar => write!(f, "CYR"),
            YearType::Water => write!(f, "WYR"),
            YearType::Irrigation => write!(f, "IYR"),
        }
    }
}

impl FromStr for YearType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CYR" => Ok(YearType::Calendar),
            "WYR" => Ok(YearType::Water),
            "IYR" => Ok(YearType::Irrigation),
            _ => Err(()),
        }
    }
}

/// Parsed control file. Field names follow the StateMod documentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSettings {
    pub heading1: String,
    pub heading2: String,
    /// First simulation year.
    pub iystr: i32,
    /// Last simulation year.
    pub iyend: i32,
    /// Output units switch.
    pub iresop: i32,
    pub moneva: i32,
    /// Natural flow input type (1 = total, 2 = gains).
    pub iopflo: i32,
    pub numpre: i32,
    pub numeva: i32,
    /// Delay table entry count, negative when variable.
    pub interv: i32,
    /// cfs to af/day conversion.
    pub factor: f64,
    pub rfacto: f64,
    pub dfacto: f64,
    pub ffacto: f64,
    pub cfacto: f64,
    pub efacto: f64,
    pub pfacto: f64,
    pub cyrl: YearType,
    pub icondem: i32,
    pub ichk: i32,
    pub ireopx: i32,
    /// Instream flow approach; 2 and 3 use reach-based monthly demands.
    pub ireach: i32,
    pub icall: i32,
    /// Station reported in detailed call output.
    pub ccall: String,
    pub iday: Switch,
    pub iwell: Switch,
    pub gwmaxrc: f64,
    pub isjrip: Switch,
    pub itsfile: Switch,
    pub ieffmax: Switch,
    pub isoil: Switch,
    pub isig: i32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            heading1: String::new(),
            heading2: String::new(),
            iystr: 0,
            iyend: 0,
            iresop: 2,
            moneva: 0,
            iopflo: 1,
            numpre: 0,
            numeva: 0,
            interv: -1,
            factor: 1.9835,
            rfacto: 1.9835,
            dfacto: 1.9835,
            ffacto: 1.9835,
            cfacto: 1.0,
            efacto: 1.0,
            pfacto: 1.0,
            cyrl: YearType::Calendar,
            icondem: 1,
            ichk: 0,
            ireopx: 0,
            ireach: 0,
            icall: 0,
            ccall: String::new(),
            iday: Switch::OFF,
            iwell: Switch::OFF,
            gwmaxrc: 0.0,
            isjrip: Switch::OFF,
            itsfile: Switch::OFF,
            ieffmax: Switch::OFF,
            isoil: Switch::OFF,
            isig: 0,
        }
    }
}

impl ControlSettings {
    pub fn has_daily_data(&self) -> bool {
        self.iday.is_on()
    }

    pub fn has_well_data(&self) -> bool {
        self.iwell.is_on()
    }

    pub fn has_san_juan_data(&self) -> bool {
        self.isjrip.is_on()
    }

    pub fn has_irrigation_practice_data(&self) -> bool {
        self.itsfile.is_on()
    }

    pub fn has_variable_efficiency(&self) -> bool {
        self.ieffmax.is_on()
    }

    pub fn has_soil_moisture_data(&self) -> bool {
        self.isoil.is_on()
    }

    pub fn has_reach_instream_demand(&self) -> bool {
        matches!(self.ireach, 2 | 3)
    }
}

type Setter = fn(&mut ControlSettings, &str) -> Option<()>;

macro_rules! field {
    ($name:ident, int) => {
        (stringify!($name), |s, t| {
            s.$name = parse_int(t)?;
            Some(())
        })
    };
    ($name:ident, real) => {
        (stringify!($name), |s, t| {
            s.$name = t.parse().ok()?;
            Some(())
        })
    };
    ($name:ident, switch) => {
        (stringify!($name), |s, t| {
            s.$name = Switch(parse_int(t)?);
            Some(())
        })
    };
    ($name:ident, text) => {
        (stringify!($name), |s, t| {
            s.$name = t.to_string();
            Some(())
        })
    };
}

/// Data fields in file order, after the two headings.
const FIELDS: [(&str, Setter); 30] = [
    field!(iystr, int),
    field!(iyend, int),
    field!(iresop, int),
    field!(moneva, int),
    field!(iopflo, int),
    field!(numpre, int),
    field!(numeva, int),
    field!(interv, int),
    field!(factor, real),
    field!(rfacto, real),
    field!(dfacto, real),
    field!(ffacto, real),
    field!(cfacto, real),
    field!(efacto, real),
    field!(pfacto, real),
    field!(cyrl, real),
    field!(icondem, int),
    field!(ichk, int),
    field!(ireopx, int),
    field!(ireach, int),
    field!(icall, int),
    field!(ccall, text),
    field!(iday, switch),
    field!(iwell, switch),
    field!(gwmaxrc, real),
    field!(isjrip, switch),
    field!(itsfile, switch),
    field!(ieffmax, switch),
    field!(isoil, switch),
    field!(isig, int),
];

fn is_skipped(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn parse_int(token: &str) -> Option<i32> {
    if let Ok(value) = token.parse::<i32>() {
        return Some(value);
    }
    // Older files write switches as reals ("1.", "-1.0").
    let value = token.parse::<f64>().ok()?;
    (value.fract() == 0.0 && value.abs() <= f64::from(i32::MAX)).then_some(value as i32)
}

/// Parses control file lines. Missing trailing fields keep their defaults.
pub fn parse_control_file<I, S>(lines: I) -> Result<ControlSettings, DatasetError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut settings = ControlSettings::default();
    let mut significant = 0usize;

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        if is_skipped(line) {
            continue;
        }
        significant += 1;
        match significant {
            1 => settings.heading1 = line.trim_end().to_string(),
            2 => settings.heading2 = line.trim_end().to_string(),
            _ => {
                let Some((name, set)) = FIELDS.get(significant - 3).copied() else {
                    debug!(line = index + 1, "ignoring control line past the last field");
                    continue;
                };
                let token = line.split_whitespace().next().unwrap_or_default();
                set(&mut settings, token).ok_or_else(|| DatasetError::MalformedControlFile {
                    line: index + 1,
                    field: name,
                    value: token.to_string(),
                })?;
            }
        }
    }

    if settings.iystr > 0 && settings.iyend > 0 && settings.iystr > settings.iyend {
        return Err(DatasetError::MalformedControlFile {
            line: 0,
            field: "iyend",
            value: format!("{} precedes start year {}", settings.iyend, settings.iystr),
        });
    }

    debug!(
        fields = significant.saturating_sub(2).min(FIELDS.len()),
        "parsed control file"
    );
    Ok(settings)
}

pub fn read_control_file(path: &Utf8Path) -> Result<ControlSettings, DatasetError> {
    let content = fs_util::read_text(path).map_err(|err| {
        DatasetError::ManifestRead {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    })?;
    parse_control_file(content.lines())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_states() {
        assert!(Switch::new(-1).is_on());
        assert!(!Switch::new(-1).is_active());
        assert!(!Switch::OFF.is_on());
        assert!(Switch::new(2).is_active());
    }

    #[test]
    fn integer_fields_accept_whole_reals() {
        assert_eq!(parse_int("1."), Some(1));
        assert_eq!(parse_int("-1.0"), Some(-1));
        assert_eq!(parse_int("1.5"), None);
    }
}
