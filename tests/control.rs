use assert_matches::assert_matches;

use statemod_dataset::control::{ControlSettings, Switch, YearType, parse_control_file};
use statemod_dataset::error::DatasetError;

const FULL: &str = "\
# Upper Colorado control file
#
Upper Colorado River Basin
Historical simulation, 1950-2005
     1950     : iystr   STARTING YEAR OF SIMULATION
     2005     : iyend   ENDING YEAR OF SIMULATION
        2     : iresop  OUTPUT UNIT OPTION
        0     : moneva  TYPE OF EVAP. DATA
        1     : iopflo  FACTOR FOR STREAM INPUT
       24     : numpre  NO. OF PRECIPITATION STATIONS
       25     : numeva  NO. OF EVAPORATION STATIONS
       -1     : interv  MAX NUMBER OF ENTRIES IN DELAY TABLE
   1.9835     : factor
   1.9835     : rfacto
   1.9835     : dfacto
   0.0        : ffacto
   1.0        : cfacto
   0.0833     : efacto
   0.0833     : pfacto
   WYR        : cyrl
        1     : icondem
        0     : ichk
        0     : ireopx
        2     : ireach
        0     : icall
 0100501      : ccall
        0     : iday
       -1.    : iwell
      0.5     : gwmaxrc
        0     : isjrip
        1     : itsfile
        0     : ieffmax
        2     : isoil
        0     : isig
";

#[test]
fn parses_every_field_in_position() {
    let settings = parse_control_file(FULL.lines()).unwrap();
    assert_eq!(settings.heading1, "Upper Colorado River Basin");
    assert_eq!(settings.heading2, "Historical simulation, 1950-2005");
    assert_eq!(settings.iystr, 1950);
    assert_eq!(settings.iyend, 2005);
    assert_eq!(settings.numeva, 25);
    assert_eq!(settings.interv, -1);
    assert_eq!(settings.ffacto, 0.0);
    assert_eq!(settings.efacto, 0.0833);
    assert_eq!(settings.cyrl, YearType::Water);
    assert_eq!(settings.ireach, 2);
    assert_eq!(settings.ccall, "0100501");
    assert_eq!(settings.iwell, Switch::new(-1));
    assert_eq!(settings.gwmaxrc, 0.5);
    assert!(settings.has_irrigation_practice_data());
    assert!(settings.has_soil_moisture_data());
    assert!(settings.has_reach_instream_demand());
    assert!(!settings.has_daily_data());
}

#[test]
fn short_files_keep_defaults() {
    let ten: Vec<&str> = FULL.lines().take(14).collect();
    let settings = parse_control_file(ten).unwrap();
    assert_eq!(settings.rfacto, 1.9835);
    assert_eq!(settings.dfacto, 1.9835);
    assert_eq!(settings.ffacto, 1.9835);
    assert_eq!(settings.cyrl, YearType::Calendar);
    assert_eq!(settings.iwell, Switch::OFF);

    let settings = parse_control_file(["Heading", "Second heading", "1950", "2005"]).unwrap();
    assert_eq!(settings.iresop, 2);
    assert_eq!(settings.factor, 1.9835);
    assert_eq!(settings, ControlSettings {
        heading1: "Heading".to_string(),
        heading2: "Second heading".to_string(),
        iystr: 1950,
        iyend: 2005,
        ..ControlSettings::default()
    });
}

#[test]
fn headings_are_positional() {
    let settings = parse_control_file(["", "# note", "1950", "iyend", "1960", "1970"]).unwrap();
    assert_eq!(settings.heading1, "1950");
    assert_eq!(settings.heading2, "iyend");
    assert_eq!(settings.iystr, 1960);
}

#[test]
fn malformed_field_reports_line_and_name() {
    let err = parse_control_file(["Heading", "Heading", "1950", "20O5  : iyend"]).unwrap_err();
    assert_matches!(
        err,
        DatasetError::MalformedControlFile { line: 4, field: "iyend", ref value } if value == "20O5"
    );

    let err = parse_control_file(FULL.replace("WYR", "XYR").lines()).unwrap_err();
    assert_matches!(err, DatasetError::MalformedControlFile { field: "cyrl", .. });
}

#[test]
fn start_year_after_end_year_is_rejected() {
    let err = parse_control_file(["Heading", "Heading", "2005", "1950"]).unwrap_err();
    assert_matches!(err, DatasetError::MalformedControlFile { field: "iyend", .. });
}
