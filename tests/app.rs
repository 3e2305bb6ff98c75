use std::cell::RefCell;
use std::fs;

use assert_matches::assert_matches;
use camino::{Utf8Path, Utf8PathBuf};

use statemod_dataset::app::{
    DataSet, LoadOptions, NoProgress, ProgressEvent, ProgressSink, ProgressStatus, SaveOptions,
    visibility_report,
};
use statemod_dataset::catalog::ComponentId;
use statemod_dataset::control::{ControlSettings, Switch};
use statemod_dataset::domain::Payload;
use statemod_dataset::error::DatasetError;
use statemod_dataset::format::{ManifestFormat, detect_format};
use statemod_dataset::manifest::EntryStatus;

#[derive(Default)]
struct RecordingSink {
    events: RefCell<Vec<ProgressEvent>>,
}

impl ProgressSink for RecordingSink {
    fn event(&self, event: ProgressEvent) {
        self.events.borrow_mut().push(event);
    }
}

fn dataset_dir() -> (tempfile::TempDir, Utf8PathBuf) {
    let temp = tempfile::tempdir().unwrap();
    let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    (temp, dir)
}

fn write(dir: &Utf8Path, name: &str, content: &str) {
    fs::write(dir.join(name).as_std_path(), content).unwrap();
}

fn legacy_dataset(dir: &Utf8Path) -> Utf8PathBuf {
    write(dir, "basin.ctl", "Test basin\nBaseline\n1950\n2005\n");
    write(dir, "basin.dds", &format!("{:<12}{:<24}{:<12}\n", "0100501", "Upper Ditch", "0100501"));
    write(dir, "basin.ddh", "1950 0100501 1 2 3 4 5 6 7 8 9 10 11 12\n");
    write(
        dir,
        "basin.rsp",
        "# Upper basin baseline\n\
         basin.ctl          Control\n\
         basin.rin          River network\n\
         basin.res          Reservoir stations\n\
         basin.dds          Diversion stations\n\
         basin.ris          River stations\n",
    );
    dir.join("basin.rsp")
}

#[test]
fn load_reads_control_then_components() {
    let (_temp, dir) = dataset_dir();
    let manifest = legacy_dataset(&dir);

    let dataset = DataSet::load(&manifest, &LoadOptions::default(), &NoProgress).unwrap();

    assert_eq!(dataset.format(), ManifestFormat::Legacy);
    assert_eq!(dataset.settings().iystr, 1950);
    assert_eq!(dataset.component(ComponentId::Response).own_file_name(), "basin.rsp");
    assert_eq!(
        dataset.entry(ComponentId::DiversionStations).map(|entry| entry.status),
        Some(EntryStatus::Loaded)
    );
    assert_matches!(dataset.payload(ComponentId::Control), Some(Payload::Control(settings)) if settings.iyend == 2005);
    assert!(!dataset.is_visible(ComponentId::WellStations));
    assert_eq!(dataset.resolve_absolute_path("basin.ddh"), dir.join("basin.ddh"));
    // Truncated after five lines; required rights were never reached.
    assert!(
        dataset
            .diagnostics()
            .iter()
            .any(|diag| diag.component == ComponentId::DiversionRights)
    );
}

#[test]
fn control_override_replaces_listed_file() {
    let (_temp, dir) = dataset_dir();
    let manifest = legacy_dataset(&dir);
    write(&dir, "alt.ctl", "Alternate\nRun\n1975\n1990\n");
    let options = LoadOptions {
        control_override: Some(dir.join("alt.ctl")),
        format_override: None,
    };

    let dataset = DataSet::load(&manifest, &options, &NoProgress).unwrap();
    assert_eq!(dataset.settings().iystr, 1975);
    assert_matches!(dataset.payload(ComponentId::Control), Some(Payload::Control(settings)) if settings.iystr == 1975);
}

#[test]
fn missing_control_file_uses_defaults() {
    let (_temp, dir) = dataset_dir();
    write(&dir, "basin.rsp", "Control = nowhere.ctl\n");

    let dataset = DataSet::load(&dir.join("basin.rsp"), &LoadOptions::default(), &NoProgress).unwrap();
    assert_eq!(dataset.format(), ManifestFormat::Freeform);
    assert_eq!(dataset.settings().iresop, ControlSettings::default().iresop);
    assert_eq!(
        dataset.entry(ComponentId::Control).map(|entry| entry.status),
        Some(EntryStatus::AbsentEmptyFile)
    );
}

#[test]
fn load_failures_propagate() {
    let (_temp, dir) = dataset_dir();
    let err = DataSet::load(&dir.join("missing.rsp"), &LoadOptions::default(), &NoProgress).unwrap_err();
    assert_matches!(err, DatasetError::ManifestRead { .. });

    write(&dir, "bad.ctl", "Heading\nHeading\nnineteen-fifty\n");
    write(&dir, "bad.rsp", "Control = bad.ctl\n");
    let err = DataSet::load(&dir.join("bad.rsp"), &LoadOptions::default(), &NoProgress).unwrap_err();
    assert_matches!(err, DatasetError::MalformedControlFile { line: 3, field: "iystr", .. });
}

#[test]
fn update_settings_recomputes_visibility() {
    let (_temp, dir) = dataset_dir();
    let manifest = legacy_dataset(&dir);
    let mut dataset = DataSet::load(&manifest, &LoadOptions::default(), &NoProgress).unwrap();
    assert!(!dataset.store().is_dirty());

    let mut settings = dataset.settings().clone();
    settings.iwell = Switch::new(1);
    dataset.update_settings(settings);

    assert!(dataset.is_visible(ComponentId::WellStations));
    assert!(dataset.component(ComponentId::WellStations).is_visible());
    assert!(dataset.component(ComponentId::Response).is_dirty());
    assert!(dataset.component(ComponentId::Control).is_dirty());
}

#[test]
fn edits_mark_only_the_owning_record() {
    let (_temp, dir) = dataset_dir();
    let manifest = legacy_dataset(&dir);
    let mut dataset = DataSet::load(&manifest, &LoadOptions::default(), &NoProgress).unwrap();

    let renamed = dataset.edit(ComponentId::DiversionStations, |payload| {
        if let Payload::Stations(stations) = payload {
            stations[0].name = "Upper Ditch No. 2".to_string();
        }
    });
    assert!(renamed.is_some());
    assert_eq!(dataset.store().dirty_ids(), vec![ComponentId::DiversionStations]);

    dataset.set_dirty(ComponentId::DiversionStations, false);
    assert!(!dataset.store().is_dirty());
}

#[test]
fn save_converts_legacy_to_freeform() {
    let (_temp, dir) = dataset_dir();
    let manifest = legacy_dataset(&dir);
    let mut dataset = DataSet::load(&manifest, &LoadOptions::default(), &NoProgress).unwrap();
    dataset.set_file_name(ComponentId::DiversionTsMonthly, "basin.ddh");

    let output = dir.join("converted.rsp");
    let options = SaveOptions {
        format: Some(ManifestFormat::Freeform),
        carry_header: true,
    };
    let result = dataset.save(&output, &options, &NoProgress).unwrap();
    assert_eq!(result.format, ManifestFormat::Freeform);
    assert!(!dataset.component(ComponentId::Response).is_dirty());
    assert_eq!(detect_format(&output).unwrap(), ManifestFormat::Freeform);
    let content = fs::read_to_string(output.as_std_path()).unwrap();
    assert!(content.starts_with("# Upper basin baseline\n"));

    let reread = DataSet::load(&output, &LoadOptions::default(), &NoProgress).unwrap();
    assert_eq!(
        reread.entry(ComponentId::DiversionTsMonthly).map(|entry| entry.status),
        Some(EntryStatus::Loaded)
    );
    assert_eq!(reread.store().file_name(ComponentId::DiversionStations), "basin.dds");
}

#[test]
fn progress_brackets_each_component() {
    let (_temp, dir) = dataset_dir();
    let manifest = legacy_dataset(&dir);
    let sink = RecordingSink::default();

    DataSet::load(&manifest, &LoadOptions::default(), &sink).unwrap();

    let events = sink.events.borrow();
    let for_stations: Vec<ProgressStatus> = events
        .iter()
        .filter(|event| event.component == Some(ComponentId::DiversionStations))
        .map(|event| event.status)
        .collect();
    assert_eq!(for_stations, vec![ProgressStatus::Reading, ProgressStatus::Read]);
    assert!(
        events
            .iter()
            .filter(|event| event.status == ProgressStatus::Read)
            .all(|event| event.elapsed.is_some())
    );
    assert_eq!(events.last().map(|event| event.status), Some(ProgressStatus::Finished));
}

#[test]
fn visibility_report_lists_every_component() {
    let report = visibility_report(&ControlSettings::default());
    assert_eq!(report.components.len(), 75);
    let control = &report.components[ComponentId::Control.index()];
    assert!(control.visible && control.required);
    assert_eq!(control.group, "Control Data");
}
