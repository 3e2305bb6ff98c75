use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{self, ComponentId};
use crate::control::{ControlSettings, read_control_file};
use crate::domain::Payload;
use crate::error::DatasetError;
use crate::format::{ManifestFormat, PropertyFile, detect_format};
use crate::fs_util;
use crate::manifest::{EntryStatus, ManifestEntry, ReadDiagnostic};
use crate::payload::{self, Probe};
use crate::reader::{ManifestReader, legacy_file_name};
use crate::store::{ComponentRecord, ComponentStore};
use crate::visibility::{Visibility, compute_visibility};
use crate::writer::ManifestWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Started,
    Reading,
    Read,
    Skipped,
    Failed,
    Writing,
    Finished,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub status: ProgressStatus,
    pub component: Option<ComponentId>,
    pub message: String,
    pub elapsed: Option<Duration>,
}

impl ProgressEvent {
    pub fn new(status: ProgressStatus, component: Option<ComponentId>, message: String) -> Self {
        Self {
            status,
            component,
            message,
            elapsed: None,
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }
}

/// Receives status updates on the thread running a read or write.
pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn event(&self, _event: ProgressEvent) {}
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Control file to use instead of the one the response file names.
    pub control_override: Option<Utf8PathBuf>,
    pub format_override: Option<ManifestFormat>,
}

#[derive(Debug, Clone)]
pub struct SaveOptions {
    pub format: Option<ManifestFormat>,
    pub carry_header: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            format: None,
            carry_header: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectResult {
    pub path: Utf8PathBuf,
    pub format: ManifestFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadResult {
    pub manifest: Utf8PathBuf,
    pub format: ManifestFormat,
    pub entries: Vec<EntrySummary>,
    pub diagnostics: Vec<ReadDiagnostic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntrySummary {
    pub id: i32,
    pub name: &'static str,
    pub status: EntryStatus,
    pub path: Option<Utf8PathBuf>,
    pub shared_alias: bool,
    pub records: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisibilityResult {
    pub components: Vec<VisibilityEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisibilityEntry {
    pub id: i32,
    pub name: &'static str,
    pub group: &'static str,
    pub visible: bool,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WriteResult {
    pub path: Utf8PathBuf,
    pub format: ManifestFormat,
}

pub fn detect(path: &Utf8Path) -> Result<DetectResult, DatasetError> {
    Ok(DetectResult {
        path: path.to_path_buf(),
        format: detect_format(path)?,
    })
}

pub fn visibility_report(settings: &ControlSettings) -> VisibilityResult {
    let visibility = compute_visibility(settings);
    let components = catalog::descriptors()
        .iter()
        .map(|desc| VisibilityEntry {
            id: desc.id.raw(),
            name: desc.display_name,
            group: desc.group.descriptor().display_name,
            visible: visibility.is_visible(desc.id),
            required: visibility.is_required(desc.id),
        })
        .collect();
    VisibilityResult { components }
}

/// A loaded dataset: control settings, component records and the outcome
/// of the read that produced them.
#[derive(Debug, Clone)]
pub struct DataSet {
    manifest_path: Utf8PathBuf,
    format: ManifestFormat,
    settings: ControlSettings,
    visibility: Visibility,
    store: ComponentStore,
    entries: BTreeMap<ComponentId, ManifestEntry>,
    diagnostics: Vec<ReadDiagnostic>,
}

impl DataSet {
    pub fn load(
        manifest: &Utf8Path,
        options: &LoadOptions,
        sink: &dyn ProgressSink,
    ) -> Result<Self, DatasetError> {
        let started = Instant::now();
        let format = match options.format_override {
            Some(format) => format,
            None => detect_format(manifest)?,
        };
        let base_dir = match manifest.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        };
        sink.event(ProgressEvent::new(
            ProgressStatus::Started,
            Some(ComponentId::Control),
            format!("phase=Resolve; {format} response file {manifest}"),
        ));

        let control_path = match &options.control_override {
            Some(path) => Some(path.clone()),
            None => control_file_name(manifest, format)?
                .map(|name| fs_util::resolve_path(&base_dir, &name)),
        };
        let settings = match control_path {
            Some(path) => load_settings(&path)?,
            None => {
                warn!(%manifest, "response file names no control file; using defaults");
                ControlSettings::default()
            }
        };

        let mut store = ComponentStore::new(base_dir);
        if let Some(name) = manifest.file_name() {
            store.set_file_name(ComponentId::Response, name);
        }
        let outcome = ManifestReader::read(manifest, &settings, format, &mut store, sink)?;
        store.set_payload(ComponentId::Control, Some(Payload::Control(settings.clone())));

        info!(
            %manifest,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dataset loaded"
        );
        Ok(Self {
            manifest_path: manifest.to_path_buf(),
            format: outcome.format,
            visibility: compute_visibility(&settings),
            settings,
            store,
            entries: outcome.entries,
            diagnostics: outcome.diagnostics,
        })
    }

    pub fn manifest_path(&self) -> &Utf8Path {
        &self.manifest_path
    }

    pub fn format(&self) -> ManifestFormat {
        self.format
    }

    pub fn settings(&self) -> &ControlSettings {
        &self.settings
    }

    pub fn store(&self) -> &ComponentStore {
        &self.store
    }

    pub fn component(&self, id: ComponentId) -> &ComponentRecord {
        self.store.record(id)
    }

    pub fn payload(&self, id: ComponentId) -> Option<&Payload> {
        self.store.payload(id)
    }

    pub fn set_dirty(&mut self, id: ComponentId, dirty: bool) {
        self.store.set_dirty(id, dirty);
    }

    pub fn edit<R>(&mut self, id: ComponentId, edit: impl FnOnce(&mut Payload) -> R) -> Option<R> {
        self.store.edit(id, edit)
    }

    /// Points a component at another file; the response file becomes dirty.
    pub fn set_file_name(&mut self, id: ComponentId, file_name: impl Into<String>) {
        self.store.set_file_name(id, file_name);
        self.store.set_dirty(ComponentId::Response, true);
    }

    pub fn is_visible(&self, id: ComponentId) -> bool {
        self.visibility.is_visible(id)
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    pub fn resolve_absolute_path(&self, file_name: &str) -> Utf8PathBuf {
        self.store.resolve_absolute_path(file_name)
    }

    /// Replaces the control settings and recomputes visibility.
    pub fn update_settings(&mut self, settings: ControlSettings) {
        self.visibility = compute_visibility(&settings);
        self.store.apply_visibility(&self.visibility);
        self.store
            .set_payload(ComponentId::Control, Some(Payload::Control(settings.clone())));
        self.store.set_dirty(ComponentId::Control, true);
        self.store.set_dirty(ComponentId::Response, true);
        self.settings = settings;
    }

    pub fn entries(&self) -> &BTreeMap<ComponentId, ManifestEntry> {
        &self.entries
    }

    pub fn entry(&self, id: ComponentId) -> Option<&ManifestEntry> {
        self.entries.get(&id)
    }

    pub fn diagnostics(&self) -> &[ReadDiagnostic] {
        &self.diagnostics
    }

    pub fn save(
        &mut self,
        path: &Utf8Path,
        options: &SaveOptions,
        sink: &dyn ProgressSink,
    ) -> Result<WriteResult, DatasetError> {
        let format = options.format.unwrap_or(self.format);
        let started = Instant::now();
        sink.event(ProgressEvent::new(
            ProgressStatus::Writing,
            Some(ComponentId::Response),
            format!("phase=Write; {format} response file {path}"),
        ));

        let prior = if options.carry_header && self.manifest_path.is_file() {
            Some(self.manifest_path.as_path())
        } else {
            None
        };
        ManifestWriter::write(path, &self.settings, &self.store, format, prior)?;
        self.store.set_dirty(ComponentId::Response, false);

        sink.event(
            ProgressEvent::new(
                ProgressStatus::Finished,
                Some(ComponentId::Response),
                format!("wrote {path}"),
            )
            .with_elapsed(started.elapsed()),
        );
        Ok(WriteResult {
            path: path.to_path_buf(),
            format,
        })
    }

    pub fn read_result(&self) -> ReadResult {
        let entries = self
            .entries
            .values()
            .map(|entry| EntrySummary {
                id: entry.component.raw(),
                name: entry.component.descriptor().display_name,
                status: entry.status,
                path: entry.resolved_path.clone(),
                shared_alias: entry.is_shared_alias,
                records: self.store.payload(entry.component).map_or(0, Payload::len),
            })
            .collect();
        ReadResult {
            manifest: self.manifest_path.clone(),
            format: self.format,
            entries,
            diagnostics: self.diagnostics.clone(),
        }
    }
}

/// Control file name listed in the response file, if any.
fn control_file_name(
    manifest: &Utf8Path,
    format: ManifestFormat,
) -> Result<Option<String>, DatasetError> {
    let read_error = |message: String| DatasetError::ManifestRead {
        path: manifest.to_path_buf(),
        message,
    };
    let content =
        fs_util::read_text(manifest).map_err(|err| read_error(err.to_string()))?;
    let name = match format {
        ManifestFormat::Freeform => PropertyFile::try_parse(&content)
            .map_err(|err| read_error(format!("not a free-form response file: {err}")))?
            .get(ComponentId::Control.descriptor().manifest_key)
            .map(str::to_string),
        ManifestFormat::Legacy => content
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| legacy_file_name(line).to_string()),
    };
    Ok(name.filter(|name| !name.is_empty()))
}

/// A missing or empty control file leaves every switch at its default; a
/// malformed one fails the load.
fn load_settings(path: &Utf8Path) -> Result<ControlSettings, DatasetError> {
    match payload::probe(path) {
        Probe::Missing | Probe::Empty => {
            warn!(%path, "control file missing or empty; using defaults");
            Ok(ControlSettings::default())
        }
        Probe::Present => read_control_file(path),
    }
}
