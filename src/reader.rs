//! Response file reader.
//!
//! Every manifest-bearing component ends up with exactly one
//! [`ManifestEntry`]. Failures inside a single component file are recorded
//! as diagnostics and never abort the read; only an unusable response file
//! is returned as an error.

use std::collections::BTreeMap;
use std::time::Instant;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};

use crate::app::{ProgressEvent, ProgressSink, ProgressStatus};
use crate::catalog::{self, ComponentId};
use crate::control::ControlSettings;
use crate::error::DatasetError;
use crate::format::{ManifestFormat, PropertyFile};
use crate::fs_util;
use crate::manifest::{EntryStatus, LEGACY_ORDER, ManifestEntry, ReadDiagnostic, Severity};
use crate::payload;
use crate::reconcile;
use crate::store::ComponentStore;
use crate::visibility::{Visibility, compute_visibility};

#[derive(Debug, Clone)]
pub struct ManifestReadOutcome {
    pub format: ManifestFormat,
    pub entries: BTreeMap<ComponentId, ManifestEntry>,
    pub diagnostics: Vec<ReadDiagnostic>,
}

impl ManifestReadOutcome {
    pub fn entry(&self, id: ComponentId) -> Option<&ManifestEntry> {
        self.entries.get(&id)
    }

    pub fn status(&self, id: ComponentId) -> Option<EntryStatus> {
        self.entry(id).map(|entry| entry.status)
    }

    pub fn count(&self, status: EntryStatus) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.status == status)
            .count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ReadDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == Severity::Error)
    }
}

/// File name token of a legacy line: text before the first run of two
/// spaces. The remainder is a description.
pub fn legacy_file_name(line: &str) -> &str {
    let trimmed = line.trim();
    match trimmed.find("  ") {
        Some(end) => &trimmed[..end],
        None => trimmed,
    }
}

pub struct ManifestReader;

impl ManifestReader {
    pub fn read(
        path: &Utf8Path,
        settings: &ControlSettings,
        format: ManifestFormat,
        store: &mut ComponentStore,
        sink: &dyn ProgressSink,
    ) -> Result<ManifestReadOutcome, DatasetError> {
        let content =
            fs_util::read_text(path).map_err(|err| DatasetError::ManifestRead {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;

        let visibility = compute_visibility(settings);
        store.apply_visibility(&visibility);
        for desc in catalog::descriptors() {
            if let Some(source) = desc.alias_of {
                store.bind_alias(desc.id, source);
            }
        }

        let mut walk = Walk {
            store: &mut *store,
            visibility: &visibility,
            sink,
            entries: BTreeMap::new(),
            diagnostics: Vec::new(),
        };

        sink.event(ProgressEvent::new(
            ProgressStatus::Started,
            None,
            format!("reading {format} response file {path}"),
        ));

        match format {
            ManifestFormat::Freeform => {
                let properties =
                    PropertyFile::try_parse(&content).map_err(|err| DatasetError::ManifestRead {
                        path: path.to_path_buf(),
                        message: format!("not a free-form response file: {err}"),
                    })?;
                walk.freeform(&properties);
            }
            ManifestFormat::Legacy => walk.legacy(&content, settings),
        }
        walk.propagate_aliases();

        let Walk {
            entries,
            diagnostics,
            ..
        } = walk;
        reconcile::reconcile(store, format);

        let outcome = ManifestReadOutcome {
            format,
            entries,
            diagnostics,
        };
        info!(
            loaded = outcome.count(EntryStatus::Loaded),
            empty = outcome.count(EntryStatus::AbsentEmptyFile),
            errors = outcome.count(EntryStatus::Error),
            "finished reading response file"
        );
        sink.event(ProgressEvent::new(
            ProgressStatus::Finished,
            None,
            format!(
                "read {} components ({} errors)",
                outcome.count(EntryStatus::Loaded),
                outcome.count(EntryStatus::Error)
            ),
        ));
        Ok(outcome)
    }
}

struct Walk<'a> {
    store: &'a mut ComponentStore,
    visibility: &'a Visibility,
    sink: &'a dyn ProgressSink,
    entries: BTreeMap<ComponentId, ManifestEntry>,
    diagnostics: Vec<ReadDiagnostic>,
}

impl Walk<'_> {
    fn freeform(&mut self, properties: &PropertyFile) {
        for id in catalog::manifest_bearing() {
            let desc = id.descriptor();
            if desc.alias_of.is_some() {
                continue;
            }
            if !self.visibility.is_visible(id) {
                self.skip(id);
                continue;
            }
            match properties.get(desc.manifest_key).filter(|value| !value.is_empty()) {
                Some(file_name) => self.process(id, file_name),
                None => self.absent(id),
            }
        }
    }

    fn legacy(&mut self, content: &str, settings: &ControlSettings) {
        let mut lines = content.lines().filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        });
        let mut stopped = false;

        for slot in LEGACY_ORDER {
            let id = slot.component;
            if !slot.is_present(settings) {
                self.skip(id);
                continue;
            }
            if stopped {
                self.truncated(id);
                continue;
            }
            let Some(line) = lines.next() else {
                debug!(component = %id, "response file ends; no further lines are read");
                stopped = true;
                self.truncated(id);
                continue;
            };
            let file_name = legacy_file_name(line);
            if !self.visibility.is_visible(id) {
                // Keep the placeholder so the line survives a rewrite.
                self.store.set_file_name(id, file_name);
                self.skip(id);
                continue;
            }
            self.process(id, file_name);
        }

        if lines.next().is_some() {
            debug!("ignoring response file lines past the last legacy slot");
        }
        for id in catalog::manifest_bearing() {
            if !self.entries.contains_key(&id) && id.descriptor().alias_of.is_none() {
                self.entries
                    .insert(id, ManifestEntry::new(id, EntryStatus::AbsentByFormat));
            }
        }
    }

    fn skip(&mut self, id: ComponentId) {
        self.entries
            .insert(id, ManifestEntry::new(id, EntryStatus::SkippedInactive));
        self.sink.event(ProgressEvent::new(
            ProgressStatus::Skipped,
            Some(id),
            format!("{id} is not active for this dataset"),
        ));
    }

    fn truncated(&mut self, id: ComponentId) {
        self.skip(id);
        if self.visibility.is_required(id) {
            self.warn(id, None, "response file ends before this required component");
        }
    }

    fn absent(&mut self, id: ComponentId) {
        self.entries
            .insert(id, ManifestEntry::new(id, EntryStatus::AbsentByFormat));
        if self.visibility.is_required(id) {
            self.warn(id, None, "required component is not listed in the response file");
        }
    }

    fn warn(&mut self, id: ComponentId, path: Option<Utf8PathBuf>, message: &str) {
        warn!(component = %id, "{message}");
        self.diagnostics.push(ReadDiagnostic {
            component: id,
            path,
            severity: Severity::Warning,
            message: message.to_string(),
        });
    }

    fn process(&mut self, id: ComponentId, file_name: &str) {
        let desc = id.descriptor();
        self.store.set_file_name(id, file_name);
        let path = self.store.resolve_absolute_path(file_name);
        let started = Instant::now();
        self.sink.event(ProgressEvent::new(
            ProgressStatus::Reading,
            Some(id),
            format!("reading {id} from {path}"),
        ));

        let status = if payload::probe(&path).is_placeholder() {
            debug!(component = %id, %path, "missing or empty file; no data");
            self.store.clear(id);
            EntryStatus::AbsentEmptyFile
        } else {
            match payload::load(desc, &path) {
                Ok(data) => {
                    debug!(component = %id, %path, records = data.len(), "loaded");
                    self.store.set_payload(id, Some(data));
                    EntryStatus::Loaded
                }
                Err(err) => {
                    warn!(component = %id, %path, %err, "component failed to load");
                    self.store.clear(id);
                    self.diagnostics.push(ReadDiagnostic {
                        component: id,
                        path: Some(path.clone()),
                        severity: Severity::Error,
                        message: err.to_string(),
                    });
                    EntryStatus::Error
                }
            }
        };

        let (progress, verb) = match status {
            EntryStatus::Loaded => (ProgressStatus::Read, "read"),
            EntryStatus::Error => (ProgressStatus::Failed, "failed to read"),
            _ => (ProgressStatus::Read, "no data for"),
        };
        self.sink.event(
            ProgressEvent::new(progress, Some(id), format!("{verb} {id}"))
                .with_elapsed(started.elapsed()),
        );
        self.entries.insert(
            id,
            ManifestEntry {
                component: id,
                resolved_path: Some(path),
                is_shared_alias: false,
                status,
            },
        );
    }

    /// Aliases reuse the source's entry without touching the file again.
    fn propagate_aliases(&mut self) {
        for desc in catalog::descriptors() {
            let Some(source) = desc.alias_of else {
                continue;
            };
            let mut entry = self
                .entries
                .get(&source)
                .cloned()
                .unwrap_or_else(|| ManifestEntry::new(source, EntryStatus::AbsentByFormat));
            entry.component = desc.id;
            entry.is_shared_alias = true;
            self.entries.insert(desc.id, entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_description_is_discarded() {
        assert_eq!(
            legacy_file_name("foo.ddh   Historical diversion data (monthly)"),
            "foo.ddh"
        );
        assert_eq!(legacy_file_name("  basin.ctl"), "basin.ctl");
        assert_eq!(legacy_file_name("my basin.ctl  Control"), "my basin.ctl");
    }
}
