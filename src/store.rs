use camino::{Utf8Path, Utf8PathBuf};

use crate::catalog::{self, ComponentId};
use crate::domain::Payload;
use crate::fs_util;
use crate::visibility::Visibility;

/// One catalog entry's state within a dataset.
#[derive(Debug, Clone)]
pub struct ComponentRecord {
    id: ComponentId,
    file_name: String,
    data: Option<Payload>,
    dirty: bool,
    visible: bool,
    alias_of: Option<ComponentId>,
    children: Vec<ComponentId>,
}

impl ComponentRecord {
    fn new(id: ComponentId) -> Self {
        let children = if id.is_group() {
            catalog::children_of(id)
        } else {
            Vec::new()
        };
        Self {
            id,
            file_name: String::new(),
            data: None,
            dirty: false,
            visible: true,
            alias_of: None,
            children,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// File name as listed in the response file. Empty for aliases; use
    /// [`ComponentStore::file_name`] to follow them.
    pub fn own_file_name(&self) -> &str {
        &self.file_name
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn alias_of(&self) -> Option<ComponentId> {
        self.alias_of
    }

    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }
}

/// Owns every component record of a dataset. Records are created up front,
/// one per catalog entry, and are never removed.
#[derive(Debug, Clone)]
pub struct ComponentStore {
    base_dir: Utf8PathBuf,
    records: Vec<ComponentRecord>,
}

impl ComponentStore {
    pub fn new(base_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            records: catalog::all_ids().map(ComponentRecord::new).collect(),
        }
    }

    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    pub fn record(&self, id: ComponentId) -> &ComponentRecord {
        &self.records[id.index()]
    }

    pub fn records(&self) -> impl Iterator<Item = &ComponentRecord> {
        self.records.iter()
    }

    fn record_mut(&mut self, id: ComponentId) -> &mut ComponentRecord {
        &mut self.records[id.index()]
    }

    /// Follows an alias handle to the record that owns the file and data.
    fn owner(&self, id: ComponentId) -> ComponentId {
        self.record(id).alias_of.unwrap_or(id)
    }

    pub fn file_name(&self, id: ComponentId) -> &str {
        &self.record(self.owner(id)).file_name
    }

    pub fn payload(&self, id: ComponentId) -> Option<&Payload> {
        self.record(self.owner(id)).data.as_ref()
    }

    pub fn has_data(&self, id: ComponentId) -> bool {
        self.payload(id).is_some()
    }

    pub(crate) fn payload_mut(&mut self, id: ComponentId) -> Option<&mut Payload> {
        let owner = self.owner(id);
        self.record_mut(owner).data.as_mut()
    }

    pub fn set_file_name(&mut self, id: ComponentId, file_name: impl Into<String>) {
        let owner = self.owner(id);
        self.record_mut(owner).file_name = file_name.into();
    }

    pub fn set_payload(&mut self, id: ComponentId, payload: Option<Payload>) {
        let owner = self.owner(id);
        self.record_mut(owner).data = payload;
    }

    /// Drops loaded data; the record itself stays.
    pub fn clear(&mut self, id: ComponentId) {
        self.set_payload(id, None);
    }

    /// Binds `alias` to `source` so both resolve to one file name and payload.
    pub fn bind_alias(&mut self, alias: ComponentId, source: ComponentId) {
        let record = self.record_mut(alias);
        record.alias_of = Some(source);
        record.file_name.clear();
        record.data = None;
    }

    pub fn set_dirty(&mut self, id: ComponentId, dirty: bool) {
        let owner = self.owner(id);
        self.record_mut(owner).dirty = dirty;
    }

    pub fn is_dirty(&self) -> bool {
        self.records.iter().any(|record| record.dirty)
    }

    pub fn dirty_ids(&self) -> Vec<ComponentId> {
        self.records
            .iter()
            .filter(|record| record.dirty)
            .map(|record| record.id)
            .collect()
    }

    pub fn clear_dirty(&mut self) {
        for record in &mut self.records {
            record.dirty = false;
        }
    }

    /// Applies `edit` to a component's data and marks the owning record dirty
    /// when data is present.
    pub fn edit<R>(&mut self, id: ComponentId, edit: impl FnOnce(&mut Payload) -> R) -> Option<R> {
        let owner = self.owner(id);
        let record = self.record_mut(owner);
        let result = record.data.as_mut().map(edit)?;
        record.dirty = true;
        Some(result)
    }

    pub fn apply_visibility(&mut self, visibility: &Visibility) {
        for record in &mut self.records {
            record.visible = visibility.is_visible(record.id);
        }
    }

    pub fn resolve_absolute_path(&self, file_name: &str) -> Utf8PathBuf {
        fs_util::resolve_path(&self.base_dir, file_name)
    }

    /// Absolute path of a component's file, if it has one.
    pub fn component_path(&self, id: ComponentId) -> Option<Utf8PathBuf> {
        let file_name = self.file_name(id);
        (!file_name.is_empty()).then(|| self.resolve_absolute_path(file_name))
    }
}
