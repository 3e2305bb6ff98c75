//! Response file writer.

use std::fmt::Write as _;

use camino::Utf8Path;
use chrono::Local;
use tracing::{debug, info, warn};

use crate::catalog::{self, ComponentId};
use crate::control::ControlSettings;
use crate::error::DatasetError;
use crate::format::ManifestFormat;
use crate::fs_util;
use crate::manifest::{HEADER_END_MARKER, legacy_slots};
use crate::store::ComponentStore;
use crate::visibility::compute_visibility;

/// Prefix of comment lines this tool generates. They are dropped when a
/// header is carried into the next file.
const GENERATED_PREFIX: &str = "#>";
const LEGACY_NAME_WIDTH: usize = 24;

pub struct ManifestWriter;

impl ManifestWriter {
    /// Assembles the full file in memory, then replaces `path` atomically.
    pub fn write(
        path: &Utf8Path,
        settings: &ControlSettings,
        store: &ComponentStore,
        format: ManifestFormat,
        prior_header: Option<&Utf8Path>,
    ) -> Result<(), DatasetError> {
        let header = prior_header.map(read_header).unwrap_or_default();
        let content = Self::render(path, settings, store, format, &header);
        fs_util::write_atomic(path, content.as_bytes()).map_err(|err| {
            DatasetError::ManifestWrite {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        })?;
        info!(%path, %format, "wrote response file");
        Ok(())
    }

    pub fn render(
        path: &Utf8Path,
        settings: &ControlSettings,
        store: &ComponentStore,
        format: ManifestFormat,
        carried_header: &[String],
    ) -> String {
        let mut out = String::new();
        for line in carried_header {
            out.push_str(line);
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "{GENERATED_PREFIX} StateMod response file written by smdata {}",
            env!("CARGO_PKG_VERSION")
        );
        let _ = writeln!(
            out,
            "{GENERATED_PREFIX} Created: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S %z")
        );
        let _ = writeln!(out, "{GENERATED_PREFIX} Format: {format}");
        out.push_str(HEADER_END_MARKER);
        out.push('\n');

        match format {
            ManifestFormat::Freeform => render_freeform(&mut out, settings, store),
            ManifestFormat::Legacy => render_legacy(&mut out, path, settings, store),
        }
        out
    }
}

/// Leading user comments of a prior response file, up to the header end
/// marker. Blank lines inside the header are kept; generated lines and
/// trailing blanks are not carried.
pub fn carried_header(content: &str) -> Vec<String> {
    let mut lines: Vec<String> = content
        .lines()
        .take_while(|line| {
            let trimmed = line.trim();
            trimmed != HEADER_END_MARKER && (trimmed.is_empty() || trimmed.starts_with('#'))
        })
        .filter(|line| !line.trim().starts_with(GENERATED_PREFIX))
        .map(|line| line.trim_end().to_string())
        .collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

fn read_header(path: &Utf8Path) -> Vec<String> {
    match fs_util::read_text(path) {
        Ok(content) => carried_header(&content),
        Err(err) => {
            warn!(%path, %err, "cannot read prior response file; header not carried");
            Vec::new()
        }
    }
}

fn render_freeform(out: &mut String, settings: &ControlSettings, store: &ComponentStore) {
    let visibility = compute_visibility(settings);
    let mut pending_group: Option<ComponentId> = None;

    for desc in catalog::descriptors() {
        if desc.is_group {
            pending_group = Some(desc.id);
            continue;
        }
        let writable = desc.is_manifest_bearing()
            && desc.alias_of.is_none()
            && !desc.manifest_key.is_empty()
            && visibility.is_visible(desc.id);
        if !writable {
            continue;
        }
        let file_name = store.file_name(desc.id);
        if file_name.is_empty() {
            debug!(component = %desc.id, "no file name; key not written");
            continue;
        }
        if let Some(group) = pending_group.take() {
            let _ = writeln!(out, "\n# {group}");
        }
        let _ = writeln!(out, "{} = {}", desc.manifest_key, file_name);
    }
}

fn render_legacy(
    out: &mut String,
    path: &Utf8Path,
    settings: &ControlSettings,
    store: &ComponentStore,
) {
    let stem = path.file_stem().unwrap_or("statemod");
    for slot in legacy_slots(settings) {
        let desc = slot.component.descriptor();
        let file_name = match store.file_name(slot.component) {
            "" => format!("{stem}.{}", desc.extension),
            name => name.to_string(),
        };
        let _ = writeln!(
            out,
            "{file_name:<LEGACY_NAME_WIDTH$}  {}",
            desc.display_name
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_lines_are_not_carried() {
        let prior = "# Upper Colorado baseline\n#> written by smdata 0.1.0\n# second note\n#>EndHeader\nControl = basin.ctl\n";
        assert_eq!(
            carried_header(prior),
            vec!["# Upper Colorado baseline".to_string(), "# second note".to_string()]
        );
    }

    #[test]
    fn blank_lines_inside_the_header_are_kept() {
        let prior = "\n# Upper Colorado baseline\n\n#> Created: 2024-01-01\n# second note\n\n#>EndHeader\n";
        assert_eq!(
            carried_header(prior),
            vec![
                String::new(),
                "# Upper Colorado baseline".to_string(),
                String::new(),
                "# second note".to_string(),
            ]
        );
    }

    #[test]
    fn header_stops_at_first_data_line() {
        let prior = "# note\nbasin.ctl  Control\n# not header\n";
        assert_eq!(carried_header(prior), vec!["# note".to_string()]);
    }
}
