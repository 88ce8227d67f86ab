//! INI parsing: the single place key names map to struct fields.

use std::path::PathBuf;

use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::reactor::HeadingGapPolicy;

/// Parse an `Ini` into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [tracker] section
    if let Some(section) = ini.section(Some("tracker")) {
        if let Some(v) = section.get("heading_gap") {
            config.tracker.heading_gap =
                v.parse::<HeadingGapPolicy>()
                    .map_err(|_| ConfigFileError::InvalidValue {
                        section: "tracker".to_string(),
                        key: "heading_gap".to_string(),
                        value: v.to_string(),
                        reason: "must be 'suspend' or 'reset'".to_string(),
                    })?;
        }
    }

    // [reactor] section
    if let Some(section) = ini.section(Some("reactor")) {
        if let Some(v) = section.get("broadcast_capacity") {
            config.reactor.broadcast_capacity = v
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|capacity| *capacity > 0)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "reactor".to_string(),
                    key: "broadcast_capacity".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive integer".to_string(),
                })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = PathBuf::from(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}
