//! INI serialization for `config.ini`.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[tracker]
; What to do with the accumulated arrow rotation when the compass drops out:
;   suspend - hide the rotation but keep it, so the arrow resumes smoothly
;   reset   - forget it; the arrow snaps to the new angle when heading returns
heading_gap = {}

[reactor]
; Snapshots buffered per subscriber before slow consumers start skipping
broadcast_capacity = {}

[logging]
; Directory for log files (relative paths are relative to the working directory)
directory = {}
; Log file name (cleared at the start of each session)
file = {}
"#,
        config.tracker.heading_gap,
        config.reactor.broadcast_capacity,
        config.logging.directory.display(),
        config.logging.file,
    )
}
