pub mod catalog;
pub mod encoding;
pub mod registry;
pub mod snapshot;

pub use catalog::{CityEntry, Coordinates, RegionCatalog};
pub use encoding::{usage_color, usage_radius, UsageBucket};
pub use registry::{NetworkKind, RegistryError, UsageRecord, UsageRegistry};

use std::path::PathBuf;

/// Root directory for netatlas config and session files
/// (e.g. `~/.config/netatlas` on Linux).
pub fn get_config_root() -> PathBuf {
    directories::ProjectDirs::from("", "", "netatlas")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".netatlas"))
}
