// SPDX-License-Identifier: MIT

use crate::catalog::Coordinates;
use crate::registry::UsageRecord;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Snapshot {
    records: Vec<UsageRecord>,
}

/// Persists the session's record collection as a JSON snapshot so the CLI can
/// pick up where it left off. The registry itself stays in-memory; this is
/// purely a convenience for the terminal front-end.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn at_default_path() -> Self {
        Self {
            path: crate::get_config_root().join("session.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved session, falling back to the builtin seed dataset when
    /// no snapshot exists yet.
    pub fn load(&self) -> Result<Vec<UsageRecord>> {
        if !self.path.exists() {
            log::debug!("no snapshot at {:?}; using builtin seed", self.path);
            return Ok(builtin_seed());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read snapshot {:?}", self.path))?;
        let snapshot: Snapshot =
            serde_json::from_str(&content).context("Failed to parse snapshot JSON")?;
        Ok(snapshot.records)
    }

    /// Writes the session to disk. An existing snapshot is copied to `.bak`
    /// first.
    pub fn save(&self, records: &[UsageRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create snapshot directory")?;
            }
        }

        if self.path.exists() {
            let bak_path = self.path.with_extension("bak");
            fs::copy(&self.path, &bak_path).context("Failed to create snapshot backup")?;
        }

        let snapshot = Snapshot {
            records: records.to_vec(),
        };
        let content =
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write snapshot {:?}", self.path))
    }
}

/// The initial dataset a fresh session is seeded with.
pub fn builtin_seed() -> Vec<UsageRecord> {
    let record = |id, region: &str, lat, lon, usage, network: &str| UsageRecord {
        id,
        region: region.to_string(),
        coordinates: Coordinates { lat, lon },
        usage,
        network: network.to_string(),
        added_at: Utc::now(),
    };

    vec![
        record(1, "Delhi", 28.61, 77.21, 5200, "5G"),
        record(2, "Tokyo", 35.68, 139.69, 3400, "5G"),
        record(3, "New York", 40.71, -74.01, 1200, "5G"),
        record(4, "Sydney", -33.87, 151.21, 800, "4G"),
        record(5, "London", 51.51, -0.13, 450, "4G"),
        record(6, "Cairo", 30.04, 31.24, 300, "4G"),
    ]
}
