// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::loader::Sources;
use crate::models::TableConfig;
use crate::seating::Assignments;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Vowboard", "vowboard"));

pub const HOME_ENV: &str = "VOWBOARD_HOME";

pub fn session_path() -> Result<PathBuf> {
    let dir = match std::env::var_os(HOME_ENV) {
        Some(home) => PathBuf::from(home),
        None => ProjectDirs::from(APP.0, APP.1, APP.2)
            .context("Could not determine platform-specific data dir")?
            .data_dir()
            .to_path_buf(),
    };
    fs::create_dir_all(&dir).context("Failed to create data dir")?;
    Ok(dir.join("session.json"))
}

/// Per-user working state: file overrides, table layout and seat assignments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub guest_file: Option<PathBuf>,
    #[serde(default)]
    pub venue_files: Vec<PathBuf>,
    #[serde(default)]
    pub tables: TableConfig,
    /// `None` until the first seating edit; the roster's `Table` column applies until then.
    #[serde(default)]
    pub assignments: Option<Assignments>,
    #[serde(skip)]
    path: Option<PathBuf>,
    /// One-invocation override from `--data-dir`; never persisted.
    #[serde(skip)]
    data_dir_override: Option<PathBuf>,
}

impl Session {
    pub fn open_or_init() -> Result<Self> {
        Self::open_at(&session_path()?)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let mut session: Session = if path.exists() {
            let raw = fs::read_to_string(path).with_context(|| format!("Read session {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("Invalid session file {}", path.display()))?
        } else {
            Session::default()
        };
        session.path = Some(path.to_path_buf());
        Ok(session)
    }

    /// In-memory session rooted at `data_dir`; `save` is a no-op.
    pub fn in_memory(data_dir: &Path) -> Self {
        Self {
            data_dir: Some(data_dir.to_path_buf()),
            ..Self::default()
        }
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Write session {}", path.display()))?;
        tracing::debug!(path = %path.display(), "session saved");
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn override_data_dir(&mut self, dir: Option<PathBuf>) {
        self.data_dir_override = dir;
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir_override
            .clone()
            .or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn sources(&self) -> Sources {
        Sources {
            data_dir: self.data_dir(),
            guest_file: self.guest_file.clone(),
            venue_files: self.venue_files.clone(),
        }
    }

    /// Drop uploaded overrides and seat edits; table layout survives and
    /// seating falls back to the roster.
    pub fn clear(&mut self) {
        self.guest_file = None;
        self.venue_files.clear();
        self.assignments = None;
    }
}
