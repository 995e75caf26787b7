// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Where preset records come from.

use crate::record::{PresetCategory, RawRecord};
use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A provider of raw preset records.
///
/// Implementors only fetch text; parsing, validation and caching belong to
/// [`crate::PresetStore`].
pub trait PresetSource {
    /// Reads every record of `category`.
    ///
    /// Records that cannot be read individually should be skipped with a
    /// warning. An `Err` means the whole category is unavailable.
    fn read_records(&self, category: PresetCategory) -> Result<Vec<RawRecord>>;

    /// A short description of the source for log messages.
    fn describe(&self) -> String;
}

/// Reads records from `<root>/lights/*.json` and `<root>/modifiers/*.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Creates a source rooted at an assets directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The assets directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PresetSource for DirectorySource {
    fn read_records(&self, category: PresetCategory) -> Result<Vec<RawRecord>> {
        let dir = self.root.join(category.dir_name());
        if !dir.is_dir() {
            log::debug!("No {category} preset directory at {}", dir.display());
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unlistable entry in {}: {e}", dir.display());
                    continue;
                }
            };
            let path = entry.path();
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            if !entry.file_type().is_file() || !is_json {
                continue;
            }

            match fs::read_to_string(path) {
                Ok(contents) => records.push(RawRecord::new(
                    entry.file_name().to_string_lossy(),
                    contents,
                )),
                Err(e) => log::warn!("Skipping unreadable preset {}: {e}", path.display()),
            }
        }

        log::trace!(
            "Read {} {category} record(s) from {}",
            records.len(),
            dir.display()
        );
        Ok(records)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Keeps records in memory.
///
/// Useful for embedding presets in a binary and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: HashMap<PresetCategory, Vec<RawRecord>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record and returns the source, for chained construction.
    pub fn with_record(
        mut self,
        category: PresetCategory,
        origin: impl Into<String>,
        contents: impl Into<String>,
    ) -> Self {
        self.insert(category, origin, contents);
        self
    }

    /// Adds a record, replacing any record with the same origin.
    pub fn insert(
        &mut self,
        category: PresetCategory,
        origin: impl Into<String>,
        contents: impl Into<String>,
    ) {
        let record = RawRecord::new(origin, contents);
        let records = self.records.entry(category).or_default();
        match records.iter_mut().find(|r| r.origin == record.origin) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    /// Removes the record with the given origin, if any.
    pub fn remove(&mut self, category: PresetCategory, origin: &str) -> Option<RawRecord> {
        let records = self.records.get_mut(&category)?;
        let index = records.iter().position(|r| r.origin == origin)?;
        Some(records.remove(index))
    }
}

impl PresetSource for MemorySource {
    fn read_records(&self, category: PresetCategory) -> Result<Vec<RawRecord>> {
        Ok(self.records.get(&category).cloned().unwrap_or_default())
    }

    fn describe(&self) -> String {
        "in-memory presets".to_string()
    }
}
