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

//! Filesystem watching for preset hot-reload.

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};

/// Watches an assets directory and reports whether preset files changed.
///
/// The watcher thread keeps at most one pending preset event; further changes
/// before [`PresetWatcher::has_changes`] is called are coalesced into it.
pub struct PresetWatcher {
    // Dropping the watcher stops the notifications.
    _watcher: RecommendedWatcher,
    events: Receiver<Event>,
    root: PathBuf,
}

impl PresetWatcher {
    /// Starts watching `root` recursively.
    ///
    /// # Errors
    /// Fails if the platform watcher cannot be created or `root` cannot be watched.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let (tx, rx) = bounded(1);
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => forward(&tx, event),
                Err(e) => log::warn!("Preset watcher error: {e}"),
            },
            Config::default(),
        )
        .context("Failed to create preset watcher")?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", root.display()))?;
        log::info!("Watching presets under {}", root.display());

        Ok(Self {
            _watcher: watcher,
            events: rx,
            root,
        })
    }

    /// The watched directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns `true` if a preset file changed since the last call.
    pub fn has_changes(&self) -> bool {
        match self.events.try_recv() {
            Ok(event) => {
                log::debug!("Preset change detected: {:?}", event.paths);
                true
            }
            Err(_) => false,
        }
    }
}

impl std::fmt::Debug for PresetWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetWatcher")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

fn forward(events: &Sender<Event>, event: Event) {
    if !is_relevant(&event) {
        return;
    }
    match events.try_send(event) {
        Ok(()) | Err(TrySendError::Full(_)) => {}
        Err(TrySendError::Disconnected(_)) => log::trace!("Preset watcher dropped"),
    }
}

fn is_relevant(event: &Event) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event
        .paths
        .iter()
        .any(|path| path.extension().is_some_and(|ext| ext == "json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};

    #[test]
    fn test_json_writes_are_relevant() {
        let created = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("assets/lights/cob.json"));
        let removed = Event::new(EventKind::Remove(RemoveKind::File))
            .add_path(PathBuf::from("assets/modifiers/grid.json"));
        assert!(is_relevant(&created));
        assert!(is_relevant(&removed));
    }

    #[test]
    fn test_other_files_and_reads_are_ignored() {
        let swap = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("assets/lights/.cob.json.swp"));
        let read = Event::new(EventKind::Access(AccessKind::Any))
            .add_path(PathBuf::from("assets/lights/cob.json"));
        assert!(!is_relevant(&swap));
        assert!(!is_relevant(&read));
    }

    #[test]
    fn test_pending_changes_are_coalesced() {
        let (tx, rx) = bounded(1);
        for name in ["a.json", "b.json", "c.json"] {
            let event = Event::new(EventKind::Create(CreateKind::File))
                .add_path(PathBuf::from("assets/lights").join(name));
            forward(&tx, event);
        }
        let read = Event::new(EventKind::Access(AccessKind::Any))
            .add_path(PathBuf::from("assets/lights/a.json"));
        forward(&tx, read);

        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn test_irrelevant_events_are_not_queued() {
        let (tx, rx) = bounded(1);
        let swap = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("assets/lights/.cob.json.swp"));
        forward(&tx, swap);
        assert!(rx.try_recv().is_err());
    }
}
