//! Host configuration file watcher.
//!
//! Editors and config tools usually save by writing a temporary file and
//! renaming it over the original, which replaces the inode. Watching the file
//! itself loses track after the first such save, so the parent directory is
//! watched instead and events are matched on the config file's name.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_host_config;
use crate::config::schema::HostConfig;

/// Sends a fresh [`HostConfig`] every time the config file is saved.
pub struct HostConfigWatcher {
    path: PathBuf,
    updates: mpsc::UnboundedSender<HostConfig>,
}

impl HostConfigWatcher {
    /// Returns the watcher and the receiving end of its update channel.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<HostConfig>) {
        let (updates, rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            updates,
        };
        (watcher, rx)
    }

    /// Start watching. Updates stop when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = watch_dir(&self.path);
        let file_name = self.path.file_name().map(OsString::from).ok_or_else(|| {
            notify::Error::generic("host config path has no file name")
                .add_path(self.path.clone())
        })?;

        let path = self.path.clone();
        let updates = self.updates;
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if touches_file(&event, &file_name) => reload(&path, &updates),
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Host config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!(dir = ?dir, file = ?self.path, "Watching host config");
        Ok(watcher)
    }
}

fn reload(path: &Path, updates: &mpsc::UnboundedSender<HostConfig>) {
    match load_host_config(path) {
        Ok(host) => {
            tracing::info!(path = ?path, "Host config reloaded");
            let _ = updates.send(host);
        }
        // Between unlink and rename the file can briefly be missing; the
        // following event picks up the final content.
        Err(e) => tracing::warn!(path = ?path, error = %e, "Host config reload skipped"),
    }
}

/// Directory to watch for `path`. A bare file name lives in the working directory.
fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// A create, modify (data, metadata or rename) event naming the config file.
fn touches_file(event: &Event, file_name: &OsString) -> bool {
    let relevant = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_));
    relevant
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}
