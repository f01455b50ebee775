use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    /// The watched file was created, modified, replaced or removed.
    Changed(PathBuf),
}

/// Watches one document. The parent directory is watched rather than the
/// file, so atomic replacements (ours and other editors') are seen.
pub struct DocumentWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl DocumentWatcher {
    /// Start watching `path`. `poll()` should be called each tick.
    pub fn start(path: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name: Option<OsString> = path.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                if let Some(hit) = event
                    .paths
                    .into_iter()
                    .find(|p| p.file_name().map(|n| n.to_os_string()) == name)
                {
                    let _ = tx.send(FileEvent::Changed(hit));
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        Ok(DocumentWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll: true when any change arrived since the last call.
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while let Ok(FileEvent::Changed(path)) = self.rx.try_recv() {
            tracing::trace!(path = %path.display(), "file event");
            changed = true;
        }
        changed
    }
}
