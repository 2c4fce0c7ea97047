//! Configuration file watcher for hot reload.
//!
//! Editors and `cp` often produce several modify events per save, and some
//! touch the file without changing it. Only content that differs from the
//! last configuration handed to the server is parsed and forwarded, so the
//! resolver is rebuilt once per real edit. An empty file is never applied.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::parse_config;
use crate::config::schema::ServiceConfig;

/// Watches the service configuration file and forwards changed, valid
/// configurations to the server's reload channel.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ServiceConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for validated configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ServiceConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file. Keep the returned watcher alive for as long
    /// as updates should flow.
    ///
    /// The file's content at this point counts as already applied.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, update_tx } = self;
        let mut applied = fs::read_to_string(&path).ok();
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    let content = match fs::read_to_string(&watched) {
                        Ok(content) => content,
                        Err(e) => {
                            tracing::warn!(path = ?watched, error = %e, "Config file unreadable, keeping current configuration");
                            return;
                        }
                    };
                    // A truncate-then-write save is seen empty in between.
                    if content.trim().is_empty() {
                        tracing::debug!(path = ?watched, "Config file empty, waiting for content");
                        return;
                    }
                    if applied.as_deref() == Some(content.as_str()) {
                        tracing::trace!(path = ?watched, "Config file touched without changes");
                        return;
                    }

                    match parse_config(&content) {
                        Ok(new_config) => {
                            tracing::info!(path = ?watched, "Config file changed, forwarding new configuration");
                            if update_tx.send(new_config).is_ok() {
                                applied = Some(content);
                            }
                        }
                        Err(e) => {
                            tracing::error!(
                                error = %e,
                                "Failed to reload config, keeping current configuration"
                            );
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    async fn next_update(
        updates: &mut mpsc::UnboundedReceiver<ServiceConfig>,
        wait: Duration,
    ) -> Option<ServiceConfig> {
        tokio::time::timeout(wait, updates.recv()).await.ok().flatten()
    }

    #[tokio::test]
    async fn test_valid_rewrite_is_delivered() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[resolver]\ntimeout_ms = 1000").unwrap();

        let (watcher, mut updates) = ConfigWatcher::new(file.path());
        let _watcher = watcher.run().unwrap();

        std::fs::write(file.path(), "[resolver]\ntimeout_ms = 400\n").unwrap();

        let update = next_update(&mut updates, Duration::from_secs(5))
            .await
            .expect("no config update delivered");
        assert_eq!(update.resolver.timeout_ms, 400);
    }

    #[tokio::test]
    async fn test_unchanged_rewrite_is_skipped() {
        let content = "[resolver]\ntimeout_ms = 1000\n";
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), content).unwrap();

        let (watcher, mut updates) = ConfigWatcher::new(file.path());
        let _watcher = watcher.run().unwrap();

        std::fs::write(file.path(), content).unwrap();
        assert!(next_update(&mut updates, Duration::from_millis(500))
            .await
            .is_none());

        std::fs::write(file.path(), "[resolver]\ntimeout_ms = 600\n").unwrap();
        let update = next_update(&mut updates, Duration::from_secs(5))
            .await
            .expect("changed content was not delivered");
        assert_eq!(update.resolver.timeout_ms, 600);

        // Saving the same edit again does not trigger a second reload.
        std::fs::write(file.path(), "[resolver]\ntimeout_ms = 600\n").unwrap();
        assert!(next_update(&mut updates, Duration::from_millis(500))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_invalid_rewrite_is_not_forwarded() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[resolver]\ntimeout_ms = 1000\n").unwrap();

        let (watcher, mut updates) = ConfigWatcher::new(file.path());
        let _watcher = watcher.run().unwrap();

        std::fs::write(file.path(), "[resolver]\ntimeout_ms = 0\n").unwrap();
        assert!(next_update(&mut updates, Duration::from_millis(500))
            .await
            .is_none());
    }
}
