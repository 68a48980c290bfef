//! Hot reload of the backend table.
//!
//! The watcher follows the config file's directory, so editors that replace
//! the file on save are still seen. Every change is loaded and validated, then
//! compared with the running configuration: a new `[[backends]]` table is sent
//! to the server, while edits to sections read only at startup are logged and
//! wait for the next restart.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::{BackendConfig, EdgeConfig};

/// How a reloaded file differs from the running configuration.
#[derive(Debug, Default, PartialEq)]
pub struct ConfigDiff {
    /// The new backend table, when it changed.
    pub backends: Option<Vec<BackendConfig>>,
    /// Sections that changed but only apply after a restart.
    pub restart_required: Vec<&'static str>,
}

impl ConfigDiff {
    pub fn between(running: &EdgeConfig, loaded: &EdgeConfig) -> Self {
        let sections = [
            ("listener", running.listener != loaded.listener),
            ("routing", running.routing != loaded.routing),
            ("timeouts", running.timeouts != loaded.timeouts),
            ("local", running.local != loaded.local),
            ("observability", running.observability != loaded.observability),
        ];

        Self {
            backends: (running.backends != loaded.backends).then(|| loaded.backends.clone()),
            restart_required: sections
                .into_iter()
                .filter_map(|(name, changed)| changed.then_some(name))
                .collect(),
        }
    }
}

/// Watches the configuration file and streams backend table updates.
pub struct ConfigWatcher {
    path: PathBuf,
    running: EdgeConfig,
    update_tx: mpsc::UnboundedSender<Vec<BackendConfig>>,
}

impl ConfigWatcher {
    /// Watch `path`, starting from the configuration the server was built with.
    ///
    /// The receiver is meant for [`HttpServer::run`](crate::http::HttpServer::run).
    pub fn new(
        path: &Path,
        running: EdgeConfig,
    ) -> (Self, mpsc::UnboundedReceiver<Vec<BackendConfig>>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                running,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned watcher must be kept alive.
    pub fn run(mut self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = self.path.file_name().map(|n| n.to_os_string());
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let touches_config = event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == file_name.as_deref());
                    if touches_config && (event.kind.is_modify() || event.kind.is_create()) {
                        self.on_change();
                    }
                }
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }

    fn on_change(&mut self) {
        let loaded = match load_config(&self.path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(
                    path = ?self.path,
                    error = %e,
                    "Config reload rejected, keeping current configuration"
                );
                return;
            }
        };

        let diff = ConfigDiff::between(&self.running, &loaded);
        if !diff.restart_required.is_empty() {
            tracing::warn!(
                sections = ?diff.restart_required,
                "Changed config sections only apply after a restart"
            );
        }

        let Some(backends) = diff.backends else {
            tracing::debug!("Backend table unchanged");
            return;
        };

        let count = backends.len();
        match self.update_tx.send(backends) {
            Ok(()) => {
                tracing::info!(backends = count, "Backend table reloaded");
                self.running.backends = loaded.backends;
            }
            Err(_) => tracing::warn!("Server no longer accepts backend updates, reload dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_BACKEND: &str = r#"
[[backends]]
name = "https_backend_example.com"
address = "127.0.0.1:9000"
"#;

    fn backend(name: &str, address: &str) -> BackendConfig {
        BackendConfig {
            name: name.to_string(),
            address: address.to_string(),
        }
    }

    #[test]
    fn test_diff_unchanged() {
        let config = EdgeConfig::default();
        assert_eq!(ConfigDiff::between(&config, &config.clone()), ConfigDiff::default());
    }

    #[test]
    fn test_diff_backends_and_restart_sections() {
        let running = EdgeConfig::default();
        let mut loaded = EdgeConfig::default();
        loaded.backends.push(backend("https_backend_a.com", "10.0.0.1:80"));
        loaded.listener.bind_address = "127.0.0.1:9999".to_string();
        loaded.timeouts.request_secs = 3;

        let diff = ConfigDiff::between(&running, &loaded);
        assert_eq!(diff.backends, Some(loaded.backends.clone()));
        assert_eq!(diff.restart_required, vec!["listener", "timeouts"]);
    }

    #[test]
    fn test_change_sends_backends_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edge.toml");
        std::fs::write(&path, ONE_BACKEND).unwrap();

        let (mut watcher, mut rx) = ConfigWatcher::new(&path, EdgeConfig::default());
        watcher.on_change();
        assert_eq!(
            rx.try_recv().unwrap(),
            vec![backend("https_backend_example.com", "127.0.0.1:9000")]
        );

        watcher.on_change();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_invalid_file_keeps_running_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edge.toml");
        std::fs::write(&path, "[[backends]]\nname = \"\"\naddress = \"x\"\n").unwrap();

        let (mut watcher, mut rx) = ConfigWatcher::new(&path, EdgeConfig::default());
        watcher.on_change();
        assert!(rx.try_recv().is_err());
        assert!(watcher.running.backends.is_empty());
    }

    #[test]
    fn test_closed_receiver_does_not_advance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edge.toml");
        std::fs::write(&path, ONE_BACKEND).unwrap();

        let (mut watcher, rx) = ConfigWatcher::new(&path, EdgeConfig::default());
        drop(rx);
        watcher.on_change();
        assert!(watcher.running.backends.is_empty());
    }

    #[tokio::test]
    async fn test_file_edit_delivers_update() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edge.toml");
        std::fs::write(&path, "").unwrap();

        let (watcher, mut rx) = ConfigWatcher::new(&path, EdgeConfig::default());
        let _guard = watcher.run().unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        std::fs::write(&path, ONE_BACKEND).unwrap();

        let update = tokio::time::timeout(Duration::from_secs(10), rx.recv())
            .await
            .expect("No update after editing the config file")
            .unwrap();
        assert_eq!(update.len(), 1);
        assert_eq!(update[0].name, "https_backend_example.com");
    }
}
