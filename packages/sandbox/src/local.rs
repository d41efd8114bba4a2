// ABOUTME: Local process-backed sandbox implementation
// ABOUTME: Runs build commands in a scratch directory and detects dev-server readiness from output

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use webforge_config::constants::{WEBFORGE_READY_CHANNEL_SIZE, WEBFORGE_SANDBOX_ROOT};
use webforge_config::{env_parsed, env_string};
use webforge_files::FileSet;

use crate::detect::detect_server_url;
use crate::handle::Sandbox;
use crate::types::{ProcessExit, ReadySignal, SandboxProcess};
use crate::{Result, SandboxError};

/// Default capacity for the readiness broadcast channel.
/// Can be overridden via WEBFORGE_READY_CHANNEL_SIZE.
const DEFAULT_READY_CHANNEL_SIZE: usize = 16;

/// Process-backed sandbox rooted in a per-instance scratch directory.
///
/// Each instance owns a directory under the OS temp dir (or
/// `WEBFORGE_SANDBOX_ROOT`) keyed by a fresh UUID. Spawned processes run
/// with the scratch directory as their working directory; their combined
/// output is line-buffered and scanned for dev-server announcements,
/// which are rebroadcast as [`ReadySignal`]s.
pub struct LocalSandbox {
    id: Uuid,
    root: PathBuf,
    ready_tx: broadcast::Sender<ReadySignal>,
}

impl LocalSandbox {
    /// Create a sandbox with a fresh scratch directory.
    pub async fn new() -> Result<Self> {
        let id = Uuid::new_v4();
        let base = env_string(WEBFORGE_SANDBOX_ROOT)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("webforge-sandboxes"));
        Self::with_root(id, base.join(id.to_string())).await
    }

    /// Create a sandbox rooted at an explicit directory.
    pub async fn with_root(id: Uuid, root: PathBuf) -> Result<Self> {
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| SandboxError::RootUnavailable {
                path: root.display().to_string(),
                error: e.to_string(),
            })?;

        let channel_size = env_parsed(
            WEBFORGE_READY_CHANNEL_SIZE,
            DEFAULT_READY_CHANNEL_SIZE,
            1..=1024,
        );
        let (ready_tx, _) = broadcast::channel(channel_size);

        info!("Created sandbox {} at {}", id, root.display());
        Ok(Self { id, root, ready_tx })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Remove the scratch directory. Spawned processes are killed when
    /// their handles are dropped; this only reclaims disk.
    pub async fn cleanup(&self) -> Result<()> {
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => {
                info!("Removed sandbox directory {}", self.root.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SandboxError::Io(e)),
        }
    }
}

#[async_trait]
impl Sandbox for LocalSandbox {
    async fn mount(&self, files: &FileSet) -> Result<()> {
        let entries = files.files();
        for (path, content) in &entries {
            let target = self.root.join(path);
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| SandboxError::MountFailed {
                        path: path.to_string(),
                        error: e.to_string(),
                    })?;
            }
            tokio::fs::write(&target, content)
                .await
                .map_err(|e| SandboxError::MountFailed {
                    path: path.to_string(),
                    error: e.to_string(),
                })?;
        }
        info!("Mounted {} files into sandbox {}", entries.len(), self.id);
        Ok(())
    }

    async fn spawn(&self, command: &str, args: &[&str]) -> Result<SandboxProcess> {
        let cmdline = if args.is_empty() {
            command.to_string()
        } else {
            format!("{} {}", command, args.join(" "))
        };

        let mut cmd = Command::new(command);
        cmd.args(args)
            .current_dir(&self.root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            warn!("Failed to spawn '{}' in sandbox {}: {}", cmdline, self.id, e);
            SandboxError::SpawnFailed {
                command: cmdline.clone(),
                error: e.to_string(),
            }
        })?;

        debug!(
            "Spawned '{}' in sandbox {} with PID {:?}",
            cmdline,
            self.id,
            child.id()
        );

        let (output_tx, output_rx) = mpsc::unbounded_channel();
        // A server announces readiness at most once per spawned process,
        // even when both stdout and stderr print a matching line.
        let announced = Arc::new(AtomicBool::new(false));

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(pump_output(
                stdout,
                output_tx.clone(),
                self.ready_tx.clone(),
                announced.clone(),
            ));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(pump_output(
                stderr,
                output_tx,
                self.ready_tx.clone(),
                announced,
            ));
        }

        let (exit_tx, exit_rx) = oneshot::channel();
        tokio::spawn(async move {
            let report = match child.wait().await {
                Ok(status) => ProcessExit::Exited {
                    code: status.code(),
                },
                Err(e) => ProcessExit::Faulted {
                    message: e.to_string(),
                },
            };
            let _ = exit_tx.send(report);
        });

        Ok(SandboxProcess {
            output: output_rx,
            exit: exit_rx,
        })
    }

    fn ready_events(&self) -> broadcast::Receiver<ReadySignal> {
        self.ready_tx.subscribe()
    }
}

/// Pump one stdio stream into the output channel line by line, scanning
/// each line for a dev-server announcement.
async fn pump_output<R>(
    reader: R,
    tx: mpsc::UnboundedSender<String>,
    ready_tx: broadcast::Sender<ReadySignal>,
    announced: Arc<AtomicBool>,
) where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if let Some((port, url)) = detect_server_url(&line) {
            if !announced.swap(true, Ordering::SeqCst) {
                debug!("Detected dev server on port {}", port);
                // No subscribers is fine; readiness is best-effort here
                let _ = ready_tx.send(ReadySignal { port, url });
            }
        }
        if tx.send(line).is_err() {
            break; // receiver dropped, stop pumping
        }
    }
}
