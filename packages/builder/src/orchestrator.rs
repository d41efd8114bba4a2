use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use webforge_config::constants::{
    WEBFORGE_MAX_LOG_ENTRIES, WEBFORGE_PROGRESS_STEP, WEBFORGE_READY_TIMEOUT_SECS,
};
use webforge_config::{env_parsed, env_string};
use webforge_files::FileSet;
use webforge_sandbox::{ProcessExit, ReadySignal, Sandbox};

use crate::log::DEFAULT_MAX_LOG_ENTRIES;
use crate::progress::Progress;
use crate::types::{BuildPhase, BuildState, LogCategory};

/// Per-chunk progress increment. A heuristic step, not a measurement.
const DEFAULT_PROGRESS_STEP: u8 = 5;
/// Progress ceiling while dependencies install.
const INSTALL_PROGRESS_CAP: u8 = 50;
/// Progress ceiling while the dev server starts; only readiness
/// completes the bar.
const DEV_PROGRESS_CAP: u8 = 90;

/// Configuration for one orchestrator instance.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub install_command: String,
    pub install_args: Vec<String>,
    pub dev_command: String,
    pub dev_args: Vec<String>,
    pub progress_step: u8,
    pub max_log_entries: usize,
    /// When set, a dev server that never signals readiness fails the
    /// cycle after this long. When unset the wait is unbounded.
    pub ready_timeout: Option<Duration>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            install_command: "npm".to_string(),
            install_args: vec!["install".to_string()],
            dev_command: "npm".to_string(),
            dev_args: vec!["run".to_string(), "dev".to_string()],
            progress_step: DEFAULT_PROGRESS_STEP,
            max_log_entries: DEFAULT_MAX_LOG_ENTRIES,
            ready_timeout: None,
        }
    }
}

impl BuildOptions {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        options.progress_step = env_parsed(WEBFORGE_PROGRESS_STEP, options.progress_step, 1..=25);
        options.max_log_entries = env_parsed(
            WEBFORGE_MAX_LOG_ENTRIES,
            options.max_log_entries,
            10..=100_000,
        );
        if let Some(raw) = env_string(WEBFORGE_READY_TIMEOUT_SECS) {
            match raw.parse::<u64>() {
                Ok(secs) if (1..=3600).contains(&secs) => {
                    options.ready_timeout = Some(Duration::from_secs(secs));
                }
                _ => warn!("{} is not a valid timeout, ignoring", WEBFORGE_READY_TIMEOUT_SECS),
            }
        }
        options
    }
}

/// Faults that abort a build cycle. All of them are converted into the
/// published `failed` state; none escape to the caller.
#[derive(Debug, Error)]
enum CycleFault {
    #[error(transparent)]
    Launch(#[from] webforge_sandbox::SandboxError),

    #[error("{0}")]
    Execution(String),

    #[error("Dev server did not signal readiness within {0} seconds")]
    Unreachable(u64),
}

/// Shared between the orchestrator handle and the cycle task.
struct Inner {
    state: watch::Sender<BuildState>,
    generation: AtomicU64,
}

impl Inner {
    /// Apply a state mutation on behalf of cycle `generation`.
    ///
    /// Mutations are serialized by the watch lock, and a closure from a
    /// superseded cycle observes a newer generation and leaves the
    /// state untouched, so stale updates are provably discarded.
    fn apply(&self, generation: u64, mutate: impl FnOnce(&mut BuildState)) {
        self.state.send_modify(|state| {
            if self.generation.load(Ordering::SeqCst) == generation {
                mutate(state);
            }
        });
    }
}

/// Drives build cycles against an injected sandbox handle and publishes
/// [`BuildState`] snapshots.
///
/// At most one cycle is in flight per orchestrator: starting a new one
/// supersedes the previous cycle, whose in-flight processes are
/// abandoned and whose pending updates are discarded.
pub struct BuildOrchestrator {
    inner: Arc<Inner>,
    current: Mutex<Option<JoinHandle<()>>>,
    options: BuildOptions,
}

impl BuildOrchestrator {
    pub fn new(options: BuildOptions) -> Self {
        let (state_tx, _) = watch::channel(BuildState::new(options.max_log_entries));
        Self {
            inner: Arc::new(Inner {
                state: state_tx,
                generation: AtomicU64::new(0),
            }),
            current: Mutex::new(None),
            options,
        }
    }

    /// Subscribe to build state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<BuildState> {
        self.inner.state.subscribe()
    }

    /// Current build state.
    pub fn snapshot(&self) -> BuildState {
        self.inner.state.borrow().clone()
    }

    /// Start a build cycle for `files` against `sandbox`.
    ///
    /// When the sandbox handle is absent or the file set is empty the
    /// call is a silent no-op: the sandbox may still be initializing
    /// relative to file arrival, so work is deferred until the host
    /// calls again with both in hand.
    ///
    /// A cycle already in progress is superseded: its task is aborted,
    /// its readiness subscription dropped, and any update it still
    /// manages to attempt is discarded by the generation check.
    pub fn run_build_cycle(&self, sandbox: Option<Arc<dyn Sandbox>>, files: &FileSet) {
        let Some(sandbox) = sandbox else {
            debug!("No sandbox handle yet, deferring build cycle");
            return;
        };
        if files.is_empty() {
            debug!("File set is empty, deferring build cycle");
            return;
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = self.current.lock().unwrap().take() {
            debug!("Superseding in-flight build cycle");
            previous.abort();
        }

        self.inner.apply(generation, |state| state.reset_for_cycle());
        info!(
            "Starting build cycle {} for {} files",
            generation,
            files.file_count()
        );

        let inner = self.inner.clone();
        let options = self.options.clone();
        let handle = tokio::spawn(async move {
            drive_cycle(inner, sandbox, options, generation).await;
        });
        *self.current.lock().unwrap() = Some(handle);
    }
}

impl Drop for BuildOrchestrator {
    fn drop(&mut self) {
        if let Some(handle) = self.current.lock().unwrap().take() {
            handle.abort();
        }
    }
}

async fn drive_cycle(
    inner: Arc<Inner>,
    sandbox: Arc<dyn Sandbox>,
    options: BuildOptions,
    generation: u64,
) {
    if let Err(fault) = run_phases(&inner, sandbox.as_ref(), &options, generation).await {
        warn!("Build cycle {} failed: {}", generation, fault);
        let message = fault.to_string();
        inner.apply(generation, |state| {
            state.phase = BuildPhase::Failed;
            state.error = Some(message.clone());
            state.logs.append(LogCategory::Error, message);
        });
    }
}

async fn run_phases(
    inner: &Arc<Inner>,
    sandbox: &dyn Sandbox,
    options: &BuildOptions,
    generation: u64,
) -> Result<(), CycleFault> {
    let mut progress = Progress::new();

    // --- Install phase ---
    let install_args: Vec<&str> = options.install_args.iter().map(String::as_str).collect();
    let mut install = sandbox
        .spawn(&options.install_command, &install_args)
        .await?;

    while let Some(chunk) = install.output.recv().await {
        progress.advance(options.progress_step, INSTALL_PROGRESS_CAP);
        let value = progress.value();
        inner.apply(generation, |state| {
            state.logs.append(LogCategory::Install, chunk);
            state.progress = value;
        });
    }

    // The output channel closes at termination and the exit report
    // follows; draining output first keeps every install entry ahead of
    // anything a later phase appends.
    match install.exit.await {
        Ok(ProcessExit::Exited { code }) => {
            if code != Some(0) {
                warn!("Install command exited with status {:?}", code);
            }
            progress.raise_to(INSTALL_PROGRESS_CAP);
            let value = progress.value();
            inner.apply(generation, |state| {
                state
                    .logs
                    .append(LogCategory::Success, "Dependencies installed successfully");
                state.progress = value;
            });
        }
        Ok(ProcessExit::Faulted { message }) => {
            return Err(CycleFault::Execution(message));
        }
        Err(_) => {
            return Err(CycleFault::Execution(
                "install process vanished without an exit report".to_string(),
            ));
        }
    }

    // --- Start phase ---
    inner.apply(generation, |state| state.phase = BuildPhase::Starting);

    // Subscribe before issuing the start command so a fast server
    // cannot announce readiness into the void.
    let mut ready = sandbox.ready_events();

    let dev_args: Vec<&str> = options.dev_args.iter().map(String::as_str).collect();
    let mut dev = sandbox.spawn(&options.dev_command, &dev_args).await?;
    // The dev process exit is deliberately not awaited: readiness is the
    // only transition into `ready`, and a server that dies before
    // announcing stays in `starting` until superseded or timed out.

    let deadline = options.ready_timeout.map(|t| tokio::time::Instant::now() + t);
    let mut output_open = true;
    loop {
        tokio::select! {
            biased;

            chunk = dev.output.recv(), if output_open => match chunk {
                Some(chunk) => {
                    progress.advance(options.progress_step, DEV_PROGRESS_CAP);
                    let value = progress.value();
                    inner.apply(generation, |state| {
                        state.logs.append(LogCategory::Devserver, chunk);
                        state.progress = value;
                    });
                }
                None => output_open = false,
            },

            signal = ready.recv() => match signal {
                Ok(ReadySignal { port, url }) => {
                    info!("Dev server ready on port {}", port);
                    progress.raise_to(100);
                    let value = progress.value();
                    inner.apply(generation, |state| {
                        state.endpoint = Some(url);
                        state.phase = BuildPhase::Ready;
                        state.progress = value;
                        state.logs.append(LogCategory::Success, "Server is ready!");
                    });
                    return Ok(());
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Readiness subscription lagged by {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(CycleFault::Execution(
                        "sandbox closed its readiness channel".to_string(),
                    ));
                }
            },

            _ = wait_for_deadline(deadline) => {
                let secs = options.ready_timeout.map(|t| t.as_secs()).unwrap_or_default();
                return Err(CycleFault::Unreachable(secs));
            }
        }
    }
}

/// Resolves at `deadline`, or never when no timeout is configured.
async fn wait_for_deadline(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_the_npm_flow() {
        let options = BuildOptions::default();
        assert_eq!(options.install_command, "npm");
        assert_eq!(options.install_args, vec!["install"]);
        assert_eq!(options.dev_command, "npm");
        assert_eq!(options.dev_args, vec!["run", "dev"]);
        assert_eq!(options.progress_step, 5);
        assert_eq!(options.ready_timeout, None);
    }

    #[test]
    fn ready_timeout_env_override_is_applied() {
        std::env::set_var(WEBFORGE_READY_TIMEOUT_SECS, "30");
        let options = BuildOptions::from_env();
        assert_eq!(options.ready_timeout, Some(Duration::from_secs(30)));
        std::env::remove_var(WEBFORGE_READY_TIMEOUT_SECS);
    }

    #[tokio::test]
    async fn missing_sandbox_defers_without_touching_state() {
        let orchestrator = BuildOrchestrator::new(BuildOptions::default());
        let mut files = FileSet::new();
        files.insert_file("package.json", "{}").unwrap();

        orchestrator.run_build_cycle(None, &files);

        let state = orchestrator.snapshot();
        assert_eq!(state.phase, BuildPhase::Idle);
        assert!(state.logs.is_empty());
        assert_eq!(state.progress, 0);
    }
}
