// ABOUTME: Abstract sandbox handle trait driven by the build orchestrator
// ABOUTME: Any execution backend (local process tree, container, remote VM) implements this

use async_trait::async_trait;
use tokio::sync::broadcast;
use webforge_files::FileSet;

use crate::types::{ReadySignal, SandboxProcess};
use crate::Result;

/// Handle to one ephemeral, isolated execution environment.
///
/// The build orchestrator owns no execution machinery of its own; it
/// drives whatever implements this trait. Implementations must be safe
/// to share behind an `Arc` across tasks.
#[async_trait]
pub trait Sandbox: Send + Sync {
    /// Write the file set into the sandbox filesystem, replacing any
    /// files already present at the same paths.
    async fn mount(&self, files: &FileSet) -> Result<()>;

    /// Launch a process inside the sandbox. A launch failure is an
    /// `Err` here; anything after a successful launch is reported
    /// through the returned handles.
    async fn spawn(&self, command: &str, args: &[&str]) -> Result<SandboxProcess>;

    /// Subscribe to dev-server readiness signals. The subscription is
    /// scoped: dropping the receiver releases it, so a superseded build
    /// cycle leaves nothing behind on the shared handle.
    fn ready_events(&self) -> broadcast::Receiver<ReadySignal>;
}
