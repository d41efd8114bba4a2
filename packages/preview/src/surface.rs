use serde::{Deserialize, Serialize};
use tracing::debug;

use webforge_builder::{BuildPhase, BuildState};

/// Base layer of the preview surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "view")]
pub enum BaseView {
    /// Log feed plus progress bar; shown while no endpoint is live.
    Progress,
    /// Embedded view of the reachable dev server.
    Live { endpoint: String },
}

/// What the host should render right now: a base layer and an optional
/// error overlay on top of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendering {
    pub base: BaseView,
    /// Error message to overlay, when a failure is visible.
    pub overlay: Option<String>,
}

/// Presentation state machine over build snapshots.
///
/// The surface holds exactly one piece of its own state: whether the
/// user dismissed the current failure's overlay. Everything else is
/// derived from the snapshot on each call, so the surface can never
/// drift from the build state it mirrors. Dismissing never touches the
/// build state itself; a fresh cycle is the only restart path.
#[derive(Debug, Default)]
pub struct PreviewSurface {
    dismissed: bool,
}

impl PreviewSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the rendering for `state`, updating overlay visibility.
    ///
    /// Leaving the `failed` phase re-arms the overlay so the next
    /// failure is visible again.
    pub fn render(&mut self, state: &BuildState) -> Rendering {
        if state.phase != BuildPhase::Failed {
            self.dismissed = false;
        }

        let base = match (&state.endpoint, state.phase) {
            (Some(endpoint), BuildPhase::Ready) => BaseView::Live {
                endpoint: endpoint.clone(),
            },
            _ => BaseView::Progress,
        };

        let overlay = if state.phase == BuildPhase::Failed && !self.dismissed {
            Some(
                state
                    .error
                    .clone()
                    .unwrap_or_else(|| "Failed to start preview".to_string()),
            )
        } else {
            None
        };

        Rendering { base, overlay }
    }

    /// Dismiss the visible error overlay. Clears visibility only; the
    /// underlying build state keeps its phase, logs and progress.
    pub fn dismiss_error(&mut self) {
        if !self.dismissed {
            debug!("Error overlay dismissed");
        }
        self.dismissed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use webforge_builder::LogCategory;

    fn failed_state() -> BuildState {
        let mut state = BuildState::default();
        state.reset_for_cycle();
        state.logs.append(LogCategory::Install, "npm output");
        state.progress = 35;
        state.phase = BuildPhase::Failed;
        state.error = Some("ENOENT: command not found".to_string());
        state.logs.append(LogCategory::Error, "ENOENT: command not found");
        state
    }

    #[test]
    fn progress_view_while_no_endpoint() {
        let mut surface = PreviewSurface::new();
        let mut state = BuildState::default();
        state.reset_for_cycle();

        let rendering = surface.render(&state);
        assert_eq!(rendering.base, BaseView::Progress);
        assert_eq!(rendering.overlay, None);
    }

    #[test]
    fn live_view_once_ready_with_endpoint() {
        let mut surface = PreviewSurface::new();
        let mut state = BuildState::default();
        state.reset_for_cycle();
        state.phase = BuildPhase::Ready;
        state.endpoint = Some("http://localhost:5173".to_string());
        state.progress = 100;

        let rendering = surface.render(&state);
        assert_eq!(
            rendering.base,
            BaseView::Live {
                endpoint: "http://localhost:5173".to_string()
            }
        );
        assert_eq!(rendering.overlay, None);
    }

    #[test]
    fn failure_shows_the_overlay_over_the_progress_view() {
        let mut surface = PreviewSurface::new();
        let state = failed_state();

        let rendering = surface.render(&state);
        assert_eq!(rendering.base, BaseView::Progress);
        assert_eq!(
            rendering.overlay.as_deref(),
            Some("ENOENT: command not found")
        );
    }

    #[test]
    fn dismissing_clears_visibility_but_not_the_build_state() {
        let mut surface = PreviewSurface::new();
        let state = failed_state();
        surface.render(&state);

        surface.dismiss_error();
        let rendering = surface.render(&state);

        assert_eq!(rendering.overlay, None);
        // The snapshot itself is untouched by dismissal.
        assert_eq!(state.phase, BuildPhase::Failed);
        assert_eq!(state.progress, 35);
        assert_eq!(state.logs.len(), 2);
        assert_eq!(state.error.as_deref(), Some("ENOENT: command not found"));
    }

    #[test]
    fn a_fresh_cycle_rearms_the_overlay() {
        let mut surface = PreviewSurface::new();
        surface.render(&failed_state());
        surface.dismiss_error();

        // New cycle starts: phase leaves failed.
        let mut installing = BuildState::default();
        installing.reset_for_cycle();
        surface.render(&installing);

        // That cycle fails too; the overlay must be visible again.
        let rendering = surface.render(&failed_state());
        assert!(rendering.overlay.is_some());
    }

    #[test]
    fn failure_without_a_message_gets_the_generic_one() {
        let mut surface = PreviewSurface::new();
        let mut state = failed_state();
        state.error = None;

        let rendering = surface.render(&state);
        assert_eq!(rendering.overlay.as_deref(), Some("Failed to start preview"));
    }
}
