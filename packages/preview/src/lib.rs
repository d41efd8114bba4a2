//! Webforge Preview - Presentation state machine for the build surface
//!
//! Derives what the host view should render from a [`BuildState`]
//! snapshot: the log/progress view while a cycle is in flight, the live
//! embedded endpoint once the cycle is ready, and a dismissible error
//! overlay on top of either.

pub mod surface;

pub use surface::{BaseView, PreviewSurface, Rendering};
