//! Single-touch swipe/tap recognition for list-row surfaces.
//!
//! One contact (down, zero or more moves, up) is classified into exactly one
//! of tap, swipe-left or swipe-right, or into nothing at all when the
//! contact turns out to be a scroll or an abandoned drag. Classification
//! uses a dead zone, a one-shot axis lock decided at the first sample past
//! the dead zone, and a distance-OR-velocity threshold at release.
//!
//! [`gesture::core::SwipeEngine`] is the bare classifier; wire it up through
//! [`RowGestureRecognizer`] to get handler slots, live surface translation
//! and synthesized-click de-duplication.

pub mod gesture;
pub mod surface;

pub use gesture::core::{GestureConfig, SurfaceCommand, SwipeAction, SwipeEngine, SwipeEngineOutput};
pub use gesture::RowGestureRecognizer;
pub use surface::{NullSurface, RowSurface};
