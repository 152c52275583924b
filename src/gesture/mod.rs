pub mod core;

use crate::surface::RowSurface;

use self::core::{GestureConfig, SurfaceCommand, SwipeAction, SwipeEngine, SwipeEngineOutput};

type Handler = Box<dyn FnMut()>;

/// Binds one [`SwipeEngine`] to one row surface and a set of replaceable
/// action handlers.
///
/// Handlers live in mutable slots decoupled from the contact lifecycle: a
/// classification always invokes whatever handler is registered at that
/// moment, so the owning row may rebind them at any time, including while a
/// contact is in flight. The engine's session is fully reset before any
/// handler runs, so a panicking handler cannot leave the recognizer stuck
/// mid-gesture.
pub struct RowGestureRecognizer<S: RowSurface> {
    engine: SwipeEngine,
    surface: S,
    on_tap: Option<Handler>,
    on_swipe_left: Option<Handler>,
    on_swipe_right: Option<Handler>,
    touch_used: bool,
}

impl<S: RowSurface> RowGestureRecognizer<S> {
    pub fn new(surface: S) -> Self {
        Self::with_config(surface, GestureConfig::default())
    }

    pub fn with_config(surface: S, config: GestureConfig) -> Self {
        Self {
            engine: SwipeEngine::with_config(config),
            surface,
            on_tap: None,
            on_swipe_left: None,
            on_swipe_right: None,
            touch_used: false,
        }
    }

    pub fn set_on_tap(&mut self, handler: impl FnMut() + 'static) {
        self.on_tap = Some(Box::new(handler));
    }

    pub fn set_on_swipe_left(&mut self, handler: impl FnMut() + 'static) {
        self.on_swipe_left = Some(Box::new(handler));
    }

    pub fn set_on_swipe_right(&mut self, handler: impl FnMut() + 'static) {
        self.on_swipe_right = Some(Box::new(handler));
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn touch_start(&mut self, x: i32, y: i32, t_ms: u64) {
        // Remember the contact was touch-sourced so the platform's
        // synthesized click for the same tap can be swallowed later.
        self.touch_used = true;
        let output = self.engine.contact_start(x, y, t_ms);
        self.apply(output);
    }

    pub fn touch_move(&mut self, x: i32, y: i32) {
        let output = self.engine.contact_move(x, y);
        self.apply(output);
    }

    pub fn touch_end(&mut self, t_ms: u64) {
        let output = self.engine.contact_end(t_ms);
        self.apply(output);
    }

    /// Generic click/activation for pointer environments without discrete
    /// touch contacts. Consumed once per touch-sourced interaction.
    pub fn click(&mut self) {
        if self.touch_used {
            self.touch_used = false;
            log::trace!("synthesized click suppressed after touch tap");
            return;
        }
        self.invoke(SwipeAction::Tap);
    }

    fn apply(&mut self, output: SwipeEngineOutput) {
        match output.command {
            Some(SurfaceCommand::Track { dx_px }) => self.surface.track(dx_px),
            Some(SurfaceCommand::Release) => self.surface.release(),
            None => {}
        }
        if let Some(action) = output.action {
            log::debug!("contact classified as {action:?}");
            self.invoke(action);
        }
    }

    fn invoke(&mut self, action: SwipeAction) {
        let slot = match action {
            SwipeAction::Tap => &mut self.on_tap,
            SwipeAction::SwipeLeft => &mut self.on_swipe_left,
            SwipeAction::SwipeRight => &mut self.on_swipe_right,
        };
        if let Some(handler) = slot {
            handler();
        }
    }
}
