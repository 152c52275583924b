use statig::{blocking::IntoStateMachineExt as _, prelude::*};

const DEFAULT_DEAD_ZONE_PX: i32 = 10;
const DEFAULT_SWIPE_THRESHOLD_PX: i32 = 60;
const DEFAULT_VELOCITY_THRESHOLD_PX_PER_S: i64 = 300;

/// Thresholds for classifying a contact at release time.
///
/// The velocity threshold is expressed in px/s and compared by
/// cross-multiplication against integer millisecond timestamps, so the
/// classifier never touches floating point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureConfig {
    /// Displacement on either axis below which no axis-lock decision is made.
    pub dead_zone_px: i32,
    /// Minimum horizontal travel at release for the distance path.
    pub swipe_threshold_px: i32,
    /// Minimum average horizontal speed at release for the velocity path.
    pub velocity_threshold_px_per_s: i64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            dead_zone_px: DEFAULT_DEAD_ZONE_PX,
            swipe_threshold_px: DEFAULT_SWIPE_THRESHOLD_PX,
            velocity_threshold_px_per_s: DEFAULT_VELOCITY_THRESHOLD_PX_PER_S,
        }
    }
}

/// Discrete action classified from one complete contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeAction {
    Tap,
    SwipeLeft,
    SwipeRight,
}

/// Visual instruction for the surface the contact is riding on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceCommand {
    /// Translate horizontally by `dx_px`, immediately, with animation
    /// suspended so the surface tracks the finger without lag.
    Track { dx_px: i32 },
    /// Restore the eased transition and animate back to the rest position.
    Release,
}

#[derive(Clone, Copy, Debug)]
enum SwipeHsmEvent {
    Down { x: i32, y: i32, t_ms: u64 },
    Move { x: i32, y: i32 },
    Up { t_ms: u64 },
}

/// Everything one engine tick may produce: at most one surface command and
/// one classified action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwipeEngineOutput {
    pub command: Option<SurfaceCommand>,
    pub action: Option<SwipeAction>,
}

#[derive(Clone, Copy, Debug, Default)]
struct DispatchContext {
    command: Option<SurfaceCommand>,
    action: Option<SwipeAction>,
}

impl DispatchContext {
    fn emit_command(&mut self, command: SurfaceCommand) {
        self.command = Some(command);
    }

    fn emit_action(&mut self, action: SwipeAction) {
        self.action = Some(action);
    }

    fn finish(self) -> SwipeEngineOutput {
        SwipeEngineOutput {
            command: self.command,
            action: self.action,
        }
    }
}

/// Single-touch swipe/tap classifier for one row surface.
///
/// Feed it the raw contact stream (`contact_start`, `contact_move`,
/// `contact_end`); it answers with surface commands while a horizontal drag
/// is live and with a classified action at release. Events that arrive with
/// no open session are ignored.
pub struct SwipeEngine {
    machine: statig::blocking::StateMachine<SwipeHsm>,
}

impl Default for SwipeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SwipeEngine {
    pub fn new() -> Self {
        Self::with_config(GestureConfig::default())
    }

    pub fn with_config(config: GestureConfig) -> Self {
        Self {
            machine: SwipeHsm::new(config).state_machine(),
        }
    }

    pub fn contact_start(&mut self, x: i32, y: i32, t_ms: u64) -> SwipeEngineOutput {
        self.dispatch(SwipeHsmEvent::Down { x, y, t_ms })
    }

    pub fn contact_move(&mut self, x: i32, y: i32) -> SwipeEngineOutput {
        self.dispatch(SwipeHsmEvent::Move { x, y })
    }

    pub fn contact_end(&mut self, t_ms: u64) -> SwipeEngineOutput {
        self.dispatch(SwipeHsmEvent::Up { t_ms })
    }

    fn dispatch(&mut self, event: SwipeHsmEvent) -> SwipeEngineOutput {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        context.finish()
    }
}

struct SwipeHsm {
    config: GestureConfig,
    origin_x: i32,
    origin_y: i32,
    down_ms: u64,
    offset_x: i32,
}

impl SwipeHsm {
    fn new(config: GestureConfig) -> Self {
        Self {
            config,
            origin_x: 0,
            origin_y: 0,
            down_ms: 0,
            offset_x: 0,
        }
    }

    // Shared by contact start and post-gesture cleanup so the contact-start
    // defaults cannot drift apart.
    fn reset_session(&mut self) {
        self.origin_x = 0;
        self.origin_y = 0;
        self.down_ms = 0;
        self.offset_x = 0;
    }

    fn begin_press(&mut self, x: i32, y: i32, t_ms: u64) {
        self.reset_session();
        self.origin_x = x;
        self.origin_y = y;
        self.down_ms = t_ms;
    }

    fn track_horizontal(&mut self, context: &mut DispatchContext, x: i32) {
        let dx = x - self.origin_x;
        self.offset_x = dx;
        context.emit_command(SurfaceCommand::Track { dx_px: dx });
    }

    // Distance-OR-velocity rule: a slow deliberate drag past the distance
    // threshold and a short fast flick both qualify.
    fn classify_release(&self, t_ms: u64) -> Option<SwipeAction> {
        let distance = self.offset_x.abs();
        if distance == 0 {
            return None;
        }

        let elapsed_ms = t_ms.saturating_sub(self.down_ms);
        let over_distance = distance >= self.config.swipe_threshold_px;
        // |offset| / elapsed >= threshold, with elapsed == 0 counting as an
        // instantaneous (infinitely fast) flick.
        let over_velocity = (distance as i64).saturating_mul(1_000)
            >= self
                .config
                .velocity_threshold_px_per_s
                .saturating_mul(elapsed_ms as i64);

        if !(over_distance || over_velocity) {
            return None;
        }

        if self.offset_x < 0 {
            Some(SwipeAction::SwipeLeft)
        } else {
            Some(SwipeAction::SwipeRight)
        }
    }
}

#[state_machine(initial = "State::idle()")]
impl SwipeHsm {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &SwipeHsmEvent) -> Outcome<State> {
        let _ = context;
        match event {
            SwipeHsmEvent::Down { x, y, t_ms } => {
                self.begin_press(*x, *y, *t_ms);
                Transition(State::armed())
            }
            // Move/up with no open session; tolerated as no-ops.
            _ => Handled,
        }
    }

    #[state]
    fn armed(&mut self, context: &mut DispatchContext, event: &SwipeHsmEvent) -> Outcome<State> {
        match event {
            // A second contact start before the first ended is ignored on
            // single-touch surfaces.
            SwipeHsmEvent::Down { .. } => Handled,
            SwipeHsmEvent::Move { x, y } => {
                let dx = x - self.origin_x;
                let dy = y - self.origin_y;
                if dx.abs() < self.config.dead_zone_px && dy.abs() < self.config.dead_zone_px {
                    return Handled;
                }

                // The dominant axis at the first sample past the dead zone
                // decides the lock for the rest of the contact.
                if dx.abs() >= dy.abs() {
                    self.track_horizontal(context, *x);
                    Transition(State::horizontal())
                } else {
                    Transition(State::vertical())
                }
            }
            SwipeHsmEvent::Up { .. } => {
                context.emit_command(SurfaceCommand::Release);
                context.emit_action(SwipeAction::Tap);
                self.reset_session();
                Transition(State::idle())
            }
        }
    }

    #[state]
    fn horizontal(
        &mut self,
        context: &mut DispatchContext,
        event: &SwipeHsmEvent,
    ) -> Outcome<State> {
        match event {
            SwipeHsmEvent::Down { .. } => Handled,
            SwipeHsmEvent::Move { x, .. } => {
                self.track_horizontal(context, *x);
                Handled
            }
            SwipeHsmEvent::Up { t_ms } => {
                context.emit_command(SurfaceCommand::Release);
                if let Some(action) = self.classify_release(*t_ms) {
                    context.emit_action(action);
                }
                self.reset_session();
                Transition(State::idle())
            }
        }
    }

    #[state]
    fn vertical(&mut self, context: &mut DispatchContext, event: &SwipeHsmEvent) -> Outcome<State> {
        match event {
            SwipeHsmEvent::Down { .. } => Handled,
            // The scroll container owns this contact; no offset is applied.
            SwipeHsmEvent::Move { .. } => Handled,
            SwipeHsmEvent::Up { .. } => {
                context.emit_command(SurfaceCommand::Release);
                self.reset_session();
                Transition(State::idle())
            }
        }
    }
}
