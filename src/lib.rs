//! Valentine Flow - a screen-by-screen proposal with a No button that runs away
//!
//! Core modules:
//! - `nav`: Screen navigator (ordered screens, one active at a time)
//! - `evasion`: Evasive decline button (proximity, flee placement, escalation)
//! - `flow`: Event dispatch, celebration overlay, timer tasks
//! - `scheduler`: Deterministic, cancelable timer queue
//! - `tuning`: Data-driven behaviour constants
//! - `platform`: Browser DOM binding and an in-memory stage

pub mod evasion;
pub mod flow;
pub mod geometry;
pub mod nav;
pub mod platform;
pub mod random;
pub mod scheduler;
pub mod tuning;

pub use evasion::{ButtonHost, EvasionController, EvasionState, FleeOutcome, PointerKind};
pub use flow::{CelebrationPhase, Flow, FlowEvent, Stage};
pub use geometry::Rect;
pub use nav::{Navigator, ScreenHost};
pub use random::{RandomSource, ScriptedRandom};
pub use scheduler::{Scheduler, TaskId};
pub use tuning::{Profile, Tuning};

/// Default behaviour constants
pub mod consts {
    /// Screens in the order they are shown
    pub const SCREEN_ORDER: [&str; 8] =
        ["intro", "q1", "q2", "q3", "q4", "q5", "valentine", "final"];
    /// Screen that hosts the Yes/No buttons
    pub const EVASION_SCREEN: &str = "valentine";
    /// Screen the Yes button jumps to
    pub const FINAL_SCREEN: &str = "final";

    /// Viewports at or below this width use the mobile profile
    pub const MOBILE_BREAKPOINT: f32 = 480.0;

    /// Proximity thresholds (pixels from the No button centre)
    pub const MOUSE_PROXIMITY: f32 = 140.0;
    pub const TOUCH_PROXIMITY: f32 = 160.0;

    /// Minimum time between two non-forced flees (ms)
    pub const DESKTOP_COOLDOWN_MS: f64 = 420.0;
    pub const MOBILE_COOLDOWN_MS: f64 = 280.0;

    /// Jump distance = (base + random * variation) * multiplier
    pub const DESKTOP_BASE_JUMP: f32 = 240.0;
    pub const DESKTOP_JUMP_VARIATION: f32 = 200.0;
    pub const MOBILE_BASE_JUMP: f32 = 180.0;
    pub const MOBILE_JUMP_VARIATION: f32 = 250.0;

    /// Per-axis jitter span (scaled by 1.5 when applied)
    pub const DESKTOP_JITTER: f32 = 70.0;
    pub const MOBILE_JITTER: f32 = 100.0;

    /// Padding kept between the No button and the container edge while fleeing
    pub const FLEE_PADDING: f32 = 12.0;
    /// Padding used for the initial placement
    pub const PLACE_PADDING: f32 = 10.0;
    /// Margin added around the Yes button for overlap checks
    pub const ACCEPT_MARGIN: f32 = 20.0;

    /// Chance to ignore the pointer and pick a random direction
    pub const RANDOM_DIRECTION_CHANCE: f32 = 0.25;
    /// Maximum candidate positions tried per flee
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10;
    /// Direction perturbation applied between placement attempts
    pub const RETRY_STEER: f32 = 0.3;

    /// Yes button growth per No attempt (uncapped)
    pub const GROWTH_X: f32 = 0.04;
    pub const GROWTH_Y: f32 = 0.013;

    /// Celebration overlay: hold, then fade, then advance (ms)
    pub const CELEBRATION_HOLD_MS: f64 = 1400.0;
    pub const CELEBRATION_FADE_MS: f64 = 180.0;

    /// Labels cycled onto the No button, one per attempt
    pub const TAUNTS: [&str; 24] = [
        "Think twice 🤔",
        "Are you sure? 😏",
        "Umm… really? 👀",
        "Try again 😌",
        "Not allowed 😈",
        "Bad choice 😤",
        "That button is suspicious…",
        "You meant ‘Yes’ 😇",
        "Nope nope nope 🙅‍♀️",
        "Reconsider! 🥺",
        "Final answer? 😏",
        "Locking in… NO? 🤨",
        "This isn’t KBC 😭",
        "Nice try 😜",
        "Come onnnn 🫶",
        "Be honest 😌",
        "You’re chasing the wrong one 🏃‍♀️",
        "Still no? 😳",
        "Ok now it’s personal 😤",
        "😂",
        "YES is right there 👉",
        "Stoppppp 😭",
        "Last LAST chance 😇",
        "Too late now 😜",
    ];
}

/// Clamp `v` into `[min, max]`, collapsing to `min` when the range is inverted
#[inline]
pub fn clamp_span(v: f32, min: f32, max: f32) -> f32 {
    v.clamp(min, max.max(min))
}
