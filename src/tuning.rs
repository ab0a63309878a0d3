//! Behaviour tuning
//!
//! Every number the flow uses lives here so a page can override it with a
//! JSON block (`<script id="flow-tuning" type="application/json">`).
//! Missing fields fall back to the defaults in `crate::consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Per-viewport flee parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Minimum time between two non-forced flees (ms)
    pub cooldown_ms: f64,
    /// Base jump distance (px)
    pub base_jump: f32,
    /// Random extra jump distance (px)
    pub jump_variation: f32,
    /// Per-axis jitter span (px, applied as `(r - 0.5) * jitter * 1.5`)
    pub jitter: f32,
}

impl Profile {
    pub fn desktop() -> Self {
        Self {
            cooldown_ms: DESKTOP_COOLDOWN_MS,
            base_jump: DESKTOP_BASE_JUMP,
            jump_variation: DESKTOP_JUMP_VARIATION,
            jitter: DESKTOP_JITTER,
        }
    }

    /// Narrow screens: shorter cooldown, bigger and more erratic jumps
    pub fn mobile() -> Self {
        Self {
            cooldown_ms: MOBILE_COOLDOWN_MS,
            base_jump: MOBILE_BASE_JUMP,
            jump_variation: MOBILE_JUMP_VARIATION,
            jitter: MOBILE_JITTER,
        }
    }
}

/// Jump multiplier bands: `far` with `far_chance`, else `medium` with
/// `medium_chance`, else `near`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpBands {
    pub far_chance: f32,
    pub far: f32,
    pub medium_chance: f32,
    pub medium: f32,
    pub near: f32,
}

impl Default for JumpBands {
    fn default() -> Self {
        Self {
            far_chance: 0.3,
            far: 1.5,
            medium_chance: 0.6,
            medium: 1.0,
            near: 0.7,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Screens ===
    /// Screen identifiers in display order
    pub screen_order: Vec<String>,
    /// Screen on which the No button is live
    pub evasion_screen: String,
    /// Screen the Yes button jumps to
    pub final_screen: String,

    // === Celebration ===
    pub celebration_hold_ms: f64,
    pub celebration_fade_ms: f64,

    // === Evasion ===
    /// Viewport width at or below which the mobile profile applies
    pub mobile_breakpoint: f32,
    pub desktop: Profile,
    pub mobile: Profile,
    pub mouse_proximity: f32,
    pub touch_proximity: f32,
    pub flee_padding: f32,
    pub place_padding: f32,
    pub accept_margin: f32,
    pub random_direction_chance: f32,
    pub jump_bands: JumpBands,
    pub max_placement_attempts: u32,
    pub retry_steer: f32,
    /// Preferred initial No offset as a fraction of the container size
    pub initial_offset: (f32, f32),
    /// Used when the preferred spot overlaps the Yes button
    pub fallback_offset: (f32, f32),

    // === Escalation ===
    /// Yes scale growth per attempt (no upper bound)
    pub growth_x: f32,
    pub growth_y: f32,
    /// Labels cycled onto the No button
    pub taunts: Vec<String>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_order: SCREEN_ORDER.iter().map(|s| s.to_string()).collect(),
            evasion_screen: EVASION_SCREEN.to_string(),
            final_screen: FINAL_SCREEN.to_string(),

            celebration_hold_ms: CELEBRATION_HOLD_MS,
            celebration_fade_ms: CELEBRATION_FADE_MS,

            mobile_breakpoint: MOBILE_BREAKPOINT,
            desktop: Profile::desktop(),
            mobile: Profile::mobile(),
            mouse_proximity: MOUSE_PROXIMITY,
            touch_proximity: TOUCH_PROXIMITY,
            flee_padding: FLEE_PADDING,
            place_padding: PLACE_PADDING,
            accept_margin: ACCEPT_MARGIN,
            random_direction_chance: RANDOM_DIRECTION_CHANCE,
            jump_bands: JumpBands::default(),
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            retry_steer: RETRY_STEER,
            initial_offset: (0.7, 0.3),
            fallback_offset: (0.15, 0.6),

            growth_x: GROWTH_X,
            growth_y: GROWTH_Y,
            taunts: TAUNTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Tuning {
    /// Profile for a viewport of the given width
    pub fn profile_for(&self, viewport_width: f32) -> &Profile {
        if viewport_width <= self.mobile_breakpoint {
            &self.mobile
        } else {
            &self.desktop
        }
    }

    /// Parse a JSON override; unspecified fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.validated())
    }

    /// Replace values that would break the flow with their defaults
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if self.screen_order.is_empty() {
            log::warn!("Tuning: empty screen order, using default");
            self.screen_order = defaults.screen_order;
        }
        if self.max_placement_attempts == 0 {
            log::warn!("Tuning: max_placement_attempts must be >= 1");
            self.max_placement_attempts = 1;
        }
        for profile in [&mut self.desktop, &mut self.mobile] {
            profile.cooldown_ms = profile.cooldown_ms.max(0.0);
            profile.base_jump = profile.base_jump.max(0.0);
            profile.jump_variation = profile.jump_variation.max(0.0);
            profile.jitter = profile.jitter.max(0.0);
        }
        self.celebration_hold_ms = self.celebration_hold_ms.max(0.0);
        self.celebration_fade_ms = self.celebration_fade_ms.max(0.0);
        self.flee_padding = self.flee_padding.max(0.0);
        self.place_padding = self.place_padding.max(0.0);
        self.growth_x = self.growth_x.max(0.0);
        self.growth_y = self.growth_y.max(0.0);

        self
    }

    /// Element id of the optional JSON override block
    #[allow(dead_code)]
    const ELEMENT_ID: &'static str = "flow-tuning";

    /// Load tuning from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning override from #{}", Self::ELEMENT_ID);
                    return tuning;
                }
                Err(e) => log::warn!("Ignoring malformed tuning override: {}", e),
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_selection() {
        let t = Tuning::default();
        assert_eq!(t.profile_for(480.0).cooldown_ms, 280.0);
        assert_eq!(t.profile_for(320.0).base_jump, 180.0);
        assert_eq!(t.profile_for(481.0).cooldown_ms, 420.0);
        assert_eq!(t.profile_for(1920.0).jitter, 70.0);
    }

    #[test]
    fn test_defaults_match_page() {
        let t = Tuning::default();
        assert_eq!(t.screen_order.len(), 8);
        assert_eq!(t.screen_order.first().map(String::as_str), Some("intro"));
        assert_eq!(t.screen_order.last().map(String::as_str), Some("final"));
        assert_eq!(t.taunts.len(), 24);
        assert_eq!(t.mouse_proximity, 140.0);
        assert_eq!(t.touch_proximity, 160.0);
    }

    #[test]
    fn test_partial_json_override() {
        let t = Tuning::from_json(r#"{ "celebration_hold_ms": 500, "taunts": ["nope"] }"#)
            .expect("valid json");
        assert_eq!(t.celebration_hold_ms, 500.0);
        assert_eq!(t.taunts, vec!["nope".to_string()]);
        assert_eq!(t.celebration_fade_ms, 180.0);
        assert_eq!(t.desktop, Profile::desktop());
    }

    #[test]
    fn test_validation_repairs_bad_values() {
        let t = Tuning::from_json(r#"{ "screen_order": [], "max_placement_attempts": 0 }"#)
            .expect("valid json");
        assert_eq!(t.screen_order.len(), 8);
        assert_eq!(t.max_placement_attempts, 1);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_roundtrip_json() {
        let t = Tuning::default();
        let json = serde_json::to_string(&t).expect("serialize");
        assert_eq!(Tuning::from_json(&json).expect("parse"), t);
    }
}
