//! Evasive No button
//!
//! The decline button can never be pressed while its screen is active:
//! pointer proximity, hover, touch and click all turn into a flee. Each flee
//! moves the button away from the pointer, grows the Yes button and swaps
//! the No label.
//!
//! Geometry is queried from the host on every call and never cached.

pub mod escalation;
pub mod placement;

pub use escalation::{accept_scale, scale_transform, taunt_for};
pub use placement::{Placement, clamp_offset, find_flee_offset, initial_offset};

use glam::Vec2;

use crate::geometry::Rect;
use crate::random::RandomSource;
use crate::tuning::Tuning;

/// Host side of the Yes/No widget (DOM elements in the browser)
pub trait ButtonHost {
    /// Container bounds in client coordinates
    fn container_rect(&self) -> Option<Rect>;
    /// Yes button bounds in client coordinates (including its current scale)
    fn accept_rect(&self) -> Option<Rect>;
    /// No button bounds in client coordinates
    fn decline_rect(&self) -> Option<Rect>;
    /// Viewport width in CSS pixels
    fn viewport_width(&self) -> f32;

    /// Move the No button to `offset` from the container's top-left corner
    fn place_decline(&mut self, offset: Vec2);
    /// Apply a scale to the Yes button
    fn scale_accept(&mut self, scale: Vec2);
    /// Replace the No button's text
    fn set_decline_label(&mut self, label: &str);
}

/// Live layout of the widget, gathered fresh for each operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonGeometry {
    pub container: Rect,
    pub accept: Rect,
    pub decline: Rect,
}

impl ButtonGeometry {
    /// `None` if any of the three elements is missing
    pub fn query(host: &impl ButtonHost) -> Option<Self> {
        Some(Self {
            container: host.container_rect()?,
            accept: host.accept_rect()?,
            decline: host.decline_rect()?,
        })
    }
}

/// Input device that produced a pointer position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Mutable state owned by the controller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EvasionState {
    /// Failed No attempts so far
    pub attempts: u32,
    /// Time of the last flee (ms), forced or not
    pub last_flee_ms: Option<f64>,
    /// Last pointer position seen over the container
    pub last_pointer: Vec2,
}

impl EvasionState {
    /// True if a non-forced flee at `now_ms` would come too soon
    pub fn cooling_down(&self, now_ms: f64, cooldown_ms: f64) -> bool {
        self.last_flee_ms
            .is_some_and(|last| now_ms - last < cooldown_ms)
    }
}

/// Result of registering one more failed attempt
#[derive(Debug, Clone, PartialEq)]
pub struct Escalation {
    pub attempts: u32,
    pub accept_scale: Vec2,
    pub label: Option<String>,
}

/// What a flee did
#[derive(Debug, Clone, PartialEq)]
pub struct FleeOutcome {
    pub placement: Placement,
    pub escalation: Escalation,
    pub forced: bool,
}

/// Controller for the Yes/No widget
#[derive(Debug, Clone)]
pub struct EvasionController<R> {
    tuning: Tuning,
    state: EvasionState,
    rng: R,
}

impl<R: RandomSource> EvasionController<R> {
    pub fn new(tuning: Tuning, rng: R) -> Self {
        Self {
            tuning,
            state: EvasionState::default(),
            rng,
        }
    }

    pub fn state(&self) -> &EvasionState {
        &self.state
    }

    pub fn attempts(&self) -> u32 {
        self.state.attempts
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Remember where the pointer is, for events that carry no coordinates
    pub fn track_pointer(&mut self, pointer: Vec2) {
        self.state.last_pointer = pointer;
    }

    /// Flee if the pointer came within the device's threshold of the No
    /// button centre. Subject to the cooldown.
    pub fn evaluate_proximity(
        &mut self,
        host: &mut impl ButtonHost,
        pointer: Vec2,
        kind: PointerKind,
        active: bool,
        now_ms: f64,
    ) -> Option<FleeOutcome> {
        if kind == PointerKind::Mouse {
            self.track_pointer(pointer);
        }
        if !active {
            return None;
        }

        let decline = host.decline_rect()?;
        let threshold = match kind {
            PointerKind::Mouse => self.tuning.mouse_proximity,
            PointerKind::Touch => self.tuning.touch_proximity,
        };
        let dist = decline.distance_to_center(pointer);
        if dist >= threshold {
            log::trace!("Pointer {:.0}px from No, threshold {:.0}", dist, threshold);
            return None;
        }

        self.flee(host, pointer, false, active, now_ms)
    }

    /// Pointer entered the No button. Uses the last tracked position when the
    /// event has no coordinates.
    pub fn hover(
        &mut self,
        host: &mut impl ButtonHost,
        pointer: Option<Vec2>,
        active: bool,
        now_ms: f64,
    ) -> Option<FleeOutcome> {
        let pointer = pointer.unwrap_or(self.state.last_pointer);
        self.flee(host, pointer, true, active, now_ms)
    }

    /// A finger landed on the No button
    pub fn touch_start(
        &mut self,
        host: &mut impl ButtonHost,
        pointer: Vec2,
        active: bool,
        now_ms: f64,
    ) -> Option<FleeOutcome> {
        self.flee(host, pointer, true, active, now_ms)
    }

    /// The No button was somehow clicked: flee from the last known pointer
    pub fn click(
        &mut self,
        host: &mut impl ButtonHost,
        active: bool,
        now_ms: f64,
    ) -> Option<FleeOutcome> {
        let pointer = self.state.last_pointer;
        self.flee(host, pointer, true, active, now_ms)
    }

    /// Move the No button away from `pointer` and escalate.
    ///
    /// No-op if the screen is inactive, an element is missing, or (unless
    /// `forced`) the cooldown has not elapsed.
    pub fn flee(
        &mut self,
        host: &mut impl ButtonHost,
        pointer: Vec2,
        forced: bool,
        active: bool,
        now_ms: f64,
    ) -> Option<FleeOutcome> {
        if !active {
            return None;
        }
        let geom = ButtonGeometry::query(&*host)?;

        let profile = *self.tuning.profile_for(host.viewport_width());
        if !forced && self.state.cooling_down(now_ms, profile.cooldown_ms) {
            log::trace!("Flee suppressed by cooldown");
            return None;
        }
        self.state.last_flee_ms = Some(now_ms);

        let placement = find_flee_offset(&geom, pointer, &profile, &self.tuning, &mut self.rng);
        host.place_decline(placement.offset);

        let escalation = self.register_flee(host);
        log::debug!(
            "No fled to ({:.0}, {:.0}) after {} tries (attempt {}, forced: {})",
            placement.offset.x,
            placement.offset.y,
            placement.tries,
            escalation.attempts,
            forced
        );

        Some(FleeOutcome {
            placement,
            escalation,
            forced,
        })
    }

    /// Count one more failed attempt, grow Yes and swap the No label
    pub fn register_flee(&mut self, host: &mut impl ButtonHost) -> Escalation {
        self.state.attempts = self.state.attempts.saturating_add(1);
        let attempts = self.state.attempts;

        let scale = accept_scale(attempts, &self.tuning);
        host.scale_accept(scale);

        let label = taunt_for(attempts, &self.tuning.taunts).map(str::to_owned);
        if let Some(label) = &label {
            host.set_decline_label(label);
        }

        Escalation {
            attempts,
            accept_scale: scale,
            label,
        }
    }

    /// Put the No button at its starting spot, away from Yes
    pub fn place_initially(&self, host: &mut impl ButtonHost) -> Option<Vec2> {
        let geom = ButtonGeometry::query(&*host)?;
        let offset = initial_offset(&geom, &self.tuning);
        host.place_decline(offset);
        log::debug!("No placed at ({:.0}, {:.0})", offset.x, offset.y);
        Some(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{DEFAULT_DECLINE_LABEL, HeadlessStage};
    use crate::random::ScriptedRandom;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn controller() -> EvasionController<Pcg32> {
        EvasionController::new(Tuning::default(), Pcg32::seed_from_u64(12345))
    }

    fn near_decline(stage: &HeadlessStage, dx: f32) -> Vec2 {
        stage.decline_rect().expect("decline").center() - Vec2::new(dx, 0.0)
    }

    #[test]
    fn test_proximity_triggers_flee() {
        let mut stage = HeadlessStage::with_default_screens();
        let mut ctl = controller();
        let before = stage.decline_rect();

        let pointer = near_decline(&stage, 100.0);
        let out = ctl.evaluate_proximity(&mut stage, pointer, PointerKind::Mouse, true, 1000.0);

        assert!(out.is_some());
        assert_eq!(ctl.attempts(), 1);
        assert_ne!(stage.decline_rect(), before);
        assert_eq!(stage.decline_label(), "Think twice 🤔");
    }

    #[test]
    fn test_far_pointer_is_ignored() {
        let mut stage = HeadlessStage::with_default_screens();
        let mut ctl = controller();

        let pointer = near_decline(&stage, 140.0);
        assert!(ctl.evaluate_proximity(&mut stage, pointer, PointerKind::Mouse, true, 1000.0).is_none());
        assert_eq!(ctl.attempts(), 0);
        assert_eq!(ctl.state().last_pointer, pointer);
    }

    #[test]
    fn test_touch_threshold_is_wider() {
        let mut stage = HeadlessStage::with_default_screens();
        let mut ctl = controller();

        let pointer = near_decline(&stage, 150.0);
        assert!(ctl.evaluate_proximity(&mut stage, pointer, PointerKind::Mouse, true, 0.0).is_none());
        assert!(ctl.evaluate_proximity(&mut stage, pointer, PointerKind::Touch, true, 0.0).is_some());
    }

    #[test]
    fn test_inactive_screen_never_flees() {
        let mut stage = HeadlessStage::with_default_screens();
        let mut ctl = controller();

        let pointer = near_decline(&stage, 10.0);
        assert!(ctl.evaluate_proximity(&mut stage, pointer, PointerKind::Mouse, false, 0.0).is_none());
        assert!(ctl.hover(&mut stage, Some(pointer), false, 0.0).is_none());
        assert!(ctl.click(&mut stage, false, 0.0).is_none());
        assert_eq!(ctl.attempts(), 0);
    }

    #[test]
    fn test_cooldown_limits_proximity_flees() {
        let mut stage = HeadlessStage::with_default_screens();
        let mut ctl = controller();

        let mut flees = 0;
        // 20 events over 400ms: all inside one desktop cooldown window
        for i in 0..20 {
            let pointer = near_decline(&stage, 5.0);
            let now = 1000.0 + i as f64 * 20.0;
            if ctl.evaluate_proximity(&mut stage, pointer, PointerKind::Mouse, true, now).is_some() {
                flees += 1;
            }
        }
        assert_eq!(flees, 1);

        // Window elapsed
        let pointer = near_decline(&stage, 5.0);
        assert!(ctl.evaluate_proximity(&mut stage, pointer, PointerKind::Mouse, true, 1420.0).is_some());
    }

    #[test]
    fn test_mobile_cooldown_is_shorter() {
        let mut stage = HeadlessStage::with_default_screens();
        stage.set_viewport_width(390.0);
        let mut ctl = controller();

        let p = near_decline(&stage, 5.0);
        assert!(ctl.evaluate_proximity(&mut stage, p, PointerKind::Touch, true, 0.0).is_some());
        let p = near_decline(&stage, 5.0);
        assert!(ctl.evaluate_proximity(&mut stage, p, PointerKind::Touch, true, 279.0).is_none());
        let p = near_decline(&stage, 5.0);
        assert!(ctl.evaluate_proximity(&mut stage, p, PointerKind::Touch, true, 280.0).is_some());
    }

    #[test]
    fn test_forced_flee_ignores_cooldown() {
        let mut stage = HeadlessStage::with_default_screens();
        let mut ctl = controller();
        let p = near_decline(&stage, 5.0);

        assert!(ctl.evaluate_proximity(&mut stage, p, PointerKind::Mouse, true, 0.0).is_some());
        assert!(ctl.hover(&mut stage, Some(p), true, 1.0).is_some());
        assert!(ctl.touch_start(&mut stage, p, true, 2.0).is_some());
        assert!(ctl.click(&mut stage, true, 3.0).is_some());
        assert_eq!(ctl.attempts(), 4);
    }

    #[test]
    fn test_hover_without_coordinates_uses_last_pointer() {
        let mut stage = HeadlessStage::with_default_screens();
        // No jitter, no random direction, near band
        let mut ctl = EvasionController::new(
            Tuning::default(),
            ScriptedRandom::new(vec![0.9, 0.9, 0.0, 0.9, 0.5, 0.5]),
        );

        // Last pointer directly below the button: hover should push it up
        let center = stage.decline_rect().expect("decline").center();
        ctl.track_pointer(center + Vec2::new(0.0, 50.0));
        let before = stage.decline_rect().expect("decline");

        let out = ctl.hover(&mut stage, None, true, 0.0).expect("flee");
        let after = stage.decline_rect().expect("decline");
        assert!(out.forced);
        assert!(after.top() < before.top());
        assert_eq!(after.left(), before.left());
    }

    #[test]
    fn test_escalation_sequence() {
        let mut stage = HeadlessStage::with_default_screens();
        let mut ctl = controller();
        let taunts = ctl.tuning().taunts.clone();

        assert_eq!(stage.accept_scale(), Vec2::ONE);
        for n in 1..=25u32 {
            let esc = ctl.register_flee(&mut stage);
            assert_eq!(esc.attempts, n);
            assert_eq!(stage.decline_label(), taunts[(n as usize - 1) % taunts.len()]);
            assert_eq!(stage.accept_scale(), esc.accept_scale);
        }
        assert_eq!(stage.decline_label(), taunts[0]);
        assert!((stage.accept_scale().x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_missing_elements_are_noops() {
        let removals: [(&str, fn(&mut HeadlessStage)); 3] = [
            ("container", HeadlessStage::remove_container),
            ("accept", HeadlessStage::remove_accept),
            ("decline", HeadlessStage::remove_decline),
        ];
        for (name, remove) in removals {
            let mut stage = HeadlessStage::with_default_screens();
            let pointer = near_decline(&stage, 10.0);
            remove(&mut stage);
            let decline_before = stage.decline_rect();
            let mut ctl = controller();

            for kind in [PointerKind::Mouse, PointerKind::Touch] {
                let out = ctl.evaluate_proximity(&mut stage, pointer, kind, true, 0.0);
                assert!(out.is_none(), "{name} missing: {kind:?} proximity fled");
            }
            assert!(ctl.hover(&mut stage, Some(pointer), true, 0.0).is_none(), "{name}");
            assert!(ctl.hover(&mut stage, None, true, 0.0).is_none(), "{name}");
            assert!(ctl.touch_start(&mut stage, pointer, true, 0.0).is_none(), "{name}");
            assert!(ctl.click(&mut stage, true, 0.0).is_none(), "{name}");
            assert!(ctl.place_initially(&mut stage).is_none(), "{name}");

            assert_eq!(ctl.attempts(), 0, "{name}");
            assert_eq!(stage.accept_scale(), Vec2::ONE, "{name}");
            assert_eq!(stage.decline_label(), DEFAULT_DECLINE_LABEL, "{name}");
            assert_eq!(stage.decline_rect(), decline_before, "{name}");
        }
    }

    #[test]
    fn test_flee_stays_clear_of_grown_accept() {
        let mut stage = HeadlessStage::with_default_screens();
        let mut ctl = controller();

        for i in 0..200 {
            let p = near_decline(&stage, 20.0);
            let out = ctl.hover(&mut stage, Some(p), true, i as f64).expect("flee");
            let container = stage.container_rect().expect("container");
            let decline = stage.decline_rect().expect("decline").relative_to(&container);
            let pad = ctl.tuning().flee_padding;
            assert!(decline.left() >= pad && decline.top() >= pad);
            assert!(decline.right() <= (container.size.x - pad).max(pad + decline.size.x));
            assert!(decline.bottom() <= (container.size.y - pad).max(pad + decline.size.y));
            if out.placement.tries < ctl.tuning().max_placement_attempts {
                assert!(!out.placement.overlaps_accept);
            }
        }
    }

    #[test]
    fn test_place_initially() {
        let mut stage = HeadlessStage::with_default_screens();
        let ctl = controller();
        let offset = ctl.place_initially(&mut stage).expect("placed");
        let container = stage.container_rect().expect("container");
        assert_eq!(stage.decline_rect().expect("decline").origin, container.origin + offset);
    }
}
