//! In-memory stage
//!
//! Stands in for the page when running natively and in tests. Screens are
//! flags, elements are rectangles, and writes update the rectangles the way
//! the browser's layout would (the Yes button scales about its centre).

use glam::Vec2;

use crate::consts::SCREEN_ORDER;
use crate::evasion::ButtonHost;
use crate::flow::{CelebrationPhase, Stage};
use crate::geometry::Rect;
use crate::nav::ScreenHost;

/// Default decline label before any attempt
pub const DEFAULT_DECLINE_LABEL: &str = "No";

#[derive(Debug, Clone)]
pub struct HeadlessStage {
    screens: Vec<(String, bool)>,
    celebration_log: Vec<CelebrationPhase>,
    viewport_width: f32,
    container: Option<Rect>,
    accept: Option<Rect>,
    accept_scale: Vec2,
    decline: Option<Rect>,
    decline_label: String,
}

impl HeadlessStage {
    /// Stage with the given screens, all inactive, and a desktop-sized
    /// Yes/No container
    pub fn new(screens: &[&str]) -> Self {
        Self {
            screens: screens.iter().map(|s| (s.to_string(), false)).collect(),
            celebration_log: Vec::new(),
            viewport_width: 1280.0,
            container: Some(Rect::new(140.0, 100.0, 1000.0, 600.0)),
            accept: Some(Rect::new(440.0, 500.0, 140.0, 56.0)),
            accept_scale: Vec2::ONE,
            decline: Some(Rect::new(740.0, 400.0, 110.0, 44.0)),
            decline_label: DEFAULT_DECLINE_LABEL.to_string(),
        }
    }

    pub fn with_default_screens() -> Self {
        Self::new(&SCREEN_ORDER)
    }

    /// Replace the widget layout (client coordinates)
    pub fn set_layout(&mut self, container: Rect, accept: Rect, decline: Rect) {
        self.container = Some(container);
        self.accept = Some(accept);
        self.decline = Some(decline);
    }

    pub fn set_viewport_width(&mut self, width: f32) {
        self.viewport_width = width;
    }

    pub fn remove_screen(&mut self, id: &str) {
        self.screens.retain(|(s, _)| s != id);
    }

    pub fn remove_decline(&mut self) {
        self.decline = None;
    }

    pub fn remove_container(&mut self) {
        self.container = None;
    }

    pub fn remove_accept(&mut self) {
        self.accept = None;
    }

    pub fn active_screens(&self) -> Vec<String> {
        self.screens
            .iter()
            .filter(|(_, active)| *active)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn is_screen_active(&self, id: &str) -> bool {
        self.screens.iter().any(|(s, active)| s == id && *active)
    }

    /// Current overlay phase
    pub fn celebration(&self) -> CelebrationPhase {
        self.celebration_log.last().copied().unwrap_or_default()
    }

    /// Every overlay phase written so far
    pub fn celebration_log(&self) -> &[CelebrationPhase] {
        &self.celebration_log
    }

    pub fn decline_label(&self) -> &str {
        &self.decline_label
    }

    pub fn accept_scale(&self) -> Vec2 {
        self.accept_scale
    }
}

impl ScreenHost for HeadlessStage {
    fn has_screen(&self, id: &str) -> bool {
        self.screens.iter().any(|(s, _)| s == id)
    }

    fn set_screen_active(&mut self, id: &str, active: bool) {
        if let Some(entry) = self.screens.iter_mut().find(|(s, _)| s == id) {
            entry.1 = active;
        }
    }
}

impl ButtonHost for HeadlessStage {
    fn container_rect(&self) -> Option<Rect> {
        self.container
    }

    fn accept_rect(&self) -> Option<Rect> {
        let base = self.accept?;
        let size = base.size * self.accept_scale;
        Some(Rect::from_origin_size(base.center() - size * 0.5, size))
    }

    fn decline_rect(&self) -> Option<Rect> {
        self.decline
    }

    fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    fn place_decline(&mut self, offset: Vec2) {
        if let (Some(container), Some(decline)) = (self.container, self.decline.as_mut()) {
            decline.origin = container.origin + offset;
        }
    }

    fn scale_accept(&mut self, scale: Vec2) {
        self.accept_scale = scale;
    }

    fn set_decline_label(&mut self, label: &str) {
        self.decline_label = label.to_string();
    }
}

impl Stage for HeadlessStage {
    fn set_celebration(&mut self, phase: CelebrationPhase) {
        self.celebration_log.push(phase);
    }
}
