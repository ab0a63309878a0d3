//! What changes each time the No button gets away
//!
//! The Yes button grows linearly with the attempt count and never stops
//! (1.04 x 1.013 after one attempt, 3.0 x 1.65 after fifty). The No label
//! cycles through the taunt list, wrapping so it never freezes.

use glam::Vec2;

use crate::tuning::Tuning;

/// Yes button scale after `attempts` failed No attempts
pub fn accept_scale(attempts: u32, tuning: &Tuning) -> Vec2 {
    let n = attempts as f32;
    Vec2::new(1.0 + n * tuning.growth_x, 1.0 + n * tuning.growth_y)
}

/// No label after `attempts` failed attempts; `None` means keep the page's
/// original label
pub fn taunt_for(attempts: u32, taunts: &[String]) -> Option<&str> {
    if attempts == 0 || taunts.is_empty() {
        return None;
    }
    let idx = (attempts as usize - 1) % taunts.len();
    Some(taunts[idx].as_str())
}

/// CSS transform for a Yes scale
pub fn scale_transform(scale: Vec2) -> String {
    format!("scaleX({}) scaleY({})", scale.x, scale.y)
}
