//! Flee placement math
//!
//! All offsets are relative to the container's top-left corner, which is
//! what the decline button's `left`/`top` style expects.

use glam::Vec2;

use super::ButtonGeometry;
use crate::clamp_span;
use crate::random::RandomSource;
use crate::tuning::{JumpBands, Profile, Tuning};

/// Result of a placement search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// New offset inside the container
    pub offset: Vec2,
    /// Candidates evaluated (1..=max_placement_attempts)
    pub tries: u32,
    /// Whether the chosen offset still touches the Yes button's margin box
    pub overlaps_accept: bool,
}

/// Keep a button of `button` size inside `container`, `padding` from each edge.
/// When the button does not fit, it sticks to the top-left padding.
pub fn clamp_offset(candidate: Vec2, container: Vec2, button: Vec2, padding: f32) -> Vec2 {
    let max = container - button - Vec2::splat(padding);
    Vec2::new(
        clamp_span(candidate.x, padding, max.x),
        clamp_span(candidate.y, padding, max.y),
    )
}

/// Pick one of the three jump multiplier bands
pub fn jump_multiplier(rng: &mut impl RandomSource, bands: &JumpBands) -> f32 {
    if rng.chance(bands.far_chance) {
        bands.far
    } else if rng.chance(bands.medium_chance) {
        bands.medium
    } else {
        bands.near
    }
}

/// Unit vector from the pointer toward `center` (zero if they coincide)
pub fn away_from(pointer: Vec2, center: Vec2) -> Vec2 {
    (center - pointer).normalize_or_zero()
}

/// Uniformly scattered unit vector
pub fn random_direction(rng: &mut impl RandomSource) -> Vec2 {
    Vec2::new(rng.centered() * 2.0, rng.centered() * 2.0).normalize_or_zero()
}

/// Does a decline button at `offset` touch the Yes button's margin box?
pub fn overlaps_accept(geom: &ButtonGeometry, offset: Vec2, margin: f32) -> bool {
    let decline = crate::Rect::from_origin_size(offset, geom.decline.size);
    let accept = geom.accept.relative_to(&geom.container).expand(margin);
    decline.intersects(&accept)
}

/// Find where the decline button jumps to when fleeing from `pointer`
pub fn find_flee_offset(
    geom: &ButtonGeometry,
    pointer: Vec2,
    profile: &Profile,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
) -> Placement {
    let mut dir = away_from(pointer, geom.decline.center());

    let multiplier = jump_multiplier(rng, &tuning.jump_bands);
    let jump = (profile.base_jump + rng.unit() * profile.jump_variation) * multiplier;
    let jitter = profile.jitter * 1.5;

    if rng.chance(tuning.random_direction_chance) {
        dir = random_direction(rng);
    }

    let current = geom.decline.relative_to(&geom.container).origin;
    let max_tries = tuning.max_placement_attempts.max(1);

    let mut tries = 0;
    loop {
        tries += 1;
        let wobble = Vec2::new(rng.centered(), rng.centered()) * jitter;
        let offset = clamp_offset(
            current + dir * jump + wobble,
            geom.container.size,
            geom.decline.size,
            tuning.flee_padding,
        );
        let overlaps = overlaps_accept(geom, offset, tuning.accept_margin);

        if !overlaps || tries >= max_tries {
            return Placement {
                offset,
                tries,
                overlaps_accept: overlaps,
            };
        }

        // Steer a little and try again
        let steer = Vec2::new(rng.centered(), rng.centered()) * tuning.retry_steer;
        dir = (dir + steer).normalize_or_zero();
    }
}

/// Starting offset: preferred fraction of the container, or the fallback
/// fraction if the preferred spot touches the Yes button
pub fn initial_offset(geom: &ButtonGeometry, tuning: &Tuning) -> Vec2 {
    let size = geom.container.size;
    let preferred = Vec2::from(tuning.initial_offset) * size;

    let offset = if overlaps_accept(geom, preferred, tuning.accept_margin) {
        Vec2::from(tuning.fallback_offset) * size
    } else {
        preferred
    };

    clamp_offset(offset, size, geom.decline.size, tuning.place_padding)
}
