//! Screen navigator
//!
//! Holds the ordered screen identifiers and the index of the active one.
//! The host owns the actual screen elements; the navigator only tells it
//! which one carries the active state.

use crate::consts::SCREEN_ORDER;

/// Host side of screen switching (DOM classes in the browser)
pub trait ScreenHost {
    /// Whether a screen element with this identifier exists
    fn has_screen(&self, id: &str) -> bool;
    /// Set or clear the active state on a screen element
    fn set_screen_active(&mut self, id: &str, active: bool);
}

/// Linear navigator over a fixed screen sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    order: Vec<String>,
    index: usize,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(SCREEN_ORDER.iter().map(|s| s.to_string()).collect())
    }
}

impl Navigator {
    /// Create a navigator positioned on the first screen. An empty order
    /// falls back to the default sequence.
    pub fn new(order: Vec<String>) -> Self {
        let order = if order.is_empty() {
            log::warn!("Navigator: empty screen order, using default");
            SCREEN_ORDER.iter().map(|s| s.to_string()).collect()
        } else {
            order
        };
        Self { order, index: 0 }
    }

    /// Sync the host with the navigator: the first screen the host has
    /// becomes active, every other known screen inactive
    pub fn start(&mut self, host: &mut impl ScreenHost) {
        let first = self.order.iter().position(|id| host.has_screen(id));
        self.index = first.unwrap_or(0);
        match first {
            Some(0) => {}
            Some(_) => log::warn!(
                "Screen '{}' not found, starting at '{}'",
                self.order[0],
                self.current()
            ),
            None => log::warn!("No known screens found, nothing to show"),
        }
        for (i, id) in self.order.iter().enumerate() {
            if host.has_screen(id) {
                host.set_screen_active(id, Some(i) == first);
            }
        }
        if first.is_some() {
            log::info!("Showing screen '{}'", self.current());
        }
    }

    /// Identifier of the active screen
    pub fn current(&self) -> &str {
        &self.order[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.order.len()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.current() == id
    }

    /// Move to the next screen. No-op at the last screen or if the next
    /// screen element is missing.
    pub fn advance(&mut self, host: &mut impl ScreenHost) -> bool {
        self.show_index(host, self.index + 1)
    }

    /// Activate a screen by identifier, bypassing the linear order.
    /// Unknown identifiers are ignored.
    pub fn jump_to(&mut self, host: &mut impl ScreenHost, id: &str) -> bool {
        match self.order.iter().position(|s| s == id) {
            Some(index) => self.show_index(host, index),
            None => {
                log::warn!("Navigator: no screen named '{}' in order", id);
                false
            }
        }
    }

    /// Deactivate the current screen and activate `order[index]`
    pub fn show_index(&mut self, host: &mut impl ScreenHost, index: usize) -> bool {
        let Some(next) = self.order.get(index) else {
            return false;
        };
        if !host.has_screen(next) {
            log::warn!("Navigator: screen '{}' missing from page", next);
            return false;
        }

        let current = &self.order[self.index];
        if host.has_screen(current) {
            host.set_screen_active(current, false);
        }
        host.set_screen_active(next, true);

        log::info!("Screen '{}' -> '{}'", current, next);
        self.index = index;
        true
    }
}
