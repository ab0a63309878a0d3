//! DOM stage
//!
//! Binds the flow to the page markup:
//! - screens: `.screen[data-screen=...]`, toggled with the `active` class
//! - overlay: `#celebrate`, toggled with `show` / `hidden`
//! - buttons: `#yesBtn` and `#noBtn`; the No button's parent is the container

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Document, DomRect, Element, HtmlElement, Window};

use crate::evasion::{ButtonHost, scale_transform};
use crate::flow::{CelebrationPhase, Stage};
use crate::geometry::Rect;
use crate::nav::ScreenHost;

/// Fallback when the viewport width cannot be read
const DEFAULT_VIEWPORT_WIDTH: f32 = 1024.0;

fn to_rect(r: DomRect) -> Rect {
    Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32)
}

fn html_element_by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    let el = document.get_element_by_id(id);
    if el.is_none() {
        log::warn!("#{} not found, related behaviour disabled", id);
    }
    el?.dyn_into::<HtmlElement>().ok()
}

/// The page, as seen by the flow
pub struct DomStage {
    window: Window,
    screens: Vec<(String, Element)>,
    celebrate: Option<Element>,
    container: Option<HtmlElement>,
    accept: Option<HtmlElement>,
    decline: Option<HtmlElement>,
}

impl DomStage {
    /// Collect the elements the flow drives. Missing elements are logged and
    /// left out; the matching behaviour becomes a no-op.
    pub fn from_document(window: &Window, document: &Document) -> Self {
        let mut screens = Vec::new();
        if let Ok(list) = document.query_selector_all(".screen") {
            for i in 0..list.length() {
                let Some(el) = list.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                match el.get_attribute("data-screen") {
                    Some(id) => screens.push((id, el)),
                    None => log::warn!("Screen element without data-screen ignored"),
                }
            }
        }
        log::info!("Found {} screens", screens.len());

        let celebrate = document.get_element_by_id("celebrate");
        if celebrate.is_none() {
            log::warn!("#celebrate not found, overlay disabled");
        }

        let accept = html_element_by_id(document, "yesBtn");
        let decline = html_element_by_id(document, "noBtn");
        let container = decline
            .as_ref()
            .and_then(|d| d.parent_element())
            .and_then(|p| p.dyn_into::<HtmlElement>().ok());

        Self {
            window: window.clone(),
            screens,
            celebrate,
            container,
            accept,
            decline,
        }
    }

    pub fn container_element(&self) -> Option<&HtmlElement> {
        self.container.as_ref()
    }

    pub fn accept_element(&self) -> Option<&HtmlElement> {
        self.accept.as_ref()
    }

    pub fn decline_element(&self) -> Option<&HtmlElement> {
        self.decline.as_ref()
    }

    fn screen(&self, id: &str) -> Option<&Element> {
        self.screens.iter().find(|(s, _)| s == id).map(|(_, el)| el)
    }
}

impl ScreenHost for DomStage {
    fn has_screen(&self, id: &str) -> bool {
        self.screen(id).is_some()
    }

    fn set_screen_active(&mut self, id: &str, active: bool) {
        if let Some(el) = self.screen(id) {
            let classes = el.class_list();
            let _ = if active {
                classes.add_1("active")
            } else {
                classes.remove_1("active")
            };
        }
    }
}

impl ButtonHost for DomStage {
    fn container_rect(&self) -> Option<Rect> {
        self.container
            .as_ref()
            .map(|el| to_rect(el.get_bounding_client_rect()))
    }

    fn accept_rect(&self) -> Option<Rect> {
        self.accept
            .as_ref()
            .map(|el| to_rect(el.get_bounding_client_rect()))
    }

    fn decline_rect(&self) -> Option<Rect> {
        self.decline
            .as_ref()
            .map(|el| to_rect(el.get_bounding_client_rect()))
    }

    fn viewport_width(&self) -> f32 {
        self.window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .map(|w| w as f32)
            .unwrap_or(DEFAULT_VIEWPORT_WIDTH)
    }

    fn place_decline(&mut self, offset: Vec2) {
        if let Some(el) = &self.decline {
            let style = el.style();
            let _ = style.set_property("left", &format!("{}px", offset.x));
            let _ = style.set_property("top", &format!("{}px", offset.y));
        }
    }

    fn scale_accept(&mut self, scale: Vec2) {
        if let Some(el) = &self.accept {
            let transform = scale_transform(scale);
            let style = el.style();
            let _ = style.set_property_with_priority("transform", &transform, "important");
            let _ = style.set_property_with_priority("-webkit-transform", &transform, "important");
        }
    }

    fn set_decline_label(&mut self, label: &str) {
        if let Some(el) = &self.decline {
            el.set_text_content(Some(label));
        }
    }
}

impl Stage for DomStage {
    fn set_celebration(&mut self, phase: CelebrationPhase) {
        let Some(el) = &self.celebrate else {
            return;
        };
        let classes = el.class_list();
        let _ = match phase {
            CelebrationPhase::Shown => classes
                .remove_1("hidden")
                .and_then(|_| classes.add_1("show")),
            CelebrationPhase::Fading => classes.remove_1("show"),
            CelebrationPhase::Hidden => classes
                .remove_1("show")
                .and_then(|_| classes.add_1("hidden")),
        };
    }
}
