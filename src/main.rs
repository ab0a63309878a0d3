//! Valentine Flow entry point
//!
//! In the browser: wires DOM events into the flow and drives its timers.
//! Natively: plays a scripted session against the in-memory stage.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_flow {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, MouseEvent, TouchEvent};

    use valentine_flow::platform::DomStage;
    use valentine_flow::{Flow, FlowEvent, Tuning};

    /// Page instance holding all state
    struct App {
        flow: Flow<Pcg32>,
        stage: DomStage,
        /// Deadline a `setTimeout` is already armed for
        armed_deadline: Option<f64>,
    }

    type Shared = Rc<RefCell<App>>;

    /// Feed one event to the flow, then make sure its timers are armed
    fn dispatch(app: &Shared, event: FlowEvent) {
        let now = js_sys::Date::now();
        let entered_evasion = {
            let mut a = app.borrow_mut();
            let App { flow, stage, .. } = &mut *a;
            let was_active = flow.evasion_active();
            flow.handle(stage, event, now);
            !was_active && flow.evasion_active()
        };
        after_change(app, entered_evasion);
    }

    /// Run due timer tasks
    fn on_timer(app: &Shared) {
        let now = js_sys::Date::now();
        let entered_evasion = {
            let mut a = app.borrow_mut();
            a.armed_deadline = None;
            let App { flow, stage, .. } = &mut *a;
            let was_active = flow.evasion_active();
            flow.tick(stage, now);
            !was_active && flow.evasion_active()
        };
        after_change(app, entered_evasion);
    }

    fn after_change(app: &Shared, entered_evasion: bool) {
        // The Yes/No screen was hidden until now, so its layout is fresh
        if entered_evasion {
            request_layout_pass(app.clone());
        }
        arm_timer(app);
    }

    /// Arm a `setTimeout` for the flow's next deadline, if any
    fn arm_timer(app: &Shared) {
        let Some(deadline) = app.borrow().flow.next_deadline() else {
            return;
        };
        if app.borrow().armed_deadline == Some(deadline) {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };

        let delay = (deadline - js_sys::Date::now()).max(0.0).ceil() as i32;
        let app_clone = app.clone();
        let closure = Closure::once(move || on_timer(&app_clone));
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay,
        ) {
            Ok(_) => app.borrow_mut().armed_deadline = Some(deadline),
            Err(e) => log::error!("setTimeout failed: {:?}", e),
        }
        closure.forget();
    }

    /// Place the No button once layout has settled
    fn request_layout_pass(app: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            dispatch(&app, FlowEvent::LayoutReady);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn client_pos(x: i32, y: i32) -> Vec2 {
        Vec2::new(x as f32, y as f32)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Valentine Flow starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let tuning = Tuning::load();
        let seed = js_sys::Date::now() as u64;
        let mut stage = DomStage::from_document(&window, &document);
        let mut flow = Flow::new(tuning, Pcg32::seed_from_u64(seed));
        flow.start(&mut stage);
        log::info!("Flow initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            flow,
            stage,
            armed_deadline: None,
        }));

        setup_navigation(&document, app.clone())?;
        setup_evasion(app.clone())?;
        setup_teardown(&window, app.clone())?;

        request_layout_pass(app);

        log::info!("Valentine Flow running!");
        Ok(())
    }

    /// Start button, quiz options
    fn setup_navigation(document: &web_sys::Document, app: Shared) -> Result<(), JsValue> {
        let bindings = [
            ("[data-next]", FlowEvent::NextClicked),
            (".options .option", FlowEvent::OptionClicked),
        ];
        for (selector, event) in bindings {
            let list = document.query_selector_all(selector)?;
            for i in 0..list.length() {
                let Some(el) = list.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    dispatch(&app, event);
                });
                el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
                closure.forget();
            }
        }
        Ok(())
    }

    /// Yes/No buttons and the container around them
    fn setup_evasion(app: Shared) -> Result<(), JsValue> {
        let (container, accept, decline) = {
            let a = app.borrow();
            (
                a.stage.container_element().cloned(),
                a.stage.accept_element().cloned(),
                a.stage.decline_element().cloned(),
            )
        };
        let (Some(container), Some(accept), Some(decline)) = (container, accept, decline) else {
            log::warn!("Yes/No widget incomplete, evasion disabled");
            return Ok(());
        };

        // Desktop: flee when the pointer gets close
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = client_pos(event.client_x(), event.client_y());
                dispatch(&app, FlowEvent::PointerMoved(pos));
            });
            container
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Direct hover: jump immediately
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = client_pos(event.client_x(), event.client_y());
                dispatch(&app, FlowEvent::DeclineHovered(Some(pos)));
            });
            decline
                .add_event_listener_with_callback("mouseenter", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mobile: run away from a tap
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let pos = client_pos(touch.client_x(), touch.client_y());
                    dispatch(&app, FlowEvent::DeclineTouched(pos));
                }
            });
            decline
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mobile: flee from a finger dragging closer
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if !app.borrow().flow.evasion_active() {
                    return;
                }
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                event.prevent_default();
                let pos = client_pos(touch.client_x(), touch.client_y());
                dispatch(&app, FlowEvent::TouchMoved(pos));
            });
            container
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // In case a click gets through anyway
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
                dispatch(&app, FlowEvent::DeclineClicked);
            });
            decline.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Yes goes straight to the final screen
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                dispatch(&app, FlowEvent::AcceptClicked);
            });
            accept.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Drop pending timers when the page goes away
    fn setup_teardown(window: &web_sys::Window, app: Shared) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().flow.shutdown();
        });
        window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_flow::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Valentine Flow (native) starting...");
    log::info!("The page itself needs a browser - run with `trunk serve` for the web version");

    println!("\nPlaying a scripted session...");
    scripted_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Walk the whole flow headlessly: start, answer every question, chase the
/// No button for a while, then say Yes
#[cfg(not(target_arch = "wasm32"))]
fn scripted_session() {
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use valentine_flow::evasion::ButtonHost;
    use valentine_flow::platform::HeadlessStage;
    use valentine_flow::{Flow, FlowEvent, Tuning};

    let mut stage = HeadlessStage::with_default_screens();
    let mut flow = Flow::new(Tuning::load(), Pcg32::seed_from_u64(2024));
    flow.start(&mut stage);

    let mut now = 0.0;
    flow.handle(&mut stage, FlowEvent::NextClicked, now);
    for _ in 0..flow.navigator().order().len() {
        if flow.evasion_active() {
            break;
        }
        flow.handle(&mut stage, FlowEvent::OptionClicked, now);
        while let Some(deadline) = flow.next_deadline() {
            now = deadline;
            flow.tick(&mut stage, now);
        }
        println!("  answered -> {}", flow.navigator().current());
    }
    flow.handle(&mut stage, FlowEvent::LayoutReady, now);

    for _ in 0..12 {
        now += 500.0;
        let Some(decline) = stage.decline_rect() else {
            break;
        };
        let pointer = decline.center() + Vec2::new(-15.0, 5.0);
        if let Some(out) = flow.handle(&mut stage, FlowEvent::PointerMoved(pointer), now) {
            println!(
                "  No fled to ({:.0}, {:.0}): \"{}\", Yes at {:.2}x",
                out.placement.offset.x,
                out.placement.offset.y,
                stage.decline_label(),
                out.escalation.accept_scale.x
            );
        }
    }

    flow.handle(&mut stage, FlowEvent::AcceptClicked, now);
    println!(
        "✓ Reached '{}' after {} No attempts",
        flow.navigator().current(),
        flow.evasion().attempts()
    );
}
