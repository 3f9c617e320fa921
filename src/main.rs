//! Neon Drift entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use neon_drift::consts::SIM_DT;
    use neon_drift::economy::{GarageCursor, GarageOutcome, NeonCatalog};
    use neon_drift::game::{Game, Intent};
    use neon_drift::layout::DEFAULT_VIEWPORT;
    use neon_drift::platform::LocalStorage;
    use neon_drift::renderer::{CanvasPresenter, GarageTap, ScreenTap, garage_tap, screen_tap};
    use neon_drift::sim::RunState;
    use neon_drift::{Layout, Tuning};

    /// Minimum horizontal swipe, in pixels, that counts as a lane change
    const SWIPE_THRESHOLD: f32 = 30.0;

    /// Browser-side state around the game instance
    struct App {
        game: Game<LocalStorage, NeonCatalog>,
        presenter: CanvasPresenter,
        canvas: HtmlCanvasElement,
        /// Open garage screen, if any
        garage: Option<GarageCursor>,
        last_time: f64,
        touch_start_x: f32,
    }

    type Shared = Rc<RefCell<App>>;

    impl App {
        fn layout(&self) -> Layout {
            self.game.state().layout
        }

        /// Pointer position in layout pixels
        fn local_pos(&self, client_x: i32, client_y: i32) -> (f32, f32) {
            let rect = self.canvas.get_bounding_client_rect();
            (
                client_x as f32 - rect.left() as f32,
                client_y as f32 - rect.top() as f32,
            )
        }

        fn resize_to_window(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let width = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0) as f32;
            let height = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0) as f32;
            self.game.resize(width, height);
            let layout = self.layout();
            self.presenter
                .resize(layout.width, layout.height, window.device_pixel_ratio());
        }

        /// A tap or click at layout coordinates
        fn tap(&mut self, x: f32, y: f32) {
            let layout = self.layout();
            if let Some(mut cursor) = self.garage {
                match garage_tap(&layout, x, y) {
                    Some(GarageTap::Back) => {
                        self.garage = None;
                        return;
                    }
                    Some(GarageTap::Tab(tab)) => cursor.set_tab(tab),
                    Some(GarageTap::Prev) => cursor.step(-1, self.game.economy().catalog()),
                    Some(GarageTap::Next) => cursor.step(1, self.game.economy().catalog()),
                    Some(GarageTap::Action) => self.garage_action(cursor),
                    None => {}
                }
                self.garage = Some(cursor);
                return;
            }

            match screen_tap(self.game.phase(), &layout, x, y) {
                Some(ScreenTap::OpenGarage) => self.garage = Some(GarageCursor::default()),
                Some(ScreenTap::Intent(intent)) => self.game.push_intent(intent),
                None => {}
            }
        }

        fn garage_action(&mut self, cursor: GarageCursor) {
            match cursor.activate(self.game.economy_mut()) {
                GarageOutcome::Purchased => log::info!("Purchased item {}", cursor.index),
                GarageOutcome::Selected => log::debug!("Selected item {}", cursor.index),
                GarageOutcome::Rejected => log::debug!("Garage action rejected"),
            }
        }

        fn key(&mut self, event: &KeyboardEvent) {
            let key = event.key();

            if let Some(mut cursor) = self.garage {
                match key.as_str() {
                    "Escape" => {
                        self.garage = None;
                        return;
                    }
                    "ArrowLeft" => cursor.step(-1, self.game.economy().catalog()),
                    "ArrowRight" => cursor.step(1, self.game.economy().catalog()),
                    "Enter" => self.garage_action(cursor),
                    "Tab" => {
                        event.prevent_default();
                        cursor.toggle_tab();
                    }
                    _ => {}
                }
                self.garage = Some(cursor);
                return;
            }

            match key.as_str() {
                "ArrowLeft" | "a" => self.game.push_intent(Intent::MoveLeft),
                "ArrowRight" | "d" => self.game.push_intent(Intent::MoveRight),
                " " | "Enter" => self.game.push_intent(Intent::PrimaryAction),
                "Escape" | "p" => self.game.push_intent(Intent::PauseToggle),
                "g" if self.game.phase() == RunState::Menu => {
                    self.garage = Some(GarageCursor::default());
                }
                "i" | "I" => {
                    let idle = !self.game.idle_mode();
                    self.game.set_idle_mode(idle);
                    log::info!("Idle mode: {}", idle);
                }
                _ => {}
            }
        }

        fn auto_pause(&mut self, reason: &str) {
            if self.game.phase() == RunState::Playing {
                self.game.push_intent(Intent::PauseToggle);
                log::info!("Auto-paused ({})", reason);
            }
        }

        fn frame(&mut self, time: f64) {
            // Calculate delta time
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            self.game.update(dt);
            let now = neon_drift::platform::now_ms();
            if let Err(e) = self
                .game
                .render(&mut self.presenter, now, self.garage.as_ref())
            {
                log::warn!("Render error: {:?}", e);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Neon Drift starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let (width, height) = DEFAULT_VIEWPORT;
        let game = Game::new(
            Tuning::default(),
            width,
            height,
            LocalStorage,
            NeonCatalog::new(),
            seed,
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let presenter = CanvasPresenter::new(canvas.clone())?;

        let app = Rc::new(RefCell::new(App {
            game,
            presenter,
            canvas: canvas.clone(),
            garage: None,
            last_time: 0.0,
            touch_start_x: 0.0,
        }));
        app.borrow_mut().resize_to_window();

        setup_input_handlers(&window, &canvas, app.clone())?;
        setup_auto_pause(&window, &document, app.clone())?;

        // Start game loop
        request_animation_frame(app);

        log::info!("Neon Drift running!");
        Ok(())
    }

    fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
        target: &web_sys::EventTarget,
        event: &str,
        handler: impl FnMut(E) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        app: Shared,
    ) -> Result<(), JsValue> {
        // Keyboard
        {
            let app = app.clone();
            listen(window, "keydown", move |event: KeyboardEvent| {
                app.borrow_mut().key(&event);
            })?;
        }

        // Touch start: taps on menus, swipe origin while playing
        {
            let app = app.clone();
            listen(canvas, "touchstart", move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    let (x, y) = a.local_pos(touch.client_x(), touch.client_y());
                    a.touch_start_x = x;
                    if a.garage.is_some() || a.game.phase() != RunState::Playing {
                        a.tap(x, y);
                    }
                }
            })?;
        }

        // Touch end: horizontal swipe changes lane
        {
            let app = app.clone();
            listen(canvas, "touchend", move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.changed_touches().get(0) {
                    let mut a = app.borrow_mut();
                    if a.garage.is_some() || a.game.phase() != RunState::Playing {
                        return;
                    }
                    let (x, _) = a.local_pos(touch.client_x(), touch.client_y());
                    let diff = x - a.touch_start_x;
                    if diff.abs() > SWIPE_THRESHOLD {
                        let intent = if diff < 0.0 {
                            Intent::MoveLeft
                        } else {
                            Intent::MoveRight
                        };
                        a.game.push_intent(intent);
                    }
                }
            })?;
        }

        // Mouse click (desktop)
        {
            let app = app.clone();
            listen(canvas, "click", move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let (x, y) = a.local_pos(event.client_x(), event.client_y());
                a.tap(x, y);
            })?;
        }

        // Viewport changes
        listen(window, "resize", move |_event: web_sys::Event| {
            app.borrow_mut().resize_to_window();
        })?;

        Ok(())
    }

    fn setup_auto_pause(
        window: &web_sys::Window,
        document: &web_sys::Document,
        app: Shared,
    ) -> Result<(), JsValue> {
        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            listen(document, "visibilitychange", move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().auto_pause("tab hidden");
                }
            })?;
        }

        // Window blur (click outside)
        listen(window, "blur", move |_event: web_sys::FocusEvent| {
            app.borrow_mut().auto_pause("window blur");
        })
    }

    fn request_animation_frame(app: Shared) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            app.borrow_mut().frame(time);
            request_animation_frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Neon Drift failed to start: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

/// Ticks simulated by the headless demo when no count is given (one minute)
#[cfg(not(target_arch = "wasm32"))]
const DEMO_TICKS: u64 = 3600;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Neon Drift (native) starting...");
    log::info!("Native mode runs a headless autopilot demo, use `trunk serve` for the web build");

    if let Err(e) = run_headless() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Usage: `neon-drift [tuning.json] [ticks]`
#[cfg(not(target_arch = "wasm32"))]
fn run_headless() -> Result<(), Box<dyn std::error::Error>> {
    use neon_drift::Tuning;
    use neon_drift::economy::NeonCatalog;
    use neon_drift::game::{Game, Intent};
    use neon_drift::layout::DEFAULT_VIEWPORT;
    use neon_drift::persistence::MemoryStore;
    use neon_drift::sim::RunState;

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => {
            log::info!("Loading tuning from {}", path);
            Tuning::from_json(&std::fs::read_to_string(path)?)?
        }
        None => Tuning::default(),
    };
    let ticks = match args.next() {
        Some(n) => n.parse::<u64>()?,
        None => DEMO_TICKS,
    };

    let seed = neon_drift::platform::now_ms() as u64;
    let (width, height) = DEFAULT_VIEWPORT;
    let catalog = NeonCatalog::new();
    let mut game = Game::new(tuning, width, height, MemoryStore::new(), catalog, seed)?;
    game.set_idle_mode(true);

    let mut runs = 0u32;
    for _ in 0..ticks {
        let before = game.phase();
        game.step();
        if game.phase() == RunState::GameOver && before != RunState::GameOver {
            runs += 1;
            if let Some(run) = game.last_run() {
                log::info!(
                    "Run {} over: score {}, +{} coins",
                    runs,
                    run.score,
                    run.coins_earned
                );
            }
            // Back to the menu, where idle mode starts the next run
            game.push_intent(Intent::PrimaryAction);
        }
    }

    let economy = game.economy().economy();
    log::info!(
        "Demo finished after {} ticks: {} runs, best {}, balance {}",
        ticks,
        runs,
        economy.best_score,
        economy.balance
    );
    if game.phase() == RunState::Playing {
        log::info!("Current run score: {}", game.state().floored_score());
    }
    Ok(())
}
