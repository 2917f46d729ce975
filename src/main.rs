//! Dig Deep entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent};

    use dig_deep::consts::*;
    use dig_deep::renderer::RenderState;
    use dig_deep::{Camera, Game, Settings, SettingsControl};

    /// Browser shell holding all state
    struct App {
        game: Game,
        settings: Settings,
        camera: Camera,
        render_state: Option<RenderState>,
        last_time: f64,
        /// CSS pixel size of the canvas (click coordinates use these)
        client_size: (f32, f32),
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                game: Game::new(seed),
                settings,
                camera: Camera::default(),
                render_state: None,
                last_time: 0.0,
                client_size: (1.0, 1.0),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn set_client_size(&mut self, w: f32, h: f32) {
            self.client_size = (w, h);
            self.camera.set_viewport(w, h);
        }

        /// Turn a click at canvas-relative CSS pixels into a queued dig
        fn click_at(&mut self, x: f32, y: f32) {
            let (w, h) = self.client_size;
            let ray = self.camera.screen_ray(x, y, w, h);
            self.game.click(ray);
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            self.game.update(dt);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.game.scene, &self.settings, &self.camera) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let score = &self.game.score;

            set_text(document, "#hud-gold .hud-value", &score.gold.to_string());
            set_text(document, "#hud-digs .hud-value", &score.digs.to_string());
            set_text(
                document,
                "#hud-blocks .hud-value",
                &self.game.blocks_remaining().to_string(),
            );

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    set_text(document, "#hud-fps .hud-value", &self.fps.to_string());
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            // Combo only shows once there is a streak
            if let Some(el) = document.get_element_by_id("hud-combo") {
                if score.combo > 1 {
                    let new_text = score.combo.to_string();
                    let old_text = document
                        .query_selector("#hud-combo .hud-value")
                        .ok()
                        .flatten()
                        .and_then(|v| v.text_content())
                        .unwrap_or_default();
                    if old_text != new_text {
                        set_text(document, "#hud-combo .hud-value", &new_text);
                        // Trigger pop animation
                        let _ = el.set_attribute("class", "hud-item pop");
                    } else {
                        let _ = el.set_attribute("class", "hud-item");
                    }
                    set_text(
                        document,
                        "#hud-combo .bonus",
                        &format!("+{} next", score.next_bonus()),
                    );
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    /// Size the canvas backing store to its CSS size times the pixel ratio
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32, f32, f32) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height, client_w as f32, client_h as f32)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Dig Deep starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = match document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("No #canvas element");
                return;
            }
        };

        let (width, height, client_w, client_h) = fit_canvas(&window, &canvas);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed, Settings::load())));
        app.borrow_mut().set_client_size(client_w, client_h);

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => {
                // The device may have shrunk the backing store to fit its limits
                canvas.set_width(render_state.size.0);
                canvas.set_height(render_state.size.1);
                app.borrow_mut().render_state = Some(render_state);
            }
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        setup_input_handlers(&canvas, app.clone());
        setup_resize_handler(canvas.clone(), app.clone());
        setup_restart_button(&document, app.clone());
        setup_settings_controls(&document, app.clone());

        // Show HUD
        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(app);

        log::info!("Dig Deep running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Click digs (or collects) whatever is under the pointer
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            event.stop_propagation();
            app.borrow_mut()
                .click_at(event.offset_x() as f32, event.offset_y() as f32);
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize_handler(canvas: HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height, client_w, client_h) = fit_canvas(&window, &canvas);
            let mut a = app.borrow_mut();
            a.set_client_size(client_w, client_h);
            if let Some(ref mut render_state) = a.render_state {
                render_state.resize(width, height);
                canvas.set_width(render_state.size.0);
                canvas.set_height(render_state.size.1);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(document: &Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                app.borrow_mut().game.restart(seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// One button per option; every change is written back to LocalStorage
    fn setup_settings_controls(document: &Document, app: Rc<RefCell<App>>) {
        for control in SettingsControl::ALL {
            let Some(btn) = document.get_element_by_id(control.element_id()) else {
                continue;
            };
            btn.set_text_content(Some(&app.borrow().settings.label(control)));

            let app = app.clone();
            let target = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.stop_propagation();
                let mut a = app.borrow_mut();
                a.settings.adjust(control);
                a.settings.save();
                target.set_text_content(Some(&a.settings.label(control)));
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt, time);
            a.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                a.update_hud(&document);
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dig Deep (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    dig_column_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Dig straight down the centre column with synthetic clicks, grabbing any
/// gold on the way, and report the score
#[cfg(not(target_arch = "wasm32"))]
fn dig_column_demo() {
    use dig_deep::Game;

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);
    let mut game = Game::new(seed);
    game.dig_column(0.0, 0.0);

    log::info!(
        "Demo finished after {:.1}s: {} digs, {} gold, {} blocks left",
        dig_deep::ticks_to_secs(game.scene.time_ticks),
        game.score.digs,
        game.score.gold,
        game.blocks_remaining()
    );
    println!(
        "seed {}: digs={} gold={} blocks_left={}",
        seed,
        game.score.digs,
        game.score.gold,
        game.blocks_remaining()
    );
}
