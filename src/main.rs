//! Lucid Drift entry point
//!
//! Runs the browser shell on wasm32 and a scripted headless run natively.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent};

    use lucid_drift::audio::MusicBed;
    use lucid_drift::music::{MusicDirector, StartAction};
    use lucid_drift::renderer::{self, RenderState};
    use lucid_drift::sim::{self, EnergyState, GameEvent, GameState, InputSampler, KeyCode};
    use lucid_drift::{Settings, clamp_frame_dt, hud};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputSampler,
        settings: Settings,
        music: MusicDirector,
        bed: Option<MusicBed>,
        render_state: Option<RenderState>,
        last_time: f64,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let music = MusicDirector::new(settings.crossfade_secs, settings.music_volume);
            Self {
                state: GameState::new(),
                input: InputSampler::new(),
                settings,
                music,
                bed: None,
                render_state: None,
                last_time: 0.0,
            }
        }

        /// Run one simulation step and forward its events
        fn update(&mut self, dt: f32) {
            sim::update(&mut self.state, &mut self.input, dt);
            self.handle_events();
        }

        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                if let GameEvent::Shifted(energy_state) = event {
                    self.crossfade(energy_state);
                }
            }
        }

        fn crossfade(&mut self, energy_state: EnergyState) {
            if let Some(plan) = self.music.crossfade_to(energy_state) {
                if let Some(bed) = &self.bed {
                    bed.apply(&plan);
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = renderer::build_frame(&self.state);
                let clear = renderer::clear_color(&self.state);
                match render_state.render(&self.state.bounds, &vertices, clear) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let set_text = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };

            set_text("energy-value", &hud::energy_text(&self.state));
            set_text("state-value", hud::state_label(&self.state));
            set_text("score-value", &hud::score_text(&self.state));
            set_text("status-value", &hud::status_text(&self.state));

            if let Some(fill) = document
                .get_element_by_id("energy-fill")
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                if let Err(err) = fill
                    .style()
                    .set_property("width", &hud::energy_fill_width(&self.state))
                {
                    log::warn!("Failed to size energy meter: {err:?}");
                }
            }

            // Show/hide game over
            if let Some(el) = document.get_element_by_id("game-over") {
                if let Some((title, hint)) = hud::game_over_text(&self.state) {
                    let _ = el.set_attribute("class", "");
                    set_text("game-over-title", title);
                    set_text("game-over-hint", hint);
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        /// Match the world to the canvas' CSS size and the surface to its pixels
        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let rect = canvas.get_bounding_client_rect();
            let dpr = window.device_pixel_ratio();
            let width = (rect.width() * dpr).round() as u32;
            let height = (rect.height() * dpr).round() as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            self.state.set_bounds(rect.width() as f32, rect.height() as f32);
            if let Some(render_state) = &mut self.render_state {
                render_state.resize(width, height);
            }
        }
    }

    /// Start the music bed on a user gesture (idempotent)
    fn start_music(game: &Rc<RefCell<Game>>) {
        let action = game.borrow_mut().music.start();
        match action {
            StartAction::Skip => {}
            StartAction::Resume => {
                if let Some(bed) = &game.borrow().bed {
                    bed.resume();
                }
            }
            StartAction::Load => {
                let (settings, director) = {
                    let g = game.borrow();
                    (g.settings.clone(), g.music.clone())
                };
                let game = game.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let loaded = MusicBed::load(&settings, &director).await;
                    let mut g = game.borrow_mut();
                    match loaded {
                        Ok(bed) => {
                            bed.resume();
                            if let Some(plan) = g.music.loaded() {
                                bed.apply(&plan);
                            }
                            g.bed = Some(bed);
                        }
                        Err(err) => {
                            log::warn!("Audio playback unavailable: {err}");
                            g.music.load_failed();
                        }
                    }
                });
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Lucid Drift starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Optional overrides: <canvas id="game" data-settings='{"music_volume": 0.5}'>
        let settings = match canvas.get_attribute("data-settings") {
            Some(json) => Settings::from_json(&json).unwrap_or_else(|err| {
                log::warn!("Ignoring data-settings: {err}");
                Settings::default()
            }),
            None => Settings::default(),
        };

        let game = Rc::new(RefCell::new(Game::new(settings)));
        game.borrow_mut().resize(&canvas);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (width, height) = (canvas.width(), canvas.height());
        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(err) => log::error!("Failed to create device: {err}"),
        }

        setup_input_handlers(game.clone());
        setup_resize(&canvas, game.clone());
        expose_set_energy_state(game.clone());

        game.borrow_mut().update_hud();
        request_animation_frame(game);

        log::info!("Lucid Drift running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down: first gesture also starts the music
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                start_music(&game);
                if let Some(code) = KeyCode::from_dom(&event.code()) {
                    game.borrow_mut().input.key_down(code, false);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(code) = KeyCode::from_dom(&event.code()) {
                    game.borrow_mut().input.key_up(code);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer down, once
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PointerEvent| {
                start_music(&game);
            });
            let options = web_sys::AddEventListenerOptions::new();
            options.set_once(true);
            let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
                "pointerdown",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }

        // Window blur: key-ups will not arrive
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// `window.setEnergyState("low" | "high")` for debugging from the console
    fn expose_set_energy_state(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(String)>::new(move |name: String| {
            match EnergyState::parse(&name) {
                Some(energy_state) => {
                    let mut g = game.borrow_mut();
                    g.state.set_energy_state(energy_state);
                    g.handle_events();
                    g.update_hud();
                }
                None => log::warn!("setEnergyState: unknown state {name:?}"),
            }
        });
        let _ = js_sys::Reflect::set(
            &window,
            &JsValue::from_str("setEnergyState"),
            closure.as_ref(),
        );
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // First frame steps by zero
            let raw_dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            let dt = clamp_frame_dt(raw_dt, g.settings.max_frame_dt);
            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
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
    log::info!("Lucid Drift (native) starting...");
    log::info!("Native mode runs a scripted headless session - use `trunk serve` to play");

    if let Err(err) = headless::run(std::env::args().nth(1).as_deref()) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;

    use lucid_drift::sim::{self, GameEvent, GameState, InputSampler, KeyCode};
    use lucid_drift::{Tuning, hud};

    const DT: f32 = 1.0 / 60.0;
    const DURATION: f32 = 30.0;

    /// Scripted key changes: (time in seconds, key, pressed)
    const SCRIPT: &[(f32, KeyCode, bool)] = &[
        (0.5, KeyCode::KeyD, true),
        (1.0, KeyCode::Space, true),
        (1.1, KeyCode::Space, false),
        (1.6, KeyCode::KeyD, false),
        (2.5, KeyCode::ShiftLeft, true),
        (2.6, KeyCode::ShiftLeft, false),
        (6.0, KeyCode::KeyA, true),
        (6.8, KeyCode::KeyA, false),
        (13.0, KeyCode::KeyD, true),
        (13.4, KeyCode::Space, true),
        (13.5, KeyCode::Space, false),
        (14.0, KeyCode::KeyD, false),
    ];

    /// Play the script, log events, and dump the final state as JSON.
    ///
    /// `tuning_path` optionally names a JSON tuning document.
    pub fn run(tuning_path: Option<&str>) -> Result<(), Box<dyn Error>> {
        let tuning = match tuning_path {
            Some(path) => {
                log::info!("Loading tuning from {path}");
                Tuning::from_json(&std::fs::read_to_string(path)?)?
            }
            None => Tuning::default(),
        };

        let mut state = GameState::with_tuning(tuning);
        let mut input = InputSampler::new();
        let mut script = SCRIPT.iter().peekable();
        let mut time = 0.0_f32;

        while time < DURATION && !state.is_game_over() {
            while let Some(&&(at, code, down)) = script.peek() {
                if at > time {
                    break;
                }
                if down {
                    input.key_down(code, false);
                } else {
                    input.key_up(code);
                }
                script.next();
            }

            sim::update(&mut state, &mut input, DT);
            time += DT;

            for event in state.drain_events() {
                match event {
                    GameEvent::Shifted(_) | GameEvent::Failed(_) | GameEvent::Reset => {
                        log::info!("[{time:6.2}s] {event:?} | {}", hud::status_text(&state));
                    }
                    _ => log::debug!("[{time:6.2}s] {event:?}"),
                }
            }
        }

        log::info!(
            "Finished after {time:.2}s: score {}, energy {}",
            hud::score_text(&state),
            hud::energy_text(&state)
        );
        println!("{}", serde_json::to_string_pretty(&state)?);
        Ok(())
    }
}
