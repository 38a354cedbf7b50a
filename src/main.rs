//! Paintball Mayhem entry point
//!
//! The browser build wires DOM events, timers and the wgpu surface around the
//! simulation. The native build runs a headless autopilot session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent};

    use paintball_mayhem::assets::{SoundCue, UploadTracker, WebAssets};
    use paintball_mayhem::audio::AudioManager;
    use paintball_mayhem::consts::SIM_DT;
    use paintball_mayhem::input::{InputMapper, Key};
    use paintball_mayhem::renderer::{SpriteRenderState, compose_scene};
    use paintball_mayhem::sim::{
        Autopilot, GameEvent, GameState, ramp_difficulty, spawn_block, tick,
    };
    use paintball_mayhem::timestep::FixedTimestep;
    use paintball_mayhem::{GameError, HighScores, Settings, Tuning};

    const GRAPHICS_UNAVAILABLE: &str = "WebGL not supported. Try a different browser.";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        rng: Pcg32,
        input: InputMapper,
        autopilot: Option<Autopilot>,
        clock: FixedTimestep,
        last_time: f64,
        render_state: SpriteRenderState,
        assets: WebAssets,
        tracker: UploadTracker,
        audio: AudioManager,
        settings: Settings,
        high_scores: HighScores,
        score_label: HtmlElement,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            for _ in 0..self.clock.advance(dt) {
                // Drain the mapper every tick so a tap made under autopilot
                // doesn't fire later
                let player = self.input.next_tick_input();
                let input = match self.autopilot.as_mut() {
                    Some(pilot) => pilot.next_tick_input(&self.state),
                    None => player,
                };
                let events = tick(&mut self.state, &input, &mut self.rng);
                for event in &events {
                    self.handle_event(event);
                }
            }
        }

        fn handle_event(&mut self, event: &GameEvent) {
            self.audio.play(SoundCue::for_event(event));
            match *event {
                GameEvent::Fired { .. } => {}
                GameEvent::BlockDestroyed { score, .. } => self.set_score_label(score),
                GameEvent::GameOver { final_score, cause } => {
                    log::info!("Run over ({:?}), score {}", cause, final_score);
                    if let Some(rank) = self
                        .high_scores
                        .add_score(final_score, js_sys::Date::now())
                    {
                        log::info!("New high score, rank {}", rank);
                        self.high_scores.save();
                    }
                    let best = self.high_scores.top_score().unwrap_or(final_score);
                    notify_game_over(
                        final_score,
                        best,
                        self.state.tuning.game_over_notice_delay_ms,
                    );
                }
            }
        }

        fn set_score_label(&self, score: u32) {
            self.score_label
                .set_text_content(Some(&format!("Score: {}", score)));
        }

        /// Render the current frame
        fn render(&mut self) {
            self.render_state.sync_assets(&mut self.tracker, &self.assets);
            let sprites = compose_scene(&self.state);
            match self.render_state.render(&sprites, self.state.canvas) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Start a fresh run at the current canvas size
        fn restart(&mut self) {
            let tuning = self.state.tuning.clone();
            self.state = GameState::new(self.state.canvas.x, self.state.canvas.y, tuning);
            self.clock.reset();
            self.input.release_all();
            if let Some(pilot) = self.autopilot.as_mut() {
                *pilot = Autopilot::new();
            }
            self.set_score_label(0);
            log::info!("Game restarted");
        }

        fn on_key_down(&mut self, key_name: &str) {
            match self.input.key_down(key_name) {
                Some(Key::Restart) if self.state.is_game_over() => self.restart(),
                Some(Key::Autopilot) => {
                    self.autopilot = match self.autopilot {
                        Some(_) => None,
                        None => Some(Autopilot::new()),
                    };
                    self.settings.autopilot = self.autopilot.is_some();
                    self.settings.save();
                    log::info!("Autopilot: {}", self.settings.autopilot);
                }
                Some(Key::Mute) => {
                    self.settings.toggle_mute();
                    self.audio.apply_settings(&self.settings);
                    self.settings.save();
                    log::info!("Muted: {}", self.settings.muted);
                }
                _ => {}
            }
        }
    }

    fn window() -> Result<web_sys::Window, GameError> {
        web_sys::window().ok_or_else(|| GameError::Dom("no window".into()))
    }

    /// Window inner size in logical pixels
    fn viewport_size(window: &web_sys::Window) -> (u32, u32) {
        let dim = |v: Result<JsValue, JsValue>| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(1.0) as u32
        };
        (dim(window.inner_width()), dim(window.inner_height()))
    }

    fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    /// Show the final score after the last frame had a chance to paint
    fn notify_game_over(final_score: u32, best: u32, delay_ms: i32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let message = format!("Game Over! Final Score: {}\nBest: {}", final_score, best);
        let closure = Closure::once(move || alert(&message));
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms,
        );
        closure.forget();
    }

    fn create_score_label(document: &web_sys::Document) -> Result<HtmlElement, GameError> {
        let label: HtmlElement = document
            .create_element("div")
            .map_err(|e| GameError::Dom(format!("create score label: {:?}", e)))?
            .dyn_into()
            .map_err(|_| GameError::Dom("score label is not an HtmlElement".into()))?;

        let style = label.style();
        for (name, value) in [
            ("position", "absolute"),
            ("top", "10px"),
            ("right", "10px"),
            ("color", "black"),
            ("font-size", "40px"),
            ("font-family", "sans-serif"),
        ] {
            let _ = style.set_property(name, value);
        }
        label.set_text_content(Some("Score: 0"));

        let body = document
            .body()
            .ok_or_else(|| GameError::Dom("no body".into()))?;
        body.append_child(&label)
            .map_err(|e| GameError::Dom(format!("append score label: {:?}", e)))?;
        Ok(label)
    }

    pub async fn run() -> Result<(), GameError> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger init failed: {}", e).into());
        }

        log::info!("Paintball Mayhem starting...");

        let window = window()?;
        let document = window
            .document()
            .ok_or_else(|| GameError::Dom("no document".into()))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| GameError::Dom("no #canvas element".into()))?
            .dyn_into()
            .map_err(|_| GameError::Dom("#canvas is not a canvas".into()))?;

        let (width, height) = viewport_size(&window);
        canvas.set_width(width);
        canvas.set_height(height);

        let render_state = match init_graphics(&canvas, width, height).await {
            Ok(render_state) => render_state,
            Err(e) => {
                log::error!("{}", e);
                alert(GRAPHICS_UNAVAILABLE);
                return Err(e);
            }
        };

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(width as f32, height as f32, Tuning::default()),
            rng: Pcg32::seed_from_u64(seed),
            input: InputMapper::new(),
            autopilot: settings.autopilot.then(Autopilot::new),
            clock: FixedTimestep::new(),
            last_time: 0.0,
            render_state,
            assets: WebAssets::load()?,
            tracker: UploadTracker::new(),
            audio: AudioManager::new(&settings),
            settings,
            high_scores: HighScores::load(),
            score_label: create_score_label(&document)?,
        }));

        setup_input_handlers(&window, game.clone())?;
        setup_resize_handler(&window, &canvas, game.clone())?;
        setup_timers(&window, game.clone())?;

        request_animation_frame(game);

        log::info!("Paintball Mayhem running!");
        Ok(())
    }

    async fn init_graphics(
        canvas: &HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<SpriteRenderState, GameError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| GameError::GraphicsUnavailable(format!("surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| GameError::GraphicsUnavailable(format!("adapter: {}", e)))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        SpriteRenderState::new(surface, &adapter, width, height).await
    }

    fn add_listener<E, F>(
        target: &web_sys::EventTarget,
        event: &str,
        handler: F,
    ) -> Result<(), GameError>
    where
        E: wasm_bindgen::convert::FromWasmAbi + 'static,
        F: FnMut(E) + 'static,
    {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| GameError::Dom(format!("{} listener: {:?}", event, e)))?;
        closure.forget();
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), GameError> {
        {
            let game = game.clone();
            add_listener(window, "keydown", move |event: KeyboardEvent| {
                let key_name = event.key();
                if Key::from_key_name(&key_name).is_some_and(|k| k.blocks_default()) {
                    event.prevent_default();
                }
                game.borrow_mut().on_key_down(&key_name);
            })?;
        }
        {
            let game = game.clone();
            add_listener(window, "keyup", move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            })?;
        }
        // Key-ups are never delivered while the window is unfocused
        add_listener(window, "blur", move |_event: web_sys::FocusEvent| {
            game.borrow_mut().input.release_all();
        })
    }

    fn setup_resize_handler(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), GameError> {
        let canvas = canvas.clone();
        add_listener(window, "resize", move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = viewport_size(&window);
            canvas.set_width(width);
            canvas.set_height(height);
            let mut g = game.borrow_mut();
            g.state.resize(width as f32, height as f32);
            g.render_state.resize(width, height);
            log::debug!("Resized to {}x{}", width, height);
        })
    }

    /// Spawn and difficulty clocks run on wall time, not frames
    fn setup_timers(window: &web_sys::Window, game: Rc<RefCell<Game>>) -> Result<(), GameError> {
        let (spawn_ms, ramp_ms) = {
            let g = game.borrow();
            (
                g.state.tuning.spawn_interval_ms,
                g.state.tuning.difficulty_interval_ms,
            )
        };

        let spawner = {
            let game = game.clone();
            Closure::<dyn FnMut()>::new(move || {
                let g = &mut *game.borrow_mut();
                spawn_block(&mut g.state, &mut g.rng);
            })
        };
        let ramp = Closure::<dyn FnMut()>::new(move || {
            ramp_difficulty(&mut game.borrow_mut().state);
        });

        for (closure, period) in [(spawner, spawn_ms), (ramp, ramp_ms)] {
            window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    period as i32,
                )
                .map_err(|e| GameError::Dom(format!("setInterval: {:?}", e)))?;
            closure.forget();
        }
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use paintball_mayhem::consts::SIM_DT;
    use paintball_mayhem::sim::{Autopilot, GameEvent, GameState, Schedule, tick};
    use paintball_mayhem::{GameError, HighScores, Tuning};

    /// Five minutes of play at 60 ticks per second
    const MAX_TICKS: u64 = 60 * 60 * 5;

    pub fn load_tuning(path: &str) -> Result<Tuning, GameError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| GameError::InvalidTuning(format!("{}: {}", path, e)))?;
        Tuning::from_json(&json)
    }

    /// Let the autopilot play one run on an 800x600 field
    pub fn run(tuning: Tuning, seed: u64) -> GameState {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut schedule = Schedule::new(&tuning);
        let mut state = GameState::new(800.0, 600.0, tuning);
        let mut pilot = Autopilot::new();
        let dt_ms = SIM_DT as f64 * 1000.0;

        while state.time_ticks < MAX_TICKS && !state.is_game_over() {
            let input = pilot.next_tick_input(&state);
            for event in tick(&mut state, &input, &mut rng) {
                match event {
                    GameEvent::GameOver { final_score, cause } => {
                        log::info!(
                            "Run over after {} ticks ({:?}), score {}",
                            state.time_ticks,
                            cause,
                            final_score
                        );
                    }
                    other => log::debug!("{:?}", other),
                }
            }
            schedule.advance(&mut state, &mut rng, dt_ms);
        }
        state
    }

    pub fn report(state: &GameState) {
        let mut scores = HighScores::load();
        let rank = scores.add_score(state.score, 0.0);
        log::info!(
            "Final score {} after {} ticks, speed x{:.1}, rank {:?}",
            state.score,
            state.time_ticks,
            state.speed_multiplier,
            rank
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use paintball_mayhem::Tuning;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Paintball Mayhem (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match headless::load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                return std::process::ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    let state = headless::run(tuning, seed);
    headless::report(&state);
    std::process::ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
