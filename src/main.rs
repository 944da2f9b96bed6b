//! Space Flappy entry point
//!
//! Handles platform-specific initialization and runs the game loop:
//! a browser canvas on wasm32, the terminal everywhere else.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use space_flappy::consts::*;
    use space_flappy::persistence::{LocalStorageStore, load_or_empty};
    use space_flappy::platform::{Key, translate};
    use space_flappy::renderer::hud::{self, HudLines, Overlay};
    use space_flappy::renderer::{RenderState, Starfield, build_scene};
    use space_flappy::sim::{Command, GameState, TickInput, tick};
    use space_flappy::{Settings, Tuning};

    /// Tuning baked in at build time; there is no filesystem in the browser
    const TUNING_JSON: &str = include_str!("../data/tuning.json");

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        store: LocalStorageStore,
        settings: Settings,
        stars: Starfield,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        /// Commands waiting for the next tick
        pending: Vec<Command>,
        /// Rendered frames, drives animation only
        frame: u64,
        stopped: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            let tuning = Tuning::from_json(TUNING_JSON).unwrap_or_else(|e| {
                log::warn!("Bundled tuning is malformed ({}), using defaults", e);
                Tuning::default()
            });
            let store = LocalStorageStore;
            let leaderboard = load_or_empty(&store);
            Self {
                state: GameState::new(seed, tuning, leaderboard),
                store,
                stars: Starfield::generate(seed, settings.quality.star_counts()),
                settings,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                pending: Vec::new(),
                frame: 0,
                stopped: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn handle_key(&mut self, key: Key) {
            if let Some(command) = translate(key, self.state.mode) {
                self.pending.push(command);
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = TickInput::new(self.pending.drain(..));
                let was_over = self.state.mode.is_game_over();

                if tick(&mut self.state, &input, &mut self.store).is_break() {
                    log::info!("Quit requested, stopping");
                    self.stopped = true;
                    return;
                }

                if was_over && self.state.mode.is_playing() {
                    self.stars.reset();
                }
                if self.state.mode.is_playing() {
                    self.stars.advance(self.state.tuning.scroll_speed);
                }

                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
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
            self.frame += 1;
            let vertices = build_scene(
                &self.state.snapshot(),
                Some(&self.stars),
                &self.settings,
                self.frame,
            );
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
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
            let snapshot = self.state.snapshot();
            let lines = HudLines::from_snapshot(&snapshot);

            set_text(document, "hud-lives", &lines.lives);
            set_text(document, "hud-score", &lines.score);
            set_text(document, "hud-coins", &lines.coins);

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                    let _ = el.set_attribute("class", "hud-item");
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            let overlay = Overlay::from(snapshot.mode);
            show(document, "name-entry", overlay == Overlay::NameEntry);
            show(document, "leaderboard", overlay == Overlay::Board);

            match overlay {
                Overlay::None => {}
                Overlay::NameEntry => {
                    set_text(document, "name-field", &hud::name_field(snapshot.name_buffer));
                }
                Overlay::Board => {
                    let Some(list) = document.get_element_by_id("board-rows") else {
                        return;
                    };
                    list.set_inner_html("");
                    for row in hud::board_rows(snapshot.leaderboard, snapshot.highlight_score) {
                        if let Ok(item) = document.create_element("li") {
                            item.set_text_content(Some(&row.text));
                            if row.highlighted {
                                let _ = item.set_attribute("class", "highlight");
                            }
                            let _ = list.append_child(&item);
                        }
                    }
                }
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn size_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Space Flappy starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let (width, height) = size_canvas(&window, &canvas);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, Settings::load())));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(js_err)?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&window, game.clone())?;
        setup_resize_handler(&window, canvas, game.clone())?;

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);
        log::info!("Space Flappy running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let Some(key) = Key::from_dom_key(&event.key()) else {
                return;
            };
            // Keep Space from scrolling and Backspace from navigating
            if matches!(key, Key::Space | Key::Backspace) {
                event.prevent_default();
            }
            // Holding Space should not auto-fire the thruster
            if key == Key::Space && event.repeat() {
                return;
            }
            game.borrow_mut().handle_key(key);
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_resize_handler(
        window: &web_sys::Window,
        canvas: HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = size_canvas(&window, &canvas);
            if let Some(ref mut render_state) = game.borrow_mut().render_state {
                render_state.resize(width, height);
            }
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
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

            g.update(dt, time);
            if g.stopped {
                return;
            }
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io;
    use std::time::{Duration, Instant};

    use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

    use space_flappy::consts::MAX_SUBSTEPS;
    use space_flappy::persistence::{FileStore, LeaderboardStore, load_or_empty};
    use space_flappy::platform::{from_key_code, translate};
    use space_flappy::renderer::Starfield;
    use space_flappy::renderer::terminal::{self, TerminalView};
    use space_flappy::sim::{Command, GameState, TICK_US, TickInput, tick};
    use space_flappy::tuning::TUNING_FILE;
    use space_flappy::{Settings, Tuning};

    pub fn run() -> io::Result<()> {
        log::info!("Space Flappy (terminal) starting...");

        let tuning = Tuning::load_or_default(TUNING_FILE);
        let mut settings = Settings::load();
        if settings.apply_args(std::env::args().skip(1)) {
            settings.save();
        }
        let mut store = FileStore::default();
        let leaderboard = load_or_empty(&store);

        let seed: u64 = rand::random();
        let mut state = GameState::new(seed, tuning, leaderboard);
        let mut stars = Starfield::generate(seed, settings.quality.star_counts());
        log::info!("Game initialized with seed: {}", seed);

        let mut view = TerminalView::new();
        let result = view
            .init()
            .and_then(|()| game_loop(&mut state, &mut stars, &settings, &mut store, &mut view));
        // Restore the terminal even when the loop failed
        let restored = view.cleanup();
        result.and(restored)
    }

    /// Commands from every key pressed before `deadline`
    fn collect_commands(state: &GameState, deadline: Instant) -> io::Result<Vec<Command>> {
        let mut commands = Vec::new();
        while event::poll(deadline.saturating_duration_since(Instant::now()))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            // Raw mode swallows the interrupt signal
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                commands.push(Command::Quit);
                continue;
            }
            if let Some(command) = from_key_code(key.code).and_then(|k| translate(k, state.mode)) {
                commands.push(command);
            }
        }
        Ok(commands)
    }

    fn game_loop(
        state: &mut GameState,
        stars: &mut Starfield,
        settings: &Settings,
        store: &mut dyn LeaderboardStore,
        view: &mut TerminalView,
    ) -> io::Result<()> {
        let frame_dur = Duration::from_micros(TICK_US);
        let mut next_frame = Instant::now() + frame_dur;
        let mut frame: u64 = 0;

        loop {
            let input = TickInput::new(collect_commands(state, next_frame)?);
            let was_over = state.mode.is_game_over();

            if tick(state, &input, store).is_break() {
                log::info!("Quit requested");
                return Ok(());
            }

            if was_over && state.mode.is_playing() {
                stars.reset();
            }
            if state.mode.is_playing() {
                stars.advance(state.tuning.scroll_speed);
            }

            frame += 1;
            let grid = terminal::compose(&state.snapshot(), Some(&*stars), settings, frame);
            view.draw(&grid)?;

            // Drop frames instead of fast-forwarding after a long stall
            next_frame += frame_dur;
            let now = Instant::now();
            if now > next_frame + frame_dur * MAX_SUBSTEPS {
                next_frame = now + frame_dur;
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    env_logger::init();
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
