//! Chicken Blitz entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent, TouchEvent};

    use chicken_blitz::audio::AudioManager;
    use chicken_blitz::highscores::{self, HighScores};
    use chicken_blitz::settings::Settings;
    use chicken_blitz::sim::{GamePhase, GameState, TickInput, tick};
    use chicken_blitz::stage::Stage;
    use chicken_blitz::tuning;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        stage: Option<Stage>,
        audio: AudioManager,
        settings: Settings,
        highscores: HighScores,
        input: TickInput,
        last_time: f64,
        /// True while a rAF callback is scheduled
        loop_running: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // One game-over handoff per run
        summary_submitted: bool,
    }

    impl Game {
        fn new(seed: u64, screen: Vec2) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_volume(settings.effective_volume());
            audio.set_muted(!settings.sound_enabled);

            Self {
                state: GameState::new(seed, screen),
                stage: None,
                audio,
                settings,
                highscores: HighScores::load(),
                input: TickInput::default(),
                last_time: 0.0,
                loop_running: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                summary_submitted: false,
            }
        }

        /// Begin a fresh run for `name`, applying the current settings
        fn start_run(&mut self, name: &str) {
            let seed = js_sys::Date::now() as u64;
            let screen = self.state.screen;
            self.state = GameState::new(seed, screen);
            self.settings.apply_to(&mut self.state.difficulty);
            self.state.base_fire_interval_ms = self.settings.fire_rate.interval_ms();
            self.state.start(name);
            self.input = TickInput::default();
            self.summary_submitted = false;
            self.audio.set_volume(self.settings.effective_volume());
            self.audio.resume();
            if let Some(stage) = &mut self.stage {
                stage.clear();
            }
            log::info!("New run with seed {}", seed);
        }

        /// Convert a pointer position (game-area coordinates) into a ship
        /// target, scaling the offset from center by the sensitivity setting
        fn pointer_target(&self, x: f32, y: f32) -> Vec2 {
            let center = self.state.screen * 0.5;
            let sens = self.settings.effective_sensitivity();
            center + (Vec2::new(x, y) - center) * sens
        }

        /// Run one simulation tick and feed the collaborators
        fn update(&mut self, dt_ms: f32, time: f64) {
            tick(&mut self.state, &self.input, dt_ms);
            self.input.pause = false;
            self.input.target = None;

            let events = self.state.take_events();
            for event in &events {
                self.audio.play(event);
            }
            if let Some(stage) = &mut self.stage {
                stage.react(&events, self.settings.screen_shake);
                stage.sync(&self.state, dt_ms);
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = time - oldest;
                if elapsed > 0.0 {
                    self.fps = (60_000.0 / elapsed).round() as u32;
                }
            }

            if self.state.phase == GamePhase::Ended && !self.summary_submitted {
                self.handle_game_over();
            }
        }

        /// Submit the finished run to the leaderboard and fill the overlay
        fn handle_game_over(&mut self) {
            self.summary_submitted = true;
            let summary = self.state.summary(js_sys::Date::now());
            let rank = self.highscores.add_summary(&summary);
            if rank.is_some() {
                self.highscores.save();
            }

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("final-level") {
                el.set_text_content(Some(&self.state.level.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hs-rank") {
                let text = match rank {
                    Some(1) => "New top score!".to_string(),
                    Some(r) => format!("High score rank #{}", r),
                    None => String::new(),
                };
                el.set_text_content(Some(&text));
            }
            if let Some(el) = document.get_element_by_id("highscore-list") {
                let lines: Vec<String> = self
                    .highscores
                    .entries
                    .iter()
                    .enumerate()
                    .map(|(i, e)| {
                        format!(
                            "{}. {} - {} (lv {}, {})",
                            i + 1,
                            e.player_name,
                            e.score,
                            e.level,
                            highscores::format_date(e.timestamp)
                        )
                    })
                    .collect();
                el.set_text_content(Some(&lines.join("\n")));
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-lives .hud-value").ok().flatten() {
                // Boss bullets chip half lives
                el.set_text_content(Some(&format!("{:.1}", self.state.lives)));
            }
            if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.level.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-kills .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!(
                    "{}/{}",
                    self.state.kills_this_level,
                    tuning::required_kills(self.state.level)
                )));
            }
            if let Some(el) = document.get_element_by_id("hud-shield") {
                if self.state.shield > 0 {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-shield .hud-value").ok().flatten()
                    {
                        val.set_text_content(Some(&self.state.shield.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            // Show/hide pause overlay
            if let Some(el) = document.get_element_by_id("pause-overlay") {
                if self.state.phase == GamePhase::Paused {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // Show/hide game over overlay
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::Ended {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Chicken Blitz starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let area: HtmlElement = document
            .get_element_by_id("game-area")
            .expect("no game area")
            .dyn_into()
            .expect("not an element");
        let screen = Vec2::new(area.client_width() as f32, area.client_height() as f32);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, screen)));
        game.borrow_mut().stage = Stage::attach("game-area");
        if game.borrow().stage.is_none() {
            log::warn!("Could not attach to #game-area - running without a stage");
        }

        setup_input_handlers(&area, game.clone());
        setup_start_screen(game.clone());
        setup_game_over_buttons(game.clone());
        setup_auto_pause(game.clone());
        setup_resize(&area, game.clone());

        // Show the start screen; the loop starts on the Start button
        if let Some(el) = document.get_element_by_id("start-screen") {
            let _ = el.set_attribute("class", "");
        }

        log::info!("Chicken Blitz ready");
    }

    fn setup_input_handlers(area: &HtmlElement, game: Rc<RefCell<Game>>) {
        // Mouse move - absolute position within the game area
        {
            let game = game.clone();
            let area_clone = area.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = area_clone.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                let y = event.client_y() as f32 - rect.top() as f32;
                let mut g = game.borrow_mut();
                g.input.target = Some(g.pointer_target(x, y));
            });
            let _ = area
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let area_clone = area.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = area_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    let mut g = game.borrow_mut();
                    g.input.target = Some(g.pointer_target(x, y));
                }
            });
            let _ = area
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "Escape" | "p" | "P" => g.input.pause = true,
                    "m" | "M" => {
                        g.settings.sound_enabled = !g.settings.sound_enabled;
                        let muted = !g.settings.sound_enabled;
                        g.audio.set_muted(muted);
                        g.settings.save();
                        log::info!("Sound {}", if muted { "muted" } else { "on" });
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_start_screen(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let document = match web_sys::window().and_then(|w| w.document()) {
                    Some(d) => d,
                    None => return,
                };
                let name = document
                    .get_element_by_id("player-name")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value().trim().to_string())
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| "Player".to_string());

                game.borrow_mut().start_run(&name);

                if let Some(el) = document.get_element_by_id("start-screen") {
                    let _ = el.set_attribute("class", "hidden");
                }
                if let Some(el) = document.get_element_by_id("hud") {
                    let _ = el.set_attribute("class", "");
                }

                start_loop(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_game_over_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let name = game.borrow().state.player_name.clone();
                game.borrow_mut().start_run(&name);
                start_loop(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Running {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Running {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(area: &HtmlElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let area = area.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let screen = Vec2::new(area.client_width() as f32, area.client_height() as f32);
            game.borrow_mut().state.set_screen(screen);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Begin scheduling frames, guarding against a double start
    fn start_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.loop_running {
                return;
            }
            g.loop_running = true;
            g.last_time = 0.0;
        }
        request_animation_frame(game);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                tuning::REFERENCE_FRAME_MS
            };
            g.last_time = time;

            g.update(dt_ms, time);
            g.update_hud();

            // Stop scheduling frames once the run is over; the restart
            // button starts a fresh loop.
            if g.state.phase == GamePhase::Ended {
                g.loop_running = false;
                return;
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use chicken_blitz::sim::{GamePhase, run_headless};

    env_logger::init();
    log::info!("Chicken Blitz (native) starting...");
    log::info!("Native mode is a headless demo - run with `trunk serve` for the web version");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0xC41C);

    // Two scripted minutes at 60 fps
    let state = run_headless(seed, glam::Vec2::new(800.0, 600.0), 60 * 120);
    log::info!(
        "Demo finished: score {} at level {} ({} kills this level, phase {:?})",
        state.score,
        state.level,
        state.kills_this_level,
        state.phase
    );
    if state.phase == GamePhase::Ended {
        log::info!("'{}' was overrun by the flock", state.player_name);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
