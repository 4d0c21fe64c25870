//! Torelli's Run entry point
//!
//! Browser: wires DOM input, the frame loop, the music timer and the HUD
//! around the simulation. Native: runs a seeded autopilot game headless.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent, TouchEvent};

    use torelli_run::audio::{
        AudioManager, MusicScheduler, SCHEDULER_INTERVAL_MS, ScheduledEvent, SoundEffect,
    };
    use torelli_run::consts::*;
    use torelli_run::input::{SwipeTracker, intent_for_key};
    use torelli_run::renderer::{SceneSnapshot, as_bytes, coin_instances, obstacle_instances};
    use torelli_run::sim::{FixedStep, GamePhase, GameState, TickInput};
    use torelli_run::{Chaser, Settings};

    // Hand-off to whatever draws the corridor: the JSON snapshot plus packed
    // obstacle (32-byte) and coin (16-byte) instance buffers
    #[wasm_bindgen(inline_js = "
        export function present_frame(json, obstacles, coins) {
            if (typeof window.presentFrame === 'function') {
                window.presentFrame(json, obstacles, coins);
            }
        }
    ")]
    extern "C" {
        fn present_frame(json: &str, obstacles: &[u8], coins: &[u8]);
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        stepper: FixedStep,
        chaser: Chaser,
        input: TickInput,
        swipe: SwipeTracker,
        settings: Settings,
        audio: AudioManager,
        music: MusicScheduler,
        music_events: Vec<ScheduledEvent>,
        last_time: f64,
        /// Presentation seconds, drives coin spin
        elapsed: f32,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // HUD is rebuilt when these change
        last_phase: GamePhase,
        last_score: Option<u64>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let audio = AudioManager::new(&settings);
            Self {
                state: GameState::new(seed),
                stepper: FixedStep::default(),
                chaser: Chaser::default(),
                input: TickInput::default(),
                swipe: SwipeTracker::default(),
                settings,
                audio,
                music: MusicScheduler::new(),
                music_events: Vec::new(),
                last_time: 0.0,
                elapsed: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Menu,
                last_score: None,
            }
        }

        /// Menu -> Playing, or GameOver -> Menu -> Playing
        fn start_run(&mut self) {
            if self.state.phase() == GamePhase::GameOver && self.state.reset().is_err() {
                return;
            }
            if self.state.start_game().is_ok() {
                self.chaser.reset(&self.state);
                self.input.intents.clear();
                self.audio.resume();
            }
        }

        /// Advance one rendered frame
        fn update(&mut self, dt: f32, time: f64) {
            // Fixed SIM_DT ticks; intents are one-shot, the autopilot flag sticks
            let events = self.stepper.advance(&mut self.state, &mut self.input, dt);

            let dt = dt.clamp(0.0, MAX_FRAME_DT);
            self.elapsed += dt;
            for effect in events.iter().filter_map(SoundEffect::for_event) {
                self.audio.play_effect(effect);
            }

            self.chaser.follow(&self.state, dt);

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

        /// Hand the frame to the presenter
        fn present(&self) {
            let json = match SceneSnapshot::capture(&self.state, &self.chaser).to_json() {
                Ok(json) => json,
                Err(err) => {
                    log::warn!("Snapshot serialization failed: {}", err);
                    return;
                }
            };
            let obstacles = obstacle_instances(&self.state);
            let coins = coin_instances(&self.state, self.elapsed);
            present_frame(&json, as_bytes(&obstacles), as_bytes(&coins));
        }

        /// Poll the music sequencer and voice what it schedules
        fn schedule_music(&mut self) {
            if !self.audio.is_available() {
                return;
            }
            self.music_events.clear();
            self.music.poll(
                self.audio.current_time(),
                self.state.intensity(),
                self.state.phase(),
                &mut self.music_events,
            );
            for event in &self.music_events {
                self.audio.play(event);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = document() else { return };

            let phase = self.state.phase();
            if Some(self.state.score()) != self.last_score {
                set_text(&document, "hud-score", &self.state.score().to_string());
                set_text(&document, "hud-coins", &self.state.coins().to_string());
                self.last_score = Some(self.state.score());
            }

            set_visible(&document, "hud-fps", self.settings.show_fps);
            if self.settings.show_fps {
                set_text(&document, "hud-fps", &self.fps.to_string());
            }

            if phase == self.last_phase {
                return;
            }
            set_visible(&document, "menu", phase == GamePhase::Menu);
            set_visible(&document, "hud", phase == GamePhase::Playing);
            set_visible(&document, "game-over", phase == GamePhase::GameOver);
            if phase == GamePhase::GameOver {
                set_text(&document, "final-score", &self.state.score().to_string());
                set_text(&document, "final-coins", &self.state.coins().to_string());
            }
            self.last_phase = phase;
        }

        fn toggle_mute(&mut self) {
            self.settings.toggle_mute();
            self.settings.save();
            self.audio.apply_settings(&self.settings);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", err).into());
        }

        log::info!("Torelli's Run starting...");

        let Some(document) = document() else {
            log::error!("No document; nothing to run in");
            return;
        };
        set_visible(&document, "loading", false);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(game.clone());
        setup_touch(&document, game.clone());
        setup_buttons(&document, game.clone());
        setup_focus_mute(game.clone());
        setup_music_timer(game.clone());

        {
            let mut g = game.borrow_mut();
            g.last_phase = GamePhase::GameOver;
            g.update_hud();
        }

        request_animation_frame(game);
        log::info!("Torelli's Run running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            let key = event.key();
            if let Some(intent) = intent_for_key(&key) {
                event.prevent_default();
                g.input.intents.push(intent);
                return;
            }
            match key.as_str() {
                " " | "Enter" => {
                    if !g.state.phase().is_playing() {
                        g.start_run();
                    }
                }
                "i" | "I" => {
                    g.input.autopilot = !g.input.autopilot;
                    log::info!("Autopilot: {}", g.input.autopilot);
                }
                "m" | "M" => g.toggle_mute(),
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_touch(document: &Document, game: Rc<RefCell<Game>>) {
        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut()
                        .swipe
                        .begin(touch.client_x() as f32, touch.client_y() as f32);
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end (swipe resolved here)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let Some(touch) = event.changed_touches().get(0) else {
                    return;
                };
                let mut g = game.borrow_mut();
                if let Some(intent) = g
                    .swipe
                    .end(touch.client_x() as f32, touch.client_y() as f32)
                {
                    g.input.intents.push(intent);
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch cancel
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().swipe.cancel();
            });
            let _ = document
                .add_event_listener_with_callback("touchcancel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow_mut().start_run();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("mute-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().toggle_mute();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Silence audio while the window is in the background
    fn setup_focus_mute(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Window blur (click outside, tab switch)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    let silent = Settings {
                        muted: true,
                        ..g.settings.clone()
                    };
                    g.audio.apply_settings(&silent);
                    log::info!("Muted (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let settings = g.settings.clone();
                g.audio.apply_settings(&settings);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Music runs on its own clock, independent of frame rate
    fn setup_music_timer(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut()>::new(move || {
            game.borrow_mut().schedule_music();
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            SCHEDULER_INTERVAL_MS,
        );
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                FRAME_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.present();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Torelli's Run (native) starting...");
    log::info!("The browser build is the playable one; running a headless autopilot game");

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        None => 1,
        Some(Ok(seed)) => seed,
        Some(Err(err)) => {
            eprintln!("Invalid seed: {}", err);
            std::process::exit(2);
        }
    };
    let tuning = match args.next() {
        None => torelli_run::Tuning::default(),
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(err) => {
                eprintln!("Failed to load tuning from {}: {}", path, err);
                std::process::exit(2);
            }
        },
    };

    headless_run(seed, tuning);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<torelli_run::Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(torelli_run::Tuning::from_json(&json)?)
}

/// Play one game on autopilot at the fixed simulation step and report how it went
#[cfg(not(target_arch = "wasm32"))]
fn headless_run(seed: u64, tuning: torelli_run::Tuning) {
    use torelli_run::consts::SIM_DT;
    use torelli_run::sim::{GameEvent, GameState, TickInput, tick};

    /// Five minutes of game time
    const MAX_TICKS: u64 = 120 * 60 * 5;

    let mut state = GameState::with_tuning(seed, tuning);
    if let Err(err) = state.start_game() {
        eprintln!("Could not start: {}", err);
        return;
    }

    let input = TickInput {
        intents: Vec::new(),
        autopilot: true,
    };
    let mut jumps = 0u32;
    let mut slides = 0u32;
    let mut crash = None;
    while state.phase().is_playing() && state.time_ticks() < MAX_TICKS {
        for event in tick(&mut state, &input, SIM_DT) {
            match event {
                GameEvent::Jumped => jumps += 1,
                GameEvent::Slid => slides += 1,
                GameEvent::Crashed { obstacle } => crash = Some(obstacle),
                _ => {}
            }
        }
    }

    let seconds = state.time_ticks() as f32 * SIM_DT;
    let tuning = state.tuning();
    println!("\nSeed {}", state.seed());
    println!(
        "  speed     {} -> {} u/s over {} segments",
        tuning.base_speed,
        tuning.max_speed,
        tuning.segments_to_max_speed()
    );
    println!("  survived  {:.1} s ({} segments)", seconds, state.segments_passed());
    println!("  score     {}", state.score());
    println!("  coins     {}", state.coins());
    println!("  jumps     {}, slides {}", jumps, slides);
    match crash {
        Some(obstacle) => println!("  ended on  {:?}", obstacle),
        None => println!("  still running at {:.1} u/s", state.speed()),
    }
}
