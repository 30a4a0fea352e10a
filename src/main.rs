//! Lane Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use lane_runner::platform::{LocalStorage, MemoryStorage, Storage};
    use lane_runner::sim::{GameEvent, GamePhase, LaneDirection, Snapshot};
    use lane_runner::tuning::TuningError;
    use lane_runner::{Session, Tuning};

    /// DOM handles the renderer writes to
    struct Dom {
        document: Document,
        container: HtmlElement,
        player: HtmlElement,
        score: Element,
        menu: HtmlElement,
        high_score: Option<Element>,
        countdown: Option<HtmlElement>,
    }

    /// Game instance holding all state
    struct Game {
        session: Session<Box<dyn Storage>>,
        dom: Dom,
        /// Obstacle divs keyed by obstacle id
        obstacle_nodes: HashMap<u32, HtmlElement>,
        last_score: Option<u64>,
    }

    impl Game {
        fn new(seed: u64, dom: Dom) -> Result<Self, TuningError> {
            let storage: Box<dyn Storage> = match LocalStorage::open() {
                Ok(storage) => Box::new(storage),
                Err(e) => {
                    log::warn!("{}; high score will not persist", e);
                    Box::new(MemoryStorage::new())
                }
            };
            let tuning = Tuning::load(&*storage);

            // Size the arena to the configured lanes
            let style = dom.container.style();
            let _ = style.set_property("width", &format!("{}px", tuning.viewport_width));
            let _ = style.set_property("height", &format!("{}px", tuning.viewport_height()));

            Ok(Self {
                session: Session::new(seed, tuning, storage)?,
                dom,
                obstacle_nodes: HashMap::new(),
                last_score: None,
            })
        }

        /// Run one tick and push the results to the page
        fn update(&mut self, time: f64) {
            let events = self.session.frame(time);
            for event in &events {
                self.apply_event(event);
            }
            let snapshot = self.session.snapshot();
            self.render(&snapshot);
        }

        /// Phase-level UI changes (menu, countdown, game over message)
        fn apply_event(&mut self, event: &GameEvent) {
            match *event {
                GameEvent::PhaseChanged { to, .. } => match to {
                    GamePhase::Countdown => set_display(&self.dom.menu, "none"),
                    GamePhase::Playing => self.remove_countdown(),
                    GamePhase::Paused => log::info!("Paused"),
                    _ => {}
                },
                GameEvent::Countdown(n) => self.show_countdown(n),
                GameEvent::MenuShown {
                    final_score,
                    high_score,
                } => self.show_menu(final_score, high_score),
                _ => {}
            }
        }

        fn show_countdown(&mut self, n: u32) {
            if self.dom.countdown.is_none() {
                if let Some(el) = create_div(&self.dom.document, "countdown") {
                    let _ = self.dom.container.append_child(&el);
                    self.dom.countdown = Some(el);
                }
            }
            if let Some(el) = &self.dom.countdown {
                el.set_text_content(Some(&n.to_string()));
            }
        }

        fn remove_countdown(&mut self) {
            if let Some(el) = self.dom.countdown.take() {
                el.remove();
            }
        }

        fn show_menu(&mut self, final_score: u64, high_score: u64) {
            self.remove_countdown();
            set_display(&self.dom.menu, "block");
            if let Some(el) = &self.dom.high_score {
                el.set_text_content(Some(&high_score.to_string()));
            }

            if let Ok(Some(old)) = self.dom.menu.query_selector(".game-over-message") {
                old.remove();
            }
            if final_score > 0 {
                if let Ok(message) = self.dom.document.create_element("p") {
                    message.set_class_name("game-over-message");
                    message.set_text_content(Some(&format!("Game Over! Score: {}", final_score)));
                    let _ = self
                        .dom
                        .menu
                        .insert_before(&message, self.dom.menu.first_child().as_ref());
                }
            }
        }

        /// Draw player, obstacles and score
        fn render(&mut self, snapshot: &Snapshot) {
            let rect = snapshot.player_rect;
            let style = self.dom.player.style();
            let _ = style.set_property("left", &format!("{}px", rect.left()));
            let _ = style.set_property("top", &format!("{}px", rect.top()));
            let classes = self.dom.player.class_list();
            let _ = if snapshot.player.is_jumping {
                classes.add_1("jumping")
            } else {
                classes.remove_1("jumping")
            };

            for obstacle in &snapshot.obstacles {
                let node = match self.obstacle_nodes.get(&obstacle.id) {
                    Some(node) => node.clone(),
                    None => {
                        let Some(node) = create_div(&self.dom.document, "obstacle") else {
                            continue;
                        };
                        let _ = self.dom.container.append_child(&node);
                        self.obstacle_nodes.insert(obstacle.id, node.clone());
                        node
                    }
                };
                let size = obstacle.rect.size();
                let style = node.style();
                let _ = style.set_property("width", &format!("{}px", size.x));
                let _ = style.set_property("height", &format!("{}px", size.y));
                let _ = style.set_property("left", &format!("{}px", obstacle.rect.left()));
                let _ = style.set_property("top", &format!("{}px", obstacle.rect.top()));
            }

            // Drop divs for obstacles that left the registry
            self.obstacle_nodes.retain(|id, node| {
                let alive = snapshot.obstacles.iter().any(|o| o.id == *id);
                if !alive {
                    node.remove();
                }
                alive
            });

            if self.last_score != Some(snapshot.score) {
                self.dom
                    .score
                    .set_text_content(Some(&format!("Score: {}", snapshot.score)));
                self.last_score = Some(snapshot.score);
            }
        }
    }

    fn create_div(document: &Document, class: &str) -> Option<HtmlElement> {
        let el = document.create_element("div").ok()?;
        el.set_class_name(class);
        el.dyn_into::<HtmlElement>().ok()
    }

    fn set_display(el: &HtmlElement, value: &str) {
        let _ = el.style().set_property("display", value);
    }

    fn html_element(document: &Document, id: &str) -> HtmlElement {
        document
            .get_element_by_id(id)
            .unwrap_or_else(|| panic!("missing #{}", id))
            .dyn_into()
            .unwrap_or_else(|_| panic!("#{} is not an HTML element", id))
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
        log::info!("Lane Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let dom = Dom {
            container: html_element(&document, "game-container"),
            player: html_element(&document, "player"),
            score: document.get_element_by_id("score").expect("no #score"),
            menu: html_element(&document, "menu"),
            high_score: document.get_element_by_id("high-score"),
            countdown: None,
            document,
        };

        let seed = js_sys::Date::now() as u64;
        let game = match Game::new(seed, dom) {
            Ok(game) => Rc::new(RefCell::new(game)),
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };
        {
            let g = game.borrow();
            let high = g.session.high_score();
            if let Some(el) = &g.dom.high_score {
                el.set_text_content(Some(&high.to_string()));
            }
        }
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        // Start game loop
        request_animation_frame(game);
        log::info!("Lane Runner running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Start button
        if let Some(btn) = document.get_element_by_id("startButton") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.press_primary();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch anywhere: jump while playing, start otherwise (buttons handle their own clicks)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                let in_run = g.session.state().phase.in_run();
                let on_button = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .is_some_and(|el| el.tag_name() == "BUTTON");
                if in_run || !on_button {
                    event.prevent_default();
                    g.session.press_primary();
                }
            });
            let options = web_sys::AddEventListenerOptions::new();
            options.set_passive(false);
            let _ = document.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" => {
                        event.prevent_default();
                        g.session.press_primary();
                    }
                    "Escape" | "KeyP" => g.session.press_pause(),
                    "ArrowUp" => g.session.request_move(LaneDirection::Up),
                    "ArrowDown" => g.session.request_move(LaneDirection::Down),
                    "KeyI" => {
                        let idle = !g.session.idle_mode();
                        g.session.set_idle_mode(idle);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
        game.borrow_mut().update(time);
        // Keep scheduling even when paused or in the menu
        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.session.state().phase == GamePhase::Playing {
                        g.session.press_pause();
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
                if g.session.state().phase == GamePhase::Playing {
                    g.session.press_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lane Runner (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build for the real game");

    if let Err(e) = run_demo() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Let the autopilot play for two simulated minutes
#[cfg(not(target_arch = "wasm32"))]
fn run_demo() -> Result<(), lane_runner::tuning::TuningError> {
    use lane_runner::consts::FRAME_MS;
    use lane_runner::platform::MemoryStorage;
    use lane_runner::sim::GameEvent;
    use lane_runner::{Session, Tuning};

    const DEMO_FRAMES: u32 = 60 * 120;

    // Optional tuning override: a JSON file path as the first argument
    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json)?,
            Err(e) => {
                log::warn!("Could not read {}: {}; using default tuning", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut session = Session::new(seed, tuning, MemoryStorage::new())?;
    session.set_idle_mode(true);

    let mut runs = 0u32;
    let mut now = 0.0;
    for _ in 0..DEMO_FRAMES {
        now += FRAME_MS;
        for event in session.frame(now) {
            if let GameEvent::GameOver { score, .. } = event {
                runs += 1;
                log::info!("Run {} ended with score {}", runs, score);
            }
        }
    }

    let snapshot = session.snapshot();
    println!(
        "Demo finished: {} runs, high score {}, current phase {:?} (score {})",
        runs,
        session.high_score(),
        snapshot.phase,
        snapshot.score
    );
    Ok(())
}
