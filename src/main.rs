//! Quiz Breakout entry point
//!
//! The browser build wires DOM events and `requestAnimationFrame` to the
//! simulation. The native build runs a headless seeded demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, HtmlCanvasElement, HtmlInputElement, HtmlSelectElement,
        KeyboardEvent, MouseEvent, WheelEvent,
    };

    use quiz_breakout::input::InputState;
    use quiz_breakout::platform::canvas::CanvasSurface;
    use quiz_breakout::platform::Shared;
    use quiz_breakout::platform::fetch::{load_cheats, load_questions};
    use quiz_breakout::quiz::{CheatList, DEFAULT_TOPIC, QuestionBank, TopicSelection};
    use quiz_breakout::renderer::draw_frame;
    use quiz_breakout::settings::GameOptions;
    use quiz_breakout::sim::{GameEvent, GamePhase, GameState, TickOutcome, tick};

    const QUESTIONS_URL: &str = "questions.json";
    const CHEATS_URL: &str = "cheats.json";

    /// Controls whose change restarts the run
    const OPTION_CONTROLS: [&str; 4] = ["paddle-size", "green-count", "gravity", "city"];

    /// Game instance holding all state
    struct Game {
        state: GameState,
        surface: CanvasSurface,
        canvas: HtmlCanvasElement,
        input: InputState,
        /// Loaded once at startup, reused by restarts
        questions: QuestionBank,
        /// A frame callback is scheduled
        looping: bool,
    }

    impl Game {
        /// Run one tick and draw the result
        fn frame(&mut self) -> TickOutcome {
            let input = self.input.snapshot();
            let outcome = tick(&mut self.state, &input);
            draw_frame(&self.state, &mut self.surface);
            outcome
        }

        /// React to simulation events in the DOM. Returns true when the quiz
        /// panel opened; focus it only after the game is released.
        fn handle_events(&self, document: &Document, events: Vec<GameEvent>) -> bool {
            let mut quiz_opened = false;
            for event in events {
                match event {
                    GameEvent::BrickDestroyed { points, at, .. } if points > 0 => {
                        self.show_points(document, &format!("+{points}"), at, false);
                    }
                    GameEvent::QuizAnswered { points, at, .. } if points > 0 => {
                        self.show_points(document, &format!("+{points}"), at, true);
                    }
                    GameEvent::QuizStarted { .. } => {
                        if let Some(pending) = &self.state.pending_quiz {
                            show_quiz(document, &pending.question.prompt());
                            quiz_opened = true;
                        }
                    }
                    GameEvent::CheatsUnlocked => {
                        wasm_bindgen_futures::spawn_local(async {
                            let cheats = load_cheats(CHEATS_URL).await;
                            if let Some(document) = get_document() {
                                show_cheats(&document, &cheats);
                            }
                        });
                    }
                    GameEvent::CheatArmed => log::debug!("Cheat armed"),
                    GameEvent::Ended(_) => {
                        if let Some(message) = self.state.end_message() {
                            show_message(document, &message);
                        }
                    }
                    _ => {}
                }
            }
            quiz_opened
        }

        /// Floating "+N" over the canvas at a brick position
        fn show_points(&self, document: &Document, text: &str, at: Vec2, special: bool) {
            let Some(container) = document.get_element_by_id("points-container") else {
                return;
            };
            let Ok(span) = document.create_element("span") else {
                return;
            };
            let class = if special { "points special" } else { "points" };
            span.set_class_name(class);
            span.set_text_content(Some(text));
            let rect = self.canvas.get_bounding_client_rect();
            let _ = span.set_attribute(
                "style",
                &format!(
                    "left: {}px; top: {}px",
                    rect.left() + at.x as f64,
                    rect.top() + at.y as f64
                ),
            );

            let done = span.clone();
            let remove = Closure::once_into_js(move || done.remove());
            let _ = span.add_event_listener_with_callback("animationend", remove.unchecked_ref());
            let _ = container.append_child(&span);
        }

        fn update_hud(&self, document: &Document) {
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&format!("Score: {}", self.state.score)));
            }
        }
    }

    fn get_document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn show_message(document: &Document, text: &str) {
        if let Some(el) = document.get_element_by_id("message") {
            el.set_text_content(Some(text));
        }
        set_hidden(document, "message", false);
    }

    fn show_quiz(document: &Document, prompt: &str) {
        if let Some(el) = document.get_element_by_id("quiz-question") {
            el.set_text_content(Some(prompt));
        }
        if let Some(input) = quiz_answer(document) {
            input.set_value("");
        }
        set_hidden(document, "quiz", false);
    }

    fn quiz_answer(document: &Document) -> Option<HtmlInputElement> {
        document
            .get_element_by_id("quiz-answer")
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
    }

    /// Must not run while the game is borrowed
    fn focus_quiz_answer(document: &Document) {
        if let Some(input) = quiz_answer(document) {
            let _ = input.focus();
        }
    }

    fn show_cheats(document: &Document, cheats: &CheatList) {
        let Some(list) = document.get_element_by_id("cheats") else {
            return;
        };
        list.set_inner_html("");
        for cheat in &cheats.cheats {
            if let Ok(item) = document.create_element("li") {
                item.set_text_content(Some(&format!("{}: {}", cheat.name, cheat.description)));
                let _ = list.append_child(&item);
            }
        }
        set_hidden(document, "cheats-panel", false);
    }

    /// Current value of a select or input control, None if it is missing
    fn control_value(document: &Document, id: &str) -> Option<String> {
        let el = document.get_element_by_id(id)?;
        if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            return Some(select.value());
        }
        el.dyn_ref::<HtmlInputElement>().map(|input| input.value())
    }

    fn read_options(document: &Document) -> GameOptions {
        let defaults = GameOptions::default();
        let value = |id: &str, default: String| control_value(document, id).unwrap_or(default);
        GameOptions::from_values(
            &value("paddle-size", defaults.paddle_size.as_str().to_string()),
            &value("green-count", defaults.quiz_bricks.to_string()),
            &value("gravity", defaults.gravity.to_string()),
            &value("city", defaults.backdrop.as_str().to_string()),
        )
    }

    fn read_topics(document: &Document) -> TopicSelection {
        let mut selection = TopicSelection::new();
        let Ok(boxes) = document.query_selector_all("input[name=\"topic\"]") else {
            return selection;
        };
        for i in 0..boxes.length() {
            if let Some(input) = boxes
                .get(i)
                .and_then(|n| n.dyn_into::<HtmlInputElement>().ok())
            {
                selection.set(&input.value(), input.checked());
            }
        }
        selection
    }

    /// One checkbox per loaded topic, default topic pre-checked
    fn populate_topics(document: &Document, questions: &QuestionBank) {
        let Some(container) = document.get_element_by_id("topics") else {
            return;
        };
        container.set_inner_html("");
        for topic in questions.topics() {
            let Ok(label) = document.create_element("label") else {
                continue;
            };
            let Some(input) = document
                .create_element("input")
                .ok()
                .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
            else {
                continue;
            };
            input.set_type("checkbox");
            input.set_name("topic");
            input.set_value(topic);
            input.set_checked(topic == DEFAULT_TOPIC);
            let _ = label.append_child(&input);
            let _ = label.insert_adjacent_text("beforeend", topic);
            let _ = container.append_child(&label);
        }
    }

    /// Match the canvas backing size to its layout size
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (f32, f32) {
        let (w, h) = (canvas.client_width(), canvas.client_height());
        if w > 0 && h > 0 {
            canvas.set_width(w as u32);
            canvas.set_height(h as u32);
        }
        (canvas.width() as f32, canvas.height() as f32)
    }

    fn new_run(document: &Document, canvas: &HtmlCanvasElement, questions: &QuestionBank) -> GameState {
        let seed = js_sys::Date::now() as u64;
        let (width, height) = fit_canvas(canvas);
        let mut state = GameState::with_canvas(seed, read_options(document), width, height);
        state.questions = questions.clone();
        state.topics = read_topics(document);
        state.start();
        log::info!("Game initialized with seed: {seed}");
        state
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Quiz Breakout starting...");

        let Some(document) = get_document() else {
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|e| e.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };
        let Some(surface) = CanvasSurface::from_canvas(&canvas) else {
            log::error!("2D canvas context unavailable");
            return;
        };

        let questions = load_questions(QUESTIONS_URL).await;
        populate_topics(&document, &questions);
        set_hidden(&document, "loading", true);

        let state = new_run(&document, &canvas, &questions);
        let game = Shared::new(Game {
            state,
            surface,
            canvas: canvas.clone(),
            input: InputState::new(),
            questions,
            looping: false,
        });

        setup_input_handlers(&canvas, game.clone());
        setup_controls(game.clone());
        setup_quiz_panel(game.clone());
        setup_restart_button(game.clone());

        start_loop(&game);
        log::info!("Quiz Breakout running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Shared<Game>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard - ignored while the quiz panel has focus
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let handled = game.with(|g| {
                    g.state.phase != GamePhase::AwaitingAnswer
                        && g.input.key_down(&event.key(), event.time_stamp(), event.repeat())
                });
                if handled == Some(true) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.with(|g| g.input.key_up(&event.key()));
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Lost focus: drop held keys so the paddle doesn't run away
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.with(|g| g.input.release_all());
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - paddle centres on the pointer
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.with(|g| g.input.mouse_move(event.offset_x() as f32));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Wheel
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                event.prevent_default();
                game.with(|g| g.input.wheel(event.delta_y() as f32));
            });
            let _ = canvas
                .add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.with(|g| {
                    let (width, height) = fit_canvas(&g.canvas);
                    g.state.resize(width, height);
                });
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Topic checkboxes update the pool; option controls restart the run
    fn setup_controls(game: Shared<Game>) {
        let Some(document) = get_document() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let Some(document) = get_document() else {
                return;
            };
            // Deferred: `change` also fires synchronously on blur, which can
            // happen inside a frame that holds the game borrowed
            let game = game.clone();
            if target.get_attribute("name").as_deref() == Some("topic") {
                wasm_bindgen_futures::spawn_local(async move {
                    game.with(|g| g.state.topics = read_topics(&document));
                });
            } else if OPTION_CONTROLS.contains(&target.id().as_str()) {
                wasm_bindgen_futures::spawn_local(async move {
                    restart(&game);
                });
            }
        });
        let _ = document.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_quiz_panel(game: Shared<Game>) {
        let Some(document) = get_document() else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("quiz-submit") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                submit_answer(&game, true);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Enter submits, Escape dismisses without an answer
        if let Some(input) = document.get_element_by_id("quiz-answer") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    "Enter" => submit_answer(&game, true),
                    "Escape" => submit_answer(&game, false),
                    _ => {}
                }
            });
            let _ = input
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Resume the suspended run with the typed answer (or none)
    fn submit_answer(game: &Shared<Game>, with_answer: bool) {
        let Some(document) = get_document() else {
            return;
        };
        let answer = quiz_answer(&document)
            .filter(|_| with_answer)
            .map(|input| input.value());

        let canvas = game.with(|g| {
            if g.state.phase != GamePhase::AwaitingAnswer {
                return None;
            }
            g.state.resolve_quiz(answer.as_deref());
            set_hidden(&document, "quiz", true);
            let events = g.state.drain_events();
            g.handle_events(&document, events);
            g.update_hud(&document);
            Some(g.canvas.clone())
        });
        if let Some(canvas) = canvas.flatten() {
            let _ = canvas.focus();
        }
    }

    fn setup_restart_button(game: Shared<Game>) {
        let Some(document) = get_document() else {
            return;
        };
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                restart(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Throw the current run away and start a fresh one with the current options
    fn restart(game: &Shared<Game>) {
        let Some(document) = get_document() else {
            return;
        };
        let restarted = game.with(|g| {
            let state = new_run(&document, &g.canvas, &g.questions);
            g.state = state;
            g.input.release_all();
            g.update_hud(&document);
        });
        if restarted.is_none() {
            return;
        }
        set_hidden(&document, "quiz", true);
        set_hidden(&document, "message", true);
        start_loop(game);
    }

    fn start_loop(game: &Shared<Game>) {
        let schedule = game.with(|g| !std::mem::replace(&mut g.looping, true));
        if schedule == Some(true) {
            request_animation_frame(game.clone());
        }
    }

    fn request_animation_frame(game: Shared<Game>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Shared<Game>) {
        let document = get_document();
        let Some((keep_going, quiz_opened)) = game.with(|g| {
            let outcome = g.frame();
            let mut quiz_opened = false;
            if let Some(document) = &document {
                let events = g.state.drain_events();
                quiz_opened = g.handle_events(document, events);
                g.update_hud(document);
            }
            let keep_going = outcome != TickOutcome::End;
            g.looping = keep_going;
            (keep_going, quiz_opened)
        }) else {
            // Game busy in another callback; try again next frame
            request_animation_frame(game);
            return;
        };

        if quiz_opened {
            if let Some(document) = &document {
                focus_quiz_answer(document);
            }
        }
        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Ticks before the native demo gives up
#[cfg(not(target_arch = "wasm32"))]
const MAX_DEMO_TICKS: u64 = 200_000;

#[cfg(not(target_arch = "wasm32"))]
const QUESTIONS_PATH: &str = "questions.json";

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use quiz_breakout::platform::{questions_or_default, read_file};
    use quiz_breakout::renderer::{RecordingSurface, draw_frame};
    use quiz_breakout::settings::{Backdrop, GameOptions};
    use quiz_breakout::sim::{GameState, TickInput, TickOutcome, tick};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Quiz Breakout (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - build for wasm32 to play");

    let seed: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let options = GameOptions {
        backdrop: Backdrop::Nyc,
        ..Default::default()
    };
    let mut state = GameState::new(seed, options);
    state.questions = questions_or_default(QUESTIONS_PATH, read_file(QUESTIONS_PATH));
    state.topics = state.questions.topics().collect();
    state.start();

    // The demo player guesses quiz answers at random
    let mut guesser = Pcg32::seed_from_u64(seed.wrapping_add(1));
    let mut surface = RecordingSurface::new();
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let (mut asked, mut correct) = (0u32, 0u32);

    for _ in 0..MAX_DEMO_TICKS {
        let outcome = tick(&mut state, &input);
        surface.reset();
        draw_frame(&state, &mut surface);

        if outcome == TickOutcome::Suspended {
            if let Some(pending) = &state.pending_quiz {
                let guess = guesser.random_range(1..=pending.question.options.len().max(1));
                asked += 1;
                if state.resolve_quiz(Some(&guess.to_string())) {
                    correct += 1;
                }
            }
        }

        for event in state.drain_events() {
            log::debug!("tick {}: {:?}", state.time_ticks, event);
        }

        if outcome == TickOutcome::End || state.is_ended() {
            break;
        }
    }

    match state.end_message() {
        Some(message) => log::info!("{message}"),
        None => log::info!(
            "Demo stopped after {} ticks with score {}",
            state.time_ticks,
            state.score
        ),
    }
    log::info!(
        "Quizzes answered: {correct}/{asked}, bricks left: {}, draw calls per frame: {}",
        state.remaining,
        surface.commands.len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
