//! Pipe Runner entry point
//!
//! Native builds run a headless autopilot session and log what happens:
//! `pipe-runner [settings.json] [frames]`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use pipe_runner::consts::SIM_DT;
    use pipe_runner::persistence::JsonFileStore;
    use pipe_runner::sim::{ActorBody, Flapper, Game, GameEvent, GamePhase};
    use pipe_runner::{ConfigError, KeyValueStore, Settings};

    const DEFAULT_FRAMES: u64 = 60 * 60;
    const STORE_PATH: &str = "pipe_runner_scores.json";
    /// Pause once during the run to exercise the countdown
    const PAUSE_AT_FRAME: u64 = 600;
    const RESUME_AT_FRAME: u64 = 660;

    /// Flap when falling into the lower part of the next gap
    fn wants_flap<S: KeyValueStore>(game: &Game<S>, actor: &Flapper) -> bool {
        let bounds = actor.bounds();
        let Some((_, gap_top, gap_bottom)) = game.session().field.next_gap(bounds.left) else {
            return bounds.bottom > game.settings().world_height * 0.6;
        };
        let target = gap_top + (gap_bottom - gap_top) * 0.6;
        actor.vel.y >= 0.0 && bounds.bottom > target
    }

    fn report(events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::Flapped { .. } | GameEvent::ScoreChanged { .. } => {
                    log::debug!("{:?}", event)
                }
                _ => log::info!("{:?}", event),
            }
        }
    }

    pub fn run() -> Result<(), ConfigError> {
        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        let frames = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_FRAMES);

        let mut actor = Flapper::new(
            settings.start_position(),
            settings.world_height,
            settings.gravity,
        );
        let mut game = Game::new(settings, JsonFileStore::open(STORE_PATH))?;
        log::info!(
            "Best score on record: {} ({})",
            game.session().score.best_at_start(),
            game.store().path().display()
        );

        for frame in 0..frames {
            match frame {
                PAUSE_AT_FRAME => report(game.pause(&mut actor)),
                RESUME_AT_FRAME => report(game.resume()),
                _ => {}
            }

            actor.step(SIM_DT);
            if wants_flap(&game, &actor) {
                report(game.flap(&mut actor).into_iter().collect());
            }
            if game.phase() == GamePhase::Playing
                && game.session().field.overlapping(&actor.bounds())
            {
                report(game.on_collision(&mut actor));
            }
            report(game.tick(&mut actor, SIM_DT));
        }

        log::info!(
            "Finished {} frames: session {}, score {}, tier {}",
            frames,
            game.session().index,
            game.score(),
            game.tier()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Pipe Runner (headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    use pipe_runner::persistence::LocalStorageStore;
    use pipe_runner::sim::Game;

    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Pipe Runner starting...");

    match Game::new(pipe_runner::Settings::default(), LocalStorageStore) {
        Ok(game) => log::info!(
            "Ready, best score on record: {}",
            game.session().score.best_at_start()
        ),
        Err(e) => log::error!("Refusing to start: {}", e),
    }
}
