//! Headless Bunny Run
//!
//! Builds the demo level, drives the car with a scripted input pattern at a
//! fixed 60 Hz step and logs how the round ends.
//!
//! Usage: `bunny_run [config.toml|config.ron]`

use bunny_run::demo_scene::{self, DemoLayout};
use bunny_run::events::{EventKind, HudLogger};
use bunny_run::{Game, GameConfig, GameResult};
use hop_engine::config::Config;
use hop_engine::foundation::logging;
use hop_engine::input::KeyCode;
use rand::rngs::StdRng;
use rand::SeedableRng;

const TICK: f32 = 1.0 / 60.0;
const TIME_LIMIT: f64 = 180.0;
const SPARE_TEMPLATES: usize = 2;

fn main() {
    logging::init();

    if let Err(e) = run() {
        log::error!("Bunny Run failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> GameResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {path}");
            GameConfig::load_from_file(&path)?
        }
        None => GameConfig::default(),
    };

    let mut rng = match config.gameplay.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let scene = demo_scene::build(&DemoLayout::for_config(&config.gameplay, SPARE_TEMPLATES));
    let mut game = Game::new(scene, config)?;
    for kind in [EventKind::CountsChanged, EventKind::RoundEnded, EventKind::Eliminated] {
        game.events_mut().register_handler(kind, Box::new(HudLogger));
    }
    game.setup(&mut rng)?;

    let mut time = 0.0_f64;
    game.set_key(KeyCode::W, true);
    while time < TIME_LIMIT && !game.session().is_over() {
        // Weave: steer left for two seconds out of every five.
        game.set_key(KeyCode::A, time % 5.0 < 2.0);
        game.update(time, TICK);
        time += f64::from(TICK);
    }

    let session = game.session();
    let counts = session.counts();
    log::info!(
        "Finished after {time:.1}s: {:?} ({} bunnies stopped, {} carrots stolen, {} bunnies and {} carrots left)",
        session.outcome(),
        session.eliminated(),
        session.deposited(),
        counts.agents,
        counts.items
    );
    Ok(())
}
