//! Party Arcade headless demo
//!
//! Plays one round of each mini-game with the autopilot at a simulated 60 Hz
//! and prints the resulting leaderboard.
//!
//! Usage: `party-arcade [config.json] [seed]`

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use party_arcade::autopilot::{PursuitAutopilot, SliceAutopilot};
use party_arcade::pursuit::{PursuitEngine, PursuitPhase};
use party_arcade::slice::{SliceEngine, SlicePhase};
use party_arcade::{ArcadeConfig, Leaderboard, LevelId, LocalLeaderboard, ScoreReporter};

const FRAME_DT: f32 = 1.0 / 60.0;
/// Stop a pursuit demo that nobody wins or loses
const MAX_PURSUIT_FRAMES: u32 = 60 * 60 * 5;
const PLAYER_NAME: &str = "Autopilot";

fn main() {
    env_logger::init();
    log::info!("Party Arcade (native) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match ArcadeConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => ArcadeConfig::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed);

    let leaderboard = Rc::new(RefCell::new(LocalLeaderboard::new()));
    let updates = leaderboard.borrow_mut().subscribe_top_scores(3);

    let reporter = |level: u32| {
        ScoreReporter::new(PLAYER_NAME, LevelId(level), Box::new(leaderboard.clone()))
            .with_retries(config.report_retries)
            .on_round_complete(move |score| {
                println!("Round complete on level {}: {}", level, score)
            })
    };

    if let Err(e) = run_slice(&config, reporter(config.slice.level_id), seed) {
        log::error!("Slice game failed to start: {}", e);
    }
    if let Err(e) = run_pursuit(&config, reporter(config.pursuit.level_id), seed) {
        log::error!("Pursuit game failed to start: {}", e);
    }

    for top in updates.try_iter() {
        log::debug!("Top scores now: {:?}", top);
    }

    println!("\nLeaderboard:");
    for (rank, entry) in leaderboard.top_scores(10).iter().enumerate() {
        println!(
            "{:>2}. {:<12} {:>6}  (level {})",
            rank + 1,
            entry.name,
            entry.score,
            entry.level.0
        );
    }
}

fn run_slice(
    config: &ArcadeConfig,
    reporter: ScoreReporter,
    seed: u64,
) -> Result<(), party_arcade::ConfigError> {
    log::info!(
        "Slice demo as {} on level {}",
        reporter.player_name(),
        reporter.level().0
    );
    let mut engine = SliceEngine::new(config.slice.clone(), reporter, seed)?;
    let mut bot = SliceAutopilot::default();

    while engine.phase() == SlicePhase::Playing {
        bot.drive(&mut engine);
        engine.advance(FRAME_DT);
    }

    println!(
        "Slice: {:?} with {} points{}",
        engine.end_reason(),
        engine.score(),
        if engine.reveal_unlocked() { ", reveal unlocked" } else { "" }
    );
    if let Some(best) = engine.reporter().top_scores(1).first() {
        log::info!("Best on the board after slice: {} ({})", best.score, best.name);
    }
    Ok(())
}

fn run_pursuit(
    config: &ArcadeConfig,
    reporter: ScoreReporter,
    seed: u64,
) -> Result<(), party_arcade::LayoutError> {
    let mut engine = PursuitEngine::new(config.pursuit.clone(), reporter, seed)?;
    let mut bot = PursuitAutopilot;
    engine.start();

    let mut frames = 0;
    while engine.phase() == PursuitPhase::Playing && frames < MAX_PURSUIT_FRAMES {
        bot.drive(&mut engine);
        engine.advance(FRAME_DT);
        frames += 1;
    }

    if engine.reveal() {
        println!(
            "Pursuit: {} with {} points, {} beans left",
            if engine.state().won { "won" } else { "caught" },
            engine.final_score().unwrap_or(0),
            engine.state().collectibles_remaining()
        );
    } else {
        println!(
            "Pursuit: stopped after {} frames with {} points",
            frames,
            engine.score()
        );
    }
    Ok(())
}
