//! Ballista entry point
//!
//! Headless demo driver: runs the simulation with the autopilot at a fixed
//! 60 Hz and logs the HUD. Usage: `ballista [seed] [difficulty] [seconds]`.
//! `BALLISTA_SETTINGS` may point at a JSON settings file.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ballista::Settings;
    use ballista::settings::DifficultyPreset;
    use ballista::sim::{GameEvent, GameState, TickInput, tick};

    const SIM_DT: f32 = 1.0 / 60.0;

    env_logger::init();
    log::info!("Ballista (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok()).unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });
    let preset = args.next().and_then(|s| DifficultyPreset::from_str(&s));
    let seconds = args.next().and_then(|s| s.parse::<u32>().ok()).unwrap_or(120);

    let mut settings = match std::env::var("BALLISTA_SETTINGS") {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Settings::from_json(&json).unwrap_or_else(|e| {
                log::error!("Invalid settings in {}: {}", path, e);
                Settings::default()
            }),
            Err(e) => {
                log::error!("Cannot read {}: {}", path, e);
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    };
    if let Some(preset) = preset {
        settings.difficulty = preset;
    }

    let mut state = GameState::new(seed, settings);
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let frames = seconds * 60;
    for frame in 0..frames {
        tick(&mut state, &input, SIM_DT);
        for event in state.events() {
            if let GameEvent::RoundCleared(summary) = event {
                log::info!(
                    "HUD: round {} | score {} | shots since hit {} | next {:?}",
                    summary.round,
                    state.score(),
                    state.shots_since_last_hit(),
                    state.upcoming_variants().iter().take(3).map(|v| v.as_str()).collect::<Vec<_>>()
                );
            }
        }
        if frame % (60 * 10) == 0 {
            log::debug!(
                "t={:.0}s targets alive {} projectiles {} active launcher {}",
                state.time(),
                state.targets_alive(),
                state.pool().len(),
                state.active_launcher().0
            );
        }
    }

    let board = state.scoreboard();
    log::info!(
        "Finished {} s: round {}, score {}, best round {:?}, average shots {:?}",
        seconds,
        state.round(),
        state.score(),
        board.best().map(|b| b.round),
        board.average_shots()
    );
    match serde_json::to_string_pretty(board) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Cannot serialize scoreboard: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host embeds the library directly; nothing to run here
}
