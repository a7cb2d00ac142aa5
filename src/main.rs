//! SK Invaders headless runner
//!
//! Plays one session at a fixed frame rate with a simple autopilot standing
//! in for the touch and accelerometer input, and logs what the HUD, audio
//! and scene-transition collaborators would present.
//!
//! Usage: `sk-invaders [settings.json] [--snapshot]`

use std::path::Path;

use sk_invaders::audio::AudioManager;
use sk_invaders::consts::FRAME_DT;
use sk_invaders::sim::{Category, GameEvent, GameState, TickInput, tick};
use sk_invaders::{Hud, Settings};

/// Give up after this many simulated seconds
const MAX_SECONDS: f64 = 600.0;

fn main() {
    env_logger::init();

    let mut settings_path = None;
    let mut print_snapshot = false;
    for arg in std::env::args().skip(1) {
        if arg == "--snapshot" {
            print_snapshot = true;
        } else {
            settings_path = Some(arg);
        }
    }

    let settings = settings_path
        .as_deref()
        .map(|p| Settings::load(Path::new(p)))
        .unwrap_or_default();

    log::info!("SK Invaders (headless) starting, seed {}", settings.seed);

    let mut state = GameState::with_settings(&settings);
    let audio = AudioManager::from_settings("assets", &settings);
    let mut hud = Hud::new(&state);
    let taps = state.tap_queue();

    let mut now = 0.0;
    while now < MAX_SECONDS {
        now += FRAME_DT;

        let input = autopilot(&state);
        if state.registry.count(Category::ShipBullet) == 0 {
            taps.push(sk_invaders::sim::Tap);
        }
        tick(&mut state, &input, now);

        let events = state.drain_events();
        for playback in audio.play_events(&events) {
            log::trace!("audio: {}", playback.path.display());
        }
        let mut game_over = None;
        for event in &events {
            if hud.apply(event) {
                log::info!("{} | {}", hud.score_label, hud.health_label);
            }
            if let GameEvent::GameOver(reason) = event {
                game_over = Some(*reason);
            }
        }

        if let Some(reason) = game_over {
            let outcome = if reason.is_win() { "You win!" } else { "Game Over!" };
            println!("{outcome} ({reason:?}) after {:.1}s", now);
            println!("{}", hud.score_label);
            println!("{}", hud.health_label);
            break;
        }
    }

    if !state.is_over() {
        log::warn!("Session still running after {MAX_SECONDS}s, stopping");
    }

    if print_snapshot {
        match serde_json::to_string_pretty(&state.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("Failed to serialize snapshot: {err}"),
        }
    }
}

/// Tilt the ship toward the lowest invader above it
fn autopilot(state: &GameState) -> TickInput {
    let Some(ship) = state.registry.get(state.ship) else {
        return TickInput::default();
    };
    let target = state
        .registry
        .live_in(Category::Invader)
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|invader| invader.pos.x);

    let tilt = match target {
        Some(x) => ((x - ship.pos.x) / 40.0 - ship.vel.x / 200.0).clamp(-1.0, 1.0),
        None => 0.0,
    };
    TickInput { tilt }
}
