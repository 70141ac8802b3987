//! Engine configuration
//!
//! Defaults are tuned for the real game cadence; tests shrink the tick
//! durations to keep lifecycle tests fast. Environment overrides follow the
//! usual deployment pattern (`.env` via dotenvy, then process environment).

use std::time::Duration;

use crate::game::chance::Likelihood;

/// Per-game tuning
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Lives the human player starts with
    pub player_lives: u32,
    /// Simulation loop tick interval
    pub sim_tick: Duration,
    /// Game-object behavior tick interval
    pub go_tick: Duration,
    /// Supervisor polling cadence on the player's alive flag
    pub supervisor_poll: Duration,
    /// Pause after announcing a round, before the action starts
    pub round_intro_delay: Duration,
    /// Gate on spawning an alien when the population is below target
    pub alien_spawn_odds: Likelihood,
    /// Gate on spawning a kitty when the population is below target
    pub kitty_spawn_odds: Likelihood,
    /// Gate on an alien dropping a pooh while a kitty is around
    pub pooh_drop_odds: Likelihood,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_lives: 3,
            sim_tick: Duration::from_millis(50),
            go_tick: Duration::from_millis(50),
            supervisor_poll: Duration::from_millis(100),
            round_intro_delay: Duration::from_secs(5),
            alien_spawn_odds: Likelihood::QuiteLikely,
            kitty_spawn_odds: Likelihood::Maybe,
            pooh_drop_odds: Likelihood::Maybe,
        }
    }
}

impl GameConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        dotenvy::dotenv().ok();
        let mut config = Self::default();

        if let Ok(lives) = std::env::var("PLAYER_LIVES") {
            if let Ok(parsed) = lives.parse::<u32>() {
                if parsed > 0 {
                    config.player_lives = parsed;
                } else {
                    tracing::warn!("PLAYER_LIVES must be > 0, using default");
                }
            } else {
                tracing::warn!("Invalid PLAYER_LIVES '{}', using default", lives);
            }
        }

        if let Some(ms) = Self::env_ms("SIM_TICK_MS") {
            config.sim_tick = ms;
        }
        if let Some(ms) = Self::env_ms("GO_TICK_MS") {
            config.go_tick = ms;
        }
        if let Some(ms) = Self::env_ms("SUPERVISOR_POLL_MS") {
            config.supervisor_poll = ms;
        }

        config
    }

    fn env_ms(name: &str) -> Option<Duration> {
        let raw = std::env::var(name).ok()?;
        match raw.parse::<u64>() {
            Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
            _ => {
                tracing::warn!("Invalid {} '{}', using default", name, raw);
                None
            }
        }
    }

    /// Fast cadences for lifecycle tests
    pub fn fast() -> Self {
        Self {
            player_lives: 1,
            sim_tick: Duration::from_millis(5),
            go_tick: Duration::from_millis(5),
            supervisor_poll: Duration::from_millis(5),
            round_intro_delay: Duration::from_millis(1),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_sane() {
        let config = GameConfig::default();
        assert!(config.player_lives > 0);
        assert!(config.sim_tick > Duration::ZERO);
        assert!(config.supervisor_poll > Duration::ZERO);
    }

    #[test]
    fn test_fast_profile_shrinks_cadence() {
        let fast = GameConfig::fast();
        assert!(fast.sim_tick < GameConfig::default().sim_tick);
        assert_eq!(fast.player_lives, 1);
    }
}
