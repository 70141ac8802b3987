//! Per-tick simulation driver ("impacts" loop)
//!
//! One loop per game instance: recomputes the level from the score, tops up
//! the alien and kitty populations behind weighted-random gates, then
//! refreshes every subject's interaction list. Runs until the supervisor
//! aborts it at round end. Interaction refresh deliberately runs without
//! the round lock: slightly stale peer positions are acceptable, fresh per
//! tick.

use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::game::chance;
use crate::game::codes::GoCategory;
use crate::game::constants::board;
use crate::game::constants::level::{LEVEL_UP_X, MAX_LEVEL_SHIFT};
use crate::game::interactions;
use crate::game::spawn;
use crate::game::state::GameHandle;
use crate::util::coord::Coord;

/// Level doubles every `2 * LEVEL_UP_X` points: score 0 is level 1
pub fn level_for_score(score: u32) -> u32 {
    let exponent = (score / (2 * LEVEL_UP_X)).min(MAX_LEVEL_SHIFT);
    1 << exponent
}

/// Simulation loop task for one game instance.
///
/// The RNG is handed in so tests can seed it; identifier exhaustion simply
/// suppresses a spawn attempt until a slot frees up.
pub async fn run(game: GameHandle, mut rng: StdRng) {
    info!("simulation loop started for game {}", game.id);

    // Opening wave: one alien, two babies to protect
    let _ = spawn::spawn(
        &game,
        GoCategory::Alien,
        Coord::new(board::X_MIDDLE, board::Y_MIDDLE),
    );
    let _ = spawn::spawn(
        &game,
        GoCategory::Baby,
        Coord::new(board::X_LEFT, board::Y_BOTTOM),
    );
    let _ = spawn::spawn(
        &game,
        GoCategory::Baby,
        Coord::new(board::X_MIDDLE, board::Y_BOTTOM),
    );

    let tick = game.config.sim_tick;
    loop {
        let (alien_deficit, kitty_deficit) = game.with_state(|state| {
            state.game_level = level_for_score(state.score);
            let level = state.game_level as usize;
            (
                state.aliens.live_count() < level + 1,
                state.kitties.live_count() < level,
            )
        });

        // Aliens should number level + 1
        if alien_deficit && chance::roll(&mut rng, game.config.alien_spawn_odds) {
            let _ = spawn::spawn(
                &game,
                GoCategory::Alien,
                Coord::new(board::X_MIDDLE, board::Y_MIDDLE),
            );
        }

        // Kitties should number level, and show up far more rarely
        if kitty_deficit && chance::roll(&mut rng, game.config.kitty_spawn_odds) {
            if spawn::spawn(
                &game,
                GoCategory::Kitty,
                Coord::new(board::X_RIGHT, board::Y_BOTTOM),
            )
            .is_ok()
            {
                debug!("a kitty showed up in game {}", game.id);
            }
        }

        game.with_state(interactions::refresh_all);

        tokio::time::sleep(tick).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use rand::SeedableRng;

    use crate::config::GameConfig;
    use crate::game::chance::Likelihood;
    use crate::game::state::Game;
    use crate::transport::NullTransport;

    #[test]
    fn test_level_doubles_per_threshold() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(2 * LEVEL_UP_X - 1), 1);
        assert_eq!(level_for_score(2 * LEVEL_UP_X), 2);
        assert_eq!(level_for_score(4 * LEVEL_UP_X), 4);
        assert_eq!(level_for_score(6 * LEVEL_UP_X), 8);
    }

    #[test]
    fn test_level_clamped_for_huge_scores() {
        assert_eq!(level_for_score(u32::MAX), 1 << MAX_LEVEL_SHIFT);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_loop_spawns_opening_wave_and_tops_up_aliens() {
        let mut config = GameConfig::fast();
        config.alien_spawn_odds = Likelihood::HighlyLikely;
        let game = Game::new(0, config, Arc::new(NullTransport));

        let sim = tokio::spawn(run(game.clone(), StdRng::seed_from_u64(1)));
        tokio::time::sleep(Duration::from_millis(80)).await;
        sim.abort();

        game.with_state(|state| {
            assert!(state.aliens.live_count() >= 1, "opening alien present");
            assert_eq!(state.babies.live_count(), 2, "two babies protected");
            // Level 1 caps the alien population at level + 1
            assert!(state.aliens.live_count() <= 2);
            assert_eq!(state.game_level, 1);
        });
    }
}
