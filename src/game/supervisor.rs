//! Per-player game supervisor
//!
//! One long-lived control loop per human player, driving the phase machine
//! `WaitingForPlayer -> Active -> RoundOver -> {Active | GameOver}`. The
//! supervisor owns the round lock for each round's duration and is the only
//! place the player's alive/lives transition is tested and cleared.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::game::codes::GoCategory;
use crate::game::constants::board;
use crate::game::simulation;
use crate::game::spawn;
use crate::game::state::{GameHandle, GamePhase};
use crate::util::coord::Coord;

/// Supervisor for one game instance
pub struct Supervisor {
    game: GameHandle,
}

impl Supervisor {
    pub fn new(game: GameHandle) -> Self {
        Self { game }
    }

    /// Run the game to completion: rounds repeat while lives remain, then
    /// the whole object graph is torn down and the supervisor terminates.
    pub async fn run(self) {
        let game = self.game;

        // WaitingForPlayer -> Active: give birth to the player object
        let player_code = match spawn::spawn(
            &game,
            GoCategory::Player,
            Coord::new(board::X_MIDDLE, board::Y_BOTTOM),
        ) {
            Ok(code) => code,
            Err(err) => {
                // Cannot happen on a fresh instance; bail loudly if it does
                warn!("game {}: player spawn failed: {}", game.id, err);
                return;
            }
        };
        game.with_state(|state| {
            if let Some(player) = state.player_go_mut() {
                player.lives = game.config.player_lives;
                player.active = true;
            }
        });
        info!(
            "game {}: player {} joined with {} lives",
            game.id, player_code, game.config.player_lives
        );

        loop {
            // One round per lock acquisition
            let _round = game.round.lock().await;

            let active = game
                .with_state(|state| state.player_go().map(|p| p.active))
                .unwrap_or(false);
            if !active {
                break;
            }

            game.with_state(|state| {
                state.phase = GamePhase::Active;
                state.reset_board();
            });
            game.transport
                .send_line(&format!("D: Player {}", game.player_index));
            tokio::time::sleep(game.config.round_intro_delay).await;

            // The impacts loop runs the show for this round
            let sim = tokio::spawn(simulation::run(game.clone(), StdRng::from_entropy()));

            // Keep running until the player loses a life
            while game.with_state(|state| state.player_alive()) {
                tokio::time::sleep(game.config.supervisor_poll).await;
            }

            sim.abort();
            let lives_left = game.with_state(|state| {
                state.phase = GamePhase::RoundOver;
                match state.player_go_mut() {
                    Some(player) => {
                        player.lives = player.lives.saturating_sub(1);
                        player.lives
                    }
                    None => 0,
                }
            });

            if lives_left == 0 {
                game.with_state(|state| {
                    if let Some(player) = state.player_go_mut() {
                        player.gameover = true;
                        player.active = false;
                    }
                    spawn::despawn_all(state);
                    state.phase = GamePhase::GameOver;
                });
                game.transport.send_line("C:clc");
                game.transport.send_line(&format!(
                    "D: Game over, player {} - enter your initials",
                    game.player_index
                ));
                info!("game {}: game over", game.id);
                return;
            }

            info!("game {}: round over, {} lives left", game.id, lives_left);
        }
    }
}
