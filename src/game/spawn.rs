//! Spawn/despawn orchestration
//!
//! A game object's record and its task are one unit: created together under
//! a single exclusive section, torn down together on the despawn path.
//! Identifier exhaustion fails the spawn before any state is touched, so a
//! failed spawn leaves zero partial state behind.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::game::behavior;
use crate::game::codes::{GoCategory, GoCode, PoolError};
use crate::game::state::{GameHandle, GamePhase, GameState, Go};
use crate::util::coord::Coord;

/// Why a spawn attempt produced no object
#[derive(Debug, Error)]
pub enum SpawnError {
    #[error(transparent)]
    Pool(#[from] PoolError),
    /// The game has been torn down; nothing may repopulate it
    #[error("game is over, spawn refused")]
    GameOver,
}

/// Spawn a game object of the given category and start its behavior task.
///
/// Must be called from within a tokio runtime. The code acquisition, record
/// insertion and task-handle attachment all happen inside one state-lock
/// section; `tokio::spawn` itself never suspends, so the lock is never held
/// across a suspension point. The new task's first action is to take the
/// same lock, so it cannot observe the registry before the record is fully
/// bound.
///
/// Refused outright after game over: bulk teardown and the phase change
/// commit atomically, so no straggler task can repopulate a torn-down game.
pub fn spawn(
    game: &GameHandle,
    category: GoCategory,
    start: Coord,
) -> Result<GoCode, SpawnError> {
    game.with_state(|state| {
        if state.phase == GamePhase::GameOver {
            return Err(SpawnError::GameOver);
        }
        let code = match state.books.book_mut(category).acquire() {
            Ok(code) => code,
            Err(err) => {
                debug!("spawn {:?} skipped: {}", category, err);
                return Err(err.into());
            }
        };

        state.registry_mut(category).insert(Go::new(code, category, start));
        let task = tokio::spawn(behavior::run(game.clone(), code));
        if let Some(go) = state.registry_mut(category).get_mut(code) {
            go.task = Some(task);
        }

        debug!("spawned {:?} {} at ({}, {})", category, code, start.x, start.y);
        Ok(code)
    })
}

/// Tear down one game object: unlink its record, stop its task, release its
/// code.
///
/// Safe for a task to call on itself: removing the record drops a handle to
/// an already-running task (a detach, not an abort), and the caller returns
/// immediately after.
pub fn despawn(game: &GameHandle, code: GoCode) {
    game.with_state(|state| despawn_in_state(state, code));
}

fn despawn_in_state(state: &mut GameState, code: GoCode) {
    let category = code.category();
    let Some(go) = state.registry_mut(category).remove(code) else {
        return;
    };
    if let Some(task) = &go.task {
        task.abort();
    }
    purge_edges_naming(state, code);
    if let Err(err) = state.books.book_mut(category).release(go.code) {
        warn!("despawn of {}: {}", code, err);
    }
    debug!("despawned {:?} {}", category, code);
}

/// Peer-death cleanup: a released code is immediately reissuable, and any
/// edge still naming it would rebind to the next holder. Strip such edges
/// from every subject before the code goes back to the pool.
fn purge_edges_naming(state: &mut GameState, peer: GoCode) {
    for category in GoCategory::ALL {
        for go in state.registry_mut(category).iter_live_mut() {
            go.interactions.retain(|e| e.peer != peer);
        }
    }
}

/// Bulk teardown of a game's entire object graph.
///
/// Aborts every task, drops every record in every category, then restores
/// every identifier in every pool. This is the only bulk-teardown path,
/// invoked once at game-over with the round lock held; abort only lands at
/// an await point and no task holds the state lock across one, so nothing
/// is cancelled mid-mutation.
pub fn despawn_all(state: &mut GameState) {
    let mut dropped = 0usize;
    for category in GoCategory::ALL {
        for go in state.registry_mut(category).drain() {
            if let Some(task) = &go.task {
                task.abort();
            }
            dropped += 1;
        }
    }
    state.books.release_all();
    info!("bulk teardown: {} objects dropped, all pools restored", dropped);
}

/// Fire an expunger from the player's position.
///
/// Input decoding lives outside the engine; this is the operation it
/// invokes. No-op when the player is gone or the expunger pool is dry.
pub fn fire_expunger(game: &GameHandle) -> Option<GoCode> {
    let start = game.with_state(|state| state.player_go().map(|p| p.pos))?;
    spawn(game, GoCategory::Expunger, start).ok()
}
