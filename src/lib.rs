//! Impacts Engine Library
//!
//! A cooperative real-time simulation engine for an arcade-style multiplayer
//! game. Each human player owns an independent game instance, and every live
//! game object (player, alien, pooh, expunger, baby, kitty) runs as its own
//! concurrently scheduled task mutating shared per-game state under
//! synchronization.
//!
//! The engine owns the game-object lifecycle: a fixed-capacity identifier
//! pool per category, an arena-backed object registry, an incremental
//! proximity/interaction tracker, a spawn/despawn orchestrator, a per-game
//! supervisor state machine, and the per-tick simulation loop. Transport,
//! randomness and the scheduler are consumed substrates, not owned here.

pub mod config;
pub mod util;
pub mod game;
pub mod transport;
