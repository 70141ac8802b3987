//! Game engine core: identifier pools, registries, interaction tracking,
//! spawn orchestration, behaviors, simulation loop and supervisor

pub mod behavior;
pub mod chance;
pub mod codes;
pub mod constants;
pub mod interactions;
pub mod simulation;
pub mod spawn;
pub mod state;
pub mod supervisor;
