//! Utility types shared across the engine

pub mod coord;
