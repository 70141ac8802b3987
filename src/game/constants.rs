//! Engine tuning constants

/// Identifier pool constants
pub mod codes {
    /// Fixed capacity of each category's identifier pool.
    ///
    /// Codes pack `slot + 1` into a 4-bit nibble, so this must stay <= 15.
    pub const MAX_GO_CODES: usize = 8;
}

/// Proximity thresholds for the interaction tracker (L1 distance)
pub mod proximity {
    /// At or under this distance, subject and object are in collision
    pub const THRESHOLD_COLLISION: u32 = 2;
    /// At or under this distance (and not colliding), the object is seen
    pub const THRESHOLD_SEEN: u32 = 12;
}

/// Board extents and landmark positions (integer cells)
pub mod board {
    pub const WIDTH: i32 = 128;
    pub const HEIGHT: i32 = 64;

    pub const X_LEFT: i32 = 8;
    pub const X_MIDDLE: i32 = WIDTH / 2;
    pub const X_RIGHT: i32 = WIDTH - 8;
    pub const Y_BOTTOM: i32 = 8;
    pub const Y_MIDDLE: i32 = HEIGHT / 2;
    pub const Y_TOP: i32 = HEIGHT - 8;
}

/// Level progression
pub mod level {
    /// Score units per half-level step: the level doubles every
    /// `2 * LEVEL_UP_X` points
    pub const LEVEL_UP_X: u32 = 8;
    /// Clamp on the doubling exponent so `1 << n` stays defined for any score
    pub const MAX_LEVEL_SHIFT: u32 = 16;
}

/// Per-category starting health and lives
pub mod defaults {
    pub const PLAYER_HEALTH: i32 = 1024;
    pub const ALIEN_HEALTH: i32 = 1024;
    pub const ALIEN_LIVES: u32 = 1;
    pub const POOH_HEALTH: i32 = 1;
    pub const EXPUNGER_HEALTH: i32 = 1;
    pub const BABY_HEALTH: i32 = 128;
    pub const BABY_LIVES: u32 = 1;
    pub const KITTY_HEALTH: i32 = 8192;
    pub const KITTY_LIVES: u32 = 9;
}

/// Damage applied per behavior tick while a collision edge is present
pub mod damage {
    /// Pooh contact damage to the player or a baby
    pub const POOH_CONTACT: i32 = 64;
    /// Expunger contact damage to an alien
    pub const EXPUNGER_CONTACT: i32 = 512;
}

/// Scoring
pub mod score {
    /// Points awarded when an alien is destroyed
    pub const ALIEN_KILL: u32 = 4;
}

/// Per-tick movement steps for object behaviors
pub mod motion {
    /// Alien vertical descent per tick
    pub const ALIEN_STEP: i32 = 1;
    /// Pooh fall per tick
    pub const POOH_STEP: i32 = 2;
    /// Expunger climb per tick
    pub const EXPUNGER_STEP: i32 = 4;
    /// Kitty horizontal drift per tick
    pub const KITTY_STEP: i32 = 2;
}
