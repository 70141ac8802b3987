//! Game state: object records, arena registries, and the shared game instance
//!
//! One `Game` exists per connected player. All structural mutation of the
//! registries and code books goes through [`Game::with_state`], which takes
//! the short exclusive lock; raw registry internals are never exposed to
//! concurrent tasks.

use std::sync::Arc;

use parking_lot::Mutex;
use smallvec::SmallVec;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::GameConfig;
use crate::game::codes::{CodeBooks, GoCategory, GoCode};
use crate::game::constants::{board, codes::MAX_GO_CODES, defaults};
use crate::transport::Transport;
use crate::util::coord::Coord;

/// Unique game instance identifier
pub type GameId = Uuid;

/// Directional record of a subject's awareness of one peer object.
///
/// Edges are not symmetric: two mutually interacting objects require two
/// separate edges, one in each subject's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionEdge {
    pub peer: GoCode,
    pub distance: u32,
    pub seen: bool,
    pub collision: bool,
    /// Contact damage for this collision has already been applied
    pub struck: bool,
}

/// A live game object and its task binding.
///
/// The record and its task are created together and torn down together; the
/// task handle is attached before the spawn lock is released, so no
/// partially constructed record is ever observable.
#[derive(Debug)]
pub struct Go {
    pub code: GoCode,
    pub category: GoCategory,
    pub pos: Coord,
    /// Per-tick movement step for this object's behavior
    pub heading: Coord,
    pub health: i32,
    pub lives: u32,
    pub alive: bool,
    pub active: bool,
    pub gameover: bool,
    pub interactions: SmallVec<[InteractionEdge; 4]>,
    pub task: Option<JoinHandle<()>>,
}

impl Go {
    /// Build a record with the category's starting health and lives
    pub fn new(code: GoCode, category: GoCategory, pos: Coord) -> Self {
        let (health, lives) = match category {
            GoCategory::Player => (defaults::PLAYER_HEALTH, 1),
            GoCategory::Alien => (defaults::ALIEN_HEALTH, defaults::ALIEN_LIVES),
            GoCategory::Pooh => (defaults::POOH_HEALTH, 1),
            GoCategory::Expunger => (defaults::EXPUNGER_HEALTH, 1),
            GoCategory::Baby => (defaults::BABY_HEALTH, defaults::BABY_LIVES),
            GoCategory::Kitty => (defaults::KITTY_HEALTH, defaults::KITTY_LIVES),
        };
        use crate::game::constants::motion;
        let heading = match category {
            GoCategory::Player | GoCategory::Baby => Coord::new(0, 0),
            GoCategory::Alien => Coord::new(0, -motion::ALIEN_STEP),
            GoCategory::Pooh => Coord::new(0, -motion::POOH_STEP),
            GoCategory::Expunger => Coord::new(0, motion::EXPUNGER_STEP),
            GoCategory::Kitty => Coord::new(-motion::KITTY_STEP, 0),
        };
        Self {
            code,
            category,
            pos,
            heading,
            health,
            lives,
            alive: true,
            active: true,
            gameover: false,
            interactions: SmallVec::new(),
            task: None,
        }
    }

    /// True while the object still has health left
    pub fn is_healthy(&self) -> bool {
        self.health > 0
    }

    /// Count of collision edges against peers of the given category
    pub fn colliding_with(&self, category: GoCategory) -> usize {
        self.interactions
            .iter()
            .filter(|e| e.collision && e.peer.category() == category)
            .count()
    }

    /// Collision edges of the given category that have not yet dealt their
    /// contact damage; each is marked so it deals damage exactly once.
    pub fn take_fresh_collisions(&mut self, category: GoCategory) -> usize {
        let mut fresh = 0;
        for edge in self.interactions.iter_mut() {
            if edge.collision && !edge.struck && edge.peer.category() == category {
                edge.struck = true;
                fresh += 1;
            }
        }
        fresh
    }

    /// Whether any peer of the given category is on the interaction list
    pub fn aware_of(&self, category: GoCategory) -> bool {
        self.interactions
            .iter()
            .any(|e| e.peer.category() == category)
    }
}

/// Owning arena of game objects for one category, indexed by code slot.
///
/// Replaces a manually linked list: a record lives in the slot its
/// identifier encodes, so unlink is a `take` and there is no pointer
/// patching on despawn.
#[derive(Debug, Default)]
pub struct Registry {
    slots: [Option<Go>; MAX_GO_CODES],
}

impl Registry {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Place a record in the slot its code encodes.
    ///
    /// The pool guarantees the slot is free; a stale occupant would mean the
    /// code was double-issued, which is asserted against in debug builds.
    pub fn insert(&mut self, go: Go) {
        let slot = go.code.slot();
        debug_assert!(self.slots[slot].is_none(), "duplicate code issuance");
        self.slots[slot] = Some(go);
    }

    /// Take a record out of the arena, if present
    pub fn remove(&mut self, code: GoCode) -> Option<Go> {
        self.slots[code.slot()].take()
    }

    pub fn get(&self, code: GoCode) -> Option<&Go> {
        self.slots[code.slot()].as_ref()
    }

    pub fn get_mut(&mut self, code: GoCode) -> Option<&mut Go> {
        self.slots[code.slot()].as_mut()
    }

    /// Iterate live records
    pub fn iter_live(&self) -> impl Iterator<Item = &Go> {
        self.slots.iter().filter_map(|s| s.as_ref())
    }

    /// Iterate live records mutably
    pub fn iter_live_mut(&mut self) -> impl Iterator<Item = &mut Go> {
        self.slots.iter_mut().filter_map(|s| s.as_mut())
    }

    /// Drain every record out of the arena
    pub fn drain(&mut self) -> impl Iterator<Item = Go> + '_ {
        self.slots.iter_mut().filter_map(|s| s.take())
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.live_count() == 0
    }
}

/// Supervisor phase for one game instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Session created, player object not yet active
    WaitingForPlayer,
    /// A round is in progress
    Active,
    /// The player just lost a life
    RoundOver,
    /// All lives exhausted; game torn down
    GameOver,
}

/// All mutable state of one game instance
#[derive(Debug)]
pub struct GameState {
    pub score: u32,
    pub game_level: u32,
    pub phase: GamePhase,
    pub books: CodeBooks,
    pub player: Registry,
    pub aliens: Registry,
    pub poohs: Registry,
    pub expungers: Registry,
    pub babies: Registry,
    pub kitties: Registry,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            score: 0,
            game_level: 1,
            phase: GamePhase::WaitingForPlayer,
            books: CodeBooks::new(),
            player: Registry::new(),
            aliens: Registry::new(),
            poohs: Registry::new(),
            expungers: Registry::new(),
            babies: Registry::new(),
            kitties: Registry::new(),
        }
    }

    pub fn registry(&self, category: GoCategory) -> &Registry {
        match category {
            GoCategory::Player => &self.player,
            GoCategory::Alien => &self.aliens,
            GoCategory::Pooh => &self.poohs,
            GoCategory::Expunger => &self.expungers,
            GoCategory::Baby => &self.babies,
            GoCategory::Kitty => &self.kitties,
        }
    }

    pub fn registry_mut(&mut self, category: GoCategory) -> &mut Registry {
        match category {
            GoCategory::Player => &mut self.player,
            GoCategory::Alien => &mut self.aliens,
            GoCategory::Pooh => &mut self.poohs,
            GoCategory::Expunger => &mut self.expungers,
            GoCategory::Baby => &mut self.babies,
            GoCategory::Kitty => &mut self.kitties,
        }
    }

    /// The player record, if spawned
    pub fn player_go(&self) -> Option<&Go> {
        self.player.iter_live().next()
    }

    /// The player record, mutable
    pub fn player_go_mut(&mut self) -> Option<&mut Go> {
        self.player.iter_live_mut().next()
    }

    /// Whether the player object is currently alive
    pub fn player_alive(&self) -> bool {
        self.player_go().map(|p| p.alive).unwrap_or(false)
    }

    /// Revive and reposition the player for a fresh round
    pub fn reset_board(&mut self) {
        if let Some(player) = self.player_go_mut() {
            player.pos = Coord::new(board::X_MIDDLE, board::Y_BOTTOM);
            player.health = defaults::PLAYER_HEALTH;
            player.alive = true;
            player.interactions.clear();
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// One game instance, shared between the supervisor, the simulation loop,
/// and every game-object task.
pub struct Game {
    pub id: GameId,
    /// Index of the human player owning this instance (announce text only)
    pub player_index: usize,
    pub config: GameConfig,
    pub transport: Arc<dyn Transport>,
    /// Short exclusive sections around structural mutation; never held
    /// across an await point
    state: Mutex<GameState>,
    /// Round-level lock: held by the supervisor for the duration of each
    /// round, guarding the alive/lives transition
    pub round: tokio::sync::Mutex<()>,
}

impl Game {
    pub fn new(
        player_index: usize,
        config: GameConfig,
        transport: Arc<dyn Transport>,
    ) -> GameHandle {
        Arc::new(Self {
            id: Uuid::new_v4(),
            player_index,
            config,
            transport,
            state: Mutex::new(GameState::new()),
            round: tokio::sync::Mutex::new(()),
        })
    }

    /// Run a short exclusive section over the game state
    pub fn with_state<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        let mut state = self.state.lock();
        f(&mut state)
    }
}

/// Shared handle to a game instance
pub type GameHandle = Arc<Game>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::codes::CodeBook;
    use crate::transport::NullTransport;

    fn code_for(category: GoCategory) -> GoCode {
        CodeBook::new(category).acquire().unwrap()
    }

    #[test]
    fn test_go_category_defaults() {
        let alien = Go::new(code_for(GoCategory::Alien), GoCategory::Alien, Coord::default());
        assert_eq!(alien.health, defaults::ALIEN_HEALTH);
        assert_eq!(alien.lives, 1);
        assert!(alien.alive);

        let kitty = Go::new(code_for(GoCategory::Kitty), GoCategory::Kitty, Coord::default());
        assert_eq!(kitty.lives, defaults::KITTY_LIVES);
        assert_eq!(kitty.health, defaults::KITTY_HEALTH);
    }

    #[test]
    fn test_registry_insert_remove() {
        let mut registry = Registry::new();
        let code = code_for(GoCategory::Baby);
        registry.insert(Go::new(code, GoCategory::Baby, Coord::new(1, 2)));

        assert_eq!(registry.live_count(), 1);
        assert_eq!(registry.get(code).unwrap().pos, Coord::new(1, 2));

        let removed = registry.remove(code).unwrap();
        assert_eq!(removed.code, code);
        assert!(registry.is_empty());
        assert!(registry.remove(code).is_none());
    }

    #[test]
    fn test_registry_slot_matches_code() {
        let mut book = CodeBook::new(GoCategory::Pooh);
        let mut registry = Registry::new();
        let a = book.acquire().unwrap();
        let b = book.acquire().unwrap();
        registry.insert(Go::new(b, GoCategory::Pooh, Coord::default()));
        registry.insert(Go::new(a, GoCategory::Pooh, Coord::default()));

        // Removal by code touches only the encoded slot
        registry.remove(a);
        assert_eq!(registry.live_count(), 1);
        assert!(registry.get(b).is_some());
    }

    #[test]
    fn test_reset_board_revives_player() {
        let mut state = GameState::new();
        let code = state.books.book_mut(GoCategory::Player).acquire().unwrap();
        state
            .player
            .insert(Go::new(code, GoCategory::Player, Coord::new(0, 0)));

        let player = state.player_go_mut().unwrap();
        player.alive = false;
        player.health = 0;
        assert!(!state.player_alive());

        state.reset_board();
        assert!(state.player_alive());
        let player = state.player_go().unwrap();
        assert_eq!(player.health, defaults::PLAYER_HEALTH);
        assert_eq!(player.pos, Coord::new(board::X_MIDDLE, board::Y_BOTTOM));
    }

    #[test]
    fn test_with_state_short_section() {
        let game = Game::new(0, GameConfig::default(), Arc::new(NullTransport));
        let before = game.with_state(|s| s.score);
        game.with_state(|s| s.score += 10);
        assert_eq!(game.with_state(|s| s.score), before + 10);
    }
}
