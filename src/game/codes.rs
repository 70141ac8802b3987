//! Fixed-capacity identifier pools for game objects
//!
//! Every live game object holds exactly one code, unique within its
//! category, for its entire lifetime. A category's pool caps how many of
//! that category can be alive at once; exhaustion is a designed difficulty
//! limiter, not an error path the player ever sees.

use thiserror::Error;

use crate::game::constants::codes::MAX_GO_CODES;

/// Game object categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoCategory {
    Player,
    Alien,
    Pooh,
    Expunger,
    Baby,
    Kitty,
}

impl GoCategory {
    /// All categories, in code-nibble order
    pub const ALL: [GoCategory; 6] = [
        GoCategory::Player,
        GoCategory::Alien,
        GoCategory::Pooh,
        GoCategory::Expunger,
        GoCategory::Baby,
        GoCategory::Kitty,
    ];

    /// Bit offset of this category's nibble inside a [`GoCode`]
    const fn shift(self) -> u32 {
        match self {
            GoCategory::Player => 0,
            GoCategory::Alien => 4,
            GoCategory::Pooh => 8,
            GoCategory::Expunger => 12,
            GoCategory::Baby => 16,
            GoCategory::Kitty => 20,
        }
    }

    fn from_nibble(nibble: u32) -> Option<GoCategory> {
        GoCategory::ALL.get(nibble as usize).copied()
    }
}

/// Identifier code for one game object.
///
/// Bit-tagged: `slot + 1` packed into the category's nibble
/// (player `0x0000_000q`, alien `0x0000_00q0`, pooh `0x0000_0q00`,
/// expunger `0x0000_q000`, baby `0x000q_0000`, kitty `0x00q0_0000`).
/// Zero is never a valid code, and codes never collide across categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GoCode(u32);

impl GoCode {
    fn new(category: GoCategory, slot: usize) -> Self {
        debug_assert!(slot < MAX_GO_CODES);
        Self(((slot as u32) + 1) << category.shift())
    }

    /// The category encoded in this code
    pub fn category(self) -> GoCategory {
        let nibble = self.0.trailing_zeros() / 4;
        // A GoCode is only ever built by CodeBook, so the nibble is valid
        GoCategory::from_nibble(nibble).unwrap_or(GoCategory::Player)
    }

    /// The pool slot encoded in this code (also the registry arena index)
    pub fn slot(self) -> usize {
        ((self.0 >> self.category().shift()) - 1) as usize
    }

    /// Raw tagged value, for logging
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for GoCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Identifier pool errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Every slot in the category's pool is held by a live object.
    /// Non-fatal: the spawn attempt is skipped and retried next tick.
    #[error("identifier pool exhausted for {0:?}")]
    Exhausted(GoCategory),
    /// The code is not currently held (already available, or from another
    /// category's book). Indicates a lifecycle invariant was violated
    /// upstream; the pool itself is left uncorrupted.
    #[error("invalid release of code {0:#010x}")]
    InvalidRelease(u32),
}

#[derive(Debug, Clone, Copy)]
struct CodeEntry {
    code: GoCode,
    available: bool,
}

/// Fixed pool of reusable codes for one category
#[derive(Debug, Clone)]
pub struct CodeBook {
    category: GoCategory,
    entries: [CodeEntry; MAX_GO_CODES],
}

impl CodeBook {
    pub fn new(category: GoCategory) -> Self {
        Self {
            category,
            entries: std::array::from_fn(|slot| CodeEntry {
                code: GoCode::new(category, slot),
                available: true,
            }),
        }
    }

    /// Issue the first available code, marking it held.
    ///
    /// No ordering guarantee beyond "first found": callers must not assume
    /// which previously released slot comes back.
    pub fn acquire(&mut self) -> Result<GoCode, PoolError> {
        for entry in &mut self.entries {
            if entry.available {
                entry.available = false;
                return Ok(entry.code);
            }
        }
        Err(PoolError::Exhausted(self.category))
    }

    /// Return a held code to the pool.
    ///
    /// Releasing a code that is not currently held is a programming error:
    /// it is reported, and the pool state is left unchanged.
    pub fn release(&mut self, code: GoCode) -> Result<(), PoolError> {
        match self.entries.iter_mut().find(|e| e.code == code) {
            Some(entry) if !entry.available => {
                entry.available = true;
                Ok(())
            }
            _ => Err(PoolError::InvalidRelease(code.raw())),
        }
    }

    /// Number of codes currently available
    pub fn available_count(&self) -> usize {
        self.entries.iter().filter(|e| e.available).count()
    }

    /// True when no code is held
    pub fn all_available(&self) -> bool {
        self.available_count() == MAX_GO_CODES
    }

    /// Mark every code available, regardless of prior state
    pub fn release_all(&mut self) {
        for entry in &mut self.entries {
            entry.available = true;
        }
    }
}

/// One code book per category
#[derive(Debug, Clone)]
pub struct CodeBooks {
    player: CodeBook,
    alien: CodeBook,
    pooh: CodeBook,
    expunger: CodeBook,
    baby: CodeBook,
    kitty: CodeBook,
}

impl CodeBooks {
    pub fn new() -> Self {
        Self {
            player: CodeBook::new(GoCategory::Player),
            alien: CodeBook::new(GoCategory::Alien),
            pooh: CodeBook::new(GoCategory::Pooh),
            expunger: CodeBook::new(GoCategory::Expunger),
            baby: CodeBook::new(GoCategory::Baby),
            kitty: CodeBook::new(GoCategory::Kitty),
        }
    }

    pub fn book(&self, category: GoCategory) -> &CodeBook {
        match category {
            GoCategory::Player => &self.player,
            GoCategory::Alien => &self.alien,
            GoCategory::Pooh => &self.pooh,
            GoCategory::Expunger => &self.expunger,
            GoCategory::Baby => &self.baby,
            GoCategory::Kitty => &self.kitty,
        }
    }

    pub fn book_mut(&mut self, category: GoCategory) -> &mut CodeBook {
        match category {
            GoCategory::Player => &mut self.player,
            GoCategory::Alien => &mut self.alien,
            GoCategory::Pooh => &mut self.pooh,
            GoCategory::Expunger => &mut self.expunger,
            GoCategory::Baby => &mut self.baby,
            GoCategory::Kitty => &mut self.kitty,
        }
    }

    /// True when every code in every category is available
    pub fn all_available(&self) -> bool {
        GoCategory::ALL
            .iter()
            .all(|&cat| self.book(cat).all_available())
    }

    /// Restore every code in every category
    pub fn release_all(&mut self) {
        for cat in GoCategory::ALL {
            self.book_mut(cat).release_all();
        }
    }
}

impl Default for CodeBooks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for cat in GoCategory::ALL {
            for slot in 0..MAX_GO_CODES {
                let code = GoCode::new(cat, slot);
                assert_eq!(code.category(), cat);
                assert_eq!(code.slot(), slot);
                assert_ne!(code.raw(), 0);
            }
        }
    }

    #[test]
    fn test_codes_unique_across_categories() {
        let mut seen = std::collections::HashSet::new();
        for cat in GoCategory::ALL {
            for slot in 0..MAX_GO_CODES {
                assert!(seen.insert(GoCode::new(cat, slot).raw()));
            }
        }
    }

    #[test]
    fn test_acquire_until_exhausted() {
        let mut book = CodeBook::new(GoCategory::Alien);
        let mut issued = Vec::new();
        for _ in 0..MAX_GO_CODES {
            issued.push(book.acquire().unwrap());
        }
        // All codes distinct
        let unique: std::collections::HashSet<_> =
            issued.iter().map(|c| c.raw()).collect();
        assert_eq!(unique.len(), MAX_GO_CODES);
        // Beyond capacity: exhaustion, no code issued
        assert_eq!(
            book.acquire(),
            Err(PoolError::Exhausted(GoCategory::Alien))
        );
        assert_eq!(book.available_count(), 0);
    }

    #[test]
    fn test_release_makes_slot_reusable() {
        let mut book = CodeBook::new(GoCategory::Baby);
        let codes: Vec<_> = (0..MAX_GO_CODES).map(|_| book.acquire().unwrap()).collect();
        book.release(codes[3]).unwrap();
        assert_eq!(book.available_count(), 1);

        // Some previously released slot is reused; exactly one acquire succeeds
        let again = book.acquire().unwrap();
        assert_eq!(again, codes[3]);
        assert!(book.acquire().is_err());
    }

    #[test]
    fn test_invalid_release_reported_not_corrupting() {
        let mut book = CodeBook::new(GoCategory::Kitty);
        let code = book.acquire().unwrap();
        book.release(code).unwrap();

        // Double release is a distinct, reported error
        assert_eq!(
            book.release(code),
            Err(PoolError::InvalidRelease(code.raw()))
        );
        assert!(book.all_available());

        // Foreign code is rejected too
        let mut other = CodeBook::new(GoCategory::Pooh);
        let foreign = other.acquire().unwrap();
        assert!(book.release(foreign).is_err());
        assert!(book.all_available());
    }

    #[test]
    fn test_release_all_idempotent() {
        let mut books = CodeBooks::new();
        for cat in GoCategory::ALL {
            let _ = books.book_mut(cat).acquire().unwrap();
        }
        assert!(!books.all_available());
        books.release_all();
        assert!(books.all_available());
        books.release_all();
        assert!(books.all_available());
    }
}
