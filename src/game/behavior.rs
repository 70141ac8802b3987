//! Per-category game-object behaviors
//!
//! Every live object runs [`run`] as its own task: one short locked tick,
//! then a fixed-duration sleep. Suspension happens only at the sleep, never
//! while the state lock is held, so a hard abort can never land
//! mid-mutation.

use tracing::{debug, info};

use crate::game::chance;
use crate::game::codes::{GoCategory, GoCode};
use crate::game::constants::{board, damage, score};
use crate::game::spawn;
use crate::game::state::{GameHandle, GameState, Go};
use crate::util::coord::Coord;

/// Outcome of one behavior tick, resolved outside the state lock
enum Step {
    /// Keep going
    Sleep,
    /// Alien dropped a pooh at the given position
    DropPooh(Coord),
    /// Object died or left the board; remove it and stop
    Retire,
    /// Record already gone (torn down externally); just stop
    Gone,
}

/// Task entry point for every game object.
///
/// Dispatch is exclusive: the category is fixed at spawn and selects
/// exactly one tick routine.
pub async fn run(game: GameHandle, code: GoCode) {
    let tick = game.config.go_tick;
    loop {
        let step = game.with_state(|state| tick_once(&game, state, code));
        match step {
            Step::Sleep => {}
            Step::DropPooh(pos) => {
                // Pool exhaustion just suppresses the drop this tick
                let _ = spawn::spawn(&game, GoCategory::Pooh, pos);
            }
            Step::Retire => {
                spawn::despawn(&game, code);
                return;
            }
            Step::Gone => return,
        }
        tokio::time::sleep(tick).await;
    }
}

fn tick_once(game: &GameHandle, state: &mut GameState, code: GoCode) -> Step {
    let category = code.category();

    // Score is settled before re-borrowing the registry mutably
    if category == GoCategory::Alien {
        let destroyed = state.aliens.get(code).is_some_and(|a| !a.is_healthy());
        if destroyed {
            state.score += score::ALIEN_KILL;
            info!("alien {} destroyed, score {}", code, state.score);
            return Step::Retire;
        }
    }

    let Some(go) = state.registry_mut(category).get_mut(code) else {
        return Step::Gone;
    };

    match category {
        GoCategory::Player => tick_player(go),
        GoCategory::Alien => tick_alien(go, &game.config),
        GoCategory::Pooh => tick_pooh(go),
        GoCategory::Expunger => tick_expunger(go),
        GoCategory::Baby => tick_baby(go),
        GoCategory::Kitty => tick_kitty(go),
    }
}

/// The player never self-despawns: the supervisor owns its lifecycle and
/// revives it between rounds.
fn tick_player(go: &mut Go) -> Step {
    if !go.alive {
        return Step::Sleep;
    }
    // Each pooh contact costs health once, not on every tick it lingers
    let hits = go.take_fresh_collisions(GoCategory::Pooh) as i32;
    if hits > 0 {
        go.health -= hits * damage::POOH_CONTACT;
        debug!("player {} hit by {} pooh(s), health {}", go.code, hits, go.health);
    }
    if !go.is_healthy() {
        go.alive = false;
        info!("player {} lost a life", go.code);
    }
    Step::Sleep
}

fn tick_alien(go: &mut Go, config: &crate::config::GameConfig) -> Step {
    let hits = go.colliding_with(GoCategory::Expunger) as i32;
    if hits > 0 {
        go.health -= hits * damage::EXPUNGER_CONTACT;
    }
    // Death is settled by the caller next tick, once the score can be paid

    go.pos += go.heading;
    if go.pos.y < board::Y_BOTTOM {
        go.pos.y = board::Y_TOP;
    }

    // A kitty on the interest list may start the pooh dropping
    if go.aware_of(GoCategory::Kitty)
        && chance::roll(&mut rand::thread_rng(), config.pooh_drop_odds)
    {
        return Step::DropPooh(Coord::new(go.pos.x, go.pos.y - 1));
    }
    Step::Sleep
}

fn tick_pooh(go: &mut Go) -> Step {
    go.pos += go.heading;
    if go.pos.y < 0 {
        return Step::Retire;
    }
    Step::Sleep
}

fn tick_expunger(go: &mut Go) -> Step {
    go.pos += go.heading;
    if go.pos.y > board::HEIGHT {
        return Step::Retire;
    }
    Step::Sleep
}

fn tick_baby(go: &mut Go) -> Step {
    let hits = go.take_fresh_collisions(GoCategory::Pooh) as i32;
    if hits > 0 {
        go.health -= hits * damage::POOH_CONTACT;
        if !go.is_healthy() {
            info!("baby {} lost", go.code);
            return Step::Retire;
        }
    }
    Step::Sleep
}

fn tick_kitty(go: &mut Go) -> Step {
    go.pos += go.heading;
    if go.pos.x <= board::X_LEFT || go.pos.x >= board::X_RIGHT {
        go.heading.x = -go.heading.x;
        go.pos = go.pos.clamped((board::X_LEFT, board::X_RIGHT), (0, board::HEIGHT));
    }
    Step::Sleep
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::codes::CodeBook;
    use crate::game::constants::defaults;
    use crate::game::state::InteractionEdge;

    fn go_with_collision(category: GoCategory, peer_category: GoCategory) -> Go {
        let code = CodeBook::new(category).acquire().unwrap();
        let peer = CodeBook::new(peer_category).acquire().unwrap();
        let mut go = Go::new(code, category, Coord::new(20, 20));
        go.interactions.push(InteractionEdge {
            peer,
            distance: 1,
            seen: true,
            collision: true,
            struck: false,
        });
        go
    }

    #[test]
    fn test_player_damaged_by_pooh_collision() {
        let mut player = go_with_collision(GoCategory::Player, GoCategory::Pooh);
        let before = player.health;
        assert!(matches!(tick_player(&mut player), Step::Sleep));
        assert_eq!(player.health, before - damage::POOH_CONTACT);
        assert!(player.alive);
    }

    #[test]
    fn test_collision_damage_lands_once_while_edge_persists() {
        let mut player = go_with_collision(GoCategory::Player, GoCategory::Pooh);
        tick_player(&mut player);
        let after_first = player.health;

        // The edge is sticky and survives, but the damage does not repeat
        for _ in 0..20 {
            tick_player(&mut player);
        }
        assert_eq!(player.health, after_first);
        assert!(player.alive);
    }

    #[test]
    fn test_player_dies_at_zero_health() {
        let mut player = go_with_collision(GoCategory::Player, GoCategory::Pooh);
        player.health = damage::POOH_CONTACT;
        tick_player(&mut player);
        assert!(!player.alive);
        // Dead player idles; it never retires itself
        assert!(matches!(tick_player(&mut player), Step::Sleep));
    }

    #[test]
    fn test_alien_damaged_by_expunger() {
        let mut alien = go_with_collision(GoCategory::Alien, GoCategory::Expunger);
        let config = crate::config::GameConfig::default();
        tick_alien(&mut alien, &config);
        assert_eq!(alien.health, defaults::ALIEN_HEALTH - damage::EXPUNGER_CONTACT);
    }

    #[test]
    fn test_pooh_retires_below_board() {
        let code = CodeBook::new(GoCategory::Pooh).acquire().unwrap();
        let mut pooh = Go::new(code, GoCategory::Pooh, Coord::new(10, 1));
        assert!(matches!(tick_pooh(&mut pooh), Step::Retire));
    }

    #[test]
    fn test_expunger_retires_above_board() {
        let code = CodeBook::new(GoCategory::Expunger).acquire().unwrap();
        let mut expunger = Go::new(code, GoCategory::Expunger, Coord::new(10, board::HEIGHT));
        assert!(matches!(tick_expunger(&mut expunger), Step::Retire));
    }

    #[test]
    fn test_baby_survives_a_lingering_pooh_edge() {
        let mut baby = go_with_collision(GoCategory::Baby, GoCategory::Pooh);
        for _ in 0..20 {
            assert!(matches!(tick_baby(&mut baby), Step::Sleep));
        }
        assert_eq!(baby.health, defaults::BABY_HEALTH - damage::POOH_CONTACT);
    }

    #[test]
    fn test_baby_retires_when_health_gone() {
        let mut baby = go_with_collision(GoCategory::Baby, GoCategory::Pooh);
        baby.health = damage::POOH_CONTACT;
        assert!(matches!(tick_baby(&mut baby), Step::Retire));
    }

    #[test]
    fn test_kitty_bounces_at_edges() {
        let code = CodeBook::new(GoCategory::Kitty).acquire().unwrap();
        let mut kitty = Go::new(code, GoCategory::Kitty, Coord::new(board::X_LEFT + 1, 8));
        let heading_before = kitty.heading.x;
        tick_kitty(&mut kitty);
        assert_eq!(kitty.heading.x, -heading_before);
        assert!(kitty.pos.x >= board::X_LEFT);
    }
}
