//! Incremental proximity/interaction tracking
//!
//! Each subject object keeps a list of "objects of interest" with their
//! last measured distance and seen/collision status. The tracker is
//! refreshed once per simulation tick; it tolerates slightly stale peer
//! positions (eventual consistency per tick), so it runs without the round
//! lock.

use crate::game::constants::proximity::{THRESHOLD_COLLISION, THRESHOLD_SEEN};
use crate::game::state::{GameState, Go, InteractionEdge, Registry};

/// Recompute one subject's edges against every object in the peer
/// registries.
///
/// Per peer: classify at the collision and seen thresholds, then
/// - no existing edge: create one only when seen or colliding;
/// - existing non-collision edge: delete it when the peer is now neither
///   seen nor colliding, otherwise overwrite its status;
/// - existing collision edge: never touched. Once two objects have
///   collided the record persists for the peer's lifetime; only the peer's
///   despawn removes it, so while the peer lives the edge (distance
///   included) stays frozen.
pub fn refresh(subject: &mut Go, peers: &[&Registry], t_collision: u32, t_seen: u32) {
    for registry in peers {
        for peer in registry.iter_live() {
            if peer.code == subject.code {
                continue;
            }
            let distance = subject.pos.l1_distance(peer.pos);
            let collision = distance <= t_collision;
            let seen = collision || distance <= t_seen;
            update_edge(subject, peer.code, distance, seen, collision);
        }
    }
}

fn update_edge(
    subject: &mut Go,
    peer: crate::game::codes::GoCode,
    distance: u32,
    seen: bool,
    collision: bool,
) {
    match subject.interactions.iter().position(|e| e.peer == peer) {
        None => {
            // Never insert a neither-seen-nor-colliding edge
            if seen || collision {
                subject.interactions.push(InteractionEdge {
                    peer,
                    distance,
                    seen,
                    collision,
                    struck: false,
                });
            }
        }
        Some(i) => {
            if subject.interactions[i].collision {
                // Sticky collision: the edge outlives any later state
                return;
            }
            if !seen && !collision {
                // Out of range again; works for the sole remaining edge too
                subject.interactions.remove(i);
            } else {
                let edge = &mut subject.interactions[i];
                edge.distance = distance;
                edge.seen = seen;
                edge.collision = collision;
            }
        }
    }
}

/// Refresh every subject's interest list for this tick:
/// aliens against expungers and kitties; the player against poohs, kitties
/// and babies; babies against poohs.
pub fn refresh_all(state: &mut GameState) {
    let GameState {
        player,
        aliens,
        poohs,
        expungers,
        babies,
        kitties,
        ..
    } = state;

    for alien in aliens.iter_live_mut() {
        refresh(
            alien,
            &[&*expungers, &*kitties],
            THRESHOLD_COLLISION,
            THRESHOLD_SEEN,
        );
    }
    for subject in player.iter_live_mut() {
        refresh(
            subject,
            &[&*poohs, &*kitties, &*babies],
            THRESHOLD_COLLISION,
            THRESHOLD_SEEN,
        );
    }
    for baby in babies.iter_live_mut() {
        refresh(baby, &[&*poohs], THRESHOLD_COLLISION, THRESHOLD_SEEN);
    }
}
