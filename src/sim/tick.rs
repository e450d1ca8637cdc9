//! Per-frame simulation step
//!
//! [`tick`] advances the state one variable timestep and records what it
//! observed in `state.events`. It never talks to collaborators and never
//! loads levels; the engine reacts to [`GameEvent::GoalReached`].

use glam::Vec2;

use super::collision::{circle_rectangle_contact, circles_overlap};
use super::state::{CollisionLayer, Entity, GameEvent, GamePhase, GameState};
use crate::tuning::Tuning;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Fresh tilt sample, if one arrived since the last tick
    pub tilt: Option<Vec2>,
}

/// Advance the game state by `dt` seconds
///
/// Without a player this is a no-op (nothing to simulate).
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, tuning: &Tuning) {
    state.events.clear();

    if state.phase == GamePhase::Completed {
        return;
    }
    if state.clock_running {
        state.elapsed += dt;
    }
    if state.player().is_none() {
        log::warn!("Tick on level {} without a player", state.level_number);
        return;
    }

    match state.phase {
        GamePhase::Normal => {
            if let Some(tilt) = input.tilt {
                state.acceleration = tilt;
            }
            step_normal(state, dt, tuning);
        }
        GamePhase::Dying => step_dying(state, dt, tuning),
        GamePhase::Reviving => step_reviving(state, dt, tuning),
        // Level change in flight or finished: nothing moves
        GamePhase::Transitioning | GamePhase::Completed => {}
    }
}

/// Integrate, then resolve contacts against every other active entity
fn step_normal(state: &mut GameState, dt: f32, tuning: &Tuning) {
    let Some(player_idx) = state.player else {
        return;
    };

    let player = &mut state.entities[player_idx];
    let previous = player.position;

    player.velocity += state.acceleration * tuning.gravity_factor * dt;
    player.velocity *= tuning.friction;
    player.position += player.velocity * dt;

    let player_circle = player.to_circle();

    // Walls: any contact rolls back to the pre-tick position, and each axis
    // is bounced at most once however many walls were touched.
    let mut wall_normal = Vec2::ZERO;
    let mut touched_wall = false;
    for other in colliders(state, player_idx, CollisionLayer::Solid) {
        if let Some(contact) = circle_rectangle_contact(player_circle, other.to_rectangle()) {
            touched_wall = true;
            wall_normal = wall_normal.max(contact.normal.abs());
        }
    }

    if touched_wall {
        let player = &mut state.entities[player_idx];
        player.position = previous;
        bounce(&mut player.velocity, &mut state.acceleration, wall_normal, tuning);

        let speed = player.velocity.length();
        if speed > tuning.impact_cue_speed {
            state.events.push(GameEvent::WallImpact { speed });
        }
    }

    // Holes and goals see the resolved position
    let player_circle = state.entities[player_idx].to_circle();

    let hit_hazard = colliders(state, player_idx, CollisionLayer::Hazard).any(|hole| {
        let mut hole = hole.to_circle();
        hole.radius -= tuning.hazard_inset;
        circles_overlap(player_circle, hole)
    });
    let hit_goal = colliders(state, player_idx, CollisionLayer::Goal)
        .any(|goal| circles_overlap(player_circle, goal.to_circle()));

    // Reaching a goal wins over falling into a hole on the same tick
    if hit_goal && !state.changing_levels {
        state.changing_levels = true;
        state.phase = GamePhase::Transitioning;
        state.events.push(GameEvent::GoalReached);
    } else if hit_hazard && !matches!(state.phase, GamePhase::Dying | GamePhase::Reviving) {
        start_dying(state);
    }
}

/// Active entities on `layer`, excluding the player, in factory order
fn colliders(
    state: &GameState,
    player_idx: usize,
    layer: CollisionLayer,
) -> impl Iterator<Item = &Entity> {
    state
        .entities
        .iter()
        .enumerate()
        .filter(move |&(idx, e)| idx != player_idx && e.active && e.layer() == Some(layer))
        .map(|(_, e)| e)
}

/// Wall response along each axis the contact normal significantly covers:
/// invert and damp the velocity component and drop the matching tilt input.
pub fn bounce(velocity: &mut Vec2, acceleration: &mut Vec2, normal: Vec2, tuning: &Tuning) {
    if normal.x.abs() > tuning.normal_threshold {
        velocity.x *= -tuning.restitution;
        acceleration.x = 0.0;
    }
    if normal.y.abs() > tuning.normal_threshold {
        velocity.y *= -tuning.restitution;
        acceleration.y = 0.0;
    }
}

fn start_dying(state: &mut GameState) {
    if let Some(scale) = state.player().map(|p| p.scale) {
        state.rest_scale = scale;
    }
    state.phase = GamePhase::Dying;
    state.animation_timer = 0.0;
    state.events.push(GameEvent::HazardDeath);
    log::debug!("Player fell into a hole on level {}", state.level_number);
}

/// Shrink toward zero, then respawn at the level start
fn step_dying(state: &mut GameState, dt: f32, tuning: &Tuning) {
    state.animation_timer += dt;
    let progress = state.animation_timer / tuning.animation_duration;
    let rest = state.rest_scale;
    let start = state.player_start;
    let done = state.animation_timer >= tuning.animation_duration;

    let Some(player) = state.player_mut() else {
        return;
    };

    if !done {
        player.scale = rest * (1.0 - progress);
        return;
    }

    player.scale = Vec2::ZERO;
    player.position = start;
    player.velocity = Vec2::ZERO;
    state.acceleration = Vec2::ZERO;
    state.animation_timer = 0.0;
    state.phase = GamePhase::Reviving;
}

/// Grow back to the captured rest scale
fn step_reviving(state: &mut GameState, dt: f32, tuning: &Tuning) {
    state.animation_timer += dt;
    let progress = state.animation_timer / tuning.animation_duration;
    let rest = state.rest_scale;
    let done = state.animation_timer >= tuning.animation_duration;

    let Some(player) = state.player_mut() else {
        return;
    };

    if !done {
        player.scale = rest * progress;
        return;
    }

    player.scale = rest;
    state.animation_timer = 0.0;
    state.phase = GamePhase::Normal;
}
