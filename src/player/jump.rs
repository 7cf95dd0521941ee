//! Jump as a fixed-duration tween toward the held direction. The tween
//! is a per-tick state machine: progress advances each FixedUpdate,
//! there is no suspension.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::components::{
  CharacterMovementConfig, CharacterVelocity, JumpState, JumpTween, LocomotionState, Player,
};
use crate::audio::{PlaySfx, SfxKind};
use crate::input::{Jump, Move, PlayerInput};

/// Raised when a jump starts. The pool plugin listens for this to place
/// a puff sprite at the takeoff point.
#[derive(bevy::prelude::Message, Debug, Clone, Copy)]
pub struct JumpStarted {
  pub player: Entity,
  pub position: Vec2,
}

pub fn start_jump_on_input(
  mut players: Query<
    (
      Entity,
      &Transform,
      &Actions<PlayerInput>,
      &mut JumpState,
      &CharacterMovementConfig,
    ),
    With<Player>,
  >,
  move_actions: Query<(&Action<Move>, &ActionState)>,
  jump_states: Query<&ActionState, With<Action<Jump>>>,
  mut jumps: MessageWriter<JumpStarted>,
  mut sfx: MessageWriter<PlaySfx>,
) {
  for (player, transform, actions, mut jump, config) in &mut players {
    let mut held = false;
    let mut move_value = 0.0;
    for action_entity in actions.iter() {
      if let Ok(action_state) = jump_states.get(action_entity) {
        // The action stays Fired every frame the key is held; latch
        // one jump per press and re-arm on None (key released).
        match action_state {
          ActionState::Fired | ActionState::Ongoing => held = true,
          ActionState::None => jump.release_press(),
          _ => {}
        }
      }
      if let Ok((action, action_state)) = move_actions.get(action_entity) {
        if matches!(action_state, ActionState::Fired | ActionState::Ongoing) {
          move_value = **action;
        }
      }
    }

    if !held || !jump.try_press() {
      continue;
    }

    let start = transform.translation.truncate();
    let direction = Vec2::new(move_value, 1.0).normalize_or(Vec2::Y);
    let target = start + direction * config.jump_distance;

    jump.tween = Some(JumpTween::new(start, target, config.jump_secs));
    jumps.write(JumpStarted {
      player,
      position: start,
    });
    sfx.write(PlaySfx(SfxKind::PlayerJump));
  }
}

/// Advances active jump tweens one tick and converts the resulting
/// displacement into controller velocity.
pub fn advance_jump_tween(
  mut players: Query<
    (
      &Transform,
      &mut JumpState,
      &mut CharacterVelocity,
      &mut LocomotionState,
    ),
    With<Player>,
  >,
  time: Res<Time>,
) {
  let dt = time.delta_secs();
  if dt <= 0.0 {
    return;
  }

  for (transform, mut jump, mut velocity, mut state) in &mut players {
    let Some(tween) = jump.tween.as_mut() else {
      continue;
    };

    let next = tween.advance(dt);
    let current = transform.translation.truncate();
    velocity.0 = (next - current) / dt;

    if tween.finished() {
      jump.tween = None;
      *state = LocomotionState::Airborne;
    }
  }
}
