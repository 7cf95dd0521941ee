use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::{
  CharacterMovementConfig, CharacterVelocity, JumpState, LocomotionState, Player,
};
use crate::core::GravityConfig;
use crate::input::{Move, PlayerInput};

/// Runs after the rapier writeback to read fresh ground state.
pub fn sync_ground_from_physics(
  mut players: Query<
    (
      &mut LocomotionState,
      &mut CharacterVelocity,
      &JumpState,
      Option<&KinematicCharacterControllerOutput>,
    ),
    With<Player>,
  >,
) {
  for (mut state, mut velocity, jump, output) in &mut players {
    // The tween owns the body while a jump is in flight.
    if jump.is_jumping() {
      continue;
    }

    let physics_grounded = output.is_some_and(|o| o.grounded);

    match *state {
      LocomotionState::Grounded => {
        if !physics_grounded {
          *state = LocomotionState::Airborne;
        }
      }
      LocomotionState::Airborne => {
        if physics_grounded {
          // Landing! Zero vertical velocity and transition to grounded
          velocity.0.y = 0.0;
          *state = LocomotionState::Grounded;
        }
      }
    }
  }
}

pub fn handle_movement_input(
  mut players: Query<
    (
      &Actions<PlayerInput>,
      &mut CharacterVelocity,
      &CharacterMovementConfig,
      &LocomotionState,
      &JumpState,
    ),
    With<Player>,
  >,
  move_actions: Query<(&Action<Move>, &ActionState)>,
  time: Res<Time>,
) {
  for (actions, mut velocity, config, state, jump) in &mut players {
    if jump.is_jumping() {
      continue;
    }

    let mut move_value = 0.0;
    for action_entity in actions.iter() {
      if let Ok((action, action_state)) = move_actions.get(action_entity) {
        // Only use input when action is active (Fired or Ongoing)
        if matches!(action_state, ActionState::Fired | ActionState::Ongoing) {
          move_value = **action;
        }
      }
    }

    let target_velocity_x = move_value * config.walk_speed;
    let accel = if *state == LocomotionState::Grounded {
      config.acceleration
    } else {
      config.air_acceleration
    };

    // Smoothly interpolate horizontal velocity towards target
    let diff = target_velocity_x - velocity.0.x;
    velocity.0.x += diff * accel * time.delta_secs();
  }
}

/// Applies gravity based on locomotion state. Jump displacement is set
/// in advance_jump_tween.
pub fn apply_locomotion_physics(
  mut players: Query<(&mut CharacterVelocity, &LocomotionState, &JumpState), With<Player>>,
  gravity: Res<GravityConfig>,
  time: Res<Time>,
) {
  const TERMINAL_VELOCITY: f32 = 500.0;

  for (mut velocity, state, jump) in &mut players {
    if jump.is_jumping() {
      continue;
    }

    match state {
      LocomotionState::Grounded => {
        // Keep velocity.y at 0 when grounded
        velocity.0.y = 0.0;
      }
      LocomotionState::Airborne => {
        // Apply gravity, clamp to terminal velocity
        velocity.0.y -= gravity.value * time.delta_secs();
        velocity.0.y = velocity.0.y.max(-TERMINAL_VELOCITY);
      }
    }
  }
}

pub fn apply_velocity_to_controller(
  mut players: Query<(&CharacterVelocity, &mut KinematicCharacterController), With<Player>>,
  time: Res<Time>,
) {
  for (velocity, mut controller) in &mut players {
    controller.translation = Some(velocity.0 * time.delta_secs());
  }
}
