use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::{
  CharacterMovementConfig, CharacterVelocity, JumpState, LocomotionState, Player, PlayerSlot,
};
use crate::cloud::{BaseAnchor, CloudTracker};
use crate::config::ConfigLoaded;
use crate::input::{PlayerInput, player_one_actions, player_two_actions};

/// Spawns one player per configured spawn point, assigned in slot
/// order. Runs after the cloud field so the base anchor exists.
pub fn spawn_players(
  mut commands: Commands,
  config: Res<ConfigLoaded>,
  anchors: Query<Entity, With<BaseAnchor>>,
) {
  let player = &config.player;
  let anchor = anchors.single().expect("base anchor must exist before players spawn");

  if player.spawn_points.is_empty() {
    panic!("player.spawn_points must not be empty");
  }

  for (slot, point) in player.spawn_points.iter().enumerate() {
    let spawn_pos = Vec3::new(point[0], point[1], 10.0);
    let color = player.colors[slot % player.colors.len()];

    // Rapier capsule_y uses half_height (cylinder part) and radius
    let half_height = player.collider_length / 2.0;

    let entity = commands
      .spawn((
        Player,
        PlayerSlot(slot),
        Sprite {
          color: Color::srgb(color[0], color[1], color[2]),
          custom_size: Some(Vec2::new(player.size[0], player.size[1])),
          ..default()
        },
        Transform::from_translation(spawn_pos),
        Visibility::default(),
        RigidBody::KinematicPositionBased,
        Collider::capsule_y(half_height, player.collider_radius),
        KinematicCharacterController {
          snap_to_ground: Some(CharacterLength::Absolute(player.snap_to_ground)),
          ..default()
        },
        CharacterVelocity::default(),
        CharacterMovementConfig {
          walk_speed: player.walk_speed,
          acceleration: player.acceleration,
          air_acceleration: player.air_acceleration,
          jump_distance: player.jump_distance,
          jump_secs: player.jump_secs,
        },
        LocomotionState::Airborne, // Start airborne so gravity applies until landing
        JumpState::default(),
        CloudTracker::new(anchor),
        PlayerInput,
      ))
      .id();

    info!("spawned player {slot} at {spawn_pos:?}");

    // First slot gets WASD+Space, later slots arrows+Enter.
    if slot == 0 {
      commands.entity(entity).insert(player_one_actions());
    } else {
      commands.entity(entity).insert(player_two_actions());
    }
  }
}
