use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use super::components::{CharacterVelocity, JumpState, LocomotionState, Player};
use crate::audio::{PlaySfx, SfxKind};
use crate::cloud::{BaseAnchor, Cloud, CloudTracker};
use crate::config::ConfigLoaded;

/// Players that fall past the kill plane return to the last cloud in
/// their own history, or to the base anchor when the history is empty.
pub fn respawn_fallen_players(
  mut players: Query<
    (
      Entity,
      &mut Transform,
      &mut CharacterVelocity,
      &mut LocomotionState,
      &mut JumpState,
      &mut CloudTracker,
    ),
    With<Player>,
  >,
  platforms: Query<&Transform, (Or<(With<Cloud>, With<BaseAnchor>)>, Without<Player>)>,
  config: Res<ConfigLoaded>,
  mut sfx: MessageWriter<PlaySfx>,
) {
  let kill_y = config.world.kill_y;
  let land_offset = config.player.size[1] + 4.0;

  for (player, mut transform, mut velocity, mut state, mut jump, mut tracker) in &mut players {
    if transform.translation.y >= kill_y {
      continue;
    }

    // The popped cloud may have despawned; pop_last bottoms out at the
    // anchor, which always exists.
    let mut target = tracker.pop_last();
    while platforms.get(target).is_err() && tracker.count() > 0 {
      target = tracker.pop_last();
    }
    let Ok(platform) = platforms.get(target) else {
      continue;
    };

    info!("player {player:?} fell, respawning on {target:?}");

    transform.translation = platform.translation + Vec3::Y * land_offset;
    velocity.0 = Vec2::ZERO;
    *state = LocomotionState::Airborne;
    jump.tween = None;
    sfx.write(PlaySfx(SfxKind::PlayerDie));
  }
}
