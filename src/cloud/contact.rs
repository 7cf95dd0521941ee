use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::Cloud;
use crate::player::components::Player;

/// Broadcast raised when a player stands on a cloud. Carries the source
/// player so that each tracker only reacts to its own player's contacts.
#[derive(bevy::prelude::Message, Debug, Clone, Copy)]
pub struct CloudContact {
  pub player: Entity,
  pub cloud: Entity,
}

/// Reads fresh character-controller output after the rapier writeback
/// and raises a [`CloudContact`] for every cloud the player is standing
/// on this tick. Repeats while standing are fine; the tracker
/// de-duplicates.
pub fn emit_cloud_contacts(
  players: Query<(Entity, Option<&KinematicCharacterControllerOutput>), With<Player>>,
  clouds: Query<(), With<Cloud>>,
  mut contacts: MessageWriter<CloudContact>,
) {
  for (player, output) in &players {
    let Some(output) = output else {
      continue;
    };
    if !output.grounded {
      continue;
    }
    for collision in &output.collisions {
      if clouds.contains(collision.entity) {
        contacts.write(CloudContact {
          player,
          cloud: collision.entity,
        });
      }
    }
  }
}
