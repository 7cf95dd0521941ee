pub mod components;
mod jump;
pub mod movement;
mod respawn;
mod spawn;

#[cfg(test)]
mod tests;

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
pub use jump::JumpStarted;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_message::<JumpStarted>()
      .add_systems(Startup, spawn::spawn_players.after(crate::cloud::spawn_cloud_field))
      // Update: jump presses are edge-triggered, read them every frame
      .add_systems(Update, jump::start_jump_on_input)
      .add_systems(
        FixedUpdate,
        (
          jump::advance_jump_tween,         // Tween displacement (owns velocity while jumping)
          movement::handle_movement_input,  // Horizontal movement
          movement::apply_locomotion_physics, // Gravity (Airborne only)
          movement::apply_velocity_to_controller, // Send to physics
        )
          .chain()
          .before(PhysicsSet::SyncBackend),
      )
      // Read physics output AFTER Rapier writeback (still in FixedUpdate)
      .add_systems(
        FixedUpdate,
        (
          movement::sync_ground_from_physics,
          respawn::respawn_fallen_players,
        )
          .chain()
          .after(PhysicsSet::Writeback),
      );
  }
}
