use bevy::prelude::*;

use super::{Cloud, MoveAxis};
use crate::config::ConfigLoaded;

/// Constant-speed drift along each cloud's fixed axis, once per tick.
pub fn drift_clouds(mut clouds: Query<(&Cloud, &mut Transform)>, time: Res<Time>) {
  let dt = time.delta_secs();
  for (cloud, mut transform) in &mut clouds {
    let direction = match cloud.axis {
      MoveAxis::SideToSide => Vec3::X,
      MoveAxis::UpAndDown => Vec3::Y,
    };
    transform.translation += direction * cloud.speed * dt;
  }
}

/// Clouds that drift past the arena bounds snap back to their start
/// position.
pub fn reset_out_of_bounds(
  mut clouds: Query<(&Cloud, &mut Transform)>,
  config: Res<ConfigLoaded>,
) {
  let world = &config.world;
  for (cloud, mut transform) in &mut clouds {
    let pos = transform.translation;
    if pos.x < world.x_min || pos.x > world.x_max || pos.y < world.y_min || pos.y > world.y_max {
      transform.translation = cloud.start;
    }
  }
}
