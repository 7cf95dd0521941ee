//! Cloud platforms: drifting kinematics, "stepped on" broadcast and the
//! per-player history tracker.

mod contact;
mod motion;
pub mod tracker;

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;
pub use contact::CloudContact;
use rand::{Rng, SeedableRng, rngs::StdRng};
pub use tracker::CloudTracker;

use crate::config::ConfigLoaded;

/// Axis a cloud drifts along at constant speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveAxis {
  SideToSide,
  UpAndDown,
}

#[derive(Component)]
pub struct Cloud {
  pub axis: MoveAxis,
  pub speed: f32,
  pub start: Vec3,
}

/// The static base platform; fallback anchor for every cloud history.
#[derive(Component)]
pub struct BaseAnchor;

pub struct CloudPlugin;

impl Plugin for CloudPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_message::<CloudContact>()
      .add_systems(Startup, spawn_cloud_field)
      .add_systems(
        FixedUpdate,
        (motion::drift_clouds, motion::reset_out_of_bounds)
          .chain()
          .before(PhysicsSet::SyncBackend),
      )
      .add_systems(
        FixedUpdate,
        (contact::emit_cloud_contacts, tracker::route_cloud_contacts)
          .chain()
          .after(PhysicsSet::Writeback),
      );
  }
}

/// Spawns the base platform plus a seeded random field of clouds.
pub fn spawn_cloud_field(mut commands: Commands, config: Res<ConfigLoaded>) {
  let base = &config.base;
  let clouds = &config.clouds;

  let mut rng = StdRng::seed_from_u64(clouds.seed);

  // Rapier cuboid uses half-extents
  commands.spawn((
    BaseAnchor,
    Sprite {
      color: Color::srgb(base.color[0], base.color[1], base.color[2]),
      custom_size: Some(Vec2::new(base.width, base.height)),
      ..default()
    },
    Transform::from_xyz(0.0, base.y_position, 0.0),
    RigidBody::Fixed,
    Collider::cuboid(base.width / 2.0, base.height / 2.0),
  ));

  for _ in 0..clouds.count {
    let x = rng.random_range(clouds.x_min..clouds.x_max);
    let y = rng.random_range(clouds.y_min..clouds.y_max);
    let axis = if rng.random_bool(0.5) {
      MoveAxis::SideToSide
    } else {
      MoveAxis::UpAndDown
    };
    let speed = rng.random_range(clouds.speed_min..clouds.speed_max)
      * if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let start = Vec3::new(x, y, 0.0);

    commands.spawn((
      Cloud { axis, speed, start },
      Sprite {
        color: Color::srgb(clouds.color[0], clouds.color[1], clouds.color[2]),
        custom_size: Some(Vec2::new(clouds.width, clouds.height)),
        ..default()
      },
      Transform::from_translation(start),
      RigidBody::KinematicPositionBased,
      Collider::cuboid(clouds.width / 2.0, clouds.height / 2.0),
    ));
  }
}
