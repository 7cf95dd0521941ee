use bevy::{camera::ScalingMode, prelude::*};

use crate::config::ConfigLoaded;

/// Marker component for the game camera
#[derive(Component)]
pub struct GameCamera;

/// Fixed orthographic 2D camera showing the whole arena.
pub fn setup_camera(mut commands: Commands, config: Res<ConfigLoaded>) {
  commands.spawn((
    GameCamera,
    Camera2d,
    Camera {
      order: 0,
      clear_color: ClearColorConfig::Custom(Color::srgb(0.35, 0.55, 0.85)),
      ..default()
    },
    Projection::Orthographic(OrthographicProjection {
      near: -1000.0,
      far: 1000.0,
      scale: 1.0,
      viewport_origin: Vec2::new(0.5, 0.5),
      scaling_mode: ScalingMode::AutoMin {
        min_width: config.camera.viewport_width,
        min_height: config.camera.viewport_height,
      },
      area: Rect::default(),
    }),
  ));
}
