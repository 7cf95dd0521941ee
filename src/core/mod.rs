pub(crate) mod camera;

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::audio::{MusicCommand, QuitAfterFade};
use crate::config::ConfigLoaded;

/// Downward acceleration applied to airborne players, in units/s^2.
/// Follows the config on hot reload.
#[derive(Resource)]
pub struct GravityConfig {
  pub value: f32,
}

pub struct CorePlugin;

impl Plugin for CorePlugin {
  fn build(&self, app: &mut App) {
    app
      // Rapier's tolerances scale with the length unit; size it to the
      // player sprite, the smallest collider in the arena.
      .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().with_length_unit(20.0))
      .add_systems(Startup, (camera::setup_camera, setup_gravity))
      .add_systems(Update, quit_on_escape);
  }
}

fn setup_gravity(mut commands: Commands, config: Res<ConfigLoaded>) {
  commands.insert_resource(GravityConfig {
    value: config.physics.gravity,
  });
}

/// Escape fades the music out and exits once the fade finishes.
fn quit_on_escape(
  keys: Res<ButtonInput<KeyCode>>,
  config: Res<ConfigLoaded>,
  mut quit: ResMut<QuitAfterFade>,
  mut music: MessageWriter<MusicCommand>,
) {
  if keys.just_pressed(KeyCode::Escape) && !quit.0 {
    quit.0 = true;
    music.write(MusicCommand::FadeOut(config.audio.quit_fade_secs));
  }
}
