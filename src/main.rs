use bevy::{
  prelude::*,
  window::{PresentMode, WindowResolution},
};
use cloudhop::{audio, cloud, config, core, input, player, pool};

fn main() {
  // WASM: set up panic hook for better error messages
  #[cfg(target_family = "wasm")]
  console_error_panic_hook::set_once();

  // WASM: embed config at compile time (no filesystem access)
  #[cfg(target_family = "wasm")]
  let config_str = include_str!("../assets/config/game.config.toml");
  #[cfg(not(target_family = "wasm"))]
  let config_str =
    std::fs::read_to_string("assets/config/game.config.toml").expect("Failed to read config file");

  let config: config::GameConfig = toml::from_str(&config_str).expect("Failed to parse config");

  let mut app = App::new();

  app.insert_resource(Time::<Fixed>::from_hz(60.0));

  app
    .add_plugins(DefaultPlugins.set(ImagePlugin::default_nearest()).set(
      WindowPlugin {
        primary_window: Some(Window {
          resolution: WindowResolution::new(config.window.width, config.window.height),
          title: config.window.title.clone(),
          // WASM: only Fifo (vsync) is supported on WebGL2
          #[cfg(target_family = "wasm")]
          present_mode: PresentMode::Fifo,
          #[cfg(not(target_family = "wasm"))]
          present_mode: PresentMode::AutoVsync,
          // WASM: target the canvas element
          #[cfg(target_family = "wasm")]
          canvas: Some("#bevy".to_string()),
          #[cfg(target_family = "wasm")]
          fit_canvas_to_parent: true,
          ..default()
        }),
        ..default()
      },
    ))
    .add_plugins(config::ConfigPlugin)
    .add_plugins(core::CorePlugin)
    .add_plugins(input::InputPlugin)
    .add_plugins(cloud::CloudPlugin)
    .add_plugins(player::PlayerPlugin)
    .add_plugins(pool::PoolPlugin)
    .add_plugins(audio::AudioPlugin);

  app.run();
}
