mod plugin;

use std::collections::HashMap;

use bevy::{asset::Asset, prelude::*, reflect::TypePath};
pub use plugin::ConfigPlugin;
use serde::{Deserialize, Deserializer, de};

use crate::audio::SfxKind;

#[derive(Asset, TypePath, Deserialize, Debug, Clone)]
pub struct GameConfig {
  pub window: WindowConfig,
  pub camera: CameraConfig,
  pub physics: PhysicsConfig,
  pub world: WorldConfig,
  pub base: BaseConfig,
  pub player: PlayerConfig,
  pub clouds: CloudsConfig,
  pub pool: PoolConfig,
  pub audio: AudioConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WindowConfig {
  pub width: u32,
  pub height: u32,
  pub title: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CameraConfig {
  pub viewport_width: f32,
  pub viewport_height: f32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PhysicsConfig {
  pub gravity: f32,
}

/// Arena bounds and the kill plane. Clouds wrap against the bounds,
/// players respawn below `kill_y`.
#[derive(Deserialize, Debug, Clone)]
pub struct WorldConfig {
  pub x_min: f32,
  pub x_max: f32,
  pub y_min: f32,
  pub y_max: f32,
  pub kill_y: f32,
}

/// The static base platform. Doubles as the fallback anchor when a
/// player's cloud history is empty.
#[derive(Deserialize, Debug, Clone)]
pub struct BaseConfig {
  pub width: f32,
  pub height: f32,
  pub y_position: f32,
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub color: [f32; 3],
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlayerConfig {
  pub walk_speed: f32,
  pub acceleration: f32,
  pub air_acceleration: f32,
  pub jump_distance: f32,
  pub jump_secs: f32,
  pub collider_radius: f32,
  pub collider_length: f32,
  pub snap_to_ground: f32,
  pub size: [f32; 2],
  #[serde(deserialize_with = "deserialize_hex_colors")]
  pub colors: Vec<[f32; 3]>,
  pub spawn_points: Vec<[f32; 2]>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CloudsConfig {
  pub seed: u64,
  pub count: u32,
  pub width: f32,
  pub height: f32,
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub color: [f32; 3],
  pub speed_min: f32,
  pub speed_max: f32,
  pub x_min: f32,
  pub x_max: f32,
  pub y_min: f32,
  pub y_max: f32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PoolConfig {
  pub puff_capacity: usize,
  pub puff_lifetime: f32,
  pub puff_size: f32,
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub puff_color: [f32; 3],
}

#[derive(Deserialize, Debug, Clone)]
pub struct AudioConfig {
  pub music: String,
  pub music_volume: f32,
  pub sfx_volume: f32,
  pub start_with_music: bool,
  pub quit_fade_secs: f32,
  pub sfx: HashMap<SfxKind, String>,
}

fn parse_hex_color<E: de::Error>(s: &str) -> Result<[f32; 3], E> {
  let s = s.trim_start_matches('#');
  if s.len() != 6 {
    return Err(de::Error::custom("hex color must be 6 characters"));
  }
  let r = u8::from_str_radix(&s[0..2], 16).map_err(de::Error::custom)?;
  let g = u8::from_str_radix(&s[2..4], 16).map_err(de::Error::custom)?;
  let b = u8::from_str_radix(&s[4..6], 16).map_err(de::Error::custom)?;
  Ok([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}

fn deserialize_hex_color<'de, D>(deserializer: D) -> Result<[f32; 3], D::Error>
where
  D: Deserializer<'de>,
{
  let s: String = Deserialize::deserialize(deserializer)?;
  parse_hex_color(&s)
}

fn deserialize_hex_colors<'de, D>(deserializer: D) -> Result<Vec<[f32; 3]>, D::Error>
where
  D: Deserializer<'de>,
{
  let strings: Vec<String> = Deserialize::deserialize(deserializer)?;
  strings.iter().map(|s| parse_hex_color(s)).collect()
}

#[derive(Resource)]
pub struct ConfigHandle(pub Handle<GameConfig>);

#[derive(Resource, Debug, Clone)]
pub struct ConfigLoaded {
  pub window: WindowConfig,
  pub camera: CameraConfig,
  pub physics: PhysicsConfig,
  pub world: WorldConfig,
  pub base: BaseConfig,
  pub player: PlayerConfig,
  pub clouds: CloudsConfig,
  pub pool: PoolConfig,
  pub audio: AudioConfig,
}

impl From<GameConfig> for ConfigLoaded {
  fn from(config: GameConfig) -> Self {
    Self {
      window: config.window,
      camera: config.camera,
      physics: config.physics,
      world: config.world,
      base: config.base,
      player: config.player,
      clouds: config.clouds,
      pool: config.pool,
      audio: config.audio,
    }
  }
}
