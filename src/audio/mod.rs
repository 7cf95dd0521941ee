//! Sound effects and background music, driven by the `[audio]` config
//! table. Sfx are fire-and-forget one-shots; music is a single looping
//! sink that can be paused, resumed, stopped or faded out.

mod plugin;

use std::collections::HashMap;

use bevy::prelude::*;
pub use plugin::AudioPlugin;
use serde::Deserialize;

/// Logical sound kinds, mapped to clips in `[audio.sfx]`.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SfxKind {
  GameStart,
  GameOver,
  Victory,
  PlayerMove,
  PlayerJump,
  PlayerDie,
}

/// Broadcast: play a one-shot sound effect. Unmapped kinds are dropped
/// with a warning.
#[derive(bevy::prelude::Message, Debug, Clone, Copy)]
pub struct PlaySfx(pub SfxKind);

/// Broadcast: control the background music sink.
#[derive(bevy::prelude::Message, Debug, Clone, Copy)]
pub enum MusicCommand {
  Pause,
  Resume,
  Stop,
  SetVolume(f32),
  FadeOut(f32),
}

/// Kind -> clip handles, built once at startup from the config table.
#[derive(Resource, Default)]
pub struct SoundBank {
  sfx: HashMap<SfxKind, Handle<AudioSource>>,
}

impl SoundBank {
  pub fn insert(&mut self, kind: SfxKind, handle: Handle<AudioSource>) {
    self.sfx.insert(kind, handle);
  }

  pub fn get(&self, kind: SfxKind) -> Option<&Handle<AudioSource>> {
    self.sfx.get(&kind)
  }
}

/// Linear volume ramp down to silence, advanced one tick at a time.
#[derive(Debug, Clone, Copy)]
pub struct FadeOut {
  elapsed: f32,
  duration: f32,
  start_volume: f32,
}

impl FadeOut {
  pub fn new(duration: f32, start_volume: f32) -> Self {
    Self {
      elapsed: 0.0,
      duration,
      start_volume,
    }
  }

  /// Advances the fade and returns the volume for this tick.
  pub fn advance(&mut self, dt: f32) -> f32 {
    self.elapsed = (self.elapsed + dt).min(self.duration);
    self.volume()
  }

  pub fn volume(&self) -> f32 {
    if self.duration <= 0.0 {
      return 0.0;
    }
    self.start_volume * (1.0 - self.elapsed / self.duration)
  }

  pub fn finished(&self) -> bool {
    self.elapsed >= self.duration
  }
}

/// Active music fade, if any.
#[derive(Resource, Default)]
pub struct MusicFade(pub Option<FadeOut>);

/// Set when the app should exit as soon as the music fade completes.
#[derive(Resource, Default)]
pub struct QuitAfterFade(pub bool);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fade_ramps_down_to_silence() {
    let mut fade = FadeOut::new(0.5, 0.8);
    let mut last = fade.volume();
    assert_eq!(last, 0.8);

    while !fade.finished() {
      let volume = fade.advance(1.0 / 60.0);
      assert!(volume <= last);
      last = volume;
    }
    assert_eq!(fade.volume(), 0.0);
  }

  #[test]
  fn zero_duration_fade_is_immediately_silent() {
    let mut fade = FadeOut::new(0.0, 1.0);
    assert_eq!(fade.advance(0.016), 0.0);
    assert!(fade.finished());
  }

  #[test]
  fn unmapped_kind_resolves_to_none() {
    let bank = SoundBank::default();
    assert!(bank.get(SfxKind::Victory).is_none());
  }
}
