use bevy::prelude::*;

#[derive(Component)]
pub struct Player;

/// Spawn-order slot, used to pick bindings and color.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerSlot(pub usize);

#[derive(Component, Default)]
pub struct CharacterVelocity(pub Vec2);

#[derive(Component)]
pub struct CharacterMovementConfig {
  pub walk_speed: f32,
  pub acceleration: f32,
  pub air_acceleration: f32,
  pub jump_distance: f32,
  pub jump_secs: f32,
}

#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocomotionState {
  #[default]
  Grounded,
  Airborne,
}

/// Fixed-duration jump interpolation, advanced one tick at a time.
/// Replaces what a scripting runtime would express as a coroutine.
#[derive(Debug, Clone, Copy)]
pub struct JumpTween {
  pub start: Vec2,
  pub target: Vec2,
  elapsed: f32,
  duration: f32,
}

impl JumpTween {
  pub fn new(start: Vec2, target: Vec2, duration: f32) -> Self {
    Self {
      start,
      target,
      elapsed: 0.0,
      duration,
    }
  }

  /// Advances the tween and returns the new position along the arc.
  pub fn advance(&mut self, dt: f32) -> Vec2 {
    self.elapsed = (self.elapsed + dt).min(self.duration);
    self.position()
  }

  pub fn position(&self) -> Vec2 {
    self.start.lerp(self.target, self.progress())
  }

  pub fn progress(&self) -> f32 {
    if self.duration <= 0.0 {
      1.0
    } else {
      self.elapsed / self.duration
    }
  }

  pub fn finished(&self) -> bool {
    self.elapsed >= self.duration
  }
}

/// At most one jump at a time; a new jump cannot start while one is
/// active. The key must be released and pressed again between jumps —
/// the action stays Fired every frame the key is held.
#[derive(Component, Default)]
pub struct JumpState {
  pub tween: Option<JumpTween>,
  pressed: bool,
}

impl JumpState {
  pub fn is_jumping(&self) -> bool {
    self.tween.is_some()
  }

  /// Latches the press. True only on the first call after
  /// [`release_press`](Self::release_press), and never while a jump is
  /// in flight.
  pub fn try_press(&mut self) -> bool {
    if self.pressed || self.tween.is_some() {
      return false;
    }
    self.pressed = true;
    true
  }

  pub fn release_press(&mut self) {
    self.pressed = false;
  }
}
