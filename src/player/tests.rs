use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use super::components::*;
use super::movement;
use crate::core::GravityConfig;

#[test]
fn jump_tween_reaches_target_in_duration() {
  let start = Vec2::new(0.0, 0.0);
  let target = Vec2::new(30.0, 80.0);
  let mut tween = JumpTween::new(start, target, 0.2);

  let mut ticks = 0;
  while !tween.finished() {
    tween.advance(1.0 / 60.0);
    ticks += 1;
    assert!(ticks < 100, "tween should finish within the duration");
  }

  assert!(tween.position().distance(target) < 0.01);
  // 0.2s at 60Hz is 12 ticks
  assert_eq!(ticks, 12);
}

#[test]
fn jump_tween_progress_is_monotonic_and_clamped() {
  let mut tween = JumpTween::new(Vec2::ZERO, Vec2::Y * 50.0, 0.1);
  let mut last = tween.progress();
  for _ in 0..20 {
    tween.advance(0.02);
    let progress = tween.progress();
    assert!(progress >= last);
    assert!(progress <= 1.0);
    last = progress;
  }
  assert!(tween.finished());
}

#[test]
fn held_jump_key_does_not_retrigger_after_tween_ends() {
  let mut jump = JumpState::default();

  // First frame of the press starts a jump.
  assert!(jump.try_press());
  jump.tween = Some(JumpTween::new(Vec2::ZERO, Vec2::Y * 50.0, 0.2));

  // Key still held while the tween runs...
  assert!(!jump.try_press());

  // ...and still held after it finishes: no auto-bunny-hop.
  jump.tween = None;
  assert!(!jump.try_press());
  assert!(!jump.try_press());

  // Release then press again starts the next jump.
  jump.release_press();
  assert!(jump.try_press());
}

#[test]
fn press_released_mid_jump_cannot_restart_until_tween_ends() {
  let mut jump = JumpState::default();

  assert!(jump.try_press());
  jump.tween = Some(JumpTween::new(Vec2::ZERO, Vec2::Y * 50.0, 0.2));

  // Released and re-pressed while still in flight: blocked.
  jump.release_press();
  assert!(!jump.try_press());

  // Once the jump lands the fresh press goes through.
  jump.tween = None;
  assert!(jump.try_press());
}

#[test]
fn zero_duration_tween_completes_immediately() {
  let target = Vec2::new(10.0, 10.0);
  let mut tween = JumpTween::new(Vec2::ZERO, target, 0.0);
  assert_eq!(tween.progress(), 1.0);
  let pos = tween.advance(0.016);
  assert_eq!(pos, target);
  assert!(tween.finished());
}

#[test]
fn player_falls_with_gravity() {
  let mut app = App::new();

  app
    .add_plugins(MinimalPlugins)
    .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(1.0))
    .insert_resource(Time::<Fixed>::from_hz(60.0))
    .insert_resource(GravityConfig { value: 980.0 });

  app
    .add_systems(
      FixedUpdate,
      (
        movement::apply_locomotion_physics,
        movement::apply_velocity_to_controller,
      )
        .chain()
        .before(PhysicsSet::SyncBackend),
    )
    .add_systems(
      FixedUpdate,
      movement::sync_ground_from_physics.after(PhysicsSet::Writeback),
    );

  let spawn_pos = Vec3::new(0.0, 100.0, 0.0);
  let player = app
    .world_mut()
    .spawn((
      Player,
      Transform::from_translation(spawn_pos),
      RigidBody::KinematicPositionBased,
      Collider::capsule_y(5.0, 7.0),
      KinematicCharacterController::default(),
      CharacterVelocity::default(),
      LocomotionState::Airborne,
      JumpState::default(),
    ))
    .id();

  // First update to initialize Rapier
  app.update();

  let initial_pos = app.world().get::<Transform>(player).unwrap().translation;

  // Run many more updates to accumulate simulated time
  for _ in 0..5000 {
    app.update();
  }

  let final_pos = app.world().get::<Transform>(player).unwrap().translation;
  let final_vel = app.world().get::<CharacterVelocity>(player).unwrap().0;
  let delta = initial_pos.y - final_pos.y;

  // With enough time, player should fall a significant distance
  assert!(
    delta > 20.0,
    "Player should fall at least 20 units. Only fell {} units. initial_y={}, final_y={}",
    delta,
    initial_pos.y,
    final_pos.y
  );

  assert!(
    final_vel.y < -100.0,
    "Velocity should be at least -100. vel_y={}",
    final_vel.y
  );
}
