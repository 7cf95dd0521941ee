//! Pools the jump-puff sprites. A puff is acquired when a player jumps
//! and released back when its lifetime runs out. Visibility of puff
//! entities is owned by this module alone.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use super::{Pool, Poolable};
use crate::config::ConfigLoaded;
use crate::player::JumpStarted;

/// Pooled per-puff state. The sprite entity itself lives in the ECS and
/// is looked up through [`PuffEntities`] by handle index.
pub struct Puff {
  ttl: f32,
}

impl Poolable for Puff {
  fn reset(&mut self) {
    self.ttl = 0.0;
  }
}

#[derive(Resource)]
pub struct PuffPool(pub Pool<Puff>);

/// Handle index -> sprite entity, fixed at startup.
#[derive(Resource)]
struct PuffEntities(Vec<Entity>);

#[derive(Component)]
struct PuffSprite;

pub struct PoolPlugin;

impl Plugin for PoolPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_systems(Startup, setup_puff_pool)
      .add_systems(Update, (spawn_puff_on_jump, expire_puffs).chain());
  }
}

fn setup_puff_pool(mut commands: Commands, config: Res<ConfigLoaded>) {
  let pool_config = &config.pool;

  let pool = Pool::new(|| Puff { ttl: 0.0 }, pool_config.puff_capacity)
    .expect("puff_capacity must be positive");

  let color = pool_config.puff_color;
  let entities: Vec<Entity> = (0..pool_config.puff_capacity)
    .map(|_| {
      commands
        .spawn((
          PuffSprite,
          Sprite {
            color: Color::srgb(color[0], color[1], color[2]),
            custom_size: Some(Vec2::splat(pool_config.puff_size)),
            ..default()
          },
          Transform::default(),
          Visibility::Hidden,
        ))
        .id()
    })
    .collect();

  commands.insert_resource(PuffPool(pool));
  commands.insert_resource(PuffEntities(entities));
}

fn spawn_puff_on_jump(
  mut jumps: MessageReader<JumpStarted>,
  mut pool: ResMut<PuffPool>,
  entities: Res<PuffEntities>,
  config: Res<ConfigLoaded>,
  mut sprites: Query<(&mut Transform, &mut Visibility), With<PuffSprite>>,
) {
  for jump in jumps.read() {
    let handle = match pool.0.acquire() {
      Ok(handle) => handle,
      Err(err) => {
        // Recoverable: skip the puff for this frame.
        debug!("no puff for jump: {err}");
        continue;
      }
    };

    if let Some(puff) = pool.0.get_mut(handle) {
      puff.ttl = config.pool.puff_lifetime;
    }
    if let Ok((mut transform, mut visibility)) = sprites.get_mut(entities.0[handle.index()]) {
      transform.translation = jump.position.extend(50.0);
      *visibility = Visibility::Visible;
    }
  }
}

fn expire_puffs(
  time: Res<Time>,
  mut pool: ResMut<PuffPool>,
  entities: Res<PuffEntities>,
  mut sprites: Query<&mut Visibility, With<PuffSprite>>,
) {
  let dt = time.delta_secs();
  let mut expired = Vec::new();
  for (handle, puff) in pool.0.iter_active_mut() {
    puff.ttl -= dt;
    if puff.ttl <= 0.0 {
      expired.push(handle);
    }
  }

  for handle in expired {
    if let Err(err) = pool.0.release(handle) {
      warn!("puff release failed: {err}");
      continue;
    }
    if let Ok(mut visibility) = sprites.get_mut(entities.0[handle.index()]) {
      *visibility = Visibility::Hidden;
    }
  }
}
