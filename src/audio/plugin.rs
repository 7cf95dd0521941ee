use bevy::app::AppExit;
use bevy::audio::Volume;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use super::{FadeOut, MusicCommand, MusicFade, PlaySfx, QuitAfterFade, SfxKind, SoundBank};
use crate::config::ConfigLoaded;

/// Marker for the background music entity.
#[derive(Component)]
struct MusicSink;

pub struct AudioPlugin;

impl Plugin for AudioPlugin {
  fn build(&self, app: &mut App) {
    app
      .add_message::<PlaySfx>()
      .add_message::<MusicCommand>()
      .init_resource::<MusicFade>()
      .init_resource::<QuitAfterFade>()
      .add_systems(Startup, setup_audio)
      .add_systems(
        Update,
        (play_sfx, handle_music_commands, advance_music_fade).chain(),
      );
  }
}

fn setup_audio(
  mut commands: Commands,
  config: Res<ConfigLoaded>,
  asset_server: Res<AssetServer>,
  mut sfx: MessageWriter<PlaySfx>,
) {
  let audio = &config.audio;

  let mut bank = SoundBank::default();
  for (kind, path) in &audio.sfx {
    bank.insert(*kind, asset_server.load(path));
  }
  commands.insert_resource(bank);

  if audio.start_with_music {
    commands.spawn((
      MusicSink,
      AudioPlayer::new(asset_server.load(&audio.music)),
      PlaybackSettings::LOOP.with_volume(Volume::Linear(audio.music_volume)),
    ));
  }

  sfx.write(PlaySfx(SfxKind::GameStart));
}

fn play_sfx(
  mut commands: Commands,
  mut requests: MessageReader<PlaySfx>,
  bank: Res<SoundBank>,
  config: Res<ConfigLoaded>,
) {
  for request in requests.read() {
    let Some(handle) = bank.get(request.0) else {
      warn!("sound {:?} not found!", request.0);
      continue;
    };
    commands.spawn((
      AudioPlayer::new(handle.clone()),
      PlaybackSettings::DESPAWN.with_volume(Volume::Linear(config.audio.sfx_volume)),
    ));
  }
}

fn handle_music_commands(
  mut commands_in: MessageReader<MusicCommand>,
  mut fade: ResMut<MusicFade>,
  config: Res<ConfigLoaded>,
  mut music: Query<&mut AudioSink, With<MusicSink>>,
) {
  for command in commands_in.read() {
    let sink = music.single_mut().ok();
    match command {
      MusicCommand::Pause => {
        if let Some(sink) = sink {
          if !sink.is_paused() {
            sink.pause();
          }
        }
      }
      MusicCommand::Resume => {
        if let Some(sink) = sink {
          if sink.is_paused() {
            sink.play();
          }
        }
      }
      MusicCommand::Stop => {
        fade.0 = None;
        if let Some(sink) = sink {
          sink.stop();
        }
      }
      MusicCommand::SetVolume(volume) => {
        if let Some(mut sink) = sink {
          sink.set_volume(Volume::Linear(volume.clamp(0.0, 1.0)));
        }
      }
      MusicCommand::FadeOut(duration) => {
        fade.0 = Some(FadeOut::new(*duration, config.audio.music_volume));
      }
    }
  }
}

/// Per-tick fade state machine. When the fade bottoms out the sink is
/// stopped; a pending quit then exits the app.
fn advance_music_fade(
  mut fade: ResMut<MusicFade>,
  time: Res<Time>,
  mut music: Query<&mut AudioSink, With<MusicSink>>,
  quit: Res<QuitAfterFade>,
  mut exit: MessageWriter<AppExit>,
) {
  let Some(active) = fade.0.as_mut() else {
    return;
  };

  let volume = active.advance(time.delta_secs());
  let mut sink = music.single_mut().ok();
  if let Some(sink) = sink.as_mut() {
    sink.set_volume(Volume::Linear(volume.max(0.0)));
  }

  // No sink means nothing to fade; finish straight away.
  if active.finished() || sink.is_none() {
    if let Some(sink) = sink {
      sink.stop();
    }
    fade.0 = None;
    if quit.0 {
      exit.write(AppExit::Success);
    }
  }
}

#[cfg(test)]
mod tests {
  use bevy::ecs::message::Messages;

  use super::*;
  use crate::config::{ConfigLoaded, GameConfig};

  fn music_app() -> App {
    let config: GameConfig = toml::from_str(include_str!("../../assets/config/game.config.toml"))
      .expect("shipped config must parse");

    let mut app = App::new();
    app
      .add_plugins(MinimalPlugins)
      .add_message::<MusicCommand>()
      .init_resource::<MusicFade>()
      .init_resource::<QuitAfterFade>()
      .insert_resource(ConfigLoaded::from(config))
      .add_systems(Update, (handle_music_commands, advance_music_fade).chain());
    app
  }

  fn send(app: &mut App, command: MusicCommand) {
    app
      .world_mut()
      .resource_mut::<Messages<MusicCommand>>()
      .write(command);
  }

  #[test]
  fn fade_out_with_pending_quit_exits_after_fade() {
    let mut app = music_app();
    app.world_mut().resource_mut::<QuitAfterFade>().0 = true;

    send(&mut app, MusicCommand::FadeOut(0.0));
    app.update();

    assert!(app.world().resource::<MusicFade>().0.is_none());
    assert!(!app.world().resource::<Messages<AppExit>>().is_empty());
  }

  #[test]
  fn stop_cancels_an_active_fade() {
    let mut app = music_app();
    app.world_mut().resource_mut::<QuitAfterFade>().0 = true;
    app.world_mut().resource_mut::<MusicFade>().0 = Some(FadeOut::new(10.0, 0.8));

    send(&mut app, MusicCommand::Stop);
    app.update();

    // The cancelled fade must not keep ramping, and must not trip the
    // quit-after-fade exit.
    assert!(app.world().resource::<MusicFade>().0.is_none());
    assert!(app.world().resource::<Messages<AppExit>>().is_empty());
  }

  #[test]
  fn sink_commands_without_a_music_sink_are_harmless() {
    let mut app = music_app();
    for command in [
      MusicCommand::Pause,
      MusicCommand::Resume,
      MusicCommand::SetVolume(0.3),
    ] {
      send(&mut app, command);
    }
    app.update();

    assert!(app.world().resource::<MusicFade>().0.is_none());
    assert!(app.world().resource::<Messages<AppExit>>().is_empty());
  }
}
