use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

use super::actions::{Jump, Move, PlayerInput};

/// Bindings for the first spawn slot: A/D to move, Space to jump.
pub fn player_one_actions() -> impl Bundle {
  actions!(PlayerInput[
      (
          Action::<Move>::new(),
          Bindings::spawn(Bidirectional::ad_keys()),
      ),
      (
          Action::<Jump>::new(),
          bindings![KeyCode::Space],
      ),
  ])
}

/// Bindings for every later spawn slot: arrows to move, Enter to jump.
pub fn player_two_actions() -> impl Bundle {
  actions!(PlayerInput[
      (
          Action::<Move>::new(),
          Bindings::spawn(Bidirectional::left_right_arrow()),
      ),
      (
          Action::<Jump>::new(),
          bindings![KeyCode::Enter],
      ),
  ])
}
