//! Per-player history of clouds stood on, most recent on top. Backs the
//! "return to the last safe platform" respawn behavior.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use super::CloudContact;

/// One tracker per player entity. The fallback anchor is returned
/// whenever the history is empty; an empty history is a valid state,
/// never an error.
#[derive(Component)]
pub struct CloudTracker {
  history: Vec<Entity>,
  anchor: Entity,
}

impl CloudTracker {
  pub fn new(anchor: Entity) -> Self {
    Self {
      history: Vec::new(),
      anchor,
    }
  }

  /// Records a cloud contact and reports whether it was pushed.
  /// Consecutive repeats of the same cloud are suppressed; distinct
  /// re-entries of an earlier cloud are kept.
  pub fn on_cloud_entered(&mut self, cloud: Entity) -> bool {
    if self.history.last() == Some(&cloud) {
      return false;
    }
    self.history.push(cloud);
    true
  }

  /// Top of the history without removing it, or the anchor when empty.
  pub fn peek_last(&self) -> Entity {
    *self.history.last().unwrap_or(&self.anchor)
  }

  /// Removes and returns the top of the history, or the anchor when
  /// empty (depth stays at zero, no underflow).
  pub fn pop_last(&mut self) -> Entity {
    self.history.pop().unwrap_or(self.anchor)
  }

  pub fn clear(&mut self) {
    self.history.clear();
  }

  pub fn count(&self) -> usize {
    self.history.len()
  }
}

/// Drains the contact broadcast and applies each contact to the source
/// player's own tracker. Single system on the main schedule, so every
/// contact is fully applied before the next one is processed.
pub fn route_cloud_contacts(
  mut contacts: MessageReader<CloudContact>,
  mut trackers: Query<&mut CloudTracker>,
) {
  for contact in contacts.read() {
    let Ok(mut tracker) = trackers.get_mut(contact.player) else {
      continue;
    };
    if tracker.on_cloud_entered(contact.cloud) {
      debug!("player {:?} stepped on cloud {:?}", contact.player, contact.cloud);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Mints `count` distinct entities; the first is used as the anchor.
  fn entities(count: usize) -> Vec<Entity> {
    let mut world = World::new();
    (0..count).map(|_| world.spawn_empty().id()).collect()
  }

  #[test]
  fn empty_history_resolves_to_anchor() {
    let ids = entities(1);
    let tracker = CloudTracker::new(ids[0]);
    assert_eq!(tracker.peek_last(), ids[0]);
    assert_eq!(tracker.count(), 0);
  }

  #[test]
  fn pop_on_empty_returns_anchor_without_underflow() {
    let ids = entities(1);
    let mut tracker = CloudTracker::new(ids[0]);
    assert_eq!(tracker.pop_last(), ids[0]);
    assert_eq!(tracker.count(), 0);
  }

  #[test]
  fn consecutive_repeats_are_suppressed() {
    let ids = entities(2);
    let mut tracker = CloudTracker::new(ids[0]);
    assert!(tracker.on_cloud_entered(ids[1]));
    assert!(!tracker.on_cloud_entered(ids[1]));
    assert!(!tracker.on_cloud_entered(ids[1]));
    assert_eq!(tracker.count(), 1);
    assert_eq!(tracker.peek_last(), ids[1]);
  }

  #[test]
  fn distinct_reentries_are_kept() {
    let ids = entities(3);
    let mut tracker = CloudTracker::new(ids[0]);
    let (a, b) = (ids[1], ids[2]);
    tracker.on_cloud_entered(a);
    tracker.on_cloud_entered(b);
    tracker.on_cloud_entered(a);
    assert_eq!(tracker.count(), 3);
    assert_eq!(tracker.pop_last(), a);
    assert_eq!(tracker.pop_last(), b);
    assert_eq!(tracker.pop_last(), a);
    assert_eq!(tracker.pop_last(), ids[0]);
  }

  #[test]
  fn peek_does_not_modify_history() {
    let ids = entities(2);
    let mut tracker = CloudTracker::new(ids[0]);
    tracker.on_cloud_entered(ids[1]);
    tracker.peek_last();
    tracker.peek_last();
    assert_eq!(tracker.count(), 1);
  }

  #[test]
  fn clear_empties_unconditionally() {
    let ids = entities(5);
    let mut tracker = CloudTracker::new(ids[0]);
    for id in &ids[1..] {
      tracker.on_cloud_entered(*id);
    }
    tracker.clear();
    assert_eq!(tracker.count(), 0);
    assert_eq!(tracker.peek_last(), ids[0]);
  }
}
