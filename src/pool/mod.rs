//! Fixed-capacity object pool.
//!
//! Entries are built eagerly from a factory closure and recycled through
//! [`Pool::acquire`] / [`Pool::release`] instead of being reallocated.
//! The pool owns every entry for its whole lifetime; callers only ever
//! hold a [`PoolHandle`].

mod plugin;

use std::sync::atomic::{AtomicU64, Ordering};

pub use plugin::{PoolPlugin, Puff, PuffPool};
use thiserror::Error;

/// Entries must be able to clear their per-use state before being
/// handed out again.
pub trait Poolable {
  fn reset(&mut self);
}

/// Opaque handle to a pooled entry. Valid until released. Tagged with
/// the pool that minted it, so a handle presented to any other pool is
/// rejected as foreign even when its index happens to be in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle {
  index: usize,
  pool: u64,
}

impl PoolHandle {
  pub fn index(&self) -> usize {
    self.index
  }
}

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
  /// Pool capacity must be positive. Fatal at startup.
  #[error("pool capacity must be positive")]
  InvalidCapacity,
  /// Nothing available even after topping up. The caller may retry
  /// next frame or drop the request.
  #[error("pool exhausted: all {0} entries are in use")]
  Exhausted(usize),
  /// The entry behind this handle is not currently in use.
  #[error("entry {0} released twice")]
  DoubleRelease(usize),
  /// The handle does not belong to this pool.
  #[error("handle {0} is foreign to this pool")]
  ForeignHandle(usize),
}

struct Entry<T> {
  value: T,
  active: bool,
}

/// When the available stack drains to this point, `acquire` tops the
/// pool back up to capacity before popping.
const LOW_WATER_MARK: usize = 2;

pub struct Pool<T: Poolable> {
  id: u64,
  entries: Vec<Entry<T>>,
  available: Vec<PoolHandle>,
  max_capacity: usize,
  factory: Box<dyn Fn() -> T + Send + Sync>,
  dispensed: u64,
  in_use: usize,
}

impl<T: Poolable> Pool<T> {
  /// Eagerly builds `max_capacity` inactive entries.
  pub fn new(
    factory: impl Fn() -> T + Send + Sync + 'static,
    max_capacity: usize,
  ) -> Result<Self, PoolError> {
    if max_capacity == 0 {
      return Err(PoolError::InvalidCapacity);
    }
    let mut pool = Self {
      id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
      entries: Vec::with_capacity(max_capacity),
      available: Vec::with_capacity(max_capacity),
      max_capacity,
      factory: Box::new(factory),
      dispensed: 0,
      in_use: 0,
    };
    pool.top_up();
    Ok(pool)
  }

  /// Pops an available entry, marks it active and resets it.
  pub fn acquire(&mut self) -> Result<PoolHandle, PoolError> {
    if self.available.len() <= LOW_WATER_MARK {
      self.top_up();
    }
    let handle = self
      .available
      .pop()
      .ok_or(PoolError::Exhausted(self.max_capacity))?;
    let entry = &mut self.entries[handle.index];
    entry.active = true;
    entry.value.reset();
    self.dispensed += 1;
    self.in_use += 1;
    Ok(handle)
  }

  /// Returns an entry to the available stack.
  pub fn release(&mut self, handle: PoolHandle) -> Result<(), PoolError> {
    if handle.pool != self.id {
      return Err(PoolError::ForeignHandle(handle.index));
    }
    let entry = self
      .entries
      .get_mut(handle.index)
      .ok_or(PoolError::ForeignHandle(handle.index))?;
    if !entry.active {
      return Err(PoolError::DoubleRelease(handle.index));
    }
    entry.active = false;
    self.available.push(handle);
    self.in_use -= 1;
    Ok(())
  }

  pub fn get(&self, handle: PoolHandle) -> Option<&T> {
    if handle.pool != self.id {
      return None;
    }
    self
      .entries
      .get(handle.index)
      .filter(|e| e.active)
      .map(|e| &e.value)
  }

  pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
    if handle.pool != self.id {
      return None;
    }
    self
      .entries
      .get_mut(handle.index)
      .filter(|e| e.active)
      .map(|e| &mut e.value)
  }

  pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (PoolHandle, &mut T)> {
    let pool = self.id;
    self
      .entries
      .iter_mut()
      .enumerate()
      .filter(|(_, e)| e.active)
      .map(move |(i, e)| (PoolHandle { index: i, pool }, &mut e.value))
  }

  /// Total entries ever dispensed. Diagnostic only.
  pub fn dispensed(&self) -> u64 {
    self.dispensed
  }

  /// Entries currently held by callers. Diagnostic only.
  pub fn in_use(&self) -> usize {
    self.in_use
  }

  pub fn available(&self) -> usize {
    self.available.len()
  }

  pub fn capacity(&self) -> usize {
    self.max_capacity
  }

  /// Constructs entries until the pool holds `max_capacity` in total.
  /// Never exceeds the configured bound.
  fn top_up(&mut self) {
    while self.entries.len() < self.max_capacity {
      let handle = PoolHandle {
        index: self.entries.len(),
        pool: self.id,
      };
      self.entries.push(Entry {
        value: (self.factory)(),
        active: false,
      });
      self.available.push(handle);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Counter {
    value: u32,
    resets: u32,
  }

  impl Poolable for Counter {
    fn reset(&mut self) {
      self.value = 0;
      self.resets += 1;
    }
  }

  fn counter_pool(capacity: usize) -> Pool<Counter> {
    Pool::new(|| Counter { value: 0, resets: 0 }, capacity).unwrap()
  }

  #[test]
  fn zero_capacity_is_a_configuration_error() {
    let err = Pool::new(|| Counter { value: 0, resets: 0 }, 0).err();
    assert_eq!(err, Some(PoolError::InvalidCapacity));
  }

  #[test]
  fn entries_are_built_eagerly() {
    let pool = counter_pool(5);
    assert_eq!(pool.available(), 5);
    assert_eq!(pool.in_use(), 0);
  }

  #[test]
  fn acquire_marks_active_and_resets() {
    let mut pool = counter_pool(3);
    let handle = pool.acquire().unwrap();
    let counter = pool.get(handle).unwrap();
    assert_eq!(counter.resets, 1);
    assert_eq!(pool.in_use(), 1);
    assert_eq!(pool.dispensed(), 1);
  }

  #[test]
  fn no_handle_is_dispensed_twice_while_outstanding() {
    let mut pool = counter_pool(4);
    let mut held = Vec::new();
    for _ in 0..4 {
      let handle = pool.acquire().unwrap();
      assert!(!held.contains(&handle));
      held.push(handle);
    }
  }

  #[test]
  fn release_returns_entry_to_available() {
    let mut pool = counter_pool(2);
    let handle = pool.acquire().unwrap();
    pool.release(handle).unwrap();
    assert_eq!(pool.in_use(), 0);
    assert_eq!(pool.available(), 2);
  }

  #[test]
  fn total_entries_never_exceed_capacity() {
    let mut pool = counter_pool(5);
    // Drain to the low-water mark and keep acquiring; the top-up path
    // must not grow past the configured bound.
    let handles: Vec<_> = (0..5).map(|_| pool.acquire().unwrap()).collect();
    assert_eq!(pool.in_use() + pool.available(), 5);
    assert_eq!(pool.entries.len(), 5);
    for handle in handles {
      pool.release(handle).unwrap();
    }
    assert_eq!(pool.entries.len(), 5);
  }

  #[test]
  fn exhaustion_is_reported_not_panicked() {
    let mut pool = counter_pool(2);
    pool.acquire().unwrap();
    pool.acquire().unwrap();
    assert_eq!(pool.acquire(), Err(PoolError::Exhausted(2)));
  }

  #[test]
  fn double_release_is_rejected() {
    let mut pool = counter_pool(2);
    let handle = pool.acquire().unwrap();
    pool.release(handle).unwrap();
    assert_eq!(pool.release(handle), Err(PoolError::DoubleRelease(handle.index())));
  }

  #[test]
  fn out_of_range_handle_is_rejected() {
    let mut pool = counter_pool(2);
    let bogus = PoolHandle {
      index: 99,
      pool: pool.id,
    };
    assert_eq!(pool.release(bogus), Err(PoolError::ForeignHandle(99)));
  }

  #[test]
  fn handle_from_another_pool_is_rejected() {
    let mut first = counter_pool(2);
    let mut second = counter_pool(2);

    let handle = first.acquire().unwrap();
    // In-range index, wrong pool: must not free the other pool's entry.
    assert_eq!(
      second.release(handle),
      Err(PoolError::ForeignHandle(handle.index()))
    );
    assert!(second.get(handle).is_none());
    assert_eq!(second.available(), 2);

    // The rightful owner still accepts it.
    first.release(handle).unwrap();
    assert_eq!(first.available(), 2);
  }

  #[test]
  fn released_entries_are_reset_on_reacquire() {
    let mut pool = counter_pool(1);
    let handle = pool.acquire().unwrap();
    pool.get_mut(handle).unwrap().value = 41;
    pool.release(handle).unwrap();
    let handle = pool.acquire().unwrap();
    assert_eq!(pool.get(handle).unwrap().value, 0);
    assert_eq!(pool.dispensed(), 2);
  }

  #[test]
  fn counters_track_dispensed_and_in_use() {
    let mut pool = counter_pool(3);
    let a = pool.acquire().unwrap();
    let b = pool.acquire().unwrap();
    pool.release(a).unwrap();
    assert_eq!(pool.dispensed(), 2);
    assert_eq!(pool.in_use(), 1);
    pool.release(b).unwrap();
    assert_eq!(pool.in_use(), 0);
  }
}
