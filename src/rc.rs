//! Scope pointers.
//!
//! A subject keeps its registry behind one of two shared, mutable pointers:
//! [`MutRc`] for single-threaded use and [`MutArc`] for use across threads.
//! The traits here let the subject and its handles be written once against
//! either scope.

use std::{
  cell::{Ref, RefCell, RefMut},
  ops::{Deref, DerefMut},
  rc::{self, Rc},
  sync::{self, Arc, Mutex, MutexGuard, PoisonError, TryLockError},
  thread::{self, ThreadId},
};

pub trait RcDeref {
  type Target;
  type Guard<'a>: Deref<Target = Self::Target>
  where
    Self: 'a;

  fn rc_deref(&self) -> Self::Guard<'_>;
}

pub trait RcDerefMut: RcDeref {
  type GuardMut<'a>: DerefMut<Target = Self::Target>
  where
    Self: 'a;

  fn rc_deref_mut(&self) -> Self::GuardMut<'_>;

  /// Access the value unless the current thread already holds it.
  ///
  /// Returns `None` when the access would re-enter a borrow or lock taken
  /// further up this thread's stack. A holder on another thread is waited
  /// for.
  fn reentrant_deref_mut(&self) -> Option<Self::GuardMut<'_>>;
}

/// Pointers that can hand out a non-owning back-reference.
pub trait Downgrade {
  type Weak: Clone;

  fn downgrade(&self) -> Self::Weak;
}

#[derive(Default)]
pub struct MutRc<T>(Rc<RefCell<T>>);

#[derive(Default)]
pub struct MutArc<T>(Arc<ArcCell<T>>);

pub struct WeakRc<T>(rc::Weak<RefCell<T>>);

pub struct WeakArc<T>(sync::Weak<ArcCell<T>>);

/// A mutex that remembers which thread holds it.
#[derive(Default)]
struct ArcCell<T> {
  value: Mutex<T>,
  holder: Mutex<Option<ThreadId>>,
}

/// Guard of a [`MutArc`]. Clears the recorded holder before unlocking.
pub struct MutArcGuard<'a, T> {
  guard: MutexGuard<'a, T>,
  holder: &'a Mutex<Option<ThreadId>>,
}

// A panicking observer poisons the mutex it ran under. The registry stays
// consistent across such a panic, so the guard is recovered.
impl<T> ArcCell<T> {
  fn new(value: T) -> Self { Self { value: Mutex::new(value), holder: Mutex::new(None) } }

  fn lock(&self) -> MutArcGuard<'_, T> {
    let guard = self.value.lock().unwrap_or_else(PoisonError::into_inner);
    self.enter(guard)
  }

  fn lock_unless_held(&self) -> Option<MutArcGuard<'_, T>> {
    match self.value.try_lock() {
      Ok(guard) => Some(self.enter(guard)),
      Err(TryLockError::Poisoned(poisoned)) => Some(self.enter(poisoned.into_inner())),
      Err(TryLockError::WouldBlock) => {
        let held_here = *self.holder.lock().unwrap_or_else(PoisonError::into_inner)
          == Some(thread::current().id());
        if held_here { None } else { Some(self.lock()) }
      }
    }
  }

  fn enter<'a>(&'a self, guard: MutexGuard<'a, T>) -> MutArcGuard<'a, T> {
    *self.holder.lock().unwrap_or_else(PoisonError::into_inner) = Some(thread::current().id());
    MutArcGuard { guard, holder: &self.holder }
  }
}

impl<T> Deref for MutArcGuard<'_, T> {
  type Target = T;

  #[inline]
  fn deref(&self) -> &T { &self.guard }
}

impl<T> DerefMut for MutArcGuard<'_, T> {
  #[inline]
  fn deref_mut(&mut self) -> &mut T { &mut self.guard }
}

impl<T> Drop for MutArcGuard<'_, T> {
  fn drop(&mut self) { *self.holder.lock().unwrap_or_else(PoisonError::into_inner) = None; }
}

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }
}

impl<T> MutArc<T> {
  pub fn own(t: T) -> Self { Self(Arc::new(ArcCell::new(t))) }
}

impl<T> WeakRc<T> {
  pub fn upgrade(&self) -> Option<MutRc<T>> { self.0.upgrade().map(MutRc) }
}

impl<T> WeakArc<T> {
  pub fn upgrade(&self) -> Option<MutArc<T>> { self.0.upgrade().map(MutArc) }
}

impl<T> From<T> for MutRc<T> {
  #[inline]
  fn from(t: T) -> Self { Self::own(t) }
}

impl<T> From<T> for MutArc<T> {
  #[inline]
  fn from(t: T) -> Self { Self::own(t) }
}

impl<T> RcDeref for MutRc<T> {
  type Target = T;
  type Guard<'a>
    = Ref<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref(&self) -> Self::Guard<'_> { self.0.borrow() }
}

impl<T> RcDerefMut for MutRc<T> {
  type GuardMut<'a>
    = RefMut<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref_mut(&self) -> Self::GuardMut<'_> { self.0.borrow_mut() }

  // Single-threaded: any outstanding borrow belongs to this thread.
  #[inline]
  fn reentrant_deref_mut(&self) -> Option<Self::GuardMut<'_>> { self.0.try_borrow_mut().ok() }
}

impl<T> RcDeref for MutArc<T> {
  type Target = T;
  type Guard<'a>
    = MutArcGuard<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref(&self) -> Self::Guard<'_> { self.0.lock() }
}

impl<T> RcDerefMut for MutArc<T> {
  type GuardMut<'a>
    = MutArcGuard<'a, T>
  where
    Self: 'a;

  #[inline]
  fn rc_deref_mut(&self) -> Self::GuardMut<'_> { self.0.lock() }

  #[inline]
  fn reentrant_deref_mut(&self) -> Option<Self::GuardMut<'_>> { self.0.lock_unless_held() }
}

impl<T> Downgrade for MutRc<T> {
  type Weak = WeakRc<T>;

  #[inline]
  fn downgrade(&self) -> Self::Weak { WeakRc(Rc::downgrade(&self.0)) }
}

impl<T> Downgrade for MutArc<T> {
  type Weak = WeakArc<T>;

  #[inline]
  fn downgrade(&self) -> Self::Weak { WeakArc(Arc::downgrade(&self.0)) }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for WeakRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for WeakArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reentrant_access_fails_while_borrowed() {
    let rc = MutRc::own(1);
    let guard = rc.rc_deref_mut();
    assert!(rc.reentrant_deref_mut().is_none());
    drop(guard);
    assert!(rc.reentrant_deref_mut().is_some());
  }

  #[test]
  fn reentrant_access_fails_while_locked_by_this_thread() {
    let arc = MutArc::own(1);
    let guard = arc.rc_deref_mut();
    assert!(arc.reentrant_deref_mut().is_none());
    drop(guard);
    *arc.reentrant_deref_mut().unwrap() += 1;
    assert_eq!(*arc.rc_deref(), 2);
  }

  #[test]
  fn reentrant_access_waits_for_other_thread() {
    use std::{sync::mpsc, time::Duration};

    let arc = MutArc::own(0);
    let (locked_tx, locked_rx) = mpsc::channel();
    let c_arc = arc.clone();
    let holder = std::thread::spawn(move || {
      let mut guard = c_arc.rc_deref_mut();
      locked_tx.send(()).unwrap();
      std::thread::sleep(Duration::from_millis(20));
      *guard = 1;
    });

    locked_rx.recv().unwrap();
    let mut guard = arc.reentrant_deref_mut().expect("held by another thread");
    assert_eq!(*guard, 1);
    *guard = 2;
    drop(guard);
    holder.join().unwrap();
    assert_eq!(*arc.rc_deref(), 2);
  }

  #[test]
  fn weak_does_not_keep_alive() {
    let rc = MutRc::own(());
    let weak = rc.downgrade();
    assert!(weak.upgrade().is_some());
    drop(rc);
    assert!(weak.upgrade().is_none());

    let arc = MutArc::own(());
    let weak = arc.downgrade();
    drop(arc);
    assert!(weak.upgrade().is_none());
  }

  #[test]
  fn poisoned_lock_is_recovered() {
    let arc = MutArc::own(0);
    let c_arc = arc.clone();
    let _ = std::thread::spawn(move || {
      let _guard = c_arc.rc_deref_mut();
      panic!("poison");
    })
    .join();
    *arc.rc_deref_mut() = 5;
    assert_eq!(*arc.rc_deref(), 5);
  }
}
