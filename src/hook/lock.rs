// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Non-blocking advisory lock.

use std::sync::atomic::{AtomicBool, Ordering};

/// Advisory lock which is only ever tried, never waited for.
///
/// A caller failing to acquire it is expected to skip the guarded work.
#[derive(Debug, Default)]
pub struct TryLock {
    /// Whether the lock is currently held.
    locked: AtomicBool,
}

impl TryLock {
    /// Creates a new released [`TryLock`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locked: AtomicBool::new(false),
        }
    }

    /// Tries to acquire this [`TryLock`] without blocking.
    ///
    /// Returns [`None`] if it's already held by someone else.
    #[must_use]
    pub fn try_lock(&self) -> Option<TryLockGuard<'_>> {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| TryLockGuard { lock: self })
    }

    /// Indicates whether this [`TryLock`] is currently held.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

/// RAII guard releasing its [`TryLock`] on drop.
#[derive(Debug)]
pub struct TryLockGuard<'a> {
    /// [`TryLock`] held by this guard.
    lock: &'a TryLock,
}

impl Drop for TryLockGuard<'_> {
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}
