//! Idle hand-off queue
//!
//! Unbounded MPMC FIFO of idle objects, shared by returners and renters.
//! `pop` parks the calling task on a [`Notify`] until something is pushed.
//! Besides real objects the queue carries a poison marker, pushed when an
//! object creation fails, so a waiter wakes up and retries creation.

use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam::queue::SegQueue;
use tokio::sync::Notify;

/// An idle object together with the slot that owns it.
pub(crate) struct IdleEntry<T> {
    pub value: T,
    pub slot: usize,
}

pub(crate) enum HandOff<T> {
    Object(IdleEntry<T>),
    /// A creation failed; re-evaluate whether a slot can be claimed.
    Poison,
}

pub(crate) struct IdleQueue<T> {
    items: SegQueue<HandOff<T>>,
    idle: AtomicUsize,
    notify: Notify,
}

impl<T> IdleQueue<T> {
    pub fn new() -> Self {
        Self {
            items: SegQueue::new(),
            idle: AtomicUsize::new(0),
            notify: Notify::new(),
        }
    }

    /// Number of idle objects. Poison markers are not counted.
    pub fn idle_count(&self) -> usize {
        self.idle.load(Ordering::Acquire)
    }

    /// Hand an idle object to the next taker. Never blocks.
    pub fn push(&self, value: T, slot: usize) {
        // count first: a concurrent try_pop must never drive the counter below zero
        self.idle.fetch_add(1, Ordering::AcqRel);
        self.items.push(HandOff::Object(IdleEntry { value, slot }));
        self.notify.notify_one();
    }

    pub fn push_poison(&self) {
        self.items.push(HandOff::Poison);
        self.notify.notify_one();
    }

    pub fn try_pop(&self) -> Option<HandOff<T>> {
        let item = self.items.pop()?;
        if matches!(item, HandOff::Object(_)) {
            self.idle.fetch_sub(1, Ordering::AcqRel);
        }
        Some(item)
    }

    /// Wait until an item can be taken.
    ///
    /// Cancel safe: dropping the future never loses an item, and a wakeup
    /// consumed by a dropped waiter is passed on to the next one.
    pub async fn pop(&self) -> HandOff<T> {
        loop {
            if let Some(item) = self.try_pop() {
                return item;
            }

            let notified = self.notify.notified();
            tokio::pin!(notified);
            // register before the re-check so a push in between is not missed
            notified.as_mut().enable();

            if let Some(item) = self.try_pop() {
                return item;
            }
            notified.await;
        }
    }
}
