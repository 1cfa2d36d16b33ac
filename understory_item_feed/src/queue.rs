// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Many-producer, single-consumer hand-off of item batches.
//!
//! Background work (directory scans, metadata reads) sends finished batches
//! through a [`FeedSender`]. The layout thread owns the only [`FeedReceiver`]
//! and drains it at the start of each layout pass, so the item collection
//! never changes in the middle of a pass and the layout thread never blocks.

use flume::{Receiver, Sender, TryRecvError};
use understory_virtual_grid::ItemChange;

use crate::FeedItems;

/// A unit of work for the layout thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Batch<T> {
    /// Append items after the current ones.
    Append(Vec<T>),
    /// Replace the whole collection.
    Replace(Vec<T>),
    /// Remove every item.
    Clear,
}

/// Errors reported to producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    /// The receiving side was dropped; nothing will consume further batches.
    #[error("item feed receiver has been dropped")]
    Disconnected,
}

/// Producer side of an item feed. Cheap to clone and `Send`.
#[derive(Debug)]
pub struct FeedSender<T> {
    tx: Sender<Batch<T>>,
}

impl<T> Clone for FeedSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> FeedSender<T> {
    /// Queues a batch without blocking.
    pub fn send(&self, batch: Batch<T>) -> Result<(), FeedError> {
        self.tx.send(batch).map_err(|_| FeedError::Disconnected)
    }

    /// Queues `items` to be appended.
    pub fn append(&self, items: Vec<T>) -> Result<(), FeedError> {
        self.send(Batch::Append(items))
    }

    /// Queues a replacement of the whole collection.
    pub fn replace(&self, items: Vec<T>) -> Result<(), FeedError> {
        self.send(Batch::Replace(items))
    }

    /// Queues removal of every item.
    pub fn clear(&self) -> Result<(), FeedError> {
        self.send(Batch::Clear)
    }
}

/// Consumer side of an item feed, owned by the layout thread.
#[derive(Debug)]
pub struct FeedReceiver<T> {
    rx: Receiver<Batch<T>>,
}

impl<T> FeedReceiver<T> {
    /// Number of batches waiting to be drained.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Returns `true` once every sender is gone and the queue is empty.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        self.rx.is_disconnected() && self.rx.is_empty()
    }

    /// Applies every queued batch to `items`, in arrival order, without blocking.
    ///
    /// Returns the resulting changes for the layout engine. Batches that leave
    /// the collection untouched produce no change.
    pub fn drain_into(&self, items: &mut FeedItems<T>) -> Vec<ItemChange> {
        let mut changes = Vec::new();
        loop {
            let batch = match self.rx.try_recv() {
                Ok(batch) => batch,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };
            let change = match batch {
                Batch::Append(batch) => items.append(batch),
                Batch::Replace(batch) => items.replace(batch),
                Batch::Clear => items.clear(),
            };
            changes.extend(change);
        }
        if !changes.is_empty() {
            tracing::debug!(changes = changes.len(), "drained item feed");
        }
        changes
    }
}

/// Creates an unbounded item feed.
#[must_use]
pub fn feed<T>() -> (FeedSender<T>, FeedReceiver<T>) {
    let (tx, rx) = flume::unbounded();
    (FeedSender { tx }, FeedReceiver { rx })
}
