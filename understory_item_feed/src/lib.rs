// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_item_feed --heading-base-level=0

//! Understory Item Feed: hand item batches from background work to a virtual grid.
//!
//! Populating a large grid (scanning a directory, reading metadata) happens off
//! the layout thread. This crate provides the hand-off: producers send
//! finished, already-ordered batches through a [`FeedSender`], and the layout
//! thread drains its [`FeedReceiver`] into a [`FeedItems`] collection at the
//! start of each layout pass. Each drain yields the
//! [`ItemChange`](understory_virtual_grid::ItemChange)s to forward to
//! [`GridLayout::items_changed`](understory_virtual_grid::GridLayout::items_changed).
//!
//! ```rust
//! use understory_item_feed::{FeedItems, feed};
//! use understory_virtual_grid::ItemSource;
//!
//! let (tx, rx) = feed();
//! std::thread::spawn(move || {
//!     tx.append(vec!["a.png", "b.png"]).unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! let mut items = FeedItems::new();
//! let changes = rx.drain_into(&mut items);
//! assert_eq!(changes.len(), 1);
//! assert_eq!(items.len(), 2);
//! ```

mod items;
mod queue;

pub use items::FeedItems;
pub use queue::{Batch, FeedError, FeedReceiver, FeedSender, feed};
