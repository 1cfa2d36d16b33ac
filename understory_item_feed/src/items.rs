// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `Vec`-backed item storage owned by the layout thread.

use understory_virtual_grid::{ItemChange, ItemSource};

/// Items delivered so far, in the order producers sent them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItems<T> {
    items: Vec<T>,
}

impl<T> Default for FeedItems<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FeedItems<T> {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns the items as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Appends `batch`, reporting the insertion if it added anything.
    pub fn append(&mut self, batch: Vec<T>) -> Option<ItemChange> {
        if batch.is_empty() {
            return None;
        }
        let index = self.items.len();
        let count = batch.len();
        self.items.extend(batch);
        Some(ItemChange::Inserted { index, count })
    }

    /// Replaces every item with `items`.
    ///
    /// Replacing an empty collection with nothing is not a change.
    pub fn replace(&mut self, items: Vec<T>) -> Option<ItemChange> {
        if self.items.is_empty() && items.is_empty() {
            return None;
        }
        self.items = items;
        Some(ItemChange::Reset)
    }

    /// Removes every item.
    pub fn clear(&mut self) -> Option<ItemChange> {
        self.replace(Vec::new())
    }
}

impl<T> ItemSource for FeedItems<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }
}
