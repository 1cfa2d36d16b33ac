// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The item collection a grid virtualizes, and how it reports changes.

use alloc::vec::Vec;

/// An index-addressable, already-ordered collection of items.
///
/// The layout engine only needs the count; hosts use [`ItemSource::get`] to
/// bind item data to realized containers. Item identity must stay stable
/// while the collection is unchanged.
pub trait ItemSource {
    /// Item type handed to containers.
    type Item;

    /// Number of items.
    fn len(&self) -> usize;

    /// Returns `true` if there are no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the item at `index`, if in bounds.
    fn get(&self, index: usize) -> Option<&Self::Item>;
}

impl<T> ItemSource for [T] {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        <[T]>::get(self, index)
    }
}

impl<T> ItemSource for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }
}

/// A structural change to an [`ItemSource`].
///
/// Each change invalidates the current layout; the engine also uses it to
/// keep container bindings pointing at the right items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemChange {
    /// `count` items were inserted before the item previously at `index`.
    Inserted {
        /// Index of the first inserted item.
        index: usize,
        /// Number of inserted items.
        count: usize,
    },
    /// `count` items starting at `index` were removed.
    Removed {
        /// Index of the first removed item.
        index: usize,
        /// Number of removed items.
        count: usize,
    },
    /// The collection was replaced wholesale.
    Reset,
}
