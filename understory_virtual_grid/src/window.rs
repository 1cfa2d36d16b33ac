// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The realized container window and its reconciliation against a visible range.
//!
//! ## Model
//!
//! The window is an arena keyed by item index: an ordered list of
//! `(index, container)` bindings, ascending by index and free of duplicates.
//! Containers are checked out of a [`ContainerHost`] when an index enters the
//! range and returned to it when the index leaves. Containers already bound to
//! an index that stays in range are reused untouched.
//!
//! The position of a binding in the window is also the position of its
//! container among the host's visual children, so the host can keep its child
//! list in the same order with plain insert/remove calls.
//!
//! ## Reconciliation
//!
//! [`ContainerWindow::reconcile`] runs in two phases:
//!
//! 1. Eviction scans bindings from the last position to the first and detaches
//!    every container whose index is outside the range. Walking backwards keeps
//!    the positions of not-yet-visited bindings stable.
//! 2. Generation walks the range in ascending order inside a generation
//!    session, reusing existing bindings and checking out containers for the
//!    gaps. A failed checkout skips that index; the pass continues.

use alloc::vec::Vec;

use kurbo::{Rect, Size};

use crate::{ItemChange, VisibleRange};

/// Host capability that creates, attaches, and positions containers.
///
/// Containers belong to the host; the window only holds them between
/// [`ContainerHost::checkout`] and [`ContainerHost::detach`]. `Container` is
/// typically a cheap handle such as a node id.
pub trait ContainerHost {
    /// Handle to a realized visual container.
    type Container;

    /// Called before a generation pass starting at window position `start_position`.
    fn begin_generation(&mut self, start_position: usize) {
        let _ = start_position;
    }

    /// Called when a generation pass ends, on every exit path.
    fn end_generation(&mut self) {}

    /// Realizes a container for the item at `index`.
    ///
    /// Returning `None` marks a generation failure; that index stays unbound.
    fn checkout(&mut self, index: usize) -> Option<Self::Container>;

    /// One-time preparation of a container newly bound to `index`.
    fn prepare(&mut self, container: &mut Self::Container, index: usize) {
        let _ = (container, index);
    }

    /// Inserts a container among the visual children at `position`.
    ///
    /// `position` equal to the current child count means append.
    fn attach(&mut self, position: usize, container: &Self::Container);

    /// Removes the visual child at `position` and takes the container back.
    fn detach(&mut self, position: usize, container: Self::Container);

    /// Gives a container its desired size.
    fn measure(&mut self, container: &mut Self::Container, size: Size) {
        let _ = (container, size);
    }

    /// Places a container at its final viewport-relative rectangle.
    fn arrange(&mut self, container: &mut Self::Container, rect: Rect);
}

/// Counts from one [`ContainerWindow::reconcile`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Containers detached because their index left the range.
    pub evicted: usize,
    /// Containers checked out for newly visible indices.
    pub realized: usize,
    /// Existing bindings kept in place.
    pub reused: usize,
    /// Indices the host could not realize.
    pub failed: usize,
}

#[derive(Debug)]
struct Slot<C> {
    index: usize,
    container: C,
}

/// Scope of one generation pass.
///
/// Dropping the session ends the pass, so the host's `end_generation` runs
/// on early returns and unwinding alike. Holding the host by unique borrow
/// also rules out a second, nested session.
struct GenerationSession<'h, H: ContainerHost> {
    host: &'h mut H,
}

impl<'h, H: ContainerHost> GenerationSession<'h, H> {
    fn open(host: &'h mut H, start_position: usize) -> Self {
        host.begin_generation(start_position);
        Self { host }
    }
}

impl<H: ContainerHost> Drop for GenerationSession<'_, H> {
    fn drop(&mut self) {
        self.host.end_generation();
    }
}

/// Ordered index-to-container bindings for the realized part of a grid.
#[derive(Debug)]
pub struct ContainerWindow<C> {
    slots: Vec<Slot<C>>,
}

impl<C> Default for ContainerWindow<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> ContainerWindow<C> {
    /// Creates an empty window.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Number of realized containers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing is realized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates `(index, container)` bindings in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &C)> + '_ {
        self.slots.iter().map(|slot| (slot.index, &slot.container))
    }

    /// Iterates bound indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().map(|slot| slot.index)
    }

    /// Returns the window position of the container bound to `index`.
    #[must_use]
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.slots.binary_search_by_key(&index, |slot| slot.index).ok()
    }

    /// Returns the item index bound at window `position`.
    #[must_use]
    pub fn index_at(&self, position: usize) -> Option<usize> {
        self.slots.get(position).map(|slot| slot.index)
    }

    /// Returns the container bound to `index`.
    #[must_use]
    pub fn container_for(&self, index: usize) -> Option<&C> {
        self.position_of(index).map(|position| &self.slots[position].container)
    }

    /// Returns the window position holding `container`.
    #[must_use]
    pub fn position_of_container(&self, container: &C) -> Option<usize>
    where
        C: PartialEq,
    {
        self.slots.iter().position(|slot| slot.container == *container)
    }

    /// Brings the window in line with `range`.
    ///
    /// Afterwards the bound indices are exactly those of `range`, minus any the
    /// host failed to realize, in ascending order. Every container is measured
    /// to `item_size`, including reused ones.
    pub fn reconcile<H>(
        &mut self,
        range: VisibleRange,
        item_size: Size,
        host: &mut H,
    ) -> ReconcileStats
    where
        H: ContainerHost<Container = C>,
    {
        let mut stats = ReconcileStats {
            evicted: self.evict_outside(range, host),
            ..ReconcileStats::default()
        };

        let Some((first, last)) = range.bounds() else {
            return stats;
        };

        // After eviction every binding is in range, but gaps may remain where
        // earlier checkouts failed or items were inserted.
        let mut position = self.slots.partition_point(|slot| slot.index < first);
        let mut session = GenerationSession::open(host, position);
        for index in first..=last {
            if let Some(slot) = self.slots.get_mut(position).filter(|slot| slot.index == index) {
                session.host.measure(&mut slot.container, item_size);
                stats.reused += 1;
                position += 1;
                continue;
            }

            let Some(mut container) = session.host.checkout(index) else {
                tracing::warn!(index, "container generation failed; leaving index unrealized");
                stats.failed += 1;
                continue;
            };
            session.host.attach(position, &container);
            session.host.prepare(&mut container, index);
            session.host.measure(&mut container, item_size);
            self.slots.insert(position, Slot { index, container });
            stats.realized += 1;
            position += 1;
        }
        drop(session);

        tracing::debug!(
            first,
            last,
            evicted = stats.evicted,
            realized = stats.realized,
            reused = stats.reused,
            failed = stats.failed,
            "reconciled container window"
        );
        stats
    }

    /// Detaches every container, last position first.
    ///
    /// Returns how many containers were detached.
    pub fn clear<H>(&mut self, host: &mut H) -> usize
    where
        H: ContainerHost<Container = C>,
    {
        let count = self.slots.len();
        while let Some(slot) = self.slots.pop() {
            host.detach(self.slots.len(), slot.container);
        }
        count
    }

    /// Re-keys bindings after the item collection changed.
    ///
    /// Bindings for removed items are detached; bindings after an insertion
    /// or removal shift with their items. Returns how many containers were
    /// detached.
    pub fn apply_item_change<H>(&mut self, change: ItemChange, host: &mut H) -> usize
    where
        H: ContainerHost<Container = C>,
    {
        match change {
            ItemChange::Inserted { index, count } => {
                for slot in self.slots.iter_mut().filter(|slot| slot.index >= index) {
                    slot.index += count;
                }
                0
            }
            ItemChange::Removed { index, count } => {
                let removed_end = index.saturating_add(count);
                let mut detached = 0;
                for position in (0..self.slots.len()).rev() {
                    let bound = self.slots[position].index;
                    if bound >= removed_end {
                        self.slots[position].index = bound - count;
                    } else if bound >= index {
                        let slot = self.slots.remove(position);
                        host.detach(position, slot.container);
                        detached += 1;
                    }
                }
                detached
            }
            ItemChange::Reset => self.clear(host),
        }
    }

    /// Places every container at the rectangle `place` returns for its index.
    pub fn arrange<H>(&mut self, host: &mut H, mut place: impl FnMut(usize) -> Rect)
    where
        H: ContainerHost<Container = C>,
    {
        for slot in &mut self.slots {
            host.arrange(&mut slot.container, place(slot.index));
        }
    }

    fn evict_outside<H>(&mut self, range: VisibleRange, host: &mut H) -> usize
    where
        H: ContainerHost<Container = C>,
    {
        let mut evicted = 0;
        for position in (0..self.slots.len()).rev() {
            if !range.contains(self.slots[position].index) {
                let slot = self.slots.remove(position);
                host.detach(position, slot.container);
                evicted += 1;
            }
        }
        evicted
    }
}

#[cfg(test)]
pub(crate) mod tests {
    extern crate std;

    use alloc::vec::Vec;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use kurbo::{Rect, Size};

    use super::{ContainerHost, ContainerWindow, ReconcileStats};
    use crate::{ItemChange, VisibleRange};

    /// Host that mirrors the window into a child list and records every call.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingHost {
        pub(crate) children: Vec<u32>,
        pub(crate) next_id: u32,
        pub(crate) pool: Vec<u32>,
        pub(crate) prepared: Vec<(u32, usize)>,
        pub(crate) measured: Vec<(u32, Size)>,
        pub(crate) arranged: Vec<(u32, Rect)>,
        pub(crate) fail_on: Vec<usize>,
        pub(crate) panic_on: Option<usize>,
        pub(crate) sessions_open: usize,
        pub(crate) sessions_closed: usize,
    }

    impl ContainerHost for RecordingHost {
        type Container = u32;

        fn begin_generation(&mut self, _start_position: usize) {
            assert_eq!(
                self.sessions_open, self.sessions_closed,
                "generation sessions must not nest"
            );
            self.sessions_open += 1;
        }

        fn end_generation(&mut self) {
            self.sessions_closed += 1;
        }

        fn checkout(&mut self, index: usize) -> Option<u32> {
            assert_ne!(self.panic_on, Some(index), "host failed while checking out");
            if self.fail_on.contains(&index) {
                return None;
            }
            Some(self.pool.pop().unwrap_or_else(|| {
                self.next_id += 1;
                self.next_id
            }))
        }

        fn prepare(&mut self, container: &mut u32, index: usize) {
            self.prepared.push((*container, index));
        }

        fn attach(&mut self, position: usize, container: &u32) {
            if position == self.children.len() {
                self.children.push(*container);
            } else {
                self.children.insert(position, *container);
            }
        }

        fn detach(&mut self, position: usize, container: u32) {
            assert_eq!(self.children.remove(position), container);
            self.pool.push(container);
        }

        fn measure(&mut self, container: &mut u32, size: Size) {
            self.measured.push((*container, size));
        }

        fn arrange(&mut self, container: &mut u32, rect: Rect) {
            self.arranged.push((*container, rect));
        }
    }

    const ITEM: Size = Size::new(10.0, 10.0);

    fn assert_mirrors(window: &ContainerWindow<u32>, host: &RecordingHost) {
        let bound: Vec<u32> = window.iter().map(|(_, container)| *container).collect();
        assert_eq!(bound, host.children);
    }

    #[test]
    fn fills_an_empty_window() {
        let mut window = ContainerWindow::new();
        let mut host = RecordingHost::default();
        let stats = window.reconcile(VisibleRange::inclusive(0, 4), ITEM, &mut host);
        assert_eq!(
            stats,
            ReconcileStats {
                evicted: 0,
                realized: 5,
                reused: 0,
                failed: 0
            }
        );
        assert_eq!(window.indices().collect::<Vec<_>>(), [0, 1, 2, 3, 4]);
        assert_eq!(host.prepared.len(), 5);
        assert_eq!(host.measured.len(), 5);
        assert!(host.measured.iter().all(|(_, size)| *size == ITEM));
        assert_eq!((host.sessions_open, host.sessions_closed), (1, 1));
        assert_mirrors(&window, &host);
    }

    #[test]
    fn sliding_forward_reuses_the_overlap() {
        let mut window = ContainerWindow::new();
        let mut host = RecordingHost::default();
        window.reconcile(VisibleRange::inclusive(0, 9), ITEM, &mut host);
        let kept = *window.container_for(5).unwrap();

        let stats = window.reconcile(VisibleRange::inclusive(5, 14), ITEM, &mut host);
        assert_eq!(stats.evicted, 5);
        assert_eq!(stats.reused, 5);
        assert_eq!(stats.realized, 5);
        assert_eq!(window.indices().collect::<Vec<_>>(), (5..=14).collect::<Vec<_>>());
        assert_eq!(window.container_for(5), Some(&kept));
        // Evicted containers went back to the pool and were checked out again.
        assert_eq!(host.next_id, 10);
        assert_mirrors(&window, &host);
    }

    #[test]
    fn sliding_backward_inserts_at_the_front() {
        let mut window = ContainerWindow::new();
        let mut host = RecordingHost::default();
        window.reconcile(VisibleRange::inclusive(20, 29), ITEM, &mut host);
        window.reconcile(VisibleRange::inclusive(15, 24), ITEM, &mut host);
        assert_eq!(window.indices().collect::<Vec<_>>(), (15..=24).collect::<Vec<_>>());
        assert_eq!(window.position_of(20), Some(5));
        assert_eq!(window.index_at(0), Some(15));
        assert_mirrors(&window, &host);
    }

    #[test]
    fn disjoint_jump_replaces_everything() {
        let mut window = ContainerWindow::new();
        let mut host = RecordingHost::default();
        window.reconcile(VisibleRange::inclusive(0, 9), ITEM, &mut host);
        let stats = window.reconcile(VisibleRange::inclusive(50, 54), ITEM, &mut host);
        assert_eq!(stats.evicted, 10);
        assert_eq!(stats.realized, 5);
        assert_eq!(window.indices().collect::<Vec<_>>(), [50, 51, 52, 53, 54]);
        assert_mirrors(&window, &host);
    }

    #[test]
    fn empty_range_evicts_without_a_session() {
        let mut window = ContainerWindow::new();
        let mut host = RecordingHost::default();
        window.reconcile(VisibleRange::inclusive(0, 3), ITEM, &mut host);
        let stats = window.reconcile(VisibleRange::EMPTY, ITEM, &mut host);
        assert_eq!(stats.evicted, 4);
        assert!(window.is_empty());
        assert!(host.children.is_empty());
        assert_eq!((host.sessions_open, host.sessions_closed), (1, 1));
    }

    #[test]
    fn failed_checkouts_are_skipped_and_retried_later() {
        let mut window = ContainerWindow::new();
        let mut host = RecordingHost {
            fail_on: alloc::vec![2],
            ..RecordingHost::default()
        };
        let stats = window.reconcile(VisibleRange::inclusive(0, 4), ITEM, &mut host);
        assert_eq!(stats.failed, 1);
        assert_eq!(window.indices().collect::<Vec<_>>(), [0, 1, 3, 4]);
        assert_eq!((host.sessions_open, host.sessions_closed), (1, 1));
        assert_mirrors(&window, &host);

        host.fail_on.clear();
        let stats = window.reconcile(VisibleRange::inclusive(0, 4), ITEM, &mut host);
        assert_eq!(stats.realized, 1);
        assert_eq!(stats.reused, 4);
        assert_eq!(window.indices().collect::<Vec<_>>(), [0, 1, 2, 3, 4]);
        assert_mirrors(&window, &host);
    }

    #[test]
    fn generation_ends_when_the_host_panics() {
        let mut window = ContainerWindow::new();
        let mut host = RecordingHost {
            panic_on: Some(3),
            ..RecordingHost::default()
        };
        let result = catch_unwind(AssertUnwindSafe(|| {
            window.reconcile(VisibleRange::inclusive(0, 5), ITEM, &mut host)
        }));
        assert!(result.is_err());
        assert_eq!((host.sessions_open, host.sessions_closed), (1, 1));
        assert_eq!(window.indices().collect::<Vec<_>>(), [0, 1, 2]);

        host.panic_on = None;
        let stats = window.reconcile(VisibleRange::inclusive(0, 5), ITEM, &mut host);
        assert_eq!(stats.reused, 3);
        assert_eq!(stats.realized, 3);
        assert_eq!((host.sessions_open, host.sessions_closed), (2, 2));
        assert_mirrors(&window, &host);
    }

    #[test]
    fn reused_containers_are_not_prepared_twice() {
        let mut window = ContainerWindow::new();
        let mut host = RecordingHost::default();
        window.reconcile(VisibleRange::inclusive(0, 2), ITEM, &mut host);
        window.reconcile(VisibleRange::inclusive(0, 2), ITEM, &mut host);
        assert_eq!(host.prepared.len(), 3);
        assert_eq!(host.measured.len(), 6);
    }

    #[test]
    fn insertion_shifts_bindings() {
        let mut window = ContainerWindow::new();
        let mut host = RecordingHost::default();
        window.reconcile(VisibleRange::inclusive(0, 4), ITEM, &mut host);
        let change = ItemChange::Inserted { index: 2, count: 3 };
        let detached = window.apply_item_change(change, &mut host);
        assert_eq!(detached, 0);
        assert_eq!(window.indices().collect::<Vec<_>>(), [0, 1, 5, 6, 7]);

        window.reconcile(VisibleRange::inclusive(0, 4), ITEM, &mut host);
        assert_eq!(window.indices().collect::<Vec<_>>(), [0, 1, 2, 3, 4]);
        assert_mirrors(&window, &host);
    }

    #[test]
    fn removal_detaches_and_shifts() {
        let mut window = ContainerWindow::new();
        let mut host = RecordingHost::default();
        window.reconcile(VisibleRange::inclusive(0, 5), ITEM, &mut host);
        let survivor = *window.container_for(4).unwrap();
        let change = ItemChange::Removed { index: 1, count: 2 };
        let detached = window.apply_item_change(change, &mut host);
        assert_eq!(detached, 2);
        assert_eq!(window.indices().collect::<Vec<_>>(), [0, 1, 2, 3]);
        assert_eq!(window.container_for(2), Some(&survivor));
        assert_mirrors(&window, &host);
    }

    #[test]
    fn reset_clears_the_window() {
        let mut window = ContainerWindow::new();
        let mut host = RecordingHost::default();
        window.reconcile(VisibleRange::inclusive(3, 6), ITEM, &mut host);
        assert_eq!(window.apply_item_change(ItemChange::Reset, &mut host), 4);
        assert!(window.is_empty());
        assert!(host.children.is_empty());
    }

    #[test]
    fn finds_containers_by_identity() {
        let mut window = ContainerWindow::new();
        let mut host = RecordingHost::default();
        window.reconcile(VisibleRange::inclusive(10, 12), ITEM, &mut host);
        let container = *window.container_for(11).unwrap();
        assert_eq!(window.position_of_container(&container), Some(1));
        assert_eq!(window.position_of_container(&999), None);
    }
}
