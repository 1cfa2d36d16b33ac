// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared pieces for the Understory demos.

use kurbo::{Rect, Size};
use understory_virtual_grid::{ContainerHost, LayoutObserver};

/// A stand-in for a toolkit's thumbnail widget.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    /// Stable widget id.
    pub id: u32,
    /// Item index the tile currently shows.
    pub index: usize,
    /// Desired size from the last measure.
    pub size: Size,
    /// Final placement from the last arrange.
    pub rect: Rect,
}

/// Container host that keeps a flat child list and a free list of tiles.
#[derive(Debug, Default)]
pub struct TileHost {
    /// Attached tiles, in window order.
    pub children: Vec<u32>,
    free: Vec<u32>,
    next_id: u32,
    /// Tiles created over the host's lifetime.
    pub created: u32,
}

impl ContainerHost for TileHost {
    type Container = Tile;

    fn checkout(&mut self, index: usize) -> Option<Tile> {
        let id = self.free.pop().unwrap_or_else(|| {
            self.next_id += 1;
            self.created += 1;
            self.next_id
        });
        Some(Tile {
            id,
            index,
            size: Size::ZERO,
            rect: Rect::ZERO,
        })
    }

    fn prepare(&mut self, tile: &mut Tile, index: usize) {
        tile.index = index;
    }

    fn attach(&mut self, position: usize, tile: &Tile) {
        self.children.insert(position, tile.id);
    }

    fn detach(&mut self, position: usize, tile: Tile) {
        self.children.remove(position);
        self.free.push(tile.id);
    }

    fn measure(&mut self, tile: &mut Tile, size: Size) {
        tile.size = size;
    }

    fn arrange(&mut self, tile: &mut Tile, rect: Rect) {
        tile.rect = rect;
    }
}

/// Observer that remembers whether a relayout is pending.
#[derive(Debug, Default)]
pub struct DirtyFlag {
    /// Set by the engine, cleared by the host after measuring.
    pub relayout: bool,
}

impl LayoutObserver for DirtyFlag {
    fn relayout_required(&mut self) {
        self.relayout = true;
    }

    fn scroll_info_changed(&mut self) {
        tracing::trace!("scroll info changed");
    }
}
