// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thumbnail gallery: background scan → item feed → virtual grid.
//!
//! A scanner thread sends file names in batches. The "layout thread" (main)
//! drains the feed at the start of each pass, measures and arranges the grid,
//! then pages through it and jumps to an item.
//!
//! Run:
//! - `RUST_LOG=understory=debug cargo run -p understory_demos --example virtual_grid_gallery`

use std::thread;

use kurbo::Size;
use tracing_subscriber::EnvFilter;
use understory_demos::{DirtyFlag, TileHost};
use understory_item_feed::{FeedItems, feed};
use understory_virtual_grid::{GridConfig, GridLayout, ItemSource};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("understory=debug")),
        )
        .init();

    let (tx, rx) = feed::<String>();
    let scanner = thread::spawn(move || {
        for chunk in 0..10_u32 {
            let names = (0..100_u32)
                .map(|i| format!("IMG_{:04}.png", chunk * 100 + i))
                .collect();
            if tx.append(names).is_err() {
                break;
            }
        }
    });
    scanner.join().expect("scanner thread panicked");

    let config = GridConfig::new(Size::new(128.0, 128.0));
    let mut layout = GridLayout::with_observer(config, DirtyFlag::default())
        .expect("default grid configuration is valid");
    let mut host = TileHost::default();
    let mut items = FeedItems::new();
    let viewport = Size::new(1000.0, 600.0);

    let pass = |layout: &mut GridLayout<_, DirtyFlag>,
                host: &mut TileHost,
                items: &mut FeedItems<String>| {
        for change in rx.drain_into(items) {
            layout.items_changed(change, host);
        }
        layout.measure(viewport, items.len(), host);
        layout.arrange(viewport, host);
        layout.observer_mut().relayout = false;
        let range = layout.visible_range();
        println!(
            "offset {:>6} | realized {:?} ({} tiles, {} created)",
            layout.scroll_state().offset.y,
            range.bounds(),
            host.children.len(),
            host.created,
        );
    };

    pass(&mut layout, &mut host, &mut items);
    println!(
        "{} items, {} per row, extent {:?}",
        items.len(),
        layout.geometry().items_per_row,
        layout.scroll_state().extent
    );

    for _ in 0..5 {
        layout.page_down();
        if layout.observer().relayout {
            pass(&mut layout, &mut host, &mut items);
        }
    }

    layout.bring_into_view(777, items.len());
    pass(&mut layout, &mut host, &mut items);
    if let Some(name) = items.get(777) {
        println!("brought {name} to the top row");
    }

    layout.zoom(64.0);
    pass(&mut layout, &mut host, &mut items);
    println!("zoomed to {:?}", layout.item_size());
}
