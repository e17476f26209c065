//! Benchmark: split tree edits and layout snapshots.
//!
//! Builds trees of increasing depth by repeatedly splitting the active
//! leaf, then measures collapsing them back and taking a layout snapshot.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sash_core::{Document, DocumentHost, DocumentId, HostError, Orientation, ReopenDescriptor, Size};
use sash_layout::SplitArea;

// ── Helpers ──

struct NullHost;

impl DocumentHost for NullHost {
    fn document(&self, _id: DocumentId) -> Option<&dyn Document> {
        None
    }

    fn open(&mut self, descriptor: &ReopenDescriptor) -> Result<DocumentId, HostError> {
        Err(HostError::Reopen(descriptor.target().clone(), "null host".into()))
    }

    fn close(&mut self, _id: DocumentId) {}
}

/// Split the active leaf `depth` times, alternating orientation.
fn build_tree(depth: usize) -> SplitArea {
    let mut area = SplitArea::with_extent(Size::new(1920.0, 1080.0));
    for i in 0..depth {
        let active = area.active_container();
        let Some(leaf) = area.leaf_of(active) else {
            break;
        };
        let orientation = if i % 2 == 0 {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let _ = area.split(leaf, orientation);
    }
    area
}

fn bench_split_collapse(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_collapse");
    for depth in [4usize, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut area = build_tree(depth);
                while let Some(leaf) = area.leaf_of(area.active_container()) {
                    if !area.collapse(leaf) {
                        break;
                    }
                }
                black_box(area.container_ids().len())
            })
        });
    }
    group.finish();
}

fn bench_get_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_layout");
    for depth in [4usize, 16, 64] {
        let area = build_tree(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &area, |b, area| {
            b.iter(|| black_box(area.get_layout(&NullHost)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_split_collapse, bench_get_layout);
criterion_main!(benches);
