use criterion::{black_box, criterion_group, criterion_main, Criterion};
use obs_core::model::SnapshotRecord;
use obs_core::store::SnapshotStore;
use tempfile::tempdir;

fn bench_append(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let store = SnapshotStore::open(dir.path()).unwrap();
    let mut epoch = 0i64;

    c.bench_function("store/append", |b| {
        b.iter(|| {
            epoch += 1;
            let record = SnapshotRecord::empty("BENCH", black_box(epoch));
            store.append("BENCH", &record).unwrap();
        })
    });
}

fn bench_scan_range(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let store = SnapshotStore::open(dir.path()).unwrap();
    for epoch in 0..10_000 {
        store
            .append("BENCH", &SnapshotRecord::empty("BENCH", epoch))
            .unwrap();
    }

    c.bench_function("store/scan_range_1000", |b| {
        b.iter(|| {
            let records = store
                .scan_range("BENCH", black_box(4000), black_box(5000))
                .unwrap();
            black_box(records);
        })
    });
}

criterion_group!(benches, bench_append, bench_scan_range);
criterion_main!(benches);
