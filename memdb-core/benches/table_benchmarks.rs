//! Table engine performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use memdb_core::record::Row;
use memdb_core::schema::{Field, FieldType, Schema};
use memdb_core::table::Table;

fn port_schema() -> Schema {
    Schema::new(
        vec![
            Field::new("dpid", FieldType::Int),
            Field::new("port_name", FieldType::Str),
            Field::new("port_no", FieldType::Int),
        ],
        vec![
            vec!["dpid", "port_name"],
            vec!["dpid"],
            vec!["port_name"],
            vec!["dpid", "port_no"],
        ],
    )
    .unwrap()
}

fn port_row(dpid: i64, port_no: i64) -> Row {
    Row::new()
        .with("dpid", dpid)
        .with("port_name", format!("veth{port_no}"))
        .with("port_no", port_no)
}

/// Ten ports per switch, `size` records total
fn populate(size: i64) -> Table {
    let mut table = Table::new("bench", port_schema());
    for i in 0..size {
        table.insert(port_row(i / 10, i % 10)).unwrap();
    }
    table
}

fn bench_table_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_operations");

    group.bench_function("insert_1k", |b| {
        b.iter(|| {
            let mut table = Table::new("bench", port_schema());
            for i in 0..1_000i64 {
                table.insert(black_box(port_row(i / 10, i % 10))).unwrap();
            }
            table
        });
    });

    // Lookup benchmarks against a fixed population
    let table = populate(10_000);

    group.bench_function("get_one_unique_hit", |b| {
        b.iter(|| {
            let query = Row::new()
                .with("dpid", black_box(500))
                .with("port_name", "veth5");
            table.get_one(&query).unwrap()
        });
    });

    group.bench_function("get_non_unique_bucket", |b| {
        b.iter(|| {
            let query = Row::new().with("dpid", black_box(500));
            table.get(&query).unwrap()
        });
    });

    group.bench_function("get_missing", |b| {
        b.iter(|| {
            let query = Row::new().with("dpid", black_box(10_000_000));
            table.get(&query).unwrap()
        });
    });

    group.bench_function("update_move_buckets", |b| {
        let mut table = populate(10_000);
        let mut flip = 0i64;
        b.iter(|| {
            flip ^= 1;
            let row = Row::new()
                .with("dpid", 500)
                .with("port_name", "veth5")
                .with("port_no", 1_000 + flip);
            table.update(black_box(row)).unwrap()
        });
    });

    group.bench_function("delete_insert_cycle", |b| {
        let mut table = populate(10_000);
        b.iter(|| {
            let query = Row::new().with("dpid", 500).with("port_name", "veth5");
            table.delete(&query).unwrap();
            table.insert(port_row(500, 5)).unwrap()
        });
    });

    group.finish();
}

fn bench_bulk_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_load");
    group.sample_size(10);

    for &size in &[1_000i64, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| populate(size));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_table_operations, bench_bulk_load);
criterion_main!(benches);
