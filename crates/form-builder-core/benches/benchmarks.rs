//! Criterion benchmarks for the form-builder-core editing engine.
//!
//! Fixtures are decoded outside the benchmark loop to measure only the
//! walk/edit/detect logic, not parsing or file I/O.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;

use form_builder_core::{
    decode_pair, detect, editor, encode_pair, CategoryRegistry, CodecFormat, ElementPath, SchemaPair,
    TreeWalker,
};

/// Load and decode a fixture pair from the shared test fixtures directory.
fn load_fixture(name: &str) -> SchemaPair {
    let fixtures_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../tests/schemas");
    let read = |file: String| {
        let path = Path::new(fixtures_dir).join(&file);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
    };
    let schema = read(format!("{name}.json"));
    let ui = read(format!("{name}.ui.json"));
    decode_pair(&schema, &ui, CodecFormat::Json)
        .unwrap_or_else(|e| panic!("Failed to decode fixture {name}: {e}"))
}

/// A form with `width` cards per level, nested `depth` sections deep.
fn generated_form(width: usize, depth: usize) -> SchemaPair {
    fn level(width: usize, depth: usize) -> Value {
        let mut properties = Map::new();
        for i in 0..width {
            properties.insert(
                format!("field{i}"),
                json!({ "type": "string", "title": format!("Field {i}") }),
            );
        }
        if depth > 0 {
            properties.insert("nested".to_string(), level(width, depth - 1));
        }
        json!({ "type": "object", "properties": properties })
    }
    SchemaPair::new(level(width, depth), json!({}))
}

fn bench_walk_kitchen_sink(c: &mut Criterion) {
    let pair = load_fixture("kitchen_sink");
    let registry = CategoryRegistry::builtin();

    c.bench_function("walk/kitchen_sink", |b| {
        b.iter(|| TreeWalker::new(&registry).walk_pair(black_box(&pair)))
    });
}

fn bench_walk_generated(c: &mut Criterion) {
    let pair = generated_form(50, 5);
    let registry = CategoryRegistry::builtin();

    c.bench_function("walk/generated_50x5", |b| {
        b.iter(|| TreeWalker::new(&registry).walk_pair(black_box(&pair)))
    });
}

fn bench_add_card(c: &mut Criterion) {
    let pair = load_fixture("kitchen_sink");

    c.bench_function("edit/add_card", |b| {
        b.iter(|| editor::add_card(black_box(&pair), &ElementPath::root()))
    });
}

fn bench_rename_generated(c: &mut Criterion) {
    let pair = generated_form(200, 0);
    let path = ElementPath::parse("field100");

    c.bench_function("edit/rename_wide", |b| {
        b.iter(|| editor::rename_key(black_box(&pair), &path, "renamed").unwrap())
    });
}

fn bench_detect_kitchen_sink(c: &mut Criterion) {
    let pair = load_fixture("kitchen_sink");
    let registry = CategoryRegistry::builtin();

    c.bench_function("detect/kitchen_sink", |b| {
        b.iter(|| detect(&registry, black_box(&pair)))
    });
}

fn bench_encode_kitchen_sink(c: &mut Criterion) {
    let pair = load_fixture("kitchen_sink");

    c.bench_function("codec/encode_yaml", |b| {
        b.iter(|| encode_pair(black_box(&pair), CodecFormat::Yaml).unwrap())
    });
}

criterion_group!(
    benches,
    bench_walk_kitchen_sink,
    bench_walk_generated,
    bench_add_card,
    bench_rename_generated,
    bench_detect_kitchen_sink,
    bench_encode_kitchen_sink,
);
criterion_main!(benches);
