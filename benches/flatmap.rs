use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use mapcat_core::prelude::{Column, RowBatch, Scalar, Schema};
use mapcat_operators::{FlatMapOperator, FnName, OpContext, Operator, Registry, Value};

fn make_batch(rows: usize) -> RowBatch {
    let mut texts = Vec::with_capacity(rows);
    for i in 0..rows {
        texts.push(Scalar::Str(format!("alpha beta gamma {}", i % 16)));
    }
    RowBatch {
        columns: vec![Column {
            name: "text".into(),
            values: texts,
        }],
    }
}

fn bench_flat_map_operator(c: &mut Criterion) {
    let registry = Registry::new();
    registry.register("bench", "words", |args: Vec<Value>| {
        let mut out = Vec::new();
        for arg in args {
            if let Value::Str(text) = arg {
                for w in text.split_whitespace() {
                    out.push(Value::list([Value::from(w)]));
                }
            }
        }
        Ok(Value::List(out))
    });

    let op = FlatMapOperator::new(
        Schema::of_names(["word"]),
        FnName::new("bench", "words"),
        Arc::new(registry),
    );
    let ctx = OpContext::single();
    op.prepare(&ctx).unwrap();

    let batch = make_batch(1024);
    c.bench_function("flat_map_words", |b| {
        b.iter(|| {
            let _ = op.eval_block(&ctx, &batch).unwrap();
        })
    });
}

criterion_group!(flat_maps, bench_flat_map_operator);
criterion_main!(flat_maps);
