//! Criterion benchmarks for canopy-trees: tree and forest training.

use canopy_data::{Column, DataFrame, Value};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use canopy_trees::{RandomForest, Tree};

fn make_classification(n_samples: usize, n_features: usize, seed: u64) -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut columns = Vec::with_capacity(n_features + 1);
    for f in 0..n_features {
        let cells: Vec<Value> = (0..n_samples)
            .map(|i| {
                let class = (i % 3) as f64;
                let base = if f < 3 { class * 3.0 } else { 0.0 };
                Value::Float(base + rng.r#gen::<f64>() * 0.5)
            })
            .collect();
        columns.push(Column::new(format!("f{f}"), cells).unwrap());
    }
    let labels: Vec<Value> = (0..n_samples)
        .map(|i| Value::Int((i % 3) as i64))
        .collect();
    columns.push(Column::new("label", labels).unwrap());
    DataFrame::new(columns).unwrap()
}

fn bench_single_tree(c: &mut Criterion) {
    let df = make_classification(300, 8, 42);

    c.bench_function("cart_tree_300x8_3class", |b| {
        b.iter(|| {
            let mut tree = Tree::cart();
            tree.fit(&df).unwrap();
        });
    });

    c.bench_function("id3_tree_300x8_3class", |b| {
        b.iter(|| {
            let mut tree = Tree::id3();
            tree.fit(&df).unwrap();
        });
    });
}

fn bench_forest_train(c: &mut Criterion) {
    let df = make_classification(300, 8, 42);

    for ensemble in ["cart", "id3", "hybrid"] {
        c.bench_function(&format!("{ensemble}_forest_300x8_20trees"), |b| {
            b.iter(|| {
                let mut forest = RandomForest::new(20, ensemble).unwrap().with_seed(42);
                forest.fit(&df).unwrap();
            });
        });
    }
}

fn bench_forest_predict(c: &mut Criterion) {
    let df = make_classification(300, 8, 42);
    let mut forest = RandomForest::new(20, "hybrid").unwrap().with_seed(42);
    forest.fit(&df).unwrap();

    c.bench_function("hybrid_forest_predict_300x8_20trees", |b| {
        b.iter(|| forest.predict(&df).unwrap());
    });
}

criterion_group!(
    benches,
    bench_single_tree,
    bench_forest_train,
    bench_forest_predict
);
criterion_main!(benches);
