use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fortuna::{
    derive_key, BlockSource, EntropySample, FixedEntropy, Fortuna, NumericExtract, Options,
    ENTROPY_SIZE,
};

fn fixed_generator() -> Fortuna {
    let options = Options::new().with_entropy_source(FixedEntropy::new("b".repeat(ENTROPY_SIZE)));
    Fortuna::init(options).expect("fixed entropy is valid")
}

fn bench_generate(c: &mut Criterion) {
    let mut rng = fixed_generator();
    c.bench_function("generate", |b| b.iter(|| black_box(rng.generate())));
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    let mut rng = fixed_generator();

    group.bench_function("uint32", |b| b.iter(|| black_box(rng.uint32())));
    group.bench_function("int53", |b| b.iter(|| black_box(rng.int53())));
    group.bench_function("uint53_full", |b| b.iter(|| black_box(rng.uint53_full())));
    group.bench_function("random", |b| b.iter(|| black_box(rng.random())));
    group.finish();
}

fn bench_derive_key(c: &mut Criterion) {
    let text = EntropySample::Text("k".repeat(ENTROPY_SIZE));
    let bytes = EntropySample::Bytes(vec![200; ENTROPY_SIZE]);

    c.bench_function("derive_key_text", |b| {
        b.iter(|| derive_key(black_box(&text), black_box(42)))
    });
    c.bench_function("derive_key_bytes", |b| {
        b.iter(|| derive_key(black_box(&bytes), black_box(42)))
    });
}

criterion_group!(benches, bench_generate, bench_extract, bench_derive_key);
criterion_main!(benches);
