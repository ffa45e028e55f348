//! 帖子存储性能基准测试
//!
//! 对比网格索引存储与线性扫描存储的写入和邻近查询开销

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use radius::{Coordinate, IndexedMemoryStore, MemoryStore, Post, PostStore};

const BENCHMARK_SIZE: usize = 20_000;

/// 性能测试配置
struct BenchConfig {
    size: usize,
    seed: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            size: BENCHMARK_SIZE,
            seed: 42,
        }
    }
}

/// 生成测试数据：帖子集中在欧洲范围内，存活时间足够覆盖整个基准
fn generate_posts(count: usize, seed: u64) -> Vec<Post> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|i| {
            let coordinate = Coordinate::new(rng.gen_range(35.0..60.0), rng.gen_range(-10.0..30.0));
            Post::new(coordinate, format!("post {}", i), 3_000).expect("valid post")
        })
        .collect()
}

/// 生成查询点
fn generate_queries(count: usize, seed: u64) -> Vec<Coordinate> {
    let mut rng = StdRng::seed_from_u64(seed + 1000);

    (0..count)
        .map(|_| Coordinate::new(rng.gen_range(35.0..60.0), rng.gen_range(-10.0..30.0)))
        .collect()
}

fn filled<S: PostStore>(store: S, posts: &[Post]) -> S {
    for post in posts {
        store.save_post(post.clone()).expect("save");
    }
    store
}

/// 写入性能测试
fn bench_save(c: &mut Criterion) {
    let config = BenchConfig::default();
    let posts = generate_posts(config.size, config.seed);

    c.bench_function("save_indexed", |b| {
        b.iter_batched(
            || posts.clone(),
            |posts| {
                let store = IndexedMemoryStore::new();
                for post in posts {
                    store.save_post(post).expect("save");
                }
                store
            },
            BatchSize::LargeInput,
        );
    });
}

/// 邻近查询：网格索引只检查 3×3 邻域
fn bench_nearby(c: &mut Criterion) {
    let config = BenchConfig::default();
    let posts = generate_posts(config.size, config.seed);
    let queries = generate_queries(100, config.seed);

    let indexed = filled(IndexedMemoryStore::new(), &posts);
    let memory = filled(MemoryStore::new(), &posts);

    let mut group = c.benchmark_group("nearby_50km");
    group.bench_function("indexed", |b| {
        b.iter(|| {
            for q in &queries {
                black_box(indexed.nearby_posts(q, 50.0).expect("query"));
            }
        });
    });
    group.bench_function("memory", |b| {
        b.iter(|| {
            for q in &queries {
                black_box(memory.nearby_posts(q, 50.0).expect("query"));
            }
        });
    });
    group.finish();
}

/// 单个热点单元格的查询开销
fn bench_hot_cell(c: &mut Criterion) {
    let config = BenchConfig::default();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let store = IndexedMemoryStore::new();
    for i in 0..config.size {
        let coordinate = Coordinate::new(
            48.8 + rng.gen_range(-0.3..0.3),
            2.35 + rng.gen_range(-0.3..0.3),
        );
        store
            .save_post(Post::new(coordinate, format!("paris {}", i), 3_000).expect("valid post"))
            .expect("save");
    }
    let center = Coordinate::new(48.8566, 2.3522);

    c.bench_function("nearby_hot_cell_5km", |b| {
        b.iter(|| black_box(store.nearby_posts(&center, 5.0).expect("query")));
    });
}

criterion_group!(benches, bench_save, bench_nearby, bench_hot_cell);
criterion_main!(benches);
