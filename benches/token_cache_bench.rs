// ABOUTME: Criterion benchmarks for the admin token hot path
// ABOUTME: Measures cached-token reads under contention and Set-Cookie attribute parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

//! Criterion benchmarks for the admin token hot path.
//!
//! Every registration that finds a valid cached token pays only for a read
//! lock and a clone; these benchmarks keep that cost visible.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use palmr_gateway::upstream::{cookie, TokenCache};
use tokio::runtime::Runtime;

fn bench_valid_token(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let cache = TokenCache::new();
    rt.block_on(cache.set("x".repeat(200), Utc::now() + Duration::hours(1)));
    let margin = Duration::minutes(5);

    let mut group = c.benchmark_group("token_cache");

    group.bench_function("valid_token_hit", |b| {
        b.iter(|| rt.block_on(async { black_box(cache.valid_token(Utc::now(), margin).await) }));
    });

    for readers in [4usize, 16, 64] {
        group.bench_with_input(
            BenchmarkId::new("concurrent_reads", readers),
            &readers,
            |b, &readers| {
                b.iter(|| {
                    rt.block_on(async {
                        let handles: Vec<_> = (0..readers)
                            .map(|_| {
                                let cache = cache.clone();
                                tokio::spawn(
                                    async move { cache.valid_token(Utc::now(), margin).await },
                                )
                            })
                            .collect();
                        for handle in handles {
                            black_box(handle.await.unwrap());
                        }
                    });
                });
            },
        );
    }

    group.bench_function("set", |b| {
        b.iter(|| {
            rt.block_on(async {
                black_box(cache.set("T1", Utc::now() + Duration::hours(1)).await)
            })
        });
    });

    group.finish();
}

fn bench_cookie_parsing(c: &mut Criterion) {
    let header = "session=abc; theme=dark; token=eyJhbGciOiJIUzI1NiJ9.payload.sig; \
                  Max-Age=3600; Path=/; HttpOnly; SameSite=Lax";

    let mut group = c.benchmark_group("cookie");
    group.bench_function("find_token", |b| {
        b.iter(|| black_box(cookie::find_attribute(black_box(header), "token")));
    });
    group.bench_function("max_age", |b| {
        b.iter(|| black_box(cookie::max_age(black_box(header))));
    });
    group.finish();
}

criterion_group!(benches, bench_valid_token, bench_cookie_parsing);
criterion_main!(benches);
