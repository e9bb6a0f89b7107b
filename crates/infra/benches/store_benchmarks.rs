use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::Utc;
use marketplace_core::{PageRequest, paginate};
use marketplace_infra::{Repositories, Store, seed_demo};
use marketplace_products::ProductFilter;

fn seeded() -> Repositories {
    let repos = Repositories::in_memory();
    seed_demo(&repos, Utc::now()).expect("seed");
    repos
}

fn bench_listing(c: &mut Criterion) {
    let repos = seeded();
    let mut group = c.benchmark_group("product_listing");
    group.throughput(Throughput::Elements(repos.products.count() as u64));

    for per_page in [10i64, 50, 200] {
        group.bench_with_input(BenchmarkId::new("list_and_paginate", per_page), &per_page, |b, &per_page| {
            b.iter(|| {
                let page = paginate(repos.products.list(), PageRequest::resolve(Some(2), Some(per_page)));
                black_box(page.total)
            })
        });
    }
    group.finish();
}

fn bench_filters(c: &mut Criterion) {
    let repos = seeded();
    let brands = ProductFilter::brands("apple,samsung").expect("filter");
    let price = ProductFilter::price("1000-40000").expect("filter");

    c.bench_function("filter_brands", |b| {
        b.iter(|| black_box(repos.products.find(&|p| brands.matches(p)).len()))
    });
    c.bench_function("filter_price", |b| {
        b.iter(|| black_box(repos.products.find(&|p| price.matches(p)).len()))
    });
    c.bench_function("search", |b| {
        b.iter(|| black_box(repos.products.find(&|p| p.matches_search(black_box("phones"))).len()))
    });
}

criterion_group!(benches, bench_listing, bench_filters);
criterion_main!(benches);
