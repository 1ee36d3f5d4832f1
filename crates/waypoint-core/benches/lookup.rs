//! Lookup benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use waypoint_core::{Params, RouteTree, TreeBuilder};

fn build_tree() -> RouteTree<usize> {
    let routes = [
        "/",
        "/cmd/:tool/:sub",
        "/cmd/:tool/",
        "/src/*filepath",
        "/search/",
        "/search/:query",
        "/user_:name",
        "/user_:name/about",
        "/files/:dir/*filepath",
        "/doc/",
        "/doc/go_faq.html",
        "/doc/go1.html",
        "/info/:user/public",
        "/info/:user/project/:project",
        "/a/b/:c",
        "/a/:b/c/d",
        "/a/*b",
    ];
    let mut builder = TreeBuilder::new();
    for (i, route) in routes.iter().enumerate() {
        builder.add_route(route, i).unwrap();
    }
    builder.freeze()
}

fn static_hit_benchmark(c: &mut Criterion) {
    let tree = build_tree();
    let mut params = Params::with_capacity(tree.max_params());

    c.bench_function("lookup_static_hit", |b| {
        b.iter(|| black_box(tree.find(black_box("/doc/go_faq.html"), &mut params)))
    });
}

fn param_hit_benchmark(c: &mut Criterion) {
    let tree = build_tree();
    let mut params = Params::with_capacity(tree.max_params());

    c.bench_function("lookup_param_hit", |b| {
        b.iter(|| black_box(tree.find(black_box("/info/gordon/project/go"), &mut params)))
    });
}

fn backtracking_benchmark(c: &mut Criterion) {
    let tree = build_tree();
    let mut params = Params::with_capacity(tree.max_params());

    // forces a static dead end, a param retry, and a catch-all fallback
    c.bench_function("lookup_backtracking_catch_all", |b| {
        b.iter(|| black_box(tree.find(black_box("/a/b"), &mut params)))
    });
}

fn miss_benchmark(c: &mut Criterion) {
    let tree = build_tree();
    let mut params = Params::with_capacity(tree.max_params());

    c.bench_function("lookup_miss", |b| {
        b.iter(|| black_box(tree.find(black_box("/no/such/route"), &mut params)))
    });
}

criterion_group!(
    benches,
    static_hit_benchmark,
    param_hit_benchmark,
    backtracking_benchmark,
    miss_benchmark
);
criterion_main!(benches);
