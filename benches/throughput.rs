use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use routeflow::pattern::PatternCache;
use routeflow::router::{Flow, Rou, Router};
use routeflow::server::{NopSink, RequestHead, ResponseSink};
use std::hint::black_box;

const SIBLINGS: usize = 40;

fn noop(_: &RequestHead, _: &mut dyn ResponseSink) {}

/// Forty templated siblings that never match, then a method group that does.
fn api<'p>(patterns: &'p [String]) -> impl Fn(&Rou<'_, RequestHead>) -> Flow + 'p {
    move |r| {
        for pattern in patterns {
            r.pat(pattern).get().func(noop)?;
        }
        r.pat("/api/match/{id}").methods(|r| {
            r.get().func(noop)?;
            r.post().param_func(|_, _, args| {
                black_box(args);
            })
        })
    }
}

fn sibling_patterns() -> Vec<String> {
    (0..SIBLINGS)
        .map(|i| format!("/api/unmatched_{i}/{{id}}"))
        .collect()
}

fn bench_route_throughput(c: &mut Criterion) {
    let patterns = sibling_patterns();
    let fun = api(&patterns);
    let req = RequestHead::new(Method::POST, "/api/match/123");

    let router = Router::new();
    c.bench_function("route_match_after_40_siblings", |b| {
        b.iter(|| {
            let res = router.route(black_box(&req), &mut NopSink, &fun);
            black_box(&res);
        })
    });

    let uncached = Router::new().with_cache(PatternCache::disabled());
    c.bench_function("route_match_after_40_siblings_uncached", |b| {
        b.iter(|| {
            let res = uncached.route(black_box(&req), &mut NopSink, &fun);
            black_box(&res);
        })
    });
}

fn bench_first_route(c: &mut Criterion) {
    let router = Router::new();
    let req = RequestHead::new(Method::GET, "/");
    c.bench_function("route_match_first_exact", |b| {
        b.iter(|| {
            let res = router.route(black_box(&req), &mut NopSink, |r| {
                r.exa("/").get().func(noop)
            });
            black_box(&res);
        })
    });
}

fn bench_not_found(c: &mut Criterion) {
    let patterns = sibling_patterns();
    let fun = api(&patterns);
    let router = Router::new();
    let req = RequestHead::new(Method::GET, "/nowhere");
    c.bench_function("route_not_found_after_40_siblings", |b| {
        b.iter(|| {
            let res = router.route(black_box(&req), &mut NopSink, &fun);
            black_box(&res);
        })
    });
}

criterion_group!(benches, bench_route_throughput, bench_first_route, bench_not_found);
criterion_main!(benches);
