use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feedly::route_guard::{evaluate, evaluate_with_cookie_header};
use feedly::sentiment::SentimentTally;

fn route_guard_benchmark(c: &mut Criterion) {
    let paths = [
        "/",
        "/dashboard",
        "/apps/42",
        "/login",
        "/reset-password",
        "/_next/static/chunks/main.js",
        "/favicon.ico",
        "/pricing",
    ];

    c.bench_function("route_guard_evaluate_mixed_paths", |b| {
        b.iter(|| {
            for path in paths {
                black_box(evaluate(black_box(path), Some("token")));
                black_box(evaluate(black_box(path), None));
            }
        });
    });

    let header = "theme=dark; locale=fr; access_token=eyJhbGciOiJIUzI1NiJ9.payload.sig; _ga=GA1.2";
    c.bench_function("route_guard_cookie_header", |b| {
        b.iter(|| black_box(evaluate_with_cookie_header("/apps", Some(black_box(header)))));
    });
}

fn sentiment_benchmark(c: &mut Criterion) {
    let scores: Vec<Option<f64>> = (0..1000)
        .map(|i| {
            if i % 17 == 0 {
                None
            } else {
                Some(((i % 200) as f64 - 100.0) / 100.0)
            }
        })
        .collect();

    c.bench_function("sentiment_tally_1000_reviews", |b| {
        b.iter(|| {
            let tally = SentimentTally::from_scores(black_box(&scores).iter().copied());
            black_box(tally.scored());
        });
    });
}

criterion_group!(rules, route_guard_benchmark, sentiment_benchmark);
criterion_main!(rules);
