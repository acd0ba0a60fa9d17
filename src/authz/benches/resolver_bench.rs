//! Resolution and gate benchmarks
//!
//! Measures decode cost on a cold cache against cached lookups, and the full
//! gate path for AND/OR requirements of increasing width.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use permission_authz::{
    policy::codec, AuthorizationGate, ClaimSet, GateConfig, PermissionOperator, PolicyResolver,
};

fn permissions(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("resource{}.read", i)).collect()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for width in [1usize, 8, 64].iter() {
        let identifier = codec::encode(PermissionOperator::And, permissions(*width).as_slice()).unwrap();

        group.bench_with_input(BenchmarkId::new("decode", width), &identifier, |b, id| {
            b.iter(|| codec::decode(black_box(id)).unwrap());
        });

        let resolver = PolicyResolver::new();
        resolver.resolve(&identifier).unwrap();

        group.bench_with_input(BenchmarkId::new("cached", width), &identifier, |b, id| {
            b.iter(|| resolver.resolve(black_box(id)).unwrap());
        });
    }

    group.finish();
}

fn bench_authorize(c: &mut Criterion) {
    let mut group = c.benchmark_group("authorize");
    let gate = AuthorizationGate::new(GateConfig::default()).unwrap();

    for width in [1usize, 8, 64].iter() {
        let perms = permissions(*width);
        let claims = ClaimSet::with_permissions(perms.clone());

        let and_id = codec::encode(PermissionOperator::And, perms.as_slice()).unwrap();
        group.bench_with_input(BenchmarkId::new("and_allow", width), &and_id, |b, id| {
            b.iter(|| gate.authorize(&[black_box(id.as_str())], &claims));
        });

        let or_id = codec::encode(PermissionOperator::Or, &permissions(*width + 1)[1..]).unwrap();
        let sparse = ClaimSet::with_permissions([format!("resource{}.read", width)]);
        group.bench_with_input(BenchmarkId::new("or_last_match", width), &or_id, |b, id| {
            b.iter(|| gate.authorize(&[black_box(id.as_str())], &sparse));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_authorize);
criterion_main!(benches);
