use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use marketplace_auth::{Action, PolicyEngine, Principal, ResourceContext, RoleTier, Scope};
use marketplace_core::UserId;

fn bench_decide(c: &mut Criterion) {
    let engine = PolicyEngine::default();
    let member = Principal::new(UserId::new(5), RoleTier::Member, []);
    let admin = Principal::new(UserId::new(1), RoleTier::Admin, [Scope::PATCH_ROLE, Scope::CREATE_SUB]);
    let product = ResourceContext::product(UserId::new(5), 10);
    let user = ResourceContext::user(UserId::new(99));

    let mut group = c.benchmark_group("policy_decide");
    for action in Action::ALL {
        group.bench_with_input(BenchmarkId::new("member_product", action), &action, |b, a| {
            b.iter(|| engine.decide(black_box(&member), black_box(*a), black_box(&product)))
        });
        group.bench_with_input(BenchmarkId::new("admin_user", action), &action, |b, a| {
            b.iter(|| engine.decide(black_box(&admin), black_box(*a), black_box(&user)))
        });
    }
    group.finish();
}

fn bench_scope_gate(c: &mut Criterion) {
    let engine = PolicyEngine::default();
    let admin = Principal::new(UserId::new(1), RoleTier::Admin, [Scope::PATCH_ROLE]);

    c.bench_function("scope_gate_has", |b| {
        b.iter(|| engine.scope_gate().has(black_box(&admin), black_box("patch-role")))
    });
}

criterion_group!(benches, bench_decide, bench_scope_gate);
criterion_main!(benches);
