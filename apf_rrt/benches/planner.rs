use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use apf_rrt::{point2, Obstacle, PlannerBuilder, SteeringStrategy};

fn obstacles() -> [Obstacle; 3] {
    [
        Obstacle::new(550.0, 150.0, 200.0, 200.0),
        Obstacle::new(600.0, 550.0, 200.0, 200.0),
        Obstacle::new(200.0, 200.0, 200.0, 300.0),
    ]
}

fn planner_run(c: &mut Criterion) {
    let origin = point2(0.0, 0.0);
    let target = point2(999.0, 999.0);

    let mut group = c.benchmark_group("APF-RRT");
    for strategy in [SteeringStrategy::Direct, SteeringStrategy::PotentialField] {
        let id = BenchmarkId::from_parameter(format!("{:?}", strategy));
        group.bench_with_input(id, &strategy, |b, &strategy| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                let mut planner = PlannerBuilder::new(origin, target)
                    .extend_obstacles(obstacles())
                    .with_workspace(1000.0, 1000.0)
                    .with_step_size(20.0)
                    .with_inflation_margin(10.0)
                    .with_max_iters(5_000)
                    .with_strategy(strategy)
                    .seeded(seed)
                    .unwrap();
                planner.run()
            });
        });
    }
    group.finish();
}

fn nearest_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest");
    for max_iters in (1_000..=5_000).step_by(2_000) {
        let mut planner = PlannerBuilder::new(point2(0.0, 0.0), point2(999.0, 999.0))
            .with_workspace(1000.0, 1000.0)
            .with_step_size(5.0)
            .with_goal_tolerance(0.0)
            .with_max_iters(max_iters)
            .seeded(7)
            .unwrap();
        planner.run();
        let tree = planner.tree().clone();

        group.bench_with_input(BenchmarkId::from_parameter(tree.len()), &tree, |b, tree| {
            b.iter(|| tree.nearest(&point2(500.0, 500.0)));
        });
    }
    group.finish();
}

criterion_group!(benches, planner_run, nearest_lookup);
criterion_main!(benches);
