use std::time::{Duration, Instant};

use log::info;

use apf_rrt::{
    point2, DynamicInfluence, Obstacle, PlannerBuilder, SteeringStrategy, VelocityRepulsion,
};

const TRIALS: u64 = 20;

fn obstacles() -> Vec<Obstacle> {
    vec![
        Obstacle::new(150.0, 150.0, 150.0, 150.0),
        Obstacle::new(600.0, 200.0, 100.0, 100.0),
        Obstacle::new(200.0, 600.0, 100.0, 100.0),
        Obstacle::new(700.0, 700.0, 150.0, 150.0),
        Obstacle::new(400.0, 400.0, 200.0, 200.0),
    ]
}

fn base() -> PlannerBuilder {
    PlannerBuilder::new(point2(0.0, 0.0), point2(999.0, 999.0))
        .extend_obstacles(obstacles())
        .with_workspace(1000.0, 1000.0)
        .with_step_size(15.0)
        .with_inflation_margin(10.0)
        .with_max_iters(5_000)
}

#[derive(Default)]
struct Summary {
    successes: usize,
    path_length: f64,
    waypoints: usize,
    iterations: usize,
    escapes: usize,
    elapsed: Duration,
}

fn run_trials(
    name: &str,
    make: impl Fn() -> PlannerBuilder,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut summary = Summary::default();

    for seed in 0..TRIALS {
        let start = Instant::now();
        let mut planner = make().seeded(seed)?;
        planner.run();
        let elapsed = start.elapsed();

        let stats = planner.stats();
        info!("{} seed {}: {:?} in {:?}", name, seed, planner.status(), elapsed);

        if let Some(path) = planner.extract_path() {
            summary.successes += 1;
            summary.path_length += path.length();
            summary.waypoints += path.len();
            summary.iterations += stats.iterations;
            summary.escapes += stats.escapes;
            summary.elapsed += elapsed;
        }
    }

    if summary.successes == 0 {
        println!("{:<24} no successful trials", name);
        return Ok(());
    }

    let n = summary.successes as f64;
    println!(
        "{:<24} {:>3}/{:<3} {:>10.2} {:>10.3} {:>8.1} {:>8.1} {:>8.2}",
        name,
        summary.successes,
        TRIALS,
        summary.path_length / n,
        summary.elapsed.as_secs_f64() * 1000.0 / n,
        summary.waypoints as f64 / n,
        summary.iterations as f64 / n,
        summary.escapes as f64 / n,
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!(
        "{:<24} {:>7} {:>10} {:>10} {:>8} {:>8} {:>8}",
        "variant", "solved", "length", "time (ms)", "nodes", "iters", "escapes"
    );

    run_trials("rrt", || base().with_strategy(SteeringStrategy::Direct).with_escape(false))?;
    run_trials("apf-rrt", base)?;
    run_trials("apf-rrt (improved)", || {
        base().with_influence_radius(50.0).with_repulsive_gain(0.5)
    })?;
    run_trials("apf-rrt (dynamic)", || {
        base()
            .with_influence_radius(50.0)
            .with_repulsive_gain(0.5)
            .with_dynamic_influence(DynamicInfluence::default())
            .with_safety_radius(50.0)
    })?;
    run_trials("apf-rrt (velocity)", || {
        base()
            .with_influence_radius(50.0)
            .with_repulsive_gain(0.5)
            .with_velocity_repulsion(VelocityRepulsion::default())
    })?;

    Ok(())
}
