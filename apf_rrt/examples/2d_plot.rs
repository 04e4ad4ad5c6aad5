use plotters::prelude::*;

use apf_rrt::{point2, DynamicInfluence, NodeKind, Obstacle, PlannerBuilder, Point, Status};

const SCALE: f64 = 1.0;

fn to_px(p: &Point) -> (i32, i32) {
    // Bitmap rows grow downwards.
    ((p.x * SCALE) as i32, ((1000.0 - p.y) * SCALE) as i32)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let soft_red = RGBColor(200, 50, 50);

    let obstacles = [
        Obstacle::new(550.0, 150.0, 200.0, 200.0),
        Obstacle::new(600.0, 550.0, 200.0, 200.0),
        Obstacle::new(200.0, 200.0, 200.0, 300.0),
    ];

    let origin = point2(0.0, 0.0);
    let target = point2(999.0, 999.0);

    let seed = std::env::args()
        .nth(1)
        .map(|s| s.parse::<u64>())
        .transpose()?
        .unwrap_or(42);

    let mut planner = PlannerBuilder::new(origin, target)
        .extend_obstacles(obstacles)
        .with_workspace(1000.0, 1000.0)
        .with_step_size(15.0)
        .with_inflation_margin(10.0)
        .with_influence_radius(50.0)
        .with_repulsive_gain(0.5)
        .with_dynamic_influence(DynamicInfluence::default())
        .seeded(seed)?;

    let status = planner.run();
    let stats = planner.stats();
    eprintln!(
        "{:?} after {} iterations, {} nodes ({} escapes)",
        status,
        stats.iterations,
        planner.tree().len(),
        stats.escapes
    );

    let root = BitMapBackend::new("apf_rrt.png", (1000, 1000)).into_drawing_area();
    root.fill(&WHITE)?;

    for obstacle in &obstacles {
        let (min, max) = (obstacle.rect().min_corner(), obstacle.rect().max_corner());
        root.draw(&Rectangle::new(
            [to_px(&point2(min.x, max.y)), to_px(&point2(max.x, min.y))],
            ShapeStyle::from(&soft_red).filled(),
        ))?;
    }

    let tree = planner.tree();
    let gray = RGBColor(0, 0, 0).mix(0.4);
    for (i, (parent, child)) in tree.edges().enumerate() {
        let color = match tree.kind(i + 1) {
            Some(NodeKind::Escape) => ShapeStyle::from(&BLUE).stroke_width(2),
            _ => ShapeStyle::from(&gray),
        };
        root.draw(&PathElement::new(vec![to_px(&parent), to_px(&child)], color))?;
    }

    root.draw(&Circle::new(to_px(&target), 8, ShapeStyle::from(&GREEN).filled()))?;
    root.draw(&Circle::new(to_px(&origin), 8, ShapeStyle::from(&MAGENTA).filled()))?;

    if !matches!(status, Status::GoalReached { .. }) {
        eprintln!("No solution was found!");
        return Ok(());
    }

    if let Some(path) = planner.extract_path() {
        println!("Path length: {:.2} ({} waypoints)", path.length(), path.len());

        let series: Vec<_> = path.waypoints.iter().map(to_px).collect();
        root.draw(&PathElement::new(series.clone(), ShapeStyle::from(&RED).stroke_width(3)))?;
        for coord in series {
            root.draw(&Circle::new(coord, 3, ShapeStyle::from(&RED).filled()))?;
        }
    }

    root.present()?;
    Ok(())
}
