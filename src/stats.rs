//stats.rs -> pure queries over a finished frame history
//everything here is read-only over the snapshots the evaluator recorded,
//plus the scalar scoring primitive external optimizers call into.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::evaluator::{Evaluator, FrameSnapshot};
use crate::types::{Bounds, Program, Vec2};

//highest number of bullets alive in any single frame
pub fn max_concurrent(frames: &[FrameSnapshot]) -> usize {
    frames.iter().map(|f| f.bullet_count()).max().unwrap_or(0)
}

//every bullet appears in its spawn frame with age 0, so counting age-0
//entries across the history counts each spawn exactly once
pub fn total_spawned(frames: &[FrameSnapshot]) -> usize {
    frames
        .iter()
        .flat_map(|f| &f.bullets)
        .filter(|b| b.age == 0)
        .count()
}

//bounding box over every recorded position: (min_x, max_x, min_y, max_y)
pub fn coverage_bbox(frames: &[FrameSnapshot]) -> (f32, f32, f32, f32) {
    let mut seen = false;
    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for frame in frames {
        for bullet in &frame.bullets {
            seen = true;
            min_x = min_x.min(bullet.position.x);
            max_x = max_x.max(bullet.position.x);
            min_y = min_y.min(bullet.position.y);
            max_y = max_y.max(bullet.position.y);
        }
    }

    if !seen {
        return (0.0, 0.0, 0.0, 0.0);
    }
    (min_x, max_x, min_y, max_y)
}

//bullets within radius of a point, one count per frame, aligned with the
//frame index
pub fn density_near(frames: &[FrameSnapshot], point: Vec2, radius: f32) -> Vec<usize> {
    frames.iter().map(|f| f.count_within(point, radius)).collect()
}

pub fn average_per_tick(frames: &[FrameSnapshot]) -> f32 {
    if frames.is_empty() {
        return 0.0;
    }
    let total: usize = frames.iter().map(|f| f.bullet_count()).sum();
    total as f32 / frames.len() as f32
}

//fitness signal for pattern search: how close the average on-screen bullet
//load sits to a target, negated so higher is better and the optimum is 0
pub fn pacing_score(frames: &[FrameSnapshot], target: f32) -> f32 {
    let diff = average_per_tick(frames) - target;
    -(diff * diff)
}

//score many candidate programs at once. each worker owns its own evaluator
//and its own rng derived from the base seed, so candidates never share state
//and a batch is reproducible from (programs, base_seed).
pub fn score_batch(
    programs: &[Arc<Program>],
    origin: Vec2,
    bounds: Option<Bounds>,
    ticks: usize,
    target: f32,
    base_seed: u64,
) -> Vec<f32> {
    programs
        .par_iter()
        .enumerate()
        .map(|(i, program)| {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(i as u64));
            let mut evaluator = Evaluator::new(Arc::clone(program), origin, bounds);
            evaluator.simulate(ticks, &mut rng);
            pacing_score(evaluator.frames(), target)
        })
        .collect()
}
