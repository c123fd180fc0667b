//main.rs -> diagnostic driver for pattern design
//simulates a pattern headlessly and prints what the stats layer sees.
//the library is the real product, this bin is just a window into it.

use std::sync::Arc;

use barrage::types::{Bounds, Program, Vec2};
use barrage::{Evaluator, patterns, stats};

const TICKS: usize = 180; //3 seconds at 60 fps
const BOUNDS: (f32, f32, f32, f32) = (-400.0, 400.0, -400.0, 400.0);

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        println!("Usage: barrage <pattern-name>");
        println!("       barrage level <n>");
        println!("       barrage compare");
        println!("Patterns: {}", patterns::NAMES.join(", "));
        return;
    }

    match args[1].as_str() {
        "compare" => compare_all(),
        "level" => {
            let level = match args.get(2).map(|a| a.parse::<i32>()) {
                Some(Ok(n)) => n,
                _ => {
                    println!("Error: level needs a number");
                    return;
                }
            };
            let instructions = patterns::for_level(level, &mut rand::thread_rng());
            run_one(&format!("level {level}"), instructions);
        }
        name => match patterns::by_name(name) {
            Some(instructions) => run_one(name, instructions),
            None => {
                println!("Unknown pattern '{}'", name);
                println!("Patterns: {}", patterns::NAMES.join(", "));
            }
        },
    }
}

fn run_one(label: &str, instructions: Vec<barrage::Instruction>) {
    let program = match Program::new(instructions) {
        Ok(p) => Arc::new(p),
        Err(errors) => {
            println!("Pattern errors in '{label}':");
            for e in errors {
                println!("  - {e}");
            }
            return;
        }
    };

    let (left, right, top, bottom) = BOUNDS;
    let mut evaluator = Evaluator::new(
        program,
        Vec2::default(),
        Some(Bounds::new(left, right, top, bottom)),
    );
    let mut rng = rand::thread_rng();
    evaluator.simulate(TICKS, &mut rng);

    println!("=== {label} ===");
    print_statistics(evaluator.frames());
}

fn print_statistics(frames: &[barrage::FrameSnapshot]) {
    println!("frames simulated: {}", frames.len());
    println!("total bullets spawned: {}", stats::total_spawned(frames));
    println!("max bullets on screen: {}", stats::max_concurrent(frames));

    let (min_x, max_x, min_y, max_y) = stats::coverage_bbox(frames);
    println!("coverage area: ({min_x:.1}, {min_y:.1}) to ({max_x:.1}, {max_y:.1})");
    println!("coverage size: {:.1} x {:.1}", max_x - min_x, max_y - min_y);
    println!(
        "average bullets per frame: {:.1}",
        stats::average_per_tick(frames)
    );
}

//side-by-side run over the whole library, scored in parallel
fn compare_all() {
    let mut programs = Vec::new();
    let mut labels = Vec::new();
    for name in patterns::NAMES {
        //library patterns are validated by their own tests, but report
        //defects instead of assuming
        match Program::new(patterns::by_name(name).unwrap_or_default()) {
            Ok(p) => {
                programs.push(Arc::new(p));
                labels.push(name);
            }
            Err(errors) => {
                println!("skipping '{name}': {} error(s)", errors.len());
            }
        }
    }

    let (left, right, top, bottom) = BOUNDS;
    let bounds = Some(Bounds::new(left, right, top, bottom));
    let target = 20.0;
    let scores = stats::score_batch(&programs, Vec2::default(), bounds, TICKS, target, 0);

    println!(
        "{:<20} {:>8} {:>6} {:>6} {:>12} {:>10}",
        "pattern", "spawned", "max", "avg", "coverage", "score"
    );
    for (i, program) in programs.iter().enumerate() {
        let mut evaluator = Evaluator::new(Arc::clone(program), Vec2::default(), bounds);
        let mut rng = rand::thread_rng();
        evaluator.simulate(TICKS, &mut rng);
        let frames = evaluator.frames();

        let (min_x, max_x, min_y, max_y) = stats::coverage_bbox(frames);
        println!(
            "{:<20} {:>8} {:>6} {:>6.1} {:>5.0}x{:<6.0} {:>10.1}",
            labels[i],
            stats::total_spawned(frames),
            stats::max_concurrent(frames),
            stats::average_per_tick(frames),
            max_x - min_x,
            max_y - min_y,
            scores[i],
        );
    }
}
