//patterns.rs -> built-in pattern tables and generators
//hand-tuned instruction lists for the enemy arsenal, a difficulty ladder
//over them, and a small procedural generator for leveled play. everything
//returns raw instruction lists - callers build a validated Program.

use rand::Rng;

use crate::types::{Color, Instruction, Param, ParamValue};

pub const NAMES: [&str; 8] = [
    "basic_spread",
    "rapid_fire",
    "circular_burst",
    "spiral",
    "random_chaos",
    "wave_pattern",
    "focused_beam",
    "alternating_sides",
];

//which named pattern each difficulty band starts with
pub const DIFFICULTY_LADDER: [&str; 6] = [
    "basic_spread",   //level 1-2
    "rapid_fire",     //level 3-4
    "circular_burst", //level 5-6
    "wave_pattern",   //level 7-8
    "spiral",         //level 9
    "random_chaos",   //level 10+
];

fn scalars(values: &[f32]) -> Vec<ParamValue> {
    values.iter().map(|v| ParamValue::Scalar(*v)).collect()
}

pub fn by_name(name: &str) -> Option<Vec<Instruction>> {
    let instructions = match name {
        "basic_spread" => vec![
            Instruction::SetCount(5),
            Instruction::SetAngle(90.0), //straight down
            Instruction::SetSpread(60.0),
            Instruction::SetSpeed(4.5),
            Instruction::SetSize(12.0),
            Instruction::SetColor(Color::new(255, 51, 0)),
            Instruction::Wait(45),
        ],
        "rapid_fire" => vec![
            Instruction::SetCount(3),
            Instruction::SetAngle(90.0),
            Instruction::SetSpread(30.0),
            Instruction::SetSpeed(5.0),
            Instruction::SetSize(10.0),
            Instruction::SetColor(Color::new(255, 80, 80)),
            Instruction::Wait(15),
        ],
        "circular_burst" => vec![
            Instruction::SetCount(8),
            Instruction::SetAngle(0.0),
            Instruction::SetSpread(360.0), //full circle
            Instruction::SetSpeed(3.5),
            Instruction::SetSize(14.0),
            Instruction::SetColor(Color::new(255, 100, 0)),
            Instruction::Wait(60),
        ],
        "spiral" => vec![
            Instruction::LoopBegin(12),
            Instruction::SetCount(3),
            Instruction::SequenceSet(
                Param::Angle,
                scalars(&[
                    0.0, 30.0, 60.0, 90.0, 120.0, 150.0, 180.0, 210.0, 240.0, 270.0, 300.0, 330.0,
                ]),
            ),
            Instruction::SetSpread(15.0),
            Instruction::SetSpeed(4.0),
            Instruction::SetSize(8.0),
            Instruction::SetColor(Color::new(255, 150, 50)),
            Instruction::Wait(8),
            Instruction::LoopEnd,
            Instruction::Wait(90), //pause between spirals
        ],
        "random_chaos" => vec![
            Instruction::LoopBegin(8),
            Instruction::SetCount(2),
            Instruction::RandomSet(Param::Angle, 0.0, 360.0),
            Instruction::RandomSet(Param::Speed, 3.0, 6.0),
            Instruction::SetSpread(45.0),
            Instruction::SetSize(10.0),
            Instruction::RandomSet(Param::Color, 0.0, 0.0), //range unused
            Instruction::Wait(12),
            Instruction::LoopEnd,
            Instruction::Wait(60),
        ],
        "wave_pattern" => vec![
            Instruction::LoopBegin(5),
            Instruction::SetCount(7),
            Instruction::SetAngle(90.0),
            Instruction::SetSpread(120.0),
            Instruction::SequenceSet(
                Param::Speed,
                scalars(&[3.0, 4.0, 5.0, 4.0, 3.0]),
            ),
            Instruction::SetSize(11.0),
            Instruction::SetColor(Color::new(255, 120, 120)),
            Instruction::Wait(20),
            Instruction::LoopEnd,
            Instruction::Wait(100),
        ],
        "focused_beam" => vec![
            Instruction::SetCount(1),
            Instruction::SetAngle(90.0),
            Instruction::SetSpread(0.0),
            Instruction::SetSpeed(7.0), //fast single shot
            Instruction::SetSize(8.0),
            Instruction::SetColor(Color::new(255, 255, 0)),
            Instruction::Wait(30),
        ],
        "alternating_sides" => vec![
            Instruction::LoopBegin(10),
            Instruction::SetCount(3),
            Instruction::SequenceSet(Param::Angle, scalars(&[45.0, 135.0])), //left then right
            Instruction::SetSpread(30.0),
            Instruction::SetSpeed(4.5),
            Instruction::SetSize(12.0),
            Instruction::SetColor(Color::new(255, 80, 120)),
            Instruction::Wait(25),
            Instruction::LoopEnd,
            Instruction::Wait(75),
        ],
        _ => return None,
    };
    Some(instructions)
}

//the ladder entry for a level, clamped at both ends
pub fn for_difficulty(level: i32) -> Vec<Instruction> {
    let level = level.max(1);
    let index = (((level - 1) / 2) as usize).min(DIFFICULTY_LADDER.len() - 1);
    by_name(DIFFICULTY_LADDER[index]).unwrap_or_default()
}

//procedurally generated leveled pattern: everything jittered around
//level-scaled midpoints
pub fn for_level(level: i32, rng: &mut impl Rng) -> Vec<Instruction> {
    let level = level.max(1);
    let angle = 90.0 + rng.gen_range(-10..=10) as f32;
    let count = (level as f32 * 1.5) as i32 + rng.gen_range(1..=3);
    let speed = 4.5 + rng.gen_range(-2.0..=2.0);
    let size = (6 + level * 2 + rng.gen_range(-3..=3)) as f32;
    let wait = (90 - level * 10 - rng.gen_range(0..=30)).max(0) as u32;
    let spread = rng.gen_range(30..=120) as f32;

    vec![
        Instruction::LoopBegin(2),
        Instruction::SetAngle(angle),
        Instruction::SetCount(count),
        Instruction::SetSpeed(speed),
        Instruction::SetSize(size),
        Instruction::SetColor(Color::new(255, 51, 0)),
        Instruction::Wait(wait),
        Instruction::SetSpread(spread),
        Instruction::LoopEnd,
    ]
}

pub fn random_pick(rng: &mut impl Rng) -> Vec<Instruction> {
    let name = NAMES[rng.gen_range(0..NAMES.len())];
    by_name(name).unwrap_or_default()
}
