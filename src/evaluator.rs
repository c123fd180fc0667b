//evaluator.rs -> headless pattern simulator
//drives an interpreter without creating live game entities: bullets are plain
//records advanced by their velocity once per tick, snapshotted every frame,
//and culled once they leave the bounds rectangle. the frame history is what
//the stats layer and external optimizers consume.

use std::sync::Arc;

use rand::Rng;

use crate::interpreter::Interpreter;
use crate::types::{Bounds, Color, Program, Vec2};

//a live bullet inside the simulation

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub color: Color,
    pub age: u32, //frames since spawn
}

//every bullet alive at one frame, copied out before the kinematic update so
//a bullet spawned this frame shows up with age 0

#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub frame: usize,
    pub bullets: Vec<BulletState>,
}

impl FrameSnapshot {
    pub fn bullet_count(&self) -> usize {
        self.bullets.len()
    }

    //bullets within a circular area around center
    pub fn count_within(&self, center: Vec2, radius: f32) -> usize {
        self.bullets
            .iter()
            .filter(|b| b.position.distance_to(center) <= radius)
            .count()
    }
}

pub struct Evaluator {
    origin: Vec2,
    bounds: Bounds,
    interpreter: Interpreter,
    bullets: Vec<BulletState>,
    frames: Vec<FrameSnapshot>,
}

impl Evaluator {
    pub fn new(program: Arc<Program>, origin: Vec2, bounds: Option<Bounds>) -> Self {
        Self {
            origin,
            bounds: bounds.unwrap_or_default(),
            interpreter: Interpreter::new(program),
            bullets: Vec::new(),
            frames: Vec::new(),
        }
    }

    //run the simulation from a clean slate for the given number of ticks.
    //strictly sequential: every tick reads the state the previous one wrote.
    pub fn simulate(&mut self, ticks: usize, rng: &mut impl Rng) -> &[FrameSnapshot] {
        self.frames.clear();
        self.bullets.clear();
        self.interpreter.reset();

        for frame in 0..ticks {
            self.step(frame, rng);
        }
        &self.frames
    }

    pub fn frames(&self) -> &[FrameSnapshot] {
        &self.frames
    }

    //one frame: spawn, snapshot, integrate, cull
    fn step(&mut self, frame: usize, rng: &mut impl Rng) {
        //the origin is fixed for the whole run, the evaluator never moves
        //the emitter
        for spawn in self.interpreter.tick(self.origin, rng) {
            self.bullets.push(BulletState {
                position: spawn.position,
                velocity: spawn.velocity,
                size: spawn.size,
                color: spawn.color,
                age: 0,
            });
        }

        //snapshot before the kinematic update so ages line up with the frame
        self.frames.push(FrameSnapshot {
            frame,
            bullets: self.bullets.clone(),
        });

        for bullet in &mut self.bullets {
            bullet.position += bullet.velocity;
            bullet.age += 1;
        }

        let bounds = self.bounds;
        self.bullets.retain(|b| bounds.contains(b.position));
    }
}
