//interpreter.rs -> the pattern state machine
//executes exactly one instruction per tick (while no wait is pending) and
//turns the current emitter values into spawn descriptors. resumable: every
//piece of cursor/loop/wait state needed to continue on the next tick lives
//here and nowhere else.

use std::sync::Arc;

use rand::Rng;

use crate::types::{Color, Instruction, Param, ParamValue, Program, Spawn, Vec2};

//last-set emitter values. fixed shape, so every parameter always exists and
//lookups never miss.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterState {
    pub angle: f32,  //degrees, 0 = +x, 90 = +y (screen-down)
    pub count: f32,  //truncated to an integer at spawn time
    pub speed: f32,
    pub size: f32,
    pub spread: f32, //degrees, fanned symmetrically around angle
    pub color: Color,
}

impl Default for EmitterState {
    fn default() -> Self {
        Self {
            angle: 270.0,
            count: 1.0,
            speed: 1.5,
            size: 3.0,
            spread: 0.0,
            color: Color::WHITE,
        }
    }
}

impl EmitterState {
    //writes routed by parameter kind; random and sequence overrides land here.
    //mismatched shapes were rejected when the program was built.
    fn set(&mut self, param: Param, value: ParamValue) {
        match (param, value) {
            (Param::Angle, ParamValue::Scalar(v)) => self.angle = v,
            (Param::Count, ParamValue::Scalar(v)) => self.count = v,
            (Param::Speed, ParamValue::Scalar(v)) => self.speed = v,
            (Param::Size, ParamValue::Scalar(v)) => self.size = v,
            (Param::Spread, ParamValue::Scalar(v)) => self.spread = v,
            (Param::Color, ParamValue::Color(c)) => self.color = c,
            _ => {}
        }
    }
}

//one active loop: where endloop jumps back to and how many passes remain

#[derive(Debug, Clone, Copy, PartialEq)]
struct LoopFrame {
    return_cursor: usize,
    remaining: u32,
}

pub struct Interpreter {
    program: Arc<Program>,
    cursor: usize,
    wait_counter: u32,
    loop_stack: Vec<LoopFrame>,
    values: EmitterState,
    sequence_cursors: [usize; Param::COUNT],
}

impl Interpreter {
    pub fn new(program: Arc<Program>) -> Self {
        Self {
            program,
            cursor: 0,
            wait_counter: 0,
            loop_stack: Vec::new(),
            values: EmitterState::default(),
            sequence_cursors: [0; Param::COUNT],
        }
    }

    //back to construction-time state. the program itself is untouched.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.wait_counter = 0;
        self.loop_stack.clear();
        self.values = EmitterState::default();
        self.sequence_cursors = [0; Param::COUNT];
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    pub fn waiting(&self) -> bool {
        self.wait_counter > 0
    }

    //run one simulation tick at the given emitter position.
    //executes at most one instruction, then emits one spawn descriptor per
    //bullet unless a wait is pending. never fails for a validated program.
    pub fn tick(&mut self, origin: Vec2, rng: &mut impl Rng) -> Vec<Spawn> {
        if self.wait_counter > 0 {
            self.wait_counter -= 1;
            return Vec::new();
        }

        if self.program.is_empty() {
            return Vec::new();
        }
        if self.cursor >= self.program.len() {
            //normally already wrapped at the end of the previous tick
            self.cursor = 0;
        }

        let program = Arc::clone(&self.program);
        let mut jumped = false;

        match &program.instructions()[self.cursor] {
            Instruction::SetAngle(v) => self.values.angle = *v,
            Instruction::SetCount(v) => self.values.count = *v as f32,
            Instruction::SetSpeed(v) => self.values.speed = *v,
            Instruction::SetSize(v) => self.values.size = *v,
            Instruction::SetColor(c) => self.values.color = *c,
            Instruction::SetSpread(v) => self.values.spread = *v,
            Instruction::Wait(n) => self.wait_counter = *n,
            Instruction::LoopBegin(n) => {
                self.loop_stack.push(LoopFrame {
                    return_cursor: self.cursor + 1,
                    remaining: *n,
                });
            }
            Instruction::LoopEnd => {
                //endloop without an open loop is a deliberate no-op
                if let Some(top) = self.loop_stack.last_mut() {
                    top.remaining = top.remaining.saturating_sub(1);
                    if top.remaining > 0 {
                        self.cursor = top.return_cursor;
                        jumped = true;
                    } else {
                        self.loop_stack.pop();
                    }
                }
            }
            Instruction::RandomSet(param, lo, hi) => {
                if *param == Param::Color {
                    //range operands are ignored for color: full rgb draw
                    let color = Color::new(
                        rng.gen_range(0..=255),
                        rng.gen_range(0..=255),
                        rng.gen_range(0..=255),
                    );
                    self.values.set(Param::Color, ParamValue::Color(color));
                } else {
                    let drawn = rng.gen_range(*lo..=*hi);
                    self.values.set(*param, ParamValue::Scalar(drawn));
                }
            }
            Instruction::SequenceSet(param, values) => {
                let slot = param.index();
                let cursor = self.sequence_cursors[slot];
                self.values.set(*param, values[cursor % values.len()]);
                //raw increment, the modulo is applied on the next read
                self.sequence_cursors[slot] = cursor + 1;
            }
        }

        //a freshly set wait suppresses this tick's emission, everything else
        //fires immediately
        let spawns = if self.wait_counter == 0 {
            self.materialize(origin)
        } else {
            Vec::new()
        };

        if !jumped {
            self.cursor += 1;
            if self.cursor >= self.program.len() {
                self.cursor = 0;
            }
        }

        spawns
    }

    //fan the current emitter values out into per-bullet descriptors
    fn materialize(&self, origin: Vec2) -> Vec<Spawn> {
        let count = self.values.count as i32;
        if count <= 0 {
            return Vec::new();
        }

        let mut spawns = Vec::with_capacity(count as usize);
        for i in 0..count {
            let angle = if count > 1 && self.values.spread > 0.0 {
                let fraction = i as f32 / (count - 1) as f32;
                self.values.angle - self.values.spread / 2.0 + fraction * self.values.spread
            } else {
                self.values.angle
            };

            let radians = angle.to_radians();
            let velocity = Vec2::new(
                radians.cos() * self.values.speed,
                radians.sin() * self.values.speed,
            );

            spawns.push(Spawn {
                position: origin,
                velocity,
                size: self.values.size,
                color: self.values.color,
            });
        }
        spawns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn build(instructions: Vec<Instruction>) -> Arc<Program> {
        Arc::new(Program::new(instructions).unwrap())
    }

    fn spawn_angle(spawn: &Spawn) -> f32 {
        spawn.velocity.y.atan2(spawn.velocity.x).to_degrees()
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_program_never_spawns() {
        let mut interp = Interpreter::new(build(Vec::new()));
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..10 {
            assert!(interp.tick(Vec2::default(), &mut rng).is_empty());
        }
    }

    #[test]
    fn deterministic_without_random_instructions() {
        let instructions = vec![
            Instruction::LoopBegin(3),
            Instruction::SetCount(2),
            Instruction::SequenceSet(
                Param::Angle,
                vec![
                    ParamValue::Scalar(0.0),
                    ParamValue::Scalar(120.0),
                    ParamValue::Scalar(240.0),
                ],
            ),
            Instruction::SetSpread(30.0),
            Instruction::Wait(2),
            Instruction::LoopEnd,
            Instruction::Wait(5),
        ];
        let mut a = Interpreter::new(build(instructions.clone()));
        let mut b = Interpreter::new(build(instructions));
        //different seeds on purpose: no instruction consults the rng
        let mut rng_a = StdRng::seed_from_u64(1);
        let mut rng_b = StdRng::seed_from_u64(999);

        for tick in 0..40 {
            let origin = Vec2::new(tick as f32, 0.0);
            assert_eq!(a.tick(origin, &mut rng_a), b.tick(origin, &mut rng_b));
        }
    }

    #[test]
    fn wait_counts_down_one_tick_at_a_time() {
        let mut interp = Interpreter::new(build(vec![Instruction::Wait(5)]));
        let mut rng = StdRng::seed_from_u64(0);

        //tick 0 executes the wait itself, ticks 1..=5 burn the countdown,
        //tick 6 executes the instruction again. nothing ever spawns.
        let expected_wait = [5, 4, 3, 2, 1, 0, 5, 4, 3, 2, 1, 0];
        for (tick, expected) in expected_wait.iter().enumerate() {
            let spawns = interp.tick(Vec2::default(), &mut rng);
            assert!(spawns.is_empty(), "tick {tick} spawned");
            assert_eq!(interp.wait_counter, *expected, "tick {tick}");
        }
    }

    #[test]
    fn wait_zero_does_not_suppress_emission() {
        let mut interp = Interpreter::new(build(vec![Instruction::Wait(0)]));
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(interp.tick(Vec2::default(), &mut rng).len(), 1);
    }

    #[test]
    fn loop_body_runs_exactly_the_requested_number_of_times() {
        let mut interp = Interpreter::new(build(vec![
            Instruction::LoopBegin(3),
            Instruction::SequenceSet(
                Param::Angle,
                vec![
                    ParamValue::Scalar(10.0),
                    ParamValue::Scalar(20.0),
                    ParamValue::Scalar(30.0),
                    ParamValue::Scalar(40.0),
                    ParamValue::Scalar(50.0),
                ],
            ),
            Instruction::LoopEnd,
        ]));
        let mut rng = StdRng::seed_from_u64(0);

        //begin, (seq, end) x3 with two back-jumps: seven ticks to drain
        let mut body_angles = Vec::new();
        for _ in 0..7 {
            let spawns = interp.tick(Vec2::default(), &mut rng);
            assert_eq!(spawns.len(), 1);
            body_angles.push(spawn_angle(&spawns[0]));
        }

        assert!(interp.loop_stack.is_empty());
        assert_eq!(interp.cursor, 0); //wrapped after falling through
        assert_eq!(interp.sequence_cursors[Param::Angle.index()], 3);
        assert_close(body_angles[1], 10.0);
        assert_close(body_angles[3], 20.0);
        assert_close(body_angles[5], 30.0);
    }

    #[test]
    fn nested_loops_multiply_body_executions() {
        let mut interp = Interpreter::new(build(vec![
            Instruction::LoopBegin(2),
            Instruction::LoopBegin(2),
            Instruction::SequenceSet(
                Param::Angle,
                vec![
                    ParamValue::Scalar(10.0),
                    ParamValue::Scalar(20.0),
                    ParamValue::Scalar(30.0),
                    ParamValue::Scalar(40.0),
                    ParamValue::Scalar(50.0),
                    ParamValue::Scalar(60.0),
                ],
            ),
            Instruction::LoopEnd,
            Instruction::LoopEnd,
        ]));
        let mut rng = StdRng::seed_from_u64(0);

        //full cycle of the 2x2 nest takes thirteen ticks
        for _ in 0..13 {
            interp.tick(Vec2::default(), &mut rng);
        }

        assert!(interp.loop_stack.is_empty());
        assert_eq!(interp.cursor, 0);
        assert_eq!(interp.sequence_cursors[Param::Angle.index()], 4);
        assert_close(interp.values.angle, 40.0);
    }

    #[test]
    fn unmatched_loop_end_falls_through() {
        let mut interp = Interpreter::new(build(vec![
            Instruction::LoopEnd,
            Instruction::SetAngle(45.0),
        ]));
        let mut rng = StdRng::seed_from_u64(0);

        let first = interp.tick(Vec2::default(), &mut rng);
        assert_eq!(first.len(), 1);
        assert_eq!(interp.cursor, 1);

        let second = interp.tick(Vec2::default(), &mut rng);
        assert_close(spawn_angle(&second[0]), 45.0);
        assert_eq!(interp.cursor, 0);
    }

    #[test]
    fn spread_fans_symmetrically_around_the_base_angle() {
        let mut interp = Interpreter::new(build(vec![
            Instruction::SetCount(5),
            Instruction::SetAngle(90.0),
            Instruction::SetSpread(60.0),
        ]));
        let mut rng = StdRng::seed_from_u64(0);

        interp.tick(Vec2::default(), &mut rng);
        interp.tick(Vec2::default(), &mut rng);
        let spawns = interp.tick(Vec2::default(), &mut rng);

        assert_eq!(spawns.len(), 5);
        let expected = [60.0, 75.0, 90.0, 105.0, 120.0];
        for (spawn, angle) in spawns.iter().zip(expected) {
            assert_close(spawn_angle(spawn), angle);
        }
    }

    #[test]
    fn single_bullet_ignores_spread() {
        let mut interp = Interpreter::new(build(vec![
            Instruction::SetSpread(90.0),
            Instruction::SetAngle(30.0),
        ]));
        let mut rng = StdRng::seed_from_u64(0);

        interp.tick(Vec2::default(), &mut rng);
        let spawns = interp.tick(Vec2::default(), &mut rng);
        assert_eq!(spawns.len(), 1);
        assert_close(spawn_angle(&spawns[0]), 30.0);
    }

    #[test]
    fn sequences_cycle_per_parameter() {
        let mut interp = Interpreter::new(build(vec![Instruction::SequenceSet(
            Param::Angle,
            vec![
                ParamValue::Scalar(10.0),
                ParamValue::Scalar(20.0),
                ParamValue::Scalar(30.0),
            ],
        )]));
        let mut rng = StdRng::seed_from_u64(0);

        let mut angles = Vec::new();
        for _ in 0..4 {
            let spawns = interp.tick(Vec2::default(), &mut rng);
            angles.push(spawn_angle(&spawns[0]));
        }
        for (actual, expected) in angles.iter().zip([10.0, 20.0, 30.0, 10.0]) {
            assert_close(*actual, expected);
        }
    }

    #[test]
    fn sequence_cursors_are_independent_per_parameter() {
        let mut interp = Interpreter::new(build(vec![
            Instruction::SequenceSet(
                Param::Angle,
                vec![ParamValue::Scalar(0.0), ParamValue::Scalar(180.0)],
            ),
            Instruction::SequenceSet(
                Param::Speed,
                vec![
                    ParamValue::Scalar(1.0),
                    ParamValue::Scalar(2.0),
                    ParamValue::Scalar(3.0),
                ],
            ),
        ]));
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..4 {
            interp.tick(Vec2::default(), &mut rng);
        }
        assert_eq!(interp.sequence_cursors[Param::Angle.index()], 2);
        assert_eq!(interp.sequence_cursors[Param::Speed.index()], 2);
        assert_close(interp.values.angle, 180.0);
        assert_close(interp.values.speed, 2.0);
    }

    #[test]
    fn random_draws_are_reproducible_with_the_same_seed() {
        let instructions = vec![
            Instruction::RandomSet(Param::Angle, 10.0, 20.0),
            Instruction::RandomSet(Param::Speed, 1.0, 2.0),
            Instruction::RandomSet(Param::Color, 0.0, 0.0),
        ];
        let mut a = Interpreter::new(build(instructions.clone()));
        let mut b = Interpreter::new(build(instructions));
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);

        for _ in 0..9 {
            let spawns_a = a.tick(Vec2::default(), &mut rng_a);
            let spawns_b = b.tick(Vec2::default(), &mut rng_b);
            assert_eq!(spawns_a, spawns_b);
        }
        assert!(a.values.angle >= 10.0 && a.values.angle <= 20.0);
        assert!(a.values.speed >= 1.0 && a.values.speed <= 2.0);
    }

    #[test]
    fn zero_count_emits_nothing_but_still_advances() {
        let mut interp = Interpreter::new(build(vec![
            Instruction::SetCount(0),
            Instruction::SetCount(2),
        ]));
        let mut rng = StdRng::seed_from_u64(0);

        assert!(interp.tick(Vec2::default(), &mut rng).is_empty());
        assert_eq!(interp.cursor, 1);
        assert_eq!(interp.tick(Vec2::default(), &mut rng).len(), 2);
    }

    #[test]
    fn descriptors_are_snapshots_not_references() {
        let mut interp = Interpreter::new(build(vec![
            Instruction::SetAngle(0.0),
            Instruction::SetAngle(180.0),
        ]));
        let mut rng = StdRng::seed_from_u64(0);

        let first = interp.tick(Vec2::default(), &mut rng);
        interp.tick(Vec2::default(), &mut rng);
        //the later angle write must not bleed into the earlier descriptor
        assert_close(spawn_angle(&first[0]), 0.0);
    }

    #[test]
    fn spawns_use_the_origin_passed_each_tick() {
        let mut interp = Interpreter::new(build(vec![Instruction::SetCount(1)]));
        let mut rng = StdRng::seed_from_u64(0);

        let spawns = interp.tick(Vec2::new(42.0, -7.0), &mut rng);
        assert_eq!(spawns[0].position, Vec2::new(42.0, -7.0));
    }

    #[test]
    fn reset_matches_a_fresh_interpreter() {
        let instructions = vec![
            Instruction::LoopBegin(4),
            Instruction::SequenceSet(
                Param::Size,
                vec![ParamValue::Scalar(2.0), ParamValue::Scalar(4.0)],
            ),
            Instruction::Wait(3),
            Instruction::LoopEnd,
        ];
        let mut used = Interpreter::new(build(instructions.clone()));
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..11 {
            used.tick(Vec2::default(), &mut rng);
        }
        used.reset();

        let mut fresh = Interpreter::new(build(instructions));
        let mut rng_used = StdRng::seed_from_u64(5);
        let mut rng_fresh = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            assert_eq!(
                used.tick(Vec2::default(), &mut rng_used),
                fresh.tick(Vec2::default(), &mut rng_fresh)
            );
        }
    }
}
