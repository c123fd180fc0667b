
// files tldr:
// - types.rs       : data structures
// - validate.rs    : checks patterns before they can run
// - interpreter.rs : the resumable pattern state machine
// - evaluator.rs   : headless simulation + frame history
// - stats.rs       : queries and scoring over frame histories
// - patterns.rs    : built-in pattern tables and generators

pub mod evaluator;
pub mod interpreter;
pub mod patterns;
pub mod stats;
pub mod types;
pub mod validate;

pub use evaluator::{BulletState, Evaluator, FrameSnapshot};
pub use interpreter::Interpreter;
pub use types::{Bounds, Color, Instruction, Param, ParamValue, Program, Spawn, Vec2};
pub use validate::PatternError;
