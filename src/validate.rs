//validate.rs -> construction-time checks for pattern programs
//a program that gets past here can never fail the interpreter at tick time,
//so ticking stays a total function. all defects are collected instead of
//stopping at the first one.

use thiserror::Error;

use crate::types::{Instruction, Param, ParamValue, Program};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatternError {
    #[error("instruction {index}: loop count must be at least 1")]
    EmptyLoop { index: usize },
    #[error("instruction {index}: sequence for {param:?} has no values")]
    EmptySequence { index: usize, param: Param },
    #[error("instruction {index}: random range for {param:?} is inverted ({lo} > {hi})")]
    InvertedRange {
        index: usize,
        param: Param,
        lo: f32,
        hi: f32,
    },
    #[error("instruction {index}: sequence value {position} does not fit {param:?}")]
    ValueKindMismatch {
        index: usize,
        param: Param,
        position: usize,
    },
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Result<Program, Vec<PatternError>> {
        let mut errors = Vec::new();

        for (index, instruction) in instructions.iter().enumerate() {
            match instruction {
                Instruction::LoopBegin(0) => {
                    errors.push(PatternError::EmptyLoop { index });
                }
                Instruction::RandomSet(param, lo, hi) => {
                    //color draws ignore the range entirely (full rgb randomization)
                    if *param != Param::Color && lo > hi {
                        errors.push(PatternError::InvertedRange {
                            index,
                            param: *param,
                            lo: *lo,
                            hi: *hi,
                        });
                    }
                }
                Instruction::SequenceSet(param, values) => {
                    if values.is_empty() {
                        errors.push(PatternError::EmptySequence { index, param: *param });
                    }
                    for (position, value) in values.iter().enumerate() {
                        if !value_fits(*param, value) {
                            errors.push(PatternError::ValueKindMismatch {
                                index,
                                param: *param,
                                position,
                            });
                        }
                    }
                }
                _ => {}
            }
        }

        if errors.is_empty() {
            Ok(Program { instructions })
        } else {
            Err(errors)
        }
    }
}

//color takes color values, every other parameter takes scalars
fn value_fits(param: Param, value: &ParamValue) -> bool {
    match (param, value) {
        (Param::Color, ParamValue::Color(_)) => true,
        (Param::Color, ParamValue::Scalar(_)) => false,
        (_, ParamValue::Scalar(_)) => true,
        (_, ParamValue::Color(_)) => false,
    }
}
