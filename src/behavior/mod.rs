pub mod bt;
pub mod engine;
pub mod formation;
pub mod tactics;

pub use engine::{Blackboard, DecisionEngine};
