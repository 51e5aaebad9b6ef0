pub mod agent;
pub mod behavior;
pub mod command;
pub mod config;
pub mod error;
pub mod fleet;
pub mod math;
pub mod node;
pub mod transport;
pub mod world;
