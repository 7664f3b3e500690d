pub mod adversary;
pub mod constants;
pub mod engine;
pub mod events;
pub mod grid;
pub mod input;
pub mod session;
pub mod spawn;
pub mod timers;
pub mod types;
