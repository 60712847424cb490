pub mod cochange;
pub mod log;
pub mod pipeline;
pub mod render;
pub mod tree;
