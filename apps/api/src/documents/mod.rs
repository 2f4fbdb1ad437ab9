pub mod handlers;
pub mod prompts;
pub mod quality_gate;
pub mod writer;
