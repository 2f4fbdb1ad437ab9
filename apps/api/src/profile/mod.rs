pub mod handlers;
pub mod intake;
pub mod prompts;
