pub mod handlers;
pub mod investigator;
pub mod prompts;
