pub mod dedup;
pub mod handlers;
pub mod html;
pub mod import;
pub mod job_board;
pub mod pipeline;
pub mod prompts;
pub mod search_scrape;
pub mod source;
pub mod synthesis;
