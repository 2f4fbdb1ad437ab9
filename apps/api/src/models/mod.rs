pub mod documents;
pub mod job;
pub mod profile;
