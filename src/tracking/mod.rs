pub mod export;
pub mod extractor;
pub mod history;
pub mod monitor;
pub mod peak;
pub mod samples;
pub mod session;
