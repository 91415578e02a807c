pub mod completion;
pub mod config;
pub mod error;
pub mod launcher;
pub mod loader;
pub mod report;
pub mod scheduler;
pub mod shutdown;
