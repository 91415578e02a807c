pub mod allocator;
pub mod job;
pub mod registry;
pub mod runner;

pub use allocator::SlotAllocator;
pub use job::{Assignment, Job, JobSpec};
pub use registry::JobRegistry;
pub use runner::CommandsRunner;
