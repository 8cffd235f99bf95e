pub mod hop;
pub mod job;
pub mod scheduler;

pub use hop::{HopOrchestrator, HopPhase};
pub use job::QuizJob;
pub use scheduler::JobScheduler;
