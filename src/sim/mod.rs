//! Discrete-event simulation kernel.

/// Virtual clock in simulation minutes.
pub mod clock;
/// Time-ordered event queue with FIFO tie-breaking.
pub mod event;
/// Process trait and scheduler commands.
pub mod process;
/// Cooperative executor.
pub mod scheduler;

pub use clock::{Clock, Minutes};
pub use event::ProcessId;
pub use process::{Command, Process};
pub use scheduler::Scheduler;
