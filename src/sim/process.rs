//! Process abstraction for cooperatively scheduled behaviors.

use super::clock::Minutes;

/// What a process asks the scheduler to do after its body returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Suspend and resume after the given number of virtual minutes.
    ///
    /// A negative duration is a fatal kernel error.
    Wait(Minutes),
    /// Terminate; the process is never resumed again.
    Halt,
}

/// An independently scheduled behavior with its own suspend/resume points.
///
/// The scheduler resumes exactly one process at a time and hands it the
/// shared world by `&mut`, so process bodies never need locks. A process
/// relinquishes control only by returning a [`Command`]; it must not block.
pub trait Process<W> {
    /// Runs the process body at virtual time `now`.
    ///
    /// State that must survive across waits lives in the implementing
    /// struct (typically a phase tag).
    fn resume(&mut self, now: Minutes, world: &mut W) -> Command;

    /// Human-readable process name.
    fn name(&self) -> &'static str;
}
