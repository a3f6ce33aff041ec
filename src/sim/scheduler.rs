//! Cooperative event scheduler driving all simulation processes.

use super::clock::{Clock, Minutes};
use super::event::{EventQueue, ProcessId};
use super::process::{Command, Process};

/// The discrete-event kernel: virtual clock, event queue, process table.
///
/// Processes are registered with [`Scheduler::spawn`] and driven by
/// [`Scheduler::run`]. Exactly one process body executes at any instant;
/// the shared world `W` is passed to the running process by `&mut`, which
/// serializes all access to shared readouts without locks.
///
/// # Examples
///
/// ```
/// use microgrid_sim::sim::clock::Minutes;
/// use microgrid_sim::sim::process::{Command, Process};
/// use microgrid_sim::sim::scheduler::Scheduler;
///
/// struct Ticker;
///
/// impl Process<Vec<f64>> for Ticker {
///     fn resume(&mut self, now: Minutes, log: &mut Vec<f64>) -> Command {
///         log.push(now);
///         Command::Wait(10.0)
///     }
///     fn name(&self) -> &'static str {
///         "ticker"
///     }
/// }
///
/// let mut scheduler = Scheduler::new();
/// scheduler.spawn(0.0, Box::new(Ticker));
/// let mut log = Vec::new();
/// scheduler.run(&mut log, 30.0);
/// assert_eq!(log, vec![0.0, 10.0, 20.0, 30.0]);
/// ```
pub struct Scheduler<W> {
    clock: Clock,
    queue: EventQueue,
    processes: Vec<Box<dyn Process<W>>>,
}

impl<W> Scheduler<W> {
    /// Creates an empty scheduler at virtual time zero.
    pub fn new() -> Self {
        Self {
            clock: Clock::new(),
            queue: EventQueue::new(),
            processes: Vec::new(),
        }
    }

    /// Current virtual time in minutes.
    pub fn now(&self) -> Minutes {
        self.clock.now()
    }

    /// Registers a process and schedules its first resume at `start`.
    ///
    /// Activation order matters for same-time determinism: processes
    /// spawned earlier fire earlier at equal times. The meter must
    /// therefore be spawned after the producer processes it samples.
    pub fn spawn(&mut self, start: Minutes, process: Box<dyn Process<W>>) -> ProcessId {
        let pid = ProcessId(self.processes.len());
        self.processes.push(process);
        self.schedule(start, pid);
        pid
    }

    /// Inserts a resume for `pid` at `time`.
    ///
    /// # Panics
    ///
    /// Panics if `time` is earlier than the current clock. Scheduling
    /// into the past is a kernel invariant violation and aborts the run.
    pub fn schedule(&mut self, time: Minutes, pid: ProcessId) {
        assert!(
            time >= self.clock.now(),
            "cannot schedule into the past: t={} < clock={}",
            time,
            self.clock.now()
        );
        self.queue.push(time, pid);
    }

    /// Runs until the event queue drains or the clock would pass `until`.
    ///
    /// Repeatedly pops the earliest event, advances the clock to its fire
    /// time, and resumes the associated process. A process returning
    /// [`Command::Wait`] is rescheduled at `now + duration`; one returning
    /// [`Command::Halt`] is never resumed again.
    ///
    /// # Panics
    ///
    /// Panics if a process requests a wait with a negative duration.
    pub fn run(&mut self, world: &mut W, until: Minutes) {
        while let Some(fire_time) = self.queue.peek_time() {
            if fire_time > until {
                break;
            }
            let event = match self.queue.pop() {
                Some(event) => event,
                None => break,
            };
            self.clock.advance_to(event.fire_time);

            let command = self.processes[event.pid.index()].resume(event.fire_time, world);
            match command {
                Command::Wait(duration) => {
                    assert!(
                        duration >= 0.0,
                        "process `{}` requested a negative wait: {}",
                        self.processes[event.pid.index()].name(),
                        duration
                    );
                    self.schedule(event.fire_time + duration, event.pid);
                }
                Command::Halt => {}
            }
        }
    }

    /// Number of pending events.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }
}

impl<W> Default for Scheduler<W> {
    fn default() -> Self {
        Self::new()
    }
}
