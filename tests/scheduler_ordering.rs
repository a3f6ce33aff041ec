//! Event-ordering guarantees of the discrete-event kernel.

use microgrid_sim::sim::clock::Minutes;
use microgrid_sim::sim::process::{Command, Process};
use microgrid_sim::sim::scheduler::Scheduler;

/// Logs `(tag, now)` every resume and waits a fixed period.
struct Tagger {
    tag: u32,
    period: Minutes,
}

impl Process<Vec<(u32, Minutes)>> for Tagger {
    fn resume(&mut self, now: Minutes, log: &mut Vec<(u32, Minutes)>) -> Command {
        log.push((self.tag, now));
        Command::Wait(self.period)
    }

    fn name(&self) -> &'static str {
        "tagger"
    }
}

#[test]
fn events_fire_in_nondecreasing_time_order() {
    let mut scheduler = Scheduler::new();
    scheduler.spawn(0.0, Box::new(Tagger { tag: 0, period: 7.0 }));
    scheduler.spawn(3.0, Box::new(Tagger { tag: 1, period: 5.0 }));
    scheduler.spawn(1.0, Box::new(Tagger { tag: 2, period: 11.0 }));

    let mut log = Vec::new();
    scheduler.run(&mut log, 200.0);

    for window in log.windows(2) {
        assert!(
            window[0].1 <= window[1].1,
            "clock went backwards: {window:?}"
        );
    }
}

#[test]
fn coincident_events_fire_in_spawn_order() {
    let mut scheduler = Scheduler::new();
    for tag in 0..5 {
        scheduler.spawn(0.0, Box::new(Tagger { tag, period: 10.0 }));
    }

    let mut log = Vec::new();
    scheduler.run(&mut log, 50.0);

    // Every 10-minute round replays the spawn order exactly.
    for (round, chunk) in log.chunks(5).enumerate() {
        let tags: Vec<u32> = chunk.iter().map(|&(tag, _)| tag).collect();
        assert_eq!(tags, vec![0, 1, 2, 3, 4], "round {round}");
        assert!(chunk.iter().all(|&(_, t)| t == round as f64 * 10.0));
    }
}

#[test]
fn consumer_spawned_last_sees_producer_output() {
    struct Producer;
    struct Consumer;

    impl Process<(f64, Vec<f64>)> for Producer {
        fn resume(&mut self, now: Minutes, world: &mut (f64, Vec<f64>)) -> Command {
            world.0 = now + 1.0;
            Command::Wait(5.0)
        }
        fn name(&self) -> &'static str {
            "producer"
        }
    }

    impl Process<(f64, Vec<f64>)> for Consumer {
        fn resume(&mut self, _now: Minutes, world: &mut (f64, Vec<f64>)) -> Command {
            world.1.push(world.0);
            Command::Wait(5.0)
        }
        fn name(&self) -> &'static str {
            "consumer"
        }
    }

    let mut scheduler = Scheduler::new();
    scheduler.spawn(0.0, Box::new(Producer));
    scheduler.spawn(0.0, Box::new(Consumer));

    let mut world = (0.0, Vec::new());
    scheduler.run(&mut world, 20.0);

    // The consumer always reads the value the producer published at the
    // same instant, never the stale one.
    assert_eq!(world.1, vec![1.0, 6.0, 11.0, 16.0, 21.0]);
}
