use core::cell::Cell;
use core::time::Duration;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;
use std::thread::scope;

use crate::{
    AnySnowflakeGenerator, Error, GeneratorConfig, SEATA_EPOCH, SeataConfig, SeataGenerator,
    SnowflakeGenerator, SystemClock, TWITTER_EPOCH, TimeSource, TwitterConfig, TwitterGenerator,
    TwitterLayout,
};

struct MockTime {
    millis: u64,
}

impl TimeSource for MockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

#[derive(Clone)]
struct SharedMockStepTime {
    clock: Rc<MockStepTime>,
}

impl TimeSource for SharedMockStepTime {
    fn current_millis(&self) -> u64 {
        self.clock.reads.set(self.clock.reads.get() + 1);
        self.clock.values[self.clock.index.get()]
    }
}

struct MockStepTime {
    values: Vec<u64>,
    index: Cell<usize>,
    reads: Cell<u64>,
}

fn step_time(values: Vec<u64>) -> SharedMockStepTime {
    SharedMockStepTime {
        clock: Rc::new(MockStepTime {
            values,
            index: Cell::new(0),
            reads: Cell::new(0),
        }),
    }
}

/// Advances by one millisecond every `reads_per_tick` reads.
struct TickingTime {
    start: u64,
    reads_per_tick: u64,
    reads: Cell<u64>,
}

impl TimeSource for TickingTime {
    fn current_millis(&self) -> u64 {
        let reads = self.reads.get();
        self.reads.set(reads + 1);
        self.start + reads / self.reads_per_tick
    }
}

fn twitter_on<T: TimeSource>(worker_id: u64, clock: T) -> TwitterGenerator<T> {
    let config = TwitterConfig::new(worker_id, 0).with_epoch(Duration::ZERO);
    TwitterGenerator::with_config(config, clock).unwrap()
}

fn seata_on<T: TimeSource>(worker_id: u64, clock: T) -> SeataGenerator<T> {
    let config = SeataConfig::new(worker_id)
        .with_epoch(Duration::ZERO)
        .with_wait(Duration::ZERO, 0);
    SeataGenerator::with_config(config, clock).unwrap()
}

fn run_generator_unique<G: SnowflakeGenerator>(generator: &G, total: usize) {
    let ids = generator.try_next_ids(total).unwrap();
    assert_eq!(ids.len(), total);

    let unique: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(unique.len(), total, "Expected {total} unique IDs");

    for pair in ids.windows(2) {
        assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
    }
}

fn run_generator_threaded_unique<G>(generator: G)
where
    G: SnowflakeGenerator + Send + Sync,
{
    const THREADS: usize = 10;
    const IDS_PER_THREAD: usize = 10_000;
    const TOTAL_IDS: usize = THREADS * IDS_PER_THREAD;

    let generator = Arc::new(generator);

    let batches: Vec<Vec<i64>> = scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let generator = Arc::clone(&generator);
                s.spawn(move || {
                    let mut ids = Vec::with_capacity(IDS_PER_THREAD);
                    for _ in 0..IDS_PER_THREAD {
                        let id = generator.try_next_id().unwrap();
                        // Each thread observes its own IDs in increasing order.
                        if let Some(&last) = ids.last() {
                            assert!(id > last);
                        }
                        ids.push(id);
                    }
                    ids
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let unique: HashSet<i64> = batches.into_iter().flatten().collect();
    assert_eq!(unique.len(), TOTAL_IDS, "Expected {TOTAL_IDS} unique IDs");
}

#[test]
fn twitter_sequence_increments_within_same_tick() {
    let generator = twitter_on(3, MockTime { millis: 42 });

    let ids = generator.try_next_ids(3).unwrap();
    let parts: Vec<_> = ids.iter().map(|&id| generator.decompose(id)).collect();

    for (i, part) in parts.iter().enumerate() {
        assert_eq!(part.timestamp, 42);
        assert_eq!(part.worker_id, 3);
        assert_eq!(part.datacenter_id, 0);
        assert_eq!(part.sequence, i as u64);
    }
    assert!(ids[0] < ids[1] && ids[1] < ids[2]);
}

#[test]
fn twitter_subtracts_epoch() {
    let epoch = TWITTER_EPOCH.as_millis() as u64;
    let generator = TwitterGenerator::with_config(
        TwitterConfig::new(1, 2),
        MockTime { millis: epoch + 5 },
    )
    .unwrap();

    let id = generator.try_next_id().unwrap();
    assert_eq!(id, (5 << 22) | (2 << 17) | (1 << 12));
}

#[test]
fn twitter_rolls_over_to_next_millisecond() {
    let shared_time = step_time(vec![42, 43]);
    let generator = twitter_on(1, shared_time.clone());

    for i in 0..=4095 {
        let parts = generator.decompose(generator.try_next_id().unwrap());
        assert_eq!(parts.sequence, i);
        assert_eq!(parts.timestamp, 42);
    }

    shared_time.clock.index.set(1);

    let parts = generator.decompose(generator.try_next_id().unwrap());
    assert_eq!(parts.timestamp, 43);
    assert_eq!(parts.sequence, 0);
}

#[test]
fn twitter_spins_until_clock_advances() {
    let clock = TickingTime {
        start: 42,
        reads_per_tick: 10_000,
        reads: Cell::new(0),
    };
    let generator = twitter_on(1, clock);

    let mut last = generator.try_next_id().unwrap();
    for _ in 0..4096 {
        let id = generator.try_next_id().unwrap();
        assert!(id > last);
        last = id;
    }

    let parts = generator.decompose(last);
    assert_eq!(parts.timestamp, 43);
    assert_eq!(parts.sequence, 0);
}

#[test]
fn twitter_reports_stalled_clock_without_advancing_state() {
    let shared_time = step_time(vec![42, 43]);
    let config = TwitterConfig::new(1, 0)
        .with_epoch(Duration::ZERO)
        .with_max_spins(100);
    let generator = TwitterGenerator::with_config(config, shared_time.clone()).unwrap();

    let ids = generator.try_next_ids(4096).unwrap();
    assert_eq!(generator.decompose(ids[4095]).sequence, 4095);

    let reads_before = shared_time.clock.reads.get();
    assert_eq!(
        generator.try_next_id(),
        Err(Error::ClockStalled {
            last: 42,
            spins: 100
        })
    );
    assert_eq!(shared_time.clock.reads.get() - reads_before, 101);

    shared_time.clock.index.set(1);
    let parts = generator.decompose(generator.try_next_id().unwrap());
    assert_eq!(parts.timestamp, 43);
    assert_eq!(parts.sequence, 0);
}

#[test]
fn twitter_rejects_clock_rollback_without_advancing_state() {
    let shared_time = step_time(vec![100, 99]);
    let generator = twitter_on(1, shared_time.clone());

    let first = generator.try_next_id().unwrap();
    assert_eq!(generator.decompose(first).sequence, 0);

    shared_time.clock.index.set(1);
    assert_eq!(
        generator.try_next_id(),
        Err(Error::ClockMovedBackwards { last: 100, now: 99 })
    );
    assert_eq!(
        generator.try_next_ids(2),
        Err(Error::ClockMovedBackwards { last: 100, now: 99 })
    );

    shared_time.clock.index.set(0);
    let next = generator.try_next_id().unwrap();
    let parts = generator.decompose(next);
    assert_eq!(parts.timestamp, 100);
    assert_eq!(parts.sequence, 1);
    assert!(next > first);
}

#[test]
fn twitter_rejects_clock_before_epoch_without_advancing_state() {
    let shared_time = step_time(vec![1_000, 1_001, 10_001]);
    let config = TwitterConfig::new(1, 0).with_epoch(Duration::from_millis(10_000));
    let generator = TwitterGenerator::with_config(config, shared_time.clone()).unwrap();

    assert_eq!(
        generator.try_next_id(),
        Err(Error::EpochInFuture {
            epoch: 10_000,
            now: 1_000
        })
    );
    shared_time.clock.index.set(1);
    assert_eq!(
        generator.try_next_id(),
        Err(Error::EpochInFuture {
            epoch: 10_000,
            now: 1_001
        })
    );

    shared_time.clock.index.set(2);
    let parts = generator.decompose(generator.try_next_id().unwrap());
    assert_eq!(parts.timestamp, 1);
    assert_eq!(parts.sequence, 0);
}

#[test]
fn twitter_rejects_timestamp_beyond_layout_width() {
    let layout = TwitterLayout {
        timestamp_bits: 2,
        datacenter_bits: 5,
        worker_bits: 5,
        sequence_bits: 51,
    };
    let shared_time = step_time(vec![3, 4]);
    let config = TwitterConfig::new(1, 0)
        .with_epoch(Duration::ZERO)
        .with_layout(layout);
    let generator = TwitterGenerator::with_config(config, shared_time.clone()).unwrap();

    let first = generator.try_next_id().unwrap();
    assert_eq!(generator.decompose(first).timestamp, 3);

    shared_time.clock.index.set(1);
    assert_eq!(
        generator.try_next_id(),
        Err(Error::TimestampOverflow {
            timestamp: 4,
            max: 3
        })
    );

    // The failed call left the last issued tick in place.
    shared_time.clock.index.set(0);
    let next = generator.try_next_id().unwrap();
    assert_eq!(generator.decompose(next).sequence, 1);
    assert!(next > first);
}

#[test]
fn twitter_random_sequence_start_stays_below_bound() {
    let clock = TickingTime {
        start: 1,
        reads_per_tick: 1,
        reads: Cell::new(0),
    };
    let config = TwitterConfig::new(0, 0)
        .with_epoch(Duration::ZERO)
        .with_random_sequence_start(8);
    let generator = TwitterGenerator::with_config(config, clock).unwrap();

    let mut last = 0;
    for _ in 0..1_000 {
        let id = generator.try_next_id().unwrap();
        assert!(generator.decompose(id).sequence < 8);
        assert!(id > last);
        last = id;
    }
}

#[test]
fn twitter_worker_id_construction_bounds() {
    let max = TwitterConfig::default().layout.max_worker_id();
    assert!(TwitterGenerator::new(0, 0).is_ok());
    assert!(TwitterGenerator::new(max, 0).is_ok());
    assert_eq!(
        TwitterGenerator::new(max + 1, 0).err(),
        Some(Error::WorkerIdOutOfRange {
            worker_id: max + 1,
            max
        })
    );
    assert!(matches!(
        TwitterGenerator::new(0, max + 1),
        Err(Error::DatacenterIdOutOfRange { .. })
    ));
}

#[test]
fn twitter_generates_100k_unique_ids() {
    let generator = TwitterGenerator::new(1, 0).unwrap();
    run_generator_unique(&generator, 100_000);
}

#[test]
fn twitter_workers_do_not_collide() {
    let worker1 = TwitterGenerator::new(1, 0).unwrap();
    let worker2 = TwitterGenerator::new(2, 0).unwrap();

    let ids = [
        worker1.try_next_id().unwrap(),
        worker2.try_next_id().unwrap(),
        worker1.try_next_id().unwrap(),
        worker2.try_next_id().unwrap(),
    ];
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), 4);
}

#[test]
fn twitter_threaded_unique() {
    run_generator_threaded_unique(TwitterGenerator::new(1, 1).unwrap());
}

#[test]
fn seata_counter_seeded_from_clock() {
    let generator = seata_on(5, MockTime { millis: 1_000 });

    let parts = generator.decompose(generator.next_id());
    assert_eq!(parts.worker_id, 5);
    assert_eq!(parts.timestamp, 1_000);
    assert_eq!(parts.sequence, 1);
}

#[test]
fn seata_burst_carries_into_timestamp() {
    let generator = seata_on(5, MockTime { millis: 1_000 });

    let ids = generator.next_ids(4096);
    let last = generator.decompose(ids[4095]);
    assert_eq!(last.timestamp, 1_001);
    assert_eq!(last.sequence, 0);
    assert_eq!(last.worker_id, 5);
}

#[test]
fn seata_tolerates_clock_rollback() {
    let shared_time = step_time(vec![1_000, 10, 2_000]);
    let generator = seata_on(1, shared_time.clone());

    let mut last = generator.try_next_id().unwrap();
    for index in [1, 2, 0, 1] {
        shared_time.clock.index.set(index);
        for _ in 0..10 {
            let id = generator.try_next_id().unwrap();
            assert!(id > last);
            last = id;
        }
    }
}

#[test]
fn seata_waits_are_bounded() {
    let shared_time = step_time(vec![1_000]);
    let config = SeataConfig::new(1)
        .with_epoch(Duration::ZERO)
        .with_wait(Duration::ZERO, 3);
    let generator = SeataGenerator::with_config(config, shared_time.clone()).unwrap();
    assert_eq!(shared_time.clock.reads.get(), 1);

    // The counter never falls behind a frozen clock, so every call uses its
    // full wait budget and then issues anyway.
    generator.next_id();
    assert_eq!(shared_time.clock.reads.get(), 4);
    generator.next_id();
    assert_eq!(shared_time.clock.reads.get(), 7);
}

#[test]
fn seata_skips_wait_when_clock_is_ahead() {
    let shared_time = step_time(vec![1_000, 5_000]);
    let config = SeataConfig::new(1)
        .with_epoch(Duration::ZERO)
        .with_wait(Duration::from_secs(60), 1);
    let generator = SeataGenerator::with_config(config, shared_time.clone()).unwrap();

    shared_time.clock.index.set(1);
    let parts = generator.decompose(generator.next_id());
    assert_eq!(parts.timestamp, 1_000);
    assert_eq!(shared_time.clock.reads.get(), 2);
}

#[test]
fn seata_rejects_clock_before_epoch() {
    let result = SeataGenerator::with_config(SeataConfig::new(0), MockTime { millis: 5 });
    assert_eq!(
        result.err(),
        Some(Error::EpochInFuture {
            epoch: SEATA_EPOCH.as_millis() as u64,
            now: 5
        })
    );
}

#[test]
fn seata_worker_id_construction_bounds() {
    assert!(SeataGenerator::new(0).is_ok());
    assert!(SeataGenerator::new(1023).is_ok());
    assert!(matches!(
        SeataGenerator::new(1024),
        Err(Error::WorkerIdOutOfRange { worker_id: 1024, .. })
    ));
}

#[test]
fn seata_random_worker_in_range() {
    let generator = SeataGenerator::with_random_worker().unwrap();
    assert!(generator.config().worker_id <= 1023);
    let id = generator.next_id();
    assert_eq!(generator.decompose(id).worker_id, generator.config().worker_id);
}

#[test]
fn seata_generates_100k_unique_ids() {
    let generator = SeataGenerator::new(1).unwrap();
    run_generator_unique(&generator, 100_000);
}

#[test]
fn seata_workers_do_not_collide() {
    let worker1 = SeataGenerator::new(1).unwrap();
    let worker2 = SeataGenerator::new(2).unwrap();

    let ids = [
        worker1.next_id(),
        worker2.next_id(),
        worker1.next_id(),
        worker2.next_id(),
    ];
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), 4);
}

#[test]
fn seata_threaded_unique() {
    run_generator_threaded_unique(SeataGenerator::new(1).unwrap());
}

#[test]
fn any_generator_dispatches_on_config() {
    let strict = AnySnowflakeGenerator::from_config(GeneratorConfig::Twitter(
        TwitterConfig::new(4, 2),
    ))
    .unwrap();
    assert!(strict.is_strict());
    assert_eq!(strict.epoch(), TWITTER_EPOCH);
    let parts = strict.decompose(strict.try_next_id().unwrap());
    assert_eq!((parts.worker_id, parts.datacenter_id), (4, 2));

    let tolerant = AnySnowflakeGenerator::from_config(SeataConfig::new(4).into()).unwrap();
    assert!(!tolerant.is_strict());
    assert_eq!(tolerant.epoch(), SEATA_EPOCH);
    let ids = tolerant.try_next_ids(5).unwrap();
    assert_eq!(ids.len(), 5);
    assert_eq!(tolerant.decompose(ids[4]).worker_id, 4);
}

#[test]
fn any_generator_surfaces_construction_errors() {
    let result = AnySnowflakeGenerator::with_clock(
        TwitterConfig::new(99, 0).into(),
        SystemClock,
    );
    assert!(matches!(result, Err(Error::WorkerIdOutOfRange { .. })));
}

#[test]
fn any_generator_threaded_unique() {
    run_generator_threaded_unique(
        AnySnowflakeGenerator::from_config(TwitterConfig::new(0, 0).into()).unwrap(),
    );
}
