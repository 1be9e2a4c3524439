// In-memory snapshot of the loaded releases.

use log::debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

use survey_trends::ReleaseCollection;

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Holds the last loaded releases.
///
/// The snapshot is replaced as a whole: readers holding an `Arc` from a
/// previous `get` keep a consistent view while a new snapshot is set.
pub struct ReleaseCache<C: Clock> {
    clock: C,
    snapshot: Option<(Instant, Arc<ReleaseCollection>)>,
    generation: u64,
}

impl<C: Clock> ReleaseCache<C> {
    pub fn new(clock: C) -> ReleaseCache<C> {
        ReleaseCache {
            clock,
            snapshot: None,
            generation: 0,
        }
    }

    /// The snapshot, if it was set less than `max_age` ago.
    pub fn get(&self, max_age: Duration) -> Option<Arc<ReleaseCollection>> {
        let (loaded_at, releases) = self.snapshot.as_ref()?;
        let age = self.clock.now().saturating_duration_since(*loaded_at);
        if age < max_age {
            Some(releases.clone())
        } else {
            debug!("ReleaseCache::get: snapshot {} is stale ({:?})", self.generation, age);
            None
        }
    }

    pub fn set(&mut self, releases: ReleaseCollection) -> Arc<ReleaseCollection> {
        let releases = Arc::new(releases);
        self.snapshot = Some((self.clock.now(), releases.clone()));
        self.generation += 1;
        debug!(
            "ReleaseCache::set: generation {} with {} releases",
            self.generation,
            releases.len()
        );
        releases
    }

    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// The number of snapshots set so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use survey_trends::builder::Builder;
    use survey_trends::RowRecord;

    struct FakeClock {
        start: Instant,
        elapsed: Cell<Duration>,
    }

    impl FakeClock {
        fn advance(&self, d: Duration) {
            self.elapsed.set(self.elapsed.get() + d);
        }
    }

    impl Clock for &FakeClock {
        fn now(&self) -> Instant {
            self.start + self.elapsed.get()
        }
    }

    fn releases(n: usize) -> ReleaseCollection {
        let mut b = Builder::new();
        for i in 0..n {
            b.add_rows(
                format!("Release {}", i).as_str(),
                vec![RowRecord::from_pairs([("Q1", "Yes")])],
            );
        }
        b.build()
    }

    #[test]
    fn expires() {
        let clock = FakeClock {
            start: Instant::now(),
            elapsed: Cell::new(Duration::ZERO),
        };
        let mut cache = ReleaseCache::new(&clock);
        let max_age = Duration::from_secs(300);
        assert!(cache.get(max_age).is_none());

        cache.set(releases(2));
        assert_eq!(cache.generation(), 1);
        assert_eq!(cache.get(max_age).unwrap().len(), 2);

        clock.advance(Duration::from_secs(299));
        assert!(cache.get(max_age).is_some());
        clock.advance(Duration::from_secs(1));
        assert!(cache.get(max_age).is_none());
    }

    #[test]
    fn replaced_as_a_whole() {
        let clock = FakeClock {
            start: Instant::now(),
            elapsed: Cell::new(Duration::ZERO),
        };
        let mut cache = ReleaseCache::new(&clock);
        let max_age = Duration::from_secs(60);
        cache.set(releases(1));
        let old = cache.get(max_age).unwrap();
        cache.set(releases(3));
        assert_eq!(cache.generation(), 2);
        assert_eq!(old.len(), 1);
        assert_eq!(cache.get(max_age).unwrap().len(), 3);

        cache.invalidate();
        assert!(cache.get(max_age).is_none());
        assert_eq!(cache.generation(), 2);
    }
}
