//! Identifier generation for messages and memories.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::Variant;

/// Issues identifiers in the scheme the configured [`Variant`] uses.
///
/// `Full` hands out random UUIDs. `Simple` hands out
/// `user-{ms}` / `lyra-{ms+1}` / `mem-{ms}` where `ms` is the Unix time in
/// milliseconds; the issued values only ever increase, so two requests in
/// the same millisecond still get distinct ids.
#[derive(Debug)]
pub struct IdGenerator {
    variant: Variant,
    last_ms: AtomicI64,
}

impl IdGenerator {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            last_ms: AtomicI64::new(i64::MIN),
        }
    }

    /// Ids for a user message and the reply to it.
    pub fn message_pair(&self, now: DateTime<Utc>) -> (String, String) {
        match self.variant {
            Variant::Full => (uuid(), uuid()),
            Variant::Simple => {
                let ms = self.reserve(now, 2);
                (format!("user-{ms}"), format!("lyra-{}", ms + 1))
            }
        }
    }

    pub fn memory_id(&self, now: DateTime<Utc>) -> String {
        match self.variant {
            Variant::Full => uuid(),
            Variant::Simple => format!("mem-{}", self.reserve(now, 1)),
        }
    }

    /// Claim `width` consecutive millisecond values starting no earlier than
    /// `now`, returning the first one.
    fn reserve(&self, now: DateTime<Utc>, width: i64) -> i64 {
        let now_ms = now.timestamp_millis();
        let mut last = self.last_ms.load(Ordering::Relaxed);
        loop {
            let start = now_ms.max(last.saturating_add(1));
            let end = start + width - 1;
            match self
                .last_ms
                .compare_exchange_weak(last, end, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return start,
                Err(actual) => last = actual,
            }
        }
    }
}

fn uuid() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn full_variant_uses_uuids() {
        let ids = IdGenerator::new(Variant::Full);
        let (user, lyra) = ids.message_pair(Utc::now());
        assert!(Uuid::parse_str(&user).is_ok());
        assert!(Uuid::parse_str(&lyra).is_ok());
        assert_ne!(user, lyra);
        assert!(Uuid::parse_str(&ids.memory_id(Utc::now())).is_ok());
    }

    #[test]
    fn simple_variant_uses_millisecond_ids() {
        let ids = IdGenerator::new(Variant::Simple);
        assert_eq!(
            ids.message_pair(at(1_700_000_000_000)),
            ("user-1700000000000".to_string(), "lyra-1700000000001".to_string())
        );
        assert_eq!(ids.memory_id(at(1_700_000_005_000)), "mem-1700000005000");
    }

    #[test]
    fn simple_ids_stay_unique_within_one_millisecond() {
        let ids = IdGenerator::new(Variant::Simple);
        let now = at(1_000);
        assert_eq!(ids.message_pair(now).0, "user-1000");
        // Next pair cannot reuse 1000 or 1001.
        assert_eq!(ids.message_pair(now).0, "user-1002");
        // A clock step backwards does not rewind ids.
        assert_eq!(ids.message_pair(at(500)).0, "user-1004");
    }

    #[test]
    fn concurrent_reservations_do_not_overlap() {
        let ids = Arc::new(IdGenerator::new(Variant::Simple));
        let now = at(42);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || {
                    (0..100)
                        .flat_map(|_| {
                            let (u, l) = ids.message_pair(now);
                            [u, l]
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut seen = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                let n: i64 = id.split('-').nth(1).unwrap().parse().unwrap();
                assert!(seen.insert(n), "duplicate millisecond {n}");
            }
        }
        assert_eq!(seen.len(), 1600);
    }
}
