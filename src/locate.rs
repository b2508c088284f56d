use std::time::Duration;
use chrono::{DateTime, Utc};
use log::debug;
use crate::data::Batch;
use crate::error::Error;
use crate::storage::Storage;

/// Finds the most recently written batch in a bucket.
#[derive(Clone, Debug, Default)]
pub struct Locator {
    max_age: Option<Duration>,
}

impl Locator {
    pub fn new(max_age: Option<Duration>) -> Self {
        Self { max_age }
    }

    pub async fn latest<S: Storage + ?Sized>(&self, storage: &S, bucket: &str) -> Result<Option<Batch>, Error> {
        let batches = storage.list(bucket).await?;
        let latest  = newest(batches, Utc::now(), self.max_age);

        if let Some(batch) = &latest {
            debug!("latest batch {} modified {}", batch.key, batch.last_modified);
        }

        Ok(latest)
    }
}

/// The batch with the smallest age relative to `now`. On equal ages the
/// first one listed wins. Batches older than `max_age` are ignored.
pub fn newest(batches: Vec<Batch>, now: DateTime<Utc>, max_age: Option<Duration>) -> Option<Batch> {
    let max_age = max_age.map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX));
    let mut newest: Option<(i64, Batch)> = None;

    for batch in batches {
        let age = (now - batch.last_modified).num_milliseconds();

        if matches!(max_age, Some(max_age) if age > max_age) {
            continue;
        }

        match &newest {
            Some((min, _)) if *min <= age => continue,
            _                             => newest = Some((age, batch)),
        }
    }

    newest.map(|(_, batch)| batch)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use chrono::Duration as Age;
    use crate::test::FakeStorage;
    use super::*;

    fn batch(key: &str, now: DateTime<Utc>, age: i64) -> Batch {
        Batch {
            key:           key.to_owned(),
            last_modified: now - Age::seconds(age),
        }
    }

    #[test]
    fn picks_most_recent() {
        let now = Utc::now();
        let batches = vec![
            batch("b", now, 600),
            batch("a", now, 60),
            batch("c", now, 1200),
        ];
        assert_eq!(newest(batches, now, None).unwrap().key, "a");
    }

    #[test]
    fn first_listed_wins_ties() {
        let now = Utc::now();
        let batches = vec![
            batch("old", now, 600),
            batch("first", now, 60),
            batch("second", now, 60),
        ];
        assert_eq!(newest(batches, now, None).unwrap().key, "first");
    }

    #[test]
    fn empty_listing() {
        assert_eq!(newest(Vec::new(), Utc::now(), None), None);
    }

    #[test]
    fn max_age_window() {
        let now = Utc::now();
        let batches = vec![batch("a", now, 7200), batch("b", now, 3600)];
        let max_age = Some(Duration::from_secs(1800));
        assert_eq!(newest(batches.clone(), now, max_age), None);
        assert_eq!(newest(batches, now, Some(Duration::from_secs(5400))).unwrap().key, "b");
    }

    #[test]
    fn huge_max_age_is_unbounded() {
        let now = Utc::now();
        let batches = vec![batch("a", now, 60)];
        let max_age = Some(Duration::from_secs(u64::MAX));
        assert_eq!(newest(batches, now, max_age).unwrap().key, "a");
    }

    #[tokio::test]
    async fn latest_from_storage() {
        let now = Utc::now();
        let storage = FakeStorage::new(vec![
            (batch("AWSLogs/x.log.gz", now, 30), Vec::new()),
            (batch("AWSLogs/y.log.gz", now, 90), Vec::new()),
        ]);

        let latest = Locator::default().latest(&storage, "bucket").await.unwrap();
        assert_eq!(latest.unwrap().key, "AWSLogs/x.log.gz");
        assert_eq!(storage.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_bucket_is_not_found() {
        let storage = FakeStorage::new(Vec::new());
        assert_eq!(Locator::default().latest(&storage, "bucket").await.unwrap(), None);
    }
}
