use crate::data::FlowRecord;

/// How many ranked records survive truncation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Bound {
    /// Exactly `limit` records.
    Exclusive,
    /// `limit + 1` records, as older flow-log tooling displayed.
    Inclusive,
}

impl Bound {
    pub fn count(self, limit: usize) -> usize {
        match self {
            Self::Exclusive => limit,
            Self::Inclusive => limit.saturating_add(1),
        }
    }
}

/// Seconds between start and end. Timestamps that are not integers
/// count as zero.
pub fn duration(record: &FlowRecord) -> i64 {
    let start = record.start.parse::<i64>().unwrap_or(0);
    let end   = record.end.parse::<i64>().unwrap_or(0);
    end.saturating_sub(start)
}

/// Longest flows first. Equal durations keep their batch order.
pub fn rank(mut records: Vec<FlowRecord>, limit: usize, bound: Bound) -> Vec<FlowRecord> {
    records.sort_by_cached_key(|r| std::cmp::Reverse(duration(r)));
    records.truncate(bound.count(limit));
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, start: &str, end: &str) -> FlowRecord {
        FlowRecord {
            instance: id.to_owned(),
            start:    start.to_owned(),
            end:      end.to_owned(),
            ..Default::default()
        }
    }

    fn spans(spans: &[(&str, i64)]) -> Vec<FlowRecord> {
        spans.iter().map(|(id, d)| record(id, "1000", &(1000 + d).to_string())).collect()
    }

    fn ids(records: &[FlowRecord]) -> Vec<&str> {
        records.iter().map(|r| r.instance.as_str()).collect()
    }

    #[test]
    fn sorted_longest_first() {
        let records = spans(&[("a", 5), ("b", 30), ("c", 10), ("d", 50), ("e", 20)]);
        let ranked  = rank(records, 10, Bound::Exclusive);
        let durations = ranked.iter().map(duration).collect::<Vec<_>>();
        assert_eq!(durations, vec![50, 30, 20, 10, 5]);
    }

    #[test]
    fn ties_keep_input_order() {
        let records = spans(&[("a", 10), ("b", 20), ("c", 10), ("d", 20), ("e", 10)]);
        let ranked  = rank(records, 10, Bound::Exclusive);
        assert_eq!(ids(&ranked), vec!["b", "d", "a", "c", "e"]);
    }

    #[test]
    fn non_numeric_timestamps_are_zero() {
        let r = record("x", "start", "end");
        assert_eq!(duration(&r), 0);
        assert_eq!(duration(&record("y", "-", "1010")), 1010);
        assert_eq!(duration(&record("z", "1000", "")), -1000);
    }

    #[test]
    fn unparsable_records_sort_with_zero() {
        let mut records = spans(&[("a", 0), ("b", 3)]);
        records.insert(1, record("x", "start", "end"));
        let ranked = rank(records, 10, Bound::Exclusive);
        assert_eq!(ids(&ranked), vec!["b", "a", "x"]);
    }

    #[test]
    fn exclusive_bound() {
        let records = spans(&[("a", 50), ("b", 50), ("c", 30), ("d", 10), ("e", 5)]);
        let ranked  = rank(records, 2, Bound::Exclusive);
        assert_eq!(ids(&ranked), vec!["a", "b"]);
    }

    #[test]
    fn inclusive_bound() {
        let records = spans(&[("a", 50), ("b", 50), ("c", 30), ("d", 10), ("e", 5)]);
        let ranked  = rank(records, 2, Bound::Inclusive);
        assert_eq!(ids(&ranked), vec!["a", "b", "c"]);
        assert_eq!(ranked.iter().map(duration).collect::<Vec<_>>(), vec![50, 50, 30]);
    }

    #[test]
    fn limit_beyond_len() {
        let records = spans(&[("a", 1), ("b", 2)]);
        assert_eq!(rank(records.clone(), 0, Bound::Exclusive).len(), 0);
        assert_eq!(rank(records.clone(), 0, Bound::Inclusive).len(), 1);
        assert_eq!(rank(records, usize::MAX, Bound::Inclusive).len(), 2);
    }
}
