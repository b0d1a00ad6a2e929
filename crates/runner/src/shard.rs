//! Worker shards - disjoint slices of the instruments per process

use firestocks_core::InstrumentRecord;
use firestocks_engine::{SyncError, SyncResult};

use crate::config::WorkerShard;

/// Records owned by `shard`
///
/// Records are sorted by name and split into contiguous ranges of
/// `ceil(n / worker_count)`. Workers past the last range get nothing.
pub fn select_shard(
    mut records: Vec<InstrumentRecord>,
    shard: WorkerShard,
) -> SyncResult<Vec<InstrumentRecord>> {
    let WorkerShard {
        worker_id,
        worker_count,
    } = shard;
    if worker_count == 0 {
        return Err(SyncError::Precondition(
            "worker count must be at least 1".to_string(),
        ));
    }
    if worker_id >= worker_count {
        return Err(SyncError::Precondition(format!(
            "worker id {worker_id} is outside 0..{worker_count}"
        )));
    }
    if records.is_empty() {
        return Ok(records);
    }

    records.sort_by(|a, b| a.name().cmp(b.name()));
    let range_size = records.len().div_ceil(worker_count);
    let start = worker_id * range_size;
    if start >= records.len() {
        return Ok(Vec::new());
    }
    let end = (start + range_size).min(records.len());

    Ok(records.drain(start..end).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use firestocks_core::Instrument;

    fn records(names: &[&str]) -> Vec<InstrumentRecord> {
        names
            .iter()
            .map(|name| Instrument::new(*name, "Germany").into())
            .collect()
    }

    fn names(records: &[InstrumentRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name()).collect()
    }

    fn shard(worker_id: usize, worker_count: usize) -> WorkerShard {
        WorkerShard {
            worker_id,
            worker_count,
        }
    }

    #[test]
    fn test_shards_are_sorted_contiguous_ranges() {
        let all = records(&["E", "A", "D", "B", "C"]);

        let first = select_shard(all.clone(), shard(0, 2)).unwrap();
        let second = select_shard(all, shard(1, 2)).unwrap();

        assert_eq!(names(&first), vec!["A", "B", "C"]);
        assert_eq!(names(&second), vec!["D", "E"]);
    }

    #[test]
    fn test_worker_past_last_range_is_empty() {
        // ceil(4 / 3) = 2 gives ranges [0, 2) and [2, 4) only
        let all = records(&["A", "B", "C", "D"]);
        assert!(select_shard(all, shard(2, 3)).unwrap().is_empty());
    }

    #[test]
    fn test_single_worker_takes_everything() {
        let all = records(&["B", "A"]);
        assert_eq!(names(&select_shard(all, shard(0, 1)).unwrap()), vec!["A", "B"]);
    }

    #[test]
    fn test_invalid_shards() {
        assert!(matches!(
            select_shard(records(&["A"]), shard(0, 0)),
            Err(SyncError::Precondition(_))
        ));
        assert!(matches!(
            select_shard(records(&["A"]), shard(3, 3)),
            Err(SyncError::Precondition(_))
        ));
    }
}
