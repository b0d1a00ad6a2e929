use crate::error::{SyncError, SyncResult};

/// Split `items` into contiguous chunks of at most `max_size`, keeping order
///
/// Produces `ceil(len / max_size)` chunks; none for an empty input.
pub fn chunk<T>(items: Vec<T>, max_size: usize) -> SyncResult<Vec<Vec<T>>> {
    if max_size == 0 {
        return Err(SyncError::Precondition(
            "chunk size must be at least 1".to_string(),
        ));
    }

    let mut chunks = Vec::with_capacity(items.len().div_ceil(max_size));
    let mut items = items.into_iter().peekable();
    while items.peek().is_some() {
        chunks.push(items.by_ref().take(max_size).collect());
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_uneven() {
        let chunks = chunk((1..=7).collect(), 3).unwrap();
        assert_eq!(chunks, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);
    }

    #[test]
    fn test_chunk_empty() {
        let chunks = chunk(Vec::<u8>::new(), 400).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_chunk_zero_rejected() {
        assert!(matches!(chunk(vec![1], 0), Err(SyncError::Precondition(_))));
    }
}
