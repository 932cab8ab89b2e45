//! Splits the proxy list into display-sized batches

use crate::error::PlanError;
use crate::proxy::ProxyRecord;

/// A group of proxies shown on the board at the same time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    index: usize,
    proxies: Vec<ProxyRecord>,
}

impl Batch {
    /// Zero-based position of this batch in the run
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    pub fn proxies(&self) -> &[ProxyRecord] {
        &self.proxies
    }

    /// Proxy at a 1-based slot
    pub fn slot(&self, slot: usize) -> Option<&ProxyRecord> {
        slot.checked_sub(1).and_then(|i| self.proxies.get(i))
    }

    /// `(slot, proxy)` pairs in dispatch order
    pub fn slots(&self) -> impl Iterator<Item = (usize, &ProxyRecord)> + '_ {
        self.proxies.iter().enumerate().map(|(i, p)| (i + 1, p))
    }
}

/// Partition `proxies` into batches of `capacity`, the last one holding the
/// remainder. Order is preserved and nothing is dropped or duplicated.
pub fn plan_batches(proxies: Vec<ProxyRecord>, capacity: usize) -> Result<Vec<Batch>, PlanError> {
    if capacity == 0 {
        return Err(PlanError::InvalidCapacity);
    }

    let mut batches = Vec::with_capacity(proxies.len().div_ceil(capacity));
    let mut remaining = proxies.into_iter().peekable();
    while remaining.peek().is_some() {
        let chunk: Vec<ProxyRecord> = remaining.by_ref().take(capacity).collect();
        batches.push(Batch {
            index: batches.len(),
            proxies: chunk,
        });
    }
    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxies(n: usize) -> Vec<ProxyRecord> {
        (0..n)
            .map(|i| ProxyRecord::new(format!("10.0.0.{}", i), 8000 + i as u16))
            .collect()
    }

    #[test]
    fn test_seven_proxies_in_threes() {
        let batches = plan_batches(proxies(7), 3).unwrap();
        let sizes: Vec<usize> = batches.iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        let indexes: Vec<usize> = batches.iter().map(Batch::index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[test]
    fn test_partition_law() {
        for len in 0..20 {
            for capacity in 1..8 {
                let input = proxies(len);
                let batches = plan_batches(input.clone(), capacity).unwrap();

                assert_eq!(batches.len(), len.div_ceil(capacity));
                if let Some((last, full)) = batches.split_last() {
                    assert!(full.iter().all(|b| b.len() == capacity));
                    assert!((1..=capacity).contains(&last.len()));
                }

                let rejoined: Vec<ProxyRecord> = batches
                    .iter()
                    .flat_map(|b| b.proxies().iter().cloned())
                    .collect();
                assert_eq!(rejoined, input);
            }
        }
    }

    #[test]
    fn test_empty_list_has_no_batches() {
        assert!(plan_batches(Vec::new(), 5).unwrap().is_empty());
    }

    #[test]
    fn test_zero_capacity_fails() {
        assert_eq!(plan_batches(proxies(3), 0), Err(PlanError::InvalidCapacity));
        assert_eq!(plan_batches(Vec::new(), 0), Err(PlanError::InvalidCapacity));
    }

    #[test]
    fn test_slots_are_one_based_and_reused() {
        let batches = plan_batches(proxies(5), 2).unwrap();
        let first: Vec<usize> = batches[0].slots().map(|(slot, _)| slot).collect();
        let second: Vec<usize> = batches[1].slots().map(|(slot, _)| slot).collect();
        assert_eq!(first, vec![1, 2]);
        assert_eq!(second, vec![1, 2]);
        assert_eq!(batches[1].slot(1).unwrap().host, "10.0.0.2");
        assert!(batches[1].slot(0).is_none());
        assert!(batches[2].slot(2).is_none());
    }
}
