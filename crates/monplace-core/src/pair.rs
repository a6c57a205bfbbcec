//! Flat indexing of unordered node pairs.
//!
//! Quantities attached to a pair of distinct nodes (indistinguishable pairs,
//! pairs separated by a route) are stored in a flat array of length
//! `n(n-1)/2` instead of an `n×n` table.

use crate::error::{PlacementError, Result};

/// Bijection between unordered pairs `{a, b}` with `a != b < n` and
/// `[0, n(n-1)/2)`.
///
/// Pairs are numbered row by row: all pairs `(0, b)` first, then `(1, b)`, and so on.
///
/// # Example
///
/// ```
/// use monplace_core::PairIndex;
///
/// let pairs = PairIndex::new(4);
/// assert_eq!(pairs.len(), 6);
/// assert_eq!(pairs.index(0, 1).unwrap(), 0);
/// assert_eq!(pairs.index(3, 2).unwrap(), 5);
/// assert_eq!(pairs.pair(3), Some((1, 2)));
/// assert!(pairs.index(2, 2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairIndex {
    n: usize,
}

impl PairIndex {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// Number of nodes the index was built for.
    pub fn num_nodes(&self) -> usize {
        self.n
    }

    /// Number of unordered pairs, `n(n-1)/2`.
    pub fn len(&self) -> usize {
        choose2(self.n)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the flat index of the unordered pair `{a, b}`.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidPair`] if `a == b` or either node is `>= n`.
    pub fn index(&self, a: usize, b: usize) -> Result<usize> {
        if a == b || a >= self.n || b >= self.n {
            return Err(PlacementError::InvalidPair { a, b, n: self.n });
        }
        let (a, b) = if a < b { (a, b) } else { (b, a) };
        Ok(choose2(self.n - 1) - choose2(self.n - a - 1) + b - 1)
    }

    /// Inverse of [`index`](Self::index), returning the pair with `a < b`.
    pub fn pair(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.len() {
            return None;
        }
        let mut row_start = 0;
        for a in 0..self.n {
            let row_len = self.n - a - 1;
            if index < row_start + row_len {
                return Some((a, a + 1 + index - row_start));
            }
            row_start += row_len;
        }
        None
    }

    /// Iterates over all pairs `(a, b)` with `a < b`, in index order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.n).flat_map(move |a| (a + 1..self.n).map(move |b| (a, b)))
    }
}

fn choose2(k: usize) -> usize {
    if k < 2 {
        0
    } else {
        k * (k - 1) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bijective_up_to_fifty_nodes() {
        for n in 0..=50 {
            let pairs = PairIndex::new(n);
            let mut seen = vec![false; pairs.len()];
            for a in 0..n {
                for b in a + 1..n {
                    let idx = pairs.index(a, b).unwrap();
                    assert!(idx < pairs.len(), "n={} ({}, {}) -> {}", n, a, b, idx);
                    assert!(!seen[idx], "n={} index {} hit twice", n, idx);
                    seen[idx] = true;
                }
            }
            assert!(seen.iter().all(|&s| s), "n={} not surjective", n);
        }
    }

    #[test]
    fn test_order_does_not_matter() {
        let pairs = PairIndex::new(7);
        for (a, b) in pairs.pairs() {
            assert_eq!(pairs.index(a, b).unwrap(), pairs.index(b, a).unwrap());
        }
    }

    #[test]
    fn test_inverse() {
        let pairs = PairIndex::new(9);
        for (expected, (a, b)) in pairs.pairs().enumerate() {
            assert_eq!(pairs.index(a, b).unwrap(), expected);
            assert_eq!(pairs.pair(expected), Some((a, b)));
        }
        assert_eq!(pairs.pair(pairs.len()), None);
    }

    #[test]
    fn test_three_nodes() {
        let pairs = PairIndex::new(3);
        assert_eq!(pairs.index(0, 1).unwrap(), 0);
        assert_eq!(pairs.index(0, 2).unwrap(), 1);
        assert_eq!(pairs.index(1, 2).unwrap(), 2);
    }

    #[test]
    fn test_invalid_pairs() {
        let pairs = PairIndex::new(4);
        assert!(matches!(
            pairs.index(1, 1),
            Err(PlacementError::InvalidPair { a: 1, b: 1, n: 4 })
        ));
        assert!(pairs.index(0, 4).is_err());
        assert!(pairs.index(4, 0).is_err());
        assert!(PairIndex::new(0).index(0, 1).is_err());
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(PairIndex::new(0).is_empty());
        assert!(PairIndex::new(1).is_empty());
        assert_eq!(PairIndex::new(1).pairs().count(), 0);
        assert_eq!(PairIndex::new(2).len(), 1);
    }
}
