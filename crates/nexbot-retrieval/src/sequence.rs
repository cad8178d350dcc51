use std::collections::{HashMap, HashSet};

/// Sequences at least this long get their most popular characters excluded
/// from match seeding.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Ratcliff/Obershelp sequence similarity between `a` and `b`.
///
/// The ratio is `2 * M / (|a| + |b|)` where `M` counts characters in the
/// matching blocks found by recursively taking the longest common substring
/// and repeating on both sides of it.
pub struct SequenceMatcher {
    a: Vec<char>,
    b: Vec<char>,
    /// char of `b` -> ascending positions in `b`
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher {
    /// Prepare a matcher comparing `a` against `b`. The index is built over `b`.
    pub fn new(a: &str, b: &str) -> Self {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        let n = b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let threshold = n / 100 + 1;
            let popular: HashSet<char> = b2j
                .iter()
                .filter(|(_, positions)| positions.len() > threshold)
                .map(|(&c, _)| c)
                .collect();
            for c in popular {
                b2j.remove(&c);
            }
        }

        Self { a, b, b2j }
    }

    /// Longest common block inside `a[alo..ahi]` and `b[blo..bhi]` as
    /// `(i, j, size)`; the earliest such block wins ties.
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);

        // j -> length of the match ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular characters never seed a match but may still extend one.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }

    /// Non-overlapping matching blocks `(i, j, size)` in ascending order,
    /// with adjacent blocks merged.
    pub fn matching_blocks(&self) -> Vec<(usize, usize, usize)> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            blocks.push((i, j, k));
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        blocks.sort_unstable();

        let mut merged: Vec<(usize, usize, usize)> = Vec::with_capacity(blocks.len());
        for (i, j, k) in blocks {
            match merged.last_mut() {
                Some(last) if last.0 + last.2 == i && last.1 + last.2 == j => last.2 += k,
                _ => merged.push((i, j, k)),
            }
        }
        merged
    }

    /// Similarity in `[0, 1]`; two empty strings are identical.
    pub fn ratio(&self) -> f64 {
        let matches: usize = self.matching_blocks().iter().map(|&(_, _, k)| k).sum();
        Self::ratio_of(matches, self.a.len() + self.b.len())
    }

    /// Cheap upper bound on [`ratio`](Self::ratio) from character multisets.
    pub fn quick_ratio(&self) -> f64 {
        let mut available: HashMap<char, isize> = HashMap::new();
        for &c in &self.b {
            *available.entry(c).or_insert(0) += 1;
        }
        let mut matches = 0usize;
        for c in &self.a {
            let slot = available.entry(*c).or_insert(0);
            if *slot > 0 {
                matches += 1;
            }
            *slot -= 1;
        }
        Self::ratio_of(matches, self.a.len() + self.b.len())
    }

    /// Cheapest upper bound on [`ratio`](Self::ratio) from lengths alone.
    pub fn real_quick_ratio(&self) -> f64 {
        let (la, lb) = (self.a.len(), self.b.len());
        Self::ratio_of(la.min(lb), la + lb)
    }

    fn ratio_of(matches: usize, length: usize) -> f64 {
        if length == 0 {
            1.0
        } else {
            2.0 * matches as f64 / length as f64
        }
    }
}

/// Ratio of `candidate` against `query`, or `None` below `cutoff`.
/// The cheap upper bounds are checked first.
pub fn close_ratio(query: &str, candidate: &str, cutoff: f64) -> Option<f64> {
    let matcher = SequenceMatcher::new(candidate, query);
    if matcher.real_quick_ratio() < cutoff || matcher.quick_ratio() < cutoff {
        return None;
    }
    let ratio = matcher.ratio();
    (ratio >= cutoff).then_some(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(a: &str, b: &str) -> f64 {
        SequenceMatcher::new(a, b).ratio()
    }

    #[test]
    fn test_identical_and_disjoint() {
        assert_eq!(ratio("hello", "hello"), 1.0);
        assert_eq!(ratio("abc", "xyz"), 0.0);
        assert_eq!(ratio("", ""), 1.0);
        assert_eq!(ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_single_typo() {
        // "helo" shares 4 characters with "hello": 2 * 4 / 9
        let r = ratio("hello", "helo");
        assert!((r - 8.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_classic_example() {
        // difflib documentation: SequenceMatcher(None, "abcd", "bcde").ratio() == 0.75
        assert!((ratio("abcd", "bcde") - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_matching_blocks_recurse_on_both_sides() {
        let blocks = SequenceMatcher::new("abxcd", "abcd").matching_blocks();
        assert_eq!(blocks, vec![(0, 0, 2), (3, 2, 2)]);
    }

    #[test]
    fn test_quick_ratios_bound_ratio() {
        for (a, b) in [("hi there", "hello"), ("private", "pirate"), ("abc", "cba")] {
            let m = SequenceMatcher::new(a, b);
            assert!(m.real_quick_ratio() >= m.quick_ratio());
            assert!(m.quick_ratio() >= m.ratio());
        }
    }

    #[test]
    fn test_close_ratio_cutoff() {
        assert!(close_ratio("helo", "hello", 0.5).is_some());
        assert!(close_ratio("xyz complet unrel", "hello", 0.5).is_none());
    }

    #[test]
    fn test_close_ratio_accepts_exact_cutoff() {
        // One shared character out of four: 2 * 1 / 4
        assert_eq!(ratio("ab", "ax"), 0.5);
        assert_eq!(close_ratio("ax", "ab", 0.5), Some(0.5));
    }

    #[test]
    fn test_long_sequences_still_match() {
        let long = "ab".repeat(150);
        assert_eq!(ratio(&long, &long), 1.0);
    }
}
