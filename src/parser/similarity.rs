//! Ratcliff/Obershelp similarity ("gestalt pattern matching").
//!
//! The ratio is `2 * M / (len(a) + len(b))`, where `M` is the number of characters in the
//! matching blocks found by repeatedly taking the longest common substring and recursing
//! on both sides of it. Junk characters of `b` may not anchor a match but are absorbed at
//! its edges.

use std::collections::HashMap;

/// Similarity of two strings in `[0, 1]`, spaces treated as junk.
pub fn ratio(a: &str, b: &str) -> f64 {
    ratio_with_junk(a, b, |c| c == ' ')
}

pub fn ratio_with_junk(a: &str, b: &str, is_junk: impl Fn(char) -> bool) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matcher = Matcher::new(&a, &b, is_junk);
    2.0 * matcher.matching_characters() as f64 / total as f64
}

struct Matcher<'a, J> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of every non-junk character of `b`.
    b2j: HashMap<char, Vec<usize>>,
    is_junk: J,
}

impl<'a, J: Fn(char) -> bool> Matcher<'a, J> {
    fn new(a: &'a [char], b: &'a [char], is_junk: J) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            if !is_junk(c) {
                b2j.entry(c).or_default().push(j);
            }
        }
        Matcher { a, b, b2j, is_junk }
    }

    fn matching_characters(&self) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`, earliest on ties.
    fn longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let (a, b) = (self.a, self.b);
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let before = j.checked_sub(1).and_then(|prev| j2len.get(&prev));
                    let k = before.copied().unwrap_or(0) + 1;
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

        // Absorb junk on both ends of the block.
        while best_i > alo
            && best_j > blo
            && (self.is_junk)(b[best_j - 1])
            && a[best_i - 1] == b[best_j - 1]
        {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && (self.is_junk)(b[best_j + best_size])
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}
