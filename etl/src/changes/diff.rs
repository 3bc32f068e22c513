//! Row sequence comparison.
//!
//! Both functions return the rows of `new` that count as changes, in `new` order.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::ops::{Index, IndexMut};

/// Returns the rows inserted into `new` by a shortest edit script from `old` to `new`.
///
/// Rows that only moved are reported as insertions at their new position. Runs in linear space
/// and `O((N+M)·D)` time, where `D` is the size of the edit script.
pub fn ordered_insertions<'a, T: Eq + Hash>(old: &[T], new: &'a [T]) -> Vec<&'a T> {
    inserted_indices(old, new)
        .into_iter()
        .map(|index| &new[index])
        .collect()
}

/// Returns the rows of `new` occurring more often than in `old`.
///
/// For a row present `p` times in `old` and `n > p` times in `new`, the last `n - p` occurrences
/// are returned. Reordering alone yields no rows.
pub fn multiset_insertions<'a, T: Eq + Hash>(old: &[T], new: &'a [T]) -> Vec<&'a T> {
    let mut remaining: HashMap<&T, usize> = HashMap::with_capacity(old.len());
    for row in old {
        *remaining.entry(row).or_default() += 1;
    }

    new.iter()
        .filter(|row| match remaining.get_mut(*row) {
            Some(count) if *count > 0 => {
                *count -= 1;
                false
            }
            _ => true,
        })
        .collect()
}

/// Indices into `new` of the rows inserted by a shortest edit script, in ascending order.
fn inserted_indices<T: Eq + Hash>(old: &[T], new: &[T]) -> Vec<usize> {
    let prefix = common_prefix(old, new);
    let suffix = common_suffix(&old[prefix..], &new[prefix..]);
    let old = &old[prefix..old.len() - suffix];
    let new = &new[prefix..new.len() - suffix];

    // A row absent from the other side can never be matched, so removing such rows up front
    // leaves the longest common subsequence unchanged.
    let old_rows: HashSet<&T> = old.iter().collect();
    let new_rows: HashSet<&T> = new.iter().collect();
    let old_candidates: Vec<&T> = old.iter().filter(|row| new_rows.contains(row)).collect();

    let mut inserted = Vec::new();
    let mut new_candidates = Vec::new();
    let mut positions = Vec::new();
    for (index, row) in new.iter().enumerate() {
        if old_rows.contains(row) {
            new_candidates.push(row);
            positions.push(prefix + index);
        } else {
            inserted.push(prefix + index);
        }
    }

    let mut matched_insertions = Vec::new();
    Myers::new(old_candidates.len(), new_candidates.len()).conquer(
        &old_candidates,
        &new_candidates,
        0,
        &mut matched_insertions,
    );
    inserted.extend(matched_insertions.into_iter().map(|index| positions[index]));

    inserted.sort_unstable();
    inserted
}

fn common_prefix<T: PartialEq>(old: &[T], new: &[T]) -> usize {
    old.iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count()
}

fn common_suffix<T: PartialEq>(old: &[T], new: &[T]) -> usize {
    old.iter()
        .rev()
        .zip(new.iter().rev())
        .take_while(|(a, b)| a == b)
        .count()
}

/// Furthest reaching x per diagonal `k`, addressed with negative diagonals.
struct Diagonals {
    offset: isize,
    furthest: Vec<usize>,
}

impl Diagonals {
    fn new(max_d: usize) -> Self {
        Self {
            offset: max_d as isize,
            furthest: vec![0; 2 * max_d + 1],
        }
    }
}

impl Index<isize> for Diagonals {
    type Output = usize;

    fn index(&self, k: isize) -> &usize {
        &self.furthest[(self.offset + k) as usize]
    }
}

impl IndexMut<isize> for Diagonals {
    fn index_mut(&mut self, k: isize) -> &mut usize {
        &mut self.furthest[(self.offset + k) as usize]
    }
}

fn max_d(n: usize, m: usize) -> usize {
    (n + m + 1) / 2 + 1
}

/// Linear-space Myers: splits the problem at the middle snake and recurses on both halves.
struct Myers {
    forward: Diagonals,
    backward: Diagonals,
}

impl Myers {
    fn new(n: usize, m: usize) -> Self {
        let max_d = max_d(n, m);
        Self {
            forward: Diagonals::new(max_d),
            backward: Diagonals::new(max_d),
        }
    }

    /// Pushes the indices of inserted rows of `new`, shifted by `new_start`, in ascending order.
    fn conquer<T: PartialEq>(
        &mut self,
        old: &[T],
        new: &[T],
        new_start: usize,
        inserted: &mut Vec<usize>,
    ) {
        let prefix = common_prefix(old, new);
        let (old, new) = (&old[prefix..], &new[prefix..]);
        let new_start = new_start + prefix;
        let suffix = common_suffix(old, new);
        let (old, new) = (&old[..old.len() - suffix], &new[..new.len() - suffix]);

        if new.is_empty() {
            return;
        }
        if old.is_empty() {
            inserted.extend(new_start..new_start + new.len());
            return;
        }

        match self.middle_snake(old, new) {
            Some((x, y)) => {
                self.conquer(&old[..x], &new[..y], new_start, inserted);
                self.conquer(&old[x..], &new[y..], new_start + y, inserted);
            }
            None => inserted.extend(new_start..new_start + new.len()),
        }
    }

    /// Finds the start of the middle snake of an optimal path through `old` and `new`.
    ///
    /// Both inputs are non-empty and differ in their first and last rows.
    fn middle_snake<T: PartialEq>(&mut self, old: &[T], new: &[T]) -> Option<(usize, usize)> {
        let n = old.len();
        let m = new.len();
        let delta = n as isize - m as isize;
        let odd = delta & 1 == 1;

        self.forward[1] = 0;
        self.backward[1] = 0;

        for d in 0..max_d(n, m) as isize {
            for k in (-d..=d).rev().step_by(2) {
                let mut x = if k == -d || (k != d && self.forward[k - 1] < self.forward[k + 1]) {
                    self.forward[k + 1]
                } else {
                    self.forward[k - 1] + 1
                };
                let y = (x as isize - k) as usize;
                let start = (x, y);

                if x < n && y < m {
                    x += common_prefix(&old[x..], &new[y..]);
                }
                self.forward[k] = x;

                if odd && (k - delta).abs() < d && x + self.backward[delta - k] >= n {
                    return Some(start);
                }
            }

            for k in (-d..=d).rev().step_by(2) {
                let mut x = if k == -d || (k != d && self.backward[k - 1] < self.backward[k + 1])
                {
                    self.backward[k + 1]
                } else {
                    self.backward[k - 1] + 1
                };
                let mut y = (x as isize - k) as usize;

                if x < n && y < m {
                    let snake = common_suffix(&old[..n - x], &new[..m - y]);
                    x += snake;
                    y += snake;
                }
                self.backward[k] = x;

                if !odd && (k - delta).abs() <= d && x + self.forward[delta - k] >= n {
                    return Some((n - x, m - y));
                }
            }
        }

        None
    }
}
