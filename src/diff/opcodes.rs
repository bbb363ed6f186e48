//! Longest-common-subsequence alignment of two sequences.
//!
//! Line alignment uses Hirschberg's linear-space LCS after the common
//! prefix and suffix are stripped, so long documents never need a full
//! LCS table. Token alignment within a single line goes through the
//! `diff` crate. Both are folded into opcodes that are contiguous,
//! non-overlapping, in increasing order, and cover both sequences
//! completely.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Kind of an alignment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    /// `a[a_range] == b[b_range]`
    Equal,
    /// `b[b_range]` is new; `a_range` is empty
    Insert,
    /// `a[a_range]` was removed; `b_range` is empty
    Delete,
    /// `a[a_range]` was replaced by `b[b_range]`
    Replace,
}

/// One alignment step over index ranges of both sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opcode {
    /// Step kind
    pub tag: Tag,
    /// Range in the left sequence
    pub a: Range<usize>,
    /// Range in the right sequence
    pub b: Range<usize>,
}

impl Opcode {
    /// Create an opcode.
    pub fn new(tag: Tag, a: Range<usize>, b: Range<usize>) -> Self {
        Self { tag, a, b }
    }
}

/// Compute the opcode sequence turning `a` into `b`.
pub fn opcodes<T: PartialEq>(a: &[T], b: &[T]) -> Vec<Opcode> {
    let pairs = matching_pairs(a, b);
    let mut ops = Vec::new();
    let (mut i, mut j) = (0, 0);
    let mut k = 0;

    while k < pairs.len() {
        let (mi, mj) = pairs[k];
        push_gap(&mut ops, i..mi, j..mj);

        let mut len = 1;
        while k + len < pairs.len() && pairs[k + len] == (mi + len, mj + len) {
            len += 1;
        }
        ops.push(Opcode::new(Tag::Equal, mi..mi + len, mj..mj + len));

        i = mi + len;
        j = mj + len;
        k += len;
    }

    push_gap(&mut ops, i..a.len(), j..b.len());
    ops
}

/// Compute opcodes for short sequences, such as the tokens of one line,
/// with the `diff` crate's table-based LCS.
pub fn word_opcodes<T: PartialEq>(a: &[T], b: &[T]) -> Vec<Opcode> {
    let mut ops: Vec<Opcode> = Vec::new();
    let (mut i, mut j) = (0, 0);
    let (mut gap_i, mut gap_j) = (0, 0);

    for step in diff::slice(a, b) {
        match step {
            diff::Result::Both(..) => {
                push_gap(&mut ops, gap_i..i, gap_j..j);
                match ops.last_mut() {
                    Some(op) if op.tag == Tag::Equal && op.a.end == i && op.b.end == j => {
                        op.a.end += 1;
                        op.b.end += 1;
                    }
                    _ => ops.push(Opcode::new(Tag::Equal, i..i + 1, j..j + 1)),
                }
                i += 1;
                j += 1;
                gap_i = i;
                gap_j = j;
            }
            diff::Result::Left(_) => i += 1,
            diff::Result::Right(_) => j += 1,
        }
    }

    push_gap(&mut ops, gap_i..i, gap_j..j);
    ops
}

/// Number of elements covered by `Equal` opcodes.
pub fn matched_len(ops: &[Opcode]) -> usize {
    ops.iter()
        .filter(|op| op.tag == Tag::Equal)
        .map(|op| op.a.len())
        .sum()
}

fn push_gap(ops: &mut Vec<Opcode>, a: Range<usize>, b: Range<usize>) {
    let tag = match (a.is_empty(), b.is_empty()) {
        (true, true) => return,
        (false, true) => Tag::Delete,
        (true, false) => Tag::Insert,
        (false, false) => Tag::Replace,
    };
    ops.push(Opcode::new(tag, a, b));
}

/// Index pairs of one longest common subsequence, in increasing order.
fn matching_pairs<T: PartialEq>(a: &[T], b: &[T]) -> Vec<(usize, usize)> {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let mut pairs: Vec<(usize, usize)> = (0..prefix).map(|k| (k, k)).collect();
    hirschberg(
        &a[prefix..a.len() - suffix],
        &b[prefix..b.len() - suffix],
        prefix,
        prefix,
        &mut pairs,
    );
    let (a_tail, b_tail) = (a.len() - suffix, b.len() - suffix);
    pairs.extend((0..suffix).map(|k| (a_tail + k, b_tail + k)));
    pairs
}

fn hirschberg<T: PartialEq>(
    a: &[T],
    b: &[T],
    a_off: usize,
    b_off: usize,
    out: &mut Vec<(usize, usize)>,
) {
    if a.is_empty() || b.is_empty() {
        return;
    }
    if a.len() == 1 {
        if let Some(j) = b.iter().position(|y| *y == a[0]) {
            out.push((a_off, b_off + j));
        }
        return;
    }
    if b.len() == 1 {
        if let Some(i) = a.iter().position(|x| *x == b[0]) {
            out.push((a_off + i, b_off));
        }
        return;
    }

    let mid = a.len() / 2;
    let m = b.len();
    let forward = lcs_row(&a[..mid], b, false);
    let backward = lcs_row(&a[mid..], b, true);

    let mut split = 0;
    let mut best = 0;
    for j in 0..=m {
        let score = forward[j] + backward[m - j];
        if score > best {
            best = score;
            split = j;
        }
    }

    if best == 0 {
        return;
    }

    hirschberg(&a[..mid], &b[..split], a_off, b_off, out);
    hirschberg(&a[mid..], &b[split..], a_off + mid, b_off + split, out);
}

/// Last row of the LCS length table: `row[j]` is the LCS length of `a`
/// and the first `j` elements of `b`, or of both reversed.
fn lcs_row<T: PartialEq>(a: &[T], b: &[T], reverse: bool) -> Vec<usize> {
    let n = a.len();
    let m = b.len();
    let mut prev = vec![0usize; m + 1];
    let mut curr = vec![0usize; m + 1];

    for i in 0..n {
        let x = if reverse { &a[n - 1 - i] } else { &a[i] };
        for j in 1..=m {
            let y = if reverse { &b[m - j] } else { &b[j - 1] };
            curr[j] = if x == y {
                prev[j - 1] + 1
            } else {
                prev[j].max(curr[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev
}
