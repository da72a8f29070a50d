//! Two-pointer alignment of sibling sequences.
//!
//! Walks the two sequences side by side. Corresponding nodes (same name,
//! ordering key and kind) are matched and, when both are groups, their
//! children are aligned recursively. On a mismatch the aligner looks ahead:
//!
//! 1. right first: if the current left node appears further on the right,
//!    the right nodes skipped over are marked;
//! 2. then left: if the current right node appears further on the left,
//!    the left nodes skipped over are marked;
//! 3. otherwise both current nodes are marked.
//!
//! Whatever remains once one side is exhausted is marked.
//!
//! # Lookahead policy
//!
//! The right side is always searched before the left side. This is a
//! fixed, deterministic policy and not a minimal edit script: for
//! `[A, B]` against `[B, A]` the right-side search finds `A`, marks the
//! right `B`, matches `A`, and the left `B` is marked as a leftover.
//! Worst-case cost is O(n·m); identical sequences or a short contiguous
//! edit cost O(n + m).

use confcmp_hierarchy::HierarchyNode;
use confcmp_types::NAME_SEPARATOR;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// States of the alignment walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlignState {
    /// Compare the current pair; match and advance, or start seeking.
    AdvanceBoth,
    /// Look for the current left node further on the right.
    SeekRight,
    /// Look for the current right node further on the left.
    SeekLeft,
    /// Neither node appears ahead on the other side.
    MarkBoth,
    /// One side is exhausted.
    Done,
}

/// What an alignment marked and where it recursed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentReport {
    /// Full paths of marked nodes on the left.
    pub left_marked: Vec<String>,
    /// Full paths of marked nodes on the right.
    pub right_marked: Vec<String>,
    /// Full paths of matched group pairs whose children were aligned.
    pub sub_alignments: Vec<String>,
}

impl AlignmentReport {
    /// Returns `true` if nothing was marked on either side.
    pub fn is_identical(&self) -> bool {
        self.left_marked.is_empty() && self.right_marked.is_empty()
    }

    /// Number of marked nodes on both sides.
    pub fn marked_count(&self) -> usize {
        self.left_marked.len() + self.right_marked.len()
    }
}

/// Align two sibling sequences and set `marked` on every node without a
/// counterpart. Never fails.
pub fn mark_differences(
    left: &mut [HierarchyNode],
    right: &mut [HierarchyNode],
) -> AlignmentReport {
    let mut report = AlignmentReport::default();
    align(left, right, "", &mut report);
    report
}

fn align(
    left: &mut [HierarchyNode],
    right: &mut [HierarchyNode],
    prefix: &str,
    report: &mut AlignmentReport,
) {
    let (mut i, mut j) = (0, 0);
    let mut state = AlignState::AdvanceBoth;

    loop {
        trace!(?state, i, j, prefix, "align step");
        state = match state {
            AlignState::AdvanceBoth => {
                if i >= left.len() || j >= right.len() {
                    AlignState::Done
                } else if left[i].corresponds_to(&right[j]) {
                    if left[i].is_group() && right[j].is_group() {
                        let path = join(prefix, &left[i].name);
                        align(
                            &mut left[i].children,
                            &mut right[j].children,
                            &path,
                            report,
                        );
                        report.sub_alignments.push(path);
                    }
                    i += 1;
                    j += 1;
                    AlignState::AdvanceBoth
                } else {
                    AlignState::SeekRight
                }
            }
            AlignState::SeekRight => {
                match (j + 1..right.len()).find(|&k| left[i].corresponds_to(&right[k])) {
                    Some(k) => {
                        mark_all(&mut right[j..k], prefix, &mut report.right_marked);
                        j = k;
                        AlignState::AdvanceBoth
                    }
                    None => AlignState::SeekLeft,
                }
            }
            AlignState::SeekLeft => {
                match (i + 1..left.len()).find(|&k| left[k].corresponds_to(&right[j])) {
                    Some(k) => {
                        mark_all(&mut left[i..k], prefix, &mut report.left_marked);
                        i = k;
                        AlignState::AdvanceBoth
                    }
                    None => AlignState::MarkBoth,
                }
            }
            AlignState::MarkBoth => {
                mark_all(&mut left[i..=i], prefix, &mut report.left_marked);
                mark_all(&mut right[j..=j], prefix, &mut report.right_marked);
                i += 1;
                j += 1;
                AlignState::AdvanceBoth
            }
            AlignState::Done => break,
        };
    }

    mark_all(&mut left[i..], prefix, &mut report.left_marked);
    mark_all(&mut right[j..], prefix, &mut report.right_marked);
}

fn mark_all(nodes: &mut [HierarchyNode], prefix: &str, out: &mut Vec<String>) {
    for node in nodes {
        node.marked = true;
        out.push(join(prefix, &node.name));
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}{NAME_SEPARATOR}{name}")
    }
}
