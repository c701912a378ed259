//! Whole-store nested-set consistency check.

use itertools::Itertools;

use crate::domain::builder::TreeResult;
use crate::domain::error::DomainError;
use crate::domain::NodeRow;

/// Verify the nested-set invariants over every row of a store.
///
/// Checks, for rows sorted by `left`:
/// - `left < right` for each row
/// - any two intervals are either disjoint or strictly nested
/// - `depth` equals the number of strict ancestors
/// - the width equals twice the size of the subtree, node included
pub fn check_rows(rows: &[NodeRow]) -> TreeResult<()> {
    let sorted: Vec<&NodeRow> = rows.iter().sorted_by_key(|r| r.left).collect();

    // (position in `sorted`, descendants seen so far)
    let mut ancestors: Vec<(usize, i64)> = Vec::new();
    let mut descendant_counts = vec![0i64; sorted.len()];

    for (pos, row) in sorted.iter().enumerate() {
        if row.left >= row.right {
            return Err(DomainError::invariant(format!(
                "{} has left >= right",
                row
            )));
        }

        let interval = row.interval();
        while let Some(&(top, count)) = ancestors.last() {
            if sorted[top].interval().is_disjoint(&interval) {
                descendant_counts[top] = count;
                ancestors.pop();
            } else {
                break;
            }
        }

        if let Some(&(top, _)) = ancestors.last() {
            let parent = sorted[top];
            if !parent.interval().strictly_contains(&interval) {
                return Err(DomainError::invariant(format!(
                    "{} partially overlaps {}",
                    row, parent
                )));
            }
        }

        if row.depth as usize != ancestors.len() {
            return Err(DomainError::invariant(format!(
                "{} has depth {} but {} ancestors",
                row,
                row.depth,
                ancestors.len()
            )));
        }

        for entry in ancestors.iter_mut() {
            entry.1 += 1;
        }
        ancestors.push((pos, 0));
    }
    for (top, count) in ancestors {
        descendant_counts[top] = count;
    }

    for (row, count) in sorted.iter().zip(descendant_counts) {
        if row.width() != 2 * (count + 1) {
            return Err(DomainError::invariant(format!(
                "{} has width {} for {} descendants",
                row,
                row.width(),
                count
            )));
        }
    }
    Ok(())
}
