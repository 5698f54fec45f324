// lib/src/engine/median.rs

use crate::engine::rank_index::DegreeRankIndex;

/// Median of all degrees held by the index, in O(log n).
///
/// Returns `None` for an empty index. For an even count the two middle
/// degrees are averaged.
pub fn median_degree(index: &DegreeRankIndex) -> Option<f64> {
    let size = index.len();
    if size == 0 {
        return None;
    }
    // ceil(size / 2 - 1) for every size >= 1
    let idx = (size - 1) / 2;
    let lower = index.degree_at_rank(idx)?;
    if size % 2 == 0 {
        let upper = index.degree_at_rank(idx + 1)?;
        Some((lower + upper) as f64 / 2.0)
    } else {
        Some(lower as f64)
    }
}

/// Median recomputed by sorting every degree. O(n log n); used to
/// cross-check the incremental answer.
pub fn reference_median<I>(degrees: I) -> Option<f64>
where
    I: IntoIterator<Item = usize>,
{
    let mut degrees: Vec<usize> = degrees.into_iter().collect();
    if degrees.is_empty() {
        return None;
    }
    degrees.sort_unstable();
    let size = degrees.len();
    if size % 2 == 0 {
        Some((degrees[size / 2 - 1] + degrees[size / 2]) as f64 / 2.0)
    } else {
        Some(degrees[size / 2] as f64)
    }
}

/// Output line body: two fractional digits.
pub fn format_median(median: f64) -> String {
    format!("{:.2}", median)
}
