use crate::matching::models::MatchResult;

/// Sorts by score (descending, stable on ties), assigns 1-based ranks, then
/// keeps the first `top_n` results. `top_n == 0` keeps everything.
pub fn rank_results(mut results: Vec<MatchResult>, top_n: usize) -> Vec<MatchResult> {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    for (index, result) in results.iter_mut().enumerate() {
        result.rank = index + 1;
    }
    if top_n > 0 && results.len() > top_n {
        results.truncate(top_n);
    }
    results
}
