use tracing::debug;

/// Splits text into chunks of at most `words_per_chunk` whitespace tokens.
/// The last chunk may be shorter; blank text yields no chunks.
pub fn chunk_by_words(text: &str, words_per_chunk: usize) -> Vec<String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return Vec::new();
    }
    tokens
        .chunks(words_per_chunk.max(1))
        .map(|chunk| chunk.join(" "))
        .collect()
}

/// Element-wise mean of the vectors sharing the first vector's dimension.
/// `None` when there is nothing usable to average.
pub fn average_embeddings(vectors: &[Vec<f64>]) -> Option<Vec<f64>> {
    let dim = vectors.first()?.len();
    if dim == 0 {
        return None;
    }

    let mut sum = vec![0.0; dim];
    let mut count = 0usize;
    for v in vectors.iter().filter(|v| v.len() == dim) {
        for (acc, x) in sum.iter_mut().zip(v) {
            *acc += x;
        }
        count += 1;
    }

    let count = count as f64;
    Some(sum.into_iter().map(|x| x / count).collect())
}

/// Cosine similarity of two dense vectors.
///
/// Vectors of different length are compared over the shorter length only.
/// That keeps mixed-model runs from failing but is not a meaningful similarity.
pub fn dense_cosine(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a.len() != b.len() {
        debug!(
            "Comparing embeddings of different dimensions ({} vs {}) over the shared prefix",
            a.len(),
            b.len()
        );
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
