use std::collections::{HashMap, HashSet};

/// Term -> weight. Absent terms weigh zero.
pub type SparseVector = HashMap<String, f64>;

/// Builds unigram + bigram TF-IDF vectors over one shared corpus.
///
/// TF is the raw count divided by the document's largest count; IDF is
/// `ln((1 + N) / (1 + df)) + 1`. Documents are whitespace-tokenised as-is,
/// so callers pass normalised text.
pub fn build_tfidf_vectors(docs: &[&str]) -> Vec<SparseVector> {
    let grams_per_doc: Vec<Vec<String>> = docs.iter().map(|doc| ngrams(doc)).collect();

    let mut df: HashMap<&str, usize> = HashMap::new();
    for grams in &grams_per_doc {
        let unique: HashSet<&str> = grams.iter().map(String::as_str).collect();
        for gram in unique {
            *df.entry(gram).or_insert(0) += 1;
        }
    }

    let n_docs = docs.len() as f64;
    let idf: HashMap<&str, f64> = df
        .iter()
        .map(|(term, count)| (*term, ((1.0 + n_docs) / (1.0 + *count as f64)).ln() + 1.0))
        .collect();

    grams_per_doc
        .iter()
        .map(|grams| {
            let mut tf: HashMap<&str, f64> = HashMap::new();
            for gram in grams {
                *tf.entry(gram.as_str()).or_insert(0.0) += 1.0;
            }
            let max_tf = tf.values().copied().fold(1.0, f64::max);

            tf.into_iter()
                .map(|(term, count)| {
                    let weight = (count / max_tf) * idf.get(term).copied().unwrap_or(0.0);
                    (term.to_string(), weight)
                })
                .collect()
        })
        .collect()
}

fn ngrams(doc: &str) -> Vec<String> {
    let tokens: Vec<&str> = doc.split_whitespace().collect();
    let mut grams: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    grams.extend(tokens.windows(2).map(|pair| pair.join(" ")));
    grams
}

/// Cosine similarity over shared keys; 0 when either side is empty or has zero norm.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum();
    let norm_a = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.values().map(|v| v * v).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors_include_unigrams_and_bigrams() {
        let vectors = build_tfidf_vectors(&["rust async tokio"]);
        let keys: HashSet<&str> = vectors[0].keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            HashSet::from(["rust", "async", "tokio", "rust async", "async tokio"])
        );
    }

    #[test]
    fn test_tf_normalised_by_max_count() {
        // One document: every idf is ln(2/2) + 1 = 1, so weight = tf / max_tf.
        let vectors = build_tfidf_vectors(&["go go go rust"]);
        let v = &vectors[0];
        assert!((v["go"] - 1.0).abs() < 1e-12);
        assert!((v["rust"] - 1.0 / 3.0).abs() < 1e-12);
        assert!((v["go go"] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_smoothed_idf_rewards_rare_terms() {
        let vectors = build_tfidf_vectors(&["rust kafka", "rust", "rust"]);
        let expected_kafka = (4.0_f64 / 2.0).ln() + 1.0;
        assert!((vectors[0]["kafka"] - expected_kafka).abs() < 1e-12);
        assert!((vectors[0]["rust"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_self_similarity_is_one() {
        let vectors = build_tfidf_vectors(&["python sql docker", "java spring"]);
        let sim = cosine_similarity(&vectors[0], &vectors[0]);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_documents_are_orthogonal() {
        let vectors = build_tfidf_vectors(&["python sql", "java spring"]);
        assert_eq!(cosine_similarity(&vectors[0], &vectors[1]), 0.0);
    }

    #[test]
    fn test_empty_vector_similarity_is_zero() {
        let vectors = build_tfidf_vectors(&["python", ""]);
        assert!(vectors[1].is_empty());
        assert_eq!(cosine_similarity(&vectors[0], &vectors[1]), 0.0);
        assert_eq!(cosine_similarity(&vectors[1], &vectors[0]), 0.0);
    }
}
