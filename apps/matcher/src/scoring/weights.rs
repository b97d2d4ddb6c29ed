/// Weights of the hybrid score. Every table sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub cosine: f64,
    pub must: f64,
    pub nice: f64,
    pub skill: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            cosine: 0.45,
            must: 0.35,
            nice: 0.10,
            skill: 0.10,
        }
    }
}

impl ScoreWeights {
    /// Without must-have skills the must weight moves to similarity, nice and general overlap.
    pub fn for_must_count(must_count: usize) -> Self {
        if must_count == 0 {
            Self {
                cosine: 0.55,
                must: 0.0,
                nice: 0.15,
                skill: 0.30,
            }
        } else {
            Self::default()
        }
    }
}

/// Overlap ratios feeding the hybrid score, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SkillRatios {
    pub must: f64,
    pub nice: f64,
    pub skill: f64,
}

/// `matched / total`, or 0 when there is nothing to match.
pub fn ratio(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    matched as f64 / total as f64
}

/// Weighted blend of similarity and skill overlap, as a 0-100 score with two decimals.
pub fn compute_hybrid_score(similarity: f64, ratios: &SkillRatios, weights: &ScoreWeights) -> f64 {
    let blended = weights.cosine * similarity
        + weights.must * ratios.must
        + weights.nice * ratios.nice
        + weights.skill * ratios.skill;
    round2(blended.clamp(0.0, 1.0) * 100.0)
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_tables_sum_to_one() {
        for count in [0, 1, 7] {
            let w = ScoreWeights::for_must_count(count);
            let total = w.cosine + w.must + w.nice + w.skill;
            assert!((total - 1.0).abs() < 1e-12, "count {count}");
        }
    }

    #[test]
    fn test_table_switches_only_on_empty_must() {
        assert_eq!(ScoreWeights::for_must_count(1), ScoreWeights::for_must_count(40));
        let none = ScoreWeights::for_must_count(0);
        assert_eq!(none.must, 0.0);
        assert_eq!(none.cosine, 0.55);
        assert_eq!(none.skill, 0.30);
    }

    #[test]
    fn test_ratio_of_empty_total_is_zero() {
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(1, 4), 0.25);
    }

    #[test]
    fn test_score_full() {
        let ratios = SkillRatios {
            must: 1.0,
            nice: 1.0,
            skill: 1.0,
        };
        assert_eq!(compute_hybrid_score(1.0, &ratios, &ScoreWeights::default()), 100.0);
    }

    #[test]
    fn test_score_partial_rounds_to_two_decimals() {
        // 0.45*0.5 + 0.35*(2/3) + 0.10*0 + 0.10*1 = 0.558333...
        let ratios = SkillRatios {
            must: ratio(2, 3),
            nice: 0.0,
            skill: 1.0,
        };
        let score = compute_hybrid_score(0.5, &ratios, &ScoreWeights::default());
        assert_eq!(score, 55.83);
    }

    #[test]
    fn test_score_bounded_for_unit_inputs() {
        let steps = [0.0, 0.25, 0.5, 0.75, 1.0];
        for must_count in [0, 3] {
            let w = ScoreWeights::for_must_count(must_count);
            for sim in steps {
                for r in steps {
                    let ratios = SkillRatios {
                        must: r,
                        nice: 1.0 - r,
                        skill: r,
                    };
                    let score = compute_hybrid_score(sim, &ratios, &w);
                    assert!((0.0..=100.0).contains(&score), "{score}");
                }
            }
        }
    }

    #[test]
    fn test_negative_similarity_clamps_to_zero() {
        let score = compute_hybrid_score(-1.0, &SkillRatios::default(), &ScoreWeights::default());
        assert_eq!(score, 0.0);
    }
}
