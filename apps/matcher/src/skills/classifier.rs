use std::collections::BTreeSet;

use super::lexicon::{SkillMatcher, SKILL_LEXICON};

const MUST_CUES: &[&str] = &["must", "required", "minimum", "mandatory"];
const NICE_CUES: &[&str] = &["nice to have", "preferred", "plus", "bonus", "optional"];

/// Requirement-strength split of the JD's lexicon skills.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MustNice {
    pub must: Vec<String>,
    pub nice: Vec<String>,
}

/// Scans the raw JD line by line. Lines carrying a must cue contribute their
/// lexicon skills to `must`, lines carrying a nice cue to `nice`; a line with
/// both cues feeds both lists.
pub fn classify_must_nice(jd_raw: &str, matcher: &SkillMatcher) -> MustNice {
    let mut must = BTreeSet::new();
    let mut nice = BTreeSet::new();

    for line in jd_raw.to_lowercase().lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let is_must = MUST_CUES.iter().any(|cue| line.contains(cue));
        let is_nice = NICE_CUES.iter().any(|cue| line.contains(cue));
        if !is_must && !is_nice {
            continue;
        }

        for skill in SKILL_LEXICON.iter().filter(|s| matcher.contains(line, s)) {
            if is_must {
                must.insert(skill.to_string());
            }
            if is_nice {
                nice.insert(skill.to_string());
            }
        }
    }

    MustNice {
        must: must.into_iter().collect(),
        nice: nice.into_iter().collect(),
    }
}
