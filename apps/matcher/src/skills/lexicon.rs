use std::collections::{BTreeSet, HashMap};

use crate::text::is_stopword;

/// Curated technology, role and process terms. Entries are lowercase.
pub const SKILL_LEXICON: &[&str] = &[
    "python", "java", "c", "c++", "c#", "go", "golang", "rust", "scala", "kotlin",
    "swift", "objective-c", "javascript", "typescript", "ruby", "php", "perl",
    "matlab", "r", "sas", "stata", "julia", "sql", "pl/sql", "t-sql", "nosql",
    "html", "css", "sass", "less", "json", "xml", "yaml", "graphql", "rest", "grpc",
    "api", "microservices", "soa", "oop", "design patterns", "clean architecture",
    "react", "react.js", "angular", "vue", "svelte", "next.js", "nuxt", "node.js",
    "nodejs", "express", "nestjs", "django", "flask", "fastapi", "spring", "spring boot",
    "asp.net", ".net", "entity framework", "laravel", "rails", "ruby on rails",
    "gin", "echo", "fiber", "wails", "electron", "qt",
    "android", "ios", "react native", "flutter", "xamarin", "cordova",
    "aws", "amazon web services", "azure", "gcp", "google cloud", "oracle cloud",
    "docker", "kubernetes", "helm", "terraform", "ansible", "chef", "puppet",
    "jenkins", "github actions", "gitlab ci", "circleci", "ci/cd", "devops",
    "linux", "windows", "macos", "bash", "powershell", "shell scripting",
    "git", "svn", "mercurial",
    "postgresql", "mysql", "mariadb", "sql server", "oracle", "sqlite", "mongodb",
    "cassandra", "redis", "dynamodb", "elasticsearch", "opensearch", "neo4j",
    "snowflake", "bigquery", "redshift", "databricks",
    "kafka", "rabbitmq", "activemq", "nats", "sqs", "pubsub",
    "spark", "hadoop", "hive", "pig", "airflow", "dbt", "etl", "elt", "data pipeline",
    "data warehouse", "data lake", "data modeling", "data governance",
    "machine learning", "deep learning", "nlp", "computer vision", "llm",
    "data analysis", "data analytics", "data science", "statistics",
    "feature engineering", "modeling", "forecasting", "recommendation systems",
    "pandas", "numpy", "scikit-learn", "tensorflow", "pytorch", "keras", "xgboost",
    "lightgbm", "catboost", "mlops", "model deployment", "onnx",
    "excel", "power bi", "tableau", "looker", "qlik", "superset", "mode",
    "salesforce", "sap", "oracle erp", "netsuite", "workday",
    "servicenow", "jira", "confluence", "slack", "microsoft teams",
    "testing", "unit testing", "integration testing", "e2e testing", "tdd", "bdd",
    "jest", "mocha", "cypress", "playwright", "selenium", "pytest", "junit",
    "security", "oauth", "openid connect", "saml", "jwt", "encryption",
    "identity", "iam", "zero trust", "vulnerability management",
    "networking", "tcp/ip", "dns", "http", "https", "ssl", "tls", "load balancing",
    "observability", "monitoring", "logging", "tracing", "prometheus", "grafana",
    "datadog", "new relic", "splunk",
    "product management", "project management", "agile", "scrum", "kanban",
    "leadership", "stakeholder management", "communication", "requirements",
    "documentation", "technical writing",
    "ui/ux", "figma", "sketch", "adobe xd", "user research", "wireframing",
    "seo", "marketing", "growth", "analytics", "a/b testing",
    "accounting", "finance", "budgeting", "procurement",
    "hr", "recruiting", "talent acquisition", "payroll", "benefits",
    "customer support", "sales", "business development", "crm",
    "compliance", "risk management", "gdpr", "hipaa", "sox", "pci",
    "warehouse", "logistics", "supply chain", "operations",
];

/// Number of high-frequency JD tokens treated as extra skills.
pub const JD_TERM_LIMIT: usize = 25;

/// Dynamic JD terms shorter than this are ignored.
const MIN_TERM_LEN: usize = 3;

/// How a skill string is tested for presence in a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Plain substring containment. Short entries such as "c", "r" or "go"
    /// also match inside unrelated words.
    #[default]
    Substring,
    /// The match must be delimited by text edges or characters other than
    /// letters, digits, `+` and `#`.
    WordBoundary,
}

impl MatchMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "substring" => Some(Self::Substring),
            "word" | "word-boundary" | "strict" => Some(Self::WordBoundary),
            _ => None,
        }
    }
}

/// Detects lexicon and JD-derived skills inside already-normalised text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillMatcher {
    mode: MatchMode,
}

impl SkillMatcher {
    pub fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    pub fn contains(&self, text: &str, skill: &str) -> bool {
        if skill.is_empty() {
            return false;
        }
        match self.mode {
            MatchMode::Substring => text.contains(skill),
            MatchMode::WordBoundary => contains_word(text, skill),
        }
    }

    /// Sorted set of lexicon skills plus qualifying `jd_terms` found in `text`.
    pub fn extract_skills(&self, text: &str, jd_terms: &[String]) -> Vec<String> {
        let mut skills: BTreeSet<String> = SKILL_LEXICON
            .iter()
            .filter(|s| self.contains(text, s))
            .map(|s| s.to_string())
            .collect();

        skills.extend(
            jd_terms
                .iter()
                .filter(|t| t.len() >= MIN_TERM_LEN && self.contains(text, t))
                .cloned(),
        );

        skills.into_iter().collect()
    }

    /// The subset of `skills` present in `text`.
    pub fn skills_in_text(&self, text: &str, skills: &[String]) -> BTreeSet<String> {
        skills
            .iter()
            .filter(|s| self.contains(text, s))
            .cloned()
            .collect()
    }
}

/// The `limit` most frequent non-stopword tokens of a normalised text,
/// ties broken alphabetically.
pub fn top_terms(text: &str, limit: usize) -> Vec<String> {
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for token in text.split_whitespace().filter(|t| !is_stopword(t)) {
        *freq.entry(token).or_insert(0) += 1;
    }

    let mut pairs: Vec<(&str, usize)> = freq.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    pairs
        .into_iter()
        .take(limit)
        .map(|(term, _)| term.to_string())
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '+' || c == '#'
}

fn contains_word(text: &str, skill: &str) -> bool {
    text.match_indices(skill).any(|(start, matched)| {
        let end = start + matched.len();
        let before_ok = text[..start].chars().next_back().map_or(true, |c| !is_word_char(c));
        let after_ok = text[end..].chars().next().map_or(true, |c| !is_word_char(c));
        before_ok && after_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_is_lowercase_and_unique() {
        let unique: BTreeSet<_> = SKILL_LEXICON.iter().collect();
        assert_eq!(unique.len(), SKILL_LEXICON.len());
        assert!(SKILL_LEXICON.iter().all(|s| s.to_lowercase() == *s));
    }

    #[test]
    fn test_substring_mode_overmatches_short_entries() {
        let matcher = SkillMatcher::new(MatchMode::Substring);
        let skills = matcher.extract_skills("docker", &[]);
        assert!(skills.contains(&"docker".to_string()));
        assert!(skills.contains(&"c".to_string()));
        assert!(skills.contains(&"r".to_string()));
    }

    #[test]
    fn test_word_mode_requires_boundaries() {
        let matcher = SkillMatcher::new(MatchMode::WordBoundary);
        let skills = matcher.extract_skills("docker c++ go", &[]);
        assert!(skills.contains(&"docker".to_string()));
        assert!(skills.contains(&"c++".to_string()));
        assert!(skills.contains(&"go".to_string()));
        assert!(!skills.contains(&"c".to_string()));
        assert!(!skills.contains(&"r".to_string()));
    }

    #[test]
    fn test_multi_word_skill_in_word_mode() {
        let matcher = SkillMatcher::new(MatchMode::WordBoundary);
        assert!(matcher.contains("strong machine learning background", "machine learning"));
        assert!(!matcher.contains("machine learnings", "machine learning"));
    }

    #[test]
    fn test_jd_terms_need_three_chars() {
        let matcher = SkillMatcher::default();
        let terms = vec!["ab".to_string(), "underwriting".to_string()];
        let skills = matcher.extract_skills("ab underwriting", &terms);
        assert!(skills.contains(&"underwriting".to_string()));
        assert!(!skills.contains(&"ab".to_string()));
    }

    #[test]
    fn test_extract_skills_sorted() {
        let matcher = SkillMatcher::new(MatchMode::WordBoundary);
        let skills = matcher.extract_skills("sql python kafka", &[]);
        assert_eq!(skills, vec!["kafka", "python", "sql"]);
    }

    #[test]
    fn test_top_terms_by_frequency_then_alpha() {
        let terms = top_terms("rust go rust kafka go rust zeta alpha", 3);
        assert_eq!(terms, vec!["rust", "go", "alpha"]);
    }

    #[test]
    fn test_top_terms_skips_stopwords() {
        let terms = top_terms("the the the rust", 5);
        assert_eq!(terms, vec!["rust"]);
    }

    #[test]
    fn test_match_mode_parse() {
        assert_eq!(MatchMode::parse("WORD"), Some(MatchMode::WordBoundary));
        assert_eq!(MatchMode::parse("substring"), Some(MatchMode::Substring));
        assert_eq!(MatchMode::parse("regex"), None);
    }
}
