// LLM prompt constants for the matching module.

/// System prompt for JD requirement extraction. The user message is the redacted JD.
pub const JD_EXTRACT_SYSTEM: &str = "You extract only job-related requirements. \
    Ignore demographics or personal details. \
    If a field is missing, return empty arrays or 0. \
    Return only JSON that matches the schema.";

/// System prompt for per-resume analysis.
pub const RESUME_ANALYSIS_SYSTEM: &str = "You evaluate a resume against job requirements. \
    Focus only on job-relevant skills and experience. \
    Ignore names, demographics, and personal details. \
    Return only JSON that matches the schema.";

/// Resume analysis user message. Both parts are inserted verbatim in one pass.
pub fn resume_analysis_prompt(jd_json: &str, resume_text: &str) -> String {
    format!("Job requirements JSON:\n{jd_json}\n\nResume:\n{resume_text}")
}
