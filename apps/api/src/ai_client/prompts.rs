// Prompt constants for the CV analysis call. The scoring adapter owns the
// response schema; these strings must stay in sync with `scoring::analysis`.

/// System prompt that enforces JSON-only output from the analysis call.
pub const CV_ANALYSIS_SYSTEM: &str = "You are an experienced technical recruiter. \
    You evaluate a candidate's CV against a job's requirements. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Template for the analysis request. Placeholders: {job_title},
/// {job_description}, {required_skills}, {experience_level}, {education},
/// {cv_text}, {custom_answers}.
pub const CV_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Evaluate this candidate for the role below.

## Role
Title: {job_title}
Description: {job_description}
Required skills: {required_skills}
Experience level: {experience_level}
Education: {education}

## Candidate CV
{cv_text}

## Candidate form answers
{custom_answers}

Return a JSON object with exactly this shape:
{
  "skillsMatch": {"score": 0-100, "matchedSkills": ["..."], "missingSkills": ["..."]},
  "experienceMatch": {"score": 0-100, "yearsRelevant": <int>, "relevance": "high"|"medium"|"low"},
  "educationMatch": {"score": 0-100, "level": "...", "relevant": true|false},
  "overallFit": {"score": 0-100, "confidence": 0-1, "recommendation": "strong"|"moderate"|"weak"},
  "insights": {"strengths": ["..."], "concerns": ["..."], "summary": "..."}
}"#;
