// Prompt templates for the continuous interview.

/// Characters of resume text sent with the opening question.
pub const START_RESUME_LIMIT: usize = 2_000;
/// Characters of resume text sent with follow-up questions and feedback.
pub const FOLLOW_UP_RESUME_LIMIT: usize = 1_000;

/// Replace `{resume}` before sending.
pub const START_PROMPT: &str = "You are an expert interviewer. \
Start a continuous interview based on this resume.
Ask the FIRST question to break the ice or ask about their introduction.
Keep it professional but welcoming.
RESUME: {resume}

Return ONLY the question text.";

/// Replace `{resume}` and `{conversation}` before sending.
pub const NEXT_QUESTION_PROMPT: &str = "You are an expert interviewer \
conducting a technical and behavioral interview.
Current Context:
RESUME: {resume}

Recent Conversation:
{conversation}

Generate the NEXT question. Dig deeper if the previous answer was vague, \
or move to a new relevant topic (Technical, Situational, Soft Skills).
Keep the question concise and clear.
Return ONLY the question text.";

/// Replace `{resume}`, `{transcript}` and `{json_only}` before sending.
pub const FEEDBACK_PROMPT: &str = r#"Evaluate this interview performance.
RESUME: {resume}
TRANSCRIPT:
{transcript}

Return ONLY a JSON object with this EXACT structure:
{
    "ats_score": <integer 0-100 based on keyword match and answer quality>,
    "recommended_roles": [<list of 3 suitable job titles>],
    "key_improvements": [<list of 3 specific actionable tips to improve>],
    "summary": "<Short paragraph summarizing the candidate's performance>"
}
{json_only}"#;
