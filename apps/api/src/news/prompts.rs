// Prompt for the trending tech news feed. Replace `{json_only}` before sending.

pub const TRENDING_NEWS_PROMPT: &str = r#"Generate 3 distinct, realistic, trending tech news headlines for today.
Focus on: 1. AI Innovation, 2. Web Technologies, 3. Cybersecurity.
Return ONLY a JSON list of objects with keys: "title", "source", "date" (e.g. '2 hrs ago'), "url" (make up a realistic looking url), "summary" (1 short sentence).
Example: [{"title": "New AI Model Released", "source": "TechCrunch", "date": "1 hr ago", "url": "https://techcrunch.com/ai-model", "summary": "Faster model..."}]
{json_only}"#;
