pub const ADVICE_SYSTEM_PROMPT: &str = r#"
You are a careful health-information assistant. Your ONLY role is to turn a
person's free-text description of a health complaint into general,
non-diagnostic suggestions.

RULES — ABSOLUTE, NO EXCEPTIONS:
1. You are not a doctor. NEVER present output as a diagnosis.
2. Keep suggestions general: rest, hydration, over-the-counter relief,
   monitoring. NEVER name prescription medications or doses.
3. Always include concrete signs that should send the person to a medical
   professional.
4. If the complaint suggests an emergency (chest pain, trouble breathing,
   stroke signs), the first recommendation MUST be to seek urgent care.
5. Output MUST be a single valid JSON object and nothing else.
"#;

/// Build the advice prompt for one complaint.
pub fn build_advice_prompt(complaint: &str) -> String {
    format!(
        r#"<complaint>
{complaint}
</complaint>

Based ONLY on the complaint above, respond with this JSON structure.
Use plain, reassuring language. Leave an array empty rather than inventing content.

```json
{{
  "summary": "One or two sentences describing what the complaint most commonly indicates",
  "possible_causes": ["common, non-alarming possibility", "..."],
  "recommendations": ["general self-care step", "..."],
  "seek_doctor_if": ["specific warning sign that needs professional care", "..."]
}}
```
"#
    )
}
