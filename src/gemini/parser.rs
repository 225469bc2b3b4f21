use super::types::HealthAdvice;
use super::AdviceError;

/// Parse the model's text output into `HealthAdvice`.
///
/// The request asks for `application/json`, but models still sometimes wrap
/// the object in a ```json fence or lead with prose, so both bare and fenced
/// JSON are accepted.
pub fn parse_advice_response(response: &str) -> Result<HealthAdvice, AdviceError> {
    let json_str = extract_json(response)?;

    let advice: HealthAdvice = serde_json::from_str(json_str)
        .map_err(|e| AdviceError::ResponseParsing(e.to_string()))?;

    if advice.summary.trim().is_empty() {
        return Err(AdviceError::MalformedResponse("Empty summary".into()));
    }

    Ok(advice)
}

/// Locate the JSON object in the model output.
fn extract_json(response: &str) -> Result<&str, AdviceError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(AdviceError::MalformedResponse("Empty response".into()));
    }

    if let Some(fence_start) = trimmed.find("```json") {
        let content_start = fence_start + 7;
        let fence_end = trimmed[content_start..]
            .find("```")
            .ok_or_else(|| AdviceError::MalformedResponse("Unclosed JSON fence".into()))?;
        return Ok(trimmed[content_start..content_start + fence_end].trim());
    }

    // Bare JSON: take the outermost object, tolerating stray prose around it.
    let start = trimmed
        .find('{')
        .ok_or_else(|| AdviceError::MalformedResponse("No JSON object found".into()))?;
    let end = trimmed
        .rfind('}')
        .ok_or_else(|| AdviceError::MalformedResponse("No JSON object found".into()))?;
    if end < start {
        return Err(AdviceError::MalformedResponse("No JSON object found".into()));
    }

    Ok(&trimmed[start..=end])
}
