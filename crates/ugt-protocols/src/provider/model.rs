//! Model-dependent request parameters.

/// Sampling temperature sent when the model accepts one.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Models that reject an explicit temperature.
pub const NO_TEMPERATURE_MODELS: &[&str] = &[
    "o3",
    "o4-mini",
    "gemini-1.5-pro",
    "gemini-1.5-flash",
    "gemini-2.0-flash",
    "gemini-2.5-pro",
    "gemini-2.5-flash",
    "gemini-2.5-pro-preview-05-06",
];

/// Temperature to send for `model`, or `None` to omit the field.
pub fn temperature_for(model: &str) -> Option<f32> {
    if NO_TEMPERATURE_MODELS.contains(&model) {
        None
    } else {
        Some(DEFAULT_TEMPERATURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_omitted_for_reasoning_models() {
        assert_eq!(temperature_for("o3"), None);
        assert_eq!(temperature_for("gemini-2.5-flash"), None);
    }

    #[test]
    fn test_temperature_default() {
        assert_eq!(temperature_for("gpt-4o"), Some(0.1));
        assert_eq!(temperature_for("claude-3-opus-latest"), Some(0.1));
    }
}
