//! Prompt construction.

use ugt_protocols::{ProviderKind, Segment, TranslationSettings};

/// Built-in prompt shared by every provider.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "You are a translation engine. The input text contains segments, each wrapped in XML-like tags with a unique ID, like `<ugt_some_id>Text to translate</ugt_some_id>`.\nTranslate the text content within each tag to {{target}}.\nYour output MUST consist ONLY of the translated segments, each wrapped in the EXACT SAME XML-like tags as the input.\nFor example, if the input is `<ugt_abc>Hello</ugt_abc>` and the target language is Spanish, the output must be `<ugt_abc>Hola</ugt_abc>`.\nIf there are multiple input segments, provide a corresponding translated segment for each, preserving their order and tags.\nDo not add any other text, explanations, or formatting outside of these tags.\n\nInput Text:\n{{text}}";

pub const TEXT_PLACEHOLDER: &str = "text";
pub const TARGET_PLACEHOLDER: &str = "target";
pub const INSTRUCTION_PLACEHOLDER: &str = "instruction";

pub fn default_template(provider: ProviderKind) -> &'static str {
    match provider {
        ProviderKind::OpenAi | ProviderKind::Anthropic | ProviderKind::Gemini => {
            DEFAULT_PROMPT_TEMPLATE
        }
    }
}

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: String,
}

impl PromptBuilder {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The configured template, or the provider default when unset or blank.
    pub fn for_settings(settings: &TranslationSettings) -> Self {
        match settings.prompt_template.as_deref() {
            Some(template) if !template.trim().is_empty() => Self::new(template),
            _ => Self::new(default_template(settings.provider)),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn build(&self, segments: &[Segment], target: &str, instruction: Option<&str>) -> String {
        let text = render_segments(segments);
        substitute(
            &self.template,
            &[
                (TEXT_PLACEHOLDER, text.as_str()),
                (TARGET_PLACEHOLDER, target),
                (INSTRUCTION_PLACEHOLDER, instruction.unwrap_or_default()),
            ],
        )
    }
}

/// One `<ugt_{id}>text</ugt_{id}>` line per segment.
pub fn render_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| {
            let tag = segment.id.tag_name();
            format!("<{}>{}</{}>", tag, segment.original_text.trim(), tag)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace every `{{name}}` in one left-to-right pass. Inserted values are
/// never rescanned; unknown names are kept verbatim.
pub fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find("{{") {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 2..];
        let hit = vars.iter().find(|(name, _)| {
            tail.strip_prefix(*name)
                .is_some_and(|after| after.starts_with("}}"))
        });
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &rest[pos + 1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
