//! Inter-segment spacing for languages written with spaces.

/// Languages written without spaces between words.
pub const DEFAULT_NO_SPACE_LANGUAGES: &[&str] = &[
    "ja", "japanese", "zh", "chinese", "ko", "korean", "th", "thai", "vi", "vietnamese",
];

/// A leading space is never added before these.
pub const NO_SPACE_BEFORE: &[char] = &[
    '.', ',', ';', ':', '?', '!', ')', ']', '}', '\u{201D}', '\u{2019}', '"', '\'', '%', '>',
];

/// A space is never added after these.
pub const NO_SPACE_AFTER: &[char] = &['(', '[', '{', '\u{201C}', '\u{2018}', '"', '\'', '<'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpacingPolicy {
    insert_spaces: bool,
}

impl SpacingPolicy {
    pub fn enabled() -> Self {
        Self { insert_spaces: true }
    }

    pub fn disabled() -> Self {
        Self {
            insert_spaces: false,
        }
    }

    /// Spaces are repaired unless `target` names a no-space language.
    pub fn for_language(target: &str, no_space_languages: &[String]) -> Self {
        if is_no_space_language(target, no_space_languages) {
            Self::disabled()
        } else {
            Self::enabled()
        }
    }

    pub fn inserts_spaces(&self) -> bool {
        self.insert_spaces
    }

    /// `next`, with a single leading space when it continues `previous`
    /// without one.
    pub fn join(&self, previous: Option<&str>, next: &str) -> String {
        if self.insert_spaces && needs_space(previous.unwrap_or_default(), next) {
            format!(" {}", next)
        } else {
            next.to_string()
        }
    }
}

fn needs_space(previous: &str, next: &str) -> bool {
    let (Some(last), Some(first)) = (previous.chars().last(), next.chars().next()) else {
        return false;
    };
    !last.is_whitespace()
        && !first.is_whitespace()
        && !NO_SPACE_BEFORE.contains(&first)
        && !NO_SPACE_AFTER.contains(&last)
}

/// Matches whole alphabetic tokens, so `zh-CN` and `Chinese (Simplified)`
/// both match while `Gothic` does not match `th`.
pub fn is_no_space_language(target: &str, no_space_languages: &[String]) -> bool {
    target
        .to_lowercase()
        .split(|c: char| !c.is_alphabetic())
        .filter(|token| !token.is_empty())
        .any(|token| {
            no_space_languages
                .iter()
                .any(|lang| lang.eq_ignore_ascii_case(token))
        })
}

#[cfg(test)]
#[path = "spacing_tests.rs"]
mod tests;
