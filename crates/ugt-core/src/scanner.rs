//! Explicit scanner for `<prefix_id>content</prefix_id>` spans.
//!
//! Every decision depends only on bytes already in the buffer, so the spans
//! found do not change with where the stream was split.

use std::ops::Range;

/// How to treat a span whose end has not arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Stop at the first incomplete span and wait for more input.
    Streaming,
    /// The stream is over: skip unclosed opening tags.
    Final,
}

/// One complete span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch {
    /// Full tag name, prefix included.
    pub name: String,
    pub start: usize,
    pub content: Range<usize>,
    /// Byte offset just past the closing tag.
    pub end: usize,
}

enum NameEnd {
    Found(usize),
    Invalid,
    Incomplete,
}

#[derive(Debug, Clone)]
pub struct TagScanner {
    prefix: String,
    opener: String,
}

impl TagScanner {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let opener = format!("<{}", prefix);
        Self { prefix, opener }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Find complete spans in buffer order. Closing tags match
    /// non-greedily: the first `</name>` after the opening tag ends the span.
    pub fn scan(&self, buffer: &str, mode: ScanMode) -> Vec<TagMatch> {
        let mut matches = Vec::new();
        let mut pos = 0;

        while let Some(rel) = buffer[pos..].find(&self.opener) {
            let start = pos + rel;
            let name_start = start + 1;

            let gt = match self.name_end(buffer, start + self.opener.len()) {
                NameEnd::Found(gt) => gt,
                NameEnd::Invalid => {
                    pos = start + 1;
                    continue;
                }
                NameEnd::Incomplete => match mode {
                    ScanMode::Streaming => break,
                    ScanMode::Final => {
                        pos = start + 1;
                        continue;
                    }
                },
            };

            let name = &buffer[name_start..gt];
            let content_start = gt + 1;
            let close = format!("</{}>", name);

            match buffer[content_start..].find(&close) {
                Some(rel_close) => {
                    let content_end = content_start + rel_close;
                    let end = content_end + close.len();
                    matches.push(TagMatch {
                        name: name.to_string(),
                        start,
                        content: content_start..content_end,
                        end,
                    });
                    pos = end;
                }
                None => match mode {
                    ScanMode::Streaming => break,
                    ScanMode::Final => pos = content_start,
                },
            }
        }

        matches
    }

    /// Content of `m`, keeping only what follows the last repeat of its own
    /// opening tag (a model restarting a growing span).
    pub fn effective_content<'a>(&self, buffer: &'a str, m: &TagMatch) -> &'a str {
        let content = &buffer[m.content.clone()];
        let reopen = format!("<{}>", m.name);
        match content.rfind(&reopen) {
            Some(index) => &content[index + reopen.len()..],
            None => content,
        }
    }

    /// Whether `text` holds a complete opening tag.
    pub fn has_opening_tag(&self, text: &str) -> bool {
        self.opening_tags(text).next().is_some()
    }

    /// `text` with every complete opening tag removed.
    pub fn strip_opening_tags(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut pos = 0;
        for (start, gt) in self.opening_tags(text) {
            out.push_str(&text[pos..start]);
            pos = gt + 1;
        }
        out.push_str(&text[pos..]);
        out
    }

    /// `(start, gt)` of each complete opening tag in `text`.
    fn opening_tags<'a>(&'a self, text: &'a str) -> impl Iterator<Item = (usize, usize)> + 'a {
        let mut pos = 0;
        std::iter::from_fn(move || {
            while let Some(rel) = text[pos..].find(&self.opener) {
                let start = pos + rel;
                match self.name_end(text, start + self.opener.len()) {
                    NameEnd::Found(gt) => {
                        pos = gt + 1;
                        return Some((start, gt));
                    }
                    _ => pos = start + 1,
                }
            }
            None
        })
    }

    /// Locate the `>` ending a tag name whose id starts at `from`.
    fn name_end(&self, buffer: &str, from: usize) -> NameEnd {
        for (offset, c) in buffer[from..].char_indices() {
            match c {
                '>' if offset == 0 => return NameEnd::Invalid,
                '>' => return NameEnd::Found(from + offset),
                '<' | '/' => return NameEnd::Invalid,
                c if c.is_whitespace() => return NameEnd::Invalid,
                _ => {}
            }
        }
        NameEnd::Incomplete
    }
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
