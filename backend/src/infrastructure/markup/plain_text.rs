/// Plain-text projection of rich-text markup
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Flattens HTML-like markup to the text a browser would report as `textContent`
///
/// Entities cover numeric references plus the named ones rich-text editors
/// commonly emit (punctuation, quotes, spaces, currency, a few symbols).
/// Any other named entity is left as literal text.
#[derive(Debug)]
pub struct MarkupStripper {
    comment_regex: Regex,
    raw_text_regex: Regex,
    tag_regex: Regex,
    entity_regex: Regex,
}

impl MarkupStripper {
    pub fn new() -> Self {
        MarkupStripper {
            comment_regex: Regex::new(r"(?s)<!--.*?-->").unwrap(),
            // Elements whose bodies never show up as text
            raw_text_regex: Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>")
                .unwrap(),
            // A tag starts with a letter, '/', or '!' right after '<'
            tag_regex: Regex::new(r"</?[A-Za-z!][^>]*>").unwrap(),
            entity_regex: Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9A-Fa-f]{1,6}|[A-Za-z]+);").unwrap(),
        }
    }

    /// Get a singleton instance (for efficiency in bulk export)
    pub fn instance() -> &'static Self {
        static INSTANCE: OnceLock<MarkupStripper> = OnceLock::new();
        INSTANCE.get_or_init(MarkupStripper::new)
    }

    /// Remove every tag and decode character entities
    pub fn strip(&self, markup: &str) -> String {
        let text = self.comment_regex.replace_all(markup, "");
        let text = self.raw_text_regex.replace_all(&text, "");
        let text = self.tag_regex.replace_all(&text, "");
        self.entity_regex
            .replace_all(&text, |caps: &Captures<'_>| {
                decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

impl Default for MarkupStripper {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_entity(entity: &str) -> Option<String> {
    let decoded = match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ensp" => '\u{2002}',
        "emsp" => '\u{2003}',
        "thinsp" => '\u{2009}',
        "shy" => '\u{ad}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "hellip" => '\u{2026}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "laquo" => '\u{ab}',
        "raquo" => '\u{bb}',
        "bull" => '\u{2022}',
        "middot" => '\u{b7}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        "deg" => '\u{b0}',
        "times" => '\u{d7}',
        "divide" => '\u{f7}',
        "sect" => '\u{a7}',
        "para" => '\u{b6}',
        "cent" => '\u{a2}',
        "pound" => '\u{a3}',
        "yen" => '\u{a5}',
        "euro" => '\u{20ac}',
        "iexcl" => '\u{a1}',
        "iquest" => '\u{bf}',
        _ => {
            let numeric = entity.strip_prefix('#')?;
            let hex = numeric.strip_prefix('x').or_else(|| numeric.strip_prefix('X'));
            let code = match hex {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse().ok()?,
            };
            char::from_u32(code)?
        }
    };
    Some(decoded.to_string())
}

/// Shorthand for `MarkupStripper::instance().strip(markup)`
pub fn strip_markup(markup: &str) -> String {
    MarkupStripper::instance().strip(markup)
}
