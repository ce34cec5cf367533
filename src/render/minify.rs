//! Best-effort HTML minification.
//!
//! Strips comments and collapses whitespace. Whitespace between two tags is
//! dropped when either side is a block-level element (it never renders there)
//! and becomes a single space otherwise, so inline elements keep their gap.
//! Inside tags, quoted attribute values are copied verbatim. Bodies of `pre`,
//! `textarea`, `script` and `style` are copied verbatim too.

use crate::render::RenderError;

const RAW_TAGS: [&str; 4] = ["pre", "textarea", "script", "style"];

/// Elements whose surrounding whitespace does not render.
const BLOCK_TAGS: &[&str] = &[
    "!doctype", "address", "article", "aside", "blockquote", "body", "br", "dd", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "head", "header", "hr", "html", "li", "link", "main", "meta", "nav", "noscript", "ol",
    "p", "pre", "script", "section", "style", "table", "tbody", "td", "tfoot", "th", "thead",
    "title", "tr", "ul",
];

/// Minify an HTML document.
pub fn minify_html(input: &str) -> Result<String, RenderError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    // Lowercased name of the last tag written.
    let mut last_tag = String::new();

    while let Some(ch) = rest.chars().next() {
        if rest.starts_with("<!--") {
            let end = rest[4..]
                .find("-->")
                .ok_or_else(|| RenderError::Minify("unterminated HTML comment".into()))?;
            rest = &rest[4 + end + 3..];
            continue;
        }

        if starts_tag(rest) {
            if let Some(tag) = raw_tag(rest) {
                let len = raw_block_len(rest, tag);
                out.push_str(&rest[..len]);
                last_tag = tag.to_string();
                rest = &rest[len..];
                continue;
            }

            let len = tag_len(rest);
            push_tag(&mut out, &rest[..len]);
            last_tag = tag_name(rest);
            rest = &rest[len..];
            continue;
        }

        if ch.is_whitespace() {
            let trimmed = rest.trim_start();
            let between_tags = out.ends_with('>') && starts_tag(trimmed);
            let invisible = between_tags && (is_block(&last_tag) || is_block(&tag_name(trimmed)));

            if !invisible && !out.is_empty() && !trimmed.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            rest = trimmed;
            continue;
        }

        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    Ok(out)
}

/// `input` opens a tag (`<a`, `</a`, `<!`), not a stray `<` in text.
fn starts_tag(input: &str) -> bool {
    let mut chars = input.chars();
    chars.next() == Some('<')
        && chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!')
}

/// Lowercased element name of the tag `input` opens with, `/` stripped.
fn tag_name(input: &str) -> String {
    input
        .trim_start_matches('<')
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '!')
        .collect::<String>()
        .to_ascii_lowercase()
}

fn is_block(name: &str) -> bool {
    BLOCK_TAGS.contains(&name)
}

/// Byte length of the tag at the start of `input`, up to and including the
/// `>` that is not inside a quoted attribute value.
fn tag_len(input: &str) -> usize {
    let mut quote = None;

    for (i, c) in input.char_indices().skip(1) {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, '>') => return i + 1,
            _ => {}
        }
    }
    input.len()
}

/// Append a tag, collapsing whitespace between attributes only.
fn push_tag(out: &mut String, tag: &str) {
    let mut quote = None;
    let mut pending_space = false;

    for c in tag.chars() {
        if quote.is_none() && c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            if c != '>' {
                out.push(' ');
            }
            pending_space = false;
        }
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            _ => {}
        }
        out.push(c);
    }
}

/// The raw-text tag `input` opens with, if any.
fn raw_tag(input: &str) -> Option<&'static str> {
    let after = &input[1..];
    let name_len = after
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after.len());
    let name = &after[..name_len];

    RAW_TAGS
        .iter()
        .copied()
        .find(|tag| tag.eq_ignore_ascii_case(name))
}

/// Byte length of a raw-text element, up to and including its closing tag.
fn raw_block_len(input: &str, tag: &str) -> usize {
    // ASCII lowercasing keeps byte offsets intact.
    let lower = input.to_ascii_lowercase();
    let closing = format!("</{}", tag);

    match lower[1..].find(&closing) {
        Some(start) => {
            let start = start + 1;
            match lower[start..].find('>') {
                Some(end) => start + end + 1,
                None => input.len(),
            }
        }
        None => input.len(),
    }
}
