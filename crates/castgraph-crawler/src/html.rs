//! HTML paragraph extraction
//!
//! Reduces a fetched page to plain paragraph text, paragraphs separated
//! by blank lines. Wiki pages contribute the first paragraphs of their
//! relationships section; other pages contribute every paragraph of the
//! main article. Documents without markup pass through unchanged.

use once_cell::sync::OnceCell;
use regex::{Captures, Regex};

use castgraph_core::{CastError, Result};

use crate::SourceKind;

/// Paragraphs read from a wiki relationships section
pub const WIKI_SECTION_PARAGRAPHS: usize = 5;

/// Section anchors tried in order on wiki pages
const WIKI_SECTION_IDS: &[&str] = &["Relationships", "Personality_and_relationships"];

static SHARED: OnceCell<HtmlExtractor> = OnceCell::new();

/// Compiled patterns for paragraph extraction
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    markup: Regex,
    paragraph: Regex,
    article: Regex,
    entry_content: Regex,
    heading: Regex,
    noise: Regex,
    tag: Regex,
    entity: Regex,
    whitespace: Regex,
}

impl HtmlExtractor {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| Regex::new(pattern).map_err(anyhow::Error::from);

        Ok(Self {
            markup: compile(r"(?i)<(?:html|body|p|article|div)[\s>]")?,
            paragraph: compile(r"(?is)<p(?:\s[^>]*)?>(.*?)</p\s*>")?,
            article: compile(r"(?is)<article(?:\s[^>]*)?>(.*?)</article\s*>")?,
            entry_content: compile(r#"(?i)<div[^>]*class\s*=\s*["'][^"']*\bentry-content\b"#)?,
            heading: compile(r"(?i)<h2[\s>]")?,
            noise: compile(r"(?is)<script[^>]*>.*?</script\s*>|<style[^>]*>.*?</style\s*>")?,
            tag: compile(r"(?s)<[^>]*>")?,
            entity: compile(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);")?,
            whitespace: compile(r"\s+")?,
        })
    }

    /// Process-wide instance, compiled on first use
    pub fn shared() -> Result<&'static Self> {
        SHARED.get_or_try_init(Self::new)
    }

    /// Whether `body` is HTML rather than plain text
    pub fn is_markup(&self, body: &str) -> bool {
        self.markup.is_match(body)
    }

    /// Plain text of `body`, paragraphs separated by blank lines
    ///
    /// Fails with `SourceUnavailable` when no text survives extraction.
    pub fn document_text(&self, source_id: &str, body: &str) -> Result<String> {
        let text = if self.is_markup(body) {
            self.paragraphs(SourceKind::classify(source_id), body)
                .join("\n\n")
        } else {
            body.to_string()
        };

        if text.trim().is_empty() {
            return Err(CastError::SourceUnavailable {
                source_id: source_id.to_string(),
                reason: "No paragraph content".to_string(),
            });
        }
        Ok(text)
    }

    /// Paragraph texts of an HTML page
    pub fn paragraphs(&self, kind: SourceKind, html: &str) -> Vec<String> {
        let html = self.noise.replace_all(html, " ");

        if kind == SourceKind::Wiki {
            if let Some(section) = self.wiki_section(&html) {
                let paragraphs: Vec<String> = self
                    .paragraph_texts(section)
                    .take(WIKI_SECTION_PARAGRAPHS)
                    .collect();
                if !paragraphs.is_empty() {
                    return paragraphs;
                }
            }
            tracing::debug!("No relationships section, reading article paragraphs");
        }

        self.paragraph_texts(self.article_body(&html)).collect()
    }

    /// Markup between the relationships anchor and the next `<h2>`
    fn wiki_section<'a>(&self, html: &'a str) -> Option<&'a str> {
        let start = WIKI_SECTION_IDS.iter().find_map(|id| {
            html.find(&format!("id=\"{id}\""))
                .or_else(|| html.find(&format!("id='{id}'")))
        })?;

        let rest = &html[start..];
        // Skip the closing tags of the heading the anchor sits in
        let body_start = self.heading_end(rest);
        let rest = &rest[body_start..];
        let end = self.heading.find(rest).map_or(rest.len(), |m| m.start());
        Some(&rest[..end])
    }

    /// Offset just past the closing tag of the heading holding the anchor
    fn heading_end(&self, rest: &str) -> usize {
        let lower = rest.to_ascii_lowercase();
        [lower.find("</h2"), lower.find("</h3")]
            .into_iter()
            .flatten()
            .min()
            .map_or(0, |pos| pos + 4)
    }

    /// `<article>` content, else the entry-content block, else the whole page
    fn article_body<'a>(&self, html: &'a str) -> &'a str {
        if let Some(caps) = self.article.captures(html) {
            if let Some(body) = caps.get(1) {
                return body.as_str();
            }
        }
        if let Some(m) = self.entry_content.find(html) {
            return &html[m.start()..];
        }
        html
    }

    fn paragraph_texts<'a>(&'a self, html: &'a str) -> impl Iterator<Item = String> + 'a {
        self.paragraph
            .captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .map(|inner| self.plain_text(inner.as_str()))
            .filter(|text| !text.is_empty())
    }

    /// Strip tags, decode entities and collapse whitespace
    pub fn plain_text(&self, fragment: &str) -> String {
        let stripped = self.tag.replace_all(fragment, " ");
        let decoded = self.entity.replace_all(&stripped, |caps: &Captures| {
            decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        });
        self.whitespace.replace_all(&decoded, " ").trim().to_string()
    }
}

fn decode_entity(name: &str) -> Option<String> {
    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "rsquo" | "lsquo" => '\'',
        "rdquo" | "ldquo" => '"',
        "ndash" | "mdash" => '-',
        "hellip" => return Some("...".to_string()),
        _ => {
            let hex = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X"));
            let code = if let Some(hex) = hex {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)?
        }
    };
    Some(decoded.to_string())
}
