//! Text segmentation
//!
//! Splits document text into sentence-sized text units. Paragraphs are
//! separated by blank lines; the lines inside a paragraph are joined with
//! a space, so hard-wrapped prose keeps its sentences intact. Paragraphs
//! are split on terminal punctuation followed by whitespace.

use castgraph_core::TextUnit;

/// Abbreviations whose trailing period does not end a sentence
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "det", "st", "sr", "jr", "vs", "capt", "sgt", "lt", "prof",
];

const CLOSERS: &[char] = &['"', '\'', ')', ']', '\u{201D}', '\u{2019}'];

/// Split a document into text units tagged with `source_id`
pub fn text_units(document: &str, source_id: &str) -> Vec<TextUnit> {
    paragraphs(document)
        .iter()
        .flat_map(|paragraph| split_sentences(paragraph))
        .map(|sentence| TextUnit::new(sentence, source_id))
        .collect()
}

/// Blank-line separated paragraphs, each folded onto one line
pub fn paragraphs(document: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in document.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join(" "));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs
}

/// Split a paragraph into sentences
pub fn split_sentences(paragraph: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = paragraph.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i].1;
        if !matches!(c, '.' | '!' | '?') {
            i += 1;
            continue;
        }

        // Absorb runs like "?!" or '."'
        let mut j = i + 1;
        while j < chars.len()
            && (matches!(chars[j].1, '.' | '!' | '?') || CLOSERS.contains(&chars[j].1))
        {
            j += 1;
        }

        let at_boundary = j == chars.len() || chars[j].1.is_whitespace();
        let abbreviated = c == '.' && ends_with_abbreviation(&paragraph[start..chars[i].0]);

        if at_boundary && !abbreviated {
            let end = chars.get(j).map(|(offset, _)| *offset).unwrap_or(paragraph.len());
            push_sentence(&mut sentences, &paragraph[start..end]);
            start = end;
        }
        i = j;
    }

    push_sentence(&mut sentences, &paragraph[start..]);
    sentences
}

fn ends_with_abbreviation(fragment: &str) -> bool {
    let last_word = fragment
        .split_whitespace()
        .last()
        .unwrap_or("")
        .trim_start_matches(|c: char| !c.is_alphanumeric());
    ABBREVIATIONS.contains(&last_word.to_lowercase().as_str())
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let sentence = raw.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
}
