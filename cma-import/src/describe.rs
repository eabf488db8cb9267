//! Description repair and semantic-duplicate detection
//!
//! The activity descriptions are free text hand-pasted between spreadsheet
//! revisions, which leaves two kinds of damage: a single description with
//! repeated tag lines ("适合人群: …" appearing twice), and two records whose
//! descriptions differ only in punctuation or token order.
//!
//! Repair normalizes each description to one canonical rendering; two
//! descriptions are treated as the same content when their normalized
//! fingerprints match (punctuation-insensitive, order-insensitive token
//! comparison). The fingerprint policy is deliberately coarse: it compares
//! whitespace-delimited tokens after punctuation stripping, not semantics.

use cma_common::ActivityItem;
use std::collections::HashMap;

/// Canonical rendering of one description:
/// - `!`/`！`/`;`/`；` unified to `。`
/// - repeated tag lines dropped, first occurrence kept
/// - runs of blank lines collapsed to a single blank line
/// - trailing whitespace stripped per line, whole text trimmed
pub fn repair_description(description: &str) -> String {
    let unified: String = description
        .chars()
        .map(|c| match c {
            '!' | '！' | ';' | '；' => '。',
            other => other,
        })
        .collect();

    let mut seen_tags: Vec<String> = Vec::new();
    let mut out_lines: Vec<&str> = Vec::new();
    for line in unified.lines() {
        let line = line.trim_end();
        if let Some(tag) = tag_key(line) {
            if seen_tags.contains(&tag) {
                continue;
            }
            seen_tags.push(tag);
        }
        out_lines.push(line);
    }

    // Collapse blank-line runs to a single separator
    let mut collapsed: Vec<&str> = Vec::with_capacity(out_lines.len());
    let mut blank_run = 0usize;
    for line in out_lines {
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        collapsed.push(line);
    }

    collapsed.join("\n").trim().to_string()
}

/// Tag key of a labeled line like `👥 适合人群：家庭`, if it is one.
/// A tag is a short run of word characters directly before the first colon.
fn tag_key(line: &str) -> Option<String> {
    let stripped = line.trim_start_matches(|c: char| !c.is_alphanumeric());
    let colon = stripped.find(['：', ':'])?;
    let prefix = &stripped[..colon];
    let char_count = prefix.chars().count();
    if char_count == 0 || char_count > 12 {
        return None;
    }
    if !prefix.chars().all(|c| c.is_alphanumeric()) {
        return None;
    }
    Some(prefix.to_string())
}

/// Content fingerprint: lowercase, punctuation replaced by spaces, tokens
/// sorted. Two descriptions with equal fingerprints differ only in
/// punctuation, whitespace, or token order.
pub fn description_fingerprint(description: &str) -> String {
    let cleaned: String = description
        .chars()
        .map(|c| {
            if is_punctuation(c) {
                ' '
            } else {
                c
            }
        })
        .collect::<String>()
        .to_lowercase();

    let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '。' | '，'
                | '、'
                | '：'
                | '；'
                | '！'
                | '？'
                | '（'
                | '）'
                | '《'
                | '》'
                | '【'
                | '】'
                | '“'
                | '”'
                | '‘'
                | '’'
                | '…'
                | '—'
                | '·'
        )
}

/// Repair every description in place and collapse semantic duplicates
/// across records onto the first record's canonical rendering. Returns the
/// number of records whose description changed. Idempotent.
pub fn repair_descriptions(items: &mut [ActivityItem]) -> usize {
    let mut canonical: HashMap<String, String> = HashMap::new();
    let mut changed = 0usize;

    for item in items.iter_mut() {
        let Some(original) = item.description.clone() else {
            continue;
        };
        let repaired = repair_description(&original);
        let fingerprint = description_fingerprint(&repaired);

        let rendering = canonical
            .entry(fingerprint)
            .or_insert_with(|| repaired.clone())
            .clone();

        if rendering != original {
            tracing::debug!(
                id = %item.id,
                before = original.chars().count(),
                after = rendering.chars().count(),
                "Description repaired"
            );
            changed += 1;
        }
        item.description = Some(rendering);
    }

    changed
}
