use std::sync::LazyLock;

use fencer_core::{
    normalize_weapon, parse_strength_range, parse_strength_value, BoutKind, StrengthReport,
    StrengthValue,
};
use regex::Regex;
use serde_json::Value;

use super::dom::Dom;
use super::object_literal;

static SERIES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bseries\s*=\s*\{").expect("valid regex"));

const SUMMARY_ROWS_SELECTOR: &str = "table.table-striped tbody tr";

/// Extracts per-weapon DE/pool ratings from the summary table and the chart
/// series embedded in the page script.
///
/// Rows with fewer than four cells are skipped. A later row for the same
/// weapon and bout kind replaces an earlier one.
pub fn parse_strength<D: Dom>(dom: &D) -> StrengthReport {
    let mut report = StrengthReport::default();

    for row in dom.select_all(SUMMARY_ROWS_SELECTOR) {
        let cells: Vec<String> = dom
            .select_within(row, "td")
            .into_iter()
            .map(|cell| dom.text(cell))
            .collect();
        let [weapon, kind, value, range, ..] = cells.as_slice() else {
            continue;
        };

        report
            .weapons
            .entry(normalize_weapon(weapon))
            .or_default()
            .set(
                BoutKind::from_label(kind),
                StrengthValue {
                    value: parse_strength_value(value),
                    range: parse_strength_range(range),
                },
            );
    }

    if report.weapons.is_empty() {
        tracing::debug!("no strength rows found");
    }
    report.series = extract_series(dom.source());
    report
}

/// Finds the `series = { ... }` assignment in `html` and parses the object,
/// as strict JSON first and as a JavaScript literal second.
pub fn extract_series(html: &str) -> Option<Value> {
    let found = SERIES_RE.find(html)?;
    // The match ends just past the opening brace.
    let literal = balanced_object(&html[found.end() - 1..])?;

    if let Ok(value) = serde_json::from_str(literal) {
        return Some(value);
    }
    match object_literal::parse(literal) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse embedded series data");
            None
        }
    }
}

/// The prefix of `text` (which starts with `{`) up to its matching `}`.
/// Braces inside quoted strings are ignored.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' | '`' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
