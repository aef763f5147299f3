use std::sync::LazyLock;

use fencer_core::HistoryReport;
use regex::Regex;

use super::dom::Dom;

static DE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bde\b").expect("valid regex"));

const WIN_MARKERS: &[&str] = &["victo", "wins"];
const LOSS_MARKERS: &[&str] = &["loss", "defeat"];

/// Lowercase ASCII letters only: `"All Time"` -> `"alltime"`.
fn letters_only(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(char::is_ascii_lowercase)
        .collect()
}

fn has_marker(label: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| label.contains(m))
}

/// `"-"` and empty cells are zero, as is anything without a leading number.
fn parse_stat(text: &str) -> u32 {
    let cleaned = text.trim().replace(',', "");
    let digits: String = cleaned.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

fn find_stats_table<D: Dom>(dom: &D) -> Option<D::Node<'_>> {
    dom.select_all("table").into_iter().find(|&table| {
        dom.select_within(table, "tbody tr td:first-child, tbody tr th:first-child")
            .into_iter()
            .any(|cell| {
                let label = letters_only(&dom.text(cell));
                has_marker(&label, WIN_MARKERS) || has_marker(&label, LOSS_MARKERS)
            })
    })
}

fn all_time_column<'a, D: Dom>(dom: &'a D, table: D::Node<'a>) -> Option<usize> {
    let header = dom.select_within(table, "thead tr").into_iter().next()?;
    dom.select_within(header, "th, td")
        .into_iter()
        .position(|cell| letters_only(&dom.text(cell)).contains("alltime"))
}

/// Extracts all-time wins and losses from the win/loss statistics table.
///
/// Ratio rows and pool-only or DE-only breakdown rows are ignored. Values
/// come from the "All Time" column, or the last column when there is no such
/// header. A document without a recognisable table yields all zeros.
pub fn parse_history<D: Dom>(dom: &D) -> HistoryReport {
    let Some(table) = find_stats_table(dom) else {
        tracing::warn!("win/loss statistics table not found");
        return HistoryReport::default();
    };
    let all_time = all_time_column(dom, table);

    let mut wins = 0;
    let mut losses = 0;

    for row in dom.select_within(table, "tbody tr") {
        let cells = dom.select_within(row, "td, th");
        let Some(&first) = cells.first() else {
            continue;
        };

        let label = dom.text(first).to_lowercase();
        let sanitized = letters_only(&label);
        if sanitized.contains("ratio")
            || label.contains("pool")
            || DE_TOKEN_RE.is_match(&label)
            || label.contains("direct elimination")
        {
            continue;
        }

        let value_cell = all_time
            .and_then(|i| cells.get(i))
            .or_else(|| cells.last())
            .copied()
            .unwrap_or(first);
        let value = parse_stat(&dom.text(value_cell));

        if has_marker(&sanitized, WIN_MARKERS) {
            wins = value;
        } else if has_marker(&sanitized, LOSS_MARKERS) {
            losses = value;
        }
    }

    HistoryReport::new(wins, losses)
}
