//! Plain-text rendering for CLI output. Everything here is pure so it can
//! be tested without a terminal.

use fencer_core::{
    approx_age, profile_url, BoutKind, NameQuery, SearchResult, StrengthValue, TrackedFencer,
    Weapon,
};
use fencer_scraper::FencerView;

fn weapon_label(weapon: &Weapon) -> String {
    match weapon {
        Weapon::Foil => "Foil".to_string(),
        Weapon::Epee => "Epee".to_string(),
        Weapon::Saber => "Saber".to_string(),
        Weapon::Other(label) => label.clone(),
    }
}

fn strength_text(value: &StrengthValue) -> String {
    match value.display_parts() {
        (value, Some(range)) => format!("{value} {range}"),
        (value, None) => value,
    }
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub(crate) fn format_fencer(
    view: &FencerView,
    base_url: &str,
    current_year: i32,
    tracked: bool,
) -> String {
    let profile = &view.profile;
    let mut lines = vec![if tracked {
        format!("{} [tracked]", profile.name)
    } else {
        profile.name.clone()
    }];

    lines.push(format!(
        "  Club:     {}",
        profile.club.as_deref().unwrap_or("\u{2014}")
    ));
    lines.push(format!("  Country:  {}", profile.country));
    if let Some(year) = profile.birth_year {
        let born = match approx_age(year, current_year) {
            Some(age) => format!("{year} (age ~{age})"),
            None => year.to_string(),
        };
        lines.push(format!("  Born:     {born}"));
    }
    lines.push(format!(
        "  Profile:  {}",
        profile_url(base_url, &profile.id, &profile.slug)
    ));

    lines.push(String::new());
    lines.push("Strength".to_string());
    if view.strength.weapons.is_empty() {
        lines.push("  no ratings".to_string());
    }
    for (weapon, ratings) in &view.strength.weapons {
        let mut label = weapon_label(weapon);
        for (kind, name) in [(BoutKind::De, "DE"), (BoutKind::Pool, "Pool")] {
            if let Some(value) = ratings.get(kind) {
                lines.push(format!("  {label:<7}{name:<6}{}", strength_text(value)));
                label.clear();
            }
        }
    }

    let history = &view.history;
    lines.push(String::new());
    lines.push("Record (all time)".to_string());
    lines.push(format!(
        "  {} W / {} L  ({} bouts, {}% wins)",
        history.wins, history.losses, history.bouts, history.win_ratio
    ));

    if !view.warnings.is_empty() {
        lines.push(String::new());
        lines.extend(view.warnings.iter().map(|w| format!("warning: {w}")));
    }

    finish(lines)
}

pub(crate) fn format_candidates(candidates: &[SearchResult]) -> String {
    let mut lines = vec![format!("{} fencers match:", candidates.len())];
    lines.extend(candidates.iter().enumerate().map(|(i, c)| {
        format!(
            "  {:>2}. {} ({}, {})  id {}",
            i + 1,
            c.name,
            c.club,
            c.country,
            c.id
        )
    }));
    finish(lines)
}

pub(crate) fn format_variants(query: &NameQuery) -> String {
    let mut lines = vec![format!("normalized: {}", query.normalized)];
    lines.extend(
        query
            .variants
            .iter()
            .enumerate()
            .map(|(i, v)| format!("  {:>2}. {v}", i + 1)),
    );
    finish(lines)
}

/// Tracked fencers sorted by name, case-insensitively.
pub(crate) fn format_tracked(mut entries: Vec<TrackedFencer>) -> String {
    entries.sort_by_key(|e| e.name.to_lowercase());
    let header = format!(
        "{:<10}{:<28}{:<8}{:<8}POOL",
        "ID", "NAME", "WEAPON", "DE"
    );
    let mut lines = vec![header];
    lines.extend(entries.iter().map(|e| {
        format!(
            "{:<10}{:<28}{:<8}{:<8}{}",
            e.id,
            e.name,
            e.weapon.as_deref().unwrap_or("-"),
            e.de_strength.as_deref().unwrap_or("-"),
            e.pool_strength.as_deref().unwrap_or("-")
        )
    }));
    finish(lines)
}
