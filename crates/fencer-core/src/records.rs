use std::collections::BTreeMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::weapon::{BoutKind, StrengthValue, Weapon};

/// Characters left unescaped in a path segment: the unreserved set plus the
/// sub-delimiters slugs actually contain (`(`, `)`).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// One row of the search endpoint's response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub name: String,
    /// Path segment for profile URLs. Taken from search and not always
    /// accepted by the profile page; see `build_slug_from_name`.
    pub slug: String,
    pub club: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub birth_year: Option<i32>,
    pub club: Option<String>,
    pub country: String,
}

impl Profile {
    /// Profile shown when the profile page could not be fetched.
    #[must_use]
    pub fn fallback(result: &SearchResult) -> Self {
        Self {
            id: result.id.clone(),
            slug: result.slug.clone(),
            name: result.name.clone(),
            birth_year: None,
            club: Some(result.club.clone()).filter(|c| !c.is_empty()),
            country: result.country.clone(),
        }
    }
}

/// DE and pool ratings for one weapon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponStrength {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub de: Option<StrengthValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<StrengthValue>,
}

impl WeaponStrength {
    #[must_use]
    pub fn get(&self, kind: BoutKind) -> Option<&StrengthValue> {
        match kind {
            BoutKind::De => self.de.as_ref(),
            BoutKind::Pool => self.pool.as_ref(),
        }
    }

    /// Stores `value`, replacing any earlier row of the same kind.
    pub fn set(&mut self, kind: BoutKind, value: StrengthValue) {
        match kind {
            BoutKind::De => self.de = Some(value),
            BoutKind::Pool => self.pool = Some(value),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrengthReport {
    pub weapons: BTreeMap<Weapon, WeaponStrength>,
    /// Chart data embedded in the strength page, passed through untouched.
    pub series: Option<serde_json::Value>,
}

impl StrengthReport {
    /// The weapon a fencer is best summarised by: epee, foil, saber, then
    /// whatever comes first.
    #[must_use]
    pub fn primary_weapon(&self) -> Option<(&Weapon, &WeaponStrength)> {
        [Weapon::Epee, Weapon::Foil, Weapon::Saber]
            .iter()
            .find_map(|w| self.weapons.get_key_value(w))
            .or_else(|| self.weapons.iter().next())
    }
}

/// All-time bout record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryReport {
    pub wins: u32,
    pub losses: u32,
    pub bouts: u32,
    /// Win percentage with one decimal place, e.g. `"60.0"`.
    pub win_ratio: String,
}

impl HistoryReport {
    #[must_use]
    pub fn new(wins: u32, losses: u32) -> Self {
        let bouts = wins.saturating_add(losses);
        let win_ratio = if bouts == 0 {
            "0.0".to_string()
        } else {
            format!("{:.1}", f64::from(wins) / f64::from(bouts) * 100.0)
        };
        Self {
            wins,
            losses,
            bouts,
            win_ratio,
        }
    }
}

impl Default for HistoryReport {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// An entry in the user's tracked-fencer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedFencer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub de_strength: Option<String>,
    #[serde(default)]
    pub pool_strength: Option<String>,
    #[serde(default)]
    pub weapon: Option<String>,
}

impl TrackedFencer {
    /// Snapshot of a looked-up fencer, keeping only the primary weapon's ratings.
    #[must_use]
    pub fn from_lookup(profile: &Profile, strength: &StrengthReport) -> Self {
        let primary = strength.primary_weapon();
        let rating = |kind: BoutKind| {
            primary
                .and_then(|(_, s)| s.get(kind))
                .map(|v| v.value.to_string())
        };

        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            slug: Some(profile.slug.clone()).filter(|s| !s.is_empty()),
            de_strength: rating(BoutKind::De),
            pool_strength: rating(BoutKind::Pool),
            weapon: primary.map(|(w, _)| w.to_string()),
        }
    }
}

/// `{base}/p/{id}/{slug}` with both segments percent-encoded.
#[must_use]
pub fn profile_url(base_url: &str, id: &str, slug: &str) -> String {
    format!(
        "{}/p/{}/{}",
        base_url.trim_end_matches('/'),
        utf8_percent_encode(id, PATH_SEGMENT),
        utf8_percent_encode(slug, PATH_SEGMENT)
    )
}

/// Age implied by a birth year, if it is plausible.
#[must_use]
pub fn approx_age(birth_year: i32, current_year: i32) -> Option<i32> {
    let age = current_year.checked_sub(birth_year)?;
    (birth_year > 0 && (0..=120).contains(&age)).then_some(age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapon::{StrengthRange, StrengthScore};

    fn value(score: i64) -> StrengthValue {
        StrengthValue {
            value: StrengthScore::Rating(score),
            range: None,
        }
    }

    #[test]
    fn history_ratio_one_decimal() {
        let report = HistoryReport::new(12, 8);
        assert_eq!(report.bouts, 20);
        assert_eq!(report.win_ratio, "60.0");

        assert_eq!(HistoryReport::new(1, 2).win_ratio, "33.3");
        assert_eq!(HistoryReport::new(2, 1).win_ratio, "66.7");
    }

    #[test]
    fn history_zero_bouts() {
        let report = HistoryReport::default();
        assert_eq!(report.bouts, 0);
        assert_eq!(report.win_ratio, "0.0");
    }

    #[test]
    fn history_serializes_camel_case() {
        let json = serde_json::to_value(HistoryReport::new(3, 1)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"wins": 3, "losses": 1, "bouts": 4, "winRatio": "75.0"})
        );
    }

    #[test]
    fn primary_weapon_prefers_epee() {
        let mut report = StrengthReport::default();
        report
            .weapons
            .entry(Weapon::Foil)
            .or_default()
            .set(BoutKind::De, value(40));
        report
            .weapons
            .entry(Weapon::Epee)
            .or_default()
            .set(BoutKind::Pool, value(55));

        let (weapon, _) = report.primary_weapon().unwrap();
        assert_eq!(weapon, &Weapon::Epee);
    }

    #[test]
    fn primary_weapon_falls_back_to_first() {
        let mut report = StrengthReport::default();
        report
            .weapons
            .entry(Weapon::Other("para".to_string()))
            .or_default()
            .set(BoutKind::De, value(10));
        let (weapon, _) = report.primary_weapon().unwrap();
        assert_eq!(weapon.as_str(), "para");
        assert!(StrengthReport::default().primary_weapon().is_none());
    }

    #[test]
    fn tracked_from_lookup_takes_primary_weapon_values() {
        let profile = Profile {
            id: "100".to_string(),
            slug: "Lee-Kiefer".to_string(),
            name: "Lee Kiefer".to_string(),
            birth_year: Some(1994),
            club: None,
            country: "USA".to_string(),
        };
        let mut strength = StrengthReport::default();
        let foil = strength.weapons.entry(Weapon::Foil).or_default();
        foil.set(BoutKind::De, value(95));
        foil.set(
            BoutKind::Pool,
            StrengthValue {
                value: StrengthScore::Rank("A4".to_string()),
                range: Some(StrengthRange::Delta { range: 3 }),
            },
        );

        let tracked = TrackedFencer::from_lookup(&profile, &strength);
        assert_eq!(tracked.id, "100");
        assert_eq!(tracked.slug.as_deref(), Some("Lee-Kiefer"));
        assert_eq!(tracked.weapon.as_deref(), Some("foil"));
        assert_eq!(tracked.de_strength.as_deref(), Some("95"));
        assert_eq!(tracked.pool_strength.as_deref(), Some("A4"));
    }

    #[test]
    fn tracked_accepts_missing_optional_fields() {
        let tracked: TrackedFencer =
            serde_json::from_str(r#"{"id":"7","name":"Jane Doe"}"#).unwrap();
        assert_eq!(tracked.slug, None);
        assert_eq!(tracked.weapon, None);
    }

    #[test]
    fn profile_fallback_copies_search_result() {
        let result = SearchResult {
            id: "100".to_string(),
            name: "Lee Kiefer".to_string(),
            slug: "Lee-Kiefer".to_string(),
            club: "Unknown Club".to_string(),
            country: "USA".to_string(),
        };
        let profile = Profile::fallback(&result);
        assert_eq!(profile.name, "Lee Kiefer");
        assert_eq!(profile.birth_year, None);
        assert_eq!(profile.club.as_deref(), Some("Unknown Club"));
    }

    #[test]
    fn profile_url_encodes_segments() {
        assert_eq!(
            profile_url("https://fencingtracker.com/", "100", "Lee-Kiefer"),
            "https://fencingtracker.com/p/100/Lee-Kiefer"
        );
        assert_eq!(
            profile_url("https://fencingtracker.com", "7", "Leon (Ruibo)-Xiao"),
            "https://fencingtracker.com/p/7/Leon%20(Ruibo)-Xiao"
        );
    }

    #[test]
    fn approx_age_bounds() {
        assert_eq!(approx_age(1994, 2026), Some(32));
        assert_eq!(approx_age(2030, 2026), None);
        assert_eq!(approx_age(1800, 2026), None);
        assert_eq!(approx_age(0, 2026), None);
    }
}
