//! Weapon names and strength-rating values as they appear in the strength
//! summary table.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static MIN_MAX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*-\s*(\d+)").expect("valid regex"));

static PLUS_MINUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+\-/±]+\s*(\d+)").expect("valid regex"));

/// A fencing weapon. Unrecognised labels are kept lowercased in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Weapon {
    Foil,
    Epee,
    Saber,
    Other(String),
}

impl Weapon {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Foil => "foil",
            Self::Epee => "epee",
            Self::Saber => "saber",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Weapon {
    fn from(raw: String) -> Self {
        normalize_weapon(&raw)
    }
}

impl From<Weapon> for String {
    fn from(weapon: Weapon) -> Self {
        weapon.as_str().to_string()
    }
}

/// Canonicalizes a weapon label: `"Épée"`, `"EPEE"` and `"epee"` all become
/// [`Weapon::Epee`]; `"Sabre"` becomes [`Weapon::Saber`].
#[must_use]
pub fn normalize_weapon(raw: &str) -> Weapon {
    let lower = raw.trim().to_lowercase();
    let folded = lower.replace(['é', 'è', 'ê'], "e");

    if folded.contains("foil") {
        Weapon::Foil
    } else if folded.contains("epee") {
        Weapon::Epee
    } else if folded.contains("saber") || folded.contains("sabre") {
        Weapon::Saber
    } else {
        Weapon::Other(lower)
    }
}

/// Which bout format a strength rating applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoutKind {
    De,
    Pool,
}

impl BoutKind {
    /// Anything mentioning "pool" is a pool rating; everything else is DE.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains("pool") {
            Self::Pool
        } else {
            Self::De
        }
    }
}

/// A strength rating: numeric where the site shows a number, otherwise the
/// rank text verbatim (`"B2"`, `"U"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StrengthScore {
    Rating(i64),
    Rank(String),
}

impl fmt::Display for StrengthScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rating(n) => write!(f, "{n}"),
            Self::Rank(s) => f.write_str(s),
        }
    }
}

/// Uncertainty attached to a strength rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StrengthRange {
    Bounds { min: i64, max: i64 },
    Delta { range: i64 },
    Raw { raw: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthValue {
    pub value: StrengthScore,
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub range: Option<StrengthRange>,
}

impl StrengthValue {
    /// Value text and, when there is a numeric range, its bracketed form:
    /// `("65", Some("(60-70)"))`, `("1500", Some("(±40)"))`.
    #[must_use]
    pub fn display_parts(&self) -> (String, Option<String>) {
        let range = match &self.range {
            Some(StrengthRange::Bounds { min, max }) => Some(format!("({min}-{max})")),
            Some(StrengthRange::Delta { range }) => Some(format!("(±{range})")),
            Some(StrengthRange::Raw { .. }) | None => None,
        };
        (self.value.to_string(), range)
    }
}

/// Parses the strength cell. Leading integers win (`"65"`, `"65*"`);
/// anything else is kept as trimmed text.
#[must_use]
pub fn parse_strength_value(text: &str) -> StrengthScore {
    let trimmed = text.trim();
    match leading_int(trimmed) {
        Some(n) => StrengthScore::Rating(n),
        None => StrengthScore::Rank(trimmed.to_string()),
    }
}

/// Parses the range cell: `"60-70"`, `"+/- 5"`, free text, or nothing.
#[must_use]
pub fn parse_strength_range(text: &str) -> Option<StrengthRange> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }

    if let Some(caps) = MIN_MAX_RE.captures(trimmed) {
        if let (Ok(min), Ok(max)) = (caps[1].parse(), caps[2].parse()) {
            return Some(StrengthRange::Bounds { min, max });
        }
    }

    if let Some(caps) = PLUS_MINUS_RE.captures(trimmed) {
        if let Ok(range) = caps[1].parse() {
            return Some(StrengthRange::Delta { range });
        }
    }

    Some(StrengthRange::Raw {
        raw: trimmed.to_string(),
    })
}

/// Optional sign followed by at least one ASCII digit, ignoring the rest.
fn leading_int(s: &str) -> Option<i64> {
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weapon_labels_normalize() {
        assert_eq!(normalize_weapon("Foil"), Weapon::Foil);
        assert_eq!(normalize_weapon(" Épée "), Weapon::Epee);
        assert_eq!(normalize_weapon("EPEE"), Weapon::Epee);
        assert_eq!(normalize_weapon("Sabre"), Weapon::Saber);
        assert_eq!(normalize_weapon("Saber"), Weapon::Saber);
        assert_eq!(
            normalize_weapon("Para Foil"),
            Weapon::Foil,
            "substring match should win"
        );
        assert_eq!(
            normalize_weapon("Mixed"),
            Weapon::Other("mixed".to_string())
        );
    }

    #[test]
    fn unknown_labels_keep_lowercased_text() {
        assert_eq!(normalize_weapon("ÉPÉE"), Weapon::Epee);
        assert_eq!(
            normalize_weapon(" Säbel "),
            Weapon::Other("säbel".to_string())
        );
        assert_eq!(
            normalize_weapon("Fleuret"),
            Weapon::Other("fleuret".to_string())
        );
        assert_eq!(
            normalize_weapon("剣道"),
            Weapon::Other("剣道".to_string())
        );
        assert_eq!(normalize_weapon(""), Weapon::Other(String::new()));
    }

    #[test]
    fn weapon_serializes_as_lowercase_string() {
        let json = serde_json::to_string(&Weapon::Epee).unwrap();
        assert_eq!(json, "\"epee\"");
        let back: Weapon = serde_json::from_str("\"Épée\"").unwrap();
        assert_eq!(back, Weapon::Epee);
    }

    #[test]
    fn bout_kind_from_label() {
        assert_eq!(BoutKind::from_label("Pool"), BoutKind::Pool);
        assert_eq!(BoutKind::from_label("DE"), BoutKind::De);
        assert_eq!(BoutKind::from_label("Direct Elimination"), BoutKind::De);
    }

    #[test]
    fn strength_value_integer_and_rank() {
        assert_eq!(parse_strength_value(" 65 "), StrengthScore::Rating(65));
        assert_eq!(parse_strength_value("1500*"), StrengthScore::Rating(1500));
        assert_eq!(
            parse_strength_value("B2"),
            StrengthScore::Rank("B2".to_string())
        );
        assert_eq!(
            parse_strength_value("U"),
            StrengthScore::Rank("U".to_string())
        );
        assert_eq!(parse_strength_value("-"), StrengthScore::Rank("-".to_string()));
    }

    #[test]
    fn strength_range_forms() {
        assert_eq!(
            parse_strength_range("60-70"),
            Some(StrengthRange::Bounds { min: 60, max: 70 })
        );
        assert_eq!(
            parse_strength_range("60 - 70"),
            Some(StrengthRange::Bounds { min: 60, max: 70 })
        );
        assert_eq!(
            parse_strength_range("+/- 5"),
            Some(StrengthRange::Delta { range: 5 })
        );
        assert_eq!(
            parse_strength_range("±12"),
            Some(StrengthRange::Delta { range: 12 })
        );
        assert_eq!(
            parse_strength_range("wide"),
            Some(StrengthRange::Raw {
                raw: "wide".to_string()
            })
        );
        assert_eq!(parse_strength_range(" - "), None);
        assert_eq!(parse_strength_range(""), None);
    }

    #[test]
    fn strength_value_serializes_flat() {
        let value = StrengthValue {
            value: StrengthScore::Rating(65),
            range: Some(StrengthRange::Bounds { min: 60, max: 70 }),
        };
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!({"value": 65, "min": 60, "max": 70}));

        let rank = StrengthValue {
            value: StrengthScore::Rank("B2".to_string()),
            range: None,
        };
        let json = serde_json::to_value(&rank).unwrap();
        assert_eq!(json, serde_json::json!({"value": "B2"}));
    }

    #[test]
    fn strength_value_display_parts() {
        let bounds = StrengthValue {
            value: StrengthScore::Rating(65),
            range: Some(StrengthRange::Bounds { min: 60, max: 70 }),
        };
        assert_eq!(
            bounds.display_parts(),
            ("65".to_string(), Some("(60-70)".to_string()))
        );

        let delta = StrengthValue {
            value: StrengthScore::Rating(1500),
            range: Some(StrengthRange::Delta { range: 40 }),
        };
        assert_eq!(delta.display_parts().1.as_deref(), Some("(±40)"));

        let raw = StrengthValue {
            value: StrengthScore::Rank("U".to_string()),
            range: Some(StrengthRange::Raw {
                raw: "n/a".to_string(),
            }),
        };
        assert_eq!(raw.display_parts(), ("U".to_string(), None));
    }
}
