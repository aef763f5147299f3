//! Name normalization: search-query variants, structured-name parsing, and
//! slug generation for fencingtracker profile URLs.
//!
//! Names arrive in many shapes (`"Last, First"`, `"SURNAME Given (Nick)"`,
//! `"First Middle Last Jr."`). [`normalize_query`] expands one raw string into
//! an ordered list of candidates worth sending to the search endpoint, most
//! literal first.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static NICKNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^)]+)\)").expect("valid regex"));

static PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid regex"));

static REPEATED_HYPHENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("valid regex"));

static REPEATED_SPACES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

/// Result of [`normalize_query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameQuery {
    /// Lowercased, whitespace-collapsed input.
    pub normalized: String,
    /// Candidate search strings, deduplicated, in the order they should be tried.
    /// The first entry is always the whitespace-collapsed input.
    pub variants: Vec<String>,
}

/// Generational suffixes recognised after a surname or at the end of a name.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suffix {
    Jr,
    Sr,
    II,
    III,
    IV,
    V,
    VI,
}

impl Suffix {
    /// Recognises a suffix token, ignoring case and trailing `.`/`,`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let cleaned = token.trim_end_matches(['.', ',']).to_lowercase();
        match cleaned.as_str() {
            "jr" => Some(Self::Jr),
            "sr" => Some(Self::Sr),
            "ii" => Some(Self::II),
            "iii" => Some(Self::III),
            "iv" => Some(Self::IV),
            "v" => Some(Self::V),
            "vi" => Some(Self::VI),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jr => "Jr",
            Self::Sr => "Sr",
            Self::II => "II",
            Self::III => "III",
            Self::IV => "IV",
            Self::V => "V",
            Self::VI => "VI",
        }
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A name split into surname, given names, and the optional extras.
///
/// All name parts are title-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredName {
    pub last_name: String,
    /// Space-separated given names, possibly including middle initials.
    pub first_names: String,
    pub suffix: Option<Suffix>,
    /// Text found in parentheses, e.g. `Ruibo` in `"XIAO Leon (Ruibo)"`.
    pub nickname: Option<String>,
}

/// Expands a raw name into the ordered list of search candidates.
///
/// Never fails: the whitespace-collapsed input is always the first variant,
/// even when nothing else can be derived from it.
#[must_use]
pub fn normalize_query(raw: &str) -> NameQuery {
    let cleaned = collapse_whitespace(raw);
    let normalized = cleaned.to_lowercase();

    let mut variants = vec![cleaned.clone()];

    if let Some(structured) = parse_structured_external_name(&cleaned) {
        for variant in build_structured_variants(&structured) {
            push_variant(&mut variants, variant);
        }
    }

    match cleaned.find(',') {
        Some(idx) if idx > 0 => {
            let parts: Vec<&str> = cleaned.split(',').map(str::trim).collect();
            if let [last, first] = parts.as_slice() {
                if !last.is_empty() && !first.is_empty() {
                    push_variant(&mut variants, format!("{first} {last}"));
                }
            }
        }
        _ => push_word_order_variants(&mut variants, &cleaned),
    }

    NameQuery {
        normalized,
        variants,
    }
}

/// Swapped-order variants for names written without a comma.
fn push_word_order_variants(variants: &mut Vec<String>, cleaned: &str) {
    let parts: Vec<&str> = cleaned.split_whitespace().collect();

    match parts.as_slice() {
        [first, last] if !is_initial(last) => {
            push_variant(variants, format!("{last}, {first}"));
        }
        [rest @ .., last] if parts.len() > 2 => {
            let sanitized_len = last
                .chars()
                .filter(|c| c.is_ascii_alphabetic() || *c == '\'' || *c == '-')
                .count();
            if !last.contains(['(', ')']) && sanitized_len > 1 {
                push_variant(variants, format!("{last}, {}", rest.join(" ")));
            }
        }
        _ => {}
    }

    if parts.len() < 3 {
        return;
    }

    // Surname-first layouts: "XIAO LEON RUIBO", "XIAO Leon Ruibo", "EWART Jr. Stephen".
    let all_uppercase = parts.iter().all(|t| *t == t.to_uppercase());
    let second_is_suffix = Suffix::parse(&parts[1].replace(['.', ','], "")).is_some();
    let surname_first = all_uppercase
        || (is_likely_surname_token(parts[0])
            && parts[1..].iter().any(|t| *t != t.to_uppercase())
            && !second_is_suffix);

    let (surname, given): (String, Vec<String>) = if surname_first {
        let given = parts[1..]
            .iter()
            .filter(|t| Suffix::parse(&t.replace(['.', ','], "")).is_none())
            .map(|t| title_case(t))
            .collect();
        (title_case(parts[0]), given)
    } else if is_likely_surname_token(parts[0]) && second_is_suffix {
        let given = parts[2..].iter().map(|t| title_case(t)).collect();
        (title_case(parts[0]), given)
    } else {
        return;
    };

    let Some(first_given) = given.first() else {
        return;
    };
    let given_names = given.join(" ");

    push_variant(variants, format!("{given_names} {surname}"));
    push_variant(variants, format!("{surname}, {given_names}"));
    push_variant(variants, format!("{surname}, {first_given}"));
    push_variant(variants, format!("{first_given} {surname}"));
}

/// Splits a raw name into surname, given names, suffix and nickname.
///
/// Returns `None` when no surname/given-name split can be made, e.g. for a
/// single bare token.
#[must_use]
pub fn parse_structured_external_name(raw: &str) -> Option<StructuredName> {
    let nickname = NICKNAME_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());

    let without_nick = collapse_whitespace(&PARENTHETICAL_RE.replace_all(raw, " "));
    if without_nick.is_empty() {
        return None;
    }

    let comma_parts: Vec<&str> = without_nick
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if comma_parts.len() >= 2 {
        if let Some(parsed) = parse_comma_form(&comma_parts, nickname.as_deref()) {
            return Some(parsed);
        }
    }

    parse_spaced_form(&name_tokens(&without_nick), nickname.as_deref())
}

/// `"Last, Given [Suffix]"`.
fn parse_comma_form(comma_parts: &[&str], nickname: Option<&str>) -> Option<StructuredName> {
    let surname_tokens = name_tokens(comma_parts[0]);
    let remainder = comma_parts[1..].join(" ");
    let mut given_tokens = name_tokens(&remainder);

    let suffix = given_tokens.last().and_then(|t| Suffix::parse(t));
    if suffix.is_some() {
        given_tokens.pop();
    }
    if given_tokens.is_empty() {
        if let Some(nick) = nickname {
            given_tokens.push(nick);
        }
    }

    build_structured(&surname_tokens, &given_tokens, suffix, nickname)
}

/// Comma-free names: a leading uppercase surname run, or surname last.
fn parse_spaced_form(tokens: &[&str], nickname: Option<&str>) -> Option<StructuredName> {
    if tokens.is_empty() {
        return None;
    }

    let run_len = tokens
        .iter()
        .take_while(|t| is_likely_surname_token(t) && Suffix::parse(t).is_none())
        .count();

    if run_len == 0 {
        let mut rest = tokens.to_vec();
        let mut suffix = None;
        if rest.len() > 1 {
            suffix = rest.last().and_then(|t| Suffix::parse(t));
            if suffix.is_some() {
                rest.pop();
            }
        }
        // Trailing initials ("Smith J") are never the surname.
        let last = rest.remove(rest.iter().rposition(|t| !is_initial(t))?);
        let mut given = rest;
        if given.is_empty() {
            given.extend(nickname);
        }
        return build_structured(&[last], &given, suffix, nickname);
    }

    // Entirely uppercase with no room for given names: only the first token is the surname.
    let run_len = if run_len == tokens.len() && tokens.len() >= 2 {
        1
    } else {
        run_len
    };

    let (surname, mut rest) = tokens.split_at(run_len);
    let suffix = rest
        .first()
        .and_then(|t| Suffix::parse(&t.replace(',', "")));
    if suffix.is_some() {
        rest = &rest[1..];
    }

    let mut given = rest.to_vec();
    if given.is_empty() {
        given.extend(nickname);
    }

    build_structured(surname, &given, suffix, nickname)
}

fn build_structured(
    surname_tokens: &[&str],
    given_tokens: &[&str],
    suffix: Option<Suffix>,
    nickname: Option<&str>,
) -> Option<StructuredName> {
    let last_name = join_title_case(surname_tokens);
    let first_names = join_title_case(given_tokens);
    if last_name.is_empty() || first_names.is_empty() {
        return None;
    }

    Some(StructuredName {
        last_name,
        first_names,
        suffix,
        nickname: nickname.map(title_case),
    })
}

/// Every search candidate derivable from a parsed name, in trial order.
#[must_use]
pub fn build_structured_variants(name: &StructuredName) -> Vec<String> {
    let mut variants = Vec::new();
    let first = name.first_names.as_str();
    let last = name.last_name.as_str();
    let with_suffix = |base: String| match name.suffix {
        Some(suffix) => format!("{base} {suffix}"),
        None => base,
    };

    let primary = format!("{first} {last}");
    push_variant(&mut variants, with_suffix(primary.clone()));
    if name.suffix.is_some() {
        push_variant(&mut variants, primary);
    }
    push_variant(&mut variants, with_suffix(format!("{last}, {first}")));

    if let Some(first_token) = first.split_whitespace().next() {
        let first_last = format!("{first_token} {last}");
        push_variant(&mut variants, first_last.clone());
        if name.suffix.is_some() {
            push_variant(&mut variants, with_suffix(first_last));
        }

        let comma_first = format!("{last}, {first_token}");
        push_variant(&mut variants, comma_first.clone());
        if name.suffix.is_some() {
            push_variant(&mut variants, with_suffix(comma_first));
        }
    }

    let hyphenated = format!("{}-{}", collapse_whitespace(first), collapse_whitespace(last));
    push_variant(&mut variants, hyphenated.clone());
    if name.suffix.is_some() {
        push_variant(&mut variants, with_suffix(hyphenated.clone()));
    }
    let comma_hyphenated = format!("{}, {hyphenated}", collapse_whitespace(last));
    push_variant(&mut variants, comma_hyphenated.clone());
    if name.suffix.is_some() {
        push_variant(&mut variants, with_suffix(comma_hyphenated));
    }

    let without_initials = strip_trailing_initials(first);
    if !without_initials.is_empty() && without_initials != first {
        let trimmed_primary = format!("{without_initials} {last}");
        push_variant(&mut variants, with_suffix(trimmed_primary.clone()));
        push_variant(&mut variants, trimmed_primary);
        push_variant(
            &mut variants,
            with_suffix(format!("{last}, {without_initials}")),
        );
    }

    if let Some(nick) = name.nickname.as_deref() {
        if nick.to_lowercase() != first.to_lowercase() {
            push_variant(&mut variants, format!("{nick} {last}"));
            push_variant(&mut variants, format!("{last}, {nick}"));
        }
    }

    variants
}

/// Converts a display name into the slug form fencingtracker uses in profile
/// paths.
///
/// Case and diacritics are kept. Parenthesised nicknames keep their inner
/// spaces and the space before `(`; every other space becomes a hyphen.
#[must_use]
pub fn create_slug(name: &str) -> String {
    let sanitized: String = collapse_whitespace(name)
        .chars()
        .map(|c| if ('\u{2012}'..='\u{2015}').contains(&c) { '-' } else { c })
        .filter(|c| {
            c.is_alphabetic() || c.is_numeric() || c.is_whitespace() || matches!(c, '-' | '(' | ')')
        })
        .collect();

    let chars: Vec<char> = sanitized.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut paren_depth = 0usize;

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '(' => {
                paren_depth += 1;
                out.push(c);
            }
            ')' => {
                paren_depth = paren_depth.saturating_sub(1);
                out.push(c);
            }
            c if c.is_whitespace() => match chars.get(i + 1) {
                _ if paren_depth > 0 => out.push(' '),
                Some('(') => out.push(' '),
                Some(_) => out.push('-'),
                None => {}
            },
            c => out.push(c),
        }
    }

    let out = REPEATED_HYPHENS_RE.replace_all(&out, "-");
    let out = REPEATED_SPACES_RE.replace_all(&out, " ");
    out.trim_matches(|c: char| c == '-' || c.is_whitespace())
        .to_string()
}

/// Builds a `first-last` slug from a name in any supported layout.
///
/// Used to regenerate a profile slug when the one returned by search 404s.
#[must_use]
pub fn build_slug_from_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if let Some(structured) = parse_structured_external_name(trimmed) {
        let mut parts = vec![structured.first_names.clone()];
        if let Some(nick) = &structured.nickname {
            parts.push(format!("({nick})"));
        }
        parts.push(structured.last_name.clone());
        if let Some(suffix) = structured.suffix {
            parts.push(suffix.to_string());
        }

        let candidate = create_slug(&parts.join(" "));
        if !candidate.is_empty() {
            return candidate;
        }
        return create_slug(trimmed);
    }

    if trimmed.contains(',') {
        let parts: Vec<&str> = trimmed
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if let [last, first] = parts.as_slice() {
            return create_slug(&format!("{first} {last}"));
        }
    }

    create_slug(trimmed)
}

/// Turns a slug back into a readable name: `"lee-kiefer"` -> `"Lee Kiefer"`.
#[must_use]
pub fn parse_slug(slug: &str) -> String {
    slug.replace('-', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn push_variant(variants: &mut Vec<String>, candidate: String) {
    let candidate = candidate.trim();
    if candidate.is_empty() || variants.iter().any(|v| v == candidate) {
        return;
    }
    variants.push(candidate.to_string());
}

/// Whitespace-separated tokens with trailing `.`/`,` removed.
fn name_tokens(s: &str) -> Vec<&str> {
    s.split_whitespace()
        .map(|t| t.trim_end_matches(['.', ',']))
        .filter(|t| !t.is_empty())
        .collect()
}

/// An all-caps token of two or more letters. Single capitals are initials.
fn is_likely_surname_token(token: &str) -> bool {
    let sanitized: String = token
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}' | '-' | '.'))
        .collect();
    if !sanitized.chars().any(char::is_alphabetic) {
        return false;
    }
    if sanitized.chars().count() == 1 {
        return false;
    }
    sanitized == sanitized.to_uppercase()
}

/// Lowercases a token, then capitalises the first letter and each letter that
/// follows a hyphen, apostrophe, or opening parenthesis.
fn title_case(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut at_boundary = true;
    for c in token.to_lowercase().chars() {
        if at_boundary && c.is_lowercase() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_boundary = matches!(c, '-' | '\'' | '\u{2019}' | '(') || c.is_whitespace();
    }
    out
}

fn join_title_case(tokens: &[&str]) -> String {
    tokens
        .iter()
        .map(|t| title_case(t))
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

fn strip_trailing_initials(first_names: &str) -> String {
    let mut tokens: Vec<&str> = first_names.split_whitespace().collect();
    while tokens.len() > 1 && tokens.last().is_some_and(|t| is_initial(t)) {
        tokens.pop();
    }
    tokens.join(" ")
}

fn is_initial(token: &str) -> bool {
    token.chars().filter(|c| *c != '.').count() == 1
}

#[cfg(test)]
#[path = "names_test.rs"]
mod tests;
