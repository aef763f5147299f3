use std::sync::LazyLock;

use fencer_core::{parse_slug, Profile};
use regex::Regex;

use super::dom::Dom;

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").expect("valid regex"));

const NAME_SELECTORS: &[&str] = &[
    "div.card-header h1.fw-bold",
    "div.card-header h1, div.card-header h2",
];
const BIRTH_YEAR_SELECTOR: &str = "div.card-header h3.text-dark-emphasis";
const CLUB_SELECTOR: &str = r#"div.card-header a[href^="/club/"]"#;
const FLAG_SELECTOR: &str = ".flag-icon";
const DEFAULT_COUNTRY: &str = "USA";

fn first_text<D: Dom>(dom: &D, selector: &str) -> Option<String> {
    dom.select_first(selector)
        .map(|node| dom.text(node))
        .filter(|text| !text.is_empty())
}

/// Extracts the profile header. Missing fields fall back rather than fail:
/// the name to the titleized slug, the country to `"USA"`.
pub fn parse_profile<D: Dom>(dom: &D, id: &str, slug: &str) -> Profile {
    let name = NAME_SELECTORS
        .iter()
        .find_map(|sel| first_text(dom, sel))
        .unwrap_or_else(|| {
            tracing::debug!(id, slug, "profile name missing; using slug");
            parse_slug(slug)
        });

    let birth_year = first_text(dom, BIRTH_YEAR_SELECTOR)
        .and_then(|text| YEAR_RE.find(&text).and_then(|m| m.as_str().parse().ok()));

    let club = first_text(dom, CLUB_SELECTOR);

    let country = dom
        .select_first(FLAG_SELECTOR)
        .and_then(|node| dom.attr(node, "title"))
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map_or_else(|| DEFAULT_COUNTRY.to_owned(), str::to_owned);

    Profile {
        id: id.to_owned(),
        slug: slug.to_owned(),
        name,
        birth_year,
        club,
        country,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::ScraperDom;

    const PROFILE_HTML: &str = r#"
        <html><body>
          <div class="card">
            <div class="card-header">
              <h1 class="fw-bold">Lee Kiefer</h1>
              <h3 class="text-dark-emphasis">Born 1994</h3>
              <a href="/club/123/Alliance">Alliance Fencing Academy</a>
              <span class="flag-icon flag-icon-us" title=" USA "></span>
            </div>
          </div>
        </body></html>
    "#;

    #[test]
    fn full_header() {
        let profile = parse_profile(&ScraperDom::parse(PROFILE_HTML), "100", "Lee-Kiefer");
        assert_eq!(
            profile,
            Profile {
                id: "100".to_owned(),
                slug: "Lee-Kiefer".to_owned(),
                name: "Lee Kiefer".to_owned(),
                birth_year: Some(1994),
                club: Some("Alliance Fencing Academy".to_owned()),
                country: "USA".to_owned(),
            }
        );
    }

    #[test]
    fn empty_document_falls_back() {
        let profile = parse_profile(&ScraperDom::parse("<html></html>"), "7", "anne-marie-smith");
        assert_eq!(profile.name, "Anne Marie Smith");
        assert_eq!(profile.birth_year, None);
        assert_eq!(profile.club, None);
        assert_eq!(profile.country, "USA");
    }

    #[test]
    fn plain_heading_and_foreign_flag() {
        let html = r#"<div class="card-header"><h2>Alexandre Tremblay</h2>
            <h3 class="text-dark-emphasis">unknown</h3>
            <i class="flag-icon" title="CAN"></i></div>"#;
        let profile = parse_profile(&ScraperDom::parse(html), "9", "x");
        assert_eq!(profile.name, "Alexandre Tremblay");
        assert_eq!(profile.birth_year, None);
        assert_eq!(profile.country, "CAN");
    }
}
