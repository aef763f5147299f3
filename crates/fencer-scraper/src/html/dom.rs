//! The small slice of DOM querying the extractors need, so they can run
//! against any HTML backend.

use scraper::{ElementRef, Html, Selector};

/// A parsed, queryable HTML document.
pub trait Dom {
    type Node<'a>: Copy
    where
        Self: 'a;

    /// Every element in the document matching `selector`, in document order.
    fn select_all<'a>(&'a self, selector: &str) -> Vec<Self::Node<'a>>;

    /// Descendants of `node` matching `selector`.
    fn select_within<'a>(&'a self, node: Self::Node<'a>, selector: &str) -> Vec<Self::Node<'a>>;

    fn select_first<'a>(&'a self, selector: &str) -> Option<Self::Node<'a>> {
        self.select_all(selector).into_iter().next()
    }

    /// Text content with whitespace runs collapsed and ends trimmed.
    fn text<'a>(&'a self, node: Self::Node<'a>) -> String;

    fn attr<'a>(&'a self, node: Self::Node<'a>, name: &str) -> Option<&'a str>;

    /// The document as it was received.
    fn source(&self) -> &str;
}

/// [`Dom`] over the `scraper` crate's html5ever tree.
pub struct ScraperDom {
    document: Html,
    source: String,
}

impl ScraperDom {
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
            source: html.to_owned(),
        }
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!(selector, error = %e, "invalid CSS selector");
            None
        }
    }
}

impl Dom for ScraperDom {
    type Node<'a>
        = ElementRef<'a>
    where
        Self: 'a;

    fn select_all<'a>(&'a self, selector: &str) -> Vec<ElementRef<'a>> {
        parse_selector(selector)
            .map(|sel| self.document.select(&sel).collect())
            .unwrap_or_default()
    }

    fn select_within<'a>(&'a self, node: ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
        parse_selector(selector)
            .map(|sel| node.select(&sel).collect())
            .unwrap_or_default()
    }

    fn text<'a>(&'a self, node: ElementRef<'a>) -> String {
        node.text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn attr<'a>(&'a self, node: ElementRef<'a>, name: &str) -> Option<&'a str> {
        node.value().attr(name)
    }

    fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_text_and_attributes() {
        let dom = ScraperDom::parse(
            r#"<div class="card"><p>  Hello
                <b>world</b> </p><span class="flag" title="FRA"></span></div>"#,
        );

        let para = dom.select_first("div.card p").unwrap();
        assert_eq!(dom.text(para), "Hello world");

        let flag = dom.select_first(".flag").unwrap();
        assert_eq!(dom.attr(flag, "title"), Some("FRA"));
        assert_eq!(dom.attr(flag, "href"), None);

        let card = dom.select_first(".card").unwrap();
        assert_eq!(dom.select_within(card, "b").len(), 1);
    }

    #[test]
    fn invalid_selector_matches_nothing() {
        let dom = ScraperDom::parse("<p>x</p>");
        assert!(dom.select_all("p[").is_empty());
        assert!(dom.select_first(">>").is_none());
    }
}
