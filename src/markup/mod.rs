// src/markup/mod.rs

use scraper::{ElementRef, Html};

/// The tree-query surface the extraction pipeline needs from a markup
/// library: descendant lookup by tag, exact attribute match, trimmed
/// text. Keeps the locator/segmenter logic off any one HTML crate.
pub trait Element: Sized {
    /// Descendant elements with the given tag name, in document order.
    /// Does not include the element itself.
    fn find_all(&self, tag: &str) -> Vec<Self>;

    /// Whether this element carries `attr` with exactly `value`.
    fn attr_is(&self, attr: &str, value: &str) -> bool;

    /// All descendant text fragments, each trimmed, concatenated.
    fn trimmed_text(&self) -> String;
}

/// A parsed HTML document backed by `scraper`.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        Document {
            html: Html::parse_document(text),
        }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }
}

impl<'a> Element for ElementRef<'a> {
    fn find_all(&self, tag: &str) -> Vec<Self> {
        self.descendants()
            .skip(1) // descendants() yields the node itself first
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name().eq_ignore_ascii_case(tag))
            .collect()
    }

    fn attr_is(&self, attr: &str, value: &str) -> bool {
        self.value().attr(attr) == Some(value)
    }

    fn trimmed_text(&self) -> String {
        self.text().map(str::trim).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_nested_elements_in_document_order() {
        let doc = Document::parse("<table><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></table>");
        let root = doc.root();
        let tables = root.find_all("table");
        assert_eq!(tables.len(), 1);
        let cells = tables[0].find_all("td");
        let texts: Vec<String> = cells.iter().map(Element::trimmed_text).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn attr_match_is_exact() {
        let doc = Document::parse(r#"<table><tr bgcolor="silver"><td>x</td></tr></table>"#);
        let root = doc.root();
        let rows = root.find_all("tr");
        assert!(rows[0].attr_is("bgcolor", "silver"));
        assert!(!rows[0].attr_is("bgcolor", "gray"));
        assert!(!rows[0].attr_is("align", "silver"));
    }

    #[test]
    fn text_fragments_are_trimmed_then_joined() {
        let doc = Document::parse("<table><tr><td><b>Иванов</b> Иван </td></tr></table>");
        let root = doc.root();
        let cell = &root.find_all("td")[0];
        assert_eq!(cell.trimmed_text(), "ИвановИван");
    }

    #[test]
    fn tag_lookup_excludes_self() {
        let doc = Document::parse("<table><tr><td><table></table></td></tr></table>");
        let root = doc.root();
        let outer = &root.find_all("table")[0];
        assert_eq!(outer.find_all("table").len(), 1);
    }
}
