use scraper::{ElementRef, Html, Selector};

/// Typed lookups over a parsed page or a fragment of one
pub trait Lookup<'a> {
    fn find_first(&self, selector: &Selector) -> Option<ElementRef<'a>>;
    fn find_all(&self, selector: &Selector) -> Vec<ElementRef<'a>>;

    /// Whitespace-normalized text of the first match, `None` when absent or blank
    fn find_text(&self, selector: &Selector) -> Option<String> {
        self.find_first(selector).and_then(element_text)
    }

    fn find_attr(&self, selector: &Selector, name: &str) -> Option<String> {
        self.find_first(selector)
            .and_then(|el| el.value().attr(name))
            .map(|v| v.trim().to_string())
    }
}

impl<'a> Lookup<'a> for &'a Html {
    fn find_first(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.select(selector).next()
    }

    fn find_all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.select(selector).collect()
    }
}

impl<'a> Lookup<'a> for ElementRef<'a> {
    fn find_first(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.select(selector).next()
    }

    fn find_all(&self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.select(selector).collect()
    }
}

pub fn element_text(el: ElementRef<'_>) -> Option<String> {
    let text = el.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!text.is_empty()).then_some(text)
}

/// Text of the first non-blank text node directly under `el`
pub fn leading_text(el: ElementRef<'_>) -> Option<String> {
    el.children()
        .find_map(|child| match child.value().as_text() {
            Some(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Some(_) => None,
            None => ElementRef::wrap(child).and_then(element_text),
        })
}
