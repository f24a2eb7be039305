//! Best-effort field extraction.
//!
//! A [`Chain`] is an ordered list of strategies over an element scope. The
//! first strategy that yields a value wins; callers pick the fallback when
//! every strategy comes up empty. Strategies whose CSS selector fails to parse
//! simply never match.

use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::debug;

type Step<T> = Box<dyn Fn(ElementRef<'_>) -> Option<T>>;

pub struct Chain<T> {
    field: &'static str,
    steps: Vec<Step<T>>,
}

impl<T> Chain<T> {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            steps: Vec::new(),
        }
    }

    pub fn then(mut self, step: impl Fn(ElementRef<'_>) -> Option<T> + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Value of the first strategy that succeeds within `scope`.
    pub fn first(&self, scope: ElementRef<'_>) -> Option<T> {
        let found = self.steps.iter().find_map(|step| step(scope));
        if found.is_none() {
            debug!(field = self.field, "No extraction strategy matched");
        }
        found
    }

    pub fn first_or_default(&self, scope: ElementRef<'_>) -> T
    where
        T: Default,
    {
        self.first(scope).unwrap_or_default()
    }
}

/// Parse a selector, logging instead of failing on bad syntax.
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            debug!(selector = css, error = %e, "Invalid CSS selector");
            None
        }
    }
}

/// Visible text of an element with whitespace collapsed.
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the first element matching `css`, if non-empty.
pub fn text(css: &str) -> impl Fn(ElementRef<'_>) -> Option<String> {
    let sel = selector(css);
    move |scope| {
        let sel = sel.as_ref()?;
        let el = scope.select(sel).next()?;
        Some(element_text(el)).filter(|t| !t.is_empty())
    }
}

/// Attribute `attr` of the first element matching `css` whose value passes `accept`.
pub fn attr(
    css: &str,
    attr: &'static str,
    accept: impl Fn(&str) -> bool + 'static,
) -> impl Fn(ElementRef<'_>) -> Option<String> {
    let sel = selector(css);
    move |scope| {
        let sel = sel.as_ref()?;
        let el = scope.select(sel).next()?;
        let value = el.value().attr(attr)?.trim();
        (!value.is_empty() && accept(value)).then(|| value.to_string())
    }
}

/// `(text, href)` of the first element matching `css`, when both are present.
pub fn link(css: &str) -> impl Fn(ElementRef<'_>) -> Option<(String, String)> {
    let sel = selector(css);
    move |scope| {
        let sel = sel.as_ref()?;
        let el = scope.select(sel).next()?;
        let href = el.value().attr("href")?.trim();
        let label = element_text(el);
        if href.is_empty() || label.is_empty() {
            return None;
        }
        Some((label, href.to_string()))
    }
}

/// First capture group of `pattern` in the serialized markup of the scope,
/// mapped through `build`.
pub fn markup(
    pattern: Regex,
    build: impl Fn(&str) -> String + 'static,
) -> impl Fn(ElementRef<'_>) -> Option<String> {
    move |scope| {
        let html = scope.html();
        let caps = pattern.captures(&html)?;
        caps.get(1).map(|m| build(m.as_str()))
    }
}

/// Every non-empty text among elements matching `css`, in document order.
pub fn all_texts(scope: ElementRef<'_>, css: &str) -> Vec<String> {
    let Some(sel) = selector(css) else {
        return Vec::new();
    };
    scope
        .select(&sel)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}
