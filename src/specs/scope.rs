// src/specs/scope.rs
//
// Where on the page to look. Strategies run most-specific first; the first
// one that finds an element with visible text wins. Markup drift gets fixed
// by adding a strategy, not by rewriting the extractor.

use scraper::{ElementRef, Html, Selector};

use crate::core::html::{selector, visible_text};

pub trait ScopeStrategy {
    /// Short label for logs ("main", ".cms-content", "body", …).
    fn name(&self) -> &str;

    fn locate<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>>;
}

/// First element matching a CSS selector that has visible text.
pub struct CssScope {
    css: String,
    sel: Selector,
}

impl CssScope {
    pub fn new(css: &str) -> Option<Self> {
        Some(Self { css: s!(css), sel: selector(css)? })
    }
}

impl ScopeStrategy for CssScope {
    fn name(&self) -> &str {
        &self.css
    }

    fn locate<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        doc.select(&self.sel).find(|el| !visible_text(*el).is_empty())
    }
}

/// `<body>`, if it has any text at all.
pub struct BodyScope;

impl ScopeStrategy for BodyScope {
    fn name(&self) -> &str {
        "body"
    }

    fn locate<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        doc.root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
            .filter(|el| !visible_text(*el).is_empty())
    }
}

/// Whole document. Always succeeds.
pub struct RootScope;

impl ScopeStrategy for RootScope {
    fn name(&self) -> &str {
        "document"
    }

    fn locate<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        Some(doc.root_element())
    }
}

pub struct ScopeChain {
    strategies: Vec<Box<dyn ScopeStrategy>>,
    fallbacks: Vec<Box<dyn ScopeStrategy>>,
}

impl ScopeChain {
    /// CSS strategies in the given order, then body, then the whole document.
    /// Unparseable selectors are dropped (with a warning).
    pub fn from_selectors<S: AsRef<str>>(selectors: &[S]) -> Self {
        let strategies = selectors
            .iter()
            .filter_map(|css| CssScope::new(css.as_ref()))
            .map(|s| Box::new(s) as Box<dyn ScopeStrategy>)
            .collect();
        Self {
            strategies,
            fallbacks: vec![Box::new(BodyScope), Box::new(RootScope)],
        }
    }

    /// Add a strategy after the configured ones but before the fallbacks.
    pub fn push(&mut self, strategy: Box<dyn ScopeStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn names(&self) -> Vec<&str> {
        self.strategies
            .iter()
            .chain(self.fallbacks.iter())
            .map(|s| s.name())
            .collect()
    }

    /// The winning strategy's name and element.
    pub fn resolve<'a>(&self, doc: &'a Html) -> Option<(&str, ElementRef<'a>)> {
        for strategy in self.strategies.iter().chain(self.fallbacks.iter()) {
            match strategy.locate(doc) {
                Some(el) => return Some((strategy.name(), el)),
                None => logd!("Scope {:?} not found", strategy.name()),
            }
        }
        None
    }
}
