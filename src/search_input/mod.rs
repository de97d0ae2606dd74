//! Search field that reports its text upward on every change

/// Placeholder shown while the field is empty
pub const PLACEHOLDER: &str = "Search product...";

type OnSearch = Box<dyn Fn(&str) + Send + Sync>;

/// Stateless text input. Every change is forwarded verbatim to `on_search`,
/// without debouncing or validation.
pub struct SearchInput {
    on_search: OnSearch,
}

impl SearchInput {
    pub fn new(on_search: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            on_search: Box::new(on_search),
        }
    }

    /// Reports the field's current text
    pub fn change(&self, text: &str) {
        (self.on_search)(text);
    }

    pub fn placeholder(&self) -> &'static str {
        PLACEHOLDER
    }
}
