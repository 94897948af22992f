use std::fmt;

/// A predicate over tag names.  Deliberately agnostic of any pattern
/// syntax; callers adapt whatever matcher they have into one of these.
pub struct TagFilter(Box<dyn Fn(&str) -> bool + Send + Sync>);

impl TagFilter {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self(Box::new(f))
    }

    /// Accepts every name, including the empty one.
    pub fn any() -> Self {
        Self::new(|_| true)
    }

    pub fn matches(&self, name: &str) -> bool {
        (self.0)(name)
    }
}

/// Accepts only non-empty names.
impl Default for TagFilter {
    fn default() -> Self {
        Self::new(|name| !name.is_empty())
    }
}

impl fmt::Debug for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TagFilter(..)")
    }
}
