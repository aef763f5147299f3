//! Cache key layout.

/// Search results for one query variant. Variants differing only by case share a key.
#[must_use]
pub fn search(variant: &str) -> String {
    format!("search:{}", variant.to_lowercase())
}

#[must_use]
pub fn profile(id: &str) -> String {
    format!("profile:{id}")
}

#[must_use]
pub fn strength(id: &str) -> String {
    format!("strength:{id}")
}

#[must_use]
pub fn history(id: &str) -> String {
    format!("history:{id}")
}
