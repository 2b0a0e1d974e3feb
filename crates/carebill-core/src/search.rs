//! In-memory list filtering for registry screens.
//!
//! Every list endpoint accepts a free-text `q`; an item matches when any of
//! its searchable fields contains the query, case-insensitively.

pub trait Searchable {
    /// The display fields a search string is matched against.
    fn search_fields(&self) -> Vec<String>;
}

pub fn matches<T: Searchable + ?Sized>(item: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Keep only the items matching `query`. `None` or a blank query keeps everything.
pub fn filter<T: Searchable>(items: Vec<T>, query: Option<&str>) -> Vec<T> {
    match query {
        Some(q) if !q.trim().is_empty() => items.into_iter().filter(|i| matches(i, q)).collect(),
        _ => items,
    }
}
