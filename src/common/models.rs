use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PagedResponse<T> {
    items: Vec<T>,
    has_next: bool,
}

impl<T> PagedResponse<T> {
    /// Builds a page from a `page_size + 1` overfetch, dropping the probe row.
    pub fn from_overfetch(mut items: Vec<T>, page_size: usize) -> Self {
        let has_next = items.len() > page_size;
        items.truncate(page_size);
        Self { items, has_next }
    }
}
