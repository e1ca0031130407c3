use super::errors::{FetchError, FetchResult};
use super::models::MenuItem;

/// Anything that can produce the full set of active menu items.
///
/// The call is all-or-nothing: either every active item is returned or the
/// whole fetch fails. No ordering is implied.
pub trait ItemSource: Send + Sync {
    fn fetch_active_items(&self) -> FetchResult<Vec<MenuItem>>;
}

/// An in-memory source returning a canned list or a canned failure.
#[derive(Debug, Clone)]
pub struct StaticItemSource {
    result: FetchResult<Vec<MenuItem>>,
}

impl StaticItemSource {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { result: Ok(items) }
    }

    pub fn failing(error: FetchError) -> Self {
        Self { result: Err(error) }
    }
}

impl ItemSource for StaticItemSource {
    fn fetch_active_items(&self) -> FetchResult<Vec<MenuItem>> {
        self.result
            .clone()
            .map(|items| items.into_iter().filter(|item| item.is_active).collect())
    }
}
