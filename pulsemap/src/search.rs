//! Free text filtering of the feed.

use chrono::{DateTime, Utc};
use pulsemap_types::FeedItem;

/// Returns the items matching the query.
///
/// An item matches if its disease name, location, title or source name contains the query,
/// ignoring case. An empty query returns all items.
pub fn filter_feed<'a>(items: &'a [FeedItem], query: &str) -> Vec<&'a FeedItem> {
    if query.is_empty() {
        return items.iter().collect();
    }

    let query = query.to_lowercase();
    items
        .iter()
        .filter(|item| item_matches(item, &query))
        .collect()
}

fn item_matches(item: &FeedItem, lowercase_query: &str) -> bool {
    [
        &item.disease_name,
        &item.location,
        &item.title,
        &item.source_name,
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(lowercase_query))
}

/// Current search query of the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSearch {
    query: String,
    lowercase: String,
}

impl FeedSearch {
    /// Creates a search with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        let query = query.into();
        Self {
            lowercase: query.to_lowercase(),
            query,
        }
    }

    /// The query as typed.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// True if no filtering is applied.
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// Whether the item passes the filter.
    pub fn matches(&self, item: &FeedItem) -> bool {
        self.is_empty() || item_matches(item, &self.lowercase)
    }

    /// Returns the items passing the filter.
    pub fn apply<'a>(&self, items: &'a [FeedItem]) -> Vec<&'a FeedItem> {
        filter_feed(items, &self.query)
    }
}

/// Short relative age of a feed item, as shown in the feed list.
pub fn relative_time(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(published_at) = published_at else {
        return "Unknown".to_string();
    };

    let hours = (now - published_at).num_hours();
    let days = hours.div_euclid(24);
    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        published_at.format("%Y-%m-%d").to_string()
    }
}
