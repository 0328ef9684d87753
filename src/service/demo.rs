//! Anonymous demo updates around New York for empty installs.

use crate::domain::{Category, Coordinates, EpochMillis, Update, UpdateId};

const MINUTE: i64 = 60_000;
const HOUR: i64 = 60 * MINUTE;

/// Three demo updates relative to `now`: traffic, an event, and an issue.
#[must_use]
pub fn demo_updates(now: EpochMillis) -> Vec<Update> {
    vec![
        Update {
            id: UpdateId::new(),
            category: Category::Traffic,
            description: "Heavy congestion due to road work on 5th Avenue.".to_string(),
            location: Coordinates::new(40.7128, -74.0060),
            timestamp: now - 5 * MINUTE,
            expires_at: now + HOUR,
            likes: 12,
            author_id: None,
        },
        Update {
            id: UpdateId::new(),
            category: Category::Event,
            description: "Pop-up farmers market near the central park entrance.".to_string(),
            location: Coordinates::new(40.7138, -74.0050),
            timestamp: now - 30 * MINUTE,
            expires_at: now + 2 * HOUR,
            likes: 45,
            author_id: None,
        },
        Update {
            id: UpdateId::new(),
            category: Category::Issue,
            description: "Street light malfunction at the intersection.".to_string(),
            location: Coordinates::new(40.7118, -74.0070),
            timestamp: now - 15 * MINUTE,
            expires_at: now + HOUR,
            likes: 3,
            author_id: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeedQuery, select_feed};

    #[test]
    fn demo_data_is_active_and_nearby() {
        let now = 1_700_000_000_000;
        let updates = demo_updates(now);
        let feed = select_feed(&updates, &FeedQuery::around(Coordinates::new(40.7128, -74.0060), now));
        let categories: Vec<Category> = feed.iter().map(|u| u.category).collect();
        assert_eq!(
            categories,
            vec![Category::Traffic, Category::Issue, Category::Event]
        );
        assert!(updates.iter().all(|u| u.expires_at > u.timestamp));
    }
}
