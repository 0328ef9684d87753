//! AI pulse check over a set of nearby updates.
//!
//! [`SummaryService::pulse_check`] never fails. Every problem degrades to a
//! fixed sentence so callers can show the result as-is.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::clients::Summarizer;
use crate::domain::{Coordinates, EpochMillis, Update};

/// Shown when no API key is configured.
pub const MISSING_KEY_TEXT: &str = "AI Pulse Check is unavailable (Missing API Key).";

/// Shown when there is nothing to summarize.
pub const QUIET_TEXT: &str = "It's quiet out there! No updates reported in your area recently.";

/// Shown when the model call fails.
pub const ERROR_TEXT: &str = "Temporary error contacting CityPulse AI.";

/// Shown when the model answers with no text.
pub const EMPTY_TEXT: &str = "Unable to analyze the current pulse.";

const SYSTEM_INSTRUCTION: &str = "You are CityPulse AI, a helpful urban assistant.
Your goal is to summarize a list of real-time city updates into a concise, actionable \"Pulse Check\" for a user.
- Focus on safety, major delays, and interesting events.
- Be brief (max 2-3 sentences).
- If there is high traffic or hazard, prioritize that.
- Tone: Professional, slightly informal, and urgent if necessary.";

/// Builds pulse-check summaries through a [`Summarizer`].
#[derive(Debug, Clone)]
pub struct SummaryService {
    summarizer: Arc<dyn Summarizer>,
}

impl SummaryService {
    /// Creates a service over the given summarizer.
    #[must_use]
    pub fn new(summarizer: Arc<dyn Summarizer>) -> Self {
        Self { summarizer }
    }

    /// Summarizes `updates` for a user at `user_location`.
    pub async fn pulse_check(
        &self,
        updates: &[Update],
        user_location: Option<Coordinates>,
        now: EpochMillis,
    ) -> String {
        if !self.summarizer.is_configured() {
            tracing::warn!("summary requested but no API key is configured");
            return MISSING_KEY_TEXT.to_string();
        }
        if updates.is_empty() {
            return QUIET_TEXT.to_string();
        }

        let prompt = build_prompt(updates, user_location, now);
        match self.summarizer.generate(SYSTEM_INSTRUCTION, &prompt).await {
            Ok(text) if text.trim().is_empty() => EMPTY_TEXT.to_string(),
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "summary call failed");
                ERROR_TEXT.to_string()
            }
        }
    }
}

/// Renders the user prompt: a location line and one line per update.
#[must_use]
pub fn build_prompt(
    updates: &[Update],
    user_location: Option<Coordinates>,
    now: EpochMillis,
) -> String {
    let mut prompt = match user_location {
        Some(loc) => format!("User is currently at Lat: {}, Lng: {}.\n", loc.lat, loc.lng),
        None => "User location is approximate.\n".to_string(),
    };
    prompt.push_str("\nCurrent nearby updates:\n");
    for update in updates {
        let _ = writeln!(
            prompt,
            "- [{}] {} (reported {} mins ago)",
            update.category.label(),
            update.description,
            update.minutes_ago(now)
        );
    }
    prompt.push_str("\nProvide a \"City Pulse\" summary.");
    prompt
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::domain::{Category, UpdateId};
    use crate::error::PulseError;

    const NOW: EpochMillis = 1_700_000_000_000;

    #[derive(Debug)]
    enum Stub {
        Unconfigured,
        Replies(&'static str),
        Fails,
    }

    #[async_trait]
    impl Summarizer for Stub {
        fn is_configured(&self) -> bool {
            !matches!(self, Self::Unconfigured)
        }

        async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, PulseError> {
            match self {
                Self::Replies(text) => Ok((*text).to_string()),
                Self::Fails => Err(PulseError::SummaryUnavailable("boom".to_string())),
                Self::Unconfigured => Err(PulseError::SummaryUnavailable("no key".to_string())),
            }
        }
    }

    fn update(category: Category, description: &str, minutes_ago: i64) -> Update {
        Update {
            id: UpdateId::new(),
            category,
            description: description.to_string(),
            location: Coordinates::new(40.7128, -74.0060),
            timestamp: NOW - minutes_ago * 60_000,
            expires_at: NOW + 3_600_000,
            likes: 0,
            author_id: None,
        }
    }

    async fn check(stub: Stub, updates: &[Update]) -> String {
        SummaryService::new(Arc::new(stub))
            .pulse_check(updates, None, NOW)
            .await
    }

    #[test]
    fn prompt_lists_updates_with_labels_and_age() {
        let updates = [
            update(Category::Issue, "Street light out", 15),
            update(Category::Neighborhood, "New bakery", 0),
        ];
        let prompt = build_prompt(&updates, Some(Coordinates::new(40.5, -74.25)), NOW);
        assert!(prompt.starts_with("User is currently at Lat: 40.5, Lng: -74.25."));
        assert!(prompt.contains("- [Issue/Hazard] Street light out (reported 15 mins ago)"));
        assert!(prompt.contains("- [News] New bakery (reported 0 mins ago)"));
    }

    #[test]
    fn prompt_without_location_says_approximate() {
        let prompt = build_prompt(&[], None, NOW);
        assert!(prompt.starts_with("User location is approximate."));
    }

    #[tokio::test]
    async fn unconfigured_returns_missing_key_text() {
        let updates = [update(Category::Traffic, "jam", 1)];
        assert_eq!(check(Stub::Unconfigured, &updates).await, MISSING_KEY_TEXT);
    }

    #[tokio::test]
    async fn no_updates_returns_quiet_text() {
        assert_eq!(check(Stub::Replies("unused"), &[]).await, QUIET_TEXT);
    }

    #[tokio::test]
    async fn failures_and_empty_replies_degrade() {
        let updates = [update(Category::Traffic, "jam", 1)];
        assert_eq!(check(Stub::Fails, &updates).await, ERROR_TEXT);
        assert_eq!(check(Stub::Replies("  "), &updates).await, EMPTY_TEXT);
    }

    #[tokio::test]
    async fn model_text_is_trimmed() {
        let updates = [update(Category::Traffic, "jam", 1)];
        let text = check(Stub::Replies(" Expect delays downtown.\n"), &updates).await;
        assert_eq!(text, "Expect delays downtown.");
    }
}
