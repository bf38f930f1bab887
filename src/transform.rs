use std::collections::{BTreeSet, HashSet};

use chrono_tz::Tz;
use tracing::debug;

use crate::event::Event;

/// What to keep and which zone to pin the kept events to.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub target_timezone: Tz,
    /// Matched case-insensitively as substrings of the event name. An empty
    /// set keeps nothing.
    pub inclusion_patterns: BTreeSet<String>,
    pub collapse_duplicates: bool,
}

impl FilterConfig {
    pub fn new<I, S>(target_timezone: Tz, patterns: I) -> FilterConfig
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterConfig {
            target_timezone,
            inclusion_patterns: patterns.into_iter().map(Into::into).collect(),
            collapse_duplicates: true,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct FilterOutcome {
    pub events: Vec<Event>,
    pub total: usize,
    pub kept: usize,
    pub duplicates: usize,
}

pub fn filter_events(events: Vec<Event>, config: &FilterConfig) -> FilterOutcome {
    let patterns: Vec<String> = config
        .inclusion_patterns
        .iter()
        .map(|p| p.to_lowercase())
        .collect();

    let total = events.len();
    let mut kept: Vec<Event> = Vec::new();
    let mut seen: HashSet<Event> = HashSet::new();
    let mut duplicates = 0;

    for mut event in events {
        event.relabel(config.target_timezone);

        if !matches_any(event.name_or_empty(), &patterns) {
            debug!(name = event.name_or_empty(), "dropping event");
            continue;
        }
        if config.collapse_duplicates && !seen.insert(event.clone()) {
            debug!(name = event.name_or_empty(), "dropping duplicate event");
            duplicates += 1;
            continue;
        }
        kept.push(event);
    }

    FilterOutcome {
        total,
        kept: kept.len(),
        events: kept,
        duplicates,
    }
}

/// `patterns` must already be lowercase.
fn matches_any(name: &str, patterns: &[String]) -> bool {
    let name = name.to_lowercase();
    patterns.iter().any(|pattern| name.contains(pattern.as_str()))
}
