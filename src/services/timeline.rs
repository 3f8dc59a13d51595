use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use crate::models::{ActivityRecord, ApplianceRegistry};

/// Phrase that marks a switch-on entry; anything else reads as off.
const TURNED_ON_PHRASE: &str = "Turned on";

/// Generic token some log entries carry instead of a concrete appliance
/// name. Those entries are attributed to "AC 1". This is a quirk of the
/// activity feed, not a pattern to extend to other appliance families.
const AIRCON_TOKEN: &str = "Aircon";
const AIRCON_FALLBACK: &str = "AC 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    On,
    Off,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SwitchState,
    pub at: DateTime<Utc>,
}

/// Per-appliance transition sequences, each sorted by timestamp
/// ascending (stable, so entries with equal timestamps keep feed order).
#[derive(Debug, Default)]
pub struct ApplianceTimelines {
    timelines: HashMap<String, Vec<Transition>>,
}

impl ApplianceTimelines {
    pub fn transitions_for(&self, appliance: &str) -> &[Transition] {
        self.timelines
            .get(appliance)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.timelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty()
    }
}

/// Build per-appliance timelines from the raw activity feed.
///
/// Entries missing a field or carrying an unparseable timestamp are
/// dropped, consistent with the malformed-record policy for the power
/// feed. Entries matching no registered appliance are ignored. No
/// deduplication and no on/off alternation check; the resolver takes the
/// latest transition at or before the query instant.
pub fn build_timelines(
    registry: &ApplianceRegistry,
    events: &[ActivityRecord],
) -> ApplianceTimelines {
    let mut timelines: HashMap<String, Vec<Transition>> = HashMap::new();

    for event in events {
        let (Some(raw_ts), Some(action)) = (event.timestamp.as_deref(), event.action.as_deref())
        else {
            continue;
        };

        let Some(at) = parse_feed_timestamp(raw_ts) else {
            debug!(timestamp = raw_ts, "dropping activity entry with unparseable timestamp");
            continue;
        };

        let Some(appliance) = match_appliance(registry, action) else {
            continue;
        };

        let state = if action.contains(TURNED_ON_PHRASE) {
            SwitchState::On
        } else {
            SwitchState::Off
        };

        timelines
            .entry(appliance.to_string())
            .or_default()
            .push(Transition { state, at });
    }

    for transitions in timelines.values_mut() {
        transitions.sort_by_key(|t| t.at);
    }

    ApplianceTimelines { timelines }
}

/// State of one appliance at `at`: the latest transition at or before
/// that instant, `None` when the appliance was never observed.
pub fn state_at(transitions: &[Transition], at: DateTime<Utc>) -> Option<SwitchState> {
    let mut current = None;
    for transition in transitions {
        if transition.at <= at {
            current = Some(transition.state);
        } else {
            break;
        }
    }
    current
}

/// First registry name (in registry order) appearing as a substring of
/// the action text. Registry order is the documented tie-break for
/// overlapping names. Falls back to "AC 1" for generic "Aircon" entries,
/// provided "AC 1" is actually registered so wattage lookup stays total.
fn match_appliance<'a>(registry: &'a ApplianceRegistry, action: &str) -> Option<&'a str> {
    for name in registry.names() {
        if action.contains(name) {
            return Some(name);
        }
    }

    if action.contains(AIRCON_TOKEN) {
        return registry.names().find(|name| *name == AIRCON_FALLBACK);
    }

    None
}

/// Feed timestamps are ISO-8601, usually "Z"-suffixed UTC. Offset-less
/// values are taken as UTC.
pub(crate) fn parse_feed_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
