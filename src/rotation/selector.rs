//! Template selection under a rotation mode.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Local, Timelike};

use crate::config::schema::Templates;
use crate::rotation::RotationMode;

/// The template picked for the current rotation period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationState {
    pub name: String,
    pub changed_at: DateTime<Local>,
}

/// Resolves the template name for HTML requests.
///
/// Only the hourly and daily modes keep state. It is swapped in with a
/// compare-and-swap against the value the boundary check was made on: the
/// loser of a race adopts the winner's pick, and an older timestamp can never
/// replace a newer one.
#[derive(Debug, Default)]
pub struct TemplateRotator {
    state: ArcSwapOption<RotationState>,
}

impl TemplateRotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Template name to use for a request arriving now.
    pub fn pick(&self, mode: RotationMode, configured: &str, templates: &Templates) -> String {
        self.pick_at(mode, configured, templates, Local::now())
    }

    /// Template name to use for a request arriving at `now`.
    pub fn pick_at(
        &self,
        mode: RotationMode,
        configured: &str,
        templates: &Templates,
        now: DateTime<Local>,
    ) -> String {
        let period = match mode {
            RotationMode::Disabled | RotationMode::RandomOnStartup => return configured.to_string(),
            RotationMode::RandomOnEachRequest => {
                return templates.random_name().unwrap_or(configured).to_string();
            }
            RotationMode::RandomHourly => Period::Hour,
            RotationMode::RandomDaily => Period::Day,
        };

        let current = self.state.load();
        if let Some(state) = (*current).as_ref() {
            if !(now > state.changed_at && period.crossed(state.changed_at, now)) {
                return state.name.clone();
            }
        }

        let fresh = Arc::new(RotationState {
            name: templates.random_name().unwrap_or(configured).to_string(),
            changed_at: now,
        });
        let previous = self.state.compare_and_swap(&current, Some(Arc::clone(&fresh)));

        match ((*previous).as_ref(), (*current).as_ref()) {
            (Some(prev), Some(cur)) if !Arc::ptr_eq(prev, cur) => prev.name.clone(),
            (Some(prev), None) => prev.name.clone(),
            _ => {
                tracing::debug!(template = %fresh.name, mode = ?mode, "Rotated HTML template");
                fresh.name.clone()
            }
        }
    }

    /// Snapshot of the rotation state, if a time-based mode has run.
    pub fn state(&self) -> Option<Arc<RotationState>> {
        self.state.load_full()
    }
}

#[derive(Debug, Clone, Copy)]
enum Period {
    Hour,
    Day,
}

impl Period {
    fn crossed(self, then: DateTime<Local>, now: DateTime<Local>) -> bool {
        match self {
            Period::Hour => then.date_naive() != now.date_naive() || then.hour() != now.hour(),
            Period::Day => then.date_naive() != now.date_naive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use std::collections::{BTreeMap, HashSet};
    use std::thread;

    fn templates(names: &[&str]) -> Templates {
        Templates::from(
            names
                .iter()
                .map(|n| (n.to_string(), format!("<p>{}</p>", n)))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Local> {
        let naive = NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap();
        Local.from_local_datetime(&naive).earliest().unwrap()
    }

    #[test]
    fn test_disabled_and_startup_use_configured() {
        let rotator = TemplateRotator::new();
        let set = templates(&["a", "b", "c"]);

        for _ in 0..20 {
            assert_eq!(rotator.pick(RotationMode::Disabled, "b", &set), "b");
            assert_eq!(rotator.pick(RotationMode::RandomOnStartup, "c", &set), "c");
        }
        assert!(rotator.state().is_none());
    }

    #[test]
    fn test_random_on_each_request() {
        let rotator = TemplateRotator::new();
        let set = templates(&["a", "b", "c"]);

        let seen: HashSet<String> = (0..1000)
            .map(|_| rotator.pick(RotationMode::RandomOnEachRequest, "a", &set))
            .collect();

        assert!(seen.iter().all(|n| set.get(n).is_some()));
        assert!(seen.len() > 1);
        assert!(rotator.state().is_none());
    }

    #[test]
    fn test_random_with_empty_set_falls_back() {
        let rotator = TemplateRotator::new();
        let set = templates(&[]);
        assert_eq!(rotator.pick(RotationMode::RandomOnEachRequest, "ghost", &set), "ghost");
        assert_eq!(rotator.pick(RotationMode::RandomHourly, "ghost", &set), "ghost");
    }

    #[test]
    fn test_hourly_is_stable_within_hour() {
        let rotator = TemplateRotator::new();
        let set = templates(&["a", "b", "c", "d"]);

        let first = rotator.pick_at(RotationMode::RandomHourly, "a", &set, at(15, 10, 5));
        let state = rotator.state().unwrap();
        assert_eq!(state.name, first);
        assert_eq!(state.changed_at, at(15, 10, 5));

        for minute in [6, 30, 59] {
            assert_eq!(
                rotator.pick_at(RotationMode::RandomHourly, "a", &set, at(15, 10, minute)),
                first
            );
        }
        assert_eq!(rotator.state().unwrap().changed_at, at(15, 10, 5));
    }

    #[test]
    fn test_hourly_rotates_after_boundary() {
        let rotator = TemplateRotator::new();
        let set = templates(&["a", "b", "c", "d"]);

        rotator.pick_at(RotationMode::RandomHourly, "a", &set, at(15, 10, 5));
        let next = rotator.pick_at(RotationMode::RandomHourly, "a", &set, at(15, 11, 0));

        let state = rotator.state().unwrap();
        assert_eq!(state.changed_at, at(15, 11, 0));
        assert_eq!(state.name, next);
        assert!(set.get(&next).is_some());

        // Same hour on another day is a new period too
        rotator.pick_at(RotationMode::RandomHourly, "a", &set, at(16, 11, 0));
        assert_eq!(rotator.state().unwrap().changed_at, at(16, 11, 0));
    }

    #[test]
    fn test_daily_rotation() {
        let rotator = TemplateRotator::new();
        let set = templates(&["a", "b", "c"]);

        let first = rotator.pick_at(RotationMode::RandomDaily, "a", &set, at(15, 0, 1));
        assert_eq!(rotator.pick_at(RotationMode::RandomDaily, "a", &set, at(15, 23, 59)), first);
        assert_eq!(rotator.state().unwrap().changed_at, at(15, 0, 1));

        rotator.pick_at(RotationMode::RandomDaily, "a", &set, at(16, 0, 0));
        assert_eq!(rotator.state().unwrap().changed_at, at(16, 0, 0));
    }

    #[test]
    fn test_stale_clock_never_moves_state_back() {
        let rotator = TemplateRotator::new();
        let set = templates(&["a", "b", "c"]);

        let current = rotator.pick_at(RotationMode::RandomHourly, "a", &set, at(15, 11, 0));
        // A request that read the clock before the rotation happened
        assert_eq!(rotator.pick_at(RotationMode::RandomHourly, "a", &set, at(15, 10, 59)), current);
        assert_eq!(rotator.state().unwrap().changed_at, at(15, 11, 0));
    }

    #[test]
    fn test_concurrent_callers_agree() {
        let rotator = std::sync::Arc::new(TemplateRotator::new());
        let set = std::sync::Arc::new(templates(&["a", "b", "c", "d", "e"]));
        let now = at(15, 12, 0);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let rotator = rotator.clone();
                let set = set.clone();
                thread::spawn(move || rotator.pick_at(RotationMode::RandomHourly, "a", &set, now))
            })
            .collect();
        let picks: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let state = rotator.state().unwrap();
        assert!(picks.iter().all(|p| *p == state.name));
        assert_eq!(state.changed_at, now);
    }
}
