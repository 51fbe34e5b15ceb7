//! Dismissible countdown banner.
//!
//! [`BannerController`] is what the page mounts: it reads the persisted
//! hidden-until timestamp once, then answers "what should the banner show
//! at `now`?" on every tick by combining the dismissal state with
//! [`resolve_banner`].

use log::{debug, info, warn};
use serde::Serialize;

use super::countdown::format_countdown;
use super::phase::{resolve_banner, BannerDecision, BannerLabels, SuppressReason};
use crate::config::BannerSettings;
use crate::db::KeyValueStore;
use crate::error::PortalResult;
use crate::models::{FixedOffsetZone, Schedule, UtcMillis};

/// Reads and writes the hidden-until timestamp.
pub struct DismissalTracker<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> DismissalTracker<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored hidden-until value.
    ///
    /// Store failures and unparseable values are logged and read as "never
    /// dismissed"; a broken store must not keep the banner from rendering.
    pub fn hidden_until(&self) -> Option<UtcMillis> {
        let raw = match self.store.get(&self.key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read banner dismissal state: {}", e);
                return None;
            }
        };

        match raw.trim().parse::<i64>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring unparseable dismissal value {:?} under {}", raw, self.key);
                None
            }
        }
    }

    /// Record a dismissal lasting `duration_millis` from `now`.
    pub fn dismiss(&self, now: UtcMillis, duration_millis: i64) -> PortalResult<UtcMillis> {
        let hidden_until = now.saturating_add(duration_millis);
        self.store
            .set(&self.key, &hidden_until.to_string())
            .map_err(|e| e.with_operation("dismiss_banner"))?;
        Ok(hidden_until)
    }
}

/// Whether a stored hidden-until value still applies at `now`.
pub fn is_hidden(hidden_until: Option<UtcMillis>, now: UtcMillis) -> bool {
    matches!(hidden_until, Some(until) if until > now)
}

/// One rendered tick of the banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BannerFrame {
    pub now: UtcMillis,
    pub decision: BannerDecision,
    /// `HH:MM:SS` until the target, present only when the banner renders
    pub countdown: Option<String>,
}

impl BannerFrame {
    /// The banner will not show again during this period (or this mount).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.decision,
            BannerDecision::Suppress(
                SuppressReason::Dismissed
                    | SuppressReason::PeriodOver
                    | SuppressReason::FinalWindowClosed
                    | SuppressReason::EmptySchedule
            )
        )
    }
}

pub struct BannerController<S> {
    schedule: Schedule,
    zone: FixedOffsetZone,
    labels: BannerLabels,
    dismiss_millis: i64,
    tracker: DismissalTracker<S>,
    hidden_until: Option<UtcMillis>,
}

impl<S: KeyValueStore> BannerController<S> {
    /// Mount the banner with settings from the config file.
    pub fn mount(schedule: Schedule, settings: &BannerSettings, store: S) -> PortalResult<Self> {
        Ok(Self::new(
            schedule,
            settings.zone()?,
            settings.labels.clone(),
            settings.dismiss_duration_millis(),
            DismissalTracker::new(store, settings.storage_key.clone()),
        ))
    }

    pub fn new(
        schedule: Schedule,
        zone: FixedOffsetZone,
        labels: BannerLabels,
        dismiss_millis: i64,
        tracker: DismissalTracker<S>,
    ) -> Self {
        let hidden_until = tracker.hidden_until();
        debug!(
            "Banner mounted: {} windows ({} malformed), hidden_until={:?}",
            schedule.len(),
            schedule.malformed_count(),
            hidden_until
        );
        if !schedule.is_strictly_increasing() {
            warn!("Banner schedule dates are not strictly increasing");
        }

        Self {
            schedule,
            zone,
            labels,
            dismiss_millis,
            tracker,
            hidden_until,
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn hidden_until(&self) -> Option<UtcMillis> {
        self.hidden_until
    }

    pub fn decision(&self, now: UtcMillis) -> BannerDecision {
        if is_hidden(self.hidden_until, now) {
            return BannerDecision::Suppress(SuppressReason::Dismissed);
        }
        resolve_banner(&self.schedule, &self.zone, &self.labels, now)
    }

    pub fn frame(&self, now: UtcMillis) -> BannerFrame {
        let decision = self.decision(now);
        let countdown = decision
            .state()
            .map(|state| format_countdown(state.target_timestamp, now));
        BannerFrame {
            now,
            decision,
            countdown,
        }
    }

    /// Hide the banner for the configured duration.
    pub fn dismiss(&mut self, now: UtcMillis) -> PortalResult<UtcMillis> {
        let hidden_until = self.tracker.dismiss(now, self.dismiss_millis)?;
        info!("Banner dismissed until {} ({})", hidden_until, self.tracker.key());
        self.hidden_until = Some(hidden_until);
        Ok(hidden_until)
    }
}
