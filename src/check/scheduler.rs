//! Check scheduling: the startup check and the recurring background loop

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, Local, NaiveTime};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::info;

use crate::check::coordinator::CheckCoordinator;
use crate::config::{Recurrence, UpdateConfig};

/// How check cycles are driven, fixed once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Never runs.
    Disabled,
    /// Exactly one check, synchronously during startup.
    SingleShot,
    /// One immediate check, then repeats on the given cadence forever.
    Recurring(Cadence),
}

/// Delay policy between recurring cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Anchored to the next local midnight after each completed cycle.
    Daily,
    /// A fixed delay after each completed cycle, no midnight anchoring.
    Interval(Duration),
}

impl Schedule {
    /// Derives the schedule from validated configuration.
    ///
    /// A recurring schedule always starts with an immediate check;
    /// `check_at_startup` only matters when recurrence is disabled.
    pub fn from_config(config: &UpdateConfig) -> Self {
        match config.recurrence {
            Recurrence::Daily => Schedule::Recurring(Cadence::Daily),
            Recurrence::EveryNSeconds(secs) => {
                Schedule::Recurring(Cadence::Interval(Duration::from_secs(secs)))
            }
            Recurrence::Disabled if config.check_at_startup => Schedule::SingleShot,
            Recurrence::Disabled => Schedule::Disabled,
        }
    }
}

impl Cadence {
    /// Delay until the next cycle, measured from the end of the current one.
    fn next_delay(&self, now: DateTime<Local>) -> Duration {
        match self {
            Cadence::Interval(interval) => *interval,
            Cadence::Daily => until_next_midnight(now),
        }
    }
}

fn until_next_midnight(now: DateTime<Local>) -> Duration {
    let midnight = (now.date_naive() + Days::new(1)).and_time(NaiveTime::MIN);
    match midnight.and_local_timezone(Local).earliest() {
        Some(next) => (next - now).to_std().unwrap_or(Duration::ZERO),
        // midnight does not exist in this offset (DST gap); run a day later
        None => Duration::from_secs(24 * 60 * 60),
    }
}

/// Starts the configured schedule.
///
/// `SingleShot` completes its check before returning. `Recurring` spawns the
/// loop as a background task and returns its handle without blocking the
/// caller; the loop treats failed cycles as completed and never terminates on
/// its own.
pub async fn start(schedule: Schedule, coordinator: Arc<CheckCoordinator>) -> Option<JoinHandle<()>> {
    match schedule {
        Schedule::Disabled => None,
        Schedule::SingleShot => {
            coordinator.run_check().await;
            None
        }
        Schedule::Recurring(cadence) => Some(tokio::spawn(run_loop(cadence, coordinator))),
    }
}

async fn run_loop(cadence: Cadence, coordinator: Arc<CheckCoordinator>) {
    loop {
        coordinator.run_check().await;

        let delay = cadence.next_delay(Local::now());
        info!(delay_secs = delay.as_secs(), "next version check scheduled");
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::error::SourceError;
    use crate::check::source::MockVersionSource;
    use crate::check::state::Notifications;
    use crate::check::types::{CheckOutcome, VersionInfo};
    use crate::config::SourceChannel;
    use chrono::{TimeZone, Timelike};
    use rstest::rstest;

    fn config(check_at_startup: bool, recurrence: Recurrence) -> UpdateConfig {
        UpdateConfig {
            check_at_startup,
            recurrence,
            source_channel: SourceChannel::Registry,
            private_server_url: None,
            force_banner: false,
            project_identifier: "acme/wiki".to_string(),
            stable_branch_name: "master".to_string(),
            running_version: "1.0.0".to_string(),
        }
    }

    #[rstest]
    #[case(false, Recurrence::Disabled, Schedule::Disabled)]
    #[case(true, Recurrence::Disabled, Schedule::SingleShot)]
    #[case(false, Recurrence::Daily, Schedule::Recurring(Cadence::Daily))]
    #[case(true, Recurrence::Daily, Schedule::Recurring(Cadence::Daily))]
    #[case(
        false,
        Recurrence::EveryNSeconds(14_400),
        Schedule::Recurring(Cadence::Interval(Duration::from_secs(14_400)))
    )]
    fn schedule_derivation(
        #[case] check_at_startup: bool,
        #[case] recurrence: Recurrence,
        #[case] expected: Schedule,
    ) {
        assert_eq!(
            Schedule::from_config(&config(check_at_startup, recurrence)),
            expected
        );
    }

    #[test]
    fn interval_cadence_is_a_pure_fixed_delay() {
        let cadence = Cadence::Interval(Duration::from_secs(14_400));
        let late_evening = Local.with_ymd_and_hms(2025, 6, 1, 23, 50, 0).unwrap();

        // no midnight truncation: 4 hours from 23:50 is 03:50, not 00:00
        assert_eq!(
            cadence.next_delay(late_evening),
            Duration::from_secs(14_400)
        );
    }

    #[test]
    fn daily_cadence_lands_on_next_midnight() {
        let now = Local.with_ymd_and_hms(2025, 6, 1, 22, 15, 30).unwrap();
        let delay = Cadence::Daily.next_delay(now);

        assert!(delay > Duration::ZERO);
        assert!(delay <= Duration::from_secs(24 * 60 * 60));

        let fire = now + chrono::TimeDelta::from_std(delay).unwrap();
        assert_eq!(fire.hour(), 0);
        assert_eq!(fire.minute(), 0);
        assert_eq!(fire.second(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn recurring_loop_keeps_cycle_spacing_and_survives_failures() {
        let starts = Arc::new(std::sync::Mutex::new(Vec::new()));

        let mut source = MockVersionSource::new();
        source.expect_channel().return_const("registry");
        let recorded = starts.clone();
        source.expect_fetch().returning(move || {
            recorded.lock().unwrap().push(tokio::time::Instant::now());
            Err(SourceError::Status(reqwest::StatusCode::BAD_GATEWAY))
        });

        let coordinator = Arc::new(CheckCoordinator::new(
            Arc::new(source),
            Notifications::new("1.0.0"),
            "1.0.0",
            false,
        ));

        let interval = Duration::from_secs(14_400);
        let handle = start(
            Schedule::Recurring(Cadence::Interval(interval)),
            coordinator,
        )
        .await
        .unwrap();

        // Paused clock auto-advances whenever every task is idle, so three
        // failed cycles complete almost instantly in wall time.
        while starts.lock().unwrap().len() < 3 {
            sleep(Duration::from_secs(60)).await;
        }
        handle.abort();

        let starts = starts.lock().unwrap();
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= interval);
        }
    }

    #[tokio::test]
    async fn disabled_schedule_never_fetches() {
        let mut source = MockVersionSource::new();
        source.expect_channel().return_const("registry");
        source.expect_fetch().times(0);

        let coordinator = Arc::new(CheckCoordinator::new(
            Arc::new(source),
            Notifications::new("1.0.0"),
            "1.0.0",
            false,
        ));

        assert!(start(Schedule::Disabled, coordinator).await.is_none());
    }

    #[tokio::test]
    async fn single_shot_runs_exactly_one_check_before_returning() {
        let mut source = MockVersionSource::new();
        source.expect_channel().return_const("registry");
        source
            .expect_fetch()
            .times(1)
            .returning(|| Ok(CheckOutcome::ok("nothing published", VersionInfo::default())));

        let coordinator = Arc::new(CheckCoordinator::new(
            Arc::new(source),
            Notifications::new("1.0.0"),
            "1.0.0",
            false,
        ));

        assert!(start(Schedule::SingleShot, coordinator).await.is_none());
    }
}
