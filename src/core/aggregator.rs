use crate::core::errors::ExchangeError;
use crate::core::types::{TimeWindow, TypesError, Uid, VolumeSummary};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Start of the all-time window when the registration time is unknown
pub fn history_floor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Day 1, 00:00:00 UTC of the month containing `instant`
pub fn start_of_month(instant: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(instant.year(), instant.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(instant)
}

/// Day 1, 00:00:00 UTC of the month before the one containing `instant`
pub fn start_of_previous_month(instant: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if instant.month() == 1 {
        (instant.year() - 1, 12)
    } else {
        (instant.year(), instant.month() - 1)
    };
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or(instant)
}

/// The three query windows, all derived from one `now` snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeWindows {
    pub total: TimeWindow,
    pub last_month: TimeWindow,
    pub current_month: TimeWindow,
}

impl VolumeWindows {
    /// A registration time after `now` (clock skew) is clamped to `now`.
    pub fn new(now: DateTime<Utc>, register_time: DateTime<Utc>) -> Result<Self, TypesError> {
        let current_month_start = start_of_month(now);
        let last_month_start = start_of_previous_month(now);

        Ok(Self {
            total: TimeWindow::new(register_time.min(now), now)?,
            last_month: TimeWindow::new(last_month_start, current_month_start)?,
            current_month: TimeWindow::new(current_month_start, now)?,
        })
    }
}

/// What to do when one window's query fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowErrorPolicy {
    /// Fail the whole aggregation
    Propagate,
    /// Log and count the window as zero
    ZeroFill,
}

/// One exchange's volume query for a single window
#[async_trait]
pub trait VolumeQuery: Send + Sync {
    /// Summed trade volume of `uid` inside `window`
    async fn window_volume(
        &self,
        uid: &Uid,
        window: &TimeWindow,
    ) -> Result<Decimal, ExchangeError>;
}

/// Issue the three window queries sequentially and collect the sums
pub async fn aggregate_volumes<Q: VolumeQuery + ?Sized>(
    query: &Q,
    uid: &Uid,
    windows: &VolumeWindows,
    policy: WindowErrorPolicy,
) -> Result<VolumeSummary, ExchangeError> {
    let total_volume = query_window(query, uid, "total", &windows.total, policy).await?;
    let last_month_volume =
        query_window(query, uid, "last_month", &windows.last_month, policy).await?;
    let current_month_volume =
        query_window(query, uid, "current_month", &windows.current_month, policy).await?;

    Ok(VolumeSummary {
        total_volume,
        last_month_volume,
        current_month_volume,
    })
}

async fn query_window<Q: VolumeQuery + ?Sized>(
    query: &Q,
    uid: &Uid,
    label: &str,
    window: &TimeWindow,
    policy: WindowErrorPolicy,
) -> Result<Decimal, ExchangeError> {
    match query.window_volume(uid, window).await {
        Ok(volume) => {
            debug!(uid = %uid, window = label, %volume, "window volume");
            Ok(volume.max(Decimal::ZERO))
        }
        Err(e) if policy == WindowErrorPolicy::ZeroFill => {
            warn!(
                uid = %uid,
                window = label,
                error = %e,
                "volume query failed, counting window as zero"
            );
            Ok(Decimal::ZERO)
        }
        Err(e) => Err(e),
    }
}
