//! Background task that periodically settles booking lifecycles.
//!
//! Runs in a tokio::spawn loop: converts confirmed bookings whose check-in
//! window has elapsed into no-shows (with penalties), and arrived bookings
//! past their end into completed. May run concurrently with check-in
//! attempts; both sides go through guarded status transitions, so exactly
//! one wins.

use std::sync::Arc;

use tokio::time::Duration;
use tracing::{info, warn};

use super::attendance::AttendanceService;
use crate::shared::ShutdownSignal;

/// Start the booking sweep background task.
///
/// The task runs every `interval_secs` (default 60) until shutdown.
pub fn start_booking_sweep_task(
    attendance: Arc<AttendanceService>,
    shutdown: ShutdownSignal,
    interval_secs: u64,
) {
    tokio::spawn(async move {
        info!(interval = interval_secs, "Booking sweep task started");

        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    run_sweep(&attendance).await;
                }
                _ = shutdown.notified().wait() => {
                    info!("Booking sweep task shutting down");
                    break;
                }
            }
        }

        info!("Booking sweep task stopped");
    });
}

async fn run_sweep(attendance: &Arc<AttendanceService>) {
    match attendance.assess_no_shows().await {
        Ok(n) if n > 0 => info!(count = n, "Assessed no-shows"),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "No-show sweep error"),
    }

    match attendance.complete_finished().await {
        Ok(n) if n > 0 => info!(count = n, "Completed finished bookings"),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Completion sweep error"),
    }
}
