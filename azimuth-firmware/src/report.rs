//! Cycle report logging

use azimuth_core::scheduler::{ChannelOutcome, CycleReport, CycleStats};
use azimuth_display::RedrawOutcome;
use defmt::*;

/// Log what one poll cycle did
pub fn log_cycle(report: &CycleReport) {
    for entry in &report.channels {
        let channel = entry.channel.as_str();
        match &entry.outcome {
            ChannelOutcome::Idle => {}
            ChannelOutcome::Accepted {
                node,
                reading,
                mismatched,
            } => {
                debug!(
                    "Received {}: bearing={}° amp={}dB",
                    node.as_str(),
                    reading.bearing_deg(),
                    reading.amplitude_db()
                );
                if *mismatched {
                    warn!("{} line arrived on the {} channel", node.as_str(), channel);
                }
            }
            ChannelOutcome::Ignored => trace!("{}: non-reading line ignored", channel),
            ChannelOutcome::Rejected(e) => warn!("{}: line rejected: {}", channel, e),
            ChannelOutcome::Dropped(e) => error!("{}: reading dropped: {}", channel, e),
            ChannelOutcome::Fault(e) => warn!("{}: UART fault: {}", channel, e),
        }
    }

    match report.redraw {
        Ok(RedrawOutcome::Repainted { bearing, color }) => {
            info!("Arrow -> {}° ({})", bearing, color)
        }
        Ok(_) => {}
        Err(e) => warn!("Repaint failed, will retry: {}", e),
    }
}

/// Periodic summary of the running counters
pub fn log_stats(stats: &CycleStats) {
    info!(
        "Stats: cycles={} accepted={} ignored={} rejected={} faults={} repaints={} display_errors={}",
        stats.cycles,
        stats.accepted,
        stats.ignored,
        stats.rejected,
        stats.faults,
        stats.repaints,
        stats.display_errors
    );
    if stats.mismatched > 0 || stats.dropped > 0 {
        warn!(
            "Stats: mismatched={} dropped={}",
            stats.mismatched, stats.dropped
        );
    }
}
