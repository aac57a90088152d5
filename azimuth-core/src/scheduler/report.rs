//! Per-cycle results and running counters

use heapless::Vec;

use azimuth_display::{DisplayError, RedrawOutcome};

use crate::bearing::Reading;
use crate::config::{NodeId, MAX_NODES};
use crate::ingest::IngestError;
use crate::store::StoreError;
use crate::traits::SourceError;

/// What happened on one channel during a cycle
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelOutcome {
    /// No complete line was waiting
    Idle,
    /// Reading stored
    Accepted {
        /// Label carried by the line
        node: NodeId,
        reading: Reading,
        /// Label differs from the node wired to this channel
        mismatched: bool,
    },
    /// Line without the node marker (boot banner, debug output)
    Ignored,
    /// Malformed or unknown reading, store untouched
    Rejected(IngestError),
    /// Store had no slot left for the node
    Dropped(StoreError),
    /// Transport fault, partial line discarded
    Fault(SourceError),
}

/// Outcome for one channel, tagged with the node it is wired to
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelReport {
    pub channel: NodeId,
    pub outcome: ChannelOutcome,
}

/// Everything one poll cycle did
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Channel outcomes in poll order
    pub channels: Vec<ChannelReport, MAX_NODES>,
    /// Bearing chosen after ingestion
    pub selection: Option<f32>,
    /// Result of the redraw step
    pub redraw: Result<RedrawOutcome, DisplayError>,
}

impl CycleReport {
    /// True if the screen was repainted this cycle
    pub fn repainted(&self) -> bool {
        matches!(self.redraw, Ok(RedrawOutcome::Repainted { .. }))
    }

    /// True if no channel produced a line
    pub fn is_quiet(&self) -> bool {
        self.channels
            .iter()
            .all(|c| c.outcome == ChannelOutcome::Idle)
    }
}

/// Running totals across cycles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleStats {
    pub cycles: u32,
    pub accepted: u32,
    pub mismatched: u32,
    pub ignored: u32,
    pub rejected: u32,
    pub dropped: u32,
    pub faults: u32,
    pub repaints: u32,
    pub display_errors: u32,
}

impl CycleStats {
    /// Fold one cycle into the totals
    pub fn record(&mut self, report: &CycleReport) {
        self.cycles = self.cycles.wrapping_add(1);

        for channel in &report.channels {
            let counter = match &channel.outcome {
                ChannelOutcome::Idle => continue,
                ChannelOutcome::Accepted { mismatched, .. } => {
                    if *mismatched {
                        self.mismatched = self.mismatched.wrapping_add(1);
                    }
                    &mut self.accepted
                }
                ChannelOutcome::Ignored => &mut self.ignored,
                ChannelOutcome::Rejected(_) => &mut self.rejected,
                ChannelOutcome::Dropped(_) => &mut self.dropped,
                ChannelOutcome::Fault(_) => &mut self.faults,
            };
            *counter = counter.wrapping_add(1);
        }

        match report.redraw {
            Ok(RedrawOutcome::Repainted { .. }) => self.repaints = self.repaints.wrapping_add(1),
            Ok(_) => {}
            Err(_) => self.display_errors = self.display_errors.wrapping_add(1),
        }
    }
}
