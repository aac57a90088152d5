//! Poll scheduler
//!
//! One cycle polls every channel once in a fixed order, ingests at most one
//! line per channel, selects the strongest bearing from the store and hands
//! it to the renderer. Selection always sees the store as of the end of the
//! ingestion pass.
//!
//! The scheduler never sleeps. The firmware owns the idle pause between
//! cycles (see [`PollScheduler::interval_ms`]).

mod report;

pub use report::{ChannelOutcome, ChannelReport, CycleReport, CycleStats};

use heapless::Vec;

use azimuth_display::{Canvas, DisplayError, PolygonStyle, Renderer};

use crate::config::{ConfigError, NodeId, SystemConfig, MAX_NODES};
use crate::ingest::{ingest, Ingested};
use crate::selector::select;
use crate::store::ReadingStore;
use crate::traits::LineSource;

/// A line source wired to one configured node
pub struct NodeChannel<S> {
    node: NodeId,
    source: S,
}

impl<S: LineSource> NodeChannel<S> {
    pub fn new(node: NodeId, source: S) -> Self {
        Self { node, source }
    }

    /// Node this channel is wired to
    pub fn node(&self) -> &NodeId {
        &self.node
    }

    /// Poll once and push any valid reading into `store`
    fn poll(&mut self, config: &SystemConfig, store: &mut ReadingStore) -> ChannelOutcome {
        let line = match self.source.poll_line() {
            Ok(Some(line)) => line,
            Ok(None) => return ChannelOutcome::Idle,
            Err(e) => return ChannelOutcome::Fault(e),
        };

        match ingest(line, config) {
            Ok(Ingested { node, reading }) => {
                if let Err(e) = store.update(&node, reading) {
                    return ChannelOutcome::Dropped(e);
                }
                let mismatched = node != self.node;
                ChannelOutcome::Accepted {
                    node,
                    reading,
                    mismatched,
                }
            }
            Err(e) if e.is_noise() => ChannelOutcome::Ignored,
            Err(e) => ChannelOutcome::Rejected(e),
        }
    }
}

/// Cooperative fusion loop over all node channels
pub struct PollScheduler<S, C> {
    config: SystemConfig,
    channels: Vec<NodeChannel<S>, MAX_NODES>,
    store: ReadingStore,
    renderer: Renderer,
    canvas: C,
    stats: CycleStats,
}

impl<S: LineSource, C: Canvas> PollScheduler<S, C> {
    /// Create a scheduler with no channels attached
    ///
    /// The renderer is sized from the canvas.
    pub fn new(config: SystemConfig, canvas: C) -> Self {
        let head_style = if config.display.filled_head {
            PolygonStyle::Filled
        } else {
            PolygonStyle::Outline
        };
        let renderer = Renderer::for_canvas(&canvas, head_style);

        Self {
            config,
            channels: Vec::new(),
            store: ReadingStore::new(),
            renderer,
            canvas,
            stats: CycleStats::default(),
        }
    }

    /// Attach the source for a configured node
    ///
    /// Channels are polled in the order they are added.
    pub fn add_channel(&mut self, node: &str, source: S) -> Result<(), ConfigError> {
        let id = self
            .config
            .find_node(node)
            .map(|n| n.id.clone())
            .ok_or(ConfigError::InvalidNodeId)?;
        if self.channels.iter().any(|c| c.node == id) {
            return Err(ConfigError::DuplicateNode);
        }
        self.channels
            .push(NodeChannel::new(id, source))
            .map_err(|_| ConfigError::TooManyNodes)
    }

    /// Paint the tick ring before any reading arrives
    pub fn startup(&mut self) -> Result<(), DisplayError> {
        self.renderer.draw_startup(&mut self.canvas)
    }

    /// Run one poll cycle
    pub fn run_cycle(&mut self) -> CycleReport {
        let mut channels = Vec::new();
        for channel in self.channels.iter_mut() {
            let outcome = channel.poll(&self.config, &mut self.store);
            // Same capacity as `self.channels`
            let _ = channels.push(ChannelReport {
                channel: channel.node.clone(),
                outcome,
            });
        }

        let selection = select(&self.store);
        let redraw = self.renderer.update(selection, &mut self.canvas);

        let report = CycleReport {
            channels,
            selection,
            redraw,
        };
        self.stats.record(&report);
        report
    }

    /// Pause between cycles (ms)
    pub fn interval_ms(&self) -> u32 {
        self.config.poll.interval_ms
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn store(&self) -> &ReadingStore {
        &self.store
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn channels(&self) -> &[NodeChannel<S>] {
        &self.channels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::ingest::IngestError;
    use crate::traits::SourceError;
    use azimuth_display::{Palette, Point, RedrawOutcome};
    use azimuth_protocol::ParseError;
    use std::collections::VecDeque;

    /// Scripted channel: each poll pops the next step
    #[derive(Default)]
    struct ScriptedSource {
        steps: VecDeque<Result<Option<&'static str>, SourceError>>,
    }

    impl ScriptedSource {
        fn lines(lines: &[&'static str]) -> Self {
            Self {
                steps: lines.iter().map(|l| Ok(Some(*l))).collect(),
            }
        }

        fn push(&mut self, step: Result<Option<&'static str>, SourceError>) {
            self.steps.push_back(step);
        }
    }

    impl LineSource for ScriptedSource {
        fn poll_line(&mut self) -> Result<Option<&str>, SourceError> {
            self.steps.pop_front().unwrap_or(Ok(None))
        }
    }

    /// Canvas that only counts full-screen clears
    #[derive(Default)]
    struct CountingCanvas {
        clears: usize,
        fail: bool,
    }

    impl Canvas for CountingCanvas {
        fn size(&self) -> (u16, u16) {
            (240, 135)
        }

        fn clear(&mut self, _color: Palette) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Communication);
            }
            self.clears += 1;
            Ok(())
        }

        fn draw_line(&mut self, _: Point, _: Point, _: Palette) -> Result<(), DisplayError> {
            Ok(())
        }

        fn draw_polygon(
            &mut self,
            _: &[Point],
            _: Palette,
            _: PolygonStyle,
        ) -> Result<(), DisplayError> {
            Ok(())
        }
    }

    const CONFIG: &str = "
[node.esp1]
offset_deg = 90
uart = 1

[node.esp2]
offset_deg = 270
uart = 0
";

    fn scheduler(
        esp1: ScriptedSource,
        esp2: ScriptedSource,
    ) -> PollScheduler<ScriptedSource, CountingCanvas> {
        let config = parse_config(CONFIG).unwrap();
        let mut scheduler = PollScheduler::new(config, CountingCanvas::default());
        scheduler.add_channel("esp1", esp1).unwrap();
        scheduler.add_channel("esp2", esp2).unwrap();
        scheduler
    }

    #[test]
    fn test_quiet_cycle() {
        let mut s = scheduler(ScriptedSource::default(), ScriptedSource::default());
        let report = s.run_cycle();
        assert!(report.is_quiet());
        assert_eq!(report.selection, None);
        assert_eq!(report.redraw, Ok(RedrawOutcome::NoSelection));
        assert_eq!(s.canvas().clears, 0);
    }

    #[test]
    fn test_startup_paints_once() {
        let mut s = scheduler(ScriptedSource::default(), ScriptedSource::default());
        s.startup().unwrap();
        assert_eq!(s.canvas().clears, 1);
        assert_eq!(s.renderer().last_drawn(), None);
    }

    #[test]
    fn test_accepted_reading_drives_arrow() {
        let mut s = scheduler(ScriptedSource::lines(&["esp1,10,30"]), ScriptedSource::default());
        let report = s.run_cycle();

        assert_eq!(report.channels.len(), 2);
        assert_eq!(report.channels[0].channel.as_str(), "esp1");
        assert!(matches!(
            report.channels[0].outcome,
            ChannelOutcome::Accepted { mismatched: false, .. }
        ));
        assert_eq!(report.channels[1].outcome, ChannelOutcome::Idle);
        assert_eq!(report.selection, Some(100.0));
        assert!(report.repainted());
    }

    #[test]
    fn test_same_selection_repaints_once() {
        let mut s = scheduler(ScriptedSource::lines(&["esp1,10,30"]), ScriptedSource::default());
        for _ in 0..20 {
            s.run_cycle();
        }
        assert_eq!(s.stats().cycles, 20);
        assert_eq!(s.stats().repaints, 1);
        assert_eq!(s.canvas().clears, 1);
    }

    #[test]
    fn test_repeated_identical_lines_repaint_once() {
        let lines = ["esp2,100,-20"; 8];
        let mut s = scheduler(ScriptedSource::default(), ScriptedSource::lines(&lines));
        for _ in 0..8 {
            let report = s.run_cycle();
            assert_eq!(report.selection, Some(10.0));
        }
        assert_eq!(s.stats().accepted, 8);
        assert_eq!(s.stats().repaints, 1);
    }

    #[test]
    fn test_louder_node_takes_over() {
        let mut s = scheduler(
            ScriptedSource::lines(&["esp1,10,5"]),
            ScriptedSource::lines(&["esp2,20,9"]),
        );
        let report = s.run_cycle();
        assert_eq!(report.selection, Some(290.0));
        assert_eq!(s.store().len(), 2);
    }

    #[test]
    fn test_fault_isolated_to_one_channel() {
        let mut esp1 = ScriptedSource::default();
        esp1.push(Err(SourceError::Io));
        let mut s = scheduler(esp1, ScriptedSource::lines(&["esp2,45,3"]));

        let report = s.run_cycle();
        assert_eq!(report.channels[0].outcome, ChannelOutcome::Fault(SourceError::Io));
        assert!(matches!(report.channels[1].outcome, ChannelOutcome::Accepted { .. }));
        assert_eq!(report.selection, Some(315.0));
        assert_eq!(s.stats().faults, 1);
    }

    #[test]
    fn test_rejected_lines_leave_store_unchanged() {
        let mut s = scheduler(
            ScriptedSource::lines(&["esp1,10,30", "esp1,10", "esp1,NaN,30", "esp9,10,30"]),
            ScriptedSource::default(),
        );
        s.run_cycle();
        let before = *s.store().get("esp1").unwrap();

        let outcomes: std::vec::Vec<_> = (0..3).map(|_| s.run_cycle().channels[0].outcome.clone()).collect();
        assert_eq!(
            outcomes,
            [
                ChannelOutcome::Rejected(IngestError::Parse(ParseError::FieldCount(2))),
                ChannelOutcome::Rejected(IngestError::Parse(ParseError::NotANumber)),
                ChannelOutcome::Rejected(IngestError::UnknownNode),
            ]
        );
        assert_eq!(s.store().get("esp1"), Some(&before));
        assert_eq!(s.store().len(), 1);
        assert_eq!(s.stats().rejected, 3);
    }

    #[test]
    fn test_banner_ignored() {
        let mut s = scheduler(
            ScriptedSource::lines(&["ets Jun  8 2016 00:22:57"]),
            ScriptedSource::default(),
        );
        let report = s.run_cycle();
        assert_eq!(report.channels[0].outcome, ChannelOutcome::Ignored);
        assert_eq!(s.stats().ignored, 1);
        assert!(s.store().is_empty());
    }

    #[test]
    fn test_label_mismatch_uses_line_label() {
        // esp2 data arriving on the esp1 wire is stored under esp2
        let mut s = scheduler(ScriptedSource::lines(&["esp2,0,1"]), ScriptedSource::default());
        let report = s.run_cycle();
        match &report.channels[0].outcome {
            ChannelOutcome::Accepted { node, mismatched, .. } => {
                assert_eq!(node.as_str(), "esp2");
                assert!(*mismatched);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(report.selection, Some(270.0));
        assert_eq!(s.stats().mismatched, 1);
    }

    #[test]
    fn test_display_error_retried() {
        let mut s = scheduler(ScriptedSource::lines(&["esp1,0,1"]), ScriptedSource::default());
        s.canvas_mut().fail = true;
        let report = s.run_cycle();
        assert_eq!(report.redraw, Err(DisplayError::Communication));
        assert_eq!(s.stats().display_errors, 1);

        s.canvas_mut().fail = false;
        assert!(s.run_cycle().repainted());
    }

    #[test]
    fn test_add_channel_checks_config() {
        let config = parse_config(CONFIG).unwrap();
        let mut s: PollScheduler<ScriptedSource, CountingCanvas> =
            PollScheduler::new(config, CountingCanvas::default());
        assert_eq!(
            s.add_channel("esp7", ScriptedSource::default()),
            Err(ConfigError::InvalidNodeId)
        );
        s.add_channel("esp1", ScriptedSource::default()).unwrap();
        assert_eq!(
            s.add_channel("esp1", ScriptedSource::default()),
            Err(ConfigError::DuplicateNode)
        );
        assert_eq!(s.channels().len(), 1);
        assert_eq!(s.interval_ms(), 50);
    }
}
