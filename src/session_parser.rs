//! The event scan that rebuilds annotations from a recorded session.
//!
//! A [`SessionParser`] is fed the session's [`LogRecord`]s in arrival order
//! and keeps the small amount of state the scan needs: the two tablets, the
//! trial currently announced by the server, and the dataset scale currently
//! in force. When the scan is done, [`SessionParser::finish`] hands back the
//! tablets with their filled annotation buckets.
//!
//! Only events from the server are allowed to move the trial or the scale;
//! annotation events are filtered down to the study's primary sub-dataset
//! while it is shared. Events that do not match anything (a binding for an
//! unknown tablet, an anchor with nothing pending) are dropped without a
//! record.

use crate::client_endpoint::{ClientEndpoint, ClientRole};
use crate::log_event::{LogEvent, LogRecord, Sender, Vec3};
use crate::tablet_data::{PendingAnnotation, TabletData};

use log::warn;

/// Tablets tracked per session. The study always ran two.
const TABLETS_PER_SESSION: i32 = 2;

/// The dataset the annotation tasks were performed on.
const PRIMARY_DATASET: i32 = 0;

/// The sub-dataset the annotation tasks were performed on.
const PRIMARY_SUB_DATASET: i32 = 0;

#[derive(Debug, Clone, PartialEq)]
struct TrialContext {
    trial_id: i32,
    study_id: i32,
    tablet_id: i32,
    target_pos: Vec3,
    start_time: i64,
}

impl TrialContext {
    // Trial id -1 marks training; study id -1 means no study part yet.
    fn is_active(&self) -> bool {
        self.trial_id != -1 && self.study_id != -1
    }
}

/// Scans a session's events and accumulates per-tablet annotation records.
#[derive(Debug)]
pub struct SessionParser {
    tablets: Vec<TabletData>,
    trial: Option<TrialContext>,
    scale: Option<Vec3>,
}

impl Default for SessionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionParser {
    /// A parser for a fresh session, tracking tablets 0 and 1.
    pub fn new() -> Self {
        Self {
            tablets: (0..TABLETS_PER_SESSION).map(TabletData::new).collect(),
            trial: None,
            scale: None,
        }
    }

    /// Run a whole session through a fresh parser.
    pub fn parse(records: &[LogRecord]) -> Vec<TabletData> {
        let mut parser = Self::new();
        for record in records {
            parser.feed(record);
        }
        parser.finish()
    }

    /// Consume one event, updating the session state.
    pub fn feed(&mut self, record: &LogRecord) {
        match &record.event {
            LogEvent::HeadsetBindingInfo {
                tablet_id,
                tablet_connected,
            } => {
                let Some(endpoint) = self.decode_endpoint(record) else {
                    return;
                };
                if endpoint.role != ClientRole::Tablet || !*tablet_connected {
                    return;
                }
                if let Some(tablet) = self.tablets.iter_mut().find(|t| t.tablet_id == *tablet_id)
                {
                    tablet.headset_addr = Some(endpoint.address);
                }
            }

            LogEvent::SetPairID { pair_id } => {
                for tablet in &mut self.tablets {
                    tablet.pair_id = Some(*pair_id);
                }
            }

            LogEvent::SendNextTrial {
                trial_id,
                annotation_pos,
                tablet_id,
                study_id,
            } => {
                // Only the server advances trials; anything else is a no-op.
                if record.sender != Sender::Server {
                    return;
                }
                self.trial = Some(TrialContext {
                    trial_id: *trial_id,
                    study_id: *study_id,
                    tablet_id: *tablet_id,
                    target_pos: *annotation_pos,
                    start_time: record.time_offset,
                });
            }

            LogEvent::ScaleDataset {
                dataset_id,
                sub_dataset_id,
                in_public,
                scale,
            } => {
                if record.sender != Sender::Server
                    || !Self::on_primary(*dataset_id, *sub_dataset_id, *in_public)
                {
                    return;
                }
                self.scale = Some(*scale);
            }

            LogEvent::StartAnnotation {
                dataset_id,
                sub_dataset_id,
                in_public,
                pointing_id,
            } => {
                if record.sender != Sender::Server
                    || !Self::on_primary(*dataset_id, *sub_dataset_id, *in_public)
                {
                    return;
                }
                let Some(trial) = self.trial.clone().filter(TrialContext::is_active) else {
                    return;
                };
                let Some(endpoint) = self.decode_endpoint(record) else {
                    return;
                };
                let pending = PendingAnnotation {
                    study_id: trial.study_id,
                    trial_id: trial.trial_id,
                    pointing_id: *pointing_id,
                    target_pos: trial.target_pos,
                    trial_start: trial.start_time,
                    annot_start: record.time_offset,
                };
                if let Some(tablet) = self.trial_tablet(&endpoint, trial.tablet_id) {
                    tablet.init_annotation(pending);
                }
            }

            LogEvent::AnchorAnnotation {
                dataset_id,
                sub_dataset_id,
                in_public,
                local_pos,
            } => {
                if record.sender != Sender::Server
                    || !Self::on_primary(*dataset_id, *sub_dataset_id, *in_public)
                {
                    return;
                }
                let Some(trial) = self.trial.clone().filter(TrialContext::is_active) else {
                    return;
                };
                let Some(endpoint) = self.decode_endpoint(record) else {
                    return;
                };
                let anchor_pos = *local_pos;
                let end_time = record.time_offset;
                let scale = self.scale;
                if let Some(tablet) = self.trial_tablet(&endpoint, trial.tablet_id) {
                    tablet.commit_annotation(anchor_pos, end_time, scale);
                }
            }

            LogEvent::Other => {}
        }
    }

    /// Hand back the tablets with their accumulated annotations.
    pub fn finish(self) -> Vec<TabletData> {
        self.tablets
    }

    fn on_primary(dataset_id: i32, sub_dataset_id: i32, in_public: i32) -> bool {
        dataset_id == PRIMARY_DATASET && sub_dataset_id == PRIMARY_SUB_DATASET && in_public == 1
    }

    fn decode_endpoint(&self, record: &LogRecord) -> Option<ClientEndpoint> {
        match record.headset_ip.parse::<ClientEndpoint>() {
            Ok(endpoint) => Some(endpoint),
            Err(e) => {
                warn!(
                    "unparseable endpoint {:?} at offset {}: {}",
                    record.headset_ip, record.time_offset, e
                );
                None
            }
        }
    }

    // The tablet the current trial's annotation events belong to: bound to
    // the event's address and carrying the trial's tablet id.
    fn trial_tablet(
        &mut self,
        endpoint: &ClientEndpoint,
        trial_tablet_id: i32,
    ) -> Option<&mut TabletData> {
        self.tablets.iter_mut().find(|t| {
            t.tablet_id == trial_tablet_id && t.headset_addr.as_deref() == Some(&endpoint.address)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_event::SessionLog;

    // A minimal session: one binding, one trial, one start, one anchor 100
    // microseconds later. Target and anchor are one unit apart on x.
    const MINIMAL_SESSION: &str = r#"{"data": [
        {"type": "HeadsetBindingInfo", "sender": "Server",
         "headsetIP": "192.168.0.31:Tablet", "timeOffset": 1000,
         "tabletID": 0, "tabletConnected": true},
        {"type": "SendNextTrial", "sender": "Server",
         "headsetIP": "none:none", "timeOffset": 2000,
         "currentTrialID": 1, "annotationPos": [1.0, 0.0, 0.0],
         "currentTabletID": 0, "currentStudyID": 1},
        {"type": "StartAnnotation", "sender": "Server",
         "headsetIP": "192.168.0.31:Tablet", "timeOffset": 2500,
         "datasetID": 0, "subDatasetID": 0, "inPublic": 1, "pointingID": 0},
        {"type": "AnchorAnnotation", "sender": "Server",
         "headsetIP": "192.168.0.31:Tablet", "timeOffset": 2600,
         "datasetID": 0, "subDatasetID": 0, "inPublic": 1,
         "localPos": [0.0, 0.0, 0.0]}
    ]}"#;

    fn parse_str(text: &str) -> Vec<TabletData> {
        let log: SessionLog = serde_json::from_str(text).unwrap();
        SessionParser::parse(&log.data)
    }

    fn single_annotation(tablets: &[TabletData]) -> &crate::tablet_data::Annotation {
        let bucket = tablets[0]
            .study_buckets(1)
            .iter()
            .find(|b| b.pointing_id == 0)
            .unwrap();
        assert_eq!(bucket.annotations.len(), 1);
        &bucket.annotations[0]
    }

    #[test]
    fn end_to_end_single_annotation() {
        let tablets = parse_str(MINIMAL_SESSION);
        assert_eq!(tablets.len(), 2);
        assert_eq!(tablets[0].annotation_count(), 1);
        assert_eq!(tablets[1].annotation_count(), 0);

        let ann = single_annotation(&tablets);
        assert_eq!(ann.trial_id, 1);
        assert_eq!(ann.annot_tct, 100);
        assert_eq!(ann.trial_tct, 600);
        assert!((ann.accuracy - 1.0).abs() < 1e-12);
    }

    #[test]
    fn scale_event_rescales_the_accuracy() {
        // Splice a ScaleDataset event in front of the annotation events.
        let text = MINIMAL_SESSION.replace(
            r#"{"type": "StartAnnotation""#,
            r#"{"type": "ScaleDataset", "sender": "Server",
                "headsetIP": "none:none", "timeOffset": 2100,
                "datasetID": 0, "subDatasetID": 0, "inPublic": 1,
                "scale": [3.0, 1.0, 1.0]},
               {"type": "StartAnnotation""#,
        );
        let tablets = parse_str(&text);
        let ann = single_annotation(&tablets);
        assert!((ann.accuracy - 3.0).abs() < 1e-12);
    }

    #[test]
    fn anchor_without_start_is_dropped() {
        let text = MINIMAL_SESSION.replace(
            r#"{"type": "StartAnnotation", "sender": "Server",
         "headsetIP": "192.168.0.31:Tablet", "timeOffset": 2500,
         "datasetID": 0, "subDatasetID": 0, "inPublic": 1, "pointingID": 0},
        "#,
            "",
        );
        // Make sure the splice actually removed the start event.
        assert!(!text.contains("StartAnnotation"));
        let tablets = parse_str(&text);
        assert_eq!(tablets[0].annotation_count(), 0);
    }

    #[test]
    fn non_server_trial_events_are_ignored() {
        let text = MINIMAL_SESSION.replace(
            r#"{"type": "SendNextTrial", "sender": "Server""#,
            r#"{"type": "SendNextTrial", "sender": "Tablet""#,
        );
        // With no server-announced trial, nothing is recorded.
        let tablets = parse_str(&text);
        assert_eq!(tablets[0].annotation_count(), 0);
    }

    #[test]
    fn training_trials_record_nothing() {
        let text = MINIMAL_SESSION.replace(r#""currentTrialID": 1"#, r#""currentTrialID": -1"#);
        let tablets = parse_str(&text);
        assert_eq!(tablets[0].annotation_count(), 0);
    }

    #[test]
    fn off_dataset_annotations_are_filtered_out() {
        let text = MINIMAL_SESSION.replace(r#""datasetID": 0, "subDatasetID": 0, "inPublic": 1, "pointingID": 0"#,
            r#""datasetID": 2, "subDatasetID": 0, "inPublic": 1, "pointingID": 0"#);
        let tablets = parse_str(&text);
        assert_eq!(tablets[0].annotation_count(), 0);
    }

    #[test]
    fn double_start_keeps_only_the_second() {
        let text = MINIMAL_SESSION.replace(
            r#"{"type": "AnchorAnnotation""#,
            r#"{"type": "StartAnnotation", "sender": "Server",
                "headsetIP": "192.168.0.31:Tablet", "timeOffset": 2550,
                "datasetID": 0, "subDatasetID": 0, "inPublic": 1, "pointingID": 1},
               {"type": "AnchorAnnotation""#,
        );
        let tablets = parse_str(&text);
        assert_eq!(tablets[0].annotation_count(), 1);
        let bucket = tablets[0]
            .study_buckets(1)
            .iter()
            .find(|b| b.pointing_id == 1)
            .unwrap();
        assert_eq!(bucket.annotations.len(), 1);
        assert_eq!(bucket.annotations[0].annot_tct, 50);
    }

    #[test]
    fn pair_id_stamps_both_tablets() {
        let text = MINIMAL_SESSION.replace(
            r#"{"type": "SendNextTrial""#,
            r#"{"type": "SetPairID", "sender": "Server",
                "headsetIP": "none:none", "timeOffset": 1500, "pairID": 4},
               {"type": "SendNextTrial""#,
        );
        let tablets = parse_str(&text);
        assert_eq!(tablets[0].pair_id, Some(4));
        assert_eq!(tablets[1].pair_id, Some(4));
    }

    #[test]
    fn binding_for_unknown_tablet_is_ignored() {
        let text = MINIMAL_SESSION.replace(r#""tabletID": 0"#, r#""tabletID": 7"#);
        let tablets = parse_str(&text);
        // The binding never lands, so the annotation events match nothing.
        assert_eq!(tablets[0].headset_addr, None);
        assert_eq!(tablets[0].annotation_count(), 0);
    }
}
