//! The data model of a recorded session log.
//!
//! A log file is one JSON object with a `data` field holding the ordered
//! array of every event the server saw, stamped with a time offset in
//! microseconds since the session started. Each event carries the same four
//! common fields (`type`, `sender`, `headsetIP`, `timeOffset`) plus a
//! payload that depends on the type, so the whole thing deserializes into
//! [`LogRecord`]s wrapping a tagged [`LogEvent`] enum. Decoding happens once
//! here, at the boundary; the scan in [`crate::session_parser`] then matches
//! on the enum exhaustively instead of comparing type strings.
//!
//! Event types this tool does not care about (dataset rotations, headset
//! pose updates, ...) all collapse into [`LogEvent::Other`] and are skipped.

use serde::Deserialize;

/// A position or scale in dataset space.
pub type Vec3 = [f64; 3];

/// A whole recorded session: the ordered list of events the server logged.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionLog {
    /// Every event of the session, in arrival order.
    pub data: Vec<LogRecord>,
}

/// Who emitted a logged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Sender {
    /// The server itself; the authoritative source for trial bookkeeping.
    Server,
    /// A participant's tablet.
    Tablet,
    /// A participant's headset.
    Headset,
    /// Anything else found in the log.
    #[serde(other)]
    Unknown,
}

/// One parsed log entry: the common fields plus the type-specific payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LogRecord {
    /// Microseconds since the session started.
    #[serde(rename = "timeOffset")]
    pub time_offset: i64,
    /// Who emitted the message.
    pub sender: Sender,
    /// The network identity the message concerned, as `address:role`.
    #[serde(rename = "headsetIP")]
    pub headset_ip: String,
    /// The type-specific payload.
    #[serde(flatten)]
    pub event: LogEvent,
}

/// The payload of a logged event, tagged by the `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum LogEvent {
    /// A headset/tablet binding changed.
    HeadsetBindingInfo {
        /// Numeric identifier of the tablet concerned.
        #[serde(rename = "tabletID")]
        tablet_id: i32,
        /// Whether the tablet is now connected to its headset.
        #[serde(rename = "tabletConnected")]
        tablet_connected: bool,
    },
    /// The server advanced the study to the next trial.
    SendNextTrial {
        /// Identifier of the trial that is starting; -1 during training.
        #[serde(rename = "currentTrialID")]
        trial_id: i32,
        /// Where the annotation should ideally land.
        #[serde(rename = "annotationPos")]
        annotation_pos: Vec3,
        /// Which tablet is expected to annotate in this trial.
        #[serde(rename = "currentTabletID")]
        tablet_id: i32,
        /// Which study part the trial belongs to.
        #[serde(rename = "currentStudyID")]
        study_id: i32,
    },
    /// A dataset was rescaled.
    ScaleDataset {
        /// Identifier of the dataset concerned.
        #[serde(rename = "datasetID")]
        dataset_id: i32,
        /// Identifier of the sub-dataset concerned.
        #[serde(rename = "subDatasetID")]
        sub_dataset_id: i32,
        /// 1 while the sub-dataset is in the shared (public) state.
        #[serde(rename = "inPublic")]
        in_public: i32,
        /// The new per-axis scale factor.
        scale: Vec3,
    },
    /// A participant started placing an annotation.
    StartAnnotation {
        /// Identifier of the dataset concerned.
        #[serde(rename = "datasetID")]
        dataset_id: i32,
        /// Identifier of the sub-dataset concerned.
        #[serde(rename = "subDatasetID")]
        sub_dataset_id: i32,
        /// 1 while the sub-dataset is in the shared (public) state.
        #[serde(rename = "inPublic")]
        in_public: i32,
        /// Which interaction technique the participant is using.
        #[serde(rename = "pointingID")]
        pointing_id: i32,
    },
    /// A participant committed (anchored) the pending annotation.
    AnchorAnnotation {
        /// Identifier of the dataset concerned.
        #[serde(rename = "datasetID")]
        dataset_id: i32,
        /// Identifier of the sub-dataset concerned.
        #[serde(rename = "subDatasetID")]
        sub_dataset_id: i32,
        /// 1 while the sub-dataset is in the shared (public) state.
        #[serde(rename = "inPublic")]
        in_public: i32,
        /// Where the annotation was anchored, in dataset-local space.
        #[serde(rename = "localPos")]
        local_pos: Vec3,
    },
    /// The operator stamped the running session with a pair identifier.
    SetPairID {
        /// The pair identifier joining this session's two participants.
        #[serde(rename = "pairID")]
        pair_id: i32,
    },
    /// Any event type this tool has no use for.
    #[serde(other)]
    Other,
}
