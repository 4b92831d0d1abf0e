//! Per-tablet session state: the annotation currently being placed, and the
//! completed annotations bucketed by study part and pointing technique.
//!
//! An annotation exists in two steps. A `StartAnnotation` event opens a
//! [`PendingAnnotation`] holding the trial context and the start timestamp;
//! the matching `AnchorAnnotation` turns it into a finalized [`Annotation`]
//! with both task-completion times and the derived accuracy. A commit with
//! no pending annotation does nothing, and a second start before a commit
//! replaces the first (last start wins).

use crate::log_event::Vec3;

/// The interaction techniques used in the study, by their `pointingID`.
pub const POINTING_TECHNIQUES: [i32; 3] = [0, 1, 3];

/// The study parts that collect annotations.
pub const STUDY_IDS: [i32; 2] = [1, 2];

/// Euclidean distance between `target` and `anchor`, with each axis scaled
/// by the session's dataset scale factor before the norm when one is set.
pub fn scaled_distance(target: Vec3, anchor: Vec3, scale: Option<Vec3>) -> f64 {
    let scale = scale.unwrap_or([1.0, 1.0, 1.0]);
    let mut sum = 0.0;
    for axis in 0..3 {
        let d = (target[axis] - anchor[axis]) * scale[axis];
        sum += d * d;
    }
    sum.sqrt()
}

/// A completed pointing action.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Identifier of the trial the annotation was placed in.
    pub trial_id: i32,
    /// Which interaction technique was used.
    pub pointing_id: i32,
    /// Where the annotation should ideally have landed.
    pub target_pos: Vec3,
    /// Where the participant anchored it.
    pub anchor_pos: Vec3,
    /// Microseconds from `StartAnnotation` to the anchor.
    pub annot_tct: i64,
    /// Microseconds from the start of the trial to the anchor.
    pub trial_tct: i64,
    /// Distance between target and anchor, scaled per axis by the dataset
    /// scale active at anchor time.
    pub accuracy: f64,
}

/// An annotation that has been started but not yet anchored.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAnnotation {
    /// Which study part the annotation belongs to.
    pub study_id: i32,
    /// Identifier of the running trial.
    pub trial_id: i32,
    /// Which interaction technique is being used.
    pub pointing_id: i32,
    /// The trial's target position.
    pub target_pos: Vec3,
    /// Timestamp of the trial start, in microseconds.
    pub trial_start: i64,
    /// Timestamp of the `StartAnnotation` event, in microseconds.
    pub annot_start: i64,
}

/// The completed annotations of one technique within one study part.
#[derive(Debug, Clone, PartialEq)]
pub struct PointingBucket {
    /// The technique's `pointingID`.
    pub pointing_id: i32,
    /// Completed annotations, in completion order.
    pub annotations: Vec<Annotation>,
}

impl PointingBucket {
    fn new(pointing_id: i32) -> Self {
        Self {
            pointing_id,
            annotations: Vec::new(),
        }
    }
}

/// Everything tracked for one tablet over one recorded session.
#[derive(Debug, Clone, PartialEq)]
pub struct TabletData {
    /// The tablet's numeric identifier.
    pub tablet_id: i32,
    /// The address the tablet was last seen bound at, once a binding event
    /// has been observed.
    pub headset_addr: Option<String>,
    /// The pair identifier stamped onto the session, when one was.
    pub pair_id: Option<i32>,
    pending: Option<PendingAnnotation>,
    // One Vec<PointingBucket> per study id, indexed in step with STUDY_IDS.
    studies: Vec<Vec<PointingBucket>>,
}

impl TabletData {
    /// A fresh tablet with empty buckets and no binding.
    pub fn new(tablet_id: i32) -> Self {
        let studies = STUDY_IDS
            .iter()
            .map(|_| POINTING_TECHNIQUES.iter().copied().map(PointingBucket::new).collect())
            .collect();
        Self {
            tablet_id,
            headset_addr: None,
            pair_id: None,
            pending: None,
            studies,
        }
    }

    /// Begin a new annotation. Nothing lands in a bucket until
    /// [`commit_annotation`](Self::commit_annotation) is called; a previous
    /// pending annotation is replaced silently.
    pub fn init_annotation(&mut self, pending: PendingAnnotation) {
        self.pending = Some(pending);
    }

    /// Finalize the pending annotation, if there is one, and append it to
    /// the bucket for its study and technique. `end_time` is the timestamp
    /// of the anchor event; `scale` is the dataset scale active at that
    /// moment.
    pub fn commit_annotation(&mut self, anchor_pos: Vec3, end_time: i64, scale: Option<Vec3>) {
        if let Some(pending) = self.pending.take() {
            let annotation = Annotation {
                trial_id: pending.trial_id,
                pointing_id: pending.pointing_id,
                target_pos: pending.target_pos,
                anchor_pos,
                annot_tct: end_time - pending.annot_start,
                trial_tct: end_time - pending.trial_start,
                accuracy: scaled_distance(pending.target_pos, anchor_pos, scale),
            };
            self.push_annotation(pending.study_id, annotation);
        }
    }

    // Annotations for a study or technique outside the known sets are
    // dropped without a record.
    fn push_annotation(&mut self, study_id: i32, annotation: Annotation) {
        let Some(study_idx) = STUDY_IDS.iter().position(|&s| s == study_id) else {
            return;
        };
        if let Some(bucket) = self.studies[study_idx]
            .iter_mut()
            .find(|b| b.pointing_id == annotation.pointing_id)
        {
            bucket.annotations.push(annotation);
        }
    }

    /// The technique buckets of one study part, or an empty slice for a
    /// study id this tool does not track.
    pub fn study_buckets(&self, study_id: i32) -> &[PointingBucket] {
        STUDY_IDS
            .iter()
            .position(|&s| s == study_id)
            .map(|idx| self.studies[idx].as_slice())
            .unwrap_or(&[])
    }

    /// Whether an annotation is currently in progress.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Total number of completed annotations across studies and techniques.
    pub fn annotation_count(&self) -> usize {
        self.studies
            .iter()
            .flatten()
            .map(|b| b.annotations.len())
            .sum()
    }
}
