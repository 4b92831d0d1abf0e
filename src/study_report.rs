//! Aggregation and reporting over the parsed sessions: join tablets into
//! participant pairs, flatten their annotation buckets into one list per
//! pointing technique, bootstrap the summary statistics, and write the
//! CSV tables and interval charts.

use crate::bootstrap::{mean, Estimate};
use crate::ci_chart::{draw_interval_chart, IntervalBar};
use crate::config::ExtractConfig;
use crate::tablet_data::{Annotation, TabletData, POINTING_TECHNIQUES, STUDY_IDS};

use log::{info, warn};
use rand::Rng;

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Tablets grouped under one pair label for joint analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantPair {
    /// The pair's label: the recorded pair identifier when the session was
    /// stamped with one, the source's position in the batch otherwise.
    pub label: i32,
    /// Every tablet recorded under this label, across all sources.
    pub tablets: Vec<TabletData>,
}

/// One annotation attributed to a participant, ready for a table row.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationRow {
    /// Participant id: twice the pair label plus the tablet id.
    pub participant_id: i32,
    /// The annotation itself.
    pub annotation: Annotation,
}

/// All rows of one pointing technique, across studies and pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct TechniqueRows {
    /// The technique's `pointingID`.
    pub pointing_id: i32,
    /// Every annotation made with this technique.
    pub rows: Vec<AnnotationRow>,
}

/// The bootstrap summaries of one pointing technique.
#[derive(Debug, Clone, PartialEq)]
pub struct TechniqueSummary {
    /// The technique's `pointingID`.
    pub pointing_id: i32,
    /// Number of annotations summarized.
    pub count: usize,
    /// Accuracy interval as (center, half-width), in dataset units.
    pub accuracy: (f64, f64),
    /// Annotation TCT interval as (center, half-width), in milliseconds.
    pub annot_tct_ms: (f64, f64),
    /// Trial TCT interval as (center, half-width), in milliseconds.
    pub trial_tct_ms: (f64, f64),
}

/// Returned when writing the tables or charts fails.
#[derive(Debug)]
pub enum ReportError {
    /// Writing a table failed.
    IoError(std::io::Error),
    /// Rendering a chart failed.
    ChartError(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReportError::IoError(error) => write!(f, "io error: {}", error),
            ReportError::ChartError(error) => write!(f, "chart error: {}", error),
        }
    }
}

impl std::error::Error for ReportError {}

impl From<std::io::Error> for ReportError {
    fn from(error: std::io::Error) -> Self {
        ReportError::IoError(error)
    }
}

/// Group the parsed sessions' tablets into participant pairs: by their
/// recorded pair identifier where one was stamped, positionally (the two
/// tablets of one source form a pair) otherwise.
pub fn pair_tablets(sessions: Vec<Vec<TabletData>>) -> Vec<ParticipantPair> {
    let mut by_label: BTreeMap<i32, Vec<TabletData>> = BTreeMap::new();
    for (source_idx, tablets) in sessions.into_iter().enumerate() {
        for tablet in tablets {
            let label = tablet.pair_id.unwrap_or(source_idx as i32);
            by_label.entry(label).or_default().push(tablet);
        }
    }
    by_label
        .into_iter()
        .map(|(label, tablets)| ParticipantPair { label, tablets })
        .collect()
}

/// Flatten the pairs' matching-study buckets into one row list per
/// pointing technique. Techniques keep their declared order; techniques
/// nobody used come back with an empty row list.
pub fn technique_rows(pairs: &[ParticipantPair]) -> Vec<TechniqueRows> {
    POINTING_TECHNIQUES
        .iter()
        .map(|&pointing_id| {
            let mut rows = Vec::new();
            for pair in pairs {
                for tablet in &pair.tablets {
                    let participant_id = 2 * pair.label + tablet.tablet_id;
                    for study_id in STUDY_IDS {
                        for bucket in tablet.study_buckets(study_id) {
                            if bucket.pointing_id != pointing_id {
                                continue;
                            }
                            rows.extend(bucket.annotations.iter().map(|a| AnnotationRow {
                                participant_id,
                                annotation: a.clone(),
                            }));
                        }
                    }
                }
            }
            TechniqueRows { pointing_id, rows }
        })
        .collect()
}

/// Write one technique's annotations as a delimited table, one row per
/// annotation. Times stay in microseconds, as recorded.
pub fn write_table(path: &Path, rows: &[AnnotationRow]) -> Result<(), std::io::Error> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "pID,trialID,acc,annotTCT,trialTCT")?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{},{},{}",
            row.participant_id,
            row.annotation.trial_id,
            row.annotation.accuracy,
            row.annotation.annot_tct,
            row.annotation.trial_tct
        )?;
    }
    writer.flush()
}

/// Bootstrap one technique's summary statistics.
pub fn summarize(
    technique: &TechniqueRows,
    config: &ExtractConfig,
    rng: &mut impl Rng,
) -> TechniqueSummary {
    let accs: Vec<f64> = technique.rows.iter().map(|r| r.annotation.accuracy).collect();
    let annot_tcts: Vec<f64> = technique
        .rows
        .iter()
        .map(|r| r.annotation.annot_tct as f64)
        .collect();
    let trial_tcts: Vec<f64> = technique
        .rows
        .iter()
        .map(|r| r.annotation.trial_tct as f64)
        .collect();

    fn interval<R: Rng>(
        sample: &[f64],
        config: &ExtractConfig,
        rng: &mut R,
    ) -> (f64, f64) {
        Estimate::new(sample, config.iterations, rng, mean).mean_half_width(config.confidence)
    }

    let accuracy = interval(&accs, config, rng);
    let (annot_center, annot_half) = interval(&annot_tcts, config, rng);
    let (trial_center, trial_half) = interval(&trial_tcts, config, rng);

    TechniqueSummary {
        pointing_id: technique.pointing_id,
        count: technique.rows.len(),
        accuracy,
        // Recorded offsets are microseconds; report milliseconds.
        annot_tct_ms: (annot_center * 1e-3, annot_half * 1e-3),
        trial_tct_ms: (trial_center * 1e-3, trial_half * 1e-3),
    }
}

/// Write every per-technique table and chart into `out_dir` and return the
/// computed summaries. Techniques without annotations are reported and
/// skipped.
pub fn write_reports(
    pairs: &[ParticipantPair],
    config: &ExtractConfig,
    out_dir: &Path,
    rng: &mut impl Rng,
) -> Result<Vec<TechniqueSummary>, ReportError> {
    let mut summaries = Vec::new();

    for technique in technique_rows(pairs) {
        if technique.rows.is_empty() {
            warn!(
                "no annotations recorded for pointing technique {}",
                technique.pointing_id
            );
            continue;
        }

        let table_path = out_dir.join(format!("pointing_{}.csv", technique.pointing_id));
        write_table(&table_path, &technique.rows)?;

        let summary = summarize(&technique, config, rng);
        info!(
            "pointing {}: n={}, acc {:.4} ± {:.4}, annot TCT {:.1} ± {:.1} ms, trial TCT {:.1} ± {:.1} ms",
            summary.pointing_id,
            summary.count,
            summary.accuracy.0,
            summary.accuracy.1,
            summary.annot_tct_ms.0,
            summary.annot_tct_ms.1,
            summary.trial_tct_ms.0,
            summary.trial_tct_ms.1,
        );

        let tct_path = out_dir.join(format!("tct_pointing_{}.png", technique.pointing_id));
        draw_interval_chart(
            &tct_path,
            &format!("TCT, pointing {}", technique.pointing_id),
            "time (ms)",
            &[
                IntervalBar {
                    label: "Annotation TCT".to_owned(),
                    center: summary.annot_tct_ms.0,
                    half_width: summary.annot_tct_ms.1,
                },
                IntervalBar {
                    label: "Trial TCT".to_owned(),
                    center: summary.trial_tct_ms.0,
                    half_width: summary.trial_tct_ms.1,
                },
            ],
        )
        .map_err(|e| ReportError::ChartError(e.to_string()))?;

        let acc_path = out_dir.join(format!("acc_pointing_{}.png", technique.pointing_id));
        draw_interval_chart(
            &acc_path,
            &format!("Accuracy, pointing {}", technique.pointing_id),
            "distance",
            &[IntervalBar {
                label: "Accuracy".to_owned(),
                center: summary.accuracy.0,
                half_width: summary.accuracy.1,
            }],
        )
        .map_err(|e| ReportError::ChartError(e.to_string()))?;

        summaries.push(summary);
    }

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tablet_data::PendingAnnotation;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tablet_with_annotations(tablet_id: i32, pair_id: Option<i32>, n: usize) -> TabletData {
        let mut tablet = TabletData::new(tablet_id);
        tablet.pair_id = pair_id;
        for i in 0..n {
            tablet.init_annotation(PendingAnnotation {
                study_id: 1,
                trial_id: i as i32,
                pointing_id: 0,
                target_pos: [1.0, 0.0, 0.0],
                trial_start: 0,
                annot_start: 1000,
            });
            tablet.commit_annotation([0.0, 0.0, 0.0], 2000 + i as i64, None);
        }
        tablet
    }

    #[test]
    fn unpaired_sessions_pair_positionally() {
        let sessions = vec![
            vec![tablet_with_annotations(0, None, 1), tablet_with_annotations(1, None, 1)],
            vec![tablet_with_annotations(0, None, 1), tablet_with_annotations(1, None, 1)],
        ];
        let pairs = pair_tablets(sessions);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].label, 0);
        assert_eq!(pairs[1].label, 1);
        assert_eq!(pairs[0].tablets.len(), 2);
    }

    #[test]
    fn pair_ids_join_tablets_across_sources() {
        let sessions = vec![
            vec![tablet_with_annotations(0, Some(7), 1), tablet_with_annotations(1, Some(7), 1)],
            vec![tablet_with_annotations(0, Some(7), 2), tablet_with_annotations(1, Some(7), 0)],
        ];
        let pairs = pair_tablets(sessions);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].label, 7);
        assert_eq!(pairs[0].tablets.len(), 4);
    }

    #[test]
    fn rows_carry_participant_ids() {
        let sessions = vec![vec![
            tablet_with_annotations(0, Some(3), 1),
            tablet_with_annotations(1, Some(3), 1),
        ]];
        let pairs = pair_tablets(sessions);
        let techniques = technique_rows(&pairs);

        assert_eq!(techniques.len(), POINTING_TECHNIQUES.len());
        let first = &techniques[0];
        assert_eq!(first.pointing_id, 0);
        assert_eq!(first.rows.len(), 2);
        let pids: Vec<i32> = first.rows.iter().map(|r| r.participant_id).collect();
        assert_eq!(pids, vec![6, 7]);

        // Techniques nobody used stay listed, with no rows.
        assert!(techniques[1..].iter().all(|t| t.rows.is_empty()));
    }

    #[test]
    fn tables_have_the_recorded_header_and_one_row_per_annotation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pointing_0.csv");

        let sessions = vec![vec![
            tablet_with_annotations(0, None, 2),
            tablet_with_annotations(1, None, 0),
        ]];
        let pairs = pair_tablets(sessions);
        let techniques = technique_rows(&pairs);
        write_table(&path, &techniques[0].rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "pID,trialID,acc,annotTCT,trialTCT");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "0,0,1,1000,2000");
    }

    #[test]
    fn summaries_are_in_milliseconds_and_reproducible() {
        let sessions = vec![vec![
            tablet_with_annotations(0, None, 8),
            tablet_with_annotations(1, None, 8),
        ]];
        let pairs = pair_tablets(sessions);
        let techniques = technique_rows(&pairs);
        let config = ExtractConfig {
            iterations: 200,
            ..ExtractConfig::default()
        };

        let mut rng = StdRng::seed_from_u64(config.seed);
        let summary = summarize(&techniques[0], &config, &mut rng);
        assert_eq!(summary.count, 16);
        // All annotation TCTs sit near 1000 us, so the center is ~1 ms.
        assert!((summary.annot_tct_ms.0 - 1.0).abs() < 0.1);
        assert!((summary.accuracy.0 - 1.0).abs() < 1e-9);

        let mut rng2 = StdRng::seed_from_u64(config.seed);
        let again = summarize(&techniques[0], &config, &mut rng2);
        assert_eq!(summary, again);
    }

    // Ignored by default: renders chart PNGs through the font machinery.
    #[test]
    #[ignore]
    fn write_reports_emits_tables_and_charts() {
        let dir = tempfile::tempdir().unwrap();
        let sessions = vec![vec![
            tablet_with_annotations(0, None, 3),
            tablet_with_annotations(1, None, 3),
        ]];
        let pairs = pair_tablets(sessions);
        let config = ExtractConfig {
            iterations: 100,
            ..ExtractConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(config.seed);

        let summaries = write_reports(&pairs, &config, dir.path(), &mut rng).unwrap();
        assert_eq!(summaries.len(), 1);
        assert!(dir.path().join("pointing_0.csv").exists());
        assert!(dir.path().join("tct_pointing_0.png").exists());
        assert!(dir.path().join("acc_pointing_0.png").exists());
    }
}
