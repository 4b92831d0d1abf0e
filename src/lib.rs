//! AnnotScope is a small collection of support tools for a collaborative
//! annotation study in which pairs of participants, each holding a tablet
//! bound to a headset, place annotations on shared 3-D datasets. The study
//! server records every message it relays as a timestamped JSON event; this
//! crate turns those recordings back into numbers and figures.
//!
//! The toolkit is three unrelated programs sharing one library:
//!
//! - `extract` replays recorded session logs, rebuilds the completed
//!   annotations per tablet, and writes per-technique CSV tables plus
//!   confidence-interval charts computed with a percentile bootstrap.
//! - `gencloud` produces synthetic labeled point-cloud dataset files
//!   (a structure shape buried in uniform noise) for testing the viewer.
//! - `tablet_probe` and `headset_probe` open a TCP connection to a running
//!   server and send a few hand-packed handshake frames, for poking at the
//!   server by hand.
//!
//! Everything is single-threaded and one-shot; the interesting parts are
//! the event scan in [`session_parser`] and the estimator in [`bootstrap`].

#![warn(missing_docs)]
pub mod args;
pub mod bootstrap;
pub mod ci_chart;
pub mod client_endpoint;
pub mod cloud_data_format;
pub mod cloud_shapes;
pub mod config;
pub mod handshake_format;
pub mod log_event;
pub mod session_parser;
pub mod study_report;
pub mod tablet_data;
