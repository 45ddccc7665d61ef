//! Core data models shared by the clipsig crates.
//!
//! A gene or transcript model is represented as an [`Interval`](models::Interval):
//! a stranded, ordered set of disjoint sub-ranges on one contig. Per-base signal
//! for an interval is laid out in the concatenated coordinate system of its
//! sub-ranges, so a spliced transcript is treated as one contiguous sequence.
//!
//! # Example
//!
//! ```no_run
//! use clipsig_core::gtf::{Grouping, intervals_from_gtf};
//!
//! let intervals = intervals_from_gtf("genes.gtf.gz", Grouping::Gene, true).unwrap();
//! for interval in &intervals {
//!     println!("{}\t{}\t{}", interval.id, interval.strand, interval.len());
//! }
//! ```

pub mod errors;
pub mod gtf;
pub mod models;
pub mod utils;
