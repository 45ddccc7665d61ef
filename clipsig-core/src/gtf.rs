//! Gene and transcript models from GTF annotations.
//!
//! Only `exon` records are used. Exons are grouped by `gene_id` or
//! `transcript_id`, flattened into disjoint sub-ranges and turned into
//! [`Interval`]s. The gaps between flattened exons can be emitted as separate
//! intronic intervals so that intronic signal is randomised within its own
//! intron rather than across the spliced model.

use std::collections::HashMap;
use std::io::BufRead;
use std::str::FromStr;

use crate::errors::GtfError;
use crate::models::{GenomicRange, Interval, Strand};
use crate::utils::{data_lines, get_dynamic_reader_w_stdin};

/// How exon records are grouped into intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// All exons of all transcripts of a gene, merged.
    Gene,
    /// The exons of each transcript.
    Transcript,
}

impl Grouping {
    fn attribute_key(&self) -> &'static str {
        match self {
            Grouping::Gene => "gene_id",
            Grouping::Transcript => "transcript_id",
        }
    }
}

impl FromStr for Grouping {
    type Err = GtfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gene" => Ok(Grouping::Gene),
            "transcript" => Ok(Grouping::Transcript),
            _ => Err(GtfError::InvalidGrouping(s.to_string())),
        }
    }
}

struct ExonGroup {
    chr: String,
    /// `None` once any exon of the group is unstranded.
    strand: Option<Strand>,
    exons: Vec<(u32, u32)>,
    mixed: bool,
}

///
/// Extract the value of `key` from a GTF attributes string (column 9).
///
/// Looks for the pattern `key "VALUE"` and returns VALUE.
///
pub fn extract_gtf_attribute(attrs: &str, key: &str) -> Option<String> {
    attrs
        .split(';')
        .map(str::trim)
        .find_map(|field| {
            let (name, value) = field.split_once(' ')?;
            (name == key).then(|| value.trim().trim_matches('"').to_string())
        })
}

/// Sort exon coordinates and merge any that overlap or abut.
fn flatten_exons(mut exons: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    exons.sort_unstable();
    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(exons.len());
    for (start, end) in exons {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

///
/// Build intervals from GTF records.
///
/// # Arguments
/// - reader: a buffered GTF (already decompressed)
/// - grouping: group exons by gene or by transcript
/// - include_introns: also emit each intron as its own interval, directly
///   after the exonic interval it belongs to
///
/// Intervals are returned in order of first appearance in the file.
/// Groups with an unstranded record or exons on several contigs are skipped
/// with a warning.
///
pub fn read_intervals<R: BufRead>(
    reader: R,
    grouping: Grouping,
    include_introns: bool,
) -> Result<Vec<Interval>, GtfError> {
    let key = grouping.attribute_key();
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, ExonGroup> = HashMap::new();

    for line in data_lines(reader) {
        let (line_no, line) = line?;
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 9 {
            return Err(GtfError::ParseError {
                line: line_no,
                reason: format!("expected 9 columns, found {}", fields.len()),
            });
        }

        if fields[2] != "exon" {
            continue;
        }

        let id = extract_gtf_attribute(fields[8], key).ok_or_else(|| GtfError::ParseError {
            line: line_no,
            reason: format!("missing {} attribute", key),
        })?;

        // GTF is 1-based inclusive; intervals are 0-based half-open
        let start = fields[3]
            .parse::<u32>()
            .map_err(|e| GtfError::ParseError {
                line: line_no,
                reason: format!("start: {}", e),
            })?
            .saturating_sub(1);
        let end = fields[4].parse::<u32>().map_err(|e| GtfError::ParseError {
            line: line_no,
            reason: format!("end: {}", e),
        })?;
        if end <= start {
            return Err(GtfError::ParseError {
                line: line_no,
                reason: format!("empty exon {}-{}", fields[3], fields[4]),
            });
        }

        let strand = fields[6].chars().next().and_then(Strand::from_char);

        match groups.get_mut(&id) {
            Some(group) => {
                let flipped = group.strand.is_some() && strand.is_some() && group.strand != strand;
                if group.chr != fields[0] || flipped {
                    group.mixed = true;
                }
                if strand.is_none() {
                    group.strand = None;
                }
                group.exons.push((start, end));
            }
            None => {
                order.push(id.clone());
                groups.insert(
                    id,
                    ExonGroup {
                        chr: fields[0].to_string(),
                        strand,
                        exons: vec![(start, end)],
                        mixed: false,
                    },
                );
            }
        }
    }

    let mut intervals = Vec::with_capacity(order.len());
    for id in order {
        let Some(group) = groups.remove(&id) else {
            continue;
        };
        if group.mixed {
            log::warn!("Skipping {}: exons span several contigs or strands", id);
            continue;
        }
        let Some(strand) = group.strand else {
            log::warn!("Skipping {}: unstranded exon", id);
            continue;
        };

        let ranges = flatten_exons(group.exons)
            .into_iter()
            .map(|(start, end)| GenomicRange::new(&group.chr, start, end))
            .collect::<Result<Vec<_>, _>>()?;
        let interval = Interval::new(&id, strand, ranges)?;

        let introns = if include_introns {
            interval.introns()
        } else {
            Vec::new()
        };
        intervals.push(interval);
        intervals.extend(introns);
    }

    Ok(intervals)
}

///
/// Build intervals from a GTF file path (`.gz` supported), or `-` for stdin.
///
pub fn intervals_from_gtf(
    path: &str,
    grouping: Grouping,
    include_introns: bool,
) -> Result<Vec<Interval>, GtfError> {
    let reader =
        get_dynamic_reader_w_stdin(path).map_err(|e| GtfError::FileReadError(e.to_string()))?;
    read_intervals(reader, grouping, include_introns)
}
