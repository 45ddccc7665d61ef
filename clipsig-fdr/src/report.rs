use std::cmp::Ordering;
use std::io::{self, Write};

use crate::fdr::ResultRecord;

fn site_order(a: &ResultRecord, b: &ResultRecord) -> Ordering {
    a.contig
        .cmp(&b.contig)
        .then(a.position.cmp(&b.position))
        .then(a.strand.cmp(&b.strand))
}

/// Sort records by contig, position and strand.
pub fn sort_records(records: &mut [ResultRecord]) {
    records.sort_by(site_order);
}

///
/// Keep records with `fdr <= threshold`, one per (contig, position, strand).
///
/// A base covered by several overlapping models can carry several records;
/// the one with the lowest FDR wins, ties going to the higher depth. The
/// result is sorted by contig, position and strand.
///
pub fn filter_and_dedup(records: Vec<ResultRecord>, threshold: f64) -> Vec<ResultRecord> {
    let mut kept: Vec<ResultRecord> = records
        .into_iter()
        .filter(|r| r.fdr <= threshold)
        .collect();

    kept.sort_by(|a, b| {
        site_order(a, b)
            .then(a.fdr.total_cmp(&b.fdr))
            .then(b.height.cmp(&a.height))
    });
    kept.dedup_by(|later, first| site_order(later, first) == Ordering::Equal);
    kept
}

/// `-log10(fdr)`, finite even for an FDR of zero.
pub fn neg_log10(fdr: f64) -> f64 {
    0.0 - fdr.max(f64::MIN_POSITIVE).log10()
}

///
/// Write records as a bedgraph-like table with the columns
/// `contig, start, end, -log10(FDR), depth, strand`.
///
pub fn write_bedgraph<W: Write>(records: &[ResultRecord], writer: &mut W) -> io::Result<()> {
    for record in records {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            record.contig,
            record.position,
            record.position + 1,
            neg_log10(record.fdr),
            record.height,
            record.strand
        )?;
    }
    writer.flush()
}
