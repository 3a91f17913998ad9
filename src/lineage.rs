//! Infers which scan triggered a given fragmentation scan, and the
//! reverse: which scans are acquisition-dependents of a survey scan.

use crate::metadata::ScanMetadata;

/// The scan-event trailer entry naming the triggering scan directly.
/// Matched as a prefix because some firmware decorates the key.
const MASTER_SCAN_EVENT: &str = "Master Scan Number";

/// Candidate parent m/z values closer than this are considered the same ion
const PARENT_MZ_TOLERANCE: f64 = 0.001;

/// Resolve the scan that triggered `scan`, i.e. its MS(n-1) parent.
///
/// The `"Master Scan Number"` trailer event is authoritative when present.
/// Older acquisition software omits it, in which case the resolver walks
/// backward through `fetch`, collecting every scan at MS(n-1) as a
/// candidate until it reaches an MS1 boundary or a scan more than one
/// level below the current one. A single candidate wins outright; among
/// several, the nearest one whose own precursor m/z matches the current
/// scan's earliest precursor wins.
///
/// Returns `None` for survey scans and for ambiguous lineage (no candidate
/// matched), which callers must treat as "no parent found", not "known MS1".
pub fn resolve_parent_scan<F>(scan: &ScanMetadata, mut fetch: F) -> Option<u32>
where
    F: FnMut(u32) -> Option<ScanMetadata>,
{
    for (name, value) in &scan.events {
        if !name.trim().starts_with(MASTER_SCAN_EVENT) {
            continue;
        }
        let value = value.trim();
        let parent = match value.parse::<u32>() {
            Ok(n) => n,
            Err(_) => match value.parse::<f64>() {
                Ok(f) if f >= 0.0 => f as u32,
                _ => {
                    log::debug!(
                        "Scan {}: unparseable master scan number {value:?}",
                        scan.scan_number
                    );
                    continue;
                }
            },
        };
        return (parent > 0).then_some(parent);
    }

    if scan.ms_level <= 1 {
        return None;
    }
    let target_level = scan.ms_level - 1;

    let mut candidates: Vec<ScanMetadata> = Vec::new();
    let mut number = scan.scan_number;
    while number > 1 {
        number -= 1;
        let Some(meta) = fetch(number) else {
            log::debug!(
                "Scan {}: lookup failed for scan {number} during parent walk",
                scan.scan_number
            );
            break;
        };
        // The walk cannot cross an MS1 boundary or skip a level
        let at_boundary = meta.ms_level <= 1 || meta.ms_level < target_level;
        if meta.ms_level == target_level {
            candidates.push(meta);
        }
        if at_boundary {
            break;
        }
    }

    match candidates.len() {
        0 => None,
        1 => Some(candidates[0].scan_number),
        _ => {
            let mz = scan.first_parent_ion().map(|p| p.mz)?;
            // Candidates are in backward-walk order, so the nearest match wins
            candidates
                .iter()
                .find(|c| {
                    c.first_parent_ion()
                        .is_some_and(|p| (p.mz - mz).abs() < PARENT_MZ_TOLERANCE)
                })
                .map(|c| c.scan_number)
        }
    }
}

/// Resolve the scans that `scan` triggered, from the raw dependent index
/// list the instrument data source reports.
///
/// The vendor API's dependent indices do not reliably equal scan numbers
/// when a file's numbering does not start at a fixed origin, so each raw
/// index is reconciled by checking whether the scan at `index` or at
/// `index + 1` resolves its *own* parent back to `scan`. Indices for which
/// neither candidate does are dropped rather than guessed.
pub fn resolve_dependent_scans<F>(
    scan: &ScanMetadata,
    raw_indices: &[u32],
    mut fetch: F,
) -> Vec<u32>
where
    F: FnMut(u32) -> Option<ScanMetadata>,
{
    let mut dependents = Vec::with_capacity(raw_indices.len());
    for &index in raw_indices {
        let mut resolved = None;
        for candidate in [index, index + 1] {
            if candidate == 0 {
                continue;
            }
            let Some(meta) = fetch(candidate) else {
                continue;
            };
            if resolve_parent_scan(&meta, &mut fetch) == Some(scan.scan_number) {
                resolved = Some(candidate);
                break;
            }
        }
        match resolved {
            Some(dependent) => dependents.push(dependent),
            None => log::debug!(
                "Scan {}: dependent index {index} did not reconcile to a scan number",
                scan.scan_number
            ),
        }
    }
    dependents
}

#[cfg(test)]
mod test {
    use super::*;

    fn scan(number: u32, filter: &str) -> ScanMetadata {
        ScanMetadata::from_filter_text(number, filter, vec![])
    }

    fn lookup(scans: &[ScanMetadata]) -> impl FnMut(u32) -> Option<ScanMetadata> + '_ {
        move |n| scans.iter().find(|s| s.scan_number == n).cloned()
    }

    /// A short run: one survey scan triggering two MS2 scans, the second of
    /// which triggers an MS3
    fn small_run() -> Vec<ScanMetadata> {
        vec![
            scan(1, "FTMS + p NSI Full ms [400.00-2000.00]"),
            scan(2, "ITMS + c NSI d Full ms2 756.98@cid35.00 [195.00-2000.00]"),
            scan(3, "ITMS + c NSI d Full ms2 912.33@cid35.00 [245.00-2000.00]"),
            scan(4, "+ c d Full ms3 912.33@45.00 487.20@45.00 [110.00-1300.00]"),
        ]
    }

    #[test]
    fn test_master_scan_event_wins() {
        let meta = ScanMetadata::from_filter_text(
            10,
            "ITMS + c NSI d Full ms2 756.98@cid35.00 [195.00-2000.00]",
            vec![("Master Scan Number:".to_string(), "7".to_string())],
        );
        // The walk is never taken, so the lookup may fail loudly
        assert_eq!(resolve_parent_scan(&meta, |_| panic!("no lookup")), Some(7));
    }

    #[test]
    fn test_master_scan_event_decimal_value() {
        let meta = ScanMetadata::from_filter_text(
            10,
            "ITMS + c NSI d Full ms2 756.98@cid35.00 [195.00-2000.00]",
            vec![("Master Scan Number".to_string(), "7.00".to_string())],
        );
        assert_eq!(resolve_parent_scan(&meta, |_| None), Some(7));
    }

    #[test]
    fn test_survey_scan_has_no_parent() {
        let scans = small_run();
        assert_eq!(resolve_parent_scan(&scans[0], lookup(&scans)), None);
    }

    #[test]
    fn test_backward_walk_single_candidate() {
        let scans = small_run();
        // Scan 2's only MS1 predecessor is scan 1
        assert_eq!(resolve_parent_scan(&scans[1], lookup(&scans)), Some(1));
    }

    #[test]
    fn test_backward_walk_disambiguates_by_parent_mz() {
        let scans = small_run();
        // Scan 4 (MS3 of 912.33) sees two MS2 candidates; the one that
        // isolated 912.33 wins
        assert_eq!(resolve_parent_scan(&scans[3], lookup(&scans)), Some(3));
    }

    #[test]
    fn test_walk_stops_at_ms1_boundary() {
        let scans = vec![
            scan(1, "ITMS + c NSI d Full ms2 912.33@cid35.00 [245.00-2000.00]"),
            scan(2, "FTMS + p NSI Full ms [400.00-2000.00]"),
            scan(3, "ITMS + c NSI d Full ms2 756.98@cid35.00 [195.00-2000.00]"),
            scan(4, "ITMS + c NSI d Full ms2 800.00@cid35.00 [215.00-2000.00]"),
            scan(5, "+ c d Full ms3 912.33@45.00 487.20@45.00 [110.00-1300.00]"),
        ];
        // Scans 3 and 4 are candidates but neither isolated 912.33; the
        // matching MS2 at scan 1 sits behind the MS1 boundary at scan 2 and
        // must never be reached
        assert_eq!(resolve_parent_scan(&scans[4], lookup(&scans)), None);
    }

    #[test]
    fn test_resolve_dependent_scans_offset_reconciliation() {
        let scans = vec![
            scan(1, "FTMS + p NSI Full ms [400.00-2000.00]"),
            scan(2, "ITMS + c NSI d Full ms2 756.98@cid35.00 [195.00-2000.00]"),
            scan(3, "FTMS + p NSI Full ms [400.00-2000.00]"),
            scan(4, "ITMS + c NSI d Full ms2 912.33@cid35.00 [245.00-2000.00]"),
        ];
        // Raw indices are off by one, as for files numbered from 1
        let dependents = resolve_dependent_scans(&scans[0], &[1], lookup(&scans));
        assert_eq!(dependents, vec![2]);

        let dependents = resolve_dependent_scans(&scans[2], &[3], lookup(&scans));
        assert_eq!(dependents, vec![4]);
    }

    #[test]
    fn test_resolve_dependent_scans_exact_indices() {
        let scans = small_run();
        // Already-correct scan numbers reconcile to themselves
        let dependents = resolve_dependent_scans(&scans[0], &[2, 3], lookup(&scans));
        assert_eq!(dependents, vec![2, 3]);
    }

    #[test_log::test]
    fn test_unreconcilable_dependent_index_is_dropped() {
        let scans = small_run();
        let dependents = resolve_dependent_scans(&scans[0], &[40], lookup(&scans));
        assert!(dependents.is_empty());
    }
}
