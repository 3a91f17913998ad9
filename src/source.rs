use thiserror::Error;

use crate::cache::ScanMetadataCache;
use crate::lineage::{resolve_dependent_scans, resolve_parent_scan};
use crate::metadata::ScanMetadata;

/**
The boundary to the instrument data source, an opaque external collaborator
(usually a thin wrapper over a vendor SDK handle).

Implementations supply, per scan, the raw filter-text string and scan-event
trailer, plus the raw dependent index list whose numbering this crate
reconciles in [`resolve_dependent_scans`]. Everything else the vendor
reader does (binary container parsing, signal arrays, method dumps) stays
behind this trait and is not re-engineered here.
*/
pub trait InstrumentDataSource {
    /// The filter-text string for `scan_number`, if the source has one
    fn scan_filter_text(&mut self, scan_number: u32) -> Option<String>;

    /// The ordered (name, value) scan-event trailer entries for `scan_number`
    fn scan_events(&mut self, scan_number: u32) -> Vec<(String, String)>;

    /// The raw dependent index list for `scan_number`, exactly as the
    /// vendor API reports it
    fn raw_dependent_indices(&mut self, scan_number: u32) -> Vec<u32>;

    /// Total number of scans in the source
    fn scan_count(&self) -> usize;

    /// The first and last scan numbers, inclusive
    fn scan_range(&self) -> (u32, u32);
}

/// Errors crossing the instrument data source boundary. Parsing itself
/// never errors, it degrades to defaults instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanAccessError {
    #[error("The requested scan number {0} is outside the source's scan range")]
    ScanNumberNotFound(u32),
    #[error("The instrument data source reported no filter text for scan {0}")]
    FilterTextMissing(u32),
}

/**
A scan-metadata view over an [`InstrumentDataSource`], memoizing each
scan's derived metadata in a bounded [`ScanMetadataCache`].

Metadata computation re-runs the whole filter-text chain, so pipelines
that revisit scans (lineage resolution in particular walks neighboring
scans repeatedly) go through this reader rather than recomputing.
*/
pub struct ScanMetadataReader<S: InstrumentDataSource> {
    source: S,
    cache: ScanMetadataCache,
}

impl<S: InstrumentDataSource> ScanMetadataReader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: ScanMetadataCache::default(),
        }
    }

    pub fn with_cache_capacity(source: S, capacity: usize) -> Self {
        Self {
            source,
            cache: ScanMetadataCache::new(capacity),
        }
    }

    /// Compute (or recall) the derived metadata for `scan_number`
    pub fn get_scan_metadata(&mut self, scan_number: u32) -> Result<ScanMetadata, ScanAccessError> {
        let (first, last) = self.source.scan_range();
        if scan_number < first || scan_number > last {
            return Err(ScanAccessError::ScanNumberNotFound(scan_number));
        }
        if let Some(metadata) = self.cache.get(scan_number) {
            return Ok(metadata.clone());
        }
        let filter_text = self
            .source
            .scan_filter_text(scan_number)
            .ok_or(ScanAccessError::FilterTextMissing(scan_number))?;
        let events = self.source.scan_events(scan_number);
        let metadata = ScanMetadata::from_filter_text(scan_number, filter_text, events);
        self.cache.put(scan_number, metadata.clone());
        Ok(metadata)
    }

    /// The scan that triggered `scan_number`, or `None` for survey scans
    /// and unresolvable lineage
    pub fn parent_scan_of(&mut self, scan_number: u32) -> Result<Option<u32>, ScanAccessError> {
        let metadata = self.get_scan_metadata(scan_number)?;
        Ok(resolve_parent_scan(&metadata, |n| {
            self.get_scan_metadata(n).ok()
        }))
    }

    /// The scans triggered by `scan_number`, reconciled from the source's
    /// raw dependent index list
    pub fn dependents_of(&mut self, scan_number: u32) -> Result<Vec<u32>, ScanAccessError> {
        let metadata = self.get_scan_metadata(scan_number)?;
        let raw_indices = self.source.raw_dependent_indices(scan_number);
        Ok(resolve_dependent_scans(&metadata, &raw_indices, |n| {
            self.get_scan_metadata(n).ok()
        }))
    }

    pub fn len(&self) -> usize {
        self.source.scan_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cache(&self) -> &ScanMetadataCache {
        &self.cache
    }

    pub fn set_cache_capacity(&mut self, capacity: usize) {
        self.cache.set_capacity(capacity);
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }
}
