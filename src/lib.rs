//! `scanfilter` turns instrument-generated Thermo scan filter strings into
//! structured scan metadata, and infers which scans are acquisition
//! dependents of which other scans.
//!
//! The crate owns only the text-grammar parsing, classification and
//! lineage logic, plus a bounded recency cache over the per-scan
//! computation. Opening the proprietary container and retrieving signal
//! data stay behind the [`InstrumentDataSource`] trait, implemented over a
//! vendor reader elsewhere.
//!
//! ```rust
//! use scanfilter::{extract_parent_ions, scan_type_name};
//!
//! let filter = "ITMS + c NSI d Full ms2 756.98@cid35.00 [195.00-2000.00]";
//! let listing = extract_parent_ions(filter).unwrap();
//! assert_eq!(listing.ms_level, 2);
//! assert_eq!(listing.parent_ion_mz(), Some(756.98));
//! assert_eq!(scan_type_name(filter), "CID-MSn");
//! ```

pub mod cache;
pub mod filter;
pub mod lineage;
pub mod metadata;
pub mod source;

pub use crate::filter::{
    classify_mrm, extract_mrm_masses, extract_ms_level, extract_parent_ions, generic_filter,
    scan_type_name, validate_ms1_scan, MrmInfo, MrmMassRange, MrmScanType, Ms1Class, MsLevel,
    ParentIon, PrecursorListing,
};

pub use crate::cache::{ScanMetadataCache, DEFAULT_CACHE_CAPACITY};
pub use crate::lineage::{resolve_dependent_scans, resolve_parent_scan};
pub use crate::metadata::ScanMetadata;
pub use crate::source::{InstrumentDataSource, ScanAccessError, ScanMetadataReader};
