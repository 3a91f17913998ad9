//! The scan filter text grammar: a vendor-defined but stable text
//! convention encoding polarity, analyzer, acquisition mode, MS level,
//! precursor(s) and scan range for one scan, e.g.
//!
//! ```text
//! FTMS + p NSI d Full msx ms2 712.85@hcd28.00 407.92@hcd28.00 [100.00-1475.00]
//! ```
//!
//! All matching is case-insensitive and no normalization is performed on
//! the input. Every function in this module is pure and total: parse
//! failures are signaled by `None` or a documented default, never a panic,
//! because the grammar has to tolerate the full diversity of historical
//! instrument firmware output.

pub mod mrm;
pub mod ms_level;
pub mod precursor;
pub mod scan_type;

pub use mrm::{
    classify_mrm, extract_mrm_masses, validate_ms1_scan, MrmInfo, MrmMassRange, MrmScanType,
    Ms1Class,
};
pub use ms_level::{extract_ms_level, MsLevel};
pub use precursor::{extract_parent_ions, ParentIon, PrecursorListing};
pub use scan_type::{generic_filter, scan_type_name};
