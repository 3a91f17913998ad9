use crate::filter::{
    classify_mrm, extract_mrm_masses, extract_ms_level, extract_parent_ions, generic_filter,
    scan_type_name, validate_ms1_scan, MrmInfo, MrmScanType, ParentIon,
};

/// Everything derived from one scan's filter text, plus the scan-event
/// trailer supplied by the instrument data source.
///
/// Purely derived and immutable once constructed; it carries no reference
/// back to the data source it came from.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ScanMetadata {
    pub scan_number: u32,
    /// The raw instrument-emitted scan descriptor, unnormalized
    pub filter_text: String,
    pub ms_level: u8,
    pub is_sim: bool,
    pub is_zoom: bool,
    pub mrm_type: MrmScanType,
    pub mrm_info: MrmInfo,
    /// Precursor stages in filter-text order, empty for survey scans
    pub parent_ions: Vec<ParentIon>,
    pub supplemental_activation: bool,
    pub multiplexed: bool,
    pub scan_type_name: String,
    pub generic_filter: String,
    /// Ordered (name, value) scan-event trailer entries
    pub events: Vec<(String, String)>,
}

impl ScanMetadata {
    /// Run the full filter-text chain once: MS level, precursors, MRM
    /// classification and mass ranges, scan type label, and generic filter.
    ///
    /// Never fails; unparseable text degrades to the `"MS"` labels and an
    /// empty precursor list rather than aborting a batch run.
    pub fn from_filter_text<T: Into<String>>(
        scan_number: u32,
        filter_text: T,
        events: Vec<(String, String)>,
    ) -> Self {
        let filter_text = filter_text.into();

        let mrm_type = classify_mrm(&filter_text);
        let mrm_info = extract_mrm_masses(&filter_text, mrm_type);

        let mut ms_level = 1;
        let mut is_sim = false;
        let mut is_zoom = false;
        let mut parent_ions = Vec::new();
        let mut supplemental_activation = false;
        let mut multiplexed = false;

        match extract_ms_level(&filter_text) {
            Some(parsed) => {
                ms_level = parsed.level;
                if let Some(listing) = extract_parent_ions(&filter_text) {
                    parent_ions = listing.parent_ions;
                    supplemental_activation = listing.supplemental_activation;
                    multiplexed = listing.multiplexed;
                } else {
                    log::warn!(
                        "Scan {scan_number}: fragmentation marker without a parseable \
                         precursor clause in {filter_text:?}"
                    );
                }
            }
            None => match validate_ms1_scan(&filter_text) {
                Some(class) => {
                    ms_level = class.ms_level;
                    is_sim = class.is_sim;
                    is_zoom = class.is_zoom;
                }
                None => {
                    if !filter_text.trim().is_empty() {
                        log::warn!(
                            "Scan {scan_number}: unrecognized filter text {filter_text:?}, \
                             using MS1 defaults"
                        );
                    }
                }
            },
        }

        let scan_type_name = scan_type_name(&filter_text);
        let generic_filter = generic_filter(&filter_text);

        Self {
            scan_number,
            filter_text,
            ms_level,
            is_sim,
            is_zoom,
            mrm_type,
            mrm_info,
            parent_ions,
            supplemental_activation,
            multiplexed,
            scan_type_name,
            generic_filter,
            events,
        }
    }

    /// The scalar "best" precursor m/z: the first stage for multiplexed
    /// scans, the last stage otherwise
    pub fn parent_ion_mz(&self) -> Option<f64> {
        self.best_parent_ion().map(|p| p.mz)
    }

    pub fn best_parent_ion(&self) -> Option<&ParentIon> {
        if self.multiplexed {
            self.parent_ions.first()
        } else {
            self.parent_ions.last()
        }
    }

    /// The earliest precursor stage, used when matching this scan against
    /// its candidate parent scans
    pub fn first_parent_ion(&self) -> Option<&ParentIon> {
        self.parent_ions.first()
    }

    pub fn collision_mode(&self) -> Option<&str> {
        self.best_parent_ion().map(|p| p.collision_mode.as_str())
    }
}
