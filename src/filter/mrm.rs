use lazy_static::lazy_static;
use regex::Regex;

/// The monitoring mode a scan filter string describes.
///
/// `Srm` and `FullNl` always imply MS2; `Sim` and `MrmQms` are MS1-shaped
/// scans over narrow windows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MrmScanType {
    #[default]
    NotMrm = 0,
    Sim,
    MrmQms,
    Srm,
    FullNl,
}

// Tags are matched case-insensitively against the filter text starting at
// the second character, so a tag can never be shadowed by (or mistaken for)
// the leading polarity sign.
static MRM_TAG_PRIORITY: [(&str, MrmScanType); 7] = [
    ("Q1MS", MrmScanType::MrmQms),
    ("Q3MS", MrmScanType::MrmQms),
    ("SRM MS2", MrmScanType::Srm),
    // Not SRM proper, but the recorded data has the same shape
    ("SIM PR ", MrmScanType::Srm),
    ("SIM MSX", MrmScanType::Sim),
    ("FULL CNL ", MrmScanType::FullNl),
    ("SIM MS ", MrmScanType::Sim),
];

static MS1_TAGS: [&str; 5] = ["FULL MS ", " C MS ", " P MS ", "P NSI MS ", "FULL LOCK MS "];

static ZOOM_TAGS: [&str; 3] = [" Z MS ", " PZ MS ", " DZ MS "];

lazy_static! {
    static ref MASS_RANGE_PATTERN: Regex = Regex::new(r"([0-9.]+)-([0-9.]+)").unwrap();
}

/// Test whether `tag` (upper-cased) occurs in `filter_text` at any position
/// past the first character
pub(crate) fn contains_tag(filter_text: &str, tag: &str) -> bool {
    let mut indices = filter_text.char_indices();
    indices.next();
    let Some((offset, _)) = indices.next() else {
        return false;
    };
    filter_text[offset..].to_ascii_uppercase().contains(tag)
}

/// Determine the monitoring mode of a scan from its filter string.
///
/// Total and deterministic; the first matching tag in a fixed priority
/// order wins, and anything unrecognized (including the empty string) is
/// [`MrmScanType::NotMrm`].
pub fn classify_mrm(filter_text: &str) -> MrmScanType {
    for (tag, scan_type) in MRM_TAG_PRIORITY.iter() {
        if contains_tag(filter_text, tag) {
            return *scan_type;
        }
    }
    MrmScanType::NotMrm
}

/// The MS1-family classification of a scan filter string
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Ms1Class {
    pub ms_level: u8,
    pub is_sim: bool,
    pub is_zoom: bool,
    pub mrm_type: MrmScanType,
}

/// Check whether a filter string without a fragmentation marker is
/// nonetheless a recognized MS1-style scan: a plain Full/SIM/zoom survey,
/// or one of the targeted monitoring modes.
///
/// Ordinary MSn filter strings yield `None`; callers consult this only
/// after [`extract_ms_level`](super::ms_level::extract_ms_level) has failed
/// to find a marker.
pub fn validate_ms1_scan(filter_text: &str) -> Option<Ms1Class> {
    if MS1_TAGS.iter().any(|tag| contains_tag(filter_text, tag)) {
        return Some(Ms1Class {
            ms_level: 1,
            ..Default::default()
        });
    }
    if ZOOM_TAGS.iter().any(|tag| contains_tag(filter_text, tag)) {
        return Some(Ms1Class {
            ms_level: 1,
            is_zoom: true,
            ..Default::default()
        });
    }
    let mrm_type = classify_mrm(filter_text);
    match mrm_type {
        MrmScanType::Sim | MrmScanType::MrmQms => Some(Ms1Class {
            ms_level: 1,
            is_sim: true,
            mrm_type,
            ..Default::default()
        }),
        MrmScanType::Srm | MrmScanType::FullNl => Some(Ms1Class {
            ms_level: 2,
            mrm_type,
            ..Default::default()
        }),
        MrmScanType::NotMrm => None,
    }
}

/// One monitored mass range of a SIM/SRM/Q1MS/Q3MS scan
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MrmMassRange {
    pub start_mass: f64,
    pub end_mass: f64,
    /// Midpoint of the range, rounded to 6 decimal places
    pub central_mass: f64,
}

/// The monitored mass ranges of a scan, in filter-text order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MrmInfo {
    pub mass_ranges: Vec<MrmMassRange>,
}

impl MrmInfo {
    pub fn len(&self) -> usize {
        self.mass_ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mass_ranges.is_empty()
    }
}

/// Parse the bracketed mass-range list of a targeted scan.
///
/// Only `Sim`, `MrmQms` and `Srm` scans carry an explicit range list; any
/// other classification yields an empty [`MrmInfo`]. Malformed range text
/// is tolerated: well-formed `<start>-<end>` pairs are kept, reversed pairs
/// are dropped, and trailing fragments are ignored.
pub fn extract_mrm_masses(filter_text: &str, mrm_type: MrmScanType) -> MrmInfo {
    let mut info = MrmInfo::default();
    if !matches!(
        mrm_type,
        MrmScanType::Sim | MrmScanType::MrmQms | MrmScanType::Srm
    ) {
        return info;
    }
    let Some(bracket) = filter_text.find('[') else {
        return info;
    };
    for captures in MASS_RANGE_PATTERN.captures_iter(&filter_text[bracket..]) {
        let (Ok(start_mass), Ok(end_mass)) =
            (captures[1].parse::<f64>(), captures[2].parse::<f64>())
        else {
            log::debug!("Skipping unparseable mass range in {filter_text:?}");
            continue;
        };
        if end_mass < start_mass {
            log::debug!(
                "Dropping reversed mass range {start_mass}-{end_mass} in {filter_text:?}"
            );
            continue;
        }
        let central_mass = start_mass + (end_mass - start_mass) / 2.0;
        info.mass_ranges.push(MrmMassRange {
            start_mass,
            end_mass,
            central_mass: (central_mass * 1e6).round() / 1e6,
        });
    }
    info
}
