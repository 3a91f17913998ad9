use lazy_static::lazy_static;
use regex::Regex;

use super::ms_level::extract_ms_level;

/// Marks a scan whose primary activation had a supplemental activation
/// step layered on top of it
const SUPPLEMENTAL_ACTIVATION_TAG: &str = " SA FULL MS";

/// Marks a multiplexed MSn scan, which co-isolates several precursors
const MULTIPLEXED_TAG: &str = " FULL MSX ";

lazy_static! {
    // <m/z>@<mode><energy>, optionally chained with a second activation
    // stage. The mode letters may be absent entirely, e.g. "1312.95@45.00".
    static ref PARENT_ION_PATTERN: Regex =
        Regex::new(r"(?i)([0-9.]+)@([a-z]*)([0-9.]+)(?:@([a-z]*)([0-9.]+))?").unwrap();
}

/// One precursor (parent ion) selection stage read from a scan filter string.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParentIon {
    pub ms_level: u8,
    /// The isolated m/z as written in the filter text
    pub mz: f64,
    /// The primary activation name, e.g. "cid", "hcd", "sa_etd", "EThcD".
    /// Empty when the filter text lists an energy with no mode letters.
    pub collision_mode: String,
    /// The secondary activation name for two-stage activation, or empty
    pub collision_mode2: String,
    pub collision_energy: f32,
    pub collision_energy2: f32,
}

/// The ordered precursor stages of one scan, left to right as they appear
/// in the filter text.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecursorListing {
    pub ms_level: u8,
    /// Never empty when produced by [`extract_parent_ions`], which fails
    /// instead of returning an empty listing
    pub parent_ions: Vec<ParentIon>,
    pub supplemental_activation: bool,
    pub multiplexed: bool,
}

impl PrecursorListing {
    /// The precursor that describes this scan as a whole, or `None` for a
    /// hand-built listing with no stages.
    ///
    /// Multiplexed scans list the highest-intensity precursor first, while
    /// multi-stage (MS3+) scans list the most recently isolated precursor
    /// last, so the selection flips on the `msx` flag.
    pub fn best(&self) -> Option<&ParentIon> {
        if self.multiplexed {
            self.parent_ions.first()
        } else {
            self.parent_ions.last()
        }
    }

    pub fn parent_ion_mz(&self) -> Option<f64> {
        self.best().map(|p| p.mz)
    }

    pub fn collision_mode(&self) -> Option<&str> {
        self.best().map(|p| p.collision_mode.as_str())
    }
}

/// Extract the precursor list from a scan filter string.
///
/// Returns `None` when no MS-level marker is present or the trailing clause
/// yields no numeric value at all.
pub fn extract_parent_ions(filter_text: &str) -> Option<PrecursorListing> {
    let upper = filter_text.to_ascii_uppercase();
    let supplemental_activation = upper.contains(SUPPLEMENTAL_ACTIVATION_TAG);
    let multiplexed = upper.contains(MULTIPLEXED_TAG);

    let parsed = extract_ms_level(filter_text)?;

    // The bracketed mass range clause never carries precursor information
    let clause = match parsed.remainder.find('[') {
        Some(i) => &parsed.remainder[..i],
        None => parsed.remainder,
    };

    let mut parent_ions = Vec::new();
    for captures in PARENT_ION_PATTERN.captures_iter(clause) {
        let mz: f64 = match captures[1].parse() {
            Ok(v) => v,
            Err(_) => {
                log::debug!("Skipping malformed precursor m/z in {filter_text:?}");
                continue;
            }
        };
        let Ok(collision_energy) = captures[3].parse::<f32>() else {
            log::debug!("Skipping malformed collision energy in {filter_text:?}");
            continue;
        };
        let collision_mode2 = captures
            .get(4)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let collision_energy2 = captures
            .get(5)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0.0);

        let mut collision_mode = captures[2].to_string();
        if collision_mode.eq_ignore_ascii_case("etd") && !collision_mode2.is_empty() {
            // The compound name already encodes the supplemental step, so
            // no sa_ prefix is applied here
            if collision_mode2.eq_ignore_ascii_case("cid") {
                collision_mode = "ETciD".to_string();
            } else if collision_mode2.eq_ignore_ascii_case("hcd") {
                collision_mode = "EThcD".to_string();
            }
        } else if supplemental_activation && !collision_mode.is_empty() {
            collision_mode = format!("sa_{collision_mode}");
        }

        parent_ions.push(ParentIon {
            ms_level: parsed.level,
            mz,
            collision_mode,
            collision_mode2,
            collision_energy,
            collision_energy2,
        });
    }

    // Some SRM/Q1MS/Q3MS filter strings list only an m/z with no collision
    // annotation; fall back to a bare number with zero collision energy.
    if parent_ions.is_empty() {
        let tail = match clause.rfind('@') {
            Some(i) => clause[i + 1..].trim_start(),
            None => clause.trim_start(),
        };
        // A mode with no energy leaves nothing numeric after the @, so
        // try the leading numeric run of the whole clause next
        let mz = leading_float(tail).or_else(|| leading_float(clause.trim_start()))?;
        parent_ions.push(ParentIon {
            ms_level: parsed.level,
            mz,
            ..Default::default()
        });
    }

    Some(PrecursorListing {
        ms_level: parsed.level,
        parent_ions,
        supplemental_activation,
        multiplexed,
    })
}

/// Parse the longest leading run of digits and dots as a float
fn leading_float(text: &str) -> Option<f64> {
    let end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].parse().ok()
}
