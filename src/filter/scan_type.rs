use lazy_static::lazy_static;
use regex::Regex;

use super::mrm::{classify_mrm, contains_tag, validate_ms1_scan, MrmScanType};
use super::ms_level::extract_ms_level;
use super::precursor::extract_parent_ions;

/// The label substituted whenever a filter string cannot be interpreted
const DEFAULT_SCAN_TYPE_NAME: &str = "MS";

/// The high-resolution analyzer tag; its presence turns `MS`/`MSn` into
/// `HMS`/`HMSn`. The analyzer tag leads the filter string, so it is
/// matched from the first character, unlike the MRM tags.
const HIGH_RES_TAG: &str = "FTMS";

const FULL_CNL_TAG: &str = "FULL CNL ";

lazy_static! {
    // Precursor m/z values ahead of an @ sign, zeroed when building the
    // generic filter so scans sharing a method collapse to one key
    static ref MZ_BEFORE_AT_PATTERN: Regex = Regex::new(r"[0-9.]+@").unwrap();
    // A bare trailing m/z after the ms-level marker, as SRM/Q1MS/Q3MS
    // filter strings without collision annotations write it
    static ref TRAILING_MZ_PATTERN: Regex = Regex::new(r"(?i)( ms[0-9]*) +[0-9.]+ *$").unwrap();
}

/// Derive a short human-readable scan type label from a filter string,
/// e.g. `"HCD-HMSn"`, `"CID-SRM"`, `"Zoom-MS"`, `"SIM ms"`, `"Q1MS"`.
///
/// Any parse failure along the way yields the default label `"MS"`.
pub fn scan_type_name(filter_text: &str) -> String {
    let mut collision_mode = String::new();
    let mut is_sim = false;
    let mut is_zoom = false;
    let mrm_type;
    let ms_level;

    match extract_ms_level(filter_text) {
        Some(parsed) => {
            ms_level = parsed.level;
            mrm_type = classify_mrm(filter_text);
            match extract_parent_ions(filter_text) {
                Some(listing) => {
                    collision_mode = listing.collision_mode().unwrap_or_default().to_string()
                }
                None => return DEFAULT_SCAN_TYPE_NAME.to_string(),
            }
        }
        None => match validate_ms1_scan(filter_text) {
            Some(class) => {
                ms_level = class.ms_level;
                is_sim = class.is_sim;
                is_zoom = class.is_zoom;
                mrm_type = class.mrm_type;
            }
            None => return DEFAULT_SCAN_TYPE_NAME.to_string(),
        },
    }

    match mrm_type {
        MrmScanType::MrmQms => {
            if contains_tag(filter_text, "Q1MS") {
                "Q1MS".to_string()
            } else if contains_tag(filter_text, "Q3MS") {
                "Q3MS".to_string()
            } else {
                "MRM".to_string()
            }
        }
        MrmScanType::Srm => {
            if collision_mode.is_empty() {
                "SRM".to_string()
            } else {
                format!("{}-SRM", display_collision_mode(&collision_mode))
            }
        }
        MrmScanType::FullNl => "MRM_Full_NL".to_string(),
        MrmScanType::Sim | MrmScanType::NotMrm => {
            if is_sim {
                "SIM ms".to_string()
            } else if is_zoom {
                "Zoom-MS".to_string()
            } else {
                let mut base = if ms_level > 1 { "MSn" } else { "MS" }.to_string();
                if filter_text.to_ascii_uppercase().contains(HIGH_RES_TAG) {
                    base.insert(0, 'H');
                }
                if ms_level > 1 && !collision_mode.is_empty() {
                    format!("{}-{base}", display_collision_mode(&collision_mode))
                } else {
                    base
                }
            }
        }
    }
}

/// Upper-case an activation name for display, preserving the mixed case of
/// the compound EThcD/ETciD names
fn display_collision_mode(collision_mode: &str) -> String {
    if collision_mode.eq_ignore_ascii_case("ethcd") {
        "EThcD".to_string()
    } else if collision_mode.eq_ignore_ascii_case("etcid") {
        "ETciD".to_string()
    } else {
        collision_mode.to_ascii_uppercase()
    }
}

/// Normalize a filter string into a grouping key shared by all scans
/// acquired with the same method: the bracketed range clause is dropped,
/// precursor m/z values are zeroed, and a bare trailing m/z is stripped.
///
/// Idempotent, and defaults to `"MS"` for blank input.
pub fn generic_filter(filter_text: &str) -> String {
    if filter_text.trim().is_empty() {
        return DEFAULT_SCAN_TYPE_NAME.to_string();
    }
    let text = match filter_text.find('[') {
        Some(i) => filter_text[..i].trim_end(),
        None => filter_text.trim_end(),
    };

    // A neutral-loss filter keeps nothing after its tag
    let upper = text.to_ascii_uppercase();
    if let Some(i) = upper.find(FULL_CNL_TAG) {
        return text[..i + FULL_CNL_TAG.len()].trim_end().to_string();
    }

    if text.contains('@') {
        return MZ_BEFORE_AT_PATTERN.replace_all(text, "0@").to_string();
    }
    TRAILING_MZ_PATTERN.replace(text, "$1").to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_scan_type_name() {
        assert_eq!(scan_type_name("FTMS + p NSI Full ms [400.00-2000.00]"), "HMS");
        assert_eq!(
            scan_type_name("ITMS + c NSI d Full ms2 756.98@cid35.00 [195.00-2000.00]"),
            "CID-MSn"
        );
        assert_eq!(
            scan_type_name(
                "FTMS + p NSI d Full msx ms2 712.85@hcd28.00 407.92@hcd28.00 [100.00-1475.00]"
            ),
            "HCD-HMSn"
        );
        assert_eq!(
            scan_type_name("+ c NSI SRM ms2 501.560@cid15.00 [507.259-507.261]"),
            "CID-SRM"
        );
        assert_eq!(scan_type_name("+ p NSI Q1MS [179.652-184.582]"), "Q1MS");
        assert_eq!(scan_type_name("+ p NSI Q3MS [150.070-1500.000]"), "Q3MS");
        assert_eq!(
            scan_type_name("c NSI Full cnl 162.053 [300.000-1200.000]"),
            "MRM_Full_NL"
        );
        assert_eq!(scan_type_name("ITMS + p NSI Z ms [163.00-173.00]"), "Zoom-MS");
        assert_eq!(
            scan_type_name("FTMS + p NSI SIM ms [575.0000-625.0000]"),
            "SIM ms"
        );
        assert_eq!(
            scan_type_name("+ c d Full ms3 1312.95@45.00 873.85@45.00 [ 350.00-2000.00]"),
            "MSn"
        );
    }

    #[test]
    fn test_compound_and_supplemental_names() {
        assert_eq!(
            scan_type_name("ITMS + c NSI d sa Full ms2 467.16@etd100.00 [50.00-1880.00]"),
            "SA_ETD-MSn"
        );
        assert_eq!(
            scan_type_name(
                "ITMS + c NSI r d sa Full ms2 1073.4800@etd120.55@cid20.00 [120.0000-2000.0000]"
            ),
            "ETciD-MSn"
        );
        assert_eq!(
            scan_type_name(
                "FTMS + p NSI d sa Full ms2 850.30@etd50.00@hcd25.00 [110.00-2000.00]"
            ),
            "EThcD-HMSn"
        );
    }

    #[test]
    fn test_high_res_tag_matches_as_the_first_token() {
        assert_eq!(
            scan_type_name("FTMS + p NSI Full ms [400.00-2000.00]"),
            "HMS"
        );
        assert_eq!(
            scan_type_name("FTMS + c NSI d Full ms2 756.98@hcd30.00 [110.00-2000.00]"),
            "HCD-HMSn"
        );
        assert_eq!(
            scan_type_name("ITMS + c NSI d Full ms2 756.98@hcd30.00 [110.00-2000.00]"),
            "HCD-MSn"
        );
    }

    #[test]
    fn test_unparseable_text_defaults() {
        assert_eq!(scan_type_name(""), "MS");
        assert_eq!(scan_type_name("not a filter"), "MS");
        assert_eq!(scan_type_name("+ c Full ms2 junk"), "MS");
    }

    #[test]
    fn test_generic_filter() {
        assert_eq!(
            generic_filter("FTMS + p NSI Full ms [400.00-2000.00]"),
            "FTMS + p NSI Full ms"
        );
        assert_eq!(
            generic_filter("ITMS + c NSI d Full ms2 756.98@cid35.00 [195.00-2000.00]"),
            "ITMS + c NSI d Full ms2 0@cid35.00"
        );
        assert_eq!(
            generic_filter(
                "FTMS + p NSI d Full msx ms2 712.85@hcd28.00 407.92@hcd28.00 [100.00-1475.00]"
            ),
            "FTMS + p NSI d Full msx ms2 0@hcd28.00 0@hcd28.00"
        );
        assert_eq!(
            generic_filter("c NSI Full cnl 162.053 [300.000-1200.000]"),
            "c NSI Full cnl"
        );
        assert_eq!(
            generic_filter("+ c NSI SRM ms2 748.371 [748.000-749.000]"),
            "+ c NSI SRM ms2"
        );
        assert_eq!(generic_filter(""), "MS");
        assert_eq!(generic_filter("   "), "MS");
    }

    #[test]
    fn test_generic_filter_is_idempotent() {
        let cases = [
            "FTMS + p NSI Full ms [400.00-2000.00]",
            "ITMS + c NSI d Full ms2 756.98@cid35.00 [195.00-2000.00]",
            "c NSI Full cnl 162.053 [300.000-1200.000]",
            "+ c NSI SRM ms2 748.371 [748.000-749.000]",
            "+ p NSI Q1MS [179.652-184.582, 505.778-510.708]",
            "",
        ];
        for case in cases {
            let once = generic_filter(case);
            assert_eq!(generic_filter(&once), once, "not idempotent for {case:?}");
        }
    }
}
