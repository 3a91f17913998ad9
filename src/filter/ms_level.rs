use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // The scan-mode keyword is optional; the trailing space after the
    // level digits is mandatory so that text like "msx" or a bare "ms"
    // cannot masquerade as a fragmentation marker.
    static ref MS_LEVEL_PATTERN: Regex = Regex::new(
        r"(?i)(?:^| )(?:(?:full msx|full lock|full|srm|crm|p|z) )?ms([2-9]|[1-9][0-9]) "
    )
    .unwrap();
}

/// The fragmentation stage marker parsed out of a scan filter string,
/// along with the text that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsLevel<'a> {
    /// The ordinal fragmentation stage, 2 or greater when a marker is present
    pub level: u8,
    /// Everything after the marker, left-trimmed. Holds the precursor
    /// clause and the bracketed mass range, when present.
    pub remainder: &'a str,
}

/// Locate the MS-level marker (`Full ms2`, `SRM ms2`, `Full msx ms3`, ...)
/// in a scan filter string.
///
/// Survey (MS1) filter strings such as `"FTMS + p NSI Full ms [400.00-2000.00]"`
/// carry no explicit marker and yield `None`; callers treat that as level 1.
pub fn extract_ms_level(filter_text: &str) -> Option<MsLevel<'_>> {
    let captures = MS_LEVEL_PATTERN.captures(filter_text)?;
    let level = captures.get(1)?.as_str().parse().ok()?;
    let end = captures.get(0)?.end();
    Some(MsLevel {
        level,
        remainder: filter_text[end..].trim_start(),
    })
}
