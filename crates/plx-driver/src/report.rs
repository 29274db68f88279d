use std::collections::BTreeSet;

use plx_types::UnmatchedFlag;

/// Render the unmatched-flag set as a comma-separated hex list, e.g.
/// `0x0042, 0x1234`. An empty set renders as `none`.
pub fn render_unmatched(flags: &BTreeSet<UnmatchedFlag>) -> String {
    if flags.is_empty() {
        return "none".to_string();
    }
    flags
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
