/// Summary note markers written by earlier releases must still be recognized.
///
/// These values are part of the note format: cleanup finds old summaries by
/// the header prefix, so changing a default silently orphans existing notes.
use hilite_core::config::{is_hex_color, SummaryConfig};
use hilite_core::defaults;

#[test]
fn test_default_header_prefix_is_stable() {
    let config = SummaryConfig::default();
    assert_eq!(
        config.header_prefix(),
        "<h2>Ord og forkortelser (#ffd400",
        "default header prefix must match notes written by earlier runs"
    );
}

#[test]
fn test_default_host_marker() {
    assert_eq!(defaults::HOST_CITATION_MARKER, "<div data-citation-items");
    assert_eq!(defaults::HOST_ANNOTATIONS_LABEL, "Annotations");
}

#[test]
fn test_default_color_is_valid_hex() {
    assert!(is_hex_color(defaults::TARGET_COLOR));
}

#[test]
fn test_toml_defaults_match_struct_defaults() {
    let from_toml = SummaryConfig::from_toml_str("[summary]\n").expect("empty table parses");
    assert_eq!(from_toml, SummaryConfig::default());
}

#[test]
fn test_env_lookup_without_keys_matches_defaults() {
    let from_env = SummaryConfig::from_lookup(|_| None).expect("defaults are valid");
    assert_eq!(from_env, SummaryConfig::default());
}
