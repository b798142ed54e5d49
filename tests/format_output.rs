//! Output format integration: real parses rendered through the registry.

use atfgram::formats::{to_tag_str, to_treeviz_str, FormatRegistry};
use atfgram::parsing::parse_line;
use atfgram::testing::fixtures;

#[test]
fn tag_format_renders_a_real_parse() {
    let grammar = fixtures::compiled_ebl();
    let tree = parse_line(&grammar, fixtures::EBL_TEXTLINE).unwrap();

    assert_eq!(
        to_tag_str(&tree),
        "<start>\n  <textline>\n    <INTRO>This is an</INTRO>\n    <EBL>eBL</EBL>\n    <TEXTLINE_WORD>textline</TEXTLINE_WORD>\n  </textline>\n</start>"
    );
}

#[test]
fn treeviz_format_renders_a_real_parse() {
    let grammar = fixtures::compiled_ebl();
    let tree = parse_line(&grammar, fixtures::COMMON_LINE).unwrap();

    assert_eq!(
        to_treeviz_str(&tree),
        "⊚ start\n  ⊚ common_line\n    ◦ \"And this is a\" And this is a\n    ◦ COMMON common\n    ◦ LINETYPE_WORD linetype"
    );
}

#[test]
fn json_format_preserves_spans() {
    let grammar = fixtures::compiled_ebl();
    let tree = parse_line(&grammar, fixtures::EBL_TEXTLINE).unwrap();

    let registry = FormatRegistry::with_defaults();
    let rendered = registry.serialize(&tree, "json").unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

    assert_eq!(value["kind"], "node");
    assert_eq!(value["rule"], "start");
    let leaf = &value["children"][0]["children"][0];
    assert_eq!(leaf["terminal"], "INTRO");
    assert_eq!(leaf["text"], "This is an");
    assert_eq!(leaf["span"]["start"], 0);
    assert_eq!(leaf["span"]["end"], 10);
}

#[test]
fn every_registered_format_handles_the_same_tree() {
    let grammar = fixtures::compiled_oracc();
    let tree = parse_line(&grammar, fixtures::ORACC_LINE).unwrap();

    let registry = FormatRegistry::with_defaults();
    for format in registry.list_formats() {
        let rendered = registry.serialize(&tree, &format).unwrap();
        assert!(!rendered.is_empty(), "format {format} produced nothing");
    }
}
