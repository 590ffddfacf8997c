//! YAML configuration driving the quantize and inspect commands.

mod common;

use common::{fixtures, Workspace};
use palettize::commands;
use palettize::config::{Overrides, ToolConfig};
use pretty_assertions::assert_eq;

#[test]
fn test_config_file_selects_palette_and_method() {
    let ws = Workspace::new();
    let config = ws.write_file(
        "palettize.yaml",
        r##"
palette: ["#000", "#808080", "#fff"]
method: octree
bits: 6
"##,
    );
    let settings = ToolConfig::load(&config)
        .resolve(&Overrides::default())
        .unwrap();

    let input = ws.write_png("ramp.png", &fixtures::gray_ramp(5, 1));
    let output = ws.path("out.png");
    let report = commands::quantize_file(&input, &output, &settings, false).unwrap();
    let colormap = report.colormap.unwrap();
    assert_eq!(colormap.method, "oct-tree");
    assert_eq!(colormap.bits, Some(6));
    assert!(colormap.tree_nodes.is_some());

    // Ramp values 0, 63, 127, 191, 255
    assert_eq!(common::read_indices(&output), vec![0, 0, 1, 1, 2]);
}

#[test]
fn test_command_line_overrides_config_file() {
    let ws = Workspace::new();
    let config = ws.write_file("palettize.yaml", "palette: [\"#123456\"]\nmethod: octree\n");
    let overrides = Overrides {
        palette: Some("#000,#fff".into()),
        method: Some("brute-force".into()),
        ..Default::default()
    };
    let settings = ToolConfig::load(&config).resolve(&overrides).unwrap();
    let summary = commands::inspect(&settings, false).unwrap();
    assert_eq!(summary.entries, 2);
    assert_eq!(summary.method, "brute force");
}

#[test]
fn test_broken_config_falls_back_to_defaults() {
    let ws = Workspace::new();
    let config = ws.write_file("palettize.yaml", "method: [oops");
    let settings = ToolConfig::load(&config)
        .resolve(&Overrides::default())
        .unwrap();
    let summary = commands::inspect(&settings, false).unwrap();
    assert_eq!(summary.entries, 216);
    assert_eq!(summary.method, "independent channel");
}

#[test]
fn test_inspect_summary_serializes() {
    let settings = fixtures::settings("#000,#fff,#f00");
    let summary = commands::inspect(&settings, true).unwrap();
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["entries"], 3);
    assert_eq!(json["input_type"], "s16");
    assert_eq!(json["output_type"], "u8");
    assert_eq!(json["tree_nodes"], serde_json::Value::Null);
}
