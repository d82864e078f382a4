//! End-to-end: a JSON document snapshot on disk, loaded and scanned.

use designsync::core::{Category, ExportFormat, ScanScope};
use designsync::coverage::CoverageEngine;
use designsync::document::JsonDocument;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const SNAPSHOT: &str = r#"{
  "currentPageId": "page:1",
  "pages": [
    {
      "id": "page:1",
      "name": "Components",
      "nodes": [
        {
          "id": "1:1",
          "name": "Card",
          "type": "FRAME",
          "layoutMode": "VERTICAL",
          "itemSpacing": 16,
          "padding": { "left": 24, "top": 24, "right": 24, "bottom": 24 },
          "ancestors": [{ "name": "Components", "kind": "PAGE" }]
        },
        {
          "id": "1:2",
          "name": "Card Title",
          "type": "TEXT",
          "fills": [{ "type": "SOLID", "color": { "r": 0.1, "g": 0.1, "b": 0.1 } }],
          "ancestors": [
            { "name": "Card", "kind": "FRAME" },
            { "name": "Components", "kind": "PAGE" }
          ]
        },
        {
          "id": "1:3",
          "name": "Badge",
          "type": "INSTANCE",
          "cornerRadii": { "topLeft": 4, "topRight": 4, "bottomLeft": 4, "bottomRight": 4 },
          "ancestors": [{ "name": "Components", "kind": "PAGE" }]
        }
      ]
    }
  ],
  "variables": [
    {
      "id": "var:1",
      "name": "spacing/lg",
      "collection": "primitives",
      "resolvedType": "FLOAT",
      "value": 24
    }
  ]
}"#;

#[tokio::test]
async fn snapshot_file_scan_reports_expected_issues() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SNAPSHOT.as_bytes()).unwrap();

    let document = JsonDocument::load(file.path()).unwrap();
    let engine = CoverageEngine::new(Arc::new(document), ExportFormat::Css);
    let result = engine.analyze(ScanScope::CurrentPage).await.unwrap();

    assert_eq!(result.total_nodes, 3);

    let layout = &result.issues_by_category[&Category::Layout];
    let properties: Vec<&str> = layout.iter().map(|i| i.property.as_str()).collect();
    assert!(properties.contains(&"Gap"));
    assert!(properties.contains(&"Padding"));

    let padding = layout.iter().find(|i| i.property == "Padding").unwrap();
    assert_eq!(padding.value, "24px");
    assert_eq!(padding.matching_variables.len(), 1);
    assert_eq!(padding.matching_variables[0].name, "spacing/lg");

    let fills = &result.issues_by_category[&Category::Fill];
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].value, "rgb(26, 26, 26)");
    assert_eq!(fills[0].node_frames, vec!["Card"]);

    let appearance = &result.issues_by_category[&Category::Appearance];
    assert_eq!(appearance.len(), 1);
    assert_eq!(appearance[0].property, "Corner Radius");
    assert_eq!(appearance[0].value, "4px");
}
