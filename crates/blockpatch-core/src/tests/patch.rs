use crate::*;
use std::path::Path;

const DOC: &str = "<p>x</p>\n<h4>MARK</h4>\n<div class=\"mermaid\">\nOLD\n</div>\n<p>y</p>\n";

fn request(path: &Path) -> PatchRequest {
    PatchRequest {
        path: path.to_path_buf(),
        markers: Markers::mermaid("MARK").unwrap(),
        replacement: "<div class=\"mermaid\">\nNEW\n</div>\n".to_string(),
    }
}

#[test]
fn apply_rewrites_file_in_place() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("doc.html");
    std::fs::write(&path, DOC).unwrap();

    let report = apply(&request(&path), PatchOptions::default()).unwrap();
    assert!(report.changed);
    assert!(report.written);
    assert_eq!(report.outcome.blocks_replaced, 1);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "<p>x</p>\n<h4>MARK</h4>\n<div class=\"mermaid\">\nNEW\n</div>\n<p>y</p>\n"
    );

    let again = apply(&request(&path), PatchOptions::default()).unwrap();
    assert_eq!(again.outcome.blocks_replaced, 1);
    assert!(!again.changed);
    assert!(!again.written);
}

#[test]
fn dry_run_never_writes() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("doc.html");
    std::fs::write(&path, DOC).unwrap();

    let options = PatchOptions {
        dry_run: true,
        ..Default::default()
    };
    let report = apply(&request(&path), options).unwrap();
    assert!(report.changed);
    assert!(!report.written);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), DOC);
}

#[test]
fn missing_header_is_reported_not_written() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("doc.html");
    let text = "<p>no header here</p>\n";
    std::fs::write(&path, text).unwrap();

    let report = apply(&request(&path), PatchOptions::default()).unwrap();
    assert!(!report.outcome.header_found);
    assert!(!report.written);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), text);

    let strict = PatchOptions {
        strict: true,
        ..Default::default()
    };
    let err = apply(&request(&path), strict).unwrap_err();
    assert!(matches!(err, Error::HeaderNotFound { ref header, .. } if header == "MARK"));
}

#[test]
fn strict_mode_rejects_missing_block() {
    let req = request(Path::new("doc.html"));
    let strict = PatchOptions {
        strict: true,
        ..Default::default()
    };
    let err = patch_text(&req, "<h4>MARK</h4>\n<p>none</p>\n", strict).unwrap_err();
    assert!(matches!(err, Error::BlockNotFound { header_line: 1, .. }));
}

#[test]
fn unterminated_block_truncates_unless_strict() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("doc.html");
    let text = "<h4>MARK</h4>\n<div class=\"mermaid\">\nOLD\n<p>tail</p>\n";
    std::fs::write(&path, text).unwrap();

    let strict = PatchOptions {
        strict: true,
        ..Default::default()
    };
    let err = apply(&request(&path), strict).unwrap_err();
    assert!(matches!(
        err,
        Error::UnterminatedBlock {
            start_line: 2,
            lines_removed: 3,
            ..
        }
    ));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), text);

    let report = apply(&request(&path), PatchOptions::default()).unwrap();
    assert!(report.outcome.unterminated);
    assert!(report.written);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "<h4>MARK</h4>\n<div class=\"mermaid\">\nNEW\n</div>\n"
    );
}

#[test]
fn missing_file_is_a_read_error() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("absent.html");
    let err = apply(&request(&path), PatchOptions::default()).unwrap_err();
    assert!(matches!(err, Error::ReadFile { .. }));
    assert!(!path.exists());
}

#[test]
fn report_serializes_flat() {
    let report = PatchReport {
        path: "doc.html".into(),
        outcome: ScanOutcome {
            header_found: true,
            header_line: Some(2),
            block_start_line: Some(3),
            block_end_line: Some(5),
            blocks_replaced: 1,
            lines_removed: 3,
            unterminated: false,
        },
        changed: true,
        written: true,
    };
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["path"], "doc.html");
    assert_eq!(value["blocks_replaced"], 1);
    assert_eq!(value["header_line"], 2);
    assert_eq!(value["written"], true);
}

#[test]
fn replacement_without_trailing_newline_is_flagged() {
    let mut req = request(Path::new("doc.html"));
    req.replacement = "<div class=\"mermaid\">\nNEW\n</div>".to_string();

    let (once, outcome) = patch_text(&req, DOC, PatchOptions::default()).unwrap();
    assert_eq!(
        once,
        "<p>x</p>\n<h4>MARK</h4>\n<div class=\"mermaid\">\nNEW\n</div><p>y</p>\n"
    );
    assert_eq!(outcome.block_end_line, Some(5));

    let strict = PatchOptions {
        strict: true,
        ..Default::default()
    };
    let err = patch_text(&req, DOC, strict).unwrap_err();
    assert!(matches!(err, Error::JoinedLine { line: 6, .. }));
}

#[test]
fn replacement_without_trailing_newline_at_end_of_file_is_fine() {
    let mut req = request(Path::new("doc.html"));
    req.replacement = "<div class=\"mermaid\">\nNEW\n</div>".to_string();
    let strict = PatchOptions {
        strict: true,
        ..Default::default()
    };
    let text = "<h4>MARK</h4>\n<div class=\"mermaid\">\nOLD\n</div>\n";
    let (once, _) = patch_text(&req, text, strict).unwrap();
    let (twice, _) = patch_text(&req, &once, strict).unwrap();
    assert_eq!(once, twice);
}
