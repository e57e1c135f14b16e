//! End-to-end flow: capture lines, persist them, group them into sessions,
//! export, then edit and delete and regroup.

use chrono::{Duration, TimeZone, Utc};
use std::collections::HashMap;
use stocktake::{
    aggregate, decode, export_all, export_session, CaptureSession, ExportError, LineDraft, LineEdit,
    LineSet, MasterCatalog, MaterialRecord, ScanLine, EXPORT_HEADER,
};
use stocktake_protocol::{read_lines, write_lines};
use tempfile::TempDir;

fn catalog() -> MasterCatalog {
    let mut catalog = MasterCatalog::new();
    catalog.insert_warehouse(
        "M02",
        HashMap::from([
            (
                "6297000859002".to_string(),
                MaterialRecord {
                    material: "100234".to_string(),
                    description: "Paracetamol 500mg".to_string(),
                },
            ),
            (
                "6281006431097".to_string(),
                MaterialRecord {
                    material: "77001".to_string(),
                    description: "Infant formula 400g".to_string(),
                },
            ),
        ]),
    );
    catalog
}

/// Capture one line and stamp it the way the record store does on commit.
fn capture(session: &CaptureSession, raw: &str, batch: &str, qty: &str, offset_secs: i64) -> ScanLine {
    let outcome = session.lookup(raw, &catalog()).unwrap();
    let mut draft = LineDraft {
        batch: batch.to_string(),
        qty: qty.to_string(),
        ..LineDraft::default()
    };
    draft.apply(&outcome);
    let mut line = draft.finalize(session).unwrap();
    let base = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
    line.created_at = Some(base + Duration::seconds(offset_secs));
    line
}

fn captured_lines() -> Vec<ScanLine> {
    let bin_a = CaptureSession::start("HH-07", "M02", "A", "A-01-03").unwrap();
    let bin_b = CaptureSession::start("HH-07", "M02", "A", "A-01-04").unwrap();
    vec![
        capture(&bin_a, "0106297000859002 10DX1A", "", "12", 0),
        capture(&bin_b, "6281006431097", "L2291", "3", 10),
        capture(&bin_a, "6281006431097.0", "L2291", "1.5", 20),
    ]
}

#[test]
fn capture_persist_aggregate_export() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lines.json");
    write_lines(&path, &captured_lines()).unwrap();

    let mut set = LineSet::new(read_lines(&path).unwrap());
    set.sort_by_created();
    let index = set.aggregate();

    let keys: Vec<&str> = index.keys().collect();
    assert_eq!(keys, vec!["HH-07|M02|A|A-01-03", "HH-07|M02|A|A-01-04"]);
    assert_eq!(index.total_lines(), 3);

    let summaries = index.summaries();
    assert_eq!(summaries[0].index, 1);
    assert_eq!(summaries[0].line_count, 2);
    assert_eq!(summaries[1].index, 2);

    let all = export_all(&index).unwrap();
    assert_eq!(all.file_stem, "UPC_Inventory_ALL");
    assert_eq!(all.header().len(), EXPORT_HEADER.len());
    assert_eq!(all.body().len(), 3);
    assert_eq!(all.body()[0][7], "DX1A", "batch read from the QR payload");
    assert_eq!(all.body()[0][8], "12");
    assert_eq!(all.body()[0][9], "2025-05-01T09:00:00.000Z");

    let one = export_session(&index, "HH-07|M02|A|A-01-03").unwrap();
    assert_eq!(one.file_stem, "UPC_Inventory_HH-07_M02_A_A-01-03");
    assert_eq!(one.body().len(), 2);
    assert_eq!(one.body()[1][6], "6281006431097");
    assert_eq!(one.body()[1][8], "1.5");
}

#[test]
fn review_edit_and_delete_regroup() {
    let mut set = LineSet::new(captured_lines());
    let first = set.as_slice()[0].id.clone();
    let only_in_b = set.as_slice()[1].id.clone();

    let edit = LineEdit::from_input("DX1B", "10").unwrap();
    let updated = set.replace(&first, &edit).unwrap();
    assert_eq!(updated.id, first);
    assert_eq!(updated.batch, "DX1B");

    set.remove(&only_in_b).unwrap();
    let index = set.aggregate();
    assert_eq!(index.len(), 1, "session with no lines disappears");
    assert!(index.get("HH-07|M02|A|A-01-04").is_none());

    let err = export_session(&index, "HH-07|M02|A|A-01-04").unwrap_err();
    assert!(matches!(err, ExportError::Session(_)));
}

#[test]
fn empty_collection_has_nothing_to_export() {
    let lines: Vec<ScanLine> = Vec::new();
    let index = aggregate(&lines);
    assert!(index.is_empty());
    assert_eq!(export_all(&index).unwrap_err(), ExportError::NoData);
}

#[test]
fn decode_properties() {
    assert_eq!(decode("").barcode, "");
    assert_eq!(decode("   ").batch, "");
    assert_eq!(decode("6297000859002").barcode, "6297000859002");
    assert_eq!(decode("6297000859002.0").barcode, "6297000859002");
    assert_eq!(decode("garbage-no-ai-markers").barcode, "garbage-no-ai-markers");

    let gs1 = decode("0106297000859002211ACH0W6N3C 1015DX1A 17270228");
    assert_eq!(gs1.barcode, "6297000859002");
    assert_eq!(gs1.batch, "15DX1A", "batch runs to the next space");
    assert_eq!(decode("0106297000859002 10LOT").batch, "LOT");

    let raw = "0106297000859002 10LOT7";
    assert_eq!(decode(raw), decode(raw), "decoding is deterministic");
}

#[test]
fn aggregate_is_stable_under_append() {
    let lines = captured_lines();
    let before: Vec<String> = aggregate(&lines[..2]).keys().map(str::to_string).collect();
    let after: Vec<String> = aggregate(&lines).keys().map(str::to_string).collect();
    assert_eq!(&after[..before.len()], &before[..]);

    let index = aggregate(&lines);
    let sizes: usize = index.iter().map(|g| g.line_count()).sum();
    assert_eq!(sizes, lines.len(), "every line lands in exactly one group");
}
