use brokerfold_core::{
    ActivityRecord, AggregateResult, ClosingBasis, Commodity, Deferred, PositionRecord, TxType,
};
use brokerfold_report::{export_month, workbook_bytes, ExportError, MonthlyExport};
use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

fn aggregate() -> AggregateResult {
    AggregateResult {
        activity: vec![ActivityRecord {
            line_number: 33,
            account_id: "262-V8956".into(),
            statement_id: "262-V8956:2016-05-31.txt".into(),
            date: NaiveDate::from_ymd_opt(2016, 5, 25).unwrap(),
            tx_type: TxType::Futures,
            commodity: Commodity::Corn,
            amount: 4625.0,
            qty: Some(Deferred::Known(-10)),
            trade_month: Some("DEC16".into()),
            strike: None,
            units_per_contract: 5000,
            value_per_unit: Some(Deferred::Unknown),
            transfer_trade: false,
            closing: Some(ClosingBasis::unresolved()),
        }],
        positions: vec![PositionRecord {
            line_number: 122,
            account_id: "262-V8956".into(),
            statement_id: "262-V8956:2016-05-31.txt".into(),
            date: NaiveDate::from_ymd_opt(2014, 9, 24).unwrap(),
            tx_type: TxType::Futures,
            commodity: Commodity::Corn,
            qty: 10,
            trade_month: "DEC16".into(),
            strike: None,
            units_per_contract: 5000,
            initial_value_per_unit: 3.9775,
            current_amount: -1250.0,
            current_value_per_unit: 3.9525,
            initial_amount: 0.0,
            net_amount: -1250.0,
        }],
        ..Default::default()
    }
}

fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_writes_one_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let target = MonthlyExport::in_dir(dir.path(), 2016, 5);
    export_month(&aggregate(), &target, false).unwrap();

    let bytes = fs::read(&target.path).unwrap();
    assert!(bytes.starts_with(b"PK"), "not a zip container");
    assert_eq!(entries(dir.path()), vec!["2016-05_Combined.xlsx"]);
}

/// Excel serial day of a date cell, however the reader types it
fn serial(cell: &Data) -> f64 {
    match cell {
        Data::DateTime(dt) => dt.as_f64(),
        Data::Float(f) => *f,
        other => panic!("not a date cell: {other:?}"),
    }
}

#[test]
fn test_sheets_hold_typed_cells() {
    let dir = tempfile::tempdir().unwrap();
    let target = MonthlyExport::in_dir(dir.path(), 2016, 5);
    export_month(&aggregate(), &target, false).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&target.path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["activity", "positions"]);

    let activity = workbook.worksheet_range("activity").unwrap();
    assert_eq!(activity.height(), 2);
    assert_eq!(activity.get((0, 0)), Some(&Data::String("date".into())));
    assert_eq!(activity.get((0, 9)), Some(&Data::String("balance".into())));
    let row = |col: usize| activity.get((1, col)).cloned().unwrap_or(Data::Empty);
    assert_eq!(serial(&row(0)), 42515.0);
    assert_eq!(row(1), Data::Float(-10.0));
    assert_eq!(row(2), Data::String("FUTURES".into()));
    assert_eq!(row(5), Data::Empty);
    assert_eq!(row(7), Data::String("UNKNOWN".into()));
    assert_eq!(row(8), Data::Float(4625.0));
    assert_eq!(row(9), Data::Empty);
    assert_eq!(row(10), Data::String("UNKNOWN".into()));
    assert_eq!(row(17), Data::String("262-V8956:2016-05-31.txt".into()));

    let positions = workbook.worksheet_range("positions").unwrap();
    assert_eq!(positions.height(), 2);
    let row = |col: usize| positions.get((1, col)).cloned().unwrap_or(Data::Empty);
    assert_eq!(serial(&row(0)), 41906.0);
    assert_eq!(row(1), Data::Float(10.0));
    assert_eq!(row(3), Data::String("DEC16".into()));
    assert_eq!(row(5), Data::Empty);
    assert_eq!(row(7), Data::Float(3.9775));
    assert_eq!(row(11), Data::Float(-1250.0));
}

#[test]
fn test_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let target = MonthlyExport::in_dir(dir.path(), 2016, 5);
    fs::write(&target.path, "keep me").unwrap();

    let err = export_month(&aggregate(), &target, false).unwrap_err();
    match &err {
        ExportError::Exists(path) => assert_eq!(path, &target.path),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("2016-05_Combined.xlsx"));
    assert_eq!(fs::read_to_string(&target.path).unwrap(), "keep me");
    assert_eq!(entries(dir.path()), vec!["2016-05_Combined.xlsx"]);
}

#[test]
fn test_force_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let target = MonthlyExport::in_dir(dir.path(), 2016, 5);
    fs::write(&target.path, "old").unwrap();

    export_month(&aggregate(), &target, true).unwrap();
    let bytes = fs::read(&target.path).unwrap();
    assert!(bytes.starts_with(b"PK"));
    assert_eq!(entries(dir.path()), vec!["2016-05_Combined.xlsx"]);
}

#[test]
fn test_workbook_image_is_a_zip_container() {
    let bytes = workbook_bytes(&aggregate()).unwrap();
    assert!(bytes.starts_with(b"PK"));
    assert!(bytes.len() > 1000);
}

#[test]
fn test_missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let target = MonthlyExport::in_dir(dir.path().join("2016-05"), 2016, 5);
    let err = export_month(&aggregate(), &target, false).unwrap_err();
    assert!(matches!(err, ExportError::Io { .. }));
    assert!(entries(dir.path()).is_empty());
}

#[test]
fn test_failed_write_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let target = MonthlyExport::in_dir(dir.path(), 2016, 5);
    // a directory squatting on the workbook name makes the final rename fail
    fs::create_dir(&target.path).unwrap();

    let err = export_month(&aggregate(), &target, true).unwrap_err();
    match &err {
        ExportError::Io { path, .. } => assert_eq!(path, &target.path),
        other => panic!("unexpected error: {other}"),
    }
    assert!(target.path.is_dir());
    assert_eq!(entries(dir.path()), vec!["2016-05_Combined.xlsx"]);
}
