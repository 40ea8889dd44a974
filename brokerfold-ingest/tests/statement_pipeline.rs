use brokerfold_core::{approx_eq, Deferred, Diagnostic, StatementError, SummaryKind, TxType};
use brokerfold_ingest::{process_statement, LinePatterns};
use chrono::NaiveDate;

const FILE: &str = "../statements/ADMIS/2016-05/262-V8956:2016-05-31.txt";

const ACTIVITY: &str = "Y O U R   A C T I V I T Y   T H I S   M O N T H";
const POSITIONS: &str = "P O S I T I O N S   I N   Y O U R   A C C O U N T";

const TITLES: &str = "   DATE            LONG/BUY  SHRT/SELL      DESCRIPTION           EX   PRICE/LEGND CC          DEBIT            CREDIT";

/// One page header: date, account, address filler, blank line, optional banner, titles.
/// With the default filler of 7 it spans the 11 counted lines a real statement has.
fn page_header(account: &str, banner: Option<&str>, filler: usize) -> Vec<String> {
    let mut out = vec![
        "                                                                      STATEMENT  DATE:  MAY 31, 2016".to_string(),
        format!("                                                                      ACCOUNT  NUMBER:  {account}"),
    ];
    for i in 0..filler {
        out.push(format!("     ADDRESS LINE {i}"));
    }
    out.push(String::new());
    if let Some(b) = banner {
        out.push(format!("                         {b}"));
    }
    out.push(TITLES.to_string());
    out
}

/// Three pages: activity, positions, then the balance segment.
fn statement(account: &str, filler: usize) -> String {
    let mut lines = page_header(account, Some(ACTIVITY), filler);
    lines.extend(
        [
            "  5/10/6                        9  PUT  DEC 16 CORN           350  A     NET PREM  US                         6,335.91",
            "                                   OPTION PREMIUM MEMO",
            "  5/25/6            10             DEC 16 CORN                     A     FEE/COMM  US         105.10",
            "  5/25/6            10         10  DEC 16 CORN                     A          P&L  US                         4,625.00",
            "  5/25/6                       10  DEC 16 CORN                     A     FEE/COMM  US         105.10",
            "  4/27/6             4             PUT  DEC 16 LIVE CATTLE   1160  B     NET PREM  US      11,800.00",
            "                                   TRANSFER TRADE",
            " 12/28/6                           Ach Received                              CASH  US                        20,000.00",
        ]
        .map(String::from),
    );

    // positions page has no blank line above the banner, so one more address line
    let mut positions = page_header(account, Some(POSITIONS), filler + 1);
    positions.retain(|l| !l.is_empty());
    lines.extend(positions);
    lines.extend(
        [
            "  5/25/6            10             DEC 16 CORN                     A     3.97 3/4  US       1,250.00",
            "  5/10/6                        9  PUT  DEC 16 CORN           350  A      .14 1/2  US       3,375.00",
            "                                   * CLOSING PRICE 3.72 1/2",
        ]
        .map(String::from),
    );

    // the segment banner takes the place of the column titles
    let mut segment = page_header(account, None, filler);
    segment.pop();
    segment.push("               *** SEG USD ***".to_string());
    lines.extend(segment);
    lines.extend(
        [
            "  1. BEGINNING ACCT BALANCE            90,122.69",
            "  2. P&L AND CASH ACTIVITY             23,932.40-",
            "  7. FUT OPEN TRADE EQUITY              1,250.00-",
            " 11. CONVERTED ACCT VALUE US          335,070.29",
        ]
        .map(String::from),
    );
    lines.join("\n")
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn test_full_statement() {
    let p = LinePatterns::new().unwrap();
    let mut sink: Vec<Diagnostic> = Vec::new();
    let text = statement("262 V8956", 7);
    let result = process_statement(FILE, text.as_bytes(), &p, &mut sink).unwrap();

    assert!(sink.is_empty(), "unexpected diagnostics: {sink:?}");
    assert_eq!(result.file.account_id, "262-V8956");
    assert_eq!(result.header.account_id.as_deref(), Some("262-V8956"));
    assert_eq!(result.header.statement_date, Some(d(2016, 5, 31)));

    let records = result.records;
    let labels: Vec<_> = records.activity.iter().map(|r| r.tx_label()).collect();
    assert_eq!(
        labels,
        vec!["PUT", "FUTURES", "FEES", "FUTURES", "FEES", "TRANSFER-PUT", "TRANSFER"]
    );

    // lines carry their position in the file, headers included
    let put = &records.activity[0];
    assert_eq!(put.line_number, 12);
    assert_eq!(put.statement_id, "262-V8956:2016-05-31.txt");
    assert_eq!(put.qty, Some(Deferred::Known(-9)));
    assert!(approx_eq(
        put.value_per_unit.and_then(|v| v.value()).unwrap(),
        6335.91 / (5000.0 * -9.0)
    ));

    // opening trade synthesized from the fee and the matching position
    let opened = &records.activity[1];
    assert_eq!(opened.line_number, records.activity[2].line_number);
    assert_eq!(opened.tx_type, TxType::Futures);
    assert_eq!(opened.amount, 0.0);
    assert_eq!(opened.qty, Some(Deferred::Known(10)));
    assert_eq!(opened.units_per_contract, 5000);
    assert_eq!(opened.value_per_unit, Some(Deferred::Known(3.9775)));
    assert!(opened.closing.is_none());

    // closing P&L line takes its quantity from the fee below it
    let closed = &records.activity[3];
    assert_eq!(closed.qty, Some(Deferred::Known(-10)));
    assert_eq!(closed.amount, 4625.0);
    assert!(closed.closing.is_some());

    let transfer = &records.activity[6];
    assert_eq!(transfer.date, d(2016, 12, 28));
    assert_eq!(transfer.amount, 20000.0);

    assert_eq!(records.positions.len(), 2);
    assert_eq!(records.positions[0].tx_type, TxType::Futures);
    assert_eq!(records.positions[1].strike, Some(3.5));

    let summary: Vec<_> = records.summary.iter().map(|s| (s.kind, s.amount)).collect();
    assert_eq!(
        summary,
        vec![
            (SummaryKind::BeginningBalance, 90122.69),
            (SummaryKind::PnlAndCashActivity, -23932.40),
            (SummaryKind::ConvertedAccountValue, 335070.29),
        ]
    );
}

#[test]
fn test_header_account_differs_from_filename() {
    let p = LinePatterns::new().unwrap();
    let mut sink: Vec<Diagnostic> = Vec::new();
    process_statement(FILE, statement("262 V8960", 7).as_bytes(), &p, &mut sink).unwrap();
    assert_eq!(
        sink,
        vec![Diagnostic::AccountMismatch {
            statement: "262-V8956:2016-05-31.txt".into(),
            from_filename: "262-V8956".into(),
            from_header: "262-V8960".into(),
        }]
    );
}

#[test]
fn test_short_header_aborts() {
    let p = LinePatterns::new().unwrap();
    let mut sink: Vec<Diagnostic> = Vec::new();
    let text = statement("262 V8956", 6);
    let err = process_statement(FILE, text.as_bytes(), &p, &mut sink).unwrap_err();
    assert!(matches!(err, StatementError::HeaderLength { count: 10, expected: 11, .. }));
}

#[test]
fn test_bad_filename_aborts_before_reading() {
    let p = LinePatterns::new().unwrap();
    let mut sink: Vec<Diagnostic> = Vec::new();
    let err = process_statement("notes.txt", b"", &p, &mut sink).unwrap_err();
    assert!(matches!(err, StatementError::FileName { .. }));
}

#[test]
fn test_unknown_commodity_names_the_line() {
    let p = LinePatterns::new().unwrap();
    let mut sink: Vec<Diagnostic> = Vec::new();
    let text = statement("262 V8956", 7).replace(
        "  5/10/6                        9  PUT  DEC 16 CORN           350",
        "  5/10/6                        9  PUT  DEC 16 WHEAT          350",
    );
    let err = process_statement(FILE, text.as_bytes(), &p, &mut sink).unwrap_err();
    assert!(err.to_string().contains("LINE 12"), "{err}");
}

#[test]
fn test_statement_without_activity() {
    let p = LinePatterns::new().unwrap();
    let mut sink: Vec<Diagnostic> = Vec::new();
    let mut lines = page_header("262 V8956", Some(POSITIONS), 7);
    lines.push(
        "  5/10/6                        9  PUT  DEC 16 CORN           350  A      .14 1/2  US       3,375.00".to_string(),
    );
    let result = process_statement(FILE, lines.join("\n").as_bytes(), &p, &mut sink).unwrap();
    assert!(result.records.activity.is_empty());
    assert_eq!(result.records.positions.len(), 1);
    assert!(sink.is_empty());
}
