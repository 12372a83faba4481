// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal_macros::dec;
use treasurer::models::{Category, EntryType, Settings, SubCategory, Transaction};
use treasurer::period::{ReportKind, resolve_period};
use treasurer::render::{render_statement, write_statement_csv};
use treasurer::report::{ReportModel, build_report};

fn at(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, d)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

fn model(with_activity: bool) -> ReportModel {
    let cats = vec![
        Category {
            id: "inc".into(),
            name: "Income".into(),
            r#type: EntryType::Income,
            owner_id: "u".into(),
            icon: None,
        },
        Category {
            id: "exp".into(),
            name: "Expense".into(),
            r#type: EntryType::Expense,
            owner_id: "u".into(),
            icon: None,
        },
    ];
    let subs = vec![
        SubCategory {
            id: "don".into(),
            name: "Donations".into(),
            parent_id: "inc".into(),
            r#type: EntryType::Income,
            owner_id: "u".into(),
        },
        SubCategory {
            id: "util".into(),
            name: "Utilities".into(),
            parent_id: "exp".into(),
            r#type: EntryType::Expense,
            owner_id: "u".into(),
        },
    ];
    let txs = if with_activity {
        vec![
            Transaction {
                id: "t1".into(),
                r#type: EntryType::Income,
                amount: dec!(500000),
                date: at(2),
                description: "Friday box".into(),
                sub_category_id: "don".into(),
                owner_id: "u".into(),
            },
            Transaction {
                id: "t2".into(),
                r#type: EntryType::Expense,
                amount: dec!(150000),
                date: at(5),
                description: "Power bill".into(),
                sub_category_id: "util".into(),
                owner_id: "u".into(),
            },
        ]
    } else {
        Vec::new()
    };
    let period = resolve_period(ReportKind::Monthly, at(16));
    build_report(&period, &txs, &cats, &subs, Some(dec!(1000000))).unwrap()
}

fn settings() -> Settings {
    Settings {
        mosque_name: "Al-Noor Mosque".into(),
        mosque_address: "12 Market Road".into(),
        chairman_name: "H. Ali".into(),
        treasurer_name: "S. Rahman".into(),
        opening_balance: Some(dec!(1000000)),
    }
}

#[test]
fn statement_text_has_letterhead_sections_and_signatures() {
    let text = render_statement(&model(true), &settings(), false);
    assert!(text.starts_with("AL-NOOR MOSQUE\n12 Market Road\n"));
    assert!(text.contains("Report for October 2026"));
    assert!(text.contains("Balance as of 30 September 2026"));
    assert!(text.contains("Donations"));
    assert!(text.contains("500,000"));
    assert!(text.contains("1,350,000"));
    assert!(text.contains("Closing balance as of 31 October 2026"));
    assert!(text.contains("S. Rahman"));
    assert!(!text.contains("Friday box"));
    assert!(!text.contains("No transactions recorded yet."));
}

#[test]
fn detail_lists_each_line_item() {
    let text = render_statement(&model(true), &settings(), true);
    assert!(text.contains("2026-10-02  Friday box"));
    assert!(text.contains("2026-10-05  Power bill"));
}

#[test]
fn empty_ledger_still_renders_a_statement() {
    let text = render_statement(&model(false), &Settings::default(), false);
    assert!(text.contains("No transactions recorded yet."));
    assert!(text.contains("No expense this period"));
    assert!(text.contains("1,000,000"));
}

#[test]
fn csv_has_items_subtotals_and_closing() {
    let mut buf = Vec::new();
    write_statement_csv(&model(true), &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "row,section,category,sub_category,date,description,amount"
    );
    assert_eq!(lines[1], "opening,,,,,Balance as of 30 September 2026,1000000");
    assert!(lines.contains(&"item,income,Income,Donations,2026-10-02 10:00:00,Friday box,500000"));
    assert!(lines.contains(&"subtotal,expense,Expense,Utilities,,,150000"));
    assert_eq!(
        *lines.last().unwrap(),
        "closing,,,,,Closing balance as of 31 October 2026,1350000"
    );
}

#[test]
fn excluded_net_is_shown_in_text_and_csv() {
    let mut m = model(true);
    m.excluded.push(treasurer::errors::InvalidReference {
        transaction_id: "t9".into(),
        problem: treasurer::errors::ReferenceProblem::UnknownSubCategory {
            sub_category_id: "gone".into(),
        },
    });
    m.excluded_net = dec!(-300);

    let text = render_statement(&m, &settings(), false);
    assert!(text.contains("transaction 't9' points to missing sub-category 'gone'"));
    assert!(text.contains("Net -300 not reflected in the closing balance"));

    let mut buf = Vec::new();
    write_statement_csv(&m, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.lines().any(|l| l == "excluded,,,,,,-300"));
}
