// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Invariants of statement windows and statement totals over arbitrary
//! ledgers.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use rust_decimal::Decimal;
use treasurer::models::{Category, EntryType, SubCategory, Transaction};
use treasurer::period::{Placement, ReportKind, resolve_period};
use treasurer::report::build_report;

fn arb_instant() -> impl Strategy<Value = NaiveDateTime> {
    (2020i32..2030, 1u32..13, 1u32..29, 0i64..86_400_000).prop_map(|(y, m, d, ms)| {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::milliseconds(ms)
    })
}

fn arb_kind() -> impl Strategy<Value = ReportKind> {
    prop_oneof![Just(ReportKind::Weekly), Just(ReportKind::Monthly)]
}

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000).prop_map(|n| Decimal::new(n, 2))
}

fn arb_transaction() -> impl Strategy<Value = (bool, Decimal, NaiveDateTime)> {
    (any::<bool>(), arb_amount(), arb_instant())
}

fn taxonomy() -> (Vec<Category>, Vec<SubCategory>) {
    let cats = vec![
        Category {
            id: "in".into(),
            name: "Income".into(),
            r#type: EntryType::Income,
            owner_id: "u".into(),
            icon: None,
        },
        Category {
            id: "out".into(),
            name: "Expense".into(),
            r#type: EntryType::Expense,
            owner_id: "u".into(),
            icon: None,
        },
    ];
    let subs = vec![
        SubCategory {
            id: "gifts".into(),
            name: "Gifts".into(),
            parent_id: "in".into(),
            r#type: EntryType::Income,
            owner_id: "u".into(),
        },
        SubCategory {
            id: "bills".into(),
            name: "Bills".into(),
            parent_id: "out".into(),
            r#type: EntryType::Expense,
            owner_id: "u".into(),
        },
    ];
    (cats, subs)
}

fn to_transactions(raw: &[(bool, Decimal, NaiveDateTime)]) -> Vec<Transaction> {
    raw.iter()
        .enumerate()
        .map(|(i, (income, amount, date))| {
            let (r#type, sub) = if *income {
                (EntryType::Income, "gifts")
            } else {
                (EntryType::Expense, "bills")
            };
            Transaction {
                id: format!("t{}", i),
                r#type,
                amount: *amount,
                date: *date,
                description: String::new(),
                sub_category_id: sub.into(),
                owner_id: "u".into(),
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn reference_lies_inside_its_window(kind in arb_kind(), reference in arb_instant()) {
        let p = resolve_period(kind, reference);
        prop_assert!(p.start <= reference && reference <= p.end);
        prop_assert_eq!(p.classify(reference), Placement::Within);
    }

    #[test]
    fn consecutive_windows_leave_no_gap(kind in arb_kind(), reference in arb_instant()) {
        let p = resolve_period(kind, reference);
        let next = p.following().unwrap();
        prop_assert_eq!(next.start, p.end + Duration::milliseconds(1));
        prop_assert_eq!(next.kind, kind);
    }

    #[test]
    fn weekly_windows_span_friday_to_thursday(reference in arb_instant()) {
        use chrono::{Datelike, Weekday};
        let p = resolve_period(ReportKind::Weekly, reference);
        prop_assert_eq!(p.start_date().weekday(), Weekday::Fri);
        prop_assert_eq!(p.end_date().weekday(), Weekday::Thu);
        prop_assert_eq!((p.end_date() - p.start_date()).num_days(), 6);
    }

    #[test]
    fn every_transaction_lands_in_exactly_one_bucket(
        kind in arb_kind(),
        reference in arb_instant(),
        raw in prop::collection::vec(arb_transaction(), 0..40),
        opening in arb_amount(),
    ) {
        let (cats, subs) = taxonomy();
        let txs = to_transactions(&raw);
        let p = resolve_period(kind, reference);
        let m = build_report(&p, &txs, &cats, &subs, Some(opening)).unwrap();

        let before: Decimal = txs
            .iter()
            .filter(|t| p.classify(t.date) == Placement::Before)
            .map(|t| t.signed_amount())
            .sum();
        let within = txs.iter().filter(|t| p.contains(t.date)).count();

        prop_assert_eq!(m.carried_balance, opening + before);
        prop_assert_eq!(m.within_count, within);
        prop_assert_eq!(m.closing_balance, m.carried_balance + m.total_income - m.total_expense);
    }

    #[test]
    fn next_window_opens_with_previous_closing(
        kind in arb_kind(),
        reference in arb_instant(),
        raw in prop::collection::vec(arb_transaction(), 0..40),
        opening in arb_amount(),
    ) {
        let (cats, subs) = taxonomy();
        let txs = to_transactions(&raw);
        let p = resolve_period(kind, reference);
        let first = build_report(&p, &txs, &cats, &subs, Some(opening)).unwrap();
        let second = build_report(&p.following().unwrap(), &txs, &cats, &subs, Some(opening)).unwrap();
        prop_assert_eq!(second.carried_balance, first.closing_balance);
    }

    #[test]
    fn excluded_rows_carry_into_the_next_window(
        kind in arb_kind(),
        reference in arb_instant(),
        raw in prop::collection::vec(arb_transaction(), 0..40),
        broken in prop::collection::vec(any::<bool>(), 40),
        opening in arb_amount(),
    ) {
        let (cats, subs) = taxonomy();
        let mut txs = to_transactions(&raw);
        for (tx, orphan) in txs.iter_mut().zip(broken) {
            if orphan {
                tx.sub_category_id = "deleted".into();
            }
        }
        let p = resolve_period(kind, reference);
        let first = build_report(&p, &txs, &cats, &subs, Some(opening)).unwrap();
        let second = build_report(&p.following().unwrap(), &txs, &cats, &subs, Some(opening)).unwrap();
        prop_assert_eq!(second.carried_balance, first.closing_balance + first.excluded_net);
    }

    #[test]
    fn line_items_never_go_back_in_time(
        reference in arb_instant(),
        raw in prop::collection::vec(arb_transaction(), 0..40),
    ) {
        let (cats, subs) = taxonomy();
        let txs = to_transactions(&raw);
        let p = resolve_period(ReportKind::Monthly, reference);
        let m = build_report(&p, &txs, &cats, &subs, Some(Decimal::ZERO)).unwrap();
        for section in m.income_sections.iter().chain(m.expense_sections.iter()) {
            for sub in &section.sub_category_sections {
                prop_assert!(sub.line_items.windows(2).all(|w| w[0].date <= w[1].date));
            }
        }
    }
}
