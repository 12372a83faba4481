// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Statement computation.
//!
//! Turns a ledger snapshot and a resolved [`Period`] into a [`ReportModel`]:
//! the balance carried into the window, per-category and per-sub-category
//! sections for the window itself, and the closing balance. All sums are
//! exact decimal arithmetic. Nothing here reads the clock, touches storage
//! or logs; problems come back as values.

use crate::errors::{InvalidReference, ReportError};
use crate::models::{Category, EntryType, SubCategory, Transaction};
use crate::period::{Period, Placement, ReportKind};
use crate::store::LedgerSnapshot;
use crate::validation::check_placement;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

/// What to do with a window transaction that cannot be placed in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidReferencePolicy {
    /// Leave it out of the sections and totals and list it in `excluded`.
    #[default]
    Exclude,
    /// Abort the statement with [`ReportError::InvalidReference`].
    Reject,
}

/// Layout switches for a statement.
///
/// The defaults reproduce the paper statement: every income sub-category is
/// listed even when nothing came in, while expense sub-categories and whole
/// expense categories without activity are left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPolicy {
    pub show_empty_income_sub_categories: bool,
    pub hide_inactive_expense_categories: bool,
    pub on_invalid_reference: InvalidReferencePolicy,
}

impl Default for ReportPolicy {
    fn default() -> Self {
        Self {
            show_empty_income_sub_categories: true,
            hide_inactive_expense_categories: true,
            on_invalid_reference: InvalidReferencePolicy::Exclude,
        }
    }
}

impl ReportPolicy {
    pub fn strict() -> Self {
        Self {
            on_invalid_reference: InvalidReferencePolicy::Reject,
            ..Self::default()
        }
    }

    fn show_empty(&self, kind: EntryType) -> bool {
        match kind {
            EntryType::Income => self.show_empty_income_sub_categories,
            EntryType::Expense => !self.hide_inactive_expense_categories,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub transaction_id: String,
    pub date: NaiveDateTime,
    pub description: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubCategorySection {
    pub sub_category_id: String,
    pub sub_category_name: String,
    pub line_items: Vec<LineItem>,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySection {
    pub category_id: String,
    pub category_name: String,
    pub sub_category_sections: Vec<SubCategorySection>,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportModel {
    pub kind: ReportKind,
    pub period_label: String,
    pub opening_label: String,
    pub closing_label: String,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    /// Opening balance plus everything dated before the window.
    pub carried_balance: Decimal,
    pub income_sections: Vec<CategorySection>,
    pub expense_sections: Vec<CategorySection>,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub closing_balance: Decimal,
    /// Window transactions that made it into a section.
    pub within_count: usize,
    /// True when the ledger holds no transactions at all.
    pub empty_dataset: bool,
    pub excluded: Vec<InvalidReference>,
    /// Signed sum of `excluded`. The following window's carried balance
    /// equals `closing_balance + excluded_net`.
    pub excluded_net: Decimal,
}

impl ReportModel {
    pub fn net_change(&self) -> Decimal {
        self.total_income - self.total_expense
    }

    pub fn has_income_activity(&self) -> bool {
        has_activity(&self.income_sections)
    }

    pub fn has_expense_activity(&self) -> bool {
        has_activity(&self.expense_sections)
    }

    pub fn sections(&self, kind: EntryType) -> &[CategorySection] {
        match kind {
            EntryType::Income => &self.income_sections,
            EntryType::Expense => &self.expense_sections,
        }
    }
}

fn has_activity(sections: &[CategorySection]) -> bool {
    sections
        .iter()
        .flat_map(|c| &c.sub_category_sections)
        .any(|s| !s.line_items.is_empty())
}

/// Borrowed inputs for one statement.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub transactions: &'a [Transaction],
    pub categories: &'a [Category],
    pub sub_categories: &'a [SubCategory],
    pub opening_balance: Option<Decimal>,
}

impl<'a> From<&'a LedgerSnapshot> for ReportInput<'a> {
    fn from(s: &'a LedgerSnapshot) -> Self {
        ReportInput {
            transactions: &s.transactions,
            categories: &s.categories,
            sub_categories: &s.sub_categories,
            opening_balance: s.settings.opening_balance,
        }
    }
}

/// Build a statement with the default policy.
pub fn build_report(
    period: &Period,
    transactions: &[Transaction],
    categories: &[Category],
    sub_categories: &[SubCategory],
    opening_balance: Option<Decimal>,
) -> Result<ReportModel, ReportError> {
    ReportBuilder::default().build(
        period,
        ReportInput {
            transactions,
            categories,
            sub_categories,
            opening_balance,
        },
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportBuilder {
    policy: ReportPolicy,
}

impl ReportBuilder {
    pub fn new(policy: ReportPolicy) -> Self {
        Self { policy }
    }

    pub fn build(&self, period: &Period, input: ReportInput<'_>) -> Result<ReportModel, ReportError> {
        let opening = input
            .opening_balance
            .ok_or(ReportError::ConfigurationMissing)?;

        let mut carried = opening;
        let mut within: Vec<&Transaction> = Vec::new();
        for tx in input.transactions {
            match period.classify(tx.date) {
                Placement::Before => carried += tx.signed_amount(),
                Placement::Within => within.push(tx),
                Placement::After => {}
            }
        }
        // stable: same-instant transactions keep their storage order
        within.sort_by_key(|tx| tx.date);

        let mut excluded = Vec::new();
        let mut excluded_net = Decimal::ZERO;
        let mut by_sub: HashMap<&str, Vec<&Transaction>> = HashMap::new();
        let mut within_count = 0;
        for tx in within {
            match check_placement(tx, input.categories, input.sub_categories) {
                Ok(()) => {
                    by_sub.entry(tx.sub_category_id.as_str()).or_default().push(tx);
                    within_count += 1;
                }
                Err(e) => match self.policy.on_invalid_reference {
                    InvalidReferencePolicy::Reject => return Err(e.into()),
                    InvalidReferencePolicy::Exclude => {
                        excluded_net += tx.signed_amount();
                        excluded.push(e);
                    }
                },
            }
        }

        let (income_sections, total_income) = self.sections(EntryType::Income, &input, &by_sub);
        let (expense_sections, total_expense) =
            self.sections(EntryType::Expense, &input, &by_sub);

        Ok(ReportModel {
            kind: period.kind,
            period_label: period.title.clone(),
            opening_label: period.opening_label.clone(),
            closing_label: period.closing_label.clone(),
            window_start: period.start,
            window_end: period.end,
            carried_balance: carried,
            income_sections,
            expense_sections,
            total_income,
            total_expense,
            closing_balance: carried + total_income - total_expense,
            within_count,
            empty_dataset: input.transactions.is_empty(),
            excluded,
            excluded_net,
        })
    }

    fn sections(
        &self,
        kind: EntryType,
        input: &ReportInput<'_>,
        by_sub: &HashMap<&str, Vec<&Transaction>>,
    ) -> (Vec<CategorySection>, Decimal) {
        let show_empty = self.policy.show_empty(kind);
        let mut out = Vec::new();
        let mut grand = Decimal::ZERO;

        for cat in input.categories.iter().filter(|c| c.r#type == kind) {
            let mut subs = Vec::new();
            let mut cat_total = Decimal::ZERO;
            for sub in input
                .sub_categories
                .iter()
                .filter(|s| s.parent_id == cat.id && s.r#type == kind)
            {
                let txs = by_sub.get(sub.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
                if txs.is_empty() && !show_empty {
                    continue;
                }
                let line_items: Vec<LineItem> = txs
                    .iter()
                    .map(|tx| LineItem {
                        transaction_id: tx.id.clone(),
                        date: tx.date,
                        description: tx.description.clone(),
                        amount: tx.amount,
                    })
                    .collect();
                let subtotal = line_items.iter().map(|l| l.amount).sum::<Decimal>();
                cat_total += subtotal;
                subs.push(SubCategorySection {
                    sub_category_id: sub.id.clone(),
                    sub_category_name: sub.name.clone(),
                    line_items,
                    subtotal,
                });
            }
            // no header without rows under it
            if subs.is_empty() {
                continue;
            }
            grand += cat_total;
            out.push(CategorySection {
                category_id: cat.id.clone(),
                category_name: cat.name.clone(),
                sub_category_sections: subs,
                total: cat_total,
            });
        }
        (out, grand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::{ReportKind, resolve_period};
    use chrono::NaiveDate;

    fn cat(id: &str, t: EntryType) -> Category {
        Category {
            id: id.into(),
            name: id.into(),
            r#type: t,
            owner_id: "u".into(),
            icon: None,
        }
    }

    fn sub(id: &str, parent: &str, t: EntryType) -> SubCategory {
        SubCategory {
            id: id.into(),
            name: id.into(),
            parent_id: parent.into(),
            r#type: t,
            owner_id: "u".into(),
        }
    }

    #[test]
    fn missing_opening_balance_is_a_configuration_error() {
        let period = resolve_period(
            ReportKind::Monthly,
            NaiveDate::from_ymd_opt(2026, 3, 3)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        let err = build_report(&period, &[], &[], &[], None).unwrap_err();
        assert_eq!(err, ReportError::ConfigurationMissing);
    }

    #[test]
    fn show_empty_expense_when_policy_allows() {
        let period = resolve_period(
            ReportKind::Monthly,
            NaiveDate::from_ymd_opt(2026, 3, 3)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        let cats = [cat("ops", EntryType::Expense)];
        let subs = [sub("power", "ops", EntryType::Expense)];
        let builder = ReportBuilder::new(ReportPolicy {
            hide_inactive_expense_categories: false,
            ..ReportPolicy::default()
        });
        let model = builder
            .build(
                &period,
                ReportInput {
                    transactions: &[],
                    categories: &cats,
                    sub_categories: &subs,
                    opening_balance: Some(Decimal::ZERO),
                },
            )
            .unwrap();
        assert_eq!(model.expense_sections.len(), 1);
        assert!(!model.has_expense_activity());
        assert!(model.empty_dataset);
    }
}
