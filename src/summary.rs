// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::ReportError;
use crate::models::{EntryType, Transaction};
use crate::store::LedgerSnapshot;
use rust_decimal::Decimal;
use serde::Serialize;

/// All-time position of the account, as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub opening_balance: Decimal,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub recent: Vec<Transaction>,
}

pub fn overview(snapshot: &LedgerSnapshot, recent: usize) -> Result<Overview, ReportError> {
    let opening_balance = snapshot
        .settings
        .opening_balance
        .ok_or(ReportError::ConfigurationMissing)?;

    let (mut total_income, mut total_expense) = (Decimal::ZERO, Decimal::ZERO);
    for tx in &snapshot.transactions {
        match tx.r#type {
            EntryType::Income => total_income += tx.amount,
            EntryType::Expense => total_expense += tx.amount,
        }
    }

    let mut newest: Vec<&Transaction> = snapshot.transactions.iter().collect();
    // newest first; equal dates show the later entry first
    newest.reverse();
    newest.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(Overview {
        opening_balance,
        total_income,
        total_expense,
        balance: opening_balance + total_income - total_expense,
        recent: newest.into_iter().take(recent).cloned().collect(),
    })
}
