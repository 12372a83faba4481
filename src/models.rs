// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of money flow. Categories, sub-categories and transactions all carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
        }
    }

    /// Signed contribution of `amount` to the account balance.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            EntryType::Income => amount,
            EntryType::Expense => -amount,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" | "in" => Ok(EntryType::Income),
            "expense" | "out" => Ok(EntryType::Expense),
            other => Err(format!("Unknown entry type '{}' (use income|expense)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub r#type: EntryType,
    pub owner_id: String,
    /// Opaque icon key, resolved by whatever draws the category.
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    pub r#type: EntryType,
    pub owner_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub r#type: EntryType,
    pub amount: Decimal, // smallest currency unit, never negative
    pub date: NaiveDateTime,
    pub description: String,
    pub sub_category_id: String,
    pub owner_id: String,
}

impl Transaction {
    pub fn signed_amount(&self) -> Decimal {
        self.r#type.signed(self.amount)
    }
}

/// Per-owner account settings. `opening_balance` stays `None` until the
/// treasurer configures it; statements refuse to run without it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub mosque_name: String,
    pub mosque_address: String,
    pub chairman_name: String,
    pub treasurer_name: String,
    pub opening_balance: Option<Decimal>,
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
