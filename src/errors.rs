// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::EntryType;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Why a statement could not be produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("Opening balance is not configured; run `treasurer settings set --opening-balance <amount>` first")]
    ConfigurationMissing,

    #[error("Invalid reference: {0}")]
    InvalidReference(#[from] InvalidReference),
}

/// A transaction the ledger cannot place in the category tree.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("transaction '{transaction_id}' {problem}")]
pub struct InvalidReference {
    pub transaction_id: String,
    pub problem: ReferenceProblem,
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceProblem {
    #[error("points to missing sub-category '{sub_category_id}'")]
    UnknownSubCategory { sub_category_id: String },

    #[error("is {found} but sub-category '{sub_category_id}' is {expected}")]
    TypeMismatch {
        sub_category_id: String,
        expected: EntryType,
        found: EntryType,
    },

    #[error("uses sub-category '{sub_category_id}' whose category '{category_id}' no longer exists")]
    UnknownCategory {
        sub_category_id: String,
        category_id: String,
    },

    #[error("uses sub-category '{sub_category_id}' whose type differs from its category '{category_id}'")]
    CategoryTypeMismatch {
        sub_category_id: String,
        category_id: String,
    },
}

/// Violations of the category / sub-category invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("Category '{0}' does not exist")]
    MissingParent(String),

    #[error("Sub-category '{name}' is {found} but its category is {expected}")]
    TypeMismatch {
        name: String,
        expected: EntryType,
        found: EntryType,
    },

    #[error("Amount {0} is negative; amounts are recorded as positive values")]
    NegativeAmount(rust_decimal::Decimal),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Range start {from} is after range end {to}")]
    InvertedRange { from: NaiveDate, to: NaiveDate },

    #[error("Date out of supported range")]
    OutOfRange,
}
