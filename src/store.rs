// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, Settings, SubCategory, Transaction};
use anyhow::Result;
use serde::Serialize;

/// Read side of the ledger. The report engine only ever sees a
/// [`LedgerSnapshot`]; how it is fetched or cached is up to the implementor.
pub trait LedgerRepository {
    fn categories(&self) -> Result<Vec<Category>>;
    fn sub_categories(&self) -> Result<Vec<SubCategory>>;
    fn transactions(&self) -> Result<Vec<Transaction>>;
    fn settings(&self) -> Result<Settings>;

    /// Implementors backed by a database should override this to read all
    /// four collections at one point in time.
    fn snapshot(&self) -> Result<LedgerSnapshot> {
        Ok(LedgerSnapshot {
            categories: self.categories()?,
            sub_categories: self.sub_categories()?,
            transactions: self.transactions()?,
            settings: self.settings()?,
        })
    }
}

/// Immutable, already-fetched ledger data for one owner. Collections keep
/// the order they were created in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LedgerSnapshot {
    pub categories: Vec<Category>,
    pub sub_categories: Vec<SubCategory>,
    pub transactions: Vec<Transaction>,
    pub settings: Settings,
}

impl LedgerRepository for LedgerSnapshot {
    fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }

    fn sub_categories(&self) -> Result<Vec<SubCategory>> {
        Ok(self.sub_categories.clone())
    }

    fn transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.transactions.clone())
    }

    fn settings(&self) -> Result<Settings> {
        Ok(self.settings.clone())
    }

    fn snapshot(&self) -> Result<LedgerSnapshot> {
        Ok(self.clone())
    }
}
