// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::{InvalidReference, ReferenceProblem, TaxonomyError};
use crate::models::{Category, SubCategory, Transaction};
use crate::store::LedgerSnapshot;
use rust_decimal::Decimal;

/// Check that `tx` points at an existing sub-category of the same type.
pub fn validate_transaction_against_taxonomy(
    tx: &Transaction,
    sub_categories: &[SubCategory],
) -> Result<(), InvalidReference> {
    let Some(sub) = sub_categories.iter().find(|s| s.id == tx.sub_category_id) else {
        return Err(InvalidReference {
            transaction_id: tx.id.clone(),
            problem: ReferenceProblem::UnknownSubCategory {
                sub_category_id: tx.sub_category_id.clone(),
            },
        });
    };
    if sub.r#type != tx.r#type {
        return Err(InvalidReference {
            transaction_id: tx.id.clone(),
            problem: ReferenceProblem::TypeMismatch {
                sub_category_id: sub.id.clone(),
                expected: sub.r#type,
                found: tx.r#type,
            },
        });
    }
    Ok(())
}

/// A sub-category must hang off an existing category of the same type.
pub fn validate_sub_category(
    sub: &SubCategory,
    categories: &[Category],
) -> Result<(), TaxonomyError> {
    let parent = categories
        .iter()
        .find(|c| c.id == sub.parent_id)
        .ok_or_else(|| TaxonomyError::MissingParent(sub.parent_id.clone()))?;
    if parent.r#type != sub.r#type {
        return Err(TaxonomyError::TypeMismatch {
            name: sub.name.clone(),
            expected: parent.r#type,
            found: sub.r#type,
        });
    }
    Ok(())
}

pub fn validate_amount(amount: Decimal) -> Result<Decimal, TaxonomyError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(TaxonomyError::NegativeAmount(amount));
    }
    Ok(amount)
}

/// Full placement check: the sub-category must exist, match the type, and
/// still hang off a category of that same type.
pub fn check_placement(
    tx: &Transaction,
    categories: &[Category],
    sub_categories: &[SubCategory],
) -> Result<(), InvalidReference> {
    validate_transaction_against_taxonomy(tx, sub_categories)?;
    let Some(sub) = sub_categories.iter().find(|s| s.id == tx.sub_category_id) else {
        return Ok(());
    };
    let problem = match categories.iter().find(|c| c.id == sub.parent_id) {
        None => ReferenceProblem::UnknownCategory {
            sub_category_id: sub.id.clone(),
            category_id: sub.parent_id.clone(),
        },
        Some(parent) if parent.r#type != sub.r#type => ReferenceProblem::CategoryTypeMismatch {
            sub_category_id: sub.id.clone(),
            category_id: parent.id.clone(),
        },
        Some(_) => return Ok(()),
    };
    Err(InvalidReference {
        transaction_id: tx.id.clone(),
        problem,
    })
}

/// Every transaction in the snapshot that cannot be placed, in storage order.
pub fn audit(snapshot: &LedgerSnapshot) -> Vec<InvalidReference> {
    snapshot
        .transactions
        .iter()
        .filter_map(|tx| {
            check_placement(tx, &snapshot.categories, &snapshot.sub_categories).err()
        })
        .collect()
}
