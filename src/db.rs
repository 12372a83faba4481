// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, EntryType, Settings, SubCategory, Transaction, new_id};
use crate::store::{LedgerRepository, LedgerSnapshot};
use crate::validation::{validate_amount, validate_sub_category, validate_transaction_against_taxonomy};
use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDateTime;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Treasurer", "treasurer"));

pub const DATE_WRITE_FMT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const DATE_READ_FMT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("treasurer.sqlite"))
}

/// Open the ledger at `path`, or at the platform data dir when `None`.
pub fn open_or_init(path: Option<&Path>) -> Result<Connection> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => db_path()?,
    };
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "ledger database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        owner_id TEXT NOT NULL,
        key TEXT NOT NULL,
        value TEXT NOT NULL,
        PRIMARY KEY(owner_id, key)
    );

    CREATE TABLE IF NOT EXISTS categories(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        owner_id TEXT NOT NULL,
        name TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        icon TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(owner_id, name)
    );

    CREATE TABLE IF NOT EXISTS sub_categories(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        owner_id TEXT NOT NULL,
        parent_id TEXT NOT NULL,
        name TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE(parent_id, name),
        FOREIGN KEY(parent_id) REFERENCES categories(id) ON DELETE CASCADE
    );

    -- no foreign key on sub_category_id: deleting a sub-category leaves its
    -- transactions in place, and `doctor` reports them
    CREATE TABLE IF NOT EXISTS transactions(
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        owner_id TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        sub_category_id TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_owner_date ON transactions(owner_id, date);
    "#,
    )?;
    Ok(())
}

impl ToSql for EntryType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for EntryType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

pub fn format_stored_date(d: &NaiveDateTime) -> String {
    d.format(DATE_WRITE_FMT).to_string()
}

fn parse_stored_date(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATE_READ_FMT)
        .with_context(|| format!("Invalid stored date '{}'", s))
}

fn parse_stored_amount(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid stored amount '{}'", s))
}

/// Fields for a new transaction. `type` defaults to the sub-category's type.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub r#type: Option<EntryType>,
    pub amount: Decimal,
    pub date: NaiveDateTime,
    pub description: String,
    pub sub_category_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub sub_category_id: Option<String>,
}

/// SQLite-backed ledger for a single owner. Every query is filtered by
/// `owner_id`, so one database can hold several independent ledgers.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
    owner: String,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection, owner: impl Into<String>) -> Self {
        Self {
            conn,
            owner: owner.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    // ---- categories ----

    pub fn add_category(
        &self,
        name: &str,
        r#type: EntryType,
        icon: Option<&str>,
    ) -> Result<Category> {
        let cat = Category {
            id: new_id(),
            name: name.trim().to_string(),
            r#type,
            owner_id: self.owner.clone(),
            icon: icon.map(str::to_string),
        };
        if cat.name.is_empty() {
            bail!("Category name must not be empty");
        }
        self.conn
            .execute(
                "INSERT INTO categories(id, owner_id, name, type, icon) VALUES (?1,?2,?3,?4,?5)",
                params![cat.id, cat.owner_id, cat.name, cat.r#type, cat.icon],
            )
            .with_context(|| format!("Add category '{}'", cat.name))?;
        tracing::info!(id = %cat.id, name = %cat.name, kind = %cat.r#type, "category added");
        Ok(cat)
    }

    pub fn category_by_name(&self, name: &str) -> Result<Category> {
        self.conn
            .query_row(
                "SELECT id, name, type, icon FROM categories WHERE owner_id=?1 AND name=?2",
                params![self.owner, name.trim()],
                |r| {
                    Ok(Category {
                        id: r.get(0)?,
                        name: r.get(1)?,
                        r#type: r.get(2)?,
                        owner_id: self.owner.clone(),
                        icon: r.get(3)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| anyhow!("Category '{}' not found", name.trim()))
    }

    pub fn rename_category(&self, id: &str, new_name: &str) -> Result<()> {
        let n = self.conn.execute(
            "UPDATE categories SET name=?1 WHERE id=?2 AND owner_id=?3",
            params![new_name.trim(), id, self.owner],
        )?;
        if n == 0 {
            bail!("Category '{}' not found", id);
        }
        Ok(())
    }

    /// Delete a category and, through the foreign key, its sub-categories.
    /// Returns how many sub-categories went with it and how many
    /// transactions were left pointing at them.
    pub fn delete_category(&self, id: &str) -> Result<(usize, usize)> {
        let subs: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sub_categories WHERE parent_id=?1 AND owner_id=?2",
            params![id, self.owner],
            |r| r.get(0),
        )?;
        let orphaned: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE owner_id=?2 AND sub_category_id IN
             (SELECT id FROM sub_categories WHERE parent_id=?1 AND owner_id=?2)",
            params![id, self.owner],
            |r| r.get(0),
        )?;
        let n = self.conn.execute(
            "DELETE FROM categories WHERE id=?1 AND owner_id=?2",
            params![id, self.owner],
        )?;
        if n == 0 {
            bail!("Category '{}' not found", id);
        }
        tracing::info!(id, sub_categories = subs, "category deleted");
        if orphaned > 0 {
            tracing::warn!(id, orphaned, "category deleted with transactions still pointing at its sub-categories");
        }
        Ok((subs as usize, orphaned as usize))
    }

    // ---- sub-categories ----

    pub fn add_sub_category(&self, parent_id: &str, name: &str) -> Result<SubCategory> {
        let categories = self.categories()?;
        let parent = categories
            .iter()
            .find(|c| c.id == parent_id)
            .ok_or_else(|| anyhow!("Category '{}' not found", parent_id))?;
        let sub = SubCategory {
            id: new_id(),
            name: name.trim().to_string(),
            parent_id: parent.id.clone(),
            r#type: parent.r#type,
            owner_id: self.owner.clone(),
        };
        if sub.name.is_empty() {
            bail!("Sub-category name must not be empty");
        }
        validate_sub_category(&sub, &categories)?;
        self.conn
            .execute(
                "INSERT INTO sub_categories(id, owner_id, parent_id, name, type) VALUES (?1,?2,?3,?4,?5)",
                params![sub.id, sub.owner_id, sub.parent_id, sub.name, sub.r#type],
            )
            .with_context(|| format!("Add sub-category '{}'", sub.name))?;
        tracing::info!(id = %sub.id, parent = %sub.parent_id, name = %sub.name, "sub-category added");
        Ok(sub)
    }

    /// Look a sub-category up by `Category/Sub` or by a name that is unique
    /// across the owner's categories.
    pub fn find_sub_category(&self, spec: &str) -> Result<SubCategory> {
        let spec = spec.trim();
        let subs = self.sub_categories()?;
        if let Some((cat_name, sub_name)) = spec.split_once('/') {
            let cat = self.category_by_name(cat_name)?;
            return subs
                .into_iter()
                .find(|s| s.parent_id == cat.id && s.name == sub_name.trim())
                .ok_or_else(|| anyhow!("Sub-category '{}' not found", spec));
        }
        let mut matches: Vec<SubCategory> = subs.into_iter().filter(|s| s.name == spec).collect();
        match matches.len() {
            0 => Err(anyhow!("Sub-category '{}' not found", spec)),
            1 => Ok(matches.remove(0)),
            _ => Err(anyhow!(
                "Sub-category '{}' exists under several categories; use 'Category/{}'",
                spec,
                spec
            )),
        }
    }

    pub fn rename_sub_category(&self, id: &str, new_name: &str) -> Result<()> {
        let n = self.conn.execute(
            "UPDATE sub_categories SET name=?1 WHERE id=?2 AND owner_id=?3",
            params![new_name.trim(), id, self.owner],
        )?;
        if n == 0 {
            bail!("Sub-category '{}' not found", id);
        }
        Ok(())
    }

    /// Delete a sub-category. Its transactions stay behind; the number left
    /// without a sub-category is returned.
    pub fn delete_sub_category(&self, id: &str) -> Result<usize> {
        let n = self.conn.execute(
            "DELETE FROM sub_categories WHERE id=?1 AND owner_id=?2",
            params![id, self.owner],
        )?;
        if n == 0 {
            bail!("Sub-category '{}' not found", id);
        }
        let orphaned: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE sub_category_id=?1 AND owner_id=?2",
            params![id, self.owner],
            |r| r.get(0),
        )?;
        if orphaned > 0 {
            tracing::warn!(id, orphaned, "sub-category deleted with transactions still pointing at it");
        }
        Ok(orphaned as usize)
    }

    // ---- transactions ----

    pub fn add_transaction(&self, new: NewTransaction) -> Result<Transaction> {
        let amount = validate_amount(new.amount)?;
        let subs = self.sub_categories()?;
        let sub = subs
            .iter()
            .find(|s| s.id == new.sub_category_id)
            .ok_or_else(|| anyhow!("Sub-category '{}' not found", new.sub_category_id))?;
        let tx = Transaction {
            id: new_id(),
            r#type: new.r#type.unwrap_or(sub.r#type),
            amount,
            date: new.date,
            description: new.description.trim().to_string(),
            sub_category_id: sub.id.clone(),
            owner_id: self.owner.clone(),
        };
        validate_transaction_against_taxonomy(&tx, &subs)?;
        self.insert_transaction(&tx)?;
        tracing::info!(id = %tx.id, amount = %tx.amount, kind = %tx.r#type, "transaction recorded");
        Ok(tx)
    }

    fn insert_transaction(&self, tx: &Transaction) -> Result<()> {
        self.conn.execute(
            "INSERT INTO transactions(id, owner_id, type, amount, date, description, sub_category_id)
             VALUES (?1,?2,?3,?4,?5,?6,?7)",
            params![
                tx.id,
                tx.owner_id,
                tx.r#type,
                tx.amount.to_string(),
                format_stored_date(&tx.date),
                tx.description,
                tx.sub_category_id
            ],
        )?;
        Ok(())
    }

    pub fn transaction(&self, id: &str) -> Result<Transaction> {
        self.transactions()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| anyhow!("Transaction '{}' not found", id))
    }

    /// Apply `patch`. Moving to another sub-category also moves the type.
    pub fn update_transaction(&self, id: &str, patch: TransactionPatch) -> Result<Transaction> {
        let mut tx = self.transaction(id)?;
        if let Some(amount) = patch.amount {
            tx.amount = validate_amount(amount)?;
        }
        if let Some(date) = patch.date {
            tx.date = date;
        }
        if let Some(description) = patch.description {
            tx.description = description.trim().to_string();
        }
        let subs = self.sub_categories()?;
        if let Some(sub_id) = patch.sub_category_id {
            let sub = subs
                .iter()
                .find(|s| s.id == sub_id)
                .ok_or_else(|| anyhow!("Sub-category '{}' not found", sub_id))?;
            tx.sub_category_id = sub.id.clone();
            tx.r#type = sub.r#type;
        }
        validate_transaction_against_taxonomy(&tx, &subs)?;
        self.conn.execute(
            "UPDATE transactions SET type=?1, amount=?2, date=?3, description=?4, sub_category_id=?5
             WHERE id=?6 AND owner_id=?7",
            params![
                tx.r#type,
                tx.amount.to_string(),
                format_stored_date(&tx.date),
                tx.description,
                tx.sub_category_id,
                tx.id,
                self.owner
            ],
        )?;
        tracing::info!(id = %tx.id, "transaction updated");
        Ok(tx)
    }

    pub fn delete_transaction(&self, id: &str) -> Result<()> {
        let n = self.conn.execute(
            "DELETE FROM transactions WHERE id=?1 AND owner_id=?2",
            params![id, self.owner],
        )?;
        if n == 0 {
            bail!("Transaction '{}' not found", id);
        }
        tracing::info!(id, "transaction deleted");
        Ok(())
    }

    // ---- settings ----

    pub fn update_settings(&self, s: &Settings) -> Result<()> {
        let mut pairs = vec![
            ("mosque_name", s.mosque_name.clone()),
            ("mosque_address", s.mosque_address.clone()),
            ("chairman_name", s.chairman_name.clone()),
            ("treasurer_name", s.treasurer_name.clone()),
        ];
        match s.opening_balance {
            Some(b) => pairs.push(("opening_balance", b.to_string())),
            None => {
                self.conn.execute(
                    "DELETE FROM settings WHERE owner_id=?1 AND key='opening_balance'",
                    params![self.owner],
                )?;
            }
        }
        for (key, value) in pairs {
            self.conn.execute(
                "INSERT INTO settings(owner_id, key, value) VALUES(?1, ?2, ?3)
                 ON CONFLICT(owner_id, key) DO UPDATE SET value=excluded.value",
                params![self.owner, key, value],
            )?;
        }
        tracing::info!(owner = %self.owner, "settings updated");
        Ok(())
    }

    fn setting(&self, key: &str) -> Result<Option<String>> {
        let v = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE owner_id=?1 AND key=?2",
                params![self.owner, key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v)
    }

    fn read_all(&self) -> Result<LedgerSnapshot> {
        Ok(LedgerSnapshot {
            categories: self.categories()?,
            sub_categories: self.sub_categories()?,
            transactions: self.transactions()?,
            settings: self.settings()?,
        })
    }
}

impl LedgerRepository for SqliteStore<'_> {
    fn categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, type, icon FROM categories WHERE owner_id=?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![self.owner], |r| {
            Ok(Category {
                id: r.get(0)?,
                name: r.get(1)?,
                r#type: r.get(2)?,
                owner_id: self.owner.clone(),
                icon: r.get(3)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn sub_categories(&self) -> Result<Vec<SubCategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, parent_id, type FROM sub_categories WHERE owner_id=?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![self.owner], |r| {
            Ok(SubCategory {
                id: r.get(0)?,
                name: r.get(1)?,
                parent_id: r.get(2)?,
                r#type: r.get(3)?,
                owner_id: self.owner.clone(),
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, type, amount, date, description, sub_category_id
             FROM transactions WHERE owner_id=?1 ORDER BY seq",
        )?;
        let rows = stmt.query_map(params![self.owner], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, EntryType>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, String>(4)?,
                r.get::<_, String>(5)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, r#type, amount, date, description, sub_category_id) = row?;
            out.push(Transaction {
                amount: parse_stored_amount(&amount)
                    .with_context(|| format!("Transaction '{}'", id))?,
                date: parse_stored_date(&date).with_context(|| format!("Transaction '{}'", id))?,
                id,
                r#type,
                description,
                sub_category_id,
                owner_id: self.owner.clone(),
            });
        }
        Ok(out)
    }

    fn settings(&self) -> Result<Settings> {
        let opening_balance = match self.setting("opening_balance")? {
            Some(s) => Some(
                s.parse::<Decimal>()
                    .with_context(|| format!("Invalid opening balance '{}' in settings", s))?,
            ),
            None => None,
        };
        Ok(Settings {
            mosque_name: self.setting("mosque_name")?.unwrap_or_default(),
            mosque_address: self.setting("mosque_address")?.unwrap_or_default(),
            chairman_name: self.setting("chairman_name")?.unwrap_or_default(),
            treasurer_name: self.setting("treasurer_name")?.unwrap_or_default(),
            opening_balance,
        })
    }

    /// All four collections from one SQLite read transaction.
    fn snapshot(&self) -> Result<LedgerSnapshot> {
        let snap = if self.conn.is_autocommit() {
            let tx = self.conn.unchecked_transaction()?;
            let snap = self.read_all()?;
            tx.commit()?;
            snap
        } else {
            // already inside the caller's transaction
            self.read_all()?
        };
        tracing::debug!(
            categories = snap.categories.len(),
            sub_categories = snap.sub_categories.len(),
            transactions = snap.transactions.len(),
            "snapshot loaded"
        );
        Ok(snap)
    }
}
