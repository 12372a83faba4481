// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{EntryType, Settings};
use crate::report::{CategorySection, ReportModel};
use crate::utils::fmt_amount;
use anyhow::Result;
use comfy_table::{Attribute, Cell, CellAlignment, Table, presets::UTF8_FULL};
use std::io::Write;

const HEADERS: [&str; 5] = ["#", "Entry", "Income", "Expense", "Balance"];

fn heading(text: &str) -> Vec<Cell> {
    vec![
        Cell::new(""),
        Cell::new(text).add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
    ]
}

fn amount(d: &rust_decimal::Decimal) -> Cell {
    Cell::new(fmt_amount(d)).set_alignment(CellAlignment::Right)
}

fn blank() -> Cell {
    Cell::new("")
}

fn push_sections(
    t: &mut Table,
    sections: &[CategorySection],
    kind: EntryType,
    detail: bool,
) {
    for cat in sections {
        t.add_row(heading(&cat.category_name));
        for sub in &cat.sub_category_sections {
            let (inc, exp) = match kind {
                EntryType::Income => (amount(&sub.subtotal), blank()),
                EntryType::Expense => (blank(), amount(&sub.subtotal)),
            };
            t.add_row(vec![
                Cell::new("-"),
                Cell::new(&sub.sub_category_name),
                inc,
                exp,
                blank(),
            ]);
            if detail {
                for item in &sub.line_items {
                    let label = format!(
                        "    {}  {}",
                        item.date.format("%Y-%m-%d"),
                        item.description
                    );
                    let (inc, exp) = match kind {
                        EntryType::Income => (amount(&item.amount), blank()),
                        EntryType::Expense => (blank(), amount(&item.amount)),
                    };
                    t.add_row(vec![blank(), Cell::new(label), inc, exp, blank()]);
                }
            }
        }
    }
}

/// The statement as a grid: balance, income and expense sections followed by
/// the totals and the closing balance.
pub fn statement_table(model: &ReportModel, detail: bool) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(HEADERS.iter().map(|h| Cell::new(*h).add_attribute(Attribute::Bold)));

    t.add_row(heading("Balance"));
    t.add_row(vec![
        Cell::new("1"),
        Cell::new(&model.opening_label),
        blank(),
        blank(),
        amount(&model.carried_balance),
    ]);

    t.add_row(heading("Income"));
    push_sections(&mut t, &model.income_sections, EntryType::Income, detail);
    if !model.has_income_activity() {
        t.add_row(vec![blank(), Cell::new("No income this period"), blank(), blank(), blank()]);
    }

    t.add_row(heading("Expense"));
    push_sections(&mut t, &model.expense_sections, EntryType::Expense, detail);
    if !model.has_expense_activity() {
        t.add_row(vec![blank(), Cell::new("No expense this period"), blank(), blank(), blank()]);
    }

    t.add_row(vec![
        blank(),
        Cell::new("Total income / expense").add_attribute(Attribute::Bold),
        amount(&model.total_income),
        amount(&model.total_expense),
        amount(&model.net_change()),
    ]);
    t.add_row(vec![
        blank(),
        Cell::new(&model.closing_label).add_attribute(Attribute::Bold),
        blank(),
        blank(),
        amount(&model.closing_balance),
    ]);
    t
}

/// Full printable statement: letterhead, title, grid, data warnings and
/// signature lines.
pub fn render_statement(model: &ReportModel, settings: &Settings, detail: bool) -> String {
    let mut out = String::new();
    if !settings.mosque_name.is_empty() {
        out.push_str(&settings.mosque_name.to_uppercase());
        out.push('\n');
    }
    if !settings.mosque_address.is_empty() {
        out.push_str(&settings.mosque_address);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&model.period_label);
    out.push('\n');
    if model.empty_dataset {
        out.push_str("No transactions recorded yet.\n");
    }
    out.push_str(&statement_table(model, detail).to_string());
    out.push('\n');

    if !model.excluded.is_empty() {
        out.push_str(&format!(
            "\nWarning: {} transaction(s) left out of this statement:\n",
            model.excluded.len()
        ));
        for e in &model.excluded {
            out.push_str(&format!("  - {}\n", e));
        }
        out.push_str(&format!(
            "Net {} not reflected in the closing balance; it is carried into the next period.\n",
            fmt_amount(&model.excluded_net)
        ));
    }

    if !settings.treasurer_name.is_empty() || !settings.chairman_name.is_empty() {
        out.push_str(&format!(
            "\n{:<40}{}\n\n\n{:<40}{}\n",
            "Treasurer", "Chairman", settings.treasurer_name, settings.chairman_name
        ));
    }
    out
}

/// One CSV row per line item, plus opening, subtotal, total and closing rows.
pub fn write_statement_csv<W: Write>(model: &ReportModel, w: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record(["row", "section", "category", "sub_category", "date", "description", "amount"])?;
    let carried = model.carried_balance.to_string();
    wtr.write_record(["opening", "", "", "", "", model.opening_label.as_str(), carried.as_str()])?;
    for kind in [EntryType::Income, EntryType::Expense] {
        for cat in model.sections(kind) {
            for sub in &cat.sub_category_sections {
                for item in &sub.line_items {
                    let date = item.date.format("%Y-%m-%d %H:%M:%S").to_string();
                    let amt = item.amount.to_string();
                    wtr.write_record([
                        "item",
                        kind.as_str(),
                        cat.category_name.as_str(),
                        sub.sub_category_name.as_str(),
                        date.as_str(),
                        item.description.as_str(),
                        amt.as_str(),
                    ])?;
                }
                let subtotal = sub.subtotal.to_string();
                wtr.write_record([
                    "subtotal",
                    kind.as_str(),
                    cat.category_name.as_str(),
                    sub.sub_category_name.as_str(),
                    "",
                    "",
                    subtotal.as_str(),
                ])?;
            }
        }
    }
    let (inc, exp) = (model.total_income.to_string(), model.total_expense.to_string());
    wtr.write_record(["total", "income", "", "", "", "", inc.as_str()])?;
    wtr.write_record(["total", "expense", "", "", "", "", exp.as_str()])?;
    if !model.excluded.is_empty() {
        let net = model.excluded_net.to_string();
        wtr.write_record(["excluded", "", "", "", "", "", net.as_str()])?;
    }
    let closing = model.closing_balance.to_string();
    wtr.write_record(["closing", "", "", "", "", model.closing_label.as_str(), closing.as_str()])?;
    wtr.flush()?;
    Ok(())
}
