//! Invoice arithmetic.
//!
//! Values are rounded to two decimals only where they are shown or sent;
//! the grand total is derived from the unrounded tax.

use serde::{Deserialize, Serialize};

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format with exactly two decimals for tables and CSV cells.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", round2(value))
}

/// Строка счета
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    pub fn line_total(&self) -> f64 {
        round2(self.quantity * self.unit_price)
    }
}

/// Итоги счета
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub discount: f64,
    pub grand_total: f64,
}

impl InvoiceTotals {
    /// `grand_total` is not clamped: a discount larger than the taxed
    /// subtotal yields a negative total.
    pub fn compute(items: &[LineItem], tax_percent: f64, discount: f64) -> Self {
        let subtotal = round2(items.iter().map(LineItem::line_total).sum());
        Self::from_subtotal(subtotal, tax_percent, discount)
    }

    pub fn from_subtotal(subtotal: f64, tax_percent: f64, discount: f64) -> Self {
        let raw_tax = subtotal * (tax_percent / 100.0);
        Self {
            subtotal,
            tax: round2(raw_tax),
            discount: round2(discount),
            grand_total: round2(subtotal + raw_tax - discount),
        }
    }

    pub fn is_negative(&self) -> bool {
        self.grand_total < 0.0
    }
}

/// Sum a numeric projection over rows, rounded to two decimals.
pub fn kpi_sum<T>(rows: &[T], select: impl Fn(&T) -> f64) -> f64 {
    round2(rows.iter().map(select).sum())
}
