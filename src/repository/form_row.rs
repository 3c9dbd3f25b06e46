//! Mapping from a normalized record to a `formularios` row.
//!
//! [`COLUMNS`] is the only place the column list lives. The INSERT statement
//! and the bind order are both generated from it, so position `i` in the
//! statement is always position `i` in [`FormRow::values`].

use chrono::{Datelike, NaiveDate};

use crate::extraction::{FieldValue, NormalizedRecord};

/// Target table.
pub const TABLE_NAME: &str = "formularios";

/// Field holding the handwritten form date.
pub const DATE_FIELD: &str = "Data";

/// Accepted input formats for the form date, tried in order, with the exact
/// number of year digits each one takes.
const DATE_FORMATS: [(&str, usize); 2] = [("%d/%m/%y", 2), ("%d/%m/%Y", 4)];

/// How a column is filled when its field is missing from the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// The form date, coerced to a SQL date. NULL when absent or unparseable.
    Date,
    /// Free text. NULL when absent.
    Text,
    /// Checkbox. `false` when absent.
    Flag,
}

/// Column name (also the record field name) and kind, in INSERT order.
pub const COLUMNS: [(&str, ColumnKind); 29] = [
    ("Data", ColumnKind::Date),
    ("Item", ColumnKind::Text),
    ("QntPecas", ColumnKind::Text),
    ("Maquina", ColumnKind::Text),
    ("Setor", ColumnKind::Text),
    ("NomeCracha", ColumnKind::Text),
    ("Montagem", ColumnKind::Flag),
    ("Regulagem", ColumnKind::Flag),
    ("MarcaRetifica", ColumnKind::Flag),
    ("Empenamento", ColumnKind::Flag),
    ("FalhaRaio", ColumnKind::Flag),
    ("FalhaZinco", ColumnKind::Flag),
    ("Rebarba", ColumnKind::Flag),
    ("Batida", ColumnKind::Flag),
    ("Risco", ColumnKind::Flag),
    ("Trepidacao", ColumnKind::Flag),
    ("Ressalto", ColumnKind::Flag),
    ("Oxidacao", ColumnKind::Flag),
    ("DiametroInt", ColumnKind::Flag),
    ("DiametroIntDimensao", ColumnKind::Text),
    ("DiametroExt", ColumnKind::Flag),
    ("DiametroExtDimensao", ColumnKind::Text),
    ("Comprimento", ColumnKind::Flag),
    ("ComprimentoDimensao", ColumnKind::Text),
    ("DimensaoMaior", ColumnKind::Flag),
    ("Menor", ColumnKind::Flag),
    ("Outros", ColumnKind::Flag),
    ("OutrosDescricao", ColumnKind::Text),
    ("Observacoes", ColumnKind::Text),
];

/// A single bound parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
    Date(Option<NaiveDate>),
    Flag(bool),
    Text(Option<String>),
}

/// One row ready for insertion, values in [`COLUMNS`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRow {
    values: Vec<ColumnValue>,
}

impl FormRow {
    /// Build the row for `record`.
    ///
    /// A present field is bound with whatever value it holds, even if that
    /// does not match the column kind. Only missing fields take the default.
    pub fn from_record(record: &NormalizedRecord) -> Self {
        let values = COLUMNS
            .iter()
            .map(|(name, kind)| match kind {
                ColumnKind::Date => ColumnValue::Date(coerce_date(record.get(*name))),
                ColumnKind::Flag | ColumnKind::Text => match record.get(*name) {
                    Some(FieldValue::Flag(b)) => ColumnValue::Flag(*b),
                    Some(FieldValue::Text(s)) => ColumnValue::Text(Some(s.clone())),
                    None if *kind == ColumnKind::Flag => ColumnValue::Flag(false),
                    None => ColumnValue::Text(None),
                },
            })
            .collect();
        Self { values }
    }

    pub fn values(&self) -> &[ColumnValue] {
        &self.values
    }

    /// Value bound for the named column.
    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        COLUMNS
            .iter()
            .position(|(name, _)| *name == column)
            .and_then(|i| self.values.get(i))
    }
}

/// `INSERT INTO formularios (...) VALUES (?, ...)` with one placeholder per column.
pub fn insert_statement() -> String {
    let names: Vec<&str> = COLUMNS.iter().map(|(name, _)| *name).collect();
    let placeholders = vec!["?"; COLUMNS.len()];
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        TABLE_NAME,
        names.join(", "),
        placeholders.join(", ")
    )
}

/// Parse the form date (`dd/mm/yy` or `dd/mm/yyyy`).
///
/// Anything else, including a checkbox value, yields `None`.
pub fn coerce_date(value: Option<&FieldValue>) -> Option<NaiveDate> {
    let raw = value?.as_text()?;
    if raw.is_empty() {
        return None;
    }

    // chrono reads `%y` and `%Y` with any digit count, strptime does not.
    let year = raw.rsplit('/').next()?;
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    DATE_FORMATS.iter().find_map(|&(fmt, digits)| {
        if year.len() != digits {
            return None;
        }
        let date = NaiveDate::parse_from_str(raw, fmt).ok()?;
        // Two-digit years pivot at 69 (POSIX), chrono pivots at 70.
        if digits == 2 && date.year() == 2069 {
            date.with_year(1969)
        } else {
            Some(date)
        }
    })
}
