use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};
use std::fmt;

/// A single column value, typed only as far as the driver tells us.
#[derive(Debug, Clone, PartialEq)]
pub enum DbValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    /// Any type without a dedicated variant, kept as the server's text form.
    Other(String),
}

impl fmt::Display for DbValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbValue::Null => f.write_str("NULL"),
            DbValue::Bool(b) => write!(f, "{b}"),
            DbValue::Int(i) => write!(f, "{i}"),
            DbValue::Float(x) => write!(f, "{x}"),
            DbValue::Text(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            DbValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            DbValue::Other(s) => f.write_str(s),
        }
    }
}

/// One result row: the column values in select-list order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DbRow(pub Vec<DbValue>);

impl DbRow {
    pub fn values(&self) -> &[DbValue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts a driver row into untyped values.
    ///
    /// Rows arrive over the simple query protocol, so every value is in text
    /// format. Known types are decoded; anything else (or anything that fails
    /// to decode, like `'infinity'::date`) is kept as its raw text.
    pub(crate) fn from_pg_row(row: &PgRow) -> Self {
        let values = row
            .columns()
            .iter()
            .map(|column| decode_column(row, column.ordinal(), column.type_info().name()))
            .collect();
        DbRow(values)
    }
}

impl fmt::Display for DbRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str(")")
    }
}

impl From<Vec<DbValue>> for DbRow {
    fn from(values: Vec<DbValue>) -> Self {
        DbRow(values)
    }
}

/// Renders rows one per line, the way the results area shows them.
pub fn format_rows(rows: &[DbRow]) -> String {
    rows.iter()
        .map(DbRow::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_column(row: &PgRow, index: usize, type_name: &str) -> DbValue {
    match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return DbValue::Null,
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(column = index, error = %e, "Column could not be read.");
            return DbValue::Other(format!("<unreadable {type_name}>"));
        }
    }

    let typed = match type_name {
        "BOOL" => row.try_get::<bool, _>(index).map(DbValue::Bool),
        "INT2" => row.try_get::<i16, _>(index).map(|v| DbValue::Int(v.into())),
        "INT4" => row.try_get::<i32, _>(index).map(|v| DbValue::Int(v.into())),
        "INT8" => row.try_get::<i64, _>(index).map(DbValue::Int),
        "FLOAT4" => row.try_get::<f32, _>(index).map(|v| DbValue::Float(v.into())),
        "FLOAT8" => row.try_get::<f64, _>(index).map(DbValue::Float),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "UNKNOWN" => {
            row.try_get_unchecked::<String, _>(index).map(DbValue::Text)
        }
        "DATE" => row.try_get::<NaiveDate, _>(index).map(DbValue::Date),
        _ => return raw_text(row, index, type_name),
    };

    typed.unwrap_or_else(|e| {
        tracing::debug!(column = index, type_name, error = %e, "Falling back to raw text.");
        raw_text(row, index, type_name)
    })
}

fn raw_text(row: &PgRow, index: usize, type_name: &str) -> DbValue {
    match row.try_get_unchecked::<String, _>(index) {
        Ok(text) => DbValue::Other(text),
        Err(_) => DbValue::Other(format!("<{type_name}>")),
    }
}
