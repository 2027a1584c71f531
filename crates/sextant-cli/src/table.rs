use sextant::{Row, Type, Value};

use std::fmt::Write;

/// Renders rows as an aligned text table, one header line followed by a
/// separator.
pub(crate) fn render(header: &[(String, Type)], rows: &[Row]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(cell).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|(name, _)| name.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let names: Vec<&str> = header.iter().map(|(name, _)| name.as_str()).collect();
    line(&mut out, &names, &widths, header);

    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));

    for row in &cells {
        let row: Vec<&str> = row.iter().map(String::as_str).collect();
        line(&mut out, &row, &widths, header);
    }

    out
}

fn line(out: &mut String, cells: &[&str], widths: &[usize], header: &[(String, Type)]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .zip(header)
        .map(|((cell, width), (_, ty))| {
            if is_numeric(ty) {
                format!("{cell:>width$}")
            } else {
                format!("{cell:<width$}")
            }
        })
        .collect();

    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}

fn is_numeric(ty: &Type) -> bool {
    matches!(ty, Type::Int | Type::BigInt | Type::Float)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(value) => value.to_string(),
        Value::I64(value) => value.to_string(),
        Value::F64(value) => value.to_string(),
        Value::String(value) => value.clone(),
        Value::Bytes(value) => format!("<{} bytes>", value.len()),
        Value::Json(value) => value.to_string(),
        Value::Uuid(value) => value.to_string(),
        Value::List(_) => value.to_json().to_string(),
    }
}
