//! Result Writers Implementation
//!
//! Módulo com as implementações de cada formato de serialização.

use std::io::Write;

use rust_xlsxwriter::Workbook;
use unicode_width::UnicodeWidthStr;

use crate::api::DateFormat;
use crate::error::ConvertError;
use crate::types::{CellValue, ConversionResult};

/// Nome da aba única da planilha de saída
pub(crate) const OUTPUT_SHEET_NAME: &str = "Sheet1";

/// Limites da largura de coluna na planilha de saída
const MIN_COLUMN_WIDTH: f64 = 10.0;
const MAX_COLUMN_WIDTH: f64 = 60.0;

/// Serializador XLSX
pub struct XlsxResultWriter;

impl XlsxResultWriter {
    pub fn render<W: Write>(
        &self,
        result: &ConversionResult,
        writer: &mut W,
    ) -> Result<(), ConvertError> {
        let bytes = workbook_bytes(result)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }
}

/// Monta a pasta de trabalho XLSX do resultado, em memória
///
/// O cabeçalho do esquema vai na primeira linha; números e valores lógicos
/// mantêm o tipo nativo da célula, datas seguem o formato configurado e
/// células vazias ficam em branco.
pub(crate) fn workbook_bytes(result: &ConversionResult) -> Result<Vec<u8>, ConvertError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(OUTPUT_SHEET_NAME)?;

    for (col, name) in result.schema().columns().iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }

    for (row_idx, row) in result.rows().iter().enumerate() {
        let out_row = (row_idx + 1) as u32;
        for (col_idx, value) in row.values().iter().enumerate() {
            let col = col_idx as u16;
            match value {
                CellValue::Empty => {}
                CellValue::Number(n) => {
                    worksheet.write_number(out_row, col, *n)?;
                }
                CellValue::String(s) => {
                    worksheet.write_string(out_row, col, s)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(out_row, col, *b)?;
                }
                CellValue::Date(_) | CellValue::Error(_) => {
                    worksheet.write_string(
                        out_row,
                        col,
                        &render_cell(value, result.date_format()),
                    )?;
                }
            }
        }
    }

    for (col_idx, width) in column_widths(result).into_iter().enumerate() {
        worksheet.set_column_width(col_idx as u16, width)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Larguras de coluna derivadas do conteúdo, medidas em células de exibição
fn column_widths(result: &ConversionResult) -> Vec<f64> {
    let mut widths: Vec<usize> = result
        .schema()
        .columns()
        .iter()
        .map(|name| UnicodeWidthStr::width(name.as_str()))
        .collect();

    for row in result.rows() {
        for (col, value) in row.values().iter().enumerate() {
            let rendered = render_cell(value, result.date_format());
            let width = UnicodeWidthStr::width(rendered.as_str());
            if width > widths[col] {
                widths[col] = width;
            }
        }
    }

    widths
        .into_iter()
        .map(|w| ((w + 2) as f64).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH))
        .collect()
}

/// Serializador CSV
pub struct CsvResultWriter;

impl CsvResultWriter {
    pub fn render<W: Write>(
        &self,
        result: &ConversionResult,
        writer: &mut W,
    ) -> Result<(), ConvertError> {
        write_csv_row(writer, result.schema().columns().iter().map(String::as_str))?;

        for row in result.rows() {
            let cells: Vec<String> = row
                .values()
                .iter()
                .map(|value| render_cell(value, result.date_format()))
                .collect();
            write_csv_row(writer, cells.iter().map(String::as_str))?;
        }

        writer.flush()?;
        Ok(())
    }
}

fn write_csv_row<'a, W: Write>(
    writer: &mut W,
    cells: impl Iterator<Item = &'a str>,
) -> Result<(), ConvertError> {
    let mut first = true;
    for cell in cells {
        if !first {
            write!(writer, ",")?;
        }
        first = false;
        write!(writer, "{}", escape_csv(cell))?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Serializador JSON
pub struct JsonResultWriter;

impl JsonResultWriter {
    pub fn render<W: Write>(
        &self,
        result: &ConversionResult,
        writer: &mut W,
    ) -> Result<(), ConvertError> {
        use serde_json::json;

        let columns = result.schema().columns();

        // Cada linha vira um objeto coluna -> valor
        let json_rows: Vec<serde_json::Value> = result
            .rows()
            .iter()
            .map(|row| {
                let mut row_obj = serde_json::Map::new();
                for (name, value) in columns.iter().zip(row.values()) {
                    row_obj.insert(name.clone(), cell_to_json(value, result.date_format()));
                }
                serde_json::Value::Object(row_obj)
            })
            .collect();

        let json_output = json!({
            "columns": columns,
            "rows": json_rows,
            "diagnostics": serde_json::to_value(result.diagnostics())?,
        });

        serde_json::to_writer_pretty(&mut *writer, &json_output)?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(())
    }
}

/// Converte o valor da célula para texto, com datas no formato configurado
pub(crate) fn render_cell(value: &CellValue, date_format: &DateFormat) -> String {
    match value {
        CellValue::Date(date) => match date_format {
            DateFormat::Iso8601 => date.format("%Y-%m-%d").to_string(),
            DateFormat::Custom(format_str) => date.format(format_str).to_string(),
        },
        other => other.to_display(),
    }
}

fn cell_to_json(value: &CellValue, date_format: &DateFormat) -> serde_json::Value {
    match value {
        CellValue::Empty => serde_json::Value::Null,
        CellValue::Number(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        CellValue::Bool(b) => serde_json::Value::Bool(*b),
        CellValue::String(s) => serde_json::Value::String(s.clone()),
        CellValue::Date(_) | CellValue::Error(_) => {
            serde_json::Value::String(render_cell(value, date_format))
        }
    }
}

/// Escapa um campo CSV
///
/// Campos com vírgula, aspas ou quebras de linha são envolvidos em aspas
/// duplas, com as aspas internas duplicadas.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
