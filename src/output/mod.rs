//! Output Format Module
//!
//! Módulo que abstrai os formatos de serialização do resultado com o
//! Strategy Pattern.

mod writers;

use std::io::Write;

use crate::api::OutputFormat;
use crate::error::ConvertError;
use crate::types::ConversionResult;

pub use writers::{CsvResultWriter, JsonResultWriter, XlsxResultWriter};
pub(crate) use writers::workbook_bytes;

/// Serializador de resultado (Strategy Pattern)
///
/// Cada formato de saída (XLSX, CSV, JSON) é representado como uma
/// variante do enum.
#[derive(Debug, Clone, Copy)]
pub enum ResultWriter {
    Xlsx,
    Csv,
    Json,
}

impl ResultWriter {
    /// Cria o serializador correspondente ao formato
    pub fn from_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Xlsx => ResultWriter::Xlsx,
            OutputFormat::Csv => ResultWriter::Csv,
            OutputFormat::Json => ResultWriter::Json,
        }
    }

    /// Serializa o resultado no formato escolhido
    ///
    /// # Argumentos
    ///
    /// * `result` - Resultado da conversão
    /// * `writer` - Destino da escrita
    ///
    /// # Retorno
    ///
    /// * `Ok(())` - Serialização concluída
    /// * `Err(ConvertError)` - Falha de escrita ou de montagem da planilha
    pub fn render<W: Write>(
        &self,
        result: &ConversionResult,
        writer: &mut W,
    ) -> Result<(), ConvertError> {
        match self {
            ResultWriter::Xlsx => XlsxResultWriter.render(result, writer),
            ResultWriter::Csv => CsvResultWriter.render(result, writer),
            ResultWriter::Json => JsonResultWriter.render(result, writer),
        }
    }
}
