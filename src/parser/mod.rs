//! Parser Module
//!
//! Leitura das planilhas de entrada com calamine e varredura do preâmbulo
//! do orçamento.

mod preamble;
mod workbook;

pub(crate) use preamble::{extract_proposal, find_header_row};
pub(crate) use workbook::{SpreadsheetReader, DEFAULT_MAX_INPUT_SIZE};
