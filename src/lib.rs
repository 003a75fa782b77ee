//! olistify - Vendor budget spreadsheet converter for the Olist marketplace import format
//!
//! This crate converts vendor budget (quote) spreadsheets into the bulk-import
//! format expected by the Olist marketplace. It locates the items table inside
//! a free-form budget sheet, resolves each product against a catalog mapping
//! sheet, attaches the customer from a registry sheet and emits rows that
//! follow the column schema of an output template workbook.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use olistify::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a converter with default settings
//!     let converter = ConverterBuilder::new().build()?;
//!
//!     // Convert a budget workbook for customer "102"
//!     let result = converter.convert_path(
//!         Path::new("orcamento.xlsx"),
//!         Path::new("mapeamento.xlsx"),
//!         Path::new("clientes.xlsx"),
//!         "102",
//!         Path::new("modelo_olist.xlsx"),
//!     )?;
//!
//!     // Write the converted rows as an XLSX workbook
//!     result.write_xlsx(Path::new("proposta_convertida.xlsx"))?;
//!
//!     Ok(())
//! }
//! ```
//!
//! For in-memory conversion, use `Cursor`:
//!
//! ```rust,no_run
//! use std::io::Cursor;
//! use std::path::Path;
//! use olistify::ConverterBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let converter = ConverterBuilder::new().build()?;
//! let budget_bytes: Vec<u8> = vec![]; // Your budget workbook bytes
//! let xlsx_bytes = converter.convert_to_xlsx(
//!     Cursor::new(budget_bytes),
//!     Path::new("mapeamento.xlsx"),
//!     Path::new("clientes.xlsx"),
//!     "102",
//!     Path::new("modelo_olist.xlsx"),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use std::path::Path;
//! use olistify::{ConverterBuilder, DateFormat, SheetSelector};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a converter with custom settings
//!     let converter = ConverterBuilder::new()
//!         .with_budget_sheet(SheetSelector::Name("Proposta".to_string()))  // Exact sheet
//!         .with_header_keywords(["Produto", "Quantidade", "Valor Unitário"])
//!         .with_fallback_skip_rows(3)  // When the header row is not located
//!         .with_date_format(DateFormat::Custom("%d/%m/%Y".to_string()))  // Brazilian format
//!         .build()?;
//!
//!     let result = converter.convert_path(
//!         Path::new("orcamento.xlsx"),
//!         Path::new("mapeamento.xlsx"),
//!         Path::new("clientes.xlsx"),
//!         "102",
//!         Path::new("modelo_olist.xlsx"),
//!     )?;
//!     println!("{} linhas convertidas", result.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Inspecting Diagnostics
//!
//! Products without a catalog match never abort the conversion; they are
//! reported back so the caller decides how to surface them:
//!
//! ```rust,no_run
//! use std::path::Path;
//! use olistify::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new().build()?;
//!     let result = converter.convert_path(
//!         Path::new("orcamento.xlsx"),
//!         Path::new("mapeamento.xlsx"),
//!         Path::new("clientes.xlsx"),
//!         "102",
//!         Path::new("modelo_olist.xlsx"),
//!     )?;
//!
//!     for product in &result.diagnostics().unmapped_products {
//!         eprintln!("sem correspondência no catálogo: {}", product.original);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod api;
mod assembler;
mod builder;
mod catalog;
mod customers;
mod error;
mod normalize;
mod output;
mod parser;
mod types;

// API pública
pub use api::{
    DateFormat, OutputFormat, SheetSelector, DEFAULT_BUDGET_SHEET, DEFAULT_HEADER_KEYWORDS,
};
pub use builder::{Converter, ConverterBuilder};
pub use customers::{CustomerRecord, CustomerRegistry, CustomerSummary};
pub use error::ConvertError;
pub use output::{CsvResultWriter, JsonResultWriter, ResultWriter, XlsxResultWriter};
pub use types::{
    CellValue, ConversionResult, Diagnostics, HeaderDetection, OutputRow, OutputSchema,
    UnmappedProduct,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_defaults() {
        assert_eq!(DEFAULT_BUDGET_SHEET, "Orçamento");
        assert_eq!(DEFAULT_HEADER_KEYWORDS.len(), 6);
    }
}
