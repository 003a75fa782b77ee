//! Product Catalog Module
//!
//! Catálogo de produtos carregado da aba `CATÁLOGO`. A coluna de modelos é
//! indexada por uma chave normalizada derivada na carga, e a consulta
//! devolve o ID e a descrição canônica do Olist.

use std::path::Path;

use crate::error::ConvertError;
use crate::normalize::normalize_cell;
use crate::parser::SpreadsheetReader;
use crate::types::{CellValue, Table};

/// Aba do catálogo na planilha de mapeamento
pub(crate) const CATALOG_SHEET: &str = "CATÁLOGO";

/// Coluna com o nome do modelo do fornecedor
pub(crate) const MODEL_COLUMN: &str = "MODEL";

/// Coluna com a descrição canônica do Olist
pub(crate) const MODEL_OLIST_COLUMN: &str = "MODEL OLIST";

/// Coluna com o ID do produto no Olist
pub(crate) const PRODUCT_ID_COLUMN: &str = "ID";

/// Entrada do catálogo
#[derive(Debug, Clone)]
struct CatalogEntry {
    /// Chave de busca normalizada derivada do modelo
    search_key: String,
    /// ID do produto no Olist
    id: CellValue,
    /// Descrição canônica do Olist
    description: CellValue,
}

/// Resultado de uma consulta ao catálogo
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProductMatch {
    pub id: CellValue,
    pub description: CellValue,
}

/// Catálogo de produtos indexado por chave normalizada
///
/// Quando duas linhas normalizam para a mesma chave, a primeira vence.
pub(crate) struct ProductCatalog {
    entries: Vec<CatalogEntry>,
    index: std::collections::HashMap<String, usize>,
}

impl ProductCatalog {
    /// Carrega o catálogo da aba `CATÁLOGO` do arquivo indicado
    ///
    /// A coluna `MODEL` é obrigatória; `ID` e `MODEL OLIST` ausentes apenas
    /// deixam os campos correspondentes vazios.
    pub fn load(path: &Path, max_size: u64) -> Result<Self, ConvertError> {
        let mut reader = SpreadsheetReader::open_path(path, max_size)?;
        let table = reader.read_table(CATALOG_SHEET, 0)?;
        Self::from_table(&table)
    }

    pub(crate) fn from_table(table: &Table) -> Result<Self, ConvertError> {
        if !table.has_column(MODEL_COLUMN) {
            tracing::error!(column = MODEL_COLUMN, "catalog column missing");
            return Err(ConvertError::MissingColumn {
                sheet: CATALOG_SHEET.to_string(),
                column: MODEL_COLUMN.to_string(),
            });
        }

        let mut entries = Vec::with_capacity(table.len());
        let mut index = std::collections::HashMap::with_capacity(table.len());

        for row in 0..table.len() {
            let search_key = normalize_cell(table.value(row, MODEL_COLUMN));
            let entry = CatalogEntry {
                search_key: search_key.clone(),
                id: table.value(row, PRODUCT_ID_COLUMN).clone(),
                description: table.value(row, MODEL_OLIST_COLUMN).clone(),
            };
            index.entry(search_key).or_insert(entries.len());
            entries.push(entry);
        }

        tracing::debug!(entries = entries.len(), "product catalog loaded");
        Ok(Self { entries, index })
    }

    /// Consulta o catálogo por uma chave já normalizada
    pub fn resolve(&self, key: &str) -> Option<ProductMatch> {
        let entry = self.index.get(key).map(|&pos| &self.entries[pos])?;
        Some(ProductMatch {
            id: entry.id.clone(),
            description: entry.description.clone(),
        })
    }

    /// Número de entradas carregadas
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> CellValue {
        CellValue::String(text.to_string())
    }

    fn sample_table() -> Table {
        Table::new(
            vec![
                MODEL_COLUMN.to_string(),
                MODEL_OLIST_COLUMN.to_string(),
                PRODUCT_ID_COLUMN.to_string(),
            ],
            vec![
                vec![s("Sofa  Azul"), s("Sofá Azul 3 Lugares"), s("P1")],
                vec![s("MESA jantar"), s("Mesa de Jantar 6L"), CellValue::Number(77.0)],
                vec![s("Sofa Azul"), s("Duplicado"), s("P9")],
            ],
        )
    }

    #[test]
    fn test_resolve_normalized_key() {
        let catalog = ProductCatalog::from_table(&sample_table()).unwrap();

        let hit = catalog.resolve("sofa azul").unwrap();
        assert_eq!(hit.id, s("P1"));
        assert_eq!(hit.description, s("Sofá Azul 3 Lugares"));
    }

    #[test]
    fn test_resolve_first_duplicate_wins() {
        let catalog = ProductCatalog::from_table(&sample_table()).unwrap();

        // "Sofa  Azul" e "Sofa Azul" normalizam para a mesma chave
        let hit = catalog.resolve("sofa azul").unwrap();
        assert_eq!(hit.id, s("P1"));
    }

    #[test]
    fn test_resolve_miss() {
        let catalog = ProductCatalog::from_table(&sample_table()).unwrap();
        assert_eq!(catalog.resolve("poltrona verde"), None);
    }

    #[test]
    fn test_numeric_id_preserved() {
        let catalog = ProductCatalog::from_table(&sample_table()).unwrap();

        let hit = catalog.resolve("mesa jantar").unwrap();
        assert_eq!(hit.id, CellValue::Number(77.0));
    }

    #[test]
    fn test_missing_model_column_is_error() {
        let table = Table::new(
            vec!["MODELO".to_string(), PRODUCT_ID_COLUMN.to_string()],
            vec![vec![s("Sofa"), s("P1")]],
        );

        match ProductCatalog::from_table(&table) {
            Err(ConvertError::MissingColumn { sheet, column }) => {
                assert_eq!(sheet, CATALOG_SHEET);
                assert_eq!(column, MODEL_COLUMN);
            }
            other => panic!("Expected MissingColumn, got {:?}", other.map(|c| c.len())),
        }
    }

    #[test]
    fn test_optional_columns_default_to_empty() {
        let table = Table::new(
            vec![MODEL_COLUMN.to_string()],
            vec![vec![s("Sofa Azul")]],
        );
        let catalog = ProductCatalog::from_table(&table).unwrap();

        let hit = catalog.resolve("sofa azul").unwrap();
        assert!(hit.id.is_empty());
        assert!(hit.description.is_empty());
    }

    #[test]
    fn test_empty_catalog_resolves_nothing() {
        let table = Table::new(vec![MODEL_COLUMN.to_string()], vec![]);
        let catalog = ProductCatalog::from_table(&table).unwrap();

        assert_eq!(catalog.len(), 0);
        assert_eq!(catalog.resolve("sofa azul"), None);
    }
}
