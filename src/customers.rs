//! Customer Registry Module
//!
//! Cadastro de clientes carregado da aba `CLIENTES`. O tipo da coluna de ID
//! é inferido uma única vez na carga e decide como o ID textual recebido do
//! chamador é comparado com as células.

use std::path::Path;

use serde::Serialize;

use crate::error::ConvertError;
use crate::parser::{SpreadsheetReader, DEFAULT_MAX_INPUT_SIZE};
use crate::types::{CellValue, Table};

/// Aba do cadastro de clientes
pub(crate) const REGISTRY_SHEET: &str = "CLIENTES";

/// Coluna com o ID do cliente
pub(crate) const CUSTOMER_ID_COLUMN: &str = "ID";

/// Coluna com o nome do cliente
pub(crate) const CUSTOMER_NAME_COLUMN: &str = "Nome";

/// Tipo inferido da coluna de IDs
///
/// `Numeric` quando todas as células não vazias são números; qualquer outra
/// mistura cai em `Text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IdColumnKind {
    Numeric,
    Text,
}

/// Registro de um cliente
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    /// ID como lido da planilha
    pub id: CellValue,
    /// Nome como lido da planilha
    pub name: CellValue,
}

/// Resumo de cliente para listagens
///
/// Os campos serializam como `ID` e `Nome`, os mesmos nomes das colunas da
/// planilha de origem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerSummary {
    /// ID convertido para texto
    #[serde(rename = "ID")]
    pub id: String,

    /// Nome do cliente
    #[serde(rename = "Nome")]
    pub name: String,
}

/// Cadastro de clientes
pub struct CustomerRegistry {
    records: Vec<CustomerRecord>,
    id_kind: IdColumnKind,
}

impl CustomerRegistry {
    /// Carrega o cadastro da aba `CLIENTES` do arquivo indicado
    ///
    /// As colunas `ID` e `Nome` são obrigatórias.
    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        Self::load_with_limit(path, DEFAULT_MAX_INPUT_SIZE)
    }

    pub(crate) fn load_with_limit(path: &Path, max_size: u64) -> Result<Self, ConvertError> {
        let mut reader = SpreadsheetReader::open_path(path, max_size)?;
        let table = reader.read_table(REGISTRY_SHEET, 0)?;
        Self::from_table(&table)
    }

    pub(crate) fn from_table(table: &Table) -> Result<Self, ConvertError> {
        for column in [CUSTOMER_ID_COLUMN, CUSTOMER_NAME_COLUMN] {
            if !table.has_column(column) {
                tracing::error!(column, "registry column missing");
                return Err(ConvertError::MissingColumn {
                    sheet: REGISTRY_SHEET.to_string(),
                    column: column.to_string(),
                });
            }
        }

        let records: Vec<CustomerRecord> = (0..table.len())
            .map(|row| CustomerRecord {
                id: table.value(row, CUSTOMER_ID_COLUMN).clone(),
                name: table.value(row, CUSTOMER_NAME_COLUMN).clone(),
            })
            .collect();
        let id_kind = infer_id_kind(&records);

        tracing::debug!(records = records.len(), ?id_kind, "customer registry loaded");
        Ok(Self { records, id_kind })
    }

    pub(crate) fn id_kind(&self) -> IdColumnKind {
        self.id_kind
    }

    /// Procura um cliente pelo ID textual recebido do chamador
    ///
    /// Em cadastros numéricos, o texto é convertido para número (inteiro
    /// primeiro, decimal como alternativa) e comparado numericamente. Em
    /// cadastros textuais, a comparação é exata, sem normalização.
    pub fn find(&self, raw_id: &str) -> Option<&CustomerRecord> {
        match self.id_kind {
            IdColumnKind::Numeric => {
                let wanted = parse_numeric_id(raw_id)?;
                self.records.iter().find(|record| match record.id {
                    CellValue::Number(n) => n == wanted,
                    _ => false,
                })
            }
            IdColumnKind::Text => self.records.iter().find(|record| match &record.id {
                CellValue::String(s) => s == raw_id,
                _ => false,
            }),
        }
    }

    /// Lista os clientes com nome preenchido
    ///
    /// Registros sem nome são omitidos e os IDs são convertidos para texto,
    /// prontos para exibição ou serialização.
    pub fn customers(&self) -> Vec<CustomerSummary> {
        self.records
            .iter()
            .filter(|record| !record.name.is_empty())
            .map(|record| CustomerSummary {
                id: record.id.to_display(),
                name: record.name.to_display(),
            })
            .collect()
    }

    /// Número de registros carregados
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Verifica se o cadastro está vazio
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn infer_id_kind(records: &[CustomerRecord]) -> IdColumnKind {
    let mut saw_number = false;
    for record in records {
        match record.id {
            CellValue::Number(_) => saw_number = true,
            CellValue::Empty => {}
            _ => return IdColumnKind::Text,
        }
    }
    if saw_number {
        IdColumnKind::Numeric
    } else {
        IdColumnKind::Text
    }
}

/// Converte o ID textual para número: inteiro primeiro, decimal depois
fn parse_numeric_id(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(int as f64);
    }
    trimmed.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> CellValue {
        CellValue::String(text.to_string())
    }

    fn numeric_registry() -> CustomerRegistry {
        let table = Table::new(
            vec![
                CUSTOMER_ID_COLUMN.to_string(),
                CUSTOMER_NAME_COLUMN.to_string(),
            ],
            vec![
                vec![CellValue::Number(101.0), s("Loja Aurora")],
                vec![CellValue::Number(102.0), s("Móveis Brasil")],
                vec![CellValue::Number(103.0), CellValue::Empty],
            ],
        );
        CustomerRegistry::from_table(&table).unwrap()
    }

    fn text_registry() -> CustomerRegistry {
        let table = Table::new(
            vec![
                CUSTOMER_ID_COLUMN.to_string(),
                CUSTOMER_NAME_COLUMN.to_string(),
            ],
            vec![
                vec![s("A-7"), s("Atacado Sete")],
                vec![s("B-2"), s("Bazar Dois")],
            ],
        );
        CustomerRegistry::from_table(&table).unwrap()
    }

    // Testes de inferência do tipo da coluna
    #[test]
    fn test_id_kind_numeric() {
        assert_eq!(numeric_registry().id_kind(), IdColumnKind::Numeric);
    }

    #[test]
    fn test_id_kind_text_for_strings_and_mixed() {
        assert_eq!(text_registry().id_kind(), IdColumnKind::Text);

        let mixed = Table::new(
            vec![
                CUSTOMER_ID_COLUMN.to_string(),
                CUSTOMER_NAME_COLUMN.to_string(),
            ],
            vec![
                vec![CellValue::Number(1.0), s("Um")],
                vec![s("dois"), s("Dois")],
            ],
        );
        let registry = CustomerRegistry::from_table(&mixed).unwrap();
        assert_eq!(registry.id_kind(), IdColumnKind::Text);
    }

    #[test]
    fn test_id_kind_all_empty_is_text() {
        let table = Table::new(
            vec![
                CUSTOMER_ID_COLUMN.to_string(),
                CUSTOMER_NAME_COLUMN.to_string(),
            ],
            vec![vec![CellValue::Empty, s("Sem ID")]],
        );
        let registry = CustomerRegistry::from_table(&table).unwrap();
        assert_eq!(registry.id_kind(), IdColumnKind::Text);
        assert!(registry.find("1").is_none());
    }

    // Testes de find
    #[test]
    fn test_find_numeric_id() {
        let registry = numeric_registry();

        let record = registry.find("102").unwrap();
        assert_eq!(record.name, s("Móveis Brasil"));
    }

    #[test]
    fn test_find_numeric_id_trims_and_accepts_float_text() {
        let registry = numeric_registry();

        assert!(registry.find(" 102 ").is_some());
        assert!(registry.find("102.0").is_some());
        assert!(registry.find("102.5").is_none());
    }

    #[test]
    fn test_find_numeric_id_not_found() {
        let registry = numeric_registry();
        assert!(registry.find("999").is_none());
        assert!(registry.find("não numérico").is_none());
    }

    #[test]
    fn test_find_text_id_exact_match() {
        let registry = text_registry();

        assert!(registry.find("A-7").is_some());
        assert!(registry.find("a-7").is_none());
        assert!(registry.find(" A-7 ").is_none());
    }

    // Testes da listagem
    #[test]
    fn test_customers_drops_blank_names_and_stringifies_ids() {
        let registry = numeric_registry();

        let customers = registry.customers();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].id, "101");
        assert_eq!(customers[0].name, "Loja Aurora");
        assert_eq!(customers[1].id, "102");
    }

    #[test]
    fn test_customers_keep_empty_string_names() {
        // Nome com texto vazio não é o mesmo que célula vazia
        let table = Table::new(
            vec![
                CUSTOMER_ID_COLUMN.to_string(),
                CUSTOMER_NAME_COLUMN.to_string(),
            ],
            vec![vec![CellValue::Number(7.0), s("")]],
        );
        let registry = CustomerRegistry::from_table(&table).unwrap();
        assert_eq!(registry.customers().len(), 1);
    }

    #[test]
    fn test_customer_summary_serializes_sheet_column_names() {
        let summary = CustomerSummary {
            id: "102".to_string(),
            name: "Móveis Brasil".to_string(),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["ID"], "102");
        assert_eq!(json["Nome"], "Móveis Brasil");
    }

    // Testes das colunas obrigatórias
    #[test]
    fn test_missing_id_column_is_error() {
        let table = Table::new(
            vec![CUSTOMER_NAME_COLUMN.to_string()],
            vec![vec![s("Sem ID")]],
        );

        match CustomerRegistry::from_table(&table) {
            Err(ConvertError::MissingColumn { sheet, column }) => {
                assert_eq!(sheet, REGISTRY_SHEET);
                assert_eq!(column, CUSTOMER_ID_COLUMN);
            }
            _ => panic!("Expected MissingColumn error"),
        }
    }

    #[test]
    fn test_missing_name_column_is_error() {
        let table = Table::new(
            vec![CUSTOMER_ID_COLUMN.to_string()],
            vec![vec![CellValue::Number(1.0)]],
        );

        match CustomerRegistry::from_table(&table) {
            Err(ConvertError::MissingColumn { column, .. }) => {
                assert_eq!(column, CUSTOMER_NAME_COLUMN);
            }
            _ => panic!("Expected MissingColumn error"),
        }
    }
}
