//! Types Module
//!
//! Módulo que define os tipos de dados comuns usados em todo o crate.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::DateFormat;
use crate::error::ConvertError;

/// Valor de uma célula da planilha
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Número (f64)
    Number(f64),

    /// Texto
    String(String),

    /// Valor lógico
    Bool(bool),

    /// Data de calendário (sem hora)
    Date(NaiveDate),

    /// Valor de erro (ex.: #DIV/0!)
    Error(String),

    /// Célula vazia
    Empty,
}

impl CellValue {
    /// Verifica se a célula está vazia
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Converte o valor para texto de exibição
    ///
    /// Células vazias viram texto vazio e datas usam o formato ISO 8601.
    pub fn to_display(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

/// Tabela retangular lida de uma aba
///
/// Guarda a linha de cabeçalho como nomes de coluna e as linhas de dados
/// como células. A busca por nome usa a primeira ocorrência quando há
/// cabeçalhos duplicados.
#[derive(Debug, Clone)]
pub(crate) struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    index: HashMap<String, usize>,
}

impl Table {
    /// Cria uma tabela a partir do cabeçalho e das linhas de dados
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let index = Self::build_index(&columns);
        Self {
            columns,
            rows,
            index,
        }
    }

    /// Cria uma tabela sem colunas nem linhas
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    fn build_index(columns: &[String]) -> HashMap<String, usize> {
        let mut index = HashMap::with_capacity(columns.len());
        for (pos, name) in columns.iter().enumerate() {
            index.entry(name.clone()).or_insert(pos);
        }
        index
    }

    /// Reescreve os nomes de coluna com a normalização de texto
    pub fn normalize_headers(&mut self) {
        self.columns = self
            .columns
            .iter()
            .map(|name| crate::normalize::normalize(name))
            .collect();
        self.index = Self::build_index(&self.columns);
    }

    /// Verifica se a coluna existe
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Número de linhas de dados
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Verifica se não há linhas de dados
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Valor da célula na linha e coluna indicadas
    ///
    /// Linha ou coluna inexistente retorna `CellValue::Empty`, espelhando a
    /// leitura tolerante das planilhas de entrada.
    pub fn value(&self, row: usize, column: &str) -> &CellValue {
        self.index
            .get(column)
            .and_then(|&col| self.rows.get(row).and_then(|cells| cells.get(col)))
            .unwrap_or(&CellValue::Empty)
    }
}

/// Esquema de saída descoberto no modelo
///
/// Sequência ordenada de nomes de coluna da primeira linha da primeira aba
/// do arquivo de modelo. Toda linha de saída segue exatamente esta ordem.
#[derive(Debug, Clone)]
pub struct OutputSchema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl OutputSchema {
    pub(crate) fn from_columns(columns: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for (pos, name) in columns.iter().enumerate() {
            index.entry(name.clone()).or_insert(pos);
        }
        Self { columns, index }
    }

    /// Nomes de coluna na ordem do modelo
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Posição de uma coluna pelo nome (primeira ocorrência)
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Número de colunas
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Verifica se o esquema não tem colunas
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Linha de saída convertida
///
/// Os valores seguem a ordem das colunas do `OutputSchema` que a produziu.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    values: Vec<CellValue>,
}

impl OutputRow {
    /// Células da linha, na ordem do esquema
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }
}

/// Construtor de uma linha de saída
///
/// Começa com todas as colunas do esquema vazias. Campos calculados cujo
/// nome não existe no modelo são descartados em silêncio, preservando a
/// fidelidade ao esquema.
pub(crate) struct RowDraft<'a> {
    schema: &'a OutputSchema,
    values: Vec<CellValue>,
}

impl<'a> RowDraft<'a> {
    pub fn new(schema: &'a OutputSchema) -> Self {
        Self {
            schema,
            values: vec![CellValue::Empty; schema.len()],
        }
    }

    /// Atribui um valor à coluna, se ela existir no esquema
    pub fn set(&mut self, column: &str, value: CellValue) {
        if let Some(pos) = self.schema.position(column) {
            self.values[pos] = value;
        }
    }

    pub fn finish(self) -> OutputRow {
        debug_assert_eq!(self.values.len(), self.schema.len());
        OutputRow {
            values: self.values,
        }
    }
}

/// Metadados extraídos do preâmbulo do orçamento
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProposalInfo {
    /// Número da proposta (célula ao lado do rótulo "Orçamento #")
    pub number: CellValue,

    /// Data da proposta, coagida para `CellValue::Date` quando reconhecida
    pub date: CellValue,
}

impl Default for ProposalInfo {
    fn default() -> Self {
        Self {
            number: CellValue::Empty,
            date: CellValue::Empty,
        }
    }
}

/// Produto do orçamento sem correspondência no catálogo
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmappedProduct {
    /// Chave de busca normalizada usada na consulta
    pub normalized: String,

    /// Texto original da célula de produto
    pub original: String,
}

/// Como a linha de cabeçalho dos itens foi localizada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeaderDetection {
    /// Encontrada pela varredura de palavras-chave, no índice indicado
    Keywords {
        /// Índice da linha (base 0) dentro da aba do orçamento
        row: usize,
    },

    /// Não encontrada; usado o salto fixo de linhas configurado
    FallbackSkip {
        /// Quantidade de linhas puladas antes do cabeçalho presumido
        rows: usize,
    },

    /// A aba do orçamento não tinha linhas para inspecionar
    NotFound,
}

/// Diagnósticos produzidos por uma conversão
///
/// Retornados junto com as linhas para que o chamador decida como relatar
/// produtos não mapeados e outras ocorrências.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    /// Resultado da detecção da linha de cabeçalho dos itens
    pub header_detection: HeaderDetection,

    /// Produtos sem correspondência no catálogo, sem duplicatas e ordenados
    pub unmapped_products: Vec<UnmappedProduct>,

    /// Linhas de item com produto vazio mas outras células preenchidas
    pub empty_product_rows: usize,

    /// Linhas de item totalmente em branco, descartadas
    pub skipped_blank_rows: usize,
}

/// Resultado de uma conversão de orçamento
///
/// Contém o esquema de saída, as linhas convertidas e os diagnósticos.
/// A gravação em XLSX usa o formato de data configurado no conversor.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    schema: OutputSchema,
    rows: Vec<OutputRow>,
    diagnostics: Diagnostics,
    date_format: DateFormat,
}

impl ConversionResult {
    pub(crate) fn new(
        schema: OutputSchema,
        rows: Vec<OutputRow>,
        diagnostics: Diagnostics,
        date_format: DateFormat,
    ) -> Self {
        Self {
            schema,
            rows,
            diagnostics,
            date_format,
        }
    }

    /// Esquema de saída descoberto no modelo
    pub fn schema(&self) -> &OutputSchema {
        &self.schema
    }

    /// Linhas convertidas, na ordem dos itens do orçamento
    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    /// Diagnósticos da conversão
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Número de linhas convertidas
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Verifica se nenhuma linha foi produzida
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Valor de uma célula pelo índice da linha e nome da coluna
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let pos = self.schema.position(column)?;
        self.rows.get(row).and_then(|r| r.values().get(pos))
    }

    pub(crate) fn date_format(&self) -> &DateFormat {
        &self.date_format
    }

    /// Serializa o resultado como uma pasta de trabalho XLSX em memória
    ///
    /// A planilha única se chama `Sheet1`, com o cabeçalho do esquema na
    /// primeira linha.
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>, ConvertError> {
        crate::output::workbook_bytes(self)
    }

    /// Grava o resultado como arquivo XLSX no caminho indicado
    pub fn write_xlsx(&self, path: &Path) -> Result<(), ConvertError> {
        let bytes = self.to_xlsx_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Testes de CellValue
    #[test]
    fn test_cell_value_is_empty() {
        assert!(CellValue::Empty.is_empty());
        assert!(!CellValue::Number(42.0).is_empty());
        assert!(!CellValue::String("test".to_string()).is_empty());
        assert!(!CellValue::Bool(true).is_empty());
        assert!(!CellValue::Error("#DIV/0!".to_string()).is_empty());
    }

    #[test]
    fn test_cell_value_to_display() {
        assert_eq!(CellValue::Empty.to_display(), "");
        assert_eq!(CellValue::Number(42.5).to_display(), "42.5");
        assert_eq!(CellValue::Number(102.0).to_display(), "102");
        assert_eq!(
            CellValue::String("hello".to_string()).to_display(),
            "hello"
        );
        assert_eq!(CellValue::Bool(true).to_display(), "true");
        assert_eq!(
            CellValue::Error("#DIV/0!".to_string()).to_display(),
            "#DIV/0!"
        );
    }

    #[test]
    fn test_cell_value_date_display_is_iso() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 25).unwrap();
        assert_eq!(CellValue::Date(date).to_display(), "2024-05-25");
    }

    // Testes de Table
    fn sample_table() -> Table {
        Table::new(
            vec![
                "Produto".to_string(),
                "Quantidade".to_string(),
                "Valor Unitário".to_string(),
            ],
            vec![
                vec![
                    CellValue::String("Sofá".to_string()),
                    CellValue::Number(2.0),
                    CellValue::Number(1500.0),
                ],
                vec![
                    CellValue::String("Mesa".to_string()),
                    CellValue::Empty,
                    CellValue::Number(800.0),
                ],
            ],
        )
    }

    #[test]
    fn test_table_lookup() {
        let table = sample_table();
        assert_eq!(table.len(), 2);
        assert!(table.has_column("Produto"));
        assert!(!table.has_column("produto"));
        assert_eq!(
            table.value(0, "Produto"),
            &CellValue::String("Sofá".to_string())
        );
        assert_eq!(table.value(1, "Quantidade"), &CellValue::Empty);
    }

    #[test]
    fn test_table_missing_column_and_row_are_empty() {
        let table = sample_table();
        assert_eq!(table.value(0, "Cor"), &CellValue::Empty);
        assert_eq!(table.value(99, "Produto"), &CellValue::Empty);
    }

    #[test]
    fn test_table_normalize_headers() {
        let mut table = sample_table();
        table.normalize_headers();
        assert!(table.has_column("produto"));
        assert!(table.has_column("valor unitário"));
        assert!(!table.has_column("Produto"));
    }

    #[test]
    fn test_table_duplicate_column_uses_first() {
        let table = Table::new(
            vec!["id".to_string(), "id".to_string()],
            vec![vec![CellValue::Number(1.0), CellValue::Number(2.0)]],
        );
        assert_eq!(table.value(0, "id"), &CellValue::Number(1.0));
    }

    #[test]
    fn test_empty_table() {
        let table = Table::empty();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.value(0, "qualquer"), &CellValue::Empty);
    }

    // Testes de OutputSchema e RowDraft
    fn sample_schema() -> OutputSchema {
        OutputSchema::from_columns(vec![
            "Número da proposta".to_string(),
            "ID produto".to_string(),
            "Quantidade".to_string(),
        ])
    }

    #[test]
    fn test_schema_positions() {
        let schema = sample_schema();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.position("ID produto"), Some(1));
        assert_eq!(schema.position("Inexistente"), None);
    }

    #[test]
    fn test_row_draft_fills_schema_order() {
        let schema = sample_schema();
        let mut draft = RowDraft::new(&schema);
        draft.set("Quantidade", CellValue::Number(3.0));
        draft.set("Número da proposta", CellValue::Number(1024.0));

        let row = draft.finish();
        assert_eq!(row.values().len(), 3);
        assert_eq!(row.values()[0], CellValue::Number(1024.0));
        assert_eq!(row.values()[1], CellValue::Empty);
        assert_eq!(row.values()[2], CellValue::Number(3.0));
    }

    #[test]
    fn test_row_draft_drops_unknown_column() {
        let schema = sample_schema();
        let mut draft = RowDraft::new(&schema);
        draft.set("Data", CellValue::String("2024-05-25".to_string()));

        let row = draft.finish();
        assert!(row.values().iter().all(|v| v.is_empty()));
    }

    // Teste de ConversionResult
    #[test]
    fn test_conversion_result_value_lookup() {
        let schema = sample_schema();
        let mut draft = RowDraft::new(&schema);
        draft.set("ID produto", CellValue::String("P1".to_string()));
        let rows = vec![draft.finish()];

        let result = ConversionResult::new(
            schema,
            rows,
            Diagnostics {
                header_detection: HeaderDetection::Keywords { row: 3 },
                unmapped_products: vec![],
                empty_product_rows: 0,
                skipped_blank_rows: 0,
            },
            DateFormat::Iso8601,
        );

        assert_eq!(result.len(), 1);
        assert!(!result.is_empty());
        assert_eq!(
            result.value(0, "ID produto"),
            Some(&CellValue::String("P1".to_string()))
        );
        assert_eq!(result.value(0, "Quantidade"), Some(&CellValue::Empty));
        assert_eq!(result.value(0, "Inexistente"), None);
        assert_eq!(result.value(5, "ID produto"), None);
    }

    // Teste baseado em propriedades
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        /// Toda linha terminada tem exatamente o tamanho do esquema,
        /// independentemente de quais colunas foram atribuídas.
        proptest! {
            #[test]
            fn test_row_draft_length_matches_schema(
                columns in proptest::collection::vec("[a-zA-Z ]{1,12}", 0..10),
                assigned in proptest::collection::vec("[a-zA-Z ]{1,12}", 0..10),
            ) {
                let schema = OutputSchema::from_columns(columns.clone());
                let mut draft = RowDraft::new(&schema);
                for name in &assigned {
                    draft.set(name, CellValue::Number(1.0));
                }
                let row = draft.finish();
                prop_assert_eq!(row.values().len(), columns.len());
            }
        }
    }
}
