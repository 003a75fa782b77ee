//! Public API Types
//!
//! Módulo que define os tipos de configuração usados na API pública.

/// Nome preferido da aba de orçamento
pub const DEFAULT_BUDGET_SHEET: &str = "Orçamento";

/// Palavras-chave padrão da linha de cabeçalho dos itens
///
/// Uma linha do orçamento é reconhecida como cabeçalho quando contém todas
/// estas palavras, após normalização.
pub const DEFAULT_HEADER_KEYWORDS: [&str; 6] = [
    "Produto",
    "Cor",
    "Qualidade",
    "Valor Unitário",
    "Quantidade",
    "Subtotal",
];

/// Seleção da aba de orçamento
///
/// Especifica qual aba da pasta de trabalho contém o orçamento.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SheetSelector {
    /// Usa a aba com o nome dado se existir; senão, a primeira (padrão)
    ///
    /// É o comportamento esperado para planilhas de fornecedor: a aba
    /// costuma se chamar `Orçamento`, mas nem sempre.
    PreferNamed(String),

    /// Nome exato da aba
    ///
    /// A aba precisa existir; caso contrário a conversão falha com
    /// `ConvertError::MissingSheet`.
    ///
    /// Ex.: `SheetSelector::Name("Orçamento".to_string())`
    Name(String),

    /// Índice da aba (base 0)
    ///
    /// Ex.: `SheetSelector::Index(0)` seleciona a primeira aba
    Index(usize),

    /// Primeira aba da pasta de trabalho
    First,
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::PreferNamed(DEFAULT_BUDGET_SHEET.to_string())
    }
}

/// Formato de saída das datas
///
/// Especifica como células de data são gravadas na planilha convertida.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DateFormat {
    /// Formato ISO 8601 (YYYY-MM-DD)
    ///
    /// Ex.: `2024-05-25`
    Iso8601,

    /// Formato customizado (string de formato compatível com chrono)
    ///
    /// # Especificadores principais
    ///
    /// - `%Y`: ano com 4 dígitos (ex.: 2024)
    /// - `%y`: ano com 2 dígitos (ex.: 24)
    /// - `%m`: mês com 2 dígitos (01-12)
    /// - `%d`: dia com 2 dígitos (01-31)
    ///
    /// # Exemplo
    ///
    /// ```rust,no_run
    /// use olistify::{ConverterBuilder, DateFormat};
    ///
    /// # fn main() -> Result<(), olistify::ConvertError> {
    /// let converter = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%d/%m/%Y".to_string()))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    Custom(String),
}

/// Formato de saída do resultado
///
/// Especifica como um `ConversionResult` é serializado por `ResultWriter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OutputFormat {
    /// Pasta de trabalho XLSX (padrão)
    ///
    /// Uma única aba chamada `Sheet1`, com o cabeçalho do esquema na
    /// primeira linha, pronta para importação no Olist.
    Xlsx,

    /// CSV (valores separados por vírgula)
    ///
    /// # Exemplo de saída
    ///
    /// ```csv
    /// Número da proposta,Data,ID produto
    /// 1024,2024-05-25,P1
    /// ```
    Csv,

    /// JSON
    ///
    /// Objeto com as colunas do esquema, as linhas como objetos e os
    /// diagnósticos da conversão.
    ///
    /// # Exemplo de saída
    ///
    /// ```json
    /// {
    ///   "columns": ["Número da proposta", "ID produto"],
    ///   "rows": [
    ///     {"Número da proposta": 1024, "ID produto": "P1"}
    ///   ],
    ///   "diagnostics": {
    ///     "unmapped_products": []
    ///   }
    /// }
    /// ```
    Json,
}
