//! Error Types Module
//!
//! Módulo que define os tipos de erro estruturados usados em todo o crate.
//! Usa `thiserror` para conversão automática de erros e formatação de mensagens.

use thiserror::Error;

/// Tipo de erro usado em todo o crate olistify
///
/// Este tipo unifica todos os erros que podem ocorrer durante a leitura das
/// planilhas de entrada, a conversão do orçamento e a gravação do resultado.
///
/// # Categorias de erro
///
/// - `Io`: erro de E/S (falha ao abrir ou ler um arquivo)
/// - `Spreadsheet`: erro do calamine ao interpretar uma planilha
/// - `EmptyWorkbook` / `MissingSheet` / `MissingColumn` / `EmptyTemplate`:
///   problemas estruturais nos arquivos de entrada
/// - `CustomerNotFound`: o ID informado não existe no cadastro de clientes
/// - `Config`: configuração inválida detectada em `ConverterBuilder::build()`
/// - `InputTooLarge`: entrada excede o tamanho máximo configurado
/// - `Workbook`: falha do rust_xlsxwriter ao gravar a planilha de saída
/// - `Json`: falha de serialização do relatório JSON
///
/// # Exemplo
///
/// ```rust,no_run
/// use olistify::ConvertError;
/// use std::fs::File;
///
/// fn open_budget(path: &str) -> Result<(), ConvertError> {
///     let file = File::open(path)?;  // io::Error convertido automaticamente
///     // ... processamento ...
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Erro de E/S
    ///
    /// Falha ao abrir, ler ou gravar um arquivo. Convertido automaticamente
    /// a partir de `std::io::Error` pelo atributo `#[from]`.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Erro do calamine ao interpretar a planilha
    ///
    /// Arquivo corrompido, formato inválido ou conteúdo que o calamine não
    /// consegue decodificar. Convertido automaticamente a partir de
    /// `calamine::Error`.
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// A pasta de trabalho não contém nenhuma aba
    #[error("Workbook '{file}' has no sheets")]
    EmptyWorkbook {
        /// Arquivo (ou rótulo da origem) sem abas
        file: String,
    },

    /// Uma aba obrigatória não existe na pasta de trabalho
    ///
    /// Ocorre quando o catálogo não tem a aba `CATÁLOGO`, o cadastro não tem
    /// a aba `CLIENTES`, ou um seletor de aba exato não encontra o nome pedido.
    #[error("Sheet '{sheet}' not found in '{file}'")]
    MissingSheet {
        /// Arquivo (ou rótulo da origem) inspecionado
        file: String,
        /// Nome da aba esperada
        sheet: String,
    },

    /// Uma coluna obrigatória não existe na aba
    ///
    /// Ocorre quando o catálogo não tem a coluna de modelos ou o cadastro de
    /// clientes não tem as colunas de ID e nome.
    #[error("Required column '{column}' not found in sheet '{sheet}'")]
    MissingColumn {
        /// Aba inspecionada
        sheet: String,
        /// Nome da coluna esperada
        column: String,
    },

    /// O modelo de saída não define nenhuma coluna
    ///
    /// A primeira linha da primeira aba do modelo está vazia, então não há
    /// como montar o esquema de saída.
    #[error("Output template '{file}' has an empty header row")]
    EmptyTemplate {
        /// Arquivo de modelo inspecionado
        file: String,
    },

    /// O cliente informado não existe no cadastro
    ///
    /// A conversão é interrompida antes do processamento dos itens.
    #[error("Customer '{id}' not found in registry")]
    CustomerNotFound {
        /// ID recebido do chamador, como texto
        id: String,
    },

    /// Configuração inválida
    ///
    /// Detectada em `ConverterBuilder::build()`: conjunto de palavras-chave
    /// vazio, formato de data customizado inválido, etc.
    ///
    /// # Exemplo
    ///
    /// ```rust
    /// use olistify::{ConverterBuilder, ConvertError};
    ///
    /// let result = ConverterBuilder::new()
    ///     .with_header_keywords(Vec::<String>::new())
    ///     .build();
    ///
    /// assert!(matches!(result, Err(ConvertError::Config(_))));
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// A entrada excede o tamanho máximo configurado
    ///
    /// O conteúdo é bufferizado antes da decodificação, então o limite é
    /// verificado sobre o tamanho total em bytes.
    #[error("Input exceeds maximum size: {size} bytes (max: {max} bytes)")]
    InputTooLarge {
        /// Tamanho observado em bytes
        size: u64,
        /// Limite configurado em bytes
        max: u64,
    },

    /// Falha ao gravar a planilha de saída
    ///
    /// Convertido automaticamente a partir de `rust_xlsxwriter::XlsxError`.
    #[error("Failed to write workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    /// Falha ao serializar o relatório JSON
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
