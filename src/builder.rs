//! Builder Module
//!
//! Fornece a Fluent Builder API para construir instâncias de `Converter`
//! passo a passo, com validação das opções em `build()`.

use std::io::{Read, Seek};
use std::path::Path;

use chrono::NaiveDate;

use crate::api::{DateFormat, SheetSelector, DEFAULT_HEADER_KEYWORDS};
use crate::assembler::RowAssembler;
use crate::catalog::ProductCatalog;
use crate::customers::CustomerRegistry;
use crate::error::ConvertError;
use crate::normalize::normalize;
use crate::parser::{extract_proposal, find_header_row, SpreadsheetReader, DEFAULT_MAX_INPUT_SIZE};
use crate::types::{ConversionResult, HeaderDetection, OutputSchema, Table};

/// Configuração interna da conversão
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// Seleção da aba de orçamento
    pub budget_sheet: SheetSelector,

    /// Palavras-chave da linha de cabeçalho dos itens
    pub header_keywords: Vec<String>,

    /// Linhas puladas quando o cabeçalho não é localizado
    pub fallback_skip_rows: usize,

    /// Linhas da prévia inspecionadas para metadados e cabeçalho
    pub preview_rows: usize,

    /// Formato das datas na saída
    pub date_format: DateFormat,

    /// Tamanho máximo de cada entrada, em bytes
    pub max_input_size: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            budget_sheet: SheetSelector::default(),
            header_keywords: DEFAULT_HEADER_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            fallback_skip_rows: 2,
            preview_rows: 10,
            date_format: DateFormat::Iso8601,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
        }
    }
}

/// Fluent Builder API para o conversor
///
/// Constrói uma instância de `Converter` passo a passo. Todas as opções têm
/// valor padrão; apenas o que difere precisa ser configurado.
///
/// # Exemplo
///
/// ```rust,no_run
/// use olistify::{ConverterBuilder, SheetSelector};
///
/// # fn main() -> Result<(), olistify::ConvertError> {
/// let converter = ConverterBuilder::new()
///     .with_budget_sheet(SheetSelector::Name("Orçamento".to_string()))
///     .with_fallback_skip_rows(3)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// Configuração em construção
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// Cria um builder com a configuração padrão
    ///
    /// # Padrões
    ///
    /// - Aba de orçamento: `Orçamento` se existir, senão a primeira
    /// - Palavras-chave do cabeçalho: Produto, Cor, Qualidade,
    ///   Valor Unitário, Quantidade, Subtotal
    /// - Linhas puladas na alternativa: 2
    /// - Linhas da prévia: 10
    /// - Formato de data: ISO 8601 (YYYY-MM-DD)
    /// - Tamanho máximo da entrada: 2 GiB
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// Define a seleção da aba de orçamento
    ///
    /// # Exemplo
    ///
    /// ```rust,no_run
    /// use olistify::{ConverterBuilder, SheetSelector};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_budget_sheet(SheetSelector::Index(0));
    /// ```
    pub fn with_budget_sheet(mut self, selector: SheetSelector) -> Self {
        self.config.budget_sheet = selector;
        self
    }

    /// Define as palavras-chave da linha de cabeçalho dos itens
    ///
    /// A linha de cabeçalho é a primeira da prévia que contém todas as
    /// palavras, após normalização. O conjunto não pode ser vazio.
    ///
    /// # Exemplo
    ///
    /// ```rust,no_run
    /// use olistify::ConverterBuilder;
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_header_keywords(["Produto", "Quantidade", "Valor Unitário"]);
    /// ```
    pub fn with_header_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.header_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Define quantas linhas pular quando o cabeçalho não é localizado
    ///
    /// Zero é válido e significa que a primeira linha da aba é tratada como
    /// cabeçalho dos itens.
    pub fn with_fallback_skip_rows(mut self, rows: usize) -> Self {
        self.config.fallback_skip_rows = rows;
        self
    }

    /// Define quantas linhas da prévia são inspecionadas
    ///
    /// A prévia alimenta a extração dos metadados da proposta e a busca da
    /// linha de cabeçalho. Precisa ser pelo menos 1.
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.config.preview_rows = rows;
        self
    }

    /// Define o formato das datas na saída
    ///
    /// # Exemplo
    ///
    /// ```rust,no_run
    /// use olistify::{ConverterBuilder, DateFormat};
    ///
    /// let builder = ConverterBuilder::new()
    ///     .with_date_format(DateFormat::Custom("%d/%m/%Y".to_string()));
    /// ```
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.config.date_format = format;
        self
    }

    /// Define o tamanho máximo de cada planilha de entrada, em bytes
    pub fn with_max_input_size(mut self, bytes: u64) -> Self {
        self.config.max_input_size = bytes;
        self
    }

    /// Valida a configuração e cria o `Converter`
    ///
    /// # Erros
    ///
    /// * `ConvertError::Config`: conjunto de palavras-chave vazio ou com
    ///   entrada em branco, prévia de zero linhas, ou formato de data
    ///   customizado inválido
    pub fn build(self) -> Result<Converter, ConvertError> {
        // 1. Palavras-chave do cabeçalho
        if self.config.header_keywords.is_empty() {
            return Err(ConvertError::Config(
                "header keyword set must not be empty".to_string(),
            ));
        }
        for keyword in &self.config.header_keywords {
            if normalize(keyword).is_empty() {
                return Err(ConvertError::Config(format!(
                    "header keyword '{}' is blank after normalization",
                    keyword
                )));
            }
        }

        // 2. Tamanho da prévia
        if self.config.preview_rows == 0 {
            return Err(ConvertError::Config(
                "preview rows must be at least 1".to_string(),
            ));
        }

        // 3. Formato de data customizado
        if let DateFormat::Custom(ref format_str) = self.config.date_format {
            // Tenta formatar uma data de teste com a string recebida
            use std::fmt::Write as _;
            let test_date = NaiveDate::from_ymd_opt(2025, 1, 1)
                .ok_or_else(|| ConvertError::Config("Failed to create test date".to_string()))?;
            let mut probe = String::new();
            let rendered = write!(&mut probe, "{}", test_date.format(format_str));
            if rendered.is_err() || probe.is_empty() {
                return Err(ConvertError::Config(format!(
                    "Invalid date format string: '{}'",
                    format_str
                )));
            }
        }

        Ok(Converter::new(self.config))
    }
}

/// Fachada da conversão
///
/// Ponto de entrada principal: converte um orçamento de fornecedor no
/// formato de importação do Olist, consultando o catálogo de produtos e o
/// cadastro de clientes e seguindo o esquema do modelo de saída.
///
/// # Exemplo
///
/// ```rust,no_run
/// use olistify::ConverterBuilder;
/// use std::path::Path;
///
/// # fn main() -> Result<(), olistify::ConvertError> {
/// let converter = ConverterBuilder::new().build()?;
/// let result = converter.convert_path(
///     Path::new("orcamento.xlsx"),
///     Path::new("mapeamento.xlsx"),
///     Path::new("clientes.xlsx"),
///     "102",
///     Path::new("modelo_olist.xlsx"),
/// )?;
/// result.write_xlsx(Path::new("proposta_convertida.xlsx"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    /// Configuração da conversão
    config: ConversionConfig,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Converte um orçamento lido de um leitor em memória
    ///
    /// # Argumentos
    ///
    /// * `budget` - Leitor com os bytes do orçamento XLSX
    /// * `catalog_path` - Planilha de mapeamento com a aba `CATÁLOGO`
    /// * `registry_path` - Planilha de cadastro com a aba `CLIENTES`
    /// * `customer_id` - ID do cliente, como texto
    /// * `template_path` - Modelo de saída cujo cabeçalho define o esquema
    ///
    /// # Retorno
    ///
    /// * `Ok(ConversionResult)` - Linhas convertidas e diagnósticos
    /// * `Err(ConvertError)` - Falha estrutural em alguma entrada, cliente
    ///   inexistente ou erro de leitura
    ///
    /// # Exemplo
    ///
    /// ```rust,no_run
    /// use olistify::ConverterBuilder;
    /// use std::io::Cursor;
    /// use std::path::Path;
    ///
    /// # fn main() -> Result<(), olistify::ConvertError> {
    /// let converter = ConverterBuilder::new().build()?;
    /// let budget_bytes: Vec<u8> = std::fs::read("orcamento.xlsx")?;
    /// let result = converter.convert(
    ///     Cursor::new(budget_bytes),
    ///     Path::new("mapeamento.xlsx"),
    ///     Path::new("clientes.xlsx"),
    ///     "102",
    ///     Path::new("modelo_olist.xlsx"),
    /// )?;
    /// println!("{} linhas convertidas", result.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn convert<R: Read + Seek>(
        &self,
        budget: R,
        catalog_path: &Path,
        registry_path: &Path,
        customer_id: &str,
        template_path: &Path,
    ) -> Result<ConversionResult, ConvertError> {
        let reader = SpreadsheetReader::open_reader(budget, "budget", self.config.max_input_size)?;
        self.run(reader, catalog_path, registry_path, customer_id, template_path)
    }

    /// Converte um orçamento lido de um arquivo
    ///
    /// Equivalente a `convert`, abrindo o orçamento pelo caminho.
    pub fn convert_path(
        &self,
        budget_path: &Path,
        catalog_path: &Path,
        registry_path: &Path,
        customer_id: &str,
        template_path: &Path,
    ) -> Result<ConversionResult, ConvertError> {
        let reader = SpreadsheetReader::open_path(budget_path, self.config.max_input_size)?;
        self.run(reader, catalog_path, registry_path, customer_id, template_path)
    }

    /// Converte e serializa direto como pasta de trabalho XLSX em memória
    ///
    /// Conveniência para quem só precisa dos bytes prontos para download.
    pub fn convert_to_xlsx<R: Read + Seek>(
        &self,
        budget: R,
        catalog_path: &Path,
        registry_path: &Path,
        customer_id: &str,
        template_path: &Path,
    ) -> Result<Vec<u8>, ConvertError> {
        let result = self.convert(budget, catalog_path, registry_path, customer_id, template_path)?;
        result.to_xlsx_bytes()
    }

    fn run(
        &self,
        mut budget: SpreadsheetReader,
        catalog_path: &Path,
        registry_path: &Path,
        customer_id: &str,
        template_path: &Path,
    ) -> Result<ConversionResult, ConvertError> {
        tracing::info!(customer_id, source = budget.source(), "starting budget conversion");

        // 1. Entradas auxiliares
        let catalog = ProductCatalog::load(catalog_path, self.config.max_input_size)?;
        let registry = CustomerRegistry::load_with_limit(registry_path, self.config.max_input_size)?;
        let schema = self.load_schema(template_path)?;

        // 2. Aba do orçamento, prévia e metadados da proposta
        let sheet = budget.select_sheet(&self.config.budget_sheet)?;
        let preview = budget.preview(&sheet, self.config.preview_rows)?;
        let proposal = extract_proposal(&preview);

        // 3. Tabela de itens
        let (mut items, detection) = match find_header_row(&preview, &self.config.header_keywords)
        {
            Some(row) => {
                tracing::debug!(row, "items header row located by keywords");
                (
                    budget.read_table(&sheet, row)?,
                    HeaderDetection::Keywords { row },
                )
            }
            None if preview.is_empty() => {
                tracing::warn!(sheet = %sheet, "budget sheet is empty; nothing to convert");
                (Table::empty(), HeaderDetection::NotFound)
            }
            None => {
                let rows = self.config.fallback_skip_rows;
                tracing::warn!(
                    skip = rows,
                    "items header row not located; using fixed row skip"
                );
                (
                    budget.read_table(&sheet, rows)?,
                    HeaderDetection::FallbackSkip { rows },
                )
            }
        };
        items.normalize_headers();

        // 4. Cliente, antes de processar qualquer item
        let customer =
            registry
                .find(customer_id)
                .ok_or_else(|| ConvertError::CustomerNotFound {
                    id: customer_id.to_string(),
                })?;

        // 5. Montagem das linhas e diagnósticos
        let mut assembler = RowAssembler::new(&schema, &catalog, customer, &proposal);
        let rows = assembler.assemble(&items);
        let diagnostics = assembler.into_diagnostics(detection);

        tracing::info!(
            rows = rows.len(),
            unmapped = diagnostics.unmapped_products.len(),
            "budget conversion finished"
        );

        Ok(ConversionResult::new(
            schema,
            rows,
            diagnostics,
            self.config.date_format.clone(),
        ))
    }

    /// Carrega o esquema de saída do modelo
    ///
    /// O esquema é o cabeçalho da primeira linha da primeira aba. Um modelo
    /// sem cabeçalho não tem como definir a saída e é um erro estrutural.
    fn load_schema(&self, template_path: &Path) -> Result<OutputSchema, ConvertError> {
        let mut reader = SpreadsheetReader::open_path(template_path, self.config.max_input_size)?;
        let sheet = reader.select_sheet(&SheetSelector::First)?;
        let columns = reader.read_header_row(&sheet, 0)?;

        if columns.iter().all(|name| name.is_empty()) {
            return Err(ConvertError::EmptyTemplate {
                file: reader.source().to_string(),
            });
        }

        tracing::debug!(columns = columns.len(), "output template schema loaded");
        Ok(OutputSchema::from_columns(columns))
    }
}
