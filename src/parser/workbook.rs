//! Workbook Reader Module
//!
//! Leitura de pastas de trabalho com calamine. Todo o conteúdo é
//! bufferizado em memória antes da decodificação, então o arquivo de origem
//! é liberado assim que a leitura termina.

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets, Xlsx};
use std::io::{Cursor, Read};
use std::path::Path;

use crate::api::SheetSelector;
use crate::error::ConvertError;
use crate::types::{CellValue, Table};

/// Tamanho máximo padrão da entrada: 2 GiB
pub(crate) const DEFAULT_MAX_INPUT_SIZE: u64 = 2_147_483_648;

/// Leitor de pasta de trabalho
///
/// Encapsula o calamine e oferece as operações de leitura usadas pelo
/// conversor: seleção de aba, prévia das primeiras linhas e leitura de
/// tabelas ancoradas em uma linha de cabeçalho. Somente XLSX é aceito.
pub(crate) struct SpreadsheetReader {
    /// Pasta de trabalho do calamine (somente formato XLSX)
    workbook: Xlsx<Cursor<Vec<u8>>>,
    /// Caminho ou rótulo da origem, usado nas mensagens de erro
    source: String,
}

impl SpreadsheetReader {
    /// Abre uma pasta de trabalho a partir de um caminho
    ///
    /// # Argumentos
    ///
    /// * `path` - Caminho do arquivo XLSX
    /// * `max_size` - Tamanho máximo da entrada em bytes
    pub fn open_path(path: &Path, max_size: u64) -> Result<Self, ConvertError> {
        let file = std::fs::File::open(path)?;
        Self::open_reader(file, &path.display().to_string(), max_size)
    }

    /// Abre uma pasta de trabalho a partir de um leitor
    ///
    /// # Argumentos
    ///
    /// * `reader` - Origem dos bytes do arquivo XLSX
    /// * `source` - Rótulo da origem para as mensagens de erro
    /// * `max_size` - Tamanho máximo da entrada em bytes
    ///
    /// # Retorno
    ///
    /// * `Ok(SpreadsheetReader)` - Pasta de trabalho decodificada
    /// * `Err(ConvertError)` - Entrada grande demais, ilegível ou não-XLSX
    pub fn open_reader<R: Read>(
        mut reader: R,
        source: &str,
        max_size: u64,
    ) -> Result<Self, ConvertError> {
        // Bufferiza a entrada inteira, aplicando o limite de tamanho
        let mut buffer = Vec::new();
        let bytes_read = reader.read_to_end(&mut buffer)?;

        if bytes_read as u64 > max_size {
            return Err(ConvertError::InputTooLarge {
                size: bytes_read as u64,
                max: max_size,
            });
        }

        // Decodifica com calamine
        let sheets =
            open_workbook_auto_from_rs(Cursor::new(buffer)).map_err(ConvertError::Spreadsheet)?;
        let workbook = match sheets {
            Sheets::Xlsx(workbook) => workbook,
            _ => {
                return Err(ConvertError::Config(
                    "Only XLSX format is supported".to_string(),
                ))
            }
        };

        Ok(Self {
            workbook,
            source: source.to_string(),
        })
    }

    /// Rótulo da origem desta pasta de trabalho
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Nomes de todas as abas
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// Seleciona uma aba conforme o seletor
    ///
    /// # Retorno
    ///
    /// * `Ok(String)` - Nome da aba selecionada
    /// * `Err(ConvertError)` - Pasta sem abas, nome ausente ou índice fora
    ///   do intervalo
    pub fn select_sheet(&self, selector: &SheetSelector) -> Result<String, ConvertError> {
        let all_sheet_names = self.sheet_names();

        if all_sheet_names.is_empty() {
            return Err(ConvertError::EmptyWorkbook {
                file: self.source.clone(),
            });
        }

        match selector {
            SheetSelector::PreferNamed(name) => {
                if all_sheet_names.contains(name) {
                    Ok(name.clone())
                } else {
                    tracing::warn!(
                        source = %self.source,
                        sheet = %name,
                        fallback = %all_sheet_names[0],
                        "preferred sheet not found; using first sheet"
                    );
                    Ok(all_sheet_names[0].clone())
                }
            }

            SheetSelector::Name(name) => {
                if !all_sheet_names.contains(name) {
                    return Err(ConvertError::MissingSheet {
                        file: self.source.clone(),
                        sheet: name.clone(),
                    });
                }
                Ok(name.clone())
            }

            SheetSelector::Index(index) => {
                if *index >= all_sheet_names.len() {
                    return Err(ConvertError::Config(format!(
                        "Sheet index {} is out of range (total: {})",
                        index,
                        all_sheet_names.len()
                    )));
                }
                Ok(all_sheet_names[*index].clone())
            }

            SheetSelector::First => Ok(all_sheet_names[0].clone()),
        }
    }

    fn range(&mut self, sheet: &str) -> Result<Range<Data>, ConvertError> {
        if !self.sheet_names().iter().any(|name| name == sheet) {
            return Err(ConvertError::MissingSheet {
                file: self.source.clone(),
                sheet: sheet.to_string(),
            });
        }
        self.workbook
            .worksheet_range(sheet)
            .map_err(|e| ConvertError::Spreadsheet(e.into()))
    }

    /// Lê as primeiras linhas da aba, ancoradas em A1
    ///
    /// Cada linha retornada tem a largura total da região usada da aba.
    /// Uma aba vazia produz um vetor vazio.
    pub fn preview(&mut self, sheet: &str, rows: usize) -> Result<Vec<Vec<CellValue>>, ConvertError> {
        let range = self.range(sheet)?;
        Ok(read_block(&range, 0, rows))
    }

    /// Lê a linha indicada como uma linha de cabeçalho
    ///
    /// As células são convertidas para texto de exibição; células vazias
    /// viram texto vazio.
    pub fn read_header_row(&mut self, sheet: &str, row: usize) -> Result<Vec<String>, ConvertError> {
        let range = self.range(sheet)?;
        let header = read_block(&range, row, 1)
            .into_iter()
            .next()
            .unwrap_or_default();
        Ok(header.iter().map(CellValue::to_display).collect())
    }

    /// Lê uma tabela cujo cabeçalho está na linha indicada
    ///
    /// As linhas seguintes até o fim da região usada viram linhas de dados.
    /// Se o cabeçalho estiver além da região usada, a tabela sai vazia.
    pub fn read_table(&mut self, sheet: &str, header_row: usize) -> Result<Table, ConvertError> {
        let range = self.range(sheet)?;

        let Some(end) = range.end() else {
            return Ok(Table::empty());
        };
        let height = end.0 as usize + 1;
        if header_row >= height {
            return Ok(Table::empty());
        }

        let columns = read_block(&range, header_row, 1)
            .into_iter()
            .next()
            .unwrap_or_default()
            .iter()
            .map(CellValue::to_display)
            .collect();
        let rows = read_block(&range, header_row + 1, height - header_row - 1);

        Ok(Table::new(columns, rows))
    }
}

/// Lê um bloco de linhas da região usada, com coordenadas absolutas
///
/// A região do calamine pode começar depois de A1; a leitura por
/// `get_value` com coordenadas absolutas preenche o deslocamento com
/// células vazias, mantendo a âncora em A1.
fn read_block(range: &Range<Data>, start_row: usize, max_rows: usize) -> Vec<Vec<CellValue>> {
    let Some(end) = range.end() else {
        return Vec::new();
    };
    let height = end.0 as usize + 1;
    let width = end.1 as usize + 1;
    let last_row = height.min(start_row.saturating_add(max_rows));

    let mut rows = Vec::with_capacity(last_row.saturating_sub(start_row));
    for row in start_row..last_row {
        let mut cells = Vec::with_capacity(width);
        for col in 0..width {
            cells.push(cell_from_data(range.get_value((row as u32, col as u32))));
        }
        rows.push(cells);
    }
    rows
}

/// Converte uma célula do calamine para `CellValue`
///
/// Datas com hora são truncadas para a data de calendário. Valores seriais
/// fora do intervalo representável ficam como número.
fn cell_from_data(data: Option<&Data>) -> CellValue {
    match data {
        None => CellValue::Empty,
        Some(Data::Int(i)) => CellValue::Number(*i as f64),
        Some(Data::Float(f)) => CellValue::Number(*f),
        Some(Data::String(s)) => CellValue::String(s.clone()),
        Some(Data::Bool(b)) => CellValue::Bool(*b),
        Some(Data::DateTime(dt)) => match dt.as_datetime() {
            Some(ts) => CellValue::Date(ts.date()),
            None => CellValue::Number(dt.as_f64()),
        },
        Some(Data::DateTimeIso(s)) => CellValue::String(s.clone()),
        Some(Data::DurationIso(s)) => CellValue::String(s.clone()),
        Some(Data::Error(e)) => CellValue::Error(format!("{:?}", e)),
        Some(_) => CellValue::Empty,
    }
}

// Os testes ficam nos testes de integração (tests/), porque exigem
// arquivos XLSX reais.
