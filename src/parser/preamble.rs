//! Budget Preamble Module
//!
//! Varredura do preâmbulo do orçamento: localiza a linha de cabeçalho dos
//! itens pelas palavras-chave e extrai o número e a data da proposta dos
//! pares rótulo/valor das primeiras linhas.

use chrono::{NaiveDate, NaiveDateTime};

use crate::normalize::{normalize, normalize_cell};
use crate::types::{CellValue, ProposalInfo};

/// Rótulo (normalizado) da célula com o número da proposta
pub(crate) const PROPOSAL_NUMBER_LABEL: &str = "orçamento #";

/// Rótulo (normalizado) da célula com a data da proposta
pub(crate) const PROPOSAL_DATE_LABEL: &str = "data";

/// Formatos de data com o dia primeiro, tentados antes dos demais
///
/// O formato de dois dígitos vem antes do de quatro para que `%Y` não
/// aceite um ano de dois dígitos como o ano 24 do calendário.
const DAYFIRST_DATE_FORMATS: [&str; 4] = ["%d/%m/%y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Formatos de data comuns, tentados depois dos formatos com dia primeiro
const DEFAULT_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Formatos de data e hora; a parte de hora é descartada
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Localiza a linha de cabeçalho dos itens na prévia
///
/// Uma linha é o cabeçalho quando o conjunto (normalizado) de suas células
/// contém todas as palavras-chave normalizadas. A primeira linha que
/// satisfaz o critério vence.
pub(crate) fn find_header_row(preview: &[Vec<CellValue>], keywords: &[String]) -> Option<usize> {
    let wanted: Vec<String> = keywords.iter().map(|k| normalize(k)).collect();

    for (idx, row) in preview.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(normalize_cell).collect();
        if wanted.iter().all(|keyword| cells.contains(keyword)) {
            return Some(idx);
        }
    }
    None
}

/// Extrai o número e a data da proposta do preâmbulo
///
/// Os rótulos são procurados na primeira coluna de todas as linhas da
/// prévia; o valor fica na segunda coluna. Quando um rótulo aparece mais
/// de uma vez, a última ocorrência vence. Prévias com uma única coluna
/// não têm onde guardar o valor e são ignoradas.
pub(crate) fn extract_proposal(preview: &[Vec<CellValue>]) -> ProposalInfo {
    let mut info = ProposalInfo::default();

    let has_value_column = preview.first().map_or(false, |row| row.len() > 1);
    if !has_value_column {
        return info;
    }

    for row in preview {
        let label = normalize_cell(row.first().unwrap_or(&CellValue::Empty));
        if label == PROPOSAL_NUMBER_LABEL {
            let value = row.get(1).cloned().unwrap_or(CellValue::Empty);
            tracing::debug!(value = %value.to_display(), "proposal number found in preamble");
            info.number = value;
        } else if label == PROPOSAL_DATE_LABEL {
            let value = coerce_date(row.get(1).cloned().unwrap_or(CellValue::Empty));
            tracing::debug!(value = %value.to_display(), "proposal date found in preamble");
            info.date = value;
        }
    }

    info
}

/// Coage o valor da data da proposta para `CellValue::Date` quando possível
///
/// Datas de célula passam direto; textos são interpretados com os formatos
/// conhecidos, preferindo dia primeiro; qualquer outro valor (inclusive
/// texto irreconhecível) é mantido como está.
pub(crate) fn coerce_date(value: CellValue) -> CellValue {
    match value {
        CellValue::String(s) => match parse_date_string(&s) {
            Some(date) => CellValue::Date(date),
            None => CellValue::String(s),
        },
        other => other,
    }
}

/// Interpreta um texto de data, preferindo o dia primeiro
fn parse_date_string(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DAYFIRST_DATE_FORMATS.iter().chain(&DEFAULT_DATE_FORMATS) {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    for format in &DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(ts.date());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> CellValue {
        CellValue::String(text.to_string())
    }

    fn keywords() -> Vec<String> {
        [
            "Produto",
            "Cor",
            "Qualidade",
            "Valor Unitário",
            "Quantidade",
            "Subtotal",
        ]
        .iter()
        .map(|k| k.to_string())
        .collect()
    }

    // Testes de find_header_row
    #[test]
    fn test_find_header_row_with_casing_and_extra_columns() {
        let preview = vec![
            vec![s("Orçamento #"), CellValue::Number(1024.0), CellValue::Empty],
            vec![s("Data"), s("25/05/2024"), CellValue::Empty],
            vec![CellValue::Empty, CellValue::Empty, CellValue::Empty],
            vec![
                s("  pRoDuTo "),
                s("COR"),
                s("qualidade"),
                s("Valor   Unitário"),
                s("QUANTIDADE"),
                s("Subtotal"),
                s("Observações"),
            ],
        ];

        assert_eq!(find_header_row(&preview, &keywords()), Some(3));
    }

    #[test]
    fn test_find_header_row_first_match_wins() {
        let header = vec![
            s("Produto"),
            s("Cor"),
            s("Qualidade"),
            s("Valor Unitário"),
            s("Quantidade"),
            s("Subtotal"),
        ];
        let preview = vec![header.clone(), header];

        assert_eq!(find_header_row(&preview, &keywords()), Some(0));
    }

    #[test]
    fn test_find_header_row_requires_all_keywords() {
        let preview = vec![vec![
            s("Produto"),
            s("Cor"),
            s("Qualidade"),
            s("Quantidade"),
            s("Subtotal"),
        ]];

        assert_eq!(find_header_row(&preview, &keywords()), None);
    }

    #[test]
    fn test_find_header_row_empty_preview() {
        assert_eq!(find_header_row(&[], &keywords()), None);
    }

    // Testes de extract_proposal
    #[test]
    fn test_extract_proposal_number_and_date() {
        let preview = vec![
            vec![s("Orçamento #"), CellValue::Number(1024.0)],
            vec![s("Data"), s("25/05/2024")],
        ];

        let info = extract_proposal(&preview);
        assert_eq!(info.number, CellValue::Number(1024.0));
        assert_eq!(
            info.date,
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 5, 25).unwrap())
        );
    }

    #[test]
    fn test_extract_proposal_last_occurrence_wins() {
        let preview = vec![
            vec![s("Orçamento #"), CellValue::Number(1.0)],
            vec![s("  orçamento   # "), CellValue::Number(2.0)],
        ];

        let info = extract_proposal(&preview);
        assert_eq!(info.number, CellValue::Number(2.0));
    }

    #[test]
    fn test_extract_proposal_single_column_preview() {
        let preview = vec![vec![s("Orçamento #")], vec![s("Data")]];

        let info = extract_proposal(&preview);
        assert!(info.number.is_empty());
        assert!(info.date.is_empty());
    }

    #[test]
    fn test_extract_proposal_unparseable_date_stays_text() {
        let preview = vec![vec![s("Data"), s("em breve")]];

        let info = extract_proposal(&preview);
        assert_eq!(info.date, s("em breve"));
    }

    #[test]
    fn test_extract_proposal_date_cell_passes_through() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 25).unwrap();
        let preview = vec![vec![s("Data"), CellValue::Date(date)]];

        let info = extract_proposal(&preview);
        assert_eq!(info.date, CellValue::Date(date));
    }

    #[test]
    fn test_extract_proposal_missing_labels() {
        let preview = vec![vec![s("Cliente"), s("ACME")]];

        let info = extract_proposal(&preview);
        assert!(info.number.is_empty());
        assert!(info.date.is_empty());
    }

    // Testes de parse_date_string
    #[test]
    fn test_parse_date_dayfirst_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        assert_eq!(parse_date_string("25/12/2024"), Some(expected));
        assert_eq!(parse_date_string("25/12/24"), Some(expected));
        assert_eq!(parse_date_string("25-12-2024"), Some(expected));
        assert_eq!(parse_date_string("25.12.2024"), Some(expected));
        assert_eq!(parse_date_string(" 25/12/2024 "), Some(expected));
    }

    #[test]
    fn test_parse_date_default_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        assert_eq!(parse_date_string("2024-12-25"), Some(expected));
        assert_eq!(parse_date_string("2024/12/25"), Some(expected));
        // Mês primeiro só é aceito quando dia primeiro é impossível
        assert_eq!(parse_date_string("12/25/2024"), Some(expected));
    }

    #[test]
    fn test_parse_date_ambiguous_prefers_dayfirst() {
        // 05/06 é ambíguo; o dia vem primeiro
        assert_eq!(
            parse_date_string("05/06/2024"),
            Some(NaiveDate::from_ymd_opt(2024, 6, 5).unwrap())
        );
    }

    #[test]
    fn test_parse_date_datetime_formats_drop_time() {
        let expected = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        assert_eq!(parse_date_string("2024-12-25 10:30:00"), Some(expected));
        assert_eq!(parse_date_string("2024-12-25T10:30:00"), Some(expected));
    }

    #[test]
    fn test_parse_date_invalid_inputs() {
        assert_eq!(parse_date_string(""), None);
        assert_eq!(parse_date_string("   "), None);
        assert_eq!(parse_date_string("amanhã"), None);
        assert_eq!(parse_date_string("32/01/2024"), None);
    }
}
