//! Text Normalization Module
//!
//! Módulo de normalização de texto para busca. Toda comparação de nomes de
//! produto, rótulos do preâmbulo e cabeçalhos de coluna passa por aqui, para
//! que os três caminhos usem exatamente a mesma chave.

use crate::types::CellValue;

/// Normaliza texto para comparação
///
/// Converte para minúsculas, remove espaços nas bordas e colapsa qualquer
/// sequência interna de espaços em branco em um único espaço.
/// Ex.: `"  Sofá   AZUL  "` vira `"sofá azul"`.
pub(crate) fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normaliza o conteúdo de uma célula
///
/// Células vazias viram texto vazio; as demais são exibidas como texto e
/// então normalizadas.
pub(crate) fn normalize_cell(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        other => normalize(&other.to_display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_trims() {
        assert_eq!(normalize("  Sofá Azul  "), "sofá azul");
        assert_eq!(normalize("MESA DE JANTAR"), "mesa de jantar");
    }

    #[test]
    fn test_normalize_collapses_internal_whitespace() {
        assert_eq!(normalize("Sofa  Azul"), "sofa azul");
        assert_eq!(normalize("a\t b\n\nc"), "a b c");
    }

    #[test]
    fn test_normalize_empty_and_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n  "), "");
    }

    #[test]
    fn test_normalize_cell_variants() {
        assert_eq!(normalize_cell(&CellValue::Empty), "");
        assert_eq!(
            normalize_cell(&CellValue::String("  Poltrona  VERDE ".to_string())),
            "poltrona verde"
        );
        assert_eq!(normalize_cell(&CellValue::Number(1024.0)), "1024");
        assert_eq!(normalize_cell(&CellValue::Bool(true)), "true");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        /// Normalizar duas vezes produz o mesmo resultado que uma vez.
        proptest! {
            #[test]
            fn test_normalize_is_idempotent(text in "\\PC{0,64}") {
                let once = normalize(&text);
                let twice = normalize(&once);
                prop_assert_eq!(once, twice);
            }

            /// O resultado nunca tem espaços nas bordas nem espaços duplos.
            #[test]
            fn test_normalize_output_shape(text in "\\PC{0,64}") {
                let out = normalize(&text);
                prop_assert_eq!(out.trim(), out.as_str());
                prop_assert!(!out.contains("  "));
            }
        }
    }
}
