//! Row Assembler Module
//!
//! Montagem das linhas de saída: uma por item do orçamento, no esquema do
//! modelo, combinando os metadados da proposta, o cliente resolvido e a
//! consulta ao catálogo de produtos.

use crate::catalog::ProductCatalog;
use crate::customers::CustomerRecord;
use crate::normalize::normalize_cell;
use crate::types::{
    CellValue, Diagnostics, HeaderDetection, OutputRow, OutputSchema, ProposalInfo, RowDraft,
    Table, UnmappedProduct,
};

/// Colunas dos itens na tabela do orçamento, já normalizadas
pub(crate) const ITEM_PRODUCT_COLUMN: &str = "produto";
pub(crate) const ITEM_QUANTITY_COLUMN: &str = "quantidade";
pub(crate) const ITEM_UNIT_PRICE_COLUMN: &str = "valor unitário";

/// Campos calculados, com os nomes esperados no modelo de saída
pub(crate) const OUT_PROPOSAL_NUMBER: &str = "Número da proposta";
pub(crate) const OUT_PROPOSAL_DATE: &str = "Data";
pub(crate) const OUT_CUSTOMER_ID: &str = "ID contato";
pub(crate) const OUT_CUSTOMER_NAME: &str = "Nome do contato";
pub(crate) const OUT_PRODUCT_ID: &str = "ID produto";
pub(crate) const OUT_DESCRIPTION: &str = "Descrição";
pub(crate) const OUT_QUANTITY: &str = "Quantidade";
pub(crate) const OUT_UNIT_PRICE: &str = "Valor unitário";

/// Montador de linhas de saída
///
/// Percorre os itens do orçamento acumulando as linhas convertidas e os
/// diagnósticos: produtos não mapeados, itens sem produto e linhas em
/// branco descartadas.
pub(crate) struct RowAssembler<'a> {
    schema: &'a OutputSchema,
    catalog: &'a ProductCatalog,
    customer: &'a CustomerRecord,
    proposal: &'a ProposalInfo,
    unmapped: Vec<UnmappedProduct>,
    empty_product_rows: usize,
    skipped_blank_rows: usize,
}

impl<'a> RowAssembler<'a> {
    pub fn new(
        schema: &'a OutputSchema,
        catalog: &'a ProductCatalog,
        customer: &'a CustomerRecord,
        proposal: &'a ProposalInfo,
    ) -> Self {
        Self {
            schema,
            catalog,
            customer,
            proposal,
            unmapped: Vec::new(),
            empty_product_rows: 0,
            skipped_blank_rows: 0,
        }
    }

    /// Converte os itens em linhas de saída
    ///
    /// Linhas com produto, quantidade e valor unitário todos vazios são
    /// descartadas. Itens sem correspondência no catálogo saem com ID e
    /// descrição vazios e entram nos diagnósticos.
    pub fn assemble(&mut self, items: &Table) -> Vec<OutputRow> {
        let mut rows = Vec::new();

        for idx in 0..items.len() {
            let product = items.value(idx, ITEM_PRODUCT_COLUMN);
            let quantity = items.value(idx, ITEM_QUANTITY_COLUMN);
            let unit_price = items.value(idx, ITEM_UNIT_PRICE_COLUMN);

            if product.is_empty() && quantity.is_empty() && unit_price.is_empty() {
                self.skipped_blank_rows += 1;
                continue;
            }

            let search_key = normalize_cell(product);
            let (product_id, description) = if search_key.is_empty() {
                self.empty_product_rows += 1;
                tracing::debug!(row = idx, "item row has no product text");
                (CellValue::Empty, CellValue::Empty)
            } else {
                match self.catalog.resolve(&search_key) {
                    Some(hit) => (hit.id, hit.description),
                    None => {
                        tracing::warn!(
                            product = %product.to_display(),
                            key = %search_key,
                            "product not found in catalog"
                        );
                        self.unmapped.push(UnmappedProduct {
                            normalized: search_key,
                            original: product.to_display(),
                        });
                        (CellValue::Empty, CellValue::Empty)
                    }
                }
            };

            let mut draft = RowDraft::new(self.schema);
            draft.set(OUT_PROPOSAL_NUMBER, self.proposal.number.clone());
            draft.set(OUT_PROPOSAL_DATE, self.proposal.date.clone());
            draft.set(OUT_CUSTOMER_ID, self.customer.id.clone());
            draft.set(OUT_CUSTOMER_NAME, self.customer.name.clone());
            draft.set(OUT_PRODUCT_ID, product_id);
            draft.set(OUT_DESCRIPTION, description);
            draft.set(OUT_QUANTITY, quantity.clone());
            draft.set(OUT_UNIT_PRICE, unit_price.clone());
            rows.push(draft.finish());
        }

        rows
    }

    /// Consolida os diagnósticos da conversão
    ///
    /// A lista de produtos não mapeados sai sem duplicatas e ordenada pelo
    /// par (chave normalizada, texto original).
    pub fn into_diagnostics(mut self, header_detection: HeaderDetection) -> Diagnostics {
        self.unmapped
            .sort_by(|a, b| (&a.normalized, &a.original).cmp(&(&b.normalized, &b.original)));
        self.unmapped.dedup();

        if !self.unmapped.is_empty() {
            tracing::warn!(
                count = self.unmapped.len(),
                "products without catalog match"
            );
        }

        Diagnostics {
            header_detection,
            unmapped_products: self.unmapped,
            empty_product_rows: self.empty_product_rows,
            skipped_blank_rows: self.skipped_blank_rows,
        }
    }
}
