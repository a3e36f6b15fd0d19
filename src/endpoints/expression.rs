use tracing::instrument;

use super::{Comparison, DIFFERENTIAL_EXPRESSION, DIFFERENTIAL_EXPRESSION_TRANSCRIPT};
use crate::core::{HttpTransport, SpongeClient};
use crate::error::{Result, SpongeError};
use crate::params::QueryParams;
use crate::table::ResultTable;

/// Differential expression of genes between two comparison sides.
/// Genes are picked by ENSG number or by symbol, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifferentialExpressionQuery {
    pub comparison: Comparison,
    pub ensg_numbers: Option<Vec<String>>,
    pub gene_symbols: Option<Vec<String>>,
}

impl DifferentialExpressionQuery {
    pub fn new(comparison: Comparison) -> Self {
        Self { comparison, ensg_numbers: None, gene_symbols: None }
    }

    #[must_use]
    pub fn ensg_numbers<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensg_numbers = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn gene_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gene_symbols = Some(symbols.into_iter().map(Into::into).collect());
        self
    }

    pub fn to_params(&self) -> Result<QueryParams> {
        if self.ensg_numbers.is_some() && self.gene_symbols.is_some() {
            return Err(SpongeError::InvalidArgument(
                "Only one of ensg_number, gene_symbol is allowed".to_string(),
            ));
        }
        let mut params = QueryParams::new();
        self.comparison.push_required(&mut params)?;
        params
            .push_list("ensg_number", self.ensg_numbers.as_deref())
            .push_list("gene_symbol", self.gene_symbols.as_deref());
        self.comparison.push_subtypes(&mut params);
        Ok(params)
    }
}

/// Differential expression of transcripts; all transcripts when no ENST number is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptExpressionQuery {
    pub comparison: Comparison,
    pub enst_numbers: Option<Vec<String>>,
}

impl TranscriptExpressionQuery {
    pub fn new(comparison: Comparison) -> Self {
        Self { comparison, enst_numbers: None }
    }

    #[must_use]
    pub fn enst_numbers<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enst_numbers = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn to_params(&self) -> Result<QueryParams> {
        let mut params = QueryParams::new();
        self.comparison.push_required(&mut params)?;
        params.push_list("enst_number", self.enst_numbers.as_deref());
        self.comparison.push_subtypes(&mut params);
        Ok(params)
    }
}

impl<T: HttpTransport> SpongeClient<T> {
    /// `GET differentialExpression`
    #[instrument(target = "sponge_web::expression", skip(self))]
    pub async fn differential_expression_gene(&self, query: &DifferentialExpressionQuery) -> Result<ResultTable> {
        let params = query.to_params()?;
        self.fetch_table(DIFFERENTIAL_EXPRESSION, params).await
    }

    /// `GET differentialExpressionTranscript`
    #[instrument(target = "sponge_web::expression", skip(self))]
    pub async fn differential_expression_transcript(&self, query: &TranscriptExpressionQuery) -> Result<ResultTable> {
        let params = query.to_params()?;
        self.fetch_table(DIFFERENTIAL_EXPRESSION_TRANSCRIPT, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn liver_vs_thymoma() -> Comparison {
        Comparison::new("liver", "thymoma", "disease", "disease")
    }

    #[test]
    fn gene_query_rejects_both_identifier_kinds() {
        let err = DifferentialExpressionQuery::new(liver_vs_thymoma())
            .ensg_numbers(["ENSG00000130649"])
            .gene_symbols(["CYP2E1"])
            .to_params()
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: Only one of ensg_number, gene_symbol is allowed");
    }

    #[test]
    fn gene_query_params() {
        let params = DifferentialExpressionQuery::new(
            liver_vs_thymoma().subtypes(None, Some("Type AB".to_string())),
        )
        .gene_symbols(["CYP2E1", "TP53"])
        .to_params()
        .unwrap();
        let names: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(
            names,
            ["disease_name_1", "disease_name_2", "condition_1", "condition_2", "gene_symbol", "disease_subtype_2"]
        );
        assert_eq!(params.get("gene_symbol"), Some("CYP2E1,TP53"));
    }

    #[test]
    fn transcript_query_requires_conditions() {
        let err = TranscriptExpressionQuery::new(Comparison::new("liver", "thymoma", "", "disease"))
            .to_params()
            .unwrap_err();
        assert!(matches!(err, SpongeError::InvalidArgument(msg) if msg.contains("condition_1")));
    }
}
