use std::path::Path;

use base64::Engine;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{Comparison, GSEA_PLOT, GSEA_RESULTS, GSEA_SETS, GSEA_TERMS};
use crate::core::{HttpTransport, SpongeClient};
use crate::error::{Result, SpongeError};
use crate::params::QueryParams;
use crate::table::ResultTable;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Gene set enrichment lookup. Which fields are required depends on the call:
/// sets need only the comparison, terms and results need `gene_set`, the plot
/// needs `gene_set` and exactly one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GseaQuery {
    pub comparison: Comparison,
    pub gene_set: Option<String>,
    pub terms: Option<Vec<String>>,
}

impl GseaQuery {
    pub fn new(comparison: Comparison) -> Self {
        Self { comparison, gene_set: None, terms: None }
    }

    #[must_use]
    pub fn gene_set(mut self, gene_set: impl Into<String>) -> Self {
        self.gene_set = Some(gene_set.into());
        self
    }

    #[must_use]
    pub fn terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terms = Some(terms.into_iter().map(Into::into).collect());
        self
    }

    fn required_gene_set(&self) -> Result<&str> {
        self.gene_set
            .as_deref()
            .ok_or_else(|| SpongeError::InvalidArgument("gene_set is required".to_string()))
    }

    pub(crate) fn sets_params(&self) -> Result<QueryParams> {
        let mut params = QueryParams::new();
        self.comparison.push_required(&mut params)?;
        self.comparison.push_subtypes(&mut params);
        Ok(params)
    }

    pub(crate) fn terms_params(&self) -> Result<QueryParams> {
        let mut params = QueryParams::new();
        self.comparison.push_required(&mut params)?;
        params.push_required("gene_set", self.required_gene_set()?)?;
        self.comparison.push_subtypes(&mut params);
        Ok(params)
    }

    pub(crate) fn results_params(&self) -> Result<QueryParams> {
        let mut params = self.terms_params()?;
        params.push_list("term", self.terms.as_deref());
        Ok(params)
    }

    pub(crate) fn plot_params(&self) -> Result<QueryParams> {
        let term = match self.terms.as_deref() {
            Some([term]) => term,
            _ => {
                return Err(SpongeError::InvalidArgument(
                    "gsea plot needs exactly one term".to_string(),
                ))
            }
        };
        let mut params = QueryParams::new();
        self.comparison.push_required(&mut params)?;
        params.push_required("gene_set", self.required_gene_set()?)?;
        params.push_required("term", term)?;
        self.comparison.push_subtypes(&mut params);
        Ok(params)
    }
}

/// Enrichment plot as delivered by the server, already base64-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GseaPlot {
    pub png: Vec<u8>,
}

impl GseaPlot {
    pub fn is_png(&self) -> bool {
        self.png.starts_with(&PNG_SIGNATURE)
    }

    pub async fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        tokio::fs::write(path, &self.png).await
    }

    fn from_body(body: Value) -> Result<Self> {
        let Value::String(encoded) = body else {
            return Err(SpongeError::InvalidPayload(
                "gsea plot response is not a base64 string".to_string(),
            ));
        };
        let png = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| SpongeError::InvalidPayload(format!("gsea plot is not valid base64: {e}")))?;
        Ok(Self { png })
    }
}

impl<T: HttpTransport> SpongeClient<T> {
    /// Gene sets with results for the comparison (`GET gseaSets`).
    #[instrument(target = "sponge_web::gsea", skip(self))]
    pub async fn gsea_sets(&self, query: &GseaQuery) -> Result<ResultTable> {
        let params = query.sets_params()?;
        self.fetch_table(GSEA_SETS, params).await
    }

    /// Terms of `gene_set` with results for the comparison (`GET gseaTerms`).
    #[instrument(target = "sponge_web::gsea", skip(self))]
    pub async fn gsea_terms(&self, query: &GseaQuery) -> Result<ResultTable> {
        let params = query.terms_params()?;
        self.fetch_table(GSEA_TERMS, params).await
    }

    /// Enrichment results, restricted to `terms` when given (`GET gseaResults`).
    #[instrument(target = "sponge_web::gsea", skip(self))]
    pub async fn gsea_results(&self, query: &GseaQuery) -> Result<ResultTable> {
        let params = query.results_params()?;
        self.fetch_table(GSEA_RESULTS, params).await
    }

    /// Enrichment plot PNG for a single term (`GET gseaPlot`).
    #[instrument(target = "sponge_web::gsea", skip(self))]
    pub async fn gsea_plot(&self, query: &GseaQuery) -> Result<GseaPlot> {
        let params = query.plot_params()?;
        let body = self.fetch_json(GSEA_PLOT, params).await?;
        let plot = GseaPlot::from_body(body)?;
        debug!(bytes = plot.png.len(), is_png = plot.is_png(), "Decoded gsea plot");
        Ok(plot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query() -> GseaQuery {
        GseaQuery::new(Comparison::new("liver", "thymoma", "disease", "disease"))
    }

    #[test]
    fn terms_need_gene_set() {
        assert!(matches!(query().terms_params(), Err(SpongeError::InvalidArgument(_))));
        let params = query().gene_set("GO_Biological_Process_2023").terms_params().unwrap();
        assert_eq!(params.get("gene_set"), Some("GO_Biological_Process_2023"));
    }

    #[test]
    fn results_join_terms() {
        let params = query()
            .gene_set("GO_Biological_Process_2023")
            .terms(["GO:0001676", "GO:0006631"])
            .results_params()
            .unwrap();
        assert_eq!(params.get("term"), Some("GO:0001676,GO:0006631"));
    }

    #[test]
    fn plot_needs_single_term() {
        let q = query().gene_set("GO_Biological_Process_2023");
        assert!(q.plot_params().is_err());
        assert!(q.clone().terms(["a", "b"]).plot_params().is_err());
        let params = q.terms(["GO:0001676"]).plot_params().unwrap();
        assert_eq!(params.get("term"), Some("GO:0001676"));
    }

    #[test]
    fn plot_body_decodes_base64() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(PNG_SIGNATURE);
        let plot = GseaPlot::from_body(json!(encoded)).unwrap();
        assert!(plot.is_png());
        assert!(matches!(GseaPlot::from_body(json!("%%%")), Err(SpongeError::InvalidPayload(_))));
        assert!(matches!(GseaPlot::from_body(json!([1])), Err(SpongeError::InvalidPayload(_))));
    }
}
