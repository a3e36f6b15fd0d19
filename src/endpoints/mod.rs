//! One module per API area. Each adds its operations to [`SpongeClient`]
//! and owns the query type that marshals its parameters.
//!
//! [`SpongeClient`]: crate::SpongeClient

pub mod expression;
pub mod gsea;
pub mod mirna;

use crate::error::Result;
use crate::params::QueryParams;

pub const MIRNA_INTERACTION_FIND_SPECIFIC: &str = "miRNAInteraction/findSpecific";
pub const DIFFERENTIAL_EXPRESSION: &str = "differentialExpression";
pub const DIFFERENTIAL_EXPRESSION_TRANSCRIPT: &str = "differentialExpressionTranscript";
pub const GSEA_SETS: &str = "gseaSets";
pub const GSEA_TERMS: &str = "gseaTerms";
pub const GSEA_RESULTS: &str = "gseaResults";
pub const GSEA_PLOT: &str = "gseaPlot";

/// Two dataset/condition pairs to compare, e.g. liver disease vs thymoma disease.
///
/// A missing subtype selects the disease's overtype on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub disease_name_1: String,
    pub disease_name_2: String,
    pub condition_1: String,
    pub condition_2: String,
    pub disease_subtype_1: Option<String>,
    pub disease_subtype_2: Option<String>,
}

impl Comparison {
    pub fn new(
        disease_name_1: impl Into<String>,
        disease_name_2: impl Into<String>,
        condition_1: impl Into<String>,
        condition_2: impl Into<String>,
    ) -> Self {
        Self {
            disease_name_1: disease_name_1.into(),
            disease_name_2: disease_name_2.into(),
            condition_1: condition_1.into(),
            condition_2: condition_2.into(),
            disease_subtype_1: None,
            disease_subtype_2: None,
        }
    }

    #[must_use]
    pub fn subtypes(mut self, subtype_1: Option<String>, subtype_2: Option<String>) -> Self {
        self.disease_subtype_1 = subtype_1;
        self.disease_subtype_2 = subtype_2;
        self
    }

    pub(crate) fn push_required(&self, params: &mut QueryParams) -> Result<()> {
        params.push_required("disease_name_1", &self.disease_name_1)?;
        params.push_required("disease_name_2", &self.disease_name_2)?;
        params.push_required("condition_1", &self.condition_1)?;
        params.push_required("condition_2", &self.condition_2)?;
        Ok(())
    }

    pub(crate) fn push_subtypes(&self, params: &mut QueryParams) {
        params
            .push_opt("disease_subtype_1", self.disease_subtype_1.as_deref())
            .push_opt("disease_subtype_2", self.disease_subtype_2.as_deref());
    }
}
