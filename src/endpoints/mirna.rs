use tracing::{instrument, warn};

use super::MIRNA_INTERACTION_FIND_SPECIFIC;
use crate::core::{HttpTransport, SpongeClient};
use crate::error::Result;
use crate::params::QueryParams;
use crate::table::ResultTable;

pub const DEFAULT_LIMIT: u32 = 100;
/// Largest page the server will serve; larger limits are still forwarded.
pub const MAX_LIMIT: u32 = 1000;

/// Filters for ceRNA interactions that specific miRNAs contribute to.
///
/// MIMAT and HS identifiers are alternatives; supplying both is forwarded
/// untouched and left to the server to reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiRnaInteractionQuery {
    /// Dataset name, fuzzy-matched by the server (`"kidney"` works)
    pub disease_name: Option<String>,
    pub mimat_numbers: Option<Vec<String>>,
    pub hs_numbers: Option<Vec<String>>,
    pub limit: u32,
    pub offset: Option<u32>,
}

impl Default for MiRnaInteractionQuery {
    fn default() -> Self {
        Self {
            disease_name: None,
            mimat_numbers: None,
            hs_numbers: None,
            limit: DEFAULT_LIMIT,
            offset: None,
        }
    }
}

impl MiRnaInteractionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn disease(mut self, name: impl Into<String>) -> Self {
        self.disease_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn mimat_numbers<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mimat_numbers = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn hs_numbers<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hs_numbers = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .push_opt("disease_name", self.disease_name.as_deref())
            .push("limit", self.limit)
            .push_opt("offset", self.offset)
            .push("information", false)
            .push_list("mimat_number", self.mimat_numbers.as_deref())
            .push_list("hs_number", self.hs_numbers.as_deref());
        params
    }
}

impl<T: HttpTransport> SpongeClient<T> {
    /// All ceRNA interactions the given miRNAs contribute to
    /// (`GET miRNAInteraction/findSpecific`).
    ///
    /// A 404 from the server becomes [`crate::SpongeError::NotFound`] carrying
    /// the server's reason; an empty 200 array is an empty table.
    #[instrument(target = "sponge_web::mirna", skip(self))]
    pub async fn find_specific_mirna_interactions(&self, query: &MiRnaInteractionQuery) -> Result<ResultTable> {
        if query.limit > MAX_LIMIT {
            warn!(limit = query.limit, max = MAX_LIMIT, "Limit exceeds documented server maximum");
        }
        self.fetch_table(MIRNA_INTERACTION_FIND_SPECIFIC, query.to_params()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_send_limit_and_information_only() {
        let params = MiRnaInteractionQuery::new().to_params();
        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("limit", "100"), ("information", "false")]);
    }

    #[test]
    fn all_filters_in_order() {
        let params = MiRnaInteractionQuery::new()
            .disease("kidney clear cell carcinoma")
            .mimat_numbers(["MIMAT0000076", "MIMAT0000261"])
            .limit(15)
            .offset(30)
            .to_params();
        let names: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["disease_name", "limit", "offset", "information", "mimat_number"]);
        assert_eq!(params.get("mimat_number"), Some("MIMAT0000076,MIMAT0000261"));
        assert_eq!(params.get("offset"), Some("30"));
    }

    #[test]
    fn empty_identifier_list_is_still_sent() {
        let params = MiRnaInteractionQuery::new().mimat_numbers(Vec::<String>::new()).to_params();
        assert_eq!(params.get("mimat_number"), Some(""));
        assert!(!params.contains("hs_number"));
    }
}
