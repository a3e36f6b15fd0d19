//! Client for the SPONGE web API, which serves competing-endogenous-RNA
//! (ceRNA) interaction data.
//!
//! ```no_run
//! use sponge_web::{MiRnaInteractionQuery, SpongeClient};
//!
//! # async fn run() -> sponge_web::Result<()> {
//! let client = SpongeClient::from_env()?;
//! let query = MiRnaInteractionQuery::new()
//!     .disease("kidney clear cell carcinoma")
//!     .mimat_numbers(["MIMAT0000076", "MIMAT0000261"])
//!     .limit(15);
//! let table = client.find_specific_mirna_interactions(&query).await?;
//! println!("{} interactions over {} columns", table.len(), table.width());
//! # Ok(())
//! # }
//! ```

pub mod clients;
pub mod config;
pub mod core;
pub mod endpoints;
pub mod error;
pub mod interceptors;
pub mod output;
pub mod params;
pub mod table;

// Convenient re-exports
pub use crate::config::ApiConfig;
pub use crate::core::{ApiRequest, HttpTransport, RawResponse, SpongeClient};
pub use endpoints::expression::{DifferentialExpressionQuery, TranscriptExpressionQuery};
pub use endpoints::gsea::{GseaPlot, GseaQuery};
pub use endpoints::mirna::MiRnaInteractionQuery;
pub use endpoints::Comparison;
pub use error::{Result, SpongeError};
pub use table::ResultTable;
