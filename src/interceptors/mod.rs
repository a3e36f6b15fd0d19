use async_trait::async_trait;
use std::fmt::Debug;

use crate::core::{ApiRequest, RawResponse};

/// Observer of every completed exchange, whatever its status.
#[async_trait]
pub trait Interceptor: Send + Sync + Debug {
    async fn save(
        &self,
        request: &ApiRequest,
        response: &RawResponse,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

pub mod file;
pub use file::FileInterceptor;
