use super::Interceptor;
use crate::core::{ApiRequest, RawResponse};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Writes each exchange to `<base_path>/response_<timestamp>.json`.
#[derive(Debug)]
pub struct FileInterceptor {
    base_path: PathBuf,
}

impl FileInterceptor {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait]
impl Interceptor for FileInterceptor {
    async fn save(
        &self,
        request: &ApiRequest,
        response: &RawResponse,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let timestamp = Utc::now();
        let filename = format!("response_{}.json", timestamp.format("%Y%m%d_%H%M%S_%6f"));
        let file_path = self.base_path.join(filename);

        // Ensure the directory exists
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let query: Map<String, Value> = request
            .query
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        // Keep the body as JSON when it is JSON so the dump stays readable.
        let body = serde_json::from_slice::<Value>(&response.body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&response.body).into_owned()));

        let record = json!({
            "timestamp": timestamp.to_rfc3339(),
            "url": request.url,
            "query": query,
            "status": response.status,
            "body": body,
        });

        let mut file = fs::File::create(&file_path).await?;
        file.write_all(serde_json::to_string_pretty(&record)?.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
