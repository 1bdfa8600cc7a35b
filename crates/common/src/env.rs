//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected files and directories exist at startup.

use tracing::warn;

/// Ensure the data directory exists; warn when the UI page is missing.
pub async fn ensure_env(index_path: &str, data_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(index_path).await.is_err() {
        warn!(%index_path, "ui page not found; GET / will 404");
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ensure_env_creates_data_dir() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("worship_env_{}", uuid::Uuid::new_v4()));
        let dir_str = dir.to_string_lossy().to_string();
        ensure_env("/nonexistent/index.html", &dir_str).await?;
        assert!(tokio::fs::metadata(&dir).await?.is_dir());
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
