//! Grid-store accessor: opens the configured document and hands out sheets,
//! plus the id and timestamp helpers shared by the catalog and roster.

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::storage::{GridStore, JsonGridStore, Sheet};

/// Options for [`Workbook::open_store`].
#[derive(Clone, Debug)]
pub struct StoreOptions {
    pub data_dir: String,
    pub document_id: String,
    pub document_name: String,
    pub create_if_missing: bool,
}

/// Handle to the open grid document.
#[derive(Clone)]
pub struct Workbook {
    store: Arc<dyn GridStore>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppMeta {
    pub spreadsheet_name: String,
    pub songs_sheet_name: String,
}

fn validate_document_id(id: &str) -> Result<(), ServiceError> {
    let ok = !id.is_empty()
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(ServiceError::Store(format!("invalid document identifier: {id:?}")))
    }
}

impl Workbook {
    pub fn new(store: Arc<dyn GridStore>) -> Self {
        Self { store }
    }

    /// Open the configured JSON document. Failures are returned to the caller
    /// unchanged; nothing here retries.
    pub async fn open_store(opts: &StoreOptions) -> Result<Self, ServiceError> {
        validate_document_id(&opts.document_id)?;
        let path = std::path::Path::new(&opts.data_dir).join(format!("{}.json", opts.document_id));
        let store = JsonGridStore::open(&path, &opts.document_name, opts.create_if_missing).await?;
        info!(document_id = %opts.document_id, path = %path.display(), "grid document opened");
        Ok(Self { store })
    }

    pub fn store(&self) -> Arc<dyn GridStore> {
        Arc::clone(&self.store)
    }

    /// Existing sheet named `name`, or a freshly created empty one.
    pub async fn get_or_create_sheet(&self, name: &str) -> Result<Sheet, ServiceError> {
        self.store.get_or_create_sheet(name).await?;
        Ok(Sheet::new(self.store(), name))
    }

    pub async fn sheet_names(&self) -> Vec<String> {
        self.store.sheet_names().await
    }

    pub async fn app_meta(&self, songs_sheet: &str) -> AppMeta {
        AppMeta {
            spreadsheet_name: self.store.document_name().await,
            songs_sheet_name: songs_sheet.to_string(),
        }
    }
}

/// `<prefix>-<8 hex chars>`; an empty prefix becomes `ID`. Collisions are not checked.
pub fn uuid(prefix: &str) -> String {
    let prefix = if prefix.is_empty() { "ID" } else { prefix };
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &hex[..8])
}

static LAST_STAMP_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Current UTC time as ISO-8601 with milliseconds, e.g. `2025-01-05T09:30:00.000Z`.
/// Never returns the same or an earlier instant twice within one process.
pub fn timestamp() -> String {
    let now = Utc::now().timestamp_millis();
    let prev = LAST_STAMP_MILLIS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| Some(now.max(prev + 1)))
        .unwrap_or(now);
    let millis = now.max(prev + 1);
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
