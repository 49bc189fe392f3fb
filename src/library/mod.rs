//! Ad library listing.

pub mod cache;

pub use cache::{PageCache, PageKey};

use crate::error::AdlabError;
use crate::upstream::SupabaseClient;
use crate::upstream::supabase::tables;
use adlab_schema::records::AdRecord;
use std::sync::Arc;

pub type LibraryPage = Arc<Vec<AdRecord>>;

/// Read-through listing of the `ads` table.
#[derive(Clone)]
pub struct Library {
    supabase: SupabaseClient,
    cache: PageCache<LibraryPage>,
}

impl Library {
    pub fn new(supabase: SupabaseClient, cache: PageCache<LibraryPage>) -> Self {
        Self { supabase, cache }
    }

    /// Page `key.page` (1-based) of `key.page_size` ads, newest first.
    pub async fn page(&self, key: PageKey) -> Result<LibraryPage, AdlabError> {
        self.cache
            .get_or_try_load(key, || async move {
                let rows: Vec<AdRecord> = self
                    .supabase
                    .select_page(tables::ADS, key.offset(), u64::from(key.page_size))
                    .await?;
                Ok::<_, AdlabError>(Arc::new(rows))
            })
            .await
    }
}
