//! Caller-side paging
//!
//! [`Repository::query`] never loops: one call, one page. These helpers do
//! the looping for callers that want every page, feeding each continuation
//! token back in until the store stops returning one.

use crate::core::Repository;
use crate::domain::{Document, QueryOptions, QueryPage, RepositoryError, Result};
use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;

impl<T: Document> Repository<T> {
    /// Stream the pages of a query, starting at `options.continuation_token`
    ///
    /// Each stream item costs one round trip. The stream ends after the
    /// first page without a continuation token, or after the first error.
    pub fn pages(&self, options: QueryOptions) -> impl Stream<Item = Result<QueryPage<T>>> + '_ {
        self.pages_as(options)
    }

    /// Like [`Repository::pages`] for queries whose rows are not `T`
    pub fn pages_as<'a, R: DeserializeOwned + 'a>(
        &'a self,
        options: QueryOptions,
    ) -> impl Stream<Item = Result<QueryPage<R>>> + 'a {
        stream::try_unfold(Some(options), move |state| async move {
            let Some(options) = state else {
                return Ok(None);
            };

            let page: QueryPage<R> = self.query_as(&options).await?;
            let next = page
                .continuation_token
                .clone()
                .map(|token| options.with_continuation(Some(token)));

            Ok::<_, RepositoryError>(Some((page, next)))
        })
    }

    /// Fetch every page of a query and concatenate the items in order
    ///
    /// # Errors
    ///
    /// Returns the first error any page fetch produced.
    pub async fn collect_all(&self, options: QueryOptions) -> Result<Vec<T>> {
        self.pages(options)
            .try_fold(Vec::new(), |mut items, page| async move {
                items.extend(page.values);
                Ok(items)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::adapters::memory::MemoryStore;
    use crate::core::Repository;
    use crate::domain::{Entity, QueryOptions, QueryPage};
    use futures::TryStreamExt;
    use serde_json::Value;
    use std::sync::Arc;

    async fn seeded(count: usize, page_size: u32) -> Repository<Entity> {
        let store = MemoryStore::new("db").with_container("things", "/partition");
        let repo = Repository::new(Arc::new(store), "things", page_size);
        for i in 0..count {
            repo.insert(Entity::new(format!("{i:03}"), "A", "x".to_string()))
                .await
                .unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_pages_stop_without_token() {
        let repo = seeded(7, 3).await;
        let pages: Vec<_> = repo
            .pages(QueryOptions::new("SELECT * FROM c"))
            .try_collect()
            .await
            .unwrap();

        let sizes: Vec<usize> = pages.iter().map(|p| p.values.len()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert!(pages.last().unwrap().is_last());
    }

    #[tokio::test]
    async fn test_collect_all_on_empty_container() {
        let repo = seeded(0, 3).await;
        let items = repo
            .collect_all(QueryOptions::new("SELECT * FROM c"))
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_pages_as_projection() {
        let repo = seeded(5, 2).await;
        let pages: Vec<QueryPage<Value>> = repo
            .pages_as(QueryOptions::new("SELECT * FROM c"))
            .try_collect()
            .await
            .unwrap();

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].values[0]["id"], "000");
    }

    #[tokio::test]
    async fn test_pages_propagate_errors() {
        let repo = seeded(1, 3).await;
        let result = repo
            .collect_all(QueryOptions::new("SELECT * FROM c").with_continuation(Some("bad".into())))
            .await;
        assert_eq!(result.unwrap_err().status(), Some(400));
    }
}
