use tracing::{debug, info};

use crate::api::models::MessageRef;
use crate::api::provider::MailProvider;
use crate::error::AppResult;

use super::query::SearchQuery;

/// Message search over a provider, following page tokens until exhausted.
#[derive(Debug)]
pub struct MessageLister<'a, P: ?Sized> {
    provider: &'a P,
}

impl<'a, P: MailProvider + ?Sized> MessageLister<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Returns every matching message across all pages.
    pub async fn list(&self, query: &SearchQuery) -> AppResult<Vec<MessageRef>> {
        let provider_query = query.to_provider_query();
        let mut messages = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0_usize;

        loop {
            let page = self
                .provider
                .list_messages(provider_query.as_deref(), page_token.as_deref())
                .await?;
            pages += 1;

            let next = page.next_token().map(ToOwned::to_owned);
            debug!(
                %query,
                page = pages,
                returned = page.messages.len(),
                more = next.is_some(),
                "fetched message page"
            );
            messages.extend(page.messages);

            match next {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        info!(%query, pages, found = messages.len(), "message listing finished");
        Ok(messages)
    }

    pub async fn count_matching(&self, query: &SearchQuery) -> AppResult<usize> {
        Ok(self.list(query).await?.len())
    }

    /// Single request; never follows pagination.
    pub async fn first_matching(&self, query: &SearchQuery) -> AppResult<Option<MessageRef>> {
        let provider_query = query.to_provider_query();
        let page = self
            .provider
            .list_messages(provider_query.as_deref(), None)
            .await?;

        Ok(page.messages.into_iter().next())
    }
}
