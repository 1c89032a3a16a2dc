// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! One call surface for paginated reads and single-shot writes.

use reqwest::Method;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::transport::{Outcome, Payload, QueryParams, Transport};

/// The result of a paginated fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paged<T> {
    /// Every page was fetched; items are in page order.
    Complete(Vec<T>),
    /// A page failed. Items from earlier pages were discarded.
    Partial {
        /// Pages successfully fetched before the failure.
        pages_fetched: u64,
        /// The raw failure text of the page that failed.
        failure: String,
    },
}

impl<T> Paged<T> {
    /// Returns the items of a complete fetch.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::IncompletePagination` for a partial fetch.
    pub fn into_items(self) -> ApiResult<Vec<T>> {
        match self {
            Self::Complete(items) => Ok(items),
            Self::Partial {
                pages_fetched,
                failure,
            } => Err(ApiError::IncompletePagination {
                pages_fetched,
                failure,
            }),
        }
    }

    /// Converts every item of a complete fetch, keeping a partial fetch as is.
    ///
    /// # Errors
    ///
    /// Returns the first conversion error.
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Paged<U>, E> {
        match self {
            Self::Complete(items) => Ok(Paged::Complete(
                items.into_iter().map(f).collect::<Result<Vec<U>, E>>()?,
            )),
            Self::Partial {
                pages_fetched,
                failure,
            } => Ok(Paged::Partial {
                pages_fetched,
                failure,
            }),
        }
    }
}

/// What [`CallEngine::call`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallData {
    /// The accumulated items of a paginated GET.
    Collection(Paged<Value>),
    /// The classified response of a single request.
    Single(Outcome),
}

/// Issues calls against one API root.
#[derive(Debug, Clone)]
pub struct CallEngine {
    transport: Transport,
    api_url: String,
}

impl CallEngine {
    /// Creates an engine for endpoints below `api_url`.
    #[must_use]
    pub fn new(transport: Transport, api_url: &str) -> Self {
        Self {
            transport,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// The underlying session.
    #[must_use]
    pub const fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Full URL of an endpoint path such as `/user-groups`.
    #[must_use]
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.api_url)
    }

    /// Calls an endpoint.
    ///
    /// A GET whose query carries a positive `page` walks every page from
    /// that one up to the server's `totalPages`, collecting each page's
    /// `items`. Anything else is sent exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error only when a request gets no response. Non-success
    /// statuses come back as data: [`Paged::Partial`] for collections,
    /// [`Outcome::Failure`] for single calls.
    pub async fn call(&self, method: Method, endpoint: &str, payload: Payload) -> ApiResult<CallData> {
        let url: String = self.endpoint_url(endpoint);

        if method == Method::GET
            && let Payload::Query(params) = &payload
            && let Some(first_page) = params.get("page").and_then(Value::as_u64).filter(|p| *p > 0)
        {
            let paged: Paged<Value> = self.collect_pages(&url, params.clone(), first_page).await?;
            return Ok(CallData::Collection(paged));
        }

        let outcome: Outcome = self.transport.request(method, &url, &payload).await?;
        if outcome.is_success() {
            info!("API request successfully sent to {url}");
        }
        Ok(CallData::Single(outcome))
    }

    async fn collect_pages(
        &self,
        url: &str,
        mut params: QueryParams,
        first_page: u64,
    ) -> ApiResult<Paged<Value>> {
        let mut page: u64 = first_page;
        let mut pages_fetched: u64 = 0;
        let mut items: Vec<Value> = Vec::new();

        loop {
            params.insert(String::from("page"), Value::from(page));
            let outcome: Outcome = self
                .transport
                .request(Method::GET, url, &Payload::Query(params.clone()))
                .await?;

            let body: Value = match outcome {
                Outcome::Json(body) => body,
                Outcome::Text(failure) | Outcome::Failure { body: failure, .. } => {
                    return Ok(discard(url, pages_fetched, failure));
                }
            };

            let Some(page_items) = body.get("items").and_then(Value::as_array) else {
                let failure: String = format!("page {page} has no items array: {body}");
                return Ok(discard(url, pages_fetched, failure));
            };

            info!("Received page {page} from {url}");
            items.extend(page_items.iter().cloned());
            pages_fetched += 1;

            // A missing totalPages means the server sent everything in one page.
            let total_pages: u64 = body
                .get("totalPages")
                .and_then(Value::as_u64)
                .unwrap_or(page);
            if page >= total_pages {
                return Ok(Paged::Complete(items));
            }
            page += 1;
        }
    }
}

fn discard(url: &str, pages_fetched: u64, failure: String) -> Paged<Value> {
    warn!("Pagination of {url} stopped; discarding {pages_fetched} fetched page(s)");
    Paged::Partial {
        pages_fetched,
        failure,
    }
}
