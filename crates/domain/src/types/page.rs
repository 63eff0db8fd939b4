//! Pagination state and page payloads
//!
//! [`PageQuery`] carries the cursor of one collection run, [`Page`] is one
//! parsed response and [`Collected`] is the fold of every page of a run.

use serde_json::{Map, Value};

use crate::constants::{FIELD_COUNT, FIELD_ITEMS, PARAM_COUNT, PARAM_OFFSET};
use crate::errors::VkError;

/// Method parameters as sent to the API
pub type Params = Map<String, Value>;

/// Cursor and termination target for one collection run
///
/// `offset` starts at the caller's `offset` parameter and moves forward by
/// the size of each successful page. The caller's `count` parameter becomes
/// the explicit limit and is never recomputed from server-reported totals.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    params: Params,
    offset: u64,
    explicit_limit: Option<u64>,
}

impl PageQuery {
    /// Split `offset` and `count` out of the caller's parameters.
    ///
    /// # Errors
    /// Returns `VkError::InvalidInput` if either is present but not a
    /// non-negative integer (numeric strings are accepted).
    pub fn new(mut params: Params) -> Result<Self, VkError> {
        let offset = params
            .remove(PARAM_OFFSET)
            .map(|value| param_as_u64(PARAM_OFFSET, &value))
            .transpose()?
            .unwrap_or(0);
        let explicit_limit = params
            .remove(PARAM_COUNT)
            .map(|value| param_as_u64(PARAM_COUNT, &value))
            .transpose()?;

        Ok(Self { params, offset, explicit_limit })
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.explicit_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[must_use]
    pub fn explicit_limit(&self) -> Option<u64> {
        self.explicit_limit
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Parameters for the next page call.
    ///
    /// With an explicit limit, `count` asks only for what is still missing so
    /// a server that honours it never overshoots the limit.
    #[must_use]
    pub fn page_params(&self, items_seen: u64) -> Params {
        let mut params = self.params.clone();
        params.insert(PARAM_OFFSET.to_string(), Value::from(self.offset));
        if let Some(limit) = self.explicit_limit {
            params.insert(PARAM_COUNT.to_string(), Value::from(limit.saturating_sub(items_seen)));
        }
        params
    }

    pub fn advance(&mut self, page_len: u64) {
        self.offset = self.offset.saturating_add(page_len);
    }

    /// Continuation rule applied after each successful page.
    ///
    /// Without an explicit limit the run continues while fewer items than the
    /// server-reported total have been seen; with one, while fewer than the
    /// limit have been seen. A page without a total ends an unlimited run.
    #[must_use]
    pub fn should_continue(&self, items_seen: u64, reported_total: Option<u64>) -> bool {
        match self.explicit_limit {
            Some(limit) => items_seen < limit,
            None => reported_total.is_some_and(|total| items_seen < total),
        }
    }

    #[must_use]
    pub fn limit_reached(&self, items_seen: u64) -> bool {
        self.explicit_limit.is_some_and(|limit| items_seen >= limit)
    }
}

fn param_as_u64(name: &str, value: &Value) -> Result<u64, VkError> {
    let parsed = match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        VkError::InvalidInput(format!("\"{name}\" must be a non-negative integer, got {value}"))
    })
}

/// One successful list-shaped response
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    /// Server-reported total (`count` field), if present
    pub total_count: Option<u64>,
    /// Every other field of the response object
    pub metadata: Params,
}

impl Page {
    /// Parse the `response` value of an envelope.
    ///
    /// Returns `None` when the response carries no `items` array, which the
    /// collector treats as the natural end of the run.
    #[must_use]
    pub fn from_response(response: Value) -> Option<Self> {
        let Value::Object(mut fields) = response else {
            return None;
        };
        let Some(Value::Array(items)) = fields.remove(FIELD_ITEMS) else {
            return None;
        };
        let total_count = fields.remove(FIELD_COUNT).and_then(|count| count.as_u64());

        Some(Self { items, total_count, metadata: fields })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Fold of every page of a collection run
///
/// Items are concatenated in emission order. `total_count` and metadata are
/// last-page-wins: a later page overwrites the keys it carries and leaves the
/// others untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected {
    pub items: Vec<Value>,
    pub total_count: Option<u64>,
    pub metadata: Params,
    pub pages: usize,
}

impl Collected {
    pub fn absorb(&mut self, page: Page) {
        self.items.extend(page.items);
        if page.total_count.is_some() {
            self.total_count = page.total_count;
        }
        self.metadata.extend(page.metadata);
        self.pages += 1;
    }

    /// Render in the response shape: `{"count": .., "items": [..], ..metadata}`.
    #[must_use]
    pub fn into_value(self) -> Value {
        let mut fields = self.metadata;
        if let Some(total) = self.total_count {
            fields.insert(FIELD_COUNT.to_string(), Value::from(total));
        }
        fields.insert(FIELD_ITEMS.to_string(), Value::Array(self.items));
        Value::Object(fields)
    }
}
