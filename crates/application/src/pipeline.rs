//! The per-item execution driver
//!
//! Steps run in a fixed order: validate, substitute context, build the
//! request, announce the item, run before hooks (suite-level first, then the
//! declared wait, then the item's own), dispatch, assert the body, run after
//! hooks (item's own first), finalize. A failing step aborts the remaining
//! steps of that item only.

use serde_json::Value;
use tokio::time::{sleep, Duration};
use tracing::debug;

use volley_domain::{
    HookError, ItemError, ItemHook, ItemState, ResultRule, RunStats, TestSpec,
};

use crate::normalize::validate;
use crate::ports::{HttpExecutor, Reporter, ShapeValidator};
use crate::template::resolve_spec;

/// Fixed detail for a literal result mismatch.
const LITERAL_MISMATCH: &str = "response doesn't match the expected result";

/// One run's item driver, borrowing the runner's collaborators.
pub(crate) struct Pipeline<'a> {
    pub http: &'a dyn HttpExecutor,
    pub reporter: &'a dyn Reporter,
    pub shape: &'a dyn ShapeValidator,
    pub base: &'a str,
    pub before_each: &'a [ItemHook],
    pub after_each: &'a [ItemHook],
}

impl Pipeline<'_> {
    /// Runs one descriptor start to finish. The outcome is recorded on the
    /// returned state and always reported, and the pass counter moves when
    /// the item finished clean.
    pub async fn run_item(&self, spec: TestSpec, stats: &mut RunStats) -> ItemState {
        let mut state = ItemState::new(spec);
        if let Err(error) = self.execute(&mut state, stats).await {
            debug!(path = %state.spec.path, %error, "item failed");
            state.error = Some(error);
        }
        if state.passed() {
            stats.passed += 1;
        }
        self.reporter.endpoint_end(&state).await;
        state
    }

    async fn execute(&self, state: &mut ItemState, stats: &mut RunStats) -> Result<(), ItemError> {
        validate(&state.spec)?;
        resolve_spec(&mut state.spec, &stats.context);
        state.request = Some(state.spec.build_request(self.base)?);
        self.reporter.endpoint_start(&state.spec).await;
        self.before_hooks(state, stats).await?;
        let request = state.request.clone().ok_or_else(|| {
            ItemError::Hook(HookError::from("request removed by a before hook"))
        })?;
        let response = self.http.dispatch(&request).await?;
        let body = response.body.clone();
        state.response = Some(response);
        self.assert_body(state, &body)?;
        self.after_hooks(state, stats).await?;
        Ok(())
    }

    async fn before_hooks(
        &self,
        state: &mut ItemState,
        stats: &mut RunStats,
    ) -> Result<(), ItemError> {
        for hook in self.before_each {
            hook(stats, state).await?;
        }
        if let Some(ms) = state.spec.wait_ms {
            self.reporter.endpoint_wait(&state.spec).await;
            sleep(Duration::from_millis(ms)).await;
        }
        let own = state.spec.before.clone();
        for hook in &own {
            hook(stats, state).await?;
        }
        Ok(())
    }

    async fn after_hooks(
        &self,
        state: &mut ItemState,
        stats: &mut RunStats,
    ) -> Result<(), ItemError> {
        let own = state.spec.after.clone();
        for hook in &own {
            hook(stats, state).await?;
        }
        for hook in self.after_each {
            hook(stats, state).await?;
        }
        Ok(())
    }

    /// Checks the body: a `json` shape wins, then a literal or computed
    /// result, otherwise nothing is asserted.
    fn assert_body(&self, state: &mut ItemState, body: &str) -> Result<(), ItemError> {
        if let Some(schema) = &state.spec.json {
            let parsed: Value =
                serde_json::from_str(body).map_err(|error| ItemError::ResponseParse {
                    message: error.to_string(),
                    body: body.to_string(),
                })?;
            self.shape
                .validate(schema, &parsed)
                .map_err(|detail| ItemError::assertion(detail, body))?;
            state.json = Some(parsed);
            return Ok(());
        }
        match &state.spec.result {
            None => Ok(()),
            Some(ResultRule::Computed(check)) => {
                check(body).map_err(|detail| ItemError::assertion(detail, body))
            }
            Some(ResultRule::Literal(expected)) => {
                if body == expected {
                    Ok(())
                } else {
                    Err(ItemError::assertion(LITERAL_MISMATCH, body))
                }
            }
        }
    }
}
