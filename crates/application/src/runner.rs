//! Suite runner: the orchestrating use case

use std::sync::Arc;

use tracing::info;
use url::Url;

use volley_domain::{
    HookDecl, ItemHook, RunReport, RunStats, Suite, SuiteHook, TestSpec,
};

use crate::error::SetupError;
use crate::expand::expand;
use crate::normalize::Normalizer;
use crate::pipeline::Pipeline;
use crate::ports::{HttpExecutor, NullReporter, Reporter, ShapeValidator, StructuralValidator};
use crate::registry::Registry;
use crate::schedule::schedule;

/// Runs whole suites through the collaborators it is built with.
///
/// Only the HTTP executor is mandatory; the reporter defaults to silence,
/// the shape validator to the structural matcher, and the registry to empty.
pub struct SuiteRunner {
    http: Arc<dyn HttpExecutor>,
    reporter: Arc<dyn Reporter>,
    shape: Arc<dyn ShapeValidator>,
    registry: Registry,
}

impl SuiteRunner {
    /// Creates a runner over the given HTTP executor.
    #[must_use]
    pub fn new(http: Arc<dyn HttpExecutor>) -> Self {
        Self {
            http,
            reporter: Arc::new(NullReporter),
            shape: Arc::new(StructuralValidator),
            registry: Registry::new(),
        }
    }

    /// Replaces the reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Replaces the shape validation engine.
    #[must_use]
    pub fn with_shape_validator(mut self, shape: Arc<dyn ShapeValidator>) -> Self {
        self.shape = shape;
        self
    }

    /// Replaces the hook and check registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Runs the suite to completion and returns the final report.
    ///
    /// Item failures are recorded, reported and counted, never returned
    /// here.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] for a missing or invalid base URL, an
    /// unknown suite-level hook name, or a failing suite-level hook. When a
    /// suite-level hook fails the run stops where it stood and the
    /// reporter's end event is never emitted.
    pub async fn run(&self, suite: Suite) -> Result<RunReport, SetupError> {
        let base = suite.base_url().ok_or(SetupError::MissingBase)?;
        validate_base(&base)?;
        let before = self.suite_hooks(suite.before.as_ref())?;
        let after = self.suite_hooks(suite.after.as_ref())?;
        let before_each = self.each_hooks(suite.before_each.as_ref())?;
        let after_each = self.each_hooks(suite.after_each.as_ref())?;

        let Suite {
            defaults, tests, ..
        } = suite;
        let normalizer = Normalizer::new(&defaults, &self.registry);
        let mut specs: Vec<TestSpec> = expand(tests)
            .iter()
            .map(|item| normalizer.normalize(item))
            .collect();
        schedule(&mut specs);

        let total = specs.len();
        info!(total, base = %base, "starting suite run");
        let mut stats = RunStats::default();
        self.reporter.start(&base).await;
        for hook in &before {
            hook(&mut stats).await?;
        }
        let pipeline = Pipeline {
            http: self.http.as_ref(),
            reporter: self.reporter.as_ref(),
            shape: self.shape.as_ref(),
            base: &base,
            before_each: &before_each,
            after_each: &after_each,
        };
        for spec in specs {
            pipeline.run_item(spec, &mut stats).await;
        }
        for hook in &after {
            hook(&mut stats).await?;
        }
        let report = RunReport::new(stats.passed, total);
        info!(passed = report.passed, total = report.total, "suite finished");
        self.reporter.end(report.passed, report.total).await;
        Ok(report)
    }

    fn suite_hooks(&self, decl: Option<&HookDecl>) -> Result<Vec<SuiteHook>, SetupError> {
        let mut hooks = Vec::new();
        if let Some(decl) = decl {
            for name in decl.names() {
                let hook = self
                    .registry
                    .suite_hook(name)
                    .ok_or_else(|| SetupError::UnknownHook { name: name.clone() })?;
                hooks.push(hook);
            }
        }
        Ok(hooks)
    }

    fn each_hooks(&self, decl: Option<&HookDecl>) -> Result<Vec<ItemHook>, SetupError> {
        let mut hooks = Vec::new();
        if let Some(decl) = decl {
            for name in decl.names() {
                let hook = self
                    .registry
                    .item_hook(name)
                    .ok_or_else(|| SetupError::UnknownHook { name: name.clone() })?;
                hooks.push(hook);
            }
        }
        Ok(hooks)
    }
}

fn validate_base(base: &str) -> Result<(), SetupError> {
    let url = Url::parse(base).map_err(|error| SetupError::InvalidBase {
        base: base.to_string(),
        reason: error.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SetupError::InvalidBase {
            base: base.to_string(),
            reason: "scheme must be http or https".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use volley_domain::{suite_hook, HookError, RequestSpec, ResponseSpec, TransportError};

    struct AlwaysOk;

    #[async_trait]
    impl HttpExecutor for AlwaysOk {
        async fn dispatch(&self, _: &RequestSpec) -> Result<ResponseSpec, TransportError> {
            Ok(ResponseSpec::new(200, Vec::new(), ""))
        }
    }

    fn suite_with_base(base: &str) -> Suite {
        serde_json::from_value(serde_json::json!({"base": base})).unwrap()
    }

    #[tokio::test]
    async fn test_missing_base_is_a_setup_error() {
        let runner = SuiteRunner::new(Arc::new(AlwaysOk));
        let result = runner.run(Suite::default()).await;
        assert_eq!(result, Err(SetupError::MissingBase));
    }

    #[tokio::test]
    async fn test_invalid_base_is_a_setup_error() {
        let runner = SuiteRunner::new(Arc::new(AlwaysOk));
        let result = runner.run(suite_with_base("not a url")).await;
        assert!(matches!(result, Err(SetupError::InvalidBase { .. })));

        let result = runner.run(suite_with_base("ftp://files.test")).await;
        assert!(matches!(result, Err(SetupError::InvalidBase { .. })));
    }

    #[tokio::test]
    async fn test_unknown_suite_hook_is_a_setup_error() {
        let runner = SuiteRunner::new(Arc::new(AlwaysOk));
        let suite: Suite = serde_json::from_value(serde_json::json!({
            "base": "http://api.test",
            "before": "seed",
        }))
        .unwrap();
        assert_eq!(
            runner.run(suite).await,
            Err(SetupError::UnknownHook {
                name: "seed".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_failing_suite_hook_stops_the_run() {
        let mut registry = Registry::new();
        registry.register_suite_hook(
            "seed",
            suite_hook(|_| Box::pin(async { Err(HookError::from("database down")) })),
        );
        let runner = SuiteRunner::new(Arc::new(AlwaysOk)).with_registry(registry);
        let suite: Suite = serde_json::from_value(serde_json::json!({
            "base": "http://api.test",
            "before": "seed",
            "tests": [{"path": "/never-runs"}],
        }))
        .unwrap();
        assert_eq!(
            runner.run(suite).await,
            Err(SetupError::Hook(HookError::from("database down")))
        );
    }

    #[tokio::test]
    async fn test_empty_suite_reports_success() {
        let runner = SuiteRunner::new(Arc::new(AlwaysOk));
        let report = runner.run(suite_with_base("http://api.test")).await.unwrap();
        assert_eq!(report, RunReport::new(0, 0));
        assert!(report.is_success());
    }
}
