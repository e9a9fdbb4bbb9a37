//! Expected-data generator registry.
//!
//! The accuracy oracle regenerates ground-truth data through a generator
//! function it knows only by name. Evaluation-scenario modules register
//! their generators under a scenario namespace at startup; resolution
//! searches every registered scenario and returns the first that defines
//! the requested name. New scenarios plug in purely by registering —
//! the oracle core never learns which concrete generators exist.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// A registered generator: ordered positional params in, path of the
/// generated data file out.
pub type GeneratorFn = dyn Fn(&[serde_json::Value]) -> anyhow::Result<PathBuf> + Send + Sync;

/// Requested generator is not defined by any registered scenario.
#[derive(Debug, thiserror::Error)]
#[error("no registered scenario defines generator {name:?} (searched: {searched:?})")]
pub struct ResolveError {
    pub name: String,
    pub searched: Vec<String>,
}

/// Registry of expected-data generators, keyed by scenario namespace then
/// generator name.
#[derive(Default)]
pub struct GeneratorRegistry {
    scenarios: BTreeMap<String, BTreeMap<String, Arc<GeneratorFn>>>,
}

impl GeneratorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a generator under a scenario namespace.
    ///
    /// Re-registering the same (scenario, name) pair replaces the previous
    /// generator.
    pub fn register<F>(&mut self, scenario: impl Into<String>, name: impl Into<String>, generator: F)
    where
        F: Fn(&[serde_json::Value]) -> anyhow::Result<PathBuf> + Send + Sync + 'static,
    {
        self.scenarios
            .entry(scenario.into())
            .or_default()
            .insert(name.into(), Arc::new(generator));
    }

    /// Resolve a generator by name.
    ///
    /// Searches every registered scenario in deterministic (sorted) order;
    /// a scenario that lacks the name does not stop the search. Fails only
    /// after all scenarios have been tried.
    pub fn resolve(&self, name: &str) -> Result<Arc<GeneratorFn>, ResolveError> {
        for (scenario, generators) in &self.scenarios {
            if let Some(generator) = generators.get(name) {
                debug!(event = "registry.resolved", generator = %name, scenario = %scenario);
                return Ok(Arc::clone(generator));
            }
        }
        Err(ResolveError {
            name: name.to_string(),
            searched: self.scenarios.keys().cloned().collect(),
        })
    }

    /// Names of the registered scenarios.
    pub fn scenario_names(&self) -> Vec<&str> {
        self.scenarios.keys().map(String::as_str).collect()
    }

    /// Whether no scenario has been registered.
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (scenario, generators) in &self.scenarios {
            map.entry(scenario, &generators.keys().collect::<Vec<_>>());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_path(path: &str) -> impl Fn(&[serde_json::Value]) -> anyhow::Result<PathBuf> {
        let path = PathBuf::from(path);
        move |_params| Ok(path.clone())
    }

    #[test]
    fn test_resolve_from_single_scenario() {
        let mut registry = GeneratorRegistry::new();
        registry.register("classification", "two_class", fixed_path("/tmp/data.txt"));

        let generator = registry.resolve("two_class").expect("resolve");
        let path = generator(&[]).expect("generate");
        assert_eq!(path, PathBuf::from("/tmp/data.txt"));
    }

    #[test]
    fn test_resolve_does_not_stop_at_scenario_without_name() {
        // Only the second (in sorted order) scenario defines the generator;
        // the search must keep going past the first.
        let mut registry = GeneratorRegistry::new();
        registry.register("aaa_regression", "other_func", fixed_path("/tmp/other.txt"));
        registry.register("zzz_classification", "wanted_func", fixed_path("/tmp/wanted.txt"));

        let generator = registry.resolve("wanted_func").expect("resolve");
        let path = generator(&[]).expect("generate");
        assert_eq!(path, PathBuf::from("/tmp/wanted.txt"));
    }

    #[test]
    fn test_resolve_fails_after_exhausting_all_scenarios() {
        let mut registry = GeneratorRegistry::new();
        registry.register("regression", "func_a", fixed_path("/tmp/a.txt"));
        registry.register("classification", "func_b", fixed_path("/tmp/b.txt"));

        let err = registry.resolve("missing_func").err().expect("no match");
        assert_eq!(err.name, "missing_func");
        assert_eq!(err.searched, vec!["classification", "regression"]);
    }

    #[test]
    fn test_resolve_on_empty_registry() {
        let registry = GeneratorRegistry::new();
        let err = registry.resolve("anything").err().expect("empty");
        assert!(err.searched.is_empty());
    }

    #[test]
    fn test_generator_receives_positional_params() {
        let mut registry = GeneratorRegistry::new();
        registry.register("classification", "sized", |params: &[serde_json::Value]| {
            let n = params[0].as_u64().unwrap_or(0);
            Ok(PathBuf::from(format!("/tmp/data_{n}.txt")))
        });

        let generator = registry.resolve("sized").expect("resolve");
        let path = generator(&[serde_json::json!(100)]).expect("generate");
        assert_eq!(path, PathBuf::from("/tmp/data_100.txt"));
    }

    #[test]
    fn test_debug_lists_names_not_closures() {
        let mut registry = GeneratorRegistry::new();
        registry.register("classification", "two_class", fixed_path("/tmp/data.txt"));
        let rendered = format!("{registry:?}");
        assert!(rendered.contains("classification"));
        assert!(rendered.contains("two_class"));
    }
}
