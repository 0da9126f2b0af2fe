//! Name-to-constructor registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use barmill_storage::StorageProvider;
use tracing::{debug, warn};

use crate::{ConfiguredTask, Params, RegistryError, Task, TaskError, tasks};

type Constructor = Box<dyn Fn(&Params) -> Result<Box<dyn Task>, TaskError> + Send + Sync>;

/// Resolves task names to constructed tasks.
///
/// Built once by explicit registration calls and then shared read-only.
#[derive(Default)]
pub struct TaskRegistry {
    constructors: HashMap<String, Constructor>,
}

impl TaskRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in tasks, which use `storages`
    /// to resolve storage signatures.
    #[must_use]
    pub fn with_builtin_tasks(storages: StorageProvider) -> Self {
        let mut registry = Self::new();
        let registered = tasks::register_builtin(&mut registry, Arc::new(storages));
        debug_assert!(registered.is_ok(), "built-in task names collide: {registered:?}");
        registry
    }

    /// Registers a constructor under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::RegistrationConflict`] if the name is taken.
    /// The conflict is logged and the existing entry is kept, so callers may
    /// treat it as a warning.
    pub fn register<F>(
        &mut self,
        name: impl Into<String>,
        constructor: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&Params) -> Result<Box<dyn Task>, TaskError> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.constructors.contains_key(&name) {
            warn!(task = %name, "task name is already in use, keeping the existing task");
            return Err(RegistryError::RegistrationConflict(name));
        }
        debug!(task = %name, "registered task");
        self.constructors.insert(name, Box::new(constructor));
        Ok(())
    }

    /// Registers a task type under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::RegistrationConflict`] if the name is taken.
    pub fn register_task<T: ConfiguredTask>(&mut self) -> Result<(), RegistryError> {
        self.register(T::NAME, |params| Ok(Box::new(T::from_params(params)?) as Box<dyn Task>))
    }

    /// Constructs the task registered under `name` from `params`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] for an unknown name and
    /// [`RegistryError::Construction`] if the task rejects its arguments.
    pub fn get_task(&self, name: &str, params: &Params) -> Result<Box<dyn Task>, RegistryError> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| RegistryError::NotRegistered(name.to_string()))?;
        constructor(params)
            .map_err(|source| RegistryError::Construction { name: name.to_string(), source })
    }

    /// Returns true if a task is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Returns the registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Returns true if no task is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRegistry").field("tasks", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskArgs;
    use crate::testing::{EmitTicks, Nothing, params};
    use serde_json::json;

    #[test]
    fn test_register_and_get() {
        let mut registry = TaskRegistry::new();
        registry.register_task::<EmitTicks>().unwrap();

        let task = registry.get_task("emit_ticks", &params(json!({"count": 2}))).unwrap();
        assert_eq!(task.name(), "emit_ticks");
        assert!(registry.contains("emit_ticks"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_conflict_keeps_original() {
        let mut registry = TaskRegistry::new();
        registry.register_task::<EmitTicks>().unwrap();

        let err = registry
            .register("emit_ticks", |_| Ok(Box::new(Nothing::default()) as Box<dyn Task>))
            .unwrap_err();
        assert!(matches!(err, RegistryError::RegistrationConflict(ref name) if name == "emit_ticks"));
        assert_eq!(registry.len(), 1);

        let mut task = registry.get_task("emit_ticks", &params(json!({"count": 3}))).unwrap();
        let output = task.execute(TaskArgs::default()).unwrap();
        assert_eq!(output.as_frame().map(barmill_types::Frame::len), Some(3));
    }

    #[test]
    fn test_not_registered() {
        let registry = TaskRegistry::new();
        let err = registry.get_task("missing", &Params::new()).unwrap_err();
        assert!(matches!(err, RegistryError::NotRegistered(ref name) if name == "missing"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_construction_error() {
        let mut registry = TaskRegistry::new();
        registry.register_task::<EmitTicks>().unwrap();

        let err = registry.get_task("emit_ticks", &params(json!({"cnt": 1}))).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Construction { source: TaskError::InvalidArguments { .. }, .. }
        ));
    }

    #[test]
    fn test_builtin_names() {
        let registry = TaskRegistry::with_builtin_tasks(StorageProvider::new());
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.names(), vec!["aggregate", "get_storage", "read", "write"]);
        assert!(format!("{registry:?}").contains("aggregate"));
    }

    #[test]
    fn test_each_call_builds_fresh_instance() {
        let mut registry = TaskRegistry::new();
        registry
            .register("nothing", |_| Ok(Box::new(Nothing::default()) as Box<dyn Task>))
            .unwrap();

        let first = registry.get_task("nothing", &Params::new()).unwrap();
        let second = registry.get_task("nothing", &Params::new()).unwrap();
        assert!(first.created_at() <= second.created_at());
    }
}
