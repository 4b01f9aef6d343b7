//! Name-keyed registry of actions and the fixed invocation sequence

use faas_core::{
    sanitize_payload, Action, ActionConfig, ActionOutput, DynAction, FaasError, FaasResult,
    Payload,
};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Owns the mapping from action name to action.
///
/// Registration takes `&mut self` and is append-only; once every action is
/// registered the registry is shared (typically behind an `Arc`) and only read,
/// so concurrent `execute` calls never race with registration.
#[derive(Default)]
pub struct Registry {
    actions: HashMap<String, Arc<dyn DynAction>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single typed action.
    pub fn register<A: Action>(&mut self, action: A) -> FaasResult<()> {
        self.register_dyn(Arc::new(action))
    }

    /// Register an already type-erased action. A duplicate name is rejected
    /// and leaves the registry untouched.
    pub fn register_dyn(&mut self, action: Arc<dyn DynAction>) -> FaasResult<()> {
        let ActionConfig { name } = action.action_config();
        Self::check_name(&name)?;
        if self.actions.contains_key(&name) {
            return Err(FaasError::DuplicateName(name));
        }

        tracing::debug!(function = %name, "Registered function");
        self.actions.insert(name, action);
        Ok(())
    }

    /// Register a batch of actions. The batch is applied all-or-nothing: every
    /// name is checked against the registry and against the rest of the batch
    /// before anything is inserted.
    pub fn register_all<I>(&mut self, actions: I) -> FaasResult<()>
    where
        I: IntoIterator<Item = Arc<dyn DynAction>>,
    {
        let batch: Vec<(String, Arc<dyn DynAction>)> = actions
            .into_iter()
            .map(|action| (action.action_config().name, action))
            .collect();

        let mut seen = HashSet::with_capacity(batch.len());
        for (name, _) in &batch {
            Self::check_name(name)?;
            if self.actions.contains_key(name) || !seen.insert(name.as_str()) {
                return Err(FaasError::DuplicateName(name.clone()));
            }
        }

        for (name, action) in batch {
            tracing::debug!(function = %name, "Registered function");
            self.actions.insert(name, action);
        }
        Ok(())
    }

    /// Look up `name` and run parse, validate and execute, returning the first
    /// failure.
    pub async fn execute(&self, name: &str, payload: &Payload) -> FaasResult<ActionOutput> {
        let action = self
            .actions
            .get(name)
            .ok_or_else(|| FaasError::NotFound(name.to_string()))?;

        tracing::debug!(
            function = %name,
            payload = %sanitize_payload(payload),
            "Dispatching function"
        );

        let result = action.invoke(payload).await;
        if let Err(e) = &result {
            tracing::debug!(function = %name, error = %e, "Function failed");
        }
        result
    }

    /// Convenience wrapper taking the payload as raw JSON.
    pub async fn execute_json(
        &self,
        name: &str,
        payload: serde_json::Value,
    ) -> FaasResult<ActionOutput> {
        let payload = Payload::from_value(payload)?;
        self.execute(name, &payload).await
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn DynAction>> {
        self.actions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.actions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn check_name(name: &str) -> FaasResult<()> {
        if name.is_empty() {
            return Err(FaasError::validation("function name must not be empty"));
        }
        Ok(())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("functions", &self.names())
            .finish()
    }
}
