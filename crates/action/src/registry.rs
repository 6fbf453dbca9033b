use std::collections::HashMap;

use crate::action::Action;
use crate::descriptor::ActionSpec;

/// Catalogue of action descriptors, keyed by action name.
///
/// Descriptors are `'static`; the registry only indexes them. Useful for
/// tooling that enumerates the API surface and for startup checks such as
/// [`ActionSpec::undeclared_placeholders`].
///
/// # Example
///
/// ```rust
/// use serde::Serialize;
/// use zsdk_action::{Action, ActionRegistry, ActionSpec, Credentials, RestDescriptor};
/// use zsdk_schema::ParameterSchema;
///
/// #[derive(Serialize)]
/// struct Ping {
///     #[serde(skip)]
///     credentials: Credentials,
/// }
///
/// static PING: ActionSpec =
///     ActionSpec::new("Ping", RestDescriptor::get("/ping").no_session(), ParameterSchema::empty());
///
/// impl Action for Ping {
///     type Output = serde_json::Value;
///     fn spec() -> &'static ActionSpec { &PING }
///     fn credentials(&self) -> &Credentials { &self.credentials }
/// }
///
/// let mut registry = ActionRegistry::new();
/// registry.register::<Ping>();
///
/// assert!(registry.get("Ping").is_some());
/// assert!(registry.get("Pong").is_none());
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ActionRegistry {
    specs: HashMap<&'static str, &'static ActionSpec>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action type. Replaces any descriptor with the same name.
    pub fn register<A: Action>(&mut self) -> &mut Self {
        self.insert(A::spec());
        self
    }

    /// Register a descriptor directly.
    pub fn insert(&mut self, spec: &'static ActionSpec) -> Option<&'static ActionSpec> {
        self.specs.insert(spec.name, spec)
    }

    /// Look up a descriptor by action name.
    pub fn get(&self, name: &str) -> Option<&'static ActionSpec> {
        self.specs.get(name).copied()
    }

    /// Check whether an action with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Registered action names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.specs.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns `true` if no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Remove a descriptor by name.
    pub fn unregister(&mut self, name: &str) -> Option<&'static ActionSpec> {
        self.specs.remove(name)
    }

    /// Iterate over all registered descriptors.
    pub fn iter(&self) -> impl Iterator<Item = &'static ActionSpec> + '_ {
        self.specs.values().copied()
    }

    /// Path placeholders with no matching schema field, per action.
    ///
    /// Empty when every registered descriptor is self-consistent.
    pub fn inconsistencies(&self) -> Vec<(&'static str, &'static str)> {
        let mut found: Vec<_> = self
            .iter()
            .flat_map(|spec| spec.undeclared_placeholders().map(move |p| (spec.name, p)))
            .collect();
        found.sort_unstable();
        found
    }
}
