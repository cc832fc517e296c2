//! Tool registry for managing available tools

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::tool::{Tool, ToolDefinition};

/// Registry of tools keyed by name
///
/// Listing order is alphabetical so advertised tool sets are stable across
/// runs.
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<BTreeMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    /// Create a new tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, returning the one it replaced if the name was taken
    pub fn register(&self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        let mut tools = self.tools.write().unwrap_or_else(PoisonError::into_inner);
        debug!(tool = tool.name(), "registering tool");
        tools.insert(tool.name().to_string(), tool)
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.get(name).cloned()
    }

    /// Names of all registered tools, sorted
    pub fn names(&self) -> Vec<String> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.keys().cloned().collect()
    }

    /// Definitions of all registered tools, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.values().map(|tool| tool.definition()).collect()
    }

    /// Dispatch a call to the named tool
    pub async fn call(&self, name: &str, params: Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        debug!(tool = name, "dispatching tool call");
        tool.execute(params).await
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct Upper;

    #[async_trait]
    impl Tool for Upper {
        async fn execute(&self, params: Value) -> Result<Value> {
            let text = params["text"].as_str().unwrap_or_default();
            Ok(json!(text.to_uppercase()))
        }

        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Uppercase a string"
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object", "properties": { "text": { "type": "string" } } })
        }
    }

    struct Noop(&'static str);

    #[async_trait]
    impl Tool for Noop {
        async fn execute(&self, _params: Value) -> Result<Value> {
            Ok(Value::Null)
        }

        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "Does nothing"
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object" })
        }
    }

    #[tokio::test]
    async fn test_register_and_call() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register(Arc::new(Upper)).is_none());

        let out = registry.call("upper", json!({ "text": "debenture" })).await.unwrap();
        assert_eq!(out, json!("DEBENTURE"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.call("missing", Value::Null).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(name) if name == "missing"));
    }

    #[test]
    fn test_listing_is_sorted_and_replaces() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(Noop("zeta")));
        registry.register(Arc::new(Noop("alpha")));
        assert!(registry.register(Arc::new(Noop("alpha"))).is_some());

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
        let defs = registry.definitions();
        assert_eq!(defs[0].name, "alpha");
        assert_eq!(defs[1].input_schema["type"], "object");
    }
}
