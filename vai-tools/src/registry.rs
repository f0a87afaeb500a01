use crate::tools::verified::{
    VerifiedCloseAppTool, VerifiedOpenAppTool, VerifiedOpenFileTool, VerifiedOpenFolderTool,
    VerifiedToolContext, VerifyTool,
};
use crate::tools::Tool;
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct ToolRegistryImpl {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistryImpl {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Registry holding every verified desktop tool.
    pub fn with_verified_tools(ctx: VerifiedToolContext) -> Self {
        let mut registry = Self::new();
        registry
            .register(Arc::new(VerifiedOpenAppTool::new(ctx.clone())))
            .register(Arc::new(VerifiedCloseAppTool::new(ctx.clone())))
            .register(Arc::new(VerifiedOpenFileTool::new(ctx.clone())))
            .register(Arc::new(VerifiedOpenFolderTool::new(ctx.clone())))
            .register(Arc::new(VerifyTool::new(ctx.verifier)));
        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Tool names in sorted order.
    pub fn list(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.tools.len()
    }

    pub fn schemas(&self) -> Vec<serde_json::Value> {
        self.tools
            .values()
            .map(|tool| {
                serde_json::json!({
                    "type": "function",
                    "function": {
                        "name": tool.name(),
                        "description": tool.description(),
                        "parameters": tool.schema()
                    }
                })
            })
            .collect()
    }
}

impl Default for ToolRegistryImpl {
    fn default() -> Self {
        Self::new()
    }
}
