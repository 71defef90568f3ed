//! Tool registry for MCP tools.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::handlers::{
    DatasheetHandler, InstructionsHandler, ResearchPaperHandler, SimulationHandler,
};
use crate::config::SearchConfig;
use crate::retrieval::RetrievalPipeline;
use crate::sim::SimulationSandbox;

/// An MCP tool that can be called by the client
#[derive(Clone)]
pub struct Tool {
    /// Tool name (e.g., "run_ngspice_simulation")
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// JSON Schema for input parameters
    pub input_schema: serde_json::Value,

    /// Handler function to execute the tool
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish()
    }
}

/// Handler for executing a tool
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync + std::fmt::Debug {
    /// Execute the tool with the given arguments
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

/// Registry for all MCP tools
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create a registry with the four circuit-design tools wired to the
    /// retrieval pipeline and the simulation sandbox.
    pub fn new(
        pipeline: Arc<RetrievalPipeline>,
        sandbox: Arc<SimulationSandbox>,
        search: &SearchConfig,
    ) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
        };

        registry.register(Tool {
            name: "get_circuit_design_instructions".to_string(),
            description: "Get instructions for circuit design. Required before any design."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
            handler: Arc::new(InstructionsHandler),
        });

        registry.register(Tool {
            name: "get_research_paper".to_string(),
            description: "Get a research paper on a given topic. Searches online for research \
                 papers in PDF format, extracts the text of the first few pages, and \
                 returns it as plain text."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "description": "Topic of the research paper (e.g., 'Quantum Computing', 'Sustainable Energy')"
                    },
                    "maxpages": {
                        "type": "integer",
                        "description": "Number of PDF pages to extract (more pages take more time)",
                        "default": search.default_max_pages
                    }
                },
                "required": ["topic"]
            }),
            handler: Arc::new(ResearchPaperHandler {
                pipeline: pipeline.clone(),
                default_max_pages: search.default_max_pages,
            }),
        });

        registry.register(Tool {
            name: "get_component_datasheet".to_string(),
            description: "Get the official datasheet for a specified electronic component. \
                 Searches online for the datasheet in PDF format and returns the text \
                 of the first few pages."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "component_name": {
                        "type": "string",
                        "description": "Exact name or part number of the component (e.g., 'NE555', 'LM358')"
                    }
                },
                "required": ["component_name"]
            }),
            handler: Arc::new(DatasheetHandler {
                pipeline,
                default_max_pages: search.default_max_pages,
            }),
        });

        registry.register(Tool {
            name: "run_ngspice_simulation".to_string(),
            description: "Run an ngspice simulation command on a given netlist. The netlist runs \
                 in an isolated workspace with a hard timeout; stdout is returned on \
                 success."
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "command": {
                        "type": "string",
                        "description": "ngspice command to run (e.g., 'op', 'dc', 'tran')"
                    },
                    "netlist": {
                        "type": "string",
                        "description": "The SPICE netlist content"
                    }
                },
                "required": ["command", "netlist"]
            }),
            handler: Arc::new(SimulationHandler { sandbox }),
        });

        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get all tools
    pub fn all(&self) -> Vec<&Tool> {
        self.tools.values().collect()
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, String> {
        let tool = self
            .get(name)
            .ok_or_else(|| format!("Tool '{}' not found", name))?;

        tool.handler.execute(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::retrieval::PdfConverter;
    use crate::search::MockSearchProvider;

    fn test_registry() -> ToolRegistry {
        use crate::retrieval::{DocumentFetcher, FetchError};
        use async_trait::async_trait;

        #[derive(Debug)]
        struct NoFetcher;

        #[async_trait]
        impl DocumentFetcher for NoFetcher {
            async fn get(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
                Err(FetchError::Transport("offline".to_string()))
            }
        }

        let pipeline = Arc::new(RetrievalPipeline::new(
            Arc::new(MockSearchProvider::new()),
            Arc::new(NoFetcher),
            Arc::new(PdfConverter::new()),
            5,
        ));
        let sandbox = Arc::new(SimulationSandbox::new(&SimulationConfig::default()));

        ToolRegistry::new(pipeline, sandbox, &SearchConfig::default())
    }

    #[test]
    fn test_all_four_tools_registered() {
        let registry = test_registry();

        assert_eq!(registry.all().len(), 4);
        for name in [
            "get_circuit_design_instructions",
            "get_research_paper",
            "get_component_datasheet",
            "run_ngspice_simulation",
        ] {
            assert!(registry.get(name).is_some(), "missing tool {}", name);
        }
    }

    #[tokio::test]
    async fn test_execute_unknown_tool() {
        let registry = test_registry();
        let result = registry
            .execute("design_pcb", serde_json::json!({}))
            .await;
        assert!(result.is_err());
    }
}
