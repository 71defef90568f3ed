//! Handlers for the circuit-design tools.
//!
//! Every handler returns plain text under all conditions: pipeline and
//! sandbox failures are absorbed into fixed or formatted messages, never
//! surfaced as protocol faults. Only missing arguments are rejected at
//! this layer.

use std::sync::Arc;

use serde_json::Value;

use super::tools::ToolHandler;
use crate::instructions::CIRCUIT_DESIGN_INSTRUCTIONS;
use crate::retrieval::RetrievalPipeline;
use crate::sim::{SimulationOutcome, SimulationSandbox};

/// Handler for the fixed instructions document
#[derive(Debug)]
pub struct InstructionsHandler;

#[async_trait::async_trait]
impl ToolHandler for InstructionsHandler {
    async fn execute(&self, _args: Value) -> Result<Value, String> {
        Ok(Value::String(CIRCUIT_DESIGN_INSTRUCTIONS.to_string()))
    }
}

/// Handler for research paper retrieval
#[derive(Debug)]
pub struct ResearchPaperHandler {
    pub pipeline: Arc<RetrievalPipeline>,
    pub default_max_pages: usize,
}

#[async_trait::async_trait]
impl ToolHandler for ResearchPaperHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let topic = args
            .get("topic")
            .and_then(|v| v.as_str())
            .ok_or("Missing 'topic' parameter")?;

        let max_pages = args
            .get("maxpages")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .unwrap_or(self.default_max_pages);

        let query = format!("{} : technical research paper filetype:pdf", topic);
        let text = self.pipeline.retrieve(&query, max_pages).await;

        Ok(Value::String(text))
    }
}

/// Handler for component datasheet retrieval
#[derive(Debug)]
pub struct DatasheetHandler {
    pub pipeline: Arc<RetrievalPipeline>,
    pub default_max_pages: usize,
}

#[async_trait::async_trait]
impl ToolHandler for DatasheetHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let component_name = args
            .get("component_name")
            .and_then(|v| v.as_str())
            .ok_or("Missing 'component_name' parameter")?;

        let query = format!("{} datasheet filetype:pdf", component_name);
        let text = self.pipeline.retrieve(&query, self.default_max_pages).await;

        Ok(Value::String(text))
    }
}

/// Handler for ngspice simulation
#[derive(Debug)]
pub struct SimulationHandler {
    pub sandbox: Arc<SimulationSandbox>,
}

#[async_trait::async_trait]
impl ToolHandler for SimulationHandler {
    async fn execute(&self, args: Value) -> Result<Value, String> {
        let command = args
            .get("command")
            .and_then(|v| v.as_str())
            .ok_or("Missing 'command' parameter")?;

        let netlist = args
            .get("netlist")
            .and_then(|v| v.as_str())
            .ok_or("Missing 'netlist' parameter")?;

        let outcome = self.sandbox.run(command, netlist).await;
        Ok(Value::String(format_outcome(outcome)))
    }
}

/// Format a simulation outcome as user-visible text.
///
/// Success returns the captured stdout verbatim; every other variant is a
/// formatted error string embedding the available diagnostics.
pub fn format_outcome(outcome: SimulationOutcome) -> String {
    match outcome {
        SimulationOutcome::Success { stdout, .. } => stdout,
        SimulationOutcome::ToolError {
            exit_code, stderr, ..
        } => format!(
            "Error: ngspice exited with code {}\nDetails:\n{}",
            exit_code,
            or_no_stderr(&stderr)
        ),
        SimulationOutcome::Timeout { limit } => format!(
            "Error: ngspice timed out after {} seconds\nDetails:\nNo stderr",
            limit.as_secs_f64()
        ),
        SimulationOutcome::Internal { message } => {
            format!("Error: {}\nDetails:\nNo stderr", message)
        }
    }
}

fn or_no_stderr(stderr: &str) -> &str {
    if stderr.is_empty() {
        "No stderr"
    } else {
        stderr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    use crate::retrieval::{
        ConvertError, DocumentConverter, DocumentFetcher, FetchError, NOT_FOUND_MESSAGE,
    };
    use crate::search::MockSearchProvider;

    #[derive(Debug)]
    struct NoFetcher;

    #[async_trait]
    impl DocumentFetcher for NoFetcher {
        async fn get(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            Err(FetchError::Transport("offline".to_string()))
        }
    }

    #[derive(Debug)]
    struct NoConverter;

    impl DocumentConverter for NoConverter {
        fn convert(&self, _bytes: &[u8], _max_pages: usize) -> Result<String, ConvertError> {
            Err(ConvertError::Malformed("unused".to_string()))
        }
    }

    fn pipeline_with_provider(provider: Arc<MockSearchProvider>) -> Arc<RetrievalPipeline> {
        Arc::new(RetrievalPipeline::new(
            provider,
            Arc::new(NoFetcher),
            Arc::new(NoConverter),
            5,
        ))
    }

    #[tokio::test]
    async fn test_instructions_handler_returns_document() {
        let result = InstructionsHandler
            .execute(serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(
            result,
            Value::String(CIRCUIT_DESIGN_INSTRUCTIONS.to_string())
        );
    }

    #[tokio::test]
    async fn test_datasheet_handler_builds_expected_query() {
        let provider = Arc::new(MockSearchProvider::new());
        let handler = DatasheetHandler {
            pipeline: pipeline_with_provider(provider.clone()),
            default_max_pages: 4,
        };

        let result = handler
            .execute(serde_json::json!({"component_name": "NE555"}))
            .await
            .unwrap();

        assert_eq!(result, Value::String(NOT_FOUND_MESSAGE.to_string()));
        assert_eq!(provider.queries(), vec!["NE555 datasheet filetype:pdf"]);
    }

    #[tokio::test]
    async fn test_research_paper_handler_builds_expected_query() {
        let provider = Arc::new(MockSearchProvider::new());
        let handler = ResearchPaperHandler {
            pipeline: pipeline_with_provider(provider.clone()),
            default_max_pages: 4,
        };

        handler
            .execute(serde_json::json!({"topic": "LDO stability", "maxpages": 2}))
            .await
            .unwrap();

        assert_eq!(
            provider.queries(),
            vec!["LDO stability : technical research paper filetype:pdf"]
        );
    }

    #[tokio::test]
    async fn test_research_paper_handler_requires_topic() {
        let provider = Arc::new(MockSearchProvider::new());
        let handler = ResearchPaperHandler {
            pipeline: pipeline_with_provider(provider),
            default_max_pages: 4,
        };

        let result = handler.execute(serde_json::json!({})).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_format_success_is_stdout_verbatim() {
        let outcome = SimulationOutcome::Success {
            stdout: "v(1) = 5.000000e+00".to_string(),
            stderr: String::new(),
        };
        assert_eq!(format_outcome(outcome), "v(1) = 5.000000e+00");
    }

    #[test]
    fn test_format_tool_error_embeds_code_and_stderr() {
        let outcome = SimulationOutcome::ToolError {
            exit_code: 1,
            stdout: String::new(),
            stderr: "Error on line 2".to_string(),
        };
        assert_eq!(
            format_outcome(outcome),
            "Error: ngspice exited with code 1\nDetails:\nError on line 2"
        );
    }

    #[test]
    fn test_format_tool_error_without_stderr() {
        let outcome = SimulationOutcome::ToolError {
            exit_code: 2,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(format_outcome(outcome).ends_with("No stderr"));
    }

    #[test]
    fn test_format_timeout() {
        let outcome = SimulationOutcome::Timeout {
            limit: Duration::from_secs(2),
        };
        assert_eq!(
            format_outcome(outcome),
            "Error: ngspice timed out after 2 seconds\nDetails:\nNo stderr"
        );
    }

    #[test]
    fn test_format_internal_error() {
        let outcome = SimulationOutcome::Internal {
            message: "failed to launch ngspice: No such file or directory".to_string(),
        };
        let text = format_outcome(outcome);
        assert!(text.starts_with("Error: failed to launch ngspice"));
        assert!(text.ends_with("No stderr"));
    }
}
