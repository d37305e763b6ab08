//! Wraps schema-derived tools into `rmcp::model::Tool`s and applies allow/block filtering.
//!
//! Patterns are compiled once at registration time. A pattern that fails to compile is dropped
//! and logged rather than aborting startup, per the "never let one bad entry break the whole
//! registry" policy applied throughout the corpus's config-validation paths.

use graphql_mcp_schema::Tool as SchemaTool;
use regex::Regex;
use rmcp::model::Tool as McpTool;

/// A compiled allow/block filter over tool names.
#[derive(Debug, Clone, Default)]
pub struct ToolFilter {
    allow: Vec<Regex>,
    block: Vec<Regex>,
}

impl ToolFilter {
    pub fn new(allow_patterns: &[String], block_patterns: &[String]) -> Self {
        ToolFilter {
            allow: compile_all(allow_patterns),
            block: compile_all(block_patterns),
        }
    }

    /// A tool is included when: no block pattern matches it, and either the allow list is empty
    /// or at least one allow pattern matches it.
    pub fn permits(&self, name: &str) -> bool {
        if self.block.iter().any(|re| re.is_match(name)) {
            return false;
        }
        self.allow.is_empty() || self.allow.iter().any(|re| re.is_match(name))
    }
}

fn compile_all(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(re) => Some(re),
            Err(err) => {
                tracing::warn!(pattern, %err, "dropping invalid tool filter pattern");
                None
            }
        })
        .collect()
}

/// Registered tools, keyed by name, with the schema-derived field each tool dispatches to.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

#[derive(Debug, Clone)]
struct RegistryEntry {
    mcp_tool: McpTool,
    schema_tool: SchemaTool,
}

impl Registry {
    /// Builds a registry from schema-derived tools, applying `filter` at registration time and
    /// again at dispatch time (`permits`) as defense in depth.
    pub fn new(schema_tools: Vec<SchemaTool>, filter: &ToolFilter) -> Self {
        let entries = schema_tools
            .into_iter()
            .filter(|tool| filter.permits(&tool.name))
            .map(|tool| RegistryEntry {
                mcp_tool: to_mcp_tool(&tool),
                schema_tool: tool,
            })
            .collect();
        Registry { entries }
    }

    pub fn list(&self) -> Vec<McpTool> {
        self.entries.iter().map(|e| e.mcp_tool.clone()).collect()
    }

    pub fn find(&self, name: &str) -> Option<&SchemaTool> {
        self.entries
            .iter()
            .find(|e| e.schema_tool.name == name)
            .map(|e| &e.schema_tool)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn to_mcp_tool(tool: &SchemaTool) -> McpTool {
    let schema = tool.input_schema.as_object().cloned().unwrap_or_default();
    McpTool::new(tool.name.clone(), tool.description.clone(), schema)
}
