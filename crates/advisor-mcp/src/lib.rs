use std::sync::Arc;

use advisor_analyze::validate_code;
use advisor_assist::Assistant;
use advisor_core::{AdvisorConfig, Category, FileContext, NewEntry, ProjectFile, WorkspaceStats};
use anyhow::Result;
use rmcp::model::*;
use rmcp::schemars::JsonSchema;
use rmcp::{tool, ServerHandler, ServiceExt};
use serde::Deserialize;
use serde_json::{json, Value};

// ── Types ──

/// Input for the search_knowledge tool.
#[derive(Debug, Deserialize, JsonSchema)]
struct SearchInput {
    /// Keyword to look for in titles, tags, content and categories
    query: String,
    /// Maximum number of results (default from config)
    max_results: Option<usize>,
}

/// Input for the related_entries tool.
#[derive(Debug, Deserialize, JsonSchema)]
struct RelatedInput {
    /// Id of the entry to find neighbours for (e.g., "react-component-pattern")
    id: String,
    /// Maximum number of results (default from config)
    max_results: Option<usize>,
}

/// Input for the list_entries tool.
#[derive(Debug, Deserialize, JsonSchema)]
struct ListInput {
    /// Optional category filter: pattern, solution, example or note
    category: Option<String>,
    /// Optional tag substring filter
    tag: Option<String>,
}

/// Input for the add_entry tool.
#[derive(Debug, Deserialize, JsonSchema)]
struct AddEntryInput {
    title: String,
    /// Body text, may contain fenced code
    content: String,
    /// One of pattern, solution, example, note
    category: String,
    tags: Option<Vec<String>>,
    /// Path fragments used when ranking related entries
    related_files: Option<Vec<String>>,
}

/// Input for the contextual_suggestions tool.
#[derive(Debug, Deserialize, JsonSchema)]
struct SuggestInput {
    /// Path of the file currently open in the editor
    current_file: Option<String>,
    /// Project file paths
    paths: Option<Vec<String>>,
    /// Total number of files in the workspace (defaults to the number of paths)
    total_files: Option<usize>,
}

/// Input for the analyze_code tool.
#[derive(Debug, Deserialize, JsonSchema)]
struct AnalyzeInput {
    /// Source code to analyze
    code: String,
    /// Optional free-form context (e.g., "login form component")
    context: Option<String>,
    /// Also report complexity, line count and a related knowledge entry
    detailed: Option<bool>,
}

/// Input for the chat tool.
#[derive(Debug, Deserialize, JsonSchema)]
struct ChatInput {
    message: String,
}

/// The advisor MCP server.
#[derive(Clone)]
pub struct AdvisorServer {
    assistant: Arc<Assistant>,
    config: AdvisorConfig,
}

// ── Helpers ──

fn invalid_params(e: impl std::fmt::Display) -> rmcp::Error {
    rmcp::Error::invalid_params(e.to_string(), None)
}

fn json_result(value: Value) -> Result<CallToolResult, rmcp::Error> {
    Ok(CallToolResult::success(vec![Content::text(value.to_string())]))
}

fn file_context_from(input: SuggestInput) -> FileContext {
    let paths = input.paths.unwrap_or_default();
    let total_files = input.total_files.unwrap_or(paths.len());
    FileContext {
        current_file: input.current_file,
        project_structure: paths
            .into_iter()
            .map(|path| ProjectFile {
                path,
                ..Default::default()
            })
            .collect(),
        workspace_stats: WorkspaceStats {
            total_files,
            ..Default::default()
        },
        ..Default::default()
    }
}

impl AdvisorServer {
    fn search_json(&self, input: SearchInput) -> Value {
        let limit = input.max_results.unwrap_or(self.config.search.max_results);
        let results = self.assistant.store().search(&input.query, limit);
        json!({ "query": input.query, "count": results.len(), "results": results })
    }

    fn related_json(&self, input: RelatedInput) -> Value {
        let limit = input.max_results.unwrap_or(self.config.related.max_results);
        let entries = self.assistant.store().related_entries(&input.id, limit);
        json!({ "id": input.id, "count": entries.len(), "entries": entries })
    }

    fn list_json(&self, input: ListInput) -> Result<Value, rmcp::Error> {
        let store = self.assistant.store();
        let mut entries = match input.category.as_deref() {
            Some(c) => store.entries_by_category(c.parse::<Category>().map_err(invalid_params)?),
            None => store.all_entries(),
        };
        if let Some(tag) = input.tag.as_deref() {
            let tagged: Vec<String> = store.entries_by_tag(tag).into_iter().map(|e| e.id).collect();
            entries.retain(|e| tagged.contains(&e.id));
        }
        Ok(json!({ "count": entries.len(), "entries": entries }))
    }

    fn add_json(&self, input: AddEntryInput) -> Result<Value, rmcp::Error> {
        let category = input.category.parse::<Category>().map_err(invalid_params)?;
        if input.title.trim().is_empty() {
            return Err(invalid_params("title must not be empty"));
        }
        let mut entry = NewEntry::new(input.title, input.content, category);
        entry.tags = input.tags.unwrap_or_default();
        entry.related_files = input.related_files.unwrap_or_default();
        let id = self.assistant.store().add_entry(entry);
        Ok(json!({ "id": id }))
    }

    fn suggest_json(&self, input: SuggestInput) -> Value {
        let ctx = file_context_from(input);
        let suggestions = self.assistant.store().contextual_suggestions(&ctx);
        json!({ "count": suggestions.len(), "suggestions": suggestions })
    }

    fn analyze_json(&self, input: AnalyzeInput) -> Result<Value, rmcp::Error> {
        let context = input.context.as_deref();
        let result = if input.detailed.unwrap_or(false) {
            self.assistant
                .analyze_code(&input.code, context)
                .map_err(invalid_params)?
        } else {
            validate_code(&input.code).map_err(invalid_params)?;
            self.assistant.analyzer().analyze(&input.code, context)
        };
        serde_json::to_value(result)
            .map_err(|e| rmcp::Error::internal_error(format!("serializing result: {e}"), None))
    }

    fn chat_json(&self, input: ChatInput) -> Result<Value, rmcp::Error> {
        let reply = self.assistant.chat(&input.message).map_err(invalid_params)?;
        Ok(json!({ "reply": reply }))
    }
}

// ── Public API ──

#[tool(tool_box)]
impl AdvisorServer {
    pub fn new(assistant: Assistant, config: AdvisorConfig) -> Self {
        Self {
            assistant: Arc::new(assistant),
            config,
        }
    }

    #[tool(
        name = "search_knowledge",
        description = "Keyword search over the knowledge base, ranked by title, tag, content and category matches"
    )]
    fn search_knowledge(
        &self,
        #[tool(aggr)] input: SearchInput,
    ) -> Result<CallToolResult, rmcp::Error> {
        json_result(self.search_json(input))
    }

    #[tool(
        name = "related_entries",
        description = "List knowledge entries related to a given entry by shared tags, category and files"
    )]
    fn related_entries(
        &self,
        #[tool(aggr)] input: RelatedInput,
    ) -> Result<CallToolResult, rmcp::Error> {
        json_result(self.related_json(input))
    }

    #[tool(
        name = "list_entries",
        description = "List knowledge entries, optionally filtered by category and tag"
    )]
    fn list_entries(&self, #[tool(aggr)] input: ListInput) -> Result<CallToolResult, rmcp::Error> {
        json_result(self.list_json(input)?)
    }

    #[tool(
        name = "add_entry",
        description = "Add a knowledge entry for the lifetime of this server"
    )]
    fn add_entry(&self, #[tool(aggr)] input: AddEntryInput) -> Result<CallToolResult, rmcp::Error> {
        json_result(self.add_json(input)?)
    }

    #[tool(
        name = "contextual_suggestions",
        description = "Suggestions derived from the current file and project layout"
    )]
    fn contextual_suggestions(
        &self,
        #[tool(aggr)] input: SuggestInput,
    ) -> Result<CallToolResult, rmcp::Error> {
        json_result(self.suggest_json(input))
    }

    #[tool(
        name = "analyze_code",
        description = "Offline heuristic code analysis: quality tier, potential issues and suggestions"
    )]
    fn analyze_code(&self, #[tool(aggr)] input: AnalyzeInput) -> Result<CallToolResult, rmcp::Error> {
        json_result(self.analyze_json(input)?)
    }

    #[tool(
        name = "chat",
        description = "Answer a question from the knowledge base when no remote model is available"
    )]
    fn chat(&self, #[tool(aggr)] input: ChatInput) -> Result<CallToolResult, rmcp::Error> {
        json_result(self.chat_json(input)?)
    }
}

#[tool(tool_box)]
impl ServerHandler for AdvisorServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Offline code advisor. Use search_knowledge, related_entries and list_entries \
                 to browse the knowledge base, add_entry to extend it for this session, \
                 contextual_suggestions for advice about the open file, and analyze_code \
                 or chat when no remote model is available."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}

/// Start the advisor MCP server on stdio transport.
pub async fn run_mcp_server(assistant: Assistant, config: AdvisorConfig) -> Result<()> {
    log::info!(
        "advisor-mcp: serving {} knowledge entries",
        assistant.store().len()
    );
    let server = AdvisorServer::new(assistant, config);
    let service = server
        .serve(rmcp::transport::io::stdio())
        .await
        .map_err(|e| anyhow::anyhow!("failed to start MCP server: {e}"))?;

    service.waiting().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_analyze::HeuristicAnalyzer;
    use advisor_store::KnowledgeStore;

    fn server() -> AdvisorServer {
        let assistant = Assistant::offline(KnowledgeStore::with_seed(), HeuristicAnalyzer::default());
        AdvisorServer::new(assistant, AdvisorConfig::default())
    }

    #[test]
    fn test_server_construction() {
        let info = server().get_info();
        assert!(info.instructions.is_some());
    }

    #[test]
    fn test_search_uses_config_limit() {
        let out = server().search_json(SearchInput {
            query: "react".to_string(),
            max_results: None,
        });
        assert_eq!(out["count"], 3);
        assert_eq!(out["results"][0]["entry"]["id"], "react-component-pattern");
        assert_eq!(out["results"][0]["match_type"], "exact");

        let out = server().search_json(SearchInput {
            query: "react".to_string(),
            max_results: Some(1),
        });
        assert_eq!(out["count"], 1);
    }

    #[test]
    fn test_related_unknown_id() {
        let out = server().related_json(RelatedInput {
            id: "nonexistent-id".to_string(),
            max_results: None,
        });
        assert_eq!(out["count"], 0);
    }

    #[test]
    fn test_list_with_filters() {
        let server = server();
        let out = server
            .list_json(ListInput {
                category: Some("pattern".to_string()),
                tag: Some("ai".to_string()),
            })
            .unwrap();
        assert_eq!(out["count"], 1);
        assert_eq!(out["entries"][0]["id"], "ai-integration-pattern");

        assert!(server
            .list_json(ListInput {
                category: Some("recipe".to_string()),
                tag: None,
            })
            .is_err());
    }

    #[test]
    fn test_add_then_list() {
        let server = server();
        let out = server
            .add_json(AddEntryInput {
                title: "X".to_string(),
                content: "Y".to_string(),
                category: "note".to_string(),
                tags: None,
                related_files: None,
            })
            .unwrap();
        let id = out["id"].as_str().unwrap().to_string();

        let all = server
            .list_json(ListInput {
                category: None,
                tag: None,
            })
            .unwrap();
        assert_eq!(all["count"], 5);
        assert_eq!(all["entries"][4]["id"], id.as_str());
        assert_eq!(all["entries"][4]["title"], "X");
    }

    #[test]
    fn test_suggest_defaults_total_files_to_paths() {
        let out = server().suggest_json(SuggestInput {
            current_file: Some("src/index.ts".to_string()),
            paths: Some((0..25).map(|i| format!("src/m{i}.rs")).collect()),
            total_files: None,
        });
        assert_eq!(out["count"], 2);
        assert_eq!(out["suggestions"][0]["priority"], "high");
        assert_eq!(out["suggestions"][1]["priority"], "low");
    }

    #[test]
    fn test_analyze_modes() {
        let server = server();
        let basic = server
            .analyze_json(AnalyzeInput {
                code: "el.innerHTML = html;".to_string(),
                context: None,
                detailed: None,
            })
            .unwrap();
        assert_eq!(basic["code_quality"], "medium");
        assert_eq!(basic["source"], "fallback");
        assert_eq!(basic["confidence"], 0.6);

        let detailed = server
            .analyze_json(AnalyzeInput {
                code: "if (a) { b(); }".to_string(),
                context: None,
                detailed: Some(true),
            })
            .unwrap();
        assert_eq!(detailed["confidence"], 0.7);
        assert!(detailed["explanation"]
            .as_str()
            .unwrap()
            .contains("Complexity: 2"));

        assert!(server
            .analyze_json(AnalyzeInput {
                code: "  ".to_string(),
                context: None,
                detailed: None,
            })
            .is_err());
    }

    #[test]
    fn test_chat_falls_back_to_knowledge() {
        let out = server()
            .chat_json(ChatInput {
                message: "TypeScript error handling".to_string(),
            })
            .unwrap();
        assert!(out["reply"]
            .as_str()
            .unwrap()
            .contains("**TypeScript error handling**"));
    }
}
