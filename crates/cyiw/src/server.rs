//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes the readability pipeline over stdio so assistants can score text
//! without going through files. Each `#[tool]` method delegates to
//! `cyiw_core`; no counting happens here.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use cyiw_core::{Config, Corpus, Language, Metric, TextOptions, compute_metrics};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Language and flags a caller may set per request.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct TextParams {
    /// Language profile: "pl", "ru-v1", "ru-v2" or "uk". Server default when omitted.
    pub language: Option<String>,
    /// Fold Polish digraphs before counting.
    pub digraphs: Option<bool>,
    /// Keep vowelless words under the lookahead sentence strategy.
    pub nullsilber: Option<bool>,
}

/// Parameters for the `compute_metrics` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct ComputeMetricsParams {
    /// The text to score.
    pub text: String,
    /// Language and flags.
    #[serde(flatten)]
    pub options: TextParams,
}

/// A labelled text.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct LabelledText {
    /// Label, unique within the request; repeats overwrite.
    pub label: String,
    /// The text.
    pub text: String,
}

/// Parameters for the `correlate_texts` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CorrelateTextsParams {
    /// Texts forming the corpus.
    pub texts: Vec<LabelledText>,
    /// Metric names to correlate. Defaults to the readability indices.
    pub metrics: Option<Vec<String>>,
    /// Language and flags.
    #[serde(flatten)]
    pub options: TextParams,
}

/// Defaults applied when a request leaves something unset.
#[derive(Debug, Clone, Default)]
pub struct ServerSettings {
    /// Language used when a request names none.
    pub language: Language,
    /// Flags used when a request leaves them unset.
    pub options: TextOptions,
    /// Metric names from configuration.
    pub metrics: Option<Vec<String>>,
    /// Maximum bytes per text; `None` disables the check.
    pub max_input_bytes: Option<usize>,
}

impl ServerSettings {
    /// Derive settings from loaded configuration.
    pub fn from_config(config: &Config, max_input_bytes: Option<usize>) -> Self {
        Self {
            language: config.language.unwrap_or_default(),
            options: config.text_options(),
            metrics: config.metrics.clone(),
            max_input_bytes,
        }
    }

    fn resolve(&self, params: &TextParams) -> Result<(Language, TextOptions), McpError> {
        let language = match params.language.as_deref() {
            Some(tag) => tag
                .parse::<Language>()
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?,
            None => self.language,
        };
        let options = TextOptions {
            digraphs: params.digraphs.unwrap_or(self.options.digraphs),
            nullsilber: params.nullsilber.unwrap_or(self.options.nullsilber),
        };
        Ok((language, options))
    }

    fn check_size(&self, text: &str) -> Result<(), McpError> {
        match self.max_input_bytes {
            Some(max) if text.len() > max => Err(McpError::invalid_params(
                format!("input too large: {} bytes (limit: {max} bytes)", text.len()),
                None,
            )),
            _ => Ok(()),
        }
    }
}

/// MCP server exposing readability scoring to AI assistants.
#[derive(Clone)]
pub struct ProjectServer {
    settings: std::sync::Arc<ServerSettings>,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new(ServerSettings::default())
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

#[tool_router]
impl ProjectServer {
    /// Create a new MCP server instance.
    pub fn new(settings: ServerSettings) -> Self {
        Self {
            settings: std::sync::Arc::new(settings),
            tool_router: Self::tool_router(),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, description and supported languages")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let languages: Vec<&str> = Language::ALL.iter().map(Language::as_str).collect();
        let text = if params.format == "json" {
            to_json(&serde_json::json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "description": env!("CARGO_PKG_DESCRIPTION"),
                "languages": languages,
            }))?
        } else {
            format!(
                "{} v{}\n{}\nLanguages: {}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
                languages.join(", "),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Score one text.
    #[tool(
        description = "Compute readability statistics for a text: sentence, word, syllable and grapheme counts, ASL, AWL, Flesch, FleschRUS (Russian only), Amstad, Tuldava, Lix, WSTF1-4, NRE and Gunning-Fog."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", text_len = params.text.len()))]
    fn compute_metrics(
        &self,
        Parameters(params): Parameters<ComputeMetricsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.settings.check_size(&params.text)?;
        let (language, options) = self.settings.resolve(&params.options)?;
        tracing::debug!(tool = "compute_metrics", %language, "executing MCP tool");

        let record = compute_metrics(&params.text, language, options);
        let json = to_json(&record)?;

        tracing::info!(
            tool = "compute_metrics",
            words = record.words,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Correlate metrics across several texts.
    #[tool(
        description = "Pearson correlation matrix between readability metrics across labelled texts. Each cell has r, two-tailed p and n; undefined cells are null."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", texts = params.texts.len()))]
    fn correlate_texts(
        &self,
        Parameters(params): Parameters<CorrelateTextsParams>,
    ) -> Result<CallToolResult, McpError> {
        let (language, options) = self.settings.resolve(&params.options)?;
        let names = params.metrics.as_ref().or(self.settings.metrics.as_ref());
        let metrics = match names {
            Some(names) if !names.is_empty() => Metric::parse_list(names)
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?,
            _ => Metric::default_selection(language),
        };

        let mut corpus = Corpus::new(language, options);
        for item in params.texts {
            self.settings.check_size(&item.text)?;
            corpus.add_text(item.label, item.text);
        }

        let matrix = corpus
            .correlation_matrix(&metrics)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let json = to_json(&matrix)?;

        tracing::info!(
            tool = "correlate_texts",
            texts = corpus.len(),
            metrics = metrics.len(),
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Scores Polish, Russian and Ukrainian text readability.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    fn server() -> ProjectServer {
        ProjectServer::default()
    }

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn json_of(result: &CallToolResult) -> serde_json::Value {
        let text = extract_text(result).expect("should have text content");
        serde_json::from_str(text).expect("output should be valid JSON")
    }

    #[test]
    fn server_info_has_correct_name() {
        let info = ServerHandler::get_info(&server());
        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let result = server()
            .get_info(Parameters(GetInfoParams {
                format: "json".to_string(),
            }))
            .expect("get_info should succeed");
        let json = json_of(&result);
        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(json["languages"][1], "ru-v1");
    }

    #[test]
    fn get_info_tool_returns_text_by_default() {
        let result = server()
            .get_info(Parameters(GetInfoParams {
                format: default_format(),
            }))
            .expect("get_info should succeed");
        let text = extract_text(&result).unwrap();
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn compute_metrics_tool_scores_polish() {
        let result = server()
            .compute_metrics(Parameters(ComputeMetricsParams {
                text: "Kot śpi. Pies biega.".to_string(),
                options: TextParams::default(),
            }))
            .expect("compute_metrics should succeed");
        assert!(!result.is_error.unwrap_or(false));
        let json = json_of(&result);
        assert_eq!(json["sentences"], 2);
        assert_eq!(json["words"], 4);
        assert!(json.get("flesch_rus").is_none());
    }

    #[test]
    fn compute_metrics_tool_honours_language() {
        let result = server()
            .compute_metrics(Parameters(ComputeMetricsParams {
                text: "Мама мыла раму. Папа читал газету.".to_string(),
                options: TextParams {
                    language: Some("ru-v2".to_string()),
                    ..TextParams::default()
                },
            }))
            .unwrap();
        let json = json_of(&result);
        assert!(json["flesch_rus"].as_f64().is_some());
    }

    #[test]
    fn compute_metrics_tool_rejects_unknown_language() {
        let err = server()
            .compute_metrics(Parameters(ComputeMetricsParams {
                text: "x".to_string(),
                options: TextParams {
                    language: Some("de".to_string()),
                    ..TextParams::default()
                },
            }))
            .unwrap_err();
        assert!(err.message.contains("unknown language"));
    }

    #[test]
    fn compute_metrics_tool_enforces_size_limit() {
        let server = ProjectServer::new(ServerSettings {
            max_input_bytes: Some(4),
            ..ServerSettings::default()
        });
        let result = server.compute_metrics(Parameters(ComputeMetricsParams {
            text: "Kot śpi.".to_string(),
            options: TextParams::default(),
        }));
        assert!(result.is_err());
    }

    #[test]
    fn correlate_texts_tool_returns_matrix() {
        let texts = [
            ("a", "Kot śpi. Pies biega."),
            ("b", "Ala ma kota. Kot ma Alę i duży dom z ogrodem."),
            ("c", "Wczoraj wieczorem długo rozmawialiśmy o konsekwencjach."),
        ];
        let result = server()
            .correlate_texts(Parameters(CorrelateTextsParams {
                texts: texts
                    .iter()
                    .map(|(label, text)| LabelledText {
                        label: (*label).to_string(),
                        text: (*text).to_string(),
                    })
                    .collect(),
                metrics: Some(vec!["flesch".into(), "asl".into()]),
                options: TextParams::default(),
            }))
            .unwrap();
        let json = json_of(&result);
        assert_eq!(json["metrics"], serde_json::json!(["flesch", "asl"]));
        assert_eq!(json["cells"][0][0]["r"], 1.0);
        assert_eq!(json["cells"][0][1]["n"], 3);
    }

    #[test]
    fn correlate_texts_tool_rejects_unknown_metric() {
        let err = server()
            .correlate_texts(Parameters(CorrelateTextsParams {
                texts: Vec::new(),
                metrics: Some(vec!["readability".into()]),
                options: TextParams::default(),
            }))
            .unwrap_err();
        assert!(err.message.contains("unknown metric"));
    }
}
