//! Portfolio search handler
//!
//! Demo REST integration: two sequential GETs against a
//! JSONPlaceholder-style service simulate portfolio data, which is then
//! handed to the model together with the user's query. The model call
//! never starts before both fetches complete.

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::error::{HandlerError, HandlerResult};
use crate::logging::Logger;
use crate::model::LanguageModel;
use crate::output::ResponseSink;
use crate::types::{CancellationToken, FunctionCategory, FunctionSpec};

/// Portfolio function table
pub fn specs() -> Vec<FunctionSpec> {
    vec![FunctionSpec::new(
        "SearchPortfolio",
        FunctionCategory::Api,
        "Searches and analyzes portfolio data using REST API and AI",
    )
    .with_parameters(["query"])
    .with_example("Search for projects by John")]
}

/// Default portfolio service host
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

// Kept small for demo prompts
const MAX_USERS: usize = 3;
const POST_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PortfolioUser {
    id: i64,
    name: String,
    email: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Post {
    #[serde(rename = "userId")]
    user_id: i64,
    id: i64,
    title: String,
    body: String,
}

#[derive(Debug, Clone, Serialize)]
struct Project {
    id: i64,
    title: String,
    description: String,
    #[serde(rename = "userId")]
    user_id: i64,
}

impl From<Post> for Project {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            description: post.body,
            user_id: post.user_id,
        }
    }
}

/// Compact intermediate structure embedded into the analysis prompt
#[derive(Debug, Clone, Serialize)]
struct PortfolioData {
    users: Vec<PortfolioUser>,
    projects: Vec<Project>,
}

impl PortfolioData {
    fn from_responses(users: Vec<PortfolioUser>, posts: Vec<Post>) -> Self {
        Self {
            users: users.into_iter().take(MAX_USERS).collect(),
            projects: posts.into_iter().map(Project::from).collect(),
        }
    }
}

fn build_analysis_prompt(data: &PortfolioData, query: &str) -> String {
    let rendered = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
    format!(
        "You are a portfolio analyst. I have the following portfolio data and a user query.\n\
         Please analyze the data and provide a helpful response to the user's question.\n\n\
         Portfolio Data:\n{}\n\n\
         User Query: \"{}\"\n\n\
         Please provide a helpful, conversational response about the portfolio data that addresses the user's query.\n\
         If the query doesn't match the available data, explain what information is available instead.\n\
         Keep the response concise but informative.",
        rendered, query
    )
}

fn render_all_items(posts: &[Post], limit: usize) -> String {
    let listing = posts
        .iter()
        .take(limit)
        .map(|p| format!("**{}.** {}\n", p.id, p.title))
        .collect::<String>();
    format!(
        "📋 **All Portfolio Items** ({} total)\n\n{}\n*Showing first {} items. Use search to find specific content.*",
        posts.len(),
        listing,
        limit
    )
}

/// Handler for portfolio search calls
pub struct PortfolioHandler {
    http: reqwest::Client,
    base_url: String,
    model: Arc<dyn LanguageModel>,
    logger: Arc<dyn Logger>,
}

impl PortfolioHandler {
    /// Create a handler against the default demo service
    pub fn new(model: Arc<dyn LanguageModel>, logger: Arc<dyn Logger>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, model, logger)
    }

    /// Create a handler against a specific service host
    pub fn with_base_url(
        base_url: impl Into<String>,
        model: Arc<dyn LanguageModel>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model,
            logger,
        }
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> HandlerResult<T> {
        let url = format!("{}{}", self.base_url, path);
        self.logger.debug(&format!("portfolio: GET {}", url));

        let response = match cancel.run_until_cancelled(self.http.get(&url).send()).await {
            Some(response) => response?,
            None => return Err(HandlerError::Cancelled),
        };

        let status = response.status();
        if !status.is_success() {
            return Err(HandlerError::status(status.as_u16(), url));
        }
        Ok(response.json::<T>().await?)
    }

    /// Gather data, ask the model, and stream the answer to the sink
    async fn search(
        &self,
        query: &str,
        sink: &dyn ResponseSink,
        cancel: CancellationToken,
    ) -> HandlerResult<()> {
        let users: Vec<PortfolioUser> = self.fetch_json("/users", &cancel).await?;
        let posts: Vec<Post> = self
            .fetch_json(&format!("/posts?_limit={}", POST_LIMIT), &cancel)
            .await?;

        let data = PortfolioData::from_responses(users, posts);
        let prompt = build_analysis_prompt(&data, query);

        sink.write("\n\n🤖 **AI Analysis**:");
        sink.write("\n\n");

        let mut stream = self.model.send(&prompt, cancel).await?;
        while let Some(fragment) = stream.next().await {
            sink.write(&fragment?);
        }
        Ok(())
    }

    /// Fetch all portfolio items and render the first `limit` titles
    ///
    /// Debug helper kept alongside search; not wired into the registry.
    pub async fn list_all(
        &self,
        limit: usize,
        cancel: CancellationToken,
    ) -> HandlerResult<String> {
        let posts: Vec<Post> = self.fetch_json("/posts", &cancel).await?;
        Ok(render_all_items(&posts, limit))
    }

    /// Validate, search and render a portfolio call
    pub async fn handle(
        &self,
        args: &[Value],
        _prompt: &str,
        sink: &dyn ResponseSink,
        cancel: CancellationToken,
    ) -> HandlerResult<()> {
        let query = match args {
            [Value::String(query)] => query.clone(),
            _ => {
                sink.write(
                    "❌ **Error**: SearchPortfolio requires exactly 1 parameter (search query)",
                );
                return Ok(());
            }
        };

        sink.write(&format!("🔍 **Searching Portfolio**: \"{}\"", query));
        sink.write("\n\n⏳ *Calling REST API and analyzing with AI...*");

        if let Err(e) = self.search(&query, sink, cancel).await {
            self.logger.error(&format!("portfolio search failed: {}", e));
            sink.write(&format!("\n\n❌ Error searching portfolio: {}", e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::model::MockModel;
    use crate::output::MemorySink;
    use serde_json::json;

    fn test_logger() -> Arc<dyn Logger> {
        Arc::new(NoOpLogger::new())
    }

    #[test]
    fn test_reshape_truncates_users_and_maps_posts() {
        let users: Vec<PortfolioUser> = serde_json::from_value(json!([
            {"id": 1, "name": "Leanne Graham", "email": "l@example.com", "phone": "x"},
            {"id": 2, "name": "Ervin Howell", "email": "e@example.com"},
            {"id": 3, "name": "Clementine Bauch", "email": "c@example.com"},
            {"id": 4, "name": "Patricia Lebsack", "email": "p@example.com"}
        ]))
        .unwrap();
        let posts: Vec<Post> = serde_json::from_value(json!([
            {"userId": 1, "id": 10, "title": "design system", "body": "a body"}
        ]))
        .unwrap();

        let data = PortfolioData::from_responses(users, posts);
        assert_eq!(data.users.len(), 3);
        assert_eq!(data.projects.len(), 1);
        assert_eq!(data.projects[0].description, "a body");
        assert_eq!(data.projects[0].user_id, 1);
    }

    #[test]
    fn test_analysis_prompt_embeds_data_and_query() {
        let data = PortfolioData {
            users: vec![PortfolioUser {
                id: 1,
                name: "Leanne Graham".to_string(),
                email: "l@example.com".to_string(),
            }],
            projects: vec![],
        };

        let prompt = build_analysis_prompt(&data, "John's projects");
        assert!(prompt.contains("Leanne Graham"));
        assert!(prompt.contains("User Query: \"John's projects\""));
        assert!(prompt.starts_with("You are a portfolio analyst."));
    }

    #[tokio::test]
    async fn test_wrong_arity_is_validation_error() {
        let handler = PortfolioHandler::new(
            Arc::new(MockModel::fixed("unused", test_logger())),
            test_logger(),
        );
        let sink = MemorySink::new();

        handler
            .handle(
                &[json!("a"), json!("b")],
                "search",
                &sink,
                CancellationToken::new(),
            )
            .await
            .unwrap();

        assert!(sink
            .contents()
            .contains("requires exactly 1 parameter (search query)"));
    }

    #[test]
    fn test_all_items_listing_truncates_to_limit() {
        let posts: Vec<Post> = serde_json::from_value(json!([
            {"userId": 1, "id": 1, "title": "first item", "body": "a"},
            {"userId": 1, "id": 2, "title": "second item", "body": "b"},
            {"userId": 2, "id": 3, "title": "third item", "body": "c"}
        ]))
        .unwrap();

        let rendered = render_all_items(&posts, 2);
        assert!(rendered.contains("All Portfolio Items** (3 total)"));
        assert!(rendered.contains("**1.** first item"));
        assert!(rendered.contains("**2.** second item"));
        assert!(!rendered.contains("third item"));
        assert!(rendered.contains("Showing first 2 items"));
    }

    #[tokio::test]
    async fn test_list_all_surfaces_fetch_errors() {
        // Nothing listens on this address; the GET fails fast
        let handler = PortfolioHandler::with_base_url(
            "http://127.0.0.1:1",
            Arc::new(MockModel::fixed("unused", test_logger())),
            test_logger(),
        );

        let result = handler.list_all(5, CancellationToken::new()).await;
        assert!(matches!(result, Err(HandlerError::Http(_))));
    }

    #[tokio::test]
    async fn test_network_failure_is_rendered_not_raised() {
        // Nothing listens on this address; the GET fails fast
        let handler = PortfolioHandler::with_base_url(
            "http://127.0.0.1:1",
            Arc::new(MockModel::fixed("unused", test_logger())),
            test_logger(),
        );
        let sink = MemorySink::new();

        handler
            .handle(
                &[json!("design projects")],
                "Search for design projects",
                &sink,
                CancellationToken::new(),
            )
            .await
            .unwrap();

        let out = sink.contents();
        assert!(out.contains("Searching Portfolio"));
        assert!(out.contains("Error searching portfolio"));
    }
}
