// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent loop and message pipelines for the Savant assistant.
//!
//! The [`AgentLoop`] is the central coordinator that:
//! - Receives messages from a channel adapter
//! - Spawns one task per inbound message
//! - Routes commands to their pipelines and free text through the
//!   message-processing pipeline
//! - Delivers formatted replies back through the channel
//! - Handles graceful shutdown

pub mod format;
pub mod next_steps;
pub mod process;
pub mod projects;
pub mod search;
pub mod shutdown;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::time::Duration;

use savant_core::error::SavantError;
use savant_core::traits::{ChannelAdapter, LlmProvider, StorageAdapter};
use savant_core::types::{Command, InboundMessage, Message, OutboundMessage, Payload};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::next_steps::NextStepsPipeline;
use crate::process::{PipelineStep, ProcessMessagePipeline};
use crate::projects::ProjectDirectory;
use crate::search::KnowledgeSearchPipeline;

/// How long shutdown waits for in-flight message tasks.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// The main agent loop coordinating message flow between channel, provider,
/// and storage.
///
/// Each inbound message is handled by its own task, so pipelines for
/// different messages run concurrently; within one pipeline the steps stay
/// strictly sequential.
pub struct AgentLoop {
    channel: Arc<dyn ChannelAdapter + Send + Sync>,
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    handlers: Handlers,
}

impl AgentLoop {
    /// Creates a new agent loop over an already-connected channel.
    pub fn new(
        channel: Arc<dyn ChannelAdapter + Send + Sync>,
        provider: Arc<dyn LlmProvider + Send + Sync>,
        storage: Arc<dyn StorageAdapter + Send + Sync>,
    ) -> Self {
        let handlers = Handlers {
            channel: Arc::clone(&channel),
            process: ProcessMessagePipeline::new(Arc::clone(&storage), Arc::clone(&provider)),
            next_steps: NextStepsPipeline::new(Arc::clone(&storage), Arc::clone(&provider)),
            search: KnowledgeSearchPipeline::new(Arc::clone(&storage)),
            projects: ProjectDirectory::new(Arc::clone(&storage)),
        };
        info!("agent loop initialized");
        Self {
            channel,
            storage,
            handlers,
        }
    }

    /// Runs the main agent loop until the cancellation token is triggered or
    /// the channel closes.
    ///
    /// On shutdown, in-flight message tasks are drained (bounded by
    /// [`DRAIN_TIMEOUT`]) before storage is closed.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), SavantError> {
        info!("agent loop running");

        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                msg = self.channel.receive() => {
                    match msg {
                        Ok(inbound) => {
                            let handlers = self.handlers.clone();
                            tasks.spawn(async move { handlers.dispatch(inbound).await });
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                            // If the channel is closed, break out of the loop.
                            if e.to_string().contains("closed") {
                                break;
                            }
                        }
                    }
                }
                Some(res) = tasks.join_next() => {
                    if let Err(e) = res {
                        error!(error = %e, "message task failed");
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping agent loop");
                    break;
                }
            }
        }

        // Drain in-flight message tasks before closing storage.
        let drain = async {
            while tasks.join_next().await.is_some() {}
        };
        if tokio::time::timeout(DRAIN_TIMEOUT, drain).await.is_err() {
            warn!("timed out waiting for in-flight messages, shutting down anyway");
        }

        self.storage.close().await?;

        info!("agent loop stopped");
        Ok(())
    }
}

/// Shared handles cloned into each per-message task.
#[derive(Clone)]
struct Handlers {
    channel: Arc<dyn ChannelAdapter + Send + Sync>,
    process: ProcessMessagePipeline,
    next_steps: NextStepsPipeline,
    search: KnowledgeSearchPipeline,
    projects: ProjectDirectory,
}

impl Handlers {
    /// Handles one inbound message end to end and delivers the reply.
    ///
    /// Delivery failure is logged, never retried, and rolls back nothing.
    async fn dispatch(&self, inbound: InboundMessage) {
        debug!(
            sender_id = inbound.sender_id,
            chat_id = inbound.chat_id,
            "handling inbound message"
        );

        let chat_id = inbound.chat_id.clone();
        let reply = match inbound.payload {
            Payload::Command(command) => Some(self.handle_command(command).await),
            Payload::Text(text) => {
                self.handle_text(text, &inbound.sender_id, &chat_id).await
            }
        };

        if let Some(content) = reply {
            let out = OutboundMessage { chat_id, content };
            if let Err(e) = self.channel.send(out).await {
                warn!(error = %e, "failed to deliver reply");
            }
        }
    }

    /// Runs free text through the message-processing pipeline.
    ///
    /// Returns `None` when nothing should be sent: a failed save means the
    /// message was never durably recorded, so no confirmation goes out.
    async fn handle_text(&self, text: String, sender_id: &str, chat_id: &str) -> Option<String> {
        let message = Message::new(text, sender_id, chat_id);
        match self.process.execute(message).await {
            Ok(outcome) => Some(format::processed_reply(&outcome)),
            Err(failure) => {
                error!(step = %failure.step, error = %failure.source, "message pipeline failed");
                match failure.step {
                    PipelineStep::Save => None,
                    _ => Some(format::pipeline_failure_reply()),
                }
            }
        }
    }

    async fn handle_command(&self, command: Command) -> String {
        match command {
            Command::Start => format::welcome(),
            Command::Help => format::help(),
            Command::CreateProject { name, description } => {
                match self.projects.create(&name, &description).await {
                    Ok(project) => format::project_created_reply(&project),
                    Err(e) => format::error_reply(&e),
                }
            }
            Command::ListProjects => match self.projects.list().await {
                Ok(projects) => format::project_list_reply(&projects),
                Err(e) => format::error_reply(&e),
            },
            Command::NextSteps { project } => match self.next_steps.execute(&project).await {
                Ok((project, suggestions)) => format::suggestions_reply(&project, &suggestions),
                Err(e) => format::error_reply(&e),
            },
            Command::SearchKnowledge { query, project } => {
                let result = match &project {
                    Some(name) => self.search.execute_in_project(name, &query).await,
                    None => self.search.execute(&query).await,
                };
                match result {
                    Ok(entries) => format::search_reply(&query, &entries),
                    Err(e) => format::error_reply(&e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{classification, ScriptedChannel, StubProvider};
    use chrono::Utc;
    use savant_core::traits::{KnowledgeStore, MessageStore, ProjectStore};
    use savant_core::types::{
        Category, Classification, KnowledgeEntry, KnowledgeItem, Project, ProjectStatus,
    };
    use uuid::Uuid;
    use savant_storage::MemoryStorage;

    fn inbound(payload: Payload) -> InboundMessage {
        InboundMessage {
            id: "42".into(),
            sender_id: "u1".into(),
            chat_id: "c1".into(),
            payload,
            timestamp: Utc::now(),
        }
    }

    async fn run_to_completion(
        inbound_messages: Vec<InboundMessage>,
        provider: Arc<StubProvider>,
        storage: Arc<MemoryStorage>,
    ) -> Arc<ScriptedChannel> {
        let channel = Arc::new(ScriptedChannel::new(inbound_messages));
        let mut agent = AgentLoop::new(channel.clone(), provider, storage);
        agent.run(CancellationToken::new()).await.unwrap();
        channel
    }

    #[tokio::test]
    async fn free_text_is_processed_and_confirmed() {
        let storage = Arc::new(MemoryStorage::new());
        let project = Project::new("Authentication System", "JWT work").unwrap();
        storage.save_project(&project).await.unwrap();

        let provider = Arc::new(
            StubProvider::new()
                .classification(Classification {
                    category: Category::FeatureRequest,
                    confidence: 0.92,
                    summary: "JWT auth implementation".into(),
                    tags: vec!["authentication".into(), "api".into(), "jwt".into()],
                    suggested_project_id: Some(project.id),
                })
                .items(vec![KnowledgeItem {
                    content: "JWT auth work is underway".into(),
                    tags: vec![],
                }]),
        );

        let channel = run_to_completion(
            vec![inbound(Payload::Text(
                "Working on implementing JWT authentication for the API".into(),
            ))],
            provider,
            storage.clone(),
        )
        .await;

        let sent = channel.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, "c1");
        assert!(sent[0].content.contains("feature_request"));
        assert!(sent[0].content.contains("0.92"));
        assert!(sent[0].content.contains("Authentication System"));

        let unprocessed = storage.list_unprocessed(10).await.unwrap();
        assert!(unprocessed.is_empty());
    }

    #[tokio::test]
    async fn classify_failure_sends_generic_notice_and_keeps_message_unprocessed() {
        let storage = Arc::new(MemoryStorage::new());
        let provider = Arc::new(StubProvider::new().fail_classify());

        let channel = run_to_completion(
            vec![inbound(Payload::Text("hello there".into()))],
            provider,
            storage.clone(),
        )
        .await;

        let sent = channel.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].content.contains("try again"));
        assert!(!sent[0].content.contains("classify"));

        let unprocessed = storage.list_unprocessed(10).await.unwrap();
        assert_eq!(unprocessed.len(), 1);
        assert!(!unprocessed[0].processed);
    }

    #[tokio::test]
    async fn create_project_command_persists_and_echoes_the_id() {
        let storage = Arc::new(MemoryStorage::new());
        let provider = Arc::new(StubProvider::new());

        let channel = run_to_completion(
            vec![inbound(Payload::Command(Command::CreateProject {
                name: "Auth System".into(),
                description: "JWT work".into(),
            }))],
            provider,
            storage.clone(),
        )
        .await;

        let projects = storage.list_active_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Auth System");
        assert_eq!(projects[0].status, ProjectStatus::Active);

        let sent = channel.sent();
        assert!(sent[0].content.contains(&projects[0].id.to_string()));
    }

    #[tokio::test]
    async fn next_steps_for_unknown_project_reports_not_found_without_provider_call() {
        let storage = Arc::new(MemoryStorage::new());
        let provider = Arc::new(StubProvider::new());

        let channel = run_to_completion(
            vec![inbound(Payload::Command(Command::NextSteps {
                project: "Nonexistent Project".into(),
            }))],
            provider.clone(),
            storage,
        )
        .await;

        let sent = channel.sent();
        assert!(sent[0].content.contains("No project matches"));
        assert_eq!(provider.suggest_calls(), 0);
    }

    #[tokio::test]
    async fn next_steps_for_ambiguous_name_asks_to_disambiguate() {
        let storage = Arc::new(MemoryStorage::new());
        for name in ["API Gateway", "API Docs"] {
            let project = Project::new(name, "description").unwrap();
            storage.save_project(&project).await.unwrap();
        }
        let provider = Arc::new(StubProvider::new());

        let channel = run_to_completion(
            vec![inbound(Payload::Command(Command::NextSteps {
                project: "API".into(),
            }))],
            provider.clone(),
            storage,
        )
        .await;

        let sent = channel.sent();
        assert!(sent[0].content.contains("more than one project"));
        assert_eq!(provider.suggest_calls(), 0);
    }

    #[tokio::test]
    async fn scoped_search_command_only_returns_the_projects_entries() {
        let storage = Arc::new(MemoryStorage::new());
        let project = Project::new("Auth System", "JWT work").unwrap();
        storage.save_project(&project).await.unwrap();

        let linked = KnowledgeEntry::new(
            "Use RS256 for JWT signing",
            vec![],
            Uuid::new_v4(),
            Some(project.id),
        );
        let unlinked = KnowledgeEntry::new("JWT refresh tokens", vec![], Uuid::new_v4(), None);
        storage.save_entry(&linked).await.unwrap();
        storage.save_entry(&unlinked).await.unwrap();

        let channel = run_to_completion(
            vec![inbound(Payload::Command(Command::SearchKnowledge {
                query: "jwt".into(),
                project: Some("auth".into()),
            }))],
            Arc::new(StubProvider::new()),
            storage,
        )
        .await;

        let sent = channel.sent();
        assert!(sent[0].content.contains("RS256"));
        assert!(!sent[0].content.contains("refresh tokens"));
    }

    #[tokio::test]
    async fn help_command_lists_the_command_surface() {
        let channel = run_to_completion(
            vec![inbound(Payload::Command(Command::Help))],
            Arc::new(StubProvider::new()),
            Arc::new(MemoryStorage::new()),
        )
        .await;

        let sent = channel.sent();
        assert!(sent[0].content.contains("/newproject"));
        assert!(sent[0].content.contains("/nextsteps"));
    }

    #[tokio::test]
    async fn cancellation_stops_the_loop() {
        let channel = Arc::new(ScriptedChannel::new(vec![]));
        // An empty script closes the channel immediately, but cancelling
        // first must also stop the loop cleanly.
        let mut agent = AgentLoop::new(
            channel,
            Arc::new(StubProvider::new()),
            Arc::new(MemoryStorage::new()),
        );
        let cancel = CancellationToken::new();
        cancel.cancel();
        agent.run(cancel).await.unwrap();
    }

    #[tokio::test]
    async fn malformed_create_project_gets_a_validation_reply() {
        let storage = Arc::new(MemoryStorage::new());
        let channel = run_to_completion(
            vec![inbound(Payload::Command(Command::CreateProject {
                name: "Auth".into(),
                description: String::new(),
            }))],
            Arc::new(StubProvider::new()),
            storage.clone(),
        )
        .await;

        let sent = channel.sent();
        assert!(sent[0].content.contains("That didn't work"));
        assert!(storage.list_active_projects().await.unwrap().is_empty());
    }
}
