// SPDX-FileCopyrightText: 2026 Savant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles shared by the pipeline and agent-loop tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use savant_core::error::SavantError;
use savant_core::traits::{ChannelAdapter, LlmProvider, PluginAdapter};
use savant_core::types::{
    AdapterType, Category, Classification, HealthStatus, InboundMessage, KnowledgeEntry,
    KnowledgeItem, OutboundMessage, Project, Suggestion,
};

pub fn classification(category: Category, confidence: f64) -> Classification {
    Classification {
        category,
        confidence,
        summary: "stub summary".into(),
        tags: vec![],
        suggested_project_id: None,
    }
}

/// Scriptable [`LlmProvider`]: each operation either returns a configured
/// value or fails with a provider error, and counts its calls.
pub struct StubProvider {
    classification: Option<Classification>,
    items: Option<Vec<KnowledgeItem>>,
    suggestions: Option<Vec<Suggestion>>,
    classify_calls: AtomicUsize,
    extract_calls: AtomicUsize,
    suggest_calls: AtomicUsize,
}

impl StubProvider {
    /// Starts with every operation failing; configure what should succeed.
    pub fn new() -> Self {
        Self {
            classification: None,
            items: None,
            suggestions: None,
            classify_calls: AtomicUsize::new(0),
            extract_calls: AtomicUsize::new(0),
            suggest_calls: AtomicUsize::new(0),
        }
    }

    pub fn classification(mut self, c: Classification) -> Self {
        self.classification = Some(c);
        self
    }

    pub fn items(mut self, items: Vec<KnowledgeItem>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn suggestions(mut self, suggestions: Vec<Suggestion>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }

    pub fn fail_classify(mut self) -> Self {
        self.classification = None;
        self
    }

    pub fn fail_extract(mut self) -> Self {
        self.items = None;
        self
    }

    pub fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }

    pub fn extract_calls(&self) -> usize {
        self.extract_calls.load(Ordering::SeqCst)
    }

    pub fn suggest_calls(&self) -> usize {
        self.suggest_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PluginAdapter for StubProvider {
    fn name(&self) -> &str {
        "stub-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 0, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, SavantError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SavantError> {
        Ok(())
    }
}

#[async_trait]
impl LlmProvider for StubProvider {
    async fn classify(
        &self,
        _content: &str,
        _candidate_projects: &[Project],
    ) -> Result<Classification, SavantError> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        self.classification
            .clone()
            .ok_or_else(|| SavantError::provider("stub classify failure"))
    }

    async fn extract_knowledge(
        &self,
        _content: &str,
        _classification: &Classification,
    ) -> Result<Vec<KnowledgeItem>, SavantError> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        self.items
            .clone()
            .ok_or_else(|| SavantError::provider("stub extract failure"))
    }

    async fn suggest_next_steps(
        &self,
        _project: &Project,
        _entries: &[KnowledgeEntry],
    ) -> Result<Vec<Suggestion>, SavantError> {
        self.suggest_calls.fetch_add(1, Ordering::SeqCst);
        self.suggestions
            .clone()
            .ok_or_else(|| SavantError::provider("stub suggest failure"))
    }
}

/// Scripted [`ChannelAdapter`]: yields queued inbound messages, then reports
/// the channel closed. Outbound messages are captured for assertions.
pub struct ScriptedChannel {
    inbound: Mutex<VecDeque<InboundMessage>>,
    sent: Mutex<Vec<OutboundMessage>>,
}

impl ScriptedChannel {
    pub fn new(inbound: Vec<InboundMessage>) -> Self {
        Self {
            inbound: Mutex::new(inbound.into()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PluginAdapter for ScriptedChannel {
    fn name(&self) -> &str {
        "scripted-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 0, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, SavantError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SavantError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for ScriptedChannel {
    async fn connect(&mut self) -> Result<(), SavantError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<(), SavantError> {
        self.sent.lock().unwrap().push(msg);
        Ok(())
    }

    async fn receive(&self) -> Result<InboundMessage, SavantError> {
        let next = self.inbound.lock().unwrap().pop_front();
        match next {
            Some(msg) => Ok(msg),
            None => Err(SavantError::Channel {
                message: "channel closed".into(),
                source: None,
            }),
        }
    }
}
