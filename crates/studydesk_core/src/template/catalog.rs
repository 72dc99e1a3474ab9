//! Template catalog contract and builtin registry.
//!
//! # Responsibility
//! - Resolve template ids to full curated blueprints.
//! - Keep catalog content read-only; instantiation never mutates it.
//!
//! # Invariants
//! - Template ids are unique within one catalog.
//! - Definitions describe content only; all record ids and timestamps are
//!   assigned at instantiation time.

use crate::model::item::ItemType;
use crate::model::todo::{TodoKind, TodoPriority};
use crate::model::workspace::WorkspaceMode;
use std::collections::BTreeMap;

/// Catalog listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummary {
    pub template_id: String,
    pub title: String,
    pub goal: Option<String>,
    pub emoji: Option<String>,
}

/// Full curated blueprint: a workspace shell plus seed content.
#[derive(Debug, Clone)]
pub struct TemplateDefinition {
    pub template_id: String,
    pub title: String,
    pub goal: Option<String>,
    pub emoji: Option<String>,
    pub mode: WorkspaceMode,
    pub folders: Vec<TemplateFolder>,
}

/// One seed folder and its items.
#[derive(Debug, Clone)]
pub struct TemplateFolder {
    pub name: String,
    pub items: Vec<TemplateItem>,
}

/// One seed item; `review_enabled` items become immediately due.
#[derive(Debug, Clone)]
pub struct TemplateItem {
    pub kind: ItemType,
    pub title: String,
    pub url: Option<String>,
    pub note: Option<String>,
    pub tags: Vec<String>,
    pub review_enabled: bool,
    pub todos: Vec<TemplateTodo>,
}

/// One seed todo attached to its enclosing item.
#[derive(Debug, Clone)]
pub struct TemplateTodo {
    pub text: String,
    pub kind: TodoKind,
    pub priority: TodoPriority,
}

/// Read-only catalog of curated templates.
pub trait TemplateCatalog {
    /// Lists available templates sorted by id.
    fn list_templates(&self) -> Vec<TemplateSummary>;
    /// Resolves one template by id.
    fn resolve(&self, template_id: &str) -> Option<&TemplateDefinition>;
}

/// In-process catalog holding the builtin starter templates.
pub struct BuiltinTemplateCatalog {
    templates: BTreeMap<String, TemplateDefinition>,
}

impl BuiltinTemplateCatalog {
    pub fn new() -> Self {
        let mut templates = BTreeMap::new();
        for definition in builtin_definitions() {
            templates.insert(definition.template_id.clone(), definition);
        }
        Self { templates }
    }
}

impl Default for BuiltinTemplateCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateCatalog for BuiltinTemplateCatalog {
    fn list_templates(&self) -> Vec<TemplateSummary> {
        self.templates
            .values()
            .map(|definition| TemplateSummary {
                template_id: definition.template_id.clone(),
                title: definition.title.clone(),
                goal: definition.goal.clone(),
                emoji: definition.emoji.clone(),
            })
            .collect()
    }

    fn resolve(&self, template_id: &str) -> Option<&TemplateDefinition> {
        self.templates.get(template_id.trim())
    }
}

fn builtin_definitions() -> Vec<TemplateDefinition> {
    vec![
        nodejs_backend_template(),
        rust_fundamentals_template(),
        interview_prep_template(),
    ]
}

fn nodejs_backend_template() -> TemplateDefinition {
    TemplateDefinition {
        template_id: "nodejs-backend".to_string(),
        title: "Node.js Backend".to_string(),
        goal: Some("Build and deploy a production-grade REST API".to_string()),
        emoji: Some("🟢".to_string()),
        mode: WorkspaceMode::Build,
        folders: vec![
            TemplateFolder {
                name: "Fundamentals".to_string(),
                items: vec![
                    TemplateItem {
                        kind: ItemType::Link,
                        title: "Node.js event loop guide".to_string(),
                        url: Some("https://nodejs.org/en/learn".to_string()),
                        note: None,
                        tags: vec!["nodejs".to_string(), "async".to_string()],
                        review_enabled: true,
                        todos: vec![TemplateTodo {
                            text: "Summarize the event loop phases".to_string(),
                            kind: TodoKind::Task,
                            priority: TodoPriority::Normal,
                        }],
                    },
                    TemplateItem {
                        kind: ItemType::Note,
                        title: "Streams cheat sheet".to_string(),
                        url: None,
                        note: Some("Readable, Writable, Duplex, Transform".to_string()),
                        tags: vec!["nodejs".to_string()],
                        review_enabled: false,
                        todos: Vec::new(),
                    },
                ],
            },
            TemplateFolder {
                name: "Project".to_string(),
                items: vec![TemplateItem {
                    kind: ItemType::Resource,
                    title: "REST API capstone".to_string(),
                    url: None,
                    note: None,
                    tags: vec!["project".to_string()],
                    review_enabled: false,
                    todos: vec![TemplateTodo {
                        text: "Scaffold routes and persistence layer".to_string(),
                        kind: TodoKind::Project,
                        priority: TodoPriority::High,
                    }],
                }],
            },
        ],
    }
}

fn rust_fundamentals_template() -> TemplateDefinition {
    TemplateDefinition {
        template_id: "rust-fundamentals".to_string(),
        title: "Rust Fundamentals".to_string(),
        goal: Some("Get comfortable with ownership, traits, and error handling".to_string()),
        emoji: Some("🦀".to_string()),
        mode: WorkspaceMode::Build,
        folders: vec![TemplateFolder {
            name: "The Book".to_string(),
            items: vec![
                TemplateItem {
                    kind: ItemType::Link,
                    title: "Ownership and borrowing".to_string(),
                    url: Some("https://doc.rust-lang.org/book/ch04-00-understanding-ownership.html".to_string()),
                    note: None,
                    tags: vec!["rust".to_string(), "ownership".to_string()],
                    review_enabled: true,
                    todos: vec![TemplateTodo {
                        text: "Redo the ownership exercises from memory".to_string(),
                        kind: TodoKind::Practice,
                        priority: TodoPriority::Normal,
                    }],
                },
                TemplateItem {
                    kind: ItemType::Link,
                    title: "Error handling with Result".to_string(),
                    url: Some("https://doc.rust-lang.org/book/ch09-00-error-handling.html".to_string()),
                    note: None,
                    tags: vec!["rust".to_string()],
                    review_enabled: true,
                    todos: Vec::new(),
                },
            ],
        }],
    }
}

fn interview_prep_template() -> TemplateDefinition {
    TemplateDefinition {
        template_id: "interview-prep".to_string(),
        title: "Interview Prep".to_string(),
        goal: Some("Six-week algorithms and system design rotation".to_string()),
        emoji: Some("🎯".to_string()),
        mode: WorkspaceMode::Interview,
        folders: vec![
            TemplateFolder {
                name: "Algorithms".to_string(),
                items: vec![TemplateItem {
                    kind: ItemType::Note,
                    title: "Two-pointer patterns".to_string(),
                    url: None,
                    note: Some("Sliding window, fast/slow, partition".to_string()),
                    tags: vec!["algorithms".to_string()],
                    review_enabled: true,
                    todos: vec![TemplateTodo {
                        text: "Drill five two-pointer problems".to_string(),
                        kind: TodoKind::Quiz,
                        priority: TodoPriority::High,
                    }],
                }],
            },
            TemplateFolder {
                name: "System Design".to_string(),
                items: vec![TemplateItem {
                    kind: ItemType::Note,
                    title: "Rate limiter design".to_string(),
                    url: None,
                    note: Some("Token bucket vs sliding log".to_string()),
                    tags: vec!["system-design".to_string()],
                    review_enabled: true,
                    todos: Vec::new(),
                }],
            },
        ],
    }
}
