//! crates/teaching_assistant_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use std::fmt;

use uuid::Uuid;

/// The kind of teaching material to generate. Selects the prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    LessonPlan,
    Quiz,
    Homework,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [ContentKind::LessonPlan, ContentKind::Quiz, ContentKind::Homework];

    /// The name used in routes and on the wire (`lesson-plan`, `quiz`, `homework`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::LessonPlan => "lesson-plan",
            ContentKind::Quiz => "quiz",
            ContentKind::Homework => "homework",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three fields a teacher fills in. Created per request, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub subject: String,
    pub class_level: String,
    pub chapter: String,
}

impl GenerationRequest {
    pub fn new(
        subject: impl Into<String>,
        class_level: impl Into<String>,
        chapter: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            class_level: class_level.into(),
            chapter: chapter.into(),
        }
    }

    /// True when every field carries something other than whitespace.
    pub fn is_complete(&self) -> bool {
        [&self.subject, &self.class_level, &self.chapter]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// Generated text handed back to the caller. Never stored server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub content: String,
}

// Represents a user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}
