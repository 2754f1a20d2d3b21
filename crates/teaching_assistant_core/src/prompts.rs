//! crates/teaching_assistant_core/src/prompts.rs
//!
//! Fixed prompt templates for each content kind. Rendering is pure: the same
//! kind and request always produce the same text.

use crate::domain::{ContentKind, GenerationRequest};

pub const LESSON_PLAN_SECTIONS: [&str; 7] = [
    "Learning Objectives",
    "Required Materials",
    "Introduction (10 minutes)",
    "Main Content (30 minutes)",
    "Activities (15 minutes)",
    "Assessment/Recap (5 minutes)",
    "Homework Ideas",
];

pub const QUIZ_SECTIONS: [&str; 3] = [
    "5 Multiple Choice Questions",
    "3 Short Answer Questions",
    "2 Long Answer Questions",
];

pub const HOMEWORK_SECTIONS: [&str; 5] = [
    "Practice Problems",
    "Research Topics",
    "Creative Projects",
    "Due Date Suggestions",
    "Grading Criteria",
];

/// The numbered section headers that a prompt of the given kind asks for.
pub fn sections(kind: ContentKind) -> &'static [&'static str] {
    match kind {
        ContentKind::LessonPlan => &LESSON_PLAN_SECTIONS,
        ContentKind::Quiz => &QUIZ_SECTIONS,
        ContentKind::Homework => &HOMEWORK_SECTIONS,
    }
}

/// Renders the prompt for `kind` from a subject, class level and chapter.
pub fn build_prompt(kind: ContentKind, request: &GenerationRequest) -> String {
    let GenerationRequest {
        subject,
        class_level,
        chapter,
    } = request;

    let opening = match kind {
        ContentKind::LessonPlan => format!(
            "Create a detailed lesson plan for teaching {} in {} for class {}.",
            chapter, subject, class_level
        ),
        ContentKind::Quiz => format!(
            "Create a quiz for {} in {} for class {}.",
            chapter, subject, class_level
        ),
        ContentKind::Homework => format!(
            "Create homework assignments for {} in {} for class {}.",
            chapter, subject, class_level
        ),
    };

    let mut prompt = opening;
    prompt.push_str("\nInclude:");
    for (index, section) in sections(kind).iter().enumerate() {
        prompt.push_str(&format!("\n{}. {}", index + 1, section));
    }
    if kind == ContentKind::Quiz {
        prompt.push_str("\nInclude answers for all questions.");
    }
    prompt
}
