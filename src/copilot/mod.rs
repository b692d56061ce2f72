// src/copilot/mod.rs
//! Chat routing and the career actions behind it
pub mod chat;
pub mod cover_letter;
pub mod error;
pub mod extract;
pub mod format;
pub mod linkedin_post;
pub mod profile_summary;
pub mod router;
pub mod scoring;

pub use chat::{CareerCopilot, ChatReply, ChatRequest, ConversationEntry, Relayed, ScoreRequest};
pub use cover_letter::{CoverLetterDraft, CoverLetterRequest};
pub use error::{as_validation, ValidationError};
pub use linkedin_post::{LinkedInPostRequest, PostDraft};
pub use profile_summary::{ProfilePost, ProfileSummary, ProfileSummaryRequest};
pub use router::{CareerTool, RouteDecision};
pub use scoring::{ResumeInput, ScoreResult, ScoringOutcome};
