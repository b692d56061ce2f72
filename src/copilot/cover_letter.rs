// src/copilot/cover_letter.rs
use super::{extract, format};
use crate::llm::{LanguageModel, COVER_LETTER_MAX_TOKENS};
use crate::utils::{non_blank, word_count};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

pub const DEFAULT_TONE: &str = "professional";

#[derive(Debug, Clone, Default)]
pub struct CoverLetterRequest {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub job_description: Option<String>,
    pub resume: Option<String>,
    pub tone: Option<String>,
    /// Free text the title and company can be pulled from
    pub message: Option<String>,
}

impl CoverLetterRequest {
    pub fn tone(&self) -> &str {
        non_blank(self.tone.as_deref()).unwrap_or(DEFAULT_TONE)
    }

    /// Explicit title, else one found in the message
    pub fn resolved_title(&self) -> Option<String> {
        non_blank(self.job_title.as_deref())
            .map(str::to_string)
            .or_else(|| non_blank(self.message.as_deref()).and_then(extract::job_title))
    }

    pub fn resolved_company(&self) -> Option<String> {
        non_blank(self.company_name.as_deref())
            .map(str::to_string)
            .or_else(|| non_blank(self.message.as_deref()).and_then(extract::company_name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterAnalysis {
    pub word_count: usize,
    pub character_count: usize,
    pub tone: String,
    pub job_title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverLetterDraft {
    pub cover_letter: String,
    pub analysis: CoverLetterAnalysis,
    pub template: bool,
    pub tool_used: &'static str,
    /// Markdown ready for the chat window
    pub response: String,
}

/// Draft with the model when there is one; templates cover the rest.
/// `title` and `company` are already resolved; `None` leaves placeholders in the template.
pub async fn draft(
    model: Option<&dyn LanguageModel>,
    title: Option<&str>,
    company: Option<&str>,
    request: &CoverLetterRequest,
) -> CoverLetterDraft {
    let tone = request.tone();

    let Some(model) = model else {
        info!("No API key, returning cover letter template");
        return template_draft(title, company, tone, "cover_letter_template", None);
    };

    let job_title = title.unwrap_or("the position");
    let company_name = company.unwrap_or("the company");
    let prompt = prompt(job_title, company_name, request, tone);

    match model.complete(&prompt, COVER_LETTER_MAX_TOKENS).await {
        Ok(text) => {
            let cover_letter = text.trim().to_string();
            let analysis = analyze(&cover_letter, tone, job_title, company_name, Some(model.name()));
            info!(
                "Generated cover letter for {} at {} ({} words)",
                job_title, company_name, analysis.word_count
            );
            CoverLetterDraft {
                response: format::cover_letter(&cover_letter, &analysis),
                cover_letter,
                analysis,
                template: false,
                tool_used: "draft_cover_letter",
            }
        }
        Err(e) => {
            error!("Cover letter generation failed: {}", e);
            template_draft(
                title,
                company,
                tone,
                "cover_letter_template_fallback",
                Some(e.to_string()),
            )
        }
    }
}

fn template_draft(
    title: Option<&str>,
    company: Option<&str>,
    tone: &str,
    tool_used: &'static str,
    failure: Option<String>,
) -> CoverLetterDraft {
    let cover_letter = template(title, company);
    let analysis = analyze(
        &cover_letter,
        tone,
        title.unwrap_or("[Job Title]"),
        company.unwrap_or("[Company Name]"),
        None,
    );
    CoverLetterDraft {
        response: format::cover_letter_template(&cover_letter, &analysis, failure.as_deref()),
        cover_letter,
        analysis,
        template: true,
        tool_used,
    }
}

fn analyze(
    text: &str,
    tone: &str,
    job_title: &str,
    company: &str,
    model: Option<&str>,
) -> CoverLetterAnalysis {
    CoverLetterAnalysis {
        word_count: word_count(text),
        character_count: text.chars().count(),
        tone: tone.to_string(),
        job_title: job_title.to_string(),
        company: company.to_string(),
        model: model.map(str::to_string),
        generated_at: Utc::now(),
    }
}

fn prompt(job_title: &str, company: &str, request: &CoverLetterRequest, tone: &str) -> String {
    let description = non_blank(request.job_description.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} position at {}", job_title, company));
    let background = non_blank(request.resume.as_deref())
        .unwrap_or("Professional with relevant experience in the field");

    format!(
        r#"Write a {tone} cover letter for the following job application:

Job Title: {job_title}
Company: {company}
Job Description: {description}

Applicant's Resume/Background:
{background}

Requirements:
- Keep it concise (250-400 words)
- Match the {tone} tone
- Highlight relevant experience from the background
- Show enthusiasm for the role and company
- Include a strong opening and closing
- Make it personalized and specific to this job and company
- Start with "Dear Hiring Manager," and end with "Best regards,"

Write only the cover letter content, no additional formatting or explanations."#
    )
}

/// Bracketed template; known title and company are filled in
pub fn template(title: Option<&str>, company: Option<&str>) -> String {
    let role = title.unwrap_or("[Job Title]");
    let company = company.unwrap_or("[Company Name]");

    format!(
        r#"Dear Hiring Manager,

I am writing to express my strong interest in the {role} position at {company}. With my background in [Your Field/Industry], I am excited about the opportunity to contribute to your team's success.

In my previous role as [Your Previous Position], I have developed skills in [Relevant Skill 1], [Relevant Skill 2], and [Relevant Skill 3]. These experiences have prepared me well for the challenges and opportunities that come with the {role} role.

What particularly attracts me to {company} is [specific company values, mission or projects that appeal to you]. I am impressed by [a specific company achievement or product] and would love to contribute to [a goal or project relevant to the role].

I am confident that my passion for [Industry/Field] and my track record in [Specific achievement or skill] make me a strong candidate for this position. I would welcome the opportunity to discuss how my background can contribute to {company}'s continued success.

Thank you for considering my application. I look forward to hearing from you soon.

Best regards,
[Your Name]"#
    )
}
