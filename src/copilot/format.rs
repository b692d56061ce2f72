// src/copilot/format.rs
//! Markdown rendering for chat replies

use super::cover_letter::CoverLetterAnalysis;
use super::linkedin_post::PostAnalysis;
use super::scoring::ScoringOutcome;
use crate::jobs::{AggregatedJobs, JobQuery};
use crate::utils::preview;

pub fn job_list(result: &AggregatedJobs) -> String {
    if result.jobs.is_empty() {
        return no_jobs(&result.metadata.query);
    }

    let entries = result
        .jobs
        .iter()
        .enumerate()
        .map(|(i, job)| {
            let mut entry = format!(
                "{}. **{}** at {}\n   📍 {}\n   🔗 {}\n   📊 Source: {}",
                i + 1,
                job.title,
                job.company,
                job.location,
                job.url,
                job.source
            );
            if let Some(salary) = &job.salary {
                entry.push_str(&format!("\n   💰 {}", salary));
            }
            entry.push_str(&format!("\n   📝 {}", preview(&job.description, 100)));
            entry
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let providers = result
        .metadata
        .providers
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "## 🔍 Found {} Jobs\n\n{}\n\n**Live Sources:** {}\n**LinkedIn Jobs:** {}\n**Total Providers:** {}\n\nWould you like me to score these against your resume or draft a cover letter for one of them?",
        result.jobs.len(),
        entries,
        providers,
        result.metadata.linkedin_jobs,
        result.metadata.providers.len()
    )
}

pub fn no_jobs(query: &JobQuery) -> String {
    format!(
        "🔍 **Job Search Results**\n\nI searched for \"{}\" but couldn't find any jobs right now. This might be due to:\n\n- API rate limits\n- Network issues\n- Very specific search terms\n\nTry different keywords like \"developer\", \"engineer\" or \"designer\".",
        query.keywords
    )
}

pub fn score_list(outcome: &ScoringOutcome) -> String {
    let entries = outcome
        .scores
        .iter()
        .enumerate()
        .map(|(i, score)| {
            let skills = if score.matching_skills.is_empty() {
                "none found".to_string()
            } else {
                score.matching_skills.join(", ")
            };
            format!(
                "{}. **{}** at {}\n   📊 Overall Score: {}%\n   🎯 Skills Match: {}%\n   ✅ Matching Skills: {}\n   💡 {}",
                i + 1,
                score.job_title,
                score.company,
                score.overall_score,
                score.skills_match,
                skills,
                score.explanation
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "## 📊 Resume Compatibility Scores\n\n{}\n\n**Analysis powered by:** {}",
        entries,
        outcome.service_used.as_str()
    )
}

pub fn cover_letter(text: &str, analysis: &CoverLetterAnalysis) -> String {
    format!(
        "## ✍️ AI-Generated Cover Letter\n\n{}\n\n---\n**Analysis:**\n• Word Count: {}\n• Character Count: {}\n• Tone: {}\n• Job Title: {}\n• Company: {}\n• AI Model: {}",
        text,
        analysis.word_count,
        analysis.character_count,
        analysis.tone,
        analysis.job_title,
        analysis.company,
        analysis.model.as_deref().unwrap_or("unknown")
    )
}

pub fn cover_letter_template(
    text: &str,
    analysis: &CoverLetterAnalysis,
    failure: Option<&str>,
) -> String {
    let note = match failure {
        Some(error) => format!(
            "**Note:** AI generation failed, so here is a template instead.\n**Error:** {}",
            error
        ),
        None => "*Add your Anthropic API key to generate a fully personalized cover letter.*"
            .to_string(),
    };

    format!(
        "## ✍️ Cover Letter Template\n\n{}\n\n---\n**📝 Template Usage:**\n• Replace all [bracketed placeholders] with your own details\n• Tailor the skills to the {} role\n• Research {} and mention something specific\n• Keep the {} tone and structure\n\n{}",
        text, analysis.job_title, analysis.company, analysis.tone, note
    )
}

pub fn linkedin_post(text: &str, analysis: &PostAnalysis) -> String {
    format!(
        "## 📱 AI-Generated LinkedIn Post\n\n{}\n\n---\n**Analysis:**\n{}\n• AI Model: {}",
        text,
        post_stats(analysis),
        analysis.model.as_deref().unwrap_or("unknown")
    )
}

pub fn linkedin_post_template(text: &str, analysis: &PostAnalysis, failure: Option<&str>) -> String {
    let note = match failure {
        Some(error) => format!(
            "**Note:** AI generation failed, so here is a template instead.\n**Error:** {}",
            error
        ),
        None => "*Add your Anthropic API key for AI-written posts tuned for engagement.*".to_string(),
    };

    format!(
        "## 📱 LinkedIn Post Template\n\n{}\n\n---\n**Analysis:**\n{}\n\nReplace the [bracketed] lines with your own story.\n\n{}",
        text,
        post_stats(analysis),
        note
    )
}

fn post_stats(analysis: &PostAnalysis) -> String {
    let hashtags = if analysis.hashtags.is_empty() {
        String::new()
    } else {
        format!(" ({})", analysis.hashtags.join(", "))
    };
    format!(
        "• Character Count: {}/{}\n• Word Count: {}\n• Hashtags: {}{}\n• Estimated Engagement Score: {}%",
        analysis.character_count,
        analysis.max_length,
        analysis.word_count,
        analysis.hashtag_count,
        hashtags,
        analysis.engagement_score
    )
}

pub fn general_answer(text: &str) -> String {
    format!("🚀 **AI Career Assistant**\n\n{}", text.trim())
}

pub fn help() -> String {
    "🚀 **AI Career Assistant**\n\nI can help you with:\n\n\
     🔍 **Job Search** - \"Find software engineer jobs in NYC\"\n\
     📊 **Resume Scoring** - \"Score my resume against these listings\"\n\
     ✍️ **Cover Letters** - \"Write a cover letter for Software Engineer at Google\"\n\
     📱 **LinkedIn Posts** - \"Create a post about my new project\"\n\n\
     Jobs come live from LinkedIn, RemoteOK and The Muse (plus Adzuna and Jooble when configured).\n\n\
     *Add your Anthropic API key for AI-powered responses!*\n\nWhat would you like help with?"
        .to_string()
}

pub fn missing_resume() -> String {
    "📊 **Resume Scoring**\n\nTo score jobs against your resume, I need your resume content. \
     Please paste your resume text or describe your experience, skills and background."
        .to_string()
}

pub fn missing_jobs() -> String {
    "📊 **Resume Scoring**\n\nI need job listings to score against your resume. You can either:\n\n\
     1. First search for jobs using \"Find [job type] jobs\"\n\
     2. Call the scoring endpoint with the job descriptions you want analyzed\n\n\
     Would you like me to search for jobs first?"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::copilot::scoring::{ScoreResult, ScoringService};
    use crate::jobs::types::SearchMetadata;
    use crate::jobs::{JobPosting, JobSourceKind};

    fn result(jobs: Vec<JobPosting>) -> AggregatedJobs {
        AggregatedJobs {
            metadata: SearchMetadata {
                total_jobs: jobs.len(),
                providers: vec![JobSourceKind::RemoteOk],
                providers_attempted: vec![JobSourceKind::RemoteOk],
                failures: vec![],
                linkedin_jobs: 0,
                query: JobQuery::new("rust"),
            },
            jobs,
        }
    }

    #[test]
    fn test_job_list_numbers_and_previews() {
        let job = JobPosting::new("remoteok_1", "Rust Dev", "Oxide", JobSourceKind::RemoteOk)
            .with_location("Remote")
            .with_url("https://remoteok.io/l/1")
            .with_description("x".repeat(150));

        let text = job_list(&result(vec![job]));

        assert!(text.starts_with("## 🔍 Found 1 Jobs"));
        assert!(text.contains("1. **Rust Dev** at Oxide"));
        assert!(text.contains("📊 Source: remoteok"));
        assert!(text.contains(&format!("📝 {}...", "x".repeat(100))));
        assert!(text.contains("**Live Sources:** remoteok"));
    }

    #[test]
    fn test_empty_job_list() {
        assert!(job_list(&result(vec![])).contains("couldn't find any jobs"));
    }

    #[test]
    fn test_score_list() {
        let outcome = ScoringOutcome {
            scores: vec![ScoreResult {
                job_id: "a".into(),
                job_title: "Rust Dev".into(),
                company: "Oxide".into(),
                overall_score: 88,
                skills_match: 75,
                matching_skills: vec![],
                explanation: "Good overlap".into(),
                recommendations: vec![],
            }],
            service_used: ScoringService::KeywordFallback,
        };
        let text = score_list(&outcome);
        assert!(text.contains("Overall Score: 88%"));
        assert!(text.contains("Matching Skills: none found"));
        assert!(text.ends_with("keyword-fallback"));
    }
}
