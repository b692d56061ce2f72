// src/copilot/scoring.rs
use super::error::ValidationError;
use crate::jobs::JobPosting;
use crate::llm::{extract_json, LanguageModel, SCORING_MAX_TOKENS};
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};

const RECOMMENDATIONS: [&str; 3] = [
    "Highlight relevant experience in your resume",
    "Consider adding missing skills mentioned in the job description",
    "Tailor your resume to include industry-specific keywords",
];

/// Resume text, optionally with an explicit skills list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResumeInput {
    Text(String),
    Structured {
        content: String,
        #[serde(default)]
        skills: Option<Vec<String>>,
    },
}

impl ResumeInput {
    pub fn content(&self) -> &str {
        match self {
            Self::Text(content) | Self::Structured { content, .. } => content,
        }
    }

    pub fn skills(&self) -> &[String] {
        match self {
            Self::Structured {
                skills: Some(skills),
                ..
            } => skills,
            _ => &[],
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content().trim().is_empty()
    }
}

impl From<&str> for ResumeInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub job_id: String,
    pub job_title: String,
    pub company: String,
    pub overall_score: u32,
    pub skills_match: u32,
    pub matching_skills: Vec<String>,
    pub explanation: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringService {
    #[serde(rename = "claude-ai")]
    ClaudeAi,
    #[serde(rename = "keyword-fallback")]
    KeywordFallback,
}

impl ScoringService {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClaudeAi => "claude-ai",
            Self::KeywordFallback => "keyword-fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringOutcome {
    pub scores: Vec<ScoreResult>,
    pub service_used: ScoringService,
}

/// Score with the model when there is one, otherwise (or when its answer is unusable) by keyword overlap
pub async fn score_jobs(
    model: Option<&dyn LanguageModel>,
    resume: &ResumeInput,
    jobs: &[JobPosting],
) -> Result<ScoringOutcome> {
    if jobs.is_empty() {
        return Err(ValidationError::no_jobs().into());
    }
    if resume.is_blank() {
        return Err(ValidationError::missing_resume().into());
    }

    if let Some(model) = model {
        match score_with_llm(model, resume, jobs).await {
            Ok(scores) => {
                info!("Scored {} jobs with {}", scores.len(), model.name());
                return Ok(ScoringOutcome {
                    scores,
                    service_used: ScoringService::ClaudeAi,
                });
            }
            Err(e) => warn!("LLM scoring unusable, falling back to keywords: {}", e),
        }
    }

    let mut rng = StdRng::from_entropy();
    Ok(ScoringOutcome {
        scores: keyword_scores(resume, jobs, &mut rng),
        service_used: ScoringService::KeywordFallback,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmScore {
    #[serde(default)]
    job_id: Option<serde_json::Value>,
    #[serde(default)]
    job_title: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    overall_score: f64,
    #[serde(default)]
    skills_match: f64,
    #[serde(default)]
    matching_skills: Vec<String>,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    recommendations: Vec<String>,
}

pub async fn score_with_llm(
    model: &dyn LanguageModel,
    resume: &ResumeInput,
    jobs: &[JobPosting],
) -> Result<Vec<ScoreResult>> {
    let reply = model
        .complete(&scoring_prompt(resume, jobs), SCORING_MAX_TOKENS)
        .await?;

    let raw: Vec<LlmScore> = serde_json::from_value(extract_json(&reply)?)?;
    if raw.is_empty() {
        anyhow::bail!("Model returned no scores");
    }

    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(i, score)| {
            let job = jobs.get(i);
            ScoreResult {
                job_id: score
                    .job_id
                    .and_then(|v| match v {
                        serde_json::Value::String(s) => Some(s),
                        serde_json::Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .or_else(|| job.map(|j| j.id.clone()))
                    .unwrap_or_default(),
                job_title: score
                    .job_title
                    .or_else(|| job.map(|j| j.title.clone()))
                    .unwrap_or_default(),
                company: score
                    .company
                    .or_else(|| job.map(|j| j.company.clone()))
                    .unwrap_or_default(),
                overall_score: clamp_score(score.overall_score),
                skills_match: clamp_score(score.skills_match),
                matching_skills: score.matching_skills,
                explanation: score.explanation,
                recommendations: score.recommendations,
            }
        })
        .collect())
}

fn clamp_score(value: f64) -> u32 {
    value.round().clamp(0.0, 100.0) as u32
}

/// Distinct lowercase tokens longer than three characters
fn tokens(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| w.chars().count() > 3)
        .map(str::to_string)
        .collect()
}

/// Token-overlap heuristic with a little jitter so ties do not look identical
pub fn keyword_scores<R: Rng>(
    resume: &ResumeInput,
    jobs: &[JobPosting],
    rng: &mut R,
) -> Vec<ScoreResult> {
    let resume_tokens = tokens(resume.content());
    let skills = resume.skills();

    jobs.iter()
        .map(|job| {
            let job_text = format!("{} {}", job.title, job.description);
            let job_tokens = tokens(&job_text);

            let mut common: Vec<&String> = job_tokens.intersection(&resume_tokens).collect();
            common.sort();

            let keyword_match =
                (common.len() as f64 / job_tokens.len().max(1) as f64 * 1000.0).min(100.0);

            let (matching_skills, skills_match) = if skills.is_empty() {
                let matched: Vec<String> = common.iter().take(10).map(|t| t.to_string()).collect();
                (matched, keyword_match)
            } else {
                let lower_text = job_text.to_lowercase();
                let matched: Vec<String> = skills
                    .iter()
                    .filter(|s| lower_text.contains(&s.to_lowercase()))
                    .cloned()
                    .collect();
                let ratio = matched.len() as f64 / skills.len() as f64 * 100.0;
                (matched, ratio.min(100.0))
            };

            let jitter: f64 = rng.gen_range(0.0..10.0);
            let overall = ((skills_match + keyword_match) / 2.0 + jitter).min(100.0);

            ScoreResult {
                job_id: job.id.clone(),
                job_title: job.title.clone(),
                company: job.company.clone(),
                overall_score: clamp_score(overall),
                skills_match: clamp_score(skills_match),
                explanation: format!(
                    "Based on {} matching skills and {} common keywords",
                    matching_skills.len(),
                    common.len()
                ),
                matching_skills,
                recommendations: RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
            }
        })
        .collect()
}

fn scoring_prompt(resume: &ResumeInput, jobs: &[JobPosting]) -> String {
    let listing = jobs
        .iter()
        .enumerate()
        .map(|(i, job)| {
            format!(
                "{}. [{}] {} at {}\n{}",
                i + 1,
                job.id,
                job.title,
                job.company,
                job.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"You are an expert career counselor. Score the compatibility between this resume and the following jobs on a scale of 0-100.

Resume:
{}

Jobs to score:
{}

For each job, provide a JSON object with:
- jobId: the job ID shown in brackets
- jobTitle: the job title
- company: the company name
- overallScore: compatibility score (0-100)
- skillsMatch: skills match percentage (0-100)
- matchingSkills: array of matching skills/keywords
- explanation: brief explanation of the score
- recommendations: array of 2-3 improvement suggestions

Respond with a JSON array of these objects and nothing else."#,
        resume.content(),
        listing
    )
}
