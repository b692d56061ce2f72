// src/copilot/extract.rs
//! Best-effort parameter extraction from free-text chat messages

use regex::Regex;
use std::sync::OnceLock;

const JOB_KEYWORDS: &[&str] = &[
    "software", "engineer", "developer", "programmer", "frontend", "backend", "fullstack",
    "react", "javascript", "python", "java", "rust", "data", "scientist", "analyst",
    "designer", "manager", "product", "devops",
];

const LOCATIONS: &[&str] = &[
    "remote",
    "san francisco",
    "new york",
    "seattle",
    "austin",
    "boston",
    "chicago",
    "denver",
    "los angeles",
    "london",
    "berlin",
];

const LOCATION_ALIASES: &[(&str, &str)] = &[
    ("nyc", "new york"),
    ("sf", "san francisco"),
    ("la", "los angeles"),
];

const JOB_TITLES: &[&str] = &[
    "software engineer",
    "data scientist",
    "product manager",
    "developer",
    "programmer",
    "architect",
    "manager",
    "designer",
];

const KNOWN_COMPANIES: &[&str] = &[
    "Netflix", "Google", "Microsoft", "Amazon", "Apple", "Meta", "Tesla", "Spotify", "Uber",
    "Airbnb", "Notion", "Plaid", "Stripe",
];

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "me", "my",
];

const ROLE_WORDS: &[&str] = &[
    "engineer", "developer", "scientist", "manager", "designer", "programmer", "architect",
    "analyst", "director", "lead",
];

const RESUME_MARKERS: &[&str] = &[
    "experience",
    "education",
    "skills",
    "work history",
    "background",
];

fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn words(message: &str) -> impl Iterator<Item = String> + '_ {
    message
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

/// Known job keywords found in the message, or "software engineer"
pub fn job_keywords(message: &str) -> String {
    let mut found: Vec<String> = Vec::new();
    for word in words(message) {
        if JOB_KEYWORDS.contains(&word.as_str()) && !found.contains(&word) {
            found.push(word);
        }
    }

    if found.is_empty() {
        "software engineer".to_string()
    } else {
        found.join(" ")
    }
}

pub fn location(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    if let Some(place) = LOCATIONS.iter().find(|place| lower.contains(**place)) {
        return Some(place.to_string());
    }

    let tokens: Vec<String> = words(message).collect();
    LOCATION_ALIASES
        .iter()
        .find(|(alias, _)| tokens.iter().any(|t| t == alias))
        .map(|(_, place)| place.to_string())
}

pub fn job_title(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    if let Some(title) = JOB_TITLES.iter().find(|title| lower.contains(**title)) {
        return Some(title.to_string());
    }

    static FOR_PHRASE: OnceLock<Option<Regex>> = OnceLock::new();
    static ROLE_PHRASE: OnceLock<Option<Regex>> = OnceLock::new();

    let patterns = [
        cached(
            &FOR_PHRASE,
            r"(?i)(?:cover letter for|letter for|apply for|position for|role of|job as)\s+(?:an?\s+|the\s+)?([a-z][a-z\s]*?)(?:\s+at\b|\s+with\b|\s+position\b|\s+role\b|[,.!?]|$)",
        ),
        cached(
            &ROLE_PHRASE,
            r"(?i)(?:^|\bthe\s+|\ban?\s+)([a-z][a-z\s]*?)\s+(?:position|role|opening)\b",
        ),
    ];

    patterns.into_iter().flatten().find_map(|re| {
        let title = re.captures(message)?.get(1)?.as_str();
        let title = crate::utils::clean_text(title);
        (!title.is_empty() && !STOP_WORDS.contains(&title.to_lowercase().as_str()))
            .then_some(title)
    })
}

pub fn company_name(message: &str) -> Option<String> {
    static AFTER_PREPOSITION: OnceLock<Option<Regex>> = OnceLock::new();
    let re = cached(
        &AFTER_PREPOSITION,
        r"\b(at|with|for)\s+([A-Z][\w&.'-]*(?:\s+[A-Z&][\w&.'-]*)*)",
    );

    if let Some(re) = re {
        let mut candidates: Vec<(u8, String)> = re
            .captures_iter(message)
            .filter_map(|caps| {
                let rank = match caps.get(1)?.as_str() {
                    "at" => 0,
                    "with" => 1,
                    _ => 2,
                };
                Some((rank, tidy_company(caps.get(2)?.as_str())?))
            })
            .collect();
        candidates.sort_by_key(|(rank, _)| *rank);
        if let Some((_, company)) = candidates.into_iter().next() {
            return Some(company);
        }
    }

    let tokens: Vec<String> = words(message).collect();
    KNOWN_COMPANIES
        .iter()
        .find(|name| tokens.iter().any(|t| *t == name.to_lowercase()))
        .map(|name| name.to_string())
}

fn tidy_company(raw: &str) -> Option<String> {
    let mut parts: Vec<&str> = raw
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | '!' | '?'))
        .split_whitespace()
        .collect();

    while let Some(last) = parts.last() {
        let lower = last.to_lowercase();
        if matches!(lower.as_str(), "position" | "role" | "job" | "company" | "team") {
            parts.pop();
        } else {
            break;
        }
    }

    let company = parts.join(" ");
    let lower = company.to_lowercase();
    if company.is_empty()
        || STOP_WORDS.contains(&lower.as_str())
        || lower.split_whitespace().any(|w| ROLE_WORDS.contains(&w))
    {
        return None;
    }
    Some(company)
}

/// What a LinkedIn post request wants to talk about
pub fn topic(message: &str) -> Option<String> {
    static POST_ABOUT: OnceLock<Option<Regex>> = OnceLock::new();
    static LINKEDIN_ABOUT: OnceLock<Option<Regex>> = OnceLock::new();

    let patterns = [
        cached(&POST_ABOUT, r"(?i)post about\s+(.+)"),
        cached(&LINKEDIN_ABOUT, r"(?i)linkedin.*?(?:post|content).*?\b(?:about|on)\s+(.+)"),
    ];

    patterns.into_iter().flatten().find_map(|re| {
        let topic = re.captures(message)?.get(1)?.as_str().trim();
        (!topic.is_empty()).then(|| topic.to_string())
    })
}

/// The message itself when it reads like pasted resume content
pub fn resume_from_message(message: &str) -> Option<&str> {
    let lower = message.to_lowercase();
    let looks_like_resume = RESUME_MARKERS.iter().any(|m| lower.contains(m));
    (looks_like_resume && message.chars().count() > 100).then_some(message)
}

pub fn hashtags(text: &str) -> Vec<String> {
    static HASHTAG: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&HASHTAG, r"#\w+")
        .map(|re| re.find_iter(text).map(|m| m.as_str().to_string()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_keywords() {
        assert_eq!(job_keywords("Find Python data jobs, python only"), "python data");
        assert_eq!(job_keywords("find me something"), "software engineer");
    }

    #[test]
    fn test_location_and_aliases() {
        assert_eq!(location("Remote rust jobs").as_deref(), Some("remote"));
        assert_eq!(location("jobs in NYC please").as_deref(), Some("new york"));
        assert_eq!(location("developer jobs in SF").as_deref(), Some("san francisco"));
        // "la" inside another word is not Los Angeles
        assert_eq!(location("find a large salary"), None);
    }

    #[test]
    fn test_job_title() {
        assert_eq!(
            job_title("Write a cover letter for the Data Scientist role").as_deref(),
            Some("data scientist")
        );
        assert_eq!(
            job_title("cover letter for Senior Rust Engineer at Oxide").as_deref(),
            Some("Senior Rust Engineer")
        );
        assert_eq!(
            job_title("I want to apply for a technical writer position").as_deref(),
            Some("technical writer")
        );
        assert_eq!(job_title("write me a letter"), None);
    }

    #[test]
    fn test_company_name() {
        assert_eq!(
            company_name("cover letter for Software Engineer at Google").as_deref(),
            Some("Google")
        );
        assert_eq!(
            company_name("Write a letter for the role at Acme Robotics.").as_deref(),
            Some("Acme Robotics")
        );
        assert_eq!(
            company_name("a cover letter for a data scientist role with stripe").as_deref(),
            Some("Stripe")
        );
        assert_eq!(company_name("write a cover letter"), None);
    }

    #[test]
    fn test_topic() {
        assert_eq!(
            topic("Create a post about shipping our Rust rewrite").as_deref(),
            Some("shipping our Rust rewrite")
        );
        assert_eq!(
            topic("Draft LinkedIn content on remote onboarding").as_deref(),
            Some("remote onboarding")
        );
        assert_eq!(topic("write a linkedin post"), None);
    }

    #[test]
    fn test_resume_from_message() {
        let resume = "Score these jobs. My experience: eight years building distributed systems in Rust and Go, \
                      plus a computer science degree and a lot of on-call.";
        assert_eq!(resume_from_message(resume), Some(resume));
        assert_eq!(resume_from_message("score my resume"), None);
    }

    #[test]
    fn test_hashtags() {
        assert_eq!(
            hashtags("Shipped it! #rust #OpenSource and more"),
            vec!["#rust", "#OpenSource"]
        );
        assert!(hashtags("no tags").is_empty());
    }
}
