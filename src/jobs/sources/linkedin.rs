// src/jobs/sources/linkedin.rs
use super::{secs, JobSource};
use crate::core::config_manager::LinkedInConfig;
use crate::core::ServiceClient;
use crate::jobs::types::{JobPosting, JobQuery, JobSourceKind};
use crate::utils::clean_text;
use anyhow::Result;
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{info, warn};

const SEARCH_ENDPOINT: &str = "/jobs/search";
const LINKEDIN_ORIGIN: &str = "https://www.linkedin.com";

const CARD_SELECTOR: &str = ".base-card, .job-search-card, .result-card";

const TITLE_SELECTORS: [&str; 5] = [
    ".base-search-card__title",
    ".job-search-card__title",
    ".result-card__title",
    "h3",
    ".sr-only",
];

const COMPANY_SELECTORS: [&str; 4] = [
    ".base-search-card__subtitle",
    ".job-search-card__subtitle",
    ".result-card__subtitle",
    ".hidden-nested-link",
];

const LOCATION_SELECTORS: [&str; 2] = [
    ".job-search-card__location",
    ".job-result-card__location",
];

const HEURISTIC_WORDS: [&str; 3] = ["engineer", "developer", "software"];

pub struct LinkedInSource {
    client: ServiceClient,
    timeout: Duration,
}

impl LinkedInSource {
    pub fn new(config: &LinkedInConfig) -> Result<Self> {
        Ok(Self {
            client: ServiceClient::new(&config.base_url, &config.user_agent, config.timeout_seconds)?,
            timeout: secs(config.timeout_seconds),
        })
    }

    async fn fetch_page(&self, query: &JobQuery) -> Result<String> {
        let params = [
            ("keywords", query.keywords.clone()),
            ("location", query.location.clone()),
            ("f_TPR", "r86400".to_string()), // past 24 hours
            ("f_JT", "F".to_string()),       // full-time
            ("start", "0".to_string()),
        ];
        let headers = [
            (
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
            ("Accept-Language", "en-US,en;q=0.5"),
            ("DNT", "1"),
            ("Upgrade-Insecure-Requests", "1"),
        ];

        self.client.get_text(SEARCH_ENDPOINT, &params, &headers).await
    }
}

#[async_trait]
impl JobSource for LinkedInSource {
    fn kind(&self) -> JobSourceKind {
        JobSourceKind::LinkedIn
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn enabled_for(&self, query: &JobQuery) -> bool {
        query.include_linkedin
    }

    async fn fetch(&self, query: &JobQuery, limit: usize) -> Result<Vec<JobPosting>> {
        info!("Scraping LinkedIn jobs for: {}", query.keywords);

        match self.fetch_page(query).await {
            Ok(html) => {
                let jobs = parse_search_page(&html, query, limit);
                info!("Extracted {} LinkedIn job entries", jobs.len());
                Ok(jobs)
            }
            Err(e) => {
                warn!("LinkedIn scraping error: {}", e);
                Ok(vec![error_entry(query, &e.to_string())])
            }
        }
    }
}

/// Parse a LinkedIn search page: card selectors, then a text heuristic, then a search link
pub fn parse_search_page(html: &str, query: &JobQuery, limit: usize) -> Vec<JobPosting> {
    let document = Html::parse_document(html);

    let mut jobs = parse_job_cards(&document, query, limit);

    if jobs.is_empty() {
        info!("No LinkedIn job cards matched, trying text heuristic");
        jobs = parse_by_heuristic(&document, query, limit);
    }

    if jobs.is_empty() {
        jobs.push(search_entry(query));
    }

    jobs
}

fn parse_job_cards(document: &Html, query: &JobQuery, limit: usize) -> Vec<JobPosting> {
    let Ok(card_selector) = Selector::parse(CARD_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&card_selector)
        .take(limit)
        .filter_map(|card| parse_card(card, query))
        .collect()
}

fn parse_card(card: ElementRef<'_>, query: &JobQuery) -> Option<JobPosting> {
    let title = find_text_by_selectors(card, &TITLE_SELECTORS)?;
    let company = find_text_by_selectors(card, &COMPANY_SELECTORS)?;
    let location = find_text_by_selectors(card, &LOCATION_SELECTORS)
        .unwrap_or_else(|| fallback_location(query, "Not specified"));

    let url = first_link(card)
        .map(|href| absolute_url(&href))
        .unwrap_or_else(|| search_url(query, false));

    let description = format!(
        "{} position at {}. Location: {}. Apply directly through LinkedIn for more details.",
        title, company, location
    );

    let mut job = JobPosting::new(
        format!("linkedin_{}", uuid::Uuid::new_v4().simple()),
        title,
        company,
        JobSourceKind::LinkedIn,
    )
    .with_location(location)
    .with_description(description)
    .with_url(url);
    job.scraped = Some(true);
    Some(job)
}

fn parse_by_heuristic(document: &Html, query: &JobQuery, limit: usize) -> Vec<JobPosting> {
    let Ok(selector) = Selector::parse("li, div") else {
        return Vec::new();
    };

    let mut jobs = Vec::new();
    for element in document.select(&selector) {
        if jobs.len() >= limit {
            break;
        }

        let raw = element.text().collect::<String>();
        let lower = raw.to_lowercase();
        if !HEURISTIC_WORDS.iter().any(|word| lower.contains(word)) {
            continue;
        }

        let trimmed_len = raw.trim().chars().count();
        if !(20..=200).contains(&trimmed_len) {
            continue;
        }

        let lines: Vec<&str> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.len() < 2 {
            continue;
        }

        let (title, company) = (lines[0], lines[1]);
        if title.chars().count() >= 100 || company.chars().count() >= 100 {
            continue;
        }

        let mut job = JobPosting::new(
            format!("linkedin_alt_{}", uuid::Uuid::new_v4().simple()),
            title,
            company,
            JobSourceKind::LinkedIn,
        )
        .with_location(fallback_location(query, "LinkedIn"))
        .with_description(format!(
            "Found on LinkedIn: {} at {}. Visit LinkedIn directly for full details.",
            title, company
        ))
        .with_url(search_url(query, false));
        job.scraped = Some(true);
        jobs.push(job);
    }

    jobs
}

fn search_entry(query: &JobQuery) -> JobPosting {
    let mut job = JobPosting::new(
        format!("linkedin_search_{}", uuid::Uuid::new_v4().simple()),
        format!("LinkedIn Search: {}", query.keywords),
        "LinkedIn Jobs",
        JobSourceKind::LinkedIn,
    )
    .with_location(fallback_location(query, "Various Locations"))
    .with_description(format!(
        "Direct search results for \"{}\" on LinkedIn. Click to view all available positions on LinkedIn's job board.",
        query.keywords
    ))
    .with_url(search_url(query, true));
    job.scraped = Some(true);
    job
}

/// Placeholder returned when the page could not be fetched at all
pub fn error_entry(query: &JobQuery, error: &str) -> JobPosting {
    let mut job = JobPosting::new(
        format!("linkedin_error_{}", uuid::Uuid::new_v4().simple()),
        format!("LinkedIn Search: {}", query.keywords),
        "LinkedIn Jobs",
        JobSourceKind::LinkedIn,
    )
    .with_location(fallback_location(query, "Various Locations"))
    .with_description(format!(
        "LinkedIn job search for \"{}\". Direct search recommended due to scraping limitations ({}). Visit LinkedIn for the most current job listings.",
        query.keywords, error
    ))
    .with_url(search_url(query, true));
    job.scraped = Some(false);
    job
}

fn find_text_by_selectors(scope: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = scope.select(&selector).next() {
                let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }
    None
}

fn first_link(scope: ElementRef<'_>) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;
    if scope.value().name() == "a" {
        if let Some(href) = scope.value().attr("href") {
            return Some(href.to_string());
        }
    }
    scope
        .select(&selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

fn absolute_url(href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", LINKEDIN_ORIGIN, href)
    }
}

fn fallback_location(query: &JobQuery, default: &str) -> String {
    if query.location.is_empty() {
        default.to_string()
    } else {
        query.location.clone()
    }
}

fn search_url(query: &JobQuery, with_location: bool) -> String {
    let mut url = format!(
        "{}{}?keywords={}",
        LINKEDIN_ORIGIN,
        SEARCH_ENDPOINT,
        encode(&query.keywords)
    );
    if with_location {
        url.push_str(&format!("&location={}", encode(&query.location)));
    }
    url
}

fn encode(value: &str) -> String {
    reqwest::Url::parse_with_params("http://x/", &[("v", value)])
        .ok()
        .and_then(|u| u.query().map(|q| q.trim_start_matches("v=").to_string()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARDS_HTML: &str = r#"
<html><body><ul>
  <li><div class="base-card">
    <a class="base-card__full-link" href="/jobs/view/111"></a>
    <h3 class="base-search-card__title"> Senior Rust Engineer </h3>
    <h4 class="base-search-card__subtitle"><a>Ferrous Systems</a></h4>
    <span class="job-search-card__location">Berlin, Germany</span>
  </div></li>
  <li><div class="base-card">
    <a href="https://www.linkedin.com/jobs/view/222"></a>
    <h3 class="base-search-card__title">Backend Developer</h3>
    <h4 class="base-search-card__subtitle">Acme</h4>
  </div></li>
  <li><div class="base-card">
    <h3 class="base-search-card__title">Card Without Company</h3>
  </div></li>
</ul></body></html>"#;

    #[test]
    fn test_parses_job_cards() {
        let query = JobQuery::new("rust").with_location("Remote");
        let jobs = parse_search_page(CARDS_HTML, &query, 10);

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].title, "Senior Rust Engineer");
        assert_eq!(jobs[0].company, "Ferrous Systems");
        assert_eq!(jobs[0].location, "Berlin, Germany");
        assert_eq!(jobs[0].url, "https://www.linkedin.com/jobs/view/111");
        assert_eq!(jobs[0].source, JobSourceKind::LinkedIn);
        assert_eq!(jobs[1].location, "Remote");
        assert_eq!(jobs[1].url, "https://www.linkedin.com/jobs/view/222");
    }

    #[test]
    fn test_card_limit() {
        let query = JobQuery::new("rust");
        let jobs = parse_search_page(CARDS_HTML, &query, 1);
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    fn test_heuristic_fallback() {
        let html = "<html><body><div>\nPlatform Software Engineer\nGlobex Corporation\n</div></body></html>";
        let query = JobQuery::new("platform");
        let jobs = parse_search_page(html, &query, 5);

        assert!(!jobs.is_empty());
        assert_eq!(jobs[0].title, "Platform Software Engineer");
        assert_eq!(jobs[0].company, "Globex Corporation");
        assert_eq!(jobs[0].location, "LinkedIn");
        assert!(jobs[0].id.starts_with("linkedin_alt_"));
    }

    #[test]
    fn test_search_link_when_nothing_matches() {
        let query = JobQuery::new("data scientist").with_location("new york");
        let jobs = parse_search_page("<html><body><p>Sign in</p></body></html>", &query, 5);

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "LinkedIn Search: data scientist");
        assert_eq!(jobs[0].company, "LinkedIn Jobs");
        assert_eq!(
            jobs[0].url,
            "https://www.linkedin.com/jobs/search?keywords=data+scientist&location=new+york"
        );
    }

    #[test]
    fn test_error_entry_is_not_scraped() {
        let query = JobQuery::new("rust");
        let job = error_entry(&query, "HTTP error: 429");
        assert_eq!(job.scraped, Some(false));
        assert_eq!(job.location, "Various Locations");
        assert!(job.description.contains("429"));
    }
}
