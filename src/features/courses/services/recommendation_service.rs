use serde::Deserialize;

use crate::core::config::CourseCatalogConfig;
use crate::core::error::{AppError, Result};
use crate::features::courses::dtos::{CourseDto, CourseQueryDto};

/// Anchor term every catalog search starts with
const SEARCH_ANCHOR: &str = "Canada";

/// Maximum number of courses returned to the caller
const MAX_RESULTS: usize = 6;

/// Descriptions longer than this are cut and suffixed with "..."
const DESCRIPTION_LIMIT: usize = 100;

const PROVIDER: &str = "Coursera";

const FALLBACK_DESCRIPTION: &str = "Practical skills for building your new life in Canada.";

/// Profession tag -> catalog search keywords. Unmapped professions are used
/// verbatim as a search term.
const PROFESSION_KEYWORDS: &[(&str, &str)] = &[
    ("it", "software development, information technology"),
    ("healthcare", "healthcare, medical terminology"),
    ("engineering", "engineering fundamentals"),
    ("finance", "finance, accounting"),
    ("education", "teaching, education"),
    ("trades", "construction management, skilled trades"),
    ("business", "business management"),
    ("hospitality", "hospitality, customer service"),
];

/// Category rules: needle substring -> storefront tag. Needles are matched
/// against the upstream domain tags and the requested profession.
const CATEGORY_RULES: &[(&str, &str)] = &[
    ("business", "Business"),
    ("finance", "Business"),
    ("computer", "Digital Skills"),
    ("software", "Digital Skills"),
    ("tech", "Digital Skills"),
    ("data", "Digital Skills"),
    ("health", "Healthcare"),
    ("medical", "Healthcare"),
    ("language", "Language"),
    ("english", "Language"),
    ("personal-development", "Career Growth"),
    ("career", "Career Growth"),
];

/// Tag applied when nothing in the category table matches
const DEFAULT_TAG: &str = "Life Skills";

/// Catalog search response structure
#[derive(Debug, Deserialize)]
struct CatalogSearchResponse {
    #[serde(default)]
    elements: Vec<CatalogCourse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogCourse {
    name: Option<String>,
    slug: Option<String>,
    description: Option<String>,
    #[serde(default)]
    domain_types: Vec<CatalogDomainType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogDomainType {
    domain_id: Option<String>,
    subdomain_id: Option<String>,
}

/// Service recommending catalog courses for a newcomer profile.
///
/// Availability beats precision here: any upstream failure is absorbed into a
/// fixed fallback set, so the storefront always has something to render.
pub struct CourseRecommendationService {
    client: reqwest::Client,
    base_url: String,
}

impl CourseRecommendationService {
    pub fn new(config: CourseCatalogConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("NorthStartCore/1.0 (newcomer-platform)")
                .build()
                .expect("Failed to build HTTP client"),
            base_url: config.base_url,
        }
    }

    /// Recommend up to six courses for the given profile. Infallible: every
    /// failure path lands on the fallback set.
    pub async fn recommend(&self, query: &CourseQueryDto) -> Vec<CourseDto> {
        let keywords = build_search_keywords(query);
        let profession = query.profession.as_deref().unwrap_or_default();

        tracing::debug!("Course search keywords: {}", keywords);

        match self.search_catalog(&keywords, profession).await {
            Ok(courses) if !courses.is_empty() => courses,
            Ok(_) => {
                tracing::warn!("Course catalog returned no results, serving fallback set");
                fallback_courses()
            }
            Err(e) => {
                tracing::warn!("Course catalog unavailable ({}), serving fallback set", e);
                fallback_courses()
            }
        }
    }

    /// Execute the catalog search and map results to course DTOs
    async fn search_catalog(&self, keywords: &str, profession: &str) -> Result<Vec<CourseDto>> {
        let url = format!(
            "{}/api/courses.v1?q=search&query={}&limit={}&fields=name,slug,description,domainTypes",
            self.base_url,
            urlencoding::encode(keywords),
            MAX_RESULTS
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Course catalog request failed: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Course catalog returned status {}",
                response.status()
            )));
        }

        let payload: CatalogSearchResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse course catalog response: {}", e))
        })?;

        Ok(payload
            .elements
            .into_iter()
            .take(MAX_RESULTS)
            .map(|course| map_course(course, profession))
            .collect())
    }
}

/// Compose the catalog search keywords from the caller's profile.
///
/// Starts with the fixed anchor term, adds the profession keywords (or the
/// raw profession when unmapped), and adds pathway-specific terms. Absent
/// fields simply contribute nothing.
fn build_search_keywords(query: &CourseQueryDto) -> String {
    let mut terms: Vec<String> = vec![SEARCH_ANCHOR.to_string()];

    if let Some(profession) = query
        .profession
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        let lowered = profession.to_lowercase();
        let mapped = PROFESSION_KEYWORDS
            .iter()
            .find(|(key, _)| *key == lowered)
            .map(|(_, keywords)| (*keywords).to_string());
        terms.push(mapped.unwrap_or_else(|| profession.to_string()));
    }

    match query
        .pathway
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .as_deref()
    {
        Some("study") => terms.push("student".to_string()),
        Some("express") => terms.push("professional, immigration".to_string()),
        _ => {}
    }

    terms.join(", ")
}

fn map_course(course: CatalogCourse, profession: &str) -> CourseDto {
    let title = course
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "Course Title".to_string());

    let description = match course.description.filter(|d| !d.trim().is_empty()) {
        Some(description) => truncate_description(&description),
        None => FALLBACK_DESCRIPTION.to_string(),
    };

    let link = match course.slug {
        Some(slug) if !slug.is_empty() => format!("https://www.coursera.org/learn/{}", slug),
        _ => "https://www.coursera.org/".to_string(),
    };

    let tags = derive_tags(&course.domain_types, profession);

    CourseDto {
        title,
        provider: PROVIDER.to_string(),
        description,
        link,
        tags,
    }
}

/// Cut a description at the limit and append an ellipsis. Counted in chars,
/// not bytes, so multi-byte text never splits mid-character.
fn truncate_description(description: &str) -> String {
    if description.chars().count() > DESCRIPTION_LIMIT {
        let truncated: String = description.chars().take(DESCRIPTION_LIMIT).collect();
        format!("{}...", truncated)
    } else {
        description.to_string()
    }
}

/// Derive storefront tags from the upstream domain tags plus the requested
/// profession, via the fixed category table.
fn derive_tags(domain_types: &[CatalogDomainType], profession: &str) -> Vec<String> {
    let mut haystacks: Vec<String> = domain_types
        .iter()
        .flat_map(|d| [d.domain_id.clone(), d.subdomain_id.clone()])
        .flatten()
        .map(|s| s.to_lowercase())
        .collect();
    haystacks.push(profession.to_lowercase());

    let mut tags: Vec<String> = Vec::new();
    for (needle, tag) in CATEGORY_RULES {
        if haystacks.iter().any(|h| h.contains(needle)) && !tags.iter().any(|t| t == tag) {
            tags.push((*tag).to_string());
        }
    }

    if tags.is_empty() {
        tags.push(DEFAULT_TAG.to_string());
    }

    tags
}

/// The static recommendation set served whenever the catalog cannot.
///
/// Deliberately deterministic: repeated fallbacks produce identical lists.
pub fn fallback_courses() -> Vec<CourseDto> {
    vec![
        CourseDto {
            title: "Canadian Workplace English Communication".to_string(),
            provider: PROVIDER.to_string(),
            description: "Sharpen the everyday and professional English you need in a Canadian workplace."
                .to_string(),
            link: "https://www.coursera.org/search?query=workplace%20english%20communication"
                .to_string(),
            tags: vec!["Language".to_string()],
        },
        CourseDto {
            title: "Introduction to Canadian Business Culture".to_string(),
            provider: PROVIDER.to_string(),
            description: "Understand meetings, hierarchy and etiquette in Canadian companies."
                .to_string(),
            link: "https://www.coursera.org/search?query=canadian%20business%20culture".to_string(),
            tags: vec!["Business".to_string()],
        },
        CourseDto {
            title: "Digital Skills for the Modern Workplace".to_string(),
            provider: PROVIDER.to_string(),
            description: "Core office and collaboration tools employers expect on day one."
                .to_string(),
            link: "https://www.coursera.org/search?query=digital%20workplace%20skills".to_string(),
            tags: vec!["Digital Skills".to_string()],
        },
        CourseDto {
            title: "Financial Literacy for Newcomers".to_string(),
            provider: PROVIDER.to_string(),
            description: "Banking, credit history and taxes explained for your first year in Canada."
                .to_string(),
            link: "https://www.coursera.org/search?query=personal%20finance%20canada".to_string(),
            tags: vec!["Life Skills".to_string()],
        },
        CourseDto {
            title: "Professional Networking & Career Development".to_string(),
            provider: PROVIDER.to_string(),
            description: "Build a Canadian professional network and plan your next career step."
                .to_string(),
            link: "https://www.coursera.org/search?query=professional%20networking".to_string(),
            tags: vec!["Career Growth".to_string()],
        },
        CourseDto {
            title: "Canadian Healthcare System Overview".to_string(),
            provider: PROVIDER.to_string(),
            description: "How provincial health coverage works and how to access care.".to_string(),
            link: "https://www.coursera.org/search?query=canadian%20healthcare%20system"
                .to_string(),
            tags: vec!["Healthcare".to_string()],
        },
    ]
}
