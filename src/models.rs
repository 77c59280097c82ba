use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry on a catalog or search page.
///
/// A summary is only materialized when a title was extracted; every other
/// field is best-effort and may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MangaSummary {
    pub title: String,
    pub link: Option<String>,
    pub image: Option<String>,
    pub image_alt: Option<String>,
    pub label: Option<String>,
    pub last_updated: Option<String>,
    pub genres: Vec<String>,
    pub rating: Option<String>,
    pub latest_chapter: Option<String>,
}

/// A chapter row on a detail page. Title and link are always non-empty;
/// rows missing either are dropped during extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub link: String,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub slug: String,
    pub name: String,
}

/// Full record for a single title.
///
/// Singleton fields are best-effort: a detail page with partial data is
/// still useful, so absent fields come back as empty strings. Genres are
/// keyed by the dense index at which each entry was accepted during
/// extraction, not by slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MangaDetail {
    pub title: String,
    pub author: String,
    pub image: Option<String>,
    pub description: String,
    pub language: String,
    pub genres: BTreeMap<u32, Genre>,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub total_pages: u32,
}

impl PaginationInfo {
    /// Computes `total_pages = ceil(total / limit)`. The total is a
    /// configured constant, not a scraped count: the source site exposes no
    /// reliable total-count element.
    pub fn new(page: u32, limit: u32, total: u32) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// A page of summaries plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    pub items: Vec<MangaSummary>,
    pub pagination: PaginationInfo,
}

/// Consistent JSON envelope for every API response.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationInfo>,
    pub timestamp: String,
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            pagination: None,
            timestamp: now_iso(),
        }
    }

    pub fn paginated(data: T, pagination: PaginationInfo) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::ok(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<serde_json::Value> {
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            pagination: None,
            timestamp: now_iso(),
        }
    }
}
