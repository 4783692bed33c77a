//! Request and response bodies exchanged with the facility backend.

use petmap_core::{Category, CategoryGroups, Coordinate, FacilityId, FilterSelection};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub lat: f64,
    pub lon: f64,
}

impl SearchRequest {
    #[must_use]
    pub fn new(query: &str, origin: Coordinate) -> Self {
        Self {
            query: query.trim().to_string(),
            lat: origin.lat(),
            lon: origin.lon(),
        }
    }
}

/// Body of `POST /api/filter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterRequest {
    /// Stable district key, `None` for all districts.
    pub district: Option<String>,
    pub categories: Vec<Category>,
}

impl FilterRequest {
    /// Builds the request for a selection, expanding category keys.
    ///
    /// Categories are sorted and deduplicated so equal selections always
    /// produce identical bodies.
    #[must_use]
    pub fn from_selection(selection: &FilterSelection, groups: &CategoryGroups) -> Self {
        Self {
            district: selection.district.clone(),
            categories: groups.expand(&selection.categories).into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct NicknameUpdate<'a> {
    pub nickname: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PasswordUpdate<'a> {
    pub current_password: &'a str,
    pub new_password: &'a str,
}

/// The logged-in user's account page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub favorite_hospitals: Vec<FacilityId>,
}

/// Response of `POST /api/profile/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Backend error envelope, e.g. `{"error": "이미 존재하는 아이디입니다."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
