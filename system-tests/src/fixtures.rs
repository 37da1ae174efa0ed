// system-tests/src/fixtures.rs
// ============================================================================
// Module: Fixture Factory
// Description: Disposable users, videos, and playlists created via the API.
// Purpose: Give each test its own data without shared seeding.
// Dependencies: rand, reqwest, serde, serde_json, uuid
// ============================================================================

//! ## Overview
//! Each fixture merges caller overrides over randomized defaults and is
//! created with exactly one POST. Anything other than `201 Created` is fatal
//! for the fixture and surfaces as [`HarnessError::FixtureCreationFailed`]
//! with the server's `error`/`message` text. Fixtures are never cleaned up;
//! orphans are acceptable in a test deployment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use uuid::Uuid;

use crate::deployment::NameStyle;
use crate::error::HarnessError;
use crate::http::ApiClient;
use crate::http::ApiResponse;
use crate::http::body_message;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// User creation endpoint.
pub const USERS_PATH: &str = "/usuarios";
/// Video creation endpoint.
pub const VIDEOS_PATH: &str = "/videos";
/// Playlist creation endpoint.
pub const PLAYLISTS_PATH: &str = "/listas-reproduccion";
/// Password given to users when none is supplied.
pub const DEFAULT_USER_PASSWORD: &str = "Test123!";
/// Length of the random suffix in default fixture names.
pub const DEFAULT_RANDOM_STRING_LENGTH: usize = 8;
/// Email domain for generated identities.
const EMAIL_DOMAIN: &str = "streamflow.com";

// ============================================================================
// SECTION: Random Data
// ============================================================================

/// Returns a unique `test-<uuid>@streamflow.com` address.
#[must_use]
pub fn generate_random_email() -> String {
    format!("test-{}@{EMAIL_DOMAIN}", Uuid::new_v4())
}

/// Returns `length` characters drawn uniformly from `[A-Za-z0-9]`.
#[must_use]
pub fn generate_random_string(length: usize) -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(length).map(char::from).collect()
}

// ============================================================================
// SECTION: Users
// ============================================================================

/// Role assigned to a test identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Role {
    /// Administrator.
    #[serde(rename = "admin")]
    Admin,
    /// Regular customer account.
    #[default]
    #[serde(rename = "cliente")]
    StandardUser,
}

impl Role {
    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::StandardUser => "cliente",
        }
    }
}

/// A user identity created for one test.
///
/// The password is tracked here only; suites that rotate it must update the
/// field themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestUser {
    /// Server-assigned id, filled after creation.
    pub id: Option<String>,
    /// Login email.
    pub email: String,
    /// Current password.
    pub password: String,
    /// Assigned role.
    pub role: Role,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl TestUser {
    /// Merges overrides over the default identity.
    #[must_use]
    pub fn from_overrides(overrides: UserOverrides) -> Self {
        Self {
            id: None,
            email: overrides.email.unwrap_or_else(generate_random_email),
            password: overrides.password.unwrap_or_else(|| DEFAULT_USER_PASSWORD.to_string()),
            role: overrides.role.unwrap_or_default(),
            first_name: overrides.first_name.unwrap_or_else(|| "Test".to_string()),
            last_name: overrides.last_name.unwrap_or_else(|| "User".to_string()),
        }
    }

    /// Returns `first last`, trimmed.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Builds the `POST /usuarios` body for the given name encoding.
    #[must_use]
    pub fn creation_payload(&self, style: NameStyle) -> Value {
        let mut payload = Map::new();
        payload.insert("email".to_string(), Value::String(self.email.clone()));
        payload.insert("password".to_string(), Value::String(self.password.clone()));
        payload.insert("role".to_string(), Value::String(self.role.as_str().to_string()));
        if style == NameStyle::FirstLast {
            payload.insert("confirm_password".to_string(), Value::String(self.password.clone()));
        }
        payload.extend(style.name_fields(&self.first_name, &self.last_name));
        Value::Object(payload)
    }
}

/// Caller-supplied fields for [`TestUser`]; `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserOverrides {
    /// Email override.
    pub email: Option<String>,
    /// Password override.
    pub password: Option<String>,
    /// Role override.
    pub role: Option<Role>,
    /// Given-name override.
    pub first_name: Option<String>,
    /// Family-name override.
    pub last_name: Option<String>,
}

impl UserOverrides {
    /// Sets the email.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the role.
    #[must_use]
    pub const fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Sets given and family names.
    #[must_use]
    pub fn names(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self
    }
}

/// Creates a user through `POST /usuarios` on the given client.
///
/// # Errors
///
/// Returns [`HarnessError::FixtureCreationFailed`] on any status but 201 and
/// [`HarnessError::Http`] on transport failure.
pub async fn create_user(
    client: &ApiClient,
    overrides: UserOverrides,
    style: NameStyle,
) -> Result<TestUser, HarnessError> {
    let mut user = TestUser::from_overrides(overrides);
    let response = client.post(USERS_PATH, &user.creation_payload(style)).await?;
    user.id = created_id("user", &response)?;
    Ok(user)
}

// ============================================================================
// SECTION: Videos
// ============================================================================

/// A video created for one test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestVideo {
    /// Server-assigned id, filled after creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Title.
    pub title: String,
    /// Genre label.
    pub genre: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Duration in minutes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

/// Caller-supplied fields for [`TestVideo`]; `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoOverrides {
    /// Title override.
    pub title: Option<String>,
    /// Genre override.
    pub genre: Option<String>,
    /// Description override.
    pub description: Option<String>,
    /// Duration override.
    pub duration: Option<u32>,
}

impl VideoOverrides {
    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the genre.
    #[must_use]
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }
}

impl TestVideo {
    /// Merges overrides over the default video.
    #[must_use]
    pub fn from_overrides(overrides: VideoOverrides) -> Self {
        Self {
            id: None,
            title: overrides.title.unwrap_or_else(|| {
                format!("Test Video {}", generate_random_string(DEFAULT_RANDOM_STRING_LENGTH))
            }),
            genre: overrides.genre.unwrap_or_else(|| "Drama".to_string()),
            description: Some(
                overrides.description.unwrap_or_else(|| "Test video description".to_string()),
            ),
            duration: Some(overrides.duration.unwrap_or(120)),
        }
    }
}

/// Creates a video through `POST /videos`.
///
/// # Errors
///
/// Returns [`HarnessError::FixtureCreationFailed`] on any status but 201 and
/// [`HarnessError::Http`] on transport failure.
pub async fn create_video(
    client: &ApiClient,
    overrides: VideoOverrides,
) -> Result<TestVideo, HarnessError> {
    let mut video = TestVideo::from_overrides(overrides);
    let response = client.post(VIDEOS_PATH, &video).await?;
    video.id = created_id("video", &response)?;
    Ok(video)
}

// ============================================================================
// SECTION: Playlists
// ============================================================================

/// A playlist created for one test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestPlaylist {
    /// Server-assigned id, filled after creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Playlist name.
    pub name: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Video ids in the playlist.
    pub videos: Vec<String>,
}

/// Caller-supplied fields for [`TestPlaylist`]; `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistOverrides {
    /// Name override.
    pub name: Option<String>,
    /// Description override.
    pub description: Option<String>,
    /// Video ids override.
    pub videos: Option<Vec<String>>,
}

impl PlaylistOverrides {
    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the video ids.
    #[must_use]
    pub fn videos(mut self, videos: Vec<String>) -> Self {
        self.videos = Some(videos);
        self
    }
}

impl TestPlaylist {
    /// Merges overrides over the default playlist.
    #[must_use]
    pub fn from_overrides(overrides: PlaylistOverrides) -> Self {
        Self {
            id: None,
            name: overrides.name.unwrap_or_else(|| {
                format!("Test Playlist {}", generate_random_string(DEFAULT_RANDOM_STRING_LENGTH))
            }),
            description: Some(
                overrides.description.unwrap_or_else(|| "Test playlist description".to_string()),
            ),
            videos: overrides.videos.unwrap_or_default(),
        }
    }
}

/// Creates a playlist through `POST /listas-reproduccion`.
///
/// # Errors
///
/// Returns [`HarnessError::FixtureCreationFailed`] on any status but 201 and
/// [`HarnessError::Http`] on transport failure.
pub async fn create_playlist(
    client: &ApiClient,
    overrides: PlaylistOverrides,
) -> Result<TestPlaylist, HarnessError> {
    let mut playlist = TestPlaylist::from_overrides(overrides);
    let response = client.post(PLAYLISTS_PATH, &playlist).await?;
    playlist.id = created_id("playlist", &response)?;
    Ok(playlist)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Checks for 201 and extracts the new resource id.
fn created_id(fixture: &'static str, response: &ApiResponse) -> Result<Option<String>, HarnessError> {
    if response.status != 201 {
        return Err(HarnessError::FixtureCreationFailed {
            fixture,
            status: response.status,
            message: body_message(&response.body, &["error", "message"])
                .unwrap_or_else(|| "Unknown error".to_string()),
        });
    }
    Ok(id_from_body(&response.body))
}

/// Reads `id` from a body; numeric ids are stringified.
#[must_use]
pub fn id_from_body(body: &Value) -> Option<String> {
    match body.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
