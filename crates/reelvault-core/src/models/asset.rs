use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{self, ValidationError};

pub const DEFAULT_VIDEO_WIDTH: i32 = 1920;
pub const DEFAULT_VIDEO_HEIGHT: i32 = 1080;
pub const DEFAULT_CONTROLS: bool = true;

/// Request to record a video that was uploaded to the media host.
///
/// Missing string fields deserialize as empty so validation can report them together.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    #[serde(default)]
    #[validate(custom(function = "non_blank", message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "non_blank", message = "videoUrl is required"))]
    pub video_url: String,
    #[serde(default)]
    #[validate(custom(function = "non_blank", message = "thumbnailUrl is required"))]
    pub thumbnail_url: String,
    #[serde(default)]
    pub controls: Option<bool>,
    #[serde(default)]
    #[validate(nested)]
    pub transformations: Option<TransformationsInput>,
}

/// Display transformations as sent by the client; every field is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct TransformationsInput {
    #[validate(range(min = 1, message = "width must be a positive number of pixels"))]
    pub width: Option<i32>,
    #[validate(range(min = 1, message = "height must be a positive number of pixels"))]
    pub height: Option<i32>,
    #[validate(range(min = 1, max = 100, message = "quality must be between 1 and 100"))]
    pub quality: Option<i32>,
}

fn non_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("required"));
    }
    Ok(())
}

/// Display transformations with defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Transformations {
    pub width: i32,
    pub height: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<i32>,
}

impl Default for Transformations {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIDEO_WIDTH,
            height: DEFAULT_VIDEO_HEIGHT,
            quality: None,
        }
    }
}

/// A validated asset with every default filled in, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDraft {
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: String,
    pub controls: bool,
    pub transformations: Transformations,
}

impl NewAsset {
    /// Check every field, reporting all violations at once.
    pub fn validate_fields(&self) -> Result<(), ValidationError> {
        validation::collect(self)
    }

    /// Fill in defaults. Pure; does not validate.
    pub fn with_defaults(self) -> AssetDraft {
        let input = self.transformations.unwrap_or_default();
        AssetDraft {
            title: self.title.trim().to_string(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            video_url: self.video_url.trim().to_string(),
            thumbnail_url: self.thumbnail_url.trim().to_string(),
            controls: self.controls.unwrap_or(DEFAULT_CONTROLS),
            transformations: Transformations {
                width: input.width.unwrap_or(DEFAULT_VIDEO_WIDTH),
                height: input.height.unwrap_or(DEFAULT_VIDEO_HEIGHT),
                quality: input.quality,
            },
        }
    }

    /// Validate, then apply defaults.
    pub fn prepare(self) -> Result<AssetDraft, ValidationError> {
        self.validate_fields()?;
        Ok(self.with_defaults())
    }
}

/// Persisted video record. `video_url` and `thumbnail_url` never change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: String,
    pub controls: bool,
    pub transformations: Transformations,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// Materialize a draft with a fresh id and timestamps.
    pub fn from_draft(draft: AssetDraft, now: DateTime<Utc>) -> Self {
        Asset {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            video_url: draft.video_url,
            thumbnail_url: draft.thumbnail_url,
            controls: draft.controls,
            transformations: draft.transformations,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(feature = "sqlx")]
impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for Asset {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;

        Ok(Asset {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            video_url: row.try_get("video_url")?,
            thumbnail_url: row.try_get("thumbnail_url")?,
            controls: row.try_get("controls")?,
            transformations: Transformations {
                width: row.try_get("width")?,
                height: row.try_get("height")?,
                quality: row.try_get("quality")?,
            },
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(title: &str, video_url: &str, thumbnail_url: &str) -> NewAsset {
        NewAsset {
            title: title.to_string(),
            video_url: video_url.to_string(),
            thumbnail_url: thumbnail_url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_title_is_named() {
        let err = required("", "u", "t").prepare().unwrap_err();
        assert!(err.names("title"));
        assert_eq!(err.fields.len(), 1);
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let err = required("   ", "u", "t").prepare().unwrap_err();
        assert!(err.names("title"));
    }

    #[test]
    fn test_all_missing_fields_are_listed() {
        let err = NewAsset::default().prepare().unwrap_err();
        assert!(err.names("title"));
        assert!(err.names("videoUrl"));
        assert!(err.names("thumbnailUrl"));
    }

    #[test]
    fn test_quality_out_of_range() {
        let mut asset = required("t", "u", "tn");
        asset.transformations = Some(TransformationsInput {
            quality: Some(150),
            ..Default::default()
        });
        let err = asset.prepare().unwrap_err();
        assert!(err.names("transformations.quality"));

        let mut asset = required("t", "u", "tn");
        asset.transformations = Some(TransformationsInput {
            quality: Some(0),
            ..Default::default()
        });
        assert!(asset.prepare().is_err());
    }

    #[test]
    fn test_quality_bounds_are_inclusive() {
        for quality in [1, 100] {
            let mut asset = required("t", "u", "tn");
            asset.transformations = Some(TransformationsInput {
                quality: Some(quality),
                ..Default::default()
            });
            let draft = asset.prepare().unwrap();
            assert_eq!(draft.transformations.quality, Some(quality));
        }
    }

    #[test]
    fn test_defaults_with_only_required_fields() {
        let draft = required("t", "u", "tn").prepare().unwrap();
        assert!(draft.controls);
        assert_eq!(draft.transformations.width, 1920);
        assert_eq!(draft.transformations.height, 1080);
        assert_eq!(draft.transformations.quality, None);
        assert_eq!(draft.description, None);
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let mut asset = required("t", "u", "tn");
        asset.controls = Some(false);
        asset.description = Some("  a clip  ".to_string());
        asset.transformations = Some(TransformationsInput {
            width: Some(1280),
            height: None,
            quality: Some(80),
        });
        let draft = asset.prepare().unwrap();
        assert!(!draft.controls);
        assert_eq!(draft.description.as_deref(), Some("a clip"));
        assert_eq!(
            draft.transformations,
            Transformations {
                width: 1280,
                height: 1080,
                quality: Some(80)
            }
        );
    }

    #[test]
    fn test_deserialize_missing_fields_as_empty() {
        let asset: NewAsset = serde_json::from_str(r#"{"videoUrl": "u"}"#).unwrap();
        assert_eq!(asset.video_url, "u");
        assert!(asset.title.is_empty());
        let err = asset.prepare().unwrap_err();
        assert!(err.names("title"));
        assert!(err.names("thumbnailUrl"));
        assert!(!err.names("videoUrl"));
    }

    #[test]
    fn test_asset_serializes_camel_case() {
        let draft = required("t", "u", "tn").prepare().unwrap();
        let asset = Asset::from_draft(draft, Utc::now());
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["videoUrl"], "u");
        assert_eq!(json["thumbnailUrl"], "tn");
        assert_eq!(json["transformations"]["width"], 1920);
        assert!(json.get("description").is_none());
        assert_eq!(asset.created_at, asset.updated_at);
    }
}
