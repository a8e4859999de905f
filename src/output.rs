//! The result document of a batch run, plus the fixed publishing kit.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clients::gemini::parse_data_url;
use crate::diversity::DiversityPools;
use crate::error::{PhotoshootError, Result};
use crate::selection::{
    CameraAngle, LensMm, LightSetup, LookSelection, LookSet, ShotType, StudioSelection,
    StyleLevel,
};

pub const POST_IDEAS: &[&str] = &[
    "A new look - what do you think?",
    "Experimenting with style.",
    "Behind the scenes of the photoshoot.",
];

pub const HASHTAGS: &[&str] = &["#neurophotoshoot", "#aiart", "#digitalfashion", "#style"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub lens: LensMm,
    pub shot_type: ShotType,
    pub light_setup: LightSetup,
    pub camera_angle: CameraAngle,
    pub pose: String,
    pub style_level: StyleLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// 1-based position in the batch
    pub id: u32,
    pub url: String,
    pub metadata: ImageMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub user_photo_url: String,
    pub studio: StudioSelection,
    pub looks: Vec<LookSelection>,
    pub diversity: DiversityPools,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishingKit {
    pub post_ideas: Vec<String>,
    pub hashtags: Vec<String>,
}

impl Default for PublishingKit {
    fn default() -> Self {
        Self {
            post_ideas: POST_IDEAS.iter().map(|s| s.to_string()).collect(),
            hashtags: HASHTAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub images: Vec<GeneratedImage>,
    pub session_metadata: SessionMetadata,
    pub publishing_kit: PublishingKit,
}

/// Folds one run's images and selections into a document. No delegated calls.
pub fn assemble(
    images: Vec<GeneratedImage>,
    subject_photo: &str,
    studio: &StudioSelection,
    looks: &LookSet,
    pools: &DiversityPools,
) -> OutputDocument {
    OutputDocument {
        images,
        session_metadata: SessionMetadata {
            user_photo_url: subject_photo.to_string(),
            studio: studio.clone(),
            looks: looks.as_slice().to_vec(),
            diversity: pools.clone(),
        },
        publishing_kit: PublishingKit::default(),
    }
}

impl OutputDocument {
    pub fn image(&self, id: u32) -> Option<&GeneratedImage> {
        self.images.iter().find(|img| img.id == id)
    }

    /// Copy of the document with one image url swapped. Everything else,
    /// including that image's metadata, is untouched.
    pub fn with_image_url(&self, id: u32, url: impl Into<String>) -> Result<Self> {
        if self.image(id).is_none() {
            return Err(PhotoshootError::ImageNotFound { id });
        }
        let url = url.into();
        let mut updated = self.clone();
        for img in updated.images.iter_mut().filter(|img| img.id == id) {
            img.url = url.clone();
        }
        Ok(updated)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Writes `document.json` plus one file per data-url image into `dir`.
    /// Remote urls are kept in the document only. Returns the document path.
    pub fn write_bundle(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let document_path = dir.join("document.json");
        std::fs::write(&document_path, self.to_json_pretty()?)?;

        for image in &self.images {
            let Some((_, data)) = parse_data_url(&image.url) else {
                debug!("Image {} is remote, not downloaded", image.id);
                continue;
            };
            let bytes = STANDARD
                .decode(data)
                .map_err(|e| PhotoshootError::Serialization {
                    message: format!("image {} is not valid base64: {}", image.id, e),
                })?;
            std::fs::write(dir.join(download_file_name(image)), bytes)?;
        }
        info!("Wrote bundle to {}", dir.display());
        Ok(document_path)
    }
}

/// `neuro-photoshoot-{id}.{ext}`; the extension follows a data url's mime
/// type and falls back to png.
pub fn download_file_name(image: &GeneratedImage) -> String {
    let ext = parse_data_url(&image.url)
        .and_then(|(mime, _)| mime.split('/').nth(1))
        .map(|sub| match sub {
            "jpeg" => "jpg",
            other => other,
        })
        .unwrap_or("png");
    format!("neuro-photoshoot-{}.{}", image.id, ext)
}
