//! Typed selection values handed to the engine by the wizard layer.
//!
//! Every axis of choice (studio, look) is a [`Selection`] tagged by where it came
//! from. The remaining knobs are closed enums so the prompt compiler can match on
//! them exhaustively.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PhotoshootError, Result};

pub const MAX_LOOKS: usize = 3;
pub const MAX_POSES: usize = 5;

/// A user-committed choice, tagged by origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Selection {
    /// Picked from a preset catalog.
    Preset {
        #[serde(rename = "value")]
        preset_id: String,
    },
    /// Described with a free-form prompt. Studios may carry a rendered preview.
    Generate {
        #[serde(rename = "value")]
        prompt: String,
        #[serde(
            rename = "generatedImageUrl",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        resolved_image: Option<String>,
    },
    /// Points at an external reference image.
    Reference {
        #[serde(rename = "value")]
        url: String,
    },
}

impl Selection {
    pub fn preset(preset_id: impl Into<String>) -> Result<Self> {
        let sel = Selection::Preset {
            preset_id: preset_id.into().trim().to_string(),
        };
        sel.validate()?;
        Ok(sel)
    }

    pub fn generate(prompt: impl Into<String>) -> Result<Self> {
        let sel = Selection::Generate {
            prompt: prompt.into().trim().to_string(),
            resolved_image: None,
        };
        sel.validate()?;
        Ok(sel)
    }

    pub fn reference(url: impl Into<String>) -> Result<Self> {
        let sel = Selection::Reference {
            url: url.into().trim().to_string(),
        };
        sel.validate()?;
        Ok(sel)
    }

    /// The raw wire value: preset id, prompt text or reference url.
    pub fn value(&self) -> &str {
        match self {
            Selection::Preset { preset_id } => preset_id,
            Selection::Generate { prompt, .. } => prompt,
            Selection::Reference { url } => url,
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            Selection::Preset { .. } => "preset",
            Selection::Generate { .. } => "generate",
            Selection::Reference { .. } => "reference",
        }
    }

    /// Checks the invariants for values that arrived through deserialization.
    pub fn validate(&self) -> Result<()> {
        if self.value().trim().is_empty() {
            return Err(PhotoshootError::invalid(format!(
                "{} selection value must not be empty",
                self.source()
            )));
        }
        if let Selection::Reference { url } = self
            && !url.starts_with("http")
        {
            return Err(PhotoshootError::invalid(format!(
                "reference must be an http(s) url, got '{}'",
                url
            )));
        }
        Ok(())
    }
}

/// Outfit choices share the selection shape.
pub type LookSelection = Selection;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum LightQuality {
    #[default]
    Soft,
    Hard,
}

impl LightQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            LightQuality::Soft => "soft",
            LightQuality::Hard => "hard",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    Warm,
    #[default]
    Neutral,
    Cool,
}

impl Palette {
    pub fn as_str(&self) -> &'static str {
        match self {
            Palette::Warm => "warm",
            Palette::Neutral => "neutral",
            Palette::Cool => "cool",
        }
    }
}

/// Focal length in millimetres. Serialized as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum LensMm {
    Mm35,
    #[default]
    Mm50,
    Mm85,
}

impl LensMm {
    pub fn millimetres(&self) -> u32 {
        match self {
            LensMm::Mm35 => 35,
            LensMm::Mm50 => 50,
            LensMm::Mm85 => 85,
        }
    }
}

impl TryFrom<u32> for LensMm {
    type Error = PhotoshootError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            35 => Ok(LensMm::Mm35),
            50 => Ok(LensMm::Mm50),
            85 => Ok(LensMm::Mm85),
            other => Err(PhotoshootError::invalid(format!(
                "unsupported lens {}mm (expected 35, 50 or 85)",
                other
            ))),
        }
    }
}

impl From<LensMm> for u32 {
    fn from(lens: LensMm) -> Self {
        lens.millimetres()
    }
}

impl fmt::Display for LensMm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm", self.millimetres())
    }
}

/// Backdrop settings that always travel with a studio selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StudioDetails {
    pub light: LightQuality,
    pub lens: LensMm,
    pub palette: Palette,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudioSelection {
    #[serde(flatten)]
    pub selection: Selection,
    #[serde(default)]
    pub details: StudioDetails,
}

impl StudioSelection {
    pub fn new(selection: Selection, details: StudioDetails) -> Self {
        Self { selection, details }
    }

    /// Details are editable independently of the backdrop choice.
    pub fn with_details(&self, details: StudioDetails) -> Self {
        Self {
            selection: self.selection.clone(),
            details,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotType {
    Portrait,
    Half,
    Full,
}

impl ShotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShotType::Portrait => "portrait",
            ShotType::Half => "half",
            ShotType::Full => "full",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightSetup {
    Softbox,
    Rim,
    Butterfly,
    Split,
}

impl LightSetup {
    pub fn as_str(&self) -> &'static str {
        match self {
            LightSetup::Softbox => "softbox",
            LightSetup::Rim => "rim",
            LightSetup::Butterfly => "butterfly",
            LightSetup::Split => "split",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraAngle {
    #[default]
    Front,
    ThreeQuarters,
    Profile,
    Top,
    Low,
}

impl CameraAngle {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraAngle::Front => "front",
            CameraAngle::ThreeQuarters => "three_quarters",
            CameraAngle::Profile => "profile",
            CameraAngle::Top => "top",
            CameraAngle::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleLevel {
    #[default]
    Realistic,
    Cinematic,
    Magazine,
}

impl StyleLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleLevel::Realistic => "realistic",
            StyleLevel::Cinematic => "cinematic",
            StyleLevel::Magazine => "magazine",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(LightQuality, Palette, ShotType, LightSetup, CameraAngle, StyleLevel);

/// Ordered 1..=3 looks. Order drives diversity indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LookSelection>", into = "Vec<LookSelection>")]
pub struct LookSet(Vec<LookSelection>);

impl LookSet {
    pub fn new(looks: Vec<LookSelection>) -> Result<Self> {
        if looks.is_empty() {
            return Err(PhotoshootError::missing("at least one look"));
        }
        if looks.len() > MAX_LOOKS {
            return Err(PhotoshootError::invalid(format!(
                "at most {} looks may be selected, got {}",
                MAX_LOOKS,
                looks.len()
            )));
        }
        for look in &looks {
            look.validate()?;
        }
        Ok(Self(looks))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[LookSelection] {
        &self.0
    }

    /// Round-robin access.
    pub fn cycle(&self, index: usize) -> &LookSelection {
        &self.0[index % self.0.len()]
    }
}

impl TryFrom<Vec<LookSelection>> for LookSet {
    type Error = PhotoshootError;

    fn try_from(looks: Vec<LookSelection>) -> Result<Self> {
        LookSet::new(looks)
    }
}

impl From<LookSet> for Vec<LookSelection> {
    fn from(set: LookSet) -> Self {
        set.0
    }
}

/// Ordered 1..=5 pose descriptions, insertion order preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct PoseSet(Vec<String>);

impl PoseSet {
    pub fn new(poses: Vec<String>) -> Result<Self> {
        if poses.is_empty() {
            return Err(PhotoshootError::missing("at least one pose"));
        }
        if poses.len() > MAX_POSES {
            return Err(PhotoshootError::invalid(format!(
                "at most {} poses may be selected, got {}",
                MAX_POSES,
                poses.len()
            )));
        }
        if poses.iter().any(|p| p.trim().is_empty()) {
            return Err(PhotoshootError::invalid("pose description must not be empty"));
        }
        Ok(Self(poses))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn cycle(&self, index: usize) -> &str {
        &self.0[index % self.0.len()]
    }
}

impl TryFrom<Vec<String>> for PoseSet {
    type Error = PhotoshootError;

    fn try_from(poses: Vec<String>) -> Result<Self> {
        PoseSet::new(poses)
    }
}

impl From<PoseSet> for Vec<String> {
    fn from(set: PoseSet) -> Self {
        set.0
    }
}

/// Whatever the wizard has collected so far. Any field may still be missing;
/// the orchestrator decides whether a batch may start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionDraft {
    #[serde(default)]
    pub subject_photo: Option<String>,
    #[serde(default)]
    pub studio: Option<StudioSelection>,
    #[serde(default)]
    pub looks: Vec<LookSelection>,
    #[serde(default)]
    pub poses: Vec<String>,
    #[serde(default)]
    pub camera_angle: CameraAngle,
    #[serde(default)]
    pub style_level: StyleLevel,
}
