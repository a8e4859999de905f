//! Turns a completed selection set plus one diversity tuple into the
//! instruction text sent with the subject photo.
//!
//! Compilation is pure: catalog lookups are the only input besides the
//! arguments, so identical requests produce byte-identical text.

use tracing::warn;

use crate::catalog::PresetCatalog;
use crate::selection::{
    CameraAngle, LensMm, LightSetup, LookSelection, Selection, ShotType, StudioSelection,
    StyleLevel,
};

pub const UNKNOWN_STUDIO: &str = "Unknown studio";
pub const UNKNOWN_LOOK: &str = "Unknown look";

/// Identity-preservation directive embedded in every subject prompt.
pub const IDENTITY_DIRECTIVE: &str = "**Primary Objective**: Faithfully transfer the exact face and identity of the person from the input image onto a new body and scene. The person's face, including all features, expression, and structure, **MUST** remain identical to the source photo. Do not alter or regenerate the face.";

/// System instruction for every call that involves the subject.
pub const SYSTEM_INSTRUCTION: &str = "You are the visual engine of a neural photoshoot application. \
Create photorealistic portraits of the user in different looks, poses and locations from minimal input. \
Work as a professional photographer, stylist and retoucher in one.\n\
\n\
Quality requirements:\n\
1. Maximum likeness to the original face (identity lock).\n\
2. Realistic lighting and anatomically correct poses.\n\
3. High detail in skin, hair and fabric textures.\n\
4. No artifacts on hands, ears, teeth or backgrounds.\n\
5. Variety between frames: angles, emotions, compositions.\n\
6. Never use template or repeated faces.\n\
\n\
Restrictions:\n\
- Every result must preserve the user's identity.\n\
- Images must not contain other people.\n\
- Do not add text, logos or marks to the background.\n\
- Keep colour temperature and exposure balanced.\n\
- Apply soft focus and depth of field when the style is cinematic.\n\
\n\
When asked to refine an image, apply targeted changes without losing the face.";

/// One batch slot, fully resolved.
#[derive(Debug, Clone, Copy)]
pub struct ShotRequest<'a> {
    pub studio: &'a StudioSelection,
    pub look: &'a LookSelection,
    pub pose: &'a str,
    pub camera_angle: CameraAngle,
    pub lens: LensMm,
    pub shot_type: ShotType,
    pub light_setup: LightSetup,
    pub style_level: StyleLevel,
}

#[derive(Debug, Clone)]
pub struct PromptCompiler {
    catalog: PresetCatalog,
}

impl PromptCompiler {
    pub fn new(catalog: PresetCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    pub fn compile(&self, shot: &ShotRequest<'_>) -> String {
        let studio = self.describe_studio(&shot.studio.selection);
        let look = self.describe_look(shot.look);
        let details = &shot.studio.details;

        format!(
            "Task: Generate a high-quality, photorealistic professional photoshoot image.\n\
             {IDENTITY_DIRECTIVE}\n\
             \n\
             Photoshoot details:\n\
             - **Pose**: {pose}.\n\
             - **Studio Background**: {studio}\n\
             - **Studio Light & Palette**: {light} light, {palette} palette.\n\
             - **Outfit**: {look}\n\
             - **Shot Framing**: {shot_type}.\n\
             - **Camera Angle**: {angle}.\n\
             - **Lens Style**: {lens}.\n\
             - **Lighting Setup**: {light_setup}.\n\
             - **Style Level**: {style}.\n\
             \n\
             The final image must look like a real photograph, seamlessly integrating the original, unaltered face into the new context.",
            pose = shot.pose.trim_end_matches('.'),
            light = details.light,
            palette = details.palette,
            shot_type = shot.shot_type,
            angle = shot.camera_angle,
            lens = shot.lens,
            light_setup = shot.light_setup,
            style = shot.style_level,
        )
    }

    pub fn describe_studio(&self, selection: &Selection) -> String {
        match selection {
            Selection::Preset { preset_id } => match self.catalog.studio(preset_id) {
                Ok(preset) => format!(
                    "A studio with this background: {}, {}.",
                    preset.name, preset.description
                ),
                Err(err) => {
                    warn!("{}; using placeholder", err);
                    format!("A studio with this background: {}.", UNKNOWN_STUDIO)
                }
            },
            Selection::Generate { prompt, .. } => format!(
                "A studio with this background: {}.",
                prompt.trim_end_matches('.')
            ),
            Selection::Reference { .. } => {
                "A studio that looks like the one from the reference image.".to_string()
            }
        }
    }

    pub fn describe_look(&self, selection: &LookSelection) -> String {
        match selection {
            Selection::Preset { preset_id } => match self.catalog.look(preset_id) {
                Ok(preset) => format!("{}, {}.", preset.name, preset.description),
                Err(err) => {
                    warn!("{}; using placeholder", err);
                    format!("{}.", UNKNOWN_LOOK)
                }
            },
            Selection::Generate { prompt, .. } => format!("{}.", prompt.trim_end_matches('.')),
            Selection::Reference { .. } => {
                "An outfit similar to the one in the reference image.".to_string()
            }
        }
    }
}

impl Default for PromptCompiler {
    fn default() -> Self {
        Self::new(PresetCatalog::builtin())
    }
}

/// Text-only prompt used to render a studio backdrop preview.
pub fn studio_background_prompt(description: &str) -> String {
    format!(
        "High-quality photo of a professional studio background: {}",
        description.trim()
    )
}

/// Wraps a user's edit request so the edit keeps identity and style.
pub fn edit_instruction(request: &str) -> String {
    format!(
        "Apply this edit to the image: \"{}\". Maintain the person's identity and the overall photographic style.",
        request.trim()
    )
}
