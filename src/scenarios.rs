//! Quick-start scenarios that prefill a studio and a set of looks.

use serde::Serialize;

use crate::error::Result;
use crate::selection::{
    LensMm, LightQuality, LookSelection, Palette, Selection, SessionDraft, StudioDetails,
    StudioSelection,
};

#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub image_url: &'static str,
    pub studio: StudioSelection,
    pub looks: Vec<LookSelection>,
}

impl Scenario {
    /// Starts a wizard session from this scenario. Poses are left for the user.
    pub fn session(&self, subject_photo: Option<String>) -> SessionDraft {
        SessionDraft {
            subject_photo,
            studio: Some(self.studio.clone()),
            looks: self.looks.clone(),
            ..SessionDraft::default()
        }
    }
}

pub fn builtin_scenarios() -> Result<Vec<Scenario>> {
    Ok(vec![
        Scenario {
            id: "business-headshot",
            name: "Business portrait",
            description: "Classic studio photos for a resume, LinkedIn or a corporate site.",
            image_url: "https://images.unsplash.com/photo-1560250097-0b93528c311a?w=400&h=300&fit=crop",
            studio: StudioSelection::new(
                Selection::preset("studio:moody_rembrandt")?,
                StudioDetails {
                    light: LightQuality::Soft,
                    lens: LensMm::Mm85,
                    palette: Palette::Neutral,
                },
            ),
            looks: vec![
                Selection::preset("look:classic_suit_black")?,
                Selection::preset("look:turtleneck_dark")?,
            ],
        },
        Scenario {
            id: "social-media-content",
            name: "Social media content",
            description: "Bright, stylish looks that stand out in your feed.",
            image_url: "https://images.unsplash.com/photo-1512310604669-443f26c35f52?w=400&h=300&fit=crop",
            studio: StudioSelection::new(
                Selection::preset("studio:neon_purple_blue")?,
                StudioDetails {
                    light: LightQuality::Hard,
                    lens: LensMm::Mm35,
                    palette: Palette::Cool,
                },
            ),
            looks: vec![
                Selection::preset("look:streetwear_monochrome")?,
                Selection::preset("look:editorial_all_white")?,
            ],
        },
        Scenario {
            id: "creative-editorial",
            name: "Creative editorial",
            description: "Magazine aesthetic for bold experiments with style.",
            image_url: "https://images.unsplash.com/photo-1506794778202-cad84cf45f1d?w=400&h=300&fit=crop",
            studio: StudioSelection::new(
                Selection::preset("studio:beige_editorial")?,
                StudioDetails {
                    light: LightQuality::Soft,
                    lens: LensMm::Mm50,
                    palette: Palette::Warm,
                },
            ),
            looks: vec![
                Selection::preset("look:editorial_all_white")?,
                Selection::generate("avant-garde clothing with unusual shapes and textures")?,
            ],
        },
    ])
}

pub fn find_scenario(id: &str) -> Result<Option<Scenario>> {
    Ok(builtin_scenarios()?.into_iter().find(|s| s.id == id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PresetCatalog;

    #[test]
    fn scenario_presets_exist_in_builtin_catalog() {
        let catalog = PresetCatalog::builtin();
        for scenario in builtin_scenarios().unwrap() {
            if let Selection::Preset { preset_id } = &scenario.studio.selection {
                assert!(catalog.studio(preset_id).is_ok(), "{}", preset_id);
            }
            for look in &scenario.looks {
                if let Selection::Preset { preset_id } = look {
                    assert!(catalog.look(preset_id).is_ok(), "{}", preset_id);
                }
            }
        }
    }

    #[test]
    fn scenario_session_leaves_poses_empty() {
        let scenario = find_scenario("creative-editorial").unwrap().unwrap();
        let draft = scenario.session(Some("data:image/png;base64,AAAA".into()));
        assert_eq!(draft.looks.len(), 2);
        assert!(draft.poses.is_empty());
        assert_eq!(draft.studio.unwrap().details.palette, Palette::Warm);
    }

    #[test]
    fn unknown_scenario_is_none() {
        assert!(find_scenario("wedding").unwrap().is_none());
    }
}
