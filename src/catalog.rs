//! Static preset catalogs for studios, looks and poses.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{PhotoshootError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
}

impl Preset {
    fn new(id: &str, name: &str, description: &str, image_url: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            image_url: image_url.to_string(),
        }
    }
}

static STUDIO_PRESETS: Lazy<Vec<Preset>> = Lazy::new(|| {
    vec![
        Preset::new(
            "studio:white_cyclorama_soft",
            "White cyclorama",
            "Soft light, clean backdrop",
            "https://images.unsplash.com/photo-1619891823426-90f73f277a28?w=400&h=300&fit=crop",
        ),
        Preset::new(
            "studio:moody_rembrandt",
            "Moody Rembrandt",
            "Dark backdrop, Rembrandt lighting",
            "https://images.unsplash.com/photo-1579952516518-6c21a4fa8f6b?w=400&h=300&fit=crop",
        ),
        Preset::new(
            "studio:beige_editorial",
            "Beige editorial",
            "Magazine aesthetic",
            "https://images.unsplash.com/photo-1594013589154-0aa8a7c2936a?w=400&h=300&fit=crop",
        ),
        Preset::new(
            "studio:loft_concrete",
            "Concrete loft",
            "Diffused daylight",
            "https://images.unsplash.com/photo-1581578731548-c64695cc6952?w=400&h=300&fit=crop",
        ),
        Preset::new(
            "studio:neon_purple_blue",
            "Neon",
            "Purple-blue neon, haze",
            "https://images.unsplash.com/photo-1581333100699-9a07a163d01a?w=400&h=300&fit=crop",
        ),
        Preset::new(
            "studio:fashion_color_paper",
            "Color paper",
            "Bright seamless paper backdrop",
            "https://images.unsplash.com/photo-1612015842845-fafb39c00b21?w=400&h=300&fit=crop",
        ),
    ]
});

static LOOK_PRESETS: Lazy<Vec<Preset>> = Lazy::new(|| {
    vec![
        Preset::new(
            "look:classic_suit_black",
            "Black suit",
            "Oversized, white shirt, loafers",
            "https://images.unsplash.com/photo-1617137968427-85924c800a22?w=400&h=300&fit=crop",
        ),
        Preset::new(
            "look:smart_casual_beige",
            "Smart casual",
            "Beige cardigan, light trousers",
            "https://images.unsplash.com/photo-1552504462-0e6e4a83313e?w=400&h=300&fit=crop",
        ),
        Preset::new(
            "look:streetwear_monochrome",
            "Streetwear",
            "Monochrome, hoodie, cargo pants",
            "https://images.unsplash.com/photo-1576995853123-5a1d3b4d4b1b?w=400&h=300&fit=crop",
        ),
        Preset::new(
            "look:editorial_all_white",
            "Total white",
            "Voluminous shapes, all white",
            "https://images.unsplash.com/photo-1543725528-2d0a02a0a24c?w=400&h=300&fit=crop",
        ),
        Preset::new(
            "look:turtleneck_dark",
            "Dark turtleneck",
            "Minimalism, blazer",
            "https://images.unsplash.com/photo-1614031633594-58079a2b53f6?w=400&h=300&fit=crop",
        ),
        Preset::new(
            "look:festive_black_tie",
            "Black tie",
            "Tuxedo, bow tie",
            "https://images.unsplash.com/photo-1508341591423-4347094e13ab?w=400&h=300&fit=crop",
        ),
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseGroup {
    Standing,
    Sitting,
    Dynamic,
    Portrait,
}

/// Professional pose library offered by the pose picker.
pub static PROFESSIONAL_POSES: &[(PoseGroup, &str)] = &[
    (PoseGroup::Standing, "standing confidently with arms crossed, looking at the camera"),
    (PoseGroup::Standing, "casually leaning against a neutral wall, slight smile"),
    (PoseGroup::Standing, "standing with hands in pockets, looking relaxed and approachable"),
    (PoseGroup::Standing, "one hand in pocket, the other relaxed at the side, confident look"),
    (PoseGroup::Standing, "leaning slightly forward over a table or railing, hands clasped"),
    (PoseGroup::Standing, "standing with a tablet or notebook, looking engaged"),
    (PoseGroup::Standing, "full-length shot, standing straight, looking strong and direct"),
    (PoseGroup::Sitting, "sitting in a modern armchair, three-quarters to the camera"),
    (PoseGroup::Sitting, "thoughtful pose with a hand resting on the chin"),
    (PoseGroup::Sitting, "sitting on a chair, leaning slightly forward, engaged and listening"),
    (PoseGroup::Sitting, "sitting at a desk mid-sentence, gesturing with one hand"),
    (PoseGroup::Sitting, "relaxed in a comfortable chair, legs crossed, pensive look"),
    (PoseGroup::Sitting, "leaning back in a chair with hands behind the head, creative and relaxed"),
    (PoseGroup::Dynamic, "walking towards the camera with a sense of motion"),
    (PoseGroup::Dynamic, "looking over the shoulder at the camera"),
    (PoseGroup::Dynamic, "adjusting a cufflink or watch, detail-oriented pose"),
    (PoseGroup::Dynamic, "mid-stride, captured walking down a modern corridor"),
    (PoseGroup::Dynamic, "putting on or adjusting a jacket, classic getting-ready shot"),
    (PoseGroup::Dynamic, "interacting with an object in the scene, such as picking up a book"),
    (PoseGroup::Portrait, "classic headshot, looking straight into the camera with a friendly expression"),
    (PoseGroup::Portrait, "genuine laugh, looking slightly away from the camera"),
    (PoseGroup::Portrait, "naturally holding a prop such as a tablet or a cup of coffee"),
    (PoseGroup::Portrait, "classic portrait with a slight head tilt, conveying curiosity"),
    (PoseGroup::Portrait, "looking away from the camera with a thoughtful, visionary expression"),
    (PoseGroup::Portrait, "sincere, warm smile, looking directly into the lens"),
    (PoseGroup::Portrait, "more serious, intense expression for a dramatic headshot"),
];

pub fn poses_in(group: PoseGroup) -> impl Iterator<Item = &'static str> {
    PROFESSIONAL_POSES
        .iter()
        .filter(move |(g, _)| *g == group)
        .map(|(_, pose)| *pose)
}

/// Lookup tables the prompt compiler resolves preset ids against.
#[derive(Debug, Clone, Default)]
pub struct PresetCatalog {
    studios: Vec<Preset>,
    looks: Vec<Preset>,
}

impl PresetCatalog {
    pub fn new(studios: Vec<Preset>, looks: Vec<Preset>) -> Self {
        Self { studios, looks }
    }

    /// The catalog shipped with the application.
    pub fn builtin() -> Self {
        Self::new(STUDIO_PRESETS.clone(), LOOK_PRESETS.clone())
    }

    pub fn studios(&self) -> &[Preset] {
        &self.studios
    }

    pub fn looks(&self) -> &[Preset] {
        &self.looks
    }

    pub fn studio(&self, id: &str) -> Result<&Preset> {
        self.studios
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| PhotoshootError::UnresolvedReference {
                kind: "studio",
                id: id.to_string(),
            })
    }

    pub fn look(&self, id: &str) -> Result<&Preset> {
        self.looks
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| PhotoshootError::UnresolvedReference {
                kind: "look",
                id: id.to_string(),
            })
    }

    /// Same catalog without one studio preset; used to model stale references.
    pub fn without_studio(&self, id: &str) -> Self {
        Self {
            studios: self.studios.iter().filter(|p| p.id != id).cloned().collect(),
            looks: self.looks.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_resolves_known_ids() {
        let catalog = PresetCatalog::builtin();
        assert_eq!(catalog.studios().len(), 6);
        assert_eq!(catalog.looks().len(), 6);
        assert_eq!(
            catalog.studio("studio:moody_rembrandt").unwrap().name,
            "Moody Rembrandt"
        );
        assert_eq!(catalog.look("look:festive_black_tie").unwrap().name, "Black tie");
    }

    #[test]
    fn missing_ids_surface_unresolved_reference() {
        let catalog = PresetCatalog::builtin().without_studio("studio:moody_rembrandt");
        match catalog.studio("studio:moody_rembrandt") {
            Err(PhotoshootError::UnresolvedReference { kind, id }) => {
                assert_eq!(kind, "studio");
                assert_eq!(id, "studio:moody_rembrandt");
            }
            other => panic!("expected unresolved reference, got {:?}", other),
        }
        assert!(catalog.look("look:nope").is_err());
    }

    #[test]
    fn pose_groups_partition_the_library() {
        let total: usize = [
            PoseGroup::Standing,
            PoseGroup::Sitting,
            PoseGroup::Dynamic,
            PoseGroup::Portrait,
        ]
        .into_iter()
        .map(|g| poses_in(g).count())
        .sum();
        assert_eq!(total, PROFESSIONAL_POSES.len());
        assert_eq!(poses_in(PoseGroup::Sitting).count(), 6);
    }
}
