//! Deterministic per-index variation across a batch.
//!
//! Each pool is cycled independently with `index mod len`. Once the batch is
//! longer than a pool, that pool's values repeat; there is no shuffling so a
//! given selection set always produces the same shot list.

use serde::{Deserialize, Serialize};

use crate::error::{PhotoshootError, Result};
use crate::selection::{LensMm, LightSetup, LookSelection, LookSet, PoseSet, ShotType};

/// Attribute catalogs cycled across a batch. Serialized into the session
/// metadata of every output document. Every pool is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PoolLists")]
pub struct DiversityPools {
    lenses: Vec<LensMm>,
    shot_types: Vec<ShotType>,
    light: Vec<LightSetup>,
}

#[derive(Deserialize)]
struct PoolLists {
    lenses: Vec<LensMm>,
    shot_types: Vec<ShotType>,
    light: Vec<LightSetup>,
}

impl TryFrom<PoolLists> for DiversityPools {
    type Error = PhotoshootError;

    fn try_from(raw: PoolLists) -> Result<Self> {
        if raw.lenses.is_empty() || raw.shot_types.is_empty() || raw.light.is_empty() {
            return Err(PhotoshootError::invalid("diversity pools must not be empty"));
        }
        Ok(Self {
            lenses: raw.lenses,
            shot_types: raw.shot_types,
            light: raw.light,
        })
    }
}

impl Default for DiversityPools {
    fn default() -> Self {
        Self {
            lenses: vec![LensMm::Mm35, LensMm::Mm50, LensMm::Mm85],
            shot_types: vec![ShotType::Portrait, ShotType::Half, ShotType::Full],
            light: vec![
                LightSetup::Softbox,
                LightSetup::Rim,
                LightSetup::Butterfly,
                LightSetup::Split,
            ],
        }
    }
}

/// The variation chosen for one batch slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiversityTuple<'a> {
    pub look: &'a LookSelection,
    pub lens: LensMm,
    pub shot_type: ShotType,
    pub light_setup: LightSetup,
    pub pose: &'a str,
}

impl DiversityPools {
    pub fn lenses(&self) -> &[LensMm] {
        &self.lenses
    }

    pub fn shot_types(&self) -> &[ShotType] {
        &self.shot_types
    }

    pub fn light(&self) -> &[LightSetup] {
        &self.light
    }

    /// Variation for batch slot `index`. Pure: same inputs, same tuple.
    pub fn for_index<'a>(
        &self,
        index: usize,
        looks: &'a LookSet,
        poses: &'a PoseSet,
    ) -> DiversityTuple<'a> {
        DiversityTuple {
            look: looks.cycle(index),
            lens: self.lenses[index % self.lenses.len()],
            shot_type: self.shot_types[index % self.shot_types.len()],
            light_setup: self.light[index % self.light.len()],
            pose: poses.cycle(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Selection;

    fn looks(names: &[&str]) -> LookSet {
        LookSet::new(names.iter().map(|n| Selection::generate(*n).unwrap()).collect()).unwrap()
    }

    fn poses(names: &[&str]) -> PoseSet {
        PoseSet::new(names.iter().map(|n| n.to_string()).collect()).unwrap()
    }

    #[test]
    fn pools_cycle_independently() {
        let pools = DiversityPools::default();
        let looks = looks(&["A"]);
        let poses = poses(&["P1"]);

        let lenses: Vec<u32> = (0..5)
            .map(|i| pools.for_index(i, &looks, &poses).lens.millimetres())
            .collect();
        assert_eq!(lenses, vec![35, 50, 85, 35, 50]);

        let shots: Vec<ShotType> = (0..5)
            .map(|i| pools.for_index(i, &looks, &poses).shot_type)
            .collect();
        assert_eq!(
            shots,
            vec![
                ShotType::Portrait,
                ShotType::Half,
                ShotType::Full,
                ShotType::Portrait,
                ShotType::Half
            ]
        );

        let light: Vec<LightSetup> = (0..5)
            .map(|i| pools.for_index(i, &looks, &poses).light_setup)
            .collect();
        assert_eq!(
            light,
            vec![
                LightSetup::Softbox,
                LightSetup::Rim,
                LightSetup::Butterfly,
                LightSetup::Split,
                LightSetup::Softbox
            ]
        );
    }

    #[test]
    fn two_looks_one_pose_alternate_looks() {
        let pools = DiversityPools::default();
        let looks = looks(&["A", "B"]);
        let poses = poses(&["P1"]);
        let seq: Vec<&str> = (0..5)
            .map(|i| pools.for_index(i, &looks, &poses).look.value())
            .collect();
        assert_eq!(seq, vec!["A", "B", "A", "B", "A"]);
        assert!((0..5).all(|i| pools.for_index(i, &looks, &poses).pose == "P1"));
    }

    #[test]
    fn same_index_same_tuple() {
        let pools = DiversityPools::default();
        let looks = looks(&["A", "B", "C"]);
        let poses = poses(&["P1", "P2"]);
        for i in 0..12 {
            assert_eq!(
                pools.for_index(i, &looks, &poses),
                pools.for_index(i, &looks, &poses)
            );
        }
    }

    #[test]
    fn five_slots_have_distinct_triples() {
        let pools = DiversityPools::default();
        let looks = looks(&["A"]);
        let poses = poses(&["P1"]);
        let triples: std::collections::HashSet<_> = (0..5)
            .map(|i| {
                let t = pools.for_index(i, &looks, &poses);
                (t.lens, t.shot_type, t.light_setup)
            })
            .collect();
        assert_eq!(triples.len(), 5);
    }

    #[test]
    fn empty_pools_are_rejected_on_load() {
        let raw = serde_json::json!({
            "lenses": [],
            "shot_types": ["portrait"],
            "light": ["rim"]
        });
        assert!(serde_json::from_value::<DiversityPools>(raw).is_err());

        let back: DiversityPools =
            serde_json::from_value(serde_json::to_value(DiversityPools::default()).unwrap())
                .unwrap();
        assert_eq!(back.lenses().len(), 3);
        assert_eq!(back.light()[3], LightSetup::Split);
    }

    #[test]
    fn pools_serialize_with_document_field_names() {
        let v = serde_json::to_value(DiversityPools::default()).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "lenses": [35, 50, 85],
                "shot_types": ["portrait", "half", "full"],
                "light": ["softbox", "rim", "butterfly", "split"]
            })
        );
    }
}
