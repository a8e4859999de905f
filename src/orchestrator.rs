//! Sequential batch generation.
//!
//! One run issues exactly [`BATCH_SIZE`] delegated calls, one at a time, each
//! awaited before the next starts. Progress is reported after every success.
//! The first failure aborts the run and everything generated so far is
//! dropped; there is no partial result.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::catalog::PresetCatalog;
use crate::clients::ImageSynthesizer;
use crate::diversity::DiversityPools;
use crate::error::{PhotoshootError, Result};
use crate::output::{GeneratedImage, ImageMetadata, OutputDocument, assemble};
use crate::prompt::{PromptCompiler, ShotRequest};
use crate::selection::{CameraAngle, LookSet, PoseSet, SessionDraft, StudioSelection, StyleLevel};

/// Images per run. Policy constant, not user-configurable.
pub const BATCH_SIZE: usize = 5;

/// A selection set that passed validation and may start a batch.
#[derive(Debug, Clone)]
pub struct ConfirmedSession {
    pub subject_photo: String,
    pub studio: StudioSelection,
    pub looks: LookSet,
    pub poses: PoseSet,
    pub camera_angle: CameraAngle,
    pub style_level: StyleLevel,
}

impl ConfirmedSession {
    /// Fails fast with `MissingSelection` on the first absent input, checked
    /// in wizard order: photo, studio, looks, poses.
    pub fn from_draft(draft: &SessionDraft) -> Result<Self> {
        let subject_photo = draft
            .subject_photo
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| PhotoshootError::missing("subject photo"))?
            .to_string();
        let studio = draft
            .studio
            .clone()
            .ok_or_else(|| PhotoshootError::missing("studio"))?;
        studio.selection.validate()?;
        let looks = LookSet::new(draft.looks.clone())?;
        let poses = PoseSet::new(draft.poses.clone())?;

        Ok(Self {
            subject_photo,
            studio,
            looks,
            poses,
            camera_angle: draft.camera_angle,
            style_level: draft.style_level,
        })
    }
}

/// One batch slot before it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedShot {
    pub id: u32,
    pub instruction: String,
    pub metadata: ImageMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum BatchState {
    Idle,
    Running(usize),
    Succeeded,
    Aborted(usize),
}

pub struct BatchOrchestrator {
    synthesizer: Arc<dyn ImageSynthesizer>,
    compiler: PromptCompiler,
    pools: DiversityPools,
}

impl BatchOrchestrator {
    pub fn new(synthesizer: Arc<dyn ImageSynthesizer>) -> Self {
        Self::with_catalog(synthesizer, PresetCatalog::builtin())
    }

    pub fn with_catalog(synthesizer: Arc<dyn ImageSynthesizer>, catalog: PresetCatalog) -> Self {
        Self {
            synthesizer,
            compiler: PromptCompiler::new(catalog),
            pools: DiversityPools::default(),
        }
    }

    pub fn pools(&self) -> &DiversityPools {
        &self.pools
    }

    /// Diversity tuple and compiled instruction for slot `index`.
    pub fn plan_shot(&self, session: &ConfirmedSession, index: usize) -> PlannedShot {
        let tuple = self
            .pools
            .for_index(index, &session.looks, &session.poses);
        let instruction = self.compiler.compile(&ShotRequest {
            studio: &session.studio,
            look: tuple.look,
            pose: tuple.pose,
            camera_angle: session.camera_angle,
            lens: tuple.lens,
            shot_type: tuple.shot_type,
            light_setup: tuple.light_setup,
            style_level: session.style_level,
        });

        PlannedShot {
            id: index as u32 + 1,
            instruction,
            metadata: ImageMetadata {
                lens: tuple.lens,
                shot_type: tuple.shot_type,
                light_setup: tuple.light_setup,
                camera_angle: session.camera_angle,
                pose: tuple.pose.to_string(),
                style_level: session.style_level,
            },
        }
    }

    /// Every slot of a run, without calling the capability.
    pub fn shot_list(&self, session: &ConfirmedSession) -> Vec<PlannedShot> {
        (0..BATCH_SIZE)
            .map(|i| self.plan_shot(session, i))
            .collect()
    }

    /// Validates the draft, then runs the batch.
    pub async fn run(
        &self,
        draft: &SessionDraft,
        on_progress: impl FnMut(usize) + Send,
    ) -> Result<OutputDocument> {
        let session = ConfirmedSession::from_draft(draft)?;
        self.run_confirmed(&session, on_progress).await
    }

    pub async fn run_confirmed(
        &self,
        session: &ConfirmedSession,
        mut on_progress: impl FnMut(usize) + Send,
    ) -> Result<OutputDocument> {
        let mut state = BatchState::Idle;
        debug!("batch state: {:?}", state);
        info!(
            "Starting batch of {} (provider={}, looks={}, poses={})",
            BATCH_SIZE,
            self.synthesizer.name(),
            session.looks.len(),
            session.poses.len()
        );

        let mut images = Vec::with_capacity(BATCH_SIZE);
        for index in 0..BATCH_SIZE {
            state = BatchState::Running(index);
            debug!("batch state: {:?}", state);

            let shot = self.plan_shot(session, index);
            let url = match self
                .synthesizer
                .generate(&session.subject_photo, &shot.instruction)
                .await
            {
                Ok(url) => url,
                Err(source) => {
                    state = BatchState::Aborted(index);
                    error!(
                        "Batch aborted at index {} ({:?}): {}",
                        index, state, source
                    );
                    return Err(PhotoshootError::Generation { index, source });
                }
            };

            images.push(GeneratedImage {
                id: shot.id,
                url,
                metadata: shot.metadata,
            });
            on_progress(index + 1);
        }

        state = BatchState::Succeeded;
        debug!("batch state: {:?}", state);
        info!("Batch complete: {} images", images.len());

        Ok(assemble(
            images,
            &session.subject_photo,
            &session.studio,
            &session.looks,
            &self.pools,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::PlaceholderSynthesizer;
    use crate::selection::{Selection, StudioDetails};

    fn draft() -> SessionDraft {
        SessionDraft {
            subject_photo: Some("data:image/png;base64,AAAA".into()),
            studio: Some(StudioSelection::new(
                Selection::preset("studio:beige_editorial").unwrap(),
                StudioDetails::default(),
            )),
            looks: vec![
                Selection::preset("look:smart_casual_beige").unwrap(),
                Selection::generate("linen suit").unwrap(),
            ],
            poses: vec!["arms crossed".into()],
            camera_angle: CameraAngle::Low,
            style_level: StyleLevel::Magazine,
        }
    }

    #[test]
    fn missing_inputs_are_reported_in_wizard_order() {
        let mut d = draft();
        d.subject_photo = Some("   ".into());
        d.studio = None;
        match ConfirmedSession::from_draft(&d) {
            Err(PhotoshootError::MissingSelection { what }) => assert_eq!(what, "subject photo"),
            other => panic!("unexpected {:?}", other),
        }

        let mut d = draft();
        d.studio = None;
        match ConfirmedSession::from_draft(&d) {
            Err(PhotoshootError::MissingSelection { what }) => assert_eq!(what, "studio"),
            other => panic!("unexpected {:?}", other),
        }

        let mut d = draft();
        d.poses.clear();
        match ConfirmedSession::from_draft(&d) {
            Err(PhotoshootError::MissingSelection { what }) => assert_eq!(what, "at least one pose"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn shot_list_ids_and_metadata_follow_index() {
        let orchestrator = BatchOrchestrator::new(Arc::new(PlaceholderSynthesizer::default()));
        let session = ConfirmedSession::from_draft(&draft()).unwrap();
        let shots = orchestrator.shot_list(&session);

        assert_eq!(shots.len(), BATCH_SIZE);
        assert_eq!(shots.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert!(shots[0].instruction.contains("Smart casual"));
        assert!(shots[1].instruction.contains("linen suit."));
        assert!(shots.iter().all(|s| s.metadata.camera_angle == CameraAngle::Low));
        assert_eq!(shots, orchestrator.shot_list(&session));
    }

    #[tokio::test]
    async fn validation_failure_makes_no_calls() {
        let synth = Arc::new(PlaceholderSynthesizer::default());
        let orchestrator = BatchOrchestrator::new(synth.clone());
        let mut d = draft();
        d.looks.clear();

        let mut progress = Vec::new();
        let err = orchestrator.run(&d, |p| progress.push(p)).await.unwrap_err();
        assert!(matches!(err, PhotoshootError::MissingSelection { .. }));
        assert_eq!(synth.calls(), 0);
        assert!(progress.is_empty());
    }
}
