//! Post-hoc edits of single images in an assembled document.
//!
//! Proposing an edit never touches a document. A proposal only lands through
//! [`commit`], which swaps the url of exactly one image.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clients::{ImageRef, ImageSynthesizer};
use crate::error::{PhotoshootError, Result};
use crate::output::OutputDocument;
use crate::prompt::edit_instruction;

pub struct PostHocEditor {
    synthesizer: Arc<dyn ImageSynthesizer>,
}

impl PostHocEditor {
    pub fn new(synthesizer: Arc<dyn ImageSynthesizer>) -> Self {
        Self { synthesizer }
    }

    /// One delegated edit of `current` with the user's instruction.
    pub async fn propose_edit(&self, current: &str, instruction: &str) -> Result<ImageRef> {
        if instruction.trim().is_empty() {
            return Err(PhotoshootError::invalid("edit instruction must not be empty"));
        }
        debug!("Proposing edit: {}", instruction.trim());
        self.synthesizer
            .edit(current, &edit_instruction(instruction))
            .await
            .map_err(|source| {
                warn!("Edit failed: {}", source);
                PhotoshootError::EditFailed { source }
            })
    }
}

/// Replaces the url of image `image_id` with an accepted candidate.
pub fn commit(document: &OutputDocument, image_id: u32, candidate: &str) -> Result<OutputDocument> {
    let updated = document.with_image_url(image_id, candidate)?;
    info!("Committed edit for image {}", image_id);
    Ok(updated)
}

/// Chained edits of one image. Each proposal starts from the latest candidate
/// (or the original when there is none) and yields a new session; a failed
/// proposal leaves the previous session as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    image_id: u32,
    base: ImageRef,
    candidate: Option<ImageRef>,
}

impl EditSession {
    pub fn open(document: &OutputDocument, image_id: u32) -> Result<Self> {
        let image = document
            .image(image_id)
            .ok_or(PhotoshootError::ImageNotFound { id: image_id })?;
        Ok(Self {
            image_id,
            base: image.url.clone(),
            candidate: None,
        })
    }

    pub fn image_id(&self) -> u32 {
        self.image_id
    }

    pub fn candidate(&self) -> Option<&str> {
        self.candidate.as_deref()
    }

    /// The image the next edit starts from.
    pub fn current(&self) -> &str {
        self.candidate.as_deref().unwrap_or(&self.base)
    }

    pub async fn propose(&self, editor: &PostHocEditor, instruction: &str) -> Result<Self> {
        let next = editor.propose_edit(self.current(), instruction).await?;
        Ok(Self {
            image_id: self.image_id,
            base: self.base.clone(),
            candidate: Some(next),
        })
    }

    /// Applies `instructions` in order, each on top of the previous candidate.
    /// Stops at the first failure and returns it; nothing is committed.
    pub async fn propose_all<S: AsRef<str>>(
        &self,
        editor: &PostHocEditor,
        instructions: &[S],
    ) -> Result<Self> {
        let mut session = self.clone();
        for instruction in instructions {
            session = session.propose(editor, instruction.as_ref()).await?;
        }
        Ok(session)
    }

    /// Applies the latest candidate. Without one the document is returned as is.
    pub fn commit(&self, document: &OutputDocument) -> Result<OutputDocument> {
        match &self.candidate {
            Some(candidate) => commit(document, self.image_id, candidate),
            None => Ok(document.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::PlaceholderSynthesizer;

    #[tokio::test]
    async fn empty_instruction_is_rejected_without_a_call() {
        let synth = Arc::new(PlaceholderSynthesizer::default());
        let editor = PostHocEditor::new(synth.clone());
        let err = editor.propose_edit("https://img", "  ").await.unwrap_err();
        assert!(matches!(err, PhotoshootError::InvalidSelection { .. }));
        assert_eq!(synth.calls(), 0);
    }

    #[tokio::test]
    async fn instruction_is_wrapped_with_identity_clause() {
        let synth = Arc::new(PlaceholderSynthesizer::default());
        let editor = PostHocEditor::new(synth.clone());
        editor.propose_edit("https://img", "blur the background").await.unwrap();
        let sent = synth.instructions();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("\"blur the background\""));
        assert!(sent[0].contains("Maintain the person's identity"));
    }

    #[tokio::test]
    async fn failed_edit_maps_to_edit_failed() {
        let synth = Arc::new(PlaceholderSynthesizer::default().failing_on_call(1));
        let editor = PostHocEditor::new(synth);
        let err = editor.propose_edit("https://img", "add a smile").await.unwrap_err();
        assert!(matches!(err, PhotoshootError::EditFailed { .. }));
    }
}
