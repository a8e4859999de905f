//! Renders a studio backdrop from a text description so the user can preview
//! a generated studio before committing it.

use tracing::info;

use crate::clients::ImageSynthesizer;
use crate::error::{PhotoshootError, Result};
use crate::prompt::studio_background_prompt;
use crate::selection::{Selection, StudioDetails, StudioSelection};

pub async fn design_studio(
    synthesizer: &dyn ImageSynthesizer,
    description: &str,
    details: StudioDetails,
) -> Result<StudioSelection> {
    let prompt = description.trim();
    if prompt.is_empty() {
        return Err(PhotoshootError::invalid("studio description must not be empty"));
    }

    let preview = synthesizer
        .generate_from_text(&studio_background_prompt(prompt))
        .await?;
    info!("Rendered studio preview for '{}'", prompt);

    Ok(StudioSelection::new(
        Selection::Generate {
            prompt: prompt.to_string(),
            resolved_image: Some(preview),
        },
        details,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::PlaceholderSynthesizer;

    #[tokio::test]
    async fn preview_is_attached_to_generated_selection() {
        let synth = PlaceholderSynthesizer::default();
        let studio = design_studio(&synth, " terracotta wall ", StudioDetails::default())
            .await
            .unwrap();
        match &studio.selection {
            Selection::Generate {
                prompt,
                resolved_image: Some(url),
            } => {
                assert_eq!(prompt, "terracotta wall");
                assert!(url.ends_with("/1024/768"));
            }
            other => panic!("unexpected selection {:?}", other),
        }
        assert_eq!(
            synth.instructions(),
            vec!["High-quality photo of a professional studio background: terracotta wall"]
        );
    }

    #[tokio::test]
    async fn failure_is_a_synthesis_error() {
        let synth = PlaceholderSynthesizer::default().failing_on_call(1);
        let err = design_studio(&synth, "loft", StudioDetails::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PhotoshootError::Synthesis(_)));
    }
}
