use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::clients::traits::{ImageRef, ImageSynthesizer, SynthesisError};

/// Offline stand-in for the image capability. Returns picsum placeholder urls
/// after a configurable delay; latency, call count and an injected failure
/// stay observable for tests and demos.
#[derive(Debug)]
pub struct PlaceholderSynthesizer {
    latency: Duration,
    fail_on_call: Option<usize>,
    calls: AtomicUsize,
    instructions: Mutex<Vec<String>>,
}

impl Default for PlaceholderSynthesizer {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl PlaceholderSynthesizer {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            fail_on_call: None,
            calls: AtomicUsize::new(0),
            instructions: Mutex::new(Vec::new()),
        }
    }

    /// Makes the `call`-th invocation (1-based, across all methods) fail.
    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Instruction text of every call so far, in order.
    pub fn instructions(&self) -> Vec<String> {
        self.instructions
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    async fn respond(
        &self,
        instruction: &str,
        seed_prefix: &str,
        width: u32,
        height: u32,
    ) -> Result<ImageRef, SynthesisError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut log) = self.instructions.lock() {
            log.push(instruction.to_string());
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.fail_on_call == Some(call) {
            return Err(SynthesisError::Injected { call });
        }
        let seed = uuid::Uuid::new_v4().simple().to_string();
        Ok(format!(
            "https://picsum.photos/seed/{}{}/{}/{}",
            seed_prefix,
            &seed[..8],
            width,
            height
        ))
    }
}

#[async_trait]
impl ImageSynthesizer for PlaceholderSynthesizer {
    async fn generate(
        &self,
        _subject_image: &str,
        instruction: &str,
    ) -> Result<ImageRef, SynthesisError> {
        self.respond(instruction, "", 800, 1000).await
    }

    async fn generate_from_text(&self, prompt: &str) -> Result<ImageRef, SynthesisError> {
        self.respond(prompt, "", 1024, 768).await
    }

    async fn edit(&self, _base_image: &str, instruction: &str) -> Result<ImageRef, SynthesisError> {
        self.respond(instruction, "edit_", 800, 1000).await
    }

    fn name(&self) -> &'static str {
        "placeholder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_sized_placeholder_urls() {
        let synth = PlaceholderSynthesizer::default();
        let portrait = synth.generate("data:image/png;base64,AA", "x").await.unwrap();
        let studio = synth.generate_from_text("y").await.unwrap();
        let edited = synth.edit(&portrait, "z").await.unwrap();

        assert!(portrait.starts_with("https://picsum.photos/seed/"));
        assert!(portrait.ends_with("/800/1000"));
        assert!(studio.ends_with("/1024/768"));
        assert!(edited.starts_with("https://picsum.photos/seed/edit_"));
        assert_eq!(synth.calls(), 3);
        assert_eq!(synth.instructions(), vec!["x", "y", "z"]);
    }

    #[tokio::test]
    async fn injected_failure_hits_only_that_call() {
        let synth = PlaceholderSynthesizer::default().failing_on_call(2);
        assert!(synth.generate_from_text("a").await.is_ok());
        assert!(matches!(
            synth.generate_from_text("b").await,
            Err(SynthesisError::Injected { call: 2 })
        ));
        assert!(synth.generate_from_text("c").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_applied_per_call() {
        let synth = PlaceholderSynthesizer::new(Duration::from_millis(1500));
        let start = tokio::time::Instant::now();
        synth.generate_from_text("a").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }
}
