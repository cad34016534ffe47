//! One user's screen: view state, orchestrator, score and host in one place.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::constants::POINTS_POST;
use crate::tone::Tone;
use crate::types::{GenerationRequest, GenerationResult};

use super::host::{ComposeCast, HostActions};
use super::state::{Effect, Event, ViewState};
use super::{GenerationPath, Orchestrator};

/// Drives the single screen, one unit of work at a time.
pub struct Session {
    orchestrator: Orchestrator,
    host: Arc<dyn HostActions>,
    view: ViewState,
    idea: String,
    tone: Tone,
}

impl Session {
    /// A fresh, idle session with the funny tone selected.
    pub fn new(orchestrator: Orchestrator, host: Arc<dyn HostActions>) -> Self {
        Self {
            orchestrator,
            host,
            view: ViewState::default(),
            idea: String::new(),
            tone: Tone::default(),
        }
    }

    /// Signals the host the app is ready and returns the stored score.
    pub async fn start(&self) -> u64 {
        if let Err(err) = self.host.ready().await {
            warn!("Host ready signal failed: {}", err);
        }
        self.orchestrator.score().await
    }

    /// Current view state.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Current idea text.
    pub fn idea(&self) -> &str {
        &self.idea
    }

    /// Replaces the idea text.
    pub fn set_idea(&mut self, idea: impl Into<String>) {
        self.idea = idea.into();
    }

    /// Selects a tone.
    pub fn set_tone(&mut self, tone: Tone) {
        self.tone = tone;
    }

    /// Current score.
    pub async fn score(&self) -> u64 {
        self.orchestrator.score().await
    }

    /// Generates a caption for the current idea.
    ///
    /// A blank idea, or a submit while busy, is a no-op returning `None`.
    pub async fn submit(&mut self) -> Option<GenerationPath> {
        let request = GenerationRequest::new(&self.idea, self.tone)?;
        if let Err(ignored) = self.view.apply(Event::Submit) {
            debug!("{}", ignored);
            return None;
        }

        let (result, path) = self.orchestrator.resolve(&request).await;
        let event = match path {
            GenerationPath::Network => Event::NetworkSuccess(result),
            GenerationPath::Fallback => Event::NetworkFailure(result),
        };
        self.dispatch(event).await;
        Some(path)
    }

    /// New images for the current prompts, no network involved.
    pub async fn regenerate_images(&mut self) -> Option<&GenerationResult> {
        let fresh = self
            .view
            .result()
            .map(|result| self.orchestrator.regenerate_images(result))?;
        if let Err(ignored) = self.view.apply(Event::Regenerate) {
            debug!("{}", ignored);
            return None;
        }
        self.dispatch(Event::RegenerateDone(fresh.images)).await;
        self.view.result()
    }

    /// Marks an image as loaded.
    pub fn image_loaded(&mut self, url: &str) {
        if let Err(ignored) = self.view.apply(Event::ImageLoaded(url.to_string())) {
            debug!("{}", ignored);
        }
    }

    /// Opens the composer with the caption and, for remote images, the chosen image.
    ///
    /// Best effort: host failures are logged. Returns the score, or `None`
    /// when there is nothing to post.
    pub async fn post(&mut self, image: Option<&str>) -> Option<u64> {
        let cast = ComposeCast::new(&self.view.result()?.caption, image);
        let score = self.orchestrator.award(POINTS_POST).await;
        info!(score, embeds = cast.embeds.is_some(), "Opening composer");
        if let Err(err) = self.host.compose_cast(&cast).await {
            warn!("Compose cast failed: {}", err);
        }
        Some(score)
    }

    /// Back to an empty screen.
    pub async fn reset(&mut self) {
        self.dispatch(Event::Reset).await;
    }

    async fn dispatch(&mut self, event: Event) {
        match self.view.apply(event) {
            Ok(effects) => {
                for effect in effects {
                    match effect {
                        Effect::AwardPoints(points) => {
                            self.orchestrator.award(points).await;
                        }
                        Effect::ClearInput => self.idea.clear(),
                    }
                }
            }
            Err(ignored) => debug!("{}", ignored),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::client::state::Phase;
    use crate::client::tests::{StubBackend, network_result};
    use crate::images::tests::counting_endpoint;
    use crate::score::{MemoryScoreStore, ScoreStore};

    #[derive(Debug, Default)]
    struct RecordingHost {
        ready_calls: Mutex<usize>,
        casts: Mutex<Vec<ComposeCast>>,
    }

    #[async_trait]
    impl HostActions for RecordingHost {
        async fn ready(&self) -> Result<(), anyhow::Error> {
            *self.ready_calls.lock().expect("lock") += 1;
            Ok(())
        }

        async fn compose_cast(&self, cast: &ComposeCast) -> Result<(), anyhow::Error> {
            self.casts.lock().expect("lock").push(cast.clone());
            Ok(())
        }
    }

    struct FailingHost;

    #[async_trait]
    impl HostActions for FailingHost {
        async fn ready(&self) -> Result<(), anyhow::Error> {
            anyhow::bail!("no host")
        }

        async fn compose_cast(&self, _cast: &ComposeCast) -> Result<(), anyhow::Error> {
            anyhow::bail!("composer closed")
        }
    }

    fn session(
        backend: Arc<StubBackend>,
        host: Arc<dyn HostActions>,
    ) -> (Session, Arc<MemoryScoreStore>) {
        let score = Arc::new(MemoryScoreStore::default());
        let orchestrator = Orchestrator::new(backend, counting_endpoint(), score.clone());
        (Session::new(orchestrator, host), score)
    }

    #[tokio::test]
    async fn empty_idea_is_a_no_op() {
        let backend = StubBackend::ok(network_result());
        let (mut session, score) = session(backend.clone(), Arc::new(RecordingHost::default()));

        session.set_idea("");
        assert_eq!(session.submit().await, None);
        session.set_idea("   ");
        assert_eq!(session.submit().await, None);

        assert_eq!(backend.calls(), 0);
        assert_eq!(session.view().phase(), Phase::Idle);
        assert_eq!(score.load().await.expect("load"), 0);
    }

    #[tokio::test]
    async fn morning_coffee_run_offline() {
        let backend = StubBackend::down();
        let (mut session, score) = session(backend, Arc::new(RecordingHost::default()));

        session.set_idea("morning coffee run");
        session.set_tone(Tone::Professional);
        assert_eq!(session.submit().await, Some(GenerationPath::Fallback));

        let result = session.view().result().expect("result");
        assert!(result.caption.starts_with("Rise and shine"));
        assert_eq!(
            result.image_prompts,
            vec![
                "morning coffee run cinematic lighting 4k",
                "morning coffee run aesthetic minimal high quality",
                "morning coffee run vibrant artistic style",
            ]
        );
        assert_eq!(result.images.len(), 3);
        assert_eq!(score.load().await.expect("load"), 5);
    }

    #[tokio::test]
    async fn network_generation_then_post_scores_twenty() {
        let host = Arc::new(RecordingHost::default());
        let (mut session, score) = session(StubBackend::ok(network_result()), host.clone());

        assert_eq!(session.start().await, 0);
        session.set_idea("gm");
        assert_eq!(session.submit().await, Some(GenerationPath::Network));
        assert_eq!(score.load().await.expect("load"), 10);

        let image = network_result().images[1].clone();
        assert_eq!(session.post(Some(&image)).await, Some(20));

        let casts = host.casts.lock().expect("lock");
        assert_eq!(casts.len(), 1);
        assert_eq!(casts[0].text, network_result().caption);
        assert_eq!(casts[0].embeds, Some(vec![image]));
        assert_eq!(*host.ready_calls.lock().expect("lock"), 1);
    }

    #[tokio::test]
    async fn posting_a_local_image_sends_no_embeds() {
        let host = Arc::new(RecordingHost::default());
        let (mut session, _) = session(StubBackend::down(), host.clone());

        session.set_idea("gm");
        session.submit().await;
        session.post(Some("blob:https://app/123")).await;

        let casts = host.casts.lock().expect("lock");
        assert_eq!(casts[0].embeds, None);
    }

    #[tokio::test]
    async fn post_without_results_does_nothing() {
        let host = Arc::new(RecordingHost::default());
        let (mut session, score) = session(StubBackend::down(), host.clone());

        assert_eq!(session.post(None).await, None);
        assert!(host.casts.lock().expect("lock").is_empty());
        assert_eq!(score.load().await.expect("load"), 0);
    }

    #[tokio::test]
    async fn host_failures_are_swallowed() {
        let (mut session, score) = session(StubBackend::down(), Arc::new(FailingHost));

        assert_eq!(session.start().await, 0);
        session.set_idea("gm");
        session.submit().await;
        assert_eq!(session.post(None).await, Some(15));
        assert_eq!(score.load().await.expect("load"), 15);
    }

    #[tokio::test]
    async fn regenerate_changes_only_images() {
        let backend = StubBackend::ok(network_result());
        let (mut session, score) = session(backend.clone(), Arc::new(RecordingHost::default()));

        session.set_idea("gm");
        session.submit().await;
        let before = session.view().result().expect("result").clone();

        let after = session.regenerate_images().await.expect("regenerated").clone();
        assert_eq!(after.caption, before.caption);
        assert_eq!(after.image_prompts, before.image_prompts);
        assert_ne!(after.images, before.images);
        assert_eq!(session.view().phase(), Phase::ResultsReady);
        assert_eq!(backend.calls(), 1);
        assert_eq!(score.load().await.expect("load"), 10);
    }

    #[tokio::test]
    async fn reset_clears_idea_and_results() {
        let (mut session, _) = session(StubBackend::down(), Arc::new(RecordingHost::default()));

        session.set_idea("gm");
        session.submit().await;
        let url = session.view().result().expect("result").images[0].clone();
        session.image_loaded(&url);
        assert!(session.view().is_image_loaded(&url));

        session.reset().await;
        assert_eq!(session.idea(), "");
        assert!(session.view().result().is_none());
        assert_eq!(session.view().phase(), Phase::Idle);
        assert!(session.regenerate_images().await.is_none());
    }
}
