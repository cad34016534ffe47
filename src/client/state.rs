//! View state as an explicit state machine.
//!
//! [`ViewState::apply`] is pure: it moves between phases and reports the side
//! effects the caller has to carry out. Events that don't make sense in the
//! current phase are ignored, which is what keeps a second submit from
//! starting while one is already in flight.

use std::collections::HashSet;

use crate::types::GenerationResult;

use super::GenerationPath;

/// Where the single screen is at.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Phase {
    /// Waiting for an idea
    #[default]
    Idle,
    /// A generation is in flight
    Generating,
    /// Caption and images are showing
    ResultsReady,
    /// New image URLs are being derived
    RegeneratingImages,
}

/// Things that happen to the screen.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Event {
    /// The user asked for a caption
    Submit,
    /// The service produced a result
    NetworkSuccess(GenerationResult),
    /// The service failed, carries the offline result
    NetworkFailure(GenerationResult),
    /// The user asked for new images
    Regenerate,
    /// New image URLs are ready
    RegenerateDone(Vec<String>),
    /// Back to an empty screen
    Reset,
    /// An image finished loading
    ImageLoaded(String),
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Event::Submit => "submit",
            Event::NetworkSuccess(_) => "network_success",
            Event::NetworkFailure(_) => "network_failure",
            Event::Regenerate => "regenerate",
            Event::RegenerateDone(_) => "regenerate_done",
            Event::Reset => "reset",
            Event::ImageLoaded(_) => "image_loaded",
        }
    }
}

/// Work the caller does after a transition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Effect {
    /// Add points to the score
    AwardPoints(u64),
    /// Clear the idea input
    ClearInput,
}

/// An event arrived in a phase that doesn't accept it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ignored {
    /// Phase at the time
    pub phase: Phase,
    /// Which event
    pub event: &'static str,
}

impl std::fmt::Display for Ignored {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ignored while {:?}", self.event, self.phase)
    }
}

impl std::error::Error for Ignored {}

/// Everything the screen shows.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ViewState {
    phase: Phase,
    result: Option<GenerationResult>,
    last_path: Option<GenerationPath>,
    loaded_images: HashSet<String>,
}

impl ViewState {
    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The result on screen, if any.
    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    /// Which path produced the current result.
    pub fn last_path(&self) -> Option<GenerationPath> {
        self.last_path
    }

    /// Whether `url` has finished loading.
    pub fn is_image_loaded(&self, url: &str) -> bool {
        self.loaded_images.contains(url)
    }

    /// True while a unit of work is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Generating | Phase::RegeneratingImages)
    }

    /// Applies `event`, returning the effects to run.
    pub fn apply(&mut self, event: Event) -> Result<Vec<Effect>, Ignored> {
        let ignored = Ignored {
            phase: self.phase,
            event: event.name(),
        };
        match (self.phase, event) {
            (Phase::Idle | Phase::ResultsReady, Event::Submit) => {
                self.phase = Phase::Generating;
                self.result = None;
                self.last_path = None;
                self.loaded_images.clear();
                Ok(Vec::new())
            }
            (Phase::Generating, Event::NetworkSuccess(result)) => {
                Ok(self.finish(result, GenerationPath::Network))
            }
            (Phase::Generating, Event::NetworkFailure(result)) => {
                Ok(self.finish(result, GenerationPath::Fallback))
            }
            (Phase::ResultsReady, Event::Regenerate) => {
                self.phase = Phase::RegeneratingImages;
                self.loaded_images.clear();
                Ok(Vec::new())
            }
            (Phase::RegeneratingImages, Event::RegenerateDone(images)) => {
                if let Some(result) = self.result.as_mut() {
                    result.images = images;
                }
                self.phase = Phase::ResultsReady;
                Ok(Vec::new())
            }
            (Phase::Idle | Phase::ResultsReady | Phase::RegeneratingImages, Event::Reset) => {
                *self = Self::default();
                Ok(vec![Effect::ClearInput])
            }
            (Phase::ResultsReady, Event::ImageLoaded(url)) => {
                let known = self
                    .result
                    .as_ref()
                    .is_some_and(|result| result.images.contains(&url));
                if !known {
                    return Err(ignored);
                }
                self.loaded_images.insert(url);
                Ok(Vec::new())
            }
            _ => Err(ignored),
        }
    }

    fn finish(&mut self, result: GenerationResult, path: GenerationPath) -> Vec<Effect> {
        self.phase = Phase::ResultsReady;
        self.result = Some(result);
        self.last_path = Some(path);
        vec![Effect::AwardPoints(path.points())]
    }
}
