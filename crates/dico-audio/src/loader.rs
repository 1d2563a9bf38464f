use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;

use crate::source::MusicSource;

/// Stage of a background music load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStage {
    #[default]
    NotStarted,
    Fetching,
    Decoding,
    Complete,
    Failed,
}

/// Snapshot returned by [`LoadHandle::poll`].
#[derive(Debug, Clone)]
pub enum LoadStatus<S> {
    Pending(LoadStage),
    Ready(Arc<S>),
    Failed(String),
}

/// State shared between the frame loop and the worker thread.
struct JobState<S> {
    stage: LoadStage,
    sound: Option<Arc<S>>,
    error: Option<String>,
}

fn lock<S>(state: &Mutex<JobState<S>>) -> MutexGuard<'_, JobState<S>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to an in-flight or finished load. Clones observe the same job.
pub struct LoadHandle<S> {
    source: MusicSource,
    state: Arc<Mutex<JobState<S>>>,
}

impl<S> Clone for LoadHandle<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S> LoadHandle<S> {
    pub fn source(&self) -> &MusicSource {
        &self.source
    }

    pub fn stage(&self) -> LoadStage {
        lock(&self.state).stage
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.stage(), LoadStage::Complete | LoadStage::Failed)
    }

    /// Non-blocking status check for the frame loop.
    pub fn poll(&self) -> LoadStatus<S> {
        let state = lock(&self.state);
        match state.stage {
            LoadStage::Complete => match &state.sound {
                Some(sound) => LoadStatus::Ready(Arc::clone(sound)),
                None => LoadStatus::Failed("load finished without a result".to_string()),
            },
            LoadStage::Failed => {
                LoadStatus::Failed(state.error.clone().unwrap_or_else(|| "unknown".to_string()))
            }
            stage => LoadStatus::Pending(stage),
        }
    }

    /// Whether two handles share one underlying job.
    pub fn same_job(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

type Decoder<S> = Arc<dyn Fn(Vec<u8>) -> Result<S> + Send + Sync>;

/// Fetches and decodes music on worker threads.
///
/// Requests are keyed by source: while a job for a source is pending or has
/// succeeded, further requests get the same handle instead of a new decode.
/// A failed job is replaced on the next request.
pub struct MusicLoader<S> {
    decoder: Decoder<S>,
    jobs: HashMap<MusicSource, LoadHandle<S>>,
}

impl<S: Send + Sync + 'static> MusicLoader<S> {
    pub fn new<F>(decoder: F) -> Self
    where
        F: Fn(Vec<u8>) -> Result<S> + Send + Sync + 'static,
    {
        Self {
            decoder: Arc::new(decoder),
            jobs: HashMap::new(),
        }
    }

    pub fn request(&mut self, source: MusicSource) -> LoadHandle<S> {
        if let Some(handle) = self.jobs.get(&source) {
            if handle.stage() != LoadStage::Failed {
                log::debug!("joining in-flight load for {source}");
                return handle.clone();
            }
        }

        let handle = LoadHandle {
            source: source.clone(),
            state: Arc::new(Mutex::new(JobState {
                stage: LoadStage::Fetching,
                sound: None,
                error: None,
            })),
        };
        let state = Arc::clone(&handle.state);
        let decoder = Arc::clone(&self.decoder);
        let job_source = source.clone();
        std::thread::spawn(move || Self::run(&job_source, decoder.as_ref(), &state));

        self.jobs.insert(source, handle.clone());
        handle
    }

    /// Number of jobs ever tracked (live or finished).
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    fn run(
        source: &MusicSource,
        decoder: &(dyn Fn(Vec<u8>) -> Result<S> + Send + Sync),
        state: &Mutex<JobState<S>>,
    ) {
        let result = source.read_bytes().and_then(|bytes| {
            lock(state).stage = LoadStage::Decoding;
            decoder(bytes)
        });

        let mut s = lock(state);
        match result {
            Ok(sound) => {
                log::info!("Music ready: {source}");
                s.sound = Some(Arc::new(sound));
                s.stage = LoadStage::Complete;
            }
            Err(e) => {
                log::warn!("Music load failed for {source}: {e}");
                s.error = Some(e.to_string());
                s.stage = LoadStage::Failed;
            }
        }
    }
}
