//! Staged pipeline adapter
//!
//! Wraps an `AppBuilder` so it can sit after another pipeline stage. Each
//! tick names the inputs it needs; once every one has been provided, the
//! first `ready` caller runs the build and every other caller awaits the same
//! result. At most one build runs per tick.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{watch, Mutex, OnceCell};

use crate::application::builder::{AppBuilder, BuildReport};
use crate::domain::ports::StageInputs;
use crate::error::{RepackError, RepackResult};

#[derive(Debug, Clone, Default)]
struct TickInputs {
    provided: StageInputs,
    superseded: bool,
}

struct Tick {
    number: u64,
    inputs: watch::Sender<TickInputs>,
    result: OnceCell<Result<Arc<BuildReport>, String>>,
}

impl Tick {
    fn new(number: u64) -> Arc<Self> {
        let (inputs, _) = watch::channel(TickInputs::default());
        Arc::new(Self {
            number,
            inputs,
            result: OnceCell::new(),
        })
    }
}

/// One-shot build gate per pipeline tick
pub struct StagedBuild {
    builder: Mutex<AppBuilder>,
    names: BTreeSet<String>,
    output_root: PathBuf,
    tick: Mutex<Arc<Tick>>,
}

impl StagedBuild {
    /// `input_names` are the inputs every tick waits for
    pub fn new<I, S>(builder: AppBuilder, input_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let output_root = builder.output_root().to_path_buf();
        Self {
            builder: Mutex::new(builder),
            names: input_names.into_iter().map(Into::into).collect(),
            output_root,
            tick: Mutex::new(Tick::new(0)),
        }
    }

    /// Stable output location across ticks
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Number of the current tick
    pub async fn tick(&self) -> u64 {
        self.tick.lock().await.number
    }

    /// Start a new tick; waiters still blocked on the old one give up
    pub async fn advance(&self) -> u64 {
        let mut current = self.tick.lock().await;
        current.inputs.send_modify(|state| state.superseded = true);
        *current = Tick::new(current.number + 1);
        tracing::debug!(tick = current.number, "advanced");
        current.number
    }

    /// Hand a named input to the current tick
    pub async fn provide(&self, name: &str, path: impl Into<PathBuf>) -> RepackResult<()> {
        if !self.names.contains(name) {
            return Err(RepackError::UnknownStageInput {
                name: name.to_string(),
            });
        }
        let path = path.into();
        let tick = Arc::clone(&*self.tick.lock().await);
        tick.inputs.send_modify(|state| {
            state.provided.insert(name.to_string(), path);
        });
        Ok(())
    }

    /// Wait for the current tick's inputs, then its build
    ///
    /// The first caller runs the build. A failed tick stays failed until the
    /// next `advance`.
    pub async fn ready(&self) -> RepackResult<Arc<BuildReport>> {
        let tick = Arc::clone(&*self.tick.lock().await);

        let mut rx = tick.inputs.subscribe();
        let inputs = {
            let state = rx
                .wait_for(|s| s.superseded || self.names.iter().all(|n| s.provided.contains_key(n)))
                .await
                .map_err(|_| RepackError::StageFailed {
                    message: "stage inputs were dropped".to_string(),
                })?;
            if state.superseded {
                return Err(RepackError::StageFailed {
                    message: format!("tick {} was superseded before its inputs arrived", tick.number),
                });
            }
            state.provided.clone()
        };

        let result = tick
            .result
            .get_or_init(|| async {
                let mut builder = self.builder.lock().await;
                tracing::info!(tick = tick.number, "building");
                builder
                    .build(&inputs)
                    .map(Arc::new)
                    .map_err(|e| e.to_string())
            })
            .await;

        match result {
            Ok(report) => Ok(Arc::clone(report)),
            Err(message) => Err(RepackError::StageFailed {
                message: message.clone(),
            }),
        }
    }
}
