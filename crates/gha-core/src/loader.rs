use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::cache::MemoCache;
use crate::env::{required_var, EnvSource, ProcessEnv, GITHUB_EVENT_PATH};
use crate::error::ActionsError;
use crate::payload::EventPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Print the parsed event data to stdout.
    pub verbose: bool,
    /// Serve from (and populate) the cache. When false the file is re-read
    /// and the cache is left untouched.
    pub use_cache: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            use_cache: true,
        }
    }
}

impl LoadOptions {
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            ..Self::default()
        }
    }

    pub fn uncached() -> Self {
        Self {
            use_cache: false,
            ..Self::default()
        }
    }
}

/// Environment plus the memoized event data of one workflow run.
#[derive(Debug)]
pub struct EventContext<E = ProcessEnv> {
    env: E,
    cache: MemoCache<PathBuf, Arc<EventPayload>>,
}

impl EventContext<ProcessEnv> {
    pub fn from_process_env() -> Self {
        Self::new(ProcessEnv)
    }
}

impl Default for EventContext<ProcessEnv> {
    fn default() -> Self {
        Self::from_process_env()
    }
}

impl<E: EnvSource> EventContext<E> {
    pub fn new(env: E) -> Self {
        Self {
            env,
            cache: MemoCache::new(),
        }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn event_data(&self) -> Result<Arc<EventPayload>, ActionsError> {
        self.event_data_with(LoadOptions::default())
    }

    /// Event data parsed from `$GITHUB_EVENT_PATH`, memoized per path.
    pub fn event_data_with(&self, options: LoadOptions) -> Result<Arc<EventPayload>, ActionsError> {
        let path = PathBuf::from(required_var(&self.env, GITHUB_EVENT_PATH)?);

        let payload = if !options.use_cache {
            Arc::new(read_event_file(&path)?)
        } else if let Some(hit) = self.cache.get(&path) {
            debug!(path = %path.display(), "event data cache hit");
            hit
        } else {
            debug!(path = %path.display(), "event data cache miss");
            self.cache
                .get_or_try_insert_with(path.clone(), || read_event_file(&path).map(Arc::new))?
        };

        if options.verbose {
            println!("{}", render_event_dump(&payload));
        }
        Ok(payload)
    }

    pub fn clear_cache(&self) {
        debug!(entries = self.cache.len(), "clearing cached event data");
        self.cache.clear();
    }
}

pub fn read_event_file(path: &Path) -> Result<EventPayload, ActionsError> {
    debug!(path = %path.display(), "reading event data");
    let body = fs::read_to_string(path).map_err(|source| ActionsError::EventRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_event_data(&body).map_err(|source| ActionsError::EventParse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_event_data(contents: &str) -> Result<EventPayload, serde_json::Error> {
    serde_json::from_str(contents).map(EventPayload::new)
}

/// Human-readable rendering used for verbose loads.
pub fn render_event_dump(payload: &EventPayload) -> String {
    serde_json::to_string_pretty(payload.as_value())
        .unwrap_or_else(|_| payload.as_value().to_string())
}
