// * Model Session
// * Loads the capability on first use and hands out the same instance afterwards.
// * A failed load is remembered too; only an explicit `reload` calls the loader again.

use crate::model::capability::Capability;
use crate::model::errors::LoadError;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

pub trait ModelLoader: Send + Sync {
    fn load(&self) -> Result<Capability, LoadError>;
}

impl<F> ModelLoader for F
where
    F: Fn() -> Result<Capability, LoadError> + Send + Sync,
{
    fn load(&self) -> Result<Capability, LoadError> {
        self()
    }
}

pub struct ModelSession<L: ModelLoader> {
    loader: L,
    state: OnceLock<Result<Arc<Capability>, LoadError>>,
}

impl<L: ModelLoader> ModelSession<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            state: OnceLock::new(),
        }
    }

    /// Returns the loaded capability, loading it on the first call.
    /// Concurrent first callers wait on the same load.
    pub fn ensure_loaded(&self) -> Result<Arc<Capability>, LoadError> {
        self.state.get_or_init(|| self.load_once()).clone()
    }

    /// Peeks at the capability without triggering a load
    pub fn capability(&self) -> Option<Arc<Capability>> {
        self.state.get().and_then(|state| state.as_ref().ok().cloned())
    }

    /// The memoized failure, if the load was attempted and failed
    pub fn load_error(&self) -> Option<&LoadError> {
        self.state.get().and_then(|state| state.as_ref().err())
    }

    pub fn is_loaded(&self) -> bool {
        self.capability().is_some()
    }

    /// Drops whatever was memoized and invokes the loader again
    pub fn reload(&mut self) -> Result<Arc<Capability>, LoadError> {
        self.state = OnceLock::new();
        self.ensure_loaded()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    fn load_once(&self) -> Result<Arc<Capability>, LoadError> {
        tracing::info!("Loading model capability");
        let started = Instant::now();

        match self.loader.load() {
            Ok(capability) => {
                tracing::info!(
                    model = capability.model_id(),
                    device = capability.device(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Model capability ready"
                );
                Ok(Arc::new(capability))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Model capability unavailable for this process");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::capability::{CausalModel, TextTokenizer};
    use crate::model::chat::ChatMlTemplate;
    use crate::model::errors::BoxError;
    use crate::model::generation::GenerationConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullTokenizer;

    impl TextTokenizer for NullTokenizer {
        fn encode(&self, _text: &str) -> Result<Vec<u32>, BoxError> {
            Ok(Vec::new())
        }

        fn decode(&self, _ids: &[u32], _skip: bool) -> Result<String, BoxError> {
            Ok(String::new())
        }
    }

    struct EchoModel;

    impl CausalModel for EchoModel {
        fn generate(&mut self, prompt: &[u32], _config: &GenerationConfig) -> Result<Vec<u32>, BoxError> {
            Ok(prompt.to_vec())
        }
    }

    struct CountingLoader {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingLoader {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ModelLoader for CountingLoader {
        fn load(&self) -> Result<Capability, LoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LoadError::Device("no accelerator".into()));
            }
            Ok(Capability::new(
                "fake/model",
                "cpu",
                Box::new(NullTokenizer),
                Box::new(ChatMlTemplate),
                Box::new(EchoModel),
            ))
        }
    }

    #[test]
    fn test_loads_once_and_reuses() {
        let session = ModelSession::new(CountingLoader::new(false));
        assert!(!session.is_loaded());

        let first = session.ensure_loaded().unwrap();
        let second = session.ensure_loaded().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(session.loader().calls(), 1);
        assert!(session.is_loaded());
    }

    #[test]
    fn test_failure_is_memoized() {
        let session = ModelSession::new(CountingLoader::new(true));

        let first = session.ensure_loaded().unwrap_err();
        let second = session.ensure_loaded().unwrap_err();

        assert_eq!(first, second);
        assert_eq!(session.loader().calls(), 1);
        assert!(session.capability().is_none());
        assert_eq!(session.load_error(), Some(&first));
    }

    #[test]
    fn test_capability_does_not_trigger_load() {
        let session = ModelSession::new(CountingLoader::new(false));
        assert!(session.capability().is_none());
        assert_eq!(session.loader().calls(), 0);
    }

    #[test]
    fn test_reload_invokes_loader_again() {
        let mut session = ModelSession::new(CountingLoader::new(false));
        let first = session.ensure_loaded().unwrap();
        let second = session.reload().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(session.loader().calls(), 2);
    }

    #[test]
    fn test_closure_loader() {
        let session = ModelSession::new(|| -> Result<Capability, LoadError> {
            Err(LoadError::Hub("offline".into()))
        });
        assert_eq!(
            session.ensure_loaded().unwrap_err(),
            LoadError::Hub("offline".into())
        );
    }

    #[test]
    fn test_concurrent_first_use_loads_once() {
        let session = Arc::new(ModelSession::new(CountingLoader::new(false)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let session = Arc::clone(&session);
                std::thread::spawn(move || session.ensure_loaded().unwrap())
            })
            .collect();

        let loaded: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(session.loader().calls(), 1);
        assert!(loaded.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
