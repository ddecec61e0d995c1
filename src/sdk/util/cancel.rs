use std::sync::Arc;

use tokio::sync::watch;

/// Monotonic generation counter. Starting a new generation cancels every
/// token handed out for older ones.
#[derive(Debug)]
pub struct Generations {
    current: Arc<watch::Sender<u64>>,
}

impl Generations {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            current: Arc::new(tx),
        }
    }

    /// Starts a new generation and returns its token.
    pub fn advance(&self) -> CancelToken {
        let mut generation = 0;
        self.current.send_modify(|g| {
            *g += 1;
            generation = *g;
        });
        CancelToken {
            generation,
            current: Arc::clone(&self.current),
        }
    }

    /// Cancels the current generation without handing out a new token.
    pub fn cancel(&self) {
        self.current.send_modify(|g| *g += 1);
    }

    pub fn current(&self) -> u64 {
        *self.current.borrow()
    }
}

impl Default for Generations {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct CancelToken {
    generation: u64,
    current: Arc<watch::Sender<u64>>,
}

impl CancelToken {
    /// A token nobody else can cancel, for one-shot callers.
    pub fn detached() -> Self {
        Generations::new().advance()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        *self.current.borrow() != self.generation
    }

    /// Resolves once a newer generation has started.
    pub async fn cancelled(&self) {
        let generation = self.generation;
        let mut rx = self.current.subscribe();
        // the token keeps the sender alive, so this only returns on a change
        let _ = rx.wait_for(|g| *g != generation).await;
    }
}
