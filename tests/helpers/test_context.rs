//! Engine test context
//!
//! Builds a [`Bot`] over a shared [`MemoryStorage`] so tests can inspect the
//! persisted fields next to the engine's own session snapshot.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use botstate::state::HandlerFuture;
use botstate::{Bot, MemoryStorage, State, Storage};
use futures::FutureExt;

static INIT: Once = Once::new();

/// User id used by the scenarios
pub const TEST_USER_ID: i64 = 111;

/// Initialize logging once for the whole test binary
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Engine plus direct access to its backend
pub struct TestContext {
    pub bot: Bot,
    pub storage: Arc<dyn Storage>,
}

impl TestContext {
    /// Engine with an unbound session
    pub fn new(states: Vec<State>) -> Self {
        init_tracing();
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let bot = Bot::new(states, storage.clone());
        Self { bot, storage }
    }

    /// Engine with the session bound to [`TEST_USER_ID`]
    pub async fn with_user(states: Vec<State>) -> Self {
        let mut ctx = Self::new(states);
        ctx.bot.user(TEST_USER_ID).await.expect("Failed to initialize test user");
        ctx
    }

    /// Value from the engine's session snapshot
    pub fn current(&self, field: &str) -> Option<String> {
        self.bot.session().current_value(field).map(str::to_string)
    }

    /// Value read straight from the backend
    pub async fn stored(&self, field: &str) -> Option<String> {
        self.storage
            .get_field(&TEST_USER_ID.to_string(), field)
            .await
            .expect("Failed to read from storage")
    }
}

/// Run handler that always succeeds
pub fn succeed(_bot: &mut Bot) -> HandlerFuture<'_> {
    async { Ok(true) }.boxed()
}

/// Run handler that never succeeds
pub fn decline(_bot: &mut Bot) -> HandlerFuture<'_> {
    async { Ok(false) }.boxed()
}

/// Invocation counter shared between a handler and the test body
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call and return how many calls happened before it
    pub fn hit(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst)
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
