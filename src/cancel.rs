//! Cancellation scope for one engine run and the interrupt that feeds it.
//!
//! A [`CancelScope`] is cancelled at most once. Hooks registered with
//! [`CancelScope::on_cancel`] run on their own threads after cancellation;
//! they are not awaited and may not finish before the process exits.
//!
//! [`arm`] routes the next Ctrl-C to a scope. The first interrupt cancels it
//! and disarms; an interrupt with nothing armed terminates the process the
//! way SIGINT does by default.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Once, PoisonError};
use std::thread;

type Hook = Box<dyn FnOnce() + Send>;

/// Handle to a hook registered with [`CancelScope::on_cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

#[derive(Default)]
struct Inner {
    cancelled: AtomicBool,
    next_hook: AtomicU64,
    hooks: Mutex<Vec<(HookId, Hook)>>,
}

/// Cloneable handle to a cancellable execution scope.
#[derive(Clone, Default)]
pub struct CancelScope {
    inner: Arc<Inner>,
}

impl CancelScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the scope. Returns `true` only for the call that cancelled it.
    pub fn cancel(&self) -> bool {
        if self.inner.cancelled.swap(true, Ordering::SeqCst) {
            return false;
        }

        let hooks = std::mem::take(
            &mut *self
                .inner
                .hooks
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        tracing::debug!("scope cancelled, running {} cleanup hooks", hooks.len());
        for (_, hook) in hooks {
            thread::spawn(hook);
        }
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Run `hook` on a background thread once the scope is cancelled.
    ///
    /// If the scope is already cancelled the hook starts immediately.
    pub fn on_cancel<F>(&self, hook: F) -> HookId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = HookId(self.inner.next_hook.fetch_add(1, Ordering::Relaxed));
        let mut hooks = self
            .inner
            .hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.is_cancelled() {
            drop(hooks);
            thread::spawn(hook);
        } else {
            hooks.push((id, Box::new(hook)));
        }
        id
    }

    /// Forget a hook that has not run. Returns `false` if it already ran or
    /// was removed before.
    pub fn remove_hook(&self, id: HookId) -> bool {
        let mut hooks = self
            .inner
            .hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = hooks.len();
        hooks.retain(|(hook, _)| *hook != id);
        hooks.len() != before
    }

    /// Number of hooks still waiting for cancellation.
    pub fn pending_hooks(&self) -> usize {
        self.inner
            .hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn same(&self, other: &CancelScope) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for CancelScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelScope")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

static ARMED: Mutex<Option<CancelScope>> = Mutex::new(None);
static INSTALL: Once = Once::new();

/// Exit status of a process killed by SIGINT.
const INTERRUPTED: i32 = 130;

/// Keeps a scope armed for interrupts until dropped.
#[must_use = "the scope is disarmed when the guard is dropped"]
#[derive(Debug)]
pub struct InterruptGuard {
    scope: CancelScope,
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        let mut armed = ARMED.lock().unwrap_or_else(PoisonError::into_inner);
        if armed.as_ref().is_some_and(|s| s.same(&self.scope)) {
            *armed = None;
        }
    }
}

/// Route the next interrupt to `scope`.
pub fn arm(scope: &CancelScope) -> InterruptGuard {
    INSTALL.call_once(|| {
        let installed = ctrlc::set_handler(|| {
            if !deliver_interrupt() {
                std::process::exit(INTERRUPTED);
            }
        });
        if let Err(e) = installed {
            tracing::warn!("could not install interrupt handler: {}", e);
        }
    });

    *ARMED.lock().unwrap_or_else(PoisonError::into_inner) = Some(scope.clone());
    InterruptGuard {
        scope: scope.clone(),
    }
}

/// Cancel and disarm the armed scope. Returns `false` if nothing was armed.
pub(crate) fn deliver_interrupt() -> bool {
    let scope = ARMED.lock().unwrap_or_else(PoisonError::into_inner).take();
    match scope {
        Some(scope) => {
            tracing::debug!("interrupt received, cancelling scope");
            scope.cancel();
            true
        }
        None => false,
    }
}
