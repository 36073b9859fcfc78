use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use crate::{error::SurfaceError, surface::Surface};

/// Headless surface that records every displayed text.
///
/// A [`MemoryHandle`] observes the record from other threads and can close the surface.
pub struct MemorySurface {
    shared: Arc<Shared>,
}

/// Observer side of a [`MemorySurface`].
#[derive(Clone)]
pub struct MemoryHandle {
    shared: Arc<Shared>,
}

struct Shared {
    shown: Mutex<Vec<String>>,
    open: AtomicBool,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                shown: Mutex::new(Vec::new()),
                open: AtomicBool::new(true),
            }),
        }
    }

    pub fn handle(&self) -> MemoryHandle {
        MemoryHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHandle {
    /// Every text shown so far, oldest first.
    pub fn shown(&self) -> Vec<String> {
        self.shared
            .shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recently shown text.
    pub fn last(&self) -> Option<String> {
        self.shared
            .shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Mark the surface closed, as if the user dismissed it.
    pub fn close(&self) {
        self.shared.open.store(false, Ordering::Release);
    }
}

impl Surface for MemorySurface {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn is_open(&self) -> bool {
        self.shared.open.load(Ordering::Acquire)
    }

    fn pump(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn show(&mut self, text: &str) -> Result<(), SurfaceError> {
        self.shared
            .shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
        Ok(())
    }
}
