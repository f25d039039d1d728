//! A drawing surface with separate coordinate and pixel sizes,
//! built on `tabula` with an explicitly configured backend.

use serde::{Deserialize, Serialize};
use tabula::{Backend, RecordingBackend};

#[cfg(feature = "backend-tiny-skia")]
use tabula_tiny_skia::TinySkiaBackend;

mod canvas;
mod config;
mod error;

pub use canvas::Canvas;
pub use config::CanvasConfig;
pub use error::Error;

pub extern crate tabula;

/// The rendering backend in use.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendType {
    /// Pixels rendered in software
    #[cfg(feature = "backend-tiny-skia")]
    TinySkia,
    /// A display list, without pixels
    Recording,
}

/// Prefers pixel rendering when it is available.
impl Default for BackendType {
    #[cfg(feature = "backend-tiny-skia")]
    fn default() -> Self {
        BackendType::TinySkia
    }

    #[cfg(not(feature = "backend-tiny-skia"))]
    fn default() -> Self {
        BackendType::Recording
    }
}

/// Creates a backend of the given type.
pub fn create_backend(backend_type: BackendType) -> Box<dyn Backend> {
    log::debug!("creating {:?} backend", backend_type);
    match backend_type {
        #[cfg(feature = "backend-tiny-skia")]
        BackendType::TinySkia => Box::new(TinySkiaBackend::new()),
        BackendType::Recording => Box::new(RecordingBackend::new()),
    }
}

/// Identifies the type of a backend created by [`create_backend`].
pub fn determine_backend(backend: &dyn Backend) -> Option<BackendType> {
    let any = backend.as_any();
    #[cfg(feature = "backend-tiny-skia")]
    {
        if any.is::<TinySkiaBackend>() {
            return Some(BackendType::TinySkia);
        }
    }
    if any.is::<RecordingBackend>() {
        Some(BackendType::Recording)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_backends_are_identified() {
        let backend = create_backend(BackendType::Recording);
        assert_eq!(determine_backend(&*backend), Some(BackendType::Recording));

        let backend = create_backend(BackendType::default());
        assert_eq!(determine_backend(&*backend), Some(BackendType::default()));
    }
}
