//! An immediate-mode 2D drawing context with pluggable backends.

mod backend;
mod bitmap;
mod color;
mod config;
mod context;
mod gradient;
mod paint;
pub mod path;
mod record;
mod rect;
mod state;
mod types;
#[cfg(feature = "text")]
mod text;

pub use backend::{
    command::{Command, Compositing},
    pack_argb, Backend,
};
pub use bitmap::{clip_source, sample_nearest, Bitmap, BitmapSizeMismatch, ImageSource};
pub use color::{Color, ColorParseError};
pub use config::{ContextConfig, RenderDefaults};
pub use context::{DrawingContext, InvalidArgument};
pub use gradient::{Gradient, GradientKind, GradientStop};
pub use paint::{Paint, Style};
pub use path::{Path, PathSegment};
pub use record::{Recorded, RecordingBackend};
pub use rect::Rect;
pub use state::{RenderState, StateStack};
#[cfg(feature = "text")]
pub use text::{Font, MalformedFont};
pub use types::{
    CompositeOperation, FillRule, LineCap, LineJoin, StrokeSettings, UnknownKeyword,
};

pub use glam::{Affine2, Vec2};

pub extern crate glam;
