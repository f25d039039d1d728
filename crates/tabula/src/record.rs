use std::any::Any;

use glam::Affine2;

use crate::{
    backend::command::{Command, Compositing},
    Backend, Color, FillRule, Paint, Path, Rect, StrokeSettings,
};

/// An owned copy of a [`Command`], as kept by [`RecordingBackend`].
#[derive(Clone, Debug, PartialEq)]
pub enum Recorded {
    Resize {
        width: u32,
        height: u32,
    },
    Clear,
    Fill {
        path: Path,
        paint: Paint,
        fill_rule: FillRule,
        transform: Affine2,
        compositing: Compositing,
    },
    Stroke {
        path: Path,
        paint: Paint,
        stroke: StrokeSettings,
        transform: Affine2,
        compositing: Compositing,
    },
    Image {
        /// Dimensions of the drawn image
        image_size: (u32, u32),
        source: Rect,
        destination: Rect,
        transform: Affine2,
        compositing: Compositing,
    },
}

impl<'a> From<Command<'a>> for Recorded {
    fn from(command: Command<'a>) -> Self {
        match command {
            Command::Clear => Recorded::Clear,
            Command::FillPath {
                path,
                paint,
                fill_rule,
                transform,
                compositing,
            } => Recorded::Fill {
                path: path.clone(),
                paint: paint.clone(),
                fill_rule,
                transform,
                compositing,
            },
            Command::StrokePath {
                path,
                paint,
                stroke,
                transform,
                compositing,
            } => Recorded::Stroke {
                path: path.clone(),
                paint: paint.clone(),
                stroke,
                transform,
                compositing,
            },
            Command::DrawImage {
                image,
                source,
                destination,
                transform,
                compositing,
            } => Recorded::Image {
                image_size: (image.width(), image.height()),
                source,
                destination,
                transform,
                compositing,
            },
        }
    }
}

/// A backend that stores a display list instead of pixels.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    width: u32,
    height: u32,
    commands: Vec<Recorded>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Recorded] {
        &self.commands
    }

    /// Takes the recorded commands, leaving the list empty.
    pub fn take_commands(&mut self) -> Vec<Recorded> {
        std::mem::take(&mut self.commands)
    }
}

impl Backend for RecordingBackend {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.push(Recorded::Resize { width, height });
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn execute(&mut self, command: Command<'_>) {
        self.commands.push(command.into());
    }

    fn pixel(&self, _x: u32, _y: u32) -> Option<Color> {
        None
    }

    /// All transparent; no pixels are kept.
    fn to_argb(&self) -> Vec<u32> {
        vec![0; self.width as usize * self.height as usize]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
