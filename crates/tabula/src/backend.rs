use std::any::Any;

use crate::Color;

use self::command::Command;

pub mod command;

/// A drawing backend that implements the `tabula` rendering model.
///
/// A backend owns a surface sized in coordinate units. The context
/// resolves paints and path geometry, and the backend turns each
/// [`Command`] into surface content.
pub trait Backend: 'static {
    /// Resizes the surface, discarding all of its contents.
    fn resize(&mut self, width: u32, height: u32);

    /// The surface dimensions.
    fn size(&self) -> (u32, u32);

    /// Executes one drawing command against the surface.
    fn execute(&mut self, command: Command<'_>);

    /// Reads back a pixel of the surface, or `None` if the
    /// backend stores no pixels or the point is out of bounds.
    fn pixel(&self, x: u32, y: u32) -> Option<Color>;

    /// Gets the surface contents as unpremultiplied ARGB, row-major.
    fn to_argb(&self) -> Vec<u32>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Packs a color into the `0xAARRGGBB` layout used by [`Backend::to_argb`].
pub fn pack_argb(color: Color) -> u32 {
    let [r, g, b, a] = color.to_array();
    u32::from_be_bytes([a, r, g, b])
}
