use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::OriginDimensions;
use embedded_graphics::prelude::Size;

mod clock;
mod icon;

pub use self::clock::ClockRenderer;
pub use self::icon::icon_frame;

/// A monochrome bitmap with the fixed resolution of the robot's face display.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    size: Size,
    pixels: Vec<bool>,
}

impl Frame {
    /// Sizes come from a validated [`DisplayConfig`](crate::config::DisplayConfig), whose sides
    /// are bounded by [`MAX_DISPLAY_SIDE`](crate::config::MAX_DISPLAY_SIDE).
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![false; size.width as usize * size.height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.size.width && y < self.size.height)
            .then(|| y as usize * self.size.width as usize + x as usize)
    }

    pub fn is_lit(&self, x: u32, y: u32) -> bool {
        self.index(x, y).is_some_and(|i| self.pixels[i])
    }

    pub fn set(&mut self, x: u32, y: u32, lit: bool) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = lit;
        }
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&lit| lit).count()
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        self.size
    }
}

impl embedded_graphics::prelude::DrawTarget for Frame {
    type Color = BinaryColor;

    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = embedded_graphics::Pixel<Self::Color>>,
    {
        for embedded_graphics::Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }

            self.set(point.x as u32, point.y as u32, color.is_on());
        }
        Ok(())
    }
}

/// Two pixel rows per character cell, using half blocks.
impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in (0..self.size.height).step_by(2) {
            for x in 0..self.size.width {
                let cell = match (self.is_lit(x, y), self.is_lit(x, y + 1)) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                };
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("size", &self.size)
            .field("lit", &self.lit_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::prelude::DrawTarget;
    use embedded_graphics::prelude::Point;
    use embedded_graphics::prelude::Primitive;
    use embedded_graphics::primitives::PrimitiveStyle;
    use embedded_graphics::primitives::Rectangle;
    use embedded_graphics::Drawable;

    use super::*;

    #[test]
    fn out_of_bounds_pixels_are_clipped() {
        let mut frame = Frame::new(Size::new(4, 2));
        frame
            .draw_iter([
                embedded_graphics::Pixel(Point::new(-1, 0), BinaryColor::On),
                embedded_graphics::Pixel(Point::new(4, 0), BinaryColor::On),
                embedded_graphics::Pixel(Point::new(3, 1), BinaryColor::On),
            ])
            .unwrap();

        assert_eq!(frame.lit_count(), 1);
        assert!(frame.is_lit(3, 1));
        assert!(!frame.is_lit(4, 0));
    }

    #[test]
    fn renders_half_blocks() {
        let mut frame = Frame::new(Size::new(3, 2));
        Rectangle::new(Point::new(0, 0), Size::new(2, 1))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut frame)
            .unwrap();
        frame.set(1, 1, true);

        assert_eq!(frame.to_string(), "▀█ \n");
    }
}
