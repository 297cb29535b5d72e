use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::OriginDimensions;
use embedded_graphics::prelude::Point;
use embedded_graphics::prelude::Primitive;
use embedded_graphics::prelude::Size;
use embedded_graphics::primitives::PrimitiveStyle;
use embedded_graphics::primitives::Triangle;
use embedded_graphics::text::Baseline;
use embedded_graphics::text::Text;
use embedded_graphics::Drawable;

use super::Frame;

const TIME_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    time::macros::format_description!("[hour repr:12]:[minute]:[second] [period]");

/// Height reserved below the analog face for the digital readout
const READOUT_HEIGHT: u32 = 9;

const READOUT_X: i32 = 32;

/// Doubles horizontal displacement, the display is interlaced in y and would otherwise look
/// twice as tall as it is wide.
const X_SCALAR: f32 = 2.0;

const HAND_WIDTH_RATIO: f32 = 0.1;

/// Fraction of a full turn each hand has travelled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandRatios {
    pub hours: f32,
    pub minutes: f32,
    pub seconds: f32,
}

pub fn hand_ratios(time: time::Time) -> HandRatios {
    let seconds = f32::from(time.second()) / 60.0;
    let minutes = (f32::from(time.minute()) + seconds) / 60.0;
    let hours = (f32::from(time.hour()) + minutes) / 12.0;

    HandRatios {
        hours,
        minutes,
        seconds,
    }
}

/// The triangle for a single clock hand: its tip, and two base points perpendicular to the hand
/// at the center, 10% of the hand length apart from it.
pub fn hand_triangle(center: (f32, f32), circle_ratio: f32, hand_length: f32) -> Triangle {
    let (cen_x, cen_y) = center;
    let hand_angle = circle_ratio * std::f32::consts::TAU;
    let vec_x = hand_length * hand_angle.sin();
    let vec_y = -hand_length * hand_angle.cos();

    let tip = Point::new(
        (cen_x + X_SCALAR * vec_x) as i32,
        (cen_y + vec_y) as i32,
    );
    let base_start = Point::new(
        (cen_x - X_SCALAR * vec_y * HAND_WIDTH_RATIO) as i32,
        (cen_y + vec_x * HAND_WIDTH_RATIO) as i32,
    );
    let base_end = Point::new(
        (cen_x + X_SCALAR * vec_y * HAND_WIDTH_RATIO) as i32,
        (cen_y - vec_x * HAND_WIDTH_RATIO) as i32,
    );

    Triangle::new(tip, base_start, base_end)
}

/// Draws the current time, either as text or as an analog face with a small readout.
pub struct ClockRenderer {
    size: Size,
    analog: bool,
    font: MonoFont<'static>,
    time_offset: Point,
}

impl ClockRenderer {
    pub fn new(config: &crate::config::DisplayConfig) -> Self {
        Self {
            size: config.size(),
            analog: config.analog,
            font: config.font.into(),
            time_offset: Point::new(config.time_offset_x.into(), config.time_offset_y.into()),
        }
    }

    pub fn render(&self, time: time::Time) -> Result<Frame, time::error::Format> {
        let time_text = time.format(TIME_FORMAT)?;
        let mut frame = Frame::new(self.size);

        if self.analog {
            self.draw_analog(&mut frame, time, &time_text);
        } else {
            let style = MonoTextStyle::new(&self.font, BinaryColor::On);
            Text::with_baseline(&time_text, self.time_offset, style, Baseline::Top)
                .draw(&mut frame)
                .unwrap_or_else(|never| match never {});
        }

        tracing::trace!(?time_text, analog = self.analog, "Rendered clock");
        Ok(frame)
    }

    fn draw_analog(&self, frame: &mut Frame, time: time::Time, time_text: &str) {
        let Size { width, height } = frame.size();
        let analog_width = width as f32;
        let analog_height = height.saturating_sub(READOUT_HEIGHT) as f32;
        let center = (analog_width * 0.5, analog_height * 0.5);

        let sec_hand_length = analog_width.min(analog_height) * 0.5;
        let min_hand_length = 0.85 * sec_hand_length;
        let hour_hand_length = 0.7 * sec_hand_length;

        let ratios = hand_ratios(time);
        let fill = PrimitiveStyle::with_fill(BinaryColor::On);

        for (ratio, length) in [
            (ratios.hours, hour_hand_length),
            (ratios.minutes, min_hand_length),
            (ratios.seconds, sec_hand_length),
        ] {
            hand_triangle(center, ratio, length)
                .into_styled(fill)
                .draw(frame)
                .unwrap_or_else(|never| match never {});
        }

        let style = MonoTextStyle::new(
            &embedded_graphics::mono_font::ascii::FONT_5X8,
            BinaryColor::On,
        );
        let readout_position = Point::new(READOUT_X, height.saturating_sub(READOUT_HEIGHT) as i32);
        Text::with_baseline(time_text, readout_position, style, Baseline::Top)
            .draw(frame)
            .unwrap_or_else(|never| match never {});
    }
}
