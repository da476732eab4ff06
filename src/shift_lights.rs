//! Shift light LEDs driven by a packed bit word
//!
//! The sampled shift-light parameter carries one bit per LED. Each LED
//! knows its bit, its on/off colours and a vertical offset that bends the
//! top row into an arc.

use egui::Color32;

const GREEN_OFF: Color32 = Color32::from_rgb(0, 40, 0);
const GREEN_ON: Color32 = Color32::from_rgb(0, 255, 0);
const RED_OFF: Color32 = Color32::from_rgb(40, 0, 0);
const RED_ON: Color32 = Color32::from_rgb(255, 0, 0);
const BLUE_OFF: Color32 = Color32::from_rgb(0, 0, 40);
const BLUE_ON: Color32 = Color32::from_rgb(0, 0, 255);
const YELLOW_OFF: Color32 = Color32::from_rgb(40, 40, 0);
const YELLOW_ON: Color32 = Color32::from_rgb(255, 255, 0);

/// A single shift light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Led {
    off: Color32,
    on: Color32,
    bit: u8,
    shift_y: f32,
    color: Color32,
}

impl Led {
    pub fn new(off: Color32, on: Color32, bit: u8, shift_y: f32) -> Self {
        Self {
            off,
            on,
            bit,
            shift_y,
            color: off,
        }
    }

    pub fn bit(&self) -> u8 {
        self.bit
    }

    /// Vertical offset from the row's baseline, in points
    pub fn shift_y(&self) -> f32 {
        self.shift_y
    }

    /// Colour after the last [`update`](Self::update)
    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn is_on(&self) -> bool {
        self.color == self.on
    }

    /// Colour this LED shows for `word`
    pub fn color_for(&self, word: u32) -> Color32 {
        if self.bit < 32 && word & (1 << self.bit) != 0 {
            self.on
        } else {
            self.off
        }
    }

    pub fn update(&mut self, word: u32) {
        self.color = self.color_for(word);
    }
}

/// The driver display's three LED banks
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftLightPanel {
    pub top: Vec<Led>,
    pub left: Vec<Led>,
    pub right: Vec<Led>,
}

impl Default for ShiftLightPanel {
    fn default() -> Self {
        let top: [(Color32, Color32, u8, f32); 15] = [
            (GREEN_OFF, GREEN_ON, 14, 15.0),
            (GREEN_OFF, GREEN_ON, 13, 10.0),
            (GREEN_OFF, GREEN_ON, 12, 5.0),
            (GREEN_OFF, GREEN_ON, 11, 0.0),
            (GREEN_OFF, GREEN_ON, 10, -5.0),
            (RED_OFF, RED_ON, 9, -10.0),
            (RED_OFF, RED_ON, 8, -10.0),
            (RED_OFF, RED_ON, 7, -10.0),
            (RED_OFF, RED_ON, 6, -10.0),
            (RED_OFF, RED_ON, 5, -10.0),
            (BLUE_OFF, BLUE_ON, 4, -5.0),
            (BLUE_OFF, BLUE_ON, 3, 0.0),
            (BLUE_OFF, BLUE_ON, 2, 5.0),
            (BLUE_OFF, BLUE_ON, 1, 10.0),
            (BLUE_OFF, BLUE_ON, 0, 15.0),
        ];

        Self {
            top: top
                .into_iter()
                .map(|(off, on, bit, shift)| Led::new(off, on, bit, shift))
                .collect(),
            left: vec![
                Led::new(YELLOW_OFF, YELLOW_ON, 20, 0.0),
                Led::new(RED_OFF, RED_ON, 18, 0.0),
                Led::new(BLUE_OFF, BLUE_ON, 16, 0.0),
            ],
            right: vec![
                Led::new(YELLOW_OFF, YELLOW_ON, 19, 0.0),
                Led::new(RED_OFF, RED_ON, 17, 0.0),
                Led::new(BLUE_OFF, BLUE_ON, 15, 0.0),
            ],
        }
    }
}

impl ShiftLightPanel {
    /// Convert a sampled value to the packed word (saturating, NaN is 0)
    pub fn word_from_value(value: f64) -> u32 {
        value as u32
    }

    /// Recolour every LED from a sampled shift-light value
    pub fn update(&mut self, value: f64) {
        let word = Self::word_from_value(value);
        self.leds_mut().for_each(|led| led.update(word));
    }

    pub fn leds(&self) -> impl Iterator<Item = &Led> {
        self.top.iter().chain(&self.left).chain(&self.right)
    }

    fn leds_mut(&mut self) -> impl Iterator<Item = &mut Led> {
        self.top
            .iter_mut()
            .chain(self.left.iter_mut())
            .chain(self.right.iter_mut())
    }

    pub fn lit_count(&self) -> usize {
        self.leds().filter(|led| led.is_on()).count()
    }
}
