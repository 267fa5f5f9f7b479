//! # Result carousel view state
//!
//! Search results are shown as a horizontal stack of cards with one active card in
//! front. [`Carousel`] owns the active index and keeps it in range; [`CardPlacement`]
//! derives a card's render parameters purely from its distance to the active card.
//!
//! | Offset | x | scale | z-index | opacity | filter |
//! |--------|---|-------|---------|---------|--------|
//! | 0 | 0px | 1 | 50 | 1 | none |
//! | ±n | n·60px | max(0.85, 1 − 0.05n) | 40 − n | max(0.5, 1 − 0.2n) | blur + grayscale |

/// Horizontal distance between neighbouring cards, in pixels.
pub const CARD_SPACING_PX: i32 = 60;
pub const SCALE_FLOOR: f32 = 0.85;
pub const OPACITY_FLOOR: f32 = 0.5;

const SCALE_STEP: f32 = 0.05;
const OPACITY_STEP: f32 = 0.2;
const ACTIVE_Z_INDEX: i32 = 50;
const STACK_Z_INDEX: i32 = 40;

/// Which card of a result list is in front.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    active: usize,
}

impl Carousel {
    /// A carousel over `len` cards with the first one active.
    pub fn new(len: usize) -> Self {
        Self { len, active: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn active(&self) -> usize {
        self.active
    }

    /// Start over with a new result list.
    pub fn reset(&mut self, len: usize) {
        *self = Self::new(len);
    }

    /// Make card `index` active. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.len {
            self.active = index;
        }
    }

    /// Move one card to the right, stopping at the last card.
    pub fn next(&mut self) {
        if self.active + 1 < self.len {
            self.active += 1;
        }
    }

    /// Move one card to the left, stopping at the first card.
    pub fn prev(&mut self) {
        self.active = self.active.saturating_sub(1);
    }

    pub fn has_prev(&self) -> bool {
        self.active > 0
    }

    pub fn has_next(&self) -> bool {
        self.active + 1 < self.len
    }

    /// Navigation arrows and indicators only make sense for more than one card.
    pub fn shows_navigation(&self) -> bool {
        self.len > 1
    }

    /// Signed distance of card `index` from the active card.
    pub fn offset_of(&self, index: usize) -> i32 {
        index as i32 - self.active as i32
    }

    pub fn placement(&self, index: usize) -> CardPlacement {
        CardPlacement::for_offset(self.offset_of(index))
    }
}

/// Render parameters of one card in the stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardPlacement {
    pub x_px: i32,
    pub scale: f32,
    pub z_index: i32,
    pub opacity: f32,
    /// Whether the card is dimmed with blur and grayscale.
    pub dimmed: bool,
}

impl CardPlacement {
    pub fn for_offset(offset: i32) -> Self {
        if offset == 0 {
            return Self {
                x_px: 0,
                scale: 1.0,
                z_index: ACTIVE_Z_INDEX,
                opacity: 1.0,
                dimmed: false,
            };
        }

        let distance = offset.unsigned_abs() as f32;
        Self {
            x_px: offset * CARD_SPACING_PX,
            scale: (1.0 - distance * SCALE_STEP).max(SCALE_FLOOR),
            z_index: STACK_Z_INDEX - offset.abs(),
            opacity: (1.0 - distance * OPACITY_STEP).max(OPACITY_FLOOR),
            dimmed: true,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.dimmed
    }

    pub fn filter(&self) -> &'static str {
        if self.dimmed {
            "blur(1px) grayscale(30%)"
        } else {
            "none"
        }
    }

    /// Inline style for the card wrapper.
    pub fn css(&self) -> String {
        format!(
            "transform: translateX({}px) scale({}); z-index: {}; opacity: {}; filter: {};",
            self.x_px,
            self.scale,
            self.z_index,
            self.opacity,
            self.filter()
        )
    }
}
