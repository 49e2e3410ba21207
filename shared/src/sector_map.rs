use crate::constants::FULL_TURN_DEGREES;
use crate::error::WheelError;

/// Maps angles onto a fixed number of equal-width prize sectors.
///
/// Sector `i` covers `[i * width, (i + 1) * width)` degrees, measured clockwise from
/// the top of the wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorMap {
    prize_count: usize,
    sector_width: f64,
}

impl SectorMap {
    pub fn new(prize_count: usize) -> Result<Self, WheelError> {
        if prize_count == 0 {
            return Err(WheelError::EmptyPrizes);
        }
        Ok(Self {
            prize_count,
            sector_width: FULL_TURN_DEGREES / prize_count as f64,
        })
    }

    pub fn prize_count(&self) -> usize {
        self.prize_count
    }

    pub fn sector_width(&self) -> f64 {
        self.sector_width
    }

    /// `floor((angle mod 360) / width) mod count`, with a Euclidean modulo so that
    /// negative and very large angles never produce an out-of-range index.
    pub fn prize_index_for_angle(&self, angle: f64) -> usize {
        let normalized = angle.rem_euclid(FULL_TURN_DEGREES);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        ((normalized / self.sector_width).floor() as usize) % self.prize_count
    }

    /// Index of the sector sitting under the fixed top pointer after the wheel has
    /// turned clockwise by `rotation` degrees.
    pub fn index_at_pointer(&self, rotation: f64) -> usize {
        self.prize_index_for_angle(-rotation)
    }

    /// Start angle of the sector for `index`, in the wheel's own frame.
    pub fn sector_offset(&self, index: usize) -> f64 {
        index as f64 * self.sector_width
    }
}
