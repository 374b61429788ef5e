//! Calibration breakpoints and bracket search.
//!
//! A table is an ascending list of [`Breakpoint`]s. Each row carries the
//! additive correction measured at 0°, 90° and 180° approach angle for one
//! raw speed. The first row is always the zero row so that zero wind yields
//! zero correction; the built-in dataset also ends with a sentinel row that
//! repeats the last calibrated offsets far above any real reading.

use std::borrow::Cow;

use crate::error::TableError;

/// One calibrated row: raw speed plus the offsets at 0°, 90° and 180°.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub raw_speed: f32,
    pub offset_0: f32,
    pub offset_90: f32,
    pub offset_180: f32,
}

impl Breakpoint {
    pub const ZERO: Breakpoint = Breakpoint::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(raw_speed: f32, offset_0: f32, offset_90: f32, offset_180: f32) -> Self {
        Self {
            raw_speed,
            offset_0,
            offset_90,
            offset_180,
        }
    }

    /// Offset at a folded angle in [0, 180], interpolated linearly between the
    /// 0°/90° sites or the 90°/180° sites.
    #[inline]
    pub fn offset_at(&self, folded_angle: f32) -> f32 {
        if folded_angle <= 90.0 {
            let f = folded_angle / 90.0;
            self.offset_0 + f * (self.offset_90 - self.offset_0)
        } else {
            let f = (folded_angle - 90.0) / 90.0;
            self.offset_90 + f * (self.offset_180 - self.offset_90)
        }
    }

    fn is_finite(&self) -> bool {
        self.raw_speed.is_finite()
            && self.offset_0.is_finite()
            && self.offset_90.is_finite()
            && self.offset_180.is_finite()
    }

    fn same_offsets(&self, other: &Breakpoint) -> bool {
        self.offset_0 == other.offset_0
            && self.offset_90 == other.offset_90
            && self.offset_180 == other.offset_180
    }
}

/// Raw speed of the sentinel row closing [`DAVIS_VANTAGE_PRO2`].
pub const SENTINEL_SPEED: f32 = 999.0;

/// Davis Vantage Pro 2 anemometer correction curves.
///
/// Offsets are in the same unit as the raw speed and are applied additively.
pub const DAVIS_VANTAGE_PRO2: &[Breakpoint] = &[
    Breakpoint::ZERO,
    Breakpoint::new(20.0, 3.3, -2.3, -3.6),
    Breakpoint::new(25.0, 3.5, -2.7, -4.6),
    Breakpoint::new(30.0, 3.8, -2.9, -4.8),
    Breakpoint::new(35.0, 4.2, -3.4, -5.3),
    Breakpoint::new(40.0, 4.5, -4.1, -5.7),
    Breakpoint::new(45.0, 4.7, -3.8, -4.5),
    Breakpoint::new(50.0, 5.0, -4.5, -4.9),
    Breakpoint::new(55.0, 5.3, -4.8, -5.2),
    Breakpoint::new(60.0, 5.7, -5.3, -5.9),
    Breakpoint::new(65.0, 5.8, -6.0, -6.0),
    Breakpoint::new(70.0, 6.2, -5.6, -6.1),
    Breakpoint::new(75.0, 6.4, -6.0, -6.8),
    Breakpoint::new(80.0, 6.8, -6.4, -6.9),
    Breakpoint::new(85.0, 7.1, -7.4, -6.8),
    Breakpoint::new(90.0, 7.4, -8.0, -6.8),
    Breakpoint::new(95.0, 7.5, -8.1, -7.5),
    Breakpoint::new(100.0, 7.7, -7.9, -7.2),
    Breakpoint::new(105.0, 8.2, -8.1, -7.7),
    Breakpoint::new(110.0, 8.5, -8.5, -7.7),
    Breakpoint::new(115.0, 8.9, -8.8, -8.5),
    Breakpoint::new(120.0, 9.5, -9.4, -9.0),
    Breakpoint::new(125.0, 10.0, -9.6, -9.8),
    Breakpoint::new(130.0, 9.8, -9.8, -10.3),
    Breakpoint::new(135.0, 9.8, -10.0, -11.0),
    Breakpoint::new(140.0, 9.3, -10.2, -11.3),
    Breakpoint::new(145.0, 9.5, -10.9, -10.5),
    Breakpoint::new(150.0, 9.8, -12.1, -12.0),
    Breakpoint::new(SENTINEL_SPEED, 9.8, -12.1, -12.0),
];

/// Pair of adjacent breakpoint indices straddling a raw speed.
///
/// `low == high` only for the zero-speed bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    pub low: usize,
    pub high: usize,
}

impl Bracket {
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.low == self.high
    }
}

/// Immutable, validated sequence of breakpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationTable {
    breakpoints: Cow<'static, [Breakpoint]>,
}

impl CalibrationTable {
    /// The compiled-in Davis Vantage Pro 2 dataset.
    pub const fn builtin() -> Self {
        Self {
            breakpoints: Cow::Borrowed(DAVIS_VANTAGE_PRO2),
        }
    }

    /// Validate and wrap a caller-supplied breakpoint list.
    ///
    /// Requires at least two rows, all values finite, the zero row first and
    /// strictly increasing raw speeds. A trailing clamp sentinel is optional:
    /// without one, speeds past the last row keep the correction of the final
    /// two rows at their upper end (see [`Self::has_clamp_sentinel`]).
    pub fn from_breakpoints(rows: Vec<Breakpoint>) -> Result<Self, TableError> {
        validate(&rows)?;
        Ok(Self {
            breakpoints: Cow::Owned(rows),
        })
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Breakpoint> {
        self.breakpoints.get(index)
    }

    /// True when the last row repeats the previous row's offsets, so inputs
    /// past the last real breakpoint keep the final calibrated correction.
    pub fn has_clamp_sentinel(&self) -> bool {
        let n = self.breakpoints.len();
        n >= 3 && self.breakpoints[n - 1].same_offsets(&self.breakpoints[n - 2])
    }

    /// Highest raw speed backed by a measured breakpoint (sentinel excluded).
    pub fn max_calibrated_speed(&self) -> f32 {
        let n = self.breakpoints.len();
        if self.has_clamp_sentinel() {
            self.breakpoints[n - 2].raw_speed
        } else {
            self.breakpoints[n - 1].raw_speed
        }
    }

    /// Locate the breakpoints straddling `raw_speed`.
    ///
    /// `high` is the first index whose raw speed is `>= raw_speed` and
    /// `low = high - 1`. Zero speed yields `(0, 0)`; speeds above the last row
    /// collapse onto the final two rows.
    pub fn bracket(&self, raw_speed: f32) -> Bracket {
        let n = self.breakpoints.len();
        let high = self
            .breakpoints
            .partition_point(|b| b.raw_speed < raw_speed);
        match high {
            0 => Bracket { low: 0, high: 0 },
            h if h >= n => Bracket {
                low: n - 2,
                high: n - 1,
            },
            h => Bracket { low: h - 1, high: h },
        }
    }
}

impl Default for CalibrationTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<Vec<Breakpoint>> for CalibrationTable {
    type Error = TableError;
    fn try_from(rows: Vec<Breakpoint>) -> Result<Self, Self::Error> {
        Self::from_breakpoints(rows)
    }
}

impl TryFrom<&[Breakpoint]> for CalibrationTable {
    type Error = TableError;
    fn try_from(rows: &[Breakpoint]) -> Result<Self, Self::Error> {
        Self::from_breakpoints(rows.to_vec())
    }
}

fn validate(rows: &[Breakpoint]) -> Result<(), TableError> {
    if rows.len() < 2 {
        return Err(TableError::TooShort(rows.len()));
    }
    if let Some(index) = rows.iter().position(|b| !b.is_finite()) {
        return Err(TableError::NonFinite { index });
    }
    if rows[0] != Breakpoint::ZERO {
        return Err(TableError::MissingZeroRow);
    }
    for (i, pair) in rows.windows(2).enumerate() {
        if pair[1].raw_speed <= pair[0].raw_speed {
            return Err(TableError::NotIncreasing {
                index: i + 1,
                value: pair[1].raw_speed,
                previous: pair[0].raw_speed,
            });
        }
    }
    Ok(())
}
