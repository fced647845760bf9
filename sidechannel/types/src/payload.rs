/*!
    Fixed-layout side-data payloads.

    Consumers decode these by raw memory layout rather than by a
    self-describing format, so every payload is `#[repr(C)]`, tightly packed
    and stored in native byte order.
*/

use std::mem::size_of;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, SideDataKind};

/**
    A payload with a fixed binary layout and a well-known side-data kind.

    Stores never call into this trait; it exists for the producing and
    consuming stages, which agree on the layout out of band.
*/
pub trait SideDataPayload: Pod {
    /// The side-data kind this payload is stored under.
    const KIND: SideDataKind;

    /// Exact size of the payload in bytes.
    const SIZE: usize = size_of::<Self>();

    /**
        Check field values that the layout alone cannot express.
    */
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /**
        View the payload as its raw bytes.
    */
    fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /**
        Decode a payload from raw bytes.

        The slice length must match [`Self::SIZE`] exactly. The slice does not
        need to be aligned.
    */
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::SIZE {
            return Err(Error::invalid_argument(format!(
                "payload for {} must be {} bytes, got {}",
                Self::KIND,
                Self::SIZE,
                bytes.len()
            )));
        }
        let value: Self = bytemuck::pod_read_unaligned(bytes);
        value.validate()?;
        Ok(value)
    }
}

/**
    HDR mastering display metadata.

    Three display primaries in B-G-R order, the white point, and the
    mastering luminance range. Chromaticities are CIE 1931 xy coordinates,
    luminance is in cd/m².

    The layout is 10 packed `f64` values, 80 bytes in total.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct HdrMasteringMetadata {
    /// Display primaries x coordinates, B-G-R order.
    pub display_primaries_x: [f64; 3],
    /// Display primaries y coordinates, B-G-R order.
    pub display_primaries_y: [f64; 3],
    /// White point x coordinate.
    pub white_point_x: f64,
    /// White point y coordinate.
    pub white_point_y: f64,
    /// Maximum mastering display luminance.
    pub max_display_mastering_luminance: f64,
    /// Minimum mastering display luminance.
    pub min_display_mastering_luminance: f64,
}

impl HdrMasteringMetadata {
    /**
        Create mastering metadata from `(x, y)` pairs.

        `primaries` must be given in B-G-R order.
    */
    pub fn new(
        primaries: [(f64, f64); 3],
        white_point: (f64, f64),
        max_luminance: f64,
        min_luminance: f64,
    ) -> Self {
        Self {
            display_primaries_x: primaries.map(|(x, _)| x),
            display_primaries_y: primaries.map(|(_, y)| y),
            white_point_x: white_point.0,
            white_point_y: white_point.1,
            max_display_mastering_luminance: max_luminance,
            min_display_mastering_luminance: min_luminance,
        }
    }

    /**
        BT.2020 primaries with a D65 white point and the given luminance range.
    */
    pub fn bt2020(max_luminance: f64, min_luminance: f64) -> Self {
        Self::new(
            [(0.131, 0.046), (0.170, 0.797), (0.708, 0.292)],
            (0.3127, 0.3290),
            max_luminance,
            min_luminance,
        )
    }

    /**
        Blue primary as an `(x, y)` pair.
    */
    pub fn blue(&self) -> (f64, f64) {
        (self.display_primaries_x[0], self.display_primaries_y[0])
    }

    /**
        Green primary as an `(x, y)` pair.
    */
    pub fn green(&self) -> (f64, f64) {
        (self.display_primaries_x[1], self.display_primaries_y[1])
    }

    /**
        Red primary as an `(x, y)` pair.
    */
    pub fn red(&self) -> (f64, f64) {
        (self.display_primaries_x[2], self.display_primaries_y[2])
    }

    /**
        White point as an `(x, y)` pair.
    */
    pub fn white_point(&self) -> (f64, f64) {
        (self.white_point_x, self.white_point_y)
    }
}

impl SideDataPayload for HdrMasteringMetadata {
    const KIND: SideDataKind = SideDataKind::HDR;
}

/**
    HDR content light level.

    Maximum content light level and maximum frame-average light level,
    both in cd/m². Two packed `u32` values, 8 bytes in total.
*/
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct ContentLightLevel {
    /// Maximum content light level (MaxCLL).
    pub max_cll: u32,
    /// Maximum frame-average light level (MaxFALL).
    pub max_fall: u32,
}

impl ContentLightLevel {
    pub const fn new(max_cll: u32, max_fall: u32) -> Self {
        Self { max_cll, max_fall }
    }
}

impl SideDataPayload for ContentLightLevel {
    const KIND: SideDataKind = SideDataKind::HDR_CONTENT_LIGHT_LEVEL;
}

const MAX_STEREO_OFFSETS: usize = 32;

/**
    Stereoscopic 3D plane offsets for subtitle and graphics placement.

    A count followed by a fixed array of 32 offsets, of which only the first
    `offset_count` are meaningful. 132 bytes in total.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct StereoOffsets {
    /// Number of valid entries in `offsets`.
    pub offset_count: i32,
    /// Plane offsets, in pixels.
    pub offsets: [i32; MAX_STEREO_OFFSETS],
}

impl StereoOffsets {
    /// Capacity of the offsets array.
    pub const MAX_OFFSETS: usize = MAX_STEREO_OFFSETS;

    /**
        Build offsets from a slice of at most [`Self::MAX_OFFSETS`] values.
    */
    pub fn from_slice(offsets: &[i32]) -> Result<Self> {
        if offsets.len() > Self::MAX_OFFSETS {
            return Err(Error::invalid_argument(format!(
                "at most {} stereo offsets, got {}",
                Self::MAX_OFFSETS,
                offsets.len()
            )));
        }
        let mut value = Self::zeroed();
        value.offset_count = offsets.len() as i32;
        value.offsets[..offsets.len()].copy_from_slice(offsets);
        Ok(value)
    }

    /**
        The meaningful offsets.

        Returns an empty slice if `offset_count` is out of bounds.
    */
    pub fn offsets(&self) -> &[i32] {
        match usize::try_from(self.offset_count) {
            Ok(n) if n <= Self::MAX_OFFSETS => &self.offsets[..n],
            _ => &[],
        }
    }
}

impl Default for StereoOffsets {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl SideDataPayload for StereoOffsets {
    const KIND: SideDataKind = SideDataKind::STEREO_OFFSETS;

    fn validate(&self) -> Result<()> {
        if (0..=Self::MAX_OFFSETS as i32).contains(&self.offset_count) {
            Ok(())
        } else {
            Err(Error::invalid_argument(format!(
                "stereo offset count {} outside 0..={}",
                self.offset_count,
                Self::MAX_OFFSETS
            )))
        }
    }
}

static_assertions::const_assert_eq!(size_of::<HdrMasteringMetadata>(), 80);
static_assertions::const_assert_eq!(size_of::<ContentLightLevel>(), 8);
static_assertions::const_assert_eq!(size_of::<StereoOffsets>(), 132);
static_assertions::assert_impl_all!(HdrMasteringMetadata: Send, Sync, SideDataPayload);
