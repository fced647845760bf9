/*!
    Side-data type identifiers.
*/

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::{Error, Result};

/**
    A 128-bit identifier for a semantic kind of side-data.

    Kinds are opaque: stores compare them for equality and never interpret
    the payload behind them. Unknown kinds are stored and returned like any
    other. The nil identifier is reserved and rejected by stores.
*/
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SideDataKind(Uuid);

impl SideDataKind {
    /// HDR mastering display metadata, see [`crate::HdrMasteringMetadata`].
    pub const HDR: Self = Self::from_u128(0x53820dbc_a7b8_49c4_b17b_e511591a790c);
    /// HDR content light level, see [`crate::ContentLightLevel`].
    pub const HDR_CONTENT_LIGHT_LEVEL: Self =
        Self::from_u128(0xed6ae576_7cbe_41a6_9dc3_07c35dc12b62);
    /// Stereoscopic 3D plane offsets, see [`crate::StereoOffsets`].
    pub const STEREO_OFFSETS: Self = Self::from_u128(0xf169b76c_75a3_49e6_a23a_14983ebf4370);

    /**
        Create a kind from a UUID.
    */
    #[inline]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /**
        Create a kind from its 128-bit integer representation.
    */
    #[inline]
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /**
        Parse a kind from its textual form.

        Accepts hyphenated, simple and braced (`{...}`) forms.
    */
    pub fn parse(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| Error::invalid_argument(format!("malformed side-data kind {s:?}: {e}")))
    }

    /**
        Returns the underlying UUID.
    */
    #[inline]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /**
        Returns true if this is the reserved nil identifier.
    */
    #[inline]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /**
        Check that this kind may be used as a store key.
    */
    pub fn validate(&self) -> Result<()> {
        if self.is_nil() {
            Err(Error::invalid_argument("nil side-data kind"))
        } else {
            Ok(())
        }
    }
}

impl From<Uuid> for SideDataKind {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for SideDataKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Debug for SideDataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SideDataKind({self})")
    }
}

impl fmt::Display for SideDataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{:X}}}", self.0)
    }
}
