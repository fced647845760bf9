/*!
    Shared types for the side-channel crate ecosystem.

    This crate defines the vocabulary that crosses pipeline stage boundaries:
    the identifiers used to key side-data, the fixed-layout payloads that
    consumers decode by raw memory layout, and the common error type. It has
    no knowledge of any particular carrier, bag or queue implementation.

    # Identifiers

    - [`SideDataKind`] - 128-bit identifier for a semantic side-data type

    # Payloads

    - [`SideDataPayload`] - Trait for fixed-layout payloads
    - [`HdrMasteringMetadata`] - HDR mastering display metadata (80 bytes)
    - [`ContentLightLevel`] - HDR content light level (8 bytes)
    - [`StereoOffsets`] - Stereoscopic 3D plane offsets (132 bytes)

    # Timing and Streams

    - [`ReferenceTime`] - Timestamps in 100 ns units
    - [`StreamKind`] - Video, audio or subtitle stream

    # Error Handling

    - [`Error`] and [`Result`] - Common error types
*/

mod error;
mod kind;
mod payload;
mod stream;
mod time;

pub use error::{Error, Result, ensure_index};
pub use kind::SideDataKind;
pub use payload::{ContentLightLevel, HdrMasteringMetadata, SideDataPayload, StereoOffsets};
pub use stream::StreamKind;
pub use time::ReferenceTime;
