/*!
    Per-unit typed side-data.

    Demuxers and decoders attach out-of-band metadata, such as HDR mastering
    metadata, to the media units they emit. Downstream stages query it
    read-only. Each unit holds at most one payload per [`SideDataKind`];
    setting a kind again replaces the previous payload.

    # Example

    ```ignore
    use sidechannel_sidedata::{MediaUnit, SideData, SideDataExt};
    use sidechannel_types::{HdrMasteringMetadata, StreamKind};

    let unit = MediaUnit::new(packet_bytes, StreamKind::Video);
    unit.set_payload(&HdrMasteringMetadata::bt2020(1000.0, 0.005))?;

    // In the renderer
    match unit.payload::<HdrMasteringMetadata>() {
        Ok(hdr) => configure_display(hdr),
        Err(e) if e.is_not_found() => use_sdr_defaults(),
        Err(e) => return Err(e),
    }
    ```
*/

pub use sidechannel_types::{Error, Result, SideDataKind, SideDataPayload};

mod shared;
mod store;
mod unit;

pub use shared::{SharedSideData, SideData, SideDataExt};
pub use store::{SideDataBytes, SideDataStore};
pub use unit::MediaUnit;
