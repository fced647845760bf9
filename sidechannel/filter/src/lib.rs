/*!
    Side-channel contracts for a media splitter/decoder graph.

    This crate ties the side-channel crates together: a [`SourceFilter`]
    owns a resource bag, a chapter bag, a buffer monitor and URL state, and
    exposes them to a host through the [`Component`] capability query.
    Stream-level side-data set on the filter is attached to every
    [`MediaUnit`] it delivers.

    # Example

    ```ignore
    use sidechannel_filter::{Component, SideChannelConfig, SourceFilter};

    let filter = SourceFilter::new("demuxer", SideChannelConfig::load()?);
    filter.load_url("https://example.com/movie.mkv", Some("Player/1.0"), None)?;

    if let Some(bag) = filter.resource_bag() {
        for resource in bag.resources() {
            println!("{} ({})", resource.name, resource.mime_type);
        }
    }
    ```
*/

mod component;
mod config;
mod filter;
mod source;

pub use component::Component;
pub use config::{ConfigError, SideChannelConfig};
pub use filter::SourceFilter;
pub use source::{UrlRequest, UrlSource};

pub use sidechannel_buffers::{
    BufferInfo, BufferLimits, BufferMonitor, BufferStatus, BufferStatusSnapshot, QueueGauge,
    ThreadPriority,
};
pub use sidechannel_resources::{
    Chapter, ChapterBag, ChapterList, Resource, ResourceBag, ResourceList, ResourceTag,
    ResourceUpdate, TagZeroPolicy,
};
pub use sidechannel_sidedata::{
    MediaUnit, SharedSideData, SideData, SideDataBytes, SideDataExt, SideDataStore,
};
pub use sidechannel_types::{
    ContentLightLevel, Error, HdrMasteringMetadata, ReferenceTime, Result, SideDataKind,
    SideDataPayload, StereoOffsets, StreamKind,
};
