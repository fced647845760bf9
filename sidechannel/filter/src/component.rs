/*!
    Capability discovery for pipeline components.
*/

use sidechannel_buffers::BufferInfo;
use sidechannel_resources::{ChapterBag, ResourceBag};
use sidechannel_sidedata::SideData;

use crate::UrlSource;

/**
    A pipeline component that may expose any of the side-channel contracts.

    Hosts ask for a contract and fall back gracefully when a component
    returns `None`, the same way they treat a `NotFound` side-data entry.
*/
pub trait Component: Send + Sync {
    /**
        Human readable component name, used in logs and diagnostics.
    */
    fn name(&self) -> &str;

    fn resource_bag(&self) -> Option<&dyn ResourceBag> {
        None
    }

    fn chapter_bag(&self) -> Option<&dyn ChapterBag> {
        None
    }

    fn buffer_info(&self) -> Option<&dyn BufferInfo> {
        None
    }

    fn url_source(&self) -> Option<&dyn UrlSource> {
        None
    }

    /**
        Side-data describing the stream as a whole, as opposed to single units.
    */
    fn stream_side_data(&self) -> Option<&dyn SideData> {
        None
    }
}
