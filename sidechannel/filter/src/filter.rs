/*!
    A source component that owns every side-channel contract.
*/

use parking_lot::Mutex;
use tracing::{debug, info, trace};

use sidechannel_buffers::{BufferInfo, BufferMonitor, QueueGauge};
use sidechannel_resources::{
    ChapterBag, ChapterList, Resource, ResourceBag, ResourceList, ResourceTag,
};
use sidechannel_sidedata::{MediaUnit, SharedSideData, SideData};
use sidechannel_types::Result;

use crate::{Component, SideChannelConfig, UrlRequest, UrlSource};

#[derive(Debug, Default)]
struct LoadState {
    request: Option<UrlRequest>,
    tag: ResourceTag,
}

/**
    A source component, such as a demuxer, exposing resources, chapters,
    buffer status, URL loading, and stream-level side-data.

    Every load gets a fresh [`ResourceTag`]. Attachments added without a tag
    are stamped with the current one, and loading a new URL removes
    everything the previous load added, along with its chapters and
    stream-level side-data.
*/
#[derive(Debug)]
pub struct SourceFilter {
    name: String,
    config: SideChannelConfig,
    resources: ResourceList,
    chapters: ChapterList,
    buffers: BufferMonitor,
    stream_side_data: SharedSideData,
    load: Mutex<LoadState>,
}

impl SourceFilter {
    /**
        Create a component configured by `config`.
    */
    pub fn new(name: impl Into<String>, config: SideChannelConfig) -> Self {
        let buffers = BufferMonitor::new(config.buffer);
        buffers.set_priority(config.worker_priority);
        Self {
            name: name.into(),
            resources: ResourceList::with_policy(config.tag_zero_policy),
            chapters: ChapterList::new(),
            buffers,
            stream_side_data: SharedSideData::new(),
            load: Mutex::new(LoadState::default()),
            config,
        }
    }

    /**
        The configuration this component was created with.
    */
    pub fn config(&self) -> &SideChannelConfig {
        &self.config
    }

    /**
        Tag of the current load, or [`ResourceTag::NONE`] before the first one.
    */
    pub fn load_tag(&self) -> ResourceTag {
        self.load.lock().tag
    }

    /**
        Add an attachment found while reading the input.

        Resources without a tag get the tag of the current load.
    */
    pub fn add_attachment(&self, resource: Resource) -> Result<()> {
        // Stamp and append under the load lock, reloads remove by the stamped tag
        let load = self.load.lock();
        let resource = if resource.tag.is_none() {
            resource.with_tag(load.tag)
        } else {
            resource
        };
        self.resources.append_resource(resource)
    }

    /**
        Register an internal queue for buffer status reporting.
    */
    pub fn open_queue(&self, label: impl Into<String>) -> QueueGauge {
        self.buffers.register(label)
    }

    /**
        Side-data describing the stream as a whole.
    */
    pub fn stream_store(&self) -> &SharedSideData {
        &self.stream_side_data
    }

    /**
        Attach stream-level side-data to an outgoing unit.

        Entries the unit already carries win over stream-level ones. Units
        whose producer does not support side-data are passed through
        untouched. Returns the number of entries attached.
    */
    pub fn deliver(&self, unit: &MediaUnit) -> usize {
        let Ok(store) = unit.side_data_store() else {
            trace!(component = %self.name, "unit does not support side-data");
            return 0;
        };
        let stream = self.stream_side_data.snapshot();
        let added = store.fill_missing(&stream);
        trace!(component = %self.name, added, "stream side-data attached");
        added
    }
}

impl UrlSource for SourceFilter {
    fn load(&self, request: UrlRequest) -> Result<()> {
        let mut load = self.load.lock();
        if !load.tag.is_none() {
            let removed = self.resources.remove_all_resources(load.tag);
            debug!(component = %self.name, tag = load.tag.0, removed, "dropped previous load");
        }
        self.chapters.remove_all_chapters();
        self.stream_side_data.clear();

        load.tag = ResourceTag(load.tag.0 + 1);
        info!(
            component = %self.name,
            url = %request.url,
            tag = load.tag.0,
            user_agent = request.user_agent.is_some(),
            referrer = request.referrer.is_some(),
            "loading URL"
        );
        load.request = Some(request);
        Ok(())
    }

    fn current_request(&self) -> Option<UrlRequest> {
        self.load.lock().request.clone()
    }
}

impl Component for SourceFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn resource_bag(&self) -> Option<&dyn ResourceBag> {
        Some(&self.resources)
    }

    fn chapter_bag(&self) -> Option<&dyn ChapterBag> {
        Some(&self.chapters)
    }

    fn buffer_info(&self) -> Option<&dyn BufferInfo> {
        Some(&self.buffers)
    }

    fn url_source(&self) -> Option<&dyn UrlSource> {
        Some(self)
    }

    fn stream_side_data(&self) -> Option<&dyn SideData> {
        Some(&self.stream_side_data)
    }
}

static_assertions::assert_impl_all!(SourceFilter: Send, Sync, Component, UrlSource);

#[cfg(test)]
mod tests {
    use sidechannel_buffers::ThreadPriority;
    use sidechannel_resources::{Chapter, TagZeroPolicy};
    use sidechannel_sidedata::SideDataExt;
    use sidechannel_types::{ContentLightLevel, ReferenceTime, SideDataKind, StreamKind};

    use super::*;

    fn filter() -> SourceFilter {
        SourceFilter::new("source", SideChannelConfig::default())
    }

    #[test]
    fn config_reaches_owned_contracts() {
        let config = SideChannelConfig {
            tag_zero_policy: TagZeroPolicy::ExactMatch,
            worker_priority: ThreadPriority::HIGHEST,
            ..SideChannelConfig::default()
        };
        let filter = SourceFilter::new("source", config);
        assert_eq!(filter.buffers.priority(), ThreadPriority::HIGHEST);
        assert_eq!(
            filter.resources.tag_zero_policy(),
            TagZeroPolicy::ExactMatch
        );
    }

    #[test]
    fn attachments_are_stamped_with_load_tag() {
        let filter = filter();
        filter
            .add_attachment(Resource::new("early.ttf", "font/ttf", vec![0u8]))
            .unwrap();
        assert_eq!(filter.resources.resource(0).unwrap().tag, ResourceTag::NONE);

        filter.load_url("https://example.com/a.mkv", None, None).unwrap();
        filter
            .add_attachment(Resource::new("a.ttf", "font/ttf", vec![1u8]))
            .unwrap();
        filter
            .add_attachment(
                Resource::new("pinned.png", "image/png", vec![2u8]).with_tag(ResourceTag(99)),
            )
            .unwrap();

        let tags: Vec<_> = filter.resources.resources().iter().map(|r| r.tag).collect();
        assert_eq!(tags, vec![ResourceTag::NONE, ResourceTag(1), ResourceTag(99)]);
    }

    #[test]
    fn reload_drops_previous_load() {
        let filter = filter();
        filter.load_url("https://example.com/a.mkv", None, None).unwrap();
        filter
            .add_attachment(Resource::new("a.ttf", "font/ttf", vec![1u8]))
            .unwrap();
        filter
            .chapters
            .append_chapter(Chapter::new(ReferenceTime::ZERO, "Intro"));
        filter
            .stream_side_data
            .set_payload(&ContentLightLevel::new(1000, 400))
            .unwrap();

        filter
            .load_url("https://example.com/b.mkv", Some("Player/1.0"), None)
            .unwrap();

        assert_eq!(filter.resources.resource_count(), 0);
        assert_eq!(filter.chapters.chapter_count(), 0);
        assert!(filter.stream_side_data.is_empty());
        assert_eq!(filter.load_tag(), ResourceTag(2));

        let request = filter.current_request().unwrap();
        assert_eq!(request.url.as_str(), "https://example.com/b.mkv");
        assert_eq!(request.user_agent.as_deref(), Some("Player/1.0"));
    }

    #[test]
    fn invalid_url_keeps_current_state() {
        let filter = filter();
        filter.load_url("https://example.com/a.mkv", None, None).unwrap();
        assert!(filter.load_url("::", None, None).is_err());
        assert_eq!(filter.load_tag(), ResourceTag(1));
        assert!(filter.current_request().is_some());
    }

    #[test]
    fn deliver_keeps_unit_entries() {
        let filter = filter();
        filter
            .stream_side_data
            .set_side_data(SideDataKind::HDR, &[1; 80])
            .unwrap();
        filter
            .stream_side_data
            .set_payload(&ContentLightLevel::new(1000, 400))
            .unwrap();

        let unit = MediaUnit::new(vec![0; 16], StreamKind::Video);
        unit.set_side_data(SideDataKind::HDR, &[2; 80]).unwrap();

        assert_eq!(filter.deliver(&unit), 1);
        assert_eq!(&*unit.side_data(SideDataKind::HDR).unwrap(), &[2; 80]);
        assert_eq!(
            unit.payload::<ContentLightLevel>().unwrap(),
            ContentLightLevel::new(1000, 400)
        );
    }

    #[test]
    fn deliver_skips_units_without_side_data() {
        let filter = filter();
        filter
            .stream_side_data
            .set_side_data(SideDataKind::HDR, &[1; 80])
            .unwrap();
        let unit = MediaUnit::without_side_data(vec![0; 16], StreamKind::Audio);
        assert_eq!(filter.deliver(&unit), 0);
    }

    #[test]
    fn stream_store_backs_component_side_data() {
        let filter = filter();
        filter
            .stream_store()
            .set_payload(&ContentLightLevel::new(800, 200))
            .unwrap();

        let component: &dyn Component = &filter;
        let side = component.stream_side_data().unwrap();
        assert_eq!(
            side.payload::<ContentLightLevel>().unwrap(),
            ContentLightLevel::new(800, 200)
        );
        let via_static = Component::stream_side_data(&filter).unwrap();
        let bytes = via_static
            .side_data(SideDataKind::HDR_CONTENT_LIGHT_LEVEL)
            .unwrap();
        assert_eq!(bytes.len(), 8);
    }

    #[test]
    fn queues_report_through_buffer_info() {
        let filter = filter();
        let video = filter.open_queue("video");
        video.push(4096);
        let info = filter.buffer_info().unwrap();
        assert_eq!(info.buffer_count(), 1);
        assert_eq!(info.buffer_status(0).unwrap().size_bytes, 4096);
    }
}
