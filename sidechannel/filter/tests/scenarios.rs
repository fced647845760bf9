use std::sync::Arc;
use std::thread;

use sidechannel_filter::{
    BufferLimits, Chapter, Component, ContentLightLevel, Error, HdrMasteringMetadata, MediaUnit,
    ReferenceTime, Resource, ResourceTag, SideChannelConfig, SideData, SideDataExt, SideDataKind,
    SideDataPayload, SourceFilter, StreamKind, TagZeroPolicy, ThreadPriority, UrlSource,
};

fn source() -> SourceFilter {
    SourceFilter::new("demuxer", SideChannelConfig::default())
}

#[test]
fn remove_all_by_tag_keeps_other_tags() {
    let filter = source();
    let component: &dyn Component = &filter;
    let bag = component.resource_bag().unwrap();

    for (name, tag) in [("a.ttf", 1), ("cover.jpg", 2), ("b.ttf", 1)] {
        let resource = Resource::new(name, "application/octet-stream", vec![0u8]);
        bag.append_resource(resource.with_tag(ResourceTag(tag)))
            .unwrap();
    }
    assert_eq!(bag.resource_count(), 3);

    assert_eq!(bag.remove_all_resources(ResourceTag(1)), 2);
    assert_eq!(bag.resource_count(), 1);
    let remaining = bag.resource(0).unwrap();
    assert_eq!(remaining.tag, ResourceTag(2));
    assert_eq!(remaining.name, "cover.jpg");
}

#[test]
fn tag_zero_follows_configured_policy() {
    let exact = SourceFilter::new(
        "exact",
        SideChannelConfig {
            tag_zero_policy: TagZeroPolicy::ExactMatch,
            ..SideChannelConfig::default()
        },
    );
    let everything = source();

    for filter in [&exact, &everything] {
        let bag = filter.resource_bag().unwrap();
        bag.append_resource(Resource::new("untagged", "text/plain", vec![1u8]))
            .unwrap();
        let tagged = Resource::new("tagged", "text/plain", vec![2u8]).with_tag(ResourceTag(5));
        bag.append_resource(tagged).unwrap();
        bag.remove_all_resources(ResourceTag::NONE);
    }

    assert_eq!(exact.resource_bag().unwrap().resource_count(), 1);
    assert_eq!(everything.resource_bag().unwrap().resource_count(), 0);
}

#[test]
fn hdr_payload_is_bit_exact() {
    let metadata = HdrMasteringMetadata::new(
        [(0.131, 0.046), (0.170, 0.797), (0.708, 0.292)],
        (0.3127, 0.3290),
        1000.0,
        0.0001,
    );

    let unit = MediaUnit::new(vec![0; 32], StreamKind::Video);
    unit.set_payload(&metadata).unwrap();

    let bytes = unit.side_data(SideDataKind::HDR).unwrap();
    assert_eq!(bytes.len(), 80);
    assert_eq!(&*bytes, metadata.as_bytes());

    let decoded = unit.payload::<HdrMasteringMetadata>().unwrap();
    let expected = [
        0.131, 0.170, 0.708, 0.046, 0.797, 0.292, 0.3127, 0.3290, 1000.0, 0.0001,
    ];
    let actual = [
        decoded.display_primaries_x[0],
        decoded.display_primaries_x[1],
        decoded.display_primaries_x[2],
        decoded.display_primaries_y[0],
        decoded.display_primaries_y[1],
        decoded.display_primaries_y[2],
        decoded.white_point_x,
        decoded.white_point_y,
        decoded.max_display_mastering_luminance,
        decoded.min_display_mastering_luminance,
    ];
    for (a, e) in actual.iter().zip(expected) {
        assert_eq!(a.to_bits(), f64::to_bits(e));
    }
}

#[test]
fn stream_metadata_reaches_delivered_units() {
    let filter = source();
    let metadata = HdrMasteringMetadata::bt2020(4000.0, 0.005);
    filter.stream_store().set_payload(&metadata).unwrap();
    filter
        .stream_store()
        .set_payload(&ContentLightLevel::new(1000, 400))
        .unwrap();

    let units: Vec<_> = (0..3)
        .map(|i| {
            let start = ReferenceTime::from_millis(i64::from(i) * 40);
            let stop = ReferenceTime::from_millis(i64::from(i + 1) * 40);
            MediaUnit::new(vec![i; 8], StreamKind::Video).with_times(start, stop)
        })
        .collect();

    for unit in &units {
        assert_eq!(filter.deliver(unit), 2);
        assert_eq!(unit.payload::<HdrMasteringMetadata>().unwrap(), metadata);
    }
}

#[test]
fn missing_side_data_is_not_found() {
    let unit = MediaUnit::new(Vec::new(), StreamKind::Subtitle);
    let err = unit.side_data(SideDataKind::STEREO_OFFSETS).unwrap_err();
    assert!(err.is_not_found());

    let fallback = ContentLightLevel::default();
    assert_eq!(unit.payload_or(fallback).unwrap(), fallback);
}

#[test]
fn carrier_without_side_data_is_unsupported() {
    let unit = MediaUnit::without_side_data(vec![1, 2, 3], StreamKind::Audio);
    let side: &dyn SideData = &unit;
    let err = side.set_side_data(SideDataKind::HDR, &[0; 80]).unwrap_err();
    assert!(err.is_unsupported());
    assert!(side.side_data(SideDataKind::HDR).unwrap_err().is_unsupported());
}

#[test]
fn buffer_status_past_count_is_out_of_range() {
    let filter = SourceFilter::new(
        "demuxer",
        SideChannelConfig {
            buffer: BufferLimits {
                max_samples: 2,
                max_bytes: 1 << 20,
            },
            worker_priority: ThreadPriority::ABOVE_NORMAL,
            ..SideChannelConfig::default()
        },
    );
    let video = filter.open_queue("video");
    let audio = filter.open_queue("audio");
    video.push(1500);
    video.push(1500);
    audio.push(300);
    assert!(video.is_full());
    assert!(!audio.is_full());

    let info = filter.buffer_info().unwrap();
    assert_eq!(info.buffer_count(), 2);
    assert_eq!(info.priority(), ThreadPriority::ABOVE_NORMAL);
    assert_eq!(info.buffer_status(2), Err(Error::out_of_range(2, 2)));

    let snapshot = info.snapshot();
    assert_eq!(snapshot.total_samples(), 3);
    assert_eq!(snapshot.total_bytes(), 3300);
}

#[test]
fn chapters_through_component() {
    let filter = source();
    let chapters = filter.chapter_bag().unwrap();
    chapters.append_chapter(Chapter::new(ReferenceTime::from_millis(60_000), "Part 2"));
    chapters.append_chapter(Chapter::new(ReferenceTime::ZERO, "Part 1"));
    chapters.sort_chapters();

    assert_eq!(chapters.chapter(0).unwrap().name, "Part 1");
    let later = ReferenceTime::from_millis(90_000);
    assert_eq!(chapters.lookup_chapter(later).unwrap(), 1);
    assert!(chapters.lookup_chapter(ReferenceTime(-1)).unwrap_err().is_not_found());
}

#[test]
fn url_loading_through_component() {
    let filter = source();
    let url = filter.url_source().unwrap();

    let combos = [
        (None, None, 0),
        (Some("Player/1.0"), None, 1),
        (None, Some("https://example.com/"), 1),
        (Some("Player/1.0"), Some("https://example.com/"), 2),
    ];
    for (user_agent, referrer, headers) in combos {
        url.load_url("https://cdn.example.com/stream.m3u8", user_agent, referrer)
            .unwrap();
        let request = url.current_request().unwrap();
        assert_eq!(request.http_headers().len(), headers);
        assert_eq!(request.user_agent.as_deref(), user_agent);
        assert_eq!(request.referrer.as_deref(), referrer);
    }

    assert!(matches!(
        url.load_url("", None, None),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn concurrent_host_and_streaming_threads() {
    let filter = Arc::new(source());
    filter.load_url("file:///media/movie.mkv", None, None).unwrap();

    let streaming = {
        let filter = Arc::clone(&filter);
        thread::spawn(move || {
            let queue = filter.open_queue("video");
            for i in 0..200u8 {
                let unit = MediaUnit::new(vec![i; 64], StreamKind::Video);
                queue.push(unit.data.len());
                filter.deliver(&unit);
                queue.pop(unit.data.len());
            }
        })
    };

    let host = {
        let filter = Arc::clone(&filter);
        thread::spawn(move || {
            for i in 0..200 {
                let font = Resource::new(format!("font-{i}.ttf"), "font/ttf", vec![0u8; 4]);
                filter.add_attachment(font).unwrap();
                let _ = filter.buffer_info().unwrap().snapshot();
                filter
                    .stream_store()
                    .set_side_data(SideDataKind::HDR, &[(i % 251) as u8; 80])
                    .unwrap();
            }
        })
    };

    streaming.join().unwrap();
    host.join().unwrap();

    let bag = filter.resource_bag().unwrap();
    assert_eq!(bag.resource_count(), 200);
    assert!(bag.resources().iter().all(|r| r.tag == filter.load_tag()));
}

#[test]
fn reload_removes_attachments_added_during_previous_load() {
    for _ in 0..50 {
        let filter = Arc::new(source());
        filter.load_url("https://example.com/0.mkv", None, None).unwrap();

        let adder = {
            let filter = Arc::clone(&filter);
            thread::spawn(move || {
                for i in 0..200 {
                    let font = Resource::new(format!("font-{i}.ttf"), "font/ttf", vec![0u8]);
                    filter.add_attachment(font).unwrap();
                }
            })
        };
        for n in 1..=20 {
            filter
                .load_url(&format!("https://example.com/{n}.mkv"), None, None)
                .unwrap();
        }
        adder.join().unwrap();

        filter.load_url("https://example.com/final.mkv", None, None).unwrap();
        assert_eq!(filter.resource_bag().unwrap().resource_count(), 0);
    }
}
