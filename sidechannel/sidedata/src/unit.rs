/*!
    Media unit carrier.
*/

use std::time::Duration;

use sidechannel_types::{Error, ReferenceTime, Result, SideDataKind, StreamKind};

use crate::{SharedSideData, SideData, SideDataBytes};

/**
    One discrete unit of media data flowing through the pipeline.

    Units are created and destroyed by the pipeline stages; this type only
    carries the sample data, its timing, and the side-data attached to it.
    Side-data support is a property of the producing stage: units built with
    [`MediaUnit::without_side_data`] report `Unsupported` for every side-data
    operation.
*/
#[derive(Clone, Debug)]
pub struct MediaUnit {
    /// Sample data, encoded or decoded depending on the stage.
    pub data: Vec<u8>,
    /// Start time in stream time, if known.
    pub start: Option<ReferenceTime>,
    /// Stop time in stream time, if known.
    pub stop: Option<ReferenceTime>,
    /// Whether this unit can be decoded independently.
    pub is_sync_point: bool,
    /// Kind of stream this unit belongs to.
    pub stream_kind: StreamKind,
    side_data: Option<SharedSideData>,
}

impl MediaUnit {
    /**
        Create a new unit with an empty side-data store.
    */
    pub fn new(data: Vec<u8>, stream_kind: StreamKind) -> Self {
        Self {
            data,
            start: None,
            stop: None,
            is_sync_point: false,
            stream_kind,
            side_data: Some(SharedSideData::new()),
        }
    }

    /**
        Create a new unit whose producer does not support side-data.
    */
    pub fn without_side_data(data: Vec<u8>, stream_kind: StreamKind) -> Self {
        Self {
            side_data: None,
            ..Self::new(data, stream_kind)
        }
    }

    /**
        Set the start and stop times.
    */
    pub fn with_times(mut self, start: ReferenceTime, stop: ReferenceTime) -> Self {
        self.start = Some(start);
        self.stop = Some(stop);
        self
    }

    /**
        Mark the unit as a sync point.
    */
    pub fn with_sync_point(mut self, is_sync_point: bool) -> Self {
        self.is_sync_point = is_sync_point;
        self
    }

    /**
        Returns the unit duration, if both start and stop are set.
    */
    pub fn duration(&self) -> Option<Duration> {
        match (self.start, self.stop) {
            (Some(start), Some(stop)) => {
                Some(ReferenceTime(stop.0.saturating_sub(start.0)).to_duration())
            }
            _ => None,
        }
    }

    /**
        Returns true if this unit carries a side-data store.
    */
    pub fn supports_side_data(&self) -> bool {
        self.side_data.is_some()
    }

    /**
        The attached side-data store, or `Unsupported`.
    */
    pub fn side_data_store(&self) -> Result<&SharedSideData> {
        self.side_data
            .as_ref()
            .ok_or_else(|| Error::unsupported("media unit does not carry side-data"))
    }

    /**
        Copy every side-data entry from `source` onto this unit.

        Used by stages that turn one unit into another (e.g. a decoder turning
        a packet into a frame) and must carry the metadata along. A source
        without side-data support contributes nothing.
    */
    pub fn copy_side_data_from(&self, source: &MediaUnit) -> Result<()> {
        let target = self.side_data_store()?;
        if let Some(source) = &source.side_data {
            target.copy_from(source);
        }
        Ok(())
    }
}

impl SideData for MediaUnit {
    fn set_side_data(&self, kind: SideDataKind, data: &[u8]) -> Result<()> {
        self.side_data_store()?.set_side_data(kind, data)
    }

    fn side_data(&self, kind: SideDataKind) -> Result<SideDataBytes> {
        self.side_data_store()?.side_data(kind)
    }
}

// Units cross stage threads
static_assertions::assert_impl_all!(MediaUnit: Send, Sync, SideData);
