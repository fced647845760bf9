/*!
    Chapter bag contract and its list-backed implementation.
*/

use parking_lot::Mutex;

use sidechannel_types::{Error, ReferenceTime, Result, ensure_index};

/**
    A named point on the stream timeline.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chapter {
    /// Where the chapter starts.
    pub start: ReferenceTime,
    /// Display name.
    pub name: String,
}

impl Chapter {
    pub fn new(start: ReferenceTime, name: impl Into<String>) -> Self {
        Self {
            start,
            name: name.into(),
        }
    }
}

/**
    Ordered chapter list owned by a source component.

    Same indexing rules as [`crate::ResourceBag`]: indices are positions and
    are only stable until the next mutation.
*/
pub trait ChapterBag: Send + Sync {
    /**
        Current number of chapters.
    */
    fn chapter_count(&self) -> usize;

    /**
        The chapter at `index`, or `OutOfRange`.
    */
    fn chapter(&self, index: usize) -> Result<Chapter>;

    /**
        Overwrite the chapter at `index`, or fail with `OutOfRange`.
    */
    fn set_chapter(&self, index: usize, chapter: Chapter) -> Result<()>;

    /**
        Append a chapter at the end.
    */
    fn append_chapter(&self, chapter: Chapter);

    /**
        Remove every chapter.
    */
    fn remove_all_chapters(&self);

    /**
        Index of the chapter in effect at `time`: the one with the latest
        start at or before `time`. The earliest in order wins a tie.

        Fails with `NotFound` if every chapter starts after `time`.
    */
    fn lookup_chapter(&self, time: ReferenceTime) -> Result<usize>;

    /**
        Sort chapters by start time, keeping the order of equal starts.
    */
    fn sort_chapters(&self);

    /**
        A consistent snapshot of every chapter, in order.
    */
    fn chapters(&self) -> Vec<Chapter>;
}

/**
    A [`ChapterBag`] backed by a vector behind a single lock.
*/
#[derive(Debug, Default)]
pub struct ChapterList {
    chapters: Mutex<Vec<Chapter>>,
}

impl ChapterList {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChapterBag for ChapterList {
    fn chapter_count(&self) -> usize {
        self.chapters.lock().len()
    }

    fn chapter(&self, index: usize) -> Result<Chapter> {
        let chapters = self.chapters.lock();
        ensure_index(index, chapters.len())?;
        Ok(chapters[index].clone())
    }

    fn set_chapter(&self, index: usize, chapter: Chapter) -> Result<()> {
        let mut chapters = self.chapters.lock();
        ensure_index(index, chapters.len())?;
        chapters[index] = chapter;
        Ok(())
    }

    fn append_chapter(&self, chapter: Chapter) {
        self.chapters.lock().push(chapter);
    }

    fn remove_all_chapters(&self) {
        self.chapters.lock().clear();
    }

    fn lookup_chapter(&self, time: ReferenceTime) -> Result<usize> {
        let chapters = self.chapters.lock();
        let mut best: Option<(usize, ReferenceTime)> = None;
        for (index, chapter) in chapters.iter().enumerate() {
            if chapter.start > time {
                continue;
            }
            if best.is_none_or(|(_, start)| chapter.start > start) {
                best = Some((index, chapter.start));
            }
        }
        best.map(|(index, _)| index)
            .ok_or_else(|| Error::not_found(format!("chapter at {time}")))
    }

    fn sort_chapters(&self) {
        self.chapters.lock().sort_by_key(|chapter| chapter.start);
    }

    fn chapters(&self) -> Vec<Chapter> {
        self.chapters.lock().clone()
    }
}

static_assertions::assert_impl_all!(ChapterList: Send, Sync, ChapterBag);
