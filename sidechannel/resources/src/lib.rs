/*!
    Component-owned resource and chapter bags.

    A source component (typically a demuxer) exposes the attachments it
    found, such as fonts, cover art and subtitle files, through a
    [`ResourceBag`], and its chapter list through a [`ChapterBag`]. Both are
    independent of the streaming timeline and may be read or changed by the
    host at any time.

    # Types

    - [`Resource`], [`ResourceTag`], [`ResourceUpdate`] - Resource entries
    - [`ResourceBag`] and [`ResourceList`] - Resource contract and implementation
    - [`TagZeroPolicy`] - How bulk removal treats the zero tag
    - [`Chapter`], [`ChapterBag`] and [`ChapterList`] - Chapter contract and implementation
*/

pub use sidechannel_types::{Error, Result};

mod bag;
mod chapters;
mod resource;

pub use bag::{ResourceBag, ResourceList, TagZeroPolicy};
pub use chapters::{Chapter, ChapterBag, ChapterList};
pub use resource::{Resource, ResourceTag, ResourceUpdate};
