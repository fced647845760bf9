/*!
    Resource entries.
*/

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/**
    Opaque grouping key attached to a resource.

    The bag compares tags for equality and nothing else. Producers typically
    use one tag per load operation so everything a load added can be removed
    in one call.
*/
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ResourceTag(pub u64);

impl ResourceTag {
    /// The zero tag. See [`crate::TagZeroPolicy`] for how removal treats it.
    pub const NONE: Self = Self(0);

    /**
        Returns true if this is the zero tag.
    */
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for ResourceTag {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ResourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/**
    A named binary attachment owned by a source component.

    Fonts, cover art, and embedded subtitle files are typical resources.
    The data is immutable once stored and shared cheaply between the bag
    and anyone who reads it.
*/
#[derive(Clone, PartialEq, Eq)]
pub struct Resource {
    /// File name or identifier of the resource.
    pub name: String,
    /// Free-form human readable description.
    pub description: String,
    /// MIME type of the data.
    pub mime_type: String,
    /// Raw resource data.
    pub data: Arc<[u8]>,
    /// Grouping key for bulk removal.
    pub tag: ResourceTag,
}

impl Resource {
    /**
        Create a resource with an empty description and the zero tag.
    */
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            mime_type: mime_type.into(),
            data: data.into(),
            tag: ResourceTag::NONE,
        }
    }

    /**
        Set the description.
    */
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /**
        Set the grouping tag.
    */
    pub fn with_tag(mut self, tag: ResourceTag) -> Self {
        self.tag = tag;
        self
    }

    /**
        Size of the data in bytes.
    */
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /**
        Returns true if the resource has no data.
    */
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if the MIME type matches `mime`, ignoring ASCII case.
    ///
    /// A trailing `/*` in `mime` matches any subtype, e.g. `font/*`.
    pub fn matches_mime(&self, mime: &str) -> bool {
        match mime.strip_suffix("/*") {
            Some(top) => self
                .mime_type
                .split_once('/')
                .is_some_and(|(t, _)| t.eq_ignore_ascii_case(top)),
            None => self.mime_type.eq_ignore_ascii_case(mime),
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .field("tag", &self.tag)
            .finish()
    }
}

/**
    A partial in-place update of a resource.

    Fields left as `None` keep their current value.
*/
#[derive(Clone, Debug, Default)]
pub struct ResourceUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub mime_type: Option<String>,
    pub data: Option<Arc<[u8]>>,
    pub tag: Option<ResourceTag>,
}

impl ResourceUpdate {
    /**
        Create an update that changes nothing.
    */
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn data(mut self, data: impl Into<Arc<[u8]>>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn tag(mut self, tag: ResourceTag) -> Self {
        self.tag = Some(tag);
        self
    }

    /**
        Apply the update to `resource`.
    */
    pub fn apply_to(self, resource: &mut Resource) {
        if let Some(name) = self.name {
            resource.name = name;
        }
        if let Some(description) = self.description {
            resource.description = description;
        }
        if let Some(mime_type) = self.mime_type {
            resource.mime_type = mime_type;
        }
        if let Some(data) = self.data {
            resource.data = data;
        }
        if let Some(tag) = self.tag {
            resource.tag = tag;
        }
    }
}
