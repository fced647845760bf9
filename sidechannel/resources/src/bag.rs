/*!
    Resource bag contract and its list-backed implementation.
*/

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use sidechannel_types::{Error, Result, ensure_index};

use crate::{Resource, ResourceTag, ResourceUpdate};

/**
    How [`ResourceBag::remove_all_resources`] treats [`ResourceTag::NONE`].
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagZeroPolicy {
    /// The zero tag removes every resource regardless of its tag.
    #[default]
    RemoveEverything,
    /// The zero tag is an ordinary tag and removes only resources tagged zero.
    ExactMatch,
}

/**
    Ordered collection of named binary resources owned by a component.

    Indices are positions in the sequence and are only stable until the next
    insertion or removal. Each call is atomic on its own, but a count followed
    by an indexed access is not: another thread may mutate the bag in
    between, in which case the indexed call fails with `OutOfRange` or
    addresses a different resource. Use [`ResourceBag::resources`] for a
    consistent view.
*/
pub trait ResourceBag: Send + Sync {
    /**
        Current number of resources.
    */
    fn resource_count(&self) -> usize;

    /**
        The resource at `index`, or `OutOfRange`.
    */
    fn resource(&self, index: usize) -> Result<Resource>;

    /**
        Overwrite the resource at `index`, or fail with `OutOfRange`.

        Fails with `InvalidArgument` if the name is empty.
    */
    fn set_resource(&self, index: usize, resource: Resource) -> Result<()>;

    /**
        Change some fields of the resource at `index` in place.

        Fails with `InvalidArgument` if the update sets an empty name.
    */
    fn update_resource(&self, index: usize, update: ResourceUpdate) -> Result<()>;

    /**
        Append a resource at the end.

        Fails with `InvalidArgument` if the name is empty.
    */
    fn append_resource(&self, resource: Resource) -> Result<()>;

    /**
        Remove the resource at `index`, shifting later resources down by one.
    */
    fn remove_resource(&self, index: usize) -> Result<()>;

    /**
        Remove every resource tagged `tag`, keeping the order of the rest.

        Returns the number of resources removed.
    */
    fn remove_all_resources(&self, tag: ResourceTag) -> usize;

    /**
        A consistent snapshot of every resource, in order.
    */
    fn resources(&self) -> Vec<Resource>;

    /**
        Find the first resource named `name`, with its current index.
    */
    fn find_resource(&self, name: &str) -> Option<(usize, Resource)> {
        self.resources()
            .into_iter()
            .enumerate()
            .find(|(_, resource)| resource.name == name)
    }

    /**
        All resources whose MIME type matches `mime`, in order.

        See [`Resource::matches_mime`] for the matching rules.
    */
    fn resources_by_mime(&self, mime: &str) -> Vec<Resource> {
        self.resources()
            .into_iter()
            .filter(|resource| resource.matches_mime(mime))
            .collect()
    }
}

/**
    A [`ResourceBag`] backed by a vector behind a single lock.
*/
#[derive(Debug, Default)]
pub struct ResourceList {
    resources: Mutex<Vec<Resource>>,
    tag_zero_policy: TagZeroPolicy,
}

impl ResourceList {
    /**
        Create an empty bag with the default tag zero policy.
    */
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Create an empty bag with the given tag zero policy.
    */
    pub fn with_policy(tag_zero_policy: TagZeroPolicy) -> Self {
        Self {
            resources: Mutex::new(Vec::new()),
            tag_zero_policy,
        }
    }

    /**
        The tag zero policy in effect.
    */
    pub fn tag_zero_policy(&self) -> TagZeroPolicy {
        self.tag_zero_policy
    }

    /**
        Remove every resource.
    */
    pub fn clear(&self) {
        self.resources.lock().clear();
    }
}

impl ResourceBag for ResourceList {
    fn resource_count(&self) -> usize {
        self.resources.lock().len()
    }

    fn resource(&self, index: usize) -> Result<Resource> {
        let resources = self.resources.lock();
        ensure_index(index, resources.len())?;
        Ok(resources[index].clone())
    }

    fn set_resource(&self, index: usize, resource: Resource) -> Result<()> {
        ensure_name(&resource.name)?;
        let mut resources = self.resources.lock();
        ensure_index(index, resources.len())?;
        resources[index] = resource;
        Ok(())
    }

    fn update_resource(&self, index: usize, update: ResourceUpdate) -> Result<()> {
        if let Some(name) = &update.name {
            ensure_name(name)?;
        }
        let mut resources = self.resources.lock();
        ensure_index(index, resources.len())?;
        update.apply_to(&mut resources[index]);
        Ok(())
    }

    fn append_resource(&self, resource: Resource) -> Result<()> {
        ensure_name(&resource.name)?;
        debug!(
            name = %resource.name,
            mime = %resource.mime_type,
            len = resource.len(),
            tag = resource.tag.0,
            "resource appended"
        );
        self.resources.lock().push(resource);
        Ok(())
    }

    fn remove_resource(&self, index: usize) -> Result<()> {
        let mut resources = self.resources.lock();
        ensure_index(index, resources.len())?;
        resources.remove(index);
        Ok(())
    }

    fn remove_all_resources(&self, tag: ResourceTag) -> usize {
        let mut resources = self.resources.lock();
        let before = resources.len();
        if tag.is_none() && self.tag_zero_policy == TagZeroPolicy::RemoveEverything {
            resources.clear();
        } else {
            resources.retain(|resource| resource.tag != tag);
        }
        let removed = before - resources.len();
        debug!(tag = tag.0, removed, "resources removed by tag");
        removed
    }

    fn resources(&self) -> Vec<Resource> {
        self.resources.lock().clone()
    }
}

fn ensure_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_argument("resource name is empty"));
    }
    Ok(())
}

static_assertions::assert_impl_all!(ResourceList: Send, Sync, ResourceBag);
