//! Index arena owning descriptors.
//!
//! Identity of a descriptor is its [`DescriptorId`], assigned when it is
//! added. Two descriptors with equal contents added twice are two identities.
//! Every graph carries a process-unique stamp that is part of each id it hands
//! out, so ids from different graphs never compare equal.
//! [`DescriptorGraph::add`] only accepts references to ids already in the
//! same graph, so every graph it builds is acyclic.

use std::fmt;
use std::ops::Index;
use std::sync::atomic::{AtomicU32, Ordering};

use super::descriptor::Descriptor;
use crate::core::error::{GraphError, GraphResult};

/// Stamp 0 is never handed out.
static NEXT_GRAPH_STAMP: AtomicU32 = AtomicU32::new(1);

/// Stable identity of a descriptor within its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorId {
    graph: u32,
    index: u32,
}

impl DescriptorId {
    /// An id belonging to no graph.
    #[cfg(test)]
    pub(crate) fn from_index(index: usize) -> Self {
        Self {
            graph: 0,
            index: index as u32,
        }
    }

    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// A possibly absent descriptor reference.
pub type DescriptorRef = Option<DescriptorId>;

/// Arena of descriptors, addressed by [`DescriptorId`].
///
/// Not `Clone`: a copy would share the stamp and hand out colliding ids.
#[derive(Debug)]
pub struct DescriptorGraph<V> {
    stamp: u32,
    descriptors: Vec<Descriptor<V>>,
}

impl<V> Default for DescriptorGraph<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> DescriptorGraph<V> {
    pub fn new() -> Self {
        Self {
            stamp: NEXT_GRAPH_STAMP.fetch_add(1, Ordering::Relaxed),
            descriptors: Vec::new(),
        }
    }

    /// Whether `id` was handed out by this graph.
    pub fn contains(&self, id: DescriptorId) -> bool {
        id.graph == self.stamp && id.index() < self.descriptors.len()
    }

    fn id_at(&self, index: u32) -> DescriptorId {
        DescriptorId {
            graph: self.stamp,
            index,
        }
    }

    /// Add a descriptor and return its identity.
    ///
    /// Fails if the descriptor references an id this graph has not handed out,
    /// if its `file` field references something other than a file, or if the
    /// graph has run out of `u32` indices.
    pub fn add(&mut self, descriptor: impl Into<Descriptor<V>>) -> GraphResult<DescriptorId> {
        let descriptor = descriptor.into();
        let len = self.descriptors.len();
        let index = next_index(len)?;

        for referenced in descriptor.references() {
            if referenced.graph != self.stamp {
                return Err(GraphError::ForeignReference { referenced });
            }
            if referenced.index() >= len {
                return Err(GraphError::DanglingReference { referenced, len });
            }
        }
        if let Some(file) = descriptor.file() {
            let target = &self.descriptors[file.index()];
            if !target.is_file() {
                return Err(GraphError::NotAFile {
                    tag: descriptor.tag(),
                    referenced: file,
                    found: target.tag(),
                });
            }
        }

        let id = self.id_at(index);
        log::debug!("descriptor {} added ({})", id, descriptor.tag());
        self.descriptors.push(descriptor);
        Ok(id)
    }

    /// Add a descriptor and return it as a present reference.
    pub fn add_ref(&mut self, descriptor: impl Into<Descriptor<V>>) -> GraphResult<DescriptorRef> {
        self.add(descriptor).map(Some)
    }

    /// The descriptor behind `id`, `None` if `id` belongs to another graph.
    pub fn get(&self, id: DescriptorId) -> Option<&Descriptor<V>> {
        if id.graph != self.stamp {
            return None;
        }
        self.descriptors.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DescriptorId, &Descriptor<V>)> {
        self.descriptors
            .iter()
            .enumerate()
            .map(|(idx, d)| (self.id_at(idx as u32), d))
    }
}

fn next_index(len: usize) -> GraphResult<u32> {
    u32::try_from(len).map_err(|_| GraphError::Full { len })
}

impl<V> Index<DescriptorId> for DescriptorGraph<V> {
    type Output = Descriptor<V>;

    fn index(&self, id: DescriptorId) -> &Self::Output {
        assert_eq!(id.graph, self.stamp, "descriptor {} belongs to another graph", id);
        &self.descriptors[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::descriptor::{BasicTypeDescriptor, DerivedTypeDescriptor, FileDescriptor};
    use crate::debug::dwarf::{DwarfTag, DwarfTypeEncoding};

    #[test]
    fn ids_are_dense_and_distinct() {
        let mut graph = DescriptorGraph::<()>::new();
        let a = graph.add(FileDescriptor::new("/x/y.go")).unwrap();
        let b = graph.add(FileDescriptor::new("/x/y.go")).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph[a], graph[b]);
    }

    #[test]
    fn rejects_forward_references() {
        let mut graph = DescriptorGraph::<()>::new();
        let ahead = graph.id_at(5);
        let err = graph
            .add(DerivedTypeDescriptor::pointer(Some(ahead)))
            .unwrap_err();
        assert_eq!(err, GraphError::DanglingReference { referenced: ahead, len: 0 });
        assert!(graph.is_empty());
    }

    #[test]
    fn file_fields_must_reference_files() {
        let mut graph = DescriptorGraph::<()>::new();
        let int = graph
            .add(BasicTypeDescriptor::new("int", 32, DwarfTypeEncoding::SIGNED))
            .unwrap();
        let bogus = BasicTypeDescriptor {
            file: Some(int),
            ..BasicTypeDescriptor::new("long", 64, DwarfTypeEncoding::SIGNED)
        };
        let err = graph.add(bogus).unwrap_err();
        assert_eq!(
            err,
            GraphError::NotAFile {
                tag: DwarfTag::BASE_TYPE,
                referenced: int,
                found: DwarfTag::BASE_TYPE,
            }
        );
    }

    #[test]
    fn iter_yields_ids_in_order() {
        let mut graph = DescriptorGraph::<()>::new();
        let file = graph.add_ref(FileDescriptor::new("a.go")).unwrap();
        graph.add(DerivedTypeDescriptor::pointer(None)).unwrap();
        let tags: Vec<_> = graph.iter().map(|(id, d)| (id.index(), d.tag())).collect();
        assert_eq!(tags, vec![(0, DwarfTag::FILE_TYPE), (1, DwarfTag::POINTER_TYPE)]);
        assert_eq!(file.map(DescriptorId::index), Some(0));
        assert!(graph.get(graph.id_at(2)).is_none());
    }

    #[test]
    fn ids_from_another_graph_are_rejected() {
        let mut first = DescriptorGraph::<()>::new();
        let mut second = DescriptorGraph::<()>::new();
        let a = first.add(FileDescriptor::new("/a/b.go")).unwrap();
        let b = second
            .add(BasicTypeDescriptor::new("int", 32, DwarfTypeEncoding::SIGNED))
            .unwrap();

        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(first.contains(a));
        assert!(!second.contains(a));
        assert!(second.get(a).is_none());

        let err = second.add(DerivedTypeDescriptor::pointer(Some(a))).unwrap_err();
        assert_eq!(err, GraphError::ForeignReference { referenced: a });
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn index_past_u32_is_an_error() {
        assert_eq!(next_index(7), Ok(7));
        assert_eq!(next_index(u32::MAX as usize), Ok(u32::MAX));
        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            next_index(u32::MAX as usize + 1),
            Err(GraphError::Full { len: u32::MAX as usize + 1 })
        );
    }
}
