// This module implements DebugInfo, the identity-keyed memo cache that turns descriptors
// into metadata nodes. A DebugInfo lives for one emission session (typically one compile
// unit) and borrows a bumpalo arena from the caller. The cache map (hashbrown, allocated
// through allocator-api2) and the scratch operand lists for node lists live there, and a
// bump arena never reclaims: every rehash and every list buffer stays allocated until the
// arena drops. Give each compile unit a fresh arena rather than reusing one across units.
// The cache owns the emitter but not the descriptors; the graph is passed to every call so
// callers can keep adding descriptors between realizations. Ids carry their graph's
// stamp, so one cache can serve several graphs without identities colliding, and an id
// the given graph did not hand out realizes to null.
//
// Realization is driven by an explicit worklist instead of recursion, so chain depth is
// limited by heap, not stack. A descriptor is expanded once (its references are pushed),
// then realized when it surfaces again with every reference cached. Realization
// dispatches on the closed Descriptor enum and emits the fixed operand layout for each
// DWARF tag, reading nested nodes from the cache. Each identity is realized at most once
// per cache. Absent references become the emitter's null operand and are never cached.
// CacheStats records how many times each path was taken.

//! Identity-keyed realization of descriptors into metadata nodes.

use bumpalo::collections::Vec as BumpVec;
use bumpalo::Bump;
use hashbrown::{DefaultHashBuilder, HashMap};

use super::descriptor::{
    BasicTypeDescriptor, CompileUnitDescriptor, CompositeTypeDescriptor, DerivedTypeDescriptor,
    Descriptor, FileDescriptor, GlobalVariableDescriptor, SubprogramDescriptor,
};
use super::dwarf::DwarfTag;
use super::emitter::{IntWidth, MetadataEmitter};
use super::encode::{const_bool, const_i32, empty_node, split_path};
use super::graph::{DescriptorGraph, DescriptorId, DescriptorRef};

/// Counters describing how a cache has been used.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Descriptors turned into nodes.
    pub realized: usize,

    /// References answered from the cache, counting each operand slot.
    pub hits: usize,

    /// Absent references mapped to null.
    pub absent: usize,

    /// References whose id was not handed out by the graph.
    pub unresolved: usize,
}

/// Memo cache realizing descriptors through an emitter.
///
/// Not shareable across threads of emission; give each compile unit its own.
pub struct DebugInfo<'arena, E: MetadataEmitter> {
    arena: &'arena Bump,
    emitter: E,
    cache: HashMap<DescriptorId, E::Value, DefaultHashBuilder, &'arena Bump>,
    /// Worklist of `(id, expanded)`, reused across calls.
    pending: Vec<(DescriptorId, bool)>,
    stats: CacheStats,
}

impl<'arena, E: MetadataEmitter> DebugInfo<'arena, E> {
    /// Create an empty cache whose bookkeeping lives in `arena`.
    pub fn new_in(arena: &'arena Bump, emitter: E) -> Self {
        Self {
            arena,
            emitter,
            cache: HashMap::new_in(arena),
            pending: Vec::new(),
            stats: CacheStats::default(),
        }
    }

    /// Realize `descriptor`, reusing the node from an earlier call if there was one.
    pub fn md_node(&mut self, graph: &DescriptorGraph<E::Value>, descriptor: DescriptorRef) -> E::Value {
        let Some(id) = descriptor else {
            self.stats.absent += 1;
            return self.emitter.null();
        };

        if !graph.contains(id) {
            log::warn!("descriptor {} was not handed out by this graph of {}; emitting null", id, graph.len());
            self.stats.unresolved += 1;
            return self.emitter.null();
        }

        self.realize_pending(graph, id);
        self.lookup(id)
    }

    /// Realize each descriptor in order. An empty input yields an empty list.
    pub fn md_nodes(&mut self, graph: &DescriptorGraph<E::Value>, descriptors: &[DescriptorRef]) -> Vec<E::Value> {
        descriptors.iter().map(|&d| self.operand(d)).collect()
    }

    /// Realize each descriptor and wrap the results in one node.
    ///
    /// An empty input yields the empty node, never the null operand.
    pub fn node_list(&mut self, graph: &DescriptorGraph<E::Value>, descriptors: &[DescriptorRef]) -> E::Value {
        let mut values = BumpVec::with_capacity_in(descriptors.len(), self.arena);
        for &d in descriptors {
            values.push(self.operand(d));
        }
        self.emitter.md_node(&values)
    }

    /// The node previously realized for `id`, if any.
    pub fn cached(&self, id: DescriptorId) -> Option<E::Value> {
        self.cache.get(&id).copied()
    }

    /// Number of cached identities.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn emitter(&self) -> &E {
        &self.emitter
    }

    pub fn emitter_mut(&mut self) -> &mut E {
        &mut self.emitter
    }

    pub fn into_emitter(self) -> E {
        self.emitter
    }

    /// Realize `root` and everything it references that is not cached yet.
    ///
    /// `root` must belong to `graph`; `add` guarantees the same for every
    /// reference reachable from it.
    fn realize_pending(&mut self, graph: &DescriptorGraph<E::Value>, root: DescriptorId) {
        self.pending.clear();
        self.pending.push((root, false));

        while let Some(&(id, expanded)) = self.pending.last() {
            if expanded {
                self.pending.pop();
                let payload = &graph[id];
                let value = self.realize(payload);
                log::trace!("realized descriptor {} ({}) as {:?}", id, payload.tag(), value);
                self.stats.realized += 1;
                self.cache.insert(id, value);
                continue;
            }

            if self.cache.contains_key(&id) {
                self.pending.pop();
                self.stats.hits += 1;
                continue;
            }

            if let Some(top) = self.pending.last_mut() {
                top.1 = true;
            }
            // Reversed so references are realized in field order.
            let references = graph[id].references();
            self.pending.extend(references.into_iter().rev().map(|r| (r, false)));
        }
    }

    /// Cached node for a reference whose realization already ran.
    fn lookup(&mut self, id: DescriptorId) -> E::Value {
        match self.cache.get(&id) {
            Some(&value) => value,
            None => {
                log::warn!("descriptor {} has no realized node; emitting null", id);
                self.emitter.null()
            }
        }
    }

    fn operand(&mut self, descriptor: DescriptorRef) -> E::Value {
        match descriptor {
            Some(id) => self.lookup(id),
            None => {
                self.stats.absent += 1;
                self.emitter.null()
            }
        }
    }

    fn operand_list(&mut self, descriptors: &[DescriptorRef]) -> E::Value {
        let mut values = BumpVec::with_capacity_in(descriptors.len(), self.arena);
        for &d in descriptors {
            values.push(self.operand(d));
        }
        self.emitter.md_node(&values)
    }

    fn realize(&mut self, descriptor: &Descriptor<E::Value>) -> E::Value {
        match descriptor {
            Descriptor::BasicType(d) => self.realize_basic_type(d),
            Descriptor::CompositeType(d) => self.realize_composite_type(d),
            Descriptor::DerivedType(d) => self.realize_derived_type(d),
            Descriptor::CompileUnit(d) => self.realize_compile_unit(d),
            Descriptor::Subprogram(d) => self.realize_subprogram(d),
            Descriptor::GlobalVariable(d) => self.realize_global_variable(d),
            Descriptor::File(d) => self.realize_file(d),
        }
    }

    fn tag(&mut self, tag: DwarfTag) -> E::Value {
        const_i32(&mut self.emitter, tag.versioned())
    }

    fn int(&mut self, value: u64) -> E::Value {
        const_i32(&mut self.emitter, value)
    }

    fn zero(&mut self) -> E::Value {
        self.emitter.const_null(IntWidth::I32)
    }

    fn flag(&mut self, value: bool) -> E::Value {
        const_bool(&mut self.emitter, value)
    }

    fn string(&mut self, value: &str) -> E::Value {
        self.emitter.md_string(value)
    }

    fn empty(&mut self) -> E::Value {
        empty_node(&mut self.emitter)
    }

    fn embedded(&self, value: Option<E::Value>) -> E::Value {
        value.unwrap_or_else(|| self.emitter.null())
    }

    fn realize_basic_type(&mut self, d: &BasicTypeDescriptor) -> E::Value {
        let operands = [
            self.tag(DwarfTag::BASE_TYPE),
            self.operand(d.context),
            self.string(&d.name),
            self.operand(d.file),
            self.int(u64::from(d.line)),
            self.int(d.size),
            self.int(d.alignment),
            self.int(d.offset),
            self.int(u64::from(d.flags)),
            self.int(u64::from(d.encoding.0)),
        ];
        self.emitter.md_node(&operands)
    }

    fn realize_composite_type(&mut self, d: &CompositeTypeDescriptor) -> E::Value {
        let operands = [
            self.tag(d.tag()),
            self.operand(d.context),
            self.string(&d.name),
            self.operand(d.file),
            self.int(u64::from(d.line)),
            self.int(d.size),
            self.int(d.alignment),
            self.int(d.offset),
            self.int(u64::from(d.flags)),
            // derived-from
            self.empty(),
            self.operand_list(&d.members),
            // runtime language
            self.int(0),
        ];
        self.emitter.md_node(&operands)
    }

    fn realize_derived_type(&mut self, d: &DerivedTypeDescriptor) -> E::Value {
        let operands = [
            self.tag(d.tag()),
            self.operand(d.context),
            self.string(&d.name),
            self.operand(d.file),
            self.int(u64::from(d.line)),
            self.int(d.size),
            self.int(d.alignment),
            self.int(d.offset),
            self.int(u64::from(d.flags)),
            self.operand(d.base),
        ];
        self.emitter.md_node(&operands)
    }

    fn realize_compile_unit(&mut self, d: &CompileUnitDescriptor) -> E::Value {
        let (directory, file_name) = split_path(&d.path);
        let operands = [
            self.tag(DwarfTag::COMPILE_UNIT),
            self.zero(),
            self.int(u64::from(d.language.0)),
            self.string(file_name),
            self.string(directory),
            self.string(&d.producer),
            self.flag(d.main_compile_unit),
            self.flag(d.optimized),
            self.string(&d.compiler_flags),
            // Sign bits beyond 32 are dropped by the i32 constant.
            self.int(d.runtime as u32 as u64),
            self.operand_list(&d.enum_types),
            self.operand_list(&d.retained_types),
            self.operand_list(&d.subprograms),
            self.operand_list(&d.global_variables),
        ];
        self.emitter.md_node(&operands)
    }

    fn realize_subprogram(&mut self, d: &SubprogramDescriptor<E::Value>) -> E::Value {
        let operands = [
            self.tag(DwarfTag::SUBPROGRAM),
            self.zero(),
            self.operand(d.context),
            self.string(&d.name),
            self.string(&d.display_name),
            // linkage name
            self.empty(),
            self.operand(d.file),
            self.int(u64::from(d.line)),
            self.operand(d.ty),
            // not static
            self.flag(false),
            // locally defined
            self.flag(true),
            // virtuality, virtual index
            self.zero(),
            self.zero(),
            // containing type
            self.empty(),
            // flags
            self.zero(),
            // not optimized
            self.flag(false),
            self.embedded(d.function),
            // template parameters, declaration, variables
            self.empty(),
            self.empty(),
            self.empty(),
        ];
        self.emitter.md_node(&operands)
    }

    fn realize_global_variable(&mut self, d: &GlobalVariableDescriptor<E::Value>) -> E::Value {
        let operands = [
            self.tag(DwarfTag::VARIABLE),
            self.zero(),
            self.operand(d.context),
            self.string(&d.name),
            self.string(&d.display_name),
            // linkage name
            self.empty(),
            self.operand(d.file),
            self.int(u64::from(d.line)),
            self.operand(d.ty),
            self.flag(d.local),
            self.flag(!d.external),
            self.embedded(d.value),
        ];
        self.emitter.md_node(&operands)
    }

    fn realize_file(&mut self, d: &FileDescriptor) -> E::Value {
        let (directory, file_name) = split_path(&d.path);
        let operands = [
            self.tag(DwarfTag::FILE_TYPE),
            self.string(file_name),
            self.string(directory),
            // compile unit
            self.empty(),
        ];
        self.emitter.md_node(&operands)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::test_utils::test::with_test_context;
    use crate::debug::descriptor::{
        BasicTypeDescriptor, CompositeTypeDescriptor, DerivedTypeDescriptor, FileDescriptor,
        SubprogramDescriptor,
    };
    use crate::debug::dwarf::{DwarfTag, DwarfTypeEncoding};
    use crate::debug::graph::{DescriptorGraph, DescriptorId};
    use crate::debug::table::MdValue;

    #[test]
    fn absent_reference_is_null_and_uncached() {
        with_test_context(|ctx| {
            let graph = DescriptorGraph::new();
            let mut info = ctx.debug_info();
            assert_eq!(info.md_node(&graph, None), MdValue::Null);
            assert!(info.is_empty());
            assert_eq!(info.stats().absent, 1);
        });
    }

    #[test]
    fn shared_descriptor_realized_once() {
        with_test_context(|ctx| {
            let mut graph = DescriptorGraph::new();
            let int = graph
                .add_ref(BasicTypeDescriptor::new("int", 32, DwarfTypeEncoding::SIGNED))
                .unwrap();
            let ptr = graph.add_ref(DerivedTypeDescriptor::pointer(int)).unwrap();
            let sig = graph
                .add_ref(CompositeTypeDescriptor::subroutine(int, &[int, ptr]))
                .unwrap();

            let mut info = ctx.debug_info();
            let node = info.md_node(&graph, sig);
            let stats = info.stats();
            assert_eq!(stats.realized, 3);
            // int is reached from the pointer, the result slot and the first parameter.
            assert_eq!(stats.hits, 2);
            assert_eq!(info.md_node(&graph, sig), node);
            assert_eq!(info.stats().realized, 3);
        });
    }

    #[test]
    fn composite_operands() {
        with_test_context(|ctx| {
            let mut graph = DescriptorGraph::new();
            let int = graph
                .add_ref(BasicTypeDescriptor::new("int", 32, DwarfTypeEncoding::SIGNED))
                .unwrap();
            let field = graph
                .add_ref(DerivedTypeDescriptor::member("x", int, 0))
                .unwrap();
            let point = graph
                .add_ref(CompositeTypeDescriptor {
                    name: "Point".into(),
                    size: 32,
                    alignment: 32,
                    ..CompositeTypeDescriptor::structure(vec![field])
                })
                .unwrap();

            let mut info = ctx.debug_info();
            let node = info.md_node(&graph, point);
            let field_node = info.cached(field.unwrap()).unwrap();
            let table = info.into_emitter();
            let ops = table.operands(node).unwrap();
            assert_eq!(ops.len(), 12);
            assert_eq!(ops[0], MdValue::i32(DwarfTag::STRUCTURE_TYPE.versioned()));
            assert_eq!(table.string(ops[2]), Some("Point"));
            assert_eq!(table.operands(ops[9]), Some(&[][..]));
            assert_eq!(table.operands(ops[10]), Some(&[field_node][..]));
            assert_eq!(ops[11], MdValue::i32(0));
        });
    }

    #[test]
    fn subprogram_embeds_function_value() {
        with_test_context(|ctx| {
            let mut graph = DescriptorGraph::new();
            let mut info = ctx.debug_info();
            let main = info.emitter_mut().global("main");
            let file = graph.add_ref(FileDescriptor::new("/src/main.go")).unwrap();
            let sub = graph
                .add_ref(SubprogramDescriptor {
                    name: "main".into(),
                    display_name: "main.main".into(),
                    file,
                    line: 3,
                    function: Some(main),
                    ..Default::default()
                })
                .unwrap();

            let node = info.md_node(&graph, sub);
            let table = info.emitter();
            let ops = table.operands(node).unwrap();
            assert_eq!(ops.len(), 20);
            assert_eq!(ops[16], main);
            assert_eq!(ops[9], MdValue::bool(false));
            assert_eq!(ops[10], MdValue::bool(true));
            assert_eq!(ops[8], MdValue::Null);
        });
    }

    #[test]
    fn bookkeeping_lives_in_arena() {
        with_test_context(|ctx| {
            let mut graph = DescriptorGraph::new();
            let file = graph.add_ref(FileDescriptor::new("/x/y.go")).unwrap();
            let before = ctx.memory_used();
            let mut info = ctx.debug_info();
            info.md_node(&graph, file);
            assert!(ctx.memory_used() > before);
            assert!(ctx.arena().allocated_bytes() >= ctx.memory_used());
        });
    }

    #[test]
    fn foreign_id_realizes_to_null() {
        with_test_context(|ctx| {
            let graph = DescriptorGraph::new();
            let mut info = ctx.debug_info();
            let stray = Some(DescriptorId::from_index(7));
            assert_eq!(info.md_node(&graph, stray), MdValue::Null);
            assert!(info.is_empty());
            assert_eq!(info.stats().unresolved, 1);
        });
    }

    #[test]
    fn one_cache_keeps_graphs_apart() {
        with_test_context(|ctx| {
            let mut first = DescriptorGraph::new();
            let mut second = DescriptorGraph::new();
            let file = first.add_ref(FileDescriptor::new("/a/b.go")).unwrap();
            let int = second
                .add_ref(BasicTypeDescriptor::new("int", 32, DwarfTypeEncoding::SIGNED))
                .unwrap();

            let mut info = ctx.debug_info();
            let file_node = info.md_node(&first, file);
            let int_node = info.md_node(&second, int);
            assert_ne!(file_node, int_node);
            assert_eq!(info.len(), 2);
            assert_eq!(info.stats().realized, 2);

            // Each id resolves only against the graph that handed it out.
            assert_eq!(info.md_node(&second, file), MdValue::Null);
            assert_eq!(info.md_node(&first, int), MdValue::Null);
            assert_eq!(info.stats().unresolved, 2);

            let table = info.emitter();
            let ops = table.operands(int_node).unwrap();
            assert_eq!(ops[0], MdValue::i32(DwarfTag::BASE_TYPE.versioned()));
            assert_eq!(table.string(ops[2]), Some("int"));
        });
    }

    #[test]
    fn references_realize_in_field_order() {
        with_test_context(|ctx| {
            let mut graph = DescriptorGraph::new();
            let a = graph
                .add_ref(BasicTypeDescriptor::new("a", 8, DwarfTypeEncoding::UNSIGNED))
                .unwrap();
            let b = graph
                .add_ref(BasicTypeDescriptor::new("b", 16, DwarfTypeEncoding::UNSIGNED))
                .unwrap();
            let pair = graph
                .add_ref(CompositeTypeDescriptor::structure(vec![b, a]))
                .unwrap();

            let mut info = ctx.debug_info();
            info.md_node(&graph, pair);
            let b_node = info.cached(b.unwrap()).unwrap();
            let a_node = info.cached(a.unwrap()).unwrap();
            // The in-memory table numbers nodes in creation order.
            assert_eq!(b_node, MdValue::Node(0));
            assert_eq!(a_node, MdValue::Node(1));
        });
    }
}
