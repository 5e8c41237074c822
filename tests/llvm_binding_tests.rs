//! Tests for the LLVM-backed emitter and the C API pass-throughs.

#![cfg(feature = "llvm")]

use bumpalo::Bump;
use inkwell::context::Context;
use inkwell::module::Module;
use llvmc::debug::{
    BasicTypeDescriptor, CompileUnitDescriptor, DebugInfo, DescriptorGraph, DwarfLang, DwarfTypeEncoding,
    FileDescriptor, MetadataEmitter, SubprogramDescriptor,
};
use llvmc::llvm::{
    describe_type, initialize_native_target, link_modules, parse_bitcode, parse_bitcode_file, write_bitcode,
    write_bitcode_to_file, write_bitcode_to_memory, LinkerMode, LlvmEmitter, LlvmValue, TargetLayout, TypeKind,
    COMPILE_UNITS,
};
use llvmc::BindingError;

/// Module with one defined function `name` returning i32 0.
fn module_with_function<'ctx>(context: &'ctx Context, module_name: &str, name: &str) -> Module<'ctx> {
    let module = context.create_module(module_name);
    let i32_type = context.i32_type();
    let function = module.add_function(name, i32_type.fn_type(&[], false), None);
    let entry = context.append_basic_block(function, "entry");
    let builder = context.create_builder();
    builder.position_at_end(entry);
    builder.build_return(Some(&i32_type.const_zero())).unwrap();
    module
}

#[test]
fn emits_basic_type_node() {
    let context = Context::create();
    let arena = Bump::new();
    let mut graph = DescriptorGraph::new();
    let int = graph
        .add_ref(BasicTypeDescriptor {
            line: 10,
            ..BasicTypeDescriptor::new("int", 32, DwarfTypeEncoding::SIGNED)
        })
        .unwrap();

    let mut info = DebugInfo::new_in(&arena, LlvmEmitter::new(&context));
    let node = info.md_node(&graph, int);
    assert_eq!(info.md_node(&graph, int), node);

    let emitter = info.emitter();
    let ops = emitter.node_operands(node);
    assert_eq!(ops.len(), 10);
    assert!(ops[1].is_null());
    assert!(ops[3].is_null());
    assert_eq!(emitter.string_value(ops[2]).as_deref(), Some("int"));
}

#[test]
fn empty_node_is_not_null() {
    let context = Context::create();
    let mut emitter = LlvmEmitter::new(&context);
    let empty = emitter.md_node(&[]);
    assert!(!empty.is_null());
    assert_ne!(empty, emitter.null());
    assert!(emitter.node_operands(empty).is_empty());
}

#[test]
fn attaches_compile_unit_with_function() {
    let context = Context::create();
    let module = module_with_function(&context, "main", "main");
    let function = module.get_function("main").unwrap();
    let arena = Bump::new();

    let mut graph = DescriptorGraph::new();
    let file = graph.add_ref(FileDescriptor::new("/src/main.go")).unwrap();
    let sub = graph
        .add_ref(SubprogramDescriptor {
            name: "main".into(),
            file,
            function: Some(LlvmValue::from_value(&function)),
            ..Default::default()
        })
        .unwrap();
    let unit = graph
        .add_ref(CompileUnitDescriptor {
            language: DwarfLang::GO,
            path: "/src/main.go".into(),
            subprograms: vec![sub],
            ..Default::default()
        })
        .unwrap();

    let mut info = DebugInfo::new_in(&arena, LlvmEmitter::new(&context));
    let node = info.md_node(&graph, unit);
    let emitter = info.emitter();
    emitter.attach_compile_unit(&module, node).unwrap();

    let units = emitter.named_metadata(&module, COMPILE_UNITS).unwrap();
    assert_eq!(units, vec![node]);
    let ops = emitter.node_operands(node);
    assert_eq!(ops.len(), 14);
    assert_eq!(emitter.string_value(ops[3]).as_deref(), Some("main.go"));
    assert_eq!(emitter.string_value(ops[4]).as_deref(), Some("/src/"));
    let subprograms = emitter.node_operands(ops[12]);
    assert_eq!(subprograms.len(), 1);
    assert_eq!(emitter.node_operands(subprograms[0]).len(), 20);
}

#[test]
fn rejects_metadata_name_with_nul() {
    let context = Context::create();
    let module = context.create_module("m");
    let mut emitter = LlvmEmitter::new(&context);
    let node = emitter.md_node(&[]);
    let err = emitter.add_named_metadata(&module, "bad\0name", node).unwrap_err();
    assert!(matches!(err, BindingError::InvalidName { .. }));
}

#[test]
fn bitcode_memory_round_trip() {
    let context = Context::create();
    let module = module_with_function(&context, "round", "answer");
    let bytes = write_bitcode_to_memory(&module);
    assert!(bytes.starts_with(b"BC"));

    let parsed = parse_bitcode(&context, &bytes, "round.bc").unwrap();
    assert!(parsed.get_function("answer").is_some());

    let mut sink = Vec::new();
    write_bitcode(&module, &mut sink).unwrap();
    assert_eq!(sink, bytes);
}

#[test]
fn bitcode_file_round_trip() {
    let context = Context::create();
    let module = module_with_function(&context, "file", "answer");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("answer.bc");

    write_bitcode_to_file(&module, &path).unwrap();
    let parsed = parse_bitcode_file(&context, &path).unwrap();
    assert!(parsed.get_function("answer").is_some());
}

#[test]
fn invalid_bitcode_surfaces_message() {
    let context = Context::create();
    let err = parse_bitcode(&context, b"not bitcode", "junk.bc").unwrap_err();
    match err {
        BindingError::Bitcode { source_name, message } => {
            assert_eq!(source_name, "junk.bc");
            assert!(!message.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }

    let missing = parse_bitcode_file(&context, "/nonexistent/input.bc").unwrap_err();
    assert!(matches!(missing, BindingError::Bitcode { .. }));
}

#[test]
fn link_preserving_source() {
    let context = Context::create();
    let dest = module_with_function(&context, "dest", "first");
    let src = module_with_function(&context, "src", "second");

    let kept = link_modules(&dest, src, LinkerMode::PreserveSource).unwrap().unwrap();
    assert!(dest.get_function("first").is_some());
    assert!(dest.get_function("second").is_some());
    assert!(kept.get_function("second").is_some());
}

#[test]
fn link_destroying_source() {
    let context = Context::create();
    let dest = module_with_function(&context, "dest", "first");
    let src = module_with_function(&context, "src", "second");

    assert!(link_modules(&dest, src, LinkerMode::DestroySource).unwrap().is_none());
    assert!(dest.get_function("second").is_some());
}

#[test]
fn link_conflict_is_reported() {
    let context = Context::create();
    let dest = module_with_function(&context, "dest", "dup");
    let src = module_with_function(&context, "src", "dup");

    let err = link_modules(&dest, src, LinkerMode::DestroySource).unwrap_err();
    assert!(matches!(err, BindingError::Link { .. }));
}

#[test]
fn native_layout() {
    initialize_native_target().unwrap();
    let layout = TargetLayout::from_string("e-p:64:64-i64:64-n8:16:32:64-S128");
    assert_eq!(layout.pointer_size(), 8);
    assert!(layout.is_little_endian());

    let context = Context::create();
    let i64_type = context.i64_type();
    assert_eq!(layout.size_in_bits(&i64_type), 64);
    assert_eq!(layout.abi_size(&i64_type), 8);
    assert_eq!(layout.int_ptr_type(&context).get_bit_width(), 64);

    let pair = context.struct_type(&[context.i8_type().into(), i64_type.into()], false);
    assert_eq!(layout.element_offset(&pair, 1), Some(8));
    assert_eq!(layout.element_containing_offset(&pair, 9), 1);
}

#[test]
fn describes_types() {
    let context = Context::create();
    let i32_type = context.i32_type();
    let f32_type = context.f32_type();

    assert_eq!(describe_type(&i32_type), "Integer");
    assert_eq!(describe_type(&i32_type.array_type(4)), "Array(Integer[4])");
    assert_eq!(describe_type(&f32_type.vec_type(4)), "Vector(Float[4])");
    let pair = context.struct_type(&[i32_type.into(), f32_type.into()], false);
    assert_eq!(describe_type(&pair), "Struct(Integer, Float)");
    assert_eq!(describe_type(&context.ptr_type(inkwell::AddressSpace::default())), "Pointer");
    assert_eq!(TypeKind::of(&context.void_type()).to_string(), "VoidTypeKind");
}
