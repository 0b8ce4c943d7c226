//! End-to-end tests for generation runs.
//!
//! Each test drives an orchestrator into a temporary directory and inspects
//! what ended up on disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;
use vkcereal_codegen::{
    Category, EntityInfo, EntityKind, Error, Event, Field, FileState, GenOptions,
    GeneratorConfig, ModuleId, ModuleSpec, ModuleState, Orchestrator,
    testing::{FailingEmitter, RecordingEmitter, extent_2d, framed_module, sample_events},
};

/// Every regular file under `root`, relative to it, sorted.
fn files_under(root: &Path) -> Vec<PathBuf> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                out.push(path.strip_prefix(root).unwrap().to_path_buf());
            }
        }
    }

    let mut out = Vec::new();
    if root.exists() {
        walk(root, root, &mut out);
    }
    out.sort();
    out
}

fn read(root: &Path, path: &str) -> String {
    fs::read_to_string(root.join(path)).unwrap()
}

/// One framed module with a recording emitter bound to it.
fn single_module() -> Orchestrator {
    let mut builder = GeneratorConfig::builder();
    let m = builder.module(framed_module("common", "m"));
    builder.emitter(RecordingEmitter::new("rec", [m]));
    Orchestrator::new(builder.build())
}

#[test]
fn test_preambles_frame_appended_text() {
    let dir = TempDir::new().unwrap();
    let mut orchestrator = single_module();

    let stats = orchestrator.run(sample_events(GenOptions::new(dir.path()))).unwrap();
    assert_eq!(stats.written(), 3);
    assert_eq!(orchestrator.state(), FileState::Finished);

    insta::assert_snapshot!(read(dir.path(), "common/m.h"), @r"
    // begin m header
    #ifdef VK_VERSION_1_0
    // rec struct VkExtent2D
    // rec struct VkExtent2DKHR
    #endif
    // end m header
    ");
    insta::assert_snapshot!(read(dir.path(), "common/m.cpp"), @r"
    // begin m impl
    #ifdef VK_VERSION_1_0
    // rec struct VkExtent2D
    // rec struct VkExtent2DKHR
    #endif
    // end m impl
    ");
}

#[test]
fn test_guards_reach_modules_without_emitters() {
    let dir = TempDir::new().unwrap();
    let mut builder = GeneratorConfig::builder();
    let bound = builder.module(ModuleSpec::new("common", "bound"));
    builder.module(ModuleSpec::new("guest", "silent"));
    builder.emitter(RecordingEmitter::new("rec", [bound]));
    let mut orchestrator = Orchestrator::new(builder.build());

    orchestrator.begin_file(GenOptions::new(dir.path())).unwrap();
    orchestrator.begin_feature("VK_VERSION_1_0").unwrap();
    orchestrator.begin_feature("VK_KHR_surface").unwrap();
    assert_eq!(orchestrator.scope().depth(), 2);
    assert_eq!(orchestrator.scope().current(), Some("VK_KHR_surface"));
    orchestrator
        .gen_struct(&extent_2d(), "VkExtent2D", None)
        .unwrap();
    orchestrator.end_feature().unwrap();
    orchestrator.end_feature().unwrap();
    orchestrator.end_file().unwrap();

    let silent = read(dir.path(), "guest/silent.h");
    assert_eq!(
        silent,
        "#ifdef VK_VERSION_1_0\n#ifdef VK_KHR_surface\n#endif\n#endif\n"
    );
    assert_eq!(read(dir.path(), "guest/silent.cpp"), silent);

    for path in ["common/bound.h", "common/bound.cpp"] {
        let text = read(dir.path(), path);
        assert_eq!(text.matches("#ifdef").count(), 2, "{path}");
        assert_eq!(text.matches("#endif").count(), 2, "{path}");
    }
}

#[test]
fn test_reruns_are_byte_identical() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    single_module()
        .run(sample_events(GenOptions::new(first.path())))
        .unwrap();
    single_module()
        .run(sample_events(GenOptions::new(second.path())))
        .unwrap();

    let files = files_under(first.path());
    assert_eq!(files, files_under(second.path()));
    for file in files {
        assert_eq!(
            fs::read(first.path().join(&file)).unwrap(),
            fs::read(second.path().join(&file)).unwrap(),
            "{}",
            file.display()
        );
    }
}

#[test]
fn test_alias_resolves_to_target_category() {
    let dir = TempDir::new().unwrap();
    let mut orchestrator = single_module();
    orchestrator.run(sample_events(GenOptions::new(dir.path()))).unwrap();

    let registry = orchestrator.registry();
    assert_eq!(
        registry.get("VkExtent2DKHR").unwrap().category,
        Category::Alias
    );
    assert_eq!(
        registry.category_of("VkExtent2DKHR").unwrap(),
        Category::Struct
    );
}

#[test]
fn test_end_file_with_open_feature_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut orchestrator = single_module();

    orchestrator.begin_file(GenOptions::new(dir.path())).unwrap();
    orchestrator.begin_feature("VK_VERSION_1_0").unwrap();
    let err = orchestrator.end_file().unwrap_err();

    assert!(matches!(*err, Error::UnbalancedFeatures { .. }));
    assert!(err.is_protocol_violation());
    assert_eq!(orchestrator.state(), FileState::Aborted);
    assert!(
        orchestrator
            .modules()
            .iter()
            .all(|m| m.state() != ModuleState::Closed)
    );
    assert!(files_under(dir.path()).is_empty());
}

#[test]
fn test_two_module_scenario() {
    let dir = TempDir::new().unwrap();
    let mut builder = GeneratorConfig::builder();
    let marshaling = builder.module(ModuleSpec::new("common", "goldfish_vk_marshaling"));
    let frontend = builder.module(
        ModuleSpec::new("guest", "goldfish_vk_frontend")
            .impl_preamble("#include \"common/goldfish_vk_marshaling.h\"\n"),
    );
    builder.emitter(RecordingEmitter::new("marshaling", [marshaling]));
    builder.emitter(RecordingEmitter::new("frontend", [frontend]));
    let mut orchestrator = Orchestrator::new(builder.build());

    orchestrator
        .run([
            Event::BeginFile(GenOptions::new(dir.path())),
            Event::BeginFeature("F1".to_string()),
            Event::entity(EntityKind::Struct, "S", extent_2d()),
            Event::EndFeature,
            Event::EndFile,
        ])
        .unwrap();

    assert!(
        read(dir.path(), "guest/goldfish_vk_frontend.cpp")
            .starts_with("#include \"common/goldfish_vk_marshaling.h\"\n")
    );
    for path in [
        "common/goldfish_vk_marshaling.h",
        "common/goldfish_vk_marshaling.cpp",
        "guest/goldfish_vk_frontend.h",
        "guest/goldfish_vk_frontend.cpp",
    ] {
        let text = read(dir.path(), path);
        assert_eq!(text.matches("#ifdef F1\n").count(), 1, "{path}");
        assert_eq!(text.matches("#endif\n").count(), 1, "{path}");
    }

    assert_eq!(orchestrator.modules()[1].directory(), "guest");
    let mk = read(dir.path(), "Android.mk");
    assert_eq!(orchestrator.build_text(), mk);
    let marshaling_at = mk.find("common/goldfish_vk_marshaling.cpp").unwrap();
    let frontend_at = mk.find("guest/goldfish_vk_frontend.cpp").unwrap();
    assert!(marshaling_at < frontend_at);
}

#[test]
fn test_emitters_see_registry_first_and_run_in_order() {
    let dir = TempDir::new().unwrap();
    let mut builder = GeneratorConfig::builder();
    let m = builder.module(ModuleSpec::new("common", "m"));
    let first = RecordingEmitter::new("first", [m]);
    let log = first.log();
    builder.emitter(first);
    builder.emitter(RecordingEmitter::new("second", Vec::<ModuleId>::new()).with_log(log.clone()));
    let mut orchestrator = Orchestrator::new(builder.build());

    orchestrator.run(sample_events(GenOptions::new(dir.path()))).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "first struct VkExtent2D",
            "second struct VkExtent2D",
            "first struct VkExtent2DKHR",
            "second struct VkExtent2DKHR",
        ]
    );
}

#[test]
fn test_repeated_entity_is_emitted_once() {
    let dir = TempDir::new().unwrap();
    let mut builder = GeneratorConfig::builder();
    let m = builder.module(ModuleSpec::new("common", "m"));
    let rec = RecordingEmitter::new("rec", [m]);
    let log = rec.log();
    builder.emitter(rec);
    let mut orchestrator = Orchestrator::new(builder.build());

    orchestrator
        .run([
            Event::BeginFile(GenOptions::new(dir.path())),
            Event::BeginFeature("VK_VERSION_1_0".to_string()),
            Event::entity(EntityKind::Struct, "VkExtent2D", extent_2d()),
            Event::EndFeature,
            Event::BeginFeature("VK_VERSION_1_1".to_string()),
            Event::entity(EntityKind::Struct, "VkExtent2D", extent_2d()),
            Event::EndFeature,
            Event::EndFile,
        ])
        .unwrap();

    assert_eq!(*log.borrow(), vec!["rec struct VkExtent2D"]);
    let header = read(dir.path(), "common/m.h");
    assert_eq!(header.matches("// rec struct VkExtent2D\n").count(), 1);
    assert_eq!(orchestrator.registry().len(), 1);
}

#[test]
fn test_dangling_alias_aborts_without_writing() {
    let dir = TempDir::new().unwrap();
    let mut orchestrator = single_module();

    let err = orchestrator
        .run([
            Event::BeginFile(GenOptions::new(dir.path())),
            Event::alias(EntityKind::Struct, "VkFooKHR", "VkFoo"),
            Event::EndFile,
        ])
        .unwrap_err();

    match *err {
        Error::UnresolvedAlias {
            ref alias,
            ref target,
        } => {
            assert_eq!(alias, "VkFooKHR");
            assert_eq!(target, "VkFoo");
        }
        ref other => panic!("unexpected error: {other}"),
    }
    assert!(files_under(dir.path()).is_empty());
}

#[test]
fn test_emitter_error_names_emitter_and_entity() {
    let dir = TempDir::new().unwrap();
    let mut builder = GeneratorConfig::builder();
    builder.module(ModuleSpec::new("common", "m"));
    builder.emitter(FailingEmitter::on("VkExtent2D"));
    let mut orchestrator = Orchestrator::new(builder.build());

    let err = orchestrator
        .run(sample_events(GenOptions::new(dir.path())))
        .unwrap_err();

    match *err {
        Error::Emitter {
            emitter,
            kind,
            ref entity,
            ref source,
        } => {
            assert_eq!(emitter, "failing");
            assert_eq!(kind, EntityKind::Struct);
            assert_eq!(entity, "VkExtent2D");
            assert_eq!(source.to_string(), "refusing to emit VkExtent2D");
        }
        ref other => panic!("unexpected error: {other}"),
    }
    assert!(!err.is_protocol_violation());
    assert_eq!(orchestrator.state(), FileState::Aborted);
}

#[test]
fn test_emitter_writing_to_unknown_module_is_protocol_violation() {
    let dir = TempDir::new().unwrap();
    let mut other = GeneratorConfig::builder();
    other.module(ModuleSpec::new("common", "a"));
    let stray = other.module(ModuleSpec::new("common", "b"));

    let mut builder = GeneratorConfig::builder();
    builder.module(ModuleSpec::new("common", "m"));
    builder.emitter(RecordingEmitter::new("stray", [stray]));
    let mut orchestrator = Orchestrator::new(builder.build());

    let err = orchestrator
        .run(sample_events(GenOptions::new(dir.path())))
        .unwrap_err();

    assert!(matches!(*err, Error::Emitter { emitter: "stray", .. }));
    assert!(err.is_protocol_violation());
    assert!(!err.is_schema_inconsistency());
    assert!(files_under(dir.path()).is_empty());
}

#[test]
fn test_abort_leaves_existing_outputs_untouched() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("common")).unwrap();
    fs::write(dir.path().join("common/m.h"), "previous run\n").unwrap();

    let mut builder = GeneratorConfig::builder();
    let m = builder.module(framed_module("common", "m"));
    builder.emitter(RecordingEmitter::new("rec", [m]));
    builder.emitter(FailingEmitter::on("VkExtent2D"));
    let mut orchestrator = Orchestrator::new(builder.build());

    assert!(
        orchestrator
            .run(sample_events(GenOptions::new(dir.path())))
            .is_err()
    );

    assert_eq!(read(dir.path(), "common/m.h"), "previous run\n");
    assert_eq!(files_under(dir.path()), vec![PathBuf::from("common/m.h")]);
}

#[test]
fn test_events_after_abort_are_rejected() {
    let dir = TempDir::new().unwrap();
    let mut orchestrator = single_module();

    orchestrator.begin_file(GenOptions::new(dir.path())).unwrap();
    let err = orchestrator.end_feature().unwrap_err();
    assert!(matches!(*err, Error::EmptyFeatureScope));

    let err = orchestrator
        .gen_struct(&extent_2d(), "VkExtent2D", None)
        .unwrap_err();
    assert!(matches!(*err, Error::Aborted));
    assert!(orchestrator.registry().is_empty());
}

#[test]
fn test_events_before_begin_file_are_rejected() {
    let mut orchestrator = single_module();

    let err = orchestrator.begin_feature("VK_VERSION_1_0").unwrap_err();
    assert!(matches!(
        *err,
        Error::FileState {
            state: FileState::Idle,
            ..
        }
    ));
}

#[test]
fn test_stream_must_end_the_file() {
    let dir = TempDir::new().unwrap();
    let mut orchestrator = single_module();

    let err = orchestrator
        .run([Event::BeginFile(GenOptions::new(dir.path()))])
        .unwrap_err();

    assert!(matches!(*err, Error::FileState { .. }));
    assert!(files_under(dir.path()).is_empty());
}

#[test]
fn test_staged_output_lands_on_commit() {
    let dir = TempDir::new().unwrap();
    let mut orchestrator = single_module();

    orchestrator.begin_file(GenOptions::new(dir.path())).unwrap();
    orchestrator
        .gen_cmd(
            &EntityInfo::command("void", Vec::<Field>::new()),
            "vkDestroyInstance",
            None,
        )
        .unwrap();
    let output = orchestrator.end_file_staged().unwrap();

    assert_eq!(output.len(), 3);
    let header = output.get(dir.path().join("common/m.h")).unwrap();
    assert!(header.content().contains("// rec command vkDestroyInstance\n"));
    assert!(!dir.path().join("common/m.h").exists());

    let stats = output.commit().unwrap();
    assert_eq!(stats.written(), 3);
    assert!(dir.path().join("common/m.h").exists());
    assert!(dir.path().join("Android.mk").exists());
}

#[test]
fn test_failed_rename_keeps_earlier_files_and_drops_the_rest() {
    let dir = TempDir::new().unwrap();
    let mut orchestrator = single_module();

    orchestrator.begin_file(GenOptions::new(dir.path())).unwrap();
    let output = orchestrator.end_file_staged().unwrap();
    fs::create_dir_all(dir.path().join("common/m.cpp/blocker")).unwrap();

    let err = output.commit().unwrap_err();

    assert!(matches!(*err, Error::Io { ref path, .. } if path.ends_with("common/m.cpp")));
    assert!(dir.path().join("common/m.h").is_file());
    assert!(!dir.path().join("Android.mk").exists());
}
