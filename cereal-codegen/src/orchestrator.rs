//! The generation orchestrator.

use std::{fmt, path::PathBuf};

use vkcereal_core::PendingFile;

use crate::{
    BuildDescription, EmitContext, Emitter, EntityInfo, EntityKind, Error, FeatureScope,
    GeneratedOutput, GeneratorConfig, Module, ModuleId, Result, TypeRegistry, WriteStats,
    scope::{CLOSE_MARKER, open_marker},
};

/// Per-file options supplied by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenOptions {
    /// Directory all module paths are relative to.
    pub directory: PathBuf,
}

impl GenOptions {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

/// Where the orchestrator is in the file lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Waiting for `begin_file`.
    Idle,
    /// Between `begin_file` and `end_file`.
    Generating,
    /// `end_file` completed.
    Finished,
    /// An error ended the run.
    Aborted,
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileState::Idle => write!(f, "idle"),
            FileState::Generating => write!(f, "generating"),
            FileState::Finished => write!(f, "finished"),
            FileState::Aborted => write!(f, "aborted"),
        }
    }
}

/// One step of the driver's event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    BeginFile(GenOptions),
    BeginFeature(String),
    Entity {
        kind: EntityKind,
        info: EntityInfo,
        name: String,
        alias: Option<String>,
    },
    EndFeature,
    EndFile,
}

impl Event {
    pub fn entity(kind: EntityKind, name: impl Into<String>, info: EntityInfo) -> Self {
        Event::Entity {
            kind,
            info,
            name: name.into(),
            alias: None,
        }
    }

    pub fn alias(kind: EntityKind, name: impl Into<String>, target: impl Into<String>) -> Self {
        Event::Entity {
            kind,
            info: EntityInfo::default(),
            name: name.into(),
            alias: Some(target.into()),
        }
    }
}

/// Reacts to schema events by updating the registry and fanning them out to
/// emitters, keeping every module's guard nesting in lock-step.
///
/// A run is all-or-nothing: the first error moves the orchestrator to
/// [`FileState::Aborted`], releases every output file and rejects further
/// events. Nothing reaches its final path until `end_file` succeeds.
///
/// # Example
///
/// ```ignore
/// let mut orchestrator = Orchestrator::new(config);
/// orchestrator.begin_file(GenOptions::new("out"))?;
/// orchestrator.begin_feature("VK_VERSION_1_0")?;
/// orchestrator.gen_struct(&info, "VkExtent2D", None)?;
/// orchestrator.end_feature()?;
/// let stats = orchestrator.end_file()?;
/// ```
pub struct Orchestrator {
    modules: Vec<Module>,
    emitters: Vec<Box<dyn Emitter>>,
    registry: TypeRegistry,
    scope: FeatureScope,
    build: BuildDescription,
    build_text: String,
    build_output: Option<PendingFile>,
    state: FileState,
}

impl Orchestrator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            modules: config.modules.into_iter().map(Module::new).collect(),
            emitters: config.emitters,
            registry: TypeRegistry::new(),
            scope: FeatureScope::new(),
            build: config.build,
            build_text: String::new(),
            build_output: None,
            state: FileState::Idle,
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Modules, in registration order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id.index())
    }

    pub fn scope(&self) -> &FeatureScope {
        &self.scope
    }

    pub fn state(&self) -> FileState {
        self.state
    }

    /// The rendered build description (empty before `begin_file`).
    pub fn build_text(&self) -> &str {
        &self.build_text
    }

    /// Render the build description and open every module.
    pub fn begin_file(&mut self, options: GenOptions) -> Result<()> {
        let result = self.begin_file_inner(options);
        self.settle(result)
    }

    /// Close every module and commit all outputs.
    pub fn end_file(&mut self) -> Result<WriteStats> {
        let output = self.end_file_staged()?;
        let result = output.commit();
        self.settle(result)
    }

    /// Close every module and return the staged outputs without committing.
    pub fn end_file_staged(&mut self) -> Result<GeneratedOutput> {
        let result = self.end_file_inner();
        self.settle(result)
    }

    /// Open a feature block in every module.
    pub fn begin_feature(&mut self, guard: &str) -> Result<()> {
        let result = self.begin_feature_inner(guard);
        self.settle(result)
    }

    /// Close the innermost feature block in every module.
    pub fn end_feature(&mut self) -> Result<()> {
        let result = self.end_feature_inner();
        self.settle(result)
    }

    pub fn gen_type(&mut self, info: &EntityInfo, name: &str, alias: Option<&str>) -> Result<()> {
        self.gen_entity(EntityKind::Type, info, name, alias)
    }

    pub fn gen_struct(&mut self, info: &EntityInfo, name: &str, alias: Option<&str>) -> Result<()> {
        self.gen_entity(EntityKind::Struct, info, name, alias)
    }

    pub fn gen_group(&mut self, info: &EntityInfo, name: &str, alias: Option<&str>) -> Result<()> {
        self.gen_entity(EntityKind::Group, info, name, alias)
    }

    pub fn gen_enum(&mut self, info: &EntityInfo, name: &str, alias: Option<&str>) -> Result<()> {
        self.gen_entity(EntityKind::Enum, info, name, alias)
    }

    pub fn gen_cmd(&mut self, info: &EntityInfo, name: &str, alias: Option<&str>) -> Result<()> {
        self.gen_entity(EntityKind::Command, info, name, alias)
    }

    /// Register an entity, then notify every emitter.
    pub fn gen_entity(
        &mut self,
        kind: EntityKind,
        info: &EntityInfo,
        name: &str,
        alias: Option<&str>,
    ) -> Result<()> {
        let result = self.dispatch(kind, info, name, alias);
        self.settle(result)
    }

    /// Apply one event. Returns the commit statistics for `EndFile`.
    pub fn apply(&mut self, event: Event) -> Result<Option<WriteStats>> {
        match event {
            Event::BeginFile(options) => self.begin_file(options).map(|_| None),
            Event::BeginFeature(guard) => self.begin_feature(&guard).map(|_| None),
            Event::Entity {
                kind,
                info,
                name,
                alias,
            } => self
                .gen_entity(kind, &info, &name, alias.as_deref())
                .map(|_| None),
            Event::EndFeature => self.end_feature().map(|_| None),
            Event::EndFile => self.end_file().map(Some),
        }
    }

    /// Apply a complete event stream, which must end the file.
    pub fn run(&mut self, events: impl IntoIterator<Item = Event>) -> Result<WriteStats> {
        let mut stats = None;
        for event in events {
            stats = self.apply(event)?;
        }
        match stats {
            Some(stats) => Ok(stats),
            None => {
                let err = Box::new(Error::FileState {
                    operation: "finish a stream that never ended the file",
                    state: self.state,
                });
                self.settle(Err(err))
            }
        }
    }

    fn begin_file_inner(&mut self, options: GenOptions) -> Result<()> {
        self.expect_state(FileState::Idle, "begin a file")?;
        self.scope.ensure_empty("begin_file")?;

        tracing::info!(
            directory = %options.directory.display(),
            modules = self.modules.len(),
            "beginning file"
        );

        self.build_text = self
            .build
            .render(self.modules.iter().map(Module::build_fragment));
        let build_path = options.directory.join(&self.build.file_name);
        let build_output =
            PendingFile::create(&build_path).map_err(|source| Error::io(build_path, source))?;
        self.build_output = Some(build_output);

        for module in &mut self.modules {
            module.begin(&options.directory)?;
        }

        self.state = FileState::Generating;
        Ok(())
    }

    fn end_file_inner(&mut self) -> Result<GeneratedOutput> {
        self.expect_state(FileState::Generating, "end the file")?;
        self.scope.ensure_empty("end_file")?;
        self.registry.verify_aliases()?;

        let mut files = Vec::with_capacity(self.modules.len() * 2 + 1);
        for module in &mut self.modules {
            files.extend(module.end()?);
        }

        let Some(build_output) = self.build_output.take() else {
            return Err(Box::new(Error::FileState {
                operation: "write the build description",
                state: self.state,
            }));
        };
        let build_path = build_output.path().to_path_buf();
        let build = build_output
            .finish(self.build_text.as_str())
            .map_err(|source| Error::io(build_path, source))?;
        files.push(build);

        self.state = FileState::Finished;
        tracing::info!(
            entities = self.registry.len(),
            files = files.len(),
            "finished file"
        );
        Ok(GeneratedOutput::new(files))
    }

    fn begin_feature_inner(&mut self, guard: &str) -> Result<()> {
        self.expect_state(FileState::Generating, "begin a feature")?;
        tracing::debug!(guard, depth = self.scope.depth(), "begin feature");

        let marker = open_marker(guard);
        for module in &mut self.modules {
            module.append_header(&marker)?;
            module.append_impl(&marker)?;
        }
        self.scope.push(guard);
        Ok(())
    }

    fn end_feature_inner(&mut self) -> Result<()> {
        self.expect_state(FileState::Generating, "end a feature")?;
        if self.scope.is_empty() {
            return Err(Box::new(Error::EmptyFeatureScope));
        }

        for module in &mut self.modules {
            module.append_header(CLOSE_MARKER)?;
            module.append_impl(CLOSE_MARKER)?;
        }
        let guard = self.scope.pop()?;
        tracing::debug!(guard = %guard, depth = self.scope.depth(), "end feature");
        Ok(())
    }

    fn dispatch(
        &mut self,
        kind: EntityKind,
        info: &EntityInfo,
        name: &str,
        alias: Option<&str>,
    ) -> Result<()> {
        self.expect_state(FileState::Generating, "handle an entity event")?;
        tracing::debug!(%kind, name, alias = ?alias, "dispatching entity");

        if !self.registry.register(kind, info, name, alias)? {
            return Ok(());
        }

        for emitter in &mut self.emitters {
            let mut cx = EmitContext::new(&self.registry, &mut self.modules);
            let result = match kind {
                EntityKind::Type => emitter.on_gen_type(&mut cx, info, name, alias),
                EntityKind::Struct => emitter.on_gen_struct(&mut cx, info, name, alias),
                EntityKind::Group => emitter.on_gen_group(&mut cx, info, name, alias),
                EntityKind::Enum => emitter.on_gen_enum(&mut cx, info, name, alias),
                EntityKind::Command => emitter.on_gen_cmd(&mut cx, info, name, alias),
            };
            result.map_err(|report| {
                // keep our own errors downcastable so they can still be classified
                let source: Box<dyn std::error::Error + Send + Sync> =
                    match report.downcast::<Box<Error>>() {
                        Ok(err) => err,
                        Err(report) => report.into(),
                    };
                Box::new(Error::Emitter {
                    emitter: emitter.name(),
                    kind,
                    entity: name.to_string(),
                    source,
                })
            })?;
        }

        Ok(())
    }

    fn expect_state(&self, expected: FileState, operation: &'static str) -> Result<()> {
        match self.state {
            state if state == expected => Ok(()),
            FileState::Aborted => Err(Box::new(Error::Aborted)),
            state => Err(Box::new(Error::FileState { operation, state })),
        }
    }

    /// Abort the run on error: release every output and reject later events.
    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            if self.state != FileState::Aborted {
                tracing::warn!(error = %err, "aborting generation run");
                self.state = FileState::Aborted;
                self.build_output = None;
                for module in &mut self.modules {
                    module.abandon();
                }
            }
        }
        result
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("state", &self.state)
            .field("modules", &self.modules)
            .field(
                "emitters",
                &self.emitters.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .field("scope", &self.scope)
            .field("entities", &self.registry.len())
            .finish()
    }
}
