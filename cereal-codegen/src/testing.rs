//! Test utilities for emitters and orchestrator runs.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::{cell::RefCell, rc::Rc};

use eyre::{Result, bail, ensure};

use crate::{
    EmitContext, Emitter, EntityInfo, EntityKind, Event, Field, GenOptions, ModuleId, ModuleSpec,
};

/// Shared log of `"{emitter} {kind} {name}"` lines, in notification order.
pub type CallLog = Rc<RefCell<Vec<String>>>;

/// Emitter that records every notification and writes a marker comment to
/// both buffers of each bound module.
///
/// Every handler checks that the entity is already in the registry, so a
/// run through a `RecordingEmitter` also asserts update-before-notify.
pub struct RecordingEmitter {
    name: &'static str,
    modules: Vec<ModuleId>,
    log: CallLog,
}

impl RecordingEmitter {
    pub fn new(name: &'static str, modules: impl IntoIterator<Item = ModuleId>) -> Self {
        Self {
            name,
            modules: modules.into_iter().collect(),
            log: CallLog::default(),
        }
    }

    /// Record into a log shared with other emitters.
    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    pub fn log(&self) -> CallLog {
        Rc::clone(&self.log)
    }

    fn record(&mut self, cx: &mut EmitContext<'_>, kind: EntityKind, name: &str) -> Result<()> {
        ensure!(
            cx.registry().contains(name),
            "{name} was not registered before {} was notified",
            self.name
        );

        let marker = format!("// {} {kind} {name}\n", self.name);
        for id in &self.modules {
            cx.module(*id)?.header(&marker)?.implementation(&marker)?;
        }
        self.log
            .borrow_mut()
            .push(format!("{} {kind} {name}", self.name));
        Ok(())
    }
}

impl Emitter for RecordingEmitter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_gen_type(
        &mut self,
        cx: &mut EmitContext<'_>,
        _info: &EntityInfo,
        name: &str,
        _alias: Option<&str>,
    ) -> Result<()> {
        self.record(cx, EntityKind::Type, name)
    }

    fn on_gen_struct(
        &mut self,
        cx: &mut EmitContext<'_>,
        _info: &EntityInfo,
        name: &str,
        _alias: Option<&str>,
    ) -> Result<()> {
        self.record(cx, EntityKind::Struct, name)
    }

    fn on_gen_group(
        &mut self,
        cx: &mut EmitContext<'_>,
        _info: &EntityInfo,
        name: &str,
        _alias: Option<&str>,
    ) -> Result<()> {
        self.record(cx, EntityKind::Group, name)
    }

    fn on_gen_enum(
        &mut self,
        cx: &mut EmitContext<'_>,
        _info: &EntityInfo,
        name: &str,
        _alias: Option<&str>,
    ) -> Result<()> {
        self.record(cx, EntityKind::Enum, name)
    }

    fn on_gen_cmd(
        &mut self,
        cx: &mut EmitContext<'_>,
        _info: &EntityInfo,
        name: &str,
        _alias: Option<&str>,
    ) -> Result<()> {
        self.record(cx, EntityKind::Command, name)
    }
}

/// Emitter that fails when it sees one particular struct.
pub struct FailingEmitter {
    target: String,
}

impl FailingEmitter {
    pub fn on(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl Emitter for FailingEmitter {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn on_gen_struct(
        &mut self,
        _cx: &mut EmitContext<'_>,
        _info: &EntityInfo,
        name: &str,
        _alias: Option<&str>,
    ) -> Result<()> {
        if name == self.target {
            bail!("refusing to emit {name}");
        }
        Ok(())
    }
}

/// A module spec with one-line pre/postambles that name the buffer.
pub fn framed_module(directory: &str, name: &str) -> ModuleSpec {
    ModuleSpec::new(directory, name)
        .header_preamble(&format!("// begin {name} header\n"))
        .header_postamble(&format!("// end {name} header\n"))
        .impl_preamble(&format!("// begin {name} impl\n"))
        .impl_postamble(&format!("// end {name} impl\n"))
}

/// `VkExtent2D { uint32_t width; uint32_t height; }`
pub fn extent_2d() -> EntityInfo {
    EntityInfo::structure([
        Field::new("width", "uint32_t"),
        Field::new("height", "uint32_t"),
    ])
}

/// A complete event stream: one feature holding a struct and an alias of it.
pub fn sample_events(options: GenOptions) -> Vec<Event> {
    vec![
        Event::BeginFile(options),
        Event::BeginFeature("VK_VERSION_1_0".to_string()),
        Event::entity(EntityKind::Struct, "VkExtent2D", extent_2d()),
        Event::alias(EntityKind::Struct, "VkExtent2DKHR", "VkExtent2D"),
        Event::EndFeature,
        Event::EndFile,
    ]
}
