//! What an emitter sees while handling an event.

use crate::{Error, Module, ModuleId, Result, TypeRegistry};

/// Read access to the registry and append access to the modules.
pub struct EmitContext<'a> {
    registry: &'a TypeRegistry,
    modules: &'a mut [Module],
}

impl<'a> EmitContext<'a> {
    pub(crate) fn new(registry: &'a TypeRegistry, modules: &'a mut [Module]) -> Self {
        Self { registry, modules }
    }

    pub fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    /// Get a writer for one module.
    pub fn module(&mut self, id: ModuleId) -> Result<ModuleWriter<'_>> {
        self.modules
            .get_mut(id.index())
            .map(|module| ModuleWriter { module })
            .ok_or_else(|| Box::new(Error::UnknownModule { index: id.index() }))
    }

    /// Read a module's output so far, e.g. to check what another emitter declared.
    pub fn peek(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id.index())
    }
}

/// Append-only view of a module.
pub struct ModuleWriter<'m> {
    module: &'m mut Module,
}

impl ModuleWriter<'_> {
    pub fn name(&self) -> &str {
        self.module.name()
    }

    /// Append to the header buffer.
    pub fn header(&mut self, text: &str) -> Result<&mut Self> {
        self.module.append_header(text)?;
        Ok(self)
    }

    /// Append to the implementation buffer.
    pub fn implementation(&mut self, text: &str) -> Result<&mut Self> {
        self.module.append_impl(text)?;
        Ok(self)
    }
}
