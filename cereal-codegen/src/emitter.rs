//! Emitter trait for code-emission plugins.

use eyre::Result;

use crate::{EmitContext, EntityInfo};

/// A plugin that turns schema events into generated code.
///
/// Emitters are registered with the [`ConfigBuilder`](crate::ConfigBuilder)
/// holding the [`ModuleId`](crate::ModuleId)s they write to. For every entity
/// event the orchestrator first updates the registry, then calls the matching
/// handler on each emitter in registration order.
///
/// All handlers default to doing nothing, so an emitter only implements the
/// events it cares about.
///
/// # Example
///
/// ```ignore
/// struct Declarations {
///     module: ModuleId,
/// }
///
/// impl Emitter for Declarations {
///     fn name(&self) -> &'static str { "declarations" }
///
///     fn on_gen_struct(
///         &mut self,
///         cx: &mut EmitContext<'_>,
///         _info: &EntityInfo,
///         name: &str,
///         _alias: Option<&str>,
///     ) -> Result<()> {
///         cx.module(self.module)?.header(&format!("struct {name};\n"))?;
///         Ok(())
///     }
/// }
/// ```
pub trait Emitter {
    /// The name of this emitter (for diagnostics and logging).
    fn name(&self) -> &'static str;

    /// Called for basic types, handles, bitmasks and function pointers.
    ///
    /// # Errors
    ///
    /// Return an error to abort the generation run.
    #[allow(unused_variables)]
    fn on_gen_type(
        &mut self,
        cx: &mut EmitContext<'_>,
        info: &EntityInfo,
        name: &str,
        alias: Option<&str>,
    ) -> Result<()> {
        Ok(())
    }

    /// Called for structs and unions.
    #[allow(unused_variables)]
    fn on_gen_struct(
        &mut self,
        cx: &mut EmitContext<'_>,
        info: &EntityInfo,
        name: &str,
        alias: Option<&str>,
    ) -> Result<()> {
        Ok(())
    }

    /// Called for enum and bitmask groups.
    #[allow(unused_variables)]
    fn on_gen_group(
        &mut self,
        cx: &mut EmitContext<'_>,
        info: &EntityInfo,
        name: &str,
        alias: Option<&str>,
    ) -> Result<()> {
        Ok(())
    }

    /// Called for standalone enum constants.
    #[allow(unused_variables)]
    fn on_gen_enum(
        &mut self,
        cx: &mut EmitContext<'_>,
        info: &EntityInfo,
        name: &str,
        alias: Option<&str>,
    ) -> Result<()> {
        Ok(())
    }

    /// Called for commands.
    #[allow(unused_variables)]
    fn on_gen_cmd(
        &mut self,
        cx: &mut EmitContext<'_>,
        info: &EntityInfo,
        name: &str,
        alias: Option<&str>,
    ) -> Result<()> {
        Ok(())
    }
}
