//! `deepcopy_X` for every struct, allocating from a `Pool`.

use eyre::Result;
use vkcereal_codegen::{CodeBuilder, EmitContext, Emitter, EntityInfo, Field, ModuleId, TypeRegistry};

use crate::field::{Shape, alias_define, byte_size};

pub struct VulkanDeepcopy {
    module: ModuleId,
}

impl VulkanDeepcopy {
    pub fn new(module: ModuleId) -> Self {
        Self { module }
    }
}

impl Emitter for VulkanDeepcopy {
    fn name(&self) -> &'static str {
        "deepcopy"
    }

    fn on_gen_struct(
        &mut self,
        cx: &mut EmitContext<'_>,
        info: &EntityInfo,
        name: &str,
        alias: Option<&str>,
    ) -> Result<()> {
        if let Some(target) = alias {
            cx.module(self.module)?
                .header(&alias_define("deepcopy_", name, target))?;
            return Ok(());
        }

        let signature =
            format!("void deepcopy_{name}(\n    Pool* pool,\n    const {name}* from,\n    {name}* to)");
        let registry = cx.registry();
        let body = CodeBuilder::new()
            .braced(&signature, |b| {
                b.line("(void)pool;")
                    .line("*to = *from;")
                    .each(&info.fields, |b, field| copy(b, registry, field))
            })
            .blank()
            .build();

        cx.module(self.module)?
            .header(&format!("{signature};\n\n"))?
            .implementation(&body)?;
        Ok(())
    }
}

/// Deep part of the copy; plain values and arrays are already covered by
/// the initial `*to = *from`.
fn copy(b: CodeBuilder, registry: &TypeRegistry, field: &Field) -> CodeBuilder {
    let ty = &field.type_name;
    let f = &field.name;
    match Shape::of(registry, field) {
        Shape::Value | Shape::Array => b,
        Shape::Aggregate => b.line(&format!("deepcopy_{ty}(pool, &from->{f}, ({ty}*)(&to->{f}));")),
        Shape::AggregatePointer => b
            .line(&format!("to->{f} = nullptr;"))
            .line(&format!("if (from->{f})"))
            .line("{")
            .indent()
            .line(&format!("to->{f} = ({ty}*)pool->alloc(sizeof(const {ty}));"))
            .line(&format!("deepcopy_{ty}(pool, from->{f}, ({ty}*)(to->{f}));"))
            .dedent()
            .line("}"),
        // void* payloads have no size of their own
        Shape::Pointer if ty == "void" => b,
        Shape::Pointer => b
            .line(&format!("to->{f} = nullptr;"))
            .line(&format!("if (from->{f})"))
            .line("{")
            .indent()
            .line(&format!(
                "to->{f} = ({ty}*)pool->dupArray(from->{f}, {});",
                byte_size(field)
            ))
            .dedent()
            .line("}"),
    }
}
