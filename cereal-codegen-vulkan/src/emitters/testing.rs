//! `checkEqual_X` comparison helpers for every struct.

use eyre::Result;
use vkcereal_codegen::{CodeBuilder, EmitContext, Emitter, EntityInfo, Field, ModuleId, TypeRegistry};

use crate::field::{Shape, alias_define, byte_size};

pub struct VulkanTesting {
    module: ModuleId,
}

impl VulkanTesting {
    pub fn new(module: ModuleId) -> Self {
        Self { module }
    }
}

impl Emitter for VulkanTesting {
    fn name(&self) -> &'static str {
        "testing"
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
                .header(&alias_define("checkEqual_", name, target))?;
            return Ok(());
        }

        let signature = format!(
            "void checkEqual_{name}(\n    const {name}* a,\n    const {name}* b,\n    OnFailCompareFunc onFail)"
        );
        let body = CodeBuilder::new()
            .braced(&signature, |b| {
                b.each(&info.fields, |b, field| compare(b, cx.registry(), field))
            })
            .blank()
            .build();

        cx.module(self.module)?
            .header(&format!("{signature};\n\n"))?
            .implementation(&body)?;
        Ok(())
    }
}

fn compare(b: CodeBuilder, registry: &TypeRegistry, field: &Field) -> CodeBuilder {
    let ty = &field.type_name;
    let f = &field.name;
    match Shape::of(registry, field) {
        Shape::Aggregate => b.line(&format!("checkEqual_{ty}(&a->{f}, &b->{f}, onFail);")),
        Shape::AggregatePointer => b
            .line(&format!("if ((a->{f}) && (b->{f}))"))
            .line("{")
            .indent()
            .line(&format!("checkEqual_{ty}(a->{f}, b->{f}, onFail);"))
            .dedent()
            .line("}"),
        Shape::Array => b.line(&format!(
            "if (memcmp(a->{f}, b->{f}, {})) {{ onFail(\"a->{f} (Error: Unequal static array)\"); }};",
            byte_size(field)
        )),
        Shape::Pointer => b.line(&format!(
            "if (!((!(a->{f}) && !(b->{f})) || ((a->{f}) && (b->{f})))) {{ onFail(\"a->{f} (Error: Mismatch in optional field)\"); }};"
        )),
        Shape::Value => b.line(&format!(
            "if (!((a->{f}) == (b->{f}))) {{ onFail(\"a->{f} (Error: Value not equal)\"); }};"
        )),
    }
}
