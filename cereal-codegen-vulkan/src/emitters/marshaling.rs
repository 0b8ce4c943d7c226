//! `marshal_X` / `unmarshal_X` for every struct.

use eyre::Result;
use vkcereal_codegen::{CodeBuilder, EmitContext, Emitter, EntityInfo, ModuleId, TypeRegistry};

use crate::field::{Shape, alias_define, byte_size};

/// Streams structs through a `VulkanStream`.
pub struct VulkanMarshaling {
    module: ModuleId,
}

impl VulkanMarshaling {
    pub fn new(module: ModuleId) -> Self {
        Self { module }
    }
}

impl Emitter for VulkanMarshaling {
    fn name(&self) -> &'static str {
        "marshaling"
    }

    fn on_gen_struct(
        &mut self,
        cx: &mut EmitContext<'_>,
        info: &EntityInfo,
        name: &str,
        alias: Option<&str>,
    ) -> Result<()> {
        if let Some(target) = alias {
            let defines = format!(
                "{}{}",
                alias_define("marshal_", name, target),
                alias_define("unmarshal_", name, target)
            );
            cx.module(self.module)?.header(&defines)?;
            return Ok(());
        }

        let header = format!(
            "void marshal_{name}(\n    VulkanStream* vkStream,\n    const {name}* forMarshaling);\n\n\
             void unmarshal_{name}(\n    VulkanStream* vkStream,\n    {name}* forUnmarshaling);\n\n"
        );
        let implementation = format!(
            "{}{}",
            marshal_body(cx.registry(), info, name),
            unmarshal_body(cx.registry(), info, name)
        );

        cx.module(self.module)?
            .header(&header)?
            .implementation(&implementation)?;
        Ok(())
    }
}

fn marshal_body(registry: &TypeRegistry, info: &EntityInfo, name: &str) -> String {
    CodeBuilder::new()
        .braced(
            &format!(
                "void marshal_{name}(\n    VulkanStream* vkStream,\n    const {name}* forMarshaling)"
            ),
            |b| {
                b.each(&info.fields, |b, field| {
                    let ty = &field.type_name;
                    let member = format!("forMarshaling->{}", field.name);
                    match Shape::of(registry, field) {
                        Shape::Aggregate => {
                            b.line(&format!("marshal_{ty}(vkStream, (const {ty}*)(&{member}));"))
                        }
                        Shape::AggregatePointer => {
                            b.line(&format!("marshal_{ty}(vkStream, (const {ty}*)({member}));"))
                        }
                        Shape::Pointer | Shape::Array => b.line(&format!(
                            "vkStream->write((const {ty}*){member}, {});",
                            byte_size(field)
                        )),
                        Shape::Value => b.line(&format!(
                            "vkStream->write((const {ty}*)&{member}, {});",
                            byte_size(field)
                        )),
                    }
                })
            },
        )
        .blank()
        .build()
}

fn unmarshal_body(registry: &TypeRegistry, info: &EntityInfo, name: &str) -> String {
    CodeBuilder::new()
        .braced(
            &format!("void unmarshal_{name}(\n    VulkanStream* vkStream,\n    {name}* forUnmarshaling)"),
            |b| {
                b.each(&info.fields, |b, field| {
                    let ty = &field.type_name;
                    let member = format!("forUnmarshaling->{}", field.name);
                    match Shape::of(registry, field) {
                        Shape::Aggregate => {
                            b.line(&format!("unmarshal_{ty}(vkStream, ({ty}*)(&{member}));"))
                        }
                        Shape::AggregatePointer => {
                            b.line(&format!("unmarshal_{ty}(vkStream, ({ty}*)({member}));"))
                        }
                        Shape::Pointer | Shape::Array => b.line(&format!(
                            "vkStream->read(({ty}*){member}, {});",
                            byte_size(field)
                        )),
                        Shape::Value => b.line(&format!(
                            "vkStream->read(({ty}*)&{member}, {});",
                            byte_size(field)
                        )),
                    }
                })
            },
        )
        .blank()
        .build()
}
