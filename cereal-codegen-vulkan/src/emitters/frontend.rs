//! Guest-side command entry points.

use eyre::{Result, ensure};
use vkcereal_codegen::{
    CodeBuilder, EmitContext, Emitter, EntityInfo, Field, ModuleId, TypeRegistry,
};

use crate::field::{Shape, alias_define, byte_size, c_decl};

/// Emits `goldfish_frontend_X` for every command, encoding its parameters
/// with the functions the marshaling module declares.
pub struct VulkanFrontend {
    module: ModuleId,
    marshaling: ModuleId,
}

impl VulkanFrontend {
    pub fn new(module: ModuleId, marshaling: ModuleId) -> Self {
        Self { module, marshaling }
    }
}

impl Emitter for VulkanFrontend {
    fn name(&self) -> &'static str {
        "frontend"
    }

    fn on_gen_cmd(
        &mut self,
        cx: &mut EmitContext<'_>,
        info: &EntityInfo,
        name: &str,
        alias: Option<&str>,
    ) -> Result<()> {
        if let Some(target) = alias {
            cx.module(self.module)?
                .header(&alias_define("goldfish_frontend_", name, target))?;
            return Ok(());
        }

        for field in &info.fields {
            if !Shape::of(cx.registry(), field).is_aggregate() {
                continue;
            }
            let declaration = format!("void marshal_{}(\n", field.type_name);
            let declared = cx
                .peek(self.marshaling)
                .is_some_and(|m| m.header().contains(&declaration));
            ensure!(
                declared,
                "{name} passes {} but marshal_{} was never declared",
                field.name,
                field.type_name
            );
        }

        let signature = signature(info, name);
        let body = body(cx.registry(), info, &signature);
        cx.module(self.module)?
            .header(&format!("{signature};\n\n"))?
            .implementation(&body)?;
        Ok(())
    }
}

fn return_type(info: &EntityInfo) -> &str {
    info.return_type.as_deref().unwrap_or("void")
}

fn signature(info: &EntityInfo, name: &str) -> String {
    let params: Vec<String> = std::iter::once("VulkanStream* vkStream".to_string())
        .chain(info.fields.iter().map(c_decl))
        .collect();
    format!(
        "{} goldfish_frontend_{}(\n    {})",
        return_type(info),
        name,
        params.join(",\n    ")
    )
}

fn encode(b: CodeBuilder, registry: &TypeRegistry, field: &Field) -> CodeBuilder {
    let ty = &field.type_name;
    let param = &field.name;
    match Shape::of(registry, field) {
        Shape::AggregatePointer => b
            .line(&format!("if ({param})"))
            .line("{")
            .indent()
            .line(&format!("marshal_{ty}(vkStream, (const {ty}*)({param}));"))
            .dedent()
            .line("}"),
        Shape::Aggregate => b.line(&format!("marshal_{ty}(vkStream, (const {ty}*)(&{param}));")),
        Shape::Pointer | Shape::Array => b.line(&format!(
            "vkStream->write((const {ty}*){param}, {});",
            byte_size(field)
        )),
        Shape::Value => b.line(&format!(
            "vkStream->write((const {ty}*)&{param}, {});",
            byte_size(field)
        )),
    }
}

fn body(registry: &TypeRegistry, info: &EntityInfo, signature: &str) -> String {
    let ret = return_type(info);
    CodeBuilder::new()
        .braced(signature, |b| {
            b.each(&info.fields, |b, field| encode(b, registry, field))
                .when(ret != "void", |b| {
                    b.line(&format!("{ret} returnValue = ({ret})0;"))
                        .line(&format!(
                            "vkStream->read(&returnValue, sizeof({ret}));"
                        ))
                        .line("return returnValue;")
                })
        })
        .blank()
        .build()
}

#[cfg(test)]
mod tests {
    use vkcereal_codegen::{Field, TypeRegistry};

    use super::*;

    fn create_instance() -> EntityInfo {
        EntityInfo::command(
            "VkResult",
            [
                Field::new("pCreateInfo", "VkInstanceCreateInfo")
                    .constant()
                    .pointer(),
                Field::new("pInstance", "VkInstance").pointer(),
            ],
        )
    }

    #[test]
    fn test_signature_lists_parameters() {
        insta::assert_snapshot!(signature(&create_instance(), "vkCreateInstance"), @r"
        VkResult goldfish_frontend_vkCreateInstance(
            VulkanStream* vkStream,
            const VkInstanceCreateInfo* pCreateInfo,
            VkInstance* pInstance)
        ");
    }

    #[test]
    fn test_body_marshals_struct_parameters() {
        let mut registry = TypeRegistry::new();
        registry
            .on_gen_struct(&EntityInfo::structure(Vec::<Field>::new()), "VkInstanceCreateInfo", None)
            .unwrap();
        let info = create_instance();

        let body = body(&registry, &info, &signature(&info, "vkCreateInstance"));
        assert!(body.contains(
            "        marshal_VkInstanceCreateInfo(vkStream, (const VkInstanceCreateInfo*)(pCreateInfo));\n"
        ));
        assert!(body.contains("    vkStream->write((const VkInstance*)pInstance, sizeof(VkInstance));\n"));
        assert!(body.contains("    return returnValue;\n"));
    }
}
