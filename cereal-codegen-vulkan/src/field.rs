//! C declarations and registry-aware classification of struct members and
//! command parameters.

use vkcereal_codegen::{Field, TypeRegistry};

/// How a member has to be handled by code that walks a struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Plain value copied by size.
    Value,
    /// Fixed-size array of plain values.
    Array,
    /// Struct or union held by value.
    Aggregate,
    /// Pointer to a struct or union.
    AggregatePointer,
    /// Pointer to anything else.
    Pointer,
}

impl Shape {
    /// Classify `field` by looking its type up in the registry.
    ///
    /// Types the registry does not know (`uint32_t`, `float`, ...) and aliases
    /// whose target is still missing count as plain values.
    pub fn of(registry: &TypeRegistry, field: &Field) -> Self {
        let aggregate = registry
            .category_of(&field.type_name)
            .map(|category| category.is_aggregate())
            .unwrap_or(false);

        match (aggregate, field.is_pointer(), field.array_length.is_some()) {
            (true, true, _) => Shape::AggregatePointer,
            (true, false, _) => Shape::Aggregate,
            (false, true, _) => Shape::Pointer,
            (false, false, true) => Shape::Array,
            (false, false, false) => Shape::Value,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, Shape::Aggregate | Shape::AggregatePointer)
    }
}

/// The C type of a field, e.g. `const VkAllocationCallbacks*`.
pub fn c_type(field: &Field) -> String {
    let mut ty = String::new();
    if field.is_const {
        ty.push_str("const ");
    }
    ty.push_str(&field.type_name);
    for _ in 0..field.pointer_depth {
        ty.push('*');
    }
    ty
}

/// A full C declaration, e.g. `uint8_t pipelineCacheUUID[VK_UUID_SIZE]`.
pub fn c_decl(field: &Field) -> String {
    match &field.array_length {
        Some(length) => format!("{} {}[{}]", c_type(field), field.name, length),
        None => format!("{} {}", c_type(field), field.name),
    }
}

/// Byte size of the data a field holds or points at.
pub fn byte_size(field: &Field) -> String {
    match &field.array_length {
        Some(length) => format!("{} * sizeof({})", length, field.type_name),
        None => format!("sizeof({})", field.type_name),
    }
}

/// `#define {prefix}{name} {prefix}{target}` for an aliased entity.
pub fn alias_define(prefix: &str, name: &str, target: &str) -> String {
    format!("#define {prefix}{name} {prefix}{target}\n\n")
}
