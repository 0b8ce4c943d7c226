//! Entity descriptions carried by schema events.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which of the five schema events introduced an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Type,
    Struct,
    Group,
    Enum,
    Command,
}

impl EntityKind {
    /// Category recorded when the event does not name one.
    pub fn default_category(&self) -> Category {
        match self {
            EntityKind::Type => Category::Basic,
            EntityKind::Struct => Category::Struct,
            EntityKind::Group => Category::Enum,
            EntityKind::Enum => Category::Constant,
            EntityKind::Command => Category::Command,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Type => "type",
            EntityKind::Struct => "struct",
            EntityKind::Group => "group",
            EntityKind::Enum => "enum",
            EntityKind::Command => "command",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry category of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Basic,
    Struct,
    Union,
    Handle,
    Enum,
    Bitmask,
    FunctionPointer,
    Alias,
    /// An API entry point; its fields are the parameters.
    Command,
    /// A named constant introduced by an enum event.
    Constant,
}

impl Category {
    /// Structs and unions, the categories with member fields.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Category::Struct | Category::Union)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Basic => "basic",
            Category::Struct => "struct",
            Category::Union => "union",
            Category::Handle => "handle",
            Category::Enum => "enum",
            Category::Bitmask => "bitmask",
            Category::FunctionPointer => "function-pointer",
            Category::Alias => "alias",
            Category::Command => "command",
            Category::Constant => "constant",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Length of a fixed-size array member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArrayLength {
    /// A literal element count, e.g. `[4]`.
    Fixed(u64),
    /// A named constant, e.g. `[VK_UUID_SIZE]`.
    Symbolic(String),
}

impl fmt::Display for ArrayLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayLength::Fixed(n) => write!(f, "{}", n),
            ArrayLength::Symbolic(s) => f.write_str(s),
        }
    }
}

/// A struct member or command parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub pointer_depth: u8,
    #[serde(default)]
    pub array_length: Option<ArrayLength>,
    #[serde(default, rename = "const")]
    pub is_const: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            pointer_depth: 0,
            array_length: None,
            is_const: false,
        }
    }

    /// Add one level of indirection.
    pub fn pointer(mut self) -> Self {
        self.pointer_depth += 1;
        self
    }

    pub fn array(mut self, length: ArrayLength) -> Self {
        self.array_length = Some(length);
        self
    }

    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn is_pointer(&self) -> bool {
        self.pointer_depth > 0
    }
}

/// What a schema event says about an entity.
///
/// The orchestrator never looks inside; it is stored by the registry and
/// handed unchanged to every emitter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityInfo {
    /// Overrides the event kind's default category.
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Return type of a command.
    #[serde(default, rename = "return")]
    pub return_type: Option<String>,
    /// Literal value of a constant.
    #[serde(default)]
    pub value: Option<String>,
}

impl EntityInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(category: Category) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn structure(fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            category: Some(Category::Struct),
            fields: fields.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn command(
        return_type: impl Into<String>,
        params: impl IntoIterator<Item = Field>,
    ) -> Self {
        Self {
            category: Some(Category::Command),
            fields: params.into_iter().collect(),
            return_type: Some(return_type.into()),
            value: None,
        }
    }

    pub fn constant(value: impl Into<String>) -> Self {
        Self {
            category: Some(Category::Constant),
            value: Some(value.into()),
            ..Self::default()
        }
    }
}

/// A registered entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntityKind,
    pub category: Category,
    pub alias_target: Option<String>,
    pub fields: Vec<Field>,
    pub return_type: Option<String>,
    pub value: Option<String>,
}

impl Entry {
    pub(crate) fn new(kind: EntityKind, info: &EntityInfo, name: &str, alias: Option<&str>) -> Self {
        match alias {
            Some(target) => Self {
                name: name.to_string(),
                kind,
                category: Category::Alias,
                alias_target: Some(target.to_string()),
                fields: Vec::new(),
                return_type: None,
                value: None,
            },
            None => Self {
                name: name.to_string(),
                kind,
                category: info.category.unwrap_or_else(|| kind.default_category()),
                alias_target: None,
                fields: info.fields.clone(),
                return_type: info.return_type.clone(),
                value: info.value.clone(),
            },
        }
    }

    pub fn is_alias(&self) -> bool {
        self.alias_target.is_some()
    }
}
