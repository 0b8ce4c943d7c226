//! Shared type registry.
//!
//! The orchestrator updates the registry with every entity event *before*
//! notifying emitters, so an emitter handling `name` can always resolve
//! `name` itself and everything registered earlier in the stream.

mod entity;

use indexmap::IndexMap;

pub use entity::{ArrayLength, Category, EntityInfo, EntityKind, Entry, Field};

use crate::{Error, Result};

/// Append-only map from entity name to its metadata.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: IndexMap<String, Entry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_gen_type(&mut self, info: &EntityInfo, name: &str, alias: Option<&str>) -> Result<()> {
        self.register(EntityKind::Type, info, name, alias)?;
        Ok(())
    }

    pub fn on_gen_struct(
        &mut self,
        info: &EntityInfo,
        name: &str,
        alias: Option<&str>,
    ) -> Result<()> {
        self.register(EntityKind::Struct, info, name, alias)?;
        Ok(())
    }

    pub fn on_gen_group(
        &mut self,
        info: &EntityInfo,
        name: &str,
        alias: Option<&str>,
    ) -> Result<()> {
        self.register(EntityKind::Group, info, name, alias)?;
        Ok(())
    }

    pub fn on_gen_enum(&mut self, info: &EntityInfo, name: &str, alias: Option<&str>) -> Result<()> {
        self.register(EntityKind::Enum, info, name, alias)?;
        Ok(())
    }

    pub fn on_gen_cmd(&mut self, info: &EntityInfo, name: &str, alias: Option<&str>) -> Result<()> {
        self.register(EntityKind::Command, info, name, alias)?;
        Ok(())
    }

    /// Record one entity. Returns `false` when the entity was already known.
    ///
    /// Repeating an event with identical content is a no-op; repeating it
    /// with different content is rejected.
    pub fn register(
        &mut self,
        kind: EntityKind,
        info: &EntityInfo,
        name: &str,
        alias: Option<&str>,
    ) -> Result<bool> {
        let entry = Entry::new(kind, info, name, alias);

        match self.entries.get(name) {
            Some(existing) if *existing == entry => {
                tracing::debug!(%kind, name, "entity re-registered with identical content");
                Ok(false)
            }
            Some(_) => Err(Box::new(Error::DuplicateEntity {
                kind,
                name: name.to_string(),
            })),
            None => {
                self.entries.insert(name.to_string(), entry);
                Ok(true)
            }
        }
    }

    /// Get an entry without following aliases.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Follow alias links from `name` to a concrete entry.
    pub fn resolve(&self, name: &str) -> Result<&Entry> {
        let mut current = self.get(name).ok_or_else(|| {
            Box::new(Error::UnknownEntity {
                name: name.to_string(),
            })
        })?;
        let mut chain = vec![name];

        while let Some(target) = current.alias_target.as_deref() {
            if chain.contains(&target) {
                chain.push(target);
                return Err(Box::new(Error::AliasCycle {
                    name: name.to_string(),
                    chain: chain.into_iter().map(String::from).collect(),
                }));
            }
            chain.push(target);
            current = self.get(target).ok_or_else(|| {
                Box::new(Error::UnresolvedAlias {
                    alias: current.name.clone(),
                    target: target.to_string(),
                })
            })?;
        }

        Ok(current)
    }

    /// Category of the concrete entity behind `name`.
    pub fn category_of(&self, name: &str) -> Result<Category> {
        Ok(self.resolve(name)?.category)
    }

    /// Fields of the concrete entity behind `name`.
    pub fn fields_of(&self, name: &str) -> Result<&[Field]> {
        Ok(&self.resolve(name)?.fields)
    }

    /// Check that every alias registered so far resolves.
    pub fn verify_aliases(&self) -> Result<()> {
        for entry in self.iter().filter(|e| e.is_alias()) {
            self.resolve(&entry.name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent() -> EntityInfo {
        EntityInfo::structure([
            Field::new("width", "uint32_t"),
            Field::new("height", "uint32_t"),
        ])
    }

    #[test]
    fn test_register_and_query() {
        let mut registry = TypeRegistry::new();
        registry.on_gen_struct(&extent(), "VkExtent2D", None).unwrap();

        assert!(registry.contains("VkExtent2D"));
        assert_eq!(registry.category_of("VkExtent2D").unwrap(), Category::Struct);
        let fields = registry.fields_of("VkExtent2D").unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].name, "height");
    }

    #[test]
    fn test_alias_resolves_to_target_category() {
        let mut registry = TypeRegistry::new();
        registry
            .on_gen_struct(&extent(), "VkExtent2D", None)
            .unwrap();
        registry
            .on_gen_struct(&EntityInfo::new(), "VkExtent2DKHR", Some("VkExtent2D"))
            .unwrap();

        assert_eq!(registry.get("VkExtent2DKHR").unwrap().category, Category::Alias);
        assert_eq!(
            registry.category_of("VkExtent2DKHR").unwrap(),
            Category::Struct
        );
        assert_eq!(registry.resolve("VkExtent2DKHR").unwrap().name, "VkExtent2D");
    }

    #[test]
    fn test_alias_chain() {
        let mut registry = TypeRegistry::new();
        registry
            .on_gen_type(&EntityInfo::with_category(Category::Handle), "VkDevice", None)
            .unwrap();
        registry
            .on_gen_type(&EntityInfo::new(), "B", Some("VkDevice"))
            .unwrap();
        registry.on_gen_type(&EntityInfo::new(), "C", Some("B")).unwrap();

        assert_eq!(registry.category_of("C").unwrap(), Category::Handle);
    }

    #[test]
    fn test_alias_may_precede_target() {
        let mut registry = TypeRegistry::new();
        registry
            .on_gen_struct(&EntityInfo::new(), "Later", Some("Concrete"))
            .unwrap();
        assert!(registry.verify_aliases().is_err());

        registry
            .on_gen_struct(&extent(), "Concrete", None)
            .unwrap();
        registry.verify_aliases().unwrap();
    }

    #[test]
    fn test_dangling_alias() {
        let mut registry = TypeRegistry::new();
        registry
            .on_gen_struct(&EntityInfo::new(), "B", Some("Missing"))
            .unwrap();

        let err = registry.resolve("B").unwrap_err();
        assert!(matches!(
            *err,
            Error::UnresolvedAlias { ref alias, ref target } if alias == "B" && target == "Missing"
        ));
        assert!(registry.verify_aliases().is_err());
    }

    #[test]
    fn test_alias_cycle() {
        let mut registry = TypeRegistry::new();
        registry.on_gen_type(&EntityInfo::new(), "A", Some("B")).unwrap();
        registry.on_gen_type(&EntityInfo::new(), "B", Some("A")).unwrap();

        let err = registry.resolve("A").unwrap_err();
        match *err {
            Error::AliasCycle { ref chain, .. } => assert_eq!(chain, &["A", "B", "A"]),
            ref other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_alias_is_cycle() {
        let mut registry = TypeRegistry::new();
        registry.on_gen_type(&EntityInfo::new(), "A", Some("A")).unwrap();
        assert!(matches!(*registry.resolve("A").unwrap_err(), Error::AliasCycle { .. }));
    }

    #[test]
    fn test_unknown_entity() {
        let registry = TypeRegistry::new();
        assert!(matches!(
            *registry.category_of("VkNope").unwrap_err(),
            Error::UnknownEntity { .. }
        ));
    }

    #[test]
    fn test_identical_reregistration_is_noop() {
        let mut registry = TypeRegistry::new();
        let kind = EntityKind::Struct;
        assert!(registry.register(kind, &extent(), "VkExtent2D", None).unwrap());
        assert!(!registry.register(kind, &extent(), "VkExtent2D", None).unwrap());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_conflicting_reregistration_rejected() {
        let mut registry = TypeRegistry::new();
        registry.on_gen_struct(&extent(), "VkExtent2D", None).unwrap();

        let other = EntityInfo::structure([Field::new("depth", "uint32_t")]);
        let err = registry
            .on_gen_struct(&other, "VkExtent2D", None)
            .unwrap_err();

        assert!(matches!(*err, Error::DuplicateEntity { .. }));
        assert_eq!(registry.fields_of("VkExtent2D").unwrap().len(), 2);
    }

    #[test]
    fn test_iteration_follows_registration_order() {
        let mut registry = TypeRegistry::new();
        for name in ["Z", "A", "M"] {
            registry.on_gen_type(&EntityInfo::new(), name, None).unwrap();
        }
        let names: Vec<_> = registry.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
    }
}
