//! One-time wiring of modules and emitters.

use std::fmt;

use crate::{BuildDescription, Emitter, ModuleId, ModuleSpec};

/// Modules, emitters and build description for one generator.
///
/// Built once with [`GeneratorConfig::builder`] before any event is handled,
/// then handed to the [`Orchestrator`](crate::Orchestrator), which never
/// changes it.
pub struct GeneratorConfig {
    pub(crate) modules: Vec<ModuleSpec>,
    pub(crate) emitters: Vec<Box<dyn Emitter>>,
    pub(crate) build: BuildDescription,
}

impl GeneratorConfig {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Module specs, in registration order.
    pub fn modules(&self) -> &[ModuleSpec] {
        &self.modules
    }

    /// Emitter names, in registration order.
    pub fn emitter_names(&self) -> Vec<&'static str> {
        self.emitters.iter().map(|e| e.name()).collect()
    }

    pub fn build_description(&self) -> &BuildDescription {
        &self.build
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("modules", &self.modules)
            .field("emitters", &self.emitter_names())
            .field("build", &self.build)
            .finish()
    }
}

/// Builder for [`GeneratorConfig`].
///
/// # Example
///
/// ```ignore
/// let mut builder = GeneratorConfig::builder();
/// let marshaling = builder.module(ModuleSpec::new("common", "goldfish_vk_marshaling"));
/// builder.emitter(VulkanMarshaling::new(marshaling));
/// let config = builder.build();
/// ```
#[derive(Default)]
pub struct ConfigBuilder {
    modules: Vec<ModuleSpec>,
    emitters: Vec<Box<dyn Emitter>>,
    build: Option<BuildDescription>,
}

impl ConfigBuilder {
    /// Register a module and get the handle emitters use to write to it.
    pub fn module(&mut self, spec: ModuleSpec) -> ModuleId {
        self.modules.push(spec);
        ModuleId(self.modules.len() - 1)
    }

    /// Register an emitter. Emitters are notified in registration order.
    pub fn emitter(&mut self, emitter: impl Emitter + 'static) -> &mut Self {
        self.emitters.push(Box::new(emitter));
        self
    }

    pub fn build_description(&mut self, build: BuildDescription) -> &mut Self {
        self.build = Some(build);
        self
    }

    pub fn build(self) -> GeneratorConfig {
        GeneratorConfig {
            modules: self.modules,
            emitters: self.emitters,
            build: self.build.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl Emitter for Named {
        fn name(&self) -> &'static str {
            self.0
        }
    }

    #[test]
    fn test_module_ids_follow_registration() {
        let mut builder = GeneratorConfig::builder();
        let a = builder.module(ModuleSpec::new("common", "a"));
        let b = builder.module(ModuleSpec::new("guest", "b"));

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);

        let config = builder.build();
        assert_eq!(config.modules()[1].name, "b");
    }

    #[test]
    fn test_emitters_keep_order() {
        let mut builder = GeneratorConfig::builder();
        builder.emitter(Named("first")).emitter(Named("second"));

        let config = builder.build();
        assert_eq!(config.emitter_names(), vec!["first", "second"]);
        assert_eq!(config.build_description().file_name, "Android.mk");
    }
}
