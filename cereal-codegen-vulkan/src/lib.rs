//! Goldfish Vulkan emitters and the default vkcereal wiring.
//!
//! [`cereal_config`] registers the four goldfish modules, the emitters that
//! fill them and the `Android.mk` fragment that builds them.

mod config;
mod field;

pub mod emitters;

pub use config::{DEEPCOPY, FRONTEND, MARSHALING, TESTING, android_mk, cereal_config};
pub use emitters::{VulkanDeepcopy, VulkanFrontend, VulkanMarshaling, VulkanTesting};
pub use field::{Shape, byte_size, c_decl, c_type};
