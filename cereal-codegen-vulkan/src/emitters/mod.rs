//! Emitters for the goldfish Vulkan modules.

mod deepcopy;
mod frontend;
mod marshaling;
mod testing;

pub use deepcopy::VulkanDeepcopy;
pub use frontend::VulkanFrontend;
pub use marshaling::VulkanMarshaling;
pub use testing::VulkanTesting;
