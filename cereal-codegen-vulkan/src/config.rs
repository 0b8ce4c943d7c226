//! Module layout of the generated goldfish sources.

use vkcereal_codegen::{BuildDescription, GeneratorConfig, ModuleSpec};
use vkcereal_core::autogenerated_mk_header;

use crate::{VulkanDeepcopy, VulkanFrontend, VulkanMarshaling, VulkanTesting};

pub const MARSHALING: &str = "goldfish_vk_marshaling";
pub const FRONTEND: &str = "goldfish_vk_frontend";
pub const TESTING: &str = "goldfish_vk_testing";
pub const DEEPCOPY: &str = "goldfish_vk_deepcopy";

const NAMESPACE_END: &str = "\n} // namespace goldfish_vk\n";

/// The default generator: marshaling, frontend, testing and deepcopy
/// modules, in that order, each with its emitter.
///
/// `banner` is the sanitized command line recorded in every file.
pub fn cereal_config(banner: &str) -> GeneratorConfig {
    let mut builder = GeneratorConfig::builder();

    let marshaling = builder.module(marshaling_module(banner));
    let frontend = builder.module(frontend_module(banner));
    builder.emitter(VulkanMarshaling::new(marshaling));
    builder.emitter(VulkanFrontend::new(frontend, marshaling));

    let testing = builder.module(testing_module(banner));
    builder.emitter(VulkanTesting::new(testing));

    let deepcopy = builder.module(deepcopy_module(banner));
    builder.emitter(VulkanDeepcopy::new(deepcopy));

    builder.build_description(android_mk(banner));
    let config = builder.build();
    tracing::debug!(
        modules = config.modules().len(),
        emitters = ?config.emitter_names(),
        "configured goldfish generator"
    );
    config
}

fn marshaling_module(banner: &str) -> ModuleSpec {
    ModuleSpec::new("common", MARSHALING)
        .with_banner(banner)
        .header_preamble(
            "
#pragma once

#include <vulkan.h>

namespace goldfish_vk {

class VulkanStream;

",
        )
        .header_postamble(NAMESPACE_END)
        .impl_preamble(
            "
#include \"goldfish_vk_marshaling.h\"

#include \"VulkanStream.h\"

#include \"android/base/files/StreamSerializing.h\"

namespace goldfish_vk {

",
        )
        .impl_postamble(NAMESPACE_END)
}

fn frontend_module(banner: &str) -> ModuleSpec {
    ModuleSpec::new("guest", FRONTEND)
        .with_banner(banner)
        .header_preamble(
            "
#pragma once

#include <vulkan.h>

namespace goldfish_vk {

class VulkanStream;

",
        )
        .header_postamble(NAMESPACE_END)
        .impl_preamble(
            "
#include \"guest/goldfish_vk_frontend.h\"

#include \"common/goldfish_vk_marshaling.h\"

#include \"VulkanStream.h\"

namespace goldfish_vk {

",
        )
        .impl_postamble(NAMESPACE_END)
}

fn testing_module(banner: &str) -> ModuleSpec {
    ModuleSpec::new("common", TESTING)
        .with_banner(banner)
        .header_preamble(
            "
#pragma once

#include <vulkan.h>

#include <functional>

namespace goldfish_vk {

using OnFailCompareFunc = std::function<void(const char*)>;

",
        )
        .header_postamble(NAMESPACE_END)
        .impl_preamble(
            "
#include \"goldfish_vk_testing.h\"

#include <string.h>

namespace goldfish_vk {

",
        )
        .impl_postamble(NAMESPACE_END)
}

fn deepcopy_module(banner: &str) -> ModuleSpec {
    ModuleSpec::new("common", DEEPCOPY)
        .with_banner(banner)
        .header_preamble(
            "
#pragma once

#include <vulkan.h>

#include \"android/base/Pool.h\"

using android::base::Pool;

namespace goldfish_vk {

",
        )
        .header_postamble(NAMESPACE_END)
        .impl_preamble(
            "
#include \"goldfish_vk_deepcopy.h\"

#include <string.h>

namespace goldfish_vk {

",
        )
        .impl_postamble(NAMESPACE_END)
}

/// The emugl static-library makefile that builds every module.
pub fn android_mk(banner: &str) -> BuildDescription {
    let header = format!(
        "{}
LOCAL_PATH := $(call my-dir)

# For Vulkan libraries

cereal_C_INCLUDES := \\
    $(LOCAL_PATH) \\
    $(LOCAL_PATH)/../ \\
    $(EMUGL_PATH)/host/include/vulkan \\

cereal_STATIC_LIBRARIES := \\
    android-emu \\
    android-emu-base \\
",
        autogenerated_mk_header(banner)
    );

    BuildDescription::new("Android.mk")
        .header(&header)
        .body(
            "
$(call emugl-begin-static-library,lib$(BUILD_TARGET_SUFFIX)OpenglRender_vulkan_cereal)

LOCAL_C_INCLUDES += $(cereal_C_INCLUDES)

LOCAL_STATIC_LIBRARIES += $(cereal_STATIC_LIBRARIES)

LOCAL_SRC_FILES := \\
",
        )
        .footer(
            "
$(call emugl-end-module)
",
        )
}
