//! Fixed notices placed at the top of every generated file.

/// License notice heading every generated C++ file.
pub const COPYRIGHT_HEADER: &str = "// Copyright (C) The vkcereal Authors
//
// Licensed under the Apache License, Version 2.0 (the \"License\");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an \"AS IS\" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
";

/// "Do not edit" block for a generated module.
///
/// `description` is usually `(header) generated by <banner>`.
pub fn autogenerated_header(module: &str, description: &str) -> String {
    format!(
        "
// Autogenerated module {module}
// {description}
// Please do not modify directly;
// re-run vkcereal generate, or directly by invoking:
// vkcereal generate --schema <SCHEMA_FILE> --output <OUTPUT_DIR>
"
    )
}

/// "Do not edit" block for the generated makefile fragment.
pub fn autogenerated_mk_header(banner: &str) -> String {
    format!(
        "
# Autogenerated makefile
# {banner}
# Please do not modify directly;
# re-run vkcereal generate, or directly by invoking:
# vkcereal generate --schema <SCHEMA_FILE> --output <OUTPUT_DIR>
"
    )
}
