//! Aggregate build-description (makefile fragment) listing every module.

use crate::BuildFragment;

/// Template for the build description written next to the modules.
///
/// Rendered once per file as `header`, `body`, one [`BuildFragment`] line per
/// module in registration order, then `footer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDescription {
    pub file_name: String,
    pub header: String,
    pub body: String,
    pub footer: String,
}

impl BuildDescription {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            header: String::new(),
            body: String::new(),
            footer: String::new(),
        }
    }

    pub fn header(mut self, text: &str) -> Self {
        self.header.push_str(text);
        self
    }

    pub fn body(mut self, text: &str) -> Self {
        self.body.push_str(text);
        self
    }

    pub fn footer(mut self, text: &str) -> Self {
        self.footer.push_str(text);
        self
    }

    pub fn render(&self, fragments: impl IntoIterator<Item = BuildFragment>) -> String {
        let mut out = String::new();
        out.push_str(&self.header);
        out.push_str(&self.body);
        for fragment in fragments {
            out.push_str(&fragment.to_string());
        }
        out.push_str(&self.footer);
        out
    }
}

impl Default for BuildDescription {
    fn default() -> Self {
        Self::new("Android.mk")
    }
}
