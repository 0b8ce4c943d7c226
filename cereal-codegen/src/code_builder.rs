//! Code builder utility for generating properly indented C++.

/// Fluent API for building C++ snippets with consistent indentation.
///
/// Emitters build one declaration or function body at a time and hand the
/// result to a [`ModuleWriter`](crate::ModuleWriter).
///
/// # Example
///
/// ```
/// use vkcereal_codegen::CodeBuilder;
///
/// let code = CodeBuilder::new()
///     .braced("void marshal_VkExtent2D(VulkanStream* vkStream, const VkExtent2D* forMarshaling)", |b| {
///         b.line("vkStream->write(&forMarshaling->width, sizeof(uint32_t));")
///     })
///     .build();
///
/// assert_eq!(
///     code,
///     "void marshal_VkExtent2D(VulkanStream* vkStream, const VkExtent2D* forMarshaling)\n{\n    vkStream->write(&forMarshaling->width, sizeof(uint32_t));\n}\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    indent_level: usize,
    indent: &'static str,
    buffer: String,
}

impl CodeBuilder {
    /// Create a builder with 4-space indentation.
    pub fn new() -> Self {
        Self::with_indent("    ")
    }

    pub fn with_indent(indent: &'static str) -> Self {
        Self {
            indent_level: 0,
            indent,
            buffer: String::new(),
        }
    }

    /// Add a line of code with current indentation.
    pub fn line(mut self, s: &str) -> Self {
        self.write_indent();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add a blank line (no indentation).
    pub fn blank(mut self) -> Self {
        self.buffer.push('\n');
        self
    }

    /// Add a `//` comment line.
    pub fn comment(self, text: &str) -> Self {
        self.line(&format!("// {text}"))
    }

    pub fn indent(mut self) -> Self {
        self.indent_level += 1;
        self
    }

    pub fn dedent(mut self) -> Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add a block with a closing line.
    pub fn block_with_close<F>(self, header: &str, close: &str, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let builder = self.line(header).indent();
        f(builder).dedent().line(close)
    }

    /// Add a function-style block with the opening brace on its own line.
    pub fn braced<F>(self, header: &str, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let builder = self.line(header).line("{").indent();
        f(builder).dedent().line("}")
    }

    /// Conditionally add content.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition { f(self) } else { self }
    }

    /// Iterate and add content for each item.
    pub fn each<T, I, F>(mut self, items: I, f: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(Self, T) -> Self,
    {
        for item in items {
            self = f(self, item);
        }
        self
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.buffer.push_str(self.indent);
        }
    }
}

impl Default for CodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
