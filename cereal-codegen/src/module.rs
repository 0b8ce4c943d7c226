//! Paired header/implementation output buffers.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use vkcereal_core::{COPYRIGHT_HEADER, PendingFile, StagedFile, autogenerated_header};

use crate::{Error, Result};

/// Handle to a configured module, used by emitters to address output.
///
/// Indices follow registration order in the
/// [`ConfigBuilder`](crate::ConfigBuilder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub(crate) usize);

impl ModuleId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Lifecycle of a [`Module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleState {
    Unopened,
    Open,
    Closed,
}

impl fmt::Display for ModuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleState::Unopened => write!(f, "unopened"),
            ModuleState::Open => write!(f, "open"),
            ModuleState::Closed => write!(f, "closed"),
        }
    }
}

/// Static description of a module: where it goes and how it is framed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpec {
    pub directory: String,
    pub name: String,
    pub header_extension: String,
    pub impl_extension: String,
    pub header_preamble: String,
    pub header_postamble: String,
    pub impl_preamble: String,
    pub impl_postamble: String,
}

impl ModuleSpec {
    pub fn new(directory: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            name: name.into(),
            header_extension: "h".to_string(),
            impl_extension: "cpp".to_string(),
            header_preamble: String::new(),
            header_postamble: String::new(),
            impl_preamble: String::new(),
            impl_postamble: String::new(),
        }
    }

    /// Start both preambles with the license notice and a provenance banner.
    pub fn with_banner(mut self, banner: &str) -> Self {
        let header = autogenerated_header(
            &self.name,
            &format!("(header) generated by {}", banner),
        );
        let implementation =
            autogenerated_header(&self.name, &format!("(impl) generated by {}", banner));

        self.header_preamble = format!("{COPYRIGHT_HEADER}{header}{}", self.header_preamble);
        self.impl_preamble = format!("{COPYRIGHT_HEADER}{implementation}{}", self.impl_preamble);
        self
    }

    pub fn header_preamble(mut self, text: &str) -> Self {
        self.header_preamble.push_str(text);
        self
    }

    pub fn header_postamble(mut self, text: &str) -> Self {
        self.header_postamble.push_str(text);
        self
    }

    pub fn impl_preamble(mut self, text: &str) -> Self {
        self.impl_preamble.push_str(text);
        self
    }

    pub fn impl_postamble(mut self, text: &str) -> Self {
        self.impl_postamble.push_str(text);
        self
    }

    pub fn extensions(mut self, header: &str, implementation: &str) -> Self {
        self.header_extension = header.to_string();
        self.impl_extension = implementation.to_string();
        self
    }

    /// Header path relative to the output directory, with `/` separators.
    pub fn header_path(&self) -> String {
        self.relative(&self.header_extension)
    }

    /// Implementation path relative to the output directory, with `/` separators.
    pub fn impl_path(&self) -> String {
        self.relative(&self.impl_extension)
    }

    fn relative(&self, extension: &str) -> String {
        if self.directory.is_empty() {
            format!("{}.{}", self.name, extension)
        } else {
            format!("{}/{}.{}", self.directory, self.name, extension)
        }
    }
}

/// A module's output paths, as listed in the build description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFragment {
    pub header: String,
    pub source: String,
}

impl fmt::Display for BuildFragment {
    /// Render as a makefile source-list continuation line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    {} \\", self.source)
    }
}

#[derive(Debug)]
struct Outputs {
    header: PendingFile,
    implementation: PendingFile,
}

/// A named pair of append-only text buffers and their output files.
#[derive(Debug)]
pub struct Module {
    spec: ModuleSpec,
    header: String,
    implementation: String,
    state: ModuleState,
    outputs: Option<Outputs>,
}

impl Module {
    pub fn new(spec: ModuleSpec) -> Self {
        Self {
            spec,
            header: String::new(),
            implementation: String::new(),
            state: ModuleState::Unopened,
            outputs: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn directory(&self) -> &str {
        &self.spec.directory
    }

    pub fn state(&self) -> ModuleState {
        self.state
    }

    /// Header buffer contents so far.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Implementation buffer contents so far.
    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    /// Open the module: acquire its output files under `base_dir` and write
    /// the preambles.
    pub fn begin(&mut self, base_dir: &Path) -> Result<()> {
        self.expect(ModuleState::Unopened, "begin")?;

        let header = open_output(base_dir.join(self.spec.header_path()))?;
        let implementation = open_output(base_dir.join(self.spec.impl_path()))?;

        self.header.push_str(&self.spec.header_preamble);
        self.implementation.push_str(&self.spec.impl_preamble);
        self.outputs = Some(Outputs {
            header,
            implementation,
        });
        self.state = ModuleState::Open;

        tracing::debug!(module = %self.spec.name, "opened module");
        Ok(())
    }

    pub fn append_header(&mut self, text: &str) -> Result<()> {
        self.expect(ModuleState::Open, "append to the header of")?;
        self.header.push_str(text);
        Ok(())
    }

    pub fn append_impl(&mut self, text: &str) -> Result<()> {
        self.expect(ModuleState::Open, "append to the implementation of")?;
        self.implementation.push_str(text);
        Ok(())
    }

    /// Close the module: append the postambles and write both buffers
    /// durably to their temporary files.
    ///
    /// The returned files still have to be committed.
    pub fn end(&mut self) -> Result<[StagedFile; 2]> {
        self.expect(ModuleState::Open, "end")?;
        let Some(outputs) = self.outputs.take() else {
            return Err(self.state_error("end"));
        };

        self.header.push_str(&self.spec.header_postamble);
        self.implementation.push_str(&self.spec.impl_postamble);

        let header = finish_output(outputs.header, &self.header)?;
        let implementation = finish_output(outputs.implementation, &self.implementation)?;
        self.state = ModuleState::Closed;

        tracing::debug!(module = %self.spec.name, "closed module");
        Ok([header, implementation])
    }

    /// Release the output files without writing them.
    pub(crate) fn abandon(&mut self) {
        if self.outputs.take().is_some() {
            tracing::debug!(module = %self.spec.name, "discarded unfinished module output");
        }
    }

    /// This module's output paths for the aggregate build description.
    pub fn build_fragment(&self) -> BuildFragment {
        BuildFragment {
            header: self.spec.header_path(),
            source: self.spec.impl_path(),
        }
    }

    fn expect(&self, state: ModuleState, operation: &'static str) -> Result<()> {
        if self.state == state {
            Ok(())
        } else {
            Err(self.state_error(operation))
        }
    }

    fn state_error(&self, operation: &'static str) -> Box<Error> {
        Box::new(Error::ModuleState {
            module: self.spec.name.clone(),
            operation,
            state: self.state,
        })
    }
}

fn open_output(path: PathBuf) -> Result<PendingFile> {
    PendingFile::create(&path).map_err(|source| Error::io(path, source))
}

fn finish_output(output: PendingFile, content: &str) -> Result<StagedFile> {
    let path = output.path().to_path_buf();
    output
        .finish(content)
        .map_err(|source| Error::io(path, source))
}
