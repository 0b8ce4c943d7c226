use std::path::PathBuf;

use clap::Args;
use eyre::{Context, Result};
use vkcereal_codegen::Orchestrator;
use vkcereal_codegen_vulkan::cereal_config;
use vkcereal_schema::EventScript;

use super::{UnwrapOrExit, invocation_banner};

#[derive(Args)]
pub struct CheckCommand {
    /// Event script to replay
    #[arg(short, long)]
    pub schema: PathBuf,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let script = EventScript::from_file(&self.schema).unwrap_or_exit();
        let scratch = tempfile::TempDir::new().wrap_err("Failed to create scratch directory")?;

        let mut orchestrator = Orchestrator::new(cereal_config(&invocation_banner()));
        let output = orchestrator
            .run(script.events(scratch.path()))
            .unwrap_or_exit();

        println!("✓ {} is consistent\n", self.schema.display());
        println!(
            "  {} entities in {} features",
            orchestrator.registry().len(),
            script.features.len()
        );
        println!("  {} files would be written", output.written());

        Ok(())
    }
}
