use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use vkcereal_codegen::Orchestrator;
use vkcereal_codegen_vulkan::cereal_config;
use vkcereal_schema::EventScript;

use super::{UnwrapOrExit, invocation_banner};

#[derive(Args)]
pub struct GenerateCommand {
    /// Event script to replay
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Output directory (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let script = EventScript::from_file(&self.schema).unwrap_or_exit();

        let mut orchestrator = Orchestrator::new(cereal_config(&invocation_banner()));
        let stats = orchestrator
            .run(script.events(&self.output))
            .unwrap_or_exit();

        println!(
            "Generated {} entities into {}/",
            orchestrator.registry().len(),
            self.output.display()
        );
        for path in &stats.written_paths {
            let shown = path.strip_prefix(&self.output).unwrap_or(path);
            println!("  + {}", shown.display());
        }

        Ok(())
    }
}
