//! `prr init` command - Create a project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::core::project::Project;
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Re-initialize an existing project (keeps cases, rewrites config)
    #[arg(long)]
    pub force: bool,

    /// Deployment tag stamped on new cases
    #[arg(long)]
    pub environment: Option<String>,

    /// Module tag stamped on new cases
    #[arg(long)]
    pub module: Option<String>,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    std::fs::create_dir_all(&args.path).into_diagnostic()?;
    let project = Project::init(&args.path, args.force).map_err(|e| miette::miette!("{}", e))?;

    let config_path = project.config_path();
    if !config_path.exists() || args.force {
        let config = Config {
            environment: args.environment,
            module: args.module,
            ..Config::default()
        };
        let yaml = serde_yml::to_string(&config).into_diagnostic()?;
        let header = "# PRR project configuration\n\
                      # Keys: actor, environment, module, lifecycle.permissive_transitions, calendar.holidays\n";
        std::fs::write(&config_path, format!("{}{}", header, yaml)).into_diagnostic()?;
    }

    if !global.quiet {
        println!(
            "{} Initialized PRR project in {}",
            style("✓").green(),
            style(project.root().display()).cyan()
        );
        println!("  Cases are stored in {}", project.cases_dir().display());
    }
    Ok(())
}
