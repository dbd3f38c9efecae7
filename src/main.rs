//! ovadeploy CLI - deploy the OpenNMS virtual appliance via ovftool
//!
//! Usage: ovadeploy [OPTIONS] --config <PATH> --datastore <NAME> --network <NAME> <IMAGE> <LOCATOR>
//!
//! ovftool must be resolvable from PATH or pointed to by the OVF_TOOL_ENV
//! environment variable. The deploy run inherits the terminal so ovftool
//! can prompt for vSphere credentials.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use ovadeploy::{
    deploy_args, load_config, DeployError, DeployResult, DeploySettings, IgnoreReason, OvfTool,
    TranslatedConfig, DEFAULT_APPLIANCE_NAME,
};

/// Deploy the OpenNMS virtual appliance to a VMware vCenter or ESX host
#[derive(Parser, Debug)]
#[command(name = "ovadeploy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the appliance image
    image: PathBuf,

    /// Target URL locator specifying a location in the vCenter inventory
    /// or on an ESX server
    locator: String,

    /// Path to the appliance configuration file
    #[arg(short, long, value_name = "PATH")]
    config: PathBuf,

    /// Target datastore name for the appliance
    #[arg(long, value_name = "NAME")]
    datastore: String,

    /// Target network for the appliance
    #[arg(long, value_name = "NAME")]
    network: String,

    /// Name for the appliance
    #[arg(short, long, default_value = DEFAULT_APPLIANCE_NAME)]
    name: String,

    /// Enable verbose ovftool logging
    #[arg(short, long)]
    verbose: bool,

    /// Use thin disk provisioning instead of thick
    #[arg(short, long)]
    thin: bool,

    /// Disable SSL verification
    #[arg(short, long)]
    insecure: bool,

    /// Print the ovftool command line without executing it
    #[arg(long)]
    dry_run: bool,

    /// Machine-readable JSON event output
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => Ok(()),
        // The external tool already printed its own diagnostics on the
        // inherited stderr; mirror its exit code for the caller.
        Err(DeployError::ToolExecution { code }) => {
            eprintln!("✗ {}", DeployError::ToolExecution { code });
            std::process::exit(code.unwrap_or(1));
        }
        Err(err) => Err(err.into()),
    }
}

fn run(cli: &Cli) -> DeployResult<()> {
    require_path(&cli.image)?;
    require_path(&cli.config)?;

    if !cli.json {
        println!("🚀 OVA Deploy");
        println!("Image: {}", cli.image.display());
        println!("Target: {}", cli.locator);
    }

    let tool = OvfTool::locate();
    tool.verify()?;

    let config = load_config(&cli.config)?;
    report_ignored(&config, cli.json);

    if !cli.json {
        println!("✓ Translated {} guest properties", config.properties.len());
    }

    let settings = DeploySettings {
        name: cli.name.clone(),
        datastore: cli.datastore.clone(),
        network: cli.network.clone(),
        verbose: cli.verbose,
        thin_disk: cli.thin,
        insecure: cli.insecure,
    };

    let args = deploy_args(&config, &settings, &cli.image, &cli.locator);

    if cli.dry_run {
        if cli.json {
            let event = serde_json::json!({
                "event": "dry-run",
                "program": tool.program(),
                "args": args,
            });
            println!("{event}");
        } else {
            println!("\nWould run:");
            println!("  {} {}", tool.program(), args.join(" "));
        }
        return Ok(());
    }

    if !cli.json {
        // ovftool prompts for vSphere username and password from here on
        println!("\nDeploying with {}...", tool.program());
    }

    tool.deploy(&args)?;

    if cli.json {
        let event = serde_json::json!({
            "event": "deploy",
            "status": "success",
            "name": settings.name,
            "locator": cli.locator,
        });
        println!("{event}");
    } else {
        println!("\n✓ Appliance '{}' deployed and powered on", settings.name);
    }

    Ok(())
}

fn require_path(path: &Path) -> DeployResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(DeployError::PathNotFound {
            path: path.to_path_buf(),
        })
    }
}

fn report_ignored(config: &TranslatedConfig, json: bool) {
    for ignored in &config.ignored {
        if json {
            let reason = match ignored.reason {
                IgnoreReason::Unknown => "unknown",
                IgnoreReason::Empty => "empty",
            };
            let event = serde_json::json!({
                "event": "warning",
                "key": ignored.key,
                "reason": reason,
            });
            println!("{event}");
        } else {
            println!("⚠ {}", ignored.message());
        }
    }
}
