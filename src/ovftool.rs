//! ovftool location, verification and invocation.
//!
//! ovftool handles its own credential prompting on the controlling
//! terminal, so the deploy subprocess runs with inherited standard
//! streams and blocks until the tool exits.

use std::env;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::TranslatedConfig;
use crate::error::{DeployError, DeployResult};

/// Environment variable overriding the ovftool executable path.
pub const OVF_TOOL_ENV: &str = "OVF_TOOL_ENV";

/// Tool name resolved via PATH when no override is set.
pub const OVF_TOOL_DEFAULT: &str = "ovftool";

/// Default display name for the deployed appliance.
pub const DEFAULT_APPLIANCE_NAME: &str = "OpenNMS Virtual Appliance";

/// Per-run deployment settings supplied on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploySettings {
    /// Display name for the appliance in the inventory
    pub name: String,
    /// Target datastore name
    pub datastore: String,
    /// Target network mapped to the appliance's first interface
    pub network: String,
    /// Enable verbose ovftool logging
    pub verbose: bool,
    /// Thin disk provisioning instead of thick
    pub thin_disk: bool,
    /// Disable SSL verification
    pub insecure: bool,
}

/// Handle to a located ovftool executable.
#[derive(Debug, Clone)]
pub struct OvfTool {
    program: String,
}

impl OvfTool {
    /// Locate ovftool: the `OVF_TOOL_ENV` override wins, otherwise the
    /// bare tool name is left to PATH resolution.
    pub fn locate() -> Self {
        let program = env::var(OVF_TOOL_ENV).unwrap_or_else(|_| OVF_TOOL_DEFAULT.to_string());
        Self { program }
    }

    /// Use an explicit program path instead of the environment lookup.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Confirm the tool is invocable by asking it for its version.
    pub fn verify(&self) -> DeployResult<()> {
        let available = Command::new(&self.program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);

        if available {
            Ok(())
        } else {
            Err(DeployError::ToolNotFound {
                tool: self.program.clone(),
            })
        }
    }

    /// Run the deployment, blocking until ovftool exits.
    ///
    /// Standard streams are inherited: ovftool prompts for vSphere
    /// credentials on the terminal and streams its own progress output.
    pub fn deploy(&self, args: &[String]) -> DeployResult<()> {
        let status = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;

        if status.success() {
            Ok(())
        } else {
            Err(DeployError::ToolExecution {
                code: status.code(),
            })
        }
    }
}

/// Build the ordered ovftool argument list for a deployment.
///
/// ovftool only requires the trailing source/target pair to come last,
/// but the whole list is kept deterministic so runs are reproducible and
/// dry-run output is stable.
pub fn deploy_args(
    config: &TranslatedConfig,
    settings: &DeploySettings,
    image: &Path,
    locator: &str,
) -> Vec<String> {
    let mut args = Vec::new();
    args.push(format!("--name={}", settings.name));
    args.push("--acceptAllEulas".to_string());
    if settings.insecure {
        args.push("--noSSLVerify".to_string());
    }
    if settings.verbose {
        args.push("--X:logLevel=verbose".to_string());
    }
    args.push(format!(
        "--diskMode={}",
        if settings.thin_disk { "thin" } else { "thick" }
    ));
    args.push(format!("--datastore={}", settings.datastore));
    args.push(format!("--net:Network 1={}", settings.network));
    args.push("--allowExtraConfig".to_string());
    for (identifier, value) in &config.properties {
        args.push(format!("--extraConfig:{identifier}={value}"));
    }
    args.push("--powerOn".to_string());
    args.push(image.display().to_string());
    args.push(locator.to_string());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn settings() -> DeploySettings {
        DeploySettings {
            name: DEFAULT_APPLIANCE_NAME.to_string(),
            datastore: "datastore1".to_string(),
            network: "VM Network".to_string(),
            verbose: false,
            thin_disk: false,
            insecure: false,
        }
    }

    fn config() -> TranslatedConfig {
        let mut config = TranslatedConfig::default();
        config.properties.insert(
            "guestinfo.onms.cloudconnect".to_string(),
            "abc".to_string(),
        );
        config
            .properties
            .insert("guestinfo.onms.hostname".to_string(), "node1".to_string());
        config
    }

    #[test]
    fn args_start_with_name_and_eula() {
        let args = deploy_args(&config(), &settings(), Path::new("a.ova"), "vi://esx/");
        assert_eq!(args[0], "--name=OpenNMS Virtual Appliance");
        assert_eq!(args[1], "--acceptAllEulas");
    }

    #[test]
    fn args_end_with_image_then_locator() {
        let image = PathBuf::from("images/appliance.ova");
        let args = deploy_args(&config(), &settings(), &image, "vi://vcenter/dc");
        assert_eq!(args[args.len() - 2], "images/appliance.ova");
        assert_eq!(args[args.len() - 1], "vi://vcenter/dc");
    }

    #[test]
    fn insecure_and_thin_settings_toggle_flags() {
        let mut s = settings();
        s.insecure = true;
        s.thin_disk = true;
        let args = deploy_args(&config(), &s, Path::new("a.ova"), "vi://esx/");

        assert!(args.contains(&"--noSSLVerify".to_string()));
        assert!(args.contains(&"--diskMode=thin".to_string()));
        assert!(!args.iter().any(|a| a == "--X:logLevel=verbose"));
    }

    #[test]
    fn secure_thick_settings_omit_flags() {
        let args = deploy_args(&config(), &settings(), Path::new("a.ova"), "vi://esx/");
        assert!(args.contains(&"--diskMode=thick".to_string()));
        assert!(!args.contains(&"--noSSLVerify".to_string()));
    }

    #[test]
    fn verbose_setting_adds_log_level() {
        let mut s = settings();
        s.verbose = true;
        let args = deploy_args(&config(), &s, Path::new("a.ova"), "vi://esx/");
        assert!(args.contains(&"--X:logLevel=verbose".to_string()));
    }

    #[test]
    fn network_mapping_targets_first_interface() {
        let args = deploy_args(&config(), &settings(), Path::new("a.ova"), "vi://esx/");
        assert!(args.contains(&"--net:Network 1=VM Network".to_string()));
        assert!(args.contains(&"--datastore=datastore1".to_string()));
    }

    #[test]
    fn extra_config_entries_sit_between_allow_and_power_on() {
        let args = deploy_args(&config(), &settings(), Path::new("a.ova"), "vi://esx/");
        let allow = args.iter().position(|a| a == "--allowExtraConfig").unwrap();
        let power = args.iter().position(|a| a == "--powerOn").unwrap();
        let extras: Vec<&String> = args
            .iter()
            .filter(|a| a.starts_with("--extraConfig:"))
            .collect();

        assert_eq!(extras.len(), 2);
        assert!(args.contains(&"--extraConfig:guestinfo.onms.cloudconnect=abc".to_string()));
        assert!(args.contains(&"--extraConfig:guestinfo.onms.hostname=node1".to_string()));
        for extra in extras {
            let pos = args.iter().position(|a| a == extra).unwrap();
            assert!(allow < pos && pos < power);
        }
    }

    #[test]
    fn fixed_tokens_appear_exactly_once() {
        let args = deploy_args(&config(), &settings(), Path::new("a.ova"), "vi://esx/");
        for token in ["--acceptAllEulas", "--allowExtraConfig", "--powerOn"] {
            assert_eq!(args.iter().filter(|a| *a == token).count(), 1, "{token}");
        }
    }

    #[test]
    fn locate_defaults_to_path_lookup() {
        // Guarded read: the override may be set in the calling environment.
        if env::var(OVF_TOOL_ENV).is_err() {
            assert_eq!(OvfTool::locate().program(), OVF_TOOL_DEFAULT);
        }
    }

    #[test]
    fn verify_fails_for_missing_program() {
        let tool = OvfTool::with_program("/nonexistent/ovftool-for-tests");
        let err = tool.verify().unwrap_err();
        assert!(matches!(err, DeployError::ToolNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn deploy_surfaces_nonzero_exit_code() {
        let tool = OvfTool::with_program("/bin/false");
        let err = tool.deploy(&[]).unwrap_err();
        assert!(matches!(err, DeployError::ToolExecution { code: Some(_) }));
    }

    #[cfg(unix)]
    #[test]
    fn deploy_succeeds_on_zero_exit() {
        let tool = OvfTool::with_program("/bin/true");
        tool.deploy(&[]).unwrap();
    }
}
