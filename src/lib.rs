//! ovadeploy - OVA appliance deployment launcher
//!
//! Translates a declarative appliance configuration (JSON) into ovftool
//! invocation arguments and drives ovftool as a one-shot subprocess.
//! ovftool itself owns credential prompting, transfer and the argument
//! grammar; this crate owns validation, translation and argument order.

pub mod config;
pub mod error;
pub mod ovftool;
pub mod properties;

// Re-exports for convenience
pub use config::{load_config, translate, IgnoreReason, Ignored, TranslatedConfig};
pub use error::{DeployError, DeployResult};
pub use ovftool::{
    deploy_args, DeploySettings, OvfTool, DEFAULT_APPLIANCE_NAME, OVF_TOOL_DEFAULT, OVF_TOOL_ENV,
};
pub use properties::{guest_property, GUEST_PROPERTIES};
