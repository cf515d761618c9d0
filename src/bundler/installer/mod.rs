//! Installer script generation.
//!
//! Renders `install.sh` from a template using Handlebars, with the project
//! metadata, wheel filename, and Python version guard filled in.

mod template;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;

use crate::cli::RuntimeConfig;
use crate::metadata::ProjectInfo;

use self::template::INSTALL_SH_TEMPLATE;
use super::error::{Error, ErrorExt, Result};

/// Minimum Python version the generated script accepts, compared with a
/// lexical version sort on the target machine.
const MIN_PYTHON: &str = "3.11";

/// Rejects values that cannot be spliced into a shell script verbatim.
///
/// The template is rendered without escaping, so every substituted value is
/// restricted to the character set package names and versions actually use.
fn ensure_shell_safe(field: &'static str, value: &str) -> Result<()> {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+'));
    if safe {
        Ok(())
    } else {
        Err(Error::UnsafeTemplateValue {
            field,
            value: value.to_string(),
        })
    }
}

/// Generate the install script from the template.
///
/// Writes `install.sh` into the output directory and marks it executable.
/// The script content is purely templated text; it is not validated as
/// shell syntax here.
///
/// # Returns
/// Path to the generated install.sh
pub async fn generate_install_script(
    output_dir: &Path,
    info: &ProjectInfo,
    config: &RuntimeConfig,
) -> Result<PathBuf> {
    config.progress("Creating install script...")?;

    ensure_shell_safe("project name", &info.name)?;
    ensure_shell_safe("version", &info.version)?;

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);

    let mut data = BTreeMap::new();
    data.insert("project_name", info.name.clone());
    data.insert("version", info.version.clone());
    data.insert("wheel_file", info.wheel_file_name());
    data.insert("command_name", info.name.clone());
    data.insert("min_python", MIN_PYTHON.to_string());

    handlebars
        .register_template_string("install.sh", INSTALL_SH_TEMPLATE)
        .map_err(|e| Error::Generic(format!("failed to register install template: {}", e)))?;

    let content = handlebars
        .render("install.sh", &data)
        .map_err(|e| Error::Generic(format!("failed to render install template: {}", e)))?;

    let script_path = output_dir.join("install.sh");
    tokio::fs::write(&script_path, content)
        .await
        .fs_context("writing", &script_path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755))
            .await
            .fs_context("marking executable", &script_path)?;
    }

    config.success(&format!("Install script created: {}", script_path.display()))?;
    Ok(script_path)
}
