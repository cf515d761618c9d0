//! Shell installer script template.

/// Handlebars template for the generated `install.sh`.
///
/// Expects: `project_name`, `version`, `wheel_file`, `command_name`,
/// `min_python`.
pub const INSTALL_SH_TEMPLATE: &str = r#"#!/bin/bash
# {{project_name}} install script
# Generated at build time

set -e

echo "Installing {{project_name}} v{{version}}"

# Check the Python version
python_version=$(python3 --version 2>&1 | cut -d' ' -f2 | cut -d'.' -f1,2)
required_version="{{min_python}}"

if [ "$(printf '%s\n' "$required_version" "$python_version" | sort -V | head -n1)" != "$required_version" ]; then
    echo "Python {{min_python}} or newer is required, found: $python_version"
    exit 1
fi

# Install bundled dependencies when present
if [ -d "dependencies" ]; then
    echo "Installing bundled dependencies..."
    pip3 install --find-links dependencies --no-index dependencies/*.whl
fi

# Install the main wheel
echo "Installing {{wheel_file}}..."
pip3 install {{wheel_file}}

# Smoke check
echo "Verifying installation..."
if command -v {{command_name}} >/dev/null 2>&1; then
    echo "Installed successfully:"
    {{command_name}} version
else
    echo "Installation verification failed"
    exit 1
fi

echo ""
echo "Done. Restart any client that launches {{command_name}} to pick up the new version."
"#;
