use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::config::Settings;

/// Fixed filename used when writing into a configured storage directory.
pub const SCRIPT_FILENAME: &str = "keyloop_macro.ahk";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("all three shortcuts must be configured before generating")]
    MissingShortcuts,
    #[error("could not create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("could not write script {path}: {source}")]
    WriteScript { path: PathBuf, source: io::Error },
}

/// Where the script goes: a configured directory (fixed filename inside)
/// or an explicit file path chosen by the user when no directory is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptTarget {
    Dir(PathBuf),
    File(PathBuf),
}

impl ScriptTarget {
    /// The configured directory target, if the record has one.
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        let dir = settings.storage_path.trim();
        if dir.is_empty() {
            None
        } else {
            Some(ScriptTarget::Dir(PathBuf::from(dir)))
        }
    }
}

/// Render the automation script. Deterministic in its four inputs; the
/// emergency stop chord `^F11` (Ctrl+F11) is fixed and not configurable.
pub fn render_script(attract: &str, repel: &str, toggle: &str, delay_seconds: f64) -> String {
    let delay_ms = (delay_seconds * 1000.0).round() as u64;
    format!(
        r#"Toast(Message, Duration := 2000) {{
    myGui := Gui("+AlwaysOnTop +ToolWindow -Caption")
    myGui.BackColor := "000000"
    myGui.SetFont("s16 cWhite", "Arial")
    myGui.Add("Text", , Message)
    x := A_ScreenWidth - 300
    myGui.Show("x" x " y20 w280 h50 NoActivate")
    SetTimer () => myGui.Destroy(), -Duration
}}

Toast("Script started", 2000)

toggle := false

{toggle}::
{{
    global toggle
    toggle := !toggle
    if (toggle) {{
        Toast("Macro enabled", 2000)
        SetTimer MyLoop, 100
    }} else {{
        Toast("Macro disabled", 2000)
        SetTimer MyLoop, 0
    }}
}}

^F11::
{{
    Toast("Script stopped", 2000)
    Sleep 2000
    ExitApp
}}

MyLoop() {{
    Send "{repel}"
    Sleep {delay_ms}
    Send "{attract}"
    Sleep {delay_ms}
}}
"#
    )
}

/// Write the script for the given record to the target location.
///
/// A directory target is created recursively if absent. The write is to a
/// fresh file, so a failure leaves no partial state to roll back; the
/// settings record itself is untouched either way.
pub fn generate(settings: &Settings, target: ScriptTarget) -> Result<PathBuf, GenerateError> {
    if settings.attract_shortcut.is_empty()
        || settings.repel_shortcut.is_empty()
        || settings.toggle_shortcut.is_empty()
    {
        return Err(GenerateError::MissingShortcuts);
    }

    let path = match target {
        ScriptTarget::Dir(dir) => {
            fs::create_dir_all(&dir).map_err(|source| GenerateError::CreateDir {
                path: dir.clone(),
                source,
            })?;
            dir.join(SCRIPT_FILENAME)
        }
        ScriptTarget::File(path) => path,
    };

    let script = render_script(
        &settings.attract_shortcut,
        &settings.repel_shortcut,
        &settings.toggle_shortcut,
        settings.delay_seconds,
    );
    fs::write(&path, script).map_err(|source| GenerateError::WriteScript {
        path: path.clone(),
        source,
    })?;

    info!(path = %path.display(), "script generated");
    Ok(path)
}

/// Open the folder containing the generated script in the system file
/// browser. Best-effort: callers surface a warning on failure.
pub fn reveal_containing_folder(script_path: &Path) -> anyhow::Result<()> {
    let folder = script_path.parent().unwrap_or(Path::new("."));
    open::that(folder)?;
    Ok(())
}
