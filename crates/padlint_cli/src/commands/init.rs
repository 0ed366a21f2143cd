//! Init command implementation

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use tracing::info;

use padlint_core::SessionConfig;

const DEFAULT_CONFIG: &str = r#"{
  // LanguageTool check endpoint
  "apiUrl": "http://localhost:8010/v2/check",
  "defaultLanguage": "en",
  "autoCheck": true,
  // Milliseconds to wait after the last edit
  "debounceDelay": 2000,
  "timeout": 30000,
  "maxTextLength": 60000,
  "cacheSize": 10,
  "disabledRules": []
}
"#;

pub fn run_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(SessionConfig::CONFIG_FILES[0]);

    loop {
        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_NOFOLLOW);
        }

        match options.open(&config_path) {
            Ok(mut file) => {
                use std::io::Write;
                file.write_all(DEFAULT_CONFIG.as_bytes())
                    .into_diagnostic()?;
                info!("Created {}", config_path.display());
                return Ok(());
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                if !force {
                    return Err(miette::miette!(
                        "Config file already exists. Use --force to overwrite."
                    ));
                }

                match std::fs::remove_file(&config_path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e).into_diagnostic(),
                }
            }
            Err(e) => return Err(e).into_diagnostic(),
        }
    }
}
