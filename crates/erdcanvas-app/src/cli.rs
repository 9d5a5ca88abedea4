//! Command-line configuration and the top-level run loop.

use crate::session::{AppError, Session, parse_script};
use clap::Parser;
use erdcanvas_core::{CanvasConfig, Palette};
use std::io::Read;
use std::path::PathBuf;

/// Replay a gesture script against the ErdCanvas engine and print the final scene.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "erdcanvas")]
#[command(version, about, long_about = None)]
pub struct AppConfig {
    /// Script file (JSON array of steps); read from stdin when absent
    pub script: Option<PathBuf>,

    /// Palette file; the built-in sample palette when absent
    #[arg(long)]
    pub palette: Option<PathBuf>,

    /// Canvas config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Load inputs, replay the script and return the final scene as JSON.
pub fn run(app: &AppConfig) -> Result<String, AppError> {
    let config = match &app.config {
        Some(path) => CanvasConfig::load(path)?,
        None => CanvasConfig::default(),
    };
    let palette = match &app.palette {
        Some(path) => Palette::load(path)?,
        None => Palette::sample(),
    };
    log::info!("Loaded palette with {} templates", palette.len());

    let script = match &app.script {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut session = Session::new(palette, &config);
    let scene = session.replay(parse_script(&script)?)?;
    Ok(serde_json::to_string_pretty(&scene)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let config = AppConfig::try_parse_from(["erdcanvas", "demo.json", "--palette", "p.json"]).unwrap();
        assert_eq!(config.script, Some(PathBuf::from("demo.json")));
        assert_eq!(config.palette, Some(PathBuf::from("p.json")));
        assert!(config.config.is_none());
    }

    #[test]
    fn test_no_args_reads_stdin() {
        let config = AppConfig::try_parse_from(["erdcanvas"]).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(AppConfig::try_parse_from(["erdcanvas", "--palette"]).is_err());
        assert!(AppConfig::try_parse_from(["erdcanvas", "--verbose"]).is_err());
        assert!(AppConfig::try_parse_from(["erdcanvas", "a.json", "b.json"]).is_err());
    }

    #[test]
    fn test_missing_script_file() {
        let config = AppConfig {
            script: Some(PathBuf::from("/nonexistent/erdcanvas/script.json")),
            ..Default::default()
        };
        assert!(matches!(run(&config), Err(AppError::Io(_))));
    }
}
