use anyhow::Result;

use smoothscroll_core::AppConfig;

pub fn run(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if init {
        if path.exists() {
            println!("Configuration already exists at {}", path.display());
            return Ok(());
        }
        AppConfig::default().save()?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, showing defaults)", path.display());
    }
    if let Err(e) = config.scroll.validate() {
        println!("# warning: {} - smooth scrolling stays off with these settings", e);
    }
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
