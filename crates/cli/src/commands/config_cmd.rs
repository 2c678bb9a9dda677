//! `lexchat config`: configuration management.

use lexchat_config::AppConfig;

pub fn run(default: bool) -> Result<(), Box<dyn std::error::Error>> {
    if default {
        print!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let config_path = AppConfig::config_dir().join("config.toml");
    println!("Validating configuration...");
    println!("   File:     {}", config_path.display());

    match AppConfig::load() {
        Ok(config) => {
            println!("   Config parsed and validated");
            println!();
            println!("   Endpoint: {}", config.backend.stream_url());
            println!("   Agent:    {}", config.default_agent().display_name());
            println!(
                "   User:     {}",
                config.session.user_id.as_deref().unwrap_or("(anonymous)")
            );
            println!();
            println!("{}", toml::to_string_pretty(&config)?);
        }
        Err(e) => {
            println!("   Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}
