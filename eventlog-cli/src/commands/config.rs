use anyhow::Result;
use eventlog_core::config::ClientConfig;
use owo_colors::OwoColorize;

pub fn run(config: &ClientConfig) -> Result<()> {
    let config_path = ClientConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:       {}", config_path.display());

    println!("{}", "Settings".bold());
    println!("  API:          {}", config.api_base_url);
    println!(
        "  Signed in:    {}",
        if config.id_token.is_some() { "yes" } else { "no" }
    );
    println!("  Max photo:    {} bytes", config.photos.max_upload_bytes);
    println!("  Photo types:  {}", config.photos.accepted_file_types.join(", "));

    Ok(())
}
