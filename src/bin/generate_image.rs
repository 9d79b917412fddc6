// Entrypoint for the image-generation tool.
// - Keeps `main` small: parse arguments, load config, make one request,
//   write the result to disk.
// - Returns `anyhow::Result` so any failure prints and exits non-zero.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::time::Duration;

use postdeck::config::ImageGenConfig;
use postdeck::image::{image_file_name, ImageClient};

#[derive(Parser, Debug)]
#[clap(
    name = "generate-image",
    version,
    about = "Generate a social post image and save it under the posts directory"
)]
struct Cli {
    /// Image prompt sent to the generation model
    prompt: String,
    /// Short filesystem-safe topic label used in the output file name
    #[clap(default_value = "post")]
    topic_slug: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ImageGenConfig::from_env()?;
    let client = ImageClient::new(&config)?;

    println!("Generating image for: {}", cli.topic_slug);
    println!("Prompt: {}\n", cli.prompt);

    // The request blocks for up to the configured timeout; keep a
    // spinner ticking so the terminal does not look hung.
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message("Requesting image...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = client.generate(&cli.prompt);
    spinner.finish_and_clear();
    let bytes = result?;

    let file_name = image_file_name(Local::now().date_naive(), &cli.topic_slug);
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create {}", config.output_dir.display())
    })?;
    let output_path = config.output_dir.join(&file_name);
    fs::write(&output_path, &bytes)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    println!("{} Image generated successfully", "ok".green());
    println!("Saved to: {}", output_path.display());
    println!("\nAdd this to your markdown frontmatter:");
    println!("image: {}", file_name);
    Ok(())
}
