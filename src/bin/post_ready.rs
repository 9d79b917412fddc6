// Entrypoint for the posting tool. Scans the posts directory for
// pending files, submits each to the scheduling service, and reports
// per-file outcomes plus a summary. Takes no arguments; the directory
// and credentials come from the environment.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use postdeck::config::SchedulerConfig;
use postdeck::post::{POSTED_PREFIX, READY_PREFIX};
use postdeck::runner::{process_files, scan_ready, Outcome};
use postdeck::scheduler::SchedulerClient;

#[derive(Parser, Debug)]
#[clap(
    name = "post-ready",
    version,
    about = "Schedule every pending post in the posts directory"
)]
struct Cli {}

fn main() -> Result<()> {
    let _cli = Cli::parse();
    let config = SchedulerConfig::from_env()?;
    let client = SchedulerClient::new(&config)?;

    let ready = scan_ready(&config.posts_dir)?;
    if ready.is_empty() {
        println!(
            "No {}*.md files found in {}.",
            READY_PREFIX,
            config.posts_dir.display()
        );
        println!("Create files like: {}your-topic.md", READY_PREFIX);
        return Ok(());
    }

    println!("Found {} post(s) ready to schedule:\n", ready.len());
    for path in &ready {
        println!("   {}", path.file_name().unwrap_or_default().to_string_lossy());
    }
    println!("\nScheduling...\n");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.enable_steady_tick(Duration::from_millis(100));
    let report = process_files(&ready, |post, image| {
        spinner.set_message(format!("Scheduling {}", post.file_name()));
        client.schedule(&post.body, image)
    });
    spinner.finish_and_clear();

    for file in &report.outcomes {
        match &file.outcome {
            Outcome::Scheduled {
                id,
                schedule_date,
                posted_as,
            } => {
                println!("   {} {}", "ok".green(), file.file_name);
                println!("      Post ID: {}", id);
                println!("      Scheduled: {}", schedule_date);
                println!("      Renamed to: {}\n", posted_as);
            }
            Outcome::SkippedMissingImage => {
                println!(
                    "   {} {}: missing image in frontmatter, skipping\n",
                    "skip".yellow(),
                    file.file_name
                );
            }
            Outcome::Failed(message) => {
                println!("   {} {}: {}\n", "fail".red(), file.file_name, message);
            }
        }
    }

    println!("{} post(s) scheduled.", report.scheduled());
    if report.scheduled() > 0 {
        println!("Scheduled posts renamed to {}* files.", POSTED_PREFIX);
    }
    Ok(())
}
