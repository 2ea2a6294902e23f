use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "Loop")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_version_flag = true)]
#[command(help_template = "NAME:
   {name} - Terminal Vimeo Browser

USAGE:
   loop [video id] [global options]

VERSION:
   {version}

DESCRIPTION:
   {name} browses Vimeo categories and videos from your terminal.

   Controls:
     • Use ↑/↓ or j/k to navigate
     • Press Enter to open a category or a video's related videos
     • Press o to open the video in your browser, y to copy its link
     • Press r to retry after a failed load
     • Press b or Esc to go back, q to quit

GLOBAL OPTIONS:
{options}
")]
pub struct Cli {
    /// Video id to open directly
    pub video_id: Option<String>,

    /// Path to the config file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Vimeo access token, overrides LOOP_ACCESS_TOKEN and the stored token
    #[arg(short = 't', long = "token")]
    pub token: Option<String>,

    /// Write a debug log
    #[arg(short = 'l', long = "log")]
    pub log: bool,

    /// print the version
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    pub show_version: Option<bool>,
}
