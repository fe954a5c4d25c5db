use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "git-sweep")]
#[command(about = "Delete local branches that are gone upstream or already merged")]
#[command(
    version,
    long_about = "Deletes local branches whose upstream reference no longer exists, whose \
                  Gerrit Change-Id already landed on the mainline, or whose tip is already \
                  contained in the mainline. Tracking configuration is removed alongside."
)]
pub struct Cli {
    /// Print the branches that would be deleted without touching the repository
    #[arg(long)]
    pub dry_run: bool,
}
