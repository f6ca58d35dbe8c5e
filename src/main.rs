use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use git_bump::analyzer::NoBumpOutput;
use git_bump::cli::{run_bump_workflow, BumpWorkflowArgs};
use git_bump::config::{self, Config, Preset};
use git_bump::git::Git2Repository;
use git_bump::ui;

#[derive(clap::Parser)]
#[command(
    name = "bump",
    version,
    about = "Automatic semantic versioning based on conventional commits"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Push changes and tags to the remote")]
    push: bool,

    #[arg(short, long, help = "Create a git tag for the new version")]
    tag: bool,

    #[arg(short, long, help = "Annotate the tag with the commits since the last tag")]
    release_notes: bool,

    #[arg(short, long, help = "Do not list the analysed commits")]
    quiet: bool,

    #[arg(long, help = "Output only the new version string (dry run, no changes)")]
    raw: bool,

    #[arg(long, value_enum, help = "Where the version is stored")]
    preset: Option<Preset>,

    #[arg(long, help = "Prefix for git tags (default: v)")]
    tag_prefix: Option<String>,

    #[arg(long, help = "Prefix for release commit messages")]
    commit_prefix: Option<String>,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Comma-separated list of package files to update"
    )]
    package_files: Option<Vec<String>>,

    #[arg(long, help = "Committer name used when git config has none")]
    git_user_name: Option<String>,

    #[arg(long, help = "Committer email used when git config has none")]
    git_user_email: Option<String>,

    #[arg(long, help = "Move the major version tag (e.g. v1) to the release")]
    update_major_tag: bool,

    #[arg(long, help = "Move the minor version tag (e.g. v1.2) to the release")]
    update_minor_tag: bool,

    #[arg(long, help = "Generate and maintain a CHANGELOG.md file")]
    changelog: bool,

    #[arg(long, value_enum, help = "What to print when no bump is required")]
    no_bump_output: Option<NoBumpOutput>,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

impl Args {
    /// CLI flags take precedence over the configuration file
    fn apply_to(&self, config: &mut Config) {
        if let Some(preset) = self.preset {
            config.preset = preset;
        }
        if let Some(prefix) = &self.tag_prefix {
            config.tag_prefix = prefix.clone();
        }
        if let Some(prefix) = &self.commit_prefix {
            config.commit_prefix = prefix.clone();
        }
        if let Some(files) = &self.package_files {
            config.package_files = Some(files.clone());
        }
        if let Some(name) = &self.git_user_name {
            config.git_user_name = Some(name.clone());
        }
        if let Some(email) = &self.git_user_email {
            config.git_user_email = Some(email.clone());
        }
        if let Some(mode) = self.no_bump_output {
            config.no_bump_output = mode;
        }

        config.push |= self.push;
        config.tag |= self.tag;
        config.release_notes |= self.release_notes;
        config.changelog |= self.changelog;
        config.update_major_tag |= self.update_major_tag;
        config.update_minor_tag |= self.update_minor_tag;
    }
}

fn main() {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("git_bump=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("git_bump=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = config::load_config(args.config.as_deref())
        .context("Error loading config")?;
    args.apply_to(&mut config);

    let cwd = std::env::current_dir().context("Cannot determine the working directory")?;
    let repo = Git2Repository::open(&cwd)
        .context("Git repository error")?
        .with_identity(config.git_user_name.clone(), config.git_user_email.clone());
    let root = repo.workdir().map(|dir| dir.to_path_buf()).unwrap_or(cwd);

    let workflow_args = BumpWorkflowArgs {
        raw: args.raw,
        quiet: args.quiet,
        ..BumpWorkflowArgs::default()
    };
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();

    run_bump_workflow(&repo, &config, &workflow_args, &root, &today)?;
    Ok(())
}
