//! size-report CLI - Compare size-limit results and report them on pull requests

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use size_report_core::{format_results, parse_margin, parse_results, FormatOptions, Snapshot, Table};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

mod error;
mod github;
mod report;

use github::{GitHubActionsEnv, GitHubClient};
use report::SIZE_LIMIT_HEADING;

/// size-report: bundle size and timing diffs between two size-limit runs
#[derive(Parser, Debug)]
#[command(name = "size-report")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare two size-limit outputs and print the report
    Compare(CompareArgs),
    /// Compare two size-limit outputs and post the report on a pull request
    Comment(CommentArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// size-limit JSON output for the base branch
    #[arg(long, value_name = "FILE")]
    base: PathBuf,

    /// size-limit JSON output for the current branch
    #[arg(long, value_name = "FILE")]
    current: PathBuf,

    /// Hide size changes below this margin: bytes, a percentage ("5%") or "non-zero"
    #[arg(long, env = "SIZE_MARGIN", default_value = "")]
    size_margin: String,

    /// Exit status of the size-limit run for the current branch
    #[arg(long, default_value = "0")]
    limit_status: i32,
}

#[derive(Parser, Debug)]
struct CompareArgs {
    #[command(flatten)]
    input: InputArgs,

    #[arg(long, default_value = "markdown")]
    format: String,

    /// Write the report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CommentArgs {
    #[command(flatten)]
    input: InputArgs,

    #[arg(long, env = "GITHUB_TOKEN")]
    github_token: Option<String>,

    /// Repository as owner/repo or any GitHub URL
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Pull request number (defaults to the one in GITHUB_EVENT_PATH)
    #[arg(long)]
    pr: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let limit_status = match cli.command {
        Commands::Compare(args) => compare_command(args)?,
        Commands::Comment(args) => comment_command(args)?,
    };

    if limit_status > 0 {
        error!("Size limit has been exceeded.");
        std::process::exit(1);
    }

    Ok(())
}

fn load_snapshot(path: &Path) -> error::Result<Snapshot> {
    let output = std::fs::read_to_string(path).map_err(|e| error::Error::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;

    match parse_results(&output) {
        Ok(snapshot) => {
            debug!("Parsed {} results from {:?}", snapshot.len(), path);
            Ok(snapshot)
        }
        Err(e) => {
            error!("Error parsing size-limit output. The output should be a json.");
            Err(e.into())
        }
    }
}

/// Parse the margin first so a bad setting fails before any file is read
fn build_table(input: &InputArgs) -> Result<Table> {
    let options = FormatOptions {
        size_margin: parse_margin(&input.size_margin)?,
    };
    if let Some(margin) = &options.size_margin {
        debug!("Using size margin {:?}", margin);
    }

    let base = load_snapshot(&input.base)
        .with_context(|| format!("Failed to load base results from {:?}", input.base))?;
    let current = load_snapshot(&input.current)
        .with_context(|| format!("Failed to load current results from {:?}", input.current))?;

    let table = format_results(&base, &current, &options);
    info!("Report has {} rows", table.len().saturating_sub(1));

    Ok(table)
}

fn render(table: &Table, format: &str) -> Result<String> {
    let rendered = match format {
        "json" => serde_json::to_string_pretty(table)?,
        "markdown" => report::report_body(table),
        "text" => report::text_table(table),
        other => anyhow::bail!("Unknown format '{}': expected markdown, json or text", other),
    };
    Ok(rendered)
}

fn compare_command(args: CompareArgs) -> Result<i32> {
    let table = build_table(&args.input)?;
    let rendered = render(&table, &args.format)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered).map_err(|e| error::Error::FileWrite {
                path: path.display().to_string(),
                source: e,
            })?;
            info!("Wrote report to {:?}", path);
        }
        None => println!("{}", rendered),
    }

    Ok(args.input.limit_status)
}

fn comment_command(args: CommentArgs) -> Result<i32> {
    let gh_env = GitHubActionsEnv::from_env();
    if GitHubActionsEnv::is_github_actions() {
        debug!("Running in GitHub Actions environment");
    }

    let pr = match args.pr {
        Some(pr) => pr,
        None => gh_env
            .pull_request_number()?
            .context("No PR found. Only pull_request workflows are supported.")?,
    };

    let repository = args
        .repository
        .as_deref()
        .or(gh_env.repository.as_deref())
        .context("No repository given; set --repository or GITHUB_REPOSITORY")?;
    let (owner, repo) = github::parse_github_repo(repository)?;

    let table = build_table(&args.input)?;
    let body = report::report_body(&table);

    let token = args.github_token.clone().or(gh_env.token.clone());
    let mut client = GitHubClient::new(token)?;
    if let Some(api_url) = gh_env.api_url.as_deref() {
        client = client.with_api_base(api_url)?;
    }

    let previous = client
        .find_comment(&owner, &repo, pr, SIZE_LIMIT_HEADING)
        .with_context(|| format!("Failed to fetch comments for {}/{}#{}", owner, repo, pr))?;

    let posted = match &previous {
        Some(comment) => {
            info!("Updating size-limit comment {}", comment.id);
            client.update_issue_comment(&owner, &repo, comment.id, &body)
        }
        None => {
            info!("Creating size-limit comment on {}/{}#{}", owner, repo, pr);
            client.create_issue_comment(&owner, &repo, pr, &body)
        }
    };

    match posted {
        Ok(url) => info!("Posted comment: {}", url),
        Err(e) => {
            // Pull requests from forks have no write access
            warn!(
                "Failed to post comment ({}). Logging report to console instead:",
                e
            );
            println!("{}", body);
        }
    }

    Ok(args.input.limit_status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn payload_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn input(base: &Path, current: &Path, margin: &str) -> InputArgs {
        InputArgs {
            base: base.to_path_buf(),
            current: current.to_path_buf(),
            size_margin: margin.to_string(),
            limit_status: 0,
        }
    }

    #[test]
    fn test_build_table_from_files() {
        let base = payload_file(r#"[{ "name": "dist/index.js", "passed": true, "size": "110894" }]"#);
        let current = payload_file(r#"[{ "name": "dist/index.js", "passed": true, "size": "100894" }]"#);

        let table = build_table(&input(base.path(), current.path(), "")).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table[1], vec!["dist/index.js", "98.53 KB (-9.02% 🔽)"]);
    }

    #[test]
    fn test_build_table_invalid_margin() {
        let missing = Path::new("/nonexistent/size-limit.json");

        let err = build_table(&input(missing, missing, "ten")).unwrap_err();

        assert!(err.to_string().contains("Invalid size margin: ten"));
    }

    #[test]
    fn test_build_table_invalid_payload() {
        let base = payload_file("[]");
        let current = payload_file("Error: size-limit not found");

        assert!(build_table(&input(base.path(), current.path(), "")).is_err());
    }

    #[test]
    fn test_load_snapshot_errors() {
        let bad = payload_file("not json");
        assert!(matches!(
            load_snapshot(bad.path()),
            Err(error::Error::Core(size_report_core::Error::Parse(_)))
        ));

        assert!(matches!(
            load_snapshot(Path::new("/nonexistent/size-limit.json")),
            Err(error::Error::FileRead { .. })
        ));
    }

    #[test]
    fn test_render_formats() {
        let table: Table = vec![vec!["Path".to_string(), "Size".to_string()]];

        assert!(render(&table, "markdown").unwrap().starts_with(SIZE_LIMIT_HEADING));
        assert_eq!(
            render(&table, "json").unwrap(),
            serde_json::to_string_pretty(&table).unwrap()
        );
        assert_eq!(render(&table, "text").unwrap(), "Path\tSize");
        assert!(render(&table, "html").is_err());
    }

    #[test]
    fn test_compare_command_writes_output() {
        let base = payload_file(r#"[{ "name": "a.js", "size": 1024 }]"#);
        let current = payload_file(r#"[{ "name": "a.js", "size": 1024 }]"#);
        let out_dir = tempfile::tempdir().unwrap();
        let out_path = out_dir.path().join("report.md");

        let mut args_input = input(base.path(), current.path(), "");
        args_input.limit_status = 2;
        let status = compare_command(CompareArgs {
            input: args_input,
            format: "markdown".to_string(),
            output: Some(out_path.clone()),
        })
        .unwrap();

        assert_eq!(status, 2);
        let written = std::fs::read_to_string(&out_path).unwrap();
        assert!(written.contains("| a.js | 1 KB (0%) |"));
    }

    #[test]
    fn test_cli_parses_compare_args() {
        let cli = Cli::try_parse_from([
            "size-report",
            "compare",
            "--base",
            "base.json",
            "--current",
            "current.json",
            "--size-margin",
            "5%",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Compare(args) => {
                assert_eq!(args.input.size_margin, "5%");
                assert_eq!(args.input.limit_status, 0);
                assert_eq!(args.format, "json");
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
