use anyhow::Context;
use globber::{DiskFileSystem, EntryTypes, Glob, MatchOptions, Tokenizer};
use std::io::Write;
use std::path::{Path, PathBuf};
use structopt::*;

mod errorprint;

#[derive(Debug, StructOpt)]
#[structopt(rename_all = "kebab")]
/// Expand glob patterns against a directory tree
struct Opt {
    /// The patterns to expand, such as `./tools/**/*.exe`
    #[structopt(raw(required = "true"))]
    patterns: Vec<String>,

    /// Evaluate relative patterns starting from this directory
    /// instead of the current directory
    #[structopt(short = "C", long = "root", parse(from_os_str))]
    root: Option<PathBuf>,

    /// Compare names exactly rather than ignoring case
    #[structopt(short = "s", long = "case-sensitive")]
    case_sensitive: bool,

    /// Only report files
    #[structopt(long = "files", conflicts_with = "dirs")]
    files: bool,

    /// Only report directories
    #[structopt(long = "dirs")]
    dirs: bool,

    /// Don't descend more than this many directories below the root
    #[structopt(long = "max-depth")]
    max_depth: Option<usize>,

    /// Fail on the first directory that can't be read instead of
    /// skipping it
    #[structopt(long = "strict")]
    strict: bool,

    /// Don't follow symbolic links to directories
    #[structopt(long = "no-follow")]
    no_follow: bool,

    /// Print the tokens of each pattern instead of expanding it
    #[structopt(long = "tokens")]
    tokens: bool,

    /// Log what the walk is doing
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

impl Opt {
    fn match_options(&self) -> MatchOptions {
        let entry_types = if self.files {
            EntryTypes::Files
        } else if self.dirs {
            EntryTypes::Directories
        } else {
            EntryTypes::All
        };
        MatchOptions {
            case_sensitive: self.case_sensitive,
            entry_types,
            max_depth: self.max_depth,
            strict: self.strict,
        }
    }
}

/// `FILEGLOB_LOG` takes precedence over `--verbose`
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("FILEGLOB_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_tokens(out: &mut impl Write, pattern: &str) -> anyhow::Result<()> {
    let mut tokenizer = Tokenizer::new(pattern);
    while let Ok(token) = Tokenizer::scan(&mut tokenizer) {
        writeln!(
            out,
            "{}..{}\t{:?}\t{:?}",
            token.span.start,
            token.span.end,
            token.kind,
            tokenizer.source_text(&token)
        )?;
    }
    Ok(())
}

fn expand(
    pattern: &str,
    options: &MatchOptions,
    fs: &DiskFileSystem,
    root: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    let glob = Glob::with_options(pattern, options.clone())?;
    Ok(glob.walk_fs(fs, root)?)
}

/// Returns false if any pattern failed
fn run(opt: &Opt) -> anyhow::Result<bool> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if opt.tokens {
        for pattern in &opt.patterns {
            print_tokens(&mut out, pattern)?;
        }
        return Ok(true);
    }

    let root = match &opt.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("determining the current directory")?,
    };
    let options = opt.match_options();
    let fs = DiskFileSystem::new().follow_links(!opt.no_follow);
    tracing::debug!(root = %root.display(), ?options, "expanding");

    let mut ok = true;
    for pattern in &opt.patterns {
        match expand(pattern, &options, &fs, &root) {
            Ok(paths) => {
                for path in paths {
                    writeln!(out, "{}", path.display())?;
                }
            }
            Err(err) => {
                errorprint::print_error(&err, pattern);
                ok = false;
            }
        }
    }
    Ok(ok)
}

fn main() {
    let opt = Opt::from_args();
    init_tracing(opt.verbose);

    match run(&opt) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            for item in err.chain() {
                eprintln!("fileglob: {}", item);
            }
            std::process::exit(1);
        }
    }
}
