use clap::Parser;
use distpage::config;
use distpage::pipeline::{self, BuildOptions};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "distpage")]
#[command(version)]
#[command(about = "Generate download pages for release archives")]
#[command(long_about = "\
Generate download pages for release archives

Scans a directory for archives named <project>-v<major>.<minor>.<patch>-<platform>.tar.gz,
picks the latest version of every project/platform pair and writes:

  versions.json   {\"<project>-<platform>\": {\"latest\": \"<file>\"}}   (always rewritten)
  _redirects      /<project>-<platform>/latest /<file> 302         (always rewritten)
  index.html      download page that renders versions.json          (only if missing)

Run 'distpage --print-config' for a documented config file.")]
struct Cli {
    /// Directory to scan for .tar.gz files
    #[arg(required_unless_present = "print_config")]
    scan_dir: Option<PathBuf>,

    /// Directory to output generated files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// TOML config file laid over the built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a stock config file with all options documented, then exit
    #[arg(long)]
    print_config: bool,

    /// Increase diagnostic output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress progress output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::ERROR;
        }
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cli.log_level())
        .init();
    debug!(?cli, "arguments parsed");

    if cli.print_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let Some(scan_dir) = cli.scan_dir else {
        return Err("a scan directory is required".into());
    };
    let options = BuildOptions {
        scan_dir,
        output_dir: cli.output_dir,
        config_path: cli.config,
    };

    let quiet = cli.quiet;
    pipeline::build(&options, &mut |line: String| {
        if !quiet {
            println!("{}", line);
        }
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_dir_and_default_output() {
        let cli = Cli::try_parse_from(["distpage", "releases"]).unwrap();
        assert_eq!(cli.scan_dir, Some(PathBuf::from("releases")));
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert_eq!(cli.config, None);
        assert_eq!(cli.log_level(), LevelFilter::WARN);
    }

    #[test]
    fn output_dir_short_and_long() {
        let cli = Cli::try_parse_from(["distpage", "releases", "-o", "site"]).unwrap();
        assert_eq!(cli.output_dir, PathBuf::from("site"));

        let cli = Cli::try_parse_from(["distpage", "--output-dir", "public", "releases"]).unwrap();
        assert_eq!(cli.output_dir, PathBuf::from("public"));
    }

    #[test]
    fn scan_dir_required() {
        assert!(Cli::try_parse_from(["distpage"]).is_err());
    }

    #[test]
    fn print_config_needs_no_scan_dir() {
        let cli = Cli::try_parse_from(["distpage", "--print-config"]).unwrap();
        assert!(cli.print_config);
        assert_eq!(cli.scan_dir, None);
    }

    #[test]
    fn verbosity_levels() {
        let cli = Cli::try_parse_from(["distpage", "-vv", "releases"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::DEBUG);

        let cli = Cli::try_parse_from(["distpage", "-q", "releases"]).unwrap();
        assert_eq!(cli.log_level(), LevelFilter::ERROR);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["distpage", "-q", "-v", "releases"]).is_err());
    }
}
