use clap::Parser;
use std::io::{BufRead, IsTerminal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use quotearg::config::QUOTING_STYLE_ENV;
use quotearg::{QuoteError, QuotingConfig, QuotingOptions, QuotingStyle};

#[derive(Parser)]
#[command(name = "quotearg")]
#[command(about = "Quote arguments for safe display or reuse in a shell")]
#[command(version)]
struct Cli {
    /// Quoting style: literal, shell, shell-always, shell-escape,
    /// shell-escape-always, c, c-maybe, escape, locale, clocale
    #[arg(short = 's', long = "style")]
    style: Option<String>,

    /// Drop NUL characters that are not escaped
    #[arg(long = "elide-null-bytes")]
    elide_null_bytes: bool,

    /// Omit the outer quotes when they are not needed
    #[arg(long = "elide-outer-quotes")]
    elide_outer_quotes: bool,

    /// Break up C trigraphs in c style
    #[arg(long = "split-trigraphs")]
    split_trigraphs: bool,

    /// Opening quote for custom quoting (requires --right-quote)
    #[arg(long = "left-quote")]
    left_quote: Option<char>,

    /// Closing quote for custom quoting (requires --left-quote)
    #[arg(long = "right-quote")]
    right_quote: Option<char>,

    /// Always quote this character (may be repeated)
    #[arg(short = 'q', long = "quote-char")]
    quote_chars: Vec<char>,

    /// Treat only printable ASCII as printable
    #[arg(long = "ascii")]
    ascii: bool,

    /// Read defaults from a TOML file
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Output the quoted arguments as a JSON array
    #[arg(long = "json")]
    json: bool,

    /// Arguments to quote; lines from stdin when omitted
    #[arg()]
    args: Vec<String>,
}

/// Flags override `env_style`, which overrides the config file.
fn resolve_options(cli: &Cli, env_style: Option<String>) -> Result<QuotingOptions, QuoteError> {
    let mut config = match &cli.config {
        Some(path) => QuotingConfig::load(path)?,
        None => QuotingConfig::default(),
    }
    .with_env_style(env_style);

    if cli.left_quote.is_some() || cli.right_quote.is_some() {
        config.left_quote = cli.left_quote;
        config.right_quote = cli.right_quote;
        config.style = None;
    }
    if let Some(style) = &cli.style {
        config.style = Some(style.clone());
    }
    config.elide_null_bytes |= cli.elide_null_bytes;
    config.elide_outer_quotes |= cli.elide_outer_quotes;
    config.split_trigraphs |= cli.split_trigraphs;
    config.quote_these_too.extend(cli.quote_chars.iter());
    if cli.ascii {
        config.printability = quotearg::Printability::Ascii;
    }

    config.into_options(QuotingStyle::ShellEscape)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let options = match resolve_options(&cli, std::env::var(QUOTING_STYLE_ENV).ok()) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("quotearg: {}", e);
            std::process::exit(2);
        }
    };
    tracing::debug!(style = %options.style, flags = ?options.flags, "resolved options");

    let args = if !cli.args.is_empty() {
        cli.args.clone()
    } else if std::io::stdin().is_terminal() {
        eprintln!("quotearg: no arguments given. Pass ARGS or pipe lines via stdin.");
        std::process::exit(2);
    } else {
        let mut lines = Vec::new();
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => lines.push(line),
                Err(e) => {
                    eprintln!("quotearg: cannot read stdin: {}", e);
                    std::process::exit(2);
                }
            }
        }
        lines
    };

    let quoted: Vec<String> = args.iter().map(|arg| options.quote(arg)).collect();

    if cli.json {
        println!("{}", serde_json::json!(quoted));
    } else {
        for line in &quoted {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotearg::{Printability, QuotingFlags};
    use std::fs;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("quotearg").chain(args.iter().copied())).unwrap()
    }

    fn config_file(tmp: &TempDir, toml: &str) -> String {
        let path = tmp.path().join("quotearg.toml");
        fs::write(&path, toml).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_default_style() {
        let options = resolve_options(&cli(&[]), None).unwrap();
        assert_eq!(options.style, QuotingStyle::ShellEscape);
        assert_eq!(options.flags, QuotingFlags::empty());
    }

    #[test]
    fn test_style_precedence() {
        let tmp = TempDir::new().unwrap();
        let path = config_file(&tmp, "style = \"c\"\nsplit-trigraphs = true\n");

        let options = resolve_options(&cli(&["--config", &path]), None).unwrap();
        assert_eq!(options.style, QuotingStyle::C);
        assert_eq!(options.flags, QuotingFlags::SPLIT_TRIGRAPHS);

        let env = Some("locale".to_string());
        let options = resolve_options(&cli(&["--config", &path]), env.clone()).unwrap();
        assert_eq!(options.style, QuotingStyle::Locale);
        assert_eq!(options.flags, QuotingFlags::SPLIT_TRIGRAPHS);

        let options = resolve_options(&cli(&["--config", &path, "-s", "escape"]), env).unwrap();
        assert_eq!(options.style, QuotingStyle::Escape);

        let options = resolve_options(&cli(&["-s", "shell"]), Some(String::new())).unwrap();
        assert_eq!(options.style, QuotingStyle::Shell);
        let options = resolve_options(&cli(&[]), Some(String::new())).unwrap();
        assert_eq!(options.style, QuotingStyle::ShellEscape);
    }

    #[test]
    fn test_custom_quotes_replace_configured_style() {
        let tmp = TempDir::new().unwrap();
        let path = config_file(&tmp, "style = \"c\"\n");
        let args: [&str; 6] = ["--config", &path, "--left-quote", "<", "--right-quote", ">"];

        let options = resolve_options(&cli(&args), Some("shell".to_string())).unwrap();
        assert_eq!(options.style, QuotingStyle::Custom);
        assert_eq!(options.quote("a>"), "<a\\>>");

        let err = resolve_options(&cli(&["--left-quote", "<"]), None).unwrap_err();
        assert!(matches!(err, QuoteError::MissingCustomQuotes));

        let args = ["--left-quote", "<", "--right-quote", ">", "-s", "c"];
        let options = resolve_options(&cli(&args), None).unwrap();
        assert_eq!(options.style, QuotingStyle::C);
    }

    #[test]
    fn test_quote_chars_merge_with_config() {
        let tmp = TempDir::new().unwrap();
        let path = config_file(
            &tmp,
            "style = \"shell-always\"\nquote-these-too = \":\"\nprintability = \"unicode\"\n",
        );

        let args: [&str; 5] = ["--config", &path, "-q", "=", "--ascii"];
        let options = resolve_options(&cli(&args), None).unwrap();
        assert!(options.quote_these_too.contains(u32::from(':')));
        assert!(options.quote_these_too.contains(u32::from('=')));
        assert!(!options.quote_these_too.contains(u32::from('a')));
        assert_eq!(options.printability, Printability::Ascii);
    }

    #[test]
    fn test_flags_combine_with_config() {
        let tmp = TempDir::new().unwrap();
        let path = config_file(&tmp, "elide-null-bytes = true\n");

        let options =
            resolve_options(&cli(&["--config", &path, "--elide-outer-quotes"]), None).unwrap();
        assert_eq!(
            options.flags,
            QuotingFlags::ELIDE_NULL_BYTES | QuotingFlags::ELIDE_OUTER_QUOTES
        );
    }

    #[test]
    fn test_config_errors() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.toml").display().to_string();
        let err = resolve_options(&cli(&["--config", &missing]), None).unwrap_err();
        assert!(matches!(err, QuoteError::ConfigRead { .. }));

        let path = config_file(&tmp, "colour = \"red\"\n");
        let err = resolve_options(&cli(&["--config", &path]), None).unwrap_err();
        assert!(matches!(err, QuoteError::ConfigParse(_)));

        let err = resolve_options(&cli(&["-s", "fancy"]), None).unwrap_err();
        assert!(matches!(err, QuoteError::UnknownStyle(_)));
    }
}
