//! Quill CLI
//!
//! Inline a stylesheet into an HTML document's `style` attributes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use quill_css::parse_stylesheet;
use quill_html::{dump_tree, parse_with_issues};
use quill_inline::{InlineOptions, Inliner};

/// Quill: inline CSS into HTML for email delivery
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
#[command(name = "quill")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Inline a stylesheet, print the result
    quill email.html --css email.css

    # Use the document's own <style> elements and drop them afterwards
    quill email.html --include-style-elements --remove-style-elements -o out.html

    # Load options from JSON, then ignore :first-child rules too
    quill email.html --css a.css --css b.css --config quill.json --ignore-pseudo first-child
"#)]
struct Cli {
    /// HTML document to inline into
    #[arg(value_name = "INPUT_HTML")]
    input: PathBuf,

    /// Stylesheet to inline (repeatable, concatenated in order)
    #[arg(long, value_name = "FILE")]
    css: Vec<PathBuf>,

    /// JSON file with inliner options
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Also inline the CSS of the document's <style> elements
    #[arg(long)]
    include_style_elements: bool,

    /// Remove <style> elements whose CSS was inlined
    #[arg(long)]
    remove_style_elements: bool,

    /// Walk rules inside @media and @supports blocks as if top-level
    #[arg(long)]
    flatten_conditional_rules: bool,

    /// Additional pseudo-class whose rules are never inlined (repeatable)
    #[arg(long, value_name = "NAME")]
    ignore_pseudo: Vec<String>,

    /// Print the parsed DOM tree to stderr
    #[arg(long)]
    dump_tree: bool,
}

impl Cli {
    /// Options from `--config`, with command-line flags layered on top.
    fn options(&self) -> Result<InlineOptions> {
        let mut options = match &self.config {
            Some(path) => {
                let text = read(path)?;
                serde_json::from_str(&text)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => InlineOptions::default(),
        };
        options.include_style_elements |= self.include_style_elements;
        options.remove_style_elements |= self.remove_style_elements;
        options.flatten_conditional_rules |= self.flatten_conditional_rules;
        for name in &self.ignore_pseudo {
            options = options.ignore_pseudo_class(name);
        }
        Ok(options)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = cli.options()?;

    let html = read(&cli.input)?;
    let mut css = String::new();
    for path in &cli.css {
        css.push_str(&read(path)?);
        css.push('\n');
    }

    if cli.dump_tree {
        print_debug(&html, &css);
    }

    let output = Inliner::new(options)
        .inline_html(&html, &css)
        .with_context(|| format!("failed to inline {}", cli.input.display()))?;

    match &cli.output {
        Some(path) => fs::write(path, output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{output}"),
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_debug(html: &str, css: &str) {
    let (tree, issues) = parse_with_issues(html);

    eprintln!("{}", "=== DOM Tree ===".bold());
    eprint!("{}", dump_tree(&tree, tree.root()));

    eprintln!("\n{}", "=== Stylesheet ===".bold());
    match parse_stylesheet(css) {
        Ok(stylesheet) => eprintln!("{} rules", stylesheet.rules.len()),
        Err(error) => eprintln!("{}", error.red()),
    }

    if !issues.is_empty() {
        eprintln!("\n{}", "=== Parse Issues ===".bold());
        for issue in &issues {
            eprintln!("  - {}", issue.message);
        }
    }
}
