//! `mailplate template …` — CRUD over the configured store.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use mailplate_core::{Placeholder, Template};

use crate::reject;

#[derive(Subcommand, Debug)]
pub enum TemplateCommand {
    /// List stored templates.
    List {
        /// Print names as a JSON array.
        #[arg(long)]
        json: bool,
    },
    /// Print a template's HTML.
    Show { name: String },
    /// Store a new template.
    Create {
        name: String,
        #[command(flatten)]
        source: HtmlSource,
    },
    /// Replace an existing template.
    Update {
        /// Name the template is currently stored under.
        name: String,
        /// New name for the template; defaults to <NAME>.
        #[arg(long = "name", value_name = "NEW_NAME")]
        new_name: Option<String>,
        #[command(flatten)]
        source: HtmlSource,
    },
    /// Delete a template.
    Delete { name: String },
}

/// Where the template HTML comes from.
#[derive(Args, Debug)]
pub struct HtmlSource {
    /// Read HTML from a file.
    #[arg(long, conflicts_with = "html")]
    file: Option<PathBuf>,
    /// Inline HTML.
    #[arg(long, required_unless_present = "file")]
    html: Option<String>,
}

impl HtmlSource {
    fn read(self) -> Result<String> {
        match (self.file, self.html) {
            (Some(path), _) => std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display())),
            (None, Some(html)) => Ok(html),
            (None, None) => anyhow::bail!("one of --file or --html is required"),
        }
    }
}

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "placeholders")]
    placeholders: String,
    #[tabled(rename = "bytes")]
    bytes: usize,
}

pub fn run(command: TemplateCommand) -> Result<()> {
    let app = crate::open()?;
    let templates = &app.templates;

    match command {
        TemplateCommand::List { json } => {
            let all = templates.list().map_err(reject)?;
            if json {
                let names: Vec<&str> = all.iter().map(|t| t.name.as_str()).collect();
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                print_table(all);
            }
        }
        TemplateCommand::Show { name } => {
            let template = templates.get_by_name(&name).map_err(reject)?;
            println!("{}", template.html_format);
        }
        TemplateCommand::Create { name, source } => {
            let html = source.read()?;
            let created = templates.create(Template::new(name, html)).map_err(reject)?;
            println!("{} Created template '{}'", "✓".green(), created.name);
        }
        TemplateCommand::Update {
            name,
            new_name,
            source,
        } => {
            let html = source.read()?;
            let incoming = new_name.unwrap_or_else(|| name.clone());
            let updated = templates
                .update(&name, Template::new(incoming, html))
                .map_err(reject)?;
            println!("{} Updated template '{}'", "✓".green(), updated.name);
        }
        TemplateCommand::Delete { name } => {
            let removed = templates.delete(&name).map_err(reject)?;
            println!("{} Deleted template '{}'", "✓".green(), removed.name);
        }
    }
    Ok(())
}

fn print_table(templates: Vec<Template>) {
    if templates.is_empty() {
        println!("No templates. Run 'mailplate init' to seed the Default template.");
        return;
    }
    let rows: Vec<TemplateRow> = templates
        .into_iter()
        .map(|t| TemplateRow {
            placeholders: placeholder_list(&t.placeholders()),
            bytes: t.html_format.len(),
            name: if t.is_protected() {
                format!("{} {}", t.name, "(protected)".dimmed())
            } else {
                t.name
            },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn placeholder_list(placeholders: &[Placeholder]) -> String {
    if placeholders.is_empty() {
        return "-".to_string();
    }
    placeholders
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
