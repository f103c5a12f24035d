//! Rendering items, trees and summaries in the selected output format

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::format_alias;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, ProductKind, StockSummary, Warehouse};
use crate::entities::Product;

/// Pick the output format: the command line wins, then the config file
pub fn effective_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    config
        .default_format
        .as_deref()
        .and_then(|name| OutputFormat::from_str(name, true).ok())
        .unwrap_or(OutputFormat::Auto)
}

/// One listing line for an in-stock item
#[derive(Debug, Clone, Serialize)]
pub struct ProductRow {
    pub alias: String,
    pub id: String,
    pub kind: ProductKind,
    pub name: String,
    pub manufacturer: String,
    pub year: i32,
    pub price: f64,
    /// Material for details, component names for composites
    pub extra: String,
    pub created: DateTime<Utc>,
}

impl ProductRow {
    pub fn new(product: &Product, warehouse: &Warehouse) -> Self {
        let info = product.info();
        Self {
            alias: format_alias(warehouse.short_id(product.id())),
            id: product.id().to_string(),
            kind: product.kind(),
            name: info.name.clone(),
            manufacturer: info.manufacturer.clone(),
            year: info.year,
            price: info.price,
            extra: product.extra(),
            created: product.created(),
        }
    }

    fn cells(&self) -> [String; 7] {
        [
            self.alias.clone(),
            self.kind.label().to_string(),
            self.name.clone(),
            self.manufacturer.clone(),
            self.year.to_string(),
            self.price.to_string(),
            self.extra.clone(),
        ]
    }
}

const HEADER: [&str; 7] = [
    "ALIAS",
    "KIND",
    "NAME",
    "MANUFACTURER",
    "YEAR",
    "PRICE",
    "MATERIAL/COMPONENTS",
];

/// Build rows for a set of products
pub fn rows<'a>(
    products: impl IntoIterator<Item = &'a Product>,
    warehouse: &Warehouse,
) -> Vec<ProductRow> {
    products
        .into_iter()
        .map(|p| ProductRow::new(p, warehouse))
        .collect()
}

/// Render rows in a machine or human format
pub fn render_rows(rows: &[ProductRow], format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Auto | OutputFormat::Table => table(rows, false),
        OutputFormat::Md => table(rows, true),
        OutputFormat::Tsv => {
            let mut out = HEADER.join("\t");
            out.push('\n');
            for row in rows {
                out.push_str(&row.cells().join("\t"));
                out.push('\n');
            }
            out
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            for row in rows {
                writer.serialize(row).into_diagnostic()?;
            }
            let bytes = writer.into_inner().into_diagnostic()?;
            String::from_utf8(bytes).into_diagnostic()?
        }
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(rows).into_diagnostic()?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_yml::to_string(rows).into_diagnostic()?,
        OutputFormat::Id => rows.iter().map(|r| format!("{}\n", r.id)).collect(),
    };
    Ok(rendered)
}

fn table(rows: &[ProductRow], markdown: bool) -> String {
    let mut builder = Builder::default();
    builder.push_record(HEADER);
    for row in rows {
        builder.push_record(row.cells());
    }
    let mut table = builder.build();
    let mut rendered = if markdown {
        table.with(Style::markdown()).to_string()
    } else {
        table.with(Style::rounded()).to_string()
    };
    rendered.push('\n');
    rendered
}

/// Render the full stock, grouped by kind for human output
pub fn render_stock(
    warehouse: &Warehouse,
    kind: Option<ProductKind>,
    format: OutputFormat,
) -> Result<String> {
    if !matches!(format, OutputFormat::Auto | OutputFormat::Table | OutputFormat::Md) {
        return render_rows(&rows(warehouse.products(kind), warehouse), format);
    }

    let mut out = String::new();
    let kinds = ProductKind::all()
        .iter()
        .copied()
        .filter(|k| kind.map_or(true, |want| want == *k));
    for k in kinds {
        out.push_str(&format!("{}\n", style(k.plural()).bold()));
        let section = rows(warehouse.products(Some(k)), warehouse);
        if section.is_empty() {
            out.push_str(&format!("  {}\n", style("None").dim()));
        } else {
            out.push_str(&render_rows(&section, format)?);
        }
    }
    Ok(out)
}

/// Render one item: description for humans, full record otherwise
pub fn render_product(product: &Product, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(product).into_diagnostic()?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_yml::to_string(product).into_diagnostic()?,
        OutputFormat::Id => format!("{}\n", product.id()),
        _ => format!("{}\n", product.describe()),
    };
    Ok(rendered)
}

/// Render an item and everything it was built from as an indented tree
pub fn render_tree(product: &Product, alias: Option<u32>) -> String {
    let mut out = format!(
        "{} {} [{}]\n",
        style(format_alias(alias)).cyan(),
        product.name(),
        product.kind().label()
    );
    push_children(&mut out, product, "");
    out
}

fn push_children(out: &mut String, product: &Product, prefix: &str) {
    let children = product.components();
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        let branch = if is_last { "└─ " } else { "├─ " };
        let label = match child {
            Product::Detail(d) => format!("{} [Detail, {}]", d.info.name, d.material),
            other => format!("{} [{}]", other.name(), other.kind().label()),
        };
        out.push_str(&format!("{}{}{}\n", prefix, branch, label));

        let next_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
        push_children(out, child, &next_prefix);
    }
}

/// Render per-kind counts and total value
pub fn render_summary(summary: &StockSummary, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(summary).into_diagnostic()?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_yml::to_string(summary).into_diagnostic()?,
        _ => format!(
            "{}\n  Details:     {}\n  Assemblies:  {}\n  Mechanisms:  {}\n  Total items: {}\n  Total value: {}\n",
            style(format!("Warehouse {}", summary.warehouse)).bold(),
            summary.details,
            summary.assemblies,
            summary.mechanisms,
            summary.total_items(),
            summary.total_value
        ),
    };
    Ok(rendered)
}
