//! Implementation of the `crm-env schema` command.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::cli::output::{list_table, output, render_list, CommandOutput};
use crate::infrastructure::config::{KeySpec, Schema, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VisibilityFilter {
    Server,
    Client,
}

#[derive(Args, Debug, Default)]
pub struct SchemaArgs {
    /// Only list keys on one side of the boundary
    #[arg(long, value_enum)]
    pub visibility: Option<VisibilityFilter>,
}

#[derive(Debug, Serialize)]
pub struct SchemaRow {
    pub key: &'static str,
    pub visibility: String,
    pub kind: String,
    pub requirement: String,
    pub default: Option<&'static str>,
    pub secret: bool,
}

impl SchemaRow {
    fn new(visibility: Visibility, spec: &KeySpec) -> Self {
        Self {
            key: spec.key,
            visibility: visibility.to_string(),
            kind: spec.kind.to_string(),
            requirement: spec.requirement.to_string(),
            default: spec.default_value(),
            secret: spec.secret,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct SchemaOutput {
    pub rows: Vec<SchemaRow>,
}

impl CommandOutput for SchemaOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["key", "visibility", "kind", "requirement", "default"]);
        for row in &self.rows {
            let key = if row.secret {
                format!("{} (secret)", row.key)
            } else {
                row.key.to_string()
            };
            table.add_row(vec![
                key,
                row.visibility.clone(),
                row.kind.clone(),
                row.requirement.clone(),
                row.default.unwrap_or("-").to_string(),
            ]);
        }
        render_list("key", &table, self.rows.len())
    }
}

pub fn execute(args: &SchemaArgs, json_mode: bool) -> Result<()> {
    output(&run(args), json_mode);
    Ok(())
}

pub fn run(args: &SchemaArgs) -> SchemaOutput {
    let schemas = match args.visibility {
        Some(VisibilityFilter::Server) => vec![Schema::SERVER],
        Some(VisibilityFilter::Client) => vec![Schema::CLIENT],
        None => vec![Schema::SERVER, Schema::CLIENT],
    };

    let rows = schemas
        .iter()
        .flat_map(|schema| schema.keys.iter().map(|spec| SchemaRow::new(schema.visibility, spec)))
        .collect();

    SchemaOutput { rows }
}
