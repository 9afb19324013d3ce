//! Column steps for the `apply` command.
//!
//! Steps run in a fixed order: parse, lookup, bin, render. Within one kind they
//! run in the order given on the command line.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use fmtmap_core::{FormatCatalog, FormatRegistry};
use fmtmap_frame::{bin_column, lookup_column, parse_column, render_column};
use polars::prelude::DataFrame;
use tracing::info;

/// `COL=NAME` or `COL:TARGET=NAME`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAssignment {
    pub column: String,
    pub target: Option<String>,
    pub name: String,
}

impl ColumnAssignment {
    /// Output column; the source column is replaced when no target is given.
    pub fn target(&self) -> &str {
        self.target.as_deref().unwrap_or(&self.column)
    }
}

impl FromStr for ColumnAssignment {
    type Err = String;

    fn from_str(text: &str) -> std::result::Result<Self, Self::Err> {
        let (columns, name) = text
            .split_once('=')
            .ok_or_else(|| format!("expected COL=NAME, got '{text}'"))?;
        let (column, target) = match columns.split_once(':') {
            Some((column, target)) => (column.trim(), Some(target.trim())),
            None => (columns.trim(), None),
        };
        let name = name.trim();
        if column.is_empty() || name.is_empty() || target.is_some_and(str::is_empty) {
            return Err(format!("expected COL=NAME, got '{text}'"));
        }
        Ok(Self {
            column: column.to_string(),
            target: target.map(String::from),
            name: name.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Parse,
    Lookup,
    Bin,
    Render,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StepKind::Parse => "parse",
            StepKind::Lookup => "lookup",
            StepKind::Bin => "bin",
            StepKind::Render => "render",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub kind: StepKind,
    pub assignment: ColumnAssignment,
}

/// Outcome of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub kind: StepKind,
    pub column: String,
    pub target: String,
    pub name: String,
    pub written: usize,
}

/// Orders steps by kind.
pub fn plan(
    parse: &[ColumnAssignment],
    lookup: &[ColumnAssignment],
    bin: &[ColumnAssignment],
    render: &[ColumnAssignment],
) -> Vec<Step> {
    let groups = [
        (StepKind::Parse, parse),
        (StepKind::Lookup, lookup),
        (StepKind::Bin, bin),
        (StepKind::Render, render),
    ];
    groups
        .into_iter()
        .flat_map(|(kind, assignments)| {
            assignments.iter().map(move |assignment| Step {
                kind,
                assignment: assignment.clone(),
            })
        })
        .collect()
}

pub fn apply_steps(
    df: &mut DataFrame,
    steps: &[Step],
    catalog: Option<&FormatCatalog>,
    registry: &FormatRegistry,
) -> Result<Vec<StepReport>> {
    let mut reports = Vec::with_capacity(steps.len());
    for step in steps {
        let ColumnAssignment { column, name, .. } = &step.assignment;
        let target = step.assignment.target();
        let written = match step.kind {
            StepKind::Parse => {
                let definition = registry.get(name)?;
                parse_column(df, column, target, definition.as_ref())
            }
            StepKind::Render => {
                let definition = registry.get(name)?;
                render_column(df, column, target, definition.as_ref())
            }
            StepKind::Lookup => {
                let catalog = require_catalog(catalog, step)?;
                lookup_column(df, column, target, catalog.lookup_table(name)?)
            }
            StepKind::Bin => {
                let catalog = require_catalog(catalog, step)?;
                bin_column(df, column, target, catalog.bin_spec(name)?)
            }
        }
        .with_context(|| format!("{} {column}={name}", step.kind))?;
        info!(
            step = %step.kind,
            column = column.as_str(),
            target,
            name = name.as_str(),
            written,
            "applied step"
        );
        reports.push(StepReport {
            kind: step.kind,
            column: column.clone(),
            target: target.to_string(),
            name: name.clone(),
            written,
        });
    }
    Ok(reports)
}

fn require_catalog<'a>(
    catalog: Option<&'a FormatCatalog>,
    step: &Step,
) -> Result<&'a FormatCatalog> {
    catalog.ok_or_else(|| {
        anyhow!(
            "--{} {}={} needs --catalog",
            step.kind,
            step.assignment.column,
            step.assignment.name
        )
    })
}
