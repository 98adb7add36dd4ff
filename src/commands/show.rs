//! `mkconf show`
//!
//! Lists every setting of every configuration (or of one) with its resolved
//! value and where that value comes from.

use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::path::Path;

use super::{find_configuration, load_project};
use crate::cell::AnyCell;
use crate::project::{ConfId, Project};
use crate::ui::Table;

/// Where a resolved value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Override,
    Inherited,
    Default,
}

impl Origin {
    fn label(self) -> ColoredString {
        match self {
            Origin::Override => "override".yellow(),
            Origin::Inherited => "inherited".cyan(),
            Origin::Default => "default".dimmed(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SettingView {
    pub configuration: String,
    pub setting: String,
    pub value: String,
    pub origin: Origin,
}

fn origin(project: &Project, cell: AnyCell) -> Origin {
    if project.cells.any_modified(cell) {
        Origin::Override
    } else if project.cells.any_inherits(cell) {
        Origin::Inherited
    } else {
        Origin::Default
    }
}

/// One row per scalar and list setting of `id`.
pub fn collect_settings(project: &Project, id: ConfId) -> Vec<SettingView> {
    let Some(conf) = project.configuration(id) else {
        return Vec::new();
    };
    let mut rows = Vec::new();
    for (setting, cell) in conf.aux.fields() {
        rows.push(SettingView {
            configuration: conf.name.clone(),
            setting,
            value: project.cells.any_display(cell),
            origin: origin(project, cell),
        });
    }
    for (setting, list) in conf.aux.lists() {
        rows.push(SettingView {
            configuration: conf.name.clone(),
            setting,
            value: list.value().join(", "),
            origin: if list.modified() {
                Origin::Override
            } else {
                Origin::Default
            },
        });
    }
    rows
}

pub fn run_show(
    path: &Path,
    configuration: Option<&str>,
    json: bool,
    overrides_only: bool,
) -> Result<()> {
    let project = load_project(path)?;
    let ids: Vec<ConfId> = match configuration {
        Some(name) => vec![find_configuration(&project, name)?],
        None => project.configurations().map(|(id, _)| id).collect(),
    };

    let rows: Vec<SettingView> = ids
        .into_iter()
        .flat_map(|id| collect_settings(&project, id))
        .filter(|row| !overrides_only || row.origin == Origin::Override)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{} {}", "⚙".cyan(), path.display().to_string().bold());
    let mut table = Table::new(&["Configuration", "Setting", "Value", "Origin"]);
    for row in rows {
        table.add_row(vec![
            row.configuration,
            row.setting,
            row.value,
            row.origin.label().to_string(),
        ]);
    }
    if table.is_empty() {
        println!("   {}", "No settings to show".dimmed());
    } else {
        table.print();
    }
    Ok(())
}
