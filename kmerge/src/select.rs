use std::collections::BTreeMap;

use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use kubeconf::model::ContextSpec;
use tabular::{row, Table};

/// Single-shot blocking picker. `None` means the user cancelled.
pub fn pick(prompt: &str, items: &[String]) -> Result<Option<String>> {
    if items.is_empty() {
        return Ok(None);
    }

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()?;

    Ok(choice.map(|i| items[i].clone()))
}

/// Context picker with the cluster/user columns laid out like a table.
pub fn pick_context(contexts: &BTreeMap<String, ContextSpec>) -> Result<Option<String>> {
    if contexts.is_empty() {
        return Ok(None);
    }

    let names: Vec<&String> = contexts.keys().collect();

    let mut table = Table::new("{:<}  {:<}  {:<}");
    for (name, spec) in contexts {
        let cluster = &spec.cluster;
        let user = &spec.user;
        table.add_row(row!(name, format!("🖥  {cluster}"), format!("🧑 {user}")));
    }
    let rows: Vec<String> = table.to_string().lines().map(str::to_owned).collect();

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Context to delete")
        .items(&rows)
        .default(0)
        .interact_opt()?;

    Ok(choice.map(|i| names[i].clone()))
}
