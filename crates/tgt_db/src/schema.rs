use rust_embed::RustEmbed;
use sqlx::{Executor, MySqlPool};
use std::str;

use crate::error::{Error, Result};

#[derive(RustEmbed)]
#[folder = "schema/"]
struct SchemaAssets;

/// Tables in reverse dependency order, for `--reset`.
const DROP_ORDER: [&str; 3] = ["Tg_Users", "TG", "User_Profile"];

/// Drops the three workflow tables. Existing data is lost.
pub async fn drop_tables(pool: &MySqlPool) -> Result<()> {
    for table in DROP_ORDER {
        pool.execute(format!("DROP TABLE IF EXISTS {table}").as_str())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
    }
    Ok(())
}

/// Reads the build order and applies every included SQL file in sequence.
///
/// MySQL commits implicitly around DDL, so statements are sent one at a
/// time instead of inside a transaction.
pub async fn rebuild_database(pool: &MySqlPool) -> Result<Vec<String>> {
    let script = assemble_script()?;
    let mut applied = Vec::new();

    for statement in split_statements(&script) {
        pool.execute(statement.as_str())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;
        applied.push(statement);
    }

    Ok(applied)
}

/// Concatenates the build order manifest and everything it includes.
fn assemble_script() -> Result<String> {
    let manifest = get_file_content("00_build_order.sql")?;
    let mut full_script = String::new();

    for line in manifest.lines() {
        let trimmed = line.trim();

        // Parse: -- @include folder/file.sql
        if let Some(path) = parse_include_directive(trimmed) {
            tracing::debug!(path, "including schema file");
            full_script.push_str(&get_file_content(path)?);
            full_script.push('\n');
        } else if !trimmed.starts_with("--") {
            full_script.push_str(line);
            full_script.push('\n');
        }
    }

    Ok(full_script)
}

fn get_file_content(path: &str) -> Result<String> {
    let file = SchemaAssets::get(path).ok_or_else(|| Error::MissingSchemaAsset(path.to_string()))?;
    str::from_utf8(file.data.as_ref())
        .map(str::to_string)
        .map_err(|e| Error::MissingSchemaAsset(format!("{path}: {e}")))
}

fn parse_include_directive(line: &str) -> Option<&str> {
    if line.starts_with("--") && line.contains("@include") {
        line.split_whitespace().last()
    } else {
        None
    }
}

fn split_statements(script: &str) -> Vec<String> {
    script
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .map(str::to_string)
        .collect()
}
