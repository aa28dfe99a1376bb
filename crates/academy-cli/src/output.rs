//! Terminal rendering for catalog lists, details and the dashboard summary.

use crate::truncate_string;
use academy_api_client::{CatalogListResult, CatalogRecord};
use academy_core::models::{CatalogListParams, UserProfile};
use academy_core::{PageWindow, Role};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

pub const NO_CATALOGS: &str = "No catalogs found.";
pub const DEMO_DATA_NOTICE: &str = "API unavailable, showing demo data.";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    use anyhow::Context;
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Catalog table with actions column and pagination footer.
pub fn catalog_table(
    result: &CatalogListResult,
    params: &CatalogListParams,
    can_delete: bool,
) -> String {
    let mut out = String::new();
    if result.is_fallback() {
        let _ = writeln!(out, "{}", DEMO_DATA_NOTICE);
    }

    if result.page.items.is_empty() {
        out.push_str(NO_CATALOGS);
        return out;
    }

    let actions = if can_delete { "view, delete" } else { "view" };
    let _ = writeln!(
        out,
        "{:<36}  {:<32}  {:<16}  {:<24}  {:<16}  {}",
        "ID", "NAME", "SECTOR", "FILE", "CREATED", "ACTIONS"
    );
    for catalog in &result.page.items {
        let _ = writeln!(
            out,
            "{:<36}  {:<32}  {:<16}  {:<24}  {:<16}  {}",
            catalog.id.to_string(),
            truncate_string(&catalog.name, 32),
            truncate_string(catalog.sector.as_deref().unwrap_or("-"), 16),
            truncate_string(catalog.file_name.as_deref().unwrap_or("-"), 24),
            catalog.created_at.format(DATE_FORMAT).to_string(),
            actions,
        );
    }

    let window = PageWindow::compute(
        params.effective_page(),
        params.effective_limit(),
        result.page.total,
    );
    out.push('\n');
    out.push_str(&list_footer(&window));
    out
}

pub fn list_footer(window: &PageWindow) -> String {
    let mut out = format!(
        "Total: {} catalog(s)\nShowing {}-{} of {} (page {}/{})",
        window.total, window.from, window.to, window.total, window.page, window.total_pages
    );
    let mut hints = Vec::new();
    if window.has_previous() {
        hints.push(format!("previous: --page {}", window.page - 1));
    }
    if window.has_next() {
        hints.push(format!("next: --page {}", window.page + 1));
    }
    if !hints.is_empty() {
        let _ = write!(out, "\n{}", hints.join(", "));
    }
    out
}

/// Detail block for a single catalog. Unvalidated payloads show whatever
/// fields they carry.
pub fn catalog_detail(record: &CatalogRecord, can_delete: bool) -> String {
    let created = match record {
        CatalogRecord::Validated(catalog) => catalog.created_at.format(DATE_FORMAT).to_string(),
        CatalogRecord::Unvalidated(raw) => raw
            .get("createdAt")
            .and_then(Value::as_str)
            .unwrap_or("-")
            .to_string(),
    };

    let mut out = String::new();
    let _ = writeln!(out, "Name:    {}", record.name().unwrap_or("-"));
    let _ = writeln!(
        out,
        "Sector:  {}",
        record
            .sector()
            .map(|s| format!("[{}]", s))
            .unwrap_or_else(|| "-".to_string())
    );
    let _ = writeln!(out, "File:    {}", record.file_name().unwrap_or("-"));
    let _ = writeln!(out, "Created: {}", created);
    if !record.is_validated() {
        let _ = writeln!(out, "(response did not match the catalog schema)");
    }
    if can_delete {
        if let Some(id) = record.id() {
            let _ = writeln!(out, "Delete:  academy delete {}", id);
        }
    }
    out.trim_end().to_string()
}

/// Dashboard summary for the signed-in user.
pub fn profile_summary(profile: Option<&UserProfile>, role: Option<Role>) -> String {
    let mut out = String::new();
    match profile {
        Some(profile) => {
            let _ = writeln!(out, "Tenant:    {}", profile.tenant_label());
            let _ = writeln!(out, "Tenant ID: {}", profile.tenant_id);
            let _ = writeln!(out, "Sector:    {}", profile.sector.as_deref().unwrap_or("-"));
        }
        None => {
            let _ = writeln!(out, "Profile unavailable.");
        }
    }
    let _ = write!(out, "Role:      {}", role.map(Role::label).unwrap_or("-"));
    out
}
