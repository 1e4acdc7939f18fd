//! Output rendering for netopsctl
//!
//! Tables are drawn with comfy-table, summaries are colored, and reports can
//! be rendered as Markdown or as a standalone HTML page.

use anyhow::Result;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use netops_core::inventory::normalize::title_case;
use netops_core::{
    Device, InventoryMismatch, InventoryReport, InventorySnapshot, ToolDefinition, Vlan,
    VlanMembership, VlanTable,
};
use netops_tools::LoadOrigin;
use serde::Serialize;
use std::fmt::Write as _;

const VLAN_CELL_WIDTH: usize = 50;
const MARKDOWN_VLAN_LIMIT: usize = 5;

/// JSON with object keys sorted, so repeated runs diff cleanly
pub fn to_stable_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

/// `VLAN 10, VLAN 20`, cut at 50 characters
pub fn vlan_cell(vlans: &[Vlan]) -> String {
    let joined = vlans
        .iter()
        .map(|v| format!("VLAN {}", v.id))
        .collect::<Vec<_>>()
        .join(", ");
    if joined.chars().count() > VLAN_CELL_WIDTH {
        let cut: String = joined.chars().take(VLAN_CELL_WIDTH).collect();
        format!("{}...", cut)
    } else {
        joined
    }
}

pub fn device_table(devices: &[&Device]) -> String {
    if devices.is_empty() {
        return "No devices found".to_string();
    }

    let mut table = new_table(&["NAME", "IP", "VENDOR", "OS", "ROLE", "VLANS"]);
    for device in devices {
        table.add_row(vec![
            device.name.clone(),
            device.ip.clone(),
            device.vendor.clone(),
            device.os.clone(),
            device.role.clone(),
            vlan_cell(&device.vlans),
        ]);
    }
    table.to_string()
}

pub fn vlan_members_table(vlan_id: u32, members: &[VlanMembership]) -> String {
    if members.is_empty() {
        return format!("No devices found on VLAN {}", vlan_id);
    }

    let mut table = new_table(&["NAME", "IP", "ROLE", "OS", "VLAN NAME"]);
    for member in members {
        table.add_row(vec![
            member.name.clone(),
            member.ip.clone(),
            member.role.clone(),
            member.os.clone(),
            member.vlan.name.clone(),
        ]);
    }
    table.to_string()
}

pub fn vlan_summary_table(vlans: &VlanTable) -> String {
    if vlans.vlans.is_empty() {
        return "No VLANs found".to_string();
    }

    let mut table = new_table(&["VLAN", "NAME", "DEVICES", "MEMBERS"]);
    for row in &vlans.vlans {
        let members = row
            .devices
            .iter()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            row.vlan_id.to_string(),
            row.vlan_name.clone(),
            row.devices.len().to_string(),
            members,
        ]);
    }
    table.to_string()
}

/// Render an expected/observed value without JSON quoting for strings
pub fn value_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn mismatch_table(mismatches: &[InventoryMismatch]) -> String {
    let mut table = new_table(&["DEVICE", "CATEGORY", "EXPECTED", "OBSERVED", "DETAILS"]);
    for m in mismatches {
        table.add_row(vec![
            m.device_name.clone(),
            m.category.to_string(),
            value_cell(&m.expected),
            value_cell(&m.observed),
            m.details.clone().unwrap_or_default(),
        ]);
    }
    table.to_string()
}

pub fn tool_table(definitions: &[ToolDefinition]) -> String {
    let mut table = new_table(&["NAME", "DESCRIPTION"]);
    for def in definitions {
        table.add_row(vec![def.name.clone(), def.description.clone()]);
    }
    table.to_string()
}

pub fn origin_label(origin: &LoadOrigin) -> String {
    match origin {
        LoadOrigin::Live => "live".to_string(),
        LoadOrigin::Fixture { reason } => format!("fixture ({})", reason),
    }
}

/// Colored terminal summary of a report
pub fn text_report(
    snapshot: &InventorySnapshot,
    report: &InventoryReport,
    origin: &LoadOrigin,
) -> String {
    let mut out = String::new();
    let failed = if report.failed > 0 {
        report.failed.to_string().red().bold()
    } else {
        report.failed.to_string().green()
    };

    let _ = writeln!(out, "{}", "Inventory Report".bold());
    let _ = writeln!(
        out,
        "Generated: {}  Source: {}  NetBox: {}",
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S"),
        snapshot.source,
        origin_label(origin)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "  Total devices:  {}", snapshot.len());
    let _ = writeln!(out, "  Passed:         {}", report.passed.to_string().green());
    let _ = writeln!(out, "  Failed:         {}", failed);
    let _ = writeln!(out, "  Not run:        {}", report.not_run);

    for (dimension, counts) in &report.groups {
        let line = counts
            .iter()
            .map(|(k, n)| format!("{} {}", k, n))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "  By {:<12}{}", format!("{}:", dimension), line);
    }

    let _ = writeln!(out);
    if report.mismatches.is_empty() {
        let _ = writeln!(out, "{}", "No mismatches found".green());
    } else {
        let _ = writeln!(out, "{}", "Mismatches".yellow().bold());
        let _ = writeln!(out, "{}", mismatch_table(&report.mismatches));
    }
    out
}

fn markdown_vlans(vlans: &[Vlan]) -> String {
    let mut cell = vlans
        .iter()
        .take(MARKDOWN_VLAN_LIMIT)
        .map(|v| v.id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if vlans.len() > MARKDOWN_VLAN_LIMIT {
        let _ = write!(cell, " +{} more", vlans.len() - MARKDOWN_VLAN_LIMIT);
    }
    cell
}

pub fn markdown_report(
    snapshot: &InventorySnapshot,
    report: &InventoryReport,
    origin: &LoadOrigin,
) -> String {
    let mut lines: Vec<String> = vec![
        "# Inventory Report".to_string(),
        String::new(),
        format!(
            "**Generated:** {}",
            snapshot.generated_at.format("%Y-%m-%d %H:%M:%S")
        ),
        format!("**Source:** {}", snapshot.source),
        format!("**NetBox:** {}", origin_label(origin)),
        String::new(),
        "## Summary".to_string(),
        String::new(),
        format!("- **Total Devices:** {}", snapshot.len()),
        format!("- **Validation Passed:** {}", report.passed),
        format!("- **Validation Failed:** {}", report.failed),
        format!("- **Not Run:** {}", report.not_run),
        String::new(),
    ];

    if !report.groups.is_empty() {
        lines.push("## Device Groupings".to_string());
        lines.push(String::new());
        for (dimension, counts) in &report.groups {
            lines.push(format!("### By {}", title_case(dimension)));
            lines.push(String::new());
            for (key, count) in counts {
                lines.push(format!("- **{}:** {}", key, count));
            }
            lines.push(String::new());
        }
    }

    if !report.mismatches.is_empty() {
        lines.push("## Mismatches".to_string());
        lines.push(String::new());
        lines.push("| Device | Category | Expected | Observed | Details |".to_string());
        lines.push("|--------|----------|----------|----------|---------|".to_string());
        for m in &report.mismatches {
            lines.push(format!(
                "| {} | {} | {} | {} | {} |",
                m.device_name,
                m.category,
                value_cell(&m.expected),
                value_cell(&m.observed),
                m.details.as_deref().unwrap_or("")
            ));
        }
        lines.push(String::new());
    }

    lines.push("## Device Inventory".to_string());
    lines.push(String::new());
    lines.push("| Name | IP | Vendor | OS | Role | VLANs |".to_string());
    lines.push("|------|----|--------|----|------|-------|".to_string());
    for d in &snapshot.devices {
        lines.push(format!(
            "| {} | {} | {} | {} | {} | {} |",
            d.name,
            d.ip,
            d.vendor,
            d.os,
            d.role,
            markdown_vlans(&d.vlans)
        ));
    }

    lines.join("\n")
}

pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// First `**text**` pair becomes <strong>
fn inline_html(text: &str) -> String {
    let escaped = html_escape(text);
    if let Some(start) = escaped.find("**") {
        if let Some(len) = escaped[start + 2..].find("**") {
            let end = start + 2 + len;
            return format!(
                "{}<strong>{}</strong>{}",
                &escaped[..start],
                &escaped[start + 2..end],
                &escaped[end + 2..]
            );
        }
    }
    escaped
}

fn table_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim().trim_start_matches('|').trim_end_matches('|');
    trimmed.split('|').map(|c| c.trim().to_string()).collect()
}

fn is_separator_row(line: &str) -> bool {
    table_cells(line)
        .iter()
        .all(|c| !c.is_empty() && c.chars().all(|ch| ch == '-' || ch == ':'))
}

#[derive(PartialEq)]
enum Block {
    None,
    List,
    TableHead,
    TableBody,
}

fn close_block(html: &mut Vec<String>, block: &mut Block) {
    match block {
        Block::List => html.push("</ul>".to_string()),
        Block::TableHead => html.push("</thead></table>".to_string()),
        Block::TableBody => html.push("</tbody></table>".to_string()),
        Block::None => {}
    }
    *block = Block::None;
}

/// Line-wise conversion of the Markdown produced by [`markdown_report`]
pub fn markdown_to_html(markdown: &str) -> String {
    let mut html = Vec::new();
    let mut block = Block::None;

    for line in markdown.lines() {
        if line.starts_with('|') {
            match block {
                Block::TableHead if is_separator_row(line) => {
                    html.push("</thead><tbody>".to_string());
                    block = Block::TableBody;
                }
                Block::TableBody => {
                    let cells: String = table_cells(line)
                        .iter()
                        .map(|c| format!("<td>{}</td>", inline_html(c)))
                        .collect();
                    html.push(format!("<tr>{}</tr>", cells));
                }
                _ => {
                    close_block(&mut html, &mut block);
                    let cells: String = table_cells(line)
                        .iter()
                        .map(|c| format!("<th>{}</th>", inline_html(c)))
                        .collect();
                    html.push(format!("<table><thead><tr>{}</tr>", cells));
                    block = Block::TableHead;
                }
            }
            continue;
        }

        if let Some(item) = line.strip_prefix("- ") {
            if block != Block::List {
                close_block(&mut html, &mut block);
                html.push("<ul>".to_string());
                block = Block::List;
            }
            html.push(format!("<li>{}</li>", inline_html(item)));
            continue;
        }

        close_block(&mut html, &mut block);
        if let Some(text) = line.strip_prefix("### ") {
            html.push(format!("<h3>{}</h3>", inline_html(text)));
        } else if let Some(text) = line.strip_prefix("## ") {
            html.push(format!("<h2>{}</h2>", inline_html(text)));
        } else if let Some(text) = line.strip_prefix("# ") {
            html.push(format!("<h1>{}</h1>", inline_html(text)));
        } else if !line.trim().is_empty() {
            html.push(format!("<p>{}</p>", inline_html(line)));
        }
    }
    close_block(&mut html, &mut block);

    html.join("\n")
}

const HTML_STYLE: &str = r#"
    body { font-family: -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; line-height: 1.6; color: #333; max-width: 1200px; margin: 0 auto; padding: 20px; background-color: #f5f5f5; }
    .container { background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
    h1 { color: #2c3e50; border-bottom: 3px solid #3498db; padding-bottom: 10px; }
    h2 { color: #34495e; margin-top: 30px; }
    h3 { color: #7f8c8d; margin-top: 20px; }
    table { width: 100%; border-collapse: collapse; margin: 20px 0; }
    th, td { border: 1px solid #ddd; padding: 12px; text-align: left; }
    th { background-color: #3498db; color: white; font-weight: 600; }
    tr:nth-child(even) { background-color: #f9f9f9; }
    .footer { margin-top: 40px; padding-top: 20px; border-top: 1px solid #ddd; color: #7f8c8d; font-size: 0.9em; }
"#;

/// Standalone HTML page wrapping a Markdown report
pub fn html_report(markdown: &str, title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n<title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n<div class=\"container\">\n{content}\n<div class=\"footer\">Generated by netopsctl {version}</div>\n</div>\n</body>\n</html>\n",
        title = html_escape(title),
        style = HTML_STYLE,
        content = markdown_to_html(markdown),
        version = netops_core::VERSION,
    )
}
