use serde::Serialize;
use serde_json::Value;

use dell_ai_common::{App, DeployConfig, Model, Platform};

// Each record prints from an explicit, ordered (label, value) list so the
// detail views are stable and independent of serialization order.

pub fn model_fields(m: &Model) -> Vec<(&'static str, String)> {
    vec![
        ("ID", m.repo_name.clone()),
        ("Description", or_dash(&m.description)),
        ("License", or_dash(&m.license)),
        ("Creator", m.creator_type.clone().unwrap_or_else(dash)),
        ("Size", format_params(m.size)),
        ("System prompt", yes_no(m.has_system_prompt)),
        ("Multimodal", yes_no(m.is_multimodal)),
        ("Status", m.status.clone().unwrap_or_else(dash)),
    ]
}

pub fn platform_fields(p: &Platform) -> Vec<(&'static str, String)> {
    vec![
        ("SKU", p.id.clone()),
        ("Name", p.name.clone()),
        ("Vendor", p.vendor.clone().unwrap_or_else(dash)),
        ("Server", p.server.clone().unwrap_or_else(dash)),
        ("Product", p.product_name.clone().unwrap_or_else(dash)),
        ("GPU type", p.gpu_type.clone().unwrap_or_else(dash)),
        ("GPU memory", p.gpu_ram.clone().unwrap_or_else(dash)),
        ("GPU count", p.total_gpu_count.to_string()),
        ("GPU link", p.gpu_interconnect.clone().unwrap_or_else(dash)),
        ("East-west", p.interconnect_east_west.clone().unwrap_or_else(dash)),
        ("North-south", p.interconnect_north_south.clone().unwrap_or_else(dash)),
        ("Disabled", yes_no(p.disabled)),
    ]
}

pub fn app_fields(a: &App) -> Vec<(&'static str, String)> {
    vec![
        ("ID", a.id.clone()),
        ("Name", a.name.clone()),
        ("Description", or_dash(&a.description)),
        ("License", or_dash(&a.license)),
        ("Docs", a.docs.clone().unwrap_or_else(dash)),
        ("Tags", join_or_dash(&a.tags)),
        ("Models", join_or_dash(&a.recommended_models)),
    ]
}

pub fn print_ids(title: &str, ids: &[String], empty: &str) {
    println!("\n=== {title} ===\n");
    if ids.is_empty() {
        println!("{empty}");
        return;
    }
    for id in ids {
        println!("  {id}");
    }
    println!();
}

pub fn print_model_detail(model: &Model) {
    println!("\n=== Model Detail ===\n");
    print_fields(&model_fields(model));

    println!("\n  [Platforms]");
    if model.configs_deploy.is_empty() {
        println!("  (no deployable configurations)");
    } else {
        println!(
            "  {:<30} {:<6} {:<12} {:<12} {:<12}",
            "SKU", "GPUs", "Max input", "Max total", "Max prefill"
        );
        for (sku, configs) in &model.configs_deploy {
            for c in configs {
                println!(
                    "  {:<30} {:<6} {:<12} {:<12} {:<12}",
                    sku,
                    c.num_gpus,
                    opt(c.max_input_tokens()),
                    opt(c.max_total_tokens()),
                    opt(c.max_batch_prefill_tokens()),
                );
            }
        }
    }
    println!();
}

pub fn print_platform_detail(platform: &Platform) {
    println!("\n=== Platform Detail ===\n");
    print_fields(&platform_fields(platform));
    println!();
}

pub fn print_app_detail(app: &App) {
    println!("\n=== App Detail ===\n");
    print_fields(&app_fields(app));

    for component in &app.components {
        let req = if component.required { "required" } else { "optional" };
        println!("\n  [{}] ({req})", component.name);
        if !component.description.is_empty() {
            println!("  {}", component.description);
        }
        if !component.config.is_empty() {
            println!(
                "  {:<40} {:<10} {:<9} {:<20}",
                "Path", "Type", "Required", "Default"
            );
            for p in &component.config {
                println!(
                    "  {:<40} {:<10} {:<9} {:<20}",
                    p.helm_path,
                    p.param_type,
                    yes_no(p.required),
                    p.default.as_ref().map(|d| d.to_string()).unwrap_or_else(dash),
                );
            }
        }
        for s in &component.secrets {
            println!(
                "  {:<40} {:<10} {:<9} {:<20}",
                s.helm_path,
                "secret",
                yes_no(s.required),
                "-"
            );
        }
    }
    println!();
}

pub fn print_compat(model_id: &str, sku_id: &str, configs: &[DeployConfig]) {
    println!("\n=== {model_id} on {sku_id} ===\n");
    println!(
        "  {:<6} {:<12} {:<12} {:<12}",
        "GPUs", "Max input", "Max total", "Max prefill"
    );
    for c in configs {
        println!(
            "  {:<6} {:<12} {:<12} {:<12}",
            c.num_gpus,
            opt(c.max_input_tokens()),
            opt(c.max_total_tokens()),
            opt(c.max_batch_prefill_tokens()),
        );
    }
    println!();
}

/// Owner name followed by the full identity record.
pub fn format_user_info(info: &Value) -> serde_json::Result<String> {
    let name = info.get("name").and_then(Value::as_str).unwrap_or("Unknown");
    let pretty = serde_json::to_string_pretty(info)?;
    Ok(format!("Logged in as: {name}\nUser info: {pretty}"))
}

pub fn print_user_info(info: &Value) -> anyhow::Result<()> {
    println!("{}", format_user_info(info)?);
    Ok(())
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_fields(fields: &[(&'static str, String)]) {
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + 1;
    for (label, value) in fields {
        println!("  {:<width$} {}", format!("{label}:"), value, width = width);
    }
}

fn dash() -> String {
    "-".to_string()
}

fn or_dash(s: &str) -> String {
    if s.is_empty() {
        dash()
    } else {
        s.to_string()
    }
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        dash()
    } else {
        items.join(", ")
    }
}

fn yes_no(b: bool) -> String {
    let s = if b { "yes" } else { "no" };
    s.to_string()
}

fn opt(v: Option<u64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_else(dash)
}

fn format_params(n: u64) -> String {
    const B: u64 = 1_000_000_000;
    const M: u64 = 1_000_000;
    if n == 0 {
        dash()
    } else if n >= B {
        format!("{:.1}B params", n as f64 / B as f64)
    } else {
        format!("{:.1}M params", n as f64 / M as f64)
    }
}
