//! Settings command: shows where the dashboard reads from and how it displays

use anyhow::Result;
use finboard_core::{config::default_config_path, DashboardConfig};

use super::{emit, finish, section, Output};

pub fn cmd_settings(config: &DashboardConfig, output: Output) -> Result<()> {
    emit(output, config, render_settings)
}

pub fn render_settings(config: &DashboardConfig) -> String {
    let override_path = default_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(no config directory)".to_string());

    let mut lines = section("⚙️  Settings");
    lines.push(format!("   API base:          {}", config.api.base_url));
    lines.push(format!("   Request timeout:   {}s", config.api.timeout.as_secs()));
    lines.push(format!(
        "   Cache TTL:         {}s transactions, {}s aggregates",
        config.cache.transactions_ttl.as_secs(),
        config.cache.aggregates_ttl.as_secs()
    ));
    lines.push(String::new());
    lines.push(format!(
        "   Currency:          {} ({})",
        config.display.currency, config.display.currency_symbol
    ));
    lines.push(format!("   Timezone:          {}", config.display.timezone));
    lines.push(format!("   Top categories:    {}", config.display.top_categories));
    lines.push(format!("   Trend months:      {}", config.display.trend_months));
    lines.push(format!(
        "   Page size:         {}",
        config.display.transactions_page_limit
    ));
    lines.push(String::new());
    lines.push(format!("   Config override:   {}", override_path));
    lines.push(String::new());
    finish(lines)
}
