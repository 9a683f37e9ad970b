//! Accounts command

use anyhow::Result;
use finboard_core::{Account, Dashboard, FinanceApi, Panel};

use super::{emit, finish, panel_lines, section, Output};

pub async fn cmd_accounts<A: FinanceApi>(dash: &Dashboard<A>, output: Output) -> Result<()> {
    let panel = dash.accounts_view().await;
    emit(output, &panel, render_accounts)
}

pub fn render_accounts(panel: &Panel<Vec<Account>>) -> String {
    let mut lines = section("🏦 Accounts");
    lines.extend(panel_lines(panel, |accounts| {
        if accounts.is_empty() {
            return vec!["   No accounts linked.".to_string()];
        }
        accounts.iter().map(account_line).collect()
    }));
    lines.push(String::new());
    finish(lines)
}

/// `Name (type) ••1234 · Institution · USD`, skipping absent parts
pub fn account_line(account: &Account) -> String {
    let mut line = format!("   {} ({})", account.name, account.account_type);
    if let Some(mask) = &account.mask {
        line.push_str(&format!(" ••{}", mask));
    }
    if let Some(institution) = &account.institution {
        line.push_str(&format!(" · {}", institution));
    }
    line.push_str(&format!(" · {}", account.currency));
    line
}
