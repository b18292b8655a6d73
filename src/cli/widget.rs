//! Terminal rendering and the interactive refresh loop for the rate widget.

use anyhow::Result;
use chrono::{DateTime, Local};
use comfy_table::Cell;
use console::{Key, Term};
use tracing::error;

use super::ui;
use crate::client::RatesClient;
use crate::core::currency::{display_name, symbol};
use crate::core::widget::WidgetState;

fn format_updated(timestamp: Option<DateTime<Local>>) -> String {
    timestamp.map_or_else(|| "—".to_string(), |t| t.format("%d %b %Y").to_string())
}

/// Renders the widget state as a styled table with header, error line,
/// loading placeholder and last-updated footer.
pub fn render_widget(state: &WidgetState) -> String {
    let title = format!("Exchange Rates (base currency: {})", state.base);
    let mut output = format!("{}\n\n", ui::style_text(&title, ui::StyleType::Title));

    if let Some(err) = &state.error {
        output.push_str(&format!("{}\n\n", ui::style_text(err, ui::StyleType::Error)));
    }

    if state.rows.is_empty() {
        if state.error.is_none() {
            output.push_str(&format!(
                "{}\n",
                ui::style_text("Loading the latest rates…", ui::StyleType::Subtle)
            ));
        }
    } else {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell(""),
            ui::header_cell("Currency"),
            ui::header_cell(&format!("1 {} =", state.base)),
        ]);

        for row in &state.rows {
            table.add_row(vec![
                Cell::new(symbol(row.code)),
                Cell::new(format!("{} ({})", display_name(row.code), row.code)),
                ui::rate_cell(row.rate),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');
    }

    output.push_str(&format!("\nRates: {}\n", format_updated(state.last_updated)));
    output
}

/// One full fetch cycle against the proxy. The spinner stands in for the
/// disabled refresh button: no input is read while the request is in flight.
async fn refresh(client: &RatesClient, state: &mut WidgetState) {
    state.begin_refresh();
    let spinner = ui::new_spinner("Refreshing rates…");

    match client.fetch_rates().await {
        Ok(payload) => state.apply_success(&payload, Local::now()),
        Err(e) => {
            error!(error = %e, "Rate fetch failed");
            state.apply_failure();
        }
    }

    spinner.finish_and_clear();
}

/// Fetch once, render, exit.
pub async fn show(client: &RatesClient) -> Result<()> {
    let mut state = WidgetState::new();
    refresh(client, &mut state).await;
    println!("{}", render_widget(&state));
    Ok(())
}

/// Interactive widget: fetches on start, then refreshes on `r` until `q`.
pub async fn watch(client: &RatesClient) -> Result<()> {
    let term = Term::stdout();
    let mut state = WidgetState::new();
    refresh(client, &mut state).await;

    loop {
        term.clear_screen()?;
        term.write_line(&render_widget(&state))?;
        term.write_line(&ui::style_text(
            "Press r to refresh, q to quit",
            ui::StyleType::Subtle,
        ))?;

        match term.read_key()? {
            Key::Char('r') | Key::Char('R') => refresh(client, &mut state).await,
            Key::Char('q') | Key::Char('Q') | Key::Escape => break,
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::RatesPayload;
    use std::collections::BTreeMap;

    fn successful_state(entries: &[(&str, f64)]) -> WidgetState {
        let payload = RatesPayload {
            base: "GBP".to_string(),
            rates: entries
                .iter()
                .map(|(c, r)| (c.to_string(), *r))
                .collect::<BTreeMap<_, _>>(),
        };
        let mut state = WidgetState::new();
        state.begin_refresh();
        state.apply_success(&payload, Local::now());
        state
    }

    #[test]
    fn test_initial_render_shows_loading_placeholder() {
        let state = WidgetState::new();
        let rendered = render_widget(&state);

        assert!(rendered.contains("Loading the latest rates…"));
        assert!(rendered.contains("Rates: —"));
    }

    #[test]
    fn test_rates_render_with_three_decimal_places() {
        let state = successful_state(&[("USD", 1.27), ("EUR", 1.17)]);
        let rendered = render_widget(&state);

        assert!(rendered.contains("United States Dollar (USD)"));
        assert!(rendered.contains("1.270"));
        assert!(rendered.contains("1.170"));
        // Currencies missing from the payload render as zero, not as gaps.
        assert!(rendered.contains("Swiss Franc (CHF)"));
        assert!(rendered.contains("0.000"));
        assert!(!rendered.contains("Loading the latest rates…"));
    }

    #[test]
    fn test_failed_refresh_keeps_previous_rows_visible() {
        let mut state = successful_state(&[("USD", 1.27)]);
        state.begin_refresh();
        state.apply_failure();

        let rendered = render_widget(&state);
        assert!(rendered.contains("Failed to load rates"));
        assert!(rendered.contains("1.270"));
        assert!(!rendered.contains("Loading the latest rates…"));
    }

    #[test]
    fn test_error_on_empty_widget_shows_no_placeholder() {
        let mut state = WidgetState::new();
        state.begin_refresh();
        state.apply_failure();

        let rendered = render_widget(&state);
        assert!(rendered.contains("Failed to load rates"));
        assert!(!rendered.contains("Loading the latest rates…"));
        assert!(rendered.contains("Rates: —"));
    }

    #[test]
    fn test_footer_shows_day_month_year_after_success() {
        let state = successful_state(&[("USD", 1.27)]);
        let rendered = render_widget(&state);

        let expected = Local::now().format("%d %b %Y").to_string();
        assert!(rendered.contains(&format!("Rates: {expected}")));
    }
}
