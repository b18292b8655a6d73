//! The fixed currency set served by the widget.

/// Currencies shown in the widget, in display order.
pub const DISPLAY_CURRENCIES: [&str; 5] = ["USD", "EUR", "CHF", "AUD", "CAD"];

/// Intermediate currency used to rebase the provider table. Never displayed.
pub const PIVOT_CURRENCY: &str = "GBP";

/// Full display name for a currency code. Unknown codes fall back to the
/// code itself, though the widget only ever renders the fixed set above.
pub fn display_name(code: &str) -> &str {
    match code {
        "USD" => "United States Dollar",
        "EUR" => "Euro",
        "CHF" => "Swiss Franc",
        "AUD" => "Australian Dollar",
        "CAD" => "Canadian Dollar",
        _ => code,
    }
}

/// Short currency marker shown next to each display row.
pub fn symbol(code: &str) -> &str {
    match code {
        "USD" => "$",
        "EUR" => "€",
        "CHF" => "Fr",
        "AUD" => "A$",
        "CAD" => "C$",
        _ => code,
    }
}
