use blockconf::Action;
use colored::{ColoredString, Colorize};

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Diff marker for a planned action
pub fn action_symbol(action: Action) -> ColoredString {
    match action {
        Action::Create => "+".green(),
        Action::Delete => "-".red(),
        Action::Update => "~".yellow(),
        Action::Replace => "±".magenta(),
        Action::Noop => "=".dimmed(),
    }
}

/// Human name of a resource kind
pub fn kind_title(kind: &str) -> &str {
    match kind {
        "ospf" => "OSPF",
        "bgp_address_family" => "BGP address families",
        "pim_router" => "PIM",
        "route_map" => "Route-maps",
        other => other,
    }
}
