use console::style;

use crate::venue::Venue;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    /// Assistant turn
    pub fn assistant(&self, message: &str) {
        println!("{} {}", style("assistant>").cyan().bold(), message);
    }

    /// Compact venue card: name, type, rating, partner badge, description
    pub fn venue(&self, venue: &Venue) {
        let partner = if venue.partner {
            format!(" {}", style("(Partner)").yellow())
        } else {
            String::new()
        };
        println!(
            "  {} {} {}{}",
            style("•").dim(),
            style(&venue.name).bold(),
            style(format!("[{}] ★ {:.1}", venue.venue_type, venue.rating)).dim(),
            partner
        );
        if !venue.short_description.is_empty() {
            println!("    {}", venue.short_description);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
