//! Text rendering for lookup and search results

use colored::{ColoredString, Colorize};
use hsn_core::wire::EntryView;
use hsn_core::{LookupResponse, Rate, RateBucket, SearchResponse};

pub const NO_DATA: &str = "No data found for this HSN code";

/// Color a rate by its bucket, padded to a fixed width
pub fn paint_rate(rate: Rate) -> ColoredString {
    let text = format!("{:>6}", rate.to_string());
    match RateBucket::of(rate) {
        RateBucket::Zero => text.dimmed(),
        RateBucket::Low => text.green(),
        RateBucket::Mid => text.blue(),
        RateBucket::High => text.yellow(),
        RateBucket::VeryHigh => text.red(),
    }
}

pub fn format_row(row: &EntryView) -> String {
    format!(
        "{}  {}  {}",
        format!("{:<8}", row.hsn_code).cyan(),
        paint_rate(row.gst_rate),
        row.description
    )
}

/// Header line for a lookup response
pub fn lookup_heading(response: &LookupResponse) -> String {
    match response {
        LookupResponse::ExactSearch { hsn_code, .. } => format!("HSN code {}", hsn_code),
        LookupResponse::PrefixSearch {
            prefix,
            total_found,
            results,
        } => {
            let mut heading = format!(
                "Found {} HSN {} starting with \"{}\"",
                total_found,
                if *total_found == 1 { "code" } else { "codes" },
                prefix
            );
            if *total_found > results.len() {
                heading.push_str(&format!(" (showing first {})", results.len()));
            }
            heading
        }
    }
}

pub fn print_lookup(response: &LookupResponse) {
    println!("{}", lookup_heading(response).bold());
    for row in response.rows() {
        println!("{}", format_row(&row));
    }
}

pub fn print_search(response: &SearchResponse) {
    if response.results.is_empty() {
        println!("{}", "No results found".yellow());
        return;
    }
    for row in &response.results {
        println!("{}", format_row(row));
    }
    let shown = response.results.len();
    if response.total_found > shown {
        println!(
            "... ({} showing {} of {} results)",
            "truncated".yellow(),
            shown,
            response.total_found
        );
    } else {
        println!(
            "({} {})",
            shown,
            if shown == 1 { "result" } else { "results" }
        );
    }
}
