//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use chrono::{DateTime, Local, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{DecryptedRecord, Listing, RecordWarning};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Display format for record timestamps (local time).
fn format_added_on(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Print a listing as a table, then one warning per expired password
/// and per record that could not be decrypted.
pub fn print_listing<F>(listing: &Listing, empty_msg: &str, is_expired: F)
where
    F: Fn(&DecryptedRecord) -> bool,
{
    if listing.is_empty() {
        info(empty_msg);
        return;
    }

    if !listing.records.is_empty() {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Website", "Username", "Password", "Added on"]);

        for r in &listing.records {
            let added_on = if is_expired(r) {
                format!("{} (expired)", format_added_on(&r.created_at))
            } else {
                format_added_on(&r.created_at)
            };
            table.add_row(vec![
                r.site.clone(),
                r.username.clone(),
                r.password.to_string(),
                added_on,
            ]);
        }

        println!("{table}");
    }

    for r in listing.records.iter().filter(|r| is_expired(r)) {
        warning(&format!(
            "Password for '{}' added on {} has expired. Consider updating it.",
            r.site,
            format_added_on(&r.created_at)
        ));
    }

    report_warnings(&listing.warnings);
}

/// Print one warning per undecryptable record.
pub fn report_warnings(warnings: &[RecordWarning]) {
    for w in warnings {
        warning(&w.to_string());
    }
    if !warnings.is_empty() {
        tip("Unreadable records were written under a different OTP secret or have been tampered with.");
    }
}
