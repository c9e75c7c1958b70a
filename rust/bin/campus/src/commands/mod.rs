pub mod account;
pub mod dashboard;

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::debug;

use portal::handlers::Outcome;

/// Print a controller outcome. Anything but success becomes an error.
pub fn report(outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Done { alert, redirect } => {
            println!("{alert}");
            if let Some(next) = redirect {
                debug!(next = %next, "redirect");
            }
            Ok(())
        }
        Outcome::Cancelled => {
            println!("Cancelled.");
            Ok(())
        }
        Outcome::Invalid { errors, alert } => {
            for e in errors.iter() {
                eprintln!("  {}: {}", e.field, e.message);
            }
            anyhow::bail!("{alert}")
        }
        Outcome::Refused { alert } => anyhow::bail!("{alert}"),
    }
}

/// Read one line from stdin. `None` on end of input.
pub fn prompt_line(prompt: &str) -> Result<Option<String>> {
    eprint!("{prompt}");
    std::io::stderr().flush()?;
    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Password and its confirmation. A password given as a flag confirms
/// itself.
pub fn prompt_new_password(password: Option<String>) -> Result<(String, String)> {
    if let Some(p) = password {
        return Ok((p.clone(), p));
    }
    let pw = rpassword::prompt_password("Password: ")?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    Ok((pw, confirm))
}
