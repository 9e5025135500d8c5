//! Account commands.
//!
//! # Usage
//!
//! ```bash
//! gn-cli login -e ada@example.com
//! # password is read from GLOWNEST_PASSWORD or prompted on stdin
//! export GLOWNEST_JWT=<printed token>
//! ```

use std::io::BufRead;

use super::{CommandError, context};

/// Sign in and print the JWT for use with `GLOWNEST_JWT`.
///
/// # Errors
///
/// Returns an error if the credentials are rejected or the request fails.
pub async fn login(email: &str) -> Result<(), CommandError> {
    let (api, _) = context()?;
    let password = read_password()?;
    let tokens = api.login(email, &password).await?;
    tracing::info!("Signed in as {email}.");
    tracing::info!("export GLOWNEST_JWT={}", tokens.jwt);
    Ok(())
}

fn read_password() -> Result<String, CommandError> {
    if let Ok(password) = std::env::var("GLOWNEST_PASSWORD") {
        return Ok(password);
    }
    tracing::info!("Password:");
    let mut password = String::new();
    std::io::stdin().lock().read_line(&mut password)?;
    Ok(password.trim_end().to_string())
}
