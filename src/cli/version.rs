/// Display version information
pub fn execute() {
    println!("consent-gate {}", env!("CARGO_PKG_VERSION"));
    println!("Consent gate bot for Telegram groups");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_execute() {
        execute();
    }
}
