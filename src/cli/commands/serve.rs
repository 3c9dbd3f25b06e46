//! Web server command.

use console::style;

use crate::config::Settings;

/// Port used when the bind address names only a host.
const DEFAULT_PORT: u16 = 5000;

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;

    println!(
        "{} Saving forms to {} on {}:{}",
        style("→").cyan(),
        style(&settings.database.name).bold(),
        settings.database.host,
        settings.database.port
    );
    println!(
        "{} Starting formreader at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "5000" -> 0.0.0.0:5000
/// - Just a host: "127.0.0.1" -> 127.0.0.1:5000
/// - Host and port: "127.0.0.1:8080" -> 127.0.0.1:8080
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    if bind.is_empty() {
        anyhow::bail!("empty bind address");
    }

    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("0.0.0.0".to_string(), port));
    }

    // Try parsing as host:port
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
    }

    // Must be just a host, use default port
    Ok((bind.to_string(), DEFAULT_PORT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_only() {
        assert_eq!(
            parse_bind_address("8080").unwrap(),
            ("0.0.0.0".to_string(), 8080)
        );
    }

    #[test]
    fn test_host_only() {
        assert_eq!(
            parse_bind_address("127.0.0.1").unwrap(),
            ("127.0.0.1".to_string(), 5000)
        );
    }

    #[test]
    fn test_host_and_port() {
        assert_eq!(
            parse_bind_address("192.168.0.10:5001").unwrap(),
            ("192.168.0.10".to_string(), 5001)
        );
    }

    #[test]
    fn test_empty() {
        assert!(parse_bind_address("").is_err());
    }
}
