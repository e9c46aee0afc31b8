use camino::Utf8Path;
use config::{Config, ConfigError};

pub use shutterbridge_api::config::*;

pub fn parse(filename: &Utf8Path) -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        .set_default("bridge.name", "shutterbridge")?
        .add_source(config::File::with_name(filename.as_str()))
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, body: &str) -> camino::Utf8PathBuf {
        let dir = std::env::temp_dir().join("shutterbridge-config-tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        camino::Utf8PathBuf::from_path_buf(path).unwrap()
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let path = write_config("minimal.yaml", "shutter:\n  host: 192.168.1.50\n");

        let config = parse(&path).unwrap();
        assert_eq!(config.bridge.name, "shutterbridge");
        assert_eq!(config.shutter.host, "192.168.1.50");
        assert_eq!(config.shutter.name, None);
        assert_eq!(config.shutter.timeout().as_secs(), 10);
        assert_eq!(config.shutter.poll_interval().as_secs(), 15);
    }

    #[test]
    fn full_config_overrides_defaults() {
        let path = write_config(
            "full.yaml",
            concat!(
                "bridge:\n",
                "  name: attic-bridge\n",
                "shutter:\n",
                "  host: 10.0.0.7\n",
                "  name: Attic Shutter\n",
                "  timeout_secs: 3\n",
                "  poll_interval_secs: 30\n",
            ),
        );

        let config = parse(&path).unwrap();
        assert_eq!(config.bridge.name, "attic-bridge");
        assert_eq!(config.shutter.name.as_deref(), Some("Attic Shutter"));
        assert_eq!(config.shutter.timeout().as_secs(), 3);
        assert_eq!(config.shutter.poll_interval().as_secs(), 30);
    }

    #[test]
    fn missing_host_is_rejected() {
        let path = write_config("nohost.yaml", "shutter:\n  name: Broken\n");
        assert!(parse(&path).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let path = write_config(
            "zerotimeout.yaml",
            "shutter:\n  host: 10.0.0.7\n  timeout_secs: 0\n",
        );
        assert!(parse(&path).is_err());
    }
}
