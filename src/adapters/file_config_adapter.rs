//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    const FULL: &str = r#"
[data]
source = csv
csv_path = /var/lib/prices.csv

[sqlite]
path = prices.db
pool_size = 2

[allocation]
btc = 0.5
eth = 0.3
gold = 0.2
past_years = 3

[web]
listen = 0.0.0.0:8080
"#;

    #[test]
    fn from_string_parses_all_sections() {
        let adapter = FileConfigAdapter::from_string(FULL).unwrap();
        assert_eq!(adapter.get_string("data", "source"), Some("csv".to_string()));
        assert_eq!(
            adapter.get_string("data", "csv_path"),
            Some("/var/lib/prices.csv".to_string())
        );
        assert_eq!(adapter.get_int("sqlite", "pool_size", 4), 2);
        assert_eq!(adapter.get_string("allocation", "btc"), Some("0.5".to_string()));
        assert_eq!(adapter.get_int("allocation", "past_years", 1), 3);
        assert_eq!(
            adapter.get_string("web", "listen"),
            Some("0.0.0.0:8080".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[data]\nsource = csv\n").unwrap();
        assert_eq!(adapter.get_string("data", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_default_for_missing_or_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[sqlite]\npool_size = abc\n").unwrap();
        assert_eq!(adapter.get_int("sqlite", "pool_size", 4), 4);
        assert_eq!(adapter.get_int("sqlite", "missing", 7), 7);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[data]\ncsv_path = /tmp/p.csv\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("data", "csv_path"),
            Some("/tmp/p.csv".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
