use std::io::Write;

use pretty_assertions::assert_eq;
use serial_test::serial;
use shabaka::config::Config;
use shabaka::config::load_config;
use shabaka::constants::DATA_SERVICE_URL_ENV;
use shabaka::constants::DEFAULT_PAGE_SIZE;
use shabaka::error::ConfigError;
use tempfile::NamedTempFile;

const MINIMAL: &str = r#"
[data_service]
base_url = "http://indexer.internal:8000"
"#;

fn write_config(contents: &str) -> NamedTempFile {
  let mut file = NamedTempFile::new().unwrap();
  file.write_all(contents.as_bytes()).unwrap();
  file
}

fn config_error(err: &anyhow::Error) -> &ConfigError {
  err.downcast_ref::<ConfigError>().expect("config error")
}

mod load_config_tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  #[serial]
  fn test_minimal_config_fills_in_defaults() {
    temp_env::with_var_unset(DATA_SERVICE_URL_ENV, || {
      let file = write_config(MINIMAL);
      let config = load_config(file.path()).unwrap();

      assert_eq!(config.data_service.base_url, "http://indexer.internal:8000");
      assert_eq!(config.data_service.timeout_ms, 30_000);
      assert_eq!(config.data_service.max_retries, 3);
      assert_eq!(config.explorer.page_size, DEFAULT_PAGE_SIZE);
      assert_eq!(config.logging.base_dir().to_str(), Some(".logs"));
    });
  }

  #[test]
  #[serial]
  fn test_example_config_parses() {
    temp_env::with_var_unset(DATA_SERVICE_URL_ENV, || {
      let config = Config::from_toml(include_str!("../Config.example.toml")).unwrap();
      assert_eq!(config.data_service.base_retry_delay_ms, 250);
      assert_eq!(config.explorer.page_size, 100);
    });
  }

  #[test]
  #[serial]
  fn test_environment_overrides_base_url() {
    temp_env::with_var(DATA_SERVICE_URL_ENV, Some("  https://flows.example.com/api  "), || {
      let config = Config::from_toml(MINIMAL).unwrap();
      assert_eq!(config.data_service.base_url, "https://flows.example.com/api");
    });
  }

  #[test]
  #[serial]
  fn test_blank_environment_value_is_ignored() {
    temp_env::with_var(DATA_SERVICE_URL_ENV, Some("   "), || {
      let config = Config::from_toml(MINIMAL).unwrap();
      assert_eq!(config.data_service.base_url, "http://indexer.internal:8000");
    });
  }

  #[test]
  fn test_missing_file_is_reported() {
    let err = load_config("/definitely/not/here/Config.toml").unwrap_err();
    assert!(matches!(config_error(&err), ConfigError::OpenFileError(_)));
  }
}

mod validation_tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  #[serial]
  fn test_zero_page_size_is_rejected() {
    temp_env::with_var_unset(DATA_SERVICE_URL_ENV, || {
      let err = Config::from_toml(&format!("{}\n[explorer]\npage_size = 0\n", MINIMAL)).unwrap_err();
      assert!(matches!(
        config_error(&err),
        ConfigError::InvalidValue {
          field: "explorer.page_size",
          ..
        }
      ));
    });
  }

  #[test]
  #[serial]
  fn test_unparseable_base_url_is_rejected() {
    temp_env::with_var(DATA_SERVICE_URL_ENV, Some("not a url"), || {
      let err = Config::from_toml(MINIMAL).unwrap_err();
      assert!(matches!(
        config_error(&err),
        ConfigError::InvalidValue {
          field: "data_service.base_url",
          ..
        }
      ));
    });
  }

  #[test]
  fn test_missing_data_service_section_is_a_parse_error() {
    let err = Config::from_toml("[explorer]\npage_size = 10\n").unwrap_err();
    assert!(matches!(config_error(&err), ConfigError::ParseError(_)));
  }
}
