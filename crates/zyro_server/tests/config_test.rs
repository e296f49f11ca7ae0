//! Narrator configuration loading tests.

use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use zyro_server::NarratorConfig;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults() {
    let config = NarratorConfig::default();

    assert_eq!(config.api_url(), "https://openrouter.ai/api/v1/chat/completions");
    assert_eq!(config.model(), "deepseek/deepseek-r1:free");
    assert_eq!(*config.max_tokens(), 700);
    assert_eq!(*config.timeout_secs(), 45);
    assert_eq!(config.timeout(), Duration::from_secs(45));
    assert_eq!(config.api_key_env(), "OPENROUTER_API_KEY");
}

#[test]
fn test_no_path_means_defaults() {
    assert_eq!(NarratorConfig::load(None).unwrap(), NarratorConfig::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let file = write_config(
        r#"
model = "meta-llama/llama-3-8b-instruct"
timeout_secs = 10
"#,
    );

    let config = NarratorConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.model(), "meta-llama/llama-3-8b-instruct");
    assert_eq!(config.timeout(), Duration::from_secs(10));
    assert_eq!(*config.max_tokens(), 700);
    assert_eq!(config.title(), "Zyro Grid Battle");
}

#[test]
fn test_bad_file_is_an_error() {
    let file = write_config("model = [unclosed");
    let err = NarratorConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = NarratorConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.message.contains("Failed to read config file"));
}

#[test]
fn test_blank_or_placeholder_key_disables_client() {
    let config = NarratorConfig::default();
    assert!(config.llm_config_with_key("").is_none());
    assert!(config.llm_config_with_key("   ").is_none());
    assert!(config.llm_config_with_key("your_openrouter_api_key_here").is_none());
}

#[test]
fn test_real_key_builds_client_config() {
    let config = NarratorConfig::default()
        .with_api_url("http://127.0.0.1:9/chat")
        .with_timeout_secs(3);

    let llm = config.llm_config_with_key("sk-or-test").unwrap();

    assert_eq!(llm.api_url(), "http://127.0.0.1:9/chat");
    assert_eq!(llm.model(), "deepseek/deepseek-r1:free");
    assert_eq!(llm.timeout(), Duration::from_secs(3));
}

#[test]
fn test_unset_env_var_disables_client() {
    let config = NarratorConfig::default().with_api_key_env("ZYRO_TEST_KEY_THAT_IS_NEVER_SET");
    assert!(config.llm_config().is_none());
}
