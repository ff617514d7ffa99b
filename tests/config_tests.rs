use chrono::Duration;
use sdlang::{ConfigLoader, Error, PreprocessOptions, Result, Settings, Tag};
use std::path::PathBuf;

#[derive(Debug, Default, PartialEq)]
struct ServiceConfig {
    workers: u32,
    name: String,
    timeout: Option<Duration>,
    retries: u8,
}

impl Settings for ServiceConfig {
    fn initialize(&mut self, root: &Tag) -> Result<()> {
        self.workers = root.child_value_as_or("workers", 1);
        self.name = root.child_value_as_or("name", "unnamed".to_string());
        if let Some(limits) = root.child("limits") {
            let timeout = match limits.child("timeout") {
                Some(tag) => tag.value_as()?,
                None => Duration::zero(),
            };
            self.timeout = Some(timeout);
            self.retries = limits.child_value_as_or("retries", 0);
        }
        Ok(())
    }
}

fn testdata() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/testdata")
}

#[test]
fn test_load_default_from_directory() {
    let config: ServiceConfig = ConfigLoader::in_directory(testdata())
        .load_default()
        .unwrap();
    assert_eq!(
        config,
        ServiceConfig {
            workers: 4,
            name: "primary".to_string(),
            timeout: Some(Duration::seconds(30)),
            retries: 3,
        }
    );
}

#[test]
fn test_load_by_argument() {
    let loader = ConfigLoader::in_directory(testdata());

    let config: ServiceConfig = loader.load_from_args(&["limits"]).unwrap();
    assert_eq!(config.workers, 1);
    assert_eq!(config.retries, 3);

    let args: Vec<String> = Vec::new();
    let config: ServiceConfig = loader.load_from_args(args.as_slice()).unwrap();
    assert_eq!(config.workers, 4);
}

#[test]
fn test_missing_directory_falls_back_to_defaults() {
    let loader = ConfigLoader::in_directory(testdata().join("no-such-dir"));
    let config: ServiceConfig = loader.load_default().unwrap();
    assert_eq!(config, ServiceConfig::default());

    assert_eq!(
        loader.load::<ServiceConfig>("prod").unwrap_err(),
        Error::SourceNotFound("prod.sdl".into())
    );
}

#[test]
fn test_strict_loader_rejects_missing_includes() {
    let loader = ConfigLoader::in_directory(testdata()).with_options(PreprocessOptions::strict());
    assert!(loader.load::<ServiceConfig>("default").is_ok());
    assert_eq!(
        loader.load::<ServiceConfig>("root").unwrap_err(),
        Error::SourceNotFound("missing.sdl".into())
    );
}
