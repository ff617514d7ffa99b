use sdlang::{Error, FileSource, PreprocessOptions, Preprocessor, Tag};
use std::path::PathBuf;

fn testdata() -> FileSource {
    FileSource::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/testdata"))
}

#[test]
fn test_nested_file_includes() {
    let text = Preprocessor::new(testdata())
        .process_source("root.sdl")
        .unwrap();
    let expected = "main_1\
        \nfoo_1\
        \nfoo_2\
        \nbar_1\
        \nbar_2\
        \nbar_3\
        \nfoo_last\
        \n#include\
        \nmain_2\
        \nmain_last\n";
    assert_eq!(text, expected);
}

#[test]
fn test_strict_mode_reports_first_missing_include() {
    let err = Preprocessor::with_options(testdata(), PreprocessOptions::strict())
        .process_source("root.sdl")
        .unwrap_err();
    assert_eq!(err, Error::SourceNotFound("missing.sdl".into()));
}

#[test]
fn test_read_source_parses_expanded_text() {
    let mut root = Tag::root();
    root.read_source(&testdata(), "root.sdl").unwrap();

    let names: Vec<String> = root
        .children()
        .iter()
        .map(|tag| tag.name().to_string())
        .collect();
    assert_eq!(
        names,
        ["main_1", "foo_1", "foo_2", "bar_1", "bar_2", "bar_3", "foo_last", "main_2", "main_last"]
    );
}

#[test]
fn test_read_source_missing_document() {
    let mut root = Tag::root();
    let err = root.read_source(&testdata(), "absent.sdl").unwrap_err();
    assert_eq!(err, Error::SourceNotFound("absent.sdl".into()));
    assert!(root.children().is_empty());
}
