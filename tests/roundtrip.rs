use std::collections::HashMap;

use inifile::{Error, GLOBAL, Ini};

const SAMPLE: &str = "\
; leading comment
name = demo
mode: fast

[server]
host = 127.0.0.1
port=8080
# note without delimiter
debug

[db-1]
url = postgres://a
[db-2]
url = postgres://b
[server]
host = 10.0.0.1
";

/// Content of every section as (name, [(option, value)]) in file order.
fn structure(ini: &Ini) -> Vec<(String, Vec<(String, String)>)> {
    ini.sections("")
        .expect("all sections")
        .iter()
        .map(|section| {
            let options = section
                .option_names()
                .into_iter()
                .map(|name| {
                    let value = section.value_of(&name);
                    (name, value)
                })
                .collect();
            (section.name().to_owned(), options)
        })
        .collect()
}

fn parse(text: &str) -> Ini {
    Ini::from_reader("sample.ini", text.as_bytes()).expect("parse sample")
}

#[test]
fn reparse_yields_same_structure() {
    let ini = parse(SAMPLE);
    let text = ini.to_string();
    let again = parse(&text);

    assert_eq!(structure(&ini), structure(&again));
    assert_eq!(again.to_string(), text);
}

#[test]
fn canonical_text() {
    let ini = parse(SAMPLE);

    assert_eq!(
        ini.to_string(),
        "\
name = demo
mode = fast
[server]
host = 127.0.0.1
port = 8080
[server]
host = 10.0.0.1
[db-1]
url = postgres://a
[db-2]
url = postgres://b
"
    );
}

#[test]
fn concrete_scenario() {
    let ini = parse("foo=bar\n[section]\n; a comment\nbaz = qux\n");

    assert_eq!(ini.string_value(GLOBAL, "foo").expect("foo"), "bar");
    assert_eq!(ini.string_value("section", "baz").expect("baz"), "qux");
    assert_eq!(ini.to_string(), "foo = bar\n[section]\nbaz = qux\n");
}

#[test]
fn duplicate_headers() {
    let ini = parse("[x]\na=1\n[x]\nb=2\n");
    let sections = ini.sections("x").expect("x");

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].option_names(), ["a"]);
    assert_eq!(sections[1].option_names(), ["b"]);
}

#[test]
fn delete_then_serialize() {
    let ini = parse(SAMPLE);
    let removed = ini.delete("^db-").expect("delete");

    let names: Vec<&str> = removed.iter().map(|s| s.name()).collect();
    assert_eq!(names, ["db-1", "db-2"]);
    assert!(!ini.to_string().contains("postgres"));

    // Removed sections stay usable by whoever still holds them.
    assert_eq!(removed[0].value_of("url"), "postgres://a");
}

#[test]
fn mutations_show_up_in_text() {
    let ini = parse(SAMPLE);
    let server = ini.section("server").expect("server");

    assert_eq!(server.add("port", "9090"), "8080");
    assert_eq!(server.delete("host"), "127.0.0.1");
    _ = server.add("tls", "on");

    let again = parse(&ini.to_string());
    let options: HashMap<_, _> = again.section("server").expect("server").options();

    assert_eq!(options.get("port").map(String::as_str), Some("9090"));
    assert_eq!(options.get("tls").map(String::as_str), Some("on"));
    assert!(!options.contains_key("host"));
}

#[test]
fn unknown_names_are_errors() {
    let ini = parse(SAMPLE);

    assert!(matches!(ini.section("missing"), Err(Error::NotFound { .. })));
    assert!(matches!(ini.find("*"), Err(Error::InvalidPattern { .. })));
}
