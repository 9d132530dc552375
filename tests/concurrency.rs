use std::thread;

use inifile::Ini;

#[test]
fn concurrent_adds_to_one_section() {
    let ini = Ini::new("shared.ini");
    let section = ini.add_section("shared");

    thread::scope(|s| {
        for t in 0..8 {
            let section = &section;
            s.spawn(move || {
                for i in 0..100 {
                    _ = section.add(&format!("key{i}"), &format!("{t}"));
                }
            });
        }
    });

    let names = section.option_names();
    assert_eq!(names.len(), 100);

    let mut sorted = names.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), names.len(), "option names must be unique");
}

#[test]
fn sections_added_from_many_threads() {
    let ini = Ini::new("many.ini");

    thread::scope(|s| {
        for t in 0..4 {
            let ini = &ini;
            s.spawn(move || {
                for i in 0..50 {
                    _ = ini.add_section(&format!("s{}", i % 10)).add("t", &t.to_string());
                }
            });
        }
    });

    assert_eq!(ini.sections("").expect("all").len(), 200);
    for i in 0..10 {
        assert_eq!(ini.sections(&format!("s{i}")).expect("name").len(), 20);
    }
}

#[test]
fn readers_and_writers_interleave() {
    let ini = Ini::new("mixed.ini");
    for i in 0..20 {
        _ = ini.add_section(&format!("node-{i}")).add("up", "yes");
    }

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..20 {
                _ = ini.delete(&format!("^node-{i}$")).expect("valid pattern");
            }
        });
        s.spawn(|| {
            for _ in 0..50 {
                // Every rendered section is complete, whatever the writer has removed so far.
                for block in ini.to_string().split_terminator("up = yes\n") {
                    assert!(block.starts_with("[node-"), "torn output: {block:?}");
                }
            }
        });
        s.spawn(|| {
            for _ in 0..50 {
                _ = ini.find("^node-").expect("valid pattern");
            }
        });
    });

    assert!(ini.sections("").expect("all").is_empty());
    assert_eq!(ini.to_string(), "");
}
