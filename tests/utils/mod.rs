use regex as rust_regex;
use threx::Regex;

/// Matches `pattern` against `input` on both `threx` and the `regex` crate
/// (restricted to the ASCII literal/class/quantifier/anchor/capture subset
/// this engine actually supports) and asserts the results agree on `find`,
/// `find_all`, `find_captures`, and `find_all_captures`.
pub fn check_all_engines(pattern: &str, input: &str) {
    let rust = rust_regex::Regex::new(pattern);
    let ours = Regex::compile(pattern);

    match (rust, ours) {
        (Ok(rust_re), Ok(our_re)) => {
            let rust_match = rust_re.find(input).map(|m| (m.start(), m.end()));
            let my_match = our_re.find(input).map(|m| (m.start(), m.end()));
            assert_eq!(
                my_match, rust_match,
                "Mismatch for pattern {pattern:?} input {input:?} (find)"
            );

            let rust_all: Vec<_> = rust_re
                .find_iter(input)
                .map(|m| (m.start(), m.end()))
                .collect();
            let my_all: Vec<_> = our_re
                .find_all(input)
                .map(|m| (m.start(), m.end()))
                .collect();
            assert_eq!(
                my_all, rust_all,
                "Mismatch for pattern {pattern:?} input {input:?} (find_all)"
            );

            let rust_caps = rust_re.captures(input);
            let rust_groups = rust_caps.as_ref().map(|caps| {
                (0..caps.len())
                    .map(|i| caps.get(i).map(|m| m.as_str()))
                    .collect::<Vec<_>>()
            });
            let my_caps = our_re.find_captures(input);
            let my_groups = my_caps.as_ref().map(|caps| {
                (0..caps.group_len())
                    .map(|i| caps.get(i).map(|g| std::str::from_utf8(g.as_bytes()).unwrap()))
                    .collect::<Vec<_>>()
            });
            assert_eq!(
                my_groups, rust_groups,
                "Mismatch for pattern {pattern:?} input {input:?} (find_captures)"
            );

            let rust_all_caps: Vec<Vec<Option<&str>>> = rust_re
                .captures_iter(input)
                .map(|caps| {
                    (0..caps.len())
                        .map(|i| caps.get(i).map(|m| m.as_str()))
                        .collect()
                })
                .collect();
            let my_all_caps: Vec<Vec<Option<&str>>> = our_re
                .find_all_captures(input)
                .map(|caps| {
                    (0..caps.group_len())
                        .map(|i| caps.get(i).map(|g| std::str::from_utf8(g.as_bytes()).unwrap()))
                        .collect()
                })
                .collect();
            assert_eq!(
                my_all_caps, rust_all_caps,
                "Mismatch for pattern {pattern:?} input {input:?} (find_all_captures)"
            );
        }
        (Err(_), Err(_)) => {} // both reject the pattern, that's consistent
        (Ok(_), Err(e)) => panic!("threx failed to compile {pattern:?} but regex succeeded: {e}"),
        (Err(e), Ok(_)) => panic!("regex failed to compile {pattern:?} but threx succeeded: {e}"),
    }
}
