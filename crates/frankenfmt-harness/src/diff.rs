//! Diff rendering for fixture comparison.

/// Render a line diff between expected and actual output.
///
/// Lines present on only one side are listed after the paired lines.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let mut out = String::from("--- expected\n+++ actual\n");
    let exp: Vec<&str> = expected.split('\n').collect();
    let act: Vec<&str> = actual.split('\n').collect();
    for i in 0..exp.len().max(act.len()) {
        let (e, a) = (exp.get(i), act.get(i));
        if e == a {
            continue;
        }
        out.push_str(&format!("@@ line {} @@\n", i + 1));
        if let Some(e) = e {
            out.push_str(&format!("-{e}\n"));
        }
        if let Some(a) = a {
            out.push_str(&format!("+{a}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs() {
        assert_eq!(render_diff("a\nb", "a\nb"), "[identical]");
    }

    #[test]
    fn reports_changed_and_extra_lines() {
        let diff = render_diff("a\nb", "a\nc\nd");
        assert_eq!(
            diff,
            "--- expected\n+++ actual\n@@ line 2 @@\n-b\n+c\n@@ line 3 @@\n+d\n"
        );
    }

    #[test]
    fn trailing_whitespace_differences_show_up() {
        let diff = render_diff("x ", "x");
        assert!(diff.contains("-x \n+x\n"));
    }
}
