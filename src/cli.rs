/// Value of `--flag=value` or `--flag value`; blank values are ignored.
pub fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

pub fn arg_value(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    flag_value(&args, flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reads_both_flag_forms() {
        let a = args(&["--stage=render", "--config", "cfg.json"]);
        assert_eq!(flag_value(&a, "--stage").as_deref(), Some("render"));
        assert_eq!(flag_value(&a, "--config").as_deref(), Some("cfg.json"));
        assert_eq!(flag_value(&a, "--seed"), None);
    }

    #[test]
    fn blank_values_are_skipped() {
        let a = args(&["--out=", "--out", "  ", "--seed"]);
        assert_eq!(flag_value(&a, "--out"), None);
        assert_eq!(flag_value(&a, "--seed"), None);

        let a = args(&["--out= ", "--out=data/x"]);
        assert_eq!(flag_value(&a, "--out").as_deref(), Some("data/x"));
    }
}
